//! Receipt confirmation polling

use crate::{bundler::BundlerClient, error::ProviderError};
use caelus_primitives::{
    constants::provider::{DEFAULT_CONFIRMATION_INTERVAL_MS, DEFAULT_CONFIRMATION_RETRIES},
    UserOperationHash, UserOperationReceipt,
};
use std::time::Duration;
use tracing::{debug, trace};

/// Retry budget for the confirmation poller
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConfirmationPolicy {
    /// Number of receipt lookups before the operation counts as unconfirmed
    pub max_retries: usize,
    /// Fixed pause between lookups
    pub retry_interval: Duration,
}

impl Default for ConfirmationPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_CONFIRMATION_RETRIES,
            retry_interval: Duration::from_millis(DEFAULT_CONFIRMATION_INTERVAL_MS),
        }
    }
}

/// Polls the bundler until the user operation has a receipt.
///
/// A lookup error is treated the same as a missing receipt: the operation
/// may simply not be included yet. This loop is the only retrying component
/// of the provider; everything else is single-attempt.
pub(crate) async fn wait_for_receipt<B: BundlerClient + ?Sized>(
    bundler: &B,
    hash: &UserOperationHash,
    policy: &ConfirmationPolicy,
) -> Result<UserOperationReceipt, ProviderError> {
    for attempt in 1..=policy.max_retries {
        match bundler.user_operation_receipt(hash).await {
            Ok(Some(receipt)) => {
                debug!("User operation {hash} confirmed after {attempt} receipt lookups");
                return Ok(receipt);
            }
            Ok(None) => trace!("User operation {hash} not yet confirmed (attempt {attempt})"),
            Err(err) => {
                trace!("Receipt lookup for user operation {hash} failed (attempt {attempt}): {err:?}")
            }
        }

        if attempt < policy.max_retries {
            tokio::time::sleep(policy.retry_interval).await;
        }
    }

    Err(ProviderError::ConfirmationTimeout { hash: *hash, attempts: policy.max_retries })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MockBundler;

    fn policy(max_retries: usize) -> ConfirmationPolicy {
        ConfirmationPolicy { max_retries, retry_interval: Duration::from_millis(10) }
    }

    #[tokio::test(start_paused = true)]
    async fn resolves_on_the_first_successful_lookup() {
        let bundler = MockBundler { receipt_not_found: 3, ..Default::default() };
        let hash = UserOperationHash::default();

        let receipt = wait_for_receipt(&bundler, &hash, &policy(5)).await.unwrap();
        assert_eq!(receipt.tx_receipt.transaction_hash, bundler.tx_hash);
        assert_eq!(bundler.lookups(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn lookup_errors_count_as_not_yet_confirmed() {
        let bundler = MockBundler { receipt_errors: 2, receipt_not_found: 1, ..Default::default() };
        let hash = UserOperationHash::default();

        let receipt = wait_for_receipt(&bundler, &hash, &policy(5)).await;
        assert!(receipt.is_ok());
        assert_eq!(bundler.lookups(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn times_out_after_exactly_the_retry_budget() {
        let bundler = MockBundler { has_receipt: false, ..Default::default() };
        let hash = UserOperationHash::default();

        let err = wait_for_receipt(&bundler, &hash, &policy(5)).await.unwrap_err();
        match err {
            ProviderError::ConfirmationTimeout { attempts, .. } => assert_eq!(attempts, 5),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(bundler.lookups(), 5);
    }
}
