//! User operation middleware pipeline
//!
//! Four ordered stages progressively fill in a draft: paymaster placeholder,
//! gas limits, fee bid, final paymaster data. Each stage is independently
//! replaceable on the provider, so a real paymaster integration only swaps
//! the stages it cares about.

use crate::{bundler::BundlerClient, error::ProviderError, fee::escalate_fees};
use async_trait::async_trait;
use caelus_primitives::UserOperationDraft;
use ethers::types::{Address, Bytes, U256};
use std::sync::Arc;
use tracing::trace;

/// Provider state visible to the middleware stages
pub struct MiddlewareContext<'a> {
    /// Bundler the operation is being built for
    pub bundler: &'a dyn BundlerClient,
    /// Entry point the operation will be submitted to
    pub entry_point: Address,
    /// Lower bound for the priority fee bid
    pub min_priority_fee_bid: U256,
}

/// A single transform stage of the construction pipeline
#[async_trait]
pub trait UserOperationMiddleware: Send + Sync {
    /// Transforms the draft, filling in the fields this stage owns
    async fn process(
        &self,
        ctx: &MiddlewareContext<'_>,
        draft: UserOperationDraft,
    ) -> Result<UserOperationDraft, ProviderError>;
}

/// Ordered set of stage bindings applied to every draft.
///
/// The order is fixed: the paymaster placeholder must exist before gas
/// estimation, and the final paymaster stage runs over fully priced drafts.
#[derive(Clone)]
pub struct MiddlewareStack {
    pub(crate) dummy_paymaster: Arc<dyn UserOperationMiddleware>,
    pub(crate) gas_estimator: Arc<dyn UserOperationMiddleware>,
    pub(crate) fee_estimator: Arc<dyn UserOperationMiddleware>,
    pub(crate) paymaster: Arc<dyn UserOperationMiddleware>,
}

impl Default for MiddlewareStack {
    fn default() -> Self {
        Self {
            dummy_paymaster: Arc::new(DummyPaymasterMiddleware),
            gas_estimator: Arc::new(GasEstimatorMiddleware),
            fee_estimator: Arc::new(FeeEstimatorMiddleware),
            paymaster: Arc::new(PaymasterMiddleware),
        }
    }
}

impl MiddlewareStack {
    /// Runs the stages strictly in order, each one receiving the previous
    /// stage's output
    pub async fn run(
        &self,
        ctx: &MiddlewareContext<'_>,
        mut draft: UserOperationDraft,
    ) -> Result<UserOperationDraft, ProviderError> {
        for stage in
            [&self.dummy_paymaster, &self.gas_estimator, &self.fee_estimator, &self.paymaster]
        {
            draft = stage.process(ctx, draft).await?;
        }
        Ok(draft)
    }
}

/// Stage 1: empty paymaster placeholder, so downstream gas estimation
/// accounts for the field
#[derive(Clone, Copy, Debug, Default)]
pub struct DummyPaymasterMiddleware;

#[async_trait]
impl UserOperationMiddleware for DummyPaymasterMiddleware {
    async fn process(
        &self,
        _ctx: &MiddlewareContext<'_>,
        draft: UserOperationDraft,
    ) -> Result<UserOperationDraft, ProviderError> {
        Ok(draft.paymaster_and_data(Bytes::default()))
    }
}

/// Stage 2: bundler-side gas estimation against the entry point
#[derive(Clone, Copy, Debug, Default)]
pub struct GasEstimatorMiddleware;

#[async_trait]
impl UserOperationMiddleware for GasEstimatorMiddleware {
    async fn process(
        &self,
        ctx: &MiddlewareContext<'_>,
        draft: UserOperationDraft,
    ) -> Result<UserOperationDraft, ProviderError> {
        let est = ctx.bundler.estimate_user_operation_gas(&draft, ctx.entry_point).await?;
        trace!("Gas estimation for user operation: {est:?}");

        Ok(draft
            .call_gas_limit(est.call_gas_limit)
            .verification_gas_limit(est.verification_gas_limit)
            .pre_verification_gas(est.pre_verification_gas))
    }
}

/// Stage 3: fee bid derived from the network's suggested priority fee and
/// combined fee data
#[derive(Clone, Copy, Debug, Default)]
pub struct FeeEstimatorMiddleware;

#[async_trait]
impl UserOperationMiddleware for FeeEstimatorMiddleware {
    async fn process(
        &self,
        ctx: &MiddlewareContext<'_>,
        draft: UserOperationDraft,
    ) -> Result<UserOperationDraft, ProviderError> {
        let suggested = ctx.bundler.max_priority_fee_per_gas().await?;
        let fee_data = ctx.bundler.fee_data().await?;
        let fees = escalate_fees(suggested, &fee_data, ctx.min_priority_fee_bid)?;
        trace!("Fee bid for user operation: {fees:?}");

        Ok(draft
            .max_fee_per_gas(fees.max_fee_per_gas)
            .max_priority_fee_per_gas(fees.max_priority_fee_per_gas))
    }
}

/// Stage 4: final paymaster data. The default sponsors nothing and leaves
/// the placeholder in place; paymaster integrations replace this stage.
#[derive(Clone, Copy, Debug, Default)]
pub struct PaymasterMiddleware;

#[async_trait]
impl UserOperationMiddleware for PaymasterMiddleware {
    async fn process(
        &self,
        _ctx: &MiddlewareContext<'_>,
        draft: UserOperationDraft,
    ) -> Result<UserOperationDraft, ProviderError> {
        Ok(match draft.paymaster_and_data {
            Some(_) => draft,
            None => draft.paymaster_and_data(Bytes::default()),
        })
    }
}
