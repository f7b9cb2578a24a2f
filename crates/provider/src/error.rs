//! Provider error taxonomy

use caelus_primitives::{IncompleteUserOperation, UserOperationHash};
use ethers::types::Address;

/// Errors returned by the smart account provider.
///
/// Only receipt lookups inside the confirmation poller are retried; every
/// other failure is fatal to the call that produced it.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// Operation requires a bound account and none is connected
    #[error("no smart account connected to the provider")]
    AccountNotConnected,

    /// The middleware pipeline left fields unset
    #[error(transparent)]
    IncompleteUserOperation(#[from] IncompleteUserOperation),

    /// The network did not report both EIP-1559 fee values
    #[error("fee data is missing maxFeePerGas or maxPriorityFeePerGas")]
    InvalidFeeData,

    /// Transaction request without a recipient cannot be routed through the account
    #[error("transaction request is missing the to address")]
    InvalidRecipient,

    /// Message signing was requested for an address other than the bound account
    #[error("signer {requested:?} does not match the connected account {connected:?}")]
    SignerMismatch { requested: Address, connected: Address },

    /// The confirmation poller exhausted its retry budget
    #[error("user operation {hash} not confirmed after {attempts} receipt lookups")]
    ConfirmationTimeout { hash: UserOperationHash, attempts: usize },

    /// Failure reported by the account, the bundler client, or the transport
    #[error(transparent)]
    Other(#[from] eyre::Report),
}
