//! Smart account capability consumed by the provider

use async_trait::async_trait;
use ethers::types::{Address, Bytes, U256};

/// An ERC-4337 smart account, as seen by the provider.
///
/// Implementations produce the account-derived parts of a user operation:
/// deployment init code, nonce, encoded execution call data, and signatures.
/// The provider holds the account behind a trait object so any account
/// implementation can be connected.
#[async_trait]
pub trait SmartAccount: Send + Sync {
    /// Address of the account (counterfactual until the account is deployed)
    fn address(&self) -> Address;

    /// Current nonce of the account at the entry point
    async fn nonce(&self) -> eyre::Result<U256>;

    /// Factory call that deploys the account; empty once deployed
    async fn init_code(&self) -> eyre::Result<Bytes>;

    /// Encodes an execution of `data` against `target` with `value` attached
    fn encode_execute(&self, target: Address, value: U256, data: Bytes) -> eyre::Result<Bytes>;

    /// Placeholder signature with the byte length of a real one, so gas
    /// estimation against an unsigned operation is size-accurate
    fn dummy_signature(&self) -> Bytes;

    /// Signs the message with the account owner's key
    async fn sign_message(&self, message: &[u8]) -> eyre::Result<Bytes>;
}
