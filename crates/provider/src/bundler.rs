//! Bundler client capability consumed by the provider

use async_trait::async_trait;
use caelus_primitives::{
    FeeData, UserOperation, UserOperationDraft, UserOperationGasEstimation, UserOperationHash,
    UserOperationReceipt,
};
use ethers::types::{Address, Transaction, H256, U256};
use serde_json::Value;

/// JSON-RPC surface of the bundler (and its backing node) used by the
/// provider. One logical endpoint serves both namespaces; bundlers proxy the
/// node methods they do not implement themselves.
#[async_trait]
pub trait BundlerClient: Send + Sync {
    /// eth_estimateUserOperationGas against the given entry point
    async fn estimate_user_operation_gas(
        &self,
        user_operation: &UserOperationDraft,
        entry_point: Address,
    ) -> eyre::Result<UserOperationGasEstimation>;

    /// eth_maxPriorityFeePerGas
    async fn max_priority_fee_per_gas(&self) -> eyre::Result<U256>;

    /// Combined EIP-1559 fee values of the network
    async fn fee_data(&self) -> eyre::Result<FeeData>;

    /// eth_sendUserOperation
    async fn send_user_operation(
        &self,
        user_operation: &UserOperation,
        entry_point: Address,
    ) -> eyre::Result<UserOperationHash>;

    /// eth_getUserOperationReceipt; `None` until the operation is included
    async fn user_operation_receipt(
        &self,
        hash: &UserOperationHash,
    ) -> eyre::Result<Option<UserOperationReceipt>>;

    /// eth_getTransactionByHash on the underlying node
    async fn transaction_by_hash(&self, hash: H256) -> eyre::Result<Option<Transaction>>;

    /// eth_supportedEntryPoints
    async fn supported_entry_points(&self) -> eyre::Result<Vec<Address>>;

    /// eth_getBalance (latest block)
    async fn balance(&self, address: Address) -> eyre::Result<U256>;

    /// Raw passthrough for methods the provider does not interpret
    async fn request(&self, method: &str, params: Vec<Value>) -> eyre::Result<Value>;
}
