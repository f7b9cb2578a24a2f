//! HTTP JSON-RPC bundler client

use async_trait::async_trait;
use caelus_primitives::{
    FeeData, UserOperation, UserOperationDraft, UserOperationGasEstimation, UserOperationHash,
    UserOperationReceipt,
};
use caelus_provider::BundlerClient;
use ethers::{
    providers::{Http, Middleware, Provider},
    types::{Address, Transaction, H256, U256},
};
use serde_json::Value;
use std::{sync::Arc, time::Duration};
use tracing::trace;

/// Bundler client over a single HTTP JSON-RPC endpoint.
///
/// The same endpoint serves the ERC-4337 namespace and the regular node
/// methods; bundlers proxy whichever they do not implement themselves.
#[derive(Clone, Debug)]
pub struct HttpBundlerClient {
    provider: Arc<Provider<Http>>,
}

impl HttpBundlerClient {
    /// Connects to the bundler at `url`
    pub fn connect(url: &str) -> eyre::Result<Self> {
        let provider = Provider::<Http>::try_from(url)?.interval(Duration::from_millis(500));
        Ok(Self { provider: Arc::new(provider) })
    }

    /// Wraps an already configured ethers provider
    pub fn new(provider: Arc<Provider<Http>>) -> Self {
        Self { provider }
    }

    /// The underlying ethers provider
    pub fn provider(&self) -> &Arc<Provider<Http>> {
        &self.provider
    }
}

#[async_trait]
impl BundlerClient for HttpBundlerClient {
    async fn estimate_user_operation_gas(
        &self,
        user_operation: &UserOperationDraft,
        entry_point: Address,
    ) -> eyre::Result<UserOperationGasEstimation> {
        trace!("Estimating gas for user operation from {:?}", user_operation.sender);
        Ok(self
            .provider
            .request("eth_estimateUserOperationGas", (user_operation, entry_point))
            .await?)
    }

    async fn max_priority_fee_per_gas(&self) -> eyre::Result<U256> {
        Ok(self.provider.request("eth_maxPriorityFeePerGas", ()).await?)
    }

    async fn fee_data(&self) -> eyre::Result<FeeData> {
        let (max_fee_per_gas, max_priority_fee_per_gas) =
            self.provider.estimate_eip1559_fees(None).await?;
        Ok(FeeData::new(max_fee_per_gas, max_priority_fee_per_gas))
    }

    async fn send_user_operation(
        &self,
        user_operation: &UserOperation,
        entry_point: Address,
    ) -> eyre::Result<UserOperationHash> {
        trace!("Sending user operation {user_operation:?} to {entry_point:?}");
        Ok(self.provider.request("eth_sendUserOperation", (user_operation, entry_point)).await?)
    }

    async fn user_operation_receipt(
        &self,
        hash: &UserOperationHash,
    ) -> eyre::Result<Option<UserOperationReceipt>> {
        Ok(self.provider.request("eth_getUserOperationReceipt", (hash,)).await?)
    }

    async fn transaction_by_hash(&self, hash: H256) -> eyre::Result<Option<Transaction>> {
        Ok(self.provider.get_transaction(hash).await?)
    }

    async fn supported_entry_points(&self) -> eyre::Result<Vec<Address>> {
        Ok(self.provider.request("eth_supportedEntryPoints", ()).await?)
    }

    async fn balance(&self, address: Address) -> eyre::Result<U256> {
        Ok(self.provider.get_balance(address, None).await?)
    }

    async fn request(&self, method: &str, params: Vec<Value>) -> eyre::Result<Value> {
        trace!("Forwarding {method} to the bundler");
        Ok(self.provider.request(method, params).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connects_to_a_well_formed_url() {
        assert!(HttpBundlerClient::connect("http://127.0.0.1:3000").is_ok());
        assert!(HttpBundlerClient::connect("not a url").is_err());
    }
}
