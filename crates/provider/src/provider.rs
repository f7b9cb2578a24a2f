//! Smart account provider

use crate::{
    account::SmartAccount,
    bundler::BundlerClient,
    error::ProviderError,
    middleware::{MiddlewareContext, MiddlewareStack, UserOperationMiddleware},
    poller::{self, ConfirmationPolicy},
    rpc::ProviderRpcRequest,
};
use alloy_chains::Chain;
use caelus_primitives::{
    constants::provider::DEFAULT_MIN_PRIORITY_FEE_BID, SentUserOperation, UserOperationDraft,
    UserOperationHash,
};
use ethers::types::{Address, Bytes, NameOrAddress, TransactionRequest, H256, U256};
use eyre::eyre;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, trace};

/// Client-side orchestrator for ERC-4337 submissions.
///
/// One provider serves one entry point on one chain. The bundler client and
/// the optionally bound account are shared references; the middleware stack
/// and the retry/fee configuration are owned. All configuration goes through
/// consuming `with_*` builders; a provider in use is immutable, and each
/// submission owns its draft.
pub struct SmartAccountProvider<B> {
    bundler: Arc<B>,
    entry_point: Address,
    chain: Chain,
    account: Option<Arc<dyn SmartAccount>>,
    stack: MiddlewareStack,
    confirmation: ConfirmationPolicy,
    min_priority_fee_bid: U256,
}

impl<B> SmartAccountProvider<B>
where
    B: BundlerClient,
{
    /// Creates a provider with the default middleware stack and no bound
    /// account. Read-only calls work immediately; anything that signs
    /// requires [`with_account`](Self::with_account) first.
    pub fn new(bundler: Arc<B>, entry_point: Address, chain: Chain) -> Self {
        Self {
            bundler,
            entry_point,
            chain,
            account: None,
            stack: MiddlewareStack::default(),
            confirmation: ConfirmationPolicy::default(),
            min_priority_fee_bid: U256::from(DEFAULT_MIN_PRIORITY_FEE_BID),
        }
    }

    // Builder pattern helpers

    /// Binds the smart account used for assembly and signing
    pub fn with_account(mut self, account: Arc<dyn SmartAccount>) -> Self {
        self.account = Some(account);
        self
    }

    /// Overrides the confirmation retry budget
    pub fn with_confirmation_policy(mut self, confirmation: ConfirmationPolicy) -> Self {
        self.confirmation = confirmation;
        self
    }

    /// Overrides the lower bound for the priority fee bid
    pub fn with_min_priority_fee_bid(mut self, min_priority_fee_bid: U256) -> Self {
        self.min_priority_fee_bid = min_priority_fee_bid;
        self
    }

    /// Rebinds the paymaster placeholder stage
    pub fn with_dummy_paymaster_middleware(
        mut self,
        middleware: Arc<dyn UserOperationMiddleware>,
    ) -> Self {
        self.stack.dummy_paymaster = middleware;
        self
    }

    /// Rebinds the gas estimation stage
    pub fn with_gas_estimator_middleware(
        mut self,
        middleware: Arc<dyn UserOperationMiddleware>,
    ) -> Self {
        self.stack.gas_estimator = middleware;
        self
    }

    /// Rebinds the fee estimation stage
    pub fn with_fee_estimator_middleware(
        mut self,
        middleware: Arc<dyn UserOperationMiddleware>,
    ) -> Self {
        self.stack.fee_estimator = middleware;
        self
    }

    /// Rebinds the paymaster data stage
    pub fn with_paymaster_middleware(
        mut self,
        middleware: Arc<dyn UserOperationMiddleware>,
    ) -> Self {
        self.stack.paymaster = middleware;
        self
    }

    /// Entry point this provider submits to
    pub fn entry_point(&self) -> Address {
        self.entry_point
    }

    /// Chain this provider is bound to
    pub fn chain(&self) -> Chain {
        self.chain
    }

    /// Bundler client handle
    pub fn bundler(&self) -> &Arc<B> {
        &self.bundler
    }

    fn account(&self) -> Result<&Arc<dyn SmartAccount>, ProviderError> {
        self.account.as_ref().ok_or(ProviderError::AccountNotConnected)
    }

    fn context(&self) -> MiddlewareContext<'_> {
        MiddlewareContext {
            bundler: self.bundler.as_ref(),
            entry_point: self.entry_point,
            min_priority_fee_bid: self.min_priority_fee_bid,
        }
    }

    /// Assembles the initial draft from the bound account's state and runs
    /// the middleware pipeline over it
    pub async fn build_user_operation(
        &self,
        target: Address,
        data: Bytes,
        value: U256,
    ) -> Result<UserOperationDraft, ProviderError> {
        let account = self.account()?;

        let init_code = account.init_code().await?;
        let nonce = account.nonce().await?;
        let call_data = account.encode_execute(target, value, data)?;

        let draft = UserOperationDraft::default()
            .sender(account.address())
            .nonce(nonce)
            .init_code(init_code)
            .call_data(call_data)
            .signature(account.dummy_signature());

        self.stack.run(&self.context(), draft).await
    }

    /// Builds, validates, signs, and submits a user operation.
    ///
    /// The completeness gate between the pipeline and signing is the only
    /// place a partial operation can fail; nothing is sent before it passes.
    pub async fn send_user_operation(
        &self,
        target: Address,
        data: Bytes,
        value: U256,
    ) -> Result<SentUserOperation, ProviderError> {
        let account = self.account()?;

        let draft = self.build_user_operation(target, data, value).await?;
        let uo = draft.build()?;

        let uo_hash = uo.hash(&self.entry_point, self.chain.id());
        trace!("Signing user operation {uo_hash} for sender {:?}", uo.sender);
        let signature = account.sign_message(uo_hash.as_bytes()).await?;
        let uo = uo.signature(signature);

        let hash = self.bundler.send_user_operation(&uo, self.entry_point).await?;
        debug!("User operation accepted by the bundler under {hash}");

        Ok(SentUserOperation::new(hash, uo))
    }

    /// Resolves a submitted operation into the hash of the chain transaction
    /// that included it, polling within the configured retry budget
    pub async fn wait_for_user_operation_transaction(
        &self,
        hash: &UserOperationHash,
    ) -> Result<H256, ProviderError> {
        let receipt =
            poller::wait_for_receipt(self.bundler.as_ref(), hash, &self.confirmation).await?;

        let tx_hash = receipt.tx_receipt.transaction_hash;
        let tx = self
            .bundler
            .transaction_by_hash(tx_hash)
            .await?
            .ok_or_else(|| eyre!("transaction {tx_hash:?} from the receipt not found"))?;

        Ok(tx.hash)
    }

    /// Classic transaction entry point: converts a conventional transaction
    /// request into a user operation, submits it, and waits for inclusion
    pub async fn send_transaction(&self, tx: TransactionRequest) -> Result<H256, ProviderError> {
        let target = match tx.to {
            Some(NameOrAddress::Address(address)) => address,
            Some(NameOrAddress::Name(name)) => {
                return Err(eyre!("ENS recipient {name} is not supported").into())
            }
            None => return Err(ProviderError::InvalidRecipient),
        };
        let data = tx.data.unwrap_or_default();
        let value = tx.value.unwrap_or_default();

        let sent = self.send_user_operation(target, data, value).await?;
        self.wait_for_user_operation_transaction(&sent.hash).await
    }

    /// Narrow RPC-compatibility surface: the account-bound methods are
    /// handled here, everything else goes to the bundler verbatim
    pub async fn request(&self, request: ProviderRpcRequest) -> Result<Value, ProviderError> {
        match request {
            ProviderRpcRequest::SendTransaction(tx) => {
                let hash = self.send_transaction(tx).await?;
                Ok(json!(hash))
            }
            ProviderRpcRequest::SignMessage { address, message } => {
                let account = self.account()?;
                if address != account.address() {
                    return Err(ProviderError::SignerMismatch {
                        requested: address,
                        connected: account.address(),
                    });
                }
                let signature = account.sign_message(&message).await?;
                Ok(json!(signature))
            }
            ProviderRpcRequest::Passthrough { method, params } => {
                Ok(self.bundler.request(&method, params).await?)
            }
        }
    }

    /// Balance of an address, via the bundler's backing node
    pub async fn balance(&self, address: Address) -> Result<U256, ProviderError> {
        Ok(self.bundler.balance(address).await?)
    }

    /// Entry points the bundler accepts operations for
    pub async fn supported_entry_points(&self) -> Result<Vec<Address>, ProviderError> {
        Ok(self.bundler.supported_entry_points().await?)
    }
}
