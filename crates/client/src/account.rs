//! eth-infinitism simple account (entry point v0.6)

use alloy_primitives::{Address as SolAddress, U256 as SolU256};
use alloy_sol_types::{sol, SolCall};
use async_trait::async_trait;
use caelus_primitives::constants::simple_account::DUMMY_SIGNATURE;
use caelus_provider::SmartAccount;
use ethers::{
    providers::Middleware,
    signers::{LocalWallet, Signer},
    types::{Address, Bytes, TransactionRequest, U256},
};
use std::sync::Arc;

sol! {
    function execute(address dest, uint256 value, bytes calldata func);
    function createAccount(address owner, uint256 salt);
    function getNonce(address sender, uint192 key) returns (uint256 nonce);
}

/// The reference simple account: a single-owner contract account deployed
/// counterfactually through the canonical factory.
#[derive(Clone, Debug)]
pub struct SimpleAccount<M> {
    client: Arc<M>,
    owner: LocalWallet,
    address: Address,
    factory: Address,
    salt: u64,
    entry_point: Address,
}

impl<M> SimpleAccount<M>
where
    M: Middleware + 'static,
{
    /// Creates a simple account bound to `address`.
    ///
    /// `address` is the counterfactual address the factory derives for
    /// `(owner, salt)`; the account does not need to be deployed yet.
    pub fn new(
        client: Arc<M>,
        owner: LocalWallet,
        address: Address,
        factory: Address,
        salt: u64,
        entry_point: Address,
    ) -> Self {
        Self { client, owner, address, factory, salt, entry_point }
    }

    /// Address of the owner key
    pub fn owner_address(&self) -> Address {
        self.owner.address()
    }
}

#[async_trait]
impl<M> SmartAccount for SimpleAccount<M>
where
    M: Middleware + 'static,
{
    fn address(&self) -> Address {
        self.address
    }

    async fn nonce(&self) -> eyre::Result<U256> {
        let call = getNonceCall { sender: SolAddress::from(self.address.0), key: SolU256::ZERO };
        let tx = TransactionRequest::new().to(self.entry_point).data(call.abi_encode());
        let out = self.client.call(&tx.into(), None).await?;
        let ret = getNonceCall::abi_decode_returns(&out, true)?;
        Ok(U256::from_big_endian(&ret.nonce.to_be_bytes::<32>()))
    }

    async fn init_code(&self) -> eyre::Result<Bytes> {
        let code = self.client.get_code(self.address, None).await?;
        if !code.is_empty() {
            return Ok(Bytes::default());
        }

        let call = createAccountCall {
            owner: SolAddress::from(self.owner.address().0),
            salt: SolU256::from(self.salt),
        };
        Ok([self.factory.as_bytes(), call.abi_encode().as_slice()].concat().into())
    }

    fn encode_execute(&self, target: Address, value: U256, data: Bytes) -> eyre::Result<Bytes> {
        let call = executeCall {
            dest: SolAddress::from(target.0),
            value: SolU256::from_limbs(value.0),
            func: data.to_vec(),
        };
        Ok(call.abi_encode().into())
    }

    fn dummy_signature(&self) -> Bytes {
        DUMMY_SIGNATURE.parse().expect("static dummy signature is valid hex")
    }

    async fn sign_message(&self, message: &[u8]) -> eyre::Result<Bytes> {
        let signature = self.owner.sign_message(message).await?;
        Ok(signature.to_vec().into())
    }
}
