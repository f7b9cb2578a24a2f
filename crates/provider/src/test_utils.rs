//! Hand-rolled collaborator stubs for provider tests

use crate::{account::SmartAccount, bundler::BundlerClient};
use async_trait::async_trait;
use caelus_primitives::{
    constants, FeeData, UserOperation, UserOperationDraft, UserOperationGasEstimation,
    UserOperationHash, UserOperationReceipt,
};
use ethers::types::{Address, Bytes, Transaction, TransactionReceipt, H256, U256};
use serde_json::{json, Value};
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Mutex,
};

pub(crate) const CHAIN_ID: u64 = 11_155_111;

/// Scriptable bundler stub. Counts every call so tests can assert that a
/// failing path never reached the network.
pub(crate) struct MockBundler {
    pub estimation: UserOperationGasEstimation,
    pub suggested_priority_fee: U256,
    pub fee_data: FeeData,
    /// Receipt lookups that error before anything is returned
    pub receipt_errors: usize,
    /// Receipt lookups that return not-found after the errors
    pub receipt_not_found: usize,
    /// Whether a receipt ever appears once the above are exhausted
    pub has_receipt: bool,
    pub tx_hash: H256,
    pub calls: AtomicUsize,
    pub receipt_lookups: AtomicUsize,
    pub estimated_drafts: Mutex<Vec<UserOperationDraft>>,
    pub sent: Mutex<Vec<UserOperation>>,
}

impl Default for MockBundler {
    fn default() -> Self {
        Self {
            estimation: UserOperationGasEstimation {
                pre_verification_gas: 44_056.into(),
                verification_gas_limit: 60_624.into(),
                call_gas_limit: 33_100.into(),
            },
            suggested_priority_fee: U256::from(1_000_000_000_u64),
            fee_data: FeeData::new(
                U256::from(5_000_000_000_u64),
                U256::from(2_000_000_000_u64),
            ),
            receipt_errors: 0,
            receipt_not_found: 0,
            has_receipt: true,
            tx_hash: H256::repeat_byte(0x42),
            calls: AtomicUsize::new(0),
            receipt_lookups: AtomicUsize::new(0),
            estimated_drafts: Mutex::new(Vec::new()),
            sent: Mutex::new(Vec::new()),
        }
    }
}

impl MockBundler {
    pub fn total_calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn lookups(&self) -> usize {
        self.receipt_lookups.load(Ordering::SeqCst)
    }

    fn receipt(&self, hash: &UserOperationHash) -> UserOperationReceipt {
        UserOperationReceipt {
            user_operation_hash: *hash,
            sender: Address::zero(),
            nonce: U256::zero(),
            paymaster: None,
            actual_gas_cost: 1.into(),
            actual_gas_used: 1.into(),
            success: true,
            reason: String::new(),
            logs: vec![],
            tx_receipt: TransactionReceipt {
                transaction_hash: self.tx_hash,
                ..Default::default()
            },
        }
    }
}

#[async_trait]
impl BundlerClient for MockBundler {
    async fn estimate_user_operation_gas(
        &self,
        user_operation: &UserOperationDraft,
        _entry_point: Address,
    ) -> eyre::Result<UserOperationGasEstimation> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.estimated_drafts.lock().unwrap().push(user_operation.clone());
        Ok(self.estimation.clone())
    }

    async fn max_priority_fee_per_gas(&self) -> eyre::Result<U256> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.suggested_priority_fee)
    }

    async fn fee_data(&self) -> eyre::Result<FeeData> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.fee_data)
    }

    async fn send_user_operation(
        &self,
        user_operation: &UserOperation,
        entry_point: Address,
    ) -> eyre::Result<UserOperationHash> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.sent.lock().unwrap().push(user_operation.clone());
        Ok(user_operation.hash(&entry_point, CHAIN_ID))
    }

    async fn user_operation_receipt(
        &self,
        hash: &UserOperationHash,
    ) -> eyre::Result<Option<UserOperationReceipt>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let lookups = self.receipt_lookups.fetch_add(1, Ordering::SeqCst) + 1;
        if lookups <= self.receipt_errors {
            eyre::bail!("bundler unavailable");
        }
        if lookups <= self.receipt_errors + self.receipt_not_found || !self.has_receipt {
            return Ok(None);
        }
        Ok(Some(self.receipt(hash)))
    }

    async fn transaction_by_hash(&self, hash: H256) -> eyre::Result<Option<Transaction>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Some(Transaction { hash, ..Default::default() }))
    }

    async fn supported_entry_points(&self) -> eyre::Result<Vec<Address>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![constants::entry_point::ADDRESS.parse()?])
    }

    async fn balance(&self, _address: Address) -> eyre::Result<U256> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(U256::zero())
    }

    async fn request(&self, method: &str, params: Vec<Value>) -> eyre::Result<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(json!({ "method": method, "params": params }))
    }
}

/// Deterministic smart account stub. Signatures echo the signed message so
/// tests can assert exactly what was signed.
pub(crate) struct MockAccount {
    pub address: Address,
    pub deployed: bool,
}

impl Default for MockAccount {
    fn default() -> Self {
        Self {
            address: "0x9c5754De1443984659E1b3a8d1931D83475ba29C".parse().unwrap(),
            deployed: true,
        }
    }
}

#[async_trait]
impl SmartAccount for MockAccount {
    fn address(&self) -> Address {
        self.address
    }

    async fn nonce(&self) -> eyre::Result<U256> {
        Ok(U256::from(7))
    }

    async fn init_code(&self) -> eyre::Result<Bytes> {
        if self.deployed {
            Ok(Bytes::default())
        } else {
            let factory: Address = constants::simple_account::FACTORY_ADDRESS.parse()?;
            Ok(factory.as_bytes().to_vec().into())
        }
    }

    fn encode_execute(&self, target: Address, value: U256, data: Bytes) -> eyre::Result<Bytes> {
        let mut out = target.as_bytes().to_vec();
        let mut buf = [0u8; 32];
        value.to_big_endian(&mut buf);
        out.extend_from_slice(&buf);
        out.extend_from_slice(&data);
        Ok(out.into())
    }

    fn dummy_signature(&self) -> Bytes {
        constants::simple_account::DUMMY_SIGNATURE.parse().unwrap()
    }

    async fn sign_message(&self, message: &[u8]) -> eyre::Result<Bytes> {
        Ok(message.to_vec().into())
    }
}
