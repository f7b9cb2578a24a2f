//! Construction-time form of the user operation (gas, fee, and paymaster fields optional)

use super::UserOperation;
use crate::utils::as_checksum_addr;
use ethers::types::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};

/// User operation being assembled by the middleware pipeline.
///
/// The account-derived fields are set up front; gas, fee, and paymaster
/// fields start out unset and are filled in by the pipeline stages. The
/// signature holds the account's dummy signature until the operation is
/// signed, so serializing a draft for gas estimation is size-accurate.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserOperationDraft {
    #[serde(default, serialize_with = "as_checksum_addr")]
    pub sender: Address,
    #[serde(default)]
    pub nonce: U256,
    #[serde(default)]
    pub init_code: Bytes,
    #[serde(default)]
    pub call_data: Bytes,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_gas_limit: Option<U256>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification_gas_limit: Option<U256>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pre_verification_gas: Option<U256>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_fee_per_gas: Option<U256>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_priority_fee_per_gas: Option<U256>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paymaster_and_data: Option<Bytes>,
    #[serde(default)]
    pub signature: Bytes,
}

/// Draft reached the validation gate with unset fields
#[derive(Clone, Debug, thiserror::Error)]
#[error("user operation draft is missing fields {missing:?}")]
pub struct IncompleteUserOperation {
    /// Names of the unset fields, in wire spelling
    pub missing: Vec<&'static str>,
    /// The partial draft, for diagnostics
    pub draft: UserOperationDraft,
}

impl UserOperationDraft {
    // Builder pattern helpers

    /// Sets the sender of the draft
    pub fn sender(mut self, sender: Address) -> Self {
        self.sender = sender;
        self
    }

    /// Sets the nonce of the draft
    pub fn nonce(mut self, nonce: U256) -> Self {
        self.nonce = nonce;
        self
    }

    /// Sets the init code of the draft
    pub fn init_code(mut self, init_code: Bytes) -> Self {
        self.init_code = init_code;
        self
    }

    /// Sets the call data of the draft
    pub fn call_data(mut self, call_data: Bytes) -> Self {
        self.call_data = call_data;
        self
    }

    /// Sets the call gas limit of the draft
    pub fn call_gas_limit(mut self, call_gas_limit: U256) -> Self {
        self.call_gas_limit = Some(call_gas_limit);
        self
    }

    /// Sets the verification gas limit of the draft
    pub fn verification_gas_limit(mut self, verification_gas_limit: U256) -> Self {
        self.verification_gas_limit = Some(verification_gas_limit);
        self
    }

    /// Sets the pre-verification gas of the draft
    pub fn pre_verification_gas(mut self, pre_verification_gas: U256) -> Self {
        self.pre_verification_gas = Some(pre_verification_gas);
        self
    }

    /// Sets the max fee per gas of the draft
    pub fn max_fee_per_gas(mut self, max_fee_per_gas: U256) -> Self {
        self.max_fee_per_gas = Some(max_fee_per_gas);
        self
    }

    /// Sets the max priority fee per gas of the draft
    pub fn max_priority_fee_per_gas(mut self, max_priority_fee_per_gas: U256) -> Self {
        self.max_priority_fee_per_gas = Some(max_priority_fee_per_gas);
        self
    }

    /// Sets the paymaster and data of the draft
    pub fn paymaster_and_data(mut self, paymaster_and_data: Bytes) -> Self {
        self.paymaster_and_data = Some(paymaster_and_data);
        self
    }

    /// Sets the signature of the draft
    pub fn signature(mut self, signature: Bytes) -> Self {
        self.signature = signature;
        self
    }

    /// Wire names of the fields still unset
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.call_gas_limit.is_none() {
            missing.push("callGasLimit");
        }
        if self.verification_gas_limit.is_none() {
            missing.push("verificationGasLimit");
        }
        if self.pre_verification_gas.is_none() {
            missing.push("preVerificationGas");
        }
        if self.max_fee_per_gas.is_none() {
            missing.push("maxFeePerGas");
        }
        if self.max_priority_fee_per_gas.is_none() {
            missing.push("maxPriorityFeePerGas");
        }
        if self.paymaster_and_data.is_none() {
            missing.push("paymasterAndData");
        }
        missing
    }

    /// Whether every field of the draft is resolved
    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }

    /// Converts the draft into a [UserOperation], failing if any field is
    /// still unset. This is the single gate between the middleware pipeline
    /// and signing; a partial draft never reaches the bundler.
    pub fn build(self) -> Result<UserOperation, IncompleteUserOperation> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(IncompleteUserOperation { missing, draft: self });
        }

        Ok(UserOperation {
            sender: self.sender,
            nonce: self.nonce,
            init_code: self.init_code,
            call_data: self.call_data,
            call_gas_limit: self.call_gas_limit.unwrap_or_default(),
            verification_gas_limit: self.verification_gas_limit.unwrap_or_default(),
            pre_verification_gas: self.pre_verification_gas.unwrap_or_default(),
            max_fee_per_gas: self.max_fee_per_gas.unwrap_or_default(),
            max_priority_fee_per_gas: self.max_priority_fee_per_gas.unwrap_or_default(),
            paymaster_and_data: self.paymaster_and_data.unwrap_or_default(),
            signature: self.signature,
        })
    }
}

impl From<UserOperation> for UserOperationDraft {
    fn from(user_operation: UserOperation) -> Self {
        Self {
            sender: user_operation.sender,
            nonce: user_operation.nonce,
            init_code: user_operation.init_code,
            call_data: user_operation.call_data,
            call_gas_limit: Some(user_operation.call_gas_limit),
            verification_gas_limit: Some(user_operation.verification_gas_limit),
            pre_verification_gas: Some(user_operation.pre_verification_gas),
            max_fee_per_gas: Some(user_operation.max_fee_per_gas),
            max_priority_fee_per_gas: Some(user_operation.max_priority_fee_per_gas),
            paymaster_and_data: Some(user_operation.paymaster_and_data),
            signature: user_operation.signature,
        }
    }
}
