//! Fee data returned by the network and the fee bid derived from it

use ethers::types::U256;
use serde::{Deserialize, Serialize};

/// EIP-1559 fee values as reported by the node or bundler.
///
/// Both fields are optional: pre-London chains and misconfigured endpoints
/// report neither, and the fee estimation stage rejects such responses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeData {
    pub max_fee_per_gas: Option<U256>,
    pub max_priority_fee_per_gas: Option<U256>,
}

impl FeeData {
    pub fn new(max_fee_per_gas: U256, max_priority_fee_per_gas: U256) -> Self {
        Self {
            max_fee_per_gas: Some(max_fee_per_gas),
            max_priority_fee_per_gas: Some(max_priority_fee_per_gas),
        }
    }
}

/// A concrete fee bid for a user operation
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GasFees {
    pub max_fee_per_gas: U256,
    pub max_priority_fee_per_gas: U256,
}
