//! Fee bidding for user operations

use crate::error::ProviderError;
use caelus_primitives::{FeeData, GasFees};
use ethers::types::U256;
use std::cmp::max;

// Premium applied to the network's suggested priority fee (a third on top)
const PRIORITY_FEE_PREMIUM_NUM: u64 = 4;
const PRIORITY_FEE_PREMIUM_DEN: u64 = 3;

/// Derives the fee bid for a user operation.
///
/// The priority fee bids a premium of a third over the network suggestion,
/// clamped up to `min_priority_fee_bid`. The fee cap keeps the base fee
/// headroom implied by `fee_data` and substitutes the bid's own priority
/// fee. All arithmetic is integer; rounding truncates toward zero.
pub fn escalate_fees(
    suggested_priority_fee: U256,
    fee_data: &FeeData,
    min_priority_fee_bid: U256,
) -> Result<GasFees, ProviderError> {
    let (max_fee, max_priority_fee) =
        match (fee_data.max_fee_per_gas, fee_data.max_priority_fee_per_gas) {
            (Some(max_fee), Some(max_priority_fee)) => (max_fee, max_priority_fee),
            _ => return Err(ProviderError::InvalidFeeData),
        };

    let priority_fee_bid = max(
        suggested_priority_fee * PRIORITY_FEE_PREMIUM_NUM / PRIORITY_FEE_PREMIUM_DEN,
        min_priority_fee_bid,
    );
    let max_fee_bid = max_fee.saturating_sub(max_priority_fee) + priority_fee_bid;

    Ok(GasFees { max_fee_per_gas: max_fee_bid, max_priority_fee_per_gas: priority_fee_bid })
}
