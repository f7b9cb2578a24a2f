//! Account abstraction (ERC-4337) primitive types
//!
//! This crate contains the primitive types used by the Caelus client SDK: user
//! operations and their construction-time drafts, the protocol hash, bundler
//! receipt and gas estimation types, and fee data.

pub mod constants;
mod fee;
mod user_operation;
mod utils;

pub use fee::{FeeData, GasFees};
pub use user_operation::{
    IncompleteUserOperation, SentUserOperation, UserOperation, UserOperationDraft,
    UserOperationGasEstimation, UserOperationHash, UserOperationReceipt,
};
pub use utils::get_address;
