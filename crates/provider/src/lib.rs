//! ERC-4337 smart account provider
//!
//! This crate orchestrates the client side of account abstraction: it
//! assembles a user operation from a smart account's state, runs it through
//! an overridable middleware pipeline (paymaster placeholder, gas limits,
//! fee bid, paymaster data), validates and signs the result, submits it to a
//! bundler, and polls the bundler until the operation is included in a chain
//! transaction.

mod account;
mod bundler;
mod error;
mod fee;
mod middleware;
mod poller;
mod provider;
mod rpc;

pub use account::SmartAccount;
pub use bundler::BundlerClient;
pub use error::ProviderError;
pub use fee::escalate_fees;
pub use middleware::{
    DummyPaymasterMiddleware, FeeEstimatorMiddleware, GasEstimatorMiddleware, MiddlewareContext,
    MiddlewareStack, PaymasterMiddleware, UserOperationMiddleware,
};
pub use poller::ConfirmationPolicy;
pub use provider::SmartAccountProvider;
pub use rpc::ProviderRpcRequest;

#[cfg(test)]
pub(crate) mod test_utils;
