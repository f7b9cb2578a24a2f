//! Concrete collaborators for the Caelus provider
//!
//! The provider crate only consumes capability traits; this crate supplies
//! working implementations: an HTTP JSON-RPC bundler client and the
//! eth-infinitism simple account (entry point v0.6).

mod account;
mod bundler;

pub use account::SimpleAccount;
pub use bundler::HttpBundlerClient;
