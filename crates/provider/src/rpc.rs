//! RPC-compatibility surface of the provider
//!
//! Wallet-facing callers speak `{method, params}`; the provider interprets
//! the few methods that involve the bound account and forwards everything
//! else to the bundler untouched. The known methods are modeled as explicit
//! variants rather than string dispatch.

use ethers::types::{Address, Bytes, TransactionRequest};
use eyre::eyre;
use serde_json::Value;

/// A request accepted by [`SmartAccountProvider::request`](crate::SmartAccountProvider::request)
#[derive(Clone, Debug)]
pub enum ProviderRpcRequest {
    /// `eth_sendTransaction`, routed through the user operation pipeline
    SendTransaction(TransactionRequest),

    /// `eth_sign` / `personal_sign` for the bound account
    SignMessage { address: Address, message: Bytes },

    /// Any other method, forwarded to the bundler verbatim
    Passthrough { method: String, params: Vec<Value> },
}

impl ProviderRpcRequest {
    /// Parses the wire shape of a request.
    ///
    /// `eth_sign` takes `[address, message]`, `personal_sign` takes
    /// `[message, address]`; both map to [`ProviderRpcRequest::SignMessage`].
    pub fn from_parts(method: &str, params: Vec<Value>) -> eyre::Result<Self> {
        match method {
            "eth_sendTransaction" => {
                let tx = params
                    .into_iter()
                    .next()
                    .ok_or_else(|| eyre!("eth_sendTransaction expects a transaction object"))?;
                Ok(Self::SendTransaction(serde_json::from_value(tx)?))
            }
            "eth_sign" => {
                let (address, message) = sign_params(&params, 0, 1)?;
                Ok(Self::SignMessage { address, message })
            }
            "personal_sign" => {
                let (address, message) = sign_params(&params, 1, 0)?;
                Ok(Self::SignMessage { address, message })
            }
            _ => Ok(Self::Passthrough { method: method.to_owned(), params }),
        }
    }
}

fn sign_params(params: &[Value], addr_idx: usize, msg_idx: usize) -> eyre::Result<(Address, Bytes)> {
    let address = params
        .get(addr_idx)
        .cloned()
        .ok_or_else(|| eyre!("signing request is missing the address parameter"))?;
    let message = params
        .get(msg_idx)
        .cloned()
        .ok_or_else(|| eyre!("signing request is missing the message parameter"))?;
    Ok((serde_json::from_value(address)?, serde_json::from_value(message)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const ADDR: &str = "0x9c5754de1443984659e1b3a8d1931d83475ba29c";

    #[test]
    fn parses_send_transaction() {
        let req = ProviderRpcRequest::from_parts(
            "eth_sendTransaction",
            vec![json!({ "to": ADDR, "value": "0x1", "data": "0xdeadbeef" })],
        )
        .unwrap();

        match req {
            ProviderRpcRequest::SendTransaction(tx) => {
                assert_eq!(tx.to, Some(ADDR.parse::<Address>().unwrap().into()));
                assert_eq!(tx.value, Some(1.into()));
            }
            other => panic!("unexpected request: {other:?}"),
        }
    }

    #[test]
    fn sign_variants_agree_on_parameter_order() {
        let eth_sign =
            ProviderRpcRequest::from_parts("eth_sign", vec![json!(ADDR), json!("0x01ff")]).unwrap();
        let personal =
            ProviderRpcRequest::from_parts("personal_sign", vec![json!("0x01ff"), json!(ADDR)])
                .unwrap();

        for req in [eth_sign, personal] {
            match req {
                ProviderRpcRequest::SignMessage { address, message } => {
                    assert_eq!(address, ADDR.parse().unwrap());
                    assert_eq!(message, "0x01ff".parse::<Bytes>().unwrap());
                }
                other => panic!("unexpected request: {other:?}"),
            }
        }
    }

    #[test]
    fn unknown_methods_pass_through() {
        let req = ProviderRpcRequest::from_parts("eth_chainId", vec![]).unwrap();
        assert!(matches!(req, ProviderRpcRequest::Passthrough { ref method, .. } if method == "eth_chainId"));
    }

    #[test]
    fn send_transaction_requires_a_payload() {
        assert!(ProviderRpcRequest::from_parts("eth_sendTransaction", vec![]).is_err());
    }
}
