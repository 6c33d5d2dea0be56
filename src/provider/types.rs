//! Provider-facing types and error definitions.

use alloy::primitives::{Address, Bytes, TxHash, B256, U256, U64};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Feature flags advertised by an injected wallet provider.
///
/// Browser wallets expose `isMetaMask` / `isTrust` on the provider object;
/// other implementations leave both unset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderFlags {
    pub is_metamask: bool,
    pub is_trust: bool,
}

/// Errors that can occur while talking to the wallet provider.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    /// No provider was injected; callers must check presence first.
    #[error("No wallet provider available")]
    NotPresent,

    /// The user declined the request in the wallet UI.
    #[error("Request rejected by user: {0}")]
    Rejected(String),

    /// RPC connection or request failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// RPC request timed out.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    /// The provider answered with something we could not interpret.
    #[error("Decode error: {0}")]
    Decode(String),

    /// A contract call could not be constructed from the given ABI.
    #[error("ABI error: {0}")]
    Abi(String),
}

/// Result type for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Transaction receipt as returned by the provider.
///
/// `status` is kept as raw JSON because providers disagree on its encoding:
/// booleans, `"0x1"` hex strings and plain numbers all occur in the wild.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderReceipt {
    pub transaction_hash: TxHash,
    pub block_hash: Option<B256>,
    pub block_number: Option<U64>,
    pub from: Option<Address>,
    pub to: Option<Address>,
    pub contract_address: Option<Address>,
    pub gas_used: Option<U256>,
    pub status: Option<serde_json::Value>,
}

impl ProviderReceipt {
    /// Minimal receipt carrying only a hash and a raw status.
    pub fn new(transaction_hash: TxHash, status: serde_json::Value) -> Self {
        Self {
            transaction_hash,
            block_hash: None,
            block_number: None,
            from: None,
            to: None,
            contract_address: None,
            gas_used: None,
            status: Some(status),
        }
    }
}

/// Parameters of a native-currency transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueTransfer {
    pub from: Address,
    pub to: Address,
    /// Amount in wei.
    pub value: U256,
    /// Gas price in wei.
    pub gas_price: u128,
}

/// An ABI-encoded contract call ready to be estimated or sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractCall {
    pub to: Address,
    pub method: String,
    pub input: Bytes,
}

/// Sender-side parameters of a contract call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallParams {
    pub from: Address,
    pub gas: u64,
    pub gas_price: u128,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_receipt_decodes_rpc_shape() {
        let json = serde_json::json!({
            "transactionHash": "0x88df016429689c079f3b2f6ad39fa052532c56795b733da78a91ebe6a713944b",
            "blockHash": "0x1d59ff54b1eb26b013ce3cb5fc9dab3705b415a67127a003c3e61eb445bb8df2",
            "blockNumber": "0x5daf3b",
            "from": "0xa7d9ddbe1f17865597fbd27ec712455208b6b76d",
            "to": "0xf02c1c8e6114b1dbe8937a39260b5b0a374432bb",
            "contractAddress": null,
            "gasUsed": "0x5208",
            "status": "0x1"
        });
        let receipt: ProviderReceipt = serde_json::from_value(json).unwrap();
        assert_eq!(receipt.block_number, Some(U64::from(0x5daf3b)));
        assert_eq!(receipt.gas_used, Some(U256::from(21_000)));
        assert_eq!(receipt.contract_address, None);
        assert_eq!(receipt.status, Some(serde_json::json!("0x1")));
    }

    #[test]
    fn test_receipt_without_status() {
        let json = serde_json::json!({
            "transactionHash": "0x88df016429689c079f3b2f6ad39fa052532c56795b733da78a91ebe6a713944b"
        });
        let receipt: ProviderReceipt = serde_json::from_value(json).unwrap();
        assert!(receipt.status.is_none());
        assert!(receipt.block_number.is_none());
    }

    #[test]
    fn test_error_display() {
        let err = ProviderError::Timeout(10);
        assert_eq!(err.to_string(), "RPC timeout after 10 seconds");
        assert!(ProviderError::Rejected("denied".into())
            .to_string()
            .contains("rejected by user"));
    }
}
