//! Transaction-facing types and error definitions.

use alloy::json_abi::JsonAbi;
use alloy::primitives::{Address, TxHash, B256, U256};
use serde_json::Value;
use thiserror::Error;

use crate::provider::{ProviderError, ProviderReceipt};
use crate::units::AmountError;

/// Errors that can occur while paying and confirming.
#[derive(Debug, Error)]
pub enum TransactionError {
    /// No account is available to send from, even after asking the wallet.
    #[error("No wallet account available")]
    NoAccount,

    /// A provider query failed (balance, receipt polling, call construction).
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Gas estimation failed; nothing was submitted.
    #[error("Gas estimation failed: {0}")]
    GasEstimation(#[source] ProviderError),

    /// The wallet refused or failed to submit the transaction.
    #[error("Transaction submission failed: {0}")]
    Submission(#[source] ProviderError),

    /// The amount could not be scaled to base units.
    #[error("Invalid amount: {0}")]
    Amount(#[from] AmountError),

    /// No receipt after the configured number of polls.
    #[error("Transaction not confirmed after {attempts} receipt polls")]
    ConfirmationTimeout { attempts: u32 },

    /// No receipt before the wall-clock deadline.
    #[error("Transaction not confirmed within {0} seconds")]
    ConfirmationDeadline(u64),

    /// The receipt had no interpretable status.
    #[error("Malformed receipt: {0}")]
    MalformedReceipt(String),
}

/// Result type for transaction operations.
pub type TransactionResult<T> = Result<T, TransactionError>;

/// A mined transaction with its status reduced to success / revert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionReceipt {
    pub transaction_hash: TxHash,
    pub block_hash: Option<B256>,
    pub block_number: Option<u64>,
    pub from: Option<Address>,
    pub to: Option<Address>,
    pub contract_address: Option<Address>,
    pub gas_used: Option<U256>,
    /// `false` means the transaction was mined but reverted.
    pub status: bool,
}

impl TryFrom<ProviderReceipt> for TransactionReceipt {
    type Error = TransactionError;

    fn try_from(receipt: ProviderReceipt) -> TransactionResult<Self> {
        let status = match receipt.status.as_ref() {
            Some(raw) => normalize_status(raw).ok_or_else(|| {
                TransactionError::MalformedReceipt(format!("unrecognized status {}", raw))
            })?,
            None => {
                return Err(TransactionError::MalformedReceipt(format!(
                    "receipt for {} has no status",
                    receipt.transaction_hash
                )))
            }
        };

        Ok(Self {
            transaction_hash: receipt.transaction_hash,
            block_hash: receipt.block_hash,
            block_number: receipt.block_number.map(|n| n.to::<u64>()),
            from: receipt.from,
            to: receipt.to,
            contract_address: receipt.contract_address,
            gas_used: receipt.gas_used,
            status,
        })
    }
}

/// Reduce a provider's receipt status to a boolean.
///
/// Accepts booleans, `0x`-prefixed hex strings, decimal strings and JSON
/// numbers; anything non-zero is success.
pub fn normalize_status(raw: &Value) -> Option<bool> {
    match raw {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n
            .as_u64()
            .map(|v| v != 0)
            .or_else(|| n.as_f64().map(|v| v != 0.0)),
        Value::String(s) => {
            let s = s.trim();
            let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
                Some(hex) => U256::from_str_radix(hex, 16).ok(),
                None => U256::from_str_radix(s, 10).ok(),
            };
            parsed.map(|v| !v.is_zero())
        }
        _ => None,
    }
}

/// An ERC-20 token the coordinator can pay with.
#[derive(Debug, Clone)]
pub struct TokenContract {
    pub abi: JsonAbi,
    pub address: Address,
    pub decimals: u8,
}
