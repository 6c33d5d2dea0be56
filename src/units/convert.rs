//! Exact decimal scaling between human-readable amounts and base units.
//!
//! # Design Decisions
//! - Amounts are parsed as decimal strings, never as floats
//! - Scaling uses `U256`, so any on-chain amount is representable
//! - More fractional digits than the token supports is an error, not a rounding

use alloy::primitives::U256;
use thiserror::Error;

/// Decimals of the native currency (wei per ether = 10^18).
pub const NATIVE_DECIMALS: u8 = 18;

/// Errors produced while scaling an amount.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    /// The amount string was empty or contained no digits.
    #[error("amount is empty")]
    Empty,

    /// The amount contained something other than digits and one decimal point.
    #[error("invalid amount '{0}'")]
    Invalid(String),

    /// Negative amounts cannot be transferred.
    #[error("negative amount '{0}'")]
    Negative(String),

    /// The fractional part is finer than the token's smallest unit.
    #[error("amount '{amount}' has more than {decimals} decimal places")]
    TooPrecise { amount: String, decimals: u8 },

    /// The scaled amount does not fit into 256 bits.
    #[error("amount '{0}' overflows 256 bits")]
    Overflow(String),
}

/// Result type for amount conversions.
pub type AmountResult<T> = Result<T, AmountError>;

/// Scale `amount` by `10^decimals` and return the integer as a decimal string.
///
/// ```
/// use wallet_bridge::units::to_base_units;
///
/// assert_eq!(to_base_units("1", 18).unwrap(), "1000000000000000000");
/// assert_eq!(to_base_units("0.000001", 6).unwrap(), "1");
/// ```
pub fn to_base_units(amount: &str, decimals: u8) -> AmountResult<String> {
    to_base_units_u256(amount, decimals).map(|v| v.to_string())
}

/// Same as [`to_base_units`] but returns the raw `U256`.
pub fn to_base_units_u256(amount: &str, decimals: u8) -> AmountResult<U256> {
    let trimmed = amount.trim();
    if trimmed.starts_with('-') {
        return Err(AmountError::Negative(trimmed.to_string()));
    }

    let (whole, fraction) = match trimmed.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (trimmed, ""),
    };

    if whole.is_empty() && fraction.is_empty() {
        return Err(AmountError::Empty);
    }
    if !whole.bytes().all(|b| b.is_ascii_digit()) || !fraction.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(AmountError::Invalid(trimmed.to_string()));
    }

    // Trailing zeros carry no precision ("1.50" with 1 decimal is fine).
    let fraction = fraction.trim_end_matches('0');
    if fraction.len() > decimals as usize {
        return Err(AmountError::TooPrecise {
            amount: trimmed.to_string(),
            decimals,
        });
    }

    let overflow = || AmountError::Overflow(trimmed.to_string());
    let base = U256::from(10u8)
        .checked_pow(U256::from(decimals))
        .ok_or_else(overflow)?;

    let whole_value = if whole.is_empty() {
        U256::ZERO
    } else {
        U256::from_str_radix(whole, 10).map_err(|_| overflow())?
    };

    let mut padded = fraction.to_string();
    padded.extend(std::iter::repeat('0').take(decimals as usize - fraction.len()));
    let fraction_value = if padded.is_empty() {
        U256::ZERO
    } else {
        U256::from_str_radix(&padded, 10).map_err(|_| overflow())?
    };

    whole_value
        .checked_mul(base)
        .and_then(|v| v.checked_add(fraction_value))
        .ok_or_else(overflow)
}

/// Format a base-unit amount as a human-readable decimal string.
///
/// Trailing fractional zeros are dropped; integral values have no decimal point.
pub fn from_base_units(value: U256, decimals: u8) -> String {
    let digits = value.to_string();
    let decimals = decimals as usize;
    if decimals == 0 {
        return digits;
    }

    let padded = if digits.len() <= decimals {
        format!("{}{}", "0".repeat(decimals - digits.len() + 1), digits)
    } else {
        digits
    };
    let (whole, fraction) = padded.split_at(padded.len() - decimals);
    let fraction = fraction.trim_end_matches('0');
    if fraction.is_empty() {
        whole.to_string()
    } else {
        format!("{}.{}", whole, fraction)
    }
}
