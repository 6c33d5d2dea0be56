//! Amount conversion subsystem.
//!
//! # Data Flow
//! ```text
//! "0.5" (human-readable, token decimals)
//!     → convert.rs (exact decimal parse, scale by 10^decimals)
//!     → "500000000000000000" (base units, U256)
//! ```

pub mod convert;

pub use convert::{
    from_base_units, to_base_units, to_base_units_u256, AmountError, AmountResult,
    NATIVE_DECIMALS,
};
