//! Gas price subsystem.
//!
//! # Data Flow
//! ```text
//! GasConfig.source
//!     ├─ fixed  → configured wei
//!     └─ oracle → cache hit? → cached wei
//!                 → GET url → {"fast": n} → n × 10^8 wei (cached)
//!                 → any failure → fallback wei (not cached)
//! ```
//!
//! # Design Decisions
//! - Lookups never fail; callers always get a usable price
//! - Exact decimal scaling, no string concatenation

pub mod estimator;

pub use estimator::{GasError, GasEstimator, GasParams, GasResult};
