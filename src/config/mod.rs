//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → WalletConfig (validated, immutable)
//!     → handed to WalletClient::start
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; the session never re-reads it
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    ConfirmationConfig, ConnectionConfig, GasConfig, GasPriceSource, ObservabilityConfig,
    ProviderConfig, WalletConfig, DEFAULT_FALLBACK_GAS_PRICE_WEI, DEFAULT_ORACLE_URL,
};
pub use validation::{validate_config, ValidationError};
