//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the wallet client.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::connection::NetworkKind;

/// Gas station endpoint used when no other oracle is configured.
pub const DEFAULT_ORACLE_URL: &str = "https://ethgasstation.info/json/ethgasAPI.json";

/// 11 Gwei, used whenever the oracle cannot be consulted.
pub const DEFAULT_FALLBACK_GAS_PRICE_WEI: &str = "11000000000";

/// Root configuration for the wallet client.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct WalletConfig {
    /// Connection state machine settings.
    pub connection: ConnectionConfig,

    /// Provider construction settings (used by the host binary).
    pub provider: ProviderConfig,

    /// Gas price sourcing.
    pub gas: GasConfig,

    /// Receipt polling and submission settings.
    pub confirmation: ConfirmationConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Connection state machine configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ConnectionConfig {
    /// Network the wallet must be on; any network is accepted when unset.
    pub required_network: Option<NetworkKind>,

    /// Interval between account polls in milliseconds.
    pub account_poll_interval_ms: u64,

    /// Deadline for network + initial account resolution (0 disables).
    pub startup_timeout_ms: u64,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            required_network: None,
            account_poll_interval_ms: 5_000,
            startup_timeout_ms: 5_000,
        }
    }
}

/// Wallet provider configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// JSON-RPC endpoint acting as the wallet; no provider when unset.
    pub rpc_url: Option<String>,

    /// Advertise the MetaMask feature flag.
    pub is_metamask: bool,

    /// Advertise the Trust Wallet feature flag.
    pub is_trust: bool,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            rpc_url: None,
            is_metamask: false,
            is_trust: false,
            request_timeout_secs: 10,
        }
    }
}

/// Where gas prices come from.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum GasPriceSource {
    /// HTTP oracle returning `{"fast": <gwei * 10>}`.
    Oracle { url: String },
    /// Constant gas price in wei.
    Fixed { wei: String },
}

impl Default for GasPriceSource {
    fn default() -> Self {
        GasPriceSource::Oracle {
            url: DEFAULT_ORACLE_URL.to_string(),
        }
    }
}

/// Gas price configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GasConfig {
    /// Gas price source.
    pub source: GasPriceSource,

    /// Gas price in wei returned when the oracle fails.
    pub fallback_gas_price_wei: String,

    /// Oracle request timeout in milliseconds.
    pub request_timeout_ms: u64,

    /// How long a successful oracle answer is reused (0 disables caching).
    pub cache_ttl_ms: u64,
}

impl Default for GasConfig {
    fn default() -> Self {
        Self {
            source: GasPriceSource::default(),
            fallback_gas_price_wei: DEFAULT_FALLBACK_GAS_PRICE_WEI.to_string(),
            request_timeout_ms: 5_000,
            cache_ttl_ms: 15_000,
        }
    }
}

/// Transaction confirmation configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ConfirmationConfig {
    /// Interval between receipt polls in milliseconds.
    pub poll_interval_ms: u64,

    /// Maximum receipt polls before giving up (0 = unbounded).
    pub max_attempts: u32,

    /// Wall-clock limit for confirmation in seconds (0 = none).
    pub timeout_secs: u64,

    /// Serialize submissions per sending account.
    pub serialize_per_account: bool,
}

impl Default for ConfirmationConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 500,
            max_attempts: 1_200,
            timeout_secs: 0,
            serialize_per_account: false,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
