//! Best-effort gas price lookup.
//!
//! # Responsibilities
//! - Ask the configured oracle for the "fast" gas price
//! - Scale the oracle's Gwei×10 figure to wei exactly
//! - Mask every oracle failure behind the configured fallback
//! - Reuse a successful answer for the cache TTL

use serde::Deserialize;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;

use crate::config::{GasConfig, GasPriceSource};
use crate::observability::metrics;
use crate::units::{self, AmountError};

/// Oracle answers are in Gwei×10, i.e. units of 10^8 wei.
const ORACLE_DECIMALS: u8 = 8;

/// Gas price / gas limit pair used when callers want static defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GasParams {
    /// Gas price in wei.
    pub gas_price: String,
    /// Gas limit.
    pub gas: String,
}

/// Reasons an oracle lookup fell through to the fallback.
#[derive(Debug, Error)]
pub enum GasError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Malformed oracle response: {0}")]
    Malformed(String),

    #[error("Invalid oracle price: {0}")]
    Amount(#[from] AmountError),

    #[error("Invalid {field} '{value}': not an integer wei amount")]
    InvalidPrice { field: &'static str, value: String },
}

pub type GasResult<T> = Result<T, GasError>;

#[derive(Debug, Deserialize)]
struct OracleResponse {
    fast: Option<serde_json::Value>,
}

#[derive(Debug, Clone)]
struct CachedPrice {
    wei: String,
    fetched_at: Instant,
}

/// Gas price source with fallback and a small TTL cache.
pub struct GasEstimator {
    client: reqwest::Client,
    config: GasConfig,
    fallback_wei: u128,
    cache: Mutex<Option<CachedPrice>>,
}

impl GasEstimator {
    /// Fails when the fixed or fallback price is not an integer wei amount.
    pub fn new(config: GasConfig) -> GasResult<Self> {
        let fallback_wei = parse_wei("fallback_gas_price_wei", &config.fallback_gas_price_wei)?;
        if let GasPriceSource::Fixed { wei } = &config.source {
            parse_wei("source.wei", wei)?;
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()?;

        Ok(Self {
            client,
            config,
            fallback_wei,
            cache: Mutex::new(None),
        })
    }

    /// Gas price in wei as a decimal string. Never fails.
    pub async fn default_gas_price_gwei(&self) -> String {
        let url = match &self.config.source {
            GasPriceSource::Fixed { wei } => {
                metrics::record_gas_price_lookup("fixed");
                return wei.clone();
            }
            GasPriceSource::Oracle { url } => url,
        };

        if let Some(cached) = self.cached() {
            metrics::record_gas_price_lookup("cache");
            return cached;
        }

        match self.fetch_oracle(url).await {
            Ok(wei) => {
                tracing::debug!(gas_price_wei = %wei, "Gas price from oracle");
                metrics::record_gas_price_lookup("oracle");
                self.store(&wei);
                wei
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    fallback = %self.config.fallback_gas_price_wei,
                    "Gas oracle unavailable, using fallback price"
                );
                metrics::record_gas_price_lookup("fallback");
                self.config.fallback_gas_price_wei.clone()
            }
        }
    }

    /// Same as [`default_gas_price_gwei`](Self::default_gas_price_gwei), parsed.
    ///
    /// An oracle price too large for `u128` gives the configured fallback.
    pub async fn gas_price_wei(&self) -> u128 {
        let wei = self.default_gas_price_gwei().await;
        wei.parse::<u128>().unwrap_or_else(|_| {
            tracing::warn!(gas_price_wei = %wei, "Gas price out of range, using fallback price");
            self.fallback_wei
        })
    }

    /// Static defaults: 8 Gwei gas price, 210000 gas.
    pub fn default_gas_params(&self) -> GasParams {
        GasParams {
            gas_price: "8000000000".to_string(),
            gas: "210000".to_string(),
        }
    }

    async fn fetch_oracle(&self, url: &str) -> GasResult<String> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        let body: OracleResponse = response.json().await?;

        let fast = match body.fast {
            Some(serde_json::Value::Number(n)) => n.to_string(),
            Some(serde_json::Value::String(s)) => s,
            Some(other) => {
                return Err(GasError::Malformed(format!("'fast' is not numeric: {}", other)))
            }
            None => return Err(GasError::Malformed("missing 'fast'".to_string())),
        };

        Ok(units::to_base_units(fast.trim(), ORACLE_DECIMALS)?)
    }

    fn cached(&self) -> Option<String> {
        let ttl = Duration::from_millis(self.config.cache_ttl_ms);
        let cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        cache
            .as_ref()
            .filter(|entry| entry.fetched_at.elapsed() < ttl)
            .map(|entry| entry.wei.clone())
    }

    fn store(&self, wei: &str) {
        if self.config.cache_ttl_ms == 0 {
            return;
        }
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        *cache = Some(CachedPrice {
            wei: wei.to_string(),
            fetched_at: Instant::now(),
        });
    }
}

fn parse_wei(field: &'static str, value: &str) -> GasResult<u128> {
    value.parse::<u128>().map_err(|_| GasError::InvalidPrice {
        field,
        value: value.to_string(),
    })
}

impl std::fmt::Debug for GasEstimator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GasEstimator")
            .field("source", &self.config.source)
            .field("cache_ttl_ms", &self.config.cache_ttl_ms)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed(wei: &str) -> GasConfig {
        GasConfig {
            source: GasPriceSource::Fixed {
                wei: wei.to_string(),
            },
            ..GasConfig::default()
        }
    }

    #[tokio::test]
    async fn test_fixed_source() {
        let gas = GasEstimator::new(fixed("20000000000")).unwrap();
        assert_eq!(gas.default_gas_price_gwei().await, "20000000000");
        assert_eq!(gas.gas_price_wei().await, 20_000_000_000);
    }

    #[tokio::test]
    async fn test_unreachable_oracle_uses_fallback() {
        let config = GasConfig {
            source: GasPriceSource::Oracle {
                url: "http://127.0.0.1:9/json".to_string(),
            },
            request_timeout_ms: 500,
            ..GasConfig::default()
        };
        let gas = GasEstimator::new(config).unwrap();
        assert_eq!(gas.default_gas_price_gwei().await, "11000000000");
        // fallback answers are not cached
        assert!(gas.cached().is_none());
    }

    #[test]
    fn test_unparseable_prices_rejected() {
        let mut config = fixed("20000000000");
        config.fallback_gas_price_wei = "11 gwei".to_string();
        let err = GasEstimator::new(config).unwrap_err();
        assert!(matches!(
            err,
            GasError::InvalidPrice {
                field: "fallback_gas_price_wei",
                ..
            }
        ));

        let err = GasEstimator::new(fixed("fast")).unwrap_err();
        assert!(err.to_string().contains("source.wei"));
    }

    #[test]
    fn test_default_params() {
        let gas = GasEstimator::new(fixed("1")).unwrap();
        let params = gas.default_gas_params();
        assert_eq!(params.gas_price, "8000000000");
        assert_eq!(params.gas, "210000");
    }

    #[test]
    fn test_oracle_scaling() {
        assert_eq!(units::to_base_units("50", ORACLE_DECIMALS).unwrap(), "5000000000");
        assert_eq!(units::to_base_units("25.5", ORACLE_DECIMALS).unwrap(), "2550000000");
    }
}
