//! Gas oracle lookups against a mock HTTP oracle.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use wallet_bridge::config::{GasConfig, GasPriceSource};
use wallet_bridge::GasEstimator;

mod common;

fn oracle(url: String, cache_ttl_ms: u64) -> GasEstimator {
    GasEstimator::new(GasConfig {
        source: GasPriceSource::Oracle { url },
        request_timeout_ms: 2_000,
        cache_ttl_ms,
        ..GasConfig::default()
    })
    .unwrap()
}

#[tokio::test]
async fn test_fast_price_is_scaled_to_wei() {
    let (url, _) = common::start_mock_oracle(200, r#"{"fast": 50, "average": 30}"#).await;
    let gas = oracle(url, 0);

    assert_eq!(gas.default_gas_price_gwei().await, "5000000000");
    assert_eq!(gas.gas_price_wei().await, 5_000_000_000);
}

#[tokio::test]
async fn test_fractional_and_string_prices() {
    let (url, _) = common::start_mock_oracle(200, r#"{"fast": "25.5"}"#).await;
    assert_eq!(oracle(url, 0).default_gas_price_gwei().await, "2550000000");

    let (url, _) = common::start_mock_oracle(200, r#"{"fast": 120.25}"#).await;
    assert_eq!(oracle(url, 0).default_gas_price_gwei().await, "12025000000");
}

#[tokio::test]
async fn test_failures_fall_back() {
    let bodies = [
        (500, r#"{"fast": 50}"#),
        (200, "not json"),
        (200, r#"{"average": 30}"#),
        (200, r#"{"fast": null}"#),
        (200, r#"{"fast": -4}"#),
    ];

    for (status, body) in bodies {
        let (url, hits) = common::start_mock_oracle(status, body).await;
        let gas = oracle(url, 0);
        assert_eq!(gas.default_gas_price_gwei().await, "11000000000", "body {}", body);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}

#[tokio::test]
async fn test_custom_fallback() {
    let (url, _) = common::start_mock_oracle(503, "").await;
    let gas = GasEstimator::new(GasConfig {
        source: GasPriceSource::Oracle { url },
        fallback_gas_price_wei: "9000000000".to_string(),
        ..GasConfig::default()
    })
    .unwrap();

    assert_eq!(gas.default_gas_price_gwei().await, "9000000000");
}

#[tokio::test]
async fn test_successful_answers_are_cached() {
    let (url, hits) = common::start_mock_oracle(200, r#"{"fast": 50}"#).await;
    let gas = oracle(url, 60_000);

    assert_eq!(gas.default_gas_price_gwei().await, "5000000000");
    assert_eq!(gas.default_gas_price_gwei().await, "5000000000");
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_zero_ttl_disables_cache() {
    let (url, hits) = common::start_mock_oracle(200, r#"{"fast": 50}"#).await;
    let gas = oracle(url, 0);

    gas.default_gas_price_gwei().await;
    gas.default_gas_price_gwei().await;
    assert_eq!(hits.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_fallback_is_not_cached() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let addr = common::start_programmable_backend(move || {
        let counter = counter.clone();
        async move {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                (500, "oracle overloaded".to_string())
            } else {
                (200, r#"{"fast": 80}"#.to_string())
            }
        }
    })
    .await;
    let gas = oracle(format!("http://{}/json/ethgasAPI.json", addr), 60_000);

    assert_eq!(gas.default_gas_price_gwei().await, "11000000000");
    assert_eq!(gas.default_gas_price_gwei().await, "8000000000");
    assert_eq!(gas.default_gas_price_gwei().await, "8000000000");
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_out_of_range_price_uses_configured_fallback() {
    // 10^32 Gwei×10 scales past u128::MAX wei
    let (url, _) =
        common::start_mock_oracle(200, r#"{"fast": "100000000000000000000000000000000"}"#).await;
    let gas = GasEstimator::new(GasConfig {
        source: GasPriceSource::Oracle { url },
        fallback_gas_price_wei: "9000000000".to_string(),
        cache_ttl_ms: 0,
        ..GasConfig::default()
    })
    .unwrap();

    assert_eq!(gas.gas_price_wei().await, 9_000_000_000);
}
