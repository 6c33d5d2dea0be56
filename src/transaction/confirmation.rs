//! Receipt polling.
//!
//! # Responsibilities
//! - Poll the provider for a receipt until one appears
//! - Bound the wait by attempt count and, optionally, wall-clock time
//! - Normalize the receipt status

use alloy::primitives::TxHash;
use std::time::Duration;
use tokio::time::{self, MissedTickBehavior};

use crate::config::ConfirmationConfig;
use crate::observability::metrics;
use crate::provider::ProviderAdapter;
use crate::transaction::types::{TransactionError, TransactionReceipt, TransactionResult};

/// Wait until `tx_hash` is mined.
///
/// The first poll happens immediately. A provider error while polling ends
/// the wait with [`TransactionError::Provider`].
pub async fn wait_for_receipt(
    adapter: &ProviderAdapter,
    tx_hash: TxHash,
    config: &ConfirmationConfig,
) -> TransactionResult<TransactionReceipt> {
    if config.timeout_secs == 0 {
        return poll_receipt(adapter, tx_hash, config).await;
    }

    match time::timeout(
        Duration::from_secs(config.timeout_secs),
        poll_receipt(adapter, tx_hash, config),
    )
    .await
    {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(
                tx_hash = %tx_hash,
                timeout_secs = config.timeout_secs,
                "Transaction confirmation deadline exceeded"
            );
            Err(TransactionError::ConfirmationDeadline(config.timeout_secs))
        }
    }
}

async fn poll_receipt(
    adapter: &ProviderAdapter,
    tx_hash: TxHash,
    config: &ConfirmationConfig,
) -> TransactionResult<TransactionReceipt> {
    let mut ticker = time::interval(poll_period(config));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut attempts: u32 = 0;

    loop {
        if config.max_attempts != 0 && attempts >= config.max_attempts {
            tracing::warn!(tx_hash = %tx_hash, attempts, "Gave up waiting for receipt");
            metrics::record_receipt_polls(attempts);
            return Err(TransactionError::ConfirmationTimeout { attempts });
        }

        ticker.tick().await;
        attempts += 1;

        match adapter.transaction_receipt(tx_hash).await? {
            Some(receipt) => {
                metrics::record_receipt_polls(attempts);
                let receipt = TransactionReceipt::try_from(receipt)?;
                tracing::info!(
                    tx_hash = %tx_hash,
                    status = receipt.status,
                    block_number = ?receipt.block_number,
                    attempts,
                    "Transaction mined"
                );
                return Ok(receipt);
            }
            None => tracing::debug!(tx_hash = %tx_hash, attempts, "Transaction pending"),
        }
    }
}

/// Configured poll period; zero falls back to the default.
fn poll_period(config: &ConfirmationConfig) -> Duration {
    let ms = match config.poll_interval_ms {
        0 => {
            let fallback = ConfirmationConfig::default().poll_interval_ms;
            tracing::warn!(interval_ms = fallback, "Zero receipt poll interval, using default");
            fallback
        }
        ms => ms,
    };
    Duration::from_millis(ms)
}
