//! Metrics collection.
//!
//! # Metrics
//! - `wallet_status_transitions_total` (counter): status changes by target status
//! - `wallet_account_changes_total` (counter): published account changes
//! - `wallet_gas_price_lookups_total` (counter): gas price answers by source
//! - `wallet_submissions_total` (counter): submissions by kind and outcome
//! - `wallet_receipt_poll_attempts` (histogram): polls needed per confirmation

use crate::connection::WalletStatus;

pub fn record_status_transition(status: WalletStatus) {
    ::metrics::counter!("wallet_status_transitions_total", "status" => status.label())
        .increment(1);
}

pub fn record_account_change() {
    ::metrics::counter!("wallet_account_changes_total").increment(1);
}

/// `source` is one of `oracle`, `cache`, `fallback`, `fixed`.
pub fn record_gas_price_lookup(source: &'static str) {
    ::metrics::counter!("wallet_gas_price_lookups_total", "source" => source).increment(1);
}

/// `kind` is `native` or `token`; `outcome` is `submitted` or `failed`.
pub fn record_submission(kind: &'static str, outcome: &'static str) {
    ::metrics::counter!("wallet_submissions_total", "kind" => kind, "outcome" => outcome)
        .increment(1);
}

pub fn record_receipt_polls(attempts: u32) {
    ::metrics::histogram!("wallet_receipt_poll_attempts").record(attempts as f64);
}
