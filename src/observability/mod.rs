//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured tracing events)
//!     → metrics.rs (counters, histograms via the `metrics` facade)
//!
//! Consumers:
//!     → Log output (stdout via tracing-subscriber)
//!     → Whatever metrics recorder the host installs
//! ```
//!
//! # Design Decisions
//! - The library never installs a metrics exporter; hosts choose one
//! - Metric updates are cheap no-ops when no recorder is installed
//! - Log level configurable via config and `RUST_LOG`

pub mod logging;
pub mod metrics;
