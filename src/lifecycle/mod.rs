//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Shutdown (shutdown.rs):
//!     teardown() / Drop → trigger → startup-and-poll task exits its loop
//! ```
//!
//! # Design Decisions
//! - One broadcast signal per owner, fired at most once
//! - Tasks subscribe before they are spawned

pub mod shutdown;

pub use shutdown::Shutdown;
