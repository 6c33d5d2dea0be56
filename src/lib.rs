//! Wallet bridge library.
//!
//! Connects an application to a user-controlled Ethereum wallet and keeps its
//! status observable. Payments in ether or ERC-20 tokens are tracked until mined.

// Core subsystems
pub mod connection;
pub mod provider;
pub mod transaction;

// Supporting services
pub mod gas;
pub mod units;

// Cross-cutting concerns
pub mod config;
pub mod lifecycle;
pub mod observability;

pub mod client;

pub use client::{ClientError, WalletClient};
pub use config::WalletConfig;
pub use connection::{ConnectionStateMachine, NetworkKind, WalletKind, WalletStatus};
pub use gas::GasEstimator;
pub use provider::{ProviderAdapter, ProviderError, RpcWalletProvider, WalletProvider};
pub use transaction::{TransactionCoordinator, TransactionError, TransactionReceipt};
