//! Wallet connection subsystem.
//!
//! # Data Flow
//! ```text
//! ProviderAdapter
//!     → machine.rs startup (network id → NetworkKind → required network?)
//!     → machine.rs startup (accounts → Connected | NoAccounts + access request)
//!     → machine.rs poll loop (accounts every interval, publish on change)
//!     → watch channels (status, account) → application / TransactionCoordinator
//! ```
//!
//! # Design Decisions
//! - Absence of a wallet is a status, never an error
//! - Terminal statuses end the session; there is no in-session recovery
//! - `NoAccounts ⇄ Connected` is the only reversible transition

pub mod machine;
pub mod status;

pub use machine::ConnectionStateMachine;
pub use status::{NetworkKind, WalletKind, WalletStatus};
