//! Wallet provider subsystem.
//!
//! # Data Flow
//! ```text
//! Injected provider (browser wallet bridge, JSON-RPC node, test double)
//!     → traits.rs (WalletProvider capability set)
//!     → adapter.rs (presence check, transfers, contract calls, hash hook)
//!     → connection / transaction subsystems
//! ```
//!
//! # Design Decisions
//! - The provider is injected explicitly; absence is `None`, not an error
//! - No retries or caching at this layer
//! - Receipts keep the raw status so normalization happens in one place

pub mod adapter;
pub mod rpc;
pub mod traits;
pub mod types;

pub use adapter::{HashHook, ProviderAdapter};
pub use rpc::RpcWalletProvider;
pub use traits::WalletProvider;
pub use types::{
    CallParams, ContractCall, ProviderError, ProviderFlags, ProviderReceipt, ProviderResult,
    ValueTransfer,
};
