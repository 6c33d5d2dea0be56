//! Transaction subsystem.
//!
//! # Data Flow
//! ```text
//! pay_with_native / pay_with_token
//!     → coordinator.rs (amount scaling, account, gas, submission)
//!     → hash hook (notification only)
//!     → confirmation.rs (receipt polling, bounded)
//!     → TransactionReceipt { status: bool }
//! ```
//!
//! # Design Decisions
//! - Submission failures are never retried
//! - A reverted transaction is a receipt with `status == false`, not an error
//! - Confirmation timeouts are distinct from submission failures

pub mod confirmation;
pub mod coordinator;
pub mod queue;
pub mod types;

pub use confirmation::wait_for_receipt;
pub use coordinator::{erc20_abi, TransactionCoordinator, TransactionHashHook};
pub use queue::SubmissionQueue;
pub use types::{
    normalize_status, TokenContract, TransactionError, TransactionReceipt, TransactionResult,
};
