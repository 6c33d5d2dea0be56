//! The capability set every wallet provider must offer.

use alloy::primitives::{Address, TxHash, U256};
use alloy::rpc::types::TransactionRequest;
use async_trait::async_trait;

use crate::provider::types::{ProviderFlags, ProviderReceipt, ProviderResult};

/// An injected wallet provider (EIP-1193 style).
///
/// Implementations only translate requests; retries, caching and state
/// tracking live above this trait.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Feature flags used to classify the wallet.
    fn flags(&self) -> ProviderFlags {
        ProviderFlags::default()
    }

    /// Chain id of the network the wallet is connected to.
    async fn network_id(&self) -> ProviderResult<u64>;

    /// Currently exposed accounts; empty while the wallet is locked.
    async fn accounts(&self) -> ProviderResult<Vec<Address>>;

    /// Ask the wallet to expose its accounts (`eth_requestAccounts`).
    async fn request_access(&self) -> ProviderResult<Vec<Address>>;

    /// Native balance in wei.
    async fn balance(&self, address: Address) -> ProviderResult<U256>;

    /// Submit a transaction for signing and broadcast; yields its hash.
    async fn send_transaction(&self, tx: TransactionRequest) -> ProviderResult<TxHash>;

    /// Receipt of a mined transaction, `None` while still pending.
    async fn transaction_receipt(&self, hash: TxHash) -> ProviderResult<Option<ProviderReceipt>>;

    /// Gas the transaction would consume.
    async fn estimate_gas(&self, tx: &TransactionRequest) -> ProviderResult<u64>;
}
