//! JSON-RPC backed wallet provider.
//!
//! # Responsibilities
//! - Forward wallet capabilities to a node with unlocked accounts
//!   (Anvil, Hardhat, Geth `--dev`, or a local EIP-1193 bridge)
//! - Bound every request with a timeout
//! - Map JSON-RPC error payloads onto [`ProviderError`]

use alloy::primitives::{Address, TxHash, U256};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use alloy::transports::TransportError;
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

use crate::config::ProviderConfig;
use crate::provider::traits::WalletProvider;
use crate::provider::types::{ProviderError, ProviderFlags, ProviderReceipt, ProviderResult};

/// EIP-1193 "User Rejected Request".
const USER_REJECTED_CODE: i64 = 4001;

/// Wallet provider talking to a JSON-RPC endpoint over HTTP.
#[derive(Clone)]
pub struct RpcWalletProvider {
    provider: Arc<dyn Provider + Send + Sync>,
    flags: ProviderFlags,
    rpc_url: String,
    timeout_secs: u64,
}

impl RpcWalletProvider {
    /// Create a provider for `rpc_url`.
    ///
    /// No request is made here; connectivity problems surface on first use.
    pub fn new(rpc_url: &str, flags: ProviderFlags, timeout_secs: u64) -> ProviderResult<Self> {
        let url: url::Url = rpc_url
            .parse()
            .map_err(|e| ProviderError::Rpc(format!("Invalid RPC URL '{}': {}", rpc_url, e)))?;
        let provider =
            Arc::new(ProviderBuilder::new().connect_http(url)) as Arc<dyn Provider + Send + Sync>;

        tracing::info!(rpc_url = %rpc_url, timeout_secs, "RPC wallet provider created");

        Ok(Self {
            provider,
            flags,
            rpc_url: rpc_url.to_string(),
            timeout_secs,
        })
    }

    /// Build from configuration; `None` when no RPC URL is configured.
    pub fn from_config(config: &ProviderConfig) -> ProviderResult<Option<Self>> {
        match &config.rpc_url {
            Some(url) => {
                let flags = ProviderFlags {
                    is_metamask: config.is_metamask,
                    is_trust: config.is_trust,
                };
                Self::new(url, flags, config.request_timeout_secs).map(Some)
            }
            None => Ok(None),
        }
    }

    async fn bounded<T, F>(&self, method: &'static str, fut: F) -> ProviderResult<T>
    where
        F: Future<Output = Result<T, TransportError>>,
    {
        match timeout(Duration::from_secs(self.timeout_secs), fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => {
                tracing::warn!(method, error = %e, "RPC error");
                Err(map_transport_error(e))
            }
            Err(_) => {
                tracing::warn!(method, timeout_secs = self.timeout_secs, "RPC timeout");
                Err(ProviderError::Timeout(self.timeout_secs))
            }
        }
    }
}

fn map_transport_error(err: TransportError) -> ProviderError {
    if let Some(payload) = err.as_error_resp() {
        if payload.code == USER_REJECTED_CODE {
            return ProviderError::Rejected(payload.message.to_string());
        }
        return ProviderError::Rpc(format!("{} (code {})", payload.message, payload.code));
    }
    if err.is_ser_error() || err.is_deser_error() {
        return ProviderError::Decode(err.to_string());
    }
    ProviderError::Rpc(err.to_string())
}

#[async_trait]
impl WalletProvider for RpcWalletProvider {
    fn flags(&self) -> ProviderFlags {
        self.flags
    }

    async fn network_id(&self) -> ProviderResult<u64> {
        self.bounded("eth_chainId", async { self.provider.get_chain_id().await })
            .await
    }

    async fn accounts(&self) -> ProviderResult<Vec<Address>> {
        self.bounded("eth_accounts", async { self.provider.get_accounts().await })
            .await
    }

    async fn request_access(&self) -> ProviderResult<Vec<Address>> {
        self.bounded("eth_requestAccounts", async {
            self.provider
                .client()
                .request_noparams::<Vec<Address>>("eth_requestAccounts")
                .await
        })
        .await
    }

    async fn balance(&self, address: Address) -> ProviderResult<U256> {
        self.bounded("eth_getBalance", async {
            self.provider.get_balance(address).await
        })
        .await
    }

    async fn send_transaction(&self, tx: TransactionRequest) -> ProviderResult<TxHash> {
        self.bounded("eth_sendTransaction", async {
            let pending = self.provider.send_transaction(tx).await?;
            Ok::<_, TransportError>(*pending.tx_hash())
        })
        .await
    }

    async fn transaction_receipt(&self, hash: TxHash) -> ProviderResult<Option<ProviderReceipt>> {
        // Raw request so `status` keeps the node's own encoding.
        self.bounded("eth_getTransactionReceipt", async {
            self.provider
                .client()
                .request::<_, Option<ProviderReceipt>>("eth_getTransactionReceipt", (hash,))
                .await
        })
        .await
    }

    async fn estimate_gas(&self, tx: &TransactionRequest) -> ProviderResult<u64> {
        self.bounded("eth_estimateGas", async {
            self.provider.estimate_gas(tx.clone()).await
        })
        .await
    }
}

impl std::fmt::Debug for RpcWalletProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcWalletProvider")
            .field("rpc_url", &self.rpc_url)
            .field("flags", &self.flags)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_url_rejected() {
        let result = RpcWalletProvider::new("not a url", ProviderFlags::default(), 5);
        assert!(result.unwrap_err().to_string().contains("Invalid RPC URL"));
    }

    #[test]
    fn test_from_config_without_url() {
        let config = ProviderConfig::default();
        assert!(RpcWalletProvider::from_config(&config).unwrap().is_none());
    }

    #[test]
    fn test_from_config_carries_flags() {
        let config = ProviderConfig {
            rpc_url: Some("http://localhost:8545".to_string()),
            is_metamask: true,
            ..ProviderConfig::default()
        };
        let provider = RpcWalletProvider::from_config(&config).unwrap().unwrap();
        assert!(provider.flags().is_metamask);
        assert!(!provider.flags().is_trust);
    }

    #[tokio::test]
    async fn test_unreachable_node_is_an_rpc_error() {
        // Nothing listens on port 9; the call must fail rather than hang or panic.
        let provider =
            RpcWalletProvider::new("http://127.0.0.1:9", ProviderFlags::default(), 2).unwrap();
        let result = provider.network_id().await;
        assert!(matches!(
            result,
            Err(ProviderError::Rpc(_)) | Err(ProviderError::Timeout(_))
        ));
    }
}
