//! Capability wrapper around the injected wallet provider.
//!
//! # Responsibilities
//! - Hold the optional provider and answer "is a wallet present"
//! - Pass account/network/balance/receipt queries straight through
//! - Build value transfers and ABI-encoded contract calls
//! - Fire the transaction-hash hook as soon as a hash is known

use alloy::dyn_abi::{DynSolValue, JsonAbiExt};
use alloy::json_abi::JsonAbi;
use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, TxHash, U256};
use alloy::rpc::types::TransactionRequest;
use std::sync::Arc;

use crate::provider::traits::WalletProvider;
use crate::provider::types::{
    CallParams, ContractCall, ProviderError, ProviderFlags, ProviderReceipt, ProviderResult,
    ValueTransfer,
};

/// Notification fired with the transaction hash right after submission.
pub type HashHook<'a> = &'a (dyn Fn(TxHash) + Send + Sync);

/// Thin pass-through over an optional [`WalletProvider`].
#[derive(Clone, Default)]
pub struct ProviderAdapter {
    provider: Option<Arc<dyn WalletProvider>>,
}

impl ProviderAdapter {
    /// Wrap an injected provider, or `None` when the environment has none.
    pub fn new(provider: Option<Arc<dyn WalletProvider>>) -> Self {
        Self { provider }
    }

    /// Whether a wallet provider was injected.
    pub fn is_present(&self) -> bool {
        self.provider.is_some()
    }

    /// Feature flags of the provider (all unset when absent).
    pub fn flags(&self) -> ProviderFlags {
        self.provider
            .as_ref()
            .map(|p| p.flags())
            .unwrap_or_default()
    }

    fn provider(&self) -> ProviderResult<&Arc<dyn WalletProvider>> {
        self.provider.as_ref().ok_or(ProviderError::NotPresent)
    }

    pub async fn network_id(&self) -> ProviderResult<u64> {
        self.provider()?.network_id().await
    }

    pub async fn accounts(&self) -> ProviderResult<Vec<Address>> {
        self.provider()?.accounts().await
    }

    pub async fn request_access(&self) -> ProviderResult<Vec<Address>> {
        self.provider()?.request_access().await
    }

    pub async fn balance(&self, address: Address) -> ProviderResult<U256> {
        self.provider()?.balance(address).await
    }

    pub async fn transaction_receipt(&self, hash: TxHash) -> ProviderResult<Option<ProviderReceipt>> {
        self.provider()?.transaction_receipt(hash).await
    }

    /// Submit a native-currency transfer.
    pub async fn send_value_transfer(
        &self,
        transfer: ValueTransfer,
        on_hash: Option<HashHook<'_>>,
    ) -> ProviderResult<TxHash> {
        let provider = self.provider()?;
        let tx = TransactionRequest::default()
            .with_from(transfer.from)
            .with_to(transfer.to)
            .with_value(transfer.value)
            .with_gas_price(transfer.gas_price);

        let hash = provider.send_transaction(tx).await?;
        if let Some(hook) = on_hash {
            hook(hash);
        }
        Ok(hash)
    }

    /// ABI-encode a call to `method` on the contract at `address`.
    ///
    /// Overloaded methods are resolved by argument count.
    pub fn contract_call(
        &self,
        abi: &JsonAbi,
        address: Address,
        method: &str,
        args: &[DynSolValue],
    ) -> ProviderResult<ContractCall> {
        let function = abi
            .function(method)
            .and_then(|candidates| candidates.iter().find(|f| f.inputs.len() == args.len()))
            .ok_or_else(|| {
                ProviderError::Abi(format!(
                    "method '{}' with {} arguments not found in ABI",
                    method,
                    args.len()
                ))
            })?;

        let input = function
            .abi_encode_input(args)
            .map_err(|e| ProviderError::Abi(format!("failed to encode '{}': {}", method, e)))?;

        Ok(ContractCall {
            to: address,
            method: method.to_string(),
            input: input.into(),
        })
    }

    /// Estimate gas for a contract call sent from `from`.
    pub async fn estimate_gas(&self, call: &ContractCall, from: Address) -> ProviderResult<u64> {
        let tx = TransactionRequest::default()
            .with_from(from)
            .with_to(call.to)
            .with_input(call.input.clone());
        self.provider()?.estimate_gas(&tx).await
    }

    /// Submit a contract call.
    pub async fn send_contract_call(
        &self,
        call: &ContractCall,
        params: CallParams,
        on_hash: Option<HashHook<'_>>,
    ) -> ProviderResult<TxHash> {
        let provider = self.provider()?;
        let tx = TransactionRequest::default()
            .with_from(params.from)
            .with_to(call.to)
            .with_input(call.input.clone())
            .with_gas_limit(params.gas)
            .with_gas_price(params.gas_price);

        let hash = provider.send_transaction(tx).await?;
        if let Some(hook) = on_hash {
            hook(hash);
        }
        Ok(hash)
    }
}

impl std::fmt::Debug for ProviderAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderAdapter")
            .field("present", &self.is_present())
            .field("flags", &self.flags())
            .finish()
    }
}
