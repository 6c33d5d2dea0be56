//! Native and token payments.
//!
//! # Responsibilities
//! - Resolve the sending account through the connection state machine
//! - Price the transaction (oracle gas price, estimated gas for tokens)
//! - Submit through the provider and fire the hash notification
//! - Hand the hash to the confirmation protocol

use alloy::dyn_abi::DynSolValue;
use alloy::json_abi::JsonAbi;
use alloy::primitives::{Address, TxHash, U256};
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::OwnedMutexGuard;

use crate::config::ConfirmationConfig;
use crate::connection::ConnectionStateMachine;
use crate::gas::GasEstimator;
use crate::observability::metrics;
use crate::provider::{CallParams, HashHook, ProviderAdapter, ProviderError, ValueTransfer};
use crate::transaction::confirmation::wait_for_receipt;
use crate::transaction::queue::SubmissionQueue;
use crate::transaction::types::{
    TokenContract, TransactionError, TransactionReceipt, TransactionResult,
};
use crate::units::{self, NATIVE_DECIMALS};

/// Human-readable ERC-20 interface.
const ERC20_SIGNATURES: [&str; 6] = [
    "function balanceOf(address owner) view returns (uint256)",
    "function decimals() view returns (uint8)",
    "function transfer(address to, uint256 amount) returns (bool)",
    "function allowance(address owner, address spender) view returns (uint256)",
    "function approve(address spender, uint256 amount) returns (bool)",
    "function transferFrom(address from, address to, uint256 amount) returns (bool)",
];

/// Standard ERC-20 ABI.
pub fn erc20_abi() -> TransactionResult<JsonAbi> {
    JsonAbi::parse(ERC20_SIGNATURES)
        .map_err(|e| TransactionError::Provider(ProviderError::Abi(e.to_string())))
}

/// Notification fired with `(hash, sender)` once per successful submission.
pub type TransactionHashHook = Arc<dyn Fn(TxHash, Address) + Send + Sync>;

/// Submits payments and waits for their receipts.
pub struct TransactionCoordinator {
    adapter: ProviderAdapter,
    gas: Arc<GasEstimator>,
    connection: Arc<ConnectionStateMachine>,
    config: ConfirmationConfig,
    queue: Option<SubmissionQueue>,
    on_hash: RwLock<Option<TransactionHashHook>>,
}

impl TransactionCoordinator {
    pub fn new(
        adapter: ProviderAdapter,
        gas: Arc<GasEstimator>,
        connection: Arc<ConnectionStateMachine>,
        config: ConfirmationConfig,
    ) -> Self {
        let queue = config.serialize_per_account.then(SubmissionQueue::new);
        Self {
            adapter,
            gas,
            connection,
            config,
            queue,
            on_hash: RwLock::new(None),
        }
    }

    /// Register the hash notification, replacing any earlier one.
    pub fn on_transaction_hash<F>(&self, callback: F)
    where
        F: Fn(TxHash, Address) + Send + Sync + 'static,
    {
        *self.on_hash.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::new(callback));
    }

    /// Send `amount` ether to `recipient` and wait for the receipt.
    pub async fn pay_with_native(
        &self,
        amount: &str,
        recipient: Address,
    ) -> TransactionResult<TransactionReceipt> {
        let value = units::to_base_units_u256(amount, NATIVE_DECIMALS)?;

        let gas_price = self.gas.gas_price_wei().await;
        let from = self.sender().await?;

        let hash = {
            let _turn = self.turn(from).await;
            let transfer = ValueTransfer {
                from,
                to: recipient,
                value,
                gas_price,
            };
            let notify: HashHook<'_> = &|hash: TxHash| self.notify(hash, from);
            let submitted = self.adapter.send_value_transfer(transfer, Some(notify)).await;
            self.record_submission("native", submitted)?
        };

        wait_for_receipt(&self.adapter, hash, &self.config).await
    }

    /// Transfer `amount` tokens of the ERC-20 at `contract` to `recipient`.
    ///
    /// Gas is estimated from the sending account first; an estimation
    /// failure rejects before anything is submitted.
    pub async fn pay_with_token(
        &self,
        abi: &JsonAbi,
        recipient: Address,
        amount: &str,
        contract: Address,
        decimals: u8,
    ) -> TransactionResult<TransactionReceipt> {
        let value = units::to_base_units_u256(amount, decimals)?;
        let call = self.adapter.contract_call(
            abi,
            contract,
            "transfer",
            &[DynSolValue::Address(recipient), DynSolValue::Uint(value, 256)],
        )?;

        let from = self.sender().await?;

        let hash = {
            let _turn = self.turn(from).await;
            let gas = self
                .adapter
                .estimate_gas(&call, from)
                .await
                .map_err(|e| {
                    tracing::warn!(error = %e, contract = %contract, "Gas estimation failed");
                    TransactionError::GasEstimation(e)
                })?;
            let gas_price = self.gas.gas_price_wei().await;

            let notify: HashHook<'_> = &|hash: TxHash| self.notify(hash, from);
            let submitted = self
                .adapter
                .send_contract_call(&call, CallParams { from, gas, gas_price }, Some(notify))
                .await;
            self.record_submission("token", submitted)?
        };

        wait_for_receipt(&self.adapter, hash, &self.config).await
    }

    /// [`pay_with_token`](Self::pay_with_token) for a known token.
    pub async fn pay_token(
        &self,
        token: &TokenContract,
        recipient: Address,
        amount: &str,
    ) -> TransactionResult<TransactionReceipt> {
        self.pay_with_token(&token.abi, recipient, amount, token.address, token.decimals)
            .await
    }

    /// Native balance of `address`, or of the current account when `None`.
    pub async fn native_balance(&self, address: Option<Address>) -> TransactionResult<U256> {
        let address = match address {
            Some(address) => address,
            None => self.sender().await?,
        };
        Ok(self.adapter.balance(address).await?)
    }

    async fn sender(&self) -> TransactionResult<Address> {
        self.connection
            .resolve_account()
            .await
            .ok_or(TransactionError::NoAccount)
    }

    async fn turn(&self, from: Address) -> Option<OwnedMutexGuard<()>> {
        match &self.queue {
            Some(queue) => Some(queue.acquire(from).await),
            None => None,
        }
    }

    fn notify(&self, hash: TxHash, from: Address) {
        tracing::info!(tx_hash = %hash, from = %from, "Transaction submitted");
        let hook = self
            .on_hash
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        if let Some(hook) = hook {
            hook(hash, from);
        }
    }

    fn record_submission(
        &self,
        kind: &'static str,
        submitted: Result<TxHash, ProviderError>,
    ) -> TransactionResult<TxHash> {
        match submitted {
            Ok(hash) => {
                metrics::record_submission(kind, "submitted");
                Ok(hash)
            }
            Err(e) => {
                tracing::warn!(kind, error = %e, "Transaction submission failed");
                metrics::record_submission(kind, "failed");
                Err(TransactionError::Submission(e))
            }
        }
    }
}

impl std::fmt::Debug for TransactionCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransactionCoordinator")
            .field("adapter", &self.adapter)
            .field("config", &self.config)
            .field("serialized", &self.queue.is_some())
            .finish()
    }
}
