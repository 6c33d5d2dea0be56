//! Session facade wiring the subsystems together.

use std::sync::Arc;
use thiserror::Error;

use crate::config::{validate_config, ConfigError, WalletConfig};
use crate::connection::ConnectionStateMachine;
use crate::gas::{GasError, GasEstimator};
use crate::provider::{ProviderAdapter, WalletProvider};
use crate::transaction::TransactionCoordinator;

/// Reasons a session could not start.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("Gas estimator setup failed: {0}")]
    Gas(#[from] GasError),
}

pub type ClientResult<T> = Result<T, ClientError>;

/// One wallet session.
///
/// Dropping the client (and every clone of [`WalletClient::connection`])
/// stops the background account poll.
#[derive(Debug)]
pub struct WalletClient {
    adapter: ProviderAdapter,
    gas: Arc<GasEstimator>,
    connection: Arc<ConnectionStateMachine>,
    transactions: TransactionCoordinator,
}

impl WalletClient {
    /// Start a session. Must be called inside a Tokio runtime.
    ///
    /// The configuration is validated first, so one built in code gets the
    /// same checks as one loaded from disk.
    pub fn start(
        provider: Option<Arc<dyn WalletProvider>>,
        config: &WalletConfig,
    ) -> ClientResult<Self> {
        validate_config(config).map_err(ConfigError::Validation)?;

        let adapter = ProviderAdapter::new(provider);
        let gas = Arc::new(GasEstimator::new(config.gas.clone())?);
        let connection = Arc::new(ConnectionStateMachine::new(
            adapter.clone(),
            config.connection.clone(),
        ));
        let transactions = TransactionCoordinator::new(
            adapter.clone(),
            gas.clone(),
            connection.clone(),
            config.confirmation.clone(),
        );

        Ok(Self {
            adapter,
            gas,
            connection,
            transactions,
        })
    }

    pub fn connection(&self) -> &Arc<ConnectionStateMachine> {
        &self.connection
    }

    pub fn transactions(&self) -> &TransactionCoordinator {
        &self.transactions
    }

    pub fn gas(&self) -> &Arc<GasEstimator> {
        &self.gas
    }

    pub fn adapter(&self) -> &ProviderAdapter {
        &self.adapter
    }

    /// Stop the session's background work now instead of on drop.
    pub fn shutdown(&self) {
        self.connection.teardown();
    }
}
