//! Wallet connection state machine.
//!
//! # Responsibilities
//! - Publish the wallet status and current account as observables
//! - Resolve the network and initial account once, under a startup deadline
//! - Poll the provider for account changes (no push notifications exist)
//! - Stop all background work exactly once on teardown
//!
//! # Design Decisions
//! - One background task per session, cancelled through [`Shutdown`]
//! - Startup runs as a single future so a timeout drops it whole; a late
//!   network answer cannot touch state afterwards
//! - Only the state machine writes the status and account channels

use alloy::primitives::Address;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::config::ConnectionConfig;
use crate::connection::status::{NetworkKind, WalletKind, WalletStatus};
use crate::lifecycle::Shutdown;
use crate::observability::metrics;
use crate::provider::ProviderAdapter;

/// Mutable per-session facts that are not observables.
#[derive(Debug, Default)]
struct Session {
    network: Option<NetworkKind>,
    last_seen: Option<Address>,
}

struct Shared {
    adapter: ProviderAdapter,
    config: ConnectionConfig,
    wallet_kind: Option<WalletKind>,
    status: watch::Sender<WalletStatus>,
    account: watch::Sender<Option<Address>>,
    session: Mutex<Session>,
}

/// Tracks wallet status, network and account for one session.
///
/// Construction with a provider spawns the background task, so it must
/// happen inside a Tokio runtime. Dropping the value tears the session down.
pub struct ConnectionStateMachine {
    shared: Arc<Shared>,
    shutdown: Shutdown,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl ConnectionStateMachine {
    /// A zero account poll interval is replaced by the default one.
    pub fn new(adapter: ProviderAdapter, mut config: ConnectionConfig) -> Self {
        if config.account_poll_interval_ms == 0 {
            let fallback = ConnectionConfig::default().account_poll_interval_ms;
            tracing::warn!(interval_ms = fallback, "Zero account poll interval, using default");
            config.account_poll_interval_ms = fallback;
        }

        let present = adapter.is_present();
        let wallet_kind = present.then(|| WalletKind::classify(adapter.flags()));
        let (status, _) = watch::channel(WalletStatus::Loading);
        let (account, _) = watch::channel(None);

        let shared = Arc::new(Shared {
            adapter,
            config,
            wallet_kind,
            status,
            account,
            session: Mutex::new(Session::default()),
        });
        let shutdown = Shutdown::new();

        let task = if present {
            tracing::info!(wallet_kind = ?wallet_kind, "Wallet provider detected, connecting");
            let mut shutdown_rx = shutdown.subscribe();
            let worker = shared.clone();
            Some(tokio::spawn(async move {
                tokio::select! {
                    _ = worker.run() => {}
                    _ = shutdown_rx.recv() => {
                        tracing::debug!("Connection task received shutdown signal, exiting");
                    }
                }
            }))
        } else {
            tracing::info!("No wallet provider injected");
            shared.transition(WalletStatus::NoProvider);
            None
        };

        Self {
            shared,
            shutdown,
            task: Mutex::new(task),
        }
    }

    pub fn status(&self) -> WalletStatus {
        *self.shared.status.borrow()
    }

    /// Receiver that starts with the current status.
    pub fn subscribe_status(&self) -> watch::Receiver<WalletStatus> {
        self.shared.status.subscribe()
    }

    pub fn account(&self) -> Option<Address> {
        *self.shared.account.borrow()
    }

    /// Receiver that starts with the current account.
    pub fn subscribe_account(&self) -> watch::Receiver<Option<Address>> {
        self.shared.account.subscribe()
    }

    /// Network resolved at startup, if startup got that far.
    pub fn network(&self) -> Option<NetworkKind> {
        self.shared.session().network
    }

    /// Wallet family; `None` without a provider.
    pub fn wallet_kind(&self) -> Option<WalletKind> {
        self.shared.wallet_kind
    }

    /// Last non-empty account seen. Survives the wallet being locked.
    pub fn last_seen_account(&self) -> Option<Address> {
        self.shared.session().last_seen
    }

    /// Whether the startup-and-poll task is still alive.
    pub fn has_background_task(&self) -> bool {
        lock(&self.task)
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }

    /// Last seen account, without waiting.
    ///
    /// While the wallet reports no accounts this also asks the wallet for
    /// access in the background; a grant shows up on the next poll.
    pub fn current_account(&self) -> Option<Address> {
        if self.status() == WalletStatus::NoAccounts {
            self.shared.spawn_access_request();
        }
        self.last_seen_account()
    }

    /// Account to act from, asking the wallet for access when none is available.
    ///
    /// A granted account is published immediately. A rejection falls back to
    /// the last seen account.
    pub async fn resolve_account(&self) -> Option<Address> {
        if self.status() == WalletStatus::NoAccounts {
            match self.shared.adapter.request_access().await {
                Ok(accounts) => match accounts.first().copied() {
                    Some(first) => {
                        self.shared.apply_account(Some(first));
                        return Some(first);
                    }
                    None => tracing::debug!("Access request returned no accounts"),
                },
                Err(e) => tracing::warn!(error = %e, "Account access request failed"),
            }
        }
        self.last_seen_account()
    }

    /// Stop background work. Idempotent; also runs on drop.
    pub fn teardown(&self) {
        if self.shutdown.trigger() {
            tracing::debug!("Tearing down wallet connection");
        }
        lock(&self.task).take();
    }
}

impl Drop for ConnectionStateMachine {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl std::fmt::Debug for ConnectionStateMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionStateMachine")
            .field("status", &self.status())
            .field("account", &self.account())
            .field("network", &self.network())
            .field("wallet_kind", &self.wallet_kind())
            .finish()
    }
}

impl Shared {
    fn session(&self) -> MutexGuard<'_, Session> {
        lock(&self.session)
    }

    async fn run(self: Arc<Self>) {
        let deadline = self.config.startup_timeout_ms;
        let keep_polling = if deadline == 0 {
            self.startup().await
        } else {
            match time::timeout(Duration::from_millis(deadline), self.startup()).await {
                Ok(keep_polling) => keep_polling,
                Err(_) => {
                    tracing::warn!(timeout_ms = deadline, "Wallet startup timed out");
                    self.transition(WalletStatus::UnableToConnect);
                    false
                }
            }
        };

        if keep_polling {
            self.poll_accounts().await;
        }
    }

    /// Network lookup plus initial account resolution.
    ///
    /// Returns whether account polling should follow.
    async fn startup(&self) -> bool {
        let chain_id = match self.adapter.network_id().await {
            Ok(id) => id,
            Err(e) => {
                tracing::error!(error = %e, "Network lookup failed");
                self.transition(WalletStatus::Error);
                return false;
            }
        };

        let network = NetworkKind::from_chain_id(chain_id);
        self.session().network = Some(network);
        tracing::info!(chain_id, network = %network, "Network resolved");

        if let Some(required) = self.config.required_network {
            if network != required {
                tracing::warn!(network = %network, required = %required, "Wallet is on the wrong network");
                self.transition(WalletStatus::WrongNetwork);
                return false;
            }
        }

        match self.adapter.accounts().await {
            Ok(accounts) => {
                match accounts.first().copied() {
                    Some(first) => self.apply_account(Some(first)),
                    None => {
                        self.transition(WalletStatus::NoAccounts);
                        self.spawn_access_request();
                    }
                }
                true
            }
            Err(e) => {
                tracing::error!(error = %e, "Initial account lookup failed");
                self.transition(WalletStatus::Error);
                false
            }
        }
    }

    async fn poll_accounts(&self) {
        let period = Duration::from_millis(self.config.account_poll_interval_ms);
        let mut ticker = time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::debug!(interval_ms = self.config.account_poll_interval_ms, "Account polling started");

        loop {
            ticker.tick().await;
            match self.adapter.accounts().await {
                Ok(accounts) => self.apply_account(accounts.first().copied()),
                Err(e) => tracing::warn!(error = %e, "Account poll failed"),
            }
        }
    }

    /// Publish `next` if it differs from the current account and move the
    /// status to match.
    fn apply_account(&self, next: Option<Address>) {
        let changed = self.account.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });
        if !changed {
            return;
        }

        metrics::record_account_change();
        match next {
            Some(address) => {
                tracing::info!(account = %address, "Active account changed");
                self.session().last_seen = Some(address);
                self.transition(WalletStatus::Connected);
            }
            None => {
                tracing::info!("Wallet locked or no accounts available");
                self.transition(WalletStatus::NoAccounts);
            }
        }
    }

    fn transition(&self, next: WalletStatus) -> bool {
        let mut from = None;
        let applied = self.status.send_if_modified(|current| {
            if current.can_transition_to(next) {
                from = Some(*current);
                *current = next;
                true
            } else {
                if *current != next {
                    tracing::warn!(from = ?*current, to = ?next, "Refusing illegal status transition");
                }
                false
            }
        });

        if let Some(from) = from {
            tracing::info!(from = ?from, to = ?next, "Wallet status changed");
            metrics::record_status_transition(next);
        }
        applied
    }

    fn spawn_access_request(&self) {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::warn!("No async runtime available for account access request");
            return;
        };
        let adapter = self.adapter.clone();
        runtime.spawn(async move {
            match adapter.request_access().await {
                Ok(accounts) => {
                    tracing::debug!(granted = accounts.len(), "Account access request answered")
                }
                Err(e) => tracing::warn!(error = %e, "Account access request failed"),
            }
        });
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
