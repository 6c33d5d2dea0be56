//! Wallet status, network and wallet-kind definitions.

use serde::{Deserialize, Serialize};

use crate::provider::ProviderFlags;

/// Connection status of the wallet session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WalletStatus {
    Loading,
    NoProvider,
    NoAccounts,
    WrongNetwork,
    UnableToConnect,
    Error,
    Connected,
}

impl WalletStatus {
    /// Statuses the session can never leave.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            WalletStatus::NoProvider
                | WalletStatus::WrongNetwork
                | WalletStatus::UnableToConnect
                | WalletStatus::Error
        )
    }

    /// Whether moving from `self` to `next` is allowed.
    ///
    /// `Loading` may go anywhere, `NoAccounts` and `Connected` may swap, and
    /// terminal statuses stay put. Same-to-same is not a transition.
    pub fn can_transition_to(self, next: WalletStatus) -> bool {
        match (self, next) {
            (from, to) if from == to => false,
            (WalletStatus::Loading, _) => true,
            (WalletStatus::NoAccounts, WalletStatus::Connected)
            | (WalletStatus::Connected, WalletStatus::NoAccounts) => true,
            _ => false,
        }
    }

    /// Short machine-readable name, used as a metrics label.
    pub fn label(self) -> &'static str {
        match self {
            WalletStatus::Loading => "loading",
            WalletStatus::NoProvider => "no_provider",
            WalletStatus::NoAccounts => "no_accounts",
            WalletStatus::WrongNetwork => "wrong_network",
            WalletStatus::UnableToConnect => "unable_to_connect",
            WalletStatus::Error => "error",
            WalletStatus::Connected => "connected",
        }
    }
}

impl std::fmt::Display for WalletStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            WalletStatus::Loading => "Wallet loading is in progress",
            WalletStatus::UnableToConnect => "Unable to connect to the selected network.",
            WalletStatus::NoProvider => "Wallet is not connected.",
            WalletStatus::NoAccounts => "Your wallet is locked or there are no accounts available.",
            WalletStatus::WrongNetwork => "Your wallet is connected to the wrong Network.",
            WalletStatus::Error => "Something went wrong when connecting to your wallet",
            WalletStatus::Connected => "Successfully connected to your wallet",
        };
        f.write_str(text)
    }
}

/// Network the wallet is connected to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkKind {
    Main,
    Ropsten,
    Rinkeby,
    Localhost,
    Unknown,
}

impl NetworkKind {
    pub fn from_chain_id(chain_id: u64) -> Self {
        match chain_id {
            1 => NetworkKind::Main,
            3 => NetworkKind::Ropsten,
            4 => NetworkKind::Rinkeby,
            1337 | 31337 => NetworkKind::Localhost,
            _ => NetworkKind::Unknown,
        }
    }
}

impl std::fmt::Display for NetworkKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            NetworkKind::Main => "Mainnet",
            NetworkKind::Ropsten => "Ropsten",
            NetworkKind::Rinkeby => "Rinkeby",
            NetworkKind::Localhost => "Localhost",
            NetworkKind::Unknown => "Unknown",
        };
        f.write_str(name)
    }
}

/// Wallet family, detected from the provider's feature flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WalletKind {
    MetaMaskLike,
    TrustLike,
    Unidentified,
}

impl WalletKind {
    /// MetaMask wins when a provider advertises both flags.
    pub fn classify(flags: ProviderFlags) -> Self {
        if flags.is_metamask {
            WalletKind::MetaMaskLike
        } else if flags.is_trust {
            WalletKind::TrustLike
        } else {
            WalletKind::Unidentified
        }
    }
}
