//! Wallet bridge command line.
//!
//! Starts a session against a JSON-RPC wallet endpoint and runs one command.
//!
//! ```text
//! wallet-bridge --rpc-url http://localhost:8545 status
//! wallet-bridge --config wallet.toml pay-native --to 0x… --amount 0.01
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use alloy::primitives::Address;
use clap::{Parser, Subcommand};

use wallet_bridge::config::{load_config, WalletConfig};
use wallet_bridge::observability::logging::init_logging;
use wallet_bridge::transaction::{erc20_abi, TransactionReceipt};
use wallet_bridge::units::{from_base_units, NATIVE_DECIMALS};
use wallet_bridge::{RpcWalletProvider, WalletClient, WalletProvider, WalletStatus};

#[derive(Parser)]
#[command(name = "wallet-bridge")]
#[command(about = "Connect to a wallet and send payments", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Wallet JSON-RPC endpoint; overrides `provider.rpc_url`.
    #[arg(long)]
    rpc_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show wallet status, network and account
    Status,
    /// Show the native balance of an address (defaults to the current account)
    Balance { address: Option<Address> },
    /// Show the current gas price in wei
    GasPrice,
    /// Send ether
    PayNative {
        #[arg(long)]
        to: Address,
        #[arg(long)]
        amount: String,
    },
    /// Send ERC-20 tokens
    PayToken {
        #[arg(long)]
        to: Address,
        #[arg(long)]
        amount: String,
        #[arg(long)]
        token: Address,
        #[arg(long, default_value_t = 18)]
        decimals: u8,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => WalletConfig::default(),
    };
    if let Some(rpc_url) = cli.rpc_url {
        config.provider.rpc_url = Some(rpc_url);
    }

    init_logging(&config.observability);
    tracing::info!("wallet-bridge v{} starting", env!("CARGO_PKG_VERSION"));

    let provider = RpcWalletProvider::from_config(&config.provider)?
        .map(|p| Arc::new(p) as Arc<dyn WalletProvider>);
    let client = WalletClient::start(provider, &config)?;

    let status = *client
        .connection()
        .subscribe_status()
        .wait_for(|status| *status != WalletStatus::Loading)
        .await?;

    match cli.command {
        Commands::Status => {
            let connection = client.connection();
            println!("status:      {:?} ({})", status, status);
            if let Some(network) = connection.network() {
                println!("network:     {}", network);
            }
            if let Some(kind) = connection.wallet_kind() {
                println!("wallet kind: {:?}", kind);
            }
            match connection.account() {
                Some(account) => println!("account:     {}", account),
                None => println!("account:     none"),
            }
        }
        Commands::Balance { address } => {
            let balance = client.transactions().native_balance(address).await?;
            println!("{} ETH", from_base_units(balance, NATIVE_DECIMALS));
        }
        Commands::GasPrice => {
            println!("{} wei", client.gas().default_gas_price_gwei().await);
        }
        Commands::PayNative { to, amount } => {
            client
                .transactions()
                .on_transaction_hash(|hash, from| println!("submitted {} from {}", hash, from));
            let receipt = client.transactions().pay_with_native(&amount, to).await?;
            print_receipt(&receipt);
        }
        Commands::PayToken {
            to,
            amount,
            token,
            decimals,
        } => {
            client
                .transactions()
                .on_transaction_hash(|hash, from| println!("submitted {} from {}", hash, from));
            let abi = erc20_abi()?;
            let receipt = client
                .transactions()
                .pay_with_token(&abi, to, &amount, token, decimals)
                .await?;
            print_receipt(&receipt);
        }
    }

    client.shutdown();
    tracing::info!("Shutdown complete");
    Ok(())
}

fn print_receipt(receipt: &TransactionReceipt) {
    let outcome = if receipt.status { "success" } else { "reverted" };
    println!("transaction: {}", receipt.transaction_hash);
    println!("outcome:     {}", outcome);
    if let Some(block) = receipt.block_number {
        println!("block:       {}", block);
    }
}
