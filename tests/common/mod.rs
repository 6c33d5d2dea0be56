//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use alloy::primitives::{Address, TxHash, U256};
use alloy::rpc::types::TransactionRequest;
use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use wallet_bridge::config::{GasPriceSource, WalletConfig};
use wallet_bridge::provider::{ProviderError, ProviderFlags, ProviderReceipt, ProviderResult};
use wallet_bridge::{WalletClient, WalletProvider};

pub const ALICE: Address = Address::repeat_byte(0xa1);
pub const BOB: Address = Address::repeat_byte(0xb0);
pub const TOKEN: Address = Address::repeat_byte(0x70);

/// 20 Gwei, used as the fixed gas price in tests.
pub const GAS_PRICE_WEI: u128 = 20_000_000_000;

/// Config with a fixed gas price so tests never touch the network.
pub fn test_config() -> WalletConfig {
    let mut config = WalletConfig::default();
    config.gas.source = GasPriceSource::Fixed {
        wei: GAS_PRICE_WEI.to_string(),
    };
    config
}

pub fn start_client(provider: &Arc<ScriptedProvider>, config: &WalletConfig) -> WalletClient {
    let provider: Arc<dyn WalletProvider> = provider.clone();
    WalletClient::start(Some(provider), config).unwrap()
}

/// How the scripted provider answers receipt lookups.
#[derive(Debug, Clone)]
pub struct ReceiptPlan {
    /// Polls answered with "not mined" before each hash gets a receipt.
    pub pending_polls: usize,
    /// Raw status placed in the receipt; `None` omits it.
    pub status: Option<Value>,
    /// Never return a receipt.
    pub never_mined: bool,
    /// Fail every lookup.
    pub error: Option<ProviderError>,
}

impl Default for ReceiptPlan {
    fn default() -> Self {
        Self {
            pending_polls: 0,
            status: Some(json!("0x1")),
            never_mined: false,
            error: None,
        }
    }
}

/// Programmable in-memory wallet.
#[derive(Debug)]
pub struct ScriptedProvider {
    flags: ProviderFlags,
    chain_id: Mutex<ProviderResult<u64>>,
    network_delay: Mutex<Option<Duration>>,
    accounts: Mutex<ProviderResult<Vec<Address>>>,
    access: Mutex<ProviderResult<Vec<Address>>>,
    balance: Mutex<U256>,
    estimate: Mutex<ProviderResult<u64>>,
    send_error: Mutex<Option<ProviderError>>,
    receipts: Mutex<ReceiptPlan>,
    receipt_polls: Mutex<HashMap<TxHash, usize>>,

    pub sent: Mutex<Vec<TransactionRequest>>,
    pub network_calls: AtomicUsize,
    pub account_calls: AtomicUsize,
    pub access_calls: AtomicUsize,
    pub receipt_calls: AtomicUsize,
    pub estimate_calls: AtomicUsize,
}

impl ScriptedProvider {
    /// Mainnet wallet with ALICE unlocked.
    pub fn new() -> Self {
        Self {
            flags: ProviderFlags::default(),
            chain_id: Mutex::new(Ok(1)),
            network_delay: Mutex::new(None),
            accounts: Mutex::new(Ok(vec![ALICE])),
            access: Mutex::new(Ok(vec![ALICE])),
            balance: Mutex::new(U256::ZERO),
            estimate: Mutex::new(Ok(60_000)),
            send_error: Mutex::new(None),
            receipts: Mutex::new(ReceiptPlan::default()),
            receipt_polls: Mutex::new(HashMap::new()),
            sent: Mutex::new(Vec::new()),
            network_calls: AtomicUsize::new(0),
            account_calls: AtomicUsize::new(0),
            access_calls: AtomicUsize::new(0),
            receipt_calls: AtomicUsize::new(0),
            estimate_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_flags(mut self, flags: ProviderFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_chain_id(self, chain_id: u64) -> Self {
        *self.chain_id.lock().unwrap() = Ok(chain_id);
        self
    }

    pub fn with_network_error(self) -> Self {
        *self.chain_id.lock().unwrap() = Err(ProviderError::Rpc("network down".into()));
        self
    }

    pub fn with_network_delay(self, delay: Duration) -> Self {
        *self.network_delay.lock().unwrap() = Some(delay);
        self
    }

    pub fn with_accounts(self, accounts: Vec<Address>) -> Self {
        self.set_accounts(accounts);
        self
    }

    pub fn with_access(self, result: ProviderResult<Vec<Address>>) -> Self {
        *self.access.lock().unwrap() = result;
        self
    }

    pub fn with_balance(self, balance: U256) -> Self {
        *self.balance.lock().unwrap() = balance;
        self
    }

    pub fn with_estimate(self, result: ProviderResult<u64>) -> Self {
        *self.estimate.lock().unwrap() = result;
        self
    }

    pub fn with_send_error(self, error: ProviderError) -> Self {
        *self.send_error.lock().unwrap() = Some(error);
        self
    }

    pub fn with_receipts(self, plan: ReceiptPlan) -> Self {
        *self.receipts.lock().unwrap() = plan;
        self
    }

    pub fn set_accounts(&self, accounts: Vec<Address>) {
        *self.accounts.lock().unwrap() = Ok(accounts);
    }

    pub fn fail_accounts(&self) {
        *self.accounts.lock().unwrap() = Err(ProviderError::Rpc("accounts unavailable".into()));
    }

    pub fn sent(&self) -> Vec<TransactionRequest> {
        self.sent.lock().unwrap().clone()
    }

    pub fn calls(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WalletProvider for ScriptedProvider {
    fn flags(&self) -> ProviderFlags {
        self.flags
    }

    async fn network_id(&self) -> ProviderResult<u64> {
        self.network_calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.network_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.chain_id.lock().unwrap().clone()
    }

    async fn accounts(&self) -> ProviderResult<Vec<Address>> {
        self.account_calls.fetch_add(1, Ordering::SeqCst);
        self.accounts.lock().unwrap().clone()
    }

    async fn request_access(&self) -> ProviderResult<Vec<Address>> {
        self.access_calls.fetch_add(1, Ordering::SeqCst);
        self.access.lock().unwrap().clone()
    }

    async fn balance(&self, _address: Address) -> ProviderResult<U256> {
        Ok(*self.balance.lock().unwrap())
    }

    async fn send_transaction(&self, tx: TransactionRequest) -> ProviderResult<TxHash> {
        if let Some(error) = self.send_error.lock().unwrap().clone() {
            return Err(error);
        }
        let mut sent = self.sent.lock().unwrap();
        sent.push(tx);
        let nonce = sent.len() as u64;
        Ok(TxHash::left_padding_from(&nonce.to_be_bytes()))
    }

    async fn transaction_receipt(&self, hash: TxHash) -> ProviderResult<Option<ProviderReceipt>> {
        self.receipt_calls.fetch_add(1, Ordering::SeqCst);
        let plan = self.receipts.lock().unwrap().clone();
        if let Some(error) = plan.error {
            return Err(error);
        }
        if plan.never_mined {
            return Ok(None);
        }

        let mut polls = self.receipt_polls.lock().unwrap();
        let seen = polls.entry(hash).or_insert(0);
        *seen += 1;
        if *seen <= plan.pending_polls {
            return Ok(None);
        }

        let mut receipt = ProviderReceipt::new(hash, Value::Null);
        receipt.status = plan.status;
        receipt.from = Some(ALICE);
        Ok(Some(receipt))
    }

    async fn estimate_gas(&self, _tx: &TransactionRequest) -> ProviderResult<u64> {
        self.estimate_calls.fetch_add(1, Ordering::SeqCst);
        self.estimate.lock().unwrap().clone()
    }
}

/// Start a programmable HTTP server on an ephemeral port.
///
/// Every request is answered with whatever `f` produces.
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        read_request_head(&mut socket).await;

                        let (status, body) = f().await;
                        let status_text = match status {
                            200 => "200 OK",
                            404 => "404 Not Found",
                            429 => "429 Too Many Requests",
                            500 => "500 Internal Server Error",
                            502 => "502 Bad Gateway",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };

                        let response_str = format!(
                            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// Gas oracle answering every request with `(status, body)`, counting hits.
pub async fn start_mock_oracle(status: u16, body: &'static str) -> (String, Arc<AtomicUsize>) {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();
    let addr = start_programmable_backend(move || {
        let counter = counter.clone();
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            (status, body.to_string())
        }
    })
    .await;
    (format!("http://{}/json/ethgasAPI.json", addr), hits)
}

async fn read_request_head(socket: &mut tokio::net::TcpStream) {
    let mut buf = Vec::with_capacity(1024);
    let mut chunk = [0u8; 512];
    loop {
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(n) => {
                buf.extend_from_slice(&chunk[..n]);
                if buf.windows(4).any(|w| w == b"\r\n\r\n") {
                    return;
                }
            }
        }
    }
}
