//! In-memory chain and backend doubles with call counters.

#![allow(dead_code)]

use async_trait::async_trait;
use bonding_curve_sdk::api::{
    BackendApi, LoginRequest, LoginResponse, TokenListResponse, TokenResponse, TransactionRecord,
    WalletLoginResponse,
};
use bonding_curve_sdk::chain::{
    ChainClient, ChainEvent, CommittedTransaction, EntryFunctionPayload, PendingTransaction,
    Resource, Signer, TransactionStatus,
};
use bonding_curve_sdk::{LocalSigner, SdkConfig, SdkError};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

pub const CONTRACT: &str = "0xc0de";
pub const TOKEN: &str = "0xabc::pepe::PEPE";
pub const TX_HASH: &str = "0xbeef";

pub fn signer() -> LocalSigner {
    LocalSigner::from_hex(&"11".repeat(32), "0xa11ce").unwrap()
}

pub fn config() -> SdkConfig {
    SdkConfig::default()
        .with_api_base_url("http://backend.test/api")
        .with_contract_address(CONTRACT)
        .with_polling(100, 10)
}

pub fn swap_event(x_in: u64, y_in: u64, x_out: u64, y_out: u64) -> ChainEvent {
    ChainEvent {
        event_type: format!("{}::bonding::SwapEvent", CONTRACT),
        data: json!({
            "x_in": x_in.to_string(),
            "y_in": y_in.to_string(),
            "x_out": x_out.to_string(),
            "y_out": y_out.to_string(),
        }),
    }
}

pub fn committed(events: Vec<ChainEvent>) -> CommittedTransaction {
    CommittedTransaction {
        hash: TX_HASH.to_string(),
        kind: "user_transaction".to_string(),
        success: true,
        vm_status: "Executed successfully".to_string(),
        timestamp_us: Some(1_700_000_000_000_000),
        events,
    }
}

pub struct MockChain {
    /// `None` makes resource reads fail.
    pub pool: Option<Value>,
    /// `None` keeps every lookup pending.
    pub committed: Option<CommittedTransaction>,
    pub resource_calls: AtomicUsize,
    pub submit_calls: AtomicUsize,
    pub lookup_calls: AtomicUsize,
    pub last_resource_type: Mutex<Option<String>>,
    pub last_payload: Mutex<Option<EntryFunctionPayload>>,
}

impl MockChain {
    pub fn with_pool(reserve_x: u64, reserve_y: u64) -> Self {
        Self {
            pool: Some(json!({
                "reserve_x": reserve_x.to_string(),
                "reserve_y": reserve_y.to_string(),
            })),
            committed: None,
            resource_calls: AtomicUsize::new(0),
            submit_calls: AtomicUsize::new(0),
            lookup_calls: AtomicUsize::new(0),
            last_resource_type: Mutex::new(None),
            last_payload: Mutex::new(None),
        }
    }

    pub fn without_pool() -> Self {
        Self {
            pool: None,
            ..Self::with_pool(0, 0)
        }
    }

    pub fn committing(mut self, tx: CommittedTransaction) -> Self {
        self.committed = Some(tx);
        self
    }

    pub fn submits(&self) -> usize {
        self.submit_calls.load(Ordering::SeqCst)
    }

    pub fn lookups(&self) -> usize {
        self.lookup_calls.load(Ordering::SeqCst)
    }

    pub fn resource_reads(&self) -> usize {
        self.resource_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChainClient for MockChain {
    async fn get_resource(&self, _address: &str, resource_type: &str) -> Result<Resource, SdkError> {
        self.resource_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_resource_type.lock().unwrap() = Some(resource_type.to_string());
        match &self.pool {
            Some(data) => Ok(Resource {
                resource_type: resource_type.to_string(),
                data: data.clone(),
            }),
            None => Err(SdkError::Chain(format!("resource {} not found", resource_type))),
        }
    }

    async fn submit_transaction(
        &self,
        _signer: &dyn Signer,
        payload: &EntryFunctionPayload,
    ) -> Result<PendingTransaction, SdkError> {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_payload.lock().unwrap() = Some(payload.clone());
        Ok(PendingTransaction {
            hash: TX_HASH.to_string(),
        })
    }

    async fn get_transaction_by_hash(&self, _hash: &str) -> Result<TransactionStatus, SdkError> {
        self.lookup_calls.fetch_add(1, Ordering::SeqCst);
        Ok(match &self.committed {
            Some(tx) => TransactionStatus::Committed(tx.clone()),
            None => TransactionStatus::Pending,
        })
    }
}

pub struct MockBackend {
    pub token: String,
    pub fail_listings: bool,
    pub fail_records: bool,
    pub get_token_status: Option<u16>,
    pub record_calls: AtomicUsize,
    pub login_calls: AtomicUsize,
    pub last_login: Mutex<Option<LoginRequest>>,
    pub last_record: Mutex<Option<(TransactionRecord, Option<String>)>>,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self {
            token: "session-token".to_string(),
            fail_listings: false,
            fail_records: false,
            get_token_status: None,
            record_calls: AtomicUsize::new(0),
            login_calls: AtomicUsize::new(0),
            last_login: Mutex::new(None),
            last_record: Mutex::new(None),
        }
    }
}

impl MockBackend {
    pub fn records(&self) -> usize {
        self.record_calls.load(Ordering::SeqCst)
    }

    fn capture(&self, record: &TransactionRecord, auth_token: Option<&str>) -> Result<Value, SdkError> {
        self.record_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_record.lock().unwrap() = Some((record.clone(), auth_token.map(str::to_string)));
        if self.fail_records {
            return Err(SdkError::api(500, "record store unavailable"));
        }
        Ok(json!({"ret": 0}))
    }
}

#[async_trait]
impl BackendApi for MockBackend {
    async fn wallet_login(&self, _wallet_addr: &str) -> Result<WalletLoginResponse, SdkError> {
        Ok(WalletLoginResponse {
            message: "Sign in to the market. Nonce: ".to_string(),
            nonce: "7".to_string(),
        })
    }

    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, SdkError> {
        self.login_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_login.lock().unwrap() = Some(request.clone());
        Ok(serde_json::from_value(json!({"token": {"token": self.token}}))?)
    }

    async fn get_token(&self, identifier: &str) -> Result<TokenResponse, SdkError> {
        if let Some(status) = self.get_token_status {
            return Err(SdkError::api(status, "rejected"));
        }
        Ok(serde_json::from_value(json!({
            "ret": 0,
            "tokenData": {
                "name": "Pepe",
                "tickerSymbol": "PEPE",
                "mintAddr": identifier,
            }
        }))?)
    }

    async fn get_token_list(&self, _page: u32, _per_page: u32) -> Result<TokenListResponse, SdkError> {
        if self.fail_listings {
            return Err(SdkError::Network("connection refused".to_string()));
        }
        Ok(serde_json::from_value(json!({
            "ret": 0,
            "paginatedResult": {
                "results": [
                    {"name": "Pepe", "tickerSymbol": "PEPE", "marketCap": 12.5},
                    {"name": "Doge", "tickerSymbol": "DOGE"}
                ]
            }
        }))?)
    }

    async fn record_buy(&self, record: &TransactionRecord, auth_token: Option<&str>) -> Result<Value, SdkError> {
        self.capture(record, auth_token)
    }

    async fn record_sell(&self, record: &TransactionRecord, auth_token: Option<&str>) -> Result<Value, SdkError> {
        self.capture(record, auth_token)
    }
}

/// Answers a single HTTP request with `status_line` and `body`, then closes.
/// The handle resolves to the raw request text.
pub async fn serve_once(status_line: &str, body: &str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let response = format!(
        "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
        status_line,
        body.len(),
        body
    );
    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let request = read_request(&mut socket).await;
        socket.write_all(response.as_bytes()).await.unwrap();
        let _ = socket.shutdown().await;
        request
    });
    (format!("http://{}", addr), handle)
}

/// Address nothing is listening on.
pub async fn closed_address() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

async fn read_request(socket: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            let headers = String::from_utf8_lossy(&buf[..end]).to_lowercase();
            let body_len = headers
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= end + 4 + body_len {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}
