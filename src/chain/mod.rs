//! Chain boundary: the capabilities the SDK needs from a blockchain client and a wallet.
//!
//! `ChainClient` and `Signer` are the only seams through which the SDK touches the
//! network or key material. `AptosRestClient` and `LocalSigner` are the concrete
//! adapters; tests substitute in-memory implementations.

pub mod aptos;
pub mod signer;

pub use aptos::AptosRestClient;
pub use signer::LocalSigner;

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Transaction kinds that mean the transaction has left the mempool.
pub const CONFIRMED_TRANSACTION_KINDS: &[&str] = &[
    "user_transaction",
    "block_metadata_transaction",
    "state_checkpoint_transaction",
    "genesis_transaction",
    "block_epilogue_transaction",
    "validator_transaction",
];

pub fn is_confirmed_kind(kind: &str) -> bool {
    CONFIRMED_TRANSACTION_KINDS.contains(&kind)
}

/// An on-chain resource as returned by the node.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Resource {
    #[serde(rename = "type")]
    pub resource_type: String,
    pub data: Value,
}

/// Entry function call, in the JSON shape the node accepts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EntryFunctionPayload {
    #[serde(rename = "type")]
    pub payload_type: String,
    pub function: String,
    pub type_arguments: Vec<String>,
    /// u64 arguments travel as decimal strings.
    pub arguments: Vec<String>,
}

impl EntryFunctionPayload {
    pub fn new(function: String, type_arguments: Vec<String>, arguments: Vec<String>) -> Self {
        Self {
            payload_type: "entry_function_payload".to_string(),
            function,
            type_arguments,
            arguments,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PendingTransaction {
    pub hash: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChainEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub data: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CommittedTransaction {
    pub hash: String,
    pub kind: String,
    pub success: bool,
    pub vm_status: String,
    /// Block timestamp in microseconds, when the node reports one.
    pub timestamp_us: Option<u64>,
    pub events: Vec<ChainEvent>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TransactionStatus {
    Pending,
    Committed(CommittedTransaction),
}

/// Wallet capability: an account address, its public key, and message signing.
pub trait Signer: Send + Sync {
    fn address(&self) -> &str;

    /// 0x-prefixed hex public key.
    fn public_key(&self) -> String;

    /// Signs raw bytes, returning a 0x-prefixed hex signature.
    fn sign(&self, message: &[u8]) -> Result<String>;
}

/// Blockchain client capability used by the SDK.
#[async_trait]
pub trait ChainClient: Send + Sync {
    async fn get_resource(&self, address: &str, resource_type: &str) -> Result<Resource>;

    /// Builds, signs with `signer`, and submits a transaction for `payload`.
    async fn submit_transaction(
        &self,
        signer: &dyn Signer,
        payload: &EntryFunctionPayload,
    ) -> Result<PendingTransaction>;

    async fn get_transaction_by_hash(&self, hash: &str) -> Result<TransactionStatus>;
}
