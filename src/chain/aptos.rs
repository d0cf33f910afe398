//! Aptos node REST adapter for [`ChainClient`].
//!
//! Transactions are built as JSON, turned into a signing message by the node's
//! `encode_submission` endpoint, signed locally, and submitted with an
//! `ed25519_signature` authenticator.

use crate::chain::signer::strip_hex_prefix;
use crate::chain::{
    is_confirmed_kind, ChainClient, ChainEvent, CommittedTransaction, EntryFunctionPayload,
    PendingTransaction, Resource, Signer, TransactionStatus,
};
use crate::config::SdkConfig;
use crate::error::{Result, SdkError};
use anyhow::Context;
use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::{Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use url::Url;

/// Gas and expiry settings applied to every submitted transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AptosTxOptions {
    pub max_gas_amount: u64,
    pub gas_unit_price: u64,
    pub expiration_secs: u64,
}

impl Default for AptosTxOptions {
    fn default() -> Self {
        Self {
            max_gas_amount: 200_000,
            gas_unit_price: 100,
            expiration_secs: 600,
        }
    }
}

#[derive(Debug, Deserialize)]
struct AccountData {
    sequence_number: String,
}

#[derive(Debug, Clone, Serialize)]
struct UserTransactionRequest<'a> {
    sender: &'a str,
    sequence_number: String,
    max_gas_amount: String,
    gas_unit_price: String,
    expiration_timestamp_secs: String,
    payload: &'a EntryFunctionPayload,
}

#[derive(Debug, Serialize)]
struct TransactionSignature {
    #[serde(rename = "type")]
    signature_type: &'static str,
    public_key: String,
    signature: String,
}

#[derive(Debug, Serialize)]
struct SubmitTransactionRequest<'a> {
    #[serde(flatten)]
    request: UserTransactionRequest<'a>,
    signature: TransactionSignature,
}

pub struct AptosRestClient {
    client: Client,
    node_url: Url,
    options: AptosTxOptions,
}

impl AptosRestClient {
    pub fn new(node_url: &str, options: AptosTxOptions) -> Result<Self> {
        let node_url = Url::parse(node_url)?;
        if node_url.cannot_be_a_base() {
            return Err(SdkError::Config(format!("Node URL cannot be a base: {}", node_url)));
        }
        info!("Aptos REST client targeting {}", node_url);
        Ok(Self {
            client: Client::new(),
            node_url,
            options,
        })
    }

    pub fn from_config(config: &SdkConfig) -> Result<Self> {
        Self::new(
            &config.node_url,
            AptosTxOptions {
                max_gas_amount: config.max_gas_amount,
                gas_unit_price: config.gas_unit_price,
                expiration_secs: config.tx_expiration_secs,
            },
        )
    }

    /// Appends path segments to the node URL, percent-encoding each one.
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.node_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// GETs JSON, mapping 404 to `None`.
    async fn get_optional<T: DeserializeOwned>(&self, url: Url) -> Result<Option<T>> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("GET {} failed", url))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let body = check_status(&url, response)
            .await?
            .json::<T>()
            .await
            .with_context(|| format!("Failed to decode response from {}", url))?;
        Ok(Some(body))
    }

    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<T> {
        let response = self
            .client
            .post(url.clone())
            .json(body)
            .send()
            .await
            .with_context(|| format!("POST {} failed", url))?;

        let decoded = check_status(&url, response)
            .await?
            .json::<T>()
            .await
            .with_context(|| format!("Failed to decode response from {}", url))?;
        Ok(decoded)
    }

    pub async fn get_sequence_number(&self, address: &str) -> Result<u64> {
        let url = self.endpoint(&["accounts", address]);
        let account: AccountData = self
            .get_optional(url)
            .await?
            .ok_or_else(|| SdkError::Chain(format!("Account {} not found", address)))?;
        account
            .sequence_number
            .parse::<u64>()
            .map_err(|e| SdkError::Parse(format!("Invalid sequence number for {}: {}", address, e)))
    }
}

#[async_trait]
impl ChainClient for AptosRestClient {
    async fn get_resource(&self, address: &str, resource_type: &str) -> Result<Resource> {
        let url = self.endpoint(&["accounts", address, "resource", resource_type]);
        debug!("Fetching resource {} at {}", resource_type, address);
        self.get_optional::<Resource>(url)
            .await?
            .ok_or_else(|| {
                SdkError::Chain(format!("Resource {} not found at {}", resource_type, address))
            })
    }

    async fn submit_transaction(
        &self,
        signer: &dyn Signer,
        payload: &EntryFunctionPayload,
    ) -> Result<PendingTransaction> {
        let sequence_number = self.get_sequence_number(signer.address()).await?;
        let expiration = chrono::Utc::now().timestamp().max(0) as u64 + self.options.expiration_secs;

        let request = UserTransactionRequest {
            sender: signer.address(),
            sequence_number: sequence_number.to_string(),
            max_gas_amount: self.options.max_gas_amount.to_string(),
            gas_unit_price: self.options.gas_unit_price.to_string(),
            expiration_timestamp_secs: expiration.to_string(),
            payload,
        };

        let signing_message: String = self
            .post_json(self.endpoint(&["transactions", "encode_submission"]), &request)
            .await?;
        let message_bytes = hex::decode(strip_hex_prefix(&signing_message))
            .map_err(|e| SdkError::Parse(format!("Invalid signing message from node: {}", e)))?;

        let signature = signer.sign(&message_bytes)?;
        let submission = SubmitTransactionRequest {
            request,
            signature: TransactionSignature {
                signature_type: "ed25519_signature",
                public_key: signer.public_key(),
                signature,
            },
        };

        let pending: PendingTransaction = self
            .post_json(self.endpoint(&["transactions"]), &submission)
            .await?;
        info!("Submitted {} from {}: {}", payload.function, signer.address(), pending.hash);
        Ok(pending)
    }

    async fn get_transaction_by_hash(&self, hash: &str) -> Result<TransactionStatus> {
        let url = self.endpoint(&["transactions", "by_hash", hash]);
        match self.get_optional::<Value>(url).await? {
            None => Ok(TransactionStatus::Pending),
            Some(body) => parse_transaction_status(hash, &body),
        }
    }
}

/// Non-2xx node answers keep their status so callers can branch on it (e.g. 429).
async fn check_status(url: &Url, response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let text = response.text().await.unwrap_or_default();
    warn!("Node error {} from {}: {}", status, url, text);
    Err(SdkError::api(status.as_u16(), text))
}

/// Interprets a node transaction body.
pub fn parse_transaction_status(hash: &str, body: &Value) -> Result<TransactionStatus> {
    let kind = body.get("type").and_then(Value::as_str).unwrap_or_default();
    if !is_confirmed_kind(kind) {
        if kind != "pending_transaction" {
            warn!("Unrecognized transaction type '{}' for {}", kind, hash);
        }
        return Ok(TransactionStatus::Pending);
    }

    let events = match body.get("events") {
        Some(events) => serde_json::from_value::<Vec<ChainEvent>>(events.clone())?,
        None => Vec::new(),
    };

    Ok(TransactionStatus::Committed(CommittedTransaction {
        hash: body
            .get("hash")
            .and_then(Value::as_str)
            .unwrap_or(hash)
            .to_string(),
        kind: kind.to_string(),
        success: body.get("success").and_then(Value::as_bool).unwrap_or(false),
        vm_status: body
            .get("vm_status")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        timestamp_us: body
            .get("timestamp")
            .and_then(Value::as_str)
            .and_then(|ts| ts.parse().ok()),
        events,
    }))
}
