//! Request and response bodies of the indexing backend.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WalletLoginRequest {
    pub wallet_addr: String,
}

/// Challenge to be signed as `message + nonce`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WalletLoginResponse {
    pub message: String,
    pub nonce: String,
}

impl WalletLoginResponse {
    pub fn full_message(&self) -> String {
        format!("{}{}", self.message, self.nonce)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub wallet_addr: String,
    pub public_key: String,
    pub signature: String,
    pub full_message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AuthToken {
    pub token: String,
    /// RFC 3339 string or epoch milliseconds, depending on backend version.
    #[serde(default)]
    pub expires_at: Option<Value>,
}

impl AuthToken {
    pub fn expires_at_utc(&self) -> Option<DateTime<Utc>> {
        match self.expires_at.as_ref()? {
            Value::String(s) => DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|dt| dt.with_timezone(&Utc)),
            Value::Number(n) => n
                .as_i64()
                .and_then(|ms| Utc.timestamp_millis_opt(ms).single()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoginResponse {
    pub token: AuthToken,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct TokenData {
    pub name: String,
    pub ticker_symbol: String,
    pub creator: String,
    pub mint_addr: String,
    pub desc: String,
    pub image: String,
    pub creator_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    #[serde(default)]
    pub ret: Value,
    pub token_data: TokenData,
}

/// One row of the token list; fields beyond the metadata are passed through.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TokenListing {
    #[serde(flatten)]
    pub token: TokenData,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PaginatedResult {
    #[serde(default)]
    pub results: Vec<TokenListing>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TokenListResponse {
    #[serde(default)]
    pub ret: Value,
    #[serde(default)]
    pub paginated_result: PaginatedResult,
}

/// Audit record of a completed trade. Amounts are on-chain units as decimal strings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    pub txn_hash: String,
    pub token_mint_addr: String,
    pub x_amt: String,
    pub y_amt: String,
    pub timestamp: String,
}

impl TransactionRecord {
    /// Record with zero amounts, used when no swap event is available.
    pub fn optimistic(txn_hash: &str, token_mint_addr: &str, timestamp: DateTime<Utc>) -> Self {
        Self {
            txn_hash: txn_hash.to_string(),
            token_mint_addr: token_mint_addr.to_string(),
            x_amt: "0".to_string(),
            y_amt: "0".to_string(),
            timestamp: timestamp.to_rfc3339(),
        }
    }
}
