//! Indexing backend: auth, token metadata, listings and trade recording.

pub mod client;
pub mod types;

pub use client::HttpBackend;
pub use types::*;

use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value;

/// One method per backend route.
#[async_trait]
pub trait BackendApi: Send + Sync {
    /// `POST /auth/wallet-login`
    async fn wallet_login(&self, wallet_addr: &str) -> Result<WalletLoginResponse>;

    /// `POST /auth/login`
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse>;

    /// `GET /token/get-token/{identifier}`
    async fn get_token(&self, identifier: &str) -> Result<TokenResponse>;

    /// `GET /token/get-token-list?page=&perPage=`
    async fn get_token_list(&self, page: u32, per_page: u32) -> Result<TokenListResponse>;

    /// `POST /transaction/buy-token`
    async fn record_buy(&self, record: &TransactionRecord, auth_token: Option<&str>)
        -> Result<Value>;

    /// `POST /transaction/sell-token`
    async fn record_sell(
        &self,
        record: &TransactionRecord,
        auth_token: Option<&str>,
    ) -> Result<Value>;
}
