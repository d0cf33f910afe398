use crate::api::types::*;
use crate::api::BackendApi;
use crate::error::{Result, SdkError};
use crate::utils::log_timed;
use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

/// reqwest-backed [`BackendApi`]. No request timeout is set beyond the transport's own.
pub struct HttpBackend {
    client: Client,
    base_url: Url,
}

impl HttpBackend {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(SdkError::Config(format!("API URL cannot be a base: {}", base_url)));
        }
        Ok(Self {
            client: Client::new(),
            base_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Appends path segments to the base URL, percent-encoding each one.
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    pub fn token_list_url(&self, page: u32, per_page: u32) -> Url {
        let mut url = self.endpoint(&["token", "get-token-list"]);
        url.query_pairs_mut()
            .append_pair("page", &page.to_string())
            .append_pair("perPage", &per_page.to_string());
        url
    }

    async fn send<T: DeserializeOwned>(&self, label: &str, request: RequestBuilder) -> Result<T> {
        let response = log_timed(label, request.send())
            .await
            .map_err(|e| SdkError::Network(format!("{} failed: {}", label, e)))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            warn!("{} returned {}: {}", label, status, text);
            return Err(SdkError::api(status.as_u16(), text));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| SdkError::Parse(format!("Failed to decode {} response: {}", label, e)))
    }

    async fn record(
        &self,
        route: &str,
        record: &TransactionRecord,
        auth_token: Option<&str>,
    ) -> Result<Value> {
        let mut request = self
            .client
            .post(self.endpoint(&["transaction", route]))
            .json(record);
        if let Some(token) = auth_token {
            request = request.bearer_auth(token);
        }
        debug!("Recording {} for {}", route, record.txn_hash);
        self.send(route, request).await
    }
}

#[async_trait]
impl BackendApi for HttpBackend {
    async fn wallet_login(&self, wallet_addr: &str) -> Result<WalletLoginResponse> {
        let body = WalletLoginRequest {
            wallet_addr: wallet_addr.to_string(),
        };
        let request = self
            .client
            .post(self.endpoint(&["auth", "wallet-login"]))
            .json(&body);
        self.send("wallet-login", request).await
    }

    async fn login(&self, body: &LoginRequest) -> Result<LoginResponse> {
        let request = self.client.post(self.endpoint(&["auth", "login"])).json(body);
        self.send("login", request).await
    }

    async fn get_token(&self, identifier: &str) -> Result<TokenResponse> {
        let request = self
            .client
            .get(self.endpoint(&["token", "get-token", identifier]));
        self.send("get-token", request).await
    }

    async fn get_token_list(&self, page: u32, per_page: u32) -> Result<TokenListResponse> {
        let request = self.client.get(self.token_list_url(page, per_page));
        self.send("get-token-list", request).await
    }

    async fn record_buy(
        &self,
        record: &TransactionRecord,
        auth_token: Option<&str>,
    ) -> Result<Value> {
        self.record("buy-token", record, auth_token).await
    }

    async fn record_sell(
        &self,
        record: &TransactionRecord,
        auth_token: Option<&str>,
    ) -> Result<Value> {
        self.record("sell-token", record, auth_token).await
    }
}
