//! `CurveSdk`: one configured client with its own auth session.

use crate::api::{BackendApi, HttpBackend, LoginRequest, TokenData, TokenListing, TransactionRecord, WalletLoginResponse};
use crate::auth::{self, AuthSession};
use crate::chain::{AptosRestClient, ChainClient, CommittedTransaction, Signer};
use crate::config::{self, SdkConfig};
use crate::error::Result;
use crate::execution::{self, RecordingContext, TradeOutcome, TradeSide};
use crate::pool::{self, PoolState};
use crate::pricing::params::{self, BuyRequest, SellRequest, TransactionParameters};
use crate::pricing::{self, TradePreview};
use crate::token::TokenIdentifier;
use crate::utils::Timer;
use log::{info, warn};
use serde_json::Value;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

/// Backend metadata joined with what the identifier itself says.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenInfo {
    pub identifier: TokenIdentifier,
    pub ticker: String,
    pub metadata: TokenData,
}

/// Calls within one flow run sequentially. The session is the only shared
/// mutable state; concurrent logins on one instance simply overwrite each other.
pub struct CurveSdk {
    config: SdkConfig,
    chain: Arc<dyn ChainClient>,
    backend: Arc<dyn BackendApi>,
    session: RwLock<AuthSession>,
}

impl CurveSdk {
    pub fn new(config: SdkConfig, chain: Arc<dyn ChainClient>, backend: Arc<dyn BackendApi>) -> Self {
        let session = AuthSession::new(config.auth_token.clone());
        Self {
            config,
            chain,
            backend,
            session: RwLock::new(session),
        }
    }

    /// Validates `config` and wires the HTTP backend and Aptos node adapter.
    pub fn from_config(config: SdkConfig) -> Result<Self> {
        config.validate()?;
        let backend = Arc::new(HttpBackend::new(&config.api_base_url)?);
        let chain = Arc::new(AptosRestClient::from_config(&config)?);
        info!("SDK ready (api={}, contract={})", config.api_base_url, config.contract_address);
        Ok(Self::new(config, chain, backend))
    }

    /// Builds from `.env` and the process environment.
    pub fn from_env() -> Result<Self> {
        let config = config::load_config()?;
        Self::from_config(config.as_ref().clone())
    }

    pub fn config(&self) -> &SdkConfig {
        &self.config
    }

    fn session(&self) -> RwLockReadGuard<'_, AuthSession> {
        self.session.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn session_mut(&self) -> RwLockWriteGuard<'_, AuthSession> {
        self.session.write().unwrap_or_else(PoisonError::into_inner)
    }

    // ---- Tokens ----

    pub async fn get_token_info(&self, identifier: &str) -> Result<TokenInfo> {
        let id = TokenIdentifier::parse(identifier)?;
        let response = self.backend.get_token(identifier).await?;
        Ok(TokenInfo {
            ticker: id.ticker().to_string(),
            identifier: id,
            metadata: response.token_data,
        })
    }

    /// Listing failures degrade to an empty page.
    pub async fn get_token_listings(&self, page: u32, per_page: u32) -> Vec<TokenListing> {
        match self.backend.get_token_list(page, per_page).await {
            Ok(response) => response.paginated_result.results,
            Err(e) => {
                warn!("Token listing page {} failed: {}", page, e);
                Vec::new()
            }
        }
    }

    /// Spot price in APT per token.
    pub async fn get_token_price(&self, identifier: &str) -> Result<f64> {
        let state = self.get_pool_state(identifier).await?;
        pricing::spot_price(&state)
    }

    // ---- Pricing ----

    pub async fn get_pool_state(&self, identifier: &str) -> Result<PoolState> {
        pool::fetch_pool_state(self.chain.as_ref(), &self.config.contract_address, identifier).await
    }

    pub async fn preview_buy(&self, identifier: &str, apt_amount: f64, slippage: f64) -> Result<TradePreview> {
        let token = TokenIdentifier::parse(identifier)?;
        let state = self.get_pool_state(identifier).await?;
        pricing::preview_buy(&state, &token, apt_amount, slippage)
    }

    pub async fn preview_sell(&self, identifier: &str, token_amount: f64, slippage: f64) -> Result<TradePreview> {
        let token = TokenIdentifier::parse(identifier)?;
        let state = self.get_pool_state(identifier).await?;
        pricing::preview_sell(&state, &token, token_amount, slippage)
    }

    /// Reads pool state afresh; previews are advisory, these parameters are what gets sent.
    pub async fn get_buy_parameters(&self, request: &BuyRequest) -> Result<TransactionParameters> {
        let state = self.get_pool_state(&request.token_identifier).await?;
        params::buy_parameters(&self.config.contract_address, &state, request)
    }

    pub async fn get_sell_parameters(&self, request: &SellRequest) -> Result<TransactionParameters> {
        let state = self.get_pool_state(&request.token_identifier).await?;
        params::sell_parameters(&self.config.contract_address, &state, request)
    }

    // ---- Auth ----

    pub async fn wallet_login(&self, wallet_addr: &str) -> Result<WalletLoginResponse> {
        self.backend.wallet_login(wallet_addr).await
    }

    /// Completes login and stores the returned token.
    pub async fn login(&self, request: &LoginRequest) -> Result<String> {
        let response = self.backend.login(request).await?;
        self.session_mut().set(&response.token);
        Ok(response.token.token)
    }

    /// Challenge, sign and login in one call.
    pub async fn authenticate(&self, signer: &dyn Signer) -> Result<String> {
        let token = auth::authenticate(self.backend.as_ref(), signer).await?;
        self.session_mut().set(&token);
        Ok(token.token)
    }

    pub fn is_authenticated(&self) -> bool {
        self.session().is_authenticated()
    }

    pub fn auth_token(&self) -> Option<String> {
        self.session().token().map(str::to_string)
    }

    pub fn set_auth_token(&self, token: impl Into<String>) {
        self.session_mut().set_token(token);
    }

    pub fn logout(&self) {
        self.session_mut().clear();
    }

    fn require_token(&self, operation: &str) -> Result<String> {
        self.session().require_token(operation).map(str::to_string)
    }

    // ---- Execution ----

    pub async fn execute_buy_transaction(&self, signer: &dyn Signer, request: &BuyRequest) -> Result<TradeOutcome> {
        let token = self.require_token("execute_buy_transaction")?;
        let mut timer = Timer::start("execute_buy_transaction");
        let parameters = self.get_buy_parameters(request).await?;
        timer.checkpoint("build_parameters");
        let outcome = self
            .submit_and_record(TradeSide::Buy, signer, &parameters, &request.token_identifier, &token, &mut timer)
            .await?;
        timer.finish();
        Ok(outcome)
    }

    pub async fn execute_sell_transaction(&self, signer: &dyn Signer, request: &SellRequest) -> Result<TradeOutcome> {
        let token = self.require_token("execute_sell_transaction")?;
        let mut timer = Timer::start("execute_sell_transaction");
        let parameters = self.get_sell_parameters(request).await?;
        timer.checkpoint("build_parameters");
        let outcome = self
            .submit_and_record(TradeSide::Sell, signer, &parameters, &request.token_identifier, &token, &mut timer)
            .await?;
        timer.finish();
        Ok(outcome)
    }

    async fn submit_and_record(
        &self,
        side: TradeSide,
        signer: &dyn Signer,
        parameters: &TransactionParameters,
        token_identifier: &str,
        auth_token: &str,
        timer: &mut Timer,
    ) -> Result<TradeOutcome> {
        let pending = self
            .chain
            .submit_transaction(signer, &parameters.to_payload())
            .await?;
        timer.checkpoint("submit");
        info!("{} submitted: {}", side.as_str(), pending.hash);

        let ctx = RecordingContext {
            chain: self.chain.as_ref(),
            backend: self.backend.as_ref(),
            auth_token: Some(auth_token),
            skip_recording: self.config.skip_transaction_recording,
            timeout: self.config.tx_timeout(),
            poll_interval: self.config.tx_poll_interval(),
        };
        let recording = execution::record_outcome(&ctx, side, &pending.hash, token_identifier).await;
        timer.checkpoint("record");

        Ok(TradeOutcome {
            tx_hash: pending.hash,
            recording,
        })
    }

    /// Polls for confirmation; `None` falls back to the configured timeout and interval.
    pub async fn wait_for_transaction(
        &self,
        hash: &str,
        timeout: Option<Duration>,
        interval: Option<Duration>,
    ) -> Result<CommittedTransaction> {
        execution::wait_for_transaction(
            self.chain.as_ref(),
            hash,
            timeout.unwrap_or_else(|| self.config.tx_timeout()),
            interval.unwrap_or_else(|| self.config.tx_poll_interval()),
        )
        .await
    }

    // ---- Recording ----

    pub async fn record_buy_transaction(&self, record: &TransactionRecord) -> Result<Value> {
        let token = self.require_token("record_buy_transaction")?;
        self.backend.record_buy(record, Some(&token)).await
    }

    pub async fn record_sell_transaction(&self, record: &TransactionRecord) -> Result<Value> {
        let token = self.require_token("record_sell_transaction")?;
        self.backend.record_sell(record, Some(&token)).await
    }
}
