//! Wallet sign-in: challenge, signature, token.
//!
//! `Unauthenticated -> wallet_login -> ChallengeIssued -> sign + login -> Authenticated`.
//! Nothing is stored until the backend hands back a token, so a failure at any
//! step leaves the session as it was.

use crate::api::{AuthToken, BackendApi, LoginRequest, WalletLoginResponse};
use crate::chain::Signer;
use crate::error::{Result, SdkError};
use chrono::{DateTime, Utc};
use log::{debug, info};

/// Bearer token held by one SDK instance. Never refreshed automatically.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthSession {
    token: Option<String>,
    expires_at: Option<DateTime<Utc>>,
}

impl AuthSession {
    pub fn new(token: Option<String>) -> Self {
        Self {
            token: token.filter(|t| !t.is_empty()),
            expires_at: None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    /// Fails fast with `AuthRequired` when no token is set.
    pub fn require_token(&self, operation: &str) -> Result<&str> {
        self.token().ok_or_else(|| {
            SdkError::AuthRequired(format!("{} requires a login token", operation))
        })
    }

    pub fn set(&mut self, token: &AuthToken) {
        self.token = Some(token.token.clone());
        self.expires_at = token.expires_at_utc();
    }

    /// An empty token clears the session, same as `new`.
    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into()).filter(|t| !t.is_empty());
        self.expires_at = None;
    }

    pub fn clear(&mut self) {
        self.token = None;
        self.expires_at = None;
    }
}

/// Signs `message + nonce` with the wallet and builds the login body.
pub fn sign_challenge(signer: &dyn Signer, challenge: &WalletLoginResponse) -> Result<LoginRequest> {
    let full_message = challenge.full_message();
    let signature = signer.sign(full_message.as_bytes())?;
    Ok(LoginRequest {
        wallet_addr: signer.address().to_string(),
        public_key: signer.public_key(),
        signature,
        full_message,
    })
}

/// Runs challenge, signing and login in sequence and returns the issued token.
pub async fn authenticate(backend: &dyn BackendApi, signer: &dyn Signer) -> Result<AuthToken> {
    debug!("Requesting login challenge for {}", signer.address());
    let challenge = backend.wallet_login(signer.address()).await?;
    let request = sign_challenge(signer, &challenge)?;
    let response = backend.login(&request).await?;
    info!("Authenticated wallet {}", signer.address());
    Ok(response.token)
}
