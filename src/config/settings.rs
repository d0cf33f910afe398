use crate::error::SdkError;
use std::env;
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/api";
pub const DEFAULT_NODE_URL: &str = "https://fullnode.mainnet.aptoslabs.com/v1";
pub const DEFAULT_CONTRACT_ADDRESS: &str = "0x1";
pub const DEFAULT_TX_TIMEOUT_MS: u64 = 30_000;
pub const DEFAULT_TX_POLL_INTERVAL_MS: u64 = 1_000;

#[derive(Debug, Clone, PartialEq)]
pub struct SdkConfig {
    pub api_base_url: String,
    pub auth_token: Option<String>,
    pub skip_transaction_recording: bool,
    pub contract_address: String,
    pub node_url: String,
    pub tx_timeout_ms: u64,
    pub tx_poll_interval_ms: u64,
    pub max_gas_amount: u64,
    pub gas_unit_price: u64,
    pub tx_expiration_secs: u64,
}

impl Default for SdkConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            auth_token: None,
            skip_transaction_recording: false,
            contract_address: DEFAULT_CONTRACT_ADDRESS.to_string(),
            node_url: DEFAULT_NODE_URL.to_string(),
            tx_timeout_ms: DEFAULT_TX_TIMEOUT_MS,
            tx_poll_interval_ms: DEFAULT_TX_POLL_INTERVAL_MS,
            max_gas_amount: 200_000,
            gas_unit_price: 100,
            tx_expiration_secs: 600,
        }
    }
}

impl SdkConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        SdkConfig {
            api_base_url: env::var("CURVE_API_URL").unwrap_or(defaults.api_base_url),
            auth_token: env::var("CURVE_AUTH_TOKEN").ok().filter(|t| !t.is_empty()),
            skip_transaction_recording: env::var("CURVE_SKIP_TX_RECORDING")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.skip_transaction_recording),
            contract_address: env::var("CURVE_CONTRACT_ADDRESS")
                .unwrap_or(defaults.contract_address),
            node_url: env::var("APTOS_NODE_URL").unwrap_or(defaults.node_url),
            tx_timeout_ms: env::var("CURVE_TX_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.tx_timeout_ms),
            tx_poll_interval_ms: env::var("CURVE_TX_POLL_INTERVAL_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.tx_poll_interval_ms),
            max_gas_amount: env::var("APTOS_MAX_GAS_AMOUNT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_gas_amount),
            gas_unit_price: env::var("APTOS_GAS_UNIT_PRICE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.gas_unit_price),
            tx_expiration_secs: env::var("APTOS_TX_EXPIRATION_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.tx_expiration_secs),
        }
    }

    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    pub fn with_skip_transaction_recording(mut self, skip: bool) -> Self {
        self.skip_transaction_recording = skip;
        self
    }

    pub fn with_contract_address(mut self, address: impl Into<String>) -> Self {
        self.contract_address = address.into();
        self
    }

    pub fn with_polling(mut self, timeout_ms: u64, interval_ms: u64) -> Self {
        self.tx_timeout_ms = timeout_ms;
        self.tx_poll_interval_ms = interval_ms;
        self
    }

    pub fn tx_timeout(&self) -> Duration {
        Duration::from_millis(self.tx_timeout_ms)
    }

    pub fn tx_poll_interval(&self) -> Duration {
        Duration::from_millis(self.tx_poll_interval_ms)
    }

    pub fn validate(&self) -> Result<(), SdkError> {
        if self.api_base_url.trim().is_empty() {
            return Err(SdkError::Config("CURVE_API_URL cannot be empty".to_string()));
        }
        url::Url::parse(&self.api_base_url)?;
        if self.contract_address.trim().is_empty() {
            return Err(SdkError::Config("CURVE_CONTRACT_ADDRESS cannot be empty".to_string()));
        }
        if self.tx_poll_interval_ms == 0 {
            return Err(SdkError::Config("Poll interval must be greater than zero".to_string()));
        }
        if self.tx_poll_interval_ms > self.tx_timeout_ms {
            return Err(SdkError::Config(format!(
                "Poll interval ({}ms) exceeds transaction timeout ({}ms)",
                self.tx_poll_interval_ms, self.tx_timeout_ms
            )));
        }
        Ok(())
    }

    pub fn log_settings(&self) {
        // Never log the token itself.
        log::info!(
            "SDK configuration: api={} node={} contract={} auth_token_set={} skip_recording={} tx_timeout={}ms poll={}ms",
            self.api_base_url,
            self.node_url,
            self.contract_address,
            self.auth_token.is_some(),
            self.skip_transaction_recording,
            self.tx_timeout_ms,
            self.tx_poll_interval_ms
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = SdkConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.auth_token.is_none());
        assert!(!config.skip_transaction_recording);
        assert_eq!(config.tx_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_builder_overrides() {
        let config = SdkConfig::default()
            .with_auth_token("tok")
            .with_skip_transaction_recording(true)
            .with_contract_address("0xbeef")
            .with_polling(100, 10);
        assert_eq!(config.auth_token.as_deref(), Some("tok"));
        assert!(config.skip_transaction_recording);
        assert_eq!(config.contract_address, "0xbeef");
        assert_eq!(config.tx_poll_interval(), Duration::from_millis(10));
    }

    #[test]
    fn test_validation_failures() {
        let bad = [
            SdkConfig::default().with_api_base_url(""),
            SdkConfig::default().with_api_base_url("not a url"),
            SdkConfig::default().with_contract_address(" "),
            SdkConfig::default().with_polling(100, 0),
            SdkConfig::default().with_polling(100, 500),
        ];
        for config in bad {
            assert!(matches!(config.validate(), Err(SdkError::Config(_))), "{:?}", config);
        }
    }
}
