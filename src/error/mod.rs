use thiserror::Error;

/// Message used for any 401 coming back from the backend.
pub const AUTH_REQUIRED_MESSAGE: &str = "Authentication required. Please login first.";

#[derive(Debug, Error)]
pub enum SdkError {
    /// Malformed caller input (token identifiers, amounts, slippage)
    #[error("Validation Error: {0}")]
    Validation(String),

    /// Operation needs an auth token and none is set
    #[error("Authentication required: {0}")]
    AuthRequired(String),

    /// Pool resource could not be read from the chain
    #[error("Failed to fetch pool state for {identifier}: {source}")]
    PoolState {
        identifier: String,
        #[source]
        source: Box<SdkError>,
    },

    /// Degenerate curve math (empty pool, overflow on scaling)
    #[error("Pricing Error: {0}")]
    Pricing(String),

    /// Backend answered with a non-success status
    #[error("API Error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Confirmation polling ran out of time
    #[error("Transaction {hash} was not confirmed within {timeout_ms}ms")]
    TransactionTimeout { hash: String, timeout_ms: u64 },

    /// Transport failure with no HTTP status
    #[error("Network Error: {0}")]
    Network(String),

    /// Chain collaborator failure
    #[error("Chain Error: {0}")]
    Chain(String),

    #[error("Parse Error: {0}")]
    Parse(String),

    #[error("Signing Error: {0}")]
    Signing(String),

    #[error("Config Error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for SdkError {
    fn from(err: serde_json::Error) -> Self {
        SdkError::Parse(format!("JSON serialization/deserialization error: {}", err))
    }
}

impl From<reqwest::Error> for SdkError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => SdkError::api(status.as_u16(), err.to_string()),
            None => SdkError::Network(err.to_string()),
        }
    }
}

impl From<anyhow::Error> for SdkError {
    fn from(err: anyhow::Error) -> Self {
        SdkError::Chain(format!("{:#}", err))
    }
}

impl From<url::ParseError> for SdkError {
    fn from(err: url::ParseError) -> Self {
        SdkError::Config(format!("Invalid URL: {}", err))
    }
}

impl SdkError {
    /// Builds an `Api` error, rewording 401s so callers see why the call failed.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        let message = if status == 401 {
            AUTH_REQUIRED_MESSAGE.to_string()
        } else {
            message.into()
        };
        SdkError::Api { status, message }
    }

    pub fn pool_state(identifier: impl Into<String>, source: SdkError) -> Self {
        SdkError::PoolState {
            identifier: identifier.into(),
            source: Box::new(source),
        }
    }

    /// HTTP status carried by this error, looking through pool-state wrapping.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            SdkError::Api { status, .. } => Some(*status),
            SdkError::PoolState { source, .. } => source.status_code(),
            _ => None,
        }
    }

    pub fn is_auth_error(&self) -> bool {
        matches!(self, SdkError::AuthRequired(_)) || self.status_code() == Some(401)
    }

    /// Categorizes error for logging
    pub fn categorize(&self) -> ErrorCategory {
        match self {
            SdkError::Validation(_) => ErrorCategory::Input,
            SdkError::AuthRequired(_) => ErrorCategory::Auth,
            SdkError::Api { status: 401, .. } => ErrorCategory::Auth,
            SdkError::Api { .. } | SdkError::Network(_) | SdkError::Parse(_) => {
                ErrorCategory::Network
            }
            SdkError::PoolState { .. }
            | SdkError::Chain(_)
            | SdkError::Signing(_)
            | SdkError::TransactionTimeout { .. } => ErrorCategory::Chain,
            SdkError::Pricing(_) => ErrorCategory::Pricing,
            SdkError::Config(_) => ErrorCategory::Configuration,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Auth,
    Network,
    Chain,
    Pricing,
    Configuration,
}

pub type Result<T> = std::result::Result<T, SdkError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthorized_is_reworded_but_keeps_status() {
        let err = SdkError::api(401, "jwt expired");
        assert_eq!(err.status_code(), Some(401));
        assert!(err.is_auth_error());
        assert_eq!(err.to_string(), format!("API Error (401): {}", AUTH_REQUIRED_MESSAGE));
        assert_eq!(err.categorize(), ErrorCategory::Auth);
    }

    #[test]
    fn test_other_statuses_keep_message() {
        let err = SdkError::api(404, "token not found");
        assert_eq!(err.status_code(), Some(404));
        assert!(!err.is_auth_error());
        assert!(err.to_string().contains("token not found"));
        assert_eq!(err.categorize(), ErrorCategory::Network);
    }

    #[test]
    fn test_pool_state_wraps_cause() {
        let err = SdkError::pool_state("0x1::a::A", SdkError::Chain("resource not found".into()));
        assert!(err.to_string().contains("0x1::a::A"));
        assert!(err.to_string().contains("resource not found"));
        assert!(std::error::Error::source(&err).is_some());
        assert_eq!(err.categorize(), ErrorCategory::Chain);
    }
}
