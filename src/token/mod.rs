//! Token identifiers of the form `address::module::struct`.

use crate::error::SdkError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const IDENTIFIER_DELIMITER: &str = "::";

/// Fully qualified on-chain coin type, e.g. `0xabc::pepe::PEPE`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TokenIdentifier {
    pub address: String,
    pub module_name: String,
    pub struct_name: String,
}

impl TokenIdentifier {
    pub fn parse(identifier: &str) -> Result<Self, SdkError> {
        let parts: Vec<&str> = identifier.split(IDENTIFIER_DELIMITER).collect();
        if parts.len() != 3 || parts.iter().any(|p| p.trim().is_empty()) {
            return Err(SdkError::Validation(format!(
                "Invalid token identifier format: '{}'",
                identifier
            )));
        }
        Ok(Self {
            address: parts[0].to_string(),
            module_name: parts[1].to_string(),
            struct_name: parts[2].to_string(),
        })
    }

    /// Display ticker. This is the module name, not a verified on-chain symbol.
    pub fn ticker(&self) -> &str {
        &self.module_name
    }
}

impl fmt::Display for TokenIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}{}{}",
            self.address, IDENTIFIER_DELIMITER, self.module_name, IDENTIFIER_DELIMITER, self.struct_name
        )
    }
}

impl FromStr for TokenIdentifier {
    type Err = SdkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for TokenIdentifier {
    type Error = SdkError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TokenIdentifier> for String {
    fn from(id: TokenIdentifier) -> Self {
        id.to_string()
    }
}

/// Address and display ticker of a token identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedToken {
    pub address: String,
    pub ticker: String,
}

pub fn parse_token_identifier(identifier: &str) -> Result<ParsedToken, SdkError> {
    let id = TokenIdentifier::parse(identifier)?;
    Ok(ParsedToken {
        address: id.address.clone(),
        ticker: id.ticker().to_string(),
    })
}
