//! Bonding-curve pool reserves, read fresh from chain on every call.

use crate::chain::ChainClient;
use crate::error::{Result, SdkError};
use crate::token::TokenIdentifier;
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// On-chain integer units per human unit (8 decimals).
pub const AMOUNT_SCALE: f64 = 100_000_000.0;

/// Reserves of a pool in on-chain units. X is the launched token, Y is APT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolState {
    pub reserve_x: u64,
    pub reserve_y: u64,
}

impl PoolState {
    pub fn new(reserve_x: u64, reserve_y: u64) -> Self {
        Self { reserve_x, reserve_y }
    }

    /// Token reserve in human units.
    pub fn reserve_x_units(&self) -> f64 {
        self.reserve_x as f64 / AMOUNT_SCALE
    }

    /// APT reserve in human units.
    pub fn reserve_y_units(&self) -> f64 {
        self.reserve_y as f64 / AMOUNT_SCALE
    }

    pub fn is_empty(&self) -> bool {
        self.reserve_x == 0 || self.reserve_y == 0
    }
}

pub fn pool_resource_type(contract_address: &str, identifier: &TokenIdentifier) -> String {
    format!("{}::interface::PoolState<{}>", contract_address, identifier)
}

/// Reads the pool resource stored at the token's account.
///
/// Malformed identifiers fail with `Validation`; anything that goes wrong after
/// that is wrapped in `PoolState` with the underlying cause.
pub async fn fetch_pool_state(
    chain: &dyn ChainClient,
    contract_address: &str,
    identifier: &str,
) -> Result<PoolState> {
    let token = TokenIdentifier::parse(identifier)?;
    let resource_type = pool_resource_type(contract_address, &token);

    let resource = chain
        .get_resource(&token.address, &resource_type)
        .await
        .map_err(|e| SdkError::pool_state(identifier, e))?;

    let state = PoolState {
        reserve_x: read_reserve(&resource.data, "reserve_x")
            .map_err(|e| SdkError::pool_state(identifier, e))?,
        reserve_y: read_reserve(&resource.data, "reserve_y")
            .map_err(|e| SdkError::pool_state(identifier, e))?,
    };
    debug!(
        "Pool {}: reserve_x={} reserve_y={}",
        identifier, state.reserve_x, state.reserve_y
    );
    Ok(state)
}

/// u64 fields arrive as decimal strings; plain JSON numbers are accepted too.
fn read_reserve(data: &Value, field: &str) -> Result<u64> {
    match data.get(field) {
        Some(Value::String(s)) => s
            .parse::<u64>()
            .map_err(|e| SdkError::Parse(format!("Invalid {} '{}': {}", field, s, e))),
        Some(Value::Number(n)) => n
            .as_u64()
            .ok_or_else(|| SdkError::Parse(format!("Invalid {}: {}", field, n))),
        Some(other) => Err(SdkError::Parse(format!("Unexpected {} value: {}", field, other))),
        None => Err(SdkError::Parse(format!("Pool resource is missing {}", field))),
    }
}
