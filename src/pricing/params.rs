//! Entry-function arguments for `bonding::buy` / `bonding::sell`.

use crate::chain::EntryFunctionPayload;
use crate::error::Result;
use crate::pool::PoolState;
use crate::pricing::{
    buy_output, ensure_finite, sell_output_raw, to_scaled_units, validate_amount,
    validate_slippage,
};
use crate::token::TokenIdentifier;
use serde::{Deserialize, Serialize};

pub const BONDING_MODULE: &str = "bonding";
pub const BUY_FUNCTION: &str = "buy";
pub const SELL_FUNCTION: &str = "sell";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyRequest {
    pub token_identifier: String,
    /// APT to spend, human units.
    pub amount: f64,
    /// Tolerated shortfall in percent.
    pub slippage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SellRequest {
    pub token_identifier: String,
    pub token_amount: f64,
    pub slippage: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransactionParameters {
    pub function_id: String,
    pub type_arguments: Vec<TokenIdentifier>,
    /// `[amount, min_out]`, both in on-chain units.
    pub function_arguments: [u64; 2],
    /// Curve output before slippage, human units. Not sent on chain.
    pub expected_output: f64,
    /// Slippage-bounded output, human units. Not sent on chain.
    pub min_output: f64,
}

impl TransactionParameters {
    pub fn amount(&self) -> u64 {
        self.function_arguments[0]
    }

    pub fn min_out(&self) -> u64 {
        self.function_arguments[1]
    }

    pub fn to_payload(&self) -> EntryFunctionPayload {
        EntryFunctionPayload::new(
            self.function_id.clone(),
            self.type_arguments.iter().map(ToString::to_string).collect(),
            self.function_arguments.iter().map(ToString::to_string).collect(),
        )
    }
}

pub fn entry_function_id(contract_address: &str, function: &str) -> String {
    format!("{}::{}::{}", contract_address, BONDING_MODULE, function)
}

/// `output` reduced by `slippage` percent; exact at 0 and 100.
pub fn apply_slippage(output: f64, slippage: f64) -> f64 {
    output * ((100.0 - slippage) / 100.0)
}

pub fn buy_parameters(
    contract_address: &str,
    state: &PoolState,
    request: &BuyRequest,
) -> Result<TransactionParameters> {
    let token = TokenIdentifier::parse(&request.token_identifier)?;
    validate_amount("APT amount", request.amount)?;
    validate_slippage(request.slippage)?;

    let output = buy_output(state, request.amount);
    let min_token_out = apply_slippage(output, request.slippage);
    ensure_finite(&[output, min_token_out], state)?;

    Ok(TransactionParameters {
        function_id: entry_function_id(contract_address, BUY_FUNCTION),
        type_arguments: vec![token],
        function_arguments: [
            to_scaled_units(request.amount)?,
            to_scaled_units(min_token_out)?,
        ],
        expected_output: output,
        min_output: min_token_out,
    })
}

/// The computed APT bound is reported in `min_output`, but the on-chain
/// `min_out` argument is always 0: sells currently enforce no minimum.
pub fn sell_parameters(
    contract_address: &str,
    state: &PoolState,
    request: &SellRequest,
) -> Result<TransactionParameters> {
    let token = TokenIdentifier::parse(&request.token_identifier)?;
    validate_amount("token amount", request.token_amount)?;
    validate_slippage(request.slippage)?;

    let output = sell_output_raw(state, request.token_amount);
    let min_apt_out = apply_slippage(output, request.slippage);
    ensure_finite(&[output, min_apt_out], state)?;

    Ok(TransactionParameters {
        function_id: entry_function_id(contract_address, SELL_FUNCTION),
        type_arguments: vec![token],
        function_arguments: [to_scaled_units(request.token_amount)?, 0],
        expected_output: output,
        min_output: min_apt_out,
    })
}
