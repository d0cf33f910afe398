//! Constant-product bonding-curve math.
//!
//! The 1% protocol fee is taken from the input on buys and from the output on
//! sells. Previews never touch chain state and carry slippage through unapplied;
//! slippage only bounds the minimum output in [`params`].

pub mod params;

use crate::error::{Result, SdkError};
use crate::pool::{PoolState, AMOUNT_SCALE};
use crate::token::TokenIdentifier;
use serde::{Deserialize, Serialize};

pub const FEE_PERCENT: f64 = 1.0;
/// Share of an amount left after the protocol fee.
pub const FEE_MULTIPLIER: f64 = 1.0 - FEE_PERCENT / 100.0;
/// Display symbol of the quote asset.
pub const APT_SYMBOL: &str = "APT";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradePreview {
    pub input_amount: f64,
    pub output_amount: f64,
    pub input_token: String,
    pub output_token: String,
    pub slippage: f64,
    /// Percentage, rounded to two decimals.
    pub price_impact: f64,
    /// Protocol fee in APT.
    pub fee: f64,
}

/// Tokens received for `apt_amount` APT, fee taken from the input.
pub fn buy_output(state: &PoolState, apt_amount: f64) -> f64 {
    let adjusted = apt_amount * FEE_MULTIPLIER;
    (adjusted * state.reserve_x as f64 / AMOUNT_SCALE)
        / (state.reserve_y as f64 / AMOUNT_SCALE + adjusted)
}

/// APT returned for `token_amount` tokens before the fee.
pub fn sell_output_raw(state: &PoolState, token_amount: f64) -> f64 {
    (token_amount * state.reserve_y as f64 / AMOUNT_SCALE)
        / (state.reserve_x as f64 / AMOUNT_SCALE + token_amount)
}

/// Trade size relative to the reserve it is paid into, in percent.
///
/// Uses the nominal amount, not the fee-adjusted one the output formula uses.
pub fn price_impact(amount: f64, reserve_units: f64) -> f64 {
    round2(amount / reserve_units * 100.0)
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn preview_buy(
    state: &PoolState,
    token: &TokenIdentifier,
    apt_amount: f64,
    slippage: f64,
) -> Result<TradePreview> {
    validate_amount("APT amount", apt_amount)?;
    validate_slippage(slippage)?;

    let output = buy_output(state, apt_amount);
    let impact = price_impact(apt_amount, state.reserve_y_units());
    ensure_finite(&[output, impact], state)?;

    Ok(TradePreview {
        input_amount: apt_amount,
        output_amount: output,
        input_token: APT_SYMBOL.to_string(),
        output_token: token.ticker().to_string(),
        slippage,
        price_impact: impact,
        fee: apt_amount * FEE_PERCENT / 100.0,
    })
}

pub fn preview_sell(
    state: &PoolState,
    token: &TokenIdentifier,
    token_amount: f64,
    slippage: f64,
) -> Result<TradePreview> {
    validate_amount("token amount", token_amount)?;
    validate_slippage(slippage)?;

    let raw = sell_output_raw(state, token_amount);
    let output = raw * FEE_MULTIPLIER;
    let impact = price_impact(token_amount, state.reserve_x_units());
    ensure_finite(&[output, impact], state)?;

    Ok(TradePreview {
        input_amount: token_amount,
        output_amount: output,
        input_token: token.ticker().to_string(),
        output_token: APT_SYMBOL.to_string(),
        slippage,
        price_impact: impact,
        fee: raw * FEE_PERCENT / 100.0,
    })
}

/// Marginal price in APT per token.
pub fn spot_price(state: &PoolState) -> Result<f64> {
    if state.reserve_x == 0 {
        return Err(SdkError::Pricing("Pool has no token reserve".to_string()));
    }
    Ok(state.reserve_y_units() / state.reserve_x_units())
}

pub fn validate_amount(label: &str, amount: f64) -> Result<()> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(SdkError::Validation(format!(
            "{} must be a non-negative number, got {}",
            label, amount
        )));
    }
    Ok(())
}

pub fn validate_slippage(slippage: f64) -> Result<()> {
    if !slippage.is_finite() || !(0.0..=100.0).contains(&slippage) {
        return Err(SdkError::Validation(format!(
            "Slippage must be between 0 and 100, got {}",
            slippage
        )));
    }
    Ok(())
}

/// Converts human units to on-chain units, truncating any fractional residue.
pub fn to_scaled_units(amount: f64) -> Result<u64> {
    let scaled = (amount * AMOUNT_SCALE).floor();
    if !scaled.is_finite() || scaled < 0.0 || scaled >= u64::MAX as f64 {
        return Err(SdkError::Pricing(format!(
            "Amount {} cannot be represented in on-chain units",
            amount
        )));
    }
    Ok(scaled as u64)
}

/// Rejects NaN or infinite curve results, which only a degenerate pool produces.
fn ensure_finite(values: &[f64], state: &PoolState) -> Result<()> {
    if values.iter().any(|v| !v.is_finite()) {
        return Err(SdkError::Pricing(format!(
            "Degenerate pool (reserve_x={}, reserve_y={})",
            state.reserve_x, state.reserve_y
        )));
    }
    Ok(())
}
