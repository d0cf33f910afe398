//! Swap event lookup in confirmed transactions.

use crate::chain::{ChainEvent, CommittedTransaction};
use serde_json::Value;

pub const SWAP_EVENT_NAME: &str = "SwapEvent";

/// Amounts moved by one swap, in on-chain units. X is the token, Y is APT.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SwapAmounts {
    pub x_in: u64,
    pub y_in: u64,
    pub x_out: u64,
    pub y_out: u64,
}

/// Third `::` segment of an event type, without any generic arguments.
pub fn event_name(event_type: &str) -> Option<&str> {
    let segment = event_type.split("::").nth(2)?;
    segment.split('<').next()
}

pub fn find_swap_event(tx: &CommittedTransaction) -> Option<&ChainEvent> {
    tx.events
        .iter()
        .find(|event| event_name(&event.event_type) == Some(SWAP_EVENT_NAME))
}

/// `None` when any of the four amount fields is missing or malformed.
pub fn parse_swap_amounts(event: &ChainEvent) -> Option<SwapAmounts> {
    Some(SwapAmounts {
        x_in: read_u64(&event.data, "x_in")?,
        y_in: read_u64(&event.data, "y_in")?,
        x_out: read_u64(&event.data, "x_out")?,
        y_out: read_u64(&event.data, "y_out")?,
    })
}

pub fn extract_swap_amounts(tx: &CommittedTransaction) -> Option<SwapAmounts> {
    find_swap_event(tx).and_then(parse_swap_amounts)
}

fn read_u64(data: &Value, field: &str) -> Option<u64> {
    match data.get(field)? {
        Value::String(s) => s.parse().ok(),
        Value::Number(n) => n.as_u64(),
        _ => None,
    }
}
