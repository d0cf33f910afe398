//! Confirmation polling and the best-effort recording phase of a trade.
//!
//! Once a transaction is submitted the trade has happened. Everything here runs
//! after that point and never turns a submitted trade into an error: failures
//! end up in [`RecordingOutcome::Failed`].

pub mod events;

use crate::api::{BackendApi, TransactionRecord};
use crate::chain::{ChainClient, CommittedTransaction, TransactionStatus};
use crate::error::{Result, SdkError};
use chrono::{TimeZone, Utc};
use events::extract_swap_amounts;
use log::{debug, error, info, warn};
use std::time::Duration;
use tokio::time::{sleep, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeSide {
    Buy,
    Sell,
}

impl TradeSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeSide::Buy => "buy",
            TradeSide::Sell => "sell",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordingOutcome {
    /// Posted to the backend.
    Recorded(TransactionRecord),
    /// Recording disabled; zero-amount record, nothing sent.
    Skipped(TransactionRecord),
    /// Confirmation or the record POST failed; the trade itself still went through.
    Failed(String),
}

/// Submitted trade: the hash is guaranteed, the record is not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeOutcome {
    pub tx_hash: String,
    pub recording: RecordingOutcome,
}

impl TradeOutcome {
    pub fn record(&self) -> Option<&TransactionRecord> {
        match &self.recording {
            RecordingOutcome::Recorded(record) | RecordingOutcome::Skipped(record) => Some(record),
            RecordingOutcome::Failed(_) => None,
        }
    }

    pub fn is_recorded(&self) -> bool {
        matches!(self.recording, RecordingOutcome::Recorded(_))
    }
}

/// Polls until the transaction is committed or `timeout` has elapsed.
///
/// Lookup errors count as "not yet"; a freshly submitted hash is often unknown
/// to the node for a moment.
pub async fn wait_for_transaction(
    chain: &dyn ChainClient,
    hash: &str,
    timeout: Duration,
    interval: Duration,
) -> Result<CommittedTransaction> {
    let start = Instant::now();
    let mut attempts = 0u32;

    while start.elapsed() < timeout {
        attempts += 1;
        match chain.get_transaction_by_hash(hash).await {
            Ok(TransactionStatus::Committed(tx)) => {
                debug!("{} confirmed after {} attempt(s)", hash, attempts);
                return Ok(tx);
            }
            Ok(TransactionStatus::Pending) => {
                debug!("{} still pending (attempt {})", hash, attempts);
            }
            Err(e) => {
                debug!("Lookup of {} failed on attempt {}: {}", hash, attempts, e);
            }
        }
        sleep(interval).await;
    }

    Err(SdkError::TransactionTimeout {
        hash: hash.to_string(),
        timeout_ms: timeout.as_millis() as u64,
    })
}

/// Record for a confirmed trade, falling back to zero amounts without a swap event.
pub fn build_record(side: TradeSide, tx: &CommittedTransaction, token_identifier: &str) -> TransactionRecord {
    let timestamp = tx
        .timestamp_us
        .and_then(|us| {
            Utc.timestamp_opt((us / 1_000_000) as i64, ((us % 1_000_000) * 1_000) as u32)
                .single()
        })
        .unwrap_or_else(Utc::now);

    match extract_swap_amounts(tx) {
        Some(amounts) => {
            let (x_amt, y_amt) = match side {
                TradeSide::Buy => (amounts.x_out, amounts.y_in),
                TradeSide::Sell => (amounts.x_in, amounts.y_out),
            };
            TransactionRecord {
                txn_hash: tx.hash.clone(),
                token_mint_addr: token_identifier.to_string(),
                x_amt: x_amt.to_string(),
                y_amt: y_amt.to_string(),
                timestamp: timestamp.to_rfc3339(),
            }
        }
        None => {
            warn!("No swap event in {}; recording zero amounts", tx.hash);
            TransactionRecord::optimistic(&tx.hash, token_identifier, timestamp)
        }
    }
}

pub struct RecordingContext<'a> {
    pub chain: &'a dyn ChainClient,
    pub backend: &'a dyn BackendApi,
    pub auth_token: Option<&'a str>,
    pub skip_recording: bool,
    pub timeout: Duration,
    pub poll_interval: Duration,
}

/// Waits for confirmation, builds the record and posts it. Never returns an error.
pub async fn record_outcome(
    ctx: &RecordingContext<'_>,
    side: TradeSide,
    tx_hash: &str,
    token_identifier: &str,
) -> RecordingOutcome {
    if ctx.skip_recording {
        debug!("Recording disabled; skipping {} record for {}", side.as_str(), tx_hash);
        return RecordingOutcome::Skipped(TransactionRecord::optimistic(
            tx_hash,
            token_identifier,
            Utc::now(),
        ));
    }

    let tx = match wait_for_transaction(ctx.chain, tx_hash, ctx.timeout, ctx.poll_interval).await {
        Ok(tx) => tx,
        Err(e) => {
            warn!("Could not confirm {} before recording: {}", tx_hash, e);
            return RecordingOutcome::Failed(e.to_string());
        }
    };
    if !tx.success {
        warn!("{} committed with vm_status '{}'", tx_hash, tx.vm_status);
    }

    let record = build_record(side, &tx, token_identifier);
    let posted = match side {
        TradeSide::Buy => ctx.backend.record_buy(&record, ctx.auth_token).await,
        TradeSide::Sell => ctx.backend.record_sell(&record, ctx.auth_token).await,
    };

    match posted {
        Ok(_) => {
            info!("Recorded {} {} (x={}, y={})", side.as_str(), tx_hash, record.x_amt, record.y_amt);
            RecordingOutcome::Recorded(record)
        }
        Err(e) => {
            error!("Failed to record {} {}: {}", side.as_str(), tx_hash, e);
            RecordingOutcome::Failed(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::ChainEvent;
    use serde_json::json;

    fn committed(events: Vec<ChainEvent>) -> CommittedTransaction {
        CommittedTransaction {
            hash: "0xfeed".into(),
            kind: "user_transaction".into(),
            success: true,
            vm_status: "Executed successfully".into(),
            timestamp_us: Some(1_700_000_000_000_000),
            events,
        }
    }

    fn swap_event() -> ChainEvent {
        ChainEvent {
            event_type: "0xc0de::bonding::SwapEvent".into(),
            data: json!({"x_in": "300", "y_in": "100", "x_out": "2000", "y_out": "40"}),
        }
    }

    #[test]
    fn test_buy_record_uses_tokens_out_and_apt_in() {
        let record = build_record(TradeSide::Buy, &committed(vec![swap_event()]), "0xabc::p::P");
        assert_eq!(record.x_amt, "2000");
        assert_eq!(record.y_amt, "100");
        assert_eq!(record.txn_hash, "0xfeed");
        assert_eq!(record.timestamp, "2023-11-14T22:13:20+00:00");
    }

    #[test]
    fn test_sell_record_uses_tokens_in_and_apt_out() {
        let record = build_record(TradeSide::Sell, &committed(vec![swap_event()]), "0xabc::p::P");
        assert_eq!(record.x_amt, "300");
        assert_eq!(record.y_amt, "40");
    }

    #[test]
    fn test_missing_event_gives_zero_record() {
        let record = build_record(TradeSide::Buy, &committed(vec![]), "0xabc::p::P");
        assert_eq!(record.x_amt, "0");
        assert_eq!(record.y_amt, "0");
        assert_eq!(record.token_mint_addr, "0xabc::p::P");
    }

    #[test]
    fn test_outcome_record_accessor() {
        let record = build_record(TradeSide::Buy, &committed(vec![]), "0xabc::p::P");
        let skipped = TradeOutcome {
            tx_hash: "0x1".into(),
            recording: RecordingOutcome::Skipped(record.clone()),
        };
        assert_eq!(skipped.record(), Some(&record));
        assert!(!skipped.is_recorded());

        let failed = TradeOutcome {
            tx_hash: "0x1".into(),
            recording: RecordingOutcome::Failed("boom".into()),
        };
        assert!(failed.record().is_none());
    }
}
