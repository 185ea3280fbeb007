// src/filter.rs
use alloy::primitives::B256;
use serde::Deserialize;
use serde_json::Value;

use crate::error::DecodeError;
use crate::models::FilteredEvent;

/// Log entry as returned by the explorer's `getLogs` action
#[derive(Debug, Deserialize, Clone)]
pub struct RawLog {
    pub topics: Vec<String>,
    pub data: String,

    #[serde(rename = "blockNumber")]
    pub block_number: String,
}

/// The `result` field of one response page
#[derive(Debug, Clone)]
pub enum LogBatch {
    /// Every entry was a well-formed log
    Complete(Vec<RawLog>),
    /// Reading stopped at the first entry that was not a log. A non-array
    /// `result` (rate-limit notice, error text) lands here with no entries.
    Truncated {
        entries: Vec<RawLog>,
        malformed: Value,
        raw_len: usize,
    },
}

impl LogBatch {
    pub fn entries(&self) -> &[RawLog] {
        match self {
            LogBatch::Complete(entries) => entries,
            LogBatch::Truncated { entries, .. } => entries,
        }
    }

    /// Number of results the provider sent, malformed ones included
    pub fn raw_len(&self) -> usize {
        match self {
            LogBatch::Complete(entries) => entries.len(),
            LogBatch::Truncated { raw_len, .. } => *raw_len,
        }
    }
}

pub fn classify(result: &Value) -> LogBatch {
    let Some(items) = result.as_array() else {
        return LogBatch::Truncated {
            entries: Vec::new(),
            malformed: result.clone(),
            raw_len: 0,
        };
    };

    let mut entries = Vec::with_capacity(items.len());
    for item in items {
        match RawLog::deserialize(item) {
            Ok(log) => entries.push(log),
            Err(_) => {
                return LogBatch::Truncated {
                    entries,
                    malformed: item.clone(),
                    raw_len: items.len(),
                }
            }
        }
    }
    LogBatch::Complete(entries)
}

/// Keep only logs whose first topic is `topic`. The block number is read
/// for those logs alone.
pub fn extract(
    entries: &[RawLog],
    topic: B256,
) -> impl Iterator<Item = Result<FilteredEvent, DecodeError>> + '_ {
    entries
        .iter()
        .filter(move |log| {
            log.topics
                .first()
                .and_then(|t0| t0.parse::<B256>().ok())
                .is_some_and(|t0| t0 == topic)
        })
        .map(|log| -> Result<FilteredEvent, DecodeError> {
            Ok(FilteredEvent {
                data: log.data.clone(),
                block: parse_block(&log.block_number)?,
            })
        })
}

fn parse_block(raw: &str) -> Result<u64, DecodeError> {
    let digits = raw.trim_start_matches("0x");
    u64::from_str_radix(digits, 16).map_err(|_| DecodeError::BlockNumber(raw.to_string()))
}
