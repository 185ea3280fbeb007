// src/models.rs
use serde::Serialize;

use crate::config::ApiKey;

/// Half-open block window `[from_block, to_block)` sent as one logs query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockRange {
    pub from_block: u64,
    pub to_block: u64,
}

/// Query string for one `module=logs&action=getLogs` page
#[derive(Debug, Clone, Serialize)]
pub struct QueryParams {
    pub module: &'static str,
    pub action: &'static str,
    pub address: String,
    #[serde(rename = "fromBlock")]
    pub from_block: u64,
    #[serde(rename = "toBlock")]
    pub to_block: u64,
    pub page: u64,
    pub offset: u64,
    pub apikey: ApiKey,
}

/// A log whose first topic is the deposit event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilteredEvent {
    pub data: String,
    pub block: u64,
}

/// One fully decoded deposit, as written to the output
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DepositRecord {
    pub block: u64,
    pub pubkey: String,
    pub withdrawal_credentials: String,
    pub amount_gwei: Option<u64>,
    pub signature: String,
    pub index: Option<u64>,
}
