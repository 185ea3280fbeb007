//! Gnosis chain deposit scanner
//!
//! Walks the deposit contract's `DepositEvent` logs through the Gnosisscan
//! `logs/getLogs` API window by window, decodes each event's five `bytes`
//! fields and writes one line per deposit.

pub mod config;
pub mod db;
pub mod error;
pub mod explorer;
pub mod filter;
pub mod indexer;
pub mod models;
pub mod output;
pub mod parser;
pub mod ranges;

pub use config::{Config, OutputFormat};
pub use error::{ConfigError, DecodeError, ScanError};
pub use indexer::ScanReport;
