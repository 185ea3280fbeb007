// src/error.rs
use thiserror::Error;

/// Startup configuration problems. Always fatal.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("You need to export GNOSISSCAN_API_KEY")]
    MissingApiKey,

    #[error("Invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Failures while reading a deposit log
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("payload is not valid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    #[error("payload is not a DepositEvent: {0}")]
    Abi(#[from] alloy::sol_types::Error),

    #[error("invalid block number {0:?}")]
    BlockNumber(String),
}

/// Everything that can stop a scan
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Malformed API body: {0}")]
    Parse(String),

    #[error("Checkpoint error: {0}")]
    Checkpoint(#[from] rusqlite::Error),

    #[error("Output error: {0}")]
    Output(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ScanError>;
