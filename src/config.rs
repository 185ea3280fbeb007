// src/config.rs
use alloy::primitives::{address, b256, Address, B256};
use dotenvy::dotenv;
use serde::Serialize;
use std::{env, fmt, str::FromStr, time::Duration};
use tracing::info;

use crate::error::ConfigError;

pub const DEFAULT_API_URL: &str = "https://api.gnosisscan.io/api";

/// Gnosis chain deposit contract
pub const DEPOSIT_CONTRACT: Address = address!("0x0B98057eA310F4d31F2a452B414647007d1645d9");

/// keccak256("DepositEvent(bytes,bytes,bytes,bytes,bytes)")
pub const DEPOSIT_EVENT_TOPIC: B256 =
    b256!("0x649bbc62d0e31342afea4e5cd82d4049e7e1ee912fc0889aa790803be39038c5");

pub const SCAN_FROM_BLOCK: u64 = 29_029_018;
pub const SCAN_TO_BLOCK: u64 = 38_504_792;

pub const BLOCK_RANGE: u64 = 1000;
pub const PAGE_SIZE: u64 = 100;
pub const MAX_RESULTS: u64 = 10_000;

/// Explorer API key. Never printed.
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    JsonLines,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "jsonl" | "json-lines" => Ok(Self::JsonLines),
            other => Err(format!("unknown output format '{other}' (expected text or jsonl)")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: ApiKey,
    pub api_url: String,
    pub contract: Address,
    pub event_topic: B256,
    pub from_block: u64,
    pub to_block: u64,
    pub block_range: u64,
    pub page_size: u64,
    pub max_results: u64,
    pub throttle: Duration,
    pub request_timeout: Duration,
    pub max_attempts: u32,
    pub retry_backoff: Duration,
    pub output: OutputFormat,
    pub checkpoint_db: Option<String>,
}

impl Config {
    /// Built-in scan settings for the given key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: ApiKey::new(api_key),
            api_url: DEFAULT_API_URL.to_string(),
            contract: DEPOSIT_CONTRACT,
            event_topic: DEPOSIT_EVENT_TOPIC,
            from_block: SCAN_FROM_BLOCK,
            to_block: SCAN_TO_BLOCK,
            block_range: BLOCK_RANGE,
            page_size: PAGE_SIZE,
            max_results: MAX_RESULTS,
            throttle: Duration::from_millis(200),
            request_timeout: Duration::from_secs(30),
            max_attempts: 3,
            retry_backoff: Duration::from_millis(500),
            output: OutputFormat::Text,
            checkpoint_db: None,
        }
    }

    /// Build a config from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("GNOSISSCAN_API_KEY")
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let mut cfg = Config::new(api_key);

        if let Some(url) = lookup("GNOSISSCAN_API_URL").filter(|s| !s.trim().is_empty()) {
            cfg.api_url = url.trim().to_string();
        }

        cfg.contract = parse_or(&lookup, "DEPOSIT_CONTRACT", cfg.contract)?;
        cfg.from_block = parse_or(&lookup, "SCAN_FROM_BLOCK", cfg.from_block)?;
        cfg.to_block = parse_or(&lookup, "SCAN_TO_BLOCK", cfg.to_block)?;
        cfg.block_range = parse_or(&lookup, "BLOCK_RANGE", cfg.block_range)?;
        cfg.page_size = parse_or(&lookup, "PAGE_SIZE", cfg.page_size)?;
        cfg.max_results = parse_or(&lookup, "MAX_RESULTS", cfg.max_results)?;
        cfg.max_attempts = parse_or(&lookup, "MAX_ATTEMPTS", cfg.max_attempts)?;
        cfg.output = parse_or(&lookup, "OUTPUT_FORMAT", cfg.output)?;

        let throttle_ms = parse_or(&lookup, "THROTTLE_MS", 200u64)?;
        let timeout_secs = parse_or(&lookup, "REQUEST_TIMEOUT_SECS", 30u64)?;
        let backoff_ms = parse_or(&lookup, "RETRY_BACKOFF_MS", 500u64)?;
        cfg.throttle = Duration::from_millis(throttle_ms);
        cfg.request_timeout = Duration::from_secs(timeout_secs);
        cfg.retry_backoff = Duration::from_millis(backoff_ms);

        cfg.checkpoint_db = lookup("CHECKPOINT_DB")
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty());

        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.from_block >= self.to_block {
            return Err(invalid(
                "SCAN_FROM_BLOCK",
                format!("{} must be below SCAN_TO_BLOCK {}", self.from_block, self.to_block),
            ));
        }
        if self.block_range == 0 {
            return Err(invalid("BLOCK_RANGE", "must be positive"));
        }
        if self.page_size == 0 {
            return Err(invalid("PAGE_SIZE", "must be positive"));
        }
        if self.max_results < self.page_size {
            return Err(invalid(
                "MAX_RESULTS",
                format!("{} is smaller than PAGE_SIZE {}", self.max_results, self.page_size),
            ));
        }
        if self.max_attempts == 0 {
            return Err(invalid("MAX_ATTEMPTS", "must be at least 1"));
        }
        Ok(())
    }

    /// Pages the provider will serve for one block window
    pub fn max_pages(&self) -> u64 {
        self.max_results / self.page_size.max(1)
    }
}

fn invalid(key: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        key,
        reason: reason.into(),
    }
}

fn parse_or<T, F>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| invalid(key, format!("'{}': {}", raw.trim(), e))),
        _ => Ok(default),
    }
}

pub fn load() -> Result<Config, ConfigError> {
    dotenv().ok(); // optional .env

    let cfg = Config::from_lookup(|key| env::var(key).ok())?;
    info!("Loaded config: {:?}", cfg);
    Ok(cfg)
}
