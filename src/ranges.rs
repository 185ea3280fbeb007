// src/ranges.rs
use alloy::primitives::Address;

use crate::config::{ApiKey, Config};
use crate::models::{BlockRange, QueryParams};

/// Split `[from_block, to_block)` into windows of `block_range` blocks.
///
/// The last window is not clamped, so its `to_block` can overshoot the
/// requested upper bound by up to `block_range - 1` blocks.
pub fn partition(
    from_block: u64,
    to_block: u64,
    block_range: u64,
) -> impl Iterator<Item = BlockRange> {
    let step = block_range.max(1) as usize;
    (from_block..to_block).step_by(step).map(move |start| BlockRange {
        from_block: start,
        to_block: start.saturating_add(block_range),
    })
}

/// Fixed part of every page request
#[derive(Debug, Clone)]
pub struct PageTemplate {
    pub address: Address,
    pub api_key: ApiKey,
    pub page_size: u64,
    pub max_pages: u64,
}

impl PageTemplate {
    pub fn new(cfg: &Config) -> Self {
        Self {
            address: cfg.contract,
            api_key: cfg.api_key.clone(),
            page_size: cfg.page_size,
            max_pages: cfg.max_pages(),
        }
    }

    /// Pages 1..=max_pages for one window, each paired with the page size
    pub fn paginate(&self, range: BlockRange) -> impl Iterator<Item = (QueryParams, u64)> + '_ {
        (1..=self.max_pages).map(move |page| {
            let params = QueryParams {
                module: "logs",
                action: "getLogs",
                address: self.address.to_string(),
                from_block: range.from_block,
                to_block: range.to_block,
                page,
                offset: self.page_size,
                apikey: self.api_key.clone(),
            };
            (params, self.page_size)
        })
    }
}
