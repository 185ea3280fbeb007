// src/indexer.rs
use std::io::Write;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::db::CheckpointStore;
use crate::error::Result;
use crate::explorer::{ApiResponse, ExplorerClient};
use crate::filter::{self, LogBatch};
use crate::models::BlockRange;
use crate::output;
use crate::parser;
use crate::ranges::{self, PageTemplate};

/// Message the explorer sends with `status == "0"` when a window simply has no logs
const NO_RECORDS: &str = "No records found";

/// Counters for one scan
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScanReport {
    pub ranges: u64,
    pub requests: u64,
    pub events: u64,
    pub undecodable: u64,
    pub throttles: u64,
    pub ceilings: u64,
    pub abandoned: u64,
}

/// What the driver does after a page
enum PageOutcome {
    /// Full page: ask for the next one
    NextPage,
    /// Short page: the provider has nothing more for this window
    Done,
    /// Malformed result: the rest of the window is skipped
    Abandon,
}

/// How a window ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WindowEnd {
    Completed,
    /// Refused, malformed, or cut off at the result ceiling
    Incomplete,
}

/// Scan every window of the configured block interval and write each decoded deposit to `out`
pub async fn run<W: Write>(
    cfg: &Config,
    client: &ExplorerClient,
    checkpoint: Option<&CheckpointStore>,
    out: &mut W,
) -> Result<ScanReport> {
    cfg.validate()?;

    let contract = cfg.contract.to_string();
    let topic = cfg.event_topic.to_string();

    let mut start = cfg.from_block;
    if let Some(store) = checkpoint {
        if let Some(cp) = store.load(&contract, &topic)? {
            if cp.next_block > start {
                info!("Resuming at block {} (checkpoint from {})", cp.next_block, cp.updated_at);
                start = cp.next_block;
            }
        }
    }

    let template = PageTemplate::new(cfg);

    info!(
        "Scanning {} for deposits: blocks {} → {} in windows of {}",
        contract, start, cfg.to_block, cfg.block_range
    );

    let mut report = ScanReport::default();
    // the cursor only moves over an unbroken run of completed windows
    let mut cursor_live = checkpoint.is_some();

    for range in ranges::partition(start, cfg.to_block, cfg.block_range) {
        let end = scan_range(cfg, client, &template, range, out, &mut report).await?;
        report.ranges += 1;

        // records must reach the sink before the cursor claims them
        out.flush()?;

        if end == WindowEnd::Incomplete && cursor_live {
            warn!(
                "Checkpoint held at block {}: window {}-{} was not fully scanned",
                range.from_block, range.from_block, range.to_block
            );
            cursor_live = false;
        }

        if let (Some(store), true) = (checkpoint, cursor_live) {
            store.save(&contract, &topic, range.to_block)?;
        }
    }

    info!(
        "Scan complete: {} windows, {} requests, {} deposits",
        report.ranges, report.requests, report.events
    );
    if report.undecodable > 0 {
        warn!("{} deposit logs could not be decoded", report.undecodable);
    }
    if report.ceilings > 0 {
        warn!("{} windows hit the result ceiling and may be incomplete", report.ceilings);
    }
    if report.abandoned > 0 {
        warn!("{} windows were refused or malformed and were skipped", report.abandoned);
    }

    Ok(report)
}

async fn scan_range<W: Write>(
    cfg: &Config,
    client: &ExplorerClient,
    template: &PageTemplate,
    range: BlockRange,
    out: &mut W,
    report: &mut ScanReport,
) -> Result<WindowEnd> {
    let mut pages = template.paginate(range).peekable();

    while let Some((params, page_size)) = pages.next() {
        let resp = client.query(&params).await?;
        report.requests += 1;

        if resp.is_empty() {
            return Ok(empty_window(&resp, range, params.page, report));
        }

        let batch = filter::classify(&resp.result);
        match handle_page(cfg, &batch, page_size, out, report)? {
            PageOutcome::Done => return Ok(WindowEnd::Completed),
            PageOutcome::Abandon => {
                report.abandoned += 1;
                return Ok(WindowEnd::Incomplete);
            }
            PageOutcome::NextPage if pages.peek().is_some() => {
                sleep(cfg.throttle).await;
                report.throttles += 1;
            }
            PageOutcome::NextPage => {
                warn!(
                    "Blocks {}-{}: {} results returned, provider ceiling reached",
                    range.from_block, range.to_block, cfg.max_results
                );
                report.ceilings += 1;
                return Ok(WindowEnd::Incomplete);
            }
        }
    }

    Ok(WindowEnd::Completed)
}

/// `status == "0"`: "No records found" ends the window, anything else is a refusal
fn empty_window(resp: &ApiResponse, range: BlockRange, page: u64, report: &mut ScanReport) -> WindowEnd {
    if resp.message.trim().eq_ignore_ascii_case(NO_RECORDS) {
        debug!("Blocks {}-{} page {}: no more records", range.from_block, range.to_block, page);
        return WindowEnd::Completed;
    }

    warn!(
        "Blocks {}-{} page {} refused: {} ({})",
        range.from_block, range.to_block, page, resp.message, resp.result
    );
    report.abandoned += 1;
    WindowEnd::Incomplete
}

fn handle_page<W: Write>(
    cfg: &Config,
    batch: &LogBatch,
    page_size: u64,
    out: &mut W,
    report: &mut ScanReport,
) -> Result<PageOutcome> {
    for event in filter::extract(batch.entries(), cfg.event_topic) {
        let event = match event {
            Ok(event) => event,
            Err(e) => {
                error!("Undecodable deposit log: {}", e);
                report.undecodable += 1;
                continue;
            }
        };

        match parser::decode_deposit(&event.data) {
            Ok(deposit) => {
                let record = deposit.into_record(event.block);
                output::write_record(out, cfg.output, &record)?;
                report.events += 1;
            }
            Err(e) => {
                error!("Undecodable deposit log in block {}: {}", event.block, e);
                report.undecodable += 1;
            }
        }
    }

    if let LogBatch::Truncated { malformed, .. } = batch {
        warn!("Malformed log result, skipping rest of window: {}", malformed);
        return Ok(PageOutcome::Abandon);
    }

    if (batch.raw_len() as u64) < page_size {
        Ok(PageOutcome::Done)
    } else {
        Ok(PageOutcome::NextPage)
    }
}
