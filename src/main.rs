use std::io::{self, BufWriter};

use deposit_scanner::{config, db::CheckpointStore, explorer::ExplorerClient, indexer};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> eyre::Result<()> {
    // records go to stdout, logs to stderr
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    info!("Deposit scanner starting...");

    let cfg = config::load()?;
    let client = ExplorerClient::new(&cfg)?;

    let checkpoint = match &cfg.checkpoint_db {
        Some(path) => {
            info!("Checkpointing to {}", path);
            Some(CheckpointStore::open(path)?)
        }
        None => None,
    };

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    let report = indexer::run(&cfg, &client, checkpoint.as_ref(), &mut out).await?;
    info!("Done: {:?}", report);

    Ok(())
}
