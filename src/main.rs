//! Batch entry point: run the averaging pass, then the comparison pass,
//! over the default results layout. Takes no arguments; configuration
//! lives in `AveragerConfig::default()`.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use benchpost::average::run_averaging;
use benchpost::compare::{run_comparisons, PieAppComparer};
use benchpost::config::AveragerConfig;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AveragerConfig::default();
    run_averaging(&config)?;

    let comparer = PieAppComparer::default();
    let processed = run_comparisons(config.results_root(), &comparer)?;
    tracing::info!(processed, "comparison pass complete");

    Ok(())
}
