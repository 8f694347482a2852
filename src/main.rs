//! Daily Metrics Dashboard Server
//!
//! Run with: cargo run --bin daily-metrics
//!
//! # Configuration
//!
//! Read from the first of `~/.config/daily-metrics/config.toml`,
//! `/etc/daily-metrics/config.toml` and `./config.toml`, then overridden by
//! `DAILY_METRICS_*` environment variables. Pass a path as the first argument
//! to use a specific file instead. `RUST_LOG` overrides the log level.

use anyhow::Context;
use daily_metrics::config::Config;
use daily_metrics::dashboard::FetchOutcome;
use daily_metrics::web::{serve, AppState};
use std::path::PathBuf;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = Config::load_from(config_path.as_deref())?;

    daily_metrics::logging::init(&config.logging).context("Failed to initialize logging")?;

    tracing::info!(
        "Starting daily metrics dashboard v{}",
        env!("CARGO_PKG_VERSION")
    );

    let backend = config
        .backend
        .build()
        .context("Failed to create metrics backend")?;
    let preference = config.dashboard.language_preference()?;
    let options = config.dashboard.options(None)?;

    tracing::info!(
        language = %options.language,
        follow_submitted_date = options.follow_submitted_date,
        "Dashboard options"
    );

    let state = AppState::new(backend, options, preference);

    // Initial render: publish document attributes and fetch today
    let outcome = state.dashboard.lock().await.load().await;
    match outcome {
        FetchOutcome::Applied(count) => tracing::info!("Loaded {} rows for today", count),
        FetchOutcome::Failed => tracing::warn!("Initial fetch failed; serving an empty table"),
        FetchOutcome::Stale => {}
    }

    serve(state, &config.server).await?;

    Ok(())
}
