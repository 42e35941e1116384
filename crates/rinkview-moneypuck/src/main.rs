// rinkview-refresh entry point.
//
// Downloads (or reads) one season of raw skater data, normalizes it and
// writes `hockey_stats_{season}.csv` / `.json`.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};

use rinkview_core::config;
use rinkview_core::http::HttpFetcher;
use rinkview_core::season::{current_nhl_season, Season};
use rinkview_moneypuck::refresh::{self, RawSource, RefreshOptions};

#[derive(Parser)]
#[command(name = "rinkview-refresh")]
#[command(about = "Build a normalized season stats file from MoneyPuck data", long_about = None)]
struct Cli {
    /// Season start year (e.g. 2023 for 2023-24). Defaults to the current season.
    #[arg(long)]
    season: Option<u16>,

    /// Read the raw skater CSV from this file instead of downloading it
    #[arg(long)]
    input: Option<PathBuf>,

    /// Output directory (overrides `refresh.output_dir`)
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Skip the JSON records file
    #[arg(long)]
    no_json: bool,

    /// Directory containing `config/` and `defaults/`
    #[arg(long)]
    config_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing()?;
    let cli = Cli::parse();

    let config =
        config::load_config(cli.config_dir.as_deref()).context("failed to load configuration")?;

    let season = match cli.season {
        Some(year) => Season::new(year),
        None => current_nhl_season(chrono::Local::now().date_naive()),
    };

    let mut opts = RefreshOptions::from_config(&config.refresh, season);
    if let Some(input) = cli.input {
        opts.source = RawSource::File(input);
    }
    if let Some(dir) = cli.output_dir {
        opts.output_dir = dir;
    }
    opts.write_json = !cli.no_json;

    let fetcher = HttpFetcher::new(
        &config.refresh.user_agent,
        std::time::Duration::from_secs(config.http.timeout_secs),
        config.http.retry_once,
    )
    .context("failed to set up the download client")?;

    match refresh::run(&opts, &fetcher).await {
        Ok(report) => {
            info!(
                "{}: {} rows written to {}",
                report.season.label(),
                report.exported_rows,
                report.files.csv.display()
            );
            Ok(())
        }
        Err(e) => {
            error!("refresh of {} failed: {}", season.label(), e);
            Err(e).with_context(|| format!("refresh of {} failed", season.label()))
        }
    }
}

/// Log to stderr; stdout stays free for piping.
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("rinkview=info,warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
