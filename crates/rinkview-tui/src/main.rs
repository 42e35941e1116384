// rinkview entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, not terminal)
// 2. Load config
// 3. Create mpsc channels and the season source
// 4. Spawn app logic task
// 5. Run the TUI until the user quits
// 6. Cleanup on exit

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::sync::mpsc;
use tracing::{error, info};

use rinkview_core::config;
use rinkview_core::season::Season;
use rinkview_tui::app::{self, AppState};
use rinkview_tui::source::HttpSeasonSource;
use rinkview_tui::tui;

#[derive(Parser)]
#[command(name = "rinkview")]
#[command(about = "Per-season skater metrics in the terminal", long_about = None)]
struct Cli {
    /// Season start year to open (must be one of `data.seasons`)
    #[arg(long)]
    season: Option<u16>,

    /// Directory containing `config/` and `defaults/`
    #[arg(long)]
    config_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing()?;
    info!("rinkview starting up");

    let config =
        config::load_config(cli.config_dir.as_deref()).context("failed to load configuration")?;
    let seasons = config.seasons();
    let initial = match cli.season {
        Some(year) => {
            let season = Season::new(year);
            if !seasons.contains(&season) {
                anyhow::bail!(
                    "season {} is not configured (data.seasons: {:?})",
                    year,
                    config.data.seasons
                );
            }
            season
        }
        None => config.initial_season(),
    };
    info!(
        "config loaded: {} seasons, opening {}",
        seasons.len(),
        initial.label()
    );

    let (load_tx, load_rx) = mpsc::channel(16);
    let (cmd_tx, cmd_rx) = mpsc::channel(64);
    let (ui_tx, ui_rx) = mpsc::channel(256);

    let source = Arc::new(
        HttpSeasonSource::from_config(&config).context("failed to set up the stats client")?,
    );
    let app_state = AppState::new(seasons, initial, source, load_tx);

    let app_handle = tokio::spawn(async move {
        if let Err(e) = app::run(load_rx, cmd_rx, ui_tx, app_state).await {
            error!("application loop error: {}", e);
        }
    });

    if let Err(e) = tui::run(ui_rx, cmd_tx).await {
        error!("TUI error: {}", e);
    }

    let _ = tokio::time::timeout(std::time::Duration::from_secs(5), async {
        let _ = app_handle.await;
    })
    .await;

    info!("rinkview shut down cleanly");
    Ok(())
}

/// Log to a file; the terminal belongs to the TUI.
///
/// Uses the platform data directory when one is available, otherwise
/// `./logs`.
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = match directories::ProjectDirs::from("", "", "rinkview") {
        Some(dirs) => dirs.data_dir().join("logs"),
        None => std::env::current_dir()?.join("logs"),
    };
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("failed to create {}", log_dir.display()))?;

    let log_file = std::fs::File::create(log_dir.join("rinkview.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("rinkview=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
