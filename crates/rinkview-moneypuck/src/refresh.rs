// End-to-end refresh: obtain the raw skater summary, normalize it, write the
// season files.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};

use rinkview_core::config::RefreshConfig;
use rinkview_core::http::{FetchError, HttpFetcher};
use rinkview_core::season::Season;

use crate::export::{export_season, ExportedFiles};
use crate::raw::{load_raw_from_reader, RawSkaterRow};
use crate::summary::build_summary;

#[derive(Debug, Error)]
pub enum RefreshError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("{0}")]
    Validation(String),
}

/// Where the raw skater summary comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawSource {
    /// Download from this URL.
    Remote(String),
    /// Read a previously downloaded file.
    File(PathBuf),
}

#[derive(Debug, Clone)]
pub struct RefreshOptions {
    pub season: Season,
    pub source: RawSource,
    pub output_dir: PathBuf,
    pub min_icetime_seconds: f64,
    pub write_json: bool,
}

impl RefreshOptions {
    /// Options for `season` from the `[refresh]` config section, downloading
    /// from the configured source.
    pub fn from_config(config: &RefreshConfig, season: Season) -> Self {
        RefreshOptions {
            season,
            source: RawSource::Remote(season.url(&config.source_url_template)),
            output_dir: PathBuf::from(&config.output_dir),
            min_icetime_seconds: config.min_icetime_seconds,
            write_json: true,
        }
    }
}

/// Outcome of a successful refresh.
#[derive(Debug, Clone)]
pub struct RefreshReport {
    pub season: Season,
    pub raw_rows: usize,
    pub exported_rows: usize,
    pub files: ExportedFiles,
}

/// Run the refresh described by `opts`. `fetcher` is only used for
/// [`RawSource::Remote`].
pub async fn run(opts: &RefreshOptions, fetcher: &HttpFetcher) -> Result<RefreshReport, RefreshError> {
    info!("refreshing {} season data", opts.season.label());

    let raw = match &opts.source {
        RawSource::Remote(url) => {
            info!("fetching {}", url);
            let body = fetcher.get_text(url).await?;
            load_raw_from_reader(body.as_bytes())?
        }
        RawSource::File(path) => read_raw_file(path)?,
    };

    if raw.is_empty() {
        return Err(RefreshError::Validation(
            "raw skater summary contained no rows".to_string(),
        ));
    }
    info!("read {} raw skater rows", raw.len());

    let foreign = raw
        .iter()
        .filter(|r| r.season != opts.season.start_year())
        .count();
    if foreign > 0 {
        warn!(
            "{} rows are tagged with a season other than {}",
            foreign,
            opts.season.start_year()
        );
    }

    let summary = build_summary(&raw, opts.min_icetime_seconds);
    let files = export_season(&opts.output_dir, opts.season, &summary, opts.write_json)?;

    info!(
        "refresh complete: {} of {} rows exported for {}",
        summary.len(),
        raw.len(),
        opts.season.label()
    );

    Ok(RefreshReport {
        season: opts.season,
        raw_rows: raw.len(),
        exported_rows: summary.len(),
        files,
    })
}

fn read_raw_file(path: &Path) -> Result<Vec<RawSkaterRow>, RefreshError> {
    let file = std::fs::File::open(path).map_err(|e| RefreshError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    Ok(load_raw_from_reader(file)?)
}
