// Configuration loading and parsing (config/rinkview.toml).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::season::{Season, SEASON_PLACEHOLDER};

/// File name of the single configuration file under `config/`.
pub const CONFIG_FILE_NAME: &str = "rinkview.toml";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Config structs
// ---------------------------------------------------------------------------

/// The assembled configuration for both the dashboard and the refresh tool.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub data: DataConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub refresh: RefreshConfig,
}

/// Where the per-season stats files live and which seasons can be selected.
#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    /// URL with a `{season}` placeholder, e.g.
    /// `https://example.org/data/hockey_stats_{season}.csv`.
    pub url_template: String,
    /// Closed list of selectable seasons (start year of each season).
    pub seasons: Vec<u16>,
    /// Season loaded on startup. Falls back to the latest configured season.
    #[serde(default)]
    pub default_season: Option<u16>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Retry a failed fetch exactly once before giving up.
    #[serde(default = "default_retry_once")]
    pub retry_once: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        HttpConfig {
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
            retry_once: default_retry_once(),
        }
    }
}

/// Settings for `rinkview-refresh`, the season summary builder.
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshConfig {
    #[serde(default = "default_source_url_template")]
    pub source_url_template: String,
    /// Sent instead of `http.user_agent` when downloading raw data.
    #[serde(default = "default_refresh_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_min_icetime_seconds")]
    pub min_icetime_seconds: f64,
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        RefreshConfig {
            source_url_template: default_source_url_template(),
            user_agent: default_refresh_user_agent(),
            min_icetime_seconds: default_min_icetime_seconds(),
            output_dir: default_output_dir(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    15
}

fn default_user_agent() -> String {
    concat!("rinkview/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_retry_once() -> bool {
    true
}

fn default_source_url_template() -> String {
    "https://moneypuck.com/moneypuck/playerData/seasonSummary/{season}/regular/skaters.csv"
        .to_string()
}

fn default_refresh_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36"
        .to_string()
}

fn default_min_icetime_seconds() -> f64 {
    6000.0
}

fn default_output_dir() -> String {
    "data".to_string()
}

impl Config {
    /// The configured seasons as `Season` values, in file order.
    pub fn seasons(&self) -> Vec<Season> {
        self.data.seasons.iter().copied().map(Season::new).collect()
    }

    /// The season to load on startup.
    ///
    /// `default_season` when set, otherwise the latest configured season.
    pub fn initial_season(&self) -> Season {
        match self.data.default_season {
            Some(year) => Season::new(year),
            None => self
                .data
                .seasons
                .iter()
                .copied()
                .max()
                .map(Season::new)
                .unwrap_or_else(|| Season::new(0)),
        }
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate `config/rinkview.toml` relative to `base_dir`.
///
/// Does not copy defaults; `load_config()` does that first.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join(CONFIG_FILE_NAME);
    let text = read_file(&path)?;
    let config = parse_config(&text).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        source: e,
    })?;

    validate(&config)?;

    Ok(config)
}

/// Parse config TOML text without validating it.
pub fn parse_config(text: &str) -> Result<Config, toml::de::Error> {
    toml::from_str(text)
}

/// Ensure all config files exist by copying missing ones from `defaults/`.
/// Returns the list of files that were copied. Skips `.example` files.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    if !defaults_dir.exists() {
        if !config_dir.exists() {
            return Err(ConfigError::DefaultsCopyError {
                message: format!(
                    "neither defaults/ nor config/ directory found in {}; \
                     run from the project root or pass --config-dir",
                    base_dir.display()
                ),
            });
        }
        return Ok(vec![]);
    }

    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create config directory: {e}"),
    })?;

    let mut copied = Vec::new();

    let entries = std::fs::read_dir(&defaults_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to read defaults directory: {e}"),
    })?;

    for entry in entries {
        let entry = entry.map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to read defaults entry: {e}"),
        })?;
        let path = entry.path();

        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name() else {
            continue;
        };
        if file_name.to_str().is_some_and(|n| n.ends_with(".example")) {
            continue;
        }
        let target = config_dir.join(file_name);

        match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
        {
            Ok(mut dest) => {
                let content = std::fs::read(&path).map_err(|e| ConfigError::DefaultsCopyError {
                    message: format!("failed to read {}: {e}", path.display()),
                })?;
                std::io::Write::write_all(&mut dest, &content).map_err(|e| {
                    ConfigError::DefaultsCopyError {
                        message: format!("failed to write {}: {e}", target.display()),
                    }
                })?;
                copied.push(target);
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {}
            Err(e) => {
                return Err(ConfigError::DefaultsCopyError {
                    message: format!("failed to create {}: {e}", target.display()),
                });
            }
        }
    }

    Ok(copied)
}

/// Load config relative to `base_dir`, or the current working directory when
/// `None`. Default config files are copied before loading.
pub fn load_config(base_dir: Option<&Path>) -> Result<Config, ConfigError> {
    let base = match base_dir {
        Some(dir) => dir.to_path_buf(),
        None => std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
            path: PathBuf::from("."),
        })?,
    };
    ensure_config_files(&base)?;
    load_config_from(&base)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

pub fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.data.seasons.is_empty() {
        return Err(ConfigError::ValidationError {
            field: "data.seasons".into(),
            message: "must list at least one season".into(),
        });
    }

    let mut sorted = config.data.seasons.clone();
    sorted.sort_unstable();
    sorted.dedup();
    if sorted.len() != config.data.seasons.len() {
        return Err(ConfigError::ValidationError {
            field: "data.seasons".into(),
            message: "must not contain duplicates".into(),
        });
    }

    if let Some(default) = config.data.default_season {
        if !config.data.seasons.contains(&default) {
            return Err(ConfigError::ValidationError {
                field: "data.default_season".into(),
                message: format!("{default} is not one of the configured seasons"),
            });
        }
    }

    if !config.data.url_template.contains(SEASON_PLACEHOLDER) {
        return Err(ConfigError::ValidationError {
            field: "data.url_template".into(),
            message: format!("must contain the {SEASON_PLACEHOLDER} placeholder"),
        });
    }

    for (field, agent) in [
        ("http.user_agent", &config.http.user_agent),
        ("refresh.user_agent", &config.refresh.user_agent),
    ] {
        if reqwest::header::HeaderValue::from_str(agent).is_err() {
            return Err(ConfigError::ValidationError {
                field: field.into(),
                message: "must be a valid HTTP header value".into(),
            });
        }
    }

    if config.http.timeout_secs == 0 {
        return Err(ConfigError::ValidationError {
            field: "http.timeout_secs".into(),
            message: "must be greater than 0".into(),
        });
    }

    if !config.refresh.source_url_template.contains(SEASON_PLACEHOLDER) {
        return Err(ConfigError::ValidationError {
            field: "refresh.source_url_template".into(),
            message: format!("must contain the {SEASON_PLACEHOLDER} placeholder"),
        });
    }

    let min_icetime = config.refresh.min_icetime_seconds;
    if !min_icetime.is_finite() || min_icetime < 0.0 {
        return Err(ConfigError::ValidationError {
            field: "refresh.min_icetime_seconds".into(),
            message: format!("must be a non-negative number, got {min_icetime}"),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    /// Locate the workspace root (the directory holding `defaults/`) whether
    /// tests run from the crate directory or the workspace root.
    fn project_root() -> PathBuf {
        let cwd = std::env::current_dir().unwrap();
        for candidate in [cwd.clone(), cwd.join("../.."), cwd.join("..")] {
            if candidate.join("defaults").join(CONFIG_FILE_NAME).exists() {
                return candidate;
            }
        }
        panic!("Cannot locate defaults/ directory from CWD {:?}", cwd);
    }

    fn scratch_dir(name: &str) -> PathBuf {
        let tmp = std::env::temp_dir().join(format!("rinkview_{name}"));
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("config")).unwrap();
        tmp
    }

    fn write_config(dir: &Path, text: &str) {
        fs::write(dir.join("config").join(CONFIG_FILE_NAME), text).unwrap();
    }

    fn default_text() -> String {
        fs::read_to_string(project_root().join("defaults").join(CONFIG_FILE_NAME)).unwrap()
    }

    #[test]
    fn load_valid_config_from_project_defaults() {
        let tmp = scratch_dir("config_defaults");
        write_config(&tmp, &default_text());

        let config = load_config_from(&tmp).expect("should load valid config");
        assert_eq!(config.data.seasons, vec![2021, 2022, 2023, 2024]);
        assert_eq!(config.data.default_season, Some(2024));
        assert!(config.data.url_template.contains("{season}"));
        assert_eq!(config.http.timeout_secs, 15);
        assert!(config.http.retry_once);
        assert!((config.refresh.min_icetime_seconds - 6000.0).abs() < f64::EPSILON);
        assert_eq!(config.refresh.output_dir, "data");

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn optional_sections_fall_back_to_defaults() {
        let tmp = scratch_dir("config_minimal");
        write_config(
            &tmp,
            r#"
[data]
url_template = "https://example.org/stats_{season}.csv"
seasons = [2022, 2023]
"#,
        );

        let config = load_config_from(&tmp).expect("minimal config should load");
        assert_eq!(config.http.timeout_secs, 15);
        assert!(config.http.retry_once);
        assert!(config.refresh.source_url_template.contains("moneypuck.com"));
        assert_eq!(config.initial_season(), Season::new(2023));

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn initial_season_prefers_default_season() {
        let config = parse_config(
            r#"
[data]
url_template = "https://example.org/stats_{season}.csv"
seasons = [2021, 2022, 2023]
default_season = 2022
"#,
        )
        .unwrap();
        assert_eq!(config.initial_season(), Season::new(2022));
        assert_eq!(
            config.seasons(),
            vec![Season::new(2021), Season::new(2022), Season::new(2023)]
        );
    }

    fn expect_validation_field(text: &str, expected: &str) {
        let config = parse_config(text).expect("test TOML should parse");
        match validate(&config).unwrap_err() {
            ConfigError::ValidationError { field, .. } => assert_eq!(field, expected),
            other => panic!("expected ValidationError, got: {other}"),
        }
    }

    #[test]
    fn rejects_empty_seasons() {
        expect_validation_field(
            r#"
[data]
url_template = "https://example.org/stats_{season}.csv"
seasons = []
"#,
            "data.seasons",
        );
    }

    #[test]
    fn rejects_duplicate_seasons() {
        expect_validation_field(
            r#"
[data]
url_template = "https://example.org/stats_{season}.csv"
seasons = [2023, 2023]
"#,
            "data.seasons",
        );
    }

    #[test]
    fn rejects_default_season_outside_list() {
        expect_validation_field(
            r#"
[data]
url_template = "https://example.org/stats_{season}.csv"
seasons = [2022, 2023]
default_season = 2019
"#,
            "data.default_season",
        );
    }

    #[test]
    fn rejects_template_without_placeholder() {
        expect_validation_field(
            r#"
[data]
url_template = "https://example.org/stats.csv"
seasons = [2023]
"#,
            "data.url_template",
        );
    }

    #[test]
    fn rejects_zero_timeout() {
        expect_validation_field(
            r#"
[data]
url_template = "https://example.org/stats_{season}.csv"
seasons = [2023]

[http]
timeout_secs = 0
"#,
            "http.timeout_secs",
        );
    }

    #[test]
    fn rejects_refresh_template_without_placeholder() {
        expect_validation_field(
            r#"
[data]
url_template = "https://example.org/stats_{season}.csv"
seasons = [2023]

[refresh]
source_url_template = "https://example.org/skaters.csv"
"#,
            "refresh.source_url_template",
        );
    }

    #[test]
    fn rejects_user_agent_that_is_not_a_header_value() {
        expect_validation_field(
            r#"
[data]
url_template = "https://example.org/stats_{season}.csv"
seasons = [2023]

[http]
user_agent = "rinkview\nX-Injected: 1"
"#,
            "http.user_agent",
        );
        expect_validation_field(
            r#"
[data]
url_template = "https://example.org/stats_{season}.csv"
seasons = [2023]

[refresh]
user_agent = "bad\ragent"
"#,
            "refresh.user_agent",
        );
    }

    #[test]
    fn file_not_found_for_missing_config() {
        let tmp = scratch_dir("config_missing");

        match load_config_from(&tmp).unwrap_err() {
            ConfigError::FileNotFound { path } => assert!(path.ends_with(CONFIG_FILE_NAME)),
            other => panic!("expected FileNotFound, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn parse_error_for_invalid_toml() {
        let tmp = scratch_dir("config_invalid");
        write_config(&tmp, "this is not valid [[[ toml");

        match load_config_from(&tmp).unwrap_err() {
            ConfigError::ParseError { path, .. } => assert!(path.ends_with(CONFIG_FILE_NAME)),
            other => panic!("expected ParseError, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_files_copies_missing_files() {
        let tmp = std::env::temp_dir().join("rinkview_config_ensure_copies");
        let _ = fs::remove_dir_all(&tmp);
        let defaults_dir = tmp.join("defaults");
        fs::create_dir_all(&defaults_dir).unwrap();
        fs::write(defaults_dir.join(CONFIG_FILE_NAME), default_text()).unwrap();
        fs::write(defaults_dir.join("rinkview.toml.example"), "# sample\n").unwrap();

        assert!(!tmp.join("config").exists());

        let copied = ensure_config_files(&tmp).expect("should succeed");
        assert_eq!(copied.len(), 1);
        assert!(tmp.join("config").join(CONFIG_FILE_NAME).exists());
        assert!(!tmp.join("config/rinkview.toml.example").exists());

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_files_skips_existing() {
        let tmp = std::env::temp_dir().join("rinkview_config_ensure_skips");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("defaults")).unwrap();
        fs::create_dir_all(tmp.join("config")).unwrap();
        fs::write(tmp.join("defaults").join(CONFIG_FILE_NAME), default_text()).unwrap();
        fs::write(tmp.join("config").join(CONFIG_FILE_NAME), "# custom\n").unwrap();

        let copied = ensure_config_files(&tmp).expect("should succeed");
        assert!(copied.is_empty());
        let content = fs::read_to_string(tmp.join("config").join(CONFIG_FILE_NAME)).unwrap();
        assert_eq!(content, "# custom\n");

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_files_errors_when_both_dirs_missing() {
        let tmp = std::env::temp_dir().join("rinkview_config_both_missing");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(&tmp).unwrap();

        match ensure_config_files(&tmp).unwrap_err() {
            ConfigError::DefaultsCopyError { message } => {
                assert!(message.contains("neither defaults/ nor config/"));
            }
            other => panic!("expected DefaultsCopyError, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }
}
