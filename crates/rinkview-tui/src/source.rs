// Where season stats files come from.

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

use rinkview_core::config::Config;
use rinkview_core::http::{FetchError, HttpFetcher};
use rinkview_core::season::Season;
use rinkview_core::store::{ParseError, StatStore};

#[derive(Debug, Error)]
pub enum SourceError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("could not parse {season} stats: {source}")]
    Parse { season: Season, source: ParseError },
}

/// Retrieves and parses one season's stats file.
#[async_trait]
pub trait SeasonSource: Send + Sync {
    async fn load(&self, season: Season) -> Result<StatStore, SourceError>;
}

/// Fetches `hockey_stats_{season}.csv` over HTTP from a URL template.
pub struct HttpSeasonSource {
    fetcher: HttpFetcher,
    url_template: String,
}

impl HttpSeasonSource {
    pub fn new(fetcher: HttpFetcher, url_template: impl Into<String>) -> Self {
        HttpSeasonSource {
            fetcher,
            url_template: url_template.into(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, FetchError> {
        Ok(Self::new(
            HttpFetcher::from_config(&config.http)?,
            config.data.url_template.clone(),
        ))
    }

    pub fn url_for(&self, season: Season) -> String {
        season.url(&self.url_template)
    }
}

#[async_trait]
impl SeasonSource for HttpSeasonSource {
    async fn load(&self, season: Season) -> Result<StatStore, SourceError> {
        let url = self.url_for(season);
        let body = self.fetcher.get_text(&url).await?;
        let store = StatStore::load(&body).map_err(|e| SourceError::Parse { season, source: e })?;
        info!("loaded {} records for {}", store.len(), season.label());
        Ok(store)
    }
}
