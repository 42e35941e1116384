// Plain-text HTTP retrieval shared by the dashboard and the refresh tool.

use std::time::Duration;

use thiserror::Error;
use tracing::{debug, warn};

use crate::config::HttpConfig;

/// Pause between the first attempt and the single retry.
const RETRY_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
}

/// Fetches text resources with a fixed timeout and user agent.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    retry_once: bool,
}

impl HttpFetcher {
    /// Build a fetcher from explicit settings. Fails when the user agent is
    /// not a valid header value.
    pub fn new(user_agent: &str, timeout: Duration, retry_once: bool) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(FetchError::Client)?;
        Ok(HttpFetcher { client, retry_once })
    }

    pub fn from_config(config: &HttpConfig) -> Result<Self, FetchError> {
        Self::new(
            &config.user_agent,
            Duration::from_secs(config.timeout_secs),
            config.retry_once,
        )
    }

    /// GET `url` and return the body as text.
    ///
    /// When `retry_once` is set, a failed first attempt is retried exactly
    /// once; the second error is returned as-is.
    pub async fn get_text(&self, url: &str) -> Result<String, FetchError> {
        match self.attempt(url).await {
            Ok(body) => Ok(body),
            Err(e) if self.retry_once => {
                warn!("fetch of {} failed ({}), retrying once", url, e);
                tokio::time::sleep(RETRY_DELAY).await;
                self.attempt(url).await
            }
            Err(e) => Err(e),
        }
    }

    async fn attempt(&self, url: &str) -> Result<String, FetchError> {
        debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Request {
                url: url.to_string(),
                source: e,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        let body = response.text().await.map_err(|e| FetchError::Request {
            url: url.to_string(),
            source: e,
        })?;
        debug!("received {} bytes from {}", body.len(), url);
        Ok(body)
    }
}
