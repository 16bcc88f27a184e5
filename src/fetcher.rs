use std::future::Future;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use thiserror::Error;
use tracing::debug;

use crate::settings::Settings;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request for {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} returned {status}")]
    Status { url: String, status: StatusCode },
}

/// Source of per-word dictionary pages. Returns the raw page markup.
pub trait DocumentFetcher: Send + Sync + 'static {
    fn fetch(&self, word: &str) -> impl Future<Output = Result<String, FetchError>> + Send;
}

/// Lookup URL for a word: base URL followed by the lower-cased word.
pub fn word_url(base_url: &str, word: &str) -> String {
    format!("{}{}", base_url, word.to_lowercase())
}

pub struct HttpFetcher {
    client: reqwest::Client,
    base_url: String,
}

impl HttpFetcher {
    pub fn new(settings: &Settings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .user_agent(settings.user_agent.as_str())
            .build()
            .context("Failed to build HTTP client")?;
        Ok(HttpFetcher {
            client,
            base_url: settings.base_url.clone(),
        })
    }
}

impl DocumentFetcher for HttpFetcher {
    async fn fetch(&self, word: &str) -> Result<String, FetchError> {
        let url = word_url(&self.base_url, word);
        let start = Instant::now();

        let response = match self.client.get(&url).send().await {
            Ok(r) => r,
            Err(source) => return Err(FetchError::Transport { url, source }),
        };
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status { url, status });
        }

        let body = match response.text().await {
            Ok(b) => b,
            Err(source) => return Err(FetchError::Transport { url, source }),
        };
        debug!(
            "Fetched {} ({} bytes) in {}ms",
            url,
            body.len(),
            start.elapsed().as_millis()
        );
        Ok(body)
    }
}

// ── Tests ──
