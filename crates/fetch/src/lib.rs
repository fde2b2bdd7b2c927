//! ogmap document sources: load a feed from an `http(s)://` URL or a local
//! file. One attempt per document; a failure is reported, never retried.

#![forbid(unsafe_code)]

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::{Duration, Instant};

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub mod universe;

pub use universe::{HighscoreType, Universe, ALL_HIGHSCORE_TYPES};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("downloading {url}: {source}")]
    Http { url: String, #[source] source: reqwest::Error },
    #[error("downloading {url}: server answered {status}")]
    Status { url: String, status: u16 },
    #[error("reading {}: {source}", .path.display())]
    Io { path: PathBuf, #[source] source: std::io::Error },
    #[error("invalid universe {0:?} (expected <number>-<community>, e.g. 178-cz)")]
    InvalidUniverse(String),
}

/// Where a document comes from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum Source {
    Url(String),
    File(PathBuf),
}

impl Source {
    /// `http://` and `https://` are URLs, anything else is a path.
    pub fn parse(raw: &str) -> Self {
        let lower = raw.trim_start().to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Source::Url(raw.trim().to_string())
        } else {
            Source::File(PathBuf::from(raw))
        }
    }
}

impl FromStr for Source {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> { Ok(Self::parse(s)) }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Url(u) => f.write_str(u),
            Source::File(p) => write!(f, "{}", p.display()),
        }
    }
}

/// Loads documents. Holds one HTTP client for the whole run.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    timeout: Duration,
}

impl Fetcher {
    pub fn new(timeout: Duration) -> Self {
        Self { client: Client::new(), timeout }
    }

    pub async fn load(&self, source: &Source) -> Result<String, FetchError> {
        let started = Instant::now();
        let text = match source {
            Source::Url(url) => self.download(url).await?,
            Source::File(path) => tokio::fs::read_to_string(path)
                .await
                .map_err(|source| FetchError::Io { path: path.clone(), source })?,
        };
        debug!(source = %source, bytes = text.len(), elapsed_ms = started.elapsed().as_millis() as u64, "document loaded");
        Ok(text)
    }

    async fn download(&self, url: &str) -> Result<String, FetchError> {
        info!(url = %url, "downloading");
        let http = |source| FetchError::Http { url: url.to_string(), source };
        let response = self.client.get(url).timeout(self.timeout).send().await.map_err(http)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status { url: url.to_string(), status: status.as_u16() });
        }
        response.text().await.map_err(http)
    }
}

impl Default for Fetcher {
    fn default() -> Self { Self::new(DEFAULT_TIMEOUT) }
}
