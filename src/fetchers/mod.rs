//! Backends that turn a page URL into its HTML source.

pub mod file;
pub mod http;
pub mod memory;
pub mod webdriver;

use crate::config::{BackendKind, SiteConfig};
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use url::Url;

pub use file::FileFetcher;
pub use http::HttpFetcher;
pub use memory::{MemoryFetcher, MemoryPage};
pub use webdriver::WebDriverFetcher;

/// Why a single page contributed nothing to a search
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP status {status} {reason}")]
    Status { status: u16, reason: String },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("webdriver error: {0}")]
    WebDriver(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unsupported URL scheme: {0}")]
    UnsupportedScheme(String),

    #[error("page not found: {0}")]
    NotFound(String),
}

/// Fetches the HTML body of one page
pub trait PageFetcher: Send + Sync + 'static {
    fn fetch(&self, url: &Url) -> impl Future<Output = Result<String, FetchError>> + Send;

    /// Like [`fetch`](Self::fetch), bounded by `timeout`. Backends that queue
    /// on a shared resource start the clock once their turn comes.
    fn fetch_within(
        &self,
        url: &Url,
        timeout: Duration,
    ) -> impl Future<Output = Result<String, FetchError>> + Send {
        with_timeout(timeout, self.fetch(url))
    }
}

/// Runs `load`, turning expiry of `timeout` into [`FetchError::Timeout`]
pub async fn with_timeout<F>(timeout: Duration, load: F) -> Result<String, FetchError>
where
    F: Future<Output = Result<String, FetchError>>,
{
    tokio::time::timeout(timeout, load)
        .await
        .unwrap_or_else(|_| Err(FetchError::Timeout(timeout)))
}

/// Fetcher for the remote pages of a site
#[derive(Debug)]
pub enum RemoteFetcher {
    Http(HttpFetcher),
    WebDriver(WebDriverFetcher),
}

/// Dispatches `file://` pages to disk and everything else to the configured backend
#[derive(Debug)]
pub struct SiteFetcher {
    remote: RemoteFetcher,
    file: FileFetcher,
}

impl SiteFetcher {
    pub fn new(remote: RemoteFetcher) -> Self {
        Self {
            remote,
            file: FileFetcher,
        }
    }

    /// Build the backend named in the configuration
    pub fn from_config(config: &SiteConfig) -> Result<Self, FetchError> {
        let remote = match config.backend {
            BackendKind::Http => RemoteFetcher::Http(HttpFetcher::new(config.cache_bust)?),
            BackendKind::WebDriver => {
                RemoteFetcher::WebDriver(WebDriverFetcher::new(&config.webdriver_url))
            }
        };
        ::log::info!("Using {:?} backend", config.backend);
        Ok(Self::new(remote))
    }

    /// Release backend resources (WebDriver sessions)
    pub async fn close(&self) {
        if let RemoteFetcher::WebDriver(fetcher) = &self.remote {
            fetcher.close().await;
        }
    }
}

impl PageFetcher for SiteFetcher {
    async fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        if url.scheme() == "file" {
            return self.file.fetch(url).await;
        }
        match &self.remote {
            RemoteFetcher::Http(fetcher) => fetcher.fetch(url).await,
            RemoteFetcher::WebDriver(fetcher) => fetcher.fetch(url).await,
        }
    }

    async fn fetch_within(&self, url: &Url, timeout: Duration) -> Result<String, FetchError> {
        if url.scheme() == "file" {
            return self.file.fetch_within(url, timeout).await;
        }
        match &self.remote {
            RemoteFetcher::Http(fetcher) => fetcher.fetch_within(url, timeout).await,
            RemoteFetcher::WebDriver(fetcher) => fetcher.fetch_within(url, timeout).await,
        }
    }
}
