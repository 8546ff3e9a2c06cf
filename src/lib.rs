#![allow(clippy::too_many_arguments)]

// Re-export modules
pub mod accordion;
pub mod chrome;
pub mod config;
pub mod delay;
pub mod fetchers;
pub mod filter;
pub mod layout;
pub mod parsers;
pub mod results;
pub mod search;
pub mod utils;

// Re-export commonly used types for convenience
pub use accordion::{AccordionController, GroupId, GroupState};
pub use config::{BackendKind, SiteConfig};
pub use fetchers::{FetchError, PageFetcher, SiteFetcher};
pub use results::{ResultSet, SearchResultItem};
pub use search::{SearchAggregator, SearchOutcome, SearchSession};

use filter::PageFilter;
use url::Url;

/// Main builder for searching a site's sibling pages
pub struct SiteSearch {
    config: SiteConfig,
    pages: Vec<String>,
    fetch_timeout: Option<u64>,
    backend: Option<BackendKind>,
}

impl SiteSearch {
    /// Create a new builder from the given configuration
    pub fn new(config: SiteConfig) -> Self {
        Self {
            config,
            pages: Vec::new(),
            fetch_timeout: None,
            backend: None,
        }
    }

    /// Search these pages instead of the configured list
    pub fn with_pages(mut self, pages: Vec<String>) -> Self {
        self.pages = pages;
        self.apply_overrides();
        self
    }

    /// Set the per-page fetch timeout
    pub fn with_fetch_timeout(mut self, timeout_seconds: u64) -> Self {
        self.fetch_timeout = Some(timeout_seconds);
        self.apply_overrides();
        self
    }

    /// Set the fetch backend
    pub fn with_backend(mut self, backend: BackendKind) -> Self {
        self.backend = Some(backend);
        self.apply_overrides();
        self
    }

    /// Replace the configuration. Pages, timeout and backend set on the
    /// builder still take precedence.
    pub fn with_config(mut self, config: SiteConfig) -> Self {
        self.config = config;
        self.apply_overrides();
        self
    }

    /// Load configuration from a file
    pub fn with_config_file(
        self,
        path: impl AsRef<std::path::Path>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let config = SiteConfig::from_file(path)?;
        Ok(self.with_config(config))
    }

    /// Load configuration from a string
    pub fn with_config_str(self, config_str: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let config = SiteConfig::from_json(config_str)?;
        Ok(self.with_config(config))
    }

    fn apply_overrides(&mut self) {
        if !self.pages.is_empty() {
            self.config.pages = self.pages.clone();
        }
        if let Some(timeout) = self.fetch_timeout {
            self.config.fetch_timeout_secs = timeout;
        }
        if let Some(backend) = self.backend {
            self.config.backend = backend;
        }
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    /// The configured pages that pass the filter, in order
    pub fn pages(&self) -> Result<Vec<Url>, Box<dyn std::error::Error>> {
        let filter = PageFilter::new(self.config.filter.clone())?;
        Ok(filter.select_pages(&self.config.pages))
    }

    /// Aggregator over the selected pages using `fetcher`
    pub fn aggregator_with<F: PageFetcher>(
        &self,
        fetcher: F,
    ) -> Result<SearchAggregator<F>, Box<dyn std::error::Error>> {
        let pages = self.pages()?;
        if pages.is_empty() {
            ::log::warn!("No pages left to search after filtering");
        }
        Ok(SearchAggregator::new(fetcher, pages)
            .with_fetch_timeout(self.config.fetch_timeout())
            .with_min_query_len(self.config.min_query_len))
    }

    /// Aggregator over the selected pages using the configured backend
    pub fn aggregator(&self) -> Result<SearchAggregator<SiteFetcher>, Box<dyn std::error::Error>> {
        let config = self.config.clone().with_env_overrides();
        self.aggregator_with(SiteFetcher::from_config(&config)?)
    }

    /// Interactive session using the configured backend
    pub fn session(&self) -> Result<SearchSession<SiteFetcher>, Box<dyn std::error::Error>> {
        Ok(SearchSession::from_config(self.aggregator()?, &self.config))
    }
}
