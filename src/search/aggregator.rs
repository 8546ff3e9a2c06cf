use crate::fetchers::PageFetcher;
use crate::parsers::{html, text};
use crate::results::{ResultSet, SearchResultItem};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::task::{JoinError, JoinHandle};
use url::Url;

/// A failure that escaped per-page isolation
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("search task for {page} did not complete: {source}")]
    Task {
        page: Url,
        #[source]
        source: JoinError,
    },
}

/// Searches a fixed list of sibling pages concurrently
#[derive(Debug)]
pub struct SearchAggregator<F: PageFetcher> {
    fetcher: Arc<F>,
    pages: Vec<Url>,
    fetch_timeout: Duration,
    min_query_len: usize,
}

impl<F: PageFetcher> SearchAggregator<F> {
    pub fn new(fetcher: F, pages: Vec<Url>) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
            pages,
            fetch_timeout: Duration::from_secs(10),
            min_query_len: 2,
        }
    }

    /// Bound on each page's fetch; a page that takes longer contributes nothing
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    pub fn with_min_query_len(mut self, len: usize) -> Self {
        self.min_query_len = len;
        self
    }

    pub fn pages(&self) -> &[Url] {
        &self.pages
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Whether `query` is long enough to search and keeps some text once
    /// case and accents are folded away
    pub fn is_searchable(&self, query: &str) -> bool {
        query.trim().chars().count() >= self.min_query_len
            && !text::search_form(query).is_empty()
    }

    /// Fetch and search every page, returning unique results in page order
    /// then document order.
    ///
    /// Queries too short to search return an empty set without fetching.
    /// Pages that fail or time out are logged and contribute nothing.
    pub async fn collect(&self, query: &str) -> Result<ResultSet, SearchError> {
        let query = query.trim();
        if !self.is_searchable(query) {
            return Ok(ResultSet::new());
        }

        ::log::info!("Searching {} pages for {:?}", self.pages.len(), query);

        // Start every fetch before awaiting any of them
        let tasks: Vec<(Url, JoinHandle<Vec<SearchResultItem>>)> = self
            .pages
            .iter()
            .map(|page| {
                let fetcher = Arc::clone(&self.fetcher);
                let url = page.clone();
                let query = query.to_string();
                let timeout = self.fetch_timeout;
                let handle =
                    tokio::spawn(async move { search_page(&*fetcher, &url, &query, timeout).await });
                (page.clone(), handle)
            })
            .collect();

        let mut results = ResultSet::new();
        for (page, handle) in tasks {
            let items = handle
                .await
                .map_err(|source| SearchError::Task { page, source })?;
            results.extend(items);
        }

        ::log::info!("Search for {:?} found {} unique results", query, results.len());
        Ok(results)
    }
}

/// Fetch one page and extract its matches. Never fails: problems are logged
/// and yield no results.
async fn search_page<F: PageFetcher>(
    fetcher: &F,
    page: &Url,
    query: &str,
    timeout: Duration,
) -> Vec<SearchResultItem> {
    let started = std::time::Instant::now();

    let body = match fetcher.fetch_within(page, timeout).await {
        Ok(body) => body,
        Err(e) => {
            ::log::error!("Failed to fetch {}: {}", page, e);
            return Vec::new();
        }
    };

    let matches = html::extract_matches(&body, page, query);
    ::log::debug!(
        "Searched {} in {:.2} seconds: {} matches",
        page,
        started.elapsed().as_secs_f64(),
        matches.len()
    );
    matches
}
