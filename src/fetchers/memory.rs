use crate::fetchers::{FetchError, PageFetcher, with_timeout};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::{Mutex, MutexGuard};
use url::Url;

/// What an in-memory page answers with
#[derive(Debug, Clone)]
pub enum MemoryPage {
    /// 200 with this body
    Body(String),
    /// A non-success status
    Status(u16),
    /// The body, after a delay
    Delayed(Duration, String),
    /// Never answers
    Hang,
}

/// Serves fixture pages from memory and counts requests
#[derive(Debug, Default)]
pub struct MemoryFetcher {
    pages: HashMap<String, MemoryPage>,
    requests: AtomicUsize,
    /// When set, pages load one at a time like a single browser session
    serial: Option<Mutex<()>>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, page: MemoryPage) -> Self {
        self.pages.insert(url.to_string(), page);
        self
    }

    pub fn with_body(self, url: &str, body: &str) -> Self {
        self.with_page(url, MemoryPage::Body(body.to_string()))
    }

    /// Load pages one at a time
    pub fn serialized(mut self) -> Self {
        self.serial = Some(Mutex::new(()));
        self
    }

    /// Number of fetches issued so far
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

impl PageFetcher for MemoryFetcher {
    async fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        let _turn = self.take_turn().await;
        self.respond(url).await
    }

    async fn fetch_within(&self, url: &Url, timeout: Duration) -> Result<String, FetchError> {
        let _turn = self.take_turn().await;
        with_timeout(timeout, self.respond(url)).await
    }
}

impl MemoryFetcher {
    async fn take_turn(&self) -> Option<MutexGuard<'_, ()>> {
        match &self.serial {
            Some(serial) => Some(serial.lock().await),
            None => None,
        }
    }

    async fn respond(&self, url: &Url) -> Result<String, FetchError> {
        self.requests.fetch_add(1, Ordering::SeqCst);

        match self.pages.get(url.as_str()).cloned() {
            Some(MemoryPage::Body(body)) => Ok(body),
            Some(MemoryPage::Status(status)) => Err(FetchError::Status {
                status,
                reason: String::new(),
            }),
            Some(MemoryPage::Delayed(delay, body)) => {
                tokio::time::sleep(delay).await;
                Ok(body)
            }
            Some(MemoryPage::Hang) => std::future::pending().await,
            None => Err(FetchError::Status {
                status: 404,
                reason: "Not Found".to_string(),
            }),
        }
    }
}
