use crate::config::SiteConfig;
use crate::delay::Debouncer;
use crate::fetchers::PageFetcher;
use crate::layout::{LayoutMetrics, Point};
use crate::search::aggregator::SearchAggregator;
use crate::search::panel::ResultsPanel;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// How one search invocation ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The query was too short; the panel was cleared
    Cleared,
    /// A newer invocation started before this one finished; nothing rendered
    Superseded,
    /// Results rendered
    Results(usize),
    /// Rendered the no-results message
    NoResults,
    /// Rendered the failure message
    Failed,
}

struct SessionInner<F: PageFetcher> {
    aggregator: SearchAggregator<F>,
    panel: Mutex<ResultsPanel>,
    layout: Mutex<LayoutMetrics>,
    query: Mutex<String>,
    /// Stamp of the most recent invocation; renders from older ones are dropped
    generation: AtomicU64,
    /// Searches scheduled or running
    outstanding: Arc<AtomicUsize>,
    debouncer: Debouncer,
    resize_debouncer: Debouncer,
}

/// Input controller for the search bar and its results panel.
///
/// Cheap to clone; clones share state. Methods that schedule work must be
/// called from within a tokio runtime.
pub struct SearchSession<F: PageFetcher> {
    inner: Arc<SessionInner<F>>,
}

impl<F: PageFetcher> Clone for SearchSession<F> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

/// Holds the outstanding count up until dropped, including when a pending
/// debounced call is aborted
struct Ticket(Arc<AtomicUsize>);

impl Ticket {
    fn issue(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(Arc::clone(counter))
    }
}

impl Drop for Ticket {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl<F: PageFetcher> SearchSession<F> {
    pub fn new(
        aggregator: SearchAggregator<F>,
        panel: ResultsPanel,
        debounce: Duration,
        resize_debounce: Duration,
    ) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                aggregator,
                panel: Mutex::new(panel),
                layout: Mutex::new(LayoutMetrics::default()),
                query: Mutex::new(String::new()),
                generation: AtomicU64::new(0),
                outstanding: Arc::new(AtomicUsize::new(0)),
                debouncer: Debouncer::new(debounce),
                resize_debouncer: Debouncer::new(resize_debounce),
            }),
        }
    }

    pub fn from_config(aggregator: SearchAggregator<F>, config: &SiteConfig) -> Self {
        Self::new(
            aggregator.with_min_query_len(config.min_query_len),
            ResultsPanel::from_config(config),
            config.debounce(),
            config.resize_debounce(),
        )
    }

    pub fn aggregator(&self) -> &SearchAggregator<F> {
        &self.inner.aggregator
    }

    /// Current input value
    pub fn query(&self) -> String {
        lock(&self.inner.query).clone()
    }

    /// Stamp of the most recent search invocation
    pub fn generation(&self) -> u64 {
        self.inner.generation.load(Ordering::SeqCst)
    }

    /// Snapshot of the results panel
    pub fn panel(&self) -> ResultsPanel {
        lock(&self.inner.panel).clone()
    }

    pub fn layout(&self) -> LayoutMetrics {
        *lock(&self.inner.layout)
    }

    /// Whether a debounced search is waiting to fire
    pub fn is_pending(&self) -> bool {
        self.inner.debouncer.is_pending()
    }

    /// The input's value changed
    pub fn input(&self, text: &str) {
        *lock(&self.inner.query) = text.to_string();

        if !self.inner.aggregator.is_searchable(text) {
            self.inner.debouncer.cancel();
            self.clear();
            return;
        }

        if !lock(&self.inner.panel).is_open() {
            // Reopen at once after the panel was dismissed
            self.inner.debouncer.cancel();
            let session = self.clone();
            let ticket = Ticket::issue(&self.inner.outstanding);
            tokio::spawn(async move {
                session.run().await;
                drop(ticket);
            });
            return;
        }

        let session = self.clone();
        let ticket = Ticket::issue(&self.inner.outstanding);
        self.inner.debouncer.call(async move {
            session.run().await;
            drop(ticket);
        });
    }

    /// Enter key or search button: search the current input now
    pub async fn submit(&self) -> SearchOutcome {
        if self.inner.debouncer.cancel() {
            ::log::debug!("Cancelled pending debounced search");
        }
        self.run().await
    }

    /// Set the input and search it immediately
    pub async fn search(&self, query: &str) -> SearchOutcome {
        *lock(&self.inner.query) = query.to_string();
        self.submit().await
    }

    /// A click somewhere on the page. Returns true if it dismissed the panel.
    ///
    /// In-flight searches are not cancelled and may reopen the panel.
    pub fn click_at(&self, point: Point) -> bool {
        let layout = self.layout();
        let mut panel = lock(&self.inner.panel);
        if !panel.is_open() || layout.search_region(panel.height()).contains(point) {
            return false;
        }
        ::log::debug!("Click outside search region, closing results");
        panel.close();
        true
    }

    /// Viewport resize event. Only the last of a burst is applied.
    pub fn on_resize(&self, layout: LayoutMetrics) {
        let session = self.clone();
        self.inner.resize_debouncer.call(async move {
            session.resize(layout);
        });
    }

    /// Host re-measured the page
    pub fn resize(&self, layout: LayoutMetrics) {
        *lock(&self.inner.layout) = layout;
        lock(&self.inner.panel).resize(&layout);
    }

    /// Advance the panel animation by one frame
    pub fn tick(&self, dt: Duration) {
        lock(&self.inner.panel).tick(dt);
    }

    /// Wait until no search is pending or running
    pub async fn settle(&self) {
        while self.inner.outstanding.load(Ordering::SeqCst) > 0 {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }

    /// Invalidate in-flight searches and close the panel
    fn clear(&self) {
        self.inner.generation.fetch_add(1, Ordering::SeqCst);
        lock(&self.inner.panel).close();
    }

    async fn run(&self) -> SearchOutcome {
        let query = self.query().trim().to_string();

        if !self.inner.aggregator.is_searchable(&query) {
            self.clear();
            return SearchOutcome::Cleared;
        }

        let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let _ticket = Ticket::issue(&self.inner.outstanding);
        {
            let layout = self.layout();
            lock(&self.inner.panel).show_searching(&layout);
        }

        let collected = self.inner.aggregator.collect(&query).await;

        let layout = self.layout();
        let mut panel = lock(&self.inner.panel);

        if self.inner.generation.load(Ordering::SeqCst) != generation {
            ::log::debug!(
                "Discarding results for {:?} (generation {} superseded)",
                query,
                generation
            );
            return SearchOutcome::Superseded;
        }

        match collected {
            Ok(results) if results.is_empty() => {
                panel.show_results(results, &layout);
                SearchOutcome::NoResults
            }
            Ok(results) => {
                let count = results.len();
                panel.show_results(results, &layout);
                SearchOutcome::Results(count)
            }
            Err(e) => {
                ::log::error!("Search for {:?} failed: {}", query, e);
                panel.show_failure(&layout);
                SearchOutcome::Failed
            }
        }
    }
}
