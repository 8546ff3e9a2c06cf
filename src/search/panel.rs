use crate::accordion::animation::HeightAnimation;
use crate::config::{Messages, PanelGeometry, SiteConfig};
use crate::layout::LayoutMetrics;
use crate::parsers::ElementKind;
use crate::results::{ResultSet, SearchResultItem};
use crate::utils::{self, html_escape};
use std::time::Duration;

/// Delay between successive result items' entrance animations
pub const RESULT_STAGGER: Duration = Duration::from_millis(80);

/// What the results panel is showing
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PanelContent {
    #[default]
    Empty,
    Searching,
    Results(ResultSet),
    NoResults,
    Failed,
}

/// The region search results render into
#[derive(Debug, Clone)]
pub struct ResultsPanel {
    content: PanelContent,
    animation: HeightAnimation,
    messages: Messages,
    geometry: PanelGeometry,
    margin: f64,
}

impl ResultsPanel {
    pub fn new(
        messages: Messages,
        geometry: PanelGeometry,
        margin: f64,
        transition: Duration,
    ) -> Self {
        Self {
            content: PanelContent::Empty,
            // The panel always animates; only accordion panels snap when tiny
            animation: HeightAnimation::new(transition, 0.0),
            messages,
            geometry,
            margin,
        }
    }

    pub fn from_config(config: &SiteConfig) -> Self {
        Self::new(
            config.messages.clone(),
            config.panel,
            config.results_margin_px,
            config.transition(),
        )
    }

    pub fn content(&self) -> &PanelContent {
        &self.content
    }

    pub fn results(&self) -> Option<&ResultSet> {
        match &self.content {
            PanelContent::Results(results) => Some(results),
            _ => None,
        }
    }

    /// The "active" flag
    pub fn is_open(&self) -> bool {
        self.animation.is_open()
    }

    /// Whether the empty/error visual state is on
    pub fn is_error(&self) -> bool {
        matches!(self.content, PanelContent::NoResults | PanelContent::Failed)
    }

    pub fn height(&self) -> f64 {
        self.animation.height()
    }

    /// Unclamped height of the current content
    pub fn natural_height(&self) -> f64 {
        let rows = match &self.content {
            PanelContent::Empty => return 0.0,
            PanelContent::Results(results) => results.len(),
            PanelContent::Searching | PanelContent::NoResults | PanelContent::Failed => 1,
        };
        rows as f64 * self.geometry.row_height_px + self.geometry.padding_px
    }

    /// Height the panel animates to under `layout`
    pub fn target_height(&self, layout: &LayoutMetrics) -> f64 {
        layout.clamp_results_height(self.natural_height(), self.margin)
    }

    /// Show the transient placeholder and open to its height
    pub fn show_searching(&mut self, layout: &LayoutMetrics) {
        self.present(PanelContent::Searching, layout);
    }

    /// Show a finished search. An empty set shows the no-results message.
    pub fn show_results(&mut self, results: ResultSet, layout: &LayoutMetrics) {
        if results.is_empty() {
            self.present(PanelContent::NoResults, layout);
        } else {
            self.present(PanelContent::Results(results), layout);
        }
    }

    pub fn show_failure(&mut self, layout: &LayoutMetrics) {
        self.present(PanelContent::Failed, layout);
    }

    fn present(&mut self, content: PanelContent, layout: &LayoutMetrics) {
        self.content = content;
        let target = self.target_height(layout);
        self.animation.expand(target);
    }

    /// Clear the panel and animate it shut
    pub fn close(&mut self) {
        self.content = PanelContent::Empty;
        if self.animation.is_open() {
            self.animation.collapse();
        }
    }

    /// Re-clamp an open panel to new geometry, without animating
    pub fn resize(&mut self, layout: &LayoutMetrics) {
        if self.animation.is_open() {
            let target = self.target_height(layout);
            self.animation.snap_open(target, false);
        }
    }

    pub fn tick(&mut self, dt: Duration) {
        self.animation.tick(dt);
    }

    /// Start offsets of each result item's entrance animation
    pub fn entrance_delays(&self) -> Vec<Duration> {
        let n = self.results().map_or(0, ResultSet::len);
        (0..n).map(|i| RESULT_STAGGER * i as u32).collect()
    }

    /// Text a result link shows
    pub fn link_text(&self, item: &SearchResultItem) -> String {
        match item.kind {
            ElementKind::PageTitle => format!("{}{}", self.messages.page_prefix, item.text),
            ElementKind::ToggleButton => format!("{}{}", self.messages.group_prefix, item.text),
            ElementKind::PrimaryAction | ElementKind::SecondaryLink => item.text.clone(),
        }
    }

    /// Markup for the panel's children
    pub fn render_html(&self) -> String {
        match &self.content {
            PanelContent::Empty => String::new(),
            PanelContent::Searching => message_html(&self.messages.searching),
            PanelContent::NoResults => message_html(&self.messages.no_results),
            PanelContent::Failed => message_html(&self.messages.failed),
            PanelContent::Results(results) => {
                let mut out = String::new();
                for item in results.iter() {
                    out.push_str(&format!(
                        "<a class=\"search-result-item\" href=\"{}\" title=\"{}{}\">{}</a>\n",
                        html_escape(item.target.as_str()),
                        html_escape(&self.messages.found_in_prefix),
                        html_escape(&utils::page_file_name(&item.source)),
                        html_escape(&self.link_text(item)),
                    ));
                }
                out
            }
        }
    }

    /// Plain-text rendering for terminals
    pub fn render_text(&self) -> String {
        match &self.content {
            PanelContent::Empty => String::new(),
            PanelContent::Searching => self.messages.searching.clone(),
            PanelContent::NoResults => self.messages.no_results.clone(),
            PanelContent::Failed => self.messages.failed.clone(),
            PanelContent::Results(results) => results
                .iter()
                .map(|item| {
                    format!(
                        "{}\n    {} ({}{})",
                        self.link_text(item),
                        item.target,
                        self.messages.found_in_prefix,
                        utils::page_file_name(&item.source)
                    )
                })
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

fn message_html(text: &str) -> String {
    format!("<p class=\"no-results-message\">{}</p>\n", html_escape(text))
}
