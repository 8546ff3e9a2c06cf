use crate::parsers::{ElementKind, SEARCHABLE_SELECTOR, text};
use crate::results::{ResultSet, SearchResultItem};
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;
use url::Url;

/// Parses a fetched page and returns the elements whose label contains `query`
///
/// Matching ignores case and accents. The returned items are unique by dedup key
/// and in document order.
pub fn extract_matches(html: &str, page_url: &Url, query: &str) -> Vec<SearchResultItem> {
    let doc = Html::parse_document(html);
    let selector = Selector::parse(SEARCHABLE_SELECTOR).unwrap();
    let query_form = text::search_form(query);

    let mut matches = ResultSet::new();
    for element in doc.select(&selector) {
        let Some(kind) = ElementKind::classify(element.value().name(), element.value().classes())
        else {
            continue;
        };

        let raw = element.text().collect::<String>();
        let label = text::normalize_label(&raw, &kind.label_options());
        if !text::matches_query(&label, &query_form) {
            continue;
        }

        let target = resolve_target(&element, kind, page_url);
        matches.insert(SearchResultItem::new(page_url.clone(), target, label, kind));
    }

    ::log::debug!(
        "HTML parser found {} matches for {:?} in {}",
        matches.len(),
        query,
        page_url
    );

    matches.into_vec()
}

/// Picks the URL a result navigates to
fn resolve_target(element: &ElementRef, kind: ElementKind, page_url: &Url) -> Url {
    if !kind.links_out() {
        return page_url.clone();
    }

    match element.value().attr("href").map(str::trim) {
        Some(href) if !href.is_empty() => match page_url.join(href) {
            Ok(resolved) => resolved,
            Err(e) => {
                ::log::warn!("Invalid href {:?} in {}: {}", href, page_url, e);
                page_url.clone()
            }
        },
        _ => {
            ::log::debug!("Anchor without href in {}, linking to the page", page_url);
            page_url.clone()
        }
    }
}

/// An accordion trigger/panel pair found in a page
#[derive(Debug, Clone, PartialEq)]
pub struct DiscoveredGroup {
    /// Trigger label, without disclosure arrow
    pub label: String,
    /// Index of the enclosing `.buttons-container`, in order of first appearance
    pub container: Option<usize>,
    /// Number of element children in the content panel
    pub item_count: usize,
}

/// Scans a page for `button.toggle-btn` triggers followed by a `.collapsible-content` panel
///
/// Triggers without a valid adjacent panel are skipped with a warning.
pub fn discover_groups(html: &str) -> Vec<DiscoveredGroup> {
    let doc = Html::parse_document(html);
    let selector = Selector::parse("button.toggle-btn").unwrap();

    let mut containers = HashMap::new();
    let mut groups = Vec::new();

    for (index, button) in doc.select(&selector).enumerate() {
        let label = text::normalize_label(
            &button.text().collect::<String>(),
            &ElementKind::ToggleButton.label_options(),
        );

        let panel = button.next_siblings().find_map(ElementRef::wrap);
        let Some(panel) = panel.filter(|p| has_class(p, "collapsible-content")) else {
            ::log::warn!(
                "Invalid collapsible structure for toggle #{} ({:?}): no adjacent .collapsible-content",
                index,
                label
            );
            continue;
        };

        let container = button
            .ancestors()
            .filter_map(ElementRef::wrap)
            .find(|a| has_class(a, "buttons-container"))
            .map(|a| {
                let next = containers.len();
                *containers.entry(a.id()).or_insert(next)
            });

        let item_count = panel.children().filter_map(ElementRef::wrap).count();

        groups.push(DiscoveredGroup {
            label,
            container,
            item_count,
        });
    }

    ::log::debug!("Discovered {} collapsible groups", groups.len());
    groups
}

fn has_class(element: &ElementRef, class: &str) -> bool {
    element.value().classes().any(|c| c == class)
}
