use crate::parsers::{ElementKind, text};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use url::Url;

/// One search hit: an element on a sibling page whose label matched the query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResultItem {
    /// Page the element was found on
    pub source: Url,

    /// Where the result navigates to
    pub target: Url,

    /// Normalized visible text
    pub text: String,

    /// What kind of element matched
    pub kind: ElementKind,
}

/// Identity of a result for deduplication: folded text plus resolved target
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DedupKey {
    pub text: String,
    pub target: String,
}

impl SearchResultItem {
    pub fn new(source: Url, target: Url, text: String, kind: ElementKind) -> Self {
        Self {
            source,
            target,
            text,
            kind,
        }
    }

    pub fn dedup_key(&self) -> DedupKey {
        DedupKey {
            text: text::fold(&self.text),
            target: self.target.as_str().to_string(),
        }
    }
}

/// Results in first-discovery order, unique by [`DedupKey`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    items: Vec<SearchResultItem>,
    seen: HashSet<DedupKey>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `item` unless an equal key is already present. Returns whether it was added.
    pub fn insert(&mut self, item: SearchResultItem) -> bool {
        if !self.seen.insert(item.dedup_key()) {
            ::log::trace!("Dropping duplicate result {:?} -> {}", item.text, item.target);
            return false;
        }
        self.items.push(item);
        true
    }

    pub fn extend(&mut self, items: impl IntoIterator<Item = SearchResultItem>) {
        for item in items {
            self.insert(item);
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[SearchResultItem] {
        &self.items
    }

    pub fn iter(&self) -> impl Iterator<Item = &SearchResultItem> {
        self.items.iter()
    }

    pub fn into_vec(self) -> Vec<SearchResultItem> {
        self.items
    }
}

impl FromIterator<SearchResultItem> for ResultSet {
    fn from_iter<I: IntoIterator<Item = SearchResultItem>>(iter: I) -> Self {
        let mut set = ResultSet::new();
        set.extend(iter);
        set
    }
}
