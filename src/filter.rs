use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

/// Rules deciding which configured pages the search may fetch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageFilterConfig {
    /// Only pages on this host are searched (if None, any host is allowed)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_domain: Option<String>,

    /// Regex patterns for pages to include (if empty, all pages are included unless excluded)
    #[serde(default)]
    pub include_patterns: Vec<String>,

    /// Regex patterns for pages to exclude (these take precedence over include patterns)
    #[serde(default = "default_exclude_patterns")]
    pub exclude_patterns: Vec<String>,
}

fn default_exclude_patterns() -> Vec<String> {
    vec![r"\.(jpg|jpeg|png|gif|css|js|ico|svg|woff|woff2|ttf|eot|pdf)$".to_string()]
}

impl Default for PageFilterConfig {
    fn default() -> Self {
        Self {
            required_domain: None,
            include_patterns: Vec::new(),
            exclude_patterns: default_exclude_patterns(),
        }
    }
}

/// Validates and normalizes the sibling page list before any fetch
#[derive(Debug)]
pub struct PageFilter {
    config: PageFilterConfig,
    include_regexes: Vec<Regex>,
    exclude_regexes: Vec<Regex>,
}

impl Default for PageFilter {
    fn default() -> Self {
        Self::new(PageFilterConfig::default()).expect("Default regex patterns should be valid")
    }
}

impl PageFilter {
    /// Create a new page filter from configuration
    pub fn new(config: PageFilterConfig) -> Result<Self, regex::Error> {
        let include_regexes = config
            .include_patterns
            .iter()
            .map(|p| Regex::new(p))
            .collect::<Result<Vec<_>, _>>()?;
        let exclude_regexes = config
            .exclude_patterns
            .iter()
            .map(|p| Regex::new(p))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            config,
            include_regexes,
            exclude_regexes,
        })
    }

    /// Determine if a page should be searched based on all filtering rules
    pub fn should_search(&self, url: &Url) -> bool {
        if !matches!(url.scheme(), "http" | "https" | "file") {
            return false;
        }

        if !self.is_in_domain_scope(url) {
            return false;
        }

        // Exclusions take precedence
        let url_str = url.as_str();
        if self.exclude_regexes.iter().any(|re| re.is_match(url_str)) {
            return false;
        }

        self.include_regexes.is_empty() || self.include_regexes.iter().any(|re| re.is_match(url_str))
    }

    fn is_in_domain_scope(&self, url: &Url) -> bool {
        match &self.config.required_domain {
            Some(required) => url.domain() == Some(required.as_str()),
            None => true,
        }
    }

    /// Create a normalized version of the URL (e.g., removing fragments)
    pub fn normalize_url(&self, url: &Url) -> Url {
        let mut normalized = url.clone();
        normalized.set_fragment(None);
        normalized
    }

    /// Parses, filters and deduplicates a configured page list, keeping order
    ///
    /// Bad entries are logged and skipped; they never abort the list.
    pub fn select_pages<S: AsRef<str>>(&self, pages: &[S]) -> Vec<Url> {
        let mut selected: Vec<Url> = Vec::with_capacity(pages.len());

        for raw in pages {
            let raw = raw.as_ref().trim();
            let url = match Url::parse(raw) {
                Ok(url) => url,
                Err(e) => {
                    ::log::warn!("Skipping unparsable page URL {:?}: {}", raw, e);
                    continue;
                }
            };

            if !self.should_search(&url) {
                ::log::warn!("Page filter rejected: {}", url);
                continue;
            }

            let normalized = self.normalize_url(&url);
            if selected.contains(&normalized) {
                ::log::debug!("Skipping duplicate page: {}", normalized);
                continue;
            }
            selected.push(normalized);
        }

        ::log::debug!("{} of {} configured pages selected", selected.len(), pages.len());
        selected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter() {
        let filter = PageFilter::default();

        let image_url = Url::parse("https://intra.example/logo.png").unwrap();
        assert!(!filter.should_search(&image_url));

        let html_url = Url::parse("https://intra.example/setores/esa.html").unwrap();
        assert!(filter.should_search(&html_url));

        let file_url = Url::parse("file:///srv/mirror/index.html").unwrap();
        assert!(filter.should_search(&file_url));

        let mail = Url::parse("mailto:secretaria@intra.example").unwrap();
        assert!(!filter.should_search(&mail));
    }

    #[test]
    fn test_domain_restriction() {
        let filter = PageFilter::new(PageFilterConfig {
            required_domain: Some("intra.example".to_string()),
            ..PageFilterConfig::default()
        })
        .unwrap();

        let same = Url::parse("http://intra.example/index.html").unwrap();
        assert!(filter.should_search(&same));

        let other = Url::parse("http://other.example/index.html").unwrap();
        assert!(!filter.should_search(&other));
    }

    #[test]
    fn test_regex_patterns() {
        let filter = PageFilter::new(PageFilterConfig {
            required_domain: None,
            include_patterns: vec![r"/setores/.*\.html$".to_string()],
            exclude_patterns: vec![r"/setores/rascunho".to_string()],
        })
        .unwrap();

        let included = Url::parse("http://intra.example/setores/ted.html").unwrap();
        assert!(filter.should_search(&included));

        let not_included = Url::parse("http://intra.example/manuais/manuais.html").unwrap();
        assert!(!filter.should_search(&not_included));

        let excluded = Url::parse("http://intra.example/setores/rascunho.html").unwrap();
        assert!(!filter.should_search(&excluded));
    }

    #[test]
    fn test_select_pages_keeps_order_and_skips_bad_entries() {
        let filter = PageFilter::default();
        let pages = [
            "http://intra.example/b.html",
            "not a url",
            "http://intra.example/a.html#topo",
            "http://intra.example/style.css",
            "http://intra.example/b.html",
        ];

        let selected = filter.select_pages(&pages);
        let selected: Vec<&str> = selected.iter().map(|u| u.as_str()).collect();
        assert_eq!(
            selected,
            vec!["http://intra.example/b.html", "http://intra.example/a.html"]
        );
    }
}
