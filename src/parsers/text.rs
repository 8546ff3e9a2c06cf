use regex::Regex;
use std::sync::OnceLock;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Options controlling how an element's visible text becomes a result label
#[derive(Debug, Clone, Copy)]
pub struct LabelOptions {
    /// Strip a leading `>` marker used as a decorative bullet
    pub strip_marker: bool,
    /// Strip a trailing `▼` disclosure arrow (toggle buttons)
    pub strip_disclosure: bool,
}

impl Default for LabelOptions {
    fn default() -> Self {
        Self {
            strip_marker: true,
            strip_disclosure: false,
        }
    }
}

fn leading_marker() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^>\s*").expect("static regex"))
}

fn trailing_disclosure() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s*▼$").expect("static regex"))
}

/// Turns raw element text into the label shown to the user
///
/// - Trims and collapses internal whitespace runs
/// - Strips the leading marker and (optionally) the disclosure arrow
pub fn normalize_label(raw: &str, options: &LabelOptions) -> String {
    let mut label = normalize_whitespace_in_segment(raw);

    if options.strip_marker {
        label = leading_marker().replace(&label, "").into_owned();
    }
    if options.strip_disclosure {
        label = trailing_disclosure().replace(&label, "").into_owned();
    }

    label.trim().to_string()
}

/// Lower-cased, trimmed form used in dedup keys
pub fn fold(label: &str) -> String {
    label.trim().to_lowercase()
}

/// Matching form: [`fold`] with diacritics removed, so "relator" finds "Relatórios"
pub fn search_form(s: &str) -> String {
    fold(s).nfd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Case- and accent-insensitive substring test against a query already in
/// [`search_form`]. An empty label or an empty query never matches.
pub fn matches_query(label: &str, query_form: &str) -> bool {
    !label.is_empty() && !query_form.is_empty() && search_form(label).contains(query_form)
}

/// Normalizes whitespace within a single line or paragraph
pub fn normalize_whitespace_in_segment(segment: &str) -> String {
    segment.split_whitespace().collect::<Vec<_>>().join(" ")
}
