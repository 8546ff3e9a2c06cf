use url::Url;

/// Appends a `v=<unix millis>` query pair so intermediate caches serve a fresh copy
pub fn cache_busted(url: &Url) -> Url {
    cache_busted_with(url, chrono::Utc::now().timestamp_millis())
}

/// Same as [`cache_busted`] with an explicit stamp
pub fn cache_busted_with(url: &Url, stamp: i64) -> Url {
    let mut busted = url.clone();
    busted
        .query_pairs_mut()
        .append_pair("v", &stamp.to_string());
    busted
}

/// Last path segment of a page URL, used in "found in" titles
pub fn page_file_name(url: &Url) -> String {
    url.path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|name| !name.is_empty())
        .map(|name| name.to_string())
        .unwrap_or_else(|| url.as_str().to_string())
}

/// Escapes text for use inside HTML element content and quoted attributes
pub fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
