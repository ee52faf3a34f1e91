//! Upstream URL construction.

use url::form_urlencoded;

/// Name of the query parameter that carries the target path.
pub const PATH_PARAM: &str = "path";

/// Join the base URL and an allowlisted path with exactly one slash.
pub fn join_upstream_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Decode a raw query string into ordered pairs, dropping the `path`
/// control parameter.
pub fn forwarded_query(raw_query: Option<&str>) -> Vec<(String, String)> {
    raw_query
        .map(|q| {
            form_urlencoded::parse(q.as_bytes())
                .filter(|(key, _)| key != PATH_PARAM)
                .map(|(key, value)| (key.into_owned(), value.into_owned()))
                .collect()
        })
        .unwrap_or_default()
}

/// Append pairs to a URL as a form-urlencoded query string.
pub fn with_query(url: String, pairs: &[(String, String)]) -> String {
    if pairs.is_empty() {
        return url;
    }
    let query = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish();
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{}{}{}", url, separator, query)
}
