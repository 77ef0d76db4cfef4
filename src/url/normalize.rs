use crate::UrlError;
use url::Url;

/// Normalizes a URL into the form used for dedup and frontier identity
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed
/// 2. Reject schemes other than http/https
/// 3. Require a host (lowercased by the parser)
/// 4. Normalize path:
///    - Remove duplicate slashes and dot segments (. and ..)
///    - Remove trailing slash (except for root /)
///    - Empty path becomes /
/// 5. Remove fragment (everything after #)
/// 6. Sort query parameters alphabetically, drop an empty query string
///
/// The result is idempotent: normalizing an already-normalized URL yields
/// the same value.
///
/// # Examples
///
/// ```
/// use spinneret::normalize_url;
///
/// let url = normalize_url("https://EXAMPLE.COM/page/#intro").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/page");
/// ```
pub fn normalize_url(url_str: &str) -> Result<Url, UrlError> {
    let mut url = Url::parse(url_str).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingHost);
    }

    let normalized_path = normalize_path(url.path());
    url.set_path(&normalized_path);

    url.set_fragment(None);

    if url.query().is_some() {
        let mut params: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        params.sort();

        if params.is_empty() {
            url.set_query(None);
        } else {
            let query = url::form_urlencoded::Serializer::new(String::new())
                .extend_pairs(params)
                .finish();
            url.set_query(Some(&query));
        }
    }

    Ok(url)
}

/// Returns the canonical string form of a URL: normalized, with a single
/// trailing slash trimmed. Two addresses that canonicalize to the same
/// string are the same crawl target.
pub fn canonical_url(url_str: &str) -> Result<String, UrlError> {
    let url = normalize_url(url_str)?;
    let mut value = url.to_string();
    if value.ends_with('/') {
        value.pop();
    }
    Ok(value)
}

/// Normalizes a URL path by removing dot segments and trailing slashes
fn normalize_path(path: &str) -> String {
    if path.is_empty() {
        return "/".to_string();
    }

    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            // Skip empty segments (from repeated slashes) and current-dir markers
            "" | "." => continue,
            ".." => {
                segments.pop();
            }
            _ => segments.push(segment),
        }
    }

    if segments.is_empty() {
        return "/".to_string();
    }

    format!("/{}", segments.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercase_host() {
        let result = normalize_url("https://EXAMPLE.COM/Page").unwrap();
        assert_eq!(result.as_str(), "https://example.com/Page");
    }

    #[test]
    fn test_remove_trailing_slash() {
        let result = normalize_url("https://example.com/page/").unwrap();
        assert_eq!(result.as_str(), "https://example.com/page");
    }

    #[test]
    fn test_keep_root_slash() {
        let result = normalize_url("https://example.com/").unwrap();
        assert_eq!(result.as_str(), "https://example.com/");
    }

    #[test]
    fn test_empty_path_becomes_root() {
        let result = normalize_url("https://example.com").unwrap();
        assert_eq!(result.as_str(), "https://example.com/");
    }

    #[test]
    fn test_remove_fragment() {
        let result = normalize_url("https://example.com/page#section").unwrap();
        assert_eq!(result.as_str(), "https://example.com/page");
    }

    #[test]
    fn test_sort_query_params() {
        let result = normalize_url("https://example.com/page?b=2&a=1").unwrap();
        assert_eq!(result.as_str(), "https://example.com/page?a=1&b=2");
    }

    #[test]
    fn test_normalize_path_with_dots() {
        let result = normalize_url("https://example.com/a/../b/./c").unwrap();
        assert_eq!(result.as_str(), "https://example.com/b/c");
    }

    #[test]
    fn test_multiple_slashes() {
        let result = normalize_url("https://example.com///path//to///page").unwrap();
        assert_eq!(result.as_str(), "https://example.com/path/to/page");
    }

    #[test]
    fn test_parent_directory_at_root() {
        let result = normalize_url("https://example.com/../page").unwrap();
        assert_eq!(result.as_str(), "https://example.com/page");
    }

    #[test]
    fn test_http_scheme_kept() {
        let result = normalize_url("http://example.com/page").unwrap();
        assert_eq!(result.as_str(), "http://example.com/page");
    }

    #[test]
    fn test_invalid_scheme() {
        let result = normalize_url("ftp://example.com/page");
        assert!(matches!(result, Err(UrlError::InvalidScheme(_))));
    }

    #[test]
    fn test_mailto_rejected() {
        let result = normalize_url("mailto:someone@example.com");
        assert!(result.is_err());
    }

    #[test]
    fn test_malformed_url() {
        let result = normalize_url("not a url");
        assert!(result.is_err());
    }

    #[test]
    fn test_idempotent() {
        let cases = [
            "https://example.com",
            "https://EXAMPLE.com/a/../b/?z=1&a=2#frag",
            "http://example.com//x//y/",
            "https://example.com/page?q=hello%20world",
        ];
        for case in cases {
            let once = normalize_url(case).unwrap();
            let twice = normalize_url(once.as_str()).unwrap();
            assert_eq!(once, twice, "not idempotent for {}", case);
        }
    }

    #[test]
    fn test_canonical_trims_trailing_slash() {
        assert_eq!(
            canonical_url("https://example.com/").unwrap(),
            "https://example.com"
        );
        assert_eq!(
            canonical_url("https://example.com/page/").unwrap(),
            "https://example.com/page"
        );
    }

    #[test]
    fn test_canonical_case_and_slash_variants_collapse() {
        let a = canonical_url("https://EXAMPLE.COM/docs/").unwrap();
        let b = canonical_url("https://example.com/docs").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_canonical_idempotent() {
        let once = canonical_url("https://example.com/a/b/").unwrap();
        let twice = canonical_url(&once).unwrap();
        assert_eq!(once, twice);
    }
}
