use url::Url;

/// Extracts the lowercased host from a URL
///
/// # Examples
///
/// ```
/// use url::Url;
/// use spinneret::url::extract_host;
///
/// let url = Url::parse("https://blog.example.com/post").unwrap();
/// assert_eq!(extract_host(&url), Some("blog.example.com".to_string()));
/// ```
pub fn extract_host(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Returns true if two URLs point at the same host
///
/// A leading `www.` is ignored, so `www.example.com` and `example.com`
/// count as the same host.
pub fn are_same_host(a: &Url, b: &Url) -> bool {
    match (a.host_str(), b.host_str()) {
        (Some(a), Some(b)) => strip_www(&a.to_lowercase()) == strip_www(&b.to_lowercase()),
        _ => false,
    }
}

/// Returns true if two URLs have related hosts: the same host, or one being
/// a subdomain of the other (in either direction), with `www.` ignored.
pub fn are_related_hosts(a: &Url, b: &Url) -> bool {
    let (a, b) = match (a.host_str(), b.host_str()) {
        (Some(a), Some(b)) => (a.to_lowercase(), b.to_lowercase()),
        _ => return false,
    };
    let a = strip_www(&a);
    let b = strip_www(&b);

    a == b || is_subdomain_of(a, b) || is_subdomain_of(b, a)
}

fn strip_www(host: &str) -> &str {
    host.strip_prefix("www.").unwrap_or(host)
}

fn is_subdomain_of(candidate: &str, base: &str) -> bool {
    candidate.len() > base.len() + 1
        && candidate.ends_with(base)
        && candidate.as_bytes()[candidate.len() - base.len() - 1] == b'.'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_extract_host_lowercases() {
        assert_eq!(
            extract_host(&url("https://EXAMPLE.COM/")),
            Some("example.com".to_string())
        );
    }

    #[test]
    fn test_extract_host_keeps_subdomain() {
        assert_eq!(
            extract_host(&url("https://api.v2.example.com/endpoint")),
            Some("api.v2.example.com".to_string())
        );
    }

    #[test]
    fn test_same_host_exact() {
        assert!(are_same_host(
            &url("https://example.com/a"),
            &url("https://example.com/b")
        ));
    }

    #[test]
    fn test_same_host_ignores_www() {
        assert!(are_same_host(
            &url("https://www.example.com/"),
            &url("https://example.com/")
        ));
    }

    #[test]
    fn test_same_host_rejects_subdomain() {
        assert!(!are_same_host(
            &url("https://blog.example.com/"),
            &url("https://example.com/")
        ));
    }

    #[test]
    fn test_same_host_rejects_other_domain() {
        assert!(!are_same_host(
            &url("https://example.com/"),
            &url("https://other.com/")
        ));
    }

    #[test]
    fn test_related_hosts_subdomain() {
        assert!(are_related_hosts(
            &url("https://blog.example.com/"),
            &url("https://example.com/")
        ));
        assert!(are_related_hosts(
            &url("https://example.com/"),
            &url("https://deep.nested.example.com/")
        ));
    }

    #[test]
    fn test_related_hosts_rejects_suffix_overlap() {
        // notexample.com is not a subdomain of example.com
        assert!(!are_related_hosts(
            &url("https://notexample.com/"),
            &url("https://example.com/")
        ));
    }

    #[test]
    fn test_related_hosts_rejects_unrelated() {
        assert!(!are_related_hosts(
            &url("https://example.com/"),
            &url("https://example.org/")
        ));
    }
}
