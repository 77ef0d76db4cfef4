use crate::url::canonical_url;
use url::Url;

/// Resolves a possibly-relative link discovered on a page into a canonical
/// absolute URL
///
/// Absolute links must be http(s); anything else (mailto:, ftp://, data:)
/// is rejected. Relative links are resolved against an https origin
/// synthesized from the page's host. Fragments are stripped and the result
/// is canonicalized.
///
/// Malformed input is never an error for the caller; it simply yields `None`.
///
/// # Examples
///
/// ```
/// use spinneret::resolve_link;
///
/// let resolved = resolve_link("example.com", "/a/b");
/// assert_eq!(resolved.as_deref(), Some("https://example.com/a/b"));
///
/// assert_eq!(resolve_link("example.com", "mailto:bot@example.com"), None);
/// ```
pub fn resolve_link(page_host: &str, value: &str) -> Option<String> {
    // Absolute links stand on their own
    if let Ok(parsed) = Url::parse(value) {
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return None;
        }
        return canonical_url(parsed.as_str()).ok();
    }

    // Relative links resolve against the page's host, with an https origin
    // synthesized when the host carries no scheme
    let base = if page_host.starts_with("http://") || page_host.starts_with("https://") {
        page_host.to_string()
    } else {
        format!("https://{}", page_host)
    };

    let base_url = Url::parse(&base).ok()?;
    let resolved = base_url.join(value).ok()?;
    canonical_url(resolved.as_str()).ok()
}
