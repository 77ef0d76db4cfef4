//! URL normalization, resolution, and host comparison
//!
//! Pure helpers used by the crawl engine to build canonical URL identities,
//! resolve discovered links against the page that produced them, and decide
//! host relationships for follow-behavior filtering.

mod domain;
mod normalize;
mod resolve;

pub use domain::{are_related_hosts, are_same_host, extract_host};
pub use normalize::{canonical_url, normalize_url};
pub use resolve::resolve_link;
