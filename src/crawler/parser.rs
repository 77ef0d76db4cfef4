//! Page parser contract
//!
//! Parsers turn a fetched page into a domain object. They are registered
//! per-host on the crawler, with an optional default fallback; pages whose
//! host has no parser (and no default exists) are crawled for links only.

use crate::crawler::FetchResponse;
use crate::Result;
use async_trait::async_trait;
use std::any::Any;

/// A parsed domain object, downcast by the caller
pub type ParsedValue = Box<dyn Any + Send + Sync>;

/// A pluggable page parser
///
/// A parse failure does not stop the crawl: the error is attached to the
/// page's result and link following proceeds from the raw response.
#[async_trait]
pub trait Parser: Send + Sync {
    async fn parse(&self, response: &FetchResponse) -> Result<ParsedValue>;
}
