//! The crawl engine
//!
//! This module contains the crawl orchestration core:
//! - The frontier queue and dedup set
//! - The worker pool and per-URL processing
//! - Idle detection and progress accounting
//! - The collaborator contracts (fetcher, cache, parser)

mod cache;
mod coordinator;
mod fetcher;
mod frontier;
mod parser;
mod stats;

pub use cache::{Cache, MemoryCache};
pub use coordinator::{Callback, CrawlResult, Crawler};
pub use fetcher::{FetchRequest, FetchResponse, Fetcher, HttpFetcher, Link};
pub use parser::{ParsedValue, Parser};
pub use stats::{CrawlerStats, StatsSnapshot};
