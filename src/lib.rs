//! Spinneret: a concurrent web-crawling engine
//!
//! This crate implements a crawl orchestration engine: given a set of seed
//! URLs it fetches pages through a pluggable fetcher, invokes domain-aware
//! parsers, discovers outbound links, and recursively schedules newly
//! discovered URLs, subject to a global page budget, a link-following policy,
//! and a fixed worker pool.

pub mod config;
pub mod crawler;
pub mod url;

use thiserror::Error;

/// Main error type for Spinneret operations
#[derive(Debug, Error)]
pub enum SpinneretError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("HTTP status {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Fetch error for {url}: {message}")]
    Fetch { url: String, message: String },

    #[error("Parse error for {url}: {message}")]
    Parse { url: String, message: String },

    #[error("Cache miss for {0}")]
    CacheMiss(String),

    #[error("Cache error: {0}")]
    Cache(String),

    #[error("crawler is already running")]
    AlreadyRunning,

    #[error("crawl cancelled")]
    Cancelled,

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,

    #[error("Malformed URL: {0}")]
    Malformed(String),
}

/// Result type alias for Spinneret operations
pub type Result<T> = std::result::Result<T, SpinneretError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::{Config, CrawlerConfig, FollowBehavior, ProgressConfig, UserAgentConfig};
pub use crawler::{
    Cache, Callback, CrawlResult, Crawler, CrawlerStats, FetchRequest, FetchResponse, Fetcher,
    HttpFetcher, Link, MemoryCache, ParsedValue, Parser, StatsSnapshot,
};
pub use url::{are_related_hosts, are_same_host, canonical_url, normalize_url, resolve_link};
