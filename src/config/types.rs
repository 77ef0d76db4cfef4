use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Spinneret
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub progress: ProgressConfig,
    #[serde(default)]
    pub seeds: Vec<String>,
}

/// Crawl engine configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Maximum total pages to process; 0 means unbounded
    #[serde(rename = "max-pages", default)]
    pub max_pages: u64,

    /// Number of concurrent workers
    pub workers: usize,

    /// Delay between requests on a single worker (milliseconds)
    #[serde(rename = "request-delay-ms", default)]
    pub request_delay_ms: u64,

    /// Frontier capacity
    #[serde(rename = "queue-size", default = "default_queue_size")]
    pub queue_size: usize,

    /// Which discovered links to follow
    #[serde(default)]
    pub follow: FollowBehavior,

    /// Name of the fetcher implementation, passed through on each request
    #[serde(rename = "fetcher-name", default = "default_fetcher_name")]
    pub fetcher_name: String,
}

/// Policy governing which discovered links are eligible for admission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FollowBehavior {
    /// Follow every discovered link
    #[default]
    Any,
    /// Follow links pointing at the same host as the page
    SameDomain,
    /// Follow links on the same host or a related subdomain
    RelatedSubdomains,
    /// Follow nothing
    None,
}

/// User agent identification for the built-in HTTP fetcher
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url", default)]
    pub contact_url: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "spinneret".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: String::new(),
        }
    }
}

/// Progress reporting configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ProgressConfig {
    /// Whether to periodically log crawl statistics
    #[serde(default)]
    pub enabled: bool,

    /// Seconds between progress reports
    #[serde(rename = "interval-secs", default = "default_progress_interval")]
    pub interval_secs: u64,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            interval_secs: default_progress_interval(),
        }
    }
}

impl CrawlerConfig {
    /// Per-worker inter-request delay as a Duration
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }
}

impl ProgressConfig {
    /// Reporting interval as a Duration
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

fn default_queue_size() -> usize {
    10_000
}

fn default_fetcher_name() -> String {
    "http".to_string()
}

fn default_progress_interval() -> u64 {
    30
}
