//! Crawl coordinator - run lifecycle and worker orchestration
//!
//! This module owns the crawl run: it guards against concurrent runs, seeds
//! the frontier, starts the worker pool, the idle monitor, and the optional
//! progress reporter, and tears everything down once the run quiesces or is
//! cancelled.
//!
//! Completion is an emergent property: no single worker can know it produced
//! the last link, so a polling monitor watches the two shared signals
//! (active workers and queued URLs) and cancels the run context when both
//! reach zero.

use crate::config::{CrawlerConfig, FollowBehavior, ProgressConfig};
use crate::crawler::frontier::Frontier;
use crate::crawler::parser::ParsedValue;
use crate::crawler::{Cache, CrawlerStats, FetchRequest, FetchResponse, Fetcher, Parser};
use crate::url::{are_related_hosts, are_same_host, canonical_url, extract_host, resolve_link};
use crate::{Result, SpinneretError};
use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use url::Url;

/// How often the idle monitor checks for quiescence
const IDLE_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// The result of one page being crawled
pub struct CrawlResult {
    /// The URL that was processed
    pub url: Url,

    /// The parsed domain object, if a parser ran successfully
    pub parsed: Option<ParsedValue>,

    /// Outbound links discovered on the page, resolved and sorted
    pub links: Vec<String>,

    /// The raw fetch response; `None` when the fetch itself failed
    pub response: Option<FetchResponse>,

    /// The fetch or parse error, if any
    pub error: Option<SpinneretError>,
}

/// Called once per processed URL, on the worker's critical path
pub type Callback = Arc<dyn Fn(CrawlResult) + Send + Sync>;

/// The crawl engine
///
/// Holds the configuration and collaborators; at most one run may be active
/// per instance at a time.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use spinneret::config::{CrawlerConfig, FollowBehavior, UserAgentConfig};
/// use spinneret::{CrawlResult, Crawler, HttpFetcher};
///
/// # async fn example() -> spinneret::Result<()> {
/// let config = CrawlerConfig {
///     max_pages: 100,
///     workers: 4,
///     request_delay_ms: 0,
///     queue_size: 10_000,
///     follow: FollowBehavior::SameDomain,
///     fetcher_name: "http".to_string(),
/// };
/// let fetcher = Arc::new(HttpFetcher::new(&UserAgentConfig::default())?);
/// let crawler = Crawler::new(config, fetcher);
///
/// let seeds = vec!["https://example.com/".to_string()];
/// crawler
///     .crawl(&seeds, Arc::new(|result: CrawlResult| {
///         println!("{} ({} links)", result.url, result.links.len());
///     }))
///     .await?;
/// # Ok(())
/// # }
/// ```
pub struct Crawler {
    config: CrawlerConfig,
    progress: ProgressConfig,
    fetcher: Arc<dyn Fetcher>,
    cache: Option<Arc<dyn Cache>>,
    parsers: HashMap<String, Arc<dyn Parser>>,
    default_parser: Option<Arc<dyn Parser>>,
    stats: Arc<CrawlerStats>,
    running: AtomicBool,
}

impl Crawler {
    /// Creates a new crawler from a configuration and a fetcher
    pub fn new(config: CrawlerConfig, fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            config,
            progress: ProgressConfig::default(),
            fetcher,
            cache: None,
            parsers: HashMap::new(),
            default_parser: None,
            stats: Arc::new(CrawlerStats::new()),
            running: AtomicBool::new(false),
        }
    }

    /// Enables periodic progress reporting
    pub fn with_progress(mut self, progress: ProgressConfig) -> Self {
        self.progress = progress;
        self
    }

    /// Attaches a fetch cache
    pub fn with_cache(mut self, cache: Arc<dyn Cache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Registers a parser for a specific host
    pub fn with_parser(mut self, host: impl Into<String>, parser: Arc<dyn Parser>) -> Self {
        self.parsers.insert(host.into(), parser);
        self
    }

    /// Registers the fallback parser for hosts without a specific one
    pub fn with_default_parser(mut self, parser: Arc<dyn Parser>) -> Self {
        self.default_parser = Some(parser);
        self
    }

    /// Returns the shared crawl statistics
    pub fn stats(&self) -> Arc<CrawlerStats> {
        self.stats.clone()
    }

    /// Crawls the provided seed URLs, calling the callback for each
    /// processed page
    ///
    /// Links may be followed depending on the configured follow behavior.
    /// Returns once the crawl quiesces: no worker active and no URL queued.
    pub async fn crawl(&self, seeds: &[String], callback: Callback) -> Result<()> {
        self.crawl_with_shutdown(seeds, callback, CancellationToken::new())
            .await
    }

    /// Crawls the provided seed URLs with a caller-supplied shutdown token
    ///
    /// Cancelling the token stops the run cooperatively; unprocessed URLs
    /// are discarded. A token that is already cancelled fails the run
    /// before it starts.
    pub async fn crawl_with_shutdown(
        &self,
        seeds: &[String],
        callback: Callback,
        shutdown: CancellationToken,
    ) -> Result<()> {
        if shutdown.is_cancelled() {
            return Err(SpinneretError::Cancelled);
        }
        if self
            .running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(SpinneretError::AlreadyRunning);
        }
        // Released on every exit path, including panics in this function
        let _guard = RunGuard {
            running: &self.running,
        };

        let cancel = shutdown.child_token();
        let run = Arc::new(RunState {
            config: self.config.clone(),
            fetcher: self.fetcher.clone(),
            cache: self.cache.clone(),
            parsers: self.parsers.clone(),
            default_parser: self.default_parser.clone(),
            stats: self.stats.clone(),
            frontier: Frontier::new(self.config.queue_size),
            active_workers: AtomicI64::new(0),
            cancel: cancel.clone(),
            callback,
        });

        let mut workers = Vec::with_capacity(self.config.workers);
        for _ in 0..self.config.workers {
            workers.push(tokio::spawn(worker(run.clone())));
        }

        if self.progress.enabled {
            tokio::spawn(progress_reporter(run.clone(), self.progress.interval()));
        }

        let monitor = tokio::spawn(idle_monitor(run.clone()));

        // Seed the frontier; nothing admitted means nothing to do
        let admitted = run.admit(seeds);
        if admitted == 0 {
            cancel.cancel();
        }

        for handle in workers {
            let _ = handle.await;
        }
        cancel.cancel();
        let _ = monitor.await;
        Ok(())
    }
}

/// Resets the running flag when a run ends, however it ends
struct RunGuard<'a> {
    running: &'a AtomicBool,
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
    }
}

/// State shared by all tasks of a single run
struct RunState {
    config: CrawlerConfig,
    fetcher: Arc<dyn Fetcher>,
    cache: Option<Arc<dyn Cache>>,
    parsers: HashMap<String, Arc<dyn Parser>>,
    default_parser: Option<Arc<dyn Parser>>,
    stats: Arc<CrawlerStats>,
    frontier: Frontier,
    active_workers: AtomicI64,
    cancel: CancellationToken,
    callback: Callback,
}

impl RunState {
    /// Admits candidate URLs to the frontier
    ///
    /// When a page budget is configured, the candidate list is clamped to
    /// `max_pages - processed`. The clamp reads a counter other workers are
    /// updating concurrently, so near the limit slightly more work than the
    /// budget can be admitted; this soft ceiling is intentional, exact
    /// enforcement would serialize all admissions.
    ///
    /// Each surviving candidate is canonicalized (malformed URLs are logged
    /// and skipped) and offered to the frontier. Returns how many were
    /// actually queued.
    fn admit<S: AsRef<str>>(&self, urls: &[S]) -> usize {
        let mut candidates = urls;
        if self.config.max_pages > 0 {
            let allowed = self.config.max_pages.saturating_sub(self.stats.processed());
            if allowed == 0 {
                return 0;
            }
            if (allowed as usize) < candidates.len() {
                candidates = &candidates[..allowed as usize];
            }
        }

        let mut admitted = 0;
        for raw in candidates {
            match canonical_url(raw.as_ref()) {
                Ok(canonical) => {
                    if self.frontier.offer(&canonical) {
                        admitted += 1;
                    }
                }
                Err(e) => {
                    tracing::warn!(url = raw.as_ref(), error = %e, "invalid url, skipping");
                }
            }
        }
        admitted
    }

    fn resolve_parser(&self, host: &str) -> Option<&Arc<dyn Parser>> {
        self.parsers.get(host).or(self.default_parser.as_ref())
    }
}

/// One worker of the pool
///
/// Waits for cancellation or the next frontier entry, whichever comes
/// first, and processes pages until the run context is cancelled.
async fn worker(run: Arc<RunState>) {
    loop {
        let url = tokio::select! {
            _ = run.cancel.cancelled() => return,
            url = run.frontier.next() => match url {
                Some(url) => url,
                None => return,
            },
        };

        run.active_workers.fetch_add(1, Ordering::SeqCst);
        process_url(&run, &url).await;
        run.active_workers.fetch_sub(1, Ordering::SeqCst);

        // Per-worker self-throttle, not a global rate limiter
        let delay = run.config.request_delay();
        if !delay.is_zero() {
            tokio::select! {
                _ = run.cancel.cancelled() => return,
                _ = tokio::time::sleep(delay) => {}
            }
        }
    }
}

/// Processes a single dequeued URL
///
/// The callback is invoked exactly once, and strictly before any link
/// discovered on this page is admitted to the frontier.
async fn process_url(run: &RunState, raw_url: &str) {
    run.stats.increment_processed();

    // Admission already validated this URL, but a malformed entry must not
    // take the worker down
    let page_url = match Url::parse(raw_url) {
        Ok(url) => url,
        Err(e) => {
            tracing::warn!(url = raw_url, error = %e, "invalid url dequeued, skipping");
            return;
        }
    };
    let host = match extract_host(&page_url) {
        Some(host) => host,
        None => {
            tracing::warn!(url = raw_url, "url without host dequeued, skipping");
            return;
        }
    };

    // Cache first; a read failure is just a miss
    let mut response: Option<FetchResponse> = None;
    if let Some(cache) = &run.cache {
        if let Ok(body) = cache.get(raw_url).await {
            tracing::debug!(url = raw_url, "cache hit");
            response = Some(FetchResponse {
                url: raw_url.to_string(),
                html: String::from_utf8_lossy(&body).into_owned(),
                links: Vec::new(),
            });
        }
    }

    let from_network = response.is_none();
    let response = match response {
        Some(response) => response,
        None => {
            tracing::debug!(url = raw_url, "fetching");
            let request = FetchRequest {
                url: raw_url.to_string(),
                fetcher: run.config.fetcher_name.clone(),
            };
            match run.fetcher.fetch(&run.cancel, &request).await {
                Ok(response) => response,
                Err(e) => {
                    (run.callback)(CrawlResult {
                        url: page_url,
                        parsed: None,
                        links: Vec::new(),
                        response: None,
                        error: Some(e),
                    });
                    run.stats.increment_failed();
                    return;
                }
            }
        }
    };

    if from_network && !response.html.is_empty() {
        if let Some(cache) = &run.cache {
            if let Err(e) = cache.set(raw_url, response.html.as_bytes()).await {
                tracing::warn!(url = raw_url, error = %e, "failed to cache html");
            }
        }
    }

    // Parse if a parser exists for the host; a parse failure is attached to
    // the result but does not stop link following
    let mut parsed = None;
    let mut parse_error = None;
    if let Some(parser) = run.resolve_parser(&host) {
        tracing::debug!(url = raw_url, host = %host, "parsing");
        match parser.parse(&response).await {
            Ok(value) => parsed = Some(value),
            Err(e) => {
                tracing::error!(url = raw_url, error = %e, "failed to parse");
                parse_error = Some(e);
            }
        }
    }

    let discovered = extract_urls(&response, &host);
    (run.callback)(CrawlResult {
        url: page_url.clone(),
        parsed,
        links: discovered.clone(),
        response: Some(response),
        error: parse_error,
    });
    run.stats.increment_succeeded();

    let filtered = filter_links(run.config.follow, &page_url, &discovered);
    let offered = filtered.len();
    let admitted = run.admit(&filtered);
    if admitted < offered {
        tracing::warn!(
            url = raw_url,
            offered,
            admitted,
            "not all discovered urls were admitted"
        );
    }
}

/// Resolves the raw links of a response against the page's host,
/// deduplicating among themselves and returning them sorted for determinism
fn extract_urls(response: &FetchResponse, host: &str) -> Vec<String> {
    let resolved: BTreeSet<String> = response
        .links
        .iter()
        .filter_map(|link| resolve_link(host, &link.url))
        .collect();
    resolved.into_iter().collect()
}

/// Filters discovered links according to the follow behavior, evaluated
/// against the page that discovered them
fn filter_links(behavior: FollowBehavior, page_url: &Url, links: &[String]) -> Vec<String> {
    if behavior == FollowBehavior::None {
        return Vec::new();
    }

    links
        .iter()
        .filter(|raw| {
            let link = match Url::parse(raw) {
                Ok(link) => link,
                Err(_) => return false,
            };
            match behavior {
                FollowBehavior::Any => true,
                FollowBehavior::SameDomain => are_same_host(&link, page_url),
                FollowBehavior::RelatedSubdomains => are_related_hosts(&link, page_url),
                FollowBehavior::None => false,
            }
        })
        .cloned()
        .collect()
}

/// Declares the crawl complete once no worker is active and the frontier is
/// empty, then cancels the run context
///
/// Polling both signals on a fixed interval is deliberate: completion is a
/// global property no single producer can observe, and a 1s check is enough
/// for a best-effort, single-process decision.
async fn idle_monitor(run: Arc<RunState>) {
    loop {
        tokio::select! {
            _ = run.cancel.cancelled() => return,
            _ = tokio::time::sleep(IDLE_POLL_INTERVAL) => {}
        }

        if run.active_workers.load(Ordering::SeqCst) == 0 && run.frontier.pending() == 0 {
            tracing::info!("no more work available, stopping crawl");
            run.cancel.cancel();
            return;
        }
    }
}

/// Periodically logs the crawl counters; purely observational
async fn progress_reporter(run: Arc<RunState>, interval: Duration) {
    loop {
        tokio::select! {
            _ = run.cancel.cancelled() => return,
            _ = tokio::time::sleep(interval) => {}
        }

        let snapshot = run.stats.snapshot();
        tracing::info!(
            processed = snapshot.processed,
            succeeded = snapshot.succeeded,
            failed = snapshot.failed,
            "crawl progress"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_run_state(max_pages: u64, queue_size: usize) -> RunState {
        struct NoopFetcher;

        #[async_trait::async_trait]
        impl Fetcher for NoopFetcher {
            async fn fetch(
                &self,
                _cancel: &CancellationToken,
                request: &FetchRequest,
            ) -> Result<FetchResponse> {
                Ok(FetchResponse {
                    url: request.url.clone(),
                    html: String::new(),
                    links: Vec::new(),
                })
            }
        }

        RunState {
            config: CrawlerConfig {
                max_pages,
                workers: 1,
                request_delay_ms: 0,
                queue_size,
                follow: FollowBehavior::Any,
                fetcher_name: "http".to_string(),
            },
            fetcher: Arc::new(NoopFetcher),
            cache: None,
            parsers: HashMap::new(),
            default_parser: None,
            stats: Arc::new(CrawlerStats::new()),
            frontier: Frontier::new(queue_size),
            active_workers: AtomicI64::new(0),
            cancel: CancellationToken::new(),
            callback: Arc::new(|_: CrawlResult| {}),
        }
    }

    #[test]
    fn test_admit_dedups_normalized_variants() {
        let run = test_run_state(0, 100);
        let urls = vec![
            "https://example.com/page".to_string(),
            "https://EXAMPLE.COM/page".to_string(),
            "https://example.com/page/".to_string(),
        ];
        assert_eq!(run.admit(&urls), 1);
    }

    #[test]
    fn test_admit_skips_malformed() {
        let run = test_run_state(0, 100);
        let urls = vec![
            "not a url".to_string(),
            "mailto:bot@example.com".to_string(),
            "https://example.com/ok".to_string(),
        ];
        assert_eq!(run.admit(&urls), 1);
    }

    #[test]
    fn test_admit_clamps_to_budget() {
        let run = test_run_state(2, 100);
        let urls: Vec<String> = (0..10)
            .map(|i| format!("https://example.com/p{}", i))
            .collect();
        assert_eq!(run.admit(&urls), 2);
    }

    #[test]
    fn test_admit_noop_when_budget_spent() {
        let run = test_run_state(2, 100);
        run.stats.increment_processed();
        run.stats.increment_processed();
        let urls = vec!["https://example.com/late".to_string()];
        assert_eq!(run.admit(&urls), 0);
    }

    #[test]
    fn test_admit_drops_on_full_frontier() {
        let run = test_run_state(0, 2);
        let urls: Vec<String> = (0..5)
            .map(|i| format!("https://example.com/p{}", i))
            .collect();
        assert_eq!(run.admit(&urls), 2);
    }

    #[test]
    fn test_filter_links_same_domain() {
        let page = Url::parse("https://example.com/x").unwrap();
        let links = vec![
            "https://example.com/p".to_string(),
            "https://other.com/q".to_string(),
        ];
        let filtered = filter_links(FollowBehavior::SameDomain, &page, &links);
        assert_eq!(filtered, vec!["https://example.com/p".to_string()]);
    }

    #[test]
    fn test_filter_links_related_subdomains() {
        let page = Url::parse("https://example.com/x").unwrap();
        let links = vec![
            "https://blog.example.com/p".to_string(),
            "https://example.org/q".to_string(),
        ];
        let filtered = filter_links(FollowBehavior::RelatedSubdomains, &page, &links);
        assert_eq!(filtered, vec!["https://blog.example.com/p".to_string()]);
    }

    #[test]
    fn test_filter_links_none() {
        let page = Url::parse("https://example.com/x").unwrap();
        let links = vec!["https://example.com/p".to_string()];
        assert!(filter_links(FollowBehavior::None, &page, &links).is_empty());
    }

    #[test]
    fn test_filter_links_any_keeps_everything() {
        let page = Url::parse("https://example.com/x").unwrap();
        let links = vec![
            "https://example.com/p".to_string(),
            "https://other.com/q".to_string(),
        ];
        let filtered = filter_links(FollowBehavior::Any, &page, &links);
        assert_eq!(filtered.len(), 2);
    }

    #[test]
    fn test_extract_urls_resolves_dedups_and_sorts() {
        use crate::crawler::Link;

        let response = FetchResponse {
            url: "https://example.com/x".to_string(),
            html: String::new(),
            links: vec![
                Link {
                    url: "/b".to_string(),
                    text: None,
                },
                Link {
                    url: "/a".to_string(),
                    text: None,
                },
                Link {
                    url: "https://example.com/a".to_string(),
                    text: None,
                },
                Link {
                    url: "mailto:bot@example.com".to_string(),
                    text: None,
                },
            ],
        };

        let urls = extract_urls(&response, "example.com");
        assert_eq!(
            urls,
            vec![
                "https://example.com/a".to_string(),
                "https://example.com/b".to_string(),
            ]
        );
    }
}
