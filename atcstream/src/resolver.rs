//! Upstream Resolver
//!
//! Turns a [`StreamTarget`] into a fetchable audio URL. Direct-stream
//! stations get a URL computed from a template; scanner-page stations get
//! theirs scraped from the scanner's web page. Nothing is cached: upstream
//! URLs rotate, so every call resolves again.
//!
//! # Example
//!
//! ```no_run
//! use atcstream::{StationSource, StreamResolver, StreamTarget, UpstreamResolver};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let resolver = UpstreamResolver::new()?;
//!     let target = StreamTarget::new(StationSource::ScannerPage, "ULLI")?;
//!     let stream = resolver.resolve(&target).await?;
//!     println!("Stream: {}", stream);
//!     Ok(())
//! }
//! ```

use crate::error::{Error, Result};
use crate::models::{ResolvedStream, ScannerPage, StationSource, StreamTarget};
use crate::scrape;
use async_trait::async_trait;
use reqwest::header::{CACHE_CONTROL, PRAGMA, USER_AGENT};
use reqwest::Client;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Default scanner page template (`{code}` is the lowercased station code)
pub const DEFAULT_SCANNER_PAGE_TEMPLATE: &str = "http://live.radioscanner.pro/audio/{code}";

/// Default direct-stream template
pub const DEFAULT_DIRECT_STREAM_TEMPLATE: &str = "https://s1-fmt2.liveatc.net/{code}";

/// Query parameter carrying the cache buster on direct-stream URLs
pub const CACHE_BUSTER_PARAM: &str = "nocache";

/// Default timeout for scanner page requests (30 seconds)
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Browser-like User-Agent; both upstreams reject obvious bots
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Resolution seam used by the relay
///
/// [`UpstreamResolver`] is the real implementation; tests plug in their own.
#[async_trait]
pub trait StreamResolver: Send + Sync {
    /// Produce the concrete upstream URL of a station
    async fn resolve(&self, target: &StreamTarget) -> Result<ResolvedStream>;

    /// Fetch and scrape the scanner page of a station
    async fn scanner_page(&self, station_code: &str) -> Result<ScannerPage>;
}

/// HTTP-backed resolver for the known sources
#[derive(Debug)]
pub struct UpstreamResolver {
    client: Client,
    scanner_page_template: String,
    direct_stream_template: String,
    timeout: Duration,
    user_agent: String,
    last_cache_buster: AtomicU64,
}

impl UpstreamResolver {
    /// Create a resolver with default settings
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    /// Create a builder for configuring the resolver
    pub fn builder() -> ResolverBuilder {
        ResolverBuilder::default()
    }

    /// Get the internal HTTP client
    ///
    /// The relay reuses it so both share one connection pool.
    pub fn http_client(&self) -> &Client {
        &self.client
    }

    /// User-Agent sent with every upstream request
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Page URL of a scanner station
    pub fn scanner_page_url(&self, station_code: &str) -> Result<Url> {
        let raw = expand_template(&self.scanner_page_template, station_code);
        Url::parse(&raw)
            .map_err(|e| Error::internal(format!("Invalid scanner page URL {}: {}", raw, e)))
    }

    /// Stream URL of a direct-stream station, with a fresh cache buster
    pub fn direct_stream_url(&self, station_code: &str) -> Result<Url> {
        let raw = expand_template(&self.direct_stream_template, station_code);
        let mut url = Url::parse(&raw)
            .map_err(|e| Error::internal(format!("Invalid direct stream URL {}: {}", raw, e)))?;
        url.query_pairs_mut()
            .append_pair(CACHE_BUSTER_PARAM, &self.next_cache_buster().to_string());
        Ok(url)
    }

    /// Current time in milliseconds, bumped to stay strictly increasing
    fn next_cache_buster(&self) -> u64 {
        let now = chrono::Utc::now().timestamp_millis().max(0) as u64;
        let previous = self
            .last_cache_buster
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |prev| {
                Some(now.max(prev + 1))
            })
            .unwrap_or_else(|prev| prev);
        now.max(previous + 1)
    }
}

fn expand_template(template: &str, station_code: &str) -> String {
    template.replace("{code}", &station_code.trim().to_lowercase())
}

#[async_trait]
impl StreamResolver for UpstreamResolver {
    async fn resolve(&self, target: &StreamTarget) -> Result<ResolvedStream> {
        match target.source {
            StationSource::DirectStream => {
                let url = self.direct_stream_url(&target.station_code)?;
                debug!(source = %target.source, code = %target.station_code, %url, "Direct stream URL built");
                Ok(url.into())
            }
            StationSource::ScannerPage => Ok(self.scanner_page(&target.station_code).await?.stream),
        }
    }

    async fn scanner_page(&self, station_code: &str) -> Result<ScannerPage> {
        let url = self.scanner_page_url(station_code)?;
        debug!(code = %station_code, %url, "Fetching scanner page");

        let response = self
            .client
            .get(url)
            .header(USER_AGENT, &self.user_agent)
            .header(CACHE_CONTROL, "no-cache")
            .header(PRAGMA, "no-cache")
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                Error::UpstreamUnavailable(format!("Failed to fetch radioscanner page: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::UpstreamUnavailable(format!(
                "Failed to fetch radioscanner page: {}",
                status.as_u16()
            )));
        }

        let body = response.bytes().await.map_err(|e| {
            Error::UpstreamUnavailable(format!("Failed to read radioscanner page: {}", e))
        })?;
        let html = scrape::decode_page(&body);

        let raw = scrape::extract_stream_url(&html)
            .ok_or_else(|| Error::StreamUrlNotFound(station_code.to_string()))?;
        let stream = ResolvedStream::parse(&raw).map_err(|e| {
            warn!(code = %station_code, url = %raw, "Scanner page holds an invalid URL: {}", e);
            Error::StreamUrlNotFound(station_code.to_string())
        })?;

        Ok(ScannerPage {
            stream,
            listeners: scrape::extract_listener_count(&html),
        })
    }
}

/// Builder for configuring an [`UpstreamResolver`]
#[derive(Debug)]
pub struct ResolverBuilder {
    client: Option<Client>,
    scanner_page_template: String,
    direct_stream_template: String,
    timeout: Duration,
    user_agent: String,
}

impl Default for ResolverBuilder {
    fn default() -> Self {
        Self {
            client: None,
            scanner_page_template: DEFAULT_SCANNER_PAGE_TEMPLATE.to_string(),
            direct_stream_template: DEFAULT_DIRECT_STREAM_TEMPLATE.to_string(),
            timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ResolverBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a custom HTTP client
    pub fn client(mut self, client: Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Set the scanner page template (must contain `{code}`)
    pub fn scanner_page_template(mut self, template: impl Into<String>) -> Self {
        self.scanner_page_template = template.into();
        self
    }

    /// Set the direct-stream template (must contain `{code}`)
    pub fn direct_stream_template(mut self, template: impl Into<String>) -> Self {
        self.direct_stream_template = template.into();
        self
    }

    /// Set the scanner page timeout (also used as connect timeout)
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set a custom User-Agent header
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Build the resolver
    pub fn build(self) -> Result<UpstreamResolver> {
        let client = match self.client {
            Some(client) => client,
            // No total timeout here: the relay reuses this client for
            // streams that last hours.
            None => Client::builder()
                .user_agent(&self.user_agent)
                .connect_timeout(self.timeout)
                .build()
                .map_err(|e| Error::internal(format!("Failed to build HTTP client: {}", e)))?,
        };

        Ok(UpstreamResolver {
            client,
            scanner_page_template: self.scanner_page_template,
            direct_stream_template: self.direct_stream_template,
            timeout: self.timeout,
            user_agent: self.user_agent,
            last_cache_buster: AtomicU64::new(0),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query_value(url: &Url, key: &str) -> Option<String> {
        url.query_pairs()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    }

    #[test]
    fn test_builder_defaults() {
        let builder = ResolverBuilder::default();
        assert_eq!(builder.scanner_page_template, DEFAULT_SCANNER_PAGE_TEMPLATE);
        assert_eq!(builder.direct_stream_template, DEFAULT_DIRECT_STREAM_TEMPLATE);
        assert_eq!(
            builder.timeout,
            Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS)
        );
    }

    #[test]
    fn test_scanner_page_url_lowercases_code() {
        let resolver = UpstreamResolver::new().unwrap();
        assert_eq!(
            resolver.scanner_page_url("ULLI").unwrap().as_str(),
            "http://live.radioscanner.pro/audio/ulli"
        );
    }

    #[test]
    fn test_direct_stream_url_has_cache_buster() {
        let resolver = UpstreamResolver::new().unwrap();
        let url = resolver.direct_stream_url("URSS").unwrap();
        assert_eq!(url.path(), "/urss");
        let nocache: u64 = query_value(&url, CACHE_BUSTER_PARAM).unwrap().parse().unwrap();
        assert!(nocache > 1_600_000_000_000);
    }

    #[test]
    fn test_cache_buster_strictly_increasing() {
        let resolver = UpstreamResolver::new().unwrap();
        let values: Vec<u64> = (0..100).map(|_| resolver.next_cache_buster()).collect();
        assert!(values.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_invalid_template_is_internal_error() {
        let resolver = UpstreamResolver::builder()
            .direct_stream_template("not a url/{code}")
            .build()
            .unwrap();
        assert!(matches!(
            resolver.direct_stream_url("urss"),
            Err(Error::Internal(_))
        ));
    }

    #[tokio::test]
    async fn test_resolve_direct_stream_twice_differs_only_by_cache_buster() {
        let resolver = UpstreamResolver::new().unwrap();
        let target = StreamTarget::new(StationSource::DirectStream, "URSS").unwrap();

        let first = resolver.resolve(&target).await.unwrap();
        let second = resolver.resolve(&target).await.unwrap();

        assert_ne!(first, second);
        for stream in [&first, &second] {
            assert!(stream.as_str().contains("urss"));
        }

        let strip = |stream: &ResolvedStream| {
            let mut url = stream.url().clone();
            url.set_query(None);
            url
        };
        assert_eq!(strip(&first), strip(&second));
    }
}
