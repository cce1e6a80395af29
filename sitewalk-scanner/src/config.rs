use crate::error::{Result, ScanError};
use serde::Serialize;
use std::ops::RangeInclusive;
use std::time::Duration;
use url::Url;

pub const DEFAULT_USER_AGENT: &str = concat!("sitewalk/", env!("CARGO_PKG_VERSION"));
pub const DEFAULT_MAX_CONCURRENCY: usize = 10;
pub const DEFAULT_MAX_PAGES_DEPTH: usize = 0;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const MAX_CONCURRENCY_RANGE: RangeInclusive<u64> = 1..=100;
const MAX_PAGES_DEPTH_RANGE: RangeInclusive<u64> = 0..=100;
const TIMEOUT_RANGE: RangeInclusive<u64> = 1..=120;

/// Immutable crawl parameters.
///
/// Built through [`CrawlConfig::builder`]; every value is validated by
/// [`CrawlConfigBuilder::build`], so a `CrawlConfig` that exists is always usable.
#[derive(Debug, Clone, Serialize)]
pub struct CrawlConfig {
    base_url: Url,
    user_agent: String,
    max_concurrency: usize,
    max_pages_depth: usize,
    timeout_secs: u64,
    origin: String,
    start_url: Url,
}

impl CrawlConfig {
    pub fn builder(base_url: impl Into<String>) -> CrawlConfigBuilder {
        CrawlConfigBuilder::new(base_url)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    /// Zero means unlimited.
    pub fn max_pages_depth(&self) -> usize {
        self.max_pages_depth
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// `scheme://host[:port]`, default ports omitted. Used for scope checks.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// The base URL as given minus its fragment. This is the frontier seed and
    /// the base the start page's relative links resolve against.
    pub fn start_url(&self) -> &Url {
        &self.start_url
    }

    /// Whether links found on a page at `depth` may be enqueued.
    pub fn allows_descent(&self, depth: usize) -> bool {
        self.max_pages_depth == 0 || depth < self.max_pages_depth
    }
}

#[derive(Debug, Clone)]
pub struct CrawlConfigBuilder {
    base_url: String,
    user_agent: String,
    max_concurrency: usize,
    max_pages_depth: usize,
    timeout_secs: u64,
}

impl CrawlConfigBuilder {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            max_pages_depth: DEFAULT_MAX_PAGES_DEPTH,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency;
        self
    }

    pub fn with_max_pages_depth(mut self, max_pages_depth: usize) -> Self {
        self.max_pages_depth = max_pages_depth;
        self
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn build(self) -> Result<CrawlConfig> {
        let base_url = Url::parse(self.base_url.trim())
            .map_err(|e| ScanError::InvalidUrl(format!("'{}': {}", self.base_url, e)))?;

        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ScanError::UnsupportedScheme(base_url.scheme().to_string()));
        }
        if base_url.host_str().is_none_or(str::is_empty) {
            return Err(ScanError::InvalidUrl(format!("'{}' has no host", self.base_url)));
        }

        check_range("max_concurrency", self.max_concurrency as u64, MAX_CONCURRENCY_RANGE)?;
        check_range("max_pages_depth", self.max_pages_depth as u64, MAX_PAGES_DEPTH_RANGE)?;
        check_range("timeout", self.timeout_secs, TIMEOUT_RANGE)?;

        let origin = base_url.origin().ascii_serialization();
        let mut start_url = base_url.clone();
        start_url.set_fragment(None);

        Ok(CrawlConfig {
            base_url,
            user_agent: self.user_agent,
            max_concurrency: self.max_concurrency,
            max_pages_depth: self.max_pages_depth,
            timeout_secs: self.timeout_secs,
            origin,
            start_url,
        })
    }
}

fn check_range(name: &'static str, value: u64, range: RangeInclusive<u64>) -> Result<()> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(ScanError::OutOfRange {
            name,
            min: *range.start(),
            max: *range.end(),
            value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CrawlConfig::builder("https://example.com").build().unwrap();
        assert_eq!(config.max_concurrency(), 10);
        assert_eq!(config.max_pages_depth(), 0);
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert!(config.user_agent().starts_with("sitewalk/"));
    }

    #[test]
    fn test_accepts_http_and_https() {
        let http = CrawlConfig::builder("http://example.com").build().unwrap();
        let https = CrawlConfig::builder("https://example.com").build().unwrap();

        assert_eq!(http.origin(), "http://example.com");
        assert_eq!(https.origin(), "https://example.com");
    }

    #[test]
    fn test_rejects_unsupported_scheme() {
        let err = CrawlConfig::builder("ftp://example.com").build().unwrap_err();
        assert!(matches!(err, ScanError::UnsupportedScheme(ref s) if s == "ftp"));
        assert!(err.is_config_error());
    }

    #[test]
    fn test_rejects_relative_url() {
        let err = CrawlConfig::builder("example.com/foo").build().unwrap_err();
        assert!(matches!(err, ScanError::InvalidUrl(_)));
    }

    #[test]
    fn test_origin_ignores_path() {
        let root = CrawlConfig::builder("https://example.com/foo/bar").build().unwrap();
        let sub = CrawlConfig::builder("https://test.example.com/foo/bar").build().unwrap();

        assert_eq!(root.origin(), "https://example.com");
        assert_eq!(sub.origin(), "https://test.example.com");
    }

    #[test]
    fn test_origin_strips_default_port_and_keeps_custom_port() {
        let default_port = CrawlConfig::builder("https://EXAMPLE.com:443/x").build().unwrap();
        let custom_port = CrawlConfig::builder("http://example.com:8080").build().unwrap();

        assert_eq!(default_port.origin(), "https://example.com");
        assert_eq!(custom_port.origin(), "http://example.com:8080");
    }

    #[test]
    fn test_start_url_keeps_path_and_drops_fragment() {
        let config = CrawlConfig::builder("https://example.com/docs/#intro").build().unwrap();
        assert_eq!(config.start_url().as_str(), "https://example.com/docs/");

        let root = CrawlConfig::builder("https://example.com").build().unwrap();
        assert_eq!(root.start_url().as_str(), "https://example.com/");
    }

    #[test]
    fn test_range_validation() {
        let too_many = CrawlConfig::builder("https://example.com")
            .with_max_concurrency(101)
            .build();
        assert!(matches!(
            too_many,
            Err(ScanError::OutOfRange { name: "max_concurrency", .. })
        ));

        let zero = CrawlConfig::builder("https://example.com")
            .with_max_concurrency(0)
            .build();
        assert!(zero.is_err());

        let deep = CrawlConfig::builder("https://example.com")
            .with_max_pages_depth(101)
            .build();
        assert!(matches!(
            deep,
            Err(ScanError::OutOfRange { name: "max_pages_depth", .. })
        ));

        let slow = CrawlConfig::builder("https://example.com")
            .with_timeout_secs(121)
            .build();
        assert!(matches!(slow, Err(ScanError::OutOfRange { name: "timeout", .. })));

        let bounds = CrawlConfig::builder("https://example.com")
            .with_max_concurrency(100)
            .with_max_pages_depth(100)
            .with_timeout_secs(1)
            .build();
        assert!(bounds.is_ok());
    }

    #[test]
    fn test_allows_descent() {
        let unlimited = CrawlConfig::builder("https://example.com").build().unwrap();
        assert!(unlimited.allows_descent(0));
        assert!(unlimited.allows_descent(99));

        let one = CrawlConfig::builder("https://example.com")
            .with_max_pages_depth(1)
            .build()
            .unwrap();
        assert!(one.allows_descent(0));
        assert!(!one.allows_descent(1));
    }
}
