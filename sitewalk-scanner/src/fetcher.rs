use crate::config::CrawlConfig;
use crate::error::Result;
use reqwest::Client;
use std::future::Future;
use tracing::{debug, warn};

const MAX_REDIRECTS: usize = 5;

/// What came back from fetching one URL.
///
/// A non-2xx status always carries an `error`; a fetch that carries an
/// `error` never carries a `body`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutcome {
    pub status: Option<u16>,
    pub body: Option<String>,
    pub error: Option<String>,
}

impl FetchOutcome {
    /// 2xx response. Blank bodies are stored as `None`.
    pub fn ok(status: u16, body: Option<String>) -> Self {
        Self {
            status: Some(status),
            body: body.filter(|text| !text.trim().is_empty()),
            error: None,
        }
    }

    pub fn http_error(status: u16) -> Self {
        Self {
            status: Some(status),
            body: None,
            error: Some(format!("HTTP {}", status)),
        }
    }

    pub fn timeout() -> Self {
        Self::failed("Timeout")
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            status: None,
            body: None,
            error: Some(error.into()),
        }
    }
}

/// Retrieves pages for the crawler.
///
/// Implementations apply the configured timeout and user agent themselves and
/// report every failure through the returned [`FetchOutcome`].
pub trait PageFetcher: Send + Sync + 'static {
    fn fetch(&self, url: &str) -> impl Future<Output = FetchOutcome> + Send;
}

/// reqwest-backed fetcher.
///
/// The connection pool lives as long as this value; the crawler owns it for
/// the duration of one crawl and drops it when the crawl ends.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &CrawlConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent())
            .timeout(config.timeout())
            .connect_timeout(config.timeout())
            .pool_max_idle_per_host(config.max_concurrency())
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .build()?;

        Ok(Self { client })
    }
}

impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> FetchOutcome {
        debug!("Fetching {}", url);

        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => return outcome_for_error(&e),
        };

        let status = response.status();
        if !status.is_success() {
            return FetchOutcome::http_error(status.as_u16());
        }

        match response.text().await {
            Ok(text) => FetchOutcome::ok(status.as_u16(), Some(text)),
            Err(e) if e.is_timeout() => FetchOutcome::timeout(),
            Err(e) => {
                warn!("Decoding body of {} failed: {}", url, e);
                FetchOutcome::ok(status.as_u16(), None)
            }
        }
    }
}

fn outcome_for_error(error: &reqwest::Error) -> FetchOutcome {
    if error.is_timeout() {
        FetchOutcome::timeout()
    } else {
        FetchOutcome::failed(format!("Request failed: {}", error))
    }
}
