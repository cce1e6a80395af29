use futures::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};
use sitewalk_scanner::config::{
    DEFAULT_MAX_CONCURRENCY, DEFAULT_MAX_PAGES_DEPTH, DEFAULT_TIMEOUT_SECS,
};
use sitewalk_scanner::{CrawlConfig, CrawlResult, Crawler, ScanError};
use std::io;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Options for configuring a crawl operation
#[derive(Debug, Clone)]
pub struct CrawlOptions {
    pub url: String,
    pub user_agent: Option<String>,
    pub max_concurrency: usize,
    pub max_pages_depth: usize,
    pub timeout_secs: u64,
    pub show_progress_bars: bool,
}

impl CrawlOptions {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            user_agent: None,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            max_pages_depth: DEFAULT_MAX_PAGES_DEPTH,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            show_progress_bars: false,
        }
    }

    /// Validates the options into a scanner configuration.
    pub fn to_config(&self) -> Result<CrawlConfig, ScanError> {
        let mut builder = CrawlConfig::builder(self.url.as_str())
            .with_max_concurrency(self.max_concurrency)
            .with_max_pages_depth(self.max_pages_depth)
            .with_timeout_secs(self.timeout_secs);

        if let Some(ref user_agent) = self.user_agent {
            builder = builder.with_user_agent(user_agent.as_str());
        }

        builder.build()
    }
}

#[derive(Error, Debug)]
pub enum CrawlError {
    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error("Failed to write result: {0}")]
    Output(#[from] io::Error),
}

/// Totals for a finished crawl
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlSummary {
    pub pages: usize,
    pub errors: usize,
    pub links_found: usize,
    pub elapsed: Duration,
}

impl CrawlSummary {
    fn record(&mut self, result: &CrawlResult) {
        self.pages += 1;
        self.links_found += result.found_urls.len();
        if result.is_error() {
            self.errors += 1;
        }
    }
}

/// Execute a crawl, handing every result to `on_result` as soon as it completes.
pub async fn execute_crawl<W>(
    config: CrawlConfig,
    show_progress_bars: bool,
    mut on_result: W,
) -> Result<CrawlSummary, CrawlError>
where
    W: FnMut(&CrawlResult) -> io::Result<()>,
{
    let start_message = format!("Crawling {}...", config.base_url());
    let crawler = Crawler::from_config(config)?;

    // Single spinner for overall progress (only if enabled)
    let progress_bar = show_progress_bars.then(|| {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            pb.set_style(style);
        }
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message(start_message);
        pb
    });

    let started = Instant::now();
    let mut summary = CrawlSummary::default();
    let mut results = crawler.crawl();

    while let Some(result) = results.next().await {
        summary.record(&result);

        match progress_bar {
            Some(ref pb) => {
                pb.suspend(|| on_result(&result))?;
                pb.set_message(format!("Crawling... {} pages processed", summary.pages));
            }
            None => on_result(&result)?,
        }
    }

    summary.elapsed = started.elapsed();

    if let Some(pb) = progress_bar {
        pb.finish_and_clear();
    }

    Ok(summary)
}
