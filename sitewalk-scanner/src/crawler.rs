use crate::config::CrawlConfig;
use crate::error::{Result, ScanError};
use crate::extractor::{LinkExtractor, SameOriginExtractor, canonicalize};
use crate::fetcher::{HttpFetcher, PageFetcher};
use crate::frontier::{Frontier, FrontierEntry};
use crate::result::CrawlResult;
use futures::Stream;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, error, info};

/// Breadth-first, same-origin crawler.
///
/// Pages are fetched in batches of at most `max_concurrency`. Every task of a
/// batch finishes, and its discoveries are queued, before the next batch is
/// formed. The frontier and visited set belong to the single coordinating
/// task; workers only hand back [`CrawlResult`]s.
pub struct Crawler<F, E> {
    config: Arc<CrawlConfig>,
    fetcher: Arc<F>,
    extractor: Arc<E>,
}

impl Crawler<HttpFetcher, SameOriginExtractor> {
    /// Crawler wired to the reqwest fetcher and the same-origin extractor.
    pub fn from_config(config: CrawlConfig) -> Result<Self> {
        let fetcher = HttpFetcher::new(&config)?;
        let extractor = SameOriginExtractor::new(&config);
        Ok(Self::new(config, fetcher, extractor))
    }
}

impl<F: PageFetcher, E: LinkExtractor> Crawler<F, E> {
    pub fn new(config: CrawlConfig, fetcher: F, extractor: E) -> Self {
        Self {
            config: Arc::new(config),
            fetcher: Arc::new(fetcher),
            extractor: Arc::new(extractor),
        }
    }

    /// Starts the crawl on the current tokio runtime.
    ///
    /// Results arrive in completion order. The stream ends when the frontier
    /// is exhausted. Dropping the stream stops the crawl before the next batch.
    pub fn crawl(self) -> CrawlStream {
        let (sender, receiver) = mpsc::channel(self.config.max_concurrency());
        tokio::spawn(self.run(sender));
        CrawlStream { receiver }
    }

    async fn run(self, results: mpsc::Sender<CrawlResult>) {
        let Self {
            config,
            fetcher,
            extractor,
        } = self;

        info!("Starting crawl of {}", config.base_url());
        info!("Configuration: {:?}", config);

        let mut frontier = Frontier::new();
        let start_url = config.start_url();
        frontier.push(start_url.as_str(), 0);

        // `/docs/` is fetched as given but must not come back as `/docs`
        if let Some(canonical) = canonicalize(start_url.clone()).filter(|c| c != start_url) {
            frontier.mark_visited(canonical.as_str());
        }

        let mut errors = 0usize;

        loop {
            let batch = frontier.next_batch(config.max_concurrency());
            if batch.is_empty() {
                break;
            }

            debug!(
                "Dispatching batch of {} URLs ({} still pending)",
                batch.len(),
                frontier.pending_count()
            );

            let mut tasks = JoinSet::new();
            for entry in batch {
                let fetcher = Arc::clone(&fetcher);
                let extractor = Arc::clone(&extractor);
                tasks.spawn(async move { visit(fetcher.as_ref(), extractor.as_ref(), entry).await });
            }

            while let Some(joined) = tasks.join_next().await {
                let result = match joined.map_err(ScanError::from) {
                    Ok(result) => result,
                    Err(e) => {
                        error!("Task failed: {}", e);
                        continue;
                    }
                };

                if result.is_error() {
                    errors += 1;
                }

                if config.allows_descent(result.depth) {
                    for url in &result.found_urls {
                        if frontier.push(url.as_str(), result.depth + 1) {
                            debug!("Queued {} at depth {}", url, result.depth + 1);
                        }
                    }
                }

                if results.send(result).await.is_err() {
                    debug!("Result consumer went away, stopping crawl");
                    return;
                }
            }
        }

        info!(
            "Crawl complete. Visited {} pages ({} with errors)",
            frontier.visited_count(),
            errors
        );
    }
}

/// Fetches one page and extracts its links.
async fn visit<F: PageFetcher, E: LinkExtractor>(
    fetcher: &F,
    extractor: &E,
    entry: FrontierEntry,
) -> CrawlResult {
    let page = fetcher.fetch(&entry.url).await;

    if let Some(error) = page.error {
        debug!("Fetch of {} failed: {}", entry.url, error);
        return CrawlResult {
            status_code: page.status,
            ..CrawlResult::with_error(entry.url, entry.depth, error)
        };
    }

    let mut result = CrawlResult::new(entry.url, entry.depth);
    result.status_code = page.status;

    if let Some(body) = page.body {
        match extractor.extract(&body, &result.url) {
            Ok(found) => result.found_urls = found,
            Err(e) => {
                error!("Unexpected error on {}: {}", result.url, e);
                result.error = Some(format!("Unexpected error: {}", e));
            }
        }
    }

    result
}

/// Results of a running crawl, in completion order.
#[derive(Debug)]
pub struct CrawlStream {
    receiver: mpsc::Receiver<CrawlResult>,
}

impl CrawlStream {
    /// Waits for the next result; `None` once the crawl has finished.
    pub async fn next_result(&mut self) -> Option<CrawlResult> {
        self.receiver.recv().await
    }
}

impl Stream for CrawlStream {
    type Item = CrawlResult;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.receiver.poll_recv(cx)
    }
}
