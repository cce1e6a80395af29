pub mod config;
pub mod crawler;
pub mod error;
pub mod extractor;
pub mod fetcher;
pub mod frontier;
pub mod result;

pub use config::{CrawlConfig, CrawlConfigBuilder};
pub use crawler::{CrawlStream, Crawler};
pub use error::ScanError;
pub use extractor::{LinkExtractor, SameOriginExtractor};
pub use fetcher::{FetchOutcome, HttpFetcher, PageFetcher};
pub use frontier::{Frontier, FrontierEntry};
pub use result::CrawlResult;
