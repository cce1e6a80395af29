pub mod crawl;
pub mod report;

pub use crawl::{CrawlError, CrawlOptions, CrawlSummary, execute_crawl};
pub use report::{ReportFormat, render_result, render_summary};
