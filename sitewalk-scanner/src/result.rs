use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One visited page: where it sat in the traversal and which in-scope pages it links to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlResult {
    pub url: String,
    pub depth: usize,
    pub found_urls: BTreeSet<String>,
    pub status_code: Option<u16>,
    pub error: Option<String>,
}

impl CrawlResult {
    pub fn new(url: String, depth: usize) -> Self {
        Self {
            url,
            depth,
            found_urls: BTreeSet::new(),
            status_code: None,
            error: None,
        }
    }

    pub fn with_error(url: String, depth: usize, error: String) -> Self {
        Self {
            error: Some(error),
            ..Self::new(url, depth)
        }
    }

    pub fn is_start_page(&self) -> bool {
        self.depth == 0
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}
