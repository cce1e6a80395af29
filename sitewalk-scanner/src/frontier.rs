use std::collections::{HashSet, VecDeque};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierEntry {
    pub url: String,
    pub depth: usize,
}

impl FrontierEntry {
    pub fn new(url: impl Into<String>, depth: usize) -> Self {
        Self {
            url: url.into(),
            depth,
        }
    }
}

/// Pending URLs plus the set of URLs already handed out for fetching.
///
/// A URL is marked visited the moment it is selected into a batch and is
/// never unmarked. URLs that are visited or already waiting are not queued
/// again.
#[derive(Debug, Default)]
pub struct Frontier {
    queue: VecDeque<FrontierEntry>,
    pending: HashSet<String>,
    visited: HashSet<String>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `url` at `depth`. Returns false if it was already visited or pending.
    pub fn push(&mut self, url: impl Into<String>, depth: usize) -> bool {
        let url = url.into();
        if self.visited.contains(&url) || self.pending.contains(&url) {
            return false;
        }

        self.pending.insert(url.clone());
        self.queue.push_back(FrontierEntry { url, depth });
        true
    }

    /// Takes up to `limit` unvisited entries in FIFO order, marking each visited.
    pub fn next_batch(&mut self, limit: usize) -> Vec<FrontierEntry> {
        let mut batch = Vec::with_capacity(limit.min(self.queue.len()));

        while batch.len() < limit {
            let Some(entry) = self.queue.pop_front() else {
                break;
            };
            self.pending.remove(&entry.url);

            if self.visited.insert(entry.url.clone()) {
                batch.push(entry);
            }
        }

        batch
    }

    /// Records `url` as already handled without fetching it.
    pub fn mark_visited(&mut self, url: impl Into<String>) {
        self.visited.insert(url.into());
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    pub fn pending_count(&self) -> usize {
        self.queue.len()
    }
}
