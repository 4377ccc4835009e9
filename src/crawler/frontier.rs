//! Crawl frontier: the visited set and the FIFO queue of URLs still to fetch
//!
//! Invariants:
//! - `visited ∩ pending = ∅`
//! - a URL enters `pending` at most once per crawl run; later duplicates are dropped

use std::collections::{HashSet, VecDeque};
use url::Url;

#[derive(Debug, Default)]
pub struct Frontier {
    /// URLs successfully fetched and recorded
    visited: HashSet<String>,

    /// URLs waiting to be fetched, oldest first
    pending: VecDeque<Url>,

    /// Every URL ever enqueued this run
    seen: HashSet<String>,
}

impl Frontier {
    /// Creates a frontier seeded with the start URL
    pub fn new(start_url: Url) -> Self {
        let mut frontier = Self::default();
        frontier.push(start_url);
        frontier
    }

    /// Enqueues a URL unless it was enqueued or visited before
    ///
    /// Returns true if the URL was added.
    pub fn push(&mut self, url: Url) -> bool {
        let key = url.as_str();
        if self.visited.contains(key) || self.seen.contains(key) {
            return false;
        }
        self.seen.insert(key.to_string());
        self.pending.push_back(url);
        true
    }

    /// Takes the oldest pending URL
    pub fn pop(&mut self) -> Option<Url> {
        self.pending.pop_front()
    }

    /// Records a successful visit
    ///
    /// Returns false if the URL was already visited.
    pub fn mark_visited(&mut self, url: &Url) -> bool {
        self.seen.insert(url.as_str().to_string());
        self.visited.insert(url.as_str().to_string())
    }

    /// Prevents a URL from being enqueued later without visiting it
    ///
    /// Used for redirect targets so the same document is not fetched twice.
    pub fn mark_seen(&mut self, url: &Url) {
        self.seen.insert(url.as_str().to_string());
    }

    pub fn is_visited(&self, url: &Url) -> bool {
        self.visited.contains(url.as_str())
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }
}
