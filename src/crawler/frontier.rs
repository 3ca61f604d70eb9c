//! Level-by-level crawl frontier
//!
//! Each BFS level is its own FIFO. A level is taken as a whole batch, so
//! entries pushed to the next level while it is processed wait their turn.

use std::collections::{BTreeMap, VecDeque};

/// A URL waiting to be processed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueEntry {
    pub url: String,

    /// Page the URL was found on; the URL itself for seeds
    pub source_url: String,
}

impl QueueEntry {
    pub fn seed(url: &str) -> Self {
        Self {
            url: url.to_string(),
            source_url: url.to_string(),
        }
    }
}

/// One FIFO queue per depth
#[derive(Debug, Default)]
pub struct LevelQueue {
    levels: BTreeMap<u32, VecDeque<QueueEntry>>,
}

impl LevelQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry to the queue for `depth`
    pub fn push(&mut self, depth: u32, entry: QueueEntry) {
        self.levels.entry(depth).or_default().push_back(entry);
    }

    /// Removes and returns every entry queued for `depth`, in insertion order
    pub fn take_level(&mut self, depth: u32) -> Vec<QueueEntry> {
        self.levels
            .remove(&depth)
            .map(Vec::from)
            .unwrap_or_default()
    }
}
