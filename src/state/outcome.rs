//! Terminal states of a product crawl

use std::fmt;

/// Why a product crawl stopped
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CrawlOutcome {
    /// A level's queue was empty: nothing reachable was left
    Drained,

    /// The deepest allowed level was processed
    DepthCapped,

    /// The per-product page cap was hit, possibly mid-level
    PageCapped,

    /// The crawler could not run at all (e.g. the page loader failed to start)
    Errored(String),
}

impl CrawlOutcome {
    /// Short label used in logs and the summary
    pub fn label(&self) -> &'static str {
        match self {
            Self::Drained => "drained",
            Self::DepthCapped => "depth_capped",
            Self::PageCapped => "page_capped",
            Self::Errored(_) => "errored",
        }
    }
}

impl fmt::Display for CrawlOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Drained => write!(f, "no more eligible links"),
            Self::DepthCapped => write!(f, "maximum depth reached"),
            Self::PageCapped => write!(f, "maximum pages reached"),
            Self::Errored(message) => write!(f, "failed: {}", message),
        }
    }
}
