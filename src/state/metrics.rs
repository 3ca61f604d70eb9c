use crate::state::CrawlOutcome;
use serde::Serialize;

/// Counters for one product crawl, owned by its crawler until the crawl ends
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CrawlMetrics {
    /// Links harvested from successfully saved pages
    pub links_found: u64,
    /// Pages rendered and saved
    pub links_processed: u64,
    pub links_skipped_duplicate: u64,
    pub links_skipped_filter: u64,
    /// Load failures, extraction failures, 404 pages and failed saves
    pub links_skipped_error: u64,
    /// Duplicates whose existing claim belongs to a different product
    pub links_claimed_by_other_product: u64,
    pub max_depth_reached: u32,
    pub reached_max_pages: bool,
    pub reached_max_depth: bool,
}

impl CrawlMetrics {
    /// Why the crawl stopped; the page cap takes precedence over the depth cap
    pub fn outcome(&self) -> CrawlOutcome {
        if self.reached_max_pages {
            CrawlOutcome::PageCapped
        } else if self.reached_max_depth {
            CrawlOutcome::DepthCapped
        } else {
            CrawlOutcome::Drained
        }
    }

    pub fn links_skipped(&self) -> u64 {
        self.links_skipped_duplicate + self.links_skipped_filter + self.links_skipped_error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_from_flags() {
        let mut metrics = CrawlMetrics::default();
        assert_eq!(metrics.outcome(), CrawlOutcome::Drained);

        metrics.reached_max_depth = true;
        assert_eq!(metrics.outcome(), CrawlOutcome::DepthCapped);

        metrics.reached_max_pages = true;
        assert_eq!(metrics.outcome(), CrawlOutcome::PageCapped);
    }

    #[test]
    fn test_links_skipped_total() {
        let metrics = CrawlMetrics {
            links_skipped_duplicate: 4,
            links_skipped_filter: 2,
            links_skipped_error: 1,
            ..Default::default()
        };
        assert_eq!(metrics.links_skipped(), 7);
    }
}
