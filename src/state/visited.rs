use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

/// The claim a product holds on a URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisitRecord {
    pub url: String,
    pub product: String,
    /// Page the URL was discovered on; seeds point at themselves
    pub source_url: String,
    pub filename: String,
}

/// Run-wide registry of claimed URLs
///
/// Keyed by URL across all products: once any product claims a URL, no
/// product visits it again for the rest of the run. The lock is held only
/// for the single map operation.
#[derive(Debug, Default)]
pub struct VisitedRegistry {
    records: Mutex<HashMap<String, VisitRecord>>,
}

impl VisitedRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn records(&self) -> MutexGuard<'_, HashMap<String, VisitRecord>> {
        // A panic while holding the lock cannot leave the map half-written
        self.records.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Claims `url` for `product` if nobody has claimed it yet
    ///
    /// # Returns
    ///
    /// * `true` - The record was inserted; the caller may enqueue the URL
    /// * `false` - The URL was already claimed, possibly by another product
    pub fn try_claim(&self, url: &str, product: &str, source_url: &str, filename: &str) -> bool {
        let mut records = self.records();
        if records.contains_key(url) {
            return false;
        }
        records.insert(
            url.to_string(),
            VisitRecord {
                url: url.to_string(),
                product: product.to_string(),
                source_url: source_url.to_string(),
                filename: filename.to_string(),
            },
        );
        true
    }

    pub fn get(&self, url: &str) -> Option<VisitRecord> {
        self.records().get(url).cloned()
    }

    pub fn contains(&self, url: &str) -> bool {
        self.records().contains_key(url)
    }

    pub fn len(&self) -> usize {
        self.records().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records().is_empty()
    }
}
