//! Run summary
//!
//! Counts the Markdown files each product produced and reports per-product
//! metrics once every crawler has finished.

use crate::state::{CrawlMetrics, CrawlOutcome};
use std::collections::BTreeMap;
use std::path::Path;
use tokio::fs;
use tracing::info;

/// Counts `.md` files in each product folder directly under `base_folder`
///
/// A missing base folder yields an empty summary.
pub async fn summarize_output(base_folder: &Path) -> std::io::Result<BTreeMap<String, usize>> {
    let mut counts = BTreeMap::new();

    let mut entries = match fs::read_dir(base_folder).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(counts),
        Err(e) => return Err(e),
    };

    while let Some(entry) = entries.next_entry().await? {
        if !entry.file_type().await?.is_dir() {
            continue;
        }

        let mut files = fs::read_dir(entry.path()).await?;
        let mut count = 0;
        while let Some(file) = files.next_entry().await? {
            if file.file_name().to_string_lossy().ends_with(".md") {
                count += 1;
            }
        }

        counts.insert(entry.file_name().to_string_lossy().into_owned(), count);
    }

    Ok(counts)
}

/// One `"{product}: {count} markdown files"` line per product
pub fn format_summary(counts: &BTreeMap<String, usize>) -> String {
    counts
        .iter()
        .map(|(product, count)| format!("{}: {} markdown files\n", product, count))
        .collect()
}

/// Writes the summary file, replacing any previous one
pub async fn write_summary(path: &Path, counts: &BTreeMap<String, usize>) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }
    fs::write(path, format_summary(counts)).await
}

/// Logs the final metrics of one product crawl
pub fn log_metrics(product: &str, metrics: &CrawlMetrics) {
    info!("Crawl metrics for {}:", product);
    info!("  Links found: {}", metrics.links_found);
    info!("  Links processed: {}", metrics.links_processed);
    info!("  Links skipped (duplicate): {}", metrics.links_skipped_duplicate);
    info!("  Links skipped (filter): {}", metrics.links_skipped_filter);
    info!("  Links skipped (error): {}", metrics.links_skipped_error);
    info!(
        "  Links already claimed by another product: {}",
        metrics.links_claimed_by_other_product
    );
    info!("  Max depth reached: {}", metrics.max_depth_reached);
    info!("  Reached page cap: {}", metrics.reached_max_pages);
    info!("  Reached depth cap: {}", metrics.reached_max_depth);
}

/// Logs file counts together with why each product stopped
///
/// Products whose crawler failed have an outcome but no metrics.
pub fn log_summary(
    counts: &BTreeMap<String, usize>,
    outcomes: &BTreeMap<String, CrawlOutcome>,
    metrics: &BTreeMap<String, CrawlMetrics>,
) {
    info!("Crawl summary:");
    for (product, outcome) in outcomes {
        let folder = product.replace(' ', "_");
        let files = counts.get(&folder).copied().unwrap_or(0);
        match metrics.get(product) {
            Some(m) if m.links_claimed_by_other_product > 0 => info!(
                "  {}: {} markdown files ({}, {} links owned by another product)",
                product, files, outcome, m.links_claimed_by_other_product
            ),
            _ => info!("  {}: {} markdown files ({})", product, files, outcome),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_summarize_output_counts_markdown_only() {
        let dir = TempDir::new().unwrap();
        let sales = dir.path().join("Sales_Cloud");
        std::fs::create_dir_all(&sales).unwrap();
        std::fs::write(sales.join("output_a.md"), "a").unwrap();
        std::fs::write(sales.join("output_b.md"), "b").unwrap();
        std::fs::write(sales.join("notes.txt"), "c").unwrap();
        std::fs::create_dir_all(dir.path().join("Data")).unwrap();
        std::fs::write(dir.path().join("skipped_404.log"), "x\n").unwrap();

        let counts = summarize_output(dir.path()).await.unwrap();

        assert_eq!(counts.len(), 2);
        assert_eq!(counts["Sales_Cloud"], 2);
        assert_eq!(counts["Data"], 0);
    }

    #[tokio::test]
    async fn test_missing_base_folder() {
        let dir = TempDir::new().unwrap();
        let counts = summarize_output(&dir.path().join("nope")).await.unwrap();
        assert!(counts.is_empty());
    }

    #[tokio::test]
    async fn test_write_summary() {
        let dir = TempDir::new().unwrap();
        let mut counts = BTreeMap::new();
        counts.insert("MuleSoft".to_string(), 3);
        counts.insert("Data".to_string(), 0);

        let path = dir.path().join("summary.log");
        write_summary(&path, &counts).await.unwrap();

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "Data: 0 markdown files\nMuleSoft: 3 markdown files\n"
        );
    }
}
