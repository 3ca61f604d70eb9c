//! Crawl coordinator - runs every product crawler and writes the run artifacts
//!
//! One tokio task per product. The registry and graph are created once and
//! shared; everything else a crawler needs is its own.

use crate::config::{Config, CrawlTarget};
use crate::crawler::product::{CrawlContext, CrawlLimits, ProductCrawler};
use crate::loader::LoaderFactory;
use crate::output::{export_graph, log_summary, summarize_output, write_summary, DocumentStore};
use crate::state::{CrawlGraph, CrawlMetrics, CrawlOutcome, VisitedRegistry};
use crate::CrawlError;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{error, info};

/// Runs one `ProductCrawler` per target and reports on the whole run
pub struct CrawlCoordinator {
    config: Arc<Config>,
    loaders: Arc<dyn LoaderFactory>,
    ctx: CrawlContext,
}

impl CrawlCoordinator {
    /// Creates a coordinator with a fresh registry and graph
    ///
    /// # Arguments
    ///
    /// * `config` - Validated configuration
    /// * `loaders` - Creates one page loader per product crawler
    /// * `store` - Where rendered documents are written
    pub fn new(config: Config, loaders: Arc<dyn LoaderFactory>, store: Arc<dyn DocumentStore>) -> Self {
        let ctx = CrawlContext::from_config(&config, store);
        Self::with_context(config, loaders, ctx)
    }

    /// Creates a coordinator around existing shared handles
    pub fn with_context(config: Config, loaders: Arc<dyn LoaderFactory>, ctx: CrawlContext) -> Self {
        Self {
            config: Arc::new(config),
            loaders,
            ctx,
        }
    }

    pub fn registry(&self) -> &VisitedRegistry {
        &self.ctx.registry
    }

    pub fn graph(&self) -> &CrawlGraph {
        &self.ctx.graph
    }

    /// Crawls every target concurrently and waits for all of them
    ///
    /// A crawler that fails or panics is logged and left out of the returned
    /// map; the others are unaffected. Once all are done the link graph and
    /// the summary file are written and the summary is logged.
    ///
    /// # Returns
    ///
    /// Metrics of every crawler that ran to completion, keyed by product
    pub async fn run(&self, targets: Vec<CrawlTarget>) -> BTreeMap<String, CrawlMetrics> {
        let limits = CrawlLimits {
            max_depth: self.config.crawler.max_depth,
            max_pages: self.config.crawler.max_pages_per_product,
        };

        info!(
            "Starting crawl of {} products (max depth {}, max pages {})",
            targets.len(),
            limits.max_depth,
            limits.max_pages
        );

        let mut handles = Vec::with_capacity(targets.len());
        for target in targets {
            let product = target.product.clone();
            let folder = self.config.output.product_folder(&product);
            let crawler = ProductCrawler::new(target, folder, limits, self.ctx.clone());
            let loaders = Arc::clone(&self.loaders);

            let handle = tokio::spawn(async move { crawler.run(loaders.as_ref()).await });
            handles.push((product, handle));
        }

        let mut metrics = BTreeMap::new();
        let mut outcomes = BTreeMap::new();

        for (product, handle) in handles {
            let result = match handle.await {
                Ok(result) => result,
                Err(e) => Err(CrawlError::Join {
                    product: product.clone(),
                    message: e.to_string(),
                }),
            };

            match result {
                Ok(product_metrics) => {
                    outcomes.insert(product.clone(), product_metrics.outcome());
                    metrics.insert(product, product_metrics);
                }
                Err(e) => {
                    error!("No metrics for {}: {}", product, e);
                    outcomes.insert(product, CrawlOutcome::Errored(e.to_string()));
                }
            }
        }

        self.write_artifacts(&outcomes, &metrics).await;

        metrics
    }

    /// Link graph, summary file and summary log; failures are logged only
    async fn write_artifacts(
        &self,
        outcomes: &BTreeMap<String, CrawlOutcome>,
        metrics: &BTreeMap<String, CrawlMetrics>,
    ) {
        let output = &self.config.output;

        let graph_path = output.graph_path();
        match export_graph(&self.ctx.graph, &graph_path).await {
            Ok(()) => info!(
                "Link graph written to {} ({} nodes, {} edges)",
                graph_path.display(),
                self.ctx.graph.node_count(),
                self.ctx.graph.edge_count()
            ),
            Err(e) => error!("Failed to write link graph {}: {}", graph_path.display(), e),
        }

        let counts = match summarize_output(output.base_folder()).await {
            Ok(counts) => counts,
            Err(e) => {
                error!("Failed to scan {}: {}", output.base_folder().display(), e);
                BTreeMap::new()
            }
        };

        let summary_path = output.summary_path();
        if let Err(e) = write_summary(&summary_path, &counts).await {
            error!("Failed to write summary {}: {}", summary_path.display(), e);
        }

        log_summary(&counts, outcomes, metrics);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::MemoryLoaderFactory;
    use crate::output::FsDocumentStore;
    use std::path::Path;
    use tempfile::TempDir;

    fn create_test_config(base: &Path) -> Config {
        let toml = format!(
            r#"
[crawler]
max-depth = 2
max-pages-per-product = 10
loader = "http"

[output]
base-folder = "{}"

[filter]
allowed-domains = ["https://docs.mulesoft.com"]

[[product]]
name = "Mule Runtime"
prefixes = ["/mule-runtime/"]
seeds = ["https://docs.mulesoft.com/mule-runtime/index"]

[[product]]
name = "DataWeave"
prefixes = ["/dataweave/"]
seeds = ["https://docs.mulesoft.com/dataweave/index"]
"#,
            base.display()
        );
        toml::from_str(&toml).unwrap()
    }

    fn page(title: &str, links: &[&str]) -> String {
        let anchors: String = links
            .iter()
            .map(|l| format!("<a href=\"{}\">x</a>", l))
            .collect();
        format!(
            "<html><head><title>{}</title></head><body><h1>{}</h1>{}</body></html>",
            title, title, anchors
        )
    }

    fn create_test_factory() -> MemoryLoaderFactory {
        MemoryLoaderFactory::new()
            .with_page(
                "https://docs.mulesoft.com/mule-runtime/index",
                &page(
                    "Mule",
                    &[
                        "/mule-runtime/about",
                        "/dataweave/index",
                        "/dataweave/functions",
                    ],
                ),
            )
            .with_page("https://docs.mulesoft.com/mule-runtime/about", &page("About", &[]))
            .with_page("https://docs.mulesoft.com/dataweave/index", &page("DataWeave", &[]))
            .with_page("https://docs.mulesoft.com/dataweave/functions", &page("Functions", &[]))
    }

    #[tokio::test]
    async fn test_run_crawls_every_product_and_writes_artifacts() {
        let dir = TempDir::new().unwrap();
        let config = create_test_config(dir.path());
        let factory = Arc::new(create_test_factory());

        let coordinator = CrawlCoordinator::new(config.clone(), factory.clone(), Arc::new(FsDocumentStore));
        let metrics = coordinator.run(config.targets()).await;

        assert_eq!(metrics.len(), 2);
        assert_eq!(metrics["Mule Runtime"].links_processed, 2);
        assert_eq!(metrics["Mule Runtime"].links_skipped_filter, 2);
        assert_eq!(metrics["DataWeave"].links_processed, 1);
        assert_eq!(factory.close_count(), 2);

        let summary = std::fs::read_to_string(dir.path().join("summary.log")).unwrap();
        assert!(summary.contains("Mule_Runtime: 2 markdown files"));
        assert!(summary.contains("DataWeave: 1 markdown files"));

        let graph: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(dir.path().join("link_graph.json")).unwrap())
                .unwrap();
        assert_eq!(graph["edges"].as_array().unwrap().len(), 3);
        assert!(coordinator.registry().contains("https://docs.mulesoft.com/mule-runtime/about"));
    }

    #[tokio::test]
    async fn test_failed_crawler_does_not_stop_the_run() {
        let dir = TempDir::new().unwrap();
        let config = create_test_config(dir.path());

        let coordinator = CrawlCoordinator::new(
            config.clone(),
            Arc::new(MemoryLoaderFactory::failing()),
            Arc::new(FsDocumentStore),
        );
        let metrics = coordinator.run(config.targets()).await;

        assert!(metrics.is_empty());
        assert!(dir.path().join("summary.log").exists());
        assert!(dir.path().join("link_graph.json").exists());
    }

    #[tokio::test]
    async fn test_empty_run() {
        let dir = TempDir::new().unwrap();
        let config = create_test_config(dir.path());

        let coordinator = CrawlCoordinator::new(
            config,
            Arc::new(MemoryLoaderFactory::new()),
            Arc::new(FsDocumentStore),
        );
        let metrics = coordinator.run(Vec::new()).await;

        assert!(metrics.is_empty());
        assert_eq!(coordinator.graph().node_count(), 0);
        assert_eq!(std::fs::read_to_string(dir.path().join("summary.log")).unwrap(), "");
    }
}
