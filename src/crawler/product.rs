//! Breadth-first crawl of one product
//!
//! A `ProductCrawler` owns one page loader for its whole life and walks the
//! product's link graph level by level. Per-page failures are counted and
//! logged; only failing to create the page loader ends the crawl early.

use crate::config::{Config, CrawlTarget};
use crate::crawler::frontier::{LevelQueue, QueueEntry};
use crate::crawler::harvest::harvest_links;
use crate::extract::{ContentExtractor, Extraction};
use crate::loader::{LoaderFactory, PageLoader};
use crate::output::{log_metrics, DocumentStore, MarkdownRenderer, SkipLog};
use crate::state::{CrawlGraph, CrawlMetrics, VisitedRegistry};
use crate::url::{classify, output_filename, LinkFilter};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use url::Url;

/// Handles shared by every product crawler of a run
#[derive(Clone)]
pub struct CrawlContext {
    pub registry: Arc<VisitedRegistry>,
    pub graph: Arc<CrawlGraph>,
    pub filter: Arc<LinkFilter>,
    pub store: Arc<dyn DocumentStore>,
    pub skip_log: Arc<SkipLog>,
    pub extractor: ContentExtractor,
    pub renderer: MarkdownRenderer,
}

impl CrawlContext {
    /// Fresh registry and graph, filter and extractor built from `config`
    pub fn from_config(config: &Config, store: Arc<dyn DocumentStore>) -> Self {
        Self {
            registry: Arc::new(VisitedRegistry::new()),
            graph: Arc::new(CrawlGraph::new()),
            filter: Arc::new(LinkFilter::from_config(config)),
            store,
            skip_log: Arc::new(SkipLog::new(config.output.skipped_404_path())),
            extractor: ContentExtractor::from_config(&config.crawler),
            renderer: MarkdownRenderer::today(),
        }
    }
}

/// Per-product crawl limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrawlLimits {
    /// Deepest level processed; links found there are not enqueued
    pub max_depth: u32,
    /// Saved pages after which the crawl stops
    pub max_pages: u64,
}

/// Crawls one product breadth-first
pub struct ProductCrawler {
    target: CrawlTarget,
    folder: PathBuf,
    limits: CrawlLimits,
    ctx: CrawlContext,
    queue: LevelQueue,
    metrics: CrawlMetrics,
    saved: u64,
}

impl ProductCrawler {
    /// Creates a crawler
    ///
    /// # Arguments
    ///
    /// * `target` - Product name and seed URLs
    /// * `folder` - Folder the product's Markdown files are written to
    /// * `limits` - Depth and page caps
    /// * `ctx` - Registry, graph and collaborators shared with other products
    pub fn new(target: CrawlTarget, folder: PathBuf, limits: CrawlLimits, ctx: CrawlContext) -> Self {
        Self {
            target,
            folder,
            limits,
            ctx,
            queue: LevelQueue::new(),
            metrics: CrawlMetrics::default(),
            saved: 0,
        }
    }

    /// Runs the crawl to completion
    ///
    /// The page loader is closed on every exit path after it was created.
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlMetrics)` - The crawl ran; `metrics.outcome()` says why it stopped
    /// * `Err(CrawlError)` - The page loader could not be created
    pub async fn run(mut self, loaders: &dyn LoaderFactory) -> crate::Result<CrawlMetrics> {
        let product = self.target.product.clone();
        info!(
            product = %product,
            seeds = self.target.seed_urls.len(),
            "Starting product crawl"
        );

        let mut page = match loaders.create().await {
            Ok(page) => page,
            Err(e) => {
                error!(product = %product, "Could not create page loader: {}", e);
                log_metrics(&product, &self.metrics);
                return Err(e.into());
            }
        };

        self.crawl(page.as_mut()).await;

        if let Err(e) = page.close().await {
            warn!(product = %product, "Failed to close page loader: {}", e);
        }

        info!(
            product = %product,
            outcome = self.metrics.outcome().label(),
            "Product crawl finished: {}",
            self.metrics.outcome()
        );
        log_metrics(&product, &self.metrics);

        Ok(self.metrics)
    }

    async fn crawl(&mut self, page: &mut dyn PageLoader) {
        self.seed();

        for depth in 0..=self.limits.max_depth {
            let level = self.queue.take_level(depth);
            if level.is_empty() {
                info!(product = %self.target.product, depth, "No URLs left to crawl");
                return;
            }

            self.metrics.max_depth_reached = depth;
            if depth == self.limits.max_depth {
                self.metrics.reached_max_depth = true;
            }

            let total = level.len();
            info!(product = %self.target.product, depth, pages = total, "Crawling level");

            for (index, entry) in level.into_iter().enumerate() {
                if self.saved >= self.limits.max_pages {
                    info!(
                        product = %self.target.product,
                        max_pages = self.limits.max_pages,
                        "Reached page limit"
                    );
                    self.metrics.reached_max_pages = true;
                    return;
                }

                debug!(
                    product = %self.target.product,
                    depth,
                    url = %entry.url,
                    "Processing {}/{}",
                    index + 1,
                    total
                );
                self.process(page, depth, entry).await;
            }
        }
    }

    /// Claims and queues the seeds at depth 0, bypassing the link filter
    fn seed(&mut self) {
        let product = self.target.product.clone();
        let seeds = self.target.seed_urls.clone();

        for url in seeds {
            if !self
                .ctx
                .registry
                .try_claim(&url, &product, &url, &output_filename(&url))
            {
                match self.ctx.registry.get(&url) {
                    Some(record) if record.product == product => {
                        debug!(product = %product, url = %url, "Duplicate seed ignored");
                        continue;
                    }
                    Some(record) => warn!(
                        product = %product,
                        url = %url,
                        owner = %record.product,
                        "Seed already claimed by another product, crawling it anyway"
                    ),
                    None => {}
                }
            }
            self.queue.push(0, QueueEntry::seed(&url));
        }
    }

    /// Loads, extracts, saves and harvests one page; every failure is counted
    async fn process(&mut self, page: &mut dyn PageLoader, depth: u32, entry: QueueEntry) {
        let product = self.target.product.clone();
        let url = entry.url;

        if let Err(e) = page.load(&url).await {
            warn!(product = %product, url = %url, "Failed to load page: {}", e);
            self.metrics.links_skipped_error += 1;
            return;
        }

        let kind = classify(&url);
        let content = match self.ctx.extractor.extract(kind, page, &url).await {
            Extraction::Content(content) => content,
            Extraction::NotFound => {
                warn!(product = %product, url = %url, "Skipping 404 page");
                if let Err(e) = self.ctx.skip_log.record(&url).await {
                    error!(
                        "Failed to append to {}: {}",
                        self.ctx.skip_log.path().display(),
                        e
                    );
                }
                self.metrics.links_skipped_error += 1;
                return;
            }
            Extraction::Failed(reason) => {
                warn!(product = %product, url = %url, kind = %kind, "Extraction failed: {}", reason);
                self.metrics.links_skipped_error += 1;
                return;
            }
        };

        let markdown = match self
            .ctx
            .renderer
            .render(&content, &product, depth, &entry.source_url)
        {
            Ok(markdown) => markdown,
            Err(e) => {
                error!(product = %product, url = %url, "Failed to render Markdown: {}", e);
                self.metrics.links_skipped_error += 1;
                return;
            }
        };

        let filename = output_filename(&url);
        match self.ctx.store.save(&self.folder, &filename, &markdown).await {
            Ok(path) => debug!(product = %product, path = %path.display(), "Saved document"),
            Err(e) => {
                error!(product = %product, url = %url, "Failed to save {}: {}", filename, e);
                self.metrics.links_skipped_error += 1;
                return;
            }
        }

        self.saved += 1;
        self.metrics.links_processed += 1;

        let hrefs: Vec<String> = match Url::parse(&url) {
            Ok(base) => harvest_links(&content.html, &base)
                .into_iter()
                .map(|link| link.href)
                .collect(),
            Err(e) => {
                warn!(product = %product, url = %url, "Cannot resolve links: {}", e);
                Vec::new()
            }
        };

        self.metrics.links_found += hrefs.len() as u64;
        self.ctx.graph.record_page(&url, &hrefs);

        for href in hrefs {
            self.consider_link(depth, &url, href);
        }
    }

    /// Filters and claims one harvested link, queueing it for the next level
    /// unless `depth` is the deepest allowed
    fn consider_link(&mut self, depth: u32, page_url: &str, href: String) {
        let product = self.target.product.as_str();

        if !self.ctx.filter.is_eligible(product, &href) {
            self.metrics.links_skipped_filter += 1;
            return;
        }

        if !self
            .ctx
            .registry
            .try_claim(&href, product, page_url, &output_filename(&href))
        {
            self.note_duplicate(&href);
            return;
        }

        // links found on the deepest level are claimed but never crawled
        if depth < self.limits.max_depth {
            self.queue.push(
                depth + 1,
                QueueEntry {
                    url: href,
                    source_url: page_url.to_string(),
                },
            );
        }
    }

    fn note_duplicate(&mut self, href: &str) {
        self.metrics.links_skipped_duplicate += 1;

        if let Some(record) = self.ctx.registry.get(href) {
            if record.product != self.target.product {
                self.metrics.links_claimed_by_other_product += 1;
                debug!(
                    product = %self.target.product,
                    owner = %record.product,
                    url = %href,
                    "Link already claimed by another product"
                );
            }
        }
    }
}
