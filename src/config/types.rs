use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Prefixes appended to every product so Trailhead learning content is admitted
pub const DEFAULT_UNIVERSAL_PREFIXES: &[&str] = &["/content/learn/", "/en/content/learn/"];

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub output: OutputConfig,
    pub filter: FilterConfig,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default, rename = "product")]
    pub products: Vec<ProductEntry>,

    /// Records read from `input.start-links`, filled in by `load_config`
    #[serde(skip)]
    pub start_links: Vec<StartLinks>,
}

impl Config {
    /// Allow-list for a product: its own prefixes followed by the universal ones
    pub fn prefixes_for(&self, product: &str) -> Vec<String> {
        let mut prefixes: Vec<String> = Vec::new();
        let own = self
            .products
            .iter()
            .find(|p| p.name == product)
            .map(|p| p.prefixes.as_slice())
            .unwrap_or_default();

        for prefix in own.iter().chain(self.filter.universal_prefixes.iter()) {
            if !prefixes.contains(prefix) {
                prefixes.push(prefix.clone());
            }
        }
        prefixes
    }

    /// One crawl target per configured product, in configuration order
    pub fn targets(&self) -> Vec<CrawlTarget> {
        self.products
            .iter()
            .map(|entry| {
                let mut seed_urls = entry.seeds.clone();
                for record in self.start_links.iter().filter(|r| r.product == entry.name) {
                    seed_urls.extend(record.urls.iter().cloned());
                }
                CrawlTarget {
                    product: entry.name.clone(),
                    seed_urls,
                }
            })
            .collect()
    }
}

/// Which page loader renders pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoaderKind {
    /// Headless Chromium, executes JavaScript
    Browser,
    /// Plain HTTP GET, no JavaScript
    Http,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Deepest BFS level that is still processed
    #[serde(rename = "max-depth")]
    pub max_depth: u32,

    /// Saved pages after which a product stops crawling
    #[serde(rename = "max-pages-per-product")]
    pub max_pages_per_product: u64,

    #[serde(default = "default_loader")]
    pub loader: LoaderKind,

    #[serde(default = "default_headless")]
    pub headless: bool,

    /// Chrome/Chromium executable; chromiumoxide searches the usual locations when unset
    #[serde(default, rename = "chrome-path")]
    pub chrome_path: Option<PathBuf>,

    #[serde(default = "default_page_load_timeout", rename = "page-load-timeout-ms")]
    pub page_load_timeout_ms: u64,

    /// Settle time after navigation so client-side rendering can finish
    #[serde(default = "default_render_wait", rename = "render-wait-ms")]
    pub render_wait_ms: u64,

    /// How long to wait for an article content container to appear
    #[serde(default = "default_element_timeout", rename = "element-timeout-ms")]
    pub element_timeout_ms: u64,

    /// Extra settle time before reading legacy article views and Apex help pages
    #[serde(default = "default_legacy_settle", rename = "legacy-settle-ms")]
    pub legacy_settle_ms: u64,

    /// Extra settle time before reading Trailhead pages
    #[serde(default = "default_trailhead_settle", rename = "trailhead-settle-ms")]
    pub trailhead_settle_ms: u64,

    /// Minimum inner HTML length for a selector match to count as the main content
    #[serde(default = "default_min_content_length", rename = "min-content-length")]
    pub min_content_length: usize,

    #[serde(default = "default_user_agent", rename = "user-agent")]
    pub user_agent: String,
}

/// Output locations, all relative to `base-folder` except the folder itself
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    #[serde(rename = "base-folder")]
    pub base_folder: PathBuf,

    #[serde(default = "default_skipped_404_file", rename = "skipped-404-file")]
    pub skipped_404_file: String,

    #[serde(default = "default_summary_file", rename = "summary-file")]
    pub summary_file: String,

    #[serde(default = "default_graph_file", rename = "graph-file")]
    pub graph_file: String,

    #[serde(default = "default_log_file", rename = "log-file")]
    pub log_file: String,
}

/// Global link filtering rules
#[derive(Debug, Clone, Deserialize)]
pub struct FilterConfig {
    /// Origins a link must start with to be followed
    #[serde(rename = "allowed-domains")]
    pub allowed_domains: Vec<String>,

    /// Prefixes added to every product's allow-list
    #[serde(default = "default_universal_prefixes", rename = "universal-prefixes")]
    pub universal_prefixes: Vec<String>,
}

/// Optional external seed list
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InputConfig {
    /// JSON file of `{"product": .., "urls": [..]}` records
    #[serde(default, rename = "start-links")]
    pub start_links: Option<PathBuf>,
}

/// One crawled product
#[derive(Debug, Clone, Deserialize)]
pub struct ProductEntry {
    pub name: String,

    /// Substrings a link must contain to belong to this product
    pub prefixes: Vec<String>,

    #[serde(default)]
    pub seeds: Vec<String>,
}

/// A start-links record as written by the seed exporter
#[derive(Debug, Clone, Deserialize)]
pub struct StartLinks {
    pub product: String,
    #[serde(default)]
    pub urls: Vec<String>,
}

/// A product and the URLs its crawl starts from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTarget {
    pub product: String,
    pub seed_urls: Vec<String>,
}

impl CrawlerConfig {
    pub fn page_load_timeout(&self) -> Duration {
        Duration::from_millis(self.page_load_timeout_ms)
    }

    pub fn render_wait(&self) -> Duration {
        Duration::from_millis(self.render_wait_ms)
    }

    pub fn element_timeout(&self) -> Duration {
        Duration::from_millis(self.element_timeout_ms)
    }

    pub fn legacy_settle(&self) -> Duration {
        Duration::from_millis(self.legacy_settle_ms)
    }

    pub fn trailhead_settle(&self) -> Duration {
        Duration::from_millis(self.trailhead_settle_ms)
    }
}

impl OutputConfig {
    /// Folder holding one product's Markdown files (spaces become underscores)
    pub fn product_folder(&self, product: &str) -> PathBuf {
        self.base_folder.join(product.replace(' ', "_"))
    }

    pub fn skipped_404_path(&self) -> PathBuf {
        self.base_folder.join(&self.skipped_404_file)
    }

    pub fn summary_path(&self) -> PathBuf {
        self.base_folder.join(&self.summary_file)
    }

    pub fn graph_path(&self) -> PathBuf {
        self.base_folder.join(&self.graph_file)
    }

    pub fn base_folder(&self) -> &Path {
        &self.base_folder
    }
}

fn default_loader() -> LoaderKind {
    LoaderKind::Browser
}

fn default_headless() -> bool {
    true
}

fn default_page_load_timeout() -> u64 {
    30_000
}

fn default_render_wait() -> u64 {
    2_000
}

fn default_element_timeout() -> u64 {
    10_000
}

fn default_legacy_settle() -> u64 {
    3_000
}

fn default_trailhead_settle() -> u64 {
    5_000
}

fn default_min_content_length() -> usize {
    500
}

fn default_user_agent() -> String {
    format!("docs-harvest/{}", env!("CARGO_PKG_VERSION"))
}

fn default_skipped_404_file() -> String {
    "skipped_404.log".to_string()
}

fn default_summary_file() -> String {
    "summary.log".to_string()
}

fn default_graph_file() -> String {
    "link_graph.json".to_string()
}

fn default_log_file() -> String {
    "scraper.log".to_string()
}

fn default_universal_prefixes() -> Vec<String> {
    DEFAULT_UNIVERSAL_PREFIXES
        .iter()
        .map(|p| p.to_string())
        .collect()
}
