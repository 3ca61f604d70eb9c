//! Docs-Harvest: a breadth-first product documentation crawler
//!
//! This crate crawls a fixed set of product documentation sites, extracts the
//! main content of each page with a per-page-kind cascade of heuristics, and
//! writes a deduplicated corpus of Markdown documents with YAML frontmatter.

pub mod config;
pub mod crawler;
pub mod extract;
pub mod loader;
pub mod output;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for crawl operations
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Page loader error: {0}")]
    Load(#[from] LoadError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Crawler task for {product} did not finish: {message}")]
    Join { product: String, message: String },
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to parse start links: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Errors raised by a page loader while navigating or querying a page
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to launch page loader: {0}")]
    Launch(String),

    #[error("Navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    #[error("Timed out loading {url}")]
    Timeout { url: String },

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("HTTP status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("No page has been loaded")]
    NoPage,

    #[error("Invalid CSS selector: {0}")]
    Selector(String),

    #[error("Browser error: {0}")]
    Browser(String),
}

/// Result type alias for crawl operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for page loader operations
pub type LoadResult<T> = std::result::Result<T, LoadError>;

// Re-export commonly used types
pub use config::{Config, CrawlTarget};
pub use crawler::{CrawlCoordinator, ProductCrawler};
pub use extract::{ContentExtractor, ExtractedContent, Extraction};
pub use state::{CrawlGraph, CrawlMetrics, CrawlOutcome, VisitRecord, VisitedRegistry};
pub use url::{classify, LinkFilter, PageKind};
