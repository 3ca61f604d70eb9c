//! Configuration module for Docs-Harvest
//!
//! Loads, parses, and validates the TOML configuration and the optional
//! start-links JSON seed file.
//!
//! # Example
//!
//! ```no_run
//! use docs_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("docs-harvest.toml")).unwrap();
//! for target in config.targets() {
//!     println!("{}: {} seeds", target.product, target.seed_urls.len());
//! }
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlTarget, CrawlerConfig, FilterConfig, InputConfig, LoaderKind, OutputConfig,
    ProductEntry, StartLinks, DEFAULT_UNIVERSAL_PREFIXES,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, load_start_links};
