//! State module for tracking crawl progress
//!
//! This module provides the state shared between product crawlers and the
//! per-product bookkeeping each crawler reports at the end.
//!
//! # Components
//!
//! - `VisitedRegistry`: run-wide URL claims, first writer wins
//! - `CrawlGraph`: run-wide set of pages and links observed
//! - `CrawlMetrics`: per-product counters and termination flags
//! - `CrawlOutcome`: why a product crawl stopped

mod graph;
mod metrics;
mod outcome;
mod visited;

// Re-export main types
pub use graph::{CrawlGraph, GraphSnapshot};
pub use metrics::CrawlMetrics;
pub use outcome::CrawlOutcome;
pub use visited::{VisitRecord, VisitedRegistry};
