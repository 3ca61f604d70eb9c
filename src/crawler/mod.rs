//! Crawler module - breadth-first product crawls
//!
//! This module contains the crawl logic, including:
//! - Link harvesting from extracted page content
//! - The per-level frontier queue
//! - The per-product BFS state machine
//! - Coordination of concurrent product crawls

mod coordinator;
mod frontier;
mod harvest;
mod product;

pub use coordinator::CrawlCoordinator;
pub use frontier::{LevelQueue, QueueEntry};
pub use harvest::{harvest_links, HarvestedLink};
pub use product::{CrawlContext, CrawlLimits, ProductCrawler};
