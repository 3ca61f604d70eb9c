//! Output module for the Markdown corpus and run reports
//!
//! This module handles:
//! - Rendering extracted HTML as Markdown with frontmatter
//! - Persisting documents, the 404 skip log and the link graph
//! - Summarizing the corpus once the run is over

mod markdown;
mod store;
mod summary;

pub use markdown::{build_toc, slugify, strip_cookie_elements, MarkdownRenderer};
pub use store::{export_graph, DocumentStore, FsDocumentStore, SkipLog};
pub use summary::{format_summary, log_metrics, log_summary, summarize_output, write_summary};
