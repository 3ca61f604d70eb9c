use serde::Serialize;
use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
struct GraphInner {
    nodes: HashSet<String>,
    edges: HashSet<(String, String)>,
}

/// Append-only link graph shared by every product crawler
#[derive(Debug, Default)]
pub struct CrawlGraph {
    inner: Mutex<GraphInner>,
}

/// Sorted, serializable copy of the graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphSnapshot {
    pub nodes: Vec<String>,
    pub edges: Vec<(String, String)>,
}

impl CrawlGraph {
    pub fn new() -> Self {
        Self::default()
    }

    fn inner(&self) -> MutexGuard<'_, GraphInner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Adds the page, every link on it, and an edge from the page to each link
    pub fn record_page(&self, page_url: &str, links: &[String]) {
        let mut inner = self.inner();
        inner.nodes.insert(page_url.to_string());
        for link in links {
            inner.nodes.insert(link.clone());
            inner.edges.insert((page_url.to_string(), link.clone()));
        }
    }

    pub fn node_count(&self) -> usize {
        self.inner().nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.inner().edges.len()
    }

    /// Copies the graph out under the lock, sorted for stable output
    pub fn snapshot(&self) -> GraphSnapshot {
        let (mut nodes, mut edges) = {
            let inner = self.inner();
            (
                inner.nodes.iter().cloned().collect::<Vec<_>>(),
                inner.edges.iter().cloned().collect::<Vec<_>>(),
            )
        };
        nodes.sort();
        edges.sort();
        GraphSnapshot { nodes, edges }
    }
}
