//! Document persistence
//!
//! This module defines where rendered documents, the 404 skip log and the
//! link graph end up.

use crate::state::CrawlGraph;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

/// Persists rendered documents
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Writes `text` to `folder/filename`, creating folders as needed and
    /// overwriting any previous file
    ///
    /// # Returns
    ///
    /// * `Ok(PathBuf)` - Path of the written file
    /// * `Err(std::io::Error)` - The folder or file could not be written
    async fn save(&self, folder: &Path, filename: &str, text: &str) -> std::io::Result<PathBuf>;
}

/// Stores documents on the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct FsDocumentStore;

#[async_trait]
impl DocumentStore for FsDocumentStore {
    async fn save(&self, folder: &Path, filename: &str, text: &str) -> std::io::Result<PathBuf> {
        fs::create_dir_all(folder).await?;
        let path = folder.join(filename);
        fs::write(&path, text).await?;
        Ok(path)
    }
}

/// Append-only list of URLs that rendered as error pages
///
/// Shared by every product crawler; appends are serialized so lines never
/// interleave.
#[derive(Debug)]
pub struct SkipLog {
    path: PathBuf,
    lock: Mutex<()>,
}

impl SkipLog {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one URL line
    pub async fn record(&self, url: &str) -> std::io::Result<()> {
        let _guard = self.lock.lock().await;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(format!("{}\n", url).as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}

/// Writes the link graph as `{"nodes": [..], "edges": [[from, to], ..]}`
pub async fn export_graph(graph: &CrawlGraph, path: &Path) -> crate::Result<()> {
    let json = serde_json::to_string_pretty(&graph.snapshot())?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }
    fs::write(path, json).await?;
    Ok(())
}
