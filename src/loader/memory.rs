//! In-memory page loader
//!
//! Serves canned HTML keyed by exact URL and records every navigation, so
//! crawl behavior can be checked without a network or a browser.

use crate::loader::{select_inner_html, LoaderFactory, PageLoader};
use crate::{LoadError, LoadResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Default)]
struct Shared {
    loads: Mutex<Vec<String>>,
    settles: Mutex<Vec<Duration>>,
    closed: AtomicUsize,
}

/// Page loader serving pages from a map
pub struct MemoryLoader {
    pages: Arc<HashMap<String, String>>,
    shared: Arc<Shared>,
    current: Option<String>,
}

#[async_trait]
impl PageLoader for MemoryLoader {
    async fn load(&mut self, url: &str) -> LoadResult<()> {
        if let Ok(mut loads) = self.shared.loads.lock() {
            loads.push(url.to_string());
        }

        match self.pages.get(url) {
            Some(html) => {
                self.current = Some(html.clone());
                Ok(())
            }
            None => {
                self.current = None;
                Err(LoadError::Navigation {
                    url: url.to_string(),
                    message: "no such page".to_string(),
                })
            }
        }
    }

    async fn content(&mut self) -> LoadResult<String> {
        self.current.clone().ok_or(LoadError::NoPage)
    }

    /// Records the delay without sleeping
    async fn settle(&mut self, delay: Duration) -> LoadResult<()> {
        if let Ok(mut settles) = self.shared.settles.lock() {
            settles.push(delay);
        }
        Ok(())
    }

    async fn wait_for_element(
        &mut self,
        selector: &str,
        _timeout: Duration,
    ) -> LoadResult<Option<String>> {
        let html = self.current.as_deref().ok_or(LoadError::NoPage)?;
        select_inner_html(html, selector)
    }

    async fn close(&mut self) -> LoadResult<()> {
        self.current = None;
        self.shared.closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Hands out `MemoryLoader`s over one page map and keeps their history
#[derive(Debug, Default)]
pub struct MemoryLoaderFactory {
    pages: Arc<HashMap<String, String>>,
    shared: Arc<Shared>,
    fail_create: bool,
}

impl MemoryLoaderFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a page; must be called before the first loader is created
    pub fn with_page(mut self, url: &str, html: &str) -> Self {
        Arc::make_mut(&mut self.pages).insert(url.to_string(), html.to_string());
        self
    }

    /// A factory whose `create` always fails, like a browser that will not start
    pub fn failing() -> Self {
        Self {
            fail_create: true,
            ..Self::default()
        }
    }

    /// Every URL loaded so far, in order, across all loaders
    pub fn loaded_urls(&self) -> Vec<String> {
        self.shared
            .loads
            .lock()
            .map(|loads| loads.clone())
            .unwrap_or_default()
    }

    /// Every settle delay requested so far, in order
    pub fn settle_waits(&self) -> Vec<Duration> {
        self.shared
            .settles
            .lock()
            .map(|settles| settles.clone())
            .unwrap_or_default()
    }

    /// How many loaders have been closed
    pub fn close_count(&self) -> usize {
        self.shared.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LoaderFactory for MemoryLoaderFactory {
    async fn create(&self) -> LoadResult<Box<dyn PageLoader>> {
        if self.fail_create {
            return Err(LoadError::Launch("memory loader configured to fail".to_string()));
        }
        Ok(Box::new(MemoryLoader {
            pages: Arc::clone(&self.pages),
            shared: Arc::clone(&self.shared),
            current: None,
        }))
    }
}
