//! Page loader module for Docs-Harvest
//!
//! A page loader navigates to a URL, renders it, and answers queries about
//! the rendered document. Each product crawler owns exactly one loader for
//! its whole lifetime and must close it on every exit path.
//!
//! # Implementations
//!
//! - `BrowserLoader`: headless Chromium over CDP, executes JavaScript
//! - `HttpLoader`: plain HTTP GET, for static sites and tests
//! - `MemoryLoader`: canned pages keyed by URL, for tests and dry runs

mod browser;
mod http;
mod memory;

pub use browser::{BrowserLoader, BrowserLoaderFactory};
pub use http::{build_http_client, HttpLoader, HttpLoaderFactory};
pub use memory::{MemoryLoader, MemoryLoaderFactory};

use crate::config::{CrawlerConfig, LoaderKind};
use crate::{LoadError, LoadResult};
use async_trait::async_trait;
use scraper::{Html, Selector};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// A live page handle
#[async_trait]
pub trait PageLoader: Send {
    /// Navigates to `url` and waits for it to render
    async fn load(&mut self, url: &str) -> LoadResult<()>;

    /// Full HTML of the currently loaded document
    async fn content(&mut self) -> LoadResult<String>;

    /// Gives slow client-side pages `delay` more time to render before they
    /// are read; static loaders have nothing to wait for
    async fn settle(&mut self, _delay: Duration) -> LoadResult<()> {
        Ok(())
    }

    /// Waits up to `timeout` for `selector` to match, returning the first
    /// match's inner HTML, or `None` if nothing appeared in time
    async fn wait_for_element(
        &mut self,
        selector: &str,
        timeout: Duration,
    ) -> LoadResult<Option<String>>;

    /// Releases the underlying resources; the loader is unusable afterwards
    async fn close(&mut self) -> LoadResult<()>;
}

/// Creates one page loader per product crawler
#[async_trait]
pub trait LoaderFactory: Send + Sync {
    async fn create(&self) -> LoadResult<Box<dyn PageLoader>>;
}

/// Settings shared by all loader implementations
#[derive(Debug, Clone)]
pub struct LoaderSettings {
    pub headless: bool,
    pub chrome_path: Option<PathBuf>,
    pub page_load_timeout: Duration,
    pub render_wait: Duration,
    pub user_agent: String,
}

impl LoaderSettings {
    pub fn from_config(config: &CrawlerConfig) -> Self {
        Self {
            headless: config.headless,
            chrome_path: config.chrome_path.clone(),
            page_load_timeout: config.page_load_timeout(),
            render_wait: config.render_wait(),
            user_agent: config.user_agent.clone(),
        }
    }
}

/// Picks the loader factory named by the configuration
pub fn loader_factory(config: &CrawlerConfig) -> Arc<dyn LoaderFactory> {
    let settings = LoaderSettings::from_config(config);
    match config.loader {
        LoaderKind::Browser => Arc::new(BrowserLoaderFactory::new(settings)),
        LoaderKind::Http => Arc::new(HttpLoaderFactory::new(settings)),
    }
}

/// Inner HTML of the first element in `html` matching `selector`
pub(crate) fn select_inner_html(html: &str, selector: &str) -> LoadResult<Option<String>> {
    let parsed = Selector::parse(selector).map_err(|_| LoadError::Selector(selector.to_string()))?;
    let document = Html::parse_document(html);
    let inner = document.select(&parsed).next().map(|el| el.inner_html());
    Ok(inner)
}
