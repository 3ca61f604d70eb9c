//! Static HTTP page loader
//!
//! Fetches pages with a plain GET. No JavaScript runs, so client-rendered
//! sites yield their server shell only; element waits resolve immediately
//! against the fetched body.
//!
//! A 4xx response still counts as a loaded page: its body is what a browser
//! would show, and the extractor decides whether it is an error page. Only
//! transport failures and 5xx responses fail the load.

use crate::loader::{select_inner_html, LoaderFactory, LoaderSettings, PageLoader};
use crate::{LoadError, LoadResult};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::debug;

/// Builds an HTTP client with the configured user agent and timeout
///
/// # Arguments
///
/// * `settings` - Loader settings (user agent, page load timeout)
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(settings: &LoaderSettings) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(settings.user_agent.clone())
        .timeout(settings.page_load_timeout)
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Page loader backed by reqwest
pub struct HttpLoader {
    client: Client,
    current: Option<String>,
}

impl HttpLoader {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            current: None,
        }
    }

    fn body(&self) -> LoadResult<&str> {
        self.current.as_deref().ok_or(LoadError::NoPage)
    }
}

#[async_trait]
impl PageLoader for HttpLoader {
    async fn load(&mut self, url: &str) -> LoadResult<()> {
        self.current = None;

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                LoadError::Timeout {
                    url: url.to_string(),
                }
            } else {
                LoadError::Http {
                    url: url.to_string(),
                    source: e,
                }
            }
        })?;

        let status = response.status();
        if status.is_server_error() {
            return Err(LoadError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        if status.is_client_error() {
            debug!("{} answered {}, keeping the error page", url, status);
        }

        let body = response.text().await.map_err(|e| LoadError::Http {
            url: url.to_string(),
            source: e,
        })?;

        self.current = Some(body);
        Ok(())
    }

    async fn content(&mut self) -> LoadResult<String> {
        self.body().map(str::to_string)
    }

    async fn wait_for_element(
        &mut self,
        selector: &str,
        _timeout: Duration,
    ) -> LoadResult<Option<String>> {
        // Static body: it will never change, so there is nothing to wait for
        select_inner_html(self.body()?, selector)
    }

    async fn close(&mut self) -> LoadResult<()> {
        self.current = None;
        Ok(())
    }
}

/// Creates HTTP loaders sharing one connection pool
///
/// The client is built on the first `create` and cloned into every loader
/// after that; reqwest clones share their pool.
pub struct HttpLoaderFactory {
    settings: LoaderSettings,
    client: OnceCell<Client>,
}

impl HttpLoaderFactory {
    pub fn new(settings: LoaderSettings) -> Self {
        Self {
            settings,
            client: OnceCell::new(),
        }
    }
}

#[async_trait]
impl LoaderFactory for HttpLoaderFactory {
    async fn create(&self) -> LoadResult<Box<dyn PageLoader>> {
        let client = self
            .client
            .get_or_try_init(|| async {
                build_http_client(&self.settings).map_err(|e| LoadError::Launch(e.to_string()))
            })
            .await?;
        Ok(Box::new(HttpLoader::new(client.clone())))
    }
}
