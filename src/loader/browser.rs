//! Headless Chromium page loader
//!
//! Drives a dedicated browser process over the DevTools protocol. The CDP
//! handler runs on its own task until the browser is closed.

use crate::loader::{LoaderFactory, LoaderSettings, PageLoader};
use crate::{LoadError, LoadResult};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig, HeadlessMode};
use chromiumoxide::Page;
use futures::StreamExt;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, trace, warn};

/// Delay between element lookups while waiting for a selector
const ELEMENT_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Clicks the help portal's "Do Not Accept" cookie button when present
const DISMISS_COOKIE_BANNER_JS: &str = r#"
(() => {
    const button = Array.from(document.querySelectorAll('button'))
        .find(b => b.textContent.trim() === 'Do Not Accept');
    if (button) {
        button.click();
        return true;
    }
    return false;
})()
"#;

/// Page loader backed by one Chromium process with a single tab
pub struct BrowserLoader {
    browser: Browser,
    handler: JoinHandle<()>,
    page: Option<Page>,
    settings: LoaderSettings,
}

impl BrowserLoader {
    /// Launches Chromium and opens a blank tab
    pub async fn launch(settings: LoaderSettings) -> LoadResult<Self> {
        let mut builder = BrowserConfig::builder()
            .request_timeout(settings.page_load_timeout)
            .window_size(1920, 1080)
            .no_sandbox()
            .arg("--disable-dev-shm-usage")
            .arg("--disable-notifications")
            .arg("--no-first-run")
            .arg("--no-default-browser-check")
            .arg(format!("--user-agent={}", settings.user_agent));

        builder = if settings.headless {
            builder.headless_mode(HeadlessMode::default())
        } else {
            builder.with_head()
        };

        if let Some(path) = &settings.chrome_path {
            builder = builder.chrome_executable(path);
        }

        let config = builder.build().map_err(LoadError::Launch)?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| LoadError::Launch(e.to_string()))?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    let message = e.to_string();
                    // chromiumoxide cannot decode every CDP event Chrome emits
                    if message.contains("data did not match any variant")
                        || message.contains("Failed to deserialize WS response")
                    {
                        trace!("Ignoring CDP decode error: {}", message);
                    } else {
                        error!("Browser handler error: {}", message);
                    }
                }
            }
            debug!("Browser handler task completed");
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| LoadError::Launch(e.to_string()))?;

        info!("Launched browser (headless: {})", settings.headless);

        Ok(Self {
            browser,
            handler,
            page: Some(page),
            settings,
        })
    }

    fn page(&self) -> LoadResult<&Page> {
        self.page.as_ref().ok_or(LoadError::NoPage)
    }

    async fn dismiss_cookie_banner(&self, url: &str) {
        let Ok(page) = self.page() else {
            return;
        };
        match page.evaluate(DISMISS_COOKIE_BANNER_JS).await {
            Ok(result) => {
                if result.into_value::<bool>().unwrap_or(false) {
                    debug!("Dismissed cookie banner on {}", url);
                }
            }
            Err(e) => trace!("Cookie banner check failed on {}: {}", url, e),
        }
    }
}

#[async_trait]
impl PageLoader for BrowserLoader {
    async fn load(&mut self, url: &str) -> LoadResult<()> {
        let page = self.page()?;

        match tokio::time::timeout(self.settings.page_load_timeout, page.goto(url)).await {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => {
                return Err(LoadError::Navigation {
                    url: url.to_string(),
                    message: e.to_string(),
                })
            }
            Err(_) => {
                return Err(LoadError::Timeout {
                    url: url.to_string(),
                })
            }
        }

        self.dismiss_cookie_banner(url).await;

        // Client-side rendering keeps going after the load event
        tokio::time::sleep(self.settings.render_wait).await;
        Ok(())
    }

    async fn settle(&mut self, delay: Duration) -> LoadResult<()> {
        self.page()?;
        tokio::time::sleep(delay).await;
        Ok(())
    }

    async fn content(&mut self) -> LoadResult<String> {
        self.page()?
            .content()
            .await
            .map_err(|e| LoadError::Browser(e.to_string()))
    }

    async fn wait_for_element(
        &mut self,
        selector: &str,
        timeout: Duration,
    ) -> LoadResult<Option<String>> {
        let page = self.page()?;
        let started = Instant::now();

        loop {
            if let Ok(element) = page.find_element(selector).await {
                let inner = element
                    .inner_html()
                    .await
                    .map_err(|e| LoadError::Browser(e.to_string()))?;
                return Ok(Some(inner.unwrap_or_default()));
            }

            if started.elapsed() >= timeout {
                warn!("Timeout waiting for element: {}", selector);
                return Ok(None);
            }

            tokio::time::sleep(ELEMENT_POLL_INTERVAL).await;
        }
    }

    async fn close(&mut self) -> LoadResult<()> {
        if let Some(page) = self.page.take() {
            if let Err(e) = page.close().await {
                debug!("Failed to close tab: {}", e);
            }
        }

        let closed = self
            .browser
            .close()
            .await
            .map_err(|e| LoadError::Browser(e.to_string()));

        if let Err(e) = self.browser.wait().await {
            warn!("Browser process did not exit cleanly: {}", e);
        }
        self.handler.abort();

        closed.map(|_| ())
    }
}

/// Launches one browser per product crawler
pub struct BrowserLoaderFactory {
    settings: LoaderSettings,
}

impl BrowserLoaderFactory {
    pub fn new(settings: LoaderSettings) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl LoaderFactory for BrowserLoaderFactory {
    async fn create(&self) -> LoadResult<Box<dyn PageLoader>> {
        let loader = BrowserLoader::launch(self.settings.clone()).await?;
        Ok(Box::new(loader))
    }
}
