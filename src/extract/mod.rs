//! Content extraction module for Docs-Harvest
//!
//! Locates the main content of a rendered page. The strategy depends on the
//! page kind; kinds without a reliable container fall through an ordered
//! cascade of heuristics until one produces content.

mod strategies;
mod trailhead;

pub use strategies::{run_cascade, PageSnapshot, Strategy};
pub use trailhead::TrailheadMeta;

use crate::config::CrawlerConfig;
use crate::loader::PageLoader;
use crate::url::PageKind;
use std::time::Duration;
use tracing::{debug, warn};

/// Container holding an article view's body once the help app has rendered
pub const ARTICLE_CONTAINER: &str = "div[class*='content with-toc'] content";

const BASE_CHROME: &[&str] = &[
    "header",
    "footer",
    "nav",
    ".navbar",
    ".navigation",
    ".header",
    ".footer",
    ".sidebar",
];

const TRAILHEAD_CHROME: &[&str] = &[
    "header",
    "footer",
    "nav",
    ".navbar",
    "aside",
    ".sidebar",
    ".navigation",
    ".header",
    ".footer",
    ".trailhead-nav",
    ".sidebar-nav",
];

const LEGACY_STRATEGIES: &[Strategy] = &[
    Strategy::LongestMatch(&[
        "div.article-content",
        "div.content-container",
        "div.contentBody",
        "div.slds-template__container",
        "div#articleContent",
        "div.helpContent",
        "div.slds-col--padded.content",
        "div.slds-col--padded.contentRegion",
        "article.content",
        "main",
    ]),
    Strategy::MarkerAncestor {
        markers: "h1",
        class_needles: &["content", "article"],
    },
    Strategy::StrippedBody(BASE_CHROME),
];

const APEX_STRATEGIES: &[Strategy] = &[
    Strategy::LongestMatch(&[
        "div.content",
        "div.helpContent",
        "div.apexHelpPanel",
        "div.apexHelpText",
        "div#contentArea",
        "div.documentMainContent",
        "div.bodyContent",
        "div.slds-col--padded.contentRegion",
        "article.content",
    ]),
    Strategy::MarkerAncestor {
        markers: "h1.helpTitle, h2.helpSectionTitle, div.helpText",
        class_needles: &["help", "content"],
    },
    Strategy::StrippedBody(BASE_CHROME),
];

const TRAILHEAD_STRATEGIES: &[Strategy] = &[
    Strategy::LongestMatch(&[
        "div.content-container",
        "div.main-content",
        "div.slds-container--medium",
        "div.module-container",
        "div.unit-container",
        "div.tds-content-container",
        "main.slds-col",
    ]),
    Strategy::CombinedSections(".unit-content section, .tds-unit-content, .challenge-content"),
    Strategy::StrippedBody(TRAILHEAD_CHROME),
];

/// Error-page check on a full rendered document
pub fn is_not_found(html: &str) -> bool {
    PageSnapshot::parse(html).is_not_found()
}

/// Main content of a page plus what the renderer needs besides the HTML
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedContent {
    pub html: String,
    /// Title to use instead of one found in `html`
    pub title: Option<String>,
    /// Extra frontmatter fields, in output order
    pub extra_metadata: Vec<(String, String)>,
}

impl ExtractedContent {
    pub fn from_html(html: String) -> Self {
        Self {
            html,
            ..Default::default()
        }
    }
}

/// Result of extracting one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    Content(ExtractedContent),
    /// The page rendered but is an error page
    NotFound,
    /// No strategy located any content
    Failed(String),
}

/// Extracts main content according to page kind
#[derive(Debug, Clone)]
pub struct ContentExtractor {
    element_timeout: Duration,
    min_content_length: usize,
    legacy_settle: Duration,
    trailhead_settle: Duration,
}

impl ContentExtractor {
    /// An extractor that reads every page as soon as it is loaded
    pub fn new(element_timeout: Duration, min_content_length: usize) -> Self {
        Self {
            element_timeout,
            min_content_length,
            legacy_settle: Duration::ZERO,
            trailhead_settle: Duration::ZERO,
        }
    }

    /// Extra render time for legacy help pages and for Trailhead pages
    pub fn with_settle(mut self, legacy: Duration, trailhead: Duration) -> Self {
        self.legacy_settle = legacy;
        self.trailhead_settle = trailhead;
        self
    }

    pub fn from_config(config: &CrawlerConfig) -> Self {
        Self::new(config.element_timeout(), config.min_content_length)
            .with_settle(config.legacy_settle(), config.trailhead_settle())
    }

    fn settle_for(&self, kind: PageKind) -> Duration {
        match kind {
            PageKind::LegacyArticleView | PageKind::ApexHelp => self.legacy_settle,
            PageKind::TrailheadContent => self.trailhead_settle,
            _ => Duration::ZERO,
        }
    }

    /// Extracts the main content of the page currently loaded in `page`
    ///
    /// Slow kinds get their settle time first. Checks for an error page
    /// before anything else, whatever the kind. Loader errors while reading
    /// the page surface as `Failed`.
    pub async fn extract(&self, kind: PageKind, page: &mut dyn PageLoader, url: &str) -> Extraction {
        let settle = self.settle_for(kind);
        if !settle.is_zero() {
            debug!("Settling {:?} before reading {}", settle, url);
            if let Err(e) = page.settle(settle).await {
                return Extraction::Failed(e.to_string());
            }
        }

        let html = match page.content().await {
            Ok(html) => html,
            Err(e) => return Extraction::Failed(e.to_string()),
        };

        if kind != PageKind::ArticleView {
            return self.extract_rendered(kind, &html, url);
        }

        if is_not_found(&html) {
            return Extraction::NotFound;
        }

        match page
            .wait_for_element(ARTICLE_CONTAINER, self.element_timeout)
            .await
        {
            Ok(Some(inner)) => Extraction::Content(ExtractedContent::from_html(inner)),
            Ok(None) => {
                warn!("Content element not found on page: {}", url);
                Extraction::Failed("article container did not appear".to_string())
            }
            Err(e) => Extraction::Failed(e.to_string()),
        }
    }

    /// Extraction for every kind except article views, which need a live page
    pub fn extract_rendered(&self, kind: PageKind, html: &str, url: &str) -> Extraction {
        let snapshot = PageSnapshot::parse(html);

        if snapshot.is_not_found() {
            return Extraction::NotFound;
        }

        match kind {
            PageKind::DeveloperDoc | PageKind::ProductPage => {
                Extraction::Content(ExtractedContent::from_html(html.to_string()))
            }
            PageKind::PlatformPage => {
                let content = snapshot
                    .select_first("main")
                    .or_else(|| snapshot.select_first("body"))
                    .map(|el| el.html())
                    .unwrap_or_else(|| html.to_string());
                Extraction::Content(ExtractedContent::from_html(content))
            }
            PageKind::LegacyArticleView => self.cascade(LEGACY_STRATEGIES, &snapshot, snapshot.title(), Vec::new()),
            PageKind::ApexHelp => self.cascade(APEX_STRATEGIES, &snapshot, snapshot.title(), Vec::new()),
            PageKind::TrailheadContent => {
                let meta = TrailheadMeta::from_snapshot(&snapshot, url);
                let title = meta.title().or_else(|| snapshot.title());
                self.cascade(TRAILHEAD_STRATEGIES, &snapshot, title, meta.into_fields())
            }
            PageKind::ArticleView => Extraction::Failed(
                "article views need a live page to wait on".to_string(),
            ),
            PageKind::Unknown => Extraction::Failed(format!("unknown page kind: {}", url)),
        }
    }

    fn cascade(
        &self,
        strategies: &[Strategy],
        snapshot: &PageSnapshot,
        title: Option<String>,
        extra_metadata: Vec<(String, String)>,
    ) -> Extraction {
        match run_cascade(strategies, snapshot, self.min_content_length) {
            Some(html) => Extraction::Content(ExtractedContent {
                html,
                title,
                extra_metadata,
            }),
            None => {
                debug!("Every extraction strategy came up empty");
                Extraction::Failed("no content found".to_string())
            }
        }
    }
}
