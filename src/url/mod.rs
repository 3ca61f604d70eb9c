//! URL handling module for Docs-Harvest
//!
//! This module classifies pages by URL shape, decides which discovered links
//! a product may follow, and derives output filenames from URLs.

mod filter;
mod sanitize;

// Re-export main types and functions
pub use filter::LinkFilter;
pub use sanitize::{output_filename, sanitize_filename, MAX_SANITIZED_LEN};

use std::fmt;

/// Page kinds, each with its own content extraction strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageKind {
    /// Help/knowledge article rendered by the `/s/articleView` or `/s/article` apps
    ArticleView,
    /// Developer documentation
    DeveloperDoc,
    /// Help portal product landing page
    ProductPage,
    /// MuleSoft platform marketing page
    PlatformPage,
    /// Pre-Lightning `articleView` page
    LegacyArticleView,
    /// Visualforce help document
    ApexHelp,
    /// Trailhead module, unit or trail
    TrailheadContent,
    /// Nothing matched; extraction fails
    Unknown,
}

impl PageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ArticleView => "article-view",
            Self::DeveloperDoc => "developer-doc",
            Self::ProductPage => "product-page",
            Self::PlatformPage => "platform-page",
            Self::LegacyArticleView => "legacy-article-view",
            Self::ApexHelp => "apex-help",
            Self::TrailheadContent => "trailhead",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for PageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered classification rules; the first rule whose every needle occurs in
/// the URL wins. `/s/articleView` must stay ahead of the bare `articleView`.
const RULES: &[(&[&str], PageKind)] = &[
    (&["help.salesforce.com/s/articleView"], PageKind::ArticleView),
    (&["help.mulesoft.com/s/article"], PageKind::ArticleView),
    (&["developer.salesforce.com/docs"], PageKind::DeveloperDoc),
    (&["docs.mulesoft.com"], PageKind::DeveloperDoc),
    (&["help.salesforce.com/s/products"], PageKind::ProductPage),
    (&["www.mulesoft.com/platform"], PageKind::PlatformPage),
    (&["help.salesforce.com/articleView"], PageKind::LegacyArticleView),
    (&["help.salesforce.com/apex/HTViewHelpDoc"], PageKind::ApexHelp),
    (&["trailhead.salesforce.com", "/content/learn/"], PageKind::TrailheadContent),
];

/// Classifies a URL by its shape
///
/// Pure and total: every URL maps to exactly one kind, `Unknown` when no
/// rule matches. No network access.
///
/// # Examples
///
/// ```
/// use docs_harvest::url::{classify, PageKind};
///
/// assert_eq!(
///     classify("https://help.salesforce.com/s/articleView?id=sales.leads.htm"),
///     PageKind::ArticleView
/// );
/// assert_eq!(
///     classify("https://help.salesforce.com/articleView?id=sales.leads.htm"),
///     PageKind::LegacyArticleView
/// );
/// ```
pub fn classify(url: &str) -> PageKind {
    RULES
        .iter()
        .find(|(needles, _)| needles.iter().all(|needle| url.contains(needle)))
        .map(|(_, kind)| *kind)
        .unwrap_or(PageKind::Unknown)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_article_view() {
        assert_eq!(
            classify("https://help.salesforce.com/s/articleView?id=sales.forecasts3.htm&type=5"),
            PageKind::ArticleView
        );
        assert_eq!(
            classify("https://help.mulesoft.com/s/article/How-to-configure"),
            PageKind::ArticleView
        );
    }

    #[test]
    fn test_article_view_wins_over_legacy() {
        // Contains both "/s/articleView" and "articleView"
        let url = "https://help.salesforce.com/s/articleView?id=legacy.articleView.htm";
        assert_eq!(classify(url), PageKind::ArticleView);
    }

    #[test]
    fn test_classify_developer_docs() {
        assert_eq!(
            classify("https://developer.salesforce.com/docs/atlas.en-us.apexcode.meta/apexcode/"),
            PageKind::DeveloperDoc
        );
        assert_eq!(
            classify("https://docs.mulesoft.com/general/"),
            PageKind::DeveloperDoc
        );
    }

    #[test]
    fn test_classify_remaining_kinds() {
        assert_eq!(
            classify("https://help.salesforce.com/s/products/sales"),
            PageKind::ProductPage
        );
        assert_eq!(
            classify("https://www.mulesoft.com/platform/api/manager"),
            PageKind::PlatformPage
        );
        assert_eq!(
            classify("https://help.salesforce.com/articleView?id=sales.leads.htm"),
            PageKind::LegacyArticleView
        );
        assert_eq!(
            classify("https://help.salesforce.com/apex/HTViewHelpDoc?id=sales.htm"),
            PageKind::ApexHelp
        );
        assert_eq!(
            classify("https://trailhead.salesforce.com/content/learn/modules/lex_migration"),
            PageKind::TrailheadContent
        );
        assert_eq!(
            classify("https://trailhead.salesforce.com/en/content/learn/trails/force_com_admin"),
            PageKind::TrailheadContent
        );
    }

    #[test]
    fn test_classify_unknown() {
        assert_eq!(classify("https://trailhead.salesforce.com/today"), PageKind::Unknown);
        assert_eq!(classify("https://example.com/s/articleView"), PageKind::Unknown);
        assert_eq!(classify(""), PageKind::Unknown);
    }
}
