//! Link harvesting
//!
//! Collects the anchors of a page's extracted content and resolves them
//! against the page URL. Nothing is filtered or deduplicated here beyond
//! dropping links that can never be crawled.

use scraper::{Html, Selector};
use url::Url;

/// An anchor found on a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarvestedLink {
    /// Trimmed anchor text
    pub text: String,

    /// Absolute http(s) URL
    pub href: String,
}

/// Extracts every `<a href>` from `html`, in document order
///
/// # Link Rules
///
/// - Relative, protocol-relative and absolute hrefs are resolved against `base_url`
/// - `javascript:`, `mailto:`, `tel:` and `data:` hrefs are dropped
/// - Results that are not http(s) after resolution are dropped
/// - Fragments are kept, so `page#a` and `page#b` are distinct links
/// - Duplicates are kept
///
/// # Arguments
///
/// * `html` - Extracted content HTML (a fragment or a full document)
/// * `base_url` - URL of the page the HTML came from
///
/// # Example
///
/// ```
/// use docs_harvest::crawler::harvest_links;
/// use url::Url;
///
/// let base = Url::parse("https://docs.mulesoft.com/mule-runtime/latest/").unwrap();
/// let links = harvest_links(r#"<a href="about"> About </a>"#, &base);
/// assert_eq!(links[0].href, "https://docs.mulesoft.com/mule-runtime/latest/about");
/// assert_eq!(links[0].text, "About");
/// ```
pub fn harvest_links(html: &str, base_url: &Url) -> Vec<HarvestedLink> {
    let document = Html::parse_document(html);
    let mut links = Vec::new();

    if let Ok(selector) = Selector::parse("a[href]") {
        for element in document.select(&selector) {
            let Some(href) = element.value().attr("href") else {
                continue;
            };

            if let Some(href) = resolve_link(href, base_url) {
                let text = element.text().collect::<String>().trim().to_string();
                links.push(HarvestedLink { text, href });
            }
        }
    }

    links
}

/// Resolves one href, or returns None if it should never be followed
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() {
        return None;
    }

    let lower = href.to_ascii_lowercase();
    if ["javascript:", "mailto:", "tel:", "data:"]
        .iter()
        .any(|scheme| lower.starts_with(scheme))
    {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute_url) if matches!(absolute_url.scheme(), "http" | "https") => {
            Some(absolute_url.to_string())
        }
        _ => None,
    }
}
