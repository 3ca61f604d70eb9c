//! Content-locating strategies
//!
//! Each page kind that has no dedicated container gets an ordered list of
//! strategies. The driver runs them in order over one parsed snapshot of the
//! rendered page and keeps the first result.

use scraper::{ElementRef, Html, Selector};

/// Parsed copy of a rendered page
///
/// `scraper::Html` is not `Send`, so snapshots are built and dropped inside
/// synchronous code, never held across an await.
pub struct PageSnapshot {
    document: Html,
}

impl PageSnapshot {
    pub fn parse(html: &str) -> Self {
        Self {
            document: Html::parse_document(html),
        }
    }

    /// All elements matching a CSS selector; an invalid selector matches nothing
    pub fn select_all(&self, selector: &str) -> Vec<ElementRef<'_>> {
        match Selector::parse(selector) {
            Ok(parsed) => self.document.select(&parsed).collect(),
            Err(_) => Vec::new(),
        }
    }

    pub fn select_first(&self, selector: &str) -> Option<ElementRef<'_>> {
        self.select_all(selector).into_iter().next()
    }

    /// Trimmed text of the first element matching `selector`
    pub fn text_of(&self, selector: &str) -> Option<String> {
        self.select_first(selector)
            .map(|el| element_text(&el))
            .filter(|text| !text.is_empty())
    }

    /// Trimmed `<title>` text
    pub fn title(&self) -> Option<String> {
        self.text_of("title")
    }

    /// True if the page looks like an error page: a `<title>` containing
    /// "404", or a first `<h1>` containing "not found" in any case
    pub fn is_not_found(&self) -> bool {
        let title_404 = self
            .select_first("title")
            .map(|el| element_text(&el).contains("404"))
            .unwrap_or(false);

        let heading_404 = self
            .select_first("h1")
            .map(|el| element_text(&el).to_lowercase().contains("not found"))
            .unwrap_or(false);

        title_404 || heading_404
    }
}

pub(crate) fn element_text(el: &ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// One way of locating a page's main content
#[derive(Debug, Clone, Copy)]
pub enum Strategy {
    /// Try each selector in order; for each, take the matching element with
    /// the longest inner HTML and accept it if it beats the threshold
    LongestMatch(&'static [&'static str]),

    /// For each marker element, walk up to the nearest `div` whose class
    /// contains one of the needles; the container is taken at any length
    MarkerAncestor {
        markers: &'static str,
        class_needles: &'static [&'static str],
    },

    /// Concatenate the outer HTML of every matching element
    CombinedSections(&'static str),

    /// The body with every element matching these selectors removed
    StrippedBody(&'static [&'static str]),
}

impl Strategy {
    pub fn apply(&self, snapshot: &PageSnapshot, min_len: usize) -> Option<String> {
        match self {
            Self::LongestMatch(selectors) => longest_match(snapshot, selectors, min_len),
            Self::MarkerAncestor {
                markers,
                class_needles,
            } => marker_ancestor(snapshot, markers, class_needles),
            Self::CombinedSections(selector) => combined_sections(snapshot, selector, min_len),
            Self::StrippedBody(chrome) => stripped_body(snapshot, chrome),
        }
    }
}

/// Runs `strategies` in order and returns the first content found
pub fn run_cascade(strategies: &[Strategy], snapshot: &PageSnapshot, min_len: usize) -> Option<String> {
    strategies
        .iter()
        .find_map(|strategy| strategy.apply(snapshot, min_len))
}

pub fn longest_match(snapshot: &PageSnapshot, selectors: &[&str], min_len: usize) -> Option<String> {
    selectors.iter().find_map(|selector| {
        snapshot
            .select_all(selector)
            .iter()
            .map(|el| el.inner_html())
            .max_by_key(|html| html.len())
            .filter(|html| html.len() > min_len)
    })
}

pub fn marker_ancestor(
    snapshot: &PageSnapshot,
    markers: &str,
    class_needles: &[&str],
) -> Option<String> {
    snapshot.select_all(markers).iter().find_map(|marker| {
        marker
            .ancestors()
            .filter_map(ElementRef::wrap)
            .find(|el| {
                el.value().name() == "div"
                    && el
                        .value()
                        .attr("class")
                        .map(|class| {
                            let class = class.to_lowercase();
                            class_needles.iter().any(|needle| class.contains(needle))
                        })
                        .unwrap_or(false)
            })
            .map(|container| container.inner_html())
    })
}

pub fn combined_sections(snapshot: &PageSnapshot, selector: &str, min_len: usize) -> Option<String> {
    let combined: String = snapshot
        .select_all(selector)
        .iter()
        .map(|el| el.html())
        .collect();
    Some(combined).filter(|html| html.len() > min_len)
}

pub fn stripped_body(snapshot: &PageSnapshot, chrome: &[&str]) -> Option<String> {
    let body = snapshot.select_first("body")?;
    let mut html = body.inner_html();

    let selector = chrome.join(", ");
    if let Ok(parsed) = Selector::parse(&selector) {
        for el in body.select(&parsed) {
            html = html.replace(&el.html(), "");
        }
    }

    Some(html).filter(|html| !html.trim().is_empty())
}
