//! Markdown document rendering
//!
//! Turns extracted HTML into a Markdown document with YAML frontmatter and a
//! generated table of contents.

use crate::extract::ExtractedContent;
use chrono::NaiveDate;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use std::sync::OnceLock;

/// Text fragments marking cookie banners and consent dialogs
const COOKIE_KEYWORDS: &[&str] = &[
    "cookie",
    "consent",
    "accept all",
    "do not accept",
    "privacy",
    "cookie settings",
];

/// Elements never removed by the cookie filter, whatever their text
const STRUCTURAL_TAGS: &[&str] = &["html", "head", "body"];

/// Block-level elements an inline cookie match is widened to
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "dd", "details", "dialog", "div", "dl", "dt",
    "fieldset", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "li",
    "main", "nav", "ol", "p", "pre", "section", "table", "td", "th", "tr", "ul",
];

/// Renders extracted content as Markdown
///
/// Pure: the same input and run date always give the same document.
#[derive(Debug, Clone)]
pub struct MarkdownRenderer {
    run_date: NaiveDate,
}

impl MarkdownRenderer {
    pub fn new(run_date: NaiveDate) -> Self {
        Self { run_date }
    }

    /// A renderer stamping documents with today's local date
    pub fn today() -> Self {
        Self::new(chrono::Local::now().date_naive())
    }

    /// Renders one document
    ///
    /// # Arguments
    ///
    /// * `extracted` - Content HTML, optional title, extra frontmatter fields
    /// * `product` - Product tag
    /// * `depth` - BFS depth the page was found at
    /// * `source_url` - Page the URL was discovered on (the URL itself for seeds)
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - Frontmatter, table of contents and body
    /// * `Err(std::io::Error)` - The HTML could not be converted
    pub fn render(
        &self,
        extracted: &ExtractedContent,
        product: &str,
        depth: u32,
        source_url: &str,
    ) -> std::io::Result<String> {
        let (title, cleaned) = {
            let document = Html::parse_document(&extracted.html);
            let title = extracted
                .title
                .clone()
                .or_else(|| document_title(&document))
                .unwrap_or_default();
            (title, strip_cookie_elements(&document))
        };

        let converter = htmd::HtmlToMarkdown::builder()
            .options(htmd::options::Options {
                heading_style: htmd::options::HeadingStyle::Atx,
                ..Default::default()
            })
            .skip_tags(vec!["script", "style", "noscript", "head"])
            .build();
        let body = converter.convert(&cleaned)?;

        let frontmatter = self.frontmatter(&title, product, depth, source_url, &extracted.extra_metadata);
        let toc = build_toc(&body);

        Ok(format!(
            "{}## Table of Contents\n\n{}\n\n{}",
            frontmatter, toc, body
        ))
    }

    fn frontmatter(
        &self,
        title: &str,
        product: &str,
        depth: u32,
        source_url: &str,
        extra: &[(String, String)],
    ) -> String {
        let mut yaml = String::from("---\n");
        for (key, value) in extra {
            yaml.push_str(&format!("{}: {}\n", key, yaml_value(value)));
        }
        yaml.push_str(&format!("title: {}\n", yaml_quote(title)));
        yaml.push_str(&format!("date: \"{}\"\n", self.run_date.format("%Y-%m-%d")));
        yaml.push_str(&format!("tag: {}\n", yaml_quote(product)));
        yaml.push_str(&format!(
            "category: {}\n",
            yaml_quote(&format!("Product Documentation: {}", product))
        ));
        yaml.push_str("toc: true\n");
        yaml.push_str(&format!("depth_level: {}\n", depth));
        yaml.push_str(&format!("source_url: {}\n", yaml_quote(source_url)));
        yaml.push_str("---\n\n");
        yaml
    }
}

/// `<title>` text, else the first `<h1>`
fn document_title(document: &Html) -> Option<String> {
    let first_text = |selector: &str| {
        Selector::parse(selector)
            .ok()
            .and_then(|sel| document.select(&sel).next())
            .map(|el| el.text().collect::<String>().trim().to_string())
            .filter(|text| !text.is_empty())
    };
    first_text("title").or_else(|| first_text("h1"))
}

fn mentions_cookie(el: &ElementRef<'_>) -> bool {
    let text = el.text().collect::<String>().to_lowercase();
    COOKIE_KEYWORDS.iter().any(|keyword| text.contains(keyword))
}

/// Nearest block-level element holding `el`, or `el` itself when only
/// structural tags sit above it
fn enclosing_block(el: ElementRef<'_>) -> ElementRef<'_> {
    std::iter::once(el)
        .chain(el.ancestors().filter_map(ElementRef::wrap))
        .take_while(|node| !STRUCTURAL_TAGS.contains(&node.value().name()))
        .find(|node| BLOCK_TAGS.contains(&node.value().name()))
        .unwrap_or(el)
}

/// Serializes `document` without its cookie/consent elements
///
/// Starts from the innermost matching elements, so a page that merely
/// mentions privacy somewhere keeps the rest of its content. An inline match
/// takes its whole enclosing block with it; no sentence fragments are left.
pub fn strip_cookie_elements(document: &Html) -> String {
    let mut targets: Vec<ElementRef<'_>> = Vec::new();

    for el in document.root_element().descendants().filter_map(ElementRef::wrap) {
        if STRUCTURAL_TAGS.contains(&el.value().name()) || !mentions_cookie(&el) {
            continue;
        }
        let has_matching_child = el
            .children()
            .filter_map(ElementRef::wrap)
            .any(|child| mentions_cookie(&child));
        if has_matching_child {
            continue;
        }
        let block = enclosing_block(el);
        if !targets.iter().any(|t| t.id() == block.id()) {
            targets.push(block);
        }
    }

    // a target nested in another target goes with it
    let ids: HashSet<_> = targets.iter().map(|t| t.id()).collect();
    let mut html = document.html();
    for target in targets {
        let nested = target.ancestors().any(|node| ids.contains(&node.id()));
        if !nested {
            html = html.replace(&target.html(), "");
        }
    }

    html
}

fn heading_regex() -> &'static Regex {
    static HEADING: OnceLock<Regex> = OnceLock::new();
    HEADING.get_or_init(|| Regex::new(r"(?m)^(#+)[ \t]+(.*)$").expect("heading pattern is valid"))
}

/// Table of contents from the ATX headings in `markdown`
///
/// # Examples
///
/// ```
/// use docs_harvest::output::build_toc;
///
/// assert_eq!(build_toc("# A\n\n## B\n"), "- [A](#a)\n  - [B](#b)");
/// ```
pub fn build_toc(markdown: &str) -> String {
    heading_regex()
        .captures_iter(markdown)
        .map(|caps| {
            let level = caps[1].len();
            let text = caps[2].trim_end();
            format!("{}- [{}](#{})", "  ".repeat(level - 1), text, slugify(text))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Anchor slug: keep ASCII letters, digits and spaces, lowercase, spaces to hyphens
pub fn slugify(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == ' ')
        .collect::<String>()
        .to_lowercase()
        .replace(' ', "-")
}

fn yaml_quote(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Booleans stay bare, everything else is quoted
fn yaml_value(value: &str) -> String {
    match value {
        "true" | "false" => value.to_string(),
        _ => yaml_quote(value),
    }
}
