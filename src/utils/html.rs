//! Small helpers over `scraper` for pulling text out of fetched pages.

use scraper::{ElementRef, Html, Selector};

/// Tags whose text makes up the readable body of a blog-like page
pub const BODY_BLOCKS: &str = "p, h1, h2, h3, li";

/// Body blocks of Hugging Face pages; their `h1` is the title
pub const HUB_BODY_BLOCKS: &str = "p, h2, h3, li";

fn selector(css: &str) -> Option<Selector> {
    match Selector::parse(css) {
        Ok(selector) => Some(selector),
        Err(e) => {
            tracing::warn!("Invalid CSS selector '{}': {:?}", css, e);
            None
        }
    }
}

/// Collapse an element's text nodes into one trimmed string
pub fn element_text(element: &ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Trimmed text of the first element matching `css`, if it has any
pub fn first_text(document: &Html, css: &str) -> Option<String> {
    let selector = selector(css)?;
    document
        .select(&selector)
        .next()
        .map(|e| element_text(&e))
        .filter(|t| !t.is_empty())
}

/// Trimmed, non-empty text of every element matching `css`
pub fn all_text(document: &Html, css: &str) -> Vec<String> {
    let Some(selector) = selector(css) else {
        return Vec::new();
    };
    document
        .select(&selector)
        .map(|e| element_text(&e))
        .filter(|t| !t.is_empty())
        .collect()
}

/// Attribute value of the first element matching `css`
pub fn first_attr(document: &Html, css: &str, attr: &str) -> Option<String> {
    let selector = selector(css)?;
    document
        .select(&selector)
        .find_map(|e| e.value().attr(attr))
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Text of every block under `scope` matching `blocks`, one block per line.
///
/// Returns `None` when no block carries text.
pub fn block_text(scope: ElementRef, blocks: &str) -> Option<String> {
    let selector = selector(blocks)?;
    let lines: Vec<String> = scope
        .select(&selector)
        .map(|e| element_text(&e))
        .filter(|t| !t.is_empty())
        .collect();

    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}

/// First element matching any of `containers`, in the order given
pub fn find_container<'a>(document: &'a Html, containers: &[&str]) -> Option<ElementRef<'a>> {
    containers
        .iter()
        .filter_map(|css| selector(css))
        .find_map(|s| document.select(&s).next())
}
