//! URL metadata fetching
//!
//! Fetches the page title and description when a link is added without a
//! title.

use anyhow::Result;
use reqwest::blocking::Client;
use scraper::{Html, Selector};
use std::time::Duration;
use tracing::debug;

/// Metadata extracted from a URL
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UrlMetadata {
    pub title: Option<String>,
    pub description: Option<String>,
}

/// Fetch metadata from a URL
///
/// Returns empty metadata on failure (graceful degradation).
pub fn fetch_metadata(url: &str, timeout: Duration) -> UrlMetadata {
    match fetch_metadata_inner(url, timeout) {
        Ok(metadata) => metadata,
        Err(e) => {
            debug!("Metadata fetch for {} failed: {}", url, e);
            UrlMetadata::default()
        }
    }
}

fn fetch_metadata_inner(url: &str, timeout: Duration) -> Result<UrlMetadata> {
    let client = Client::builder()
        .timeout(timeout)
        .user_agent(concat!("Mozilla/5.0 (compatible; linkboard/", env!("CARGO_PKG_VERSION"), ")"))
        .build()?;

    let response = client.get(url).send()?;

    if !response.status().is_success() {
        return Ok(UrlMetadata::default());
    }

    let html = response.text()?;
    Ok(parse_metadata(&html))
}

/// Parse metadata from HTML content
fn parse_metadata(html: &str) -> UrlMetadata {
    let document = Html::parse_document(html);

    UrlMetadata {
        title: extract_title(&document),
        description: extract_description(&document),
    }
}

/// og:title, then twitter:title, then `<title>`
fn extract_title(document: &Html) -> Option<String> {
    if let Some(title) = extract_meta_content(document, "og:title") {
        return Some(title);
    }
    if let Some(title) = extract_meta_content(document, "twitter:title") {
        return Some(title);
    }

    let selector = Selector::parse("title").ok()?;
    document
        .select(&selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// og:description, then twitter:description, then meta description
fn extract_description(document: &Html) -> Option<String> {
    if let Some(desc) = extract_meta_content(document, "og:description") {
        return Some(desc);
    }
    if let Some(desc) = extract_meta_content(document, "twitter:description") {
        return Some(desc);
    }

    let selector = Selector::parse(r#"meta[name="description"]"#).ok()?;
    document
        .select(&selector)
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Content of a `<meta property=...>` or `<meta name=...>` tag
fn extract_meta_content(document: &Html, key: &str) -> Option<String> {
    for attr in ["property", "name"] {
        let Ok(selector) = Selector::parse(&format!(r#"meta[{}="{}"]"#, attr, key)) else {
            continue;
        };
        let content = document
            .select(&selector)
            .next()
            .and_then(|el| el.value().attr("content"))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        if content.is_some() {
            return content;
        }
    }
    None
}
