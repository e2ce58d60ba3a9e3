//! Generic blog and web page fetcher.

use async_trait::async_trait;
use scraper::Html;
use url::Url;

use crate::models::{RawExtraction, SourceKind, WebPage};
use crate::sources::{send_checked, Fetcher, SourceError};
use crate::utils::html::{block_text, find_container, first_text, BODY_BLOCKS};
use crate::utils::HttpClient;

/// Containers that usually hold the article body, most specific first
const CONTENT_CONTAINERS: &[&str] = &["article", "main"];

/// Parse an arbitrary HTML page into its title and readable body
pub fn parse_web_page(url: &str, html: &str) -> WebPage {
    let document = Html::parse_document(html);
    let scope = find_container(&document, CONTENT_CONTAINERS).unwrap_or(document.root_element());

    WebPage {
        url: url.to_string(),
        title: first_text(&document, "title"),
        content: block_text(scope, BODY_BLOCKS),
    }
}

/// Catch-all fetcher for pages no other source claims
#[derive(Debug, Clone)]
pub struct GenericBlogFetcher {
    client: HttpClient,
}

impl GenericBlogFetcher {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Fetcher for GenericBlogFetcher {
    fn kind(&self) -> SourceKind {
        SourceKind::GenericBlog
    }

    async fn fetch(&self, identifier: &str) -> Result<RawExtraction, SourceError> {
        let url = Url::parse(identifier).map_err(|e| {
            SourceError::InvalidReference(format!("Not a fetchable URL '{}': {}", identifier, e))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(SourceError::InvalidReference(format!(
                "Unsupported URL scheme '{}': {}",
                url.scheme(),
                identifier
            )));
        }

        tracing::debug!("Fetching web page: {}", url);
        let response = send_checked(self.client.get(url.as_str()), "web page").await?;
        let html = response
            .text()
            .await
            .map_err(|e| SourceError::Network(format!("Failed to read page body: {}", e)))?;

        Ok(RawExtraction::GenericBlog(parse_web_page(identifier, &html)))
    }
}
