//! Scraped Hugging Face pages: blog posts and Spaces.

use async_trait::async_trait;
use scraper::{Html, Selector};

use crate::config::Config;
use crate::models::{BlogPost, RawExtraction, SourceKind, SpacePage};
use crate::sources::{send_checked, Fetcher, SourceError};
use crate::utils::html::{
    all_text, block_text, find_container, first_attr, first_text, HUB_BODY_BLOCKS,
};
use crate::utils::HttpClient;

async fn fetch_page(client: &HttpClient, url: &str, what: &str) -> Result<String, SourceError> {
    tracing::debug!("Fetching {}: {}", what, url);
    let response = send_checked(client.get(url), what).await?;
    response
        .text()
        .await
        .map_err(|e| SourceError::Network(format!("Failed to read {}: {}", what, e)))
}

/// Parse a blog post page
pub fn parse_blog_post(url: &str, html: &str) -> BlogPost {
    let document = Html::parse_document(html);

    // Only the first tag strip counts; later ones belong to related posts
    let tags = match (find_container(&document, &["div.tags"]), Selector::parse("a")) {
        (Some(strip), Ok(links)) => strip
            .select(&links)
            .map(|a| a.text().collect::<String>().trim().to_string())
            .filter(|t| !t.is_empty())
            .collect(),
        _ => Vec::new(),
    };

    BlogPost {
        url: url.to_string(),
        title: first_text(&document, "h1"),
        author: first_text(&document, "a.author"),
        publication_date: first_text(&document, "time"),
        tags,
        content: block_text(document.root_element(), HUB_BODY_BLOCKS),
    }
}

/// Parse a Space landing page
pub fn parse_space_page(url: &str, html: &str) -> SpacePage {
    let document = Html::parse_document(html);

    SpacePage {
        url: url.to_string(),
        title: first_text(&document, "h1"),
        description: first_attr(&document, r#"meta[property="og:description"]"#, "content"),
        creator: first_text(&document, "a.author"),
        tags: all_text(&document, "span.tag"),
        content: block_text(document.root_element(), HUB_BODY_BLOCKS),
    }
}

/// Hugging Face blog fetcher; the identifier is the post URL
#[derive(Debug, Clone)]
pub struct HuggingFaceBlogFetcher {
    client: HttpClient,
}

impl HuggingFaceBlogFetcher {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Fetcher for HuggingFaceBlogFetcher {
    fn kind(&self) -> SourceKind {
        SourceKind::HuggingFaceBlog
    }

    async fn fetch(&self, identifier: &str) -> Result<RawExtraction, SourceError> {
        let html = fetch_page(&self.client, identifier, "Hugging Face blog").await?;
        Ok(RawExtraction::HuggingFaceBlog(parse_blog_post(
            identifier, &html,
        )))
    }
}

/// Hugging Face Space fetcher; the identifier is `owner/space`
#[derive(Debug, Clone)]
pub struct HuggingFaceSpaceFetcher {
    client: HttpClient,
    base_url: String,
}

impl HuggingFaceSpaceFetcher {
    pub fn new(client: HttpClient, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(client: HttpClient, config: &Config) -> Self {
        Self::new(client, config.endpoints.huggingface.clone())
    }

    /// Landing page URL for a Space
    pub fn space_url(&self, space_id: &str) -> String {
        format!("{}/spaces/{}", self.base_url, space_id)
    }
}

#[async_trait]
impl Fetcher for HuggingFaceSpaceFetcher {
    fn kind(&self) -> SourceKind {
        SourceKind::HuggingFaceSpace
    }

    async fn fetch(&self, identifier: &str) -> Result<RawExtraction, SourceError> {
        let url = self.space_url(identifier);
        let html = fetch_page(&self.client, &url, "Hugging Face Space").await?;
        Ok(RawExtraction::HuggingFaceSpace(parse_space_page(&url, &html)))
    }
}
