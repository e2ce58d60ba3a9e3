//! arXiv fetcher.
//!
//! Metadata comes from the arXiv Atom API; the full text is extracted from
//! the paper's PDF, which is spooled to a scratch file for the duration of
//! the extraction only.

use async_trait::async_trait;
use quick_xml::de::from_str;
use regex::Regex;
use serde::Deserialize;
use std::io::Write;
use std::path::PathBuf;
use std::sync::LazyLock;

use crate::config::Config;
use crate::models::{ArxivPaper, RawExtraction, SourceKind};
use crate::sources::{send_checked, Fetcher, SourceError};
use crate::utils::{extract_text_from_path, HttpClient, PdfExtractError};

/// Base URL for arXiv abstract pages
const ARXIV_ABS_URL: &str = "https://arxiv.org/abs";

/// New-style arXiv identifiers: YYMM.NNNN or YYMM.NNNNN, optionally versioned
static ARXIV_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}\.\d{4,5}(v\d+)?$").expect("valid arXiv id regex"));

#[derive(Debug, Deserialize)]
struct AtomFeed {
    #[serde(rename = "entry", default)]
    entries: Vec<AtomEntry>,
}

#[derive(Debug, Deserialize)]
struct AtomEntry {
    #[serde(default)]
    id: String,
    title: Option<String>,
    summary: Option<String>,
    published: Option<String>,
    #[serde(rename = "author", default)]
    authors: Vec<AtomAuthor>,
    #[serde(rename = "link", default)]
    links: Vec<AtomLink>,
    #[serde(rename = "primary_category", alias = "arxiv:primary_category")]
    primary_category: Option<AtomCategory>,
    #[serde(rename = "category", default)]
    categories: Vec<AtomCategory>,
}

#[derive(Debug, Deserialize)]
struct AtomAuthor {
    name: String,
}

#[derive(Debug, Deserialize)]
struct AtomLink {
    #[serde(rename = "@href")]
    href: String,
    #[serde(rename = "@title")]
    title: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AtomCategory {
    #[serde(rename = "@term")]
    term: String,
}

/// arXiv fetcher
///
/// Never expands nested references, so it is safe to call from the
/// Hugging Face fetchers' tag expansion.
#[derive(Debug, Clone)]
pub struct ArxivFetcher {
    client: HttpClient,
    api_url: String,
    scratch_dir: PathBuf,
}

impl ArxivFetcher {
    /// Create a fetcher against an explicit API endpoint and scratch directory
    pub fn new(
        client: HttpClient,
        api_url: impl Into<String>,
        scratch_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            client,
            api_url: api_url.into(),
            scratch_dir: scratch_dir.into(),
        }
    }

    /// Create from the `[endpoints]` and `[extraction]` configuration
    pub fn from_config(client: HttpClient, config: &Config) -> Self {
        Self::new(
            client,
            config.endpoints.arxiv_api.clone(),
            config.extraction.scratch_dir(),
        )
    }

    /// Whether `id` is a well-formed new-style arXiv identifier
    pub fn is_valid_id(id: &str) -> bool {
        ARXIV_ID.is_match(id)
    }

    /// Fetch metadata and full text for one paper
    pub async fn fetch_paper(&self, arxiv_id: &str) -> Result<ArxivPaper, SourceError> {
        let arxiv_id = arxiv_id.trim();
        if arxiv_id.is_empty() {
            return Err(SourceError::InvalidReference("Empty arXiv ID".to_string()));
        }

        let url = format!(
            "{}?id_list={}",
            self.api_url,
            urlencoding::encode(arxiv_id)
        );
        tracing::debug!("Querying arXiv API: {}", url);

        let response = send_checked(
            self.client
                .get(&url)
                .header("Accept", "application/atom+xml"),
            "arXiv API",
        )
        .await?;

        let xml = response
            .text()
            .await
            .map_err(|e| SourceError::Network(format!("Failed to read arXiv response: {}", e)))?;

        let mut paper = Self::parse_feed(&xml, arxiv_id)?;
        paper.text = self.full_text(arxiv_id, paper.pdf_url.as_deref()).await;

        Ok(paper)
    }

    /// Parse the Atom feed into a paper without its full text
    fn parse_feed(xml: &str, arxiv_id: &str) -> Result<ArxivPaper, SourceError> {
        let feed: AtomFeed = from_str(xml)
            .map_err(|e| SourceError::Parse(format!("Failed to parse arXiv Atom feed: {}", e)))?;

        let entry = feed
            .entries
            .into_iter()
            .next()
            .ok_or_else(|| SourceError::NotFound(format!("No arXiv entry for ID {}", arxiv_id)))?;

        // The API reports bad ids as a single entry under /api/errors
        if entry.id.contains("/api/errors") {
            let reason = entry
                .summary
                .as_deref()
                .map(str::trim)
                .unwrap_or("arXiv API error");
            return Err(SourceError::NotFound(format!("{}: {}", arxiv_id, reason)));
        }

        let pdf_url = entry
            .links
            .iter()
            .find(|l| l.title.as_deref() == Some("pdf"))
            .map(|l| l.href.clone());

        let mut categories: Vec<String> = Vec::new();
        let primary_category = entry.primary_category.map(|c| c.term);
        for term in primary_category
            .iter()
            .cloned()
            .chain(entry.categories.into_iter().map(|c| c.term))
        {
            if !categories.contains(&term) {
                categories.push(term);
            }
        }

        Ok(ArxivPaper {
            arxiv_id: arxiv_id.to_string(),
            title: entry
                .title
                .map(|t| t.split_whitespace().collect::<Vec<_>>().join(" "))
                .filter(|t| !t.is_empty()),
            authors: entry.authors.into_iter().map(|a| a.name.trim().to_string()).collect(),
            summary: entry
                .summary
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            published: entry.published.map(|p| p.trim().to_string()),
            primary_category,
            categories,
            pdf_url,
            abs_url: format!("{}/{}", ARXIV_ABS_URL, arxiv_id),
            text: String::new(),
        })
    }

    /// Download and extract the PDF text, describing any failure in the text itself
    async fn full_text(&self, arxiv_id: &str, pdf_url: Option<&str>) -> String {
        let Some(pdf_url) = pdf_url else {
            tracing::warn!("arXiv entry {} has no PDF link", arxiv_id);
            return "PDF not available: the arXiv entry has no PDF link.".to_string();
        };

        let bytes = match self.download_pdf(pdf_url).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!("Failed to download PDF for {}: {}", arxiv_id, e);
                return format!("Error downloading PDF: {}", e);
            }
        };

        match self.extract_spooled(arxiv_id, &bytes) {
            Ok(text) if text.trim().is_empty() => {
                "PDF contains no extractable text.".to_string()
            }
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("PDF text extraction failed for {}: {}", arxiv_id, e);
                format!("Error extracting PDF text: {}", e)
            }
        }
    }

    async fn download_pdf(&self, pdf_url: &str) -> Result<Vec<u8>, SourceError> {
        tracing::debug!("Downloading PDF: {}", pdf_url);
        let response = send_checked(self.client.get(pdf_url), "arXiv PDF").await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| SourceError::Network(format!("Failed to read PDF body: {}", e)))?;
        Ok(bytes.to_vec())
    }

    /// Write the PDF to a scratch file and extract from it.
    ///
    /// The file is deleted when `spool` drops, on every return path.
    fn extract_spooled(&self, arxiv_id: &str, bytes: &[u8]) -> Result<String, PdfExtractError> {
        std::fs::create_dir_all(&self.scratch_dir)?;

        let prefix = format!("{}-", arxiv_id.replace('/', "_"));
        let mut spool = tempfile::Builder::new()
            .prefix(&prefix)
            .suffix(".pdf")
            .tempfile_in(&self.scratch_dir)?;
        spool.write_all(bytes)?;
        spool.flush()?;

        extract_text_from_path(spool.path())
    }
}

#[async_trait]
impl Fetcher for ArxivFetcher {
    fn kind(&self) -> SourceKind {
        SourceKind::Arxiv
    }

    async fn fetch(&self, identifier: &str) -> Result<RawExtraction, SourceError> {
        self.fetch_paper(identifier).await.map(RawExtraction::Arxiv)
    }
}
