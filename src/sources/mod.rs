//! Source fetchers with a trait-based architecture.
//!
//! This module defines the [`Fetcher`] trait that every source kind
//! implements, the [`resolve`] function that classifies raw input into a
//! [`ResolvedReference`](crate::models::ResolvedReference), and the
//! [`FetcherRegistry`] the extraction facade dispatches through.
//!
//! # Source kinds
//!
//! | Kind | Protocol | Identifier |
//! |------|----------|------------|
//! | arXiv | Atom API + PDF download | `1611.07004` |
//! | GitHub | REST API + raw README | `owner/repo` |
//! | Hugging Face model | hub API + README probing | `owner/model` |
//! | Hugging Face dataset | hub API + README probing | `datasets/owner/name` |
//! | Hugging Face Space | HTML scrape | `owner/space` |
//! | Hugging Face blog | HTML scrape | page URL |
//! | Generic blog | HTML scrape | page URL |
//!
//! Every network call is awaited in sequence; fetchers never fan out.

mod arxiv;
mod blog;
mod github;
mod huggingface;
pub mod mock;
mod registry;
mod resolver;

pub use arxiv::ArxivFetcher;
pub use blog::{parse_web_page, GenericBlogFetcher};
pub use github::GitHubFetcher;
pub use huggingface::{
    arxiv_tag_ids, parse_blog_post, parse_space_page, HubApi, HuggingFaceBlogFetcher,
    HuggingFaceDatasetFetcher, HuggingFaceModelFetcher, HuggingFaceSpaceFetcher,
};
pub use mock::MockFetcher;
pub use registry::FetcherRegistry;
pub use resolver::resolve;

use crate::models::{RawExtraction, SourceKind};
use async_trait::async_trait;

/// The Fetcher trait defines the interface for all source fetchers.
///
/// A fetcher receives the `identifier` of a resolved reference and returns
/// the raw fields its upstream provides. Missing optional content (a README,
/// PDF text, an HTML element) is not an error; only a failed primary call is.
#[async_trait]
pub trait Fetcher: Send + Sync + std::fmt::Debug {
    /// The source kind this fetcher handles
    fn kind(&self) -> SourceKind;

    /// Human-readable name of this fetcher
    fn name(&self) -> &str {
        self.kind().name()
    }

    /// Fetch raw fields for one identifier
    async fn fetch(&self, identifier: &str) -> Result<RawExtraction, SourceError>;
}

/// Errors that can occur when resolving or fetching a source
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The input could not be classified, or lacks required path segments
    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    /// Transport failure (connect, timeout, body read)
    #[error("Network error: {0}")]
    Network(String),

    /// A required upstream call returned a non-success status
    #[error("Upstream error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// A well-formed request matched nothing upstream
    #[error("Not found: {0}")]
    NotFound(String),

    /// Parsing error (XML, JSON, HTML, etc.)
    #[error("Parse error: {0}")]
    Parse(String),

    /// No fetcher is registered for this kind
    #[error("No fetcher registered for {0}")]
    Unsupported(SourceKind),

    /// IO error (file system)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("Error: {0}")]
    Other(String),
}

impl SourceError {
    /// HTTP status carried by an upstream failure
    pub fn status(&self) -> Option<u16> {
        match self {
            SourceError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether this is an upstream fetch failure (bad status or transport)
    pub fn is_upstream(&self) -> bool {
        matches!(self, SourceError::Api { .. } | SourceError::Network(_))
    }
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => SourceError::Api {
                status: status.as_u16(),
                message: err.to_string(),
            },
            None => SourceError::Network(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for SourceError {
    fn from(err: serde_json::Error) -> Self {
        SourceError::Parse(format!("JSON: {}", err))
    }
}

impl From<quick_xml::DeError> for SourceError {
    fn from(err: quick_xml::DeError) -> Self {
        SourceError::Parse(format!("XML: {}", err))
    }
}

/// Send a request and require a 2xx status.
///
/// `what` names the upstream in error messages, e.g. "GitHub API".
pub(crate) async fn send_checked(
    request: reqwest::RequestBuilder,
    what: &str,
) -> Result<reqwest::Response, SourceError> {
    let response = request
        .send()
        .await
        .map_err(|e| SourceError::Network(format!("Failed to fetch {}: {}", what, e)))?;

    let status = response.status();
    if !status.is_success() {
        return Err(SourceError::Api {
            status: status.as_u16(),
            message: format!("{} returned status: {}", what, status),
        });
    }

    Ok(response)
}
