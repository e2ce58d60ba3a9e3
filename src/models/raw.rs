//! Per-source fetch results, before normalization.
//!
//! Each fetcher returns one variant of [`RawExtraction`] with the fields its
//! upstream actually provides. Placeholders for missing values are applied
//! later by [`crate::normalize`], so these structs keep `None` where the
//! upstream had nothing.

use serde_json::Value;

use super::record::{NestedArxiv, SourceKind};

/// Raw output of a single fetcher call
#[derive(Debug, Clone, PartialEq)]
pub enum RawExtraction {
    Arxiv(ArxivPaper),
    GitHub(GitHubRepo),
    HuggingFaceModel(HubModel),
    HuggingFaceDataset(HubDataset),
    HuggingFaceSpace(SpacePage),
    HuggingFaceBlog(BlogPost),
    GenericBlog(WebPage),
}

impl RawExtraction {
    /// The kind of source this extraction came from
    pub fn kind(&self) -> SourceKind {
        match self {
            RawExtraction::Arxiv(_) => SourceKind::Arxiv,
            RawExtraction::GitHub(_) => SourceKind::GitHub,
            RawExtraction::HuggingFaceModel(_) => SourceKind::HuggingFaceModel,
            RawExtraction::HuggingFaceDataset(_) => SourceKind::HuggingFaceDataset,
            RawExtraction::HuggingFaceSpace(_) => SourceKind::HuggingFaceSpace,
            RawExtraction::HuggingFaceBlog(_) => SourceKind::HuggingFaceBlog,
            RawExtraction::GenericBlog(_) => SourceKind::GenericBlog,
        }
    }
}

/// An arXiv paper with its full text
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArxivPaper {
    /// arXiv identifier as requested
    pub arxiv_id: String,
    pub title: Option<String>,
    pub authors: Vec<String>,
    /// Abstract
    pub summary: Option<String>,
    pub published: Option<String>,
    pub primary_category: Option<String>,
    /// All category terms, primary first
    pub categories: Vec<String>,
    pub pdf_url: Option<String>,
    pub abs_url: String,
    /// Extracted PDF text, or a description of why extraction failed
    pub text: String,
}

/// A GitHub repository and its README
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GitHubRepo {
    pub name: Option<String>,
    pub owner: Option<String>,
    pub description: Option<String>,
    pub language: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub stars: Option<u64>,
    pub forks: Option<u64>,
    pub clone_url: Option<String>,
    pub html_url: Option<String>,
    pub topics: Vec<String>,
    /// README text; `None` when it could not be retrieved
    pub readme: Option<String>,
}

/// A Hugging Face model card
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HubModel {
    pub model_id: Option<String>,
    pub author: Option<String>,
    pub tags: Vec<String>,
    pub pipeline_tag: Option<String>,
    pub card_data: Option<Value>,
    pub downloads: Option<u64>,
    pub likes: Option<u64>,
    pub library_name: Option<String>,
    pub last_modified: Option<String>,
    pub readme: Option<String>,
    pub arxiv_papers: Vec<NestedArxiv>,
}

/// A Hugging Face dataset card
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HubDataset {
    pub dataset_id: Option<String>,
    pub author: Option<String>,
    pub tags: Vec<String>,
    pub features: Option<Value>,
    pub card_data: Option<Value>,
    pub downloads: Option<u64>,
    pub likes: Option<u64>,
    pub readme: Option<String>,
    pub arxiv_papers: Vec<NestedArxiv>,
}

/// A scraped Hugging Face Space page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpacePage {
    pub url: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub creator: Option<String>,
    pub tags: Vec<String>,
    pub content: Option<String>,
}

/// A scraped Hugging Face blog post
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlogPost {
    pub url: String,
    pub title: Option<String>,
    pub author: Option<String>,
    pub publication_date: Option<String>,
    pub tags: Vec<String>,
    pub content: Option<String>,
}

/// Any other web page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WebPage {
    pub url: String,
    pub title: Option<String>,
    pub content: Option<String>,
}
