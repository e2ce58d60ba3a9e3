//! Uniform record produced for every source kind.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The kind of upstream a reference points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceKind {
    #[serde(rename = "arxiv")]
    Arxiv,
    #[serde(rename = "github")]
    GitHub,
    #[serde(rename = "huggingface_model")]
    HuggingFaceModel,
    #[serde(rename = "huggingface_dataset")]
    HuggingFaceDataset,
    #[serde(rename = "huggingface_space")]
    HuggingFaceSpace,
    #[serde(rename = "huggingface_blog")]
    HuggingFaceBlog,
    #[serde(rename = "blog")]
    GenericBlog,
}

impl SourceKind {
    /// Every kind, in resolution precedence order
    pub const ALL: [SourceKind; 7] = [
        SourceKind::Arxiv,
        SourceKind::GitHub,
        SourceKind::HuggingFaceBlog,
        SourceKind::HuggingFaceSpace,
        SourceKind::HuggingFaceDataset,
        SourceKind::HuggingFaceModel,
        SourceKind::GenericBlog,
    ];

    /// Returns the display name of the source
    pub fn name(&self) -> &'static str {
        match self {
            SourceKind::Arxiv => "arXiv",
            SourceKind::GitHub => "GitHub",
            SourceKind::HuggingFaceModel => "Hugging Face model",
            SourceKind::HuggingFaceDataset => "Hugging Face dataset",
            SourceKind::HuggingFaceSpace => "Hugging Face Space",
            SourceKind::HuggingFaceBlog => "Hugging Face blog",
            SourceKind::GenericBlog => "Blog",
        }
    }

    /// Returns the serialized source type string
    pub fn id(&self) -> &'static str {
        match self {
            SourceKind::Arxiv => "arxiv",
            SourceKind::GitHub => "github",
            SourceKind::HuggingFaceModel => "huggingface_model",
            SourceKind::HuggingFaceDataset => "huggingface_dataset",
            SourceKind::HuggingFaceSpace => "huggingface_space",
            SourceKind::HuggingFaceBlog => "huggingface_blog",
            SourceKind::GenericBlog => "blog",
        }
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A raw input string classified into a kind and a re-fetchable identifier.
///
/// The identifier alone is enough to fetch the resource again:
/// an arXiv ID, `owner/repo`, `owner/model`, `datasets/<id>`, `owner/space`,
/// or the page URL for blogs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedReference {
    pub kind: SourceKind,
    pub identifier: String,
}

impl ResolvedReference {
    pub fn new(kind: SourceKind, identifier: impl Into<String>) -> Self {
        Self {
            kind,
            identifier: identifier.into(),
        }
    }
}

/// The normalized output of one extraction.
///
/// `title` and `content` are hoisted out of the per-source fields, so
/// `metadata` never carries either key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedRecord {
    pub source_type: SourceKind,
    pub identifier: String,
    pub title: Option<String>,
    pub content: Option<String>,
    pub metadata: Map<String, Value>,
}

impl ExtractedRecord {
    /// Build a record, dropping any `title`/`content` keys from the metadata
    pub fn new(
        reference: ResolvedReference,
        title: Option<String>,
        content: Option<String>,
        mut metadata: Map<String, Value>,
    ) -> Self {
        metadata.remove("title");
        metadata.remove("content");
        Self {
            source_type: reference.kind,
            identifier: reference.identifier,
            title,
            content,
            metadata,
        }
    }

    /// Serialize to the boundary JSON shape
    pub fn to_json(&self) -> Value {
        // A struct of strings and JSON values always serializes
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// One entry of a parent record's `arxiv_papers` list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NestedArxiv {
    Found(Box<ExtractedRecord>),
    Failed { id: String, error: String },
}

impl NestedArxiv {
    pub fn is_found(&self) -> bool {
        matches!(self, NestedArxiv::Found(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_source_kind_serialization() {
        assert_eq!(
            serde_json::to_value(SourceKind::HuggingFaceDataset).unwrap(),
            json!("huggingface_dataset")
        );
        assert_eq!(
            serde_json::to_value(SourceKind::GenericBlog).unwrap(),
            json!("blog")
        );
        for kind in SourceKind::ALL {
            assert_eq!(serde_json::to_value(kind).unwrap(), json!(kind.id()));
        }
    }

    #[test]
    fn test_record_hoists_title_and_content() {
        let mut metadata = Map::new();
        metadata.insert("title".to_string(), json!("shadow"));
        metadata.insert("content".to_string(), json!("shadow"));
        metadata.insert("owner".to_string(), json!("openai"));

        let record = ExtractedRecord::new(
            ResolvedReference::new(SourceKind::GitHub, "openai/gym"),
            Some("gym".to_string()),
            Some("readme".to_string()),
            metadata,
        );

        assert!(!record.metadata.contains_key("title"));
        assert!(!record.metadata.contains_key("content"));
        assert_eq!(record.metadata["owner"], json!("openai"));
    }

    #[test]
    fn test_boundary_format_keys() {
        let record = ExtractedRecord::new(
            ResolvedReference::new(SourceKind::Arxiv, "1611.07004"),
            None,
            None,
            Map::new(),
        );
        let value = record.to_json();
        let keys: Vec<&str> = value
            .as_object()
            .unwrap()
            .keys()
            .map(|k| k.as_str())
            .collect();
        for key in ["source_type", "identifier", "title", "content", "metadata"] {
            assert!(keys.contains(&key), "missing {}", key);
        }
        assert_eq!(value["source_type"], json!("arxiv"));
        assert_eq!(value["title"], Value::Null);
    }

    #[test]
    fn test_nested_failure_shape() {
        let failed = NestedArxiv::Failed {
            id: "bad.id".to_string(),
            error: "malformed".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&failed).unwrap(),
            json!({"id": "bad.id", "error": "malformed"})
        );
        assert!(!failed.is_found());
    }
}
