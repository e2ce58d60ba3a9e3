//! Mapping of per-source fetch results into the uniform [`ExtractedRecord`].
//!
//! Every absent value that has a documented placeholder is filled in here;
//! the fetchers themselves report `None`.

use serde_json::{json, Map, Value};

use crate::models::{
    ArxivPaper, BlogPost, ExtractedRecord, GitHubRepo, HubDataset, HubModel, NestedArxiv,
    RawExtraction, ResolvedReference, SpacePage, WebPage,
};

/// Content when no README could be retrieved
pub const README_UNAVAILABLE: &str = "README not available.";
/// Blog post without an `h1`
pub const TITLE_UNAVAILABLE: &str = "Title not available";
pub const UNKNOWN_AUTHOR: &str = "Unknown author";
pub const UNKNOWN_DATE: &str = "Unknown date";
/// Space without an `h1`
pub const NAME_UNAVAILABLE: &str = "Name not available";
pub const DESCRIPTION_UNAVAILABLE: &str = "Description not available";
pub const UNKNOWN_CREATOR: &str = "Unknown creator";

/// Normalize one fetch result into a record for `reference`.
///
/// The kind recorded on the result is taken from `reference`; callers pass
/// the reference the raw extraction was fetched for.
pub fn normalize(reference: &ResolvedReference, raw: RawExtraction) -> ExtractedRecord {
    let (title, content, metadata) = match raw {
        RawExtraction::Arxiv(paper) => arxiv(paper),
        RawExtraction::GitHub(repo) => github(repo),
        RawExtraction::HuggingFaceModel(model) => hub_model(model, &reference.identifier),
        RawExtraction::HuggingFaceDataset(dataset) => hub_dataset(dataset, &reference.identifier),
        RawExtraction::HuggingFaceSpace(page) => space(page),
        RawExtraction::HuggingFaceBlog(post) => hub_blog(post),
        RawExtraction::GenericBlog(page) => web_page(page),
    };

    ExtractedRecord::new(reference.clone(), title, content, metadata)
}

type Parts = (Option<String>, Option<String>, Map<String, Value>);

fn or_placeholder(value: Option<String>, placeholder: &str) -> Value {
    Value::String(value.unwrap_or_else(|| placeholder.to_string()))
}

fn arxiv(paper: ArxivPaper) -> Parts {
    let mut metadata = Map::new();
    metadata.insert("authors".into(), json!(paper.authors));
    metadata.insert("summary".into(), json!(paper.summary));
    metadata.insert("publication_date".into(), json!(paper.published));
    metadata.insert("categories".into(), json!(paper.primary_category));
    metadata.insert("all_categories".into(), json!(paper.categories));
    metadata.insert("pdf_url".into(), json!(paper.pdf_url));
    metadata.insert("links".into(), json!([paper.abs_url]));

    (paper.title, Some(paper.text), metadata)
}

fn github(repo: GitHubRepo) -> Parts {
    let mut metadata = Map::new();
    metadata.insert("owner".into(), json!(repo.owner));
    metadata.insert("description".into(), json!(repo.description));
    metadata.insert("language".into(), json!(repo.language));
    metadata.insert("created_at".into(), json!(repo.created_at));
    metadata.insert("updated_at".into(), json!(repo.updated_at));
    metadata.insert("stars".into(), json!(repo.stars));
    metadata.insert("forks".into(), json!(repo.forks));
    metadata.insert("clone_url".into(), json!(repo.clone_url));
    metadata.insert("html_url".into(), json!(repo.html_url));
    metadata.insert("topics".into(), json!(repo.topics));

    let content = repo
        .readme
        .unwrap_or_else(|| README_UNAVAILABLE.to_string());
    (repo.name, Some(content), metadata)
}

/// `arxiv_papers` is only present when the card had at least one arXiv tag
fn insert_arxiv_papers(metadata: &mut Map<String, Value>, papers: Vec<NestedArxiv>) {
    if !papers.is_empty() {
        metadata.insert("arxiv_papers".into(), json!(papers));
    }
}

fn hub_model(model: HubModel, identifier: &str) -> Parts {
    let mut metadata = Map::new();
    metadata.insert("author".into(), json!(model.author));
    metadata.insert("tags".into(), json!(model.tags));
    metadata.insert("pipeline_tag".into(), json!(model.pipeline_tag));
    metadata.insert("cardData".into(), model.card_data.unwrap_or(Value::Null));
    metadata.insert("downloads".into(), json!(model.downloads));
    metadata.insert("likes".into(), json!(model.likes));
    metadata.insert("library_name".into(), json!(model.library_name));
    metadata.insert("last_modified".into(), json!(model.last_modified));
    insert_arxiv_papers(&mut metadata, model.arxiv_papers);

    let title = model.model_id.unwrap_or_else(|| identifier.to_string());
    let content = model
        .readme
        .unwrap_or_else(|| README_UNAVAILABLE.to_string());
    (Some(title), Some(content), metadata)
}

fn hub_dataset(dataset: HubDataset, identifier: &str) -> Parts {
    let mut metadata = Map::new();
    metadata.insert("author".into(), json!(dataset.author));
    metadata.insert("tags".into(), json!(dataset.tags));
    metadata.insert("features".into(), dataset.features.unwrap_or(Value::Null));
    metadata.insert("cardData".into(), dataset.card_data.unwrap_or(Value::Null));
    metadata.insert("downloads".into(), json!(dataset.downloads));
    metadata.insert("likes".into(), json!(dataset.likes));
    insert_arxiv_papers(&mut metadata, dataset.arxiv_papers);

    let title = dataset.dataset_id.unwrap_or_else(|| {
        identifier
            .strip_prefix("datasets/")
            .unwrap_or(identifier)
            .to_string()
    });
    let content = dataset
        .readme
        .unwrap_or_else(|| README_UNAVAILABLE.to_string());
    (Some(title), Some(content), metadata)
}

fn hub_blog(post: BlogPost) -> Parts {
    let mut metadata = Map::new();
    metadata.insert("author".into(), or_placeholder(post.author, UNKNOWN_AUTHOR));
    metadata.insert(
        "publication_date".into(),
        or_placeholder(post.publication_date, UNKNOWN_DATE),
    );
    metadata.insert("tags".into(), json!(post.tags));
    metadata.insert("url".into(), json!(post.url));

    let title = post.title.unwrap_or_else(|| TITLE_UNAVAILABLE.to_string());
    (Some(title), post.content, metadata)
}

fn space(page: SpacePage) -> Parts {
    let mut metadata = Map::new();
    metadata.insert("creator".into(), or_placeholder(page.creator, UNKNOWN_CREATOR));
    metadata.insert(
        "description".into(),
        or_placeholder(page.description, DESCRIPTION_UNAVAILABLE),
    );
    metadata.insert("tags".into(), json!(page.tags));
    metadata.insert("url".into(), json!(page.url));

    let title = page.title.unwrap_or_else(|| NAME_UNAVAILABLE.to_string());
    (Some(title), page.content, metadata)
}

fn web_page(page: WebPage) -> Parts {
    let mut metadata = Map::new();
    metadata.insert("url".into(), json!(page.url));
    (page.title, page.content, metadata)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SourceKind;

    fn reference(kind: SourceKind, identifier: &str) -> ResolvedReference {
        ResolvedReference::new(kind, identifier)
    }

    #[test]
    fn test_arxiv_metadata() {
        let paper = ArxivPaper {
            arxiv_id: "1611.07004".into(),
            title: Some("Image-to-Image Translation".into()),
            authors: vec!["Phillip Isola".into()],
            summary: Some("We investigate.".into()),
            published: Some("2016-11-21T18:37:33Z".into()),
            primary_category: Some("cs.CV".into()),
            categories: vec!["cs.CV".into(), "cs.AI".into()],
            pdf_url: Some("http://arxiv.org/pdf/1611.07004v3".into()),
            abs_url: "https://arxiv.org/abs/1611.07004".into(),
            text: "Full text".into(),
        };

        let record = normalize(
            &reference(SourceKind::Arxiv, "1611.07004"),
            RawExtraction::Arxiv(paper),
        );

        assert_eq!(record.source_type, SourceKind::Arxiv);
        assert_eq!(record.title.as_deref(), Some("Image-to-Image Translation"));
        assert_eq!(record.content.as_deref(), Some("Full text"));
        assert_eq!(record.metadata["authors"], json!(["Phillip Isola"]));
        assert_eq!(record.metadata["categories"], json!("cs.CV"));
        assert_eq!(record.metadata["all_categories"], json!(["cs.CV", "cs.AI"]));
        assert_eq!(
            record.metadata["links"],
            json!(["https://arxiv.org/abs/1611.07004"])
        );
    }

    #[test]
    fn test_github_readme_placeholder() {
        let repo = GitHubRepo {
            name: Some("gym".into()),
            owner: Some("openai".into()),
            ..Default::default()
        };

        let record = normalize(
            &reference(SourceKind::GitHub, "openai/gym"),
            RawExtraction::GitHub(repo),
        );

        assert_eq!(record.title.as_deref(), Some("gym"));
        assert_eq!(record.content.as_deref(), Some(README_UNAVAILABLE));
        assert_eq!(record.metadata["owner"], json!("openai"));
        assert_eq!(record.metadata["stars"], Value::Null);
    }

    #[test]
    fn test_hub_model_arxiv_papers_only_when_tagged() {
        let model = HubModel {
            model_id: Some("owner/model".into()),
            ..Default::default()
        };
        let record = normalize(
            &reference(SourceKind::HuggingFaceModel, "owner/model"),
            RawExtraction::HuggingFaceModel(model),
        );
        assert!(!record.metadata.contains_key("arxiv_papers"));
        assert_eq!(record.content.as_deref(), Some(README_UNAVAILABLE));
        assert!(record.metadata.contains_key("cardData"));

        let model = HubModel {
            arxiv_papers: vec![NestedArxiv::Failed {
                id: "bad.id".into(),
                error: "Malformed arXiv id: bad.id".into(),
            }],
            ..Default::default()
        };
        let record = normalize(
            &reference(SourceKind::HuggingFaceModel, "owner/model"),
            RawExtraction::HuggingFaceModel(model),
        );
        assert_eq!(record.title.as_deref(), Some("owner/model"));
        assert_eq!(
            record.metadata["arxiv_papers"],
            json!([{"id": "bad.id", "error": "Malformed arXiv id: bad.id"}])
        );
    }

    #[test]
    fn test_hub_dataset_title_fallback() {
        let record = normalize(
            &reference(SourceKind::HuggingFaceDataset, "datasets/squad"),
            RawExtraction::HuggingFaceDataset(HubDataset::default()),
        );
        assert_eq!(record.title.as_deref(), Some("squad"));
        assert_eq!(record.identifier, "datasets/squad");
        assert_eq!(record.metadata["features"], Value::Null);
    }

    #[test]
    fn test_blog_placeholders() {
        let post = BlogPost {
            url: "https://huggingface.co/blog/x".into(),
            ..Default::default()
        };
        let record = normalize(
            &reference(SourceKind::HuggingFaceBlog, "https://huggingface.co/blog/x"),
            RawExtraction::HuggingFaceBlog(post),
        );

        assert_eq!(record.title.as_deref(), Some(TITLE_UNAVAILABLE));
        assert_eq!(record.metadata["author"], json!(UNKNOWN_AUTHOR));
        assert_eq!(record.metadata["publication_date"], json!(UNKNOWN_DATE));
        assert_eq!(record.metadata["tags"], json!([]));
    }

    #[test]
    fn test_space_placeholders() {
        let record = normalize(
            &reference(SourceKind::HuggingFaceSpace, "owner/space"),
            RawExtraction::HuggingFaceSpace(SpacePage::default()),
        );

        assert_eq!(record.title.as_deref(), Some(NAME_UNAVAILABLE));
        assert_eq!(record.metadata["creator"], json!(UNKNOWN_CREATOR));
        assert_eq!(record.metadata["description"], json!(DESCRIPTION_UNAVAILABLE));
    }

    #[test]
    fn test_web_page_keeps_missing_title() {
        let page = WebPage {
            url: "https://example.com/post".into(),
            title: None,
            content: Some("Body".into()),
        };
        let record = normalize(
            &reference(SourceKind::GenericBlog, "https://example.com/post"),
            RawExtraction::GenericBlog(page),
        );

        assert_eq!(record.title, None);
        assert_eq!(record.content.as_deref(), Some("Body"));
        assert_eq!(record.metadata.len(), 1);
        assert_eq!(record.metadata["url"], json!("https://example.com/post"));
    }

    #[test]
    fn test_metadata_never_carries_title_or_content() {
        for raw in [
            RawExtraction::Arxiv(ArxivPaper::default()),
            RawExtraction::GitHub(GitHubRepo::default()),
            RawExtraction::HuggingFaceModel(HubModel::default()),
            RawExtraction::HuggingFaceDataset(HubDataset::default()),
            RawExtraction::HuggingFaceSpace(SpacePage::default()),
            RawExtraction::HuggingFaceBlog(BlogPost::default()),
            RawExtraction::GenericBlog(WebPage::default()),
        ] {
            let kind = raw.kind();
            let record = normalize(&reference(kind, "id"), raw);
            assert!(!record.metadata.contains_key("title"), "{kind:?}");
            assert!(!record.metadata.contains_key("content"), "{kind:?}");
        }
    }
}
