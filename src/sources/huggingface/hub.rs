//! Hugging Face hub API: models, datasets, README probing and arXiv tags.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

use crate::config::Config;
use crate::models::{
    HubDataset, HubModel, NestedArxiv, RawExtraction, ResolvedReference, SourceKind,
};
use crate::normalize::normalize;
use crate::sources::{send_checked, ArxivFetcher, Fetcher, SourceError};
use crate::utils::HttpClient;

/// Prefix the hub uses for paper tags, e.g. `arxiv:1611.07004`
const ARXIV_TAG_PREFIX: &str = "arxiv:";

/// Ids carried by `arxiv:` tags, in tag order
pub fn arxiv_tag_ids(tags: &[String]) -> Vec<String> {
    tags.iter()
        .filter_map(|tag| tag.strip_prefix(ARXIV_TAG_PREFIX))
        .map(|id| id.trim().to_string())
        .collect()
}

#[derive(Debug, Deserialize)]
struct ModelInfo {
    #[serde(rename = "modelId")]
    model_id: Option<String>,
    id: Option<String>,
    author: Option<String>,
    tags: Option<Vec<String>>,
    pipeline_tag: Option<String>,
    #[serde(rename = "cardData")]
    card_data: Option<Value>,
    downloads: Option<u64>,
    likes: Option<u64>,
    library_name: Option<String>,
    #[serde(rename = "lastModified")]
    last_modified: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DatasetInfo {
    id: Option<String>,
    author: Option<String>,
    tags: Option<Vec<String>>,
    features: Option<Value>,
    #[serde(rename = "cardData")]
    card_data: Option<Value>,
    downloads: Option<u64>,
    likes: Option<u64>,
}

/// Shared access to the hub for the model and dataset fetchers
#[derive(Debug, Clone)]
pub struct HubApi {
    client: HttpClient,
    base_url: String,
    token: Option<String>,
    readme_branches: Vec<String>,
    readme_files: Vec<String>,
    arxiv: Arc<ArxivFetcher>,
}

impl HubApi {
    pub fn new(
        client: HttpClient,
        base_url: impl Into<String>,
        token: Option<String>,
        arxiv: Arc<ArxivFetcher>,
    ) -> Self {
        let defaults = crate::config::ExtractionConfig::default();
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
            readme_branches: defaults.readme_branches,
            readme_files: defaults.readme_files,
            arxiv,
        }
    }

    pub fn from_config(client: HttpClient, config: &Config, arxiv: Arc<ArxivFetcher>) -> Self {
        Self::new(
            client,
            config.endpoints.huggingface.clone(),
            config.api_keys.huggingface_token.clone(),
            arxiv,
        )
        .with_readme_candidates(
            config.extraction.readme_branches.clone(),
            config.extraction.readme_files.clone(),
        )
    }

    /// Override the branches and file names probed for READMEs
    pub fn with_readme_candidates(mut self, branches: Vec<String>, files: Vec<String>) -> Self {
        self.readme_branches = branches;
        self.readme_files = files;
        self
    }

    fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.token {
            Some(ref token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, SourceError> {
        tracing::debug!("Querying Hugging Face API: {}", url);
        let response =
            send_checked(self.authorize(self.client.get(url)), "Hugging Face API").await?;
        response.json().await.map_err(|e| {
            SourceError::Parse(format!("Failed to parse Hugging Face response: {}", e))
        })
    }

    /// README probe URLs for `repo_path`, in probing order (branch-major)
    pub fn readme_candidates(&self, repo_path: &str) -> Vec<String> {
        self.readme_branches
            .iter()
            .flat_map(|branch| {
                self.readme_files.iter().map(move |file| {
                    format!("{}/{}/resolve/{}/{}", self.base_url, repo_path, branch, file)
                })
            })
            .collect()
    }

    /// Probe the README candidates one at a time; the first 200 wins.
    ///
    /// Any other status and any transport error count as a miss.
    pub async fn fetch_readme(&self, repo_path: &str) -> Option<String> {
        for url in self.readme_candidates(repo_path) {
            let response = match self.authorize(self.client.get(&url)).send().await {
                Ok(response) => response,
                Err(e) => {
                    tracing::debug!("README probe {} failed: {}", url, e);
                    continue;
                }
            };

            if response.status() != reqwest::StatusCode::OK {
                tracing::debug!("README probe {} returned {}", url, response.status());
                continue;
            }

            match response.text().await {
                Ok(text) => return Some(text),
                Err(e) => tracing::debug!("README probe {} body unreadable: {}", url, e),
            }
        }

        tracing::warn!("No README found for {}", repo_path);
        None
    }

    /// Fetch every paper referenced by an `arxiv:` tag, in tag order.
    ///
    /// Malformed ids are not fetched. A failed paper becomes a placeholder and
    /// never fails the parent.
    pub async fn expand_arxiv_tags(&self, tags: &[String]) -> Vec<NestedArxiv> {
        let mut papers = Vec::new();

        for id in arxiv_tag_ids(tags) {
            if !ArxivFetcher::is_valid_id(&id) {
                tracing::warn!("Skipping malformed arXiv tag: {}", id);
                papers.push(NestedArxiv::Failed {
                    error: format!("Malformed arXiv id: {}", id),
                    id,
                });
                continue;
            }

            match self.arxiv.fetch(&id).await {
                Ok(raw) => {
                    let reference = ResolvedReference::new(SourceKind::Arxiv, id.as_str());
                    papers.push(NestedArxiv::Found(Box::new(normalize(&reference, raw))));
                }
                Err(e) => {
                    tracing::warn!("Nested arXiv lookup for {} failed: {}", id, e);
                    papers.push(NestedArxiv::Failed {
                        id,
                        error: e.to_string(),
                    });
                }
            }
        }

        papers
    }

    /// Fetch a model card with its README and tagged papers
    pub async fn fetch_model(&self, model_id: &str) -> Result<HubModel, SourceError> {
        let info: ModelInfo = self
            .get_json(&format!("{}/api/models/{}", self.base_url, model_id))
            .await?;

        let tags = info.tags.unwrap_or_default();
        let readme = self.fetch_readme(model_id).await;
        let arxiv_papers = self.expand_arxiv_tags(&tags).await;

        Ok(HubModel {
            model_id: info.model_id.or(info.id),
            author: info.author,
            tags,
            pipeline_tag: info.pipeline_tag,
            card_data: info.card_data,
            downloads: info.downloads,
            likes: info.likes,
            library_name: info.library_name,
            last_modified: info.last_modified,
            readme,
            arxiv_papers,
        })
    }

    /// Fetch a dataset card; `identifier` carries the `datasets/` prefix
    pub async fn fetch_dataset(&self, identifier: &str) -> Result<HubDataset, SourceError> {
        let name = identifier.strip_prefix("datasets/").unwrap_or(identifier);
        if name.is_empty() {
            return Err(SourceError::InvalidReference(format!(
                "Dataset identifier without a name: {}",
                identifier
            )));
        }

        let info: DatasetInfo = self
            .get_json(&format!("{}/api/datasets/{}", self.base_url, name))
            .await?;

        let tags = info.tags.unwrap_or_default();
        let readme = self.fetch_readme(&format!("datasets/{}", name)).await;
        let arxiv_papers = self.expand_arxiv_tags(&tags).await;

        Ok(HubDataset {
            dataset_id: info.id,
            author: info.author,
            tags,
            features: info.features,
            card_data: info.card_data,
            downloads: info.downloads,
            likes: info.likes,
            readme,
            arxiv_papers,
        })
    }
}

/// Hugging Face model fetcher
#[derive(Debug, Clone)]
pub struct HuggingFaceModelFetcher {
    hub: HubApi,
}

impl HuggingFaceModelFetcher {
    pub fn new(hub: HubApi) -> Self {
        Self { hub }
    }
}

#[async_trait]
impl Fetcher for HuggingFaceModelFetcher {
    fn kind(&self) -> SourceKind {
        SourceKind::HuggingFaceModel
    }

    async fn fetch(&self, identifier: &str) -> Result<RawExtraction, SourceError> {
        self.hub
            .fetch_model(identifier)
            .await
            .map(RawExtraction::HuggingFaceModel)
    }
}

/// Hugging Face dataset fetcher
#[derive(Debug, Clone)]
pub struct HuggingFaceDatasetFetcher {
    hub: HubApi,
}

impl HuggingFaceDatasetFetcher {
    pub fn new(hub: HubApi) -> Self {
        Self { hub }
    }
}

#[async_trait]
impl Fetcher for HuggingFaceDatasetFetcher {
    fn kind(&self) -> SourceKind {
        SourceKind::HuggingFaceDataset
    }

    async fn fetch(&self, identifier: &str) -> Result<RawExtraction, SourceError> {
        self.hub
            .fetch_dataset(identifier)
            .await
            .map(RawExtraction::HuggingFaceDataset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::arxiv::tests::atom_feed;
    use mockito::Matcher;

    fn hub(server: &mockito::ServerGuard, scratch: &std::path::Path) -> HubApi {
        let client = HttpClient::new().unwrap();
        let arxiv = ArxivFetcher::new(
            client.clone(),
            format!("{}/api/query", server.url()),
            scratch,
        );
        HubApi::new(client, server.url(), None, Arc::new(arxiv))
    }

    #[test]
    fn test_arxiv_tag_ids() {
        let tags = vec![
            "transformers".to_string(),
            "arxiv:1611.07004".to_string(),
            "license:mit".to_string(),
            "arxiv:bad.id".to_string(),
        ];
        assert_eq!(arxiv_tag_ids(&tags), vec!["1611.07004", "bad.id"]);
        assert!(arxiv_tag_ids(&[]).is_empty());
    }

    #[tokio::test]
    async fn test_readme_candidates_order() {
        let server = mockito::Server::new_async().await;
        let scratch = tempfile::tempdir().unwrap();
        let candidates = hub(&server, scratch.path()).readme_candidates("owner/model");

        let paths: Vec<String> = candidates
            .iter()
            .map(|u| u.trim_start_matches(&server.url()).to_string())
            .collect();
        assert_eq!(
            paths,
            vec![
                "/owner/model/resolve/main/README.md",
                "/owner/model/resolve/main/README.rst",
                "/owner/model/resolve/main/README.txt",
                "/owner/model/resolve/master/README.md",
                "/owner/model/resolve/master/README.rst",
                "/owner/model/resolve/master/README.txt",
            ]
        );
    }

    #[tokio::test]
    async fn test_readme_probing_finds_later_candidate() {
        let mut server = mockito::Server::new_async().await;
        let found = server
            .mock("GET", "/owner/model/resolve/master/README.rst")
            .with_status(200)
            .with_body("Model card in reStructuredText")
            .create_async()
            .await;
        let later = server
            .mock("GET", "/owner/model/resolve/master/README.txt")
            .with_status(200)
            .with_body("should not be requested")
            .expect(0)
            .create_async()
            .await;
        let _misses = server
            .mock("GET", Matcher::Regex(r"^/owner/model/resolve/".to_string()))
            .with_status(404)
            .create_async()
            .await;

        let scratch = tempfile::tempdir().unwrap();
        let readme = hub(&server, scratch.path()).fetch_readme("owner/model").await;

        assert_eq!(readme.as_deref(), Some("Model card in reStructuredText"));
        found.assert_async().await;
        later.assert_async().await;
    }

    #[tokio::test]
    async fn test_readme_probing_exhausted() {
        let mut server = mockito::Server::new_async().await;
        let misses = server
            .mock("GET", Matcher::Regex(r"^/owner/model/resolve/".to_string()))
            .with_status(404)
            .expect(6)
            .create_async()
            .await;

        let scratch = tempfile::tempdir().unwrap();
        let readme = hub(&server, scratch.path()).fetch_readme("owner/model").await;

        assert_eq!(readme, None);
        misses.assert_async().await;
    }

    #[tokio::test]
    async fn test_expand_arxiv_tags_isolates_failures() {
        let mut server = mockito::Server::new_async().await;
        let _api = server
            .mock("GET", "/api/query")
            .match_query(Matcher::UrlEncoded("id_list".into(), "1611.07004".into()))
            .with_status(200)
            .with_body(atom_feed(&server.url(), "1611.07004"))
            .create_async()
            .await;
        let _pdf = server
            .mock("GET", "/pdf/1611.07004v3")
            .with_status(500)
            .create_async()
            .await;

        let scratch = tempfile::tempdir().unwrap();
        let tags = vec![
            "arxiv:1611.07004".to_string(),
            "arxiv:bad.id".to_string(),
        ];
        let papers = hub(&server, scratch.path()).expand_arxiv_tags(&tags).await;

        assert_eq!(papers.len(), 2);
        match &papers[0] {
            NestedArxiv::Found(record) => {
                assert_eq!(record.identifier, "1611.07004");
                assert_eq!(record.source_type, SourceKind::Arxiv);
                assert!(record.title.is_some());
            }
            other => panic!("expected a nested record, got {:?}", other),
        }
        match &papers[1] {
            NestedArxiv::Failed { id, error } => {
                assert_eq!(id, "bad.id");
                assert!(!error.is_empty());
            }
            other => panic!("expected a placeholder, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_model() {
        let mut server = mockito::Server::new_async().await;
        let _info = server
            .mock("GET", "/api/models/google-bert/bert-base-uncased")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "_id": "621ffdc036468d709f174338",
                    "id": "google-bert/bert-base-uncased",
                    "modelId": "google-bert/bert-base-uncased",
                    "author": "google-bert",
                    "tags": ["transformers", "fill-mask", "en"],
                    "pipeline_tag": "fill-mask",
                    "library_name": "transformers",
                    "downloads": 1000,
                    "likes": 42,
                    "lastModified": "2024-02-19T11:06:12.000Z",
                    "cardData": {"language": "en", "license": "apache-2.0"}
                }"#,
            )
            .create_async()
            .await;
        let _readme = server
            .mock("GET", "/google-bert/bert-base-uncased/resolve/main/README.md")
            .with_status(200)
            .with_body("# BERT base model (uncased)")
            .create_async()
            .await;

        let scratch = tempfile::tempdir().unwrap();
        let model = hub(&server, scratch.path())
            .fetch_model("google-bert/bert-base-uncased")
            .await
            .unwrap();

        assert_eq!(model.author.as_deref(), Some("google-bert"));
        assert_eq!(model.pipeline_tag.as_deref(), Some("fill-mask"));
        assert_eq!(model.tags.len(), 3);
        assert_eq!(model.likes, Some(42));
        assert_eq!(model.readme.as_deref(), Some("# BERT base model (uncased)"));
        assert!(model.arxiv_papers.is_empty());
        assert_eq!(
            model.card_data.unwrap()["license"],
            serde_json::json!("apache-2.0")
        );
    }

    #[tokio::test]
    async fn test_fetch_dataset_strips_prefix() {
        let mut server = mockito::Server::new_async().await;
        let info = server
            .mock("GET", "/api/datasets/squad")
            .with_status(200)
            .with_body(r#"{"id": "squad", "author": null, "tags": ["task_categories:question-answering"]}"#)
            .create_async()
            .await;
        let readme = server
            .mock("GET", "/datasets/squad/resolve/main/README.md")
            .with_status(200)
            .with_body("# Dataset Card for SQuAD")
            .create_async()
            .await;

        let scratch = tempfile::tempdir().unwrap();
        let dataset = hub(&server, scratch.path())
            .fetch_dataset("datasets/squad")
            .await
            .unwrap();

        info.assert_async().await;
        readme.assert_async().await;
        assert_eq!(dataset.dataset_id.as_deref(), Some("squad"));
        assert_eq!(dataset.author, None);
        assert_eq!(dataset.readme.as_deref(), Some("# Dataset Card for SQuAD"));
    }

    #[tokio::test]
    async fn test_fetch_model_upstream_failure() {
        let mut server = mockito::Server::new_async().await;
        let _info = server
            .mock("GET", "/api/models/owner/missing")
            .with_status(401)
            .create_async()
            .await;

        let scratch = tempfile::tempdir().unwrap();
        let err = hub(&server, scratch.path())
            .fetch_model("owner/missing")
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(401));
    }
}
