//! GitHub repository fetcher.

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::Config;
use crate::models::{GitHubRepo, RawExtraction, SourceKind};
use crate::sources::{send_checked, Fetcher, SourceError};
use crate::utils::HttpClient;

#[derive(Debug, Deserialize)]
struct GhRepo {
    name: String,
    owner: GhOwner,
    description: Option<String>,
    language: Option<String>,
    created_at: Option<String>,
    updated_at: Option<String>,
    stargazers_count: Option<u64>,
    forks_count: Option<u64>,
    clone_url: Option<String>,
    html_url: Option<String>,
    #[serde(default)]
    topics: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct GhOwner {
    login: String,
}

/// GitHub fetcher
///
/// Uses the REST API for repository metadata and the raw media type of the
/// readme endpoint for the README body.
#[derive(Debug, Clone)]
pub struct GitHubFetcher {
    client: HttpClient,
    api_base: String,
    token: Option<String>,
}

impl GitHubFetcher {
    pub fn new(client: HttpClient, api_base: impl Into<String>, token: Option<String>) -> Self {
        Self {
            client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            token,
        }
    }

    pub fn from_config(client: HttpClient, config: &Config) -> Self {
        Self::new(
            client,
            config.endpoints.github_api.clone(),
            config.api_keys.github_token.clone(),
        )
    }

    /// Add the bearer token to request headers if available
    fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.token {
            Some(ref token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Fetch repository metadata and README
    pub async fn fetch_repo(&self, repo_id: &str) -> Result<GitHubRepo, SourceError> {
        let Some((owner, repo)) = repo_id.split_once('/') else {
            return Err(SourceError::InvalidReference(format!(
                "GitHub identifier must be owner/repo: {}",
                repo_id
            )));
        };

        let url = format!("{}/repos/{}/{}", self.api_base, owner, repo);
        tracing::debug!("Fetching GitHub repository: {}", url);

        let response = send_checked(
            self.authorize(
                self.client
                    .get(&url)
                    .header("Accept", "application/vnd.github+json"),
            ),
            "GitHub API",
        )
        .await?;

        let data: GhRepo = response
            .json()
            .await
            .map_err(|e| SourceError::Parse(format!("Failed to parse GitHub response: {}", e)))?;

        let readme = match self.fetch_readme(owner, repo).await {
            Ok(readme) => Some(readme),
            Err(e) => {
                tracing::warn!("README unavailable for {}: {}", repo_id, e);
                None
            }
        };

        Ok(GitHubRepo {
            name: Some(data.name),
            owner: Some(data.owner.login),
            description: data.description,
            language: data.language,
            created_at: data.created_at,
            updated_at: data.updated_at,
            stars: data.stargazers_count,
            forks: data.forks_count,
            clone_url: data.clone_url,
            html_url: data.html_url,
            topics: data.topics,
            readme,
        })
    }

    async fn fetch_readme(&self, owner: &str, repo: &str) -> Result<String, SourceError> {
        let url = format!("{}/repos/{}/{}/readme", self.api_base, owner, repo);
        let response = send_checked(
            self.authorize(
                self.client
                    .get(&url)
                    .header("Accept", "application/vnd.github.v3.raw"),
            ),
            "GitHub readme",
        )
        .await?;

        response
            .text()
            .await
            .map_err(|e| SourceError::Network(format!("Failed to read README: {}", e)))
    }
}

#[async_trait]
impl Fetcher for GitHubFetcher {
    fn kind(&self) -> SourceKind {
        SourceKind::GitHub
    }

    async fn fetch(&self, identifier: &str) -> Result<RawExtraction, SourceError> {
        self.fetch_repo(identifier).await.map(RawExtraction::GitHub)
    }
}
