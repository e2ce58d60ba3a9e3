//! Registry mapping each source kind to its fetcher.

use std::collections::HashMap;
use std::sync::Arc;

use super::{
    ArxivFetcher, Fetcher, GenericBlogFetcher, GitHubFetcher, HubApi, HuggingFaceBlogFetcher,
    HuggingFaceDatasetFetcher, HuggingFaceModelFetcher, HuggingFaceSpaceFetcher, SourceError,
};
use crate::config::Config;
use crate::models::SourceKind;
use crate::utils::HttpClient;

/// Registry of fetchers keyed by [`SourceKind`]
///
/// Dispatch is a map lookup; registering a fetcher for a kind that already
/// has one replaces it.
#[derive(Debug, Clone, Default)]
pub struct FetcherRegistry {
    fetchers: HashMap<SourceKind, Arc<dyn Fetcher>>,
}

impl FetcherRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with a fetcher for every source kind.
    ///
    /// All fetchers share one HTTP client, and the Hugging Face model and
    /// dataset fetchers share the arXiv fetcher used for tag expansion.
    pub fn from_config(config: &Config) -> Result<Self, SourceError> {
        let client = HttpClient::from_config(&config.http)?;
        let arxiv = Arc::new(ArxivFetcher::from_config(client.clone(), config));
        let hub = HubApi::from_config(client.clone(), config, Arc::clone(&arxiv));

        let mut registry = Self::new();
        registry.register(arxiv);
        registry.register(Arc::new(GitHubFetcher::from_config(client.clone(), config)));
        registry.register(Arc::new(HuggingFaceModelFetcher::new(hub.clone())));
        registry.register(Arc::new(HuggingFaceDatasetFetcher::new(hub)));
        registry.register(Arc::new(HuggingFaceSpaceFetcher::from_config(
            client.clone(),
            config,
        )));
        registry.register(Arc::new(HuggingFaceBlogFetcher::new(client.clone())));
        registry.register(Arc::new(GenericBlogFetcher::new(client)));

        tracing::debug!("Registered {} fetchers", registry.len());
        Ok(registry)
    }

    /// Register a fetcher under its own kind
    pub fn register(&mut self, fetcher: Arc<dyn Fetcher>) {
        self.fetchers.insert(fetcher.kind(), fetcher);
    }

    /// Get the fetcher for a kind
    pub fn get(&self, kind: SourceKind) -> Option<&Arc<dyn Fetcher>> {
        self.fetchers.get(&kind)
    }

    /// Get the fetcher for a kind, returning an error if none is registered
    pub fn get_required(&self, kind: SourceKind) -> Result<&Arc<dyn Fetcher>, SourceError> {
        self.get(kind).ok_or(SourceError::Unsupported(kind))
    }

    /// Registered kinds, in declaration order
    pub fn kinds(&self) -> Vec<SourceKind> {
        SourceKind::ALL
            .into_iter()
            .filter(|kind| self.fetchers.contains_key(kind))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.fetchers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fetchers.is_empty()
    }
}
