//! The extraction facade: resolve, dispatch, normalize.

use crate::batch::BatchItem;
use crate::config::Config;
use crate::models::{ExtractedRecord, ResolvedReference};
use crate::normalize::normalize;
use crate::sources::{resolve, FetcherRegistry, SourceError};

/// Resolves raw inputs and extracts them through a [`FetcherRegistry`]
#[derive(Debug, Clone)]
pub struct Extractor {
    registry: FetcherRegistry,
}

impl Extractor {
    /// Create an extractor with every fetcher built from `config`
    pub fn new(config: &Config) -> Result<Self, SourceError> {
        Ok(Self::with_registry(FetcherRegistry::from_config(config)?))
    }

    pub fn with_registry(registry: FetcherRegistry) -> Self {
        Self { registry }
    }

    /// Classify `input` without fetching anything
    pub fn resolve(&self, input: &str) -> Result<ResolvedReference, SourceError> {
        resolve(input)
    }

    /// Resolve `input`, fetch it and normalize the result
    pub async fn extract(&self, input: &str) -> Result<ExtractedRecord, SourceError> {
        let reference = self.resolve(input)?;
        self.extract_reference(&reference).await
    }

    /// Fetch and normalize an already resolved reference
    pub async fn extract_reference(
        &self,
        reference: &ResolvedReference,
    ) -> Result<ExtractedRecord, SourceError> {
        let fetcher = self.registry.get_required(reference.kind)?;
        tracing::debug!(
            "Fetching {} via {}",
            reference.identifier,
            fetcher.name()
        );

        let raw = fetcher.fetch(&reference.identifier).await?;
        let record = normalize(reference, raw);

        tracing::info!(
            source = %reference.kind.id(),
            identifier = %reference.identifier,
            "Extracted document"
        );
        Ok(record)
    }

    /// Extract every input in order; a failure is recorded on its item and
    /// never stops the batch
    pub async fn extract_batch<I, S>(&self, inputs: I) -> Vec<BatchItem>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.extract_batch_with(inputs, |_| {}).await
    }

    /// Like [`Extractor::extract_batch`], calling `on_item` after each entry
    pub async fn extract_batch_with<I, S, F>(&self, inputs: I, mut on_item: F) -> Vec<BatchItem>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        F: FnMut(&BatchItem),
    {
        let mut items = Vec::new();

        for input in inputs {
            let input = input.as_ref();
            let result = self.extract(input).await;
            if let Err(ref e) = result {
                tracing::warn!("Failed to extract {}: {}", input, e);
            }

            let item = BatchItem::from_result(input, result);
            on_item(&item);
            items.push(item);
        }

        items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::BatchStatus;
    use crate::models::{GitHubRepo, RawExtraction, SourceKind};
    use crate::sources::MockFetcher;
    use std::sync::Arc;

    fn github_mock() -> Arc<MockFetcher> {
        Arc::new(MockFetcher::with_response(RawExtraction::GitHub(GitHubRepo {
            name: Some("gym".into()),
            owner: Some("openai".into()),
            readme: Some("# Gym".into()),
            ..Default::default()
        })))
    }

    #[tokio::test]
    async fn test_extract_dispatches_by_kind() {
        let mock = github_mock();
        let mut registry = FetcherRegistry::new();
        registry.register(mock.clone());
        let extractor = Extractor::with_registry(registry);

        let record = extractor
            .extract("https://github.com/openai/gym/tree/master")
            .await
            .unwrap();

        assert_eq!(mock.calls(), vec!["openai/gym"]);
        assert_eq!(record.source_type, SourceKind::GitHub);
        assert_eq!(record.identifier, "openai/gym");
        assert_eq!(record.title.as_deref(), Some("gym"));
        assert_eq!(record.content.as_deref(), Some("# Gym"));
    }

    #[tokio::test]
    async fn test_extract_invalid_reference_fetches_nothing() {
        let mock = github_mock();
        let mut registry = FetcherRegistry::new();
        registry.register(mock.clone());
        let extractor = Extractor::with_registry(registry);

        let result = extractor.extract("https://github.com/onlyowner").await;
        assert!(matches!(result, Err(SourceError::InvalidReference(_))));
        assert!(mock.calls().is_empty());
    }

    #[tokio::test]
    async fn test_extract_unregistered_kind() {
        let extractor = Extractor::with_registry(FetcherRegistry::new());
        let result = extractor.extract("1611.07004").await;
        assert!(matches!(result, Err(SourceError::Unsupported(SourceKind::Arxiv))));
    }

    #[tokio::test]
    async fn test_batch_continues_past_failures() {
        let mut registry = FetcherRegistry::new();
        registry.register(github_mock());
        let extractor = Extractor::with_registry(registry);

        let mut seen = 0;
        let items = extractor
            .extract_batch_with(
                [
                    "https://github.com/onlyowner",
                    "https://github.com/openai/gym",
                    "1611.07004",
                ],
                |_| seen += 1,
            )
            .await;

        assert_eq!(seen, 3);
        let statuses: Vec<BatchStatus> = items.iter().map(|i| i.status).collect();
        assert_eq!(
            statuses,
            vec![BatchStatus::Error, BatchStatus::Ok, BatchStatus::Error]
        );
        assert_eq!(items[1].record.as_ref().unwrap().identifier, "openai/gym");
        assert!(items[2].error.as_deref().unwrap().contains("arXiv"));
    }
}
