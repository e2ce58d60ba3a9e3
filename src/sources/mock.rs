//! Mock fetcher for testing purposes.

use async_trait::async_trait;
use std::sync::Mutex;

use crate::models::{RawExtraction, SourceKind};
use crate::sources::{Fetcher, SourceError};

/// A mock fetcher that returns a predefined extraction and records the
/// identifiers it was asked for.
#[derive(Debug)]
pub struct MockFetcher {
    kind: SourceKind,
    response: Mutex<Option<RawExtraction>>,
    calls: Mutex<Vec<String>>,
}

impl MockFetcher {
    /// Create a mock with no configured response
    pub fn new(kind: SourceKind) -> Self {
        Self {
            kind,
            response: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Create a mock that answers with `response`
    pub fn with_response(response: RawExtraction) -> Self {
        let mock = Self::new(response.kind());
        mock.set_response(response);
        mock
    }

    /// Set the extraction to return.
    pub fn set_response(&self, response: RawExtraction) {
        let mut guard = self.response.lock().unwrap_or_else(|e| e.into_inner());
        *guard = Some(response);
    }

    /// Identifiers passed to `fetch`, oldest first
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    fn kind(&self) -> SourceKind {
        self.kind
    }

    fn name(&self) -> &str {
        "Mock Fetcher"
    }

    async fn fetch(&self, identifier: &str) -> Result<RawExtraction, SourceError> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(identifier.to_string());

        let guard = self.response.lock().unwrap_or_else(|e| e.into_inner());
        match &*guard {
            Some(response) => Ok(response.clone()),
            None => Err(SourceError::NotFound(format!(
                "No mock response for {}",
                identifier
            ))),
        }
    }
}
