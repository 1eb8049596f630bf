//! Mock source for testing purposes.

use async_trait::async_trait;
use std::sync::Mutex;

use crate::models::{BibliographicRecord, SearchQuery};
use crate::sources::{FetchedRecord, LiteratureSource, SourceError};

/// A mock source that serves predefined records and records the calls it receives.
#[derive(Debug, Default)]
pub struct MockSource {
    records: Mutex<Vec<FetchedRecord>>,
    search_error: Mutex<Option<String>>,
    fetch_error: Mutex<Option<String>>,
    fetch_calls: Mutex<Vec<Vec<String>>>,
}

impl MockSource {
    /// Create a new mock source with no records.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock source serving well-formed records.
    pub fn with_records(records: impl IntoIterator<Item = BibliographicRecord>) -> Self {
        let source = Self::new();
        for record in records {
            source.push(Ok(record));
        }
        source
    }

    /// Append a fetch result, well-formed or not.
    pub fn push(&self, record: FetchedRecord) {
        self.records.lock().unwrap().push(record);
    }

    /// Make `search` fail with an API error.
    pub fn fail_search(&self, message: impl Into<String>) {
        *self.search_error.lock().unwrap() = Some(message.into());
    }

    /// Make `fetch_details` fail with a network error.
    pub fn fail_fetch(&self, message: impl Into<String>) {
        *self.fetch_error.lock().unwrap() = Some(message.into());
    }

    /// Identifier batches passed to `fetch_details` so far.
    pub fn fetch_calls(&self) -> Vec<Vec<String>> {
        self.fetch_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl LiteratureSource for MockSource {
    fn name(&self) -> &str {
        "Mock Source"
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<String>, SourceError> {
        if let Some(message) = self.search_error.lock().unwrap().clone() {
            return Err(SourceError::Api(message));
        }

        let records = self.records.lock().unwrap();
        Ok(records
            .iter()
            .enumerate()
            .map(|(i, r)| match r {
                Ok(record) => record.display_id().to_string(),
                Err(_) => format!("malformed-{}", i),
            })
            .take(query.max_results)
            .collect())
    }

    async fn fetch_details(&self, ids: &[String]) -> Result<Vec<FetchedRecord>, SourceError> {
        self.fetch_calls.lock().unwrap().push(ids.to_vec());

        if let Some(message) = self.fetch_error.lock().unwrap().clone() {
            return Err(SourceError::Network(message));
        }

        let records = self.records.lock().unwrap();
        Ok(records.iter().take(ids.len()).cloned().collect())
    }
}
