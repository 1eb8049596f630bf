//! The end-to-end run: search, fetch, extract.
//!
//! Strictly sequential. One search request, one fetch request, then a single
//! pass over the fetched records. Search and fetch failures abort the run;
//! a record that cannot be processed is skipped, logged and counted.

use std::sync::Arc;

use crate::extract::{RecordError, RecordExtractor};
use crate::models::{ReportRow, SearchQuery};
use crate::sources::{LiteratureSource, SourceError};

/// Fatal run failures
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Failed to search {source_name}: {error}")]
    Search {
        source_name: String,
        #[source]
        error: SourceError,
    },

    #[error("Failed to fetch paper details from {source_name}: {error}")]
    Fetch {
        source_name: String,
        #[source]
        error: SourceError,
    },
}

/// Result of a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Rows for qualifying papers, in the order the service returned them
    pub rows: Vec<ReportRow>,

    /// Number of identifiers the search returned
    pub matched: usize,

    /// Number of records the fetch returned
    pub fetched: usize,

    /// Records that were skipped
    pub skipped: Vec<RecordError>,
}

impl RunReport {
    /// Fetched records that were processed but had no industry author
    pub fn dropped(&self) -> usize {
        self.fetched - self.rows.len() - self.skipped.len()
    }
}

/// Drives a source and an extractor over one query
#[derive(Debug, Clone)]
pub struct Pipeline {
    source: Arc<dyn LiteratureSource>,
    extractor: RecordExtractor,
}

impl Pipeline {
    pub fn new(source: Arc<dyn LiteratureSource>, extractor: RecordExtractor) -> Self {
        Self { source, extractor }
    }

    pub async fn run(&self, query: &SearchQuery) -> Result<RunReport, PipelineError> {
        let ids = self
            .source
            .search(query)
            .await
            .map_err(|error| PipelineError::Search {
                source_name: self.source.name().to_string(),
                error,
            })?;
        tracing::debug!("Search returned {} ids", ids.len());

        let mut report = RunReport {
            matched: ids.len(),
            ..Default::default()
        };

        if ids.is_empty() {
            return Ok(report);
        }

        let records = self
            .source
            .fetch_details(&ids)
            .await
            .map_err(|error| PipelineError::Fetch {
                source_name: self.source.name().to_string(),
                error,
            })?;
        report.fetched = records.len();

        for fetched in records {
            let outcome = fetched.and_then(|record| {
                let row = self.extractor.extract(&record)?;
                tracing::debug!(
                    "Processed paper {}: {}",
                    record.display_id(),
                    record.title.as_deref().unwrap_or_default()
                );
                Ok(row)
            });

            match outcome {
                Ok(Some(row)) => report.rows.push(row),
                Ok(None) => {}
                Err(error) => {
                    tracing::warn!("Skipping record: {}", error);
                    report.skipped.push(error);
                }
            }
        }

        Ok(report)
    }
}
