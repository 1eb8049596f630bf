//! Literature database sources.
//!
//! The [`LiteratureSource`] trait is the collaborator the pipeline consumes:
//! a search returning record identifiers, and a single batched fetch
//! returning the records behind them. Both are one-shot calls; a failure of
//! either aborts the run. Within a fetched batch each record is decoded
//! independently, so one bad record shows up as a [`RecordError`] entry
//! instead of failing the batch.

mod pubmed;

pub mod mock;

pub use mock::MockSource;
pub use pubmed::PubMedSource;

use crate::extract::RecordError;
use crate::models::{BibliographicRecord, SearchQuery};
use async_trait::async_trait;

/// One entry of a fetched batch
pub type FetchedRecord = Result<BibliographicRecord, RecordError>;

/// Interface for searching and fetching bibliographic records.
#[async_trait]
pub trait LiteratureSource: Send + Sync + std::fmt::Debug {
    /// Human-readable name of this source
    fn name(&self) -> &str;

    /// Identifiers of records matching the query, in the order the service returns them
    async fn search(&self, query: &SearchQuery) -> Result<Vec<String>, SourceError>;

    /// Fetch full records for the given identifiers in a single request
    async fn fetch_details(&self, ids: &[String]) -> Result<Vec<FetchedRecord>, SourceError>;
}

/// Errors that can occur when interacting with a source
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Network or HTTP error
    #[error("Network error: {0}")]
    Network(String),

    /// Parsing error of a response envelope
    #[error("Parse error: {0}")]
    Parse(String),

    /// Invalid request parameters
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// API error from the source
    #[error("API error: {0}")]
    Api(String),

    /// IO error (file system)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        SourceError::Network(err.to_string())
    }
}
