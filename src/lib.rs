//! # Pharma Papers
//!
//! Search PubMed and report papers with at least one author affiliated with a
//! pharmaceutical or biotech company.
//!
//! ## Architecture
//!
//! - [`models`]: fetched records, report rows and the search query
//! - [`sources`]: the search/fetch interface and its NCBI E-utilities implementation
//! - [`classify`]: affiliation classification (keyword heuristic behind a trait)
//! - [`extract`]: record to report row extraction
//! - [`pipeline`]: sequential search, fetch and extraction run
//! - [`report`]: CSV file and console table output
//! - [`config`]: layered configuration
//! - [`utils`]: HTTP client construction

pub mod classify;
pub mod config;
pub mod extract;
pub mod models;
pub mod pipeline;
pub mod report;
pub mod sources;
pub mod utils;

// Re-export commonly used types
pub use classify::{AffiliationClassifier, KeywordClassifier};
pub use extract::{RecordError, RecordExtractor};
pub use models::{BibliographicRecord, ReportRow, SearchQuery};
pub use pipeline::{Pipeline, RunReport};
pub use sources::{LiteratureSource, PubMedSource};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
