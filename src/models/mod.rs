//! Core data models for fetched records and report rows.

mod record;
mod report;
mod search;

pub use record::{
    Affiliation, Author, BibliographicRecord, JournalIssue, PublicationDate, RecordBuilder,
};
pub use report::{
    ReportRow, DATE_SEPARATOR, LIST_SEPARATOR, NOT_AVAILABLE, REPORT_COLUMNS,
};
pub use search::{SearchQuery, DEFAULT_MAX_RESULTS};
