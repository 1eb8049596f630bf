//! Record extraction: turns one nested bibliographic record into at most one
//! flat [`ReportRow`].
//!
//! A row is produced only when at least one author holds an affiliation the
//! classifier flags as industry. Records without such an author are dropped
//! (`Ok(None)`); records missing a required nested block fail with a
//! [`RecordError`] so the caller can skip them and carry on.

use std::sync::Arc;

use crate::classify::{AffiliationClassifier, KeywordClassifier};
use crate::models::{
    BibliographicRecord, ReportRow, DATE_SEPARATOR, LIST_SEPARATOR, NOT_AVAILABLE,
};

/// Per-record failure. Never fatal for a run.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    /// A nested block every record is expected to carry is absent
    #[error("record {}: missing {field}", .pmid.as_deref().unwrap_or("<unknown>"))]
    MissingField {
        pmid: Option<String>,
        field: &'static str,
    },

    /// The record could not be decoded at all
    #[error("record #{index}: malformed ({message})")]
    Malformed { index: usize, message: String },
}

/// Outcome of processing one record
pub type RecordResult = Result<Option<ReportRow>, RecordError>;

/// Extracts report rows using a pluggable affiliation classifier
#[derive(Debug, Clone)]
pub struct RecordExtractor {
    classifier: Arc<dyn AffiliationClassifier>,
}

impl Default for RecordExtractor {
    fn default() -> Self {
        Self::new(Arc::new(KeywordClassifier::default()))
    }
}

impl RecordExtractor {
    pub fn new(classifier: Arc<dyn AffiliationClassifier>) -> Self {
        Self { classifier }
    }

    /// Produce zero or one report row for a record
    pub fn extract(&self, record: &BibliographicRecord) -> RecordResult {
        let missing = |field: &'static str| RecordError::MissingField {
            pmid: record.pmid.clone(),
            field,
        };

        let pmid = record.pmid.as_deref().ok_or_else(|| missing("PMID"))?;
        let journal_issue = record
            .journal_issue
            .as_ref()
            .ok_or_else(|| missing("JournalIssue"))?;
        let authors = record.authors.as_ref().ok_or_else(|| missing("AuthorList"))?;

        let title = record.title.as_deref().unwrap_or(NOT_AVAILABLE);

        let date = journal_issue.pub_date.as_ref();
        let publication_date = [
            date.and_then(|d| d.year.as_deref()).unwrap_or(NOT_AVAILABLE),
            date.and_then(|d| d.month.as_deref()).unwrap_or(NOT_AVAILABLE),
            date.and_then(|d| d.day.as_deref()).unwrap_or(NOT_AVAILABLE),
        ]
        .join(DATE_SEPARATOR);

        let mut names = Vec::new();
        let mut affiliations = Vec::new();
        for author in authors {
            for affiliation in &author.affiliations {
                if self.classifier.is_industry(&affiliation.text) {
                    names.push(author.full_name());
                    affiliations.push(affiliation.text.as_str());
                }
            }
        }

        if names.is_empty() {
            tracing::debug!("Record {} has no industry-affiliated authors", pmid);
            return Ok(None);
        }

        // First embedded address across the whole author list, flagged or not
        let email = authors
            .iter()
            .flat_map(|a| a.affiliations.iter())
            .find_map(|aff| aff.email())
            .unwrap_or(NOT_AVAILABLE);

        Ok(Some(ReportRow {
            pubmed_id: pmid.to_string(),
            title: title.to_string(),
            publication_date,
            non_academic_authors: names.join(LIST_SEPARATOR),
            company_affiliations: affiliations.join(LIST_SEPARATOR),
            corresponding_email: email.to_string(),
        }))
    }
}
