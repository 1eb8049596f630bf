//! Report row model: one flat summary line per qualifying paper.

use serde::{Deserialize, Serialize};

/// Placeholder for absent values. Not an error signal.
pub const NOT_AVAILABLE: &str = "N/A";

/// Separator used when joining multi-valued fields (authors, affiliations)
pub const LIST_SEPARATOR: &str = "; ";

/// Separator between publication date parts
pub const DATE_SEPARATOR: &str = "-";

/// Report column names, in output order
pub const REPORT_COLUMNS: [&str; 6] = [
    "PubmedID",
    "Title",
    "Publication Date",
    "Non-academic Author(s)",
    "Company Affiliation(s)",
    "Corresponding Author Email",
];

/// One output row summarizing a paper with at least one industry-affiliated author.
///
/// Serde names match [`REPORT_COLUMNS`] so the CSV header is derived from the struct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRow {
    #[serde(rename = "PubmedID")]
    pub pubmed_id: String,

    #[serde(rename = "Title")]
    pub title: String,

    #[serde(rename = "Publication Date")]
    pub publication_date: String,

    /// Flagged author names joined by [`LIST_SEPARATOR`]
    #[serde(rename = "Non-academic Author(s)")]
    pub non_academic_authors: String,

    /// Company affiliation texts joined by [`LIST_SEPARATOR`]
    #[serde(rename = "Company Affiliation(s)")]
    pub company_affiliations: String,

    #[serde(rename = "Corresponding Author Email")]
    pub corresponding_email: String,
}

impl ReportRow {
    /// Field values in [`REPORT_COLUMNS`] order
    pub fn fields(&self) -> [&str; 6] {
        [
            &self.pubmed_id,
            &self.title,
            &self.publication_date,
            &self.non_academic_authors,
            &self.company_affiliations,
            &self.corresponding_email,
        ]
    }
}
