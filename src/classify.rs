//! Affiliation classification.
//!
//! The [`AffiliationClassifier`] trait is the seam between record extraction
//! and the rule deciding whether an affiliation belongs to a company. The
//! default [`KeywordClassifier`] is a case-insensitive substring heuristic:
//! an affiliation is industry-affiliated when it names at least one industry
//! marker and no academic marker.
//!
//! # Known limitations
//!
//! The keyword heuristic is not authoritative. It produces false positives
//! (a company-run research site whose name contains no academic marker but
//! mentions "Corp" as a sponsor) and false negatives (an employer named
//! without any marker word, e.g. "Genentech, South San Francisco"). A
//! research institute owned by a company is treated as academic because
//! "institute" suppresses the industry match. Stricter rules can replace it
//! by implementing [`AffiliationClassifier`].

use serde::{Deserialize, Serialize};

/// Markers that suggest a pharmaceutical or biotech employer
pub const DEFAULT_INDUSTRY_KEYWORDS: &[&str] =
    &["pharma", "biotech", "pharmaceutical", "inc.", "corp", "llc"];

/// Markers that suggest an academic employer; any match suppresses an industry match
pub const DEFAULT_ACADEMIC_KEYWORDS: &[&str] =
    &["university", "college", "institute", "laboratory", "school"];

/// Decides whether a free-text affiliation names an industry employer.
pub trait AffiliationClassifier: Send + Sync + std::fmt::Debug {
    /// Returns true when the affiliation is industry (non-academic).
    ///
    /// Must return false for an empty affiliation.
    fn is_industry(&self, affiliation: &str) -> bool;

    /// Convenience for affiliations that may be absent altogether
    fn is_industry_opt(&self, affiliation: Option<&str>) -> bool {
        affiliation.is_some_and(|a| self.is_industry(a))
    }
}

/// Case-insensitive keyword heuristic over two marker sets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordClassifier {
    /// Lowercased industry markers
    industry: Vec<String>,

    /// Lowercased academic markers
    academic: Vec<String>,
}

impl KeywordClassifier {
    /// Build a classifier from custom marker sets. Markers are matched case-insensitively.
    pub fn new<I, A, S, T>(industry: I, academic: A) -> Self
    where
        I: IntoIterator<Item = S>,
        A: IntoIterator<Item = T>,
        S: AsRef<str>,
        T: AsRef<str>,
    {
        Self {
            industry: normalize(industry),
            academic: normalize(academic),
        }
    }

    pub fn industry_keywords(&self) -> &[String] {
        &self.industry
    }

    pub fn academic_keywords(&self) -> &[String] {
        &self.academic
    }
}

fn normalize<I, S>(keywords: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    keywords
        .into_iter()
        .map(|k| k.as_ref().trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .collect()
}

impl Default for KeywordClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_INDUSTRY_KEYWORDS, DEFAULT_ACADEMIC_KEYWORDS)
    }
}

impl AffiliationClassifier for KeywordClassifier {
    fn is_industry(&self, affiliation: &str) -> bool {
        if affiliation.is_empty() {
            return false;
        }

        let lower = affiliation.to_lowercase();
        let industry = self.industry.iter().any(|k| lower.contains(k.as_str()));

        industry && !self.academic.iter().any(|k| lower.contains(k.as_str()))
    }
}
