//! Bibliographic record model as fetched from the literature database.
//!
//! Every nested field the upstream format may omit is an explicit `Option`.
//! Deciding which omissions are fatal for a record is left to the
//! [`RecordExtractor`](crate::extract::RecordExtractor).

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

static EMAIL_PATTERN: OnceLock<Regex> = OnceLock::new();

fn email_pattern() -> &'static Regex {
    EMAIL_PATTERN.get_or_init(|| {
        Regex::new(r"[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(?:\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}")
            .expect("email pattern is valid")
    })
}

/// Free-text institutional or employer string attached to an author.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Affiliation {
    pub text: String,
}

impl Affiliation {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Contact email embedded in the affiliation text, if any.
    ///
    /// PubMed appends addresses inline, e.g. `"Acme Pharma Inc., Boston, MA.
    /// Electronic address: jdoe@acme.com."`. Trailing punctuation is not part
    /// of the returned address.
    pub fn email(&self) -> Option<&str> {
        email_pattern().find(&self.text).map(|m| m.as_str())
    }
}

/// One entry of a record's author list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    /// Given name(s)
    pub fore_name: Option<String>,

    /// Family name
    pub last_name: Option<String>,

    pub affiliations: Vec<Affiliation>,
}

impl Author {
    pub fn new(fore_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            fore_name: Some(fore_name.into()),
            last_name: Some(last_name.into()),
            affiliations: Vec::new(),
        }
    }

    /// Add an affiliation
    pub fn affiliation(mut self, text: impl Into<String>) -> Self {
        self.affiliations.push(Affiliation::new(text));
        self
    }

    /// Given and family name joined by a single space and trimmed.
    ///
    /// Empty when both parts are absent.
    pub fn full_name(&self) -> String {
        format!(
            "{} {}",
            self.fore_name.as_deref().unwrap_or(""),
            self.last_name.as_deref().unwrap_or("")
        )
        .trim()
        .to_string()
    }
}

/// Publication date parts, each as the upstream service spells it.
///
/// No calendar validation happens here: a month may be `"5"`, `"05"` or `"May"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicationDate {
    pub year: Option<String>,
    pub month: Option<String>,
    pub day: Option<String>,
}

impl PublicationDate {
    pub fn new(year: Option<&str>, month: Option<&str>, day: Option<&str>) -> Self {
        Self {
            year: year.map(str::to_string),
            month: month.map(str::to_string),
            day: day.map(str::to_string),
        }
    }
}

/// Journal issue block of a record; only the publication date is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalIssue {
    pub pub_date: Option<PublicationDate>,
}

/// A fetched article.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BibliographicRecord {
    /// PubMed identifier
    pub pmid: Option<String>,

    pub title: Option<String>,

    pub journal_issue: Option<JournalIssue>,

    /// Ordered author list; `None` when the record carries no author list at all
    pub authors: Option<Vec<Author>>,
}

impl BibliographicRecord {
    /// Identifier for log messages, falling back to a placeholder.
    pub fn display_id(&self) -> &str {
        self.pmid.as_deref().unwrap_or("<unknown>")
    }
}

/// Builder for constructing well-formed records, mostly in tests and mocks
#[derive(Debug, Clone, Default)]
pub struct RecordBuilder {
    record: BibliographicRecord,
}

impl RecordBuilder {
    /// Create a builder with an identifier, an empty author list and no date
    pub fn new(pmid: impl Into<String>) -> Self {
        Self {
            record: BibliographicRecord {
                pmid: Some(pmid.into()),
                title: None,
                journal_issue: Some(JournalIssue::default()),
                authors: Some(Vec::new()),
            },
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.record.title = Some(title.into());
        self
    }

    /// Set the publication date parts
    pub fn pub_date(mut self, date: PublicationDate) -> Self {
        self.record.journal_issue = Some(JournalIssue {
            pub_date: Some(date),
        });
        self
    }

    /// Append an author
    pub fn author(mut self, author: Author) -> Self {
        self.record.authors.get_or_insert_with(Vec::new).push(author);
        self
    }

    pub fn build(self) -> BibliographicRecord {
        self.record
    }
}
