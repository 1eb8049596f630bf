//! PubMed source implementation using the NCBI E-utilities API.
//!
//! `esearch` returns the identifiers matching a query; one `efetch` call then
//! returns every record as XML. The fetch envelope is split into one fragment
//! per `PubmedArticle` so a single undecodable article costs only that
//! article, not the batch.

use async_trait::async_trait;
use quick_xml::de::from_str;
use quick_xml::events::Event;
use quick_xml::Reader;
use regex::Regex;
use serde::Deserialize;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use crate::config::Config;
use crate::extract::RecordError;
use crate::models::{
    Affiliation, Author, BibliographicRecord, JournalIssue, PublicationDate, SearchQuery,
};
use crate::sources::{FetchedRecord, LiteratureSource, SourceError};
use crate::utils::HttpClient;

static INLINE_MARKUP: OnceLock<Regex> = OnceLock::new();

/// Formatting tags PubMed allows inside titles and affiliations
fn inline_markup() -> &'static Regex {
    INLINE_MARKUP.get_or_init(|| {
        Regex::new(r"</?(?:i|b|u|sup|sub)(?:\s[^>]*)?/?>").expect("markup pattern is valid")
    })
}

/// PubMed research source
///
/// The caller identity (`email`, `tool`, optional `api_key`) travels with
/// every request as the NCBI usage policy asks.
#[derive(Debug, Clone)]
pub struct PubMedSource {
    client: Arc<HttpClient>,
    base_url: String,
    email: String,
    tool: String,
    api_key: Option<String>,
}

impl PubMedSource {
    /// Create a new PubMed source from configuration
    pub fn new(config: &Config) -> Result<Self, SourceError> {
        let client = HttpClient::new(Duration::from_secs(config.timeout_secs))?;
        Self::with_client(Arc::new(client), config)
    }

    /// Create with a custom HTTP client
    pub fn with_client(client: Arc<HttpClient>, config: &Config) -> Result<Self, SourceError> {
        let email = config
            .require_email()
            .map_err(|e| SourceError::InvalidRequest(e.to_string()))?
            .to_string();

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            email,
            tool: config.tool.clone(),
            api_key: config.api_key.clone().filter(|k| !k.is_empty()),
        })
    }

    /// Caller identity parameters appended to every request
    fn identity_params(&self) -> Vec<(&str, &str)> {
        let mut params = vec![("tool", self.tool.as_str()), ("email", self.email.as_str())];
        if let Some(key) = &self.api_key {
            params.push(("api_key", key.as_str()));
        }
        params
    }

    fn encode(params: &[(&str, &str)]) -> String {
        params
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Build E-utilities search URL
    fn build_search_url(&self, query: &SearchQuery) -> String {
        let retmax = query.max_results.to_string();
        let mut params = vec![
            ("db", "pubmed"),
            ("term", query.query.as_str()),
            ("retmax", retmax.as_str()),
            ("retmode", "xml"),
        ];
        params.extend(self.identity_params());

        format!("{}/esearch.fcgi?{}", self.base_url, Self::encode(&params))
    }

    /// Build E-utilities fetch URL for a batch of PubMed IDs
    fn build_fetch_url(&self, ids: &[String]) -> String {
        let joined = ids.join(",");
        let mut params = vec![("db", "pubmed"), ("id", joined.as_str()), ("retmode", "xml")];
        params.extend(self.identity_params());

        format!("{}/efetch.fcgi?{}", self.base_url, Self::encode(&params))
    }

    async fn get_text(&self, url: &str, action: &str) -> Result<String, SourceError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SourceError::Network(format!("Failed to {}: {}", action, e)))?;

        if !response.status().is_success() {
            return Err(SourceError::Api(format!(
                "PubMed API returned status: {}",
                response.status()
            )));
        }

        response
            .text()
            .await
            .map_err(|e| SourceError::Network(format!("Failed to read response: {}", e)))
    }

    /// Parse E-utilities search response XML
    fn parse_search_response(xml: &str) -> Result<Vec<String>, SourceError> {
        #[derive(Debug, Deserialize)]
        #[allow(non_snake_case)]
        struct ESearchResult {
            Count: Option<String>,
            IdList: Option<IdList>,
            ERROR: Option<String>,
        }

        #[derive(Debug, Deserialize)]
        struct IdList {
            #[serde(rename = "Id", default)]
            ids: Vec<String>,
        }

        let result: ESearchResult = from_str(xml)
            .map_err(|e| SourceError::Parse(format!("Failed to parse PubMed search XML: {}", e)))?;

        if let Some(error) = result.ERROR {
            return Err(SourceError::Api(format!("PubMed search error: {}", error)));
        }

        tracing::debug!(
            "PubMed reports {} matching records",
            result.Count.as_deref().unwrap_or("an unknown number of")
        );

        Ok(result.IdList.map(|list| list.ids).unwrap_or_default())
    }

    /// Parse E-utilities fetch response XML into one result per article
    fn parse_fetch_response(xml: &str) -> Result<Vec<FetchedRecord>, SourceError> {
        let mut reader = Reader::from_str(xml);
        let mut records = Vec::new();
        let mut saw_article_set = false;

        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) => match e.name().as_ref() {
                    b"PubmedArticleSet" => saw_article_set = true,
                    b"PubmedArticle" => {
                        let end = e.to_end().into_owned();
                        let inner = reader.read_text(end.name()).map_err(|err| {
                            SourceError::Parse(format!("Failed to read PubmedArticle: {}", err))
                        })?;
                        records.push(Self::parse_article(records.len(), &inner));
                    }
                    b"ERROR" => {
                        let end = e.to_end().into_owned();
                        let message = reader.read_text(end.name()).unwrap_or_default();
                        return Err(SourceError::Api(format!("PubMed fetch error: {}", message)));
                    }
                    _ => {}
                },
                Ok(Event::Empty(e)) if e.name().as_ref() == b"PubmedArticleSet" => {
                    saw_article_set = true;
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(err) => {
                    return Err(SourceError::Parse(format!(
                        "Failed to parse PubMed fetch XML at position {}: {}",
                        reader.error_position(),
                        err
                    )))
                }
            }
        }

        if !saw_article_set {
            return Err(SourceError::Parse(
                "PubMed fetch response has no PubmedArticleSet".to_string(),
            ));
        }

        Ok(records)
    }

    /// Decode one article fragment (the content between its tags)
    fn parse_article(index: usize, inner: &str) -> FetchedRecord {
        let flattened = inline_markup().replace_all(inner, "");
        let fragment = format!("<PubmedArticle>{}</PubmedArticle>", flattened);

        from_str::<wire::PubmedArticle>(&fragment)
            .map(wire::PubmedArticle::into_record)
            .map_err(|e| RecordError::Malformed {
                index,
                message: e.to_string(),
            })
    }
}

#[async_trait]
impl LiteratureSource for PubMedSource {
    fn name(&self) -> &str {
        "PubMed"
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<String>, SourceError> {
        tracing::debug!("Searching PubMed with query: {}", query.query);
        let xml = self
            .get_text(&self.build_search_url(query), "search PubMed")
            .await?;

        Self::parse_search_response(&xml)
    }

    async fn fetch_details(&self, ids: &[String]) -> Result<Vec<FetchedRecord>, SourceError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        tracing::debug!("Fetching details for {} papers", ids.len());
        let xml = self
            .get_text(&self.build_fetch_url(ids), "fetch PubMed details")
            .await?;

        Self::parse_fetch_response(&xml)
    }
}

/// Wire format of a `PubmedArticle`, limited to the fields the report needs
mod wire {
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    #[allow(non_snake_case)]
    pub struct PubmedArticle {
        pub MedlineCitation: Option<MedlineCitation>,
    }

    #[derive(Debug, Deserialize)]
    #[allow(non_snake_case)]
    pub struct MedlineCitation {
        pub PMID: Option<Text>,
        pub Article: Option<Article>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Text {
        #[serde(rename = "$text", default)]
        pub value: String,
    }

    #[derive(Debug, Deserialize)]
    #[allow(non_snake_case)]
    pub struct Article {
        pub Journal: Option<Journal>,
        pub ArticleTitle: Option<Text>,
        pub AuthorList: Option<AuthorList>,
    }

    #[derive(Debug, Deserialize)]
    #[allow(non_snake_case)]
    pub struct Journal {
        pub JournalIssue: Option<JournalIssue>,
    }

    #[derive(Debug, Deserialize)]
    #[allow(non_snake_case)]
    pub struct JournalIssue {
        pub PubDate: Option<PubDate>,
    }

    #[derive(Debug, Deserialize)]
    #[allow(non_snake_case)]
    pub struct PubDate {
        pub Year: Option<String>,
        pub Month: Option<String>,
        pub Day: Option<String>,
    }

    #[derive(Debug, Deserialize)]
    pub struct AuthorList {
        #[serde(rename = "Author", default)]
        pub authors: Vec<Author>,
    }

    #[derive(Debug, Deserialize)]
    #[allow(non_snake_case)]
    pub struct Author {
        pub LastName: Option<String>,
        pub ForeName: Option<String>,
        #[serde(rename = "AffiliationInfo", default)]
        pub affiliation_info: Vec<AffiliationInfo>,
    }

    #[derive(Debug, Deserialize)]
    #[allow(non_snake_case)]
    pub struct AffiliationInfo {
        pub Affiliation: Option<String>,
    }
}

impl wire::PubmedArticle {
    /// Map the wire structure onto the domain record, keeping absences explicit
    fn into_record(self) -> BibliographicRecord {
        let citation = self.MedlineCitation;
        let pmid = citation
            .as_ref()
            .and_then(|c| c.PMID.as_ref())
            .map(|p| p.value.trim().to_string())
            .filter(|p| !p.is_empty());

        let Some(article) = citation.and_then(|c| c.Article) else {
            return BibliographicRecord {
                pmid,
                ..Default::default()
            };
        };

        let title = article.ArticleTitle.map(|t| t.value);

        let journal_issue = article
            .Journal
            .and_then(|j| j.JournalIssue)
            .map(|ji| JournalIssue {
                pub_date: ji.PubDate.map(|pd| PublicationDate {
                    year: pd.Year,
                    month: pd.Month,
                    day: pd.Day,
                }),
            });

        let authors = article.AuthorList.map(|list| {
            list.authors
                .into_iter()
                .map(|a| Author {
                    fore_name: a.ForeName,
                    last_name: a.LastName,
                    affiliations: a
                        .affiliation_info
                        .into_iter()
                        .map(|info| Affiliation::new(info.Affiliation.unwrap_or_default()))
                        .collect(),
                })
                .collect()
        });

        BibliographicRecord {
            pmid,
            title,
            journal_issue,
            authors,
        }
    }
}
