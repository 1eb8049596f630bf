//! Integration tests for pharma-papers
//!
//! Runs the full search, fetch, extract and report path against the mock
//! source and against a local stand-in for the E-utilities service.

use mockito::Matcher;
use pharma_papers::config::Config;
use pharma_papers::models::{Author, PublicationDate, RecordBuilder, REPORT_COLUMNS};
use pharma_papers::pipeline::PipelineError;
use pharma_papers::report::{read_csv, ReportSink};
use pharma_papers::sources::MockSource;
use pharma_papers::{Pipeline, PubMedSource, RecordExtractor, SearchQuery};
use std::fs::File;
use std::sync::Arc;
use tempfile::tempdir;

const SEARCH_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" ?>
<!DOCTYPE eSearchResult PUBLIC "-//NLM//DTD esearch 20060628//EN" "https://eutils.ncbi.nlm.nih.gov/eutils/dtd/20060628/esearch.dtd">
<eSearchResult>
  <Count>2</Count>
  <RetMax>2</RetMax>
  <RetStart>0</RetStart>
  <IdList>
    <Id>12345</Id>
    <Id>67890</Id>
  </IdList>
</eSearchResult>"#;

const EMPTY_SEARCH_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" ?>
<eSearchResult>
  <Count>0</Count>
  <RetMax>0</RetMax>
  <RetStart>0</RetStart>
  <IdList/>
</eSearchResult>"#;

const FETCH_XML: &str = r#"<?xml version="1.0" ?>
<PubmedArticleSet>
  <PubmedArticle>
    <MedlineCitation Status="MEDLINE" Owner="NLM">
      <PMID Version="1">12345</PMID>
      <Article PubModel="Print">
        <Journal>
          <JournalIssue CitedMedium="Internet">
            <PubDate>
              <Year>2023</Year>
              <Month>5</Month>
              <Day>1</Day>
            </PubDate>
          </JournalIssue>
        </Journal>
        <ArticleTitle>Test Paper</ArticleTitle>
        <AuthorList CompleteYN="Y">
          <Author ValidYN="Y">
            <LastName>Doe</LastName>
            <ForeName>Jane</ForeName>
            <AffiliationInfo>
              <Affiliation>Acme Pharma Inc.</Affiliation>
            </AffiliationInfo>
          </Author>
          <Author ValidYN="Y">
            <LastName>Smith</LastName>
            <ForeName>John</ForeName>
            <AffiliationInfo>
              <Affiliation>State University</Affiliation>
            </AffiliationInfo>
          </Author>
        </AuthorList>
      </Article>
    </MedlineCitation>
  </PubmedArticle>
  <PubmedArticle>
    <MedlineCitation Status="MEDLINE" Owner="NLM">
      <PMID Version="1">67890</PMID>
      <Article PubModel="Print">
        <Journal>
          <JournalIssue CitedMedium="Print">
            <PubDate>
              <Year>2022</Year>
            </PubDate>
          </JournalIssue>
        </Journal>
        <ArticleTitle>An academic study.</ArticleTitle>
        <AuthorList CompleteYN="Y">
          <Author ValidYN="Y">
            <LastName>Lee</LastName>
            <ForeName>Ann</ForeName>
            <AffiliationInfo>
              <Affiliation>Department of Biology, State University.</Affiliation>
            </AffiliationInfo>
          </Author>
        </AuthorList>
      </Article>
    </MedlineCitation>
  </PubmedArticle>
</PubmedArticleSet>"#;

fn test_config(base_url: String) -> Config {
    Config {
        email: Some("tester@example.org".to_string()),
        base_url,
        ..Default::default()
    }
}

fn pubmed_pipeline(base_url: String) -> Pipeline {
    let source = PubMedSource::new(&test_config(base_url)).unwrap();
    Pipeline::new(Arc::new(source), RecordExtractor::default())
}

#[tokio::test]
async fn test_mock_source_end_to_end_csv() {
    let source = MockSource::with_records([
        RecordBuilder::new("12345")
            .title("Test Paper")
            .pub_date(PublicationDate::new(Some("2023"), Some("5"), Some("1")))
            .author(Author::new("Jane", "Doe").affiliation("Acme Pharma Inc."))
            .author(Author::new("John", "Smith").affiliation("State University"))
            .build(),
        RecordBuilder::new("2")
            .author(Author::new("Ann", "Lee").affiliation("Pharma Institute"))
            .build(),
    ]);
    let pipeline = Pipeline::new(Arc::new(source), RecordExtractor::default());

    let report = pipeline.run(&SearchQuery::new("test")).await.unwrap();
    assert_eq!(report.rows.len(), 1);
    assert_eq!(report.dropped(), 1);

    let dir = tempdir().unwrap();
    let path = dir.path().join("papers.csv");
    ReportSink::from_destination(Some(path.clone()))
        .emit(&report.rows)
        .unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some(REPORT_COLUMNS.join(",").as_str()));
    assert_eq!(
        lines.next(),
        Some("12345,Test Paper,2023-5-1,Jane Doe,Acme Pharma Inc.,N/A")
    );
    assert_eq!(lines.next(), None);

    let read = read_csv(File::open(&path).unwrap()).unwrap();
    assert_eq!(read, report.rows);
}

#[tokio::test]
async fn test_pubmed_search_and_fetch() {
    let mut server = mockito::Server::new_async().await;

    let search = server
        .mock("GET", "/esearch.fcgi")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("db".into(), "pubmed".into()),
            Matcher::UrlEncoded("term".into(), "cancer immunotherapy".into()),
            Matcher::UrlEncoded("retmax".into(), "10".into()),
            Matcher::UrlEncoded("email".into(), "tester@example.org".into()),
        ]))
        .with_status(200)
        .with_body(SEARCH_XML)
        .create_async()
        .await;

    let fetch = server
        .mock("GET", "/efetch.fcgi")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("db".into(), "pubmed".into()),
            Matcher::UrlEncoded("id".into(), "12345,67890".into()),
        ]))
        .with_status(200)
        .with_body(FETCH_XML)
        .expect(1)
        .create_async()
        .await;

    let pipeline = pubmed_pipeline(server.url());
    let report = pipeline
        .run(&SearchQuery::new("cancer immunotherapy").max_results(10))
        .await
        .unwrap();

    search.assert_async().await;
    fetch.assert_async().await;

    assert_eq!(report.matched, 2);
    assert_eq!(report.fetched, 2);
    assert_eq!(report.rows.len(), 1);

    let row = &report.rows[0];
    assert_eq!(row.pubmed_id, "12345");
    assert_eq!(row.title, "Test Paper");
    assert_eq!(row.publication_date, "2023-5-1");
    assert_eq!(row.non_academic_authors, "Jane Doe");
    assert_eq!(row.company_affiliations, "Acme Pharma Inc.");
    assert_eq!(row.corresponding_email, "N/A");
}

#[tokio::test]
async fn test_pubmed_empty_search_skips_fetch() {
    let mut server = mockito::Server::new_async().await;

    let _search = server
        .mock("GET", "/esearch.fcgi")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(EMPTY_SEARCH_XML)
        .create_async()
        .await;

    let fetch = server
        .mock("GET", "/efetch.fcgi")
        .match_query(Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let report = pubmed_pipeline(server.url())
        .run(&SearchQuery::new("nothing matches this"))
        .await
        .unwrap();

    fetch.assert_async().await;
    assert!(report.rows.is_empty());
    assert_eq!(report.matched, 0);
}

#[tokio::test]
async fn test_pubmed_search_status_error() {
    let mut server = mockito::Server::new_async().await;

    let _search = server
        .mock("GET", "/esearch.fcgi")
        .match_query(Matcher::Any)
        .with_status(500)
        .create_async()
        .await;

    let err = pubmed_pipeline(server.url())
        .run(&SearchQuery::new("q"))
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::Search { .. }));
    assert!(err.to_string().contains("500"));
}

#[tokio::test]
async fn test_pubmed_fetch_status_error() {
    let mut server = mockito::Server::new_async().await;

    let _search = server
        .mock("GET", "/esearch.fcgi")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(SEARCH_XML)
        .create_async()
        .await;

    let _fetch = server
        .mock("GET", "/efetch.fcgi")
        .match_query(Matcher::Any)
        .with_status(503)
        .create_async()
        .await;

    let err = pubmed_pipeline(server.url())
        .run(&SearchQuery::new("q"))
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::Fetch { .. }));
}

#[test]
fn test_pubmed_source_requires_email() {
    let config = Config::default();
    assert!(PubMedSource::new(&config).is_err());
}
