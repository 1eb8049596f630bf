use anyhow::{Context, Result};
use clap::Parser;
use pharma_papers::config::{find_config_file, load_config, Overrides};
use pharma_papers::models::SearchQuery;
use pharma_papers::pipeline::Pipeline;
use pharma_papers::report::ReportSink;
use pharma_papers::sources::PubMedSource;
use pharma_papers::RecordExtractor;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Fetch PubMed papers with pharmaceutical/biotech company affiliated authors
#[derive(Parser, Debug)]
#[command(name = "get-papers-list")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(
    about = "Fetch PubMed papers with non-academic authors and save them to CSV or print them",
    long_about = None
)]
struct Cli {
    /// PubMed search query (supports full PubMed syntax)
    query: String,

    /// Output CSV filename (prints a table to the console when omitted)
    #[arg(long, short)]
    file: Option<PathBuf>,

    /// Print progress and per-record diagnostics to stderr
    #[arg(long, short)]
    debug: bool,

    /// Email identifying you to NCBI (or set PHARMA_PAPERS_EMAIL)
    #[arg(long, short)]
    email: Option<String>,

    /// Maximum number of search results to process [default: 100]
    #[arg(long, short = 'n')]
    max_results: Option<usize>,

    /// NCBI API key (or set PHARMA_PAPERS_API_KEY)
    #[arg(long)]
    api_key: Option<String>,

    /// Configuration file path
    #[arg(long)]
    config: Option<PathBuf>,

    /// Request timeout in seconds [default: 30]
    #[arg(long)]
    timeout: Option<u64>,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            email: self.email.clone(),
            api_key: self.api_key.clone(),
            max_results: self.max_results,
            timeout_secs: self.timeout,
        }
    }
}

fn init_tracing(debug: bool) {
    let level = if debug { "debug" } else { "warn" };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| {
                format!("pharma_papers={level},get_papers_list={level}")
            }),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let config_path = cli.config.clone().or_else(find_config_file);
    if let Some(path) = &config_path {
        tracing::debug!("Using config file: {}", path.display());
    }

    let config = load_config(config_path.as_deref(), &cli.overrides())
        .context("Failed to load configuration")?;
    config
        .require_email()
        .context("An email address is required: pass --email or set PHARMA_PAPERS_EMAIL")?;

    let source = PubMedSource::new(&config).context("Failed to create PubMed client")?;
    let extractor = RecordExtractor::new(Arc::new(config.classifier.build()));
    let pipeline = Pipeline::new(Arc::new(source), extractor);

    let query = SearchQuery::new(&cli.query).max_results(config.max_results);
    let report = pipeline.run(&query).await?;

    tracing::info!(
        "{} of {} fetched papers have non-academic authors ({} skipped)",
        report.rows.len(),
        report.fetched,
        report.skipped.len()
    );

    ReportSink::from_destination(cli.file)
        .emit(&report.rows)
        .context("Failed to write report")?;

    Ok(())
}
