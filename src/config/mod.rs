//! Configuration management.
//!
//! Values are layered, lowest precedence first:
//!
//! 1. built-in defaults
//! 2. a TOML file (`--config PATH`, or `<config dir>/pharma-papers/config.toml` when present)
//! 3. environment variables prefixed with `PHARMA_PAPERS_` (e.g. `PHARMA_PAPERS_EMAIL`)
//! 4. command line flags
//!
//! ```toml
//! email = "analyst@example.com"
//! api_key = "ncbi-api-key"
//! max_results = 250
//! timeout_secs = 60
//!
//! [classifier]
//! industry_keywords = ["pharma", "biotech", "therapeutics"]
//! academic_keywords = ["university", "hospital"]
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::classify::{KeywordClassifier, DEFAULT_ACADEMIC_KEYWORDS, DEFAULT_INDUSTRY_KEYWORDS};
use crate::models::DEFAULT_MAX_RESULTS;
use crate::utils::DEFAULT_TIMEOUT_SECS;

pub use config::ConfigError;

/// Prefix for environment variable overrides
pub const ENV_PREFIX: &str = "PHARMA_PAPERS";

/// NCBI E-utilities base URL
pub const DEFAULT_BASE_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Contact email sent with every request, required by the NCBI usage policy
    #[serde(default)]
    pub email: Option<String>,

    /// NCBI API key (optional, raises the request rate the service allows)
    #[serde(default)]
    pub api_key: Option<String>,

    /// Tool name reported to NCBI
    #[serde(default = "default_tool")]
    pub tool: String,

    /// Maximum number of search results to process
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// E-utilities endpoint root
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default)]
    pub classifier: ClassifierConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            email: None,
            api_key: None,
            tool: default_tool(),
            max_results: default_max_results(),
            timeout_secs: default_timeout(),
            base_url: default_base_url(),
            classifier: ClassifierConfig::default(),
        }
    }
}

impl Config {
    /// The configured contact email; missing or blank is an error
    pub fn require_email(&self) -> Result<&str, ConfigError> {
        self.email
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .ok_or_else(|| ConfigError::NotFound("email".to_string()))
    }
}

fn default_tool() -> String {
    env!("CARGO_PKG_NAME").to_string()
}

fn default_max_results() -> usize {
    DEFAULT_MAX_RESULTS
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

/// Keyword sets for the affiliation heuristic
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    #[serde(default = "default_industry_keywords")]
    pub industry_keywords: Vec<String>,

    #[serde(default = "default_academic_keywords")]
    pub academic_keywords: Vec<String>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            industry_keywords: default_industry_keywords(),
            academic_keywords: default_academic_keywords(),
        }
    }
}

impl ClassifierConfig {
    /// Build the keyword classifier these settings describe
    pub fn build(&self) -> KeywordClassifier {
        KeywordClassifier::new(&self.industry_keywords, &self.academic_keywords)
    }
}

fn default_industry_keywords() -> Vec<String> {
    DEFAULT_INDUSTRY_KEYWORDS.iter().map(|k| k.to_string()).collect()
}

fn default_academic_keywords() -> Vec<String> {
    DEFAULT_ACADEMIC_KEYWORDS.iter().map(|k| k.to_string()).collect()
}

/// Values given on the command line; `None` leaves the lower layers untouched
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub email: Option<String>,
    pub api_key: Option<String>,
    pub max_results: Option<usize>,
    pub timeout_secs: Option<u64>,
}

/// Default config file location, if one exists
pub fn find_config_file() -> Option<PathBuf> {
    let path = dirs::config_dir()?.join(env!("CARGO_PKG_NAME")).join("config.toml");
    path.is_file().then_some(path)
}

/// Load configuration from an optional file, the environment and CLI overrides
pub fn load_config(path: Option<&Path>, overrides: &Overrides) -> Result<Config, ConfigError> {
    let mut builder = config::Config::builder();

    if let Some(path) = path {
        builder = builder.add_source(config::File::from(path));
    }

    let settings = builder
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__"),
        )
        .set_override_option("email", overrides.email.clone())?
        .set_override_option("api_key", overrides.api_key.clone())?
        .set_override_option("max_results", overrides.max_results.map(|n| n as u64))?
        .set_override_option("timeout_secs", overrides.timeout_secs)?
        .build()?;

    settings.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::AffiliationClassifier;
    use std::sync::{Mutex, MutexGuard};
    use tempfile::tempdir;

    // Tests that read the environment layer must not overlap with tests that set it
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn env_lock() -> MutexGuard<'static, ()> {
        ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner())
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.tool, "pharma-papers");
        assert_eq!(config.max_results, 100);
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.classifier.industry_keywords.len(), 6);
        assert!(config.require_email().is_err());
    }

    #[test]
    fn test_require_email() {
        let mut config = Config::default();
        config.email = Some("   ".to_string());
        assert!(config.require_email().is_err());

        config.email = Some(" analyst@example.com ".to_string());
        assert_eq!(config.require_email().unwrap(), "analyst@example.com");
    }

    #[test]
    fn test_load_config_file() {
        let _env = env_lock();
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
email = "file@example.com"
max_results = 250

[classifier]
industry_keywords = ["therapeutics"]
"#,
        )
        .unwrap();

        let config = load_config(Some(&path), &Overrides::default()).unwrap();
        assert_eq!(config.email.as_deref(), Some("file@example.com"));
        assert_eq!(config.max_results, 250);
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.classifier.industry_keywords, vec!["therapeutics"]);
        assert_eq!(config.classifier.academic_keywords.len(), 5);
    }

    #[test]
    fn test_overrides_win_over_file() {
        let _env = env_lock();
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "email = \"file@example.com\"\nmax_results = 250\n").unwrap();

        let overrides = Overrides {
            email: Some("cli@example.com".to_string()),
            max_results: Some(5),
            ..Default::default()
        };
        let config = load_config(Some(&path), &overrides).unwrap();
        assert_eq!(config.email.as_deref(), Some("cli@example.com"));
        assert_eq!(config.max_results, 5);
    }

    #[test]
    fn test_env_layer() {
        let _env = env_lock();
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "email = \"file@example.com\"\ntimeout_secs = 45\n").unwrap();

        std::env::set_var("PHARMA_PAPERS_EMAIL", "env@example.com");
        std::env::set_var("PHARMA_PAPERS_API_KEY", "env-key");
        std::env::set_var("PHARMA_PAPERS_MAX_RESULTS", "42");

        let from_env = load_config(Some(&path), &Overrides::default());
        let with_cli = load_config(
            Some(&path),
            &Overrides {
                email: Some("cli@example.com".to_string()),
                ..Default::default()
            },
        );

        std::env::remove_var("PHARMA_PAPERS_EMAIL");
        std::env::remove_var("PHARMA_PAPERS_API_KEY");
        std::env::remove_var("PHARMA_PAPERS_MAX_RESULTS");

        let config = from_env.unwrap();
        assert_eq!(config.email.as_deref(), Some("env@example.com"));
        assert_eq!(config.api_key.as_deref(), Some("env-key"));
        assert_eq!(config.max_results, 42);
        assert_eq!(config.timeout_secs, 45);

        let config = with_cli.unwrap();
        assert_eq!(config.email.as_deref(), Some("cli@example.com"));
        assert_eq!(config.api_key.as_deref(), Some("env-key"));
    }

    #[test]
    fn test_missing_config_file() {
        let path = PathBuf::from("/nonexistent/pharma-papers.toml");
        assert!(load_config(Some(&path), &Overrides::default()).is_err());
    }

    #[test]
    fn test_classifier_from_config() {
        let config = ClassifierConfig {
            industry_keywords: vec!["Therapeutics".to_string()],
            academic_keywords: vec![],
        };
        let classifier = config.build();
        assert!(classifier.is_industry("Foo Therapeutics, University Park"));
    }
}
