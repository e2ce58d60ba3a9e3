//! Configuration management.

mod file_config;

pub use file_config::{find_config_file, load_config, load_env_config, ConfigFileError};

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default arXiv Atom API endpoint
pub const ARXIV_API_URL: &str = "https://export.arxiv.org/api/query";
/// Default GitHub REST API base
pub const GITHUB_API_URL: &str = "https://api.github.com";
/// Default Hugging Face hub base
pub const HUGGINGFACE_URL: &str = "https://huggingface.co";

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Upstream base URLs
    #[serde(default)]
    pub endpoints: EndpointConfig,

    /// API credentials for upstreams that accept them
    #[serde(default)]
    pub api_keys: ApiKeys,

    /// HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Extraction settings
    #[serde(default)]
    pub extraction: ExtractionConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Base URLs for every upstream the fetchers talk to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointConfig {
    #[serde(default = "default_arxiv_api")]
    pub arxiv_api: String,

    #[serde(default = "default_github_api")]
    pub github_api: String,

    #[serde(default = "default_huggingface")]
    pub huggingface: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            arxiv_api: default_arxiv_api(),
            github_api: default_github_api(),
            huggingface: default_huggingface(),
        }
    }
}

impl EndpointConfig {
    /// Point every upstream at the same base URL (used by tests against a mock server)
    pub fn all_at(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            arxiv_api: format!("{}/api/query", base),
            github_api: base.to_string(),
            huggingface: base.to_string(),
        }
    }
}

fn default_arxiv_api() -> String {
    ARXIV_API_URL.to_string()
}

fn default_github_api() -> String {
    GITHUB_API_URL.to_string()
}

fn default_huggingface() -> String {
    HUGGINGFACE_URL.to_string()
}

/// API keys for external services
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiKeys {
    /// GitHub token (optional, for higher rate limits)
    #[serde(default)]
    pub github_token: Option<String>,

    /// Hugging Face token (optional, needed for gated repos)
    #[serde(default)]
    pub huggingface_token: Option<String>,
}

impl Default for ApiKeys {
    fn default() -> Self {
        Self {
            github_token: std::env::var("GITHUB_TOKEN").ok(),
            huggingface_token: std::env::var("HF_TOKEN").ok(),
        }
    }
}

impl ApiKeys {
    /// No credentials at all, regardless of the environment
    pub fn none() -> Self {
        Self {
            github_token: None,
            huggingface_token: None,
        }
    }
}

/// HTTP client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Whole-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// Overrides the `research-digest/<version>` user agent
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
            connect_timeout_secs: default_connect_timeout(),
            user_agent: None,
        }
    }
}

fn default_timeout() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    10
}

/// Extraction configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Where downloaded PDFs are spooled; the system temp dir when unset
    #[serde(default)]
    pub scratch_dir: Option<PathBuf>,

    /// Branches probed for Hugging Face READMEs, in order
    #[serde(default = "default_readme_branches")]
    pub readme_branches: Vec<String>,

    /// README file names probed on each branch, in order
    #[serde(default = "default_readme_files")]
    pub readme_files: Vec<String>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            scratch_dir: None,
            readme_branches: default_readme_branches(),
            readme_files: default_readme_files(),
        }
    }
}

impl ExtractionConfig {
    /// The directory temporary PDFs are written to
    pub fn scratch_dir(&self) -> PathBuf {
        self.scratch_dir.clone().unwrap_or_else(std::env::temp_dir)
    }
}

fn default_readme_branches() -> Vec<String> {
    vec!["main".to_string(), "master".to_string()]
}

fn default_readme_files() -> Vec<String> {
    vec![
        "README.md".to_string(),
        "README.rst".to_string(),
        "README.txt".to_string(),
    ]
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// `json` for structured output, plain text otherwise
    #[serde(default)]
    pub format: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
