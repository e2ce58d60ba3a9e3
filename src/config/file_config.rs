//! Configuration file support for research-digest.
//!
//! Configuration is read from a TOML file, with environment variable
//! overrides prefixed by `RESEARCH_DIGEST_` (nested keys separated by `__`,
//! e.g. `RESEARCH_DIGEST_HTTP__TIMEOUT_SECS=60`).
//!
//! # Configuration File Format
//!
//! ```toml
//! [endpoints]
//! arxiv_api = "https://export.arxiv.org/api/query"
//! github_api = "https://api.github.com"
//! huggingface = "https://huggingface.co"
//!
//! [api_keys]
//! github_token = "ghp_..."
//! huggingface_token = "hf_..."
//!
//! [http]
//! timeout_secs = 30
//! connect_timeout_secs = 10
//!
//! [extraction]
//! scratch_dir = "/tmp/research-digest"
//! readme_branches = ["main", "master"]
//! readme_files = ["README.md", "README.rst", "README.txt"]
//!
//! [logging]
//! level = "info"
//! format = "json"
//! ```

use std::path::{Path, PathBuf};

use super::Config;

/// File name looked up in the working directory and the user config dir
const CONFIG_FILE_NAME: &str = "research-digest.toml";

/// Load configuration from a TOML file, applying environment overrides
pub fn load_config(path: &Path) -> Result<Config, ConfigFileError> {
    if !path.is_file() {
        return Err(ConfigFileError::Io(format!(
            "Config file not found: {}",
            path.display()
        )));
    }

    build(Some(path))
}

/// Load configuration from defaults and environment overrides alone
pub fn load_env_config() -> Result<Config, ConfigFileError> {
    build(None)
}

fn build(path: Option<&Path>) -> Result<Config, ConfigFileError> {
    let mut builder = config::Config::builder();
    if let Some(path) = path {
        builder = builder.add_source(config::File::from(path).format(config::FileFormat::Toml));
    }

    let settings = builder
        .add_source(
            config::Environment::with_prefix("RESEARCH_DIGEST")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()
        .map_err(|e| ConfigFileError::Parse(e.to_string()))?;

    settings
        .try_deserialize()
        .map_err(|e| ConfigFileError::Parse(e.to_string()))
}

/// Find a config file in the default locations
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.is_file() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join("research-digest").join(CONFIG_FILE_NAME))
        .filter(|path| path.is_file())
}

impl Config {
    /// Save configuration to a TOML file
    pub fn save(&self, path: &Path) -> Result<(), ConfigFileError> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigFileError::Serialize(e.to_string()))?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| ConfigFileError::Io(e.to_string()))?;
        }

        std::fs::write(path, content).map_err(|e| ConfigFileError::Io(e.to_string()))
    }
}

/// Configuration file errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigFileError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Serialize error: {0}")]
    Serialize(String),
}
