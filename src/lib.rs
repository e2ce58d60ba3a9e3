//! # Research Digest
//!
//! Turns a reference to an AI-research artifact (an arXiv paper, a GitHub
//! repository, a Hugging Face model, dataset, Space or blog post, or any
//! other web page) into one uniform record of title, text content and
//! source-specific metadata.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`models`]: Core data structures (ExtractedRecord, ResolvedReference, etc.)
//! - [`sources`]: The resolver and one fetcher per source kind
//! - [`normalize`]: Per-kind mapping into the uniform record, with placeholders
//! - [`extractor`]: The facade tying resolution, dispatch and normalization together
//! - [`batch`]: Line-oriented batch input and JSON Lines output
//! - [`utils`]: HTTP client, HTML and PDF helpers
//! - [`config`]: Configuration management
//!
//! ## Example
//!
//! ```no_run
//! use research_digest::{config::Config, Extractor};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let extractor = Extractor::new(&Config::default())?;
//! let record = extractor.extract("https://arxiv.org/abs/1611.07004").await?;
//! println!("{}", record.title.unwrap_or_default());
//! # Ok(())
//! # }
//! ```

pub mod batch;
pub mod config;
pub mod extractor;
pub mod models;
pub mod normalize;
pub mod sources;
pub mod utils;

// Re-export commonly used types
pub use extractor::Extractor;
pub use models::{ExtractedRecord, ResolvedReference, SourceKind};
pub use sources::{resolve, Fetcher, FetcherRegistry, SourceError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
