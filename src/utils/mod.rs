//! Utility modules supporting extraction.
//!
//! - [`HttpClient`]: shared HTTP client built from configuration
//! - [`extract_text`]: extract text content from PDF bytes, page by page
//! - [`PdfExtractError`]: errors that can occur during PDF extraction
//! - [`html`]: `scraper` helpers for pulling titles, attributes and body text
//!
//! # HTTP Client
//!
//! ```rust,no_run
//! use research_digest::utils::HttpClient;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HttpClient::new()?;
//! let response = client.get("https://export.arxiv.org/api/query?id_list=1611.07004")
//!     .send()
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod html;
mod http;
mod pdf;

pub use http::HttpClient;
pub use pdf::{extract_text, extract_text_from_path, PdfExtractError};
