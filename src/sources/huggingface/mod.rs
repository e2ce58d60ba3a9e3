//! Hugging Face fetchers.
//!
//! Models and datasets go through the hub API and probe for a README;
//! blog posts and Spaces are scraped from their HTML pages.

mod hub;
mod pages;

pub use hub::{arxiv_tag_ids, HubApi, HuggingFaceDatasetFetcher, HuggingFaceModelFetcher};
pub use pages::{
    parse_blog_post, parse_space_page, HuggingFaceBlogFetcher, HuggingFaceSpaceFetcher,
};
