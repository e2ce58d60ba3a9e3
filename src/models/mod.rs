//! Core data models for references, per-source results and uniform records.

mod raw;
mod record;

pub use raw::{
    ArxivPaper, BlogPost, GitHubRepo, HubDataset, HubModel, RawExtraction, SpacePage, WebPage,
};
pub use record::{ExtractedRecord, NestedArxiv, ResolvedReference, SourceKind};
