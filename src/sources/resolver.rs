//! Classify a raw URL or identifier into a [`ResolvedReference`].
//!
//! Classification is first-match on the URL host: arXiv, then GitHub, then
//! Hugging Face (where `blog`, `spaces` and `datasets` win over the default
//! model interpretation), and finally the generic blog catch-all.

use regex::Regex;
use std::sync::LazyLock;
use url::Url;

use crate::models::{ResolvedReference, SourceKind};
use crate::sources::SourceError;

/// `1611.07004`, `1611.07004v2`, `arxiv:1611.07004`
static BARE_ARXIV_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?i:arxiv:)?(\d{4}\.\d{4,5}(?:v\d+)?)$").expect("valid arXiv id regex")
});

/// Resolve a raw input string into a source kind and identifier.
///
/// # Errors
///
/// Returns [`SourceError::InvalidReference`] for empty input, or for arXiv,
/// GitHub and Hugging Face URLs that lack the path segments their
/// identifier is built from.
///
/// # Examples
///
/// ```
/// use research_digest::models::SourceKind;
/// use research_digest::sources::resolve;
///
/// let reference = resolve("https://github.com/openai/gym").unwrap();
/// assert_eq!(reference.kind, SourceKind::GitHub);
/// assert_eq!(reference.identifier, "openai/gym");
/// ```
pub fn resolve(input: &str) -> Result<ResolvedReference, SourceError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(SourceError::InvalidReference("empty input".to_string()));
    }

    if let Some(caps) = BARE_ARXIV_ID.captures(input) {
        return Ok(ResolvedReference::new(SourceKind::Arxiv, &caps[1]));
    }

    let Some((url, input)) = parse_url(input) else {
        return Ok(ResolvedReference::new(SourceKind::GenericBlog, input));
    };
    let input = input.as_str();

    let host = url.host_str().unwrap_or_default().to_lowercase();
    let segments: Vec<&str> = url
        .path_segments()
        .map(|s| s.filter(|p| !p.is_empty()).collect())
        .unwrap_or_default();

    if host.contains("arxiv.org") {
        resolve_arxiv(input, &segments)
    } else if host.contains("github.com") {
        resolve_github(input, &segments)
    } else if host.contains("huggingface.co") {
        resolve_huggingface(input, &segments)
    } else {
        Ok(ResolvedReference::new(SourceKind::GenericBlog, input))
    }
}

/// Parse `input` as an absolute URL, accepting scheme-less `host/path` forms.
///
/// Returns the URL with the string it was parsed from, which carries the
/// `https://` prefix when one had to be added.
fn parse_url(input: &str) -> Option<(Url, String)> {
    match Url::parse(input) {
        Ok(url) => Some((url, input.to_string())),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            let host = input.split('/').next().unwrap_or_default();
            if !host.contains('.') || input.contains(char::is_whitespace) {
                return None;
            }
            let absolute = format!("https://{}", input);
            Url::parse(&absolute).ok().map(|url| (url, absolute))
        }
        Err(_) => None,
    }
}

fn resolve_arxiv(input: &str, segments: &[&str]) -> Result<ResolvedReference, SourceError> {
    // Old-style ids span two segments (abs/hep-th/9901001)
    let id_segments = match segments.first() {
        Some(&("abs" | "pdf" | "html")) => &segments[1..],
        _ => segments.last().map(std::slice::from_ref).unwrap_or_default(),
    };

    let joined = id_segments.join("/");
    let identifier = joined.strip_suffix(".pdf").unwrap_or(&joined).trim();

    if identifier.is_empty() {
        return Err(SourceError::InvalidReference(format!(
            "arXiv URL without a paper id: {}",
            input
        )));
    }

    Ok(ResolvedReference::new(SourceKind::Arxiv, identifier))
}

fn resolve_github(input: &str, segments: &[&str]) -> Result<ResolvedReference, SourceError> {
    let &[owner, repo, ..] = segments else {
        return Err(SourceError::InvalidReference(format!(
            "GitHub URL must look like https://github.com/owner/repo: {}",
            input
        )));
    };

    let repo = repo.strip_suffix(".git").unwrap_or(repo);
    Ok(ResolvedReference::new(
        SourceKind::GitHub,
        format!("{}/{}", owner, repo),
    ))
}

fn resolve_huggingface(input: &str, segments: &[&str]) -> Result<ResolvedReference, SourceError> {
    let first = segments.first().map(|s| s.to_lowercase()).unwrap_or_default();

    match first.as_str() {
        "blog" => Ok(ResolvedReference::new(SourceKind::HuggingFaceBlog, input)),
        "spaces" => {
            let id = join_range(segments, 1, 3);
            if id.is_empty() {
                return Err(invalid_huggingface(input));
            }
            Ok(ResolvedReference::new(SourceKind::HuggingFaceSpace, id))
        }
        "datasets" => {
            let id = join_range(segments, 1, 3);
            if id.is_empty() {
                return Err(invalid_huggingface(input));
            }
            Ok(ResolvedReference::new(
                SourceKind::HuggingFaceDataset,
                format!("datasets/{}", id),
            ))
        }
        _ if segments.len() >= 2 => Ok(ResolvedReference::new(
            SourceKind::HuggingFaceModel,
            join_range(segments, 0, 2),
        )),
        _ => Err(invalid_huggingface(input)),
    }
}

/// `segments[start..end]` joined by `/`, clamped to the available segments
fn join_range(segments: &[&str], start: usize, end: usize) -> String {
    let end = end.min(segments.len());
    let start = start.min(end);
    segments[start..end].join("/")
}

fn invalid_huggingface(input: &str) -> SourceError {
    SourceError::InvalidReference(format!(
        "Hugging Face URL must look like https://huggingface.co/owner/model: {}",
        input
    ))
}
