//! Source adapters: one outbound request (or a static stub) per source, normalized into [`SourceResult`].

pub mod arxiv;
pub mod placeholder;
pub mod reddit;

use reqwest::Client;
use serde::Serialize;

pub use arxiv::{ArxivEntry, ArxivSource};
pub use placeholder::{MediumSource, PlaceholderItem, YouTubeSource};
pub use reddit::{RedditPost, RedditSource};

/// Upper bound (in characters) for free-text fields such as `selftext` and `summary`.
pub const MAX_TEXT_CHARS: usize = 500;

/// Errors raised inside an adapter. Never leave the adapter: [`SourceResult::failed`] absorbs them.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("request failed: status {0}")]
    Status(u16),

    #[error("failed to parse response: {0}")]
    Parse(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum SourceKind {
    Reddit,
    Arxiv,
    Youtube,
    Medium,
}

impl SourceKind {
    pub const DEFAULT: [SourceKind; 2] = [SourceKind::Reddit, SourceKind::Arxiv];

    /// Key used in the aggregate output.
    pub fn key(self) -> &'static str {
        match self {
            SourceKind::Reddit => "reddit",
            SourceKind::Arxiv => "arxiv",
            SourceKind::Youtube => "youtube",
            SourceKind::Medium => "medium",
        }
    }

    /// Display label carried in `SourceResult::source`.
    pub fn label(self) -> &'static str {
        match self {
            SourceKind::Reddit => "Reddit",
            SourceKind::Arxiv => "ArXiv",
            SourceKind::Youtube => "YouTube",
            SourceKind::Medium => "Medium",
        }
    }

    /// Reddit is searched with the user's wording; every other source gets the English variant.
    pub fn wants_english(self) -> bool {
        !matches!(self, SourceKind::Reddit)
    }
}

/// One normalized hit. Serialized flat, so each variant keeps its source's own keys.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResultItem {
    Reddit(RedditPost),
    Arxiv(ArxivEntry),
    Placeholder(PlaceholderItem),
}

impl ResultItem {
    pub fn title(&self) -> &str {
        match self {
            ResultItem::Reddit(p) => &p.title,
            ResultItem::Arxiv(e) => &e.title,
            ResultItem::Placeholder(p) => &p.title,
        }
    }

    pub fn url(&self) -> &str {
        match self {
            ResultItem::Reddit(p) => &p.url,
            ResultItem::Arxiv(e) => &e.url,
            ResultItem::Placeholder(p) => &p.url,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceResult {
    pub source: &'static str,
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subreddit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    pub results: Vec<ResultItem>,
    pub total_results: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SourceResult {
    pub fn success(kind: SourceKind, query: &str, results: Vec<ResultItem>) -> Self {
        let total_results = results.len();
        Self {
            source: kind.label(),
            query: query.to_string(),
            subreddit: None,
            tag: None,
            results,
            total_results,
            error: None,
        }
    }

    pub fn failed(kind: SourceKind, query: &str, error: &SourceError) -> Self {
        Self {
            source: kind.label(),
            query: query.to_string(),
            subreddit: None,
            tag: None,
            results: Vec::new(),
            total_results: 0,
            error: Some(error.to_string()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// A searchable source. Implementations never fail: errors are folded into the returned result.
#[allow(async_fn_in_trait)]
pub trait SearchSource {
    fn kind(&self) -> SourceKind;

    async fn search(&self, http: &Client, query: &str) -> SourceResult;
}

/// Truncate to at most `max` characters without splitting a code point.
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((end, _)) => text[..end].to_string(),
        None => text.to_string(),
    }
}
