//! YouTube and Medium stand-ins. They make no outbound call and always succeed,
//! so the fan-out contract stays uniform across every source.

use reqwest::Client;
use serde::Serialize;

use super::{ResultItem, SearchSource, SourceKind, SourceResult};

const DEFAULT_YOUTUBE_RESULTS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaceholderItem {
    pub title: String,
    pub description: String,
    pub url: String,
    pub note: String,
}

#[derive(Debug, Clone)]
pub struct YouTubeSource {
    max_results: usize,
}

impl Default for YouTubeSource {
    fn default() -> Self {
        Self {
            max_results: DEFAULT_YOUTUBE_RESULTS,
        }
    }
}

impl SearchSource for YouTubeSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Youtube
    }

    async fn search(&self, _http: &Client, query: &str) -> SourceResult {
        let item = PlaceholderItem {
            title: format!("Video about {query}"),
            description: "Placeholder result: YouTube Data API integration is not implemented."
                .to_string(),
            url: "https://youtube.com/watch?v=example".to_string(),
            note: "Requires a YouTube Data API v3 key (YOUTUBE_API_KEY)".to_string(),
        };
        let mut result =
            SourceResult::success(self.kind(), query, vec![ResultItem::Placeholder(item)]);
        result.total_results = self.max_results;
        result
    }
}

#[derive(Debug, Clone, Default)]
pub struct MediumSource {
    tag: Option<String>,
}

impl MediumSource {
    pub fn with_tag(tag: impl Into<String>) -> Self {
        Self {
            tag: Some(tag.into()),
        }
    }
}

impl SearchSource for MediumSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Medium
    }

    async fn search(&self, _http: &Client, query: &str) -> SourceResult {
        let item = PlaceholderItem {
            title: format!("Article about {query}"),
            description: "Placeholder result: Medium has no free public search API.".to_string(),
            url: "https://medium.com/example".to_string(),
            note: "Use Medium's tag RSS feeds (https://medium.com/feed/tag/<tag>) or scraping (check the ToS)"
                .to_string(),
        };
        let mut result =
            SourceResult::success(self.kind(), query, vec![ResultItem::Placeholder(item)]);
        result.tag = self.tag.clone();
        result
    }
}
