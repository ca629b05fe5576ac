use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{
    MAX_TEXT_CHARS, ResultItem, SearchSource, SourceError, SourceKind, SourceResult,
    truncate_chars,
};

const API_BASE: &str = "https://www.reddit.com";
/// Origin used to turn relative permalinks into absolute links.
pub const PERMALINK_ORIGIN: &str = "https://reddit.com";
const DEFAULT_SUBREDDIT: &str = "all";
const DEFAULT_LIMIT: u32 = 10;

/// Projection of one post in a Reddit search listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RedditPost {
    pub title: String,
    pub score: i64,
    pub url: String,
    pub author: String,
    pub subreddit: String,
    pub num_comments: u64,
    pub selftext: String,
}

#[derive(Deserialize, Default)]
struct Listing {
    #[serde(default)]
    data: ListingData,
}

#[derive(Deserialize, Default)]
struct ListingData {
    #[serde(default)]
    children: Vec<Child>,
}

#[derive(Deserialize)]
struct Child {
    #[serde(default)]
    data: PostData,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct PostData {
    title: Option<String>,
    score: Option<i64>,
    permalink: Option<String>,
    author: Option<String>,
    subreddit: Option<String>,
    num_comments: Option<u64>,
    selftext: Option<String>,
}

impl From<PostData> for RedditPost {
    fn from(post: PostData) -> Self {
        Self {
            title: post.title.unwrap_or_default(),
            score: post.score.unwrap_or(0),
            url: format!("{PERMALINK_ORIGIN}{}", post.permalink.unwrap_or_default()),
            author: post.author.unwrap_or_default(),
            subreddit: post.subreddit.unwrap_or_default(),
            num_comments: post.num_comments.unwrap_or(0),
            selftext: truncate_chars(&post.selftext.unwrap_or_default(), MAX_TEXT_CHARS),
        }
    }
}

/// Reddit public search (`/r/{subreddit}/search.json`). No authentication.
#[derive(Debug, Clone)]
pub struct RedditSource {
    base_url: String,
    subreddit: String,
    limit: u32,
}

impl Default for RedditSource {
    fn default() -> Self {
        Self {
            base_url: API_BASE.to_string(),
            subreddit: DEFAULT_SUBREDDIT.to_string(),
            limit: DEFAULT_LIMIT,
        }
    }
}

impl RedditSource {
    pub fn new(subreddit: impl Into<String>, limit: u32) -> Self {
        Self {
            subreddit: subreddit.into(),
            limit,
            ..Self::default()
        }
    }

    #[cfg(test)]
    pub(crate) fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.to_string();
        self
    }

    /// `{base}/r/{subreddit}/search.json?q=..&limit=..&sort=relevance`, with the
    /// subreddit encoded as a single path segment.
    fn search_url(&self, query: &str) -> Result<url::Url, SourceError> {
        let mut url = url::Url::parse(&self.base_url)?;
        url.path_segments_mut()
            .map_err(|()| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .pop_if_empty()
            .extend(["r", self.subreddit.as_str(), "search.json"]);
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("limit", &self.limit.to_string())
            .append_pair("sort", "relevance");
        Ok(url)
    }

    async fn fetch_posts(&self, http: &Client, query: &str) -> Result<Vec<RedditPost>, SourceError> {
        let url = self.search_url(query)?;

        let response = http
            .get(url)
            .header("User-Agent", crate::USER_AGENT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        let listing: Listing =
            serde_json::from_str(&body).map_err(|e| SourceError::Parse(e.to_string()))?;

        Ok(listing
            .data
            .children
            .into_iter()
            .map(|child| RedditPost::from(child.data))
            .collect())
    }
}

impl SearchSource for RedditSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Reddit
    }

    async fn search(&self, http: &Client, query: &str) -> SourceResult {
        match self.fetch_posts(http, query).await {
            Ok(posts) => {
                debug!(subreddit = %self.subreddit, posts = posts.len(), "reddit search complete");
                let mut result = SourceResult::success(
                    self.kind(),
                    query,
                    posts.into_iter().map(ResultItem::Reddit).collect(),
                );
                result.subreddit = Some(self.subreddit.clone());
                result
            }
            Err(e) => {
                warn!(subreddit = %self.subreddit, error = %e, "reddit search failed");
                SourceResult::failed(self.kind(), query, &e)
            }
        }
    }
}
