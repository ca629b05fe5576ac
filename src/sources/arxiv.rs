use quick_xml::Reader;
use quick_xml::events::Event;
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, warn};

use super::{
    MAX_TEXT_CHARS, ResultItem, SearchSource, SourceError, SourceKind, SourceResult,
    truncate_chars,
};

const API_BASE: &str = "https://export.arxiv.org";
const DEFAULT_MAX_RESULTS: u32 = 10;

/// One paper from the ArXiv Atom feed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArxivEntry {
    pub title: String,
    pub summary: String,
    pub url: String,
    pub published: String,
}

#[derive(Debug, Clone, Copy)]
enum Field {
    Title,
    Summary,
    Id,
    Published,
}

impl Field {
    fn from_tag(name: &[u8]) -> Option<Self> {
        match name {
            b"title" => Some(Field::Title),
            b"summary" => Some(Field::Summary),
            b"id" => Some(Field::Id),
            b"published" => Some(Field::Published),
            _ => None,
        }
    }
}

/// Fields collected while inside an `<entry>`. `Some` means the element was present.
#[derive(Default)]
struct PartialEntry {
    title: Option<String>,
    summary: Option<String>,
    id: Option<String>,
    published: Option<String>,
}

impl PartialEntry {
    fn slot(&mut self, field: Field) -> &mut String {
        let slot = match field {
            Field::Title => &mut self.title,
            Field::Summary => &mut self.summary,
            Field::Id => &mut self.id,
            Field::Published => &mut self.published,
        };
        slot.get_or_insert_with(String::new)
    }

    /// Entries without both a title and a summary are dropped.
    fn finish(self) -> Option<ArxivEntry> {
        let title = self.title?;
        let summary = self.summary?;
        Some(ArxivEntry {
            title: title.trim().to_string(),
            summary: truncate_chars(summary.trim(), MAX_TEXT_CHARS),
            url: self.id.map(|id| id.trim().to_string()).unwrap_or_default(),
            published: self
                .published
                .map(|p| p.trim().to_string())
                .unwrap_or_default(),
        })
    }
}

/// Parse an ArXiv Atom response into entries, in document order.
pub fn parse_feed(xml: &str) -> Result<Vec<ArxivEntry>, SourceError> {
    let mut reader = Reader::from_str(xml);
    let mut entries = Vec::new();
    let mut current: Option<PartialEntry> = None;
    let mut field: Option<Field> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = e.name();
                if name.as_ref() == b"entry" {
                    current = Some(PartialEntry::default());
                    field = None;
                } else if let Some(entry) = current.as_mut() {
                    field = Field::from_tag(name.as_ref());
                    if let Some(f) = field {
                        entry.slot(f);
                    }
                }
            }
            Ok(Event::Empty(e)) => {
                if let (Some(entry), Some(f)) =
                    (current.as_mut(), Field::from_tag(e.name().as_ref()))
                {
                    entry.slot(f);
                }
            }
            Ok(Event::Text(t)) => {
                if let (Some(entry), Some(f)) = (current.as_mut(), field) {
                    let text = t
                        .unescape()
                        .map_err(|e| SourceError::Parse(format!("invalid XML text: {e}")))?;
                    entry.slot(f).push_str(&text);
                }
            }
            Ok(Event::CData(c)) => {
                if let (Some(entry), Some(f)) = (current.as_mut(), field) {
                    entry.slot(f).push_str(&String::from_utf8_lossy(&c));
                }
            }
            Ok(Event::End(e)) => {
                if e.name().as_ref() == b"entry"
                    && let Some(entry) = current.take().and_then(PartialEntry::finish)
                {
                    entries.push(entry);
                }
                field = None;
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(SourceError::Parse(format!("invalid Atom feed: {e}"))),
        }
    }

    Ok(entries)
}

/// ArXiv metadata API (`/api/query`), relevance-sorted.
#[derive(Debug, Clone)]
pub struct ArxivSource {
    base_url: String,
    max_results: u32,
}

impl Default for ArxivSource {
    fn default() -> Self {
        Self {
            base_url: API_BASE.to_string(),
            max_results: DEFAULT_MAX_RESULTS,
        }
    }
}

impl ArxivSource {
    pub fn new(max_results: u32) -> Self {
        Self {
            max_results,
            ..Self::default()
        }
    }

    #[cfg(test)]
    pub(crate) fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.to_string();
        self
    }

    async fn fetch_entries(
        &self,
        http: &Client,
        query: &str,
    ) -> Result<Vec<ArxivEntry>, SourceError> {
        let url = url::Url::parse_with_params(
            &format!("{}/api/query", self.base_url),
            &[
                ("search_query", format!("all:{query}").as_str()),
                ("start", "0"),
                ("max_results", self.max_results.to_string().as_str()),
                ("sortBy", "relevance"),
                ("sortOrder", "descending"),
            ],
        )?;

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
        parse_feed(&body)
    }
}

impl SearchSource for ArxivSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Arxiv
    }

    async fn search(&self, http: &Client, query: &str) -> SourceResult {
        match self.fetch_entries(http, query).await {
            Ok(entries) => {
                debug!(entries = entries.len(), "arxiv search complete");
                SourceResult::success(
                    self.kind(),
                    query,
                    entries.into_iter().map(ResultItem::Arxiv).collect(),
                )
            }
            Err(e) => {
                warn!(error = %e, "arxiv search failed");
                SourceResult::failed(self.kind(), query, &e)
            }
        }
    }
}
