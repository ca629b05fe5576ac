use std::time::{Duration, Instant};

use futures::future::join_all;
use reqwest::Client;
use tracing::{info, warn};

use super::aggregate::AggregateResult;
use super::lang::is_target_script;
use super::summary::summarize;
use super::translate::translate;
use crate::llm::CompletionClient;
use crate::sources::{
    ArxivSource, MediumSource, RedditSource, SearchSource, SourceError, SourceKind, SourceResult,
    YouTubeSource,
};

/// Ceiling applied to every outbound source request.
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const MAX_REDIRECTS: usize = 5;

/// The configured adapter for every known source.
#[derive(Debug, Clone, Default)]
pub struct Sources {
    pub reddit: RedditSource,
    pub arxiv: ArxivSource,
    pub youtube: YouTubeSource,
    pub medium: MediumSource,
}

impl Sources {
    async fn search(&self, kind: SourceKind, http: &Client, query: &str) -> SourceResult {
        match kind {
            SourceKind::Reddit => self.reddit.search(http, query).await,
            SourceKind::Arxiv => self.arxiv.search(http, query).await,
            SourceKind::Youtube => self.youtube.search(http, query).await,
            SourceKind::Medium => self.medium.search(http, query).await,
        }
    }
}

/// Outcome of the summarization step.
#[derive(Debug, Clone, PartialEq)]
pub enum Analysis {
    Report(String),
    /// No LLM credential configured.
    Unavailable,
    /// Turned off by the caller.
    Disabled,
    Failed(String),
}

#[derive(Debug)]
pub struct ResearchReport {
    pub query: String,
    pub results: AggregateResult,
    pub analysis: Analysis,
}

/// Fans a query out to the requested sources and joins their results.
pub struct Aggregator<C> {
    sources: Sources,
    llm: Option<C>,
}

impl<C: CompletionClient> Aggregator<C> {
    pub fn new(sources: Sources, llm: Option<C>) -> Self {
        Self { sources, llm }
    }

    /// Search every requested source concurrently.
    ///
    /// Every requested kind appears exactly once in the result, in request
    /// order, whether or not its adapter failed.
    pub async fn collect(&self, query: &str, requested: &[SourceKind]) -> AggregateResult {
        let kinds = dedup_sources(requested);
        let start = Instant::now();

        let english = if is_target_script(query) && kinds.iter().any(|k| k.wants_english()) {
            info!("non-English query detected, translating for English-language sources");
            translate(self.llm.as_ref(), query).await
        } else {
            query.to_string()
        };
        let query_for = |kind: SourceKind| {
            if kind.wants_english() {
                english.as_str()
            } else {
                query
            }
        };

        // One client per call, dropped on return.
        let http = match build_http_client() {
            Ok(http) => http,
            Err(e) => {
                let err = SourceError::Network(e);
                warn!(error = %err, "failed to build HTTP client");
                return kinds
                    .iter()
                    .map(|&kind| (kind, SourceResult::failed(kind, query_for(kind), &err)))
                    .collect();
            }
        };

        let searches = kinds
            .iter()
            .map(|&kind| self.sources.search(kind, &http, query_for(kind)));
        let outcomes = join_all(searches).await;

        let results: AggregateResult = kinds.into_iter().zip(outcomes).collect();
        info!(
            sources = results.len(),
            failed = results.failed(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "collection complete"
        );
        results
    }

    /// Collect, then summarize when asked to and a client is available.
    pub async fn research(
        &self,
        query: &str,
        requested: &[SourceKind],
        summarize_results: bool,
    ) -> ResearchReport {
        let results = self.collect(query, requested).await;

        let analysis = if !summarize_results {
            Analysis::Disabled
        } else {
            match summarize(self.llm.as_ref(), query, &results).await {
                Ok(Some(report)) => Analysis::Report(report),
                Ok(None) => Analysis::Unavailable,
                Err(e) => {
                    warn!(error = %e, "summarization failed");
                    Analysis::Failed(e.to_string())
                }
            }
        };

        ResearchReport {
            query: query.to_string(),
            results,
            analysis,
        }
    }
}

fn build_http_client() -> Result<Client, reqwest::Error> {
    Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .timeout(HTTP_TIMEOUT)
        .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
        .build()
}

fn dedup_sources(requested: &[SourceKind]) -> Vec<SourceKind> {
    let mut kinds = Vec::with_capacity(requested.len());
    for &kind in requested {
        if !kinds.contains(&kind) {
            kinds.push(kind);
        }
    }
    kinds
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::translate::mock::MockLlm;
    use crate::sources::arxiv::fixtures;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn reddit_listing(subreddit: &str) -> serde_json::Value {
        serde_json::json!({
            "data": {"children": [{"data": {
                "title": "Discussion",
                "score": 12,
                "permalink": format!("/r/{subreddit}/comments/x1/discussion/"),
                "author": "someone",
                "subreddit": subreddit,
                "num_comments": 3,
                "selftext": "text"
            }}]}
        })
    }

    fn arxiv_feed() -> String {
        fixtures::feed(&[
            fixtures::entry(1, Some("one")),
            fixtures::entry(2, Some("two")),
        ])
    }

    fn sources_for(server: &MockServer) -> Sources {
        Sources {
            reddit: RedditSource::default().with_base_url(&server.uri()),
            arxiv: ArxivSource::default().with_base_url(&server.uri()),
            ..Sources::default()
        }
    }

    async fn mount_reddit(server: &MockServer, q: &str) {
        Mock::given(method("GET"))
            .and(path("/r/all/search.json"))
            .and(query_param("q", q))
            .respond_with(ResponseTemplate::new(200).set_body_json(reddit_listing("all")))
            .mount(server)
            .await;
    }

    async fn mount_arxiv(server: &MockServer, q: &str) {
        Mock::given(method("GET"))
            .and(path("/api/query"))
            .and(query_param("search_query", format!("all:{q}")))
            .respond_with(ResponseTemplate::new(200).set_body_string(arxiv_feed()))
            .mount(server)
            .await;
    }

    #[test]
    fn dedup_keeps_first_occurrence_order() {
        let kinds = dedup_sources(&[
            SourceKind::Arxiv,
            SourceKind::Reddit,
            SourceKind::Arxiv,
            SourceKind::Medium,
        ]);
        assert_eq!(
            kinds,
            vec![SourceKind::Arxiv, SourceKind::Reddit, SourceKind::Medium]
        );
    }

    #[tokio::test]
    async fn collect_keys_follow_request_order() {
        let server = MockServer::start().await;
        mount_reddit(&server, "rust").await;
        mount_arxiv(&server, "rust").await;

        let aggregator = Aggregator::<MockLlm>::new(sources_for(&server), None);
        let requested = [
            SourceKind::Youtube,
            SourceKind::Arxiv,
            SourceKind::Medium,
            SourceKind::Reddit,
        ];
        let results = aggregator.collect("rust", &requested).await;

        assert_eq!(results.keys().collect::<Vec<_>>(), requested.to_vec());
        assert_eq!(results.failed(), 0);
        assert_eq!(results.get(SourceKind::Arxiv).unwrap().total_results, 2);
        assert_eq!(results.get(SourceKind::Reddit).unwrap().total_results, 1);
    }

    #[tokio::test]
    async fn collect_duplicate_sources_appear_once() {
        let server = MockServer::start().await;
        mount_arxiv(&server, "rust").await;

        let aggregator = Aggregator::<MockLlm>::new(sources_for(&server), None);
        let results = aggregator
            .collect("rust", &[SourceKind::Arxiv, SourceKind::Arxiv])
            .await;

        assert_eq!(results.len(), 1);
    }

    #[tokio::test]
    async fn collect_isolates_failing_source() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/r/all/search.json"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;
        mount_arxiv(&server, "machine learning").await;

        let aggregator = Aggregator::<MockLlm>::new(sources_for(&server), None);
        let results = aggregator
            .collect("machine learning", &SourceKind::DEFAULT)
            .await;

        let reddit = results.get(SourceKind::Reddit).unwrap();
        assert!(reddit.results.is_empty());
        assert!(reddit.error.as_deref().is_some_and(|e| !e.is_empty()));

        let arxiv = results.get(SourceKind::Arxiv).unwrap();
        assert!(arxiv.error.is_none());
        assert_eq!(arxiv.total_results, 2);
    }

    #[tokio::test]
    async fn collect_survives_unreachable_sources() {
        let sources = Sources {
            reddit: RedditSource::default().with_base_url("http://127.0.0.1:1"),
            arxiv: ArxivSource::default().with_base_url("http://127.0.0.1:1"),
            ..Sources::default()
        };
        let aggregator = Aggregator::<MockLlm>::new(sources, None);
        let results = aggregator
            .collect("anything", &[SourceKind::Reddit, SourceKind::Arxiv, SourceKind::Medium])
            .await;

        assert_eq!(results.len(), 3);
        assert_eq!(results.failed(), 2);
        assert!(!results.get(SourceKind::Medium).unwrap().is_error());
    }

    #[tokio::test]
    async fn japanese_query_translated_for_arxiv_only() {
        let server = MockServer::start().await;
        mount_reddit(&server, "量子コンピューティング").await;
        mount_arxiv(&server, "quantum computing").await;

        let llm = MockLlm::replying(vec!["quantum computing"]);
        let aggregator = Aggregator::new(sources_for(&server), Some(llm));
        let results = aggregator
            .collect("量子コンピューティング", &SourceKind::DEFAULT)
            .await;

        let reddit = results.get(SourceKind::Reddit).unwrap();
        assert!(reddit.error.is_none(), "reddit: {:?}", reddit.error);
        assert_eq!(reddit.query, "量子コンピューティング");

        let arxiv = results.get(SourceKind::Arxiv).unwrap();
        assert!(arxiv.error.is_none(), "arxiv: {:?}", arxiv.error);
        assert_eq!(arxiv.query, "quantum computing");

        let prompts = aggregator.llm.as_ref().unwrap().captured_prompts();
        assert_eq!(prompts, vec!["量子コンピューティング"]);
    }

    #[tokio::test]
    async fn japanese_query_without_credential_is_sent_as_is() {
        let server = MockServer::start().await;
        mount_reddit(&server, "量子コンピューティング").await;
        mount_arxiv(&server, "量子コンピューティング").await;

        let aggregator = Aggregator::<MockLlm>::new(sources_for(&server), None);
        let report = aggregator
            .research("量子コンピューティング", &SourceKind::DEFAULT, true)
            .await;

        assert_eq!(report.results.failed(), 0);
        assert_eq!(
            report.results.get(SourceKind::Arxiv).unwrap().query,
            "量子コンピューティング"
        );
        assert_eq!(report.analysis, Analysis::Unavailable);
    }

    #[tokio::test]
    async fn english_query_is_not_translated() {
        let server = MockServer::start().await;
        mount_arxiv(&server, "graph neural networks").await;

        let llm = MockLlm::replying(vec![]);
        let aggregator = Aggregator::new(sources_for(&server), Some(llm));
        aggregator
            .collect("graph neural networks", &[SourceKind::Arxiv])
            .await;

        assert!(aggregator.llm.as_ref().unwrap().captured_prompts().is_empty());
    }

    #[tokio::test]
    async fn reddit_only_request_skips_translation() {
        let server = MockServer::start().await;
        mount_reddit(&server, "機械学習").await;

        let llm = MockLlm::replying(vec!["machine learning"]);
        let aggregator = Aggregator::new(sources_for(&server), Some(llm));
        let results = aggregator.collect("機械学習", &[SourceKind::Reddit]).await;

        assert_eq!(results.failed(), 0);
        assert!(aggregator.llm.as_ref().unwrap().captured_prompts().is_empty());
    }

    #[tokio::test]
    async fn research_attaches_analysis() {
        let server = MockServer::start().await;
        mount_reddit(&server, "rust").await;
        mount_arxiv(&server, "rust").await;

        let llm = MockLlm::replying(vec!["Overview: Rust is popular."]);
        let aggregator = Aggregator::new(sources_for(&server), Some(llm));
        let report = aggregator
            .research("rust", &SourceKind::DEFAULT, true)
            .await;

        assert_eq!(
            report.analysis,
            Analysis::Report("Overview: Rust is popular.".into())
        );
        assert_eq!(report.query, "rust");
    }

    #[tokio::test]
    async fn research_disabled_does_not_call_llm() {
        let llm = MockLlm::replying(vec!["unused"]);
        let aggregator = Aggregator::new(Sources::default(), Some(llm));
        let report = aggregator
            .research("rust", &[SourceKind::Medium], false)
            .await;

        assert_eq!(report.analysis, Analysis::Disabled);
        assert!(aggregator.llm.as_ref().unwrap().captured_prompts().is_empty());
    }

    #[tokio::test]
    async fn research_reports_llm_failure() {
        let llm = MockLlm::failing(crate::llm::LlmError::RateLimited);
        let aggregator = Aggregator::new(Sources::default(), Some(llm));
        let report = aggregator
            .research("rust", &[SourceKind::Youtube], true)
            .await;

        assert!(matches!(report.analysis, Analysis::Failed(ref msg) if msg.contains("rate limit")));
        assert_eq!(report.results.len(), 1);
    }
}
