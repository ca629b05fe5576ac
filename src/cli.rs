use std::io::{self, Write};

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::llm::CompletionClient;
use crate::search::{Aggregator, ResearchReport, Sources, format_analysis, format_report};
use crate::sources::{ArxivSource, MediumSource, RedditSource, SourceKind};

const EXIT_WORDS: [&str; 3] = ["exit", "quit", "終了"];
const DEFAULT_LOG_DIRECTIVE: &str = "deep_research=warn";
const VERBOSE_LOG_DIRECTIVE: &str = "deep_research=debug";

/// Multi-source research assistant: searches Reddit and ArXiv (YouTube and
/// Medium are placeholders) and summarizes the findings with Claude.
#[derive(Parser, Debug)]
#[command(name = "deep-research", version, about)]
pub struct Cli {
    /// Research query. Omit to start an interactive session.
    pub query: Vec<String>,

    /// Sources to search (repeat the flag or comma-separate)
    #[arg(
        short,
        long = "source",
        value_enum,
        value_delimiter = ',',
        default_values_t = SourceKind::DEFAULT.to_vec()
    )]
    pub sources: Vec<SourceKind>,

    /// Subreddit to search
    #[arg(long, default_value = "all")]
    pub subreddit: String,

    /// Maximum Reddit posts
    #[arg(long, default_value_t = 10)]
    pub limit: u32,

    /// Maximum ArXiv papers
    #[arg(long, default_value_t = 10)]
    pub max_results: u32,

    /// Medium tag carried on the placeholder result
    #[arg(long)]
    pub medium_tag: Option<String>,

    /// Print the collected results as JSON instead of Markdown
    #[arg(long)]
    pub json: bool,

    /// Skip the LLM analysis step
    #[arg(long)]
    pub no_summary: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn adapters(&self) -> Sources {
        Sources {
            reddit: RedditSource::new(&self.subreddit, self.limit),
            arxiv: ArxivSource::new(self.max_results),
            medium: self
                .medium_tag
                .as_deref()
                .map(MediumSource::with_tag)
                .unwrap_or_default(),
            ..Sources::default()
        }
    }
}

/// Build the log filter from `RUST_LOG` (when set) or the default directive.
/// `--verbose` is layered on top and wins for this crate's target.
pub fn log_filter(verbose: bool, rust_log: Option<&str>) -> EnvFilter {
    let mut directives = rust_log
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .unwrap_or(DEFAULT_LOG_DIRECTIVE)
        .to_string();
    if verbose {
        directives.push(',');
        directives.push_str(VERBOSE_LOG_DIRECTIVE);
    }
    EnvFilter::builder().parse_lossy(directives)
}

pub async fn run_once<C: CompletionClient>(
    aggregator: &Aggregator<C>,
    cli: &Cli,
) -> Result<(), Box<dyn std::error::Error>> {
    let query = cli.query.join(" ");
    info!(query = %query, sources = ?cli.sources, "single-shot research");
    eprintln!("Researching: {query}");

    let report = aggregator
        .research(&query, &cli.sources, !cli.no_summary)
        .await;
    emit(&report, cli.json)?;
    Ok(())
}

pub async fn run_interactive<C: CompletionClient>(
    aggregator: &Aggregator<C>,
    cli: &Cli,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("Deep Research: multi-source research assistant");
    println!("{}", "=".repeat(60));
    println!("Collects and combines material from Reddit, ArXiv, YouTube and Medium.");
    println!("Type 'exit' or 'quit' to leave.");
    println!("{}", "=".repeat(60));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("\nresearch> ");
        io::stdout().flush()?;

        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => {
                println!("\nSession interrupted.");
                break;
            }
        };
        let Some(line) = line else {
            break;
        };

        let query = line.trim();
        if is_exit(query) {
            println!("Session closed.");
            break;
        }
        if query.is_empty() {
            continue;
        }

        info!(query = %query, sources = ?cli.sources, "interactive research");
        println!("Researching: {query}\n{}", "-".repeat(60));

        let report = tokio::select! {
            report = aggregator.research(query, &cli.sources, !cli.no_summary) => report,
            _ = tokio::signal::ctrl_c() => {
                println!("\nSession interrupted.");
                break;
            }
        };
        emit(&report, cli.json)?;
    }

    Ok(())
}

fn is_exit(input: &str) -> bool {
    let lower = input.to_lowercase();
    EXIT_WORDS.contains(&lower.as_str())
}

/// Stdout carries the rendered report. In JSON mode that is the bare
/// `AggregateResult`, so the analysis (or its skip notice) goes to stderr.
fn emit(report: &ResearchReport, json: bool) -> Result<(), serde_json::Error> {
    println!("{}", render(report, json)?);
    if json {
        eprintln!("{}", format_analysis(&report.analysis));
    }
    Ok(())
}

fn render(report: &ResearchReport, json: bool) -> Result<String, serde_json::Error> {
    if json {
        serde_json::to_string_pretty(&report.results)
    } else {
        Ok(format_report(report))
    }
}
