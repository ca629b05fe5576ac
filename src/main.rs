use std::time::Duration;

use clap::Parser;
use deep_research::cli::{self, Cli};
use deep_research::config::Config;
use deep_research::llm::LlmClient;
use deep_research::search::Aggregator;
use tracing::{info, warn};

const LLM_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let rust_log = std::env::var(tracing_subscriber::EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(cli::log_filter(cli.verbose, rust_log.as_deref()))
        .init();

    let config = Config::load();
    let llm_http = reqwest::Client::builder()
        .connect_timeout(LLM_CONNECT_TIMEOUT)
        .build()?;
    let llm = LlmClient::from_config(llm_http, &config);
    if llm.is_none() {
        warn!("ANTHROPIC_API_KEY not set: query translation and AI analysis are disabled");
    }
    info!(model = %config.model, "starting deep-research");

    let aggregator = Aggregator::new(cli.adapters(), llm);

    if cli.query.is_empty() {
        cli::run_interactive(&aggregator, &cli).await
    } else {
        cli::run_once(&aggregator, &cli).await
    }
}
