use tracing::{debug, info};

use super::aggregate::AggregateResult;
use crate::llm::{CompletionClient, LlmError};

const SUMMARY_MAX_TOKENS: u32 = 4096;

const ANALYST_INSTRUCTIONS: &str = "You are a research agent. You receive a topic from the user \
together with material collected from several media sources (Reddit, ArXiv, YouTube, Medium) \
and combine it into one comprehensive report.

Work in three phases:
1. Collection review: Reddit carries community discussion, first-hand experience and trends; \
ArXiv carries papers and scientific evidence; YouTube and Medium entries may be placeholders.
2. Analysis: judge how reliable each piece of information is, identify shared themes and \
patterns, and point out contradictions explicitly.
3. Synthesis: organize the information logically, summarize the key insights per source, and \
suggest areas that need further research.

Sources that report an error contributed nothing; mention them briefly and move on.";

/// Build the user prompt: the query followed by one JSON section per source.
pub fn build_prompt(query: &str, results: &AggregateResult) -> Result<String, serde_json::Error> {
    let mut prompt = format!("User query: {query}\n\nCollected data:\n");

    for (kind, result) in results.iter() {
        prompt.push_str(&format!("\n## {} results\n", kind.key().to_uppercase()));
        prompt.push_str(&serde_json::to_string_pretty(result)?);
        prompt.push('\n');
    }

    prompt.push_str(
        "\nAnalyze the data above and write a comprehensive report with these sections:\n\n\
         1. **Overview**: the big picture of the topic\n\
         2. **Key findings**: the important insights from each source\n\
         3. **Common themes**: patterns mentioned by more than one source\n\
         4. **Recommendations**: areas to investigate further and next steps\n\n\
         Write the report in the same language as the user query.\n",
    );

    Ok(prompt)
}

/// Ask the LLM for a report. `Ok(None)` when no client is configured.
pub async fn summarize(
    llm: Option<&impl CompletionClient>,
    query: &str,
    results: &AggregateResult,
) -> Result<Option<String>, LlmError> {
    let Some(llm) = llm else {
        debug!("no LLM configured, skipping summarization");
        return Ok(None);
    };

    let prompt = build_prompt(query, results)?;
    info!(bytes = prompt.len(), "requesting analysis");
    let report = llm
        .complete(ANALYST_INSTRUCTIONS, &prompt, SUMMARY_MAX_TOKENS)
        .await?;
    Ok(Some(report.trim().to_string()))
}
