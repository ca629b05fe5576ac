use super::engine::{Analysis, ResearchReport};
use crate::markdown::{escape_link, single_line};

pub fn format_report(report: &ResearchReport) -> String {
    let mut output = format!("# Research: {}\n\n", single_line(&report.query));

    for (_, result) in report.results.iter() {
        output.push_str(&format!(
            "## {} ({} results)\n\n",
            result.source, result.total_results
        ));

        if let Some(error) = &result.error {
            output.push_str(&format!("> error: {}\n\n", single_line(error)));
            continue;
        }
        if result.query != report.query {
            output.push_str(&format!("_searched as: {}_\n\n", single_line(&result.query)));
        }
        if result.results.is_empty() {
            output.push_str("(no results)\n\n");
            continue;
        }
        for item in &result.results {
            output.push_str(&format!(
                "- [{}]({})\n",
                escape_link(item.title()),
                escape_link(item.url())
            ));
        }
        output.push('\n');
    }

    output.push_str("---\n\n## Analysis\n\n");
    output.push_str(&format_analysis(&report.analysis));
    output.push('\n');

    output
}

/// The summary text, or a one-line notice explaining why there is none.
pub fn format_analysis(analysis: &Analysis) -> String {
    match analysis {
        Analysis::Report(text) => text.clone(),
        Analysis::Unavailable => "(skipped: ANTHROPIC_API_KEY is not set)".to_string(),
        Analysis::Disabled => "(skipped)".to_string(),
        Analysis::Failed(reason) => format!("(analysis failed: {reason})"),
    }
}
