//! Research orchestration: query translation, multi-source aggregation, summarization, and report formatting.

mod aggregate;
mod engine;
mod lang;
mod report;
mod summary;
mod translate;

pub use aggregate::AggregateResult;
pub use engine::{Aggregator, Analysis, ResearchReport, Sources};
pub use lang::is_target_script;
pub use report::{format_analysis, format_report};
pub use summary::{build_prompt, summarize};
pub use translate::translate;
