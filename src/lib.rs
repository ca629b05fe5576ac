//! Multi-source research aggregation: fan a query out to Reddit and ArXiv
//! (plus YouTube/Medium placeholders), join the results, and summarize them with an LLM.

pub mod cli;
pub mod config;
pub mod llm;
mod markdown;
pub mod search;
pub mod sources;

pub const USER_AGENT: &str = concat!("DeepResearch/", env!("CARGO_PKG_VERSION"));
