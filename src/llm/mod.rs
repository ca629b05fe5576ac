//! Anthropic Messages API client used for query translation and report summarization.

pub mod client;
mod response;
pub mod types;

pub use client::{CompletionClient, LlmClient, LlmError};
