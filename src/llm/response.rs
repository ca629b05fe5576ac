use tracing::warn;

use super::types::MessagesResponse;

/// Concatenate the text blocks of a response. `None` when nothing textual came back.
pub fn extract_text(response: &MessagesResponse) -> Option<String> {
    let text: String = response
        .content
        .iter()
        .flatten()
        .filter(|block| block.kind == "text")
        .filter_map(|block| block.text.as_deref())
        .collect();

    if text.trim().is_empty() {
        warn!("LLM returned no text content");
        None
    } else {
        Some(text)
    }
}
