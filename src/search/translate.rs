use tracing::{debug, warn};

use crate::llm::CompletionClient;

const TRANSLATE_MAX_TOKENS: u32 = 256;

const TRANSLATE_INSTRUCTION: &str = "Translate the user's search query into concise English \
suitable for an academic and web search engine. Reply with the translated query only: \
no quotes, no explanation.";

/// English variant of `text`, best effort.
///
/// Without a client this is the identity. A failed or empty completion also
/// falls back to the original text.
pub async fn translate(llm: Option<&impl CompletionClient>, text: &str) -> String {
    let Some(llm) = llm else {
        debug!("no LLM configured, skipping translation");
        return text.to_string();
    };

    match llm
        .complete(TRANSLATE_INSTRUCTION, text, TRANSLATE_MAX_TOKENS)
        .await
    {
        Ok(translated) => {
            let translated = translated.trim();
            if translated.is_empty() {
                warn!("translation came back empty, using original query");
                text.to_string()
            } else {
                debug!(original = %text, translated = %translated, "query translated");
                translated.to_string()
            }
        }
        Err(e) => {
            warn!(error = %e, "translation failed, using original query");
            text.to_string()
        }
    }
}
