use std::env;
use std::fmt;

const DEFAULT_MODEL: &str = "claude-3-5-haiku-latest";

/// Anthropic API credential. Never printed.
#[derive(Clone)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

/// Process configuration, resolved once at startup.
///
/// - `ANTHROPIC_API_KEY`: enables translation and summarization (optional)
/// - `ANTHROPIC_MODEL`: model override
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: Option<ApiKey>,
    pub model: String,
}

impl Config {
    /// Load `.env` (if any) and read the environment.
    pub fn load() -> Self {
        if let Err(e) = dotenvy::dotenv()
            && !e.not_found()
        {
            tracing::warn!(error = %e, "failed to read .env file");
        }
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let api_key = lookup("ANTHROPIC_API_KEY")
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .map(ApiKey);
        let model = lookup("ANTHROPIC_MODEL")
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());
        Self { api_key, model }
    }
}

#[cfg(test)]
impl ApiKey {
    pub(crate) fn for_tests() -> Self {
        ApiKey("test-key".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn missing_key_is_none() {
        let config = Config::from_lookup(lookup(&[]));
        assert!(config.api_key.is_none());
        assert_eq!(config.model, DEFAULT_MODEL);
    }

    #[test]
    fn blank_key_is_none() {
        let config = Config::from_lookup(lookup(&[("ANTHROPIC_API_KEY", "   ")]));
        assert!(config.api_key.is_none());
    }

    #[test]
    fn key_is_trimmed() {
        let config = Config::from_lookup(lookup(&[("ANTHROPIC_API_KEY", " sk-abc \n")]));
        assert_eq!(config.api_key.unwrap().expose(), "sk-abc");
    }

    #[test]
    fn model_override() {
        let config = Config::from_lookup(lookup(&[("ANTHROPIC_MODEL", "claude-custom")]));
        assert_eq!(config.model, "claude-custom");
    }

    #[test]
    fn debug_redacts_key() {
        let config = Config::from_lookup(lookup(&[("ANTHROPIC_API_KEY", "sk-secret")]));
        let printed = format!("{config:?}");
        assert!(!printed.contains("sk-secret"));
        assert!(printed.contains("[REDACTED]"));
    }
}
