use std::{fmt, str::FromStr};

use crate::error_handler::ConfigError;

/// Backend used for chat completion or embeddings.
///
/// Parsed from `LLM_KIND` (case-insensitive):
///
/// ```
/// use ai_llm_service::LlmProvider;
///
/// assert_eq!("OpenAI".parse::<LlmProvider>().unwrap(), LlmProvider::OpenAI);
/// assert_eq!("ollama".parse::<LlmProvider>().unwrap(), LlmProvider::Ollama);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LlmProvider {
    /// Local Ollama runtime.
    Ollama,
    /// Hosted OpenAI API.
    OpenAI,
}

impl FromStr for LlmProvider {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" | "chatgpt" => Ok(Self::OpenAI),
            "ollama" => Ok(Self::Ollama),
            other => Err(ConfigError::UnsupportedProvider(other.to_string())),
        }
    }
}

impl fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ollama => f.write_str("Ollama"),
            Self::OpenAI => f.write_str("OpenAI"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_unknown_kind() {
        let err = "anthropic".parse::<LlmProvider>().unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedProvider(k) if k == "anthropic"));
    }

    #[test]
    fn chatgpt_is_an_openai_alias() {
        assert_eq!(" ChatGPT ".parse::<LlmProvider>().unwrap(), LlmProvider::OpenAI);
    }
}
