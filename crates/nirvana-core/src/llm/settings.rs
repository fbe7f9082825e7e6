//! Per-call generation settings shared by the chat and insights flows.

use nirvana_types::config::LlmConfig;
use nirvana_types::llm::{CompletionRequest, Message};

/// Model id and sampling parameters applied to every outgoing request.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSettings {
    pub model: String,
    pub temperature: Option<f64>,
    pub max_tokens: Option<u32>,
}

impl GenerationSettings {
    /// Build a completion request carrying these settings.
    pub fn request(&self, messages: Vec<Message>) -> CompletionRequest {
        CompletionRequest {
            model: self.model.clone(),
            messages,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }
}

impl From<&LlmConfig> for GenerationSettings {
    fn from(config: &LlmConfig) -> Self {
        Self {
            model: config.model.clone(),
            temperature: Some(config.temperature),
            max_tokens: config.max_tokens,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_follow_llm_config() {
        let settings = GenerationSettings::from(&LlmConfig::default());
        assert_eq!(settings.model, "llama-3.1-70b-versatile");
        assert_eq!(settings.temperature, Some(0.5));
        assert_eq!(settings.max_tokens, None);

        let request = settings.request(vec![Message::user("hi")]);
        assert_eq!(request.model, "llama-3.1-70b-versatile");
        assert_eq!(request.messages.len(), 1);
    }
}
