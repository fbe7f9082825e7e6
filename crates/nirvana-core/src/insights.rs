//! Journal-entry insights via a single stateless LLM call.
//!
//! `InsightsService::generate` sends the insights prompt as the system
//! message and the entry as the user message, and returns the model's raw
//! reply. No conversation is created or consulted.

use std::sync::Arc;

use nirvana_types::llm::{Message, RemoteServiceError};
use tracing::debug;

use crate::llm::box_provider::BoxLlmProvider;
use crate::llm::settings::GenerationSettings;

pub struct InsightsService {
    provider: Arc<BoxLlmProvider>,
    settings: GenerationSettings,
    prompt: String,
}

impl InsightsService {
    pub fn new(
        provider: Arc<BoxLlmProvider>,
        settings: GenerationSettings,
        prompt: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            settings,
            prompt: prompt.into(),
        }
    }

    #[tracing::instrument(
        name = "entry_insights",
        skip(self, entry),
        fields(model = %self.settings.model, entry_len = entry.len())
    )]
    pub async fn generate(&self, entry: &str) -> Result<String, RemoteServiceError> {
        let request = self
            .settings
            .request(vec![Message::system(self.prompt.as_str()), Message::user(entry)]);

        let response = self.provider.complete(&request).await?;
        debug!(output_tokens = response.usage.output_tokens, "Insights generated");
        Ok(response.content)
    }
}
