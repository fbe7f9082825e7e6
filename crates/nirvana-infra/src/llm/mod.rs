//! LLM provider implementations.
//!
//! [`create_provider`] builds the configured OpenAI-compatible provider
//! (Groq by default) behind a [`BoxLlmProvider`].

pub mod openai_compat;

use secrecy::SecretString;
use tracing::info;

use nirvana_core::llm::box_provider::BoxLlmProvider;
use nirvana_types::config::LlmConfig;

use self::openai_compat::OpenAiCompatibleProvider;

/// Create a [`BoxLlmProvider`] from the `[llm]` section and a resolved key.
pub fn create_provider(config: &LlmConfig, api_key: SecretString) -> BoxLlmProvider {
    let compat = openai_compat::config::preset(
        config.provider,
        api_key,
        &config.model,
        config.base_url.as_deref(),
    );
    info!(
        provider = %compat.provider_name,
        model = %compat.model,
        "LLM provider created"
    );
    BoxLlmProvider::new(OpenAiCompatibleProvider::new(compat))
}
