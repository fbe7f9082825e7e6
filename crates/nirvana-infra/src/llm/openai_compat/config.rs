//! Configuration and per-provider defaults for OpenAI-compatible providers.
//!
//! Groq, OpenAI and Gemini all speak the OpenAI chat-completions protocol;
//! each preset differs only in base URL and provider name.

use secrecy::SecretString;

use nirvana_types::llm::ProviderKind;

pub const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai";

/// Configuration for an OpenAI-compatible chat-completion endpoint.
///
/// Not `Debug`: it carries the API key.
pub struct OpenAiCompatConfig {
    /// Provider name used in logs (e.g., "groq").
    pub provider_name: String,
    pub base_url: String,
    pub api_key: SecretString,
    /// Model used when a request leaves `model` empty.
    pub model: String,
}

/// Default base URL for a provider preset.
pub fn default_base_url(kind: ProviderKind) -> &'static str {
    match kind {
        ProviderKind::Groq => GROQ_BASE_URL,
        ProviderKind::OpenAi => OPENAI_BASE_URL,
        ProviderKind::Gemini => GEMINI_BASE_URL,
    }
}

/// Preset for `kind`, optionally pointed at a different base URL.
pub fn preset(
    kind: ProviderKind,
    api_key: SecretString,
    model: &str,
    base_url: Option<&str>,
) -> OpenAiCompatConfig {
    OpenAiCompatConfig {
        provider_name: kind.to_string(),
        base_url: base_url.unwrap_or(default_base_url(kind)).to_string(),
        api_key,
        model: model.to_string(),
    }
}
