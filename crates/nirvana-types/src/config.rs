//! Service configuration types for Nirvana.
//!
//! `AppConfig` represents `nirvana.toml`. Every section and field has a
//! default, so an absent file or an empty one yields a runnable config
//! (the API key itself always comes from the environment).

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::llm::ProviderKind;
use crate::retrieval::DEFAULT_COLLECTION;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub llm: LlmConfig,
    pub prompts: PromptConfig,
    pub retrieval: RetrievalConfig,
}

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8001,
        }
    }
}

/// Hosted chat-completion settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub provider: ProviderKind,
    /// Overrides the provider's default API base URL.
    pub base_url: Option<String>,
    pub model: String,
    pub temperature: f64,
    pub max_tokens: Option<u32>,
    /// Environment variable holding the API key. Defaults per provider.
    pub api_key_env: Option<String>,
}

impl LlmConfig {
    /// Name of the environment variable the API key is read from.
    pub fn api_key_env(&self) -> &str {
        match (&self.api_key_env, self.provider) {
            (Some(name), _) => name,
            (None, ProviderKind::Groq) => "GROQ_API_KEY",
            (None, ProviderKind::OpenAi) => "OPENAI_API_KEY",
            (None, ProviderKind::Gemini) => "GEMINI_API_KEY",
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Groq,
            base_url: None,
            model: "llama-3.1-70b-versatile".to_string(),
            temperature: 0.5,
            max_tokens: None,
            api_key_env: None,
        }
    }
}

/// Locations of the static prompt files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptConfig {
    /// System prompt that seeds every chat conversation.
    pub assistant: PathBuf,
    /// System instruction for journal-entry insights.
    pub insights: PathBuf,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            assistant: PathBuf::from("prompt.txt"),
            insights: PathBuf::from("insights.txt"),
        }
    }
}

/// Which embedding backend computes document vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmbedderKind {
    /// Local all-MiniLM-L6-v2 via ONNX runtime.
    Fastembed,
    /// Feature hashing; no model download.
    Hashing,
}

/// Retrieval store settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    pub collection: String,
    /// Maximum number of documents a query returns.
    pub result_limit: usize,
    /// Consult the store for context on every chat turn.
    pub chat_context: bool,
    pub embedder: EmbedderKind,
    /// Vector size for the hashing embedder.
    pub hashing_dimension: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            collection: DEFAULT_COLLECTION.to_string(),
            result_limit: 3,
            chat_context: true,
            embedder: EmbedderKind::Fastembed,
            hashing_dimension: 384,
        }
    }
}
