//! API key resolution.
//!
//! The chat-completion key is never stored in `nirvana.toml`. It is read
//! from the environment variable named by `llm.api_key_env`, after
//! populating the environment from a `.env` file when one exists.

use std::path::PathBuf;

use secrecy::SecretString;

use nirvana_types::config::LlmConfig;
use nirvana_types::error::ConfigError;

/// Load `.env` from the working directory or its parents, if present.
///
/// Variables already set in the process environment take precedence.
pub fn load_dotenv() -> Option<PathBuf> {
    match dotenvy::dotenv() {
        Ok(path) => {
            tracing::debug!(path = %path.display(), "Loaded .env");
            Some(path)
        }
        Err(err) if err.not_found() => None,
        Err(err) => {
            tracing::warn!("Ignoring unreadable .env: {err}");
            None
        }
    }
}

/// Resolve the API key from the process environment.
pub fn resolve_api_key(config: &LlmConfig) -> Result<SecretString, ConfigError> {
    resolve_api_key_with(config, |name| std::env::var(name).ok())
}

/// Resolve the API key through `lookup`. Blank values count as missing.
pub fn resolve_api_key_with(
    config: &LlmConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<SecretString, ConfigError> {
    let name = config.api_key_env();
    match lookup(name) {
        Some(value) if !value.trim().is_empty() => Ok(SecretString::from(value.trim().to_string())),
        _ => Err(ConfigError::MissingSecret(name.to_string())),
    }
}
