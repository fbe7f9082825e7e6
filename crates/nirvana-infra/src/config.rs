//! Configuration loader for Nirvana.
//!
//! Reads `nirvana.toml` (path chosen on the command line) into
//! [`AppConfig`] and loads the static prompt files it points at.
//!
//! - Missing config file: defaults.
//! - Unreadable or malformed file: [`ConfigError`], fatal at startup.

use std::path::Path;

use nirvana_types::config::{AppConfig, PromptConfig};
use nirvana_types::error::ConfigError;

/// Load configuration from `path`.
pub async fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config found at {}, using defaults", path.display());
            return Ok(AppConfig::default());
        }
        Err(source) => {
            return Err(ConfigError::Io {
                path: path.display().to_string(),
                source,
            });
        }
    };

    let config = toml::from_str::<AppConfig>(&content).map_err(|err| ConfigError::Invalid {
        path: path.display().to_string(),
        message: err.message().to_string(),
    })?;
    validate(&config).map_err(|message| ConfigError::Invalid {
        path: path.display().to_string(),
        message,
    })?;

    tracing::info!(path = %path.display(), "Configuration loaded");
    Ok(config)
}

fn validate(config: &AppConfig) -> Result<(), String> {
    if config.retrieval.result_limit == 0 {
        return Err("retrieval.result_limit must be at least 1".to_string());
    }
    if config.retrieval.hashing_dimension == 0 {
        return Err("retrieval.hashing_dimension must be at least 1".to_string());
    }
    if !(0.0..=2.0).contains(&config.llm.temperature) {
        return Err(format!(
            "llm.temperature must be within 0.0..=2.0, got {}",
            config.llm.temperature
        ));
    }
    if config.llm.model.trim().is_empty() {
        return Err("llm.model must not be empty".to_string());
    }
    Ok(())
}

/// Prompt texts loaded at startup.
#[derive(Debug, Clone)]
pub struct PromptSet {
    /// Seeds every chat conversation.
    pub assistant: String,
    /// System instruction for entry insights.
    pub insights: String,
}

/// Read both prompt files. An unreadable or blank file is an error.
pub async fn load_prompts(config: &PromptConfig) -> Result<PromptSet, ConfigError> {
    Ok(PromptSet {
        assistant: read_prompt("assistant", &config.assistant).await?,
        insights: read_prompt("insights", &config.insights).await?,
    })
}

async fn read_prompt(name: &str, path: &Path) -> Result<String, ConfigError> {
    let prompt_error = |message: String| ConfigError::Prompt {
        name: name.to_string(),
        path: path.display().to_string(),
        message,
    };

    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| prompt_error(e.to_string()))?;
    if text.trim().is_empty() {
        return Err(prompt_error("file is empty".to_string()));
    }

    tracing::debug!(prompt = name, path = %path.display(), chars = text.len(), "Prompt loaded");
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nirvana_types::config::EmbedderKind;
    use nirvana_types::llm::ProviderKind;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_config_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(&tmp.path().join("nirvana.toml")).await.unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.server.port, 8001);
    }

    #[tokio::test]
    async fn load_config_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nirvana.toml");
        tokio::fs::write(
            &path,
            r#"
[server]
port = 9000

[llm]
provider = "openai"
model = "gpt-4o-mini"
temperature = 0.2

[retrieval]
embedder = "hashing"
result_limit = 5
"#,
        )
        .await
        .unwrap();

        let config = load_config(&path).await.unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.llm.provider, ProviderKind::OpenAi);
        assert_eq!(config.llm.model, "gpt-4o-mini");
        assert_eq!(config.llm.api_key_env(), "OPENAI_API_KEY");
        assert_eq!(config.retrieval.embedder, EmbedderKind::Hashing);
        assert_eq!(config.retrieval.result_limit, 5);
        assert_eq!(config.retrieval.collection, "nirvana");
    }

    #[tokio::test]
    async fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nirvana.toml");
        tokio::fs::write(&path, "this is not { valid toml !!!")
            .await
            .unwrap();

        let err = load_config(&path).await.unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[tokio::test]
    async fn load_config_rejects_zero_result_limit() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nirvana.toml");
        tokio::fs::write(&path, "[retrieval]\nresult_limit = 0\n")
            .await
            .unwrap();

        let err = load_config(&path).await.unwrap_err();
        assert!(err.to_string().contains("result_limit"));
    }

    #[tokio::test]
    async fn load_config_directory_is_io_error() {
        let tmp = TempDir::new().unwrap();
        let err = load_config(tmp.path()).await.unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[tokio::test]
    async fn load_prompts_reads_both_files() {
        let tmp = TempDir::new().unwrap();
        let assistant = tmp.path().join("prompt.txt");
        let insights = tmp.path().join("insights.txt");
        tokio::fs::write(&assistant, "You are a gentle journaling companion.")
            .await
            .unwrap();
        tokio::fs::write(&insights, "Reflect on the entry.").await.unwrap();

        let prompts = load_prompts(&PromptConfig {
            assistant,
            insights,
        })
        .await
        .unwrap();
        assert_eq!(prompts.assistant, "You are a gentle journaling companion.");
        assert_eq!(prompts.insights, "Reflect on the entry.");
    }

    #[tokio::test]
    async fn load_prompts_missing_file_names_prompt() {
        let tmp = TempDir::new().unwrap();
        let assistant = tmp.path().join("prompt.txt");
        tokio::fs::write(&assistant, "hello").await.unwrap();

        let err = load_prompts(&PromptConfig {
            assistant,
            insights: tmp.path().join("missing.txt"),
        })
        .await
        .unwrap_err();
        match err {
            ConfigError::Prompt { name, path, .. } => {
                assert_eq!(name, "insights");
                assert!(path.ends_with("missing.txt"));
            }
            other => panic!("expected prompt error, got {other}"),
        }
    }

    #[tokio::test]
    async fn load_prompts_blank_file_is_error() {
        let tmp = TempDir::new().unwrap();
        let assistant = tmp.path().join("prompt.txt");
        let insights = tmp.path().join("insights.txt");
        tokio::fs::write(&assistant, "  \n").await.unwrap();
        tokio::fs::write(&insights, "ok").await.unwrap();

        let err = load_prompts(&PromptConfig {
            assistant,
            insights,
        })
        .await
        .unwrap_err();
        assert!(err.to_string().contains("file is empty"));
    }
}
