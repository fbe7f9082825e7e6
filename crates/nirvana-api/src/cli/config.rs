//! `nirvana config`: show the effective configuration.

use nirvana_types::config::AppConfig;

/// Render `config` as TOML followed by the API key status.
///
/// The key value itself is never printed, only whether it resolved.
pub fn render_config(config: &AppConfig, api_key_present: bool) -> anyhow::Result<String> {
    let mut out = toml::to_string_pretty(config)?;
    let status = if api_key_present { "<redacted>" } else { "<missing>" };
    out.push_str(&format!(
        "\n# API key from ${}: {status}\n",
        config.llm.api_key_env()
    ));
    Ok(out)
}
