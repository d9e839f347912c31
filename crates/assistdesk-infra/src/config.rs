//! Client configuration loader for AssistDesk.
//!
//! Precedence, lowest first:
//! 1. built-in defaults ([`ClientConfig::default`])
//! 2. `{data_dir}/config.toml`
//! 3. a `.env` file in the working directory ([`load_dotenv`])
//! 4. `ASSISTDESK_*` environment variables
//!
//! A missing or malformed config file falls back to defaults with a warning;
//! a malformed environment value is an error because it was set explicitly.

use std::path::{Path, PathBuf};

use assistdesk_types::config::ClientConfig;

pub const CONFIG_FILE_NAME: &str = "config.toml";

pub const ENV_DATA_DIR: &str = "ASSISTDESK_DATA_DIR";
pub const ENV_API_BASE_URL: &str = "ASSISTDESK_API_BASE_URL";
pub const ENV_PATENT_API_URL: &str = "ASSISTDESK_PATENT_API_URL";
pub const ENV_PROCESS_API_URL: &str = "ASSISTDESK_PROCESS_API_URL";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "ASSISTDESK_REQUEST_TIMEOUT_SECS";
pub const ENV_REVEAL_TICK_MS: &str = "ASSISTDESK_REVEAL_TICK_MS";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Resolve the data directory from environment or platform defaults.
///
/// Priority:
/// 1. `ASSISTDESK_DATA_DIR` environment variable
/// 2. `~/.assistdesk`
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(ENV_DATA_DIR) {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".assistdesk");
    }

    PathBuf::from(".assistdesk")
}

/// Load `{data_dir}/config.toml`, falling back to defaults.
pub async fn load_file_config(data_dir: &Path) -> ClientConfig {
    let config_path = data_dir.join(CONFIG_FILE_NAME);

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return ClientConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return ClientConfig::default();
        }
    };

    match toml::from_str::<ClientConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            ClientConfig::default()
        }
    }
}

fn parse_positive(name: &str, raw: &str) -> Result<u64, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(0) => Err(ConfigError::InvalidValue(
            name.to_string(),
            "must be greater than zero".to_string(),
        )),
        Ok(value) => Ok(value),
        Err(e) => Err(ConfigError::InvalidValue(name.to_string(), e.to_string())),
    }
}

/// Apply `ASSISTDESK_*` overrides read through `lookup`.
pub fn apply_env_overrides<F>(config: &mut ClientConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(ENV_API_BASE_URL) {
        config.api_base_url = url;
    }
    if let Some(url) = lookup(ENV_PATENT_API_URL) {
        config.patent_api_url = url;
    }
    if let Some(url) = lookup(ENV_PROCESS_API_URL) {
        config.process_api_url = url;
    }
    if let Some(raw) = lookup(ENV_REQUEST_TIMEOUT_SECS) {
        config.request_timeout_secs = parse_positive(ENV_REQUEST_TIMEOUT_SECS, &raw)?;
    }
    if let Some(raw) = lookup(ENV_REVEAL_TICK_MS) {
        config.reveal_tick_ms = parse_positive(ENV_REVEAL_TICK_MS, &raw)?;
    }
    Ok(())
}

/// Load `.env` from the working directory (or a parent) into the process
/// environment. Variables already set are not overwritten.
///
/// Returns the file that was read, if any.
pub fn load_dotenv() -> Option<PathBuf> {
    match dotenvy::dotenv() {
        Ok(path) => {
            tracing::debug!(path = %path.display(), ".env loaded");
            Some(path)
        }
        Err(err) if err.not_found() => None,
        Err(err) => {
            tracing::warn!("Failed to read .env: {err}");
            None
        }
    }
}

/// Load the effective client configuration from `config.toml` and the
/// process environment. Call [`load_dotenv`] first to honor a `.env` file.
pub async fn load_client_config(data_dir: &Path) -> Result<ClientConfig, ConfigError> {
    let mut config = load_file_config(data_dir).await;
    apply_env_overrides(&mut config, |name| std::env::var(name).ok())?;
    tracing::debug!(
        api = %config.api_base_url,
        patent = %config.patent_api_url,
        process = %config.process_api_url,
        "client configuration loaded"
    );
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[tokio::test]
    async fn missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_file_config(tmp.path()).await;
        assert_eq!(config, ClientConfig::default());
    }

    #[tokio::test]
    async fn valid_toml_is_parsed() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(
            tmp.path().join(CONFIG_FILE_NAME),
            r#"
api_base_url = "http://files.internal:5000"
reveal_tick_ms = 10
"#,
        )
        .await
        .unwrap();

        let config = load_file_config(tmp.path()).await;
        assert_eq!(config.api_base_url, "http://files.internal:5000");
        assert_eq!(config.reveal_tick_ms, 10);
        assert_eq!(config.patent_api_url, ClientConfig::default().patent_api_url);
    }

    #[tokio::test]
    async fn invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(tmp.path().join(CONFIG_FILE_NAME), "this is not { valid toml !!!")
            .await
            .unwrap();

        let config = load_file_config(tmp.path()).await;
        assert_eq!(config, ClientConfig::default());
    }

    #[tokio::test]
    async fn environment_overrides_file() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(
            tmp.path().join(CONFIG_FILE_NAME),
            "process_api_url = \"http://from-file:8001\"\nrequest_timeout_secs = 5\n",
        )
        .await
        .unwrap();

        let mut config = load_file_config(tmp.path()).await;
        apply_env_overrides(
            &mut config,
            env(&[
                (ENV_PROCESS_API_URL, "http://from-env:9001"),
                (ENV_REVEAL_TICK_MS, "7"),
            ]),
        )
        .unwrap();

        assert_eq!(config.process_api_url, "http://from-env:9001");
        assert_eq!(config.request_timeout_secs, 5);
        assert_eq!(config.reveal_tick_ms, 7);
    }

    #[test]
    fn invalid_numeric_override_is_rejected() {
        let mut config = ClientConfig::default();
        let err = apply_env_overrides(&mut config, env(&[(ENV_REQUEST_TIMEOUT_SECS, "soon")]))
            .unwrap_err();
        assert!(err.to_string().contains(ENV_REQUEST_TIMEOUT_SECS));

        let err = apply_env_overrides(&mut config, env(&[(ENV_REVEAL_TICK_MS, "0")])).unwrap_err();
        assert!(err.to_string().contains("greater than zero"));
    }

    #[tokio::test]
    async fn loading_config_does_not_read_dotenv() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(tmp.path().join(".env"), "ASSISTDESK_REVEAL_TICK_MS=999\n")
            .await
            .unwrap();
        tokio::fs::write(tmp.path().join(CONFIG_FILE_NAME), "reveal_tick_ms = 4\n")
            .await
            .unwrap();

        let config = load_client_config(tmp.path()).await.unwrap();
        assert_eq!(config.reveal_tick_ms, 4);
        assert!(std::env::var(ENV_REVEAL_TICK_MS).is_err());
    }
}
