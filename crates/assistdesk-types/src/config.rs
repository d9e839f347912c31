//! Client configuration types for AssistDesk.
//!
//! `ClientConfig` holds the three backend base URLs plus a few client-side
//! tunables. It is loaded from `config.toml` and overridden by environment
//! variables (see `assistdesk_infra::config`).

use serde::{Deserialize, Serialize};

/// Top-level client configuration. All fields have defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the general-purpose API (training data, files, feedback).
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Base URL of the patent-chat API.
    #[serde(default = "default_patent_api_url")]
    pub patent_api_url: String,

    /// Base URL of the process-chat API.
    #[serde(default = "default_process_api_url")]
    pub process_api_url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Interval between typing-reveal ticks, in milliseconds.
    #[serde(default = "default_reveal_tick_ms")]
    pub reveal_tick_ms: u64,

    /// File name used when saving a chat transcript without an explicit path.
    #[serde(default = "default_transcript_file")]
    pub transcript_file: String,
}

fn default_api_base_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

fn default_patent_api_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_process_api_url() -> String {
    "http://127.0.0.1:8001".to_string()
}

fn default_request_timeout_secs() -> u64 {
    60
}

fn default_reveal_tick_ms() -> u64 {
    3
}

fn default_transcript_file() -> String {
    "chats.txt".to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            patent_api_url: default_patent_api_url(),
            process_api_url: default_process_api_url(),
            request_timeout_secs: default_request_timeout_secs(),
            reveal_tick_ms: default_reveal_tick_ms(),
            transcript_file: default_transcript_file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_config_default_values() {
        let config = ClientConfig::default();
        assert_eq!(config.reveal_tick_ms, 3);
        assert_eq!(config.request_timeout_secs, 60);
        assert_eq!(config.transcript_file, "chats.txt");
    }

    #[test]
    fn test_client_config_deserialize_with_defaults() {
        let config: ClientConfig = toml::from_str("").unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn test_client_config_deserialize_partial() {
        let toml_str = r#"
patent_api_url = "http://patent.internal:9000"
reveal_tick_ms = 10
"#;
        let config: ClientConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.patent_api_url, "http://patent.internal:9000");
        assert_eq!(config.reveal_tick_ms, 10);
        assert_eq!(config.api_base_url, default_api_base_url());
    }
}
