//! Application state wiring configuration and backend clients together.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;

use assistdesk_core::chat::RevealEngine;
use assistdesk_infra::backends::Backends;
use assistdesk_infra::config::{load_client_config, load_dotenv, resolve_data_dir};
use assistdesk_types::config::ClientConfig;

/// Shared application state, built once per process.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ClientConfig>,
    pub backends: Arc<Backends>,
    pub engine: RevealEngine,
    pub data_dir: PathBuf,
}

impl AppState {
    /// Load configuration and build the backend clients.
    pub async fn init() -> anyhow::Result<Self> {
        load_dotenv();
        let data_dir = resolve_data_dir();
        tokio::fs::create_dir_all(&data_dir)
            .await
            .with_context(|| format!("Failed to create data directory {}", data_dir.display()))?;

        let config = load_client_config(&data_dir).await?;
        Self::from_config(config, data_dir)
    }

    pub fn from_config(config: ClientConfig, data_dir: PathBuf) -> anyhow::Result<Self> {
        let engine = RevealEngine::new(Duration::from_millis(config.reveal_tick_ms))?;
        let backends = Backends::from_config(&config)?;

        tracing::debug!(data_dir = %data_dir.display(), "application state initialized");

        Ok(Self {
            config: Arc::new(config),
            backends: Arc::new(backends),
            engine,
            data_dir,
        })
    }

    /// Where `/save` writes when no path is given.
    pub fn default_transcript_path(&self) -> PathBuf {
        PathBuf::from(&self.config.transcript_file)
    }
}
