//! All three backend clients behind one handle, plus the writes that go to
//! two of them at once.

use std::path::Path;

use assistdesk_core::chat::BoxChatBackend;
use assistdesk_core::request::{join_both, FanOut, TagRegistry};
use assistdesk_observe::fields;
use assistdesk_types::chat::ChatMode;
use assistdesk_types::config::ClientConfig;
use assistdesk_types::error::RequestError;
use assistdesk_types::resource::{MessageResponse, TrainingDataInput, TrainingDataRecord, UploadResponse};
use tracing::{info_span, Instrument};

use crate::main_api::MainApiClient;
use crate::patent::PatentChatClient;
use crate::process::ProcessChatClient;

pub struct Backends {
    pub main: MainApiClient,
    pub patent: PatentChatClient,
    pub process: ProcessChatClient,
}

impl Backends {
    pub fn from_config(config: &ClientConfig) -> Result<Self, RequestError> {
        Ok(Self {
            main: MainApiClient::new(config, TagRegistry::new())?,
            patent: PatentChatClient::new(config)?,
            process: ProcessChatClient::new(config)?,
        })
    }

    /// Chat backend for a mode, type-erased for runtime selection.
    pub fn chat_backend(&self, mode: ChatMode) -> BoxChatBackend {
        match mode {
            ChatMode::Patent => BoxChatBackend::new(self.patent.clone()),
            ChatMode::Process => BoxChatBackend::new(self.process.clone()),
        }
    }

    /// Add a Q&A pair to the general training data and to the process API.
    pub async fn add_training_data_everywhere(
        &self,
        input: &TrainingDataInput,
    ) -> FanOut<TrainingDataRecord, MessageResponse> {
        let span = info_span!(fields::SPAN_FAN_OUT, operation = "add_training_data");
        join_both(
            fields::BACKEND_GENERAL,
            self.main.add_training_data(input),
            fields::BACKEND_PROCESS,
            self.process.submit_query(input),
        )
        .instrument(span)
        .await
    }

    /// Upload a file to the general API and the process API.
    pub async fn upload_everywhere(&self, file: &Path) -> FanOut<UploadResponse, MessageResponse> {
        let span = info_span!(fields::SPAN_FAN_OUT, operation = "upload", file = %file.display());
        join_both(
            fields::BACKEND_GENERAL,
            self.main.upload_file(file),
            fields::BACKEND_PROCESS,
            self.process.upload_documents(file),
        )
        .instrument(span)
        .await
    }
}
