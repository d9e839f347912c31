//! Client for the general-purpose API: training data, file listings and
//! uploads, and feedback.
//!
//! List reads go through a [`CachedQuery`] per resource; each successful
//! mutation invalidates the tag of the lists it changes, so the next read
//! refetches.

use std::path::Path;
use std::time::Duration;

use assistdesk_core::request::{CachedQuery, ResourceTag, TagRegistry};
use assistdesk_observe::fields;
use assistdesk_types::config::ClientConfig;
use assistdesk_types::error::RequestError;
use assistdesk_types::resource::{
    FeedbackEntry, FileListingEntry, RecentFeedback, SubmitFeedbackResponse, TrainingDataInput,
    TrainingDataRecord, UploadResponse,
};
use reqwest::Method;
use tracing::info;

use crate::http::HttpClient;

const TRAINING_DATA_PATH: &str = "/api/training-data";
const UPLOAD_PATH: &str = "/upload";
const SUBMIT_FEEDBACK_PATH: &str = "/submit-feedback";
const RECENT_FEEDBACK_PATH: &str = "/get-recent-feedback";
const KNOWLEDGE_BASE_FILES_PATH: &str = "/api/knowledgebase/files";
const DATABASE_FILES_PATH: &str = "/api/Database/files";
const DATABASE_UPLOAD_PATH: &str = "/api/Database/upload";

pub struct MainApiClient {
    http: HttpClient,
    tags: TagRegistry,
    training_data: CachedQuery<Vec<TrainingDataRecord>>,
    recent_feedback: CachedQuery<Vec<FeedbackEntry>>,
    database_files: CachedQuery<Vec<FileListingEntry>>,
    knowledge_base_files: CachedQuery<Vec<FileListingEntry>>,
}

impl MainApiClient {
    pub fn new(config: &ClientConfig, tags: TagRegistry) -> Result<Self, RequestError> {
        let http = HttpClient::new(
            fields::BACKEND_GENERAL,
            &config.api_base_url,
            Duration::from_secs(config.request_timeout_secs),
        )?;
        Ok(Self::from_http(http, tags))
    }

    pub fn from_http(http: HttpClient, tags: TagRegistry) -> Self {
        Self {
            training_data: CachedQuery::new(ResourceTag::TrainingData, tags.clone()),
            recent_feedback: CachedQuery::new(ResourceTag::Feedback, tags.clone()),
            database_files: CachedQuery::new(ResourceTag::DatabaseFiles, tags.clone()),
            knowledge_base_files: CachedQuery::new(ResourceTag::KnowledgeBaseFiles, tags.clone()),
            http,
            tags,
        }
    }

    pub fn tags(&self) -> &TagRegistry {
        &self.tags
    }

    pub fn base_url(&self) -> &str {
        self.http.base_url()
    }

    fn invalidate(&self, tag: ResourceTag) {
        let generation = self.tags.invalidate(tag);
        info!(assistdesk.cache.tag = %tag, generation, "mutation succeeded, list marked stale");
    }

    // --- Training data ---

    pub async fn list_training_data(&self) -> Result<Vec<TrainingDataRecord>, RequestError> {
        self.training_data
            .get_or_fetch(|| self.http.get_json(TRAINING_DATA_PATH))
            .await
    }

    pub async fn add_training_data(
        &self,
        input: &TrainingDataInput,
    ) -> Result<TrainingDataRecord, RequestError> {
        let record = self
            .http
            .send_json(Method::POST, TRAINING_DATA_PATH, input)
            .await?;
        self.invalidate(ResourceTag::TrainingData);
        Ok(record)
    }

    pub async fn update_training_data(
        &self,
        id: i64,
        input: &TrainingDataInput,
    ) -> Result<TrainingDataRecord, RequestError> {
        let record = self
            .http
            .send_json(Method::PUT, &format!("{TRAINING_DATA_PATH}/{id}"), input)
            .await?;
        self.invalidate(ResourceTag::TrainingData);
        Ok(record)
    }

    pub async fn delete_training_data(&self, id: i64) -> Result<(), RequestError> {
        self.http
            .delete(&format!("{TRAINING_DATA_PATH}/{id}"))
            .await?;
        self.invalidate(ResourceTag::TrainingData);
        Ok(())
    }

    // --- Files ---

    /// Generic upload. Uploaded files feed the knowledge base.
    pub async fn upload_file(&self, file: &Path) -> Result<UploadResponse, RequestError> {
        let response = self.http.upload_file(UPLOAD_PATH, file).await?;
        self.invalidate(ResourceTag::KnowledgeBaseFiles);
        Ok(response)
    }

    pub async fn knowledge_base_files(&self) -> Result<Vec<FileListingEntry>, RequestError> {
        self.knowledge_base_files
            .get_or_fetch(|| self.http.get_json(KNOWLEDGE_BASE_FILES_PATH))
            .await
    }

    pub async fn database_files(&self) -> Result<Vec<FileListingEntry>, RequestError> {
        self.database_files
            .get_or_fetch(|| self.http.get_json(DATABASE_FILES_PATH))
            .await
    }

    pub async fn upload_database_file(&self, file: &Path) -> Result<UploadResponse, RequestError> {
        let response = self.http.upload_file(DATABASE_UPLOAD_PATH, file).await?;
        self.invalidate(ResourceTag::DatabaseFiles);
        Ok(response)
    }

    // --- Feedback ---

    pub async fn submit_feedback(
        &self,
        entry: &FeedbackEntry,
    ) -> Result<SubmitFeedbackResponse, RequestError> {
        let response = self
            .http
            .send_json(Method::POST, SUBMIT_FEEDBACK_PATH, entry)
            .await?;
        self.invalidate(ResourceTag::Feedback);
        Ok(response)
    }

    pub async fn recent_feedback(&self) -> Result<Vec<FeedbackEntry>, RequestError> {
        self.recent_feedback
            .get_or_fetch(|| async {
                let body: RecentFeedback = self.http.get_json(RECENT_FEEDBACK_PATH).await?;
                Ok(body.recent_feedback)
            })
            .await
    }
}
