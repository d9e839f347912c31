//! Process-chat backend client.
//!
//! Besides chat, the process API accepts document uploads and curated
//! query/answer pairs.

use std::path::Path;
use std::time::Duration;

use assistdesk_core::chat::ChatBackend;
use assistdesk_observe::fields;
use assistdesk_types::chat::{ChatQuery, ChatReply};
use assistdesk_types::config::ClientConfig;
use assistdesk_types::error::RequestError;
use assistdesk_types::resource::{MessageResponse, TrainingDataInput};
use reqwest::Method;

use crate::http::HttpClient;

const CHAT_PATH: &str = "/chat";
const UPLOAD_DOCUMENTS_PATH: &str = "/upload_documents";
const SUBMIT_QUERY_PATH: &str = "/submit_query";

#[derive(Debug, Clone)]
pub struct ProcessChatClient {
    http: HttpClient,
}

impl ProcessChatClient {
    pub fn new(config: &ClientConfig) -> Result<Self, RequestError> {
        let http = HttpClient::new(
            fields::BACKEND_PROCESS,
            &config.process_api_url,
            Duration::from_secs(config.request_timeout_secs),
        )?;
        Ok(Self { http })
    }

    pub fn from_http(http: HttpClient) -> Self {
        Self { http }
    }

    /// Upload a document (typically CSV) for indexing.
    pub async fn upload_documents(&self, file: &Path) -> Result<MessageResponse, RequestError> {
        self.http.upload_file(UPLOAD_DOCUMENTS_PATH, file).await
    }

    /// Store a curated query/answer pair.
    pub async fn submit_query(&self, input: &TrainingDataInput) -> Result<MessageResponse, RequestError> {
        self.http.send_json(Method::POST, SUBMIT_QUERY_PATH, input).await
    }
}

impl ChatBackend for ProcessChatClient {
    fn name(&self) -> &str {
        fields::BACKEND_PROCESS
    }

    async fn send_message(&self, text: &str) -> Result<ChatReply, RequestError> {
        let query = ChatQuery {
            query: text.to_string(),
        };
        self.http.send_json(Method::POST, CHAT_PATH, &query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::Multipart;
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{json, Value};

    use crate::testing::{read_multipart, spawn_fake};

    fn fake_router() -> Router {
        Router::new()
            .route(
                "/chat",
                post(|Json(body): Json<Value>| async move {
                    Json(json!({ "response": body["query"] }))
                }),
            )
            .route(
                "/submit_query",
                post(|Json(body): Json<Value>| async move {
                    Json(json!({ "message": format!("stored {}", body["query"].as_str().unwrap()) }))
                }),
            )
            .route(
                "/upload_documents",
                post(|multipart: Multipart| async move {
                    let parts = read_multipart(multipart).await;
                    let (field, file_name, contents) = &parts[0];
                    Json(json!({ "message": format!("{field}:{file_name}:{}", contents.len()) }))
                }),
            )
    }

    fn client(base_url: &str) -> ProcessChatClient {
        ProcessChatClient::from_http(HttpClient::new("process", base_url, Duration::from_secs(5)).unwrap())
    }

    #[tokio::test]
    async fn chat_posts_query() {
        let fake = spawn_fake(fake_router()).await;
        let reply = client(&fake.base_url).send_message("echo me").await.unwrap();
        assert_eq!(reply.response, "echo me");
    }

    #[tokio::test]
    async fn submit_query_posts_pair() {
        let fake = spawn_fake(fake_router()).await;
        let input = TrainingDataInput { query: "q1".into(), answer: "a1".into() };
        let response = client(&fake.base_url).submit_query(&input).await.unwrap();
        assert_eq!(response.message, "stored q1");
    }

    #[tokio::test]
    async fn upload_documents_uses_file_field() {
        let fake = spawn_fake(fake_router()).await;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("steps.csv");
        tokio::fs::write(&path, "step,owner\n").await.unwrap();

        let response = client(&fake.base_url).upload_documents(&path).await.unwrap();
        assert_eq!(response.message, "file:steps.csv:11");
    }
}
