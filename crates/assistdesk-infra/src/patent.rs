//! Patent-chat backend client.

use std::time::Duration;

use assistdesk_core::chat::ChatBackend;
use assistdesk_observe::fields;
use assistdesk_types::chat::{ChatQuery, ChatReply};
use assistdesk_types::config::ClientConfig;
use assistdesk_types::error::RequestError;
use reqwest::Method;

use crate::http::HttpClient;

const QUERY_PATH: &str = "/query";

/// Answers chat queries through `POST {patent}/query`.
#[derive(Debug, Clone)]
pub struct PatentChatClient {
    http: HttpClient,
}

impl PatentChatClient {
    pub fn new(config: &ClientConfig) -> Result<Self, RequestError> {
        let http = HttpClient::new(
            fields::BACKEND_PATENT,
            &config.patent_api_url,
            Duration::from_secs(config.request_timeout_secs),
        )?;
        Ok(Self { http })
    }

    pub fn from_http(http: HttpClient) -> Self {
        Self { http }
    }
}

impl ChatBackend for PatentChatClient {
    fn name(&self) -> &str {
        fields::BACKEND_PATENT
    }

    async fn send_message(&self, text: &str) -> Result<ChatReply, RequestError> {
        let query = ChatQuery {
            query: text.to_string(),
        };
        self.http.send_json(Method::POST, QUERY_PATH, &query).await
    }
}
