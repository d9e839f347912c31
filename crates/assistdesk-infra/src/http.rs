//! Thin JSON-over-HTTP wrapper shared by the backend clients.
//!
//! Wraps a `reqwest::Client` bound to one base URL and maps every failure
//! into [`RequestError`]:
//!
//! | failure | variant |
//! |---|---|
//! | request exceeded the client timeout | `Timeout` |
//! | connection refused, DNS, TLS, ... | `Network` |
//! | non-2xx status | `HttpStatus { status, body }` |
//! | body is not the expected JSON | `Decode` |
//! | upload file unreadable | `Io` |

use std::path::Path;
use std::time::Duration;

use assistdesk_observe::fields;
use assistdesk_types::error::RequestError;
use reqwest::multipart::{Form, Part};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info_span, Instrument};

/// Multipart field name every upload endpoint expects.
pub const UPLOAD_FIELD: &str = "file";

/// HTTP client bound to a single backend origin.
#[derive(Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    base_url: String,
    backend: &'static str,
}

impl HttpClient {
    /// Create a client for `base_url`. `backend` names it in spans and logs.
    pub fn new(
        backend: &'static str,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, RequestError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RequestError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            backend,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn backend(&self) -> &'static str {
        self.backend
    }

    /// Full URL for a path such as `/api/training-data`.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, RequestError> {
        let body = self.send(Method::GET, path, |request| request).await?;
        decode(&body)
    }

    /// Send `body` as JSON and decode a JSON response.
    pub async fn send_json<B, T>(&self, method: Method, path: &str, body: &B) -> Result<T, RequestError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let text = self.send(method, path, |request| request.json(body)).await?;
        decode(&text)
    }

    /// Issue a DELETE; the response body is ignored.
    pub async fn delete(&self, path: &str) -> Result<(), RequestError> {
        self.send(Method::DELETE, path, |request| request).await?;
        Ok(())
    }

    /// Upload a local file as multipart field `file`.
    pub async fn upload_file<T: DeserializeOwned>(
        &self,
        path: &str,
        file: &Path,
    ) -> Result<T, RequestError> {
        let form = file_form(file).await?;
        let text = self
            .send(Method::POST, path, move |request| request.multipart(form))
            .await?;
        decode(&text)
    }

    async fn send<F>(&self, method: Method, path: &str, build: F) -> Result<String, RequestError>
    where
        F: FnOnce(RequestBuilder) -> RequestBuilder,
    {
        let span = info_span!(
            fields::SPAN_HTTP_REQUEST,
            assistdesk.backend = self.backend,
            http.request.method = %method,
            url.path = path,
            http.response.status_code = tracing::field::Empty,
        );

        async {
            let request = build(self.client.request(method, self.url(path)));
            let response = request.send().await.map_err(map_transport_error)?;

            let status = response.status();
            tracing::Span::current().record("http.response.status_code", status.as_u16());

            let body = response.text().await.map_err(map_transport_error)?;
            if !status.is_success() {
                debug!(status = status.as_u16(), "backend returned error status");
                return Err(RequestError::HttpStatus {
                    status: status.as_u16(),
                    body,
                });
            }
            Ok(body)
        }
        .instrument(span)
        .await
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("backend", &self.backend)
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Classify a transport-level reqwest failure.
pub fn map_transport_error(err: reqwest::Error) -> RequestError {
    if err.is_timeout() {
        RequestError::Timeout
    } else if err.is_decode() {
        RequestError::Decode(err.to_string())
    } else {
        RequestError::Network(err.to_string())
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, RequestError> {
    serde_json::from_str(body).map_err(|e| RequestError::Decode(e.to_string()))
}

async fn file_form(path: &Path) -> Result<Form, RequestError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| RequestError::Io(format!("{}: {e}", path.display())))?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());

    Ok(Form::new().part(UPLOAD_FIELD, Part::bytes(bytes).file_name(file_name)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{spawn_fake, FakeBackend};
    use axum::http::StatusCode;
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::{json, Value};

    #[test]
    fn url_joins_without_double_slash() {
        let client = HttpClient::new("general", "http://localhost:5000/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url(), "http://localhost:5000");
        assert_eq!(client.url("/upload"), "http://localhost:5000/upload");
    }

    #[tokio::test]
    async fn non_success_status_keeps_body() {
        let fake: FakeBackend = spawn_fake(Router::new().route(
            "/broken",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, r#"{"message":"db down"}"#) }),
        ))
        .await;
        let client = HttpClient::new("general", &fake.base_url, Duration::from_secs(5)).unwrap();

        let err = client.get_json::<Value>("/broken").await.unwrap_err();
        assert_eq!(err.status(), Some(500));
        assert_eq!(err.server_message().as_deref(), Some("db down"));
    }

    #[tokio::test]
    async fn unexpected_body_is_decode_error() {
        let fake = spawn_fake(Router::new().route("/text", get(|| async { "not json" }))).await;
        let client = HttpClient::new("general", &fake.base_url, Duration::from_secs(5)).unwrap();

        let err = client.get_json::<Value>("/text").await.unwrap_err();
        assert!(matches!(err, RequestError::Decode(_)));
    }

    #[tokio::test]
    async fn slow_backend_times_out() {
        let fake = spawn_fake(Router::new().route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Json(json!({}))
            }),
        ))
        .await;
        let client = HttpClient::new("general", &fake.base_url, Duration::from_millis(100)).unwrap();

        let err = client.get_json::<Value>("/slow").await.unwrap_err();
        assert_eq!(err, RequestError::Timeout);
    }

    #[tokio::test]
    async fn unreachable_backend_is_network_error() {
        let client = HttpClient::new("general", "http://127.0.0.1:9", Duration::from_secs(5)).unwrap();
        let err = client.get_json::<Value>("/anything").await.unwrap_err();
        assert!(matches!(err, RequestError::Network(_)));
        assert_eq!(err.upload_failure_message(), "Network error: Could not connect to server.");
    }

    #[tokio::test]
    async fn missing_upload_file_is_io_error() {
        let fake = spawn_fake(Router::new().route("/upload", post(|| async { Json(json!({})) }))).await;
        let client = HttpClient::new("general", &fake.base_url, Duration::from_secs(5)).unwrap();

        let err = client
            .upload_file::<Value>("/upload", Path::new("/definitely/not/here.csv"))
            .await
            .unwrap_err();
        assert!(matches!(err, RequestError::Io(_)));
    }
}
