use std::fmt;

use thiserror::Error;

/// Errors from calls to the backend services.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    /// The backend could not be reached.
    #[error("network error: {0}")]
    Network(String),

    #[error("request timed out")]
    Timeout,

    /// The backend answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("failed to decode response: {0}")]
    Decode(String),

    /// A local file could not be read for upload.
    #[error("io error: {0}")]
    Io(String),
}

impl RequestError {
    /// HTTP status code, when the failure came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            RequestError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The `message` field of a JSON error body, if present.
    pub fn server_message(&self) -> Option<String> {
        let RequestError::HttpStatus { body, .. } = self else {
            return None;
        };
        let value: serde_json::Value = serde_json::from_str(body).ok()?;
        value
            .get("message")
            .and_then(|m| m.as_str())
            .map(str::to_string)
    }

    /// User-facing text for a failed upload.
    pub fn upload_failure_message(&self) -> String {
        match self {
            RequestError::HttpStatus { status: 404, .. } => {
                "Upload failed: Endpoint not found (404)".to_string()
            }
            RequestError::HttpStatus { status: 500, .. } => {
                "Upload failed: Internal Server Error (500)".to_string()
            }
            RequestError::Network(_) | RequestError::Timeout => {
                "Network error: Could not connect to server.".to_string()
            }
            other => other
                .server_message()
                .unwrap_or_else(|| "Unknown error occurred during upload!".to_string()),
        }
    }
}

/// Errors from the conversation controller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChatError {
    #[error("message is empty")]
    EmptyMessage,

    #[error("a reply is still pending; wait for it or clear the chat")]
    Busy,
}

/// A single invalid form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Client-side validation failure. Blocks submission; nothing is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors {
    pub fields: Vec<FieldError>,
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.fields.iter().map(|e| e.message.as_str()).collect();
        f.write_str(&messages.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

impl ValidationErrors {
    /// Message for a specific field, if that field failed.
    pub fn message_for(&self, field: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.field == field)
            .map(|f| f.message.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_failure_messages() {
        let not_found = RequestError::HttpStatus { status: 404, body: String::new() };
        assert_eq!(not_found.upload_failure_message(), "Upload failed: Endpoint not found (404)");

        let server = RequestError::HttpStatus { status: 500, body: String::new() };
        assert_eq!(server.upload_failure_message(), "Upload failed: Internal Server Error (500)");

        let network = RequestError::Network("connection refused".into());
        assert_eq!(network.upload_failure_message(), "Network error: Could not connect to server.");

        let custom = RequestError::HttpStatus {
            status: 422,
            body: r#"{"message": "Only CSV files are accepted"}"#.into(),
        };
        assert_eq!(custom.upload_failure_message(), "Only CSV files are accepted");

        let opaque = RequestError::HttpStatus { status: 400, body: "bad".into() };
        assert_eq!(opaque.upload_failure_message(), "Unknown error occurred during upload!");
    }

    #[test]
    fn test_request_error_display() {
        let err = RequestError::HttpStatus { status: 503, body: "down".into() };
        assert_eq!(err.to_string(), "HTTP 503: down");
    }

    #[test]
    fn test_validation_errors_display() {
        let err = ValidationErrors {
            fields: vec![
                FieldError { field: "query", message: "Please enter a query".into() },
                FieldError { field: "answer", message: "Please enter an answer".into() },
            ],
        };
        assert_eq!(err.to_string(), "Please enter a query; Please enter an answer");
        assert_eq!(err.message_for("answer"), Some("Please enter an answer"));
        assert_eq!(err.message_for("name"), None);
    }
}
