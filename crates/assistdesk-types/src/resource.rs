//! Remote resource rows and request/response bodies for the general API.
//!
//! These mirror the backend's JSON shapes. They are only created by decoding
//! responses or by the forms that build request bodies.

use serde::{Deserialize, Serialize};

/// A training-data Q&A pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingDataRecord {
    pub id: i64,
    pub query: String,
    pub answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<String>,
}

/// Body for creating or updating training data.
///
/// The process API's `/submit_query` takes the same shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingDataInput {
    pub query: String,
    pub answer: String,
}

/// One feedback entry.
///
/// The backend sends recent feedback either as `{"name", "feedback"}`
/// objects or as `[name, feedback]` pairs; both decode to this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedbackEntry {
    pub name: String,
    pub feedback: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FeedbackWire {
    Object { name: String, feedback: String },
    Pair(String, String),
}

impl<'de> Deserialize<'de> for FeedbackEntry {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Ok(match FeedbackWire::deserialize(deserializer)? {
            FeedbackWire::Object { name, feedback } => FeedbackEntry { name, feedback },
            FeedbackWire::Pair(name, feedback) => FeedbackEntry { name, feedback },
        })
    }
}

/// Response from `POST /submit-feedback`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitFeedbackResponse {
    pub message: String,
    #[serde(default)]
    pub recent_feedback: Vec<FeedbackEntry>,
}

/// Response from `GET /get-recent-feedback`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecentFeedback {
    #[serde(default)]
    pub recent_feedback: Vec<FeedbackEntry>,
}

/// A stored file as listed by the database and knowledge-base endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileListingEntry {
    pub file_name: String,
    pub download_url: String,
    /// Size in bytes.
    pub size: u64,
    pub uploaded_at: String,
}

impl FileListingEntry {
    /// Size rendered as kilobytes with two decimals, e.g. `1.50 KB`.
    pub fn size_kb(&self) -> String {
        format!("{:.2} KB", self.size as f64 / 1024.0)
    }
}

/// File descriptor returned by the upload endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFile {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
}

/// Response from `POST /upload` and `POST /api/Database/upload`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub message: String,
    #[serde(default)]
    pub file: Option<UploadedFile>,
}

/// A bare `{ "message": ... }` acknowledgement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feedback_decodes_pairs() {
        let json = r#"{"recent_feedback": [["Ada", "Great tool"], ["Linus", "Fast"]]}"#;
        let parsed: RecentFeedback = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.recent_feedback.len(), 2);
        assert_eq!(parsed.recent_feedback[0].name, "Ada");
        assert_eq!(parsed.recent_feedback[1].feedback, "Fast");
    }

    #[test]
    fn test_feedback_decodes_objects() {
        let json = r#"{"message": "ok", "recent_feedback": [{"name": "Ada", "feedback": "Nice"}]}"#;
        let parsed: SubmitFeedbackResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.message, "ok");
        assert_eq!(
            parsed.recent_feedback,
            vec![FeedbackEntry { name: "Ada".into(), feedback: "Nice".into() }]
        );
    }

    #[test]
    fn test_training_record_without_updated() {
        let json = r#"{"id": 7, "query": "q", "answer": "a"}"#;
        let record: TrainingDataRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, 7);
        assert!(record.updated.is_none());
    }

    #[test]
    fn test_size_kb() {
        let entry = FileListingEntry {
            file_name: "a.csv".into(),
            download_url: "http://x/a.csv".into(),
            size: 1536,
            uploaded_at: "2025-01-01".into(),
        };
        assert_eq!(entry.size_kb(), "1.50 KB");
    }
}
