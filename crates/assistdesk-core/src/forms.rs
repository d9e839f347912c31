//! Client-side validation for the training-data and feedback forms.
//!
//! Whitespace-only values count as missing. Valid forms produce request
//! bodies with trimmed values.

use assistdesk_types::error::{FieldError, ValidationErrors};
use assistdesk_types::resource::{FeedbackEntry, TrainingDataInput};

fn require(
    errors: &mut Vec<FieldError>,
    field: &'static str,
    value: &str,
    message: &str,
) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.push(FieldError {
            field,
            message: message.to_string(),
        });
    }
    trimmed.to_string()
}

fn finish<T>(errors: Vec<FieldError>, value: T) -> Result<T, ValidationErrors> {
    if errors.is_empty() {
        Ok(value)
    } else {
        Err(ValidationErrors { fields: errors })
    }
}

/// Add/edit form for a training-data Q&A pair.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrainingDataForm {
    pub query: String,
    pub answer: String,
}

impl TrainingDataForm {
    pub fn new(query: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            answer: answer.into(),
        }
    }

    pub fn validate(&self) -> Result<TrainingDataInput, ValidationErrors> {
        let mut errors = Vec::new();
        let query = require(&mut errors, "query", &self.query, "Please enter a query");
        let answer = require(&mut errors, "answer", &self.answer, "Please enter an answer");
        finish(errors, TrainingDataInput { query, answer })
    }
}

/// Feedback submission form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedbackForm {
    pub name: String,
    pub feedback: String,
}

impl FeedbackForm {
    pub fn new(name: impl Into<String>, feedback: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            feedback: feedback.into(),
        }
    }

    pub fn validate(&self) -> Result<FeedbackEntry, ValidationErrors> {
        let mut errors = Vec::new();
        let name = require(&mut errors, "name", &self.name, "Please enter your name");
        let feedback = require(
            &mut errors,
            "feedback",
            &self.feedback,
            "Please enter your feedback",
        );
        finish(errors, FeedbackEntry { name, feedback })
    }
}
