//! Navigation sections of the AssistDesk shell.

use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// Top-level views reachable from the sidebar menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Section {
    #[serde(rename = "chat")]
    Chat,
    #[serde(rename = "database")]
    Database,
    #[serde(rename = "knowledgeBase")]
    KnowledgeBase,
    #[serde(rename = "trainingData")]
    TrainingData,
    #[serde(rename = "feedback")]
    Feedback,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Section::Chat,
        Section::Database,
        Section::KnowledgeBase,
        Section::TrainingData,
        Section::Feedback,
    ];

    /// Menu key, identical to the serialized form.
    pub fn key(&self) -> &'static str {
        match self {
            Section::Chat => "chat",
            Section::Database => "database",
            Section::KnowledgeBase => "knowledgeBase",
            Section::TrainingData => "trainingData",
            Section::Feedback => "feedback",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Section::Chat => "Chat",
            Section::Database => "Database",
            Section::KnowledgeBase => "Knowledge Base",
            Section::TrainingData => "Training Data",
            Section::Feedback => "Feedback",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Section {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Section::ALL
            .into_iter()
            .find(|section| section.key() == s)
            .ok_or_else(|| format!("unknown section: '{s}'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_key_roundtrip() {
        for section in Section::ALL {
            assert_eq!(section.key().parse::<Section>().unwrap(), section);
        }
    }

    #[test]
    fn test_section_serde_matches_key() {
        let json = serde_json::to_string(&Section::KnowledgeBase).unwrap();
        assert_eq!(json, "\"knowledgeBase\"");
    }
}
