//! Chat message and chat mode types for AssistDesk.
//!
//! A conversation is an ordered list of [`ChatMessage`] values. Messages are
//! value objects: the sender is fixed at creation, and the only message that
//! ever changes is the most recent bot turn while its reply is being revealed.

use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// Text shown in the transient bot turn while a reply is awaited.
pub const PLACEHOLDER_TEXT: &str = "Thinking...";

/// Terminal bot text used when a chat request fails.
pub const ERROR_REPLY_TEXT: &str = "Something went wrong!";

/// Who authored a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

impl Sender {
    /// Upper-case label used in transcripts (`USER`, `BOT`).
    pub fn label(&self) -> &'static str {
        match self {
            Sender::User => "USER",
            Sender::Bot => "BOT",
        }
    }
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sender::User => write!(f, "user"),
            Sender::Bot => write!(f, "bot"),
        }
    }
}

/// A single chat turn.
///
/// `timestamp` is a display string (local wall-clock time). It is empty for
/// the placeholder turn inserted while a reply is awaited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub text: String,
    pub sender: Sender,
    pub timestamp: String,
}

impl ChatMessage {
    /// A message typed by the user.
    pub fn user(text: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sender: Sender::User,
            timestamp: timestamp.into(),
        }
    }

    /// A bot message with the given text and timestamp.
    pub fn bot(text: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sender: Sender::Bot,
            timestamp: timestamp.into(),
        }
    }

    /// The transient "Thinking..." bot turn.
    pub fn placeholder() -> Self {
        Self::bot(PLACEHOLDER_TEXT, "")
    }

    pub fn is_placeholder(&self) -> bool {
        self.sender == Sender::Bot && self.timestamp.is_empty() && self.text == PLACEHOLDER_TEXT
    }

    /// Render as one transcript line: `[timestamp] SENDER: text`.
    pub fn transcript_line(&self) -> String {
        format!("[{}] {}: {}", self.timestamp, self.sender.label(), self.text)
    }
}

/// Which chat backend a conversation talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatMode {
    Patent,
    Process,
}

impl ChatMode {
    pub const ALL: [ChatMode; 2] = [ChatMode::Patent, ChatMode::Process];

    /// Menu key used by the navigation shell (`patent`, `process`).
    pub fn key(&self) -> &'static str {
        match self {
            ChatMode::Patent => "patent",
            ChatMode::Process => "process",
        }
    }

    /// Human-readable title.
    pub fn title(&self) -> &'static str {
        match self {
            ChatMode::Patent => "Patent Chat",
            ChatMode::Process => "Process Chat",
        }
    }

    /// Input hints shown when the chat opens.
    pub fn placeholders(&self) -> &'static [&'static str] {
        match self {
            ChatMode::Patent => &["Hello I am Patent Bot!", "Ask something from the Patent Data"],
            ChatMode::Process => &["Hello I am Process Bot!", "Ask something about the Process"],
        }
    }
}

impl fmt::Display for ChatMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ChatMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "patent" => Ok(ChatMode::Patent),
            "process" => Ok(ChatMode::Process),
            other => Err(format!("invalid chat mode: '{other}'")),
        }
    }
}

/// Request body for both chat backends.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatQuery {
    pub query: String,
}

/// Response body from both chat backends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    pub response: String,
}
