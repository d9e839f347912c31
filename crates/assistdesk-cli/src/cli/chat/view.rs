//! Turns message store events into terminal output.
//!
//! The terminal is append-only, so a bot turn is printed as one growing
//! line: each reveal tick only writes the characters not yet on screen. The
//! line is closed when the turn finishes, when the next message arrives, or
//! when the conversation is cleared.

use assistdesk_core::chat::StoreEvent;
use assistdesk_types::chat::{ChatMessage, ChatMode, Sender, ERROR_REPLY_TEXT};
use console::style;

/// "Patent Bot" / "Process Bot".
pub fn bot_label(mode: ChatMode) -> String {
    match mode {
        ChatMode::Patent => "Patent Bot".to_string(),
        ChatMode::Process => "Process Bot".to_string(),
    }
}

#[derive(Debug)]
pub struct TranscriptView {
    bot_label: String,
    echo_user: bool,
    /// A bot line is open and `shown` is what it displays so far.
    open: bool,
    shown: String,
}

impl TranscriptView {
    /// `echo_user` prints user turns too; the chat prompt already echoes them.
    pub fn new(bot_label: impl Into<String>, echo_user: bool) -> Self {
        Self {
            bot_label: bot_label.into(),
            echo_user,
            open: false,
            shown: String::new(),
        }
    }

    /// Output for one store event. May be empty.
    pub fn apply(&mut self, event: &StoreEvent) -> String {
        match event {
            StoreEvent::Appended(message) => {
                let mut out = self.finish();
                match message.sender {
                    Sender::User => {
                        if self.echo_user {
                            out.push_str(&format!(
                                "  {} {}\n",
                                style("You >").green().bold(),
                                message.text
                            ));
                        }
                    }
                    Sender::Bot => out.push_str(&self.show_bot(message)),
                }
                out
            }
            StoreEvent::LastReplaced(message) => match message.sender {
                Sender::Bot => self.show_bot(message),
                Sender::User => String::new(),
            },
            StoreEvent::Cleared => {
                let mut out = self.finish();
                out.push_str(&format!("  {}\n", style("Conversation cleared.").dim()));
                out
            }
        }
    }

    /// Close the open bot line, if any.
    pub fn finish(&mut self) -> String {
        self.shown.clear();
        if std::mem::take(&mut self.open) {
            "\n".to_string()
        } else {
            String::new()
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    fn prefix(&self) -> String {
        format!("  {} ", style(format!("{} >", self.bot_label)).cyan().bold())
    }

    fn show_bot(&mut self, message: &ChatMessage) -> String {
        if message.is_placeholder() {
            let mut out = self.finish();
            out.push_str(&format!("{}{}\n", self.prefix(), style(&message.text).dim()));
            return out;
        }

        if message.text == ERROR_REPLY_TEXT && !message.timestamp.is_empty() {
            let mut out = self.finish();
            out.push_str(&format!("{}{}\n", self.prefix(), style(&message.text).red()));
            return out;
        }

        if self.open {
            if let Some(delta) = message.text.strip_prefix(self.shown.as_str()) {
                let delta = delta.to_string();
                self.shown.push_str(&delta);
                return delta;
            }
            // Not a continuation; start over on a fresh line.
            let mut out = self.finish();
            out.push_str(&self.open_line(&message.text));
            return out;
        }

        self.open_line(&message.text)
    }

    fn open_line(&mut self, text: &str) -> String {
        self.open = true;
        self.shown = text.to_string();
        format!("{}{text}", self.prefix())
    }
}
