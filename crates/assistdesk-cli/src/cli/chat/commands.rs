//! Slash command parsing for the chat loop.
//!
//! Commands start with `/` and control the conversation: stop a reply,
//! clear the log, save a transcript, copy a reply, review history.

use console::style;

/// A `/` command typed at the chat prompt.
#[derive(Debug, PartialEq)]
pub enum ChatCommand {
    Help,
    /// Stop the reply that is being revealed.
    Stop,
    /// Empty the conversation.
    Clear,
    /// Save the transcript, optionally to a given path.
    Save(Option<String>),
    /// Copy the latest bot reply to the clipboard.
    Copy,
    /// Show the conversation so far.
    History,
    Exit,
    /// Anything else starting with `/`; carries the lowercased name.
    Unknown(String),
}

/// Parse a prompt line. Plain messages (no leading `/`) yield `None`.
pub fn parse(input: &str) -> Option<ChatCommand> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    let (cmd, arg) = match trimmed.split_once(char::is_whitespace) {
        Some((cmd, rest)) => (cmd.to_lowercase(), Some(rest.trim()).filter(|a| !a.is_empty())),
        None => (trimmed.to_lowercase(), None),
    };

    match cmd.as_str() {
        "/help" | "/h" | "/?" => Some(ChatCommand::Help),
        "/stop" | "/s" => Some(ChatCommand::Stop),
        "/clear" | "/cls" => Some(ChatCommand::Clear),
        "/save" | "/export" => Some(ChatCommand::Save(arg.map(str::to_string))),
        "/copy" | "/c" => Some(ChatCommand::Copy),
        "/history" => Some(ChatCommand::History),
        "/exit" | "/quit" | "/q" => Some(ChatCommand::Exit),
        other => Some(ChatCommand::Unknown(other.to_string())),
    }
}

/// `/help` output.
pub fn help_text(default_transcript: &str) -> String {
    let rows = [
        ("/help", "Show this help message".to_string()),
        ("/stop", "Stop the reply being typed".to_string()),
        ("/clear", "Clear the conversation".to_string()),
        ("/save [file]", format!("Save the transcript (default: {default_transcript})")),
        ("/copy", "Copy the last reply to the clipboard".to_string()),
        ("/history", "Show the conversation so far".to_string()),
        ("/exit", "End the chat session".to_string()),
    ];

    let mut out = format!("\n  {}\n\n", style("Available commands:").bold());
    for (command, description) in rows {
        out.push_str(&format!("  {} {description}\n", style(format!("{command:<14}")).cyan()));
    }
    out.push_str(&format!("\n  {}\n", style("Ctrl+C stops a reply, Ctrl+D exits").dim()));
    out
}
