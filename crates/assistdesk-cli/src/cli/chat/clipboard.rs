//! `/copy`: put a bot reply on the system clipboard.

use arboard::Clipboard;

use assistdesk_types::chat::{ChatMessage, Sender};

/// Text of the most recent bot reply, skipping the pending placeholder and
/// empty replies.
pub fn last_bot_reply(messages: &[ChatMessage]) -> Option<&str> {
    messages
        .iter()
        .rev()
        .find(|m| m.sender == Sender::Bot && !m.is_placeholder() && !m.text.is_empty())
        .map(|m| m.text.as_str())
}

/// Copy `text` to the system clipboard.
pub fn copy_to_clipboard(text: &str) -> Result<(), arboard::Error> {
    let mut clipboard = Clipboard::new().inspect_err(|e| {
        tracing::warn!(error = %e, "clipboard unavailable");
    })?;
    clipboard.set_text(text)?;
    tracing::debug!(chars = text.chars().count(), "reply copied to clipboard");
    Ok(())
}
