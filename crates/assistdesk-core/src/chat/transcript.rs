//! Plain-text transcript export.
//!
//! One line per message: `[timestamp] SENDER: text`. Line breaks inside a
//! message are written as the two characters `\n` so the line count always
//! equals the message count.

use assistdesk_types::chat::ChatMessage;

/// Render a message log as a transcript. Pure; an empty log renders as "".
pub fn render(messages: &[ChatMessage]) -> String {
    messages
        .iter()
        .map(|message| {
            let mut line = message.transcript_line();
            if line.contains('\n') || line.contains('\r') {
                line = line.replace("\r\n", "\\n").replace(['\n', '\r'], "\\n");
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<ChatMessage> {
        vec![
            ChatMessage::user("hello", "3:04:05 PM"),
            ChatMessage::bot("hi there", "3:04:06 PM"),
        ]
    }

    #[test]
    fn renders_one_line_per_message() {
        let text = render(&sample());
        assert_eq!(text, "[3:04:05 PM] USER: hello\n[3:04:06 PM] BOT: hi there");
        assert_eq!(text.lines().count(), 2);
    }

    #[test]
    fn render_is_deterministic() {
        assert_eq!(render(&sample()), render(&sample()));
    }

    #[test]
    fn multiline_replies_stay_on_one_line() {
        let messages = vec![
            ChatMessage::user("list please", "1:00:00 PM"),
            ChatMessage::bot("- one\n- two\r\n- three", "1:00:01 PM"),
        ];
        let text = render(&messages);
        assert_eq!(text.lines().count(), messages.len());
        assert!(text.ends_with("BOT: - one\\n- two\\n- three"));
    }

    #[test]
    fn empty_log_renders_empty() {
        assert_eq!(render(&[]), "");
    }
}
