//! Async readline input for the chat loop.
//!
//! Wraps `rustyline_async::Readline` so the prompt stays usable while a
//! reply is being revealed; output goes through the paired `SharedWriter`.

use rustyline_async::{Readline, ReadlineError, ReadlineEvent, SharedWriter};

/// Events produced by the input handler.
#[derive(Debug, PartialEq)]
pub enum InputEvent {
    /// A submitted, trimmed, non-empty line.
    Line(String),
    /// Enter on an empty or whitespace-only line.
    Blank,
    /// Ctrl+D.
    Eof,
    /// Ctrl+C.
    Interrupted,
}

impl From<ReadlineEvent> for InputEvent {
    fn from(event: ReadlineEvent) -> Self {
        match event {
            ReadlineEvent::Line(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    InputEvent::Blank
                } else {
                    InputEvent::Line(trimmed.to_string())
                }
            }
            ReadlineEvent::Eof => InputEvent::Eof,
            ReadlineEvent::Interrupted => InputEvent::Interrupted,
        }
    }
}

pub struct ChatInput {
    rl: Readline,
}

impl ChatInput {
    /// Create the input handler and the writer that prints above the prompt.
    pub fn new(prompt: String) -> Result<(Self, SharedWriter), ReadlineError> {
        let (rl, stdout) = Readline::new(prompt)?;
        Ok((Self { rl }, stdout))
    }

    pub async fn read_line(&mut self) -> InputEvent {
        match self.rl.readline().await {
            Ok(event) => event.into(),
            Err(_) => InputEvent::Eof,
        }
    }

    /// Flush pending output before the terminal is handed back.
    pub fn flush(&mut self) {
        let _ = self.rl.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_are_trimmed() {
        assert_eq!(
            InputEvent::from(ReadlineEvent::Line("  hi there \n".into())),
            InputEvent::Line("hi there".into())
        );
    }

    #[test]
    fn whitespace_line_is_blank() {
        assert_eq!(InputEvent::from(ReadlineEvent::Line("   ".into())), InputEvent::Blank);
    }

    #[test]
    fn control_events_map_through() {
        assert_eq!(InputEvent::from(ReadlineEvent::Eof), InputEvent::Eof);
        assert_eq!(InputEvent::from(ReadlineEvent::Interrupted), InputEvent::Interrupted);
    }
}
