//! Markdown formatting for finished bot replies.
//!
//! Replies type out as plain text. `/history` reprints them through
//! `ChatRenderer`: prose via `termimad`, fenced code via `syntect`.

use assistdesk_types::chat::ChatMode;
use crossterm::style::Color;
use syntect::easy::HighlightLines;
use syntect::highlighting::{Style, Theme, ThemeSet};
use syntect::parsing::SyntaxSet;
use syntect::util::as_24_bit_terminal_escaped;
use termimad::MadSkin;
use termimad::crossterm::style::Color as SkinColor;

const CODE_THEME: &str = "base16-ocean.dark";

/// Accent color per chat mode.
pub fn mode_accent(mode: ChatMode) -> Color {
    match mode {
        ChatMode::Patent => Color::Cyan,
        ChatMode::Process => Color::Magenta,
    }
}

/// A run of reply text: one prose line or one fenced code block.
#[derive(Debug, PartialEq, Eq)]
enum Segment<'a> {
    Prose(&'a str),
    Code { lang: &'a str, body: Vec<&'a str> },
}

/// Split a reply on ``` fences. An unclosed fence runs to the end.
fn segments(markdown: &str) -> Vec<Segment<'_>> {
    let mut out = Vec::new();
    let mut open: Option<(&str, Vec<&str>)> = None;

    for line in markdown.lines() {
        let fence = line.strip_prefix("```");
        open = match (open, fence) {
            (None, Some(tag)) => Some((tag.trim(), Vec::new())),
            (None, None) => {
                out.push(Segment::Prose(line));
                None
            }
            (Some((lang, body)), Some(_)) => {
                out.push(Segment::Code { lang, body });
                None
            }
            (Some((lang, mut body)), None) => {
                body.push(line);
                Some((lang, body))
            }
        };
    }

    if let Some((lang, body)) = open.filter(|(_, body)| !body.is_empty()) {
        out.push(Segment::Code { lang, body });
    }
    out
}

pub struct ChatRenderer {
    skin: MadSkin,
    syntax_set: SyntaxSet,
    theme: Theme,
}

impl ChatRenderer {
    pub fn new(mode: ChatMode) -> Self {
        let accent = match mode_accent(mode) {
            Color::Magenta => SkinColor::Magenta,
            _ => SkinColor::Cyan,
        };

        let mut skin = MadSkin::default_dark();
        skin.bold.set_fg(accent);
        for header in skin.headers.iter_mut().take(2) {
            header.set_fg(accent);
        }
        skin.inline_code.set_fg(SkinColor::Yellow);

        let theme = ThemeSet::load_defaults()
            .themes
            .remove(CODE_THEME)
            .unwrap_or_default();

        Self {
            skin,
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme,
        }
    }

    /// Render a complete reply for the terminal.
    pub fn render_final(&self, markdown: &str) -> String {
        segments(markdown)
            .into_iter()
            .map(|segment| match segment {
                Segment::Prose(line) => self.skin.term_text(line).to_string(),
                Segment::Code { lang, body } => self.highlight(lang, &body),
            })
            .collect()
    }

    fn highlight(&self, lang: &str, body: &[&str]) -> String {
        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .filter(|_| !lang.is_empty())
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());
        let mut highlighter = HighlightLines::new(syntax, &self.theme);

        let label = if lang.is_empty() { "code" } else { lang };
        let mut out = format!("  {}\n", console::style(format!("[{label}]")).dim());
        for line in body {
            let ranges: Vec<(Style, &str)> = highlighter
                .highlight_line(line, &self.syntax_set)
                .unwrap_or_default();
            out.push_str("  ");
            out.push_str(&as_24_bit_terminal_escaped(&ranges, false));
            out.push_str("\x1b[0m\n");
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modes_have_distinct_accents() {
        assert_ne!(mode_accent(ChatMode::Patent), mode_accent(ChatMode::Process));
    }

    #[test]
    fn segments_split_prose_and_fences() {
        let parts = segments("Steps:\n```bash\nls\npwd\n```\nDone");
        assert_eq!(
            parts,
            vec![
                Segment::Prose("Steps:"),
                Segment::Code { lang: "bash", body: vec!["ls", "pwd"] },
                Segment::Prose("Done"),
            ]
        );
    }

    #[test]
    fn unclosed_fence_runs_to_end() {
        assert_eq!(
            segments("```\nstep one"),
            vec![Segment::Code { lang: "", body: vec!["step one"] }]
        );
        assert!(segments("```").is_empty());
    }

    #[test]
    fn code_blocks_carry_language_label() {
        let renderer = ChatRenderer::new(ChatMode::Patent);
        let out = renderer.render_final("Example:\n```rust\nfn main() {}\n```\n");
        assert!(out.contains("[rust]"));
        assert!(out.contains("main"));
    }
}
