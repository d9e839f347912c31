//! CLI command definitions and dispatch for the `adesk` binary.
//!
//! Uses clap derive macros for argument parsing. Running `adesk` without a
//! subcommand opens the interactive navigation shell; every page of the
//! shell is also reachable directly as a subcommand.

pub mod chat;
pub mod config;
pub mod feedback;
pub mod files;
pub mod shell;
pub mod training;
pub mod ui;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

use assistdesk_types::chat::ChatMode;

/// Terminal front-end for the AssistDesk assistant services.
#[derive(Parser)]
#[command(name = "adesk", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export tracing spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start an interactive chat.
    Chat {
        /// Chat backend to talk to.
        #[arg(default_value = "patent")]
        mode: ChatMode,
    },

    /// Ask a single question and print the revealed reply.
    Ask {
        /// Chat backend to ask (patent or process).
        mode: ChatMode,

        /// The question.
        text: String,

        /// Also write the transcript to this file.
        #[arg(long)]
        save: Option<String>,
    },

    /// Manage training-data Q&A pairs.
    #[command(alias = "td")]
    Training {
        #[command(subcommand)]
        action: training::TrainingCommand,
    },

    /// Database files (list, upload).
    #[command(alias = "db")]
    Database {
        #[command(subcommand)]
        action: files::DatabaseCommand,
    },

    /// Knowledge-base files.
    #[command(name = "knowledge-base", alias = "kb")]
    KnowledgeBase {
        #[command(subcommand)]
        action: files::KnowledgeBaseCommand,
    },

    /// Submit or list feedback.
    Feedback {
        #[command(subcommand)]
        action: feedback::FeedbackCommand,
    },

    /// Inspect client configuration.
    Config {
        #[command(subcommand)]
        action: config::ConfigCommand,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_opens_shell() {
        let cli = Cli::try_parse_from(["adesk"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn chat_mode_defaults_to_patent() {
        let cli = Cli::try_parse_from(["adesk", "chat"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Chat { mode: ChatMode::Patent })));

        let cli = Cli::try_parse_from(["adesk", "chat", "process"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Chat { mode: ChatMode::Process })));
    }

    #[test]
    fn ask_parses_mode_and_save() {
        let cli = Cli::try_parse_from(["adesk", "--json", "ask", "process", "who owns step 3?", "--save", "out.txt"])
            .unwrap();
        assert!(cli.json);
        match cli.command {
            Some(Commands::Ask { mode, text, save }) => {
                assert_eq!(mode, ChatMode::Process);
                assert_eq!(text, "who owns step 3?");
                assert_eq!(save.as_deref(), Some("out.txt"));
            }
            _ => panic!("expected ask"),
        }
    }

    #[test]
    fn unknown_mode_is_rejected() {
        assert!(Cli::try_parse_from(["adesk", "ask", "legal", "hi"]).is_err());
    }

    #[test]
    fn verbosity_counts() {
        let cli = Cli::try_parse_from(["adesk", "-vv", "config", "show"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }
}
