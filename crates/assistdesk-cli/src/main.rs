//! AssistDesk terminal client entry point.
//!
//! Binary name: `adesk`
//!
//! Parses CLI arguments, sets up tracing, loads the client configuration,
//! then dispatches to a command handler or opens the navigation shell.

mod cli;
mod state;

use clap::Parser;
use clap_complete::generate;

use assistdesk_observe::tracing_setup::{init_tracing, shutdown_tracing, verbosity_filter};

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Err(e) = init_tracing(verbosity_filter(cli.verbose, cli.quiet), cli.otel) {
        eprintln!("Warning: failed to initialize tracing: {e}");
    }

    let result = run(cli).await;
    shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // Shell completions don't need app state
    if let Some(Commands::Completions { shell }) = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "adesk", &mut std::io::stdout());
        return Ok(());
    }

    let state = AppState::init().await?;
    let (json, quiet) = (cli.json, cli.quiet);

    match cli.command {
        None => cli::shell::run_shell(&state, quiet).await?,

        Some(Commands::Chat { mode }) => {
            cli::chat::loop_runner::run_chat_loop(&state, mode).await?;
        }

        Some(Commands::Ask { mode, text, save }) => {
            cli::chat::ask::ask_once(&state, mode, &text, save.as_deref(), json, quiet).await?;
        }

        Some(Commands::Training { action }) => {
            cli::training::run(&state, action, json, quiet).await?;
        }

        Some(Commands::Database { action }) => {
            cli::files::run_database(&state, action, json, quiet).await?;
        }

        Some(Commands::KnowledgeBase { action }) => {
            cli::files::run_knowledge_base(&state, action, json, quiet).await?;
        }

        Some(Commands::Feedback { action }) => {
            cli::feedback::run(&state, action, json, quiet).await?;
        }

        Some(Commands::Config { action }) => {
            cli::config::run(&state, action, json).await?;
        }

        // Handled before state init
        Some(Commands::Completions { .. }) => {}
    }

    Ok(())
}
