//! `adesk config show`: the effective client configuration.

use anyhow::Result;
use clap::Subcommand;
use console::style;

use assistdesk_infra::config::CONFIG_FILE_NAME;

use crate::state::AppState;

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Print the resolved configuration (defaults, config.toml, environment).
    Show,
}

pub async fn run(state: &AppState, action: ConfigCommand, json: bool) -> Result<()> {
    match action {
        ConfigCommand::Show => show(state, json),
    }
}

pub fn show(state: &AppState, json: bool) -> Result<()> {
    let config = &state.config;
    let config_file = state.data_dir.join(CONFIG_FILE_NAME);

    if json {
        let out = serde_json::json!({
            "version": env!("CARGO_PKG_VERSION"),
            "data_dir": state.data_dir.display().to_string(),
            "config_file": config_file.display().to_string(),
            "config_file_exists": config_file.exists(),
            "config": config.as_ref(),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!();
    println!("  {} AssistDesk v{}", style("*").cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!();

    println!("  {}", style("── Backends ──").dim());
    println!("  General: {}", style(&config.api_base_url).cyan());
    println!("  Patent:  {}", style(&config.patent_api_url).cyan());
    println!("  Process: {}", style(&config.process_api_url).cyan());
    println!();

    println!("  {}", style("── Client ──").dim());
    println!("  Request timeout: {}s", config.request_timeout_secs);
    println!("  Reveal tick:     {}ms", config.reveal_tick_ms);
    println!("  Transcript file: {}", config.transcript_file);
    println!();

    println!("  {}", style("── System ──").dim());
    println!("  Data dir:    {}", style(state.data_dir.display()).dim());
    let marker = if config_file.exists() { "" } else { " (not present, using defaults)" };
    println!("  Config file: {}{}", style(config_file.display()).dim(), marker);
    println!();

    Ok(())
}
