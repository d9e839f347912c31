//! Feedback page: submit feedback, show recent entries.

use anyhow::Result;
use clap::Subcommand;
use comfy_table::Cell;
use dialoguer::Input;
use serde_json::json;

use assistdesk_core::forms::FeedbackForm;
use assistdesk_types::resource::FeedbackEntry;

use crate::cli::ui;
use crate::state::AppState;

#[derive(Subcommand)]
pub enum FeedbackCommand {
    /// Submit feedback (prompts for missing values).
    Submit {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        feedback: Option<String>,
    },

    /// Show recent feedback.
    #[command(alias = "ls")]
    List,
}

pub async fn run(state: &AppState, action: FeedbackCommand, json: bool, quiet: bool) -> Result<()> {
    match action {
        FeedbackCommand::Submit { name, feedback } => submit(state, name, feedback, json, quiet).await,
        FeedbackCommand::List => list(state, json, quiet).await,
    }
}

fn ask(value: Option<String>, prompt: &str) -> Result<String> {
    match value {
        Some(v) => Ok(v),
        None => Ok(Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()?),
    }
}

pub async fn submit(
    state: &AppState,
    name: Option<String>,
    feedback: Option<String>,
    json: bool,
    quiet: bool,
) -> Result<()> {
    let form = FeedbackForm::new(ask(name, "Your name")?, ask(feedback, "Feedback")?);
    let entry = match form.validate() {
        Ok(entry) => entry,
        Err(errors) => {
            if json {
                println!("{}", json!({"ok": false, "errors": errors.to_string()}));
            } else {
                for field in &errors.fields {
                    ui::failure(&field.message);
                }
            }
            anyhow::bail!("{errors}");
        }
    };

    let spinner = ui::spinner("Submitting feedback...", quiet || json);
    let result = state.backends.main.submit_feedback(&entry).await;
    spinner.finish_and_clear();

    match result {
        Ok(response) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else {
                ui::success("Feedback submitted successfully!");
                if !response.recent_feedback.is_empty() {
                    print_entries(&response.recent_feedback);
                }
            }
            Ok(())
        }
        Err(err) => {
            if !json {
                ui::failure("Error submitting feedback. Please try again.");
            }
            Err(err.into())
        }
    }
}

pub async fn list(state: &AppState, json: bool, quiet: bool) -> Result<()> {
    let spinner = ui::spinner("Loading recent feedback...", quiet || json);
    let entries = state.backends.main.recent_feedback().await;
    spinner.finish_and_clear();
    let entries = entries?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else if entries.is_empty() {
        ui::info("No feedback yet.");
    } else {
        print_entries(&entries);
    }
    Ok(())
}

fn print_entries(entries: &[FeedbackEntry]) {
    let mut table = ui::table(&["Name", "Feedback"]);
    for entry in entries {
        table.add_row(vec![
            Cell::new(&entry.name),
            Cell::new(ui::truncate(&entry.feedback, 80)),
        ]);
    }
    println!("  Recent Feedback");
    println!("{table}");
    ui::count_footer(entries.len(), "response");
}
