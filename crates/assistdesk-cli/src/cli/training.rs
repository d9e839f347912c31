//! Training-data page: list, add, edit, delete, upload.
//!
//! Adds go to the general API and the process API at the same time, and so
//! do uploads; both report each backend's outcome.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Subcommand;
use comfy_table::Cell;
use console::style;
use dialoguer::{Confirm, Input};
use serde_json::json;

use assistdesk_core::forms::TrainingDataForm;
use assistdesk_core::request::FanOut;
use assistdesk_types::error::ValidationErrors;
use assistdesk_types::resource::TrainingDataRecord;

use crate::cli::ui;
use crate::state::AppState;

#[derive(Subcommand)]
pub enum TrainingCommand {
    /// List training-data Q&A pairs.
    #[command(alias = "ls")]
    List {
        /// Page to show (5 rows per page).
        #[arg(long, default_value_t = 1)]
        page: usize,
    },

    /// Add a Q&A pair (prompts for missing values).
    Add {
        #[arg(long)]
        query: Option<String>,
        #[arg(long)]
        answer: Option<String>,
    },

    /// Edit an existing Q&A pair.
    Edit {
        id: i64,
        #[arg(long)]
        query: Option<String>,
        #[arg(long)]
        answer: Option<String>,
    },

    /// Delete a Q&A pair.
    #[command(alias = "rm")]
    Delete {
        id: i64,
        /// Skip confirmation prompt.
        #[arg(long, short)]
        force: bool,
    },

    /// Upload a document to both the general and process APIs.
    Upload { file: PathBuf },
}

pub async fn run(state: &AppState, action: TrainingCommand, json: bool, quiet: bool) -> Result<()> {
    match action {
        TrainingCommand::List { page } => list(state, page, json, quiet).await,
        TrainingCommand::Add { query, answer } => add(state, query, answer, json, quiet).await,
        TrainingCommand::Edit { id, query, answer } => {
            edit(state, id, query, answer, json, quiet).await
        }
        TrainingCommand::Delete { id, force } => delete(state, id, force, json, quiet).await,
        TrainingCommand::Upload { file } => upload(state, &file, json, quiet).await,
    }
}

pub async fn list(state: &AppState, page: usize, json: bool, quiet: bool) -> Result<()> {
    let spinner = ui::spinner("Loading training data...", quiet || json);
    let records = state.backends.main.list_training_data().await;
    spinner.finish_and_clear();
    let records = records?;

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    if records.is_empty() {
        ui::info("No training data yet. Add one with: adesk training add");
        return Ok(());
    }

    let (rows, current, pages) = ui::page(&records, page);
    let mut table = ui::table(&["ID", "Query", "Answer", "Updated"]);
    for record in rows {
        table.add_row(vec![
            Cell::new(record.id),
            Cell::new(ui::truncate(&record.query, 40)),
            Cell::new(ui::truncate(&record.answer, 50)),
            Cell::new(record.updated.as_deref().unwrap_or("-")),
        ]);
    }

    println!();
    println!("{table}");
    ui::count_footer(records.len(), "pair");
    ui::page_footer(current, pages);
    Ok(())
}

fn prompt_or(value: Option<String>, prompt: &str, initial: Option<&str>) -> Result<String> {
    match value {
        Some(v) => Ok(v),
        None => {
            let mut input = Input::<String>::new().with_prompt(prompt).allow_empty(true);
            if let Some(initial) = initial {
                input = input.with_initial_text(initial);
            }
            Ok(input.interact_text()?)
        }
    }
}

fn report_invalid(errors: &ValidationErrors, json: bool) -> Result<()> {
    if json {
        let fields: Vec<_> = errors
            .fields
            .iter()
            .map(|f| json!({"field": f.field, "message": f.message}))
            .collect();
        println!("{}", serde_json::to_string_pretty(&json!({"ok": false, "errors": fields}))?);
    } else {
        for field in &errors.fields {
            ui::failure(&field.message);
        }
    }
    anyhow::bail!("{errors}")
}

/// Print each leg of a fan-out.
fn report_legs<A, B>(report: &FanOut<A, B>) {
    let legs = [
        (report.first.label, report.first.error()),
        (report.second.label, report.second.error()),
    ];
    for (label, error) in legs {
        match error {
            None => println!("    {} {label}", style("✓").green()),
            Some(err) => println!("    {} {label}: {err}", style("✗").red()),
        }
    }
}

pub async fn add(
    state: &AppState,
    query: Option<String>,
    answer: Option<String>,
    json: bool,
    quiet: bool,
) -> Result<()> {
    let form = TrainingDataForm::new(
        prompt_or(query, "Query", None)?,
        prompt_or(answer, "Answer", None)?,
    );
    let input = match form.validate() {
        Ok(input) => input,
        Err(errors) => return report_invalid(&errors, json),
    };

    let spinner = ui::spinner("Submitting to both APIs...", quiet || json);
    let report = state.backends.add_training_data_everywhere(&input).await;
    spinner.finish_and_clear();

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&json!({
                "ok": report.is_success(),
                "record": report.first.result.as_ref().ok(),
                "failed": report.failed_labels(),
                "summary": report.to_string(),
            }))?
        );
    } else if report.is_success() {
        ui::success("Training data added and submitted successfully!");
    } else {
        ui::failure("Error processing request!");
        report_legs(&report);
        println!();
    }

    if report.is_success() {
        Ok(())
    } else {
        anyhow::bail!("{report}")
    }
}

async fn find_record(state: &AppState, id: i64) -> Result<TrainingDataRecord> {
    let records = state.backends.main.list_training_data().await?;
    records
        .into_iter()
        .find(|r| r.id == id)
        .ok_or_else(|| anyhow::anyhow!("Training data {id} not found"))
}

pub async fn edit(
    state: &AppState,
    id: i64,
    query: Option<String>,
    answer: Option<String>,
    json: bool,
    quiet: bool,
) -> Result<()> {
    // Prompts start from the current values.
    let existing = if query.is_none() || answer.is_none() {
        Some(find_record(state, id).await?)
    } else {
        None
    };

    let form = TrainingDataForm::new(
        prompt_or(query, "Query", existing.as_ref().map(|r| r.query.as_str()))?,
        prompt_or(answer, "Answer", existing.as_ref().map(|r| r.answer.as_str()))?,
    );
    let input = match form.validate() {
        Ok(input) => input,
        Err(errors) => return report_invalid(&errors, json),
    };

    let spinner = ui::spinner("Updating...", quiet || json);
    let result = state.backends.main.update_training_data(id, &input).await;
    spinner.finish_and_clear();

    match result {
        Ok(record) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&record)?);
            } else {
                ui::success("Training data updated successfully!");
            }
            Ok(())
        }
        Err(err) => {
            if !json {
                ui::failure("Error processing request!");
            }
            Err(err.into())
        }
    }
}

pub async fn delete(state: &AppState, id: i64, force: bool, json: bool, quiet: bool) -> Result<()> {
    if !force && !json {
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Delete training data {}?",
                style(id).red().bold()
            ))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("  Cancelled.");
            return Ok(());
        }
    }

    let spinner = ui::spinner("Deleting...", quiet || json);
    let result = state.backends.main.delete_training_data(id).await;
    spinner.finish_and_clear();

    match result {
        Ok(()) => {
            if json {
                println!("{}", json!({"deleted": true, "id": id}));
            } else {
                ui::success("Training data deleted successfully!");
            }
            Ok(())
        }
        Err(err) => {
            if !json {
                ui::failure("Error deleting training data!");
            }
            Err(err.into())
        }
    }
}

pub async fn upload(state: &AppState, file: &Path, json: bool, quiet: bool) -> Result<()> {
    let file_name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.display().to_string());

    let bar = ui::upload_bar(&file_name, quiet || json);
    bar.set_position(50);
    let report = state.backends.upload_everywhere(file).await;
    bar.set_position(100);
    bar.finish_and_clear();

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&json!({
                "ok": report.is_success(),
                "file": file_name,
                "failed": report.failed_labels(),
                "summary": report.to_string(),
            }))?
        );
    } else if report.is_success() {
        ui::success("File uploaded successfully to both APIs!");
    } else {
        for (label, err) in report.failures() {
            ui::failure(&format!("{label}: {}", err.upload_failure_message()));
        }
    }

    if report.is_success() {
        Ok(())
    } else {
        anyhow::bail!("{report}")
    }
}
