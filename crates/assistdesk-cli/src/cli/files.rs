//! Database and knowledge-base file pages.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Subcommand;
use comfy_table::{Cell, Table};
use serde_json::json;

use assistdesk_types::resource::FileListingEntry;

use crate::cli::ui;
use crate::state::AppState;

#[derive(Subcommand)]
pub enum DatabaseCommand {
    /// List database files.
    #[command(alias = "ls")]
    List {
        /// Page to show (5 rows per page).
        #[arg(long, default_value_t = 1)]
        page: usize,
    },

    /// Upload a file into the database.
    Upload { file: PathBuf },
}

#[derive(Subcommand)]
pub enum KnowledgeBaseCommand {
    /// List knowledge-base files.
    #[command(alias = "ls")]
    List {
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
}

pub async fn run_database(
    state: &AppState,
    action: DatabaseCommand,
    json: bool,
    quiet: bool,
) -> Result<()> {
    match action {
        DatabaseCommand::List { page } => list_database(state, page, json, quiet).await,
        DatabaseCommand::Upload { file } => upload_database(state, &file, json, quiet).await,
    }
}

pub async fn run_knowledge_base(
    state: &AppState,
    action: KnowledgeBaseCommand,
    json: bool,
    quiet: bool,
) -> Result<()> {
    match action {
        KnowledgeBaseCommand::List { page } => list_knowledge_base(state, page, json, quiet).await,
    }
}

pub async fn list_database(state: &AppState, page: usize, json: bool, quiet: bool) -> Result<()> {
    let spinner = ui::spinner("Loading database files...", quiet || json);
    let files = state.backends.main.database_files().await;
    spinner.finish_and_clear();

    match files {
        Ok(files) => print_listing(&files, page, json),
        Err(err) => {
            if !json {
                ui::failure("Failed to fetch database files.");
            }
            Err(err.into())
        }
    }
}

pub async fn list_knowledge_base(
    state: &AppState,
    page: usize,
    json: bool,
    quiet: bool,
) -> Result<()> {
    let spinner = ui::spinner("Loading knowledge base files...", quiet || json);
    let files = state.backends.main.knowledge_base_files().await;
    spinner.finish_and_clear();

    match files {
        Ok(files) => print_listing(&files, page, json),
        Err(err) => {
            if !json {
                ui::failure("Failed to fetch knowledge base files.");
            }
            Err(err.into())
        }
    }
}

fn listing_table(rows: &[FileListingEntry]) -> Table {
    let mut table = ui::table(&["File Name", "Size", "Uploaded At", "Download URL"]);
    for file in rows {
        table.add_row(vec![
            Cell::new(&file.file_name),
            Cell::new(file.size_kb()),
            Cell::new(&file.uploaded_at),
            Cell::new(&file.download_url),
        ]);
    }
    table
}

fn print_listing(files: &[FileListingEntry], page: usize, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(files)?);
        return Ok(());
    }

    if files.is_empty() {
        ui::info("No files yet.");
        return Ok(());
    }

    let (rows, current, pages) = ui::page(files, page);
    println!();
    println!("{}", listing_table(rows));
    ui::count_footer(files.len(), "file");
    ui::page_footer(current, pages);
    Ok(())
}

pub async fn upload_database(state: &AppState, file: &Path, json: bool, quiet: bool) -> Result<()> {
    let file_name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.display().to_string());

    let bar = ui::upload_bar(&file_name, quiet || json);
    bar.set_position(50);
    let result = state.backends.main.upload_database_file(file).await;
    bar.set_position(100);
    bar.finish_and_clear();

    match result {
        Ok(response) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else if response.message.is_empty() {
                ui::success("File uploaded successfully!");
            } else {
                ui::success(&response.message);
            }
            Ok(())
        }
        Err(err) => {
            if json {
                println!("{}", json!({"ok": false, "error": err.upload_failure_message()}));
            } else {
                ui::failure(&err.upload_failure_message());
            }
            Err(err.into())
        }
    }
}
