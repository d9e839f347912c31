//! Small output helpers shared by the command handlers.

use std::time::Duration;

use comfy_table::{presets, Cell, Color, ContentArrangement, Table};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Spinner in the house style. Hidden when `quiet` is set.
pub fn spinner(message: &str, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

/// Upload progress bar, 0..=100. Hidden when `quiet` is set.
pub fn upload_bar(file_name: &str, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(100);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("  {msg} [{bar:30.cyan/blue}] {pos}%")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
    );
    bar.set_message(format!("Uploading {file_name}"));
    bar
}

/// Table with the standard preset and white header cells.
pub fn table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(
        headers
            .iter()
            .map(|h| Cell::new(h).fg(Color::White))
            .collect::<Vec<_>>(),
    );
    table
}

/// Cut `text` to at most `max` characters, marking the cut with `...`.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{kept}...")
}

pub fn success(message: &str) {
    println!();
    println!("  {} {}", style("✓").green().bold(), message);
    println!();
}

pub fn failure(message: &str) {
    eprintln!();
    eprintln!("  {} {}", style("✗").red().bold(), message);
    eprintln!();
}

pub fn info(message: &str) {
    println!();
    println!("  {} {}", style("i").blue().bold(), message);
    println!();
}

/// "N thing" / "N things" footer under a table.
pub fn count_footer(count: usize, noun: &str) {
    println!();
    println!(
        "  {} {}{}",
        style(count).bold(),
        noun,
        if count == 1 { "" } else { "s" }
    );
    println!();
}

/// Rows per page in the listing tables.
pub const PAGE_SIZE: usize = 5;

/// One page of `items` (1-based) and the total page count.
///
/// Out-of-range pages clamp to the last page; an empty list has one empty page.
pub fn page<T>(items: &[T], page: usize) -> (&[T], usize, usize) {
    let pages = items.len().div_ceil(PAGE_SIZE).max(1);
    let current = page.clamp(1, pages);
    let start = (current - 1) * PAGE_SIZE;
    let end = (start + PAGE_SIZE).min(items.len());
    (&items[start.min(items.len())..end], current, pages)
}

/// "Page 2 of 4" footer; silent for single-page lists.
pub fn page_footer(current: usize, pages: usize) {
    if pages > 1 {
        println!(
            "  {}",
            style(format!("Page {current} of {pages} (use --page to see more)")).dim()
        );
    }
}
