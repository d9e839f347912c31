//! Interactive navigation shell (`adesk` with no subcommand).
//!
//! The terminal stand-in for the sidebar layout: a welcome screen with
//! quick-start choices, then a loop of "render the current page, show the
//! menu". Every menu choice goes through the `NavState` reducers, so the
//! shell behaves like the sidebar it mirrors: the chat submenu folds, the
//! sidebar collapses to initials, the selected entry is marked.

use std::path::Path;

use anyhow::Result;
use console::style;
use dialoguer::{Input, Select};

use assistdesk_core::nav::{MenuEntry, NavState, Page, CHAT_SUBMENU_KEY};
use assistdesk_core::request::ResourceTag;
use assistdesk_types::chat::ChatMode;
use assistdesk_types::nav::Section;

use crate::cli::chat::loop_runner::run_chat_loop;
use crate::cli::{feedback, files, training, ui};
use crate::state::AppState;

/// Actions offered by the current page above the navigation entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageAction {
    Refresh,
    PreviousPage,
    NextPage,
    UploadDatabaseFile,
    AddTrainingData,
    EditTrainingData,
    DeleteTrainingData,
    UploadDocument,
    SubmitFeedback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuAction {
    Page(PageAction),
    Open(MenuEntry),
    ToggleChatSubmenu,
    ToggleSidebar,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub label: String,
    pub action: MenuAction,
}

impl MenuItem {
    fn new(label: impl Into<String>, action: MenuAction) -> Self {
        Self {
            label: label.into(),
            action,
        }
    }
}

/// Page-specific actions, in display order.
pub fn page_actions(page: &Page) -> Vec<(&'static str, PageAction)> {
    let paging = [
        ("Previous page", PageAction::PreviousPage),
        ("Next page", PageAction::NextPage),
    ];
    let mut actions = match page {
        Page::Database => vec![("Upload a file", PageAction::UploadDatabaseFile)],
        Page::TrainingData => vec![
            ("Add Q&A pair", PageAction::AddTrainingData),
            ("Edit Q&A pair", PageAction::EditTrainingData),
            ("Delete Q&A pair", PageAction::DeleteTrainingData),
            ("Upload document", PageAction::UploadDocument),
        ],
        Page::Feedback => vec![("Submit feedback", PageAction::SubmitFeedback)],
        _ => Vec::new(),
    };
    if matches!(page, Page::Database | Page::KnowledgeBase | Page::TrainingData) {
        actions.extend(paging);
    }
    if !matches!(page, Page::Initial | Page::Chat(_) | Page::UnknownChat(_)) {
        actions.push(("Refresh", PageAction::Refresh));
    }
    actions
}

/// Initials of a title, used while the sidebar is collapsed.
fn initials(title: &str) -> String {
    title
        .split_whitespace()
        .filter_map(|word| word.chars().next())
        .collect()
}

/// The menu for the current state: page actions, the sidebar entries
/// (folded submenus hide their children), then shell controls.
pub fn menu_items(nav: &NavState) -> Vec<MenuItem> {
    let mut items: Vec<MenuItem> = page_actions(&nav.current_page())
        .into_iter()
        .map(|(label, action)| MenuItem::new(format!("» {label}"), MenuAction::Page(action)))
        .collect();

    let selected = nav.selected_keys();
    let chat_open = nav.open_keys.iter().any(|k| k == CHAT_SUBMENU_KEY);
    // Chat children lead the menu, so their header comes first.
    items.push(chat_header(nav, chat_open));

    for entry in nav.visible_entries() {
        let marker = if selected.iter().any(|k| k == entry.key) { "●" } else { " " };
        let indent = if entry.parent.is_some() { "    " } else { "  " };
        let title = if nav.collapsed { initials(entry.title) } else { entry.title.to_string() };
        items.push(MenuItem::new(
            format!("{indent}{marker} {title}"),
            MenuAction::Open(entry),
        ));
    }

    let sidebar = if nav.collapsed { "Expand sidebar" } else { "Collapse sidebar" };
    items.push(MenuItem::new(sidebar, MenuAction::ToggleSidebar));
    items.push(MenuItem::new("Quit", MenuAction::Quit));
    items
}

fn chat_header(nav: &NavState, open: bool) -> MenuItem {
    let arrow = if open { "▾" } else { "▸" };
    let title = if nav.collapsed { "C" } else { Section::Chat.title() };
    MenuItem::new(format!("{arrow} {title}"), MenuAction::ToggleChatSubmenu)
}

/// Apply a menu action to the navigation state.
///
/// Returns whether the content area must be rendered again.
pub fn apply(nav: &mut NavState, action: &MenuAction) -> bool {
    match action {
        MenuAction::Open(entry) => {
            nav.handle_menu_click(entry.key, &entry.key_path());
            true
        }
        MenuAction::ToggleChatSubmenu => {
            nav.toggle_open_key(CHAT_SUBMENU_KEY);
            false
        }
        MenuAction::ToggleSidebar => {
            nav.toggle_sidebar();
            false
        }
        MenuAction::Page(_) | MenuAction::Quit => false,
    }
}

fn print_header(nav: &NavState) {
    let title = match nav.current_page() {
        Page::Initial => "Welcome".to_string(),
        Page::Chat(mode) => mode.title().to_string(),
        Page::UnknownChat(_) => Section::Chat.title().to_string(),
        _ => nav.active_view.title().to_string(),
    };
    println!();
    println!(
        "  {} {}  {}",
        style("◆").cyan().bold(),
        style(nav.brand()).bold(),
        style(format!("/ {title}")).dim()
    );
}

/// Welcome screen.
///
/// `None` quits, `Some(true)` means a page was picked, `Some(false)` goes
/// straight to the menu.
fn welcome(nav: &mut NavState) -> Result<Option<bool>> {
    println!();
    println!("  {}", style("Welcome to AssistDesk").bold());
    println!("  {}", style("Where do you want to start?").dim());
    println!();

    let choices = ["Patent Chat", "Process Chat", "Database", "Open menu", "Quit"];
    let selection = Select::new().items(&choices).default(0).interact()?;
    match selection {
        0 => nav.select_initial(Section::Chat, Some(ChatMode::Patent.key())),
        1 => nav.select_initial(Section::Chat, Some(ChatMode::Process.key())),
        2 => nav.select_initial(Section::Database, None),
        3 => return Ok(Some(false)),
        _ => return Ok(None),
    }
    Ok(Some(true))
}

async fn render_page(state: &AppState, nav: &NavState, page_no: usize, quiet: bool) -> Result<()> {
    match nav.current_page() {
        Page::Initial => Ok(()),
        Page::Chat(mode) => run_chat_loop(state, mode).await,
        Page::UnknownChat(_) => {
            ui::info("Please select a valid chat type.");
            Ok(())
        }
        Page::Database => files::list_database(state, page_no, false, quiet).await,
        Page::KnowledgeBase => files::list_knowledge_base(state, page_no, false, quiet).await,
        Page::TrainingData => training::list(state, page_no, false, quiet).await,
        Page::Feedback => feedback::list(state, false, quiet).await,
    }
}

/// Cache tag behind a list page.
pub fn page_tag(page: &Page) -> Option<ResourceTag> {
    match page {
        Page::Database => Some(ResourceTag::DatabaseFiles),
        Page::KnowledgeBase => Some(ResourceTag::KnowledgeBaseFiles),
        Page::TrainingData => Some(ResourceTag::TrainingData),
        Page::Feedback => Some(ResourceTag::Feedback),
        _ => None,
    }
}

async fn run_page_action(
    state: &AppState,
    page: &Page,
    action: PageAction,
    quiet: bool,
) -> Result<()> {
    match action {
        PageAction::Refresh => {
            if let Some(tag) = page_tag(page) {
                state.backends.main.tags().invalidate(tag);
            }
            Ok(())
        }
        PageAction::PreviousPage | PageAction::NextPage => Ok(()),
        PageAction::UploadDatabaseFile => {
            let path: String = Input::new().with_prompt("File to upload").interact_text()?;
            files::upload_database(state, Path::new(path.trim()), false, quiet).await
        }
        PageAction::AddTrainingData => training::add(state, None, None, false, quiet).await,
        PageAction::EditTrainingData => {
            let id: i64 = Input::new().with_prompt("ID to edit").interact_text()?;
            training::edit(state, id, None, None, false, quiet).await
        }
        PageAction::DeleteTrainingData => {
            let id: i64 = Input::new().with_prompt("ID to delete").interact_text()?;
            training::delete(state, id, false, false, quiet).await
        }
        PageAction::UploadDocument => {
            let path: String = Input::new().with_prompt("Document to upload").interact_text()?;
            training::upload(state, Path::new(path.trim()), false, quiet).await
        }
        PageAction::SubmitFeedback => feedback::submit(state, None, None, false, quiet).await,
    }
}

/// Run the navigation shell until the user quits.
pub async fn run_shell(state: &AppState, quiet: bool) -> Result<()> {
    let mut nav = NavState::new();
    let mut page_no = 1;
    let mut needs_render = true;

    loop {
        if nav.current_page() == Page::Initial && needs_render {
            print_header(&nav);
            match welcome(&mut nav)? {
                None => break,
                Some(left_welcome) => needs_render = left_welcome,
            }
            if needs_render {
                continue;
            }
        }

        if needs_render {
            print_header(&nav);
            // A failing page is reported and the shell keeps going.
            if let Err(err) = render_page(state, &nav, page_no, quiet).await {
                tracing::debug!(error = %err, "page render failed");
                ui::failure(&format!("{err:#}"));
            }
            needs_render = false;
        }

        let items = menu_items(&nav);
        let labels: Vec<&str> = items.iter().map(|item| item.label.as_str()).collect();
        println!("  {}", style(nav.brand()).dim());
        let selection = Select::new().items(&labels).default(0).interact()?;

        let action = items[selection].action.clone();
        match &action {
            MenuAction::Quit => break,
            MenuAction::Page(page_action) => {
                match page_action {
                    PageAction::NextPage => page_no += 1,
                    PageAction::PreviousPage => page_no = page_no.saturating_sub(1).max(1),
                    _ => {}
                }
                if let Err(err) = run_page_action(state, &nav.current_page(), *page_action, quiet).await {
                    ui::failure(&format!("{err:#}"));
                }
                needs_render = true;
            }
            other => {
                if apply(&mut nav, other) {
                    page_no = 1;
                    needs_render = true;
                }
            }
        }
    }

    println!("  {}", style("Goodbye.").dim());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(nav: &NavState) -> Vec<String> {
        menu_items(nav).into_iter().map(|i| i.label).collect()
    }

    fn open(nav: &mut NavState, key: &str) {
        let item = menu_items(nav)
            .into_iter()
            .find(|i| matches!(&i.action, MenuAction::Open(e) if e.key == key))
            .unwrap();
        assert!(apply(nav, &item.action));
    }

    #[test]
    fn default_menu_shows_chat_children_under_header() {
        let nav = NavState::new();
        let labels = labels(&nav);
        assert_eq!(labels[0], "▾ Chat");
        assert!(labels[1].contains("Patent Chat"));
        assert!(labels[1].starts_with("    "));
        assert!(labels[2].contains("Process Chat"));
        assert!(labels.iter().any(|l| l.contains("Knowledge Base")));
        assert_eq!(labels.last().unwrap(), "Quit");
    }

    #[test]
    fn folding_chat_hides_its_children() {
        let mut nav = NavState::new();
        assert!(!apply(&mut nav, &MenuAction::ToggleChatSubmenu));
        let labels = labels(&nav);
        assert_eq!(labels[0], "▸ Chat");
        assert!(!labels.iter().any(|l| l.contains("Patent Chat")));
        assert!(labels.iter().any(|l| l.contains("Database")));
    }

    #[test]
    fn selecting_an_entry_marks_it_and_adds_page_actions() {
        let mut nav = NavState::new();
        open(&mut nav, "trainingData");

        assert_eq!(nav.current_page(), Page::TrainingData);
        let labels = labels(&nav);
        assert_eq!(labels[0], "» Add Q&A pair");
        assert!(labels.iter().any(|l| l == "» Refresh"));
        assert!(labels.iter().any(|l| l.contains("● Training Data")));
        assert!(!labels.iter().any(|l| l.contains("● Patent Chat")));
    }

    #[test]
    fn chat_entries_select_chat_mode() {
        let mut nav = NavState::new();
        open(&mut nav, "process");
        assert_eq!(nav.current_page(), Page::Chat(ChatMode::Process));
        assert!(page_actions(&nav.current_page()).is_empty());
    }

    #[test]
    fn collapsed_sidebar_uses_initials() {
        let mut nav = NavState::new();
        apply(&mut nav, &MenuAction::ToggleSidebar);
        let labels = labels(&nav);
        assert_eq!(labels[0], "▾ C");
        assert!(labels.iter().any(|l| l.ends_with(" KB")));
        assert!(labels.iter().any(|l| l == "Expand sidebar"));
        assert_eq!(nav.brand(), "AD");
    }

    #[test]
    fn refresh_targets_the_page_cache() {
        assert_eq!(page_tag(&Page::Feedback), Some(ResourceTag::Feedback));
        assert_eq!(page_tag(&Page::Database), Some(ResourceTag::DatabaseFiles));
        assert_eq!(page_tag(&Page::Chat(ChatMode::Patent)), None);
    }

    #[test]
    fn list_pages_offer_paging() {
        let actions = page_actions(&Page::KnowledgeBase);
        assert!(actions.contains(&("Next page", PageAction::NextPage)));
        assert!(page_actions(&Page::Feedback)
            .iter()
            .all(|(_, a)| *a != PageAction::NextPage));
    }
}
