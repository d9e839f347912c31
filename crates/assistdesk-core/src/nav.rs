//! Navigation shell state.
//!
//! A small reducer-style state machine behind the sidebar menu: which view
//! is active, which chat mode is selected, whether the welcome screen is
//! still up, and which submenus are expanded. Views read it through
//! [`NavState::current_page`] and [`NavState::selected_keys`].

use assistdesk_types::chat::ChatMode;
use assistdesk_types::nav::Section;
use tracing::debug;

/// Key of the chat submenu in the menu tree.
pub const CHAT_SUBMENU_KEY: &str = "chat";

/// What the content area should render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Page {
    /// Welcome screen with quick-start choices.
    Initial,
    Chat(ChatMode),
    /// Chat view with a sub-selection that names no known mode.
    UnknownChat(String),
    Database,
    KnowledgeBase,
    TrainingData,
    Feedback,
}

/// One entry of the sidebar menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuEntry {
    pub key: &'static str,
    pub title: &'static str,
    /// Submenu this entry lives under, if any.
    pub parent: Option<&'static str>,
}

impl MenuEntry {
    /// The click path for this entry, innermost key first.
    pub fn key_path(&self) -> Vec<&'static str> {
        match self.parent {
            Some(parent) => vec![self.key, parent],
            None => vec![self.key],
        }
    }
}

/// The full menu tree, flattened in display order.
pub const MENU: [MenuEntry; 6] = [
    MenuEntry { key: "patent", title: "Patent Chat", parent: Some(CHAT_SUBMENU_KEY) },
    MenuEntry { key: "process", title: "Process Chat", parent: Some(CHAT_SUBMENU_KEY) },
    MenuEntry { key: "database", title: "Database", parent: None },
    MenuEntry { key: "knowledgeBase", title: "Knowledge Base", parent: None },
    MenuEntry { key: "trainingData", title: "Training Data", parent: None },
    MenuEntry { key: "feedback", title: "Feedback", parent: None },
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavState {
    pub active_view: Section,
    pub active_chat_sub: String,
    pub show_initial: bool,
    pub collapsed: bool,
    pub open_keys: Vec<String>,
}

impl Default for NavState {
    fn default() -> Self {
        Self {
            active_view: Section::Chat,
            active_chat_sub: ChatMode::Patent.key().to_string(),
            show_initial: true,
            collapsed: false,
            open_keys: vec![CHAT_SUBMENU_KEY.to_string()],
        }
    }
}

impl NavState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch view. Leaving the welcome screen is implied.
    pub fn set_active_view(&mut self, view: Section) {
        self.active_view = view;
        self.show_initial = false;
    }

    pub fn set_active_chat_sub(&mut self, sub: impl Into<String>) {
        self.active_chat_sub = sub.into();
    }

    pub fn set_show_initial(&mut self, show: bool) {
        self.show_initial = show;
    }

    pub fn toggle_sidebar(&mut self) {
        self.collapsed = !self.collapsed;
    }

    pub fn set_open_keys(&mut self, keys: Vec<String>) {
        self.open_keys = keys;
    }

    /// Expand or fold one submenu.
    pub fn toggle_open_key(&mut self, key: &str) {
        match self.open_keys.iter().position(|k| k == key) {
            Some(index) => {
                self.open_keys.remove(index);
            }
            None => self.open_keys.push(key.to_string()),
        }
    }

    /// Apply a menu click.
    ///
    /// Clicks inside the chat submenu select that chat mode; any other key
    /// selects the section it names. Unknown top-level keys are ignored.
    pub fn handle_menu_click(&mut self, key: &str, key_path: &[&str]) {
        self.show_initial = false;
        if key_path.contains(&CHAT_SUBMENU_KEY) {
            self.set_active_view(Section::Chat);
            self.set_active_chat_sub(key);
            return;
        }
        match key.parse::<Section>() {
            Ok(section) => self.set_active_view(section),
            Err(err) => debug!(key, %err, "ignoring unknown menu key"),
        }
    }

    /// Apply a choice from the welcome screen.
    pub fn select_initial(&mut self, view: Section, sub: Option<&str>) {
        self.set_active_view(view);
        if view == Section::Chat {
            if let Some(sub) = sub {
                self.set_active_chat_sub(sub);
            }
        }
        self.show_initial = false;
    }

    /// Menu keys to highlight: none on the welcome screen, otherwise the
    /// chat mode or the active section.
    pub fn selected_keys(&self) -> Vec<String> {
        if self.show_initial {
            return Vec::new();
        }
        match self.active_view {
            Section::Chat => vec![self.active_chat_sub.clone()],
            section => vec![section.key().to_string()],
        }
    }

    pub fn current_page(&self) -> Page {
        if self.show_initial {
            return Page::Initial;
        }
        match self.active_view {
            Section::Chat => match self.active_chat_sub.parse::<ChatMode>() {
                Ok(mode) => Page::Chat(mode),
                Err(_) => Page::UnknownChat(self.active_chat_sub.clone()),
            },
            Section::Database => Page::Database,
            Section::KnowledgeBase => Page::KnowledgeBase,
            Section::TrainingData => Page::TrainingData,
            Section::Feedback => Page::Feedback,
        }
    }

    /// Menu entries currently shown: children of folded submenus are hidden.
    pub fn visible_entries(&self) -> Vec<MenuEntry> {
        MENU.into_iter()
            .filter(|entry| match entry.parent {
                Some(parent) => self.open_keys.iter().any(|k| k == parent),
                None => true,
            })
            .collect()
    }

    /// Brand label for the sidebar header; shortened while collapsed.
    pub fn brand(&self) -> &'static str {
        if self.collapsed { "AD" } else { "AssistDesk" }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_state_shows_welcome_screen() {
        let nav = NavState::new();
        assert_eq!(nav.current_page(), Page::Initial);
        assert!(nav.selected_keys().is_empty());
        assert_eq!(nav.open_keys, vec!["chat".to_string()]);
        assert_eq!(nav.active_chat_sub, "patent");
    }

    #[test]
    fn chat_submenu_click_selects_mode() {
        let mut nav = NavState::new();
        nav.handle_menu_click("process", &["process", "chat"]);
        assert_eq!(nav.active_view, Section::Chat);
        assert_eq!(nav.current_page(), Page::Chat(ChatMode::Process));
        assert_eq!(nav.selected_keys(), vec!["process".to_string()]);
    }

    #[test]
    fn top_level_click_selects_section() {
        let mut nav = NavState::new();
        nav.handle_menu_click("knowledgeBase", &["knowledgeBase"]);
        assert_eq!(nav.current_page(), Page::KnowledgeBase);
        assert_eq!(nav.selected_keys(), vec!["knowledgeBase".to_string()]);
        // Chat sub-selection is remembered across sections.
        assert_eq!(nav.active_chat_sub, "patent");
    }

    #[test]
    fn unknown_key_only_leaves_welcome_screen() {
        let mut nav = NavState::new();
        nav.handle_menu_click("settings", &["settings"]);
        assert!(!nav.show_initial);
        assert_eq!(nav.active_view, Section::Chat);
    }

    #[test]
    fn welcome_choice_with_unknown_chat_sub() {
        let mut nav = NavState::new();
        nav.select_initial(Section::Chat, Some("vishal"));
        assert_eq!(nav.current_page(), Page::UnknownChat("vishal".into()));

        nav.select_initial(Section::Database, Some("ignored"));
        assert_eq!(nav.current_page(), Page::Database);
        assert_eq!(nav.active_chat_sub, "vishal");
    }

    #[test]
    fn folded_submenu_hides_children() {
        let mut nav = NavState::new();
        assert_eq!(nav.visible_entries().len(), 6);
        nav.toggle_open_key("chat");
        let keys: Vec<&str> = nav.visible_entries().iter().map(|e| e.key).collect();
        assert_eq!(keys, vec!["database", "knowledgeBase", "trainingData", "feedback"]);
        nav.toggle_open_key("chat");
        assert_eq!(nav.visible_entries().len(), 6);
    }

    #[test]
    fn toggle_sidebar_flips_collapsed() {
        let mut nav = NavState::new();
        assert_eq!(nav.brand(), "AssistDesk");
        nav.toggle_sidebar();
        assert!(nav.collapsed);
        assert_eq!(nav.brand(), "AD");
        nav.toggle_sidebar();
        assert!(!nav.collapsed);
    }

    #[test]
    fn key_path_includes_parent() {
        assert_eq!(MENU[0].key_path(), vec!["patent", "chat"]);
        assert_eq!(MENU[2].key_path(), vec!["database"]);
    }
}
