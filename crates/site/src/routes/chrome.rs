//! Data every page layout needs.

use portfolio_core::Theme;

use crate::state::AppState;

/// Layout context shared by all page templates.
#[derive(Debug, Clone)]
pub struct PageChrome {
    /// Classes for the `<html>` element, from the display root.
    pub html_class: String,
    pub theme: Theme,
    /// Path of the page being rendered, used to mark the active nav link
    /// and as the redirect target of the theme toggle.
    pub current_path: &'static str,
    pub title: &'static str,
}

impl PageChrome {
    #[must_use]
    pub fn new(state: &AppState, current_path: &'static str, title: &'static str) -> Self {
        Self {
            html_class: state.html_class(),
            theme: state.theme().current(),
            current_path,
            title,
        }
    }

    #[must_use]
    pub fn is_active(&self, path: &str) -> bool {
        self.current_path == path
    }

    /// Label of the toggle button: the theme it switches to.
    #[must_use]
    pub const fn toggle_label(&self) -> &'static str {
        if self.theme.is_dark() {
            "Light mode"
        } else {
            "Dark mode"
        }
    }
}
