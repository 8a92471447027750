//! Local UI chrome state (sidebar expansion, active menu entry).
//!
//! DESIGN
//! ======
//! Keeps transient presentation concerns out of the session state so layout
//! controls can evolve independently of authentication data.

#[cfg(test)]
#[path = "ui_test.rs"]
mod ui_test;

/// Entries of the sidebar menu.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MenuEntry {
    #[default]
    Home,
    Profile,
}

impl MenuEntry {
    pub const ALL: [Self; 2] = [Self::Home, Self::Profile];

    pub fn label(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Profile => "Profile",
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Profile => "/?tab=profile",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UiState {
    pub sidebar_expanded: bool,
    pub active_entry: MenuEntry,
}

impl Default for UiState {
    fn default() -> Self {
        Self { sidebar_expanded: true, active_entry: MenuEntry::Home }
    }
}

impl UiState {
    pub fn toggle_sidebar(&mut self) {
        self.sidebar_expanded = !self.sidebar_expanded;
    }

    pub fn select(&mut self, entry: MenuEntry) {
        self.active_entry = entry;
    }
}
