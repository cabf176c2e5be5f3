//! Link activation collaborator.
//!
//! The terminal has no browser to hand an href to, so the navigator tracks a
//! current location for same-tab links and a list of "tabs" opened for
//! external or new-tab links. The page body renders both.

use meganav_types::LinkActivation;
use tracing::info;

/// Number of opened tabs kept for display.
pub const TAB_HISTORY_LIMIT: usize = 8;

pub const HOME_HREF: &str = "/";

#[derive(Debug, Clone)]
pub struct LinkNavigator {
    location: String,
    tabs: Vec<String>,
    history: Vec<String>,
}

impl Default for LinkNavigator {
    fn default() -> Self {
        Self {
            location: HOME_HREF.to_string(),
            tabs: Vec::new(),
            history: Vec::new(),
        }
    }
}

impl LinkNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    /// Newest first.
    pub fn tabs(&self) -> &[String] {
        &self.tabs
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn activate(&mut self, activation: &LinkActivation) {
        if activation.new_tab {
            info!(href = %activation.href, "Opening link in a new tab");
            self.tabs.retain(|tab| tab != &activation.href);
            self.tabs.insert(0, activation.href.clone());
            self.tabs.truncate(TAB_HISTORY_LIMIT);
        } else {
            self.navigate(&activation.href);
        }
    }

    pub fn go_home(&mut self) {
        self.navigate(HOME_HREF);
    }

    fn navigate(&mut self, href: &str) {
        if self.location == href {
            return;
        }
        info!(from = %self.location, to = %href, "Navigating");
        let previous = std::mem::replace(&mut self.location, href.to_string());
        self.history.push(previous);
    }
}
