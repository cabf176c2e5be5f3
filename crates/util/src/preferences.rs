//! User preference and usage persistence for Meganav.
//!
//! [`UserPreferences`] keeps one JSON document holding display preferences
//! (theme, reduced motion, menu behavior) and navigation usage (click counts,
//! recent items, recent searches, favorites). It lives at
//! `~/.config/meganav/preferences.json` unless `MEGANAV_PREFERENCES_PATH`
//! points elsewhere. Every write goes back to disk immediately.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::resolve_app_path;

/// Environment variable allowing callers to override the preferences file path.
pub const PREFERENCES_PATH_ENV: &str = "MEGANAV_PREFERENCES_PATH";

/// Default filename for the JSON payload.
pub const PREFERENCES_FILE_NAME: &str = "preferences.json";

/// Upper bound on remembered search queries.
pub const MAX_SEARCH_QUERIES: usize = 20;

/// Error surfaced when reading or writing preferences fails.
#[derive(Debug, Error)]
pub enum PreferencesError {
    /// I/O failure (for example, permissions or missing directory).
    #[error("preferences I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Serialization or deserialization failure.
    #[error("preferences serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Theme selection persisted across sessions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    Light,
    Dark,
    #[default]
    System,
}

/// How desktop panels open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MenuBehavior {
    /// Pointer hover opens panels after the intent delay.
    #[default]
    Hover,
    /// Panels open only on click or keyboard; hover intent is disabled.
    Click,
}

/// Display preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PreferencesPayload {
    pub theme: ThemePreference,
    pub reduced_motion: bool,
    pub menu_behavior: MenuBehavior,
    pub search_enabled: bool,
    pub recent_items_count: usize,
    pub compact_mode: bool,
}

impl Default for PreferencesPayload {
    fn default() -> Self {
        Self {
            theme: ThemePreference::System,
            reduced_motion: false,
            menu_behavior: MenuBehavior::Hover,
            search_enabled: true,
            recent_items_count: 5,
            compact_mode: false,
        }
    }
}

/// A recently visited destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentItem {
    pub id: String,
    pub label: String,
    pub href: String,
    pub accessed_at: DateTime<Utc>,
}

/// Navigation usage gathered while the menu is in use.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NavigationUsage {
    pub click_counts: IndexMap<String, u64>,
    pub last_accessed: IndexMap<String, DateTime<Utc>>,
    pub recent_items: Vec<RecentItem>,
    pub search_queries: Vec<String>,
    pub favorites: Vec<String>,
}

impl NavigationUsage {
    fn record_navigation(&mut self, id: &str, label: &str, href: &str, cap: usize, now: DateTime<Utc>) {
        *self.click_counts.entry(id.to_string()).or_insert(0) += 1;
        self.last_accessed.insert(id.to_string(), now);
        self.recent_items.retain(|item| item.id != id);
        self.recent_items.insert(
            0,
            RecentItem {
                id: id.to_string(),
                label: label.to_string(),
                href: href.to_string(),
                accessed_at: now,
            },
        );
        self.recent_items.truncate(cap);
    }

    fn record_search(&mut self, query: &str) -> bool {
        let query = query.trim();
        if query.is_empty() {
            return false;
        }
        self.search_queries.retain(|existing| existing != query);
        self.search_queries.insert(0, query.to_string());
        self.search_queries.truncate(MAX_SEARCH_QUERIES);
        true
    }

    fn toggle_favorite(&mut self, id: &str) -> bool {
        if let Some(position) = self.favorites.iter().position(|fav| fav == id) {
            self.favorites.remove(position);
            false
        } else {
            self.favorites.push(id.to_string());
            true
        }
    }

    /// Item ids ordered by click count, most used first. Ties keep first-use order.
    pub fn popular_items(&self, limit: usize) -> Vec<(String, u64)> {
        let mut entries: Vec<(String, u64)> = self.click_counts.iter().map(|(id, count)| (id.clone(), *count)).collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        entries.truncate(limit);
        entries
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct StoredDocument {
    preferences: PreferencesPayload,
    usage: NavigationUsage,
}

/// Thread-safe preferences store backed by a JSON file.
#[derive(Debug, Default)]
pub struct UserPreferences {
    path: PathBuf,
    document: Mutex<StoredDocument>,
    persist_to_disk: bool,
}

impl UserPreferences {
    /// Create a store at the default location, honoring `MEGANAV_PREFERENCES_PATH`.
    pub fn new() -> Result<Self, PreferencesError> {
        Self::at_path(resolve_app_path(PREFERENCES_PATH_ENV, false, PREFERENCES_FILE_NAME))
    }

    /// Create a store rooted at `path`, loading any existing document.
    pub fn at_path(path: impl Into<PathBuf>) -> Result<Self, PreferencesError> {
        let path = path.into();
        let document = load_document(&path)?;
        Ok(Self {
            path,
            document: Mutex::new(document),
            persist_to_disk: true,
        })
    }

    /// Build an in-memory store used as a fallback when the config directory cannot be accessed.
    pub fn ephemeral() -> Self {
        Self {
            path: PathBuf::new(),
            document: Mutex::new(StoredDocument::default()),
            persist_to_disk: false,
        }
    }

    /// Path to the underlying JSON file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn preferences(&self) -> PreferencesPayload {
        self.lock().preferences.clone()
    }

    pub fn usage(&self) -> NavigationUsage {
        self.lock().usage.clone()
    }

    /// Apply `update` to the display preferences and persist the result.
    pub fn update_preferences(&self, update: impl FnOnce(&mut PreferencesPayload)) -> Result<(), PreferencesError> {
        self.mutate(|document| update(&mut document.preferences))
    }

    pub fn set_theme(&self, theme: ThemePreference) -> Result<(), PreferencesError> {
        self.update_preferences(|prefs| prefs.theme = theme)
    }

    /// Count a visit to `id` and move it to the front of the recent items.
    pub fn record_navigation(&self, id: &str, label: &str, href: &str) -> Result<(), PreferencesError> {
        let now = Utc::now();
        self.mutate(|document| {
            let cap = document.preferences.recent_items_count;
            document.usage.record_navigation(id, label, href, cap, now);
        })
    }

    /// Remember a search query. Blank queries are ignored.
    pub fn record_search(&self, query: &str) -> Result<(), PreferencesError> {
        let mut guard = self.lock();
        if guard.usage.record_search(query) {
            self.save_locked(&guard)?;
        }
        Ok(())
    }

    /// Returns whether `id` is a favorite after the toggle.
    pub fn toggle_favorite(&self, id: &str) -> Result<bool, PreferencesError> {
        let mut guard = self.lock();
        let now_favorite = guard.usage.toggle_favorite(id);
        self.save_locked(&guard)?;
        Ok(now_favorite)
    }

    pub fn popular_items(&self, limit: usize) -> Vec<(String, u64)> {
        self.lock().usage.popular_items(limit)
    }

    pub fn reset_usage(&self) -> Result<(), PreferencesError> {
        debug!("Resetting navigation usage");
        self.mutate(|document| document.usage = NavigationUsage::default())
    }

    /// Serialize preferences and usage as a portable JSON document.
    pub fn export(&self) -> Result<String, PreferencesError> {
        Ok(serde_json::to_string_pretty(&*self.lock())?)
    }

    /// Replace preferences and usage with an exported document. Missing
    /// fields fall back to defaults; on parse failure the current state is
    /// left untouched.
    pub fn import(&self, data: &str) -> Result<(), PreferencesError> {
        let imported: StoredDocument = serde_json::from_str(data)?;
        self.mutate(|document| *document = imported)
    }

    fn mutate(&self, apply: impl FnOnce(&mut StoredDocument)) -> Result<(), PreferencesError> {
        let mut guard = self.lock();
        apply(&mut guard);
        self.save_locked(&guard)
    }

    fn lock(&self) -> MutexGuard<'_, StoredDocument> {
        self.document.lock().expect("preferences lock poisoned")
    }

    fn save_locked(&self, document: &StoredDocument) -> Result<(), PreferencesError> {
        if !self.persist_to_disk {
            return Ok(());
        }
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(document)?;
        fs::write(&self.path, data)?;
        Ok(())
    }
}

fn load_document(path: &Path) -> Result<StoredDocument, PreferencesError> {
    match fs::read_to_string(path) {
        Ok(data) => match serde_json::from_str(&data) {
            Ok(document) => Ok(document),
            Err(error) => {
                warn!(
                    path = %path.display(),
                    error = %error,
                    "Failed to parse preferences file; using defaults"
                );
                Ok(StoredDocument::default())
            }
        },
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(StoredDocument::default()),
        Err(error) => Err(PreferencesError::Io(error)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn persists_and_reloads() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join(PREFERENCES_FILE_NAME);
        let store = UserPreferences::at_path(&path).expect("store");
        store.set_theme(ThemePreference::Dark).expect("set theme");
        store
            .record_navigation("/products/temperature/duct", "Duct Sensors", "/products/temperature/duct")
            .expect("record");

        let reloaded = UserPreferences::at_path(&path).expect("reload");
        assert_eq!(reloaded.preferences().theme, ThemePreference::Dark);
        assert_eq!(reloaded.usage().click_counts.get("/products/temperature/duct"), Some(&1));
    }

    #[test]
    fn corrupt_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(PREFERENCES_FILE_NAME);
        fs::write(&path, "{ not json").expect("write");
        let store = UserPreferences::at_path(&path).expect("store");
        assert_eq!(store.preferences(), PreferencesPayload::default());
    }

    #[test]
    fn recent_items_are_deduplicated_and_capped() {
        let store = UserPreferences::ephemeral();
        store.update_preferences(|prefs| prefs.recent_items_count = 2).expect("update");
        for id in ["a", "b", "a", "c"] {
            store.record_navigation(id, id, &format!("/{id}")).expect("record");
        }
        let ids: Vec<_> = store.usage().recent_items.into_iter().map(|item| item.id).collect();
        assert_eq!(ids, vec!["c", "a"]);
        assert_eq!(store.popular_items(1), vec![("a".to_string(), 2)]);
    }

    #[test]
    fn search_queries_skip_blanks_and_cap() {
        let store = UserPreferences::ephemeral();
        store.record_search("   ").expect("blank");
        assert!(store.usage().search_queries.is_empty());
        for i in 0..25 {
            store.record_search(&format!("query {i}")).expect("record");
        }
        store.record_search("query 10").expect("repeat");
        let queries = store.usage().search_queries;
        assert_eq!(queries.len(), MAX_SEARCH_QUERIES);
        assert_eq!(queries[0], "query 10");
        assert_eq!(queries.iter().filter(|q| *q == "query 10").count(), 1);
    }

    #[test]
    fn favorites_toggle() {
        let store = UserPreferences::ephemeral();
        assert!(store.toggle_favorite("/resources/blog").expect("add"));
        assert!(!store.toggle_favorite("/resources/blog").expect("remove"));
        assert!(store.usage().favorites.is_empty());
    }

    #[test]
    fn import_failure_keeps_state_and_export_round_trips() {
        let store = UserPreferences::ephemeral();
        store.update_preferences(|prefs| prefs.compact_mode = true).expect("update");
        assert!(store.import("definitely not json").is_err());
        assert!(store.preferences().compact_mode);

        let exported = store.export().expect("export");
        let other = UserPreferences::ephemeral();
        other.import(&exported).expect("import");
        assert!(other.preferences().compact_mode);

        other.import(r#"{ "preferences": { "reducedMotion": true } }"#).expect("partial import");
        let prefs = other.preferences();
        assert!(prefs.reduced_motion);
        assert!(!prefs.compact_mode);
        assert_eq!(prefs.recent_items_count, 5);
    }

    #[test]
    fn reset_usage_clears_history_and_keeps_display_preferences() {
        let store = UserPreferences::ephemeral();
        store.update_preferences(|prefs| prefs.compact_mode = true).expect("update");
        store.record_navigation("x", "X", "/x").expect("record");
        store.record_search("sensor").expect("search");
        store.toggle_favorite("x").expect("favourite");
        store.reset_usage().expect("reset");
        assert_eq!(store.usage(), NavigationUsage::default());
        assert!(store.preferences().compact_mode);
    }
}
