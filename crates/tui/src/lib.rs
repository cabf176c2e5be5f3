//! # Meganav TUI Library
//!
//! Terminal front-end for the Meganav navigation menu: a header of
//! top-level items opening mega-menu panels, a drawer layout for narrow
//! terminals, inline and full-view navigation search, and a page body that
//! follows activated links.
//!
//! ## Architecture
//!
//! Components (navigation, page, search, help) handle input and render
//! against a shared [`app::App`], returning effects that the runtime applies
//! through the command layer. Menu state and timers live in the headless
//! `meganav-engine` crate.

mod app;
mod cmd;
mod links;
mod ui;

use std::env;
use std::sync::Arc;

use anyhow::Result;
use meganav_engine::{ProcessOptions, process};
use meganav_types::{NavigationConfig, ThemeMode};
use meganav_util::{MenuBehavior, ThemePreference, UserPreferences};
use tracing::{info, warn};

pub use ui::theme::{THEME_ENV, parse_mode};

/// Launch options gathered by the binary.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Explicit theme; overrides the environment, saved preference and document.
    pub theme: Option<ThemeMode>,
    pub reduced_motion: bool,
    /// Overrides the saved menu behavior.
    pub behavior: Option<MenuBehavior>,
    /// Permission tags held by the viewer.
    pub permissions: Vec<String>,
    /// Preference store; the default location is used when absent.
    pub preferences: Option<Arc<UserPreferences>>,
}

fn open_preferences() -> Arc<UserPreferences> {
    match UserPreferences::new() {
        Ok(preferences) => Arc::new(preferences),
        Err(error) => {
            warn!(%error, "Preferences unavailable; usage will not be persisted");
            Arc::new(UserPreferences::ephemeral())
        }
    }
}

fn resolve_theme(option: Option<ThemeMode>, saved: ThemePreference, document: ThemeMode) -> ThemeMode {
    let from_env = env::var(THEME_ENV).ok().and_then(|value| parse_mode(&value));
    let from_saved = match saved {
        ThemePreference::Light => Some(ThemeMode::Light),
        ThemePreference::Dark => Some(ThemeMode::Dark),
        ThemePreference::System => None,
    };
    option.or(from_env).or(from_saved).unwrap_or(document)
}

/// Runs the navigation TUI until the user quits.
///
/// # Errors
///
/// Terminal setup and teardown failures (raw mode, alternate screen).
pub async fn run(config: NavigationConfig, options: RunOptions) -> Result<()> {
    let preferences = options.preferences.unwrap_or_else(open_preferences);
    let saved = preferences.preferences();

    let process_options = ProcessOptions::default()
        .with_permissions(options.permissions)
        .with_max_columns(usize::from(config.max_columns));
    let items = process(&config.items, &process_options);
    let mode = resolve_theme(options.theme, saved.theme, config.theme);
    let behavior = options.behavior.unwrap_or(saved.menu_behavior);
    info!(items = items.len(), ?mode, ?behavior, "Starting navigation");

    let ctx = app::SharedCtx {
        theme: ui::theme::load(mode),
        preferences,
        reduced_motion: options.reduced_motion || saved.reduced_motion,
        enable_search: config.enable_search && saved.search_enabled,
        compact: saved.compact_mode,
        mobile_breakpoint: config.mobile_breakpoint,
    };
    let size = crossterm::terminal::size().unwrap_or((80, 24));
    let app = app::App::new(NavigationConfig { items, ..config }, ctx, behavior, size);
    ui::runtime::run_app(app).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_theme_wins_over_saved_and_document() {
        assert_eq!(resolve_theme(Some(ThemeMode::Light), ThemePreference::Dark, ThemeMode::Dark), ThemeMode::Light);
    }

    #[test]
    fn saved_system_preference_falls_through_to_document() {
        if env::var(THEME_ENV).is_err() {
            assert_eq!(resolve_theme(None, ThemePreference::System, ThemeMode::Light), ThemeMode::Light);
            assert_eq!(resolve_theme(None, ThemePreference::Dark, ThemeMode::Light), ThemeMode::Dark);
        }
    }
}
