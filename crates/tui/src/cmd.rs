//! # Command Execution Layer
//!
//! Translates application [`Effect`]s into [`Cmd`]s and executes them. This
//! is where the pure navigation state meets side effects: following a link,
//! persisting usage and preferences, switching palettes, quitting.
//!
//! Persistence failures are logged and dropped. The navigation keeps working
//! with whatever was already applied in memory.

use meganav_types::{Effect, LinkActivation, ThemeMode};
use meganav_util::ThemePreference;
use tracing::{debug, warn};

use crate::app::{App, link_id};
use crate::ui::theme;

/// Side-effectful commands executed outside of pure state updates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cmd {
    /// Follow an activated link in the link navigator.
    FollowLink(LinkActivation),
    /// Record a visit in the persisted usage history.
    RecordVisit { id: String, label: String, href: String },
    RecordSearch(String),
    ToggleFavorite(String),
    /// Swap the live palette and persist the choice.
    ApplyTheme(ThemeMode),
    GoHome,
    Quit,
}

/// Outcome of running a batch of commands.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CmdOutcome {
    pub quit: bool,
}

/// Convert application [`Effect`]s into [`Cmd`]s.
///
/// Modal effects are handled by the runtime before this point and are
/// ignored here.
pub fn from_effects(app: &App, effects: Vec<Effect>) -> Vec<Cmd> {
    let mut commands = Vec::new();
    for effect in effects {
        match effect {
            Effect::ActivateLink(activation) => {
                let tree = app.tree();
                let id = tree
                    .links()
                    .find(|entry| entry.link.href == activation.href)
                    .map_or_else(|| activation.href.clone(), |entry| link_id(entry.link));
                commands.push(Cmd::RecordVisit {
                    id,
                    label: activation.label.clone(),
                    href: activation.href.clone(),
                });
                commands.push(Cmd::FollowLink(activation));
            }
            Effect::RecordSearch(query) => commands.push(Cmd::RecordSearch(query)),
            Effect::ToggleFavorite(id) => commands.push(Cmd::ToggleFavorite(id)),
            Effect::SetTheme(mode) => commands.push(Cmd::ApplyTheme(mode)),
            Effect::GoHome => commands.push(Cmd::GoHome),
            Effect::Quit => commands.push(Cmd::Quit),
            Effect::ShowModal(_) | Effect::CloseModal => {}
        }
    }
    commands
}

fn theme_preference(mode: ThemeMode) -> ThemePreference {
    match mode {
        ThemeMode::Light => ThemePreference::Light,
        ThemeMode::Dark => ThemePreference::Dark,
        ThemeMode::Auto => ThemePreference::System,
    }
}

/// Execute commands against the app.
pub fn run_cmds(app: &mut App, commands: Vec<Cmd>) -> CmdOutcome {
    let mut outcome = CmdOutcome::default();
    for command in commands {
        debug!(?command, "Running command");
        match command {
            Cmd::FollowLink(activation) => app.links.activate(&activation),
            Cmd::RecordVisit { id, label, href } => {
                if let Err(error) = app.ctx.preferences.record_navigation(&id, &label, &href) {
                    warn!(%error, %id, "Failed to record navigation");
                }
            }
            Cmd::RecordSearch(query) => {
                if let Err(error) = app.ctx.preferences.record_search(&query) {
                    warn!(%error, "Failed to record search query");
                }
            }
            Cmd::ToggleFavorite(id) => match app.ctx.preferences.toggle_favorite(&id) {
                Ok(favorite) => debug!(%id, favorite, "Toggled favourite"),
                Err(error) => warn!(%error, %id, "Failed to toggle favourite"),
            },
            Cmd::ApplyTheme(mode) => {
                app.ctx.theme = theme::load(mode);
                if let Err(error) = app.ctx.preferences.set_theme(theme_preference(mode)) {
                    warn!(%error, ?mode, "Failed to persist theme");
                }
            }
            Cmd::GoHome => {
                app.menu.close();
                app.menu.close_mobile();
                app.nav_boundary.retry();
                app.links.go_home();
            }
            Cmd::Quit => outcome.quit = true,
        }
        app.mark_dirty();
    }
    outcome
}

/// Translate and run in one step.
pub fn run_from_effects(app: &mut App, effects: Vec<Effect>) -> CmdOutcome {
    let commands = from_effects(app, effects);
    run_cmds(app, commands)
}
