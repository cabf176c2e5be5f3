use std::fmt::Debug;

use ratatui::style::{Color, Modifier, Style};

/// Semantic color roles for the navigation surfaces.
#[derive(Debug, Clone)]
pub struct ThemeRoles {
    pub background: Color,
    /// Trigger row behind the top-level items.
    pub header: Color,
    /// Panels, the drawer and modals.
    pub surface: Color,
    pub border: Color,

    pub text: Color,
    pub text_secondary: Color,
    pub text_muted: Color,

    /// Key hints, links in prose and the search glyph.
    pub accent: Color,
    /// Open triggers, featured links and the promo block.
    pub highlight: Color,
    pub badge_bg: Color,
    pub badge_fg: Color,
    pub error: Color,

    pub selection_bg: Color,
    pub selection_fg: Color,
    pub focus: Color,
    /// Dimmed backdrop behind a modal.
    pub modal_bg: Color,
}

/// Theme trait exposes semantic roles and common style builders.
pub trait Theme: Send + Sync + Debug {
    fn roles(&self) -> &ThemeRoles;

    /// Whether this palette targets light terminals.
    fn is_light(&self) -> bool;

    fn text_primary_style(&self) -> Style {
        Style::default().fg(self.roles().text)
    }
    fn text_secondary_style(&self) -> Style {
        Style::default().fg(self.roles().text_secondary)
    }
    fn text_muted_style(&self) -> Style {
        Style::default().fg(self.roles().text_muted)
    }

    fn border_style(&self, focused: bool) -> Style {
        let roles = self.roles();
        Style::default().fg(if focused { roles.focus } else { roles.border })
    }

    fn selection_style(&self) -> Style {
        Style::default().fg(self.roles().selection_fg).bg(self.roles().selection_bg)
    }

    fn modal_background_style(&self) -> Style {
        Style::default().bg(self.roles().modal_bg)
    }

    fn status_error(&self) -> Style {
        Style::default().fg(self.roles().error)
    }

    fn accent_primary_style(&self) -> Style {
        Style::default().fg(self.roles().accent)
    }
    fn accent_emphasis_style(&self) -> Style {
        Style::default().fg(self.roles().highlight).add_modifier(Modifier::BOLD)
    }
}
