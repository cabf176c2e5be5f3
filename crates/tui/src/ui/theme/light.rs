use ratatui::style::Color;

use super::roles::{Theme, ThemeRoles};

pub const PAPER: Color = Color::Rgb(0xFA, 0xFA, 0xF7);
pub const SURFACE: Color = Color::Rgb(0xFF, 0xFF, 0xFF);
pub const MIST: Color = Color::Rgb(0xE6, 0xE8, 0xEC);
pub const SLATE: Color = Color::Rgb(0xC3, 0xC8, 0xD0);
pub const INK: Color = Color::Rgb(0x1F, 0x23, 0x2B);
pub const GRAPHITE: Color = Color::Rgb(0x4A, 0x52, 0x60);
pub const PEBBLE: Color = Color::Rgb(0x7A, 0x82, 0x90);

pub const BRAND_BLUE: Color = Color::Rgb(0x1E, 0x5A, 0xA8);
pub const TEAL: Color = Color::Rgb(0x0F, 0x76, 0x6E);
pub const AMBER: Color = Color::Rgb(0xB2, 0x6A, 0x00);
pub const RED: Color = Color::Rgb(0xC6, 0x28, 0x28);
pub const SELECTION: Color = Color::Rgb(0xD6, 0xE4, 0xF5);
pub const MODAL_OVERLAY: Color = Color::Rgb(0xD9, 0xDC, 0xE1);

/// Light palette for `theme: light`.
#[derive(Debug, Clone)]
pub struct LightTheme {
    roles: ThemeRoles,
}

impl Default for LightTheme {
    fn default() -> Self {
        Self::new()
    }
}

impl LightTheme {
    pub fn new() -> Self {
        Self {
            roles: ThemeRoles {
                background: PAPER,
                header: MIST,
                surface: SURFACE,
                border: SLATE,

                text: INK,
                text_secondary: GRAPHITE,
                text_muted: PEBBLE,

                accent: BRAND_BLUE,
                highlight: TEAL,
                badge_bg: AMBER,
                badge_fg: SURFACE,
                error: RED,

                selection_bg: SELECTION,
                selection_fg: INK,
                focus: BRAND_BLUE,
                modal_bg: MODAL_OVERLAY,
            },
        }
    }
}

impl Theme for LightTheme {
    fn roles(&self) -> &ThemeRoles {
        &self.roles
    }

    fn is_light(&self) -> bool {
        true
    }
}
