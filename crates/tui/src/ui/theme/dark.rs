use ratatui::style::Color;

use super::roles::{Theme, ThemeRoles};

// Dracula palette (https://draculatheme.com/contribute)
pub const BG: Color = Color::Rgb(0x28, 0x2A, 0x36); // #282a36
pub const CURRENT_LINE: Color = Color::Rgb(0x44, 0x47, 0x5A); // #44475a
pub const FOREGROUND: Color = Color::Rgb(0xF8, 0xF8, 0xF2); // #f8f8f2
pub const COMMENT: Color = Color::Rgb(0x62, 0x72, 0xA4); // #6272a4

pub const CYAN: Color = Color::Rgb(0x8B, 0xE9, 0xFD); // #8be9fd
pub const GREEN: Color = Color::Rgb(0x50, 0xFA, 0x7B); // #50fa7b
pub const ORANGE: Color = Color::Rgb(0xFF, 0xB8, 0x6C); // #ffb86c
pub const PINK: Color = Color::Rgb(0xFF, 0x79, 0xC6); // #ff79c6
pub const RED: Color = Color::Rgb(0xFF, 0x55, 0x55); // #ff5555

pub const PANEL: Color = Color::Rgb(0x21, 0x22, 0x2C);
pub const MODAL_OVERLAY: Color = Color::Rgb(0x1D, 0x1F, 0x27);

/// Dark palette used for `theme: dark` and as the `auto` fallback.
#[derive(Debug, Clone)]
pub struct DarkTheme {
    roles: ThemeRoles,
}

impl Default for DarkTheme {
    fn default() -> Self {
        Self::new()
    }
}

impl DarkTheme {
    pub fn new() -> Self {
        Self {
            roles: ThemeRoles {
                background: BG,
                header: PANEL,
                surface: PANEL,
                border: CURRENT_LINE,

                text: FOREGROUND,
                text_secondary: Color::Rgb(0xBD, 0xC1, 0xD6),
                text_muted: COMMENT,

                accent: CYAN,
                highlight: PINK,
                badge_bg: GREEN,
                badge_fg: BG,
                error: RED,

                selection_bg: CURRENT_LINE,
                selection_fg: FOREGROUND,
                focus: ORANGE,
                modal_bg: MODAL_OVERLAY,
            },
        }
    }
}

impl Theme for DarkTheme {
    fn roles(&self) -> &ThemeRoles {
        &self.roles
    }

    fn is_light(&self) -> bool {
        false
    }
}
