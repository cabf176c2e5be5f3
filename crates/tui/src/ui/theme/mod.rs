//! Theme styling for the navigation UI.
//!
//! Two palettes are provided (light and dark) behind the semantic
//! [`Theme`] trait. `auto` resolves against the terminal background reported
//! in `COLORFGBG`, falling back to dark. Prefer the helpers in
//! [`theme_helpers`] over hard-coded colors.

use std::env;

use meganav_types::ThemeMode;
use tracing::debug;

pub mod dark;
pub mod light;
pub mod roles;
pub mod theme_helpers;

pub use dark::DarkTheme;
pub use light::LightTheme;
pub use roles::{Theme, ThemeRoles};

/// Environment override for the theme mode (`light`, `dark`, `auto`).
pub const THEME_ENV: &str = "MEGANAV_THEME";

/// Builds the palette for `mode`.
pub fn load(mode: ThemeMode) -> Box<dyn Theme> {
    match resolve_mode(mode) {
        ThemeMode::Light => Box::new(LightTheme::new()),
        _ => Box::new(DarkTheme::new()),
    }
}

/// Resolves `auto` to a concrete mode.
pub fn resolve_mode(mode: ThemeMode) -> ThemeMode {
    match mode {
        ThemeMode::Auto => {
            let detected = env::var("COLORFGBG").ok().and_then(|value| background_from_colorfgbg(&value));
            debug!(?detected, "Resolved automatic theme mode");
            detected.unwrap_or(ThemeMode::Dark)
        }
        concrete => concrete,
    }
}

/// Parses a theme mode name as accepted by config files and `MEGANAV_THEME`.
pub fn parse_mode(value: &str) -> Option<ThemeMode> {
    match value.trim().to_ascii_lowercase().as_str() {
        "light" => Some(ThemeMode::Light),
        "dark" => Some(ThemeMode::Dark),
        "auto" | "system" => Some(ThemeMode::Auto),
        _ => None,
    }
}

/// `COLORFGBG` is `fg;bg` (sometimes `fg;default;bg`). ANSI backgrounds 7 and
/// 15 are light.
fn background_from_colorfgbg(value: &str) -> Option<ThemeMode> {
    let background: u8 = value.rsplit(';').next()?.trim().parse().ok()?;
    Some(if matches!(background, 7 | 15) {
        ThemeMode::Light
    } else {
        ThemeMode::Dark
    })
}

/// The opposite concrete mode, used by the theme toggle.
pub fn toggled(current: &dyn Theme) -> ThemeMode {
    if current.is_light() { ThemeMode::Dark } else { ThemeMode::Light }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colorfgbg_detection() {
        assert_eq!(background_from_colorfgbg("0;15"), Some(ThemeMode::Light));
        assert_eq!(background_from_colorfgbg("15;default;0"), Some(ThemeMode::Dark));
        assert_eq!(background_from_colorfgbg("garbage"), None);
    }

    #[test]
    fn parse_accepts_system_alias() {
        assert_eq!(parse_mode(" System "), Some(ThemeMode::Auto));
        assert_eq!(parse_mode("sepia"), None);
    }

    #[test]
    fn concrete_modes_load_matching_palettes() {
        assert!(load(ThemeMode::Light).is_light());
        assert!(!load(ThemeMode::Dark).is_light());
        assert_eq!(toggled(&LightTheme::new()), ThemeMode::Dark);
    }
}
