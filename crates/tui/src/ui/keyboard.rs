//! Translation of crossterm key events into navigation keys and shortcuts.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use meganav_engine::NavKey;

/// Global shortcuts outside the arrow/enter/tab navigation keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    /// `/`: inline search when a panel or the drawer is open, search view otherwise.
    Search,
    /// `Ctrl+K`: always the full search view.
    SearchView,
    Help,
    Quit,
    ToggleTheme,
    Home,
    ToggleDrawer,
    Favorite,
    Retry,
}

/// Maps a key to a navigation key. Release events are dropped.
pub fn nav_key(key: KeyEvent) -> Option<NavKey> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    let nav = match key.code {
        KeyCode::Up => NavKey::Up,
        KeyCode::Down => NavKey::Down,
        KeyCode::Left => NavKey::Left,
        KeyCode::Right => NavKey::Right,
        KeyCode::Enter => NavKey::Enter,
        KeyCode::Char(' ') => NavKey::Space,
        KeyCode::Esc => NavKey::Escape,
        KeyCode::Tab if key.modifiers.contains(KeyModifiers::SHIFT) => NavKey::BackTab,
        KeyCode::Tab => NavKey::Tab,
        KeyCode::BackTab => NavKey::BackTab,
        KeyCode::Home => NavKey::Home,
        KeyCode::End => NavKey::End,
        _ => return None,
    };
    Some(nav)
}

pub fn shortcut(key: KeyEvent) -> Option<Shortcut> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('k') => Some(Shortcut::SearchView),
            _ => None,
        };
    }
    match key.code {
        KeyCode::Char('/') => Some(Shortcut::Search),
        KeyCode::Char('?') => Some(Shortcut::Help),
        KeyCode::Char('q') => Some(Shortcut::Quit),
        KeyCode::Char('t') => Some(Shortcut::ToggleTheme),
        KeyCode::Char('g') => Some(Shortcut::Home),
        KeyCode::Char('m') => Some(Shortcut::ToggleDrawer),
        KeyCode::Char('f') => Some(Shortcut::Favorite),
        KeyCode::Char('r') => Some(Shortcut::Retry),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shift_tab_variants_map_to_back_tab() {
        assert_eq!(nav_key(KeyEvent::new(KeyCode::BackTab, KeyModifiers::SHIFT)), Some(NavKey::BackTab));
        assert_eq!(nav_key(KeyEvent::new(KeyCode::Tab, KeyModifiers::SHIFT)), Some(NavKey::BackTab));
        assert_eq!(nav_key(KeyEvent::new(KeyCode::Tab, KeyModifiers::NONE)), Some(NavKey::Tab));
    }

    #[test]
    fn search_shortcuts() {
        assert_eq!(shortcut(KeyEvent::new(KeyCode::Char('/'), KeyModifiers::NONE)), Some(Shortcut::Search));
        assert_eq!(shortcut(KeyEvent::new(KeyCode::Char('k'), KeyModifiers::CONTROL)), Some(Shortcut::SearchView));
        assert_eq!(shortcut(KeyEvent::new(KeyCode::Char('x'), KeyModifiers::CONTROL)), None);
    }

    #[test]
    fn releases_are_ignored() {
        let mut key = KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE);
        key.kind = KeyEventKind::Release;
        assert_eq!(nav_key(key), None);
    }
}
