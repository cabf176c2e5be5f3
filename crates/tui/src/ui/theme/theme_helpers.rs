use ratatui::{
    style::{Modifier, Style},
    text::Span,
    widgets::{Block, BorderType, Borders},
};

use super::roles::{Theme, ThemeRoles};

/// Build a standard Block with theme surfaces and borders.
pub fn block<'a, T: Theme + ?Sized>(theme: &'a T, title: Option<&'a str>, focused: bool) -> Block<'a> {
    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme.border_style(focused))
        .style(panel_style(theme));
    if let Some(t) = title {
        block = block.title(Span::styled(
            format!(" {t} "),
            theme.text_secondary_style().add_modifier(Modifier::BOLD),
        ));
    }
    block
}

/// Style for panel-like containers (set background on widget using `.style`).
pub fn panel_style<T: Theme + ?Sized>(theme: &T) -> Style {
    let ThemeRoles { surface, text, .. } = *theme.roles();
    Style::default().bg(surface).fg(text)
}

/// Background of the trigger row.
pub fn header_style<T: Theme + ?Sized>(theme: &T) -> Style {
    let ThemeRoles { header, text, .. } = *theme.roles();
    Style::default().bg(header).fg(text)
}

/// Trigger label in the top row.
pub fn trigger_style<T: Theme + ?Sized>(theme: &T, open: bool, focused: bool) -> Style {
    let mut style = if open {
        theme.accent_emphasis_style()
    } else {
        theme.text_primary_style()
    };
    if focused {
        style = style.add_modifier(Modifier::UNDERLINED);
    }
    style
}

/// Column title inside a panel.
pub fn column_title_style<T: Theme + ?Sized>(theme: &T) -> Style {
    theme.text_secondary_style().add_modifier(Modifier::BOLD)
}

/// Link label, highlighted when focused or selected.
pub fn link_style<T: Theme + ?Sized>(theme: &T, focused: bool) -> Style {
    if focused {
        theme.selection_style().add_modifier(Modifier::BOLD)
    } else {
        theme.text_primary_style()
    }
}

/// Badge/tag style (filled accent, readable text).
pub fn badge_style<T: Theme + ?Sized>(theme: &T) -> Style {
    let ThemeRoles { badge_bg, badge_fg, .. } = *theme.roles();
    Style::default().bg(badge_bg).fg(badge_fg).add_modifier(Modifier::BOLD)
}

/// Builds `key description` pairs for hint bars.
pub fn build_hint_spans<T: Theme + ?Sized>(theme: &T, hints: &[(&str, &str)]) -> Vec<Span<'static>> {
    let mut spans = Vec::with_capacity(hints.len() * 2);
    for (key, description) in hints {
        spans.push(Span::styled(key.to_string(), theme.accent_primary_style()));
        spans.push(Span::styled(description.to_string(), theme.text_muted_style()));
    }
    spans
}
