//! Compact search inside the open panel or the drawer.
//!
//! The query lives in the controller's own debounced search, so closing the
//! surface discards it. Activating a result closes whichever surface is open.

use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use meganav_engine::SearchResults;
use meganav_types::{Effect, LinkContext};
use meganav_util::truncate_to_width;
use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::app::App;
use crate::ui::theme::theme_helpers as th;

pub const PLACEHOLDER: &str = "Search navigation…";

pub fn handle_inline_key(app: &mut App, key: KeyEvent) -> Vec<Effect> {
    let now = Instant::now();
    match key.code {
        KeyCode::Esc | KeyCode::Tab | KeyCode::BackTab => {
            app.inline_search_focused = false;
            app.menu.search_mut().clear_selection();
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            let mut query = app.menu.search().query().to_string();
            query.push(c);
            app.menu.search_mut().search(&query, now);
        }
        KeyCode::Backspace => {
            let mut query = app.menu.search().query().to_string();
            if query.pop().is_some() {
                app.menu.search_mut().search(&query, now);
            }
        }
        KeyCode::Down => app.menu.search_mut().select_next(),
        KeyCode::Up => app.menu.search_mut().select_prev(),
        KeyCode::Enter => {
            let Some(result) = app.menu.search().selected().cloned() else {
                return Vec::new();
            };
            let query = app.menu.search().query().trim().to_string();
            let activation = app.menu.activate_link(&result.link, LinkContext::Search);
            return vec![Effect::RecordSearch(query), Effect::ActivateLink(activation)];
        }
        _ => return Vec::new(),
    }
    app.mark_dirty();
    Vec::new()
}

/// Activates the inline result at `index` (mouse).
pub fn activate_result(app: &mut App, index: usize) -> Vec<Effect> {
    let Some(result) = app.menu.search().results().as_slice().get(index).cloned() else {
        return Vec::new();
    };
    let query = app.menu.search().query().trim().to_string();
    let activation = app.menu.activate_link(&result.link, LinkContext::Search);
    vec![Effect::RecordSearch(query), Effect::ActivateLink(activation)]
}

/// Draws the one-line input and records its hit rect.
pub fn render_input(frame: &mut Frame, rect: Rect, app: &mut App) {
    let theme = &*app.ctx.theme;
    let search = app.menu.search();
    let focused = app.inline_search_focused;
    let (text, style) = if search.query().is_empty() && !focused {
        (PLACEHOLDER.to_string(), theme.text_muted_style())
    } else {
        let cursor = if focused { "▏" } else { "" };
        (format!("{}{cursor}", search.query()), theme.text_primary_style())
    };
    let status = if search.is_searching() { " …" } else { "" };
    let line = Line::from(vec![
        Span::styled("/ ", theme.accent_primary_style()),
        Span::styled(truncate_to_width(&text, rect.width.saturating_sub(4) as usize), style),
        Span::styled(status, theme.text_muted_style()),
    ]);
    let line_style = if focused { theme.selection_style() } else { th::panel_style(theme) };
    frame.render_widget(Paragraph::new(line).style(line_style), rect);
    app.hits.inline_search = Some(rect);
}

/// Whether the inline search has something to show instead of the menu.
pub fn is_showing_results(app: &App) -> bool {
    !app.menu.search().query().trim().is_empty()
}

/// Draws the compact result list and records result hit rects.
pub fn render_results(frame: &mut Frame, rect: Rect, app: &mut App) {
    let theme = &*app.ctx.theme;
    let search = app.menu.search();
    let mut lines = Vec::new();
    let mut hits = Vec::new();
    match search.results() {
        _ if search.is_searching() => lines.push(Line::from(Span::styled("Searching…", theme.text_muted_style()))),
        SearchResults::Ready(results) if results.is_empty() => {
            lines.push(Line::from(Span::styled(
                format!("No results for \"{}\"", search.query().trim()),
                theme.text_muted_style(),
            )));
        }
        SearchResults::Ready(results) => {
            for (index, result) in results.iter().enumerate().take(rect.height as usize) {
                let selected = search.selected_index() == Some(index);
                let label = truncate_to_width(&result.link.label, rect.width as usize);
                let crumb = truncate_to_width(
                    &format!("  {} › {}", result.breadcrumb[0], result.breadcrumb[1]),
                    (rect.width as usize).saturating_sub(label.chars().count()),
                );
                lines.push(Line::from(vec![
                    Span::styled(label, th::link_style(theme, selected)),
                    Span::styled(crumb, theme.text_muted_style()),
                ]));
                hits.push((Rect::new(rect.x, rect.y + index as u16, rect.width, 1), index));
            }
        }
        SearchResults::NotSearched => {}
    }
    frame.render_widget(Paragraph::new(lines).style(th::panel_style(theme)), rect);
    app.hits.search_results = hits;
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use meganav_engine::{MenuState, SearchConfig};

    use super::*;
    use crate::app::tests::sample_app;

    fn type_query(app: &mut App, text: &str) {
        for c in text.chars() {
            handle_inline_key(app, KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
        }
    }

    #[test]
    fn enter_activates_selected_result_and_closes_panel() {
        let mut app = sample_app(120);
        app.menu.open(0);
        app.inline_search_focused = true;
        type_query(&mut app, "wall");
        app.menu.tick(Instant::now() + SearchConfig::COMPACT.debounce + Duration::from_millis(1));
        handle_inline_key(&mut app, KeyEvent::new(KeyCode::Down, KeyModifiers::NONE));
        let effects = handle_inline_key(&mut app, KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));
        assert_eq!(effects.len(), 2);
        assert_eq!(effects[0], Effect::RecordSearch("wall".into()));
        assert!(matches!(&effects[1], Effect::ActivateLink(activation) if activation.href == "/products/wall"));
        assert_eq!(app.menu.state(), MenuState::Closed);
    }

    #[test]
    fn escape_returns_focus_to_panel_without_closing() {
        let mut app = sample_app(120);
        app.menu.open(0);
        app.inline_search_focused = true;
        handle_inline_key(&mut app, KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE));
        assert!(!app.inline_search_focused);
        assert_eq!(app.menu.state(), MenuState::Open(0));
    }

    #[test]
    fn enter_without_selection_does_nothing() {
        let mut app = sample_app(120);
        app.menu.open(0);
        type_query(&mut app, "blog");
        assert!(handle_inline_key(&mut app, KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)).is_empty());
    }
}
