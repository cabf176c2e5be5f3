use std::time::Instant;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use meganav_engine::SearchResults;
use meganav_types::{CloseReason, Effect, LinkContext};
use meganav_util::truncate_to_width;
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
};

use super::state::SearchFocus;
use crate::app::App;
use crate::ui::components::component::Component;
use crate::ui::dismiss::DismissCause;
use crate::ui::layout::contains;
use crate::ui::theme::theme_helpers as th;

const CLOSE_LABEL: &str = "[Esc] ✕";

/// Full search view shown as a modal.
#[derive(Debug, Default)]
pub struct SearchComponent;

fn close(app: &mut App, reason: CloseReason) -> Vec<Effect> {
    app.close_search_view(reason);
    vec![Effect::CloseModal]
}

fn activate_selected(app: &mut App) -> Vec<Effect> {
    let query = app.search_view.engine.query().trim().to_string();
    let Some(result) = app.search_view.take_selection() else {
        return Vec::new();
    };
    let activation = app.menu.activate_link(&result.link, LinkContext::Search);
    let mut effects = vec![Effect::RecordSearch(query), Effect::ActivateLink(activation)];
    effects.extend(close(app, CloseReason::LinkActivated));
    effects
}

impl Component for SearchComponent {
    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        if key.kind == KeyEventKind::Release {
            return Vec::new();
        }
        let now = Instant::now();
        match key.code {
            KeyCode::Esc => return close(app, CloseReason::Escape),
            KeyCode::Tab => app.search_view.focus.next(),
            KeyCode::BackTab => app.search_view.focus.prev(),
            KeyCode::Down => app.search_view.select_next(),
            KeyCode::Up => app.search_view.select_prev(),
            KeyCode::Enter => {
                if app.search_view.focus.is_focused(SearchFocus::Close) {
                    return close(app, CloseReason::Explicit);
                }
                return activate_selected(app);
            }
            KeyCode::Backspace => app.search_view.pop_char(now),
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => app.search_view.push_char(c, now),
            _ => return Vec::new(),
        }
        app.mark_dirty();
        Vec::new()
    }

    fn handle_mouse_events(&mut self, app: &mut App, mouse: MouseEvent) -> Vec<Effect> {
        if !matches!(mouse.kind, MouseEventKind::Down(MouseButton::Left)) {
            return Vec::new();
        }
        let mut cause = None;
        app.search_view.dismissal.handle_event(&Event::Mouse(mouse), |dismissed| cause = Some(dismissed));
        if let Some(DismissCause::OutsidePointer | DismissCause::Escape) = cause {
            return close(app, CloseReason::OutsideClick);
        }
        if contains(app.hits.search_close, mouse.column, mouse.row) {
            return close(app, CloseReason::Explicit);
        }
        if let Some(index) = app.hits.search_result_at(mouse.column, mouse.row) {
            app.search_view.engine.clear_selection();
            for _ in 0..=index {
                app.search_view.engine.select_next();
            }
            return activate_selected(app);
        }
        Vec::new()
    }

    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        let theme = &*app.ctx.theme;
        let view = &app.search_view;
        let block = th::block(theme, Some("Search navigation"), true);
        let inner = block.inner(rect);
        frame.render_widget(block, rect);

        let [input_area, status_area, list_area] =
            Layout::vertical([Constraint::Length(1), Constraint::Length(1), Constraint::Min(0)]).areas(inner);

        let input_focused = view.focus.is_focused(SearchFocus::Input);
        let query = view.engine.query();
        let input_text = if query.is_empty() {
            Span::styled("Type to search links, descriptions and sections", theme.text_muted_style())
        } else {
            Span::styled(format!("{query}{}", if input_focused { "▏" } else { "" }), theme.text_primary_style())
        };
        let close_width = CLOSE_LABEL.chars().count() as u16;
        let close_rect = Rect::new(input_area.right().saturating_sub(close_width), input_area.y, close_width, 1);
        let close_style = th::link_style(theme, view.focus.is_focused(SearchFocus::Close));
        frame.render_widget(
            Paragraph::new(Line::from(vec![Span::styled("⌕ ", theme.accent_primary_style()), input_text])).style(if input_focused {
                theme.selection_style()
            } else {
                th::panel_style(theme)
            }),
            Rect {
                width: input_area.width.saturating_sub(close_width + 1),
                ..input_area
            },
        );
        frame.render_widget(Paragraph::new(Span::styled(CLOSE_LABEL, close_style)), close_rect);

        let status = match view.engine.results() {
            _ if view.engine.is_searching() => "Searching…".to_string(),
            SearchResults::Ready(results) if results.is_empty() => "No results".to_string(),
            SearchResults::Ready(results) => format!("{} result{}", results.len(), if results.len() == 1 { "" } else { "s" }),
            SearchResults::NotSearched => String::new(),
        };
        frame.render_widget(Paragraph::new(status).style(theme.text_muted_style()), status_area);

        let width = list_area.width as usize;
        let mut lines = Vec::new();
        let mut hits = Vec::new();
        match view.engine.results() {
            SearchResults::Ready(results) if !results.is_empty() => {
                let results_focused = view.focus.is_focused(SearchFocus::Results);
                for (index, result) in results.iter().enumerate() {
                    if lines.len() + 2 > list_area.height as usize {
                        break;
                    }
                    let selected = view.engine.selected_index() == Some(index);
                    let marker = if selected && results_focused { "▶ " } else { "  " };
                    hits.push((Rect::new(list_area.x, list_area.y + lines.len() as u16, list_area.width, 2), index));
                    lines.push(Line::from(vec![
                        Span::styled(marker, theme.accent_primary_style()),
                        Span::styled(truncate_to_width(&result.link.label, width.saturating_sub(2)), th::link_style(theme, selected)),
                    ]));
                    lines.push(Line::from(Span::styled(
                        truncate_to_width(&format!("  {}", result.breadcrumb_text()), width),
                        theme.text_muted_style(),
                    )));
                }
            }
            SearchResults::Ready(_) => {
                lines.push(Line::from(Span::styled(
                    format!("Nothing matches \"{}\".", query.trim()),
                    theme.text_secondary_style(),
                )));
            }
            SearchResults::NotSearched => {
                if !view.recent.is_empty() {
                    lines.push(Line::from(Span::styled("Recent searches", th::column_title_style(theme))));
                    lines.extend(view.recent.iter().map(|entry| Line::from(Span::styled(format!("  {entry}"), theme.text_secondary_style()))));
                }
                if !view.suggestions.is_empty() {
                    lines.push(Line::from(Span::styled("Popular", th::column_title_style(theme))));
                    lines.extend(
                        view.suggestions
                            .iter()
                            .map(|label| Line::from(Span::styled(format!("  {label}"), theme.text_secondary_style()))),
                    );
                }
            }
        }
        frame.render_widget(Paragraph::new(lines), list_area);

        app.hits.search_modal = Some(rect);
        app.hits.search_close = Some(close_rect);
        app.hits.search_results = hits;
        app.search_view.dismissal.set_regions([rect]);
    }

    fn get_hint_spans(&self, app: &App) -> Vec<Span<'static>> {
        th::build_hint_spans(
            &*app.ctx.theme,
            &[("↑↓", " Select  "), ("Enter", " Open  "), ("Tab", " Focus  "), ("Esc", " Close ")],
        )
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use meganav_types::Modal;
    use ratatui::{Terminal, backend::TestBackend};

    use super::*;
    use crate::app::tests::sample_app;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn enter_on_selected_result_activates_records_and_closes() {
        let mut app = sample_app(120);
        let mut search = SearchComponent;
        app.menu.open(1);
        app.open_search_view();
        for c in "sensor".chars() {
            search.handle_key_events(&mut app, key(KeyCode::Char(c)));
        }
        app.tick(Instant::now() + Duration::from_millis(350));
        search.handle_key_events(&mut app, key(KeyCode::Down));
        search.handle_key_events(&mut app, key(KeyCode::Down));
        let effects = search.handle_key_events(&mut app, key(KeyCode::Enter));

        assert_eq!(effects[0], Effect::RecordSearch("sensor".into()));
        assert!(matches!(&effects[1], Effect::ActivateLink(activation) if activation.href == "/products/duct"));
        assert_eq!(effects[2], Effect::CloseModal);
        assert_eq!(app.open_modal, None);
        assert_eq!(app.menu.open_index(), None);
        assert_eq!(app.search_view.recent.iter().next(), Some("Duct Sensors"));
    }

    #[test]
    fn escape_closes_the_view() {
        let mut app = sample_app(120);
        app.open_search_view();
        assert_eq!(app.open_modal, Some(Modal::Search));
        let effects = SearchComponent.handle_key_events(&mut app, key(KeyCode::Esc));
        assert_eq!(effects, vec![Effect::CloseModal]);
        assert!(!app.search_view.dismissal.is_active());
    }

    #[test]
    fn empty_result_state_is_explicit() {
        let mut app = sample_app(120);
        let mut search = SearchComponent;
        app.open_search_view();
        for c in "zzz".chars() {
            search.handle_key_events(&mut app, key(KeyCode::Char(c)));
        }
        app.tick(Instant::now() + Duration::from_millis(350));
        assert!(app.search_view.engine.results().is_no_results());

        let mut terminal = Terminal::new(TestBackend::new(80, 20)).expect("terminal");
        terminal
            .draw(|frame| search.render(frame, Rect::new(0, 0, 80, 20), &mut app))
            .expect("draw");
        let text: String = terminal.backend().buffer().content().iter().map(|cell| cell.symbol()).collect();
        assert!(text.contains("No results"));
    }

    #[test]
    fn outside_click_closes_after_render() {
        let mut app = sample_app(120);
        let mut search = SearchComponent;
        app.open_search_view();
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).expect("terminal");
        terminal
            .draw(|frame| search.render(frame, Rect::new(20, 5, 80, 20), &mut app))
            .expect("draw");
        let outside = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 2,
            row: 2,
            modifiers: KeyModifiers::NONE,
        };
        assert_eq!(search.handle_mouse_events(&mut app, outside), vec![Effect::CloseModal]);
        assert_eq!(app.open_modal, None);
    }
}
