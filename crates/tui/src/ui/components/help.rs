//! Key reference modal.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use meganav_types::Effect;
use ratatui::{
    Frame,
    layout::Rect,
    style::Modifier,
    text::{Line, Span, Text},
    widgets::{Clear, Paragraph, Wrap},
};

use crate::app::App;
use crate::ui::components::component::Component;
use crate::ui::theme::{Theme, theme_helpers as th};
use crate::ui::utils::centered_rect;

const SECTIONS: &[(&str, &[(&str, &str)])] = &[
    (
        "Menu",
        &[
            ("←/→", "Move between top-level items"),
            ("↓ / Enter / Space", "Open the focused item's panel"),
            ("↑/↓", "Move through links in the open panel"),
            ("Home/End", "First or last item"),
            ("Esc", "Close the panel and return focus to its trigger"),
            ("Tab", "Leave the menu"),
        ],
    ),
    (
        "Search",
        &[
            ("/", "Search inside the open panel"),
            ("Ctrl+K", "Open the full search view"),
            ("↑/↓ Enter", "Pick a result"),
        ],
    ),
    (
        "Drawer (narrow terminals)",
        &[("m", "Open or close the drawer"), ("Tab / Shift+Tab", "Cycle focus inside the drawer")],
    ),
    (
        "General",
        &[
            ("f", "Favourite the focused link"),
            ("t", "Toggle light and dark theme"),
            ("g", "Go home"),
            ("r", "Retry after an error"),
            ("?", "Show this help"),
            ("q", "Quit"),
        ],
    ),
];

fn help_text(theme: &dyn Theme) -> Text<'static> {
    let mut lines = Vec::new();
    for (title, keys) in SECTIONS {
        if !lines.is_empty() {
            lines.push(Line::default());
        }
        lines.push(Line::from(Span::styled(
            title.to_uppercase(),
            theme.accent_emphasis_style().add_modifier(Modifier::BOLD),
        )));
        for (key, description) in *keys {
            lines.push(Line::from(vec![
                Span::styled(format!("  {key:<18}"), theme.accent_primary_style()),
                Span::styled(*description, theme.text_primary_style()),
            ]));
        }
    }
    Text::from(lines)
}

#[derive(Debug, Default)]
pub struct HelpComponent;

impl Component for HelpComponent {
    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        let area = centered_rect(70, 80, rect);
        let theme = &*app.ctx.theme;
        let block = th::block(theme, Some("Keys  [Esc] Close"), true);
        frame.render_widget(Clear, area);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Paragraph::new(help_text(theme)).wrap(Wrap { trim: false }), inner);
    }

    fn handle_key_events(&mut self, _app: &mut App, key: KeyEvent) -> Vec<Effect> {
        if key.kind == KeyEventKind::Release {
            return Vec::new();
        }
        match key.code {
            KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') => vec![Effect::CloseModal],
            _ => Vec::new(),
        }
    }

    fn get_hint_spans(&self, app: &App) -> Vec<Span<'static>> {
        th::build_hint_spans(&*app.ctx.theme, &[("Esc", " Close ")])
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyModifiers;

    use super::*;
    use crate::app::tests::sample_app;

    #[test]
    fn question_mark_and_escape_close() {
        let mut app = sample_app(120);
        let mut help = HelpComponent;
        for code in [KeyCode::Esc, KeyCode::Char('?')] {
            assert_eq!(help.handle_key_events(&mut app, KeyEvent::new(code, KeyModifiers::NONE)), vec![Effect::CloseModal]);
        }
        assert!(help.handle_key_events(&mut app, KeyEvent::new(KeyCode::Down, KeyModifiers::NONE)).is_empty());
    }
}
