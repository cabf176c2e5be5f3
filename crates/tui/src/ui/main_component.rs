use std::time::Instant;

use crossterm::event::{KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use meganav_types::{Effect, Modal, Msg};
use ratatui::{
    prelude::*,
    widgets::{Block, Clear, Paragraph},
};

use super::components::{Component, HelpComponent, NavigationComponent, PageComponent, SearchComponent};
use super::keyboard::{Shortcut, shortcut};
use super::layout::{contains, main_areas};
use super::theme::{self, theme_helpers as th};
use super::utils::{centered_rect, centered_rect_capped};
use crate::app::App;

pub struct ModalLayout(Box<dyn Fn(Rect) -> Rect>);

impl std::fmt::Debug for ModalLayout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ModalLayout")
    }
}

type ModalView = (Box<dyn Component>, ModalLayout);

#[derive(Debug, Default)]
pub struct MainView {
    /// Header navigation: trigger row and panels, or the drawer.
    pub(crate) navigation: NavigationComponent,
    /// Page body under the header.
    pub(crate) page: PageComponent,
    /// Currently open modal component
    pub(crate) modal_view: Option<ModalView>,
}

impl MainView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update the open modal (use None to clear). Only called from the
    /// runtime while handling `ShowModal` / `CloseModal`.
    pub fn set_open_modal(&mut self, app: &mut App, modal: Option<Modal>) {
        match modal {
            Some(Modal::Search) => {
                if app.open_modal != Some(Modal::Search) {
                    app.open_search_view();
                }
                self.modal_view = Some((
                    Box::new(SearchComponent),
                    ModalLayout(Box::new(|rect| centered_rect_capped(80, 70, 90, 24, rect))),
                ));
            }
            Some(Modal::Help) => {
                self.modal_view = Some((
                    Box::new(HelpComponent),
                    ModalLayout(Box::new(|rect| centered_rect(70, 80, rect))),
                ));
                app.open_modal = Some(Modal::Help);
            }
            None => {
                self.modal_view = None;
                app.open_modal = None;
            }
        }
        app.mark_dirty();
    }

    fn handle_global_key(&mut self, app: &mut App, key: KeyEvent) -> Option<Vec<Effect>> {
        let effects = match shortcut(key)? {
            Shortcut::Help => vec![Effect::ShowModal(Modal::Help)],
            Shortcut::Quit => vec![Effect::Quit],
            Shortcut::ToggleTheme => vec![Effect::SetTheme(theme::toggled(&*app.ctx.theme))],
            Shortcut::Home => vec![Effect::GoHome],
            Shortcut::SearchView if app.ctx.enable_search => vec![Effect::ShowModal(Modal::Search)],
            _ => return None,
        };
        Some(effects)
    }

    /// Keys while the navigation boundary shows its recovery card.
    fn handle_recovery_key(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        match shortcut(key) {
            Some(Shortcut::Retry) => {
                app.nav_boundary.retry();
                app.mark_dirty();
                Vec::new()
            }
            Some(Shortcut::Home) => vec![Effect::GoHome],
            Some(Shortcut::Quit) => vec![Effect::Quit],
            _ => Vec::new(),
        }
    }
}

impl Component for MainView {
    fn handle_message(&mut self, app: &mut App, msg: &Msg) -> Vec<Effect> {
        let mut effects = app.update(msg);
        if let Some((modal, _)) = self.modal_view.as_mut() {
            effects.extend(modal.handle_message(app, msg));
        }
        // The search view can be closed by a state change (resize, teardown)
        // without going through `CloseModal`.
        if self.modal_view.is_some() && app.open_modal.is_none() {
            self.modal_view = None;
        }
        effects
    }

    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        if key.kind == KeyEventKind::Release {
            return Vec::new();
        }
        let effects = if let Some((modal, _)) = self.modal_view.as_mut() {
            modal.handle_key_events(app, key)
        } else if app.nav_boundary.is_failed() {
            self.handle_recovery_key(app, key)
        } else if app.inline_search_focused {
            self.navigation.handle_key_events(app, key)
        } else if let Some(effects) = self.handle_global_key(app, key) {
            effects
        } else {
            self.navigation.handle_key_events(app, key)
        };
        app.sync_surfaces(Instant::now());
        app.mark_dirty();
        effects
    }

    fn handle_mouse_events(&mut self, app: &mut App, mouse: MouseEvent) -> Vec<Effect> {
        if matches!(mouse.kind, MouseEventKind::Down(MouseButton::Left)) && app.nav_boundary.is_failed() {
            if contains(app.hits.recovery_retry, mouse.column, mouse.row) {
                app.nav_boundary.retry();
                app.mark_dirty();
            } else if contains(app.hits.recovery_home, mouse.column, mouse.row) {
                return vec![Effect::GoHome];
            }
            return Vec::new();
        }
        let effects = match self.modal_view.as_mut() {
            Some((modal, _)) => modal.handle_mouse_events(app, mouse),
            None => self.navigation.handle_mouse_events(app, mouse),
        };
        if mouse.kind != MouseEventKind::Moved || !effects.is_empty() {
            app.mark_dirty();
        }
        app.sync_surfaces(Instant::now());
        effects
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, app: &mut App) {
        app.hits.clear();
        // Fill the entire background with the theme's background color for consistency
        let bg_fill = Paragraph::new("").style(Style::default().bg(app.ctx.theme.roles().background));
        frame.render_widget(bg_fill, area);

        let [_, body, hints] = main_areas(area);
        if !app.nav_boundary.is_failed() {
            self.page.render(frame, body.inner(Margin::new(1, 1)), app);
        }
        self.navigation.render(frame, area, app);

        let hint_spans = self.get_hint_spans(app);
        frame.render_widget(Paragraph::new(Line::from(hint_spans)).style(app.ctx.theme.text_muted_style()), hints);

        if let Some((modal, position)) = self.modal_view.as_mut() {
            render_overlay(frame, app);
            let modal_area = (position.0)(area);
            frame.render_widget(Clear, modal_area);
            modal.render(frame, modal_area, app);
        }
    }

    fn get_hint_spans(&self, app: &App) -> Vec<Span<'static>> {
        let mut hint_spans = vec![Span::styled("Hints: ", app.ctx.theme.text_muted_style())];
        if let Some((modal, _)) = self.modal_view.as_ref() {
            hint_spans.extend(modal.get_hint_spans(app));
            return hint_spans;
        }
        if app.nav_boundary.is_failed() {
            hint_spans.extend(th::build_hint_spans(&*app.ctx.theme, &[("r", " Retry  "), ("g", " Home  "), ("q", " Quit ")]));
            return hint_spans;
        }
        hint_spans.extend(self.navigation.get_hint_spans(app));
        hint_spans.extend(th::build_hint_spans(&*app.ctx.theme, &[("t", " Theme  "), ("?", " Help  "), ("q", " Quit ")]));
        hint_spans
    }
}

fn render_overlay(frame: &mut Frame, app: &mut App) {
    frame.render_widget(Block::default().style(app.ctx.theme.modal_background_style()).dim(), frame.area());
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyModifiers};
    use ratatui::{Terminal, backend::TestBackend};

    use super::*;
    use crate::app::tests::sample_app;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn global_shortcuts_produce_effects() {
        let mut app = sample_app(120);
        let mut main = MainView::new();
        assert_eq!(
            main.handle_key_events(&mut app, key(KeyCode::Char('k'), KeyModifiers::CONTROL)),
            vec![Effect::ShowModal(Modal::Search)]
        );
        assert_eq!(main.handle_key_events(&mut app, key(KeyCode::Char('q'), KeyModifiers::NONE)), vec![Effect::Quit]);
        assert!(matches!(
            main.handle_key_events(&mut app, key(KeyCode::Char('t'), KeyModifiers::NONE)).as_slice(),
            [Effect::SetTheme(_)]
        ));
    }

    #[test]
    fn modal_receives_keys_first() {
        let mut app = sample_app(120);
        let mut main = MainView::new();
        main.set_open_modal(&mut app, Some(Modal::Help));
        assert_eq!(
            main.handle_key_events(&mut app, key(KeyCode::Char('q'), KeyModifiers::NONE)),
            vec![Effect::CloseModal]
        );
    }

    #[test]
    fn renders_header_page_and_modal() {
        let mut app = sample_app(120);
        let mut main = MainView::new();
        main.set_open_modal(&mut app, Some(Modal::Search));
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).expect("terminal");
        terminal
            .draw(|frame| {
                let area = frame.area();
                main.render(frame, area, &mut app);
            })
            .expect("draw");
        let text: String = terminal.backend().buffer().content().iter().map(|cell| cell.symbol()).collect();
        assert!(text.contains("Products"));
        assert!(text.contains("Search navigation"));
        assert!(app.hits.search_modal.is_some());
        assert!(!app.hits.triggers.is_empty());
    }
}
