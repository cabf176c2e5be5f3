//! Header navigation: desktop trigger row with mega-menu panels, or the
//! mobile menu button with its drawer, depending on terminal width.

use std::time::Instant;

use crossterm::event::{Event, KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use meganav_engine::{KeyOutcome, MenuFocus, NavKey, panel_links};
use meganav_types::{Effect, LinkContext, Modal};
use meganav_util::truncate_to_width;
use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};
use tracing::warn;

use super::drawer::render_drawer;
use super::inline_search::{self, handle_inline_key};
use super::panel::{self, render_panel};
use super::state::DrawerNode;
use crate::app::{App, link_id};
use crate::ui::components::component::Component;
use crate::ui::components::error_card::render_error_card;
use crate::ui::keyboard::{Shortcut, nav_key, shortcut};
use crate::ui::layout::{MIN_HEIGHT, MIN_WIDTH, PointerRegion, contains, main_areas, panel_rect};
use crate::ui::theme::theme_helpers as th;

const BRAND: &str = "◆ meganav";
const MENU_BUTTON: &str = "☰ Menu";
const TRIGGER_GAP: u16 = 2;

#[derive(Debug, Default)]
pub struct NavigationComponent;

impl NavigationComponent {
    pub fn new() -> Self {
        Self
    }

    fn handle_desktop_key(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        match shortcut(key) {
            Some(Shortcut::Search) if app.ctx.enable_search => {
                if app.menu.open_index().is_some() {
                    app.inline_search_focused = true;
                    return Vec::new();
                }
                return vec![Effect::ShowModal(Modal::Search)];
            }
            Some(Shortcut::Favorite) => {
                if let Some(MenuFocus::Link { item, position }) = app.keyboard.focus()
                    && let Some(id) = app
                        .menu
                        .tree()
                        .item(item)
                        .and_then(|item| panel_links(item).nth(position))
                        .map(|(_, link)| link_id(link))
                {
                    return vec![Effect::ToggleFavorite(id)];
                }
                return Vec::new();
            }
            Some(Shortcut::Retry) => {
                if let Some(index) = app.menu.open_index()
                    && let Some(boundary) = app.panel_boundaries.get_mut(index)
                {
                    boundary.retry();
                }
                return Vec::new();
            }
            _ => {}
        }

        let now = Instant::now();
        if key.code == KeyCode::Esc {
            app.panel_dismissal.handle_event(&Event::Key(key), |_| {
                app.keyboard.handle(NavKey::Escape, &mut app.menu, now);
            });
            return Vec::new();
        }
        let Some(nav) = nav_key(key) else {
            return Vec::new();
        };
        match app.keyboard.handle(nav, &mut app.menu, now) {
            KeyOutcome::Activated(activation) => vec![Effect::ActivateLink(activation)],
            KeyOutcome::Handled | KeyOutcome::Ignored => Vec::new(),
        }
    }

    fn handle_mobile_key(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        let tree = app.tree();
        let search_enabled = app.ctx.enable_search;
        if !app.drawer.is_open() {
            return match (shortcut(key), nav_key(key)) {
                (Some(Shortcut::ToggleDrawer), _) | (_, Some(NavKey::Enter | NavKey::Space)) => {
                    app.menu.open_mobile();
                    Vec::new()
                }
                (Some(Shortcut::Search), _) if search_enabled => vec![Effect::ShowModal(Modal::Search)],
                _ => Vec::new(),
            };
        }

        match shortcut(key) {
            Some(Shortcut::ToggleDrawer) => {
                app.menu.close_mobile();
                return Vec::new();
            }
            Some(Shortcut::Search) if search_enabled => {
                app.drawer.focus.focus(DrawerNode::Search);
                app.inline_search_focused = true;
                return Vec::new();
            }
            Some(Shortcut::Favorite) => {
                if let Some(DrawerNode::Link { item, position }) = app.drawer.focus.current()
                    && let Some((_, link)) = tree.item(item).and_then(|item| panel_links(item).nth(position))
                {
                    return vec![Effect::ToggleFavorite(link_id(link))];
                }
                return Vec::new();
            }
            _ => {}
        }

        if key.code == KeyCode::Esc {
            app.drawer.dismissal.handle_event(&Event::Key(key), |_| {
                app.menu.escape();
            });
            return Vec::new();
        }
        match nav_key(key) {
            Some(NavKey::Tab | NavKey::Down) => app.drawer.focus.next(),
            Some(NavKey::BackTab | NavKey::Up) => app.drawer.focus.prev(),
            Some(NavKey::Enter | NavKey::Space | NavKey::Right) => {
                if let Some(node) = app.drawer.focus.current() {
                    return activate_drawer_node(app, node);
                }
            }
            _ => {}
        }
        Vec::new()
    }

    fn handle_desktop_mouse(&mut self, app: &mut App, mouse: MouseEvent) -> Vec<Effect> {
        let now = Instant::now();
        match mouse.kind {
            MouseEventKind::Moved => {
                let region = app.hits.region_at(mouse.column, mouse.row);
                track_pointer(app, region, now);
                Vec::new()
            }
            MouseEventKind::Down(MouseButton::Left) => {
                let dismissed = app.panel_dismissal.handle_event(&Event::Mouse(mouse), |_| {
                    app.menu.outside_click();
                });
                if dismissed {
                    return Vec::new();
                }
                let (column, row) = (mouse.column, mouse.row);
                if let Some(index) = app.hits.trigger_at(column, row) {
                    app.menu.toggle(index);
                    app.keyboard.set_focus(Some(MenuFocus::Trigger(index)));
                    return Vec::new();
                }
                let Some(open) = app.menu.open_index() else {
                    return Vec::new();
                };
                if contains(app.hits.panel_retry, column, row) {
                    if let Some(boundary) = app.panel_boundaries.get_mut(open) {
                        boundary.retry();
                    }
                    return Vec::new();
                }
                if contains(app.hits.inline_search, column, row) {
                    app.inline_search_focused = true;
                    return Vec::new();
                }
                if inline_search::is_showing_results(app) {
                    return match app.hits.search_result_at(column, row) {
                        Some(index) => inline_search::activate_result(app, index),
                        None => Vec::new(),
                    };
                }
                let tree = app.tree();
                if let Some(position) = app.hits.panel_link_at(column, row)
                    && let Some((_, link)) = tree.item(open).and_then(|item| panel_links(item).nth(position))
                {
                    let activation = app.menu.activate_link(link, LinkContext::Desktop);
                    return vec![Effect::ActivateLink(activation)];
                }
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    fn handle_mobile_mouse(&mut self, app: &mut App, mouse: MouseEvent) -> Vec<Effect> {
        if !matches!(mouse.kind, MouseEventKind::Down(MouseButton::Left)) {
            return Vec::new();
        }
        let (column, row) = (mouse.column, mouse.row);
        if !app.drawer.is_open() {
            if contains(app.hits.drawer_toggle, column, row) {
                app.menu.open_mobile();
            }
            return Vec::new();
        }
        let dismissed = app.drawer.dismissal.handle_event(&Event::Mouse(mouse), |_| {
            app.menu.outside_click();
        });
        if dismissed {
            return Vec::new();
        }
        if inline_search::is_showing_results(app)
            && let Some(index) = app.hits.search_result_at(column, row)
        {
            return inline_search::activate_result(app, index);
        }
        match app.hits.drawer_row_at(column, row) {
            Some(node) => {
                app.drawer.focus.focus(node);
                activate_drawer_node(app, node)
            }
            None => Vec::new(),
        }
    }

    fn render_desktop_header(&self, frame: &mut Frame, header: Rect, app: &mut App) {
        let theme = &*app.ctx.theme;
        let tree = app.tree();
        let row = Rect::new(header.x, header.y + 1, header.width, 1);
        let brand_width = BRAND.chars().count() as u16 + 3;
        let mut spans = vec![Span::styled(BRAND, theme.accent_emphasis_style()), Span::raw("   ")];
        let mut triggers = Vec::with_capacity(tree.len());
        let mut x = header.x + brand_width;
        let focused = match app.keyboard.focus() {
            Some(MenuFocus::Trigger(index)) => Some(index),
            _ => None,
        };
        for (index, item) in tree.items().iter().enumerate() {
            let open = app.menu.is_open(index);
            let caret = if item.columns.is_empty() { "" } else if open { " ▴" } else { " ▾" };
            let label = format!("{}{caret}", item.label);
            let width = label.chars().count() as u16;
            triggers.push(Rect::new(x, header.y, width.min(header.right().saturating_sub(x)), header.height));
            spans.push(Span::styled(label, th::trigger_style(theme, open, focused == Some(index))));
            spans.push(Span::raw(" ".repeat(TRIGGER_GAP as usize)));
            x = x.saturating_add(width + TRIGGER_GAP);
        }
        if app.ctx.enable_search {
            let hint = "Ctrl+K search";
            let remaining = header.right().saturating_sub(x) as usize;
            if remaining > hint.len() + 1 {
                spans.push(Span::raw(" ".repeat(remaining - hint.len() - 1)));
                spans.push(Span::styled(hint, theme.text_muted_style()));
            }
        }
        frame.render_widget(
            Block::default().borders(Borders::BOTTOM).border_style(theme.border_style(false)).style(th::header_style(theme)),
            header,
        );
        frame.render_widget(Paragraph::new(Line::from(spans)), row);
        app.hits.trigger_row = header;
        app.hits.triggers = triggers;
    }

    fn render_mobile_header(&self, frame: &mut Frame, header: Rect, app: &mut App) {
        let theme = &*app.ctx.theme;
        let row = Rect::new(header.x, header.y + 1, header.width, 1);
        let button_width = MENU_BUTTON.chars().count() as u16;
        let button = Rect::new(header.right().saturating_sub(button_width + 1), header.y, button_width, header.height);
        let brand = truncate_to_width(BRAND, header.width.saturating_sub(button_width + 2) as usize);
        let padding = header.width.saturating_sub(brand.chars().count() as u16 + button_width + 1) as usize;
        let line = Line::from(vec![
            Span::styled(brand, theme.accent_emphasis_style()),
            Span::raw(" ".repeat(padding)),
            Span::styled(MENU_BUTTON, th::trigger_style(theme, app.drawer.is_open(), !app.drawer.is_open())),
        ]);
        frame.render_widget(
            Block::default().borders(Borders::BOTTOM).border_style(theme.border_style(false)).style(th::header_style(theme)),
            header,
        );
        frame.render_widget(Paragraph::new(line), row);
        app.hits.trigger_row = header;
        app.hits.drawer_toggle = Some(button);
    }

    fn render_open_panel(&self, frame: &mut Frame, header: Rect, body: Rect, app: &mut App, index: usize) {
        let tree = app.tree();
        let Some(item) = tree.item(index) else {
            return;
        };
        let (width, height) = panel::panel_size(item, app.ctx.enable_search, app.ctx.compact);
        let anchor = app.hits.triggers.get(index).map_or(body.x, |rect| rect.x);
        let full = panel_rect(body, anchor, width, height);
        let visible = Rect {
            height: app.reveal.visible_rows(full.height),
            ..full
        };
        app.hits.panel = Some((full, index));
        app.panel_dismissal.set_regions([header, full]);
        frame.render_widget(Clear, visible);

        if !app.panel_boundaries[index].is_failed()
            && let Err(error) = render_panel(frame, visible, app, index)
        {
            warn!(item = %item.label, %error, "Panel render failed");
            app.panel_boundaries[index].fail(error.to_string(), Instant::now());
            frame.render_widget(Clear, visible);
        }
        let boundary = &app.panel_boundaries[index];
        match boundary.failure() {
            Some(failure) => {
                let buttons = render_error_card(frame, visible, &*app.ctx.theme, failure, boundary.actions());
                app.hits.panel_retry = buttons.retry;
                app.hits.panel_links.clear();
            }
            None => app.panel_boundaries[index].mark_healthy(),
        }
    }
}

/// Feeds pointer movement into the hover intents. The trigger and its open
/// panel form one hover region.
pub fn track_pointer(app: &mut App, region: PointerRegion, now: Instant) {
    let previous = std::mem::replace(&mut app.pointer, region);
    if previous == region {
        return;
    }
    match (previous, region) {
        (PointerRegion::Trigger(a), PointerRegion::Panel(b)) if a == b => app.menu.panel_enter(b),
        (PointerRegion::Panel(a), PointerRegion::Trigger(b)) if a == b => app.menu.pointer_enter(b, now),
        _ => {
            if let PointerRegion::Trigger(index) | PointerRegion::Panel(index) = previous {
                app.menu.pointer_leave(index, now);
            }
            match region {
                PointerRegion::Trigger(index) => app.menu.pointer_enter(index, now),
                PointerRegion::Panel(index) => app.menu.panel_enter(index),
                PointerRegion::Outside => {}
            }
        }
    }
}

fn activate_drawer_node(app: &mut App, node: DrawerNode) -> Vec<Effect> {
    let tree = app.tree();
    match node {
        DrawerNode::Toggle => app.menu.open_mobile(),
        DrawerNode::Close => app.menu.close_mobile(),
        DrawerNode::Search => app.inline_search_focused = app.ctx.enable_search,
        DrawerNode::Section(index) => app.drawer.toggle_section(index, &tree, app.ctx.enable_search),
        DrawerNode::Link { item, position } => {
            if let Some((_, link)) = tree.item(item).and_then(|item| panel_links(item).nth(position)) {
                let activation = app.menu.activate_link(link, LinkContext::Mobile);
                return vec![Effect::ActivateLink(activation)];
            }
        }
    }
    Vec::new()
}

impl Component for NavigationComponent {
    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        if app.inline_search_focused && (app.menu.open_index().is_some() || app.drawer.is_open()) {
            return handle_inline_key(app, key);
        }
        if app.is_mobile() {
            self.handle_mobile_key(app, key)
        } else {
            self.handle_desktop_key(app, key)
        }
    }

    fn handle_mouse_events(&mut self, app: &mut App, mouse: MouseEvent) -> Vec<Effect> {
        if app.is_mobile() {
            self.handle_mobile_mouse(app, mouse)
        } else {
            self.handle_desktop_mouse(app, mouse)
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, app: &mut App) {
        if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
            app.nav_boundary.fail(
                format!(
                    "The terminal is {}x{}; the navigation needs at least {MIN_WIDTH}x{MIN_HEIGHT}.",
                    area.width, area.height
                ),
                Instant::now(),
            );
        }
        if let Some(failure) = app.nav_boundary.failure() {
            let buttons = render_error_card(frame, area, &*app.ctx.theme, failure, app.nav_boundary.actions());
            app.hits.recovery_retry = buttons.retry;
            app.hits.recovery_home = buttons.home;
            return;
        }
        app.nav_boundary.mark_healthy();

        let [header, body, _] = main_areas(area);
        if app.is_mobile() {
            self.render_mobile_header(frame, header, app);
            if app.drawer.is_open() {
                render_drawer(frame, area, app);
            }
        } else {
            self.render_desktop_header(frame, header, app);
            if let Some(index) = app.menu.open_index() {
                self.render_open_panel(frame, header, body, app, index);
            }
        }
    }

    fn get_hint_spans(&self, app: &App) -> Vec<Span<'static>> {
        let theme = &*app.ctx.theme;
        if app.inline_search_focused {
            return th::build_hint_spans(theme, &[("↑↓", " Select  "), ("Enter", " Open  "), ("Esc", " Back  ")]);
        }
        if app.is_mobile() {
            if app.drawer.is_open() {
                return th::build_hint_spans(
                    theme,
                    &[("Tab", " Next  "), ("Enter", " Open/expand  "), ("/", " Search  "), ("Esc", " Close  ")],
                );
            }
            return th::build_hint_spans(theme, &[("m", " Menu  "), ("Ctrl+K", " Search  ")]);
        }
        if app.menu.open_index().is_some() {
            return th::build_hint_spans(
                theme,
                &[("←→", " Menus  "), ("↑↓", " Links  "), ("Enter", " Open  "), ("/", " Search  "), ("f", " Favourite  "), ("Esc", " Close  ")],
            );
        }
        th::build_hint_spans(theme, &[("←→", " Menus  "), ("↓/Enter", " Open  "), ("Ctrl+K", " Search  ")])
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyModifiers;
    use meganav_engine::MenuState;
    use meganav_types::Msg;
    use ratatui::{Terminal, backend::TestBackend};

    use super::*;
    use crate::app::tests::sample_app;

    fn draw(app: &mut App, width: u16, height: u16) {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).expect("terminal");
        let mut component = NavigationComponent::new();
        terminal
            .draw(|frame| {
                let area = frame.area();
                app.hits.clear();
                component.render(frame, area, app);
            })
            .expect("draw");
    }

    fn click(column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn clicking_triggers_switches_panels_then_escape_closes() {
        let mut app = sample_app(120);
        let mut nav = NavigationComponent::new();
        draw(&mut app, 120, 30);
        let products = app.hits.triggers[0];
        let resources = app.hits.triggers[1];

        nav.handle_mouse_events(&mut app, click(products.x, products.y + 1));
        app.sync_surfaces(Instant::now());
        assert_eq!(app.menu.state(), MenuState::Open(0));

        draw(&mut app, 120, 30);
        nav.handle_mouse_events(&mut app, click(resources.x, resources.y + 1));
        app.sync_surfaces(Instant::now());
        assert_eq!(app.menu.state(), MenuState::Open(1));

        draw(&mut app, 120, 30);
        nav.handle_key_events(&mut app, key(KeyCode::Esc));
        assert_eq!(app.menu.state(), MenuState::Closed);
        nav.handle_key_events(&mut app, key(KeyCode::Esc));
        assert_eq!(app.menu.state(), MenuState::Closed);
    }

    #[test]
    fn outside_click_closes_once() {
        let mut app = sample_app(120);
        let mut nav = NavigationComponent::new();
        app.menu.open(0);
        app.sync_surfaces(Instant::now());
        app.reveal.finish();
        draw(&mut app, 120, 30);
        nav.handle_mouse_events(&mut app, click(119, 28));
        assert_eq!(app.menu.state(), MenuState::Closed);
        assert_eq!(app.menu.analytics().by_action("close").count(), 1);
    }

    #[test]
    fn clicking_a_panel_link_activates_it() {
        let mut app = sample_app(120);
        let mut nav = NavigationComponent::new();
        app.menu.open(0);
        app.sync_surfaces(Instant::now());
        app.reveal.finish();
        draw(&mut app, 120, 30);
        let (rect, _) = app.hits.panel_links[1];
        let effects = nav.handle_mouse_events(&mut app, click(rect.x, rect.y));
        assert!(matches!(&effects[..], [Effect::ActivateLink(activation)] if activation.href == "/products/duct"));
        assert_eq!(app.menu.state(), MenuState::Closed);
    }

    #[test]
    fn pointer_travel_from_trigger_into_panel_keeps_it_open() {
        let mut app = sample_app(120);
        let t0 = Instant::now();
        track_pointer(&mut app, PointerRegion::Trigger(0), t0);
        app.tick(t0 + std::time::Duration::from_millis(80));
        assert_eq!(app.menu.state(), MenuState::Open(0));
        track_pointer(&mut app, PointerRegion::Panel(0), t0 + std::time::Duration::from_millis(100));
        app.tick(t0 + std::time::Duration::from_secs(1));
        assert_eq!(app.menu.state(), MenuState::Open(0));
        track_pointer(&mut app, PointerRegion::Outside, t0 + std::time::Duration::from_secs(1));
        app.tick(t0 + std::time::Duration::from_millis(1140));
        assert_eq!(app.menu.state(), MenuState::Closed);
        assert_eq!(app.menu.analytics().by_action("hover").count(), 1);
    }

    #[test]
    fn mobile_drawer_traps_tab_and_escape_restores_toggle() {
        let mut app = sample_app(60);
        let mut nav = NavigationComponent::new();
        nav.handle_key_events(&mut app, key(KeyCode::Char('m')));
        app.sync_surfaces(Instant::now());
        assert!(app.drawer.is_open());
        for _ in 0..10 {
            nav.handle_key_events(&mut app, key(KeyCode::Tab));
            assert_ne!(app.drawer.focus.current(), Some(DrawerNode::Toggle));
        }
        draw(&mut app, 60, 30);
        nav.handle_key_events(&mut app, key(KeyCode::Esc));
        app.sync_surfaces(Instant::now());
        assert_eq!(app.menu.state(), MenuState::Closed);
        assert_eq!(app.drawer.focus.current(), Some(DrawerNode::Toggle));
    }

    #[test]
    fn tiny_terminal_fails_navigation_boundary() {
        let mut app = sample_app(120);
        app.update(&Msg::Resize(20, 6));
        draw(&mut app, 20, 6);
        assert!(app.nav_boundary.is_failed());
        assert!(app.hits.recovery_home.is_some());
        assert!(app.hits.triggers.is_empty());
    }
}
