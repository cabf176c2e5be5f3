//! Desktop mega-menu panel: link columns plus the optional promo block.
//!
//! Rendering can fail (a link whose destination cannot be resolved, a panel
//! squeezed below its minimum width). Failures are returned as
//! [`PanelError`] so the caller can isolate them in the panel's own error
//! boundary.

use meganav_engine::{MenuFocus, panel_links};
use meganav_types::{NavColumn, NavDataError, NavItem};
use meganav_util::truncate_to_width;
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};
use thiserror::Error;

use super::inline_search;
use crate::app::App;
use crate::ui::theme::{Theme, theme_helpers as th};

pub const COLUMN_WIDTH: u16 = 24;
pub const HIGHLIGHT_WIDTH: u16 = 30;
pub const MIN_PANEL_WIDTH: u16 = 20;
const HIGHLIGHT_HEIGHT: u16 = 6;

#[derive(Debug, Error)]
pub enum PanelError {
    #[error("link \"{label}\" in \"{item}\" has an unusable destination: {source}")]
    InvalidLink {
        item: String,
        label: String,
        #[source]
        source: NavDataError,
    },
    #[error("panel needs at least {needed} columns but only {available} are available")]
    TooNarrow { needed: u16, available: u16 },
}

/// Checks every destination the panel would render.
pub fn validate_item(item: &NavItem) -> Result<(), PanelError> {
    let featured = item.columns.iter().filter_map(|column| column.featured.as_ref());
    for link in item.columns.iter().flat_map(|column| column.links.iter()).chain(featured) {
        link.destination().map_err(|source| PanelError::InvalidLink {
            item: item.label.clone(),
            label: link.label.clone(),
            source,
        })?;
    }
    Ok(())
}

fn column_height(column: &NavColumn, compact: bool) -> u16 {
    let description = u16::from(column.description.is_some() && !compact);
    let featured = u16::from(column.featured.is_some());
    1 + description + column.links.len() as u16 + featured
}

/// Outer size of the panel for `item`, borders included. Compact panels
/// have no description lines.
pub fn panel_size(item: &NavItem, with_search: bool, compact: bool) -> (u16, u16) {
    let columns = item.columns.len().max(1) as u16;
    let highlight = if item.highlight.is_some() { HIGHLIGHT_WIDTH } else { 0 };
    let width = columns * COLUMN_WIDTH + highlight + 2;
    let content = item.columns.iter().map(|column| column_height(column, compact)).max().unwrap_or(1);
    let content = if item.highlight.is_some() { content.max(HIGHLIGHT_HEIGHT) } else { content };
    let search = if with_search { 2 } else { 0 };
    // Footer line for the focused link's description.
    let footer = u16::from(!compact);
    (width, content + search + footer + 2)
}

pub fn render_panel(frame: &mut Frame, area: Rect, app: &mut App, index: usize) -> Result<(), PanelError> {
    let tree = app.tree();
    let Some(item) = tree.item(index) else {
        return Ok(());
    };
    validate_item(item)?;

    let block = th::block(&*app.ctx.theme, Some(&item.label), true);
    let inner = block.inner(area);
    if inner.width < MIN_PANEL_WIDTH {
        return Err(PanelError::TooNarrow {
            needed: MIN_PANEL_WIDTH,
            available: inner.width,
        });
    }
    frame.render_widget(block, area);

    let mut content = inner;
    if app.ctx.enable_search && content.height >= 2 {
        let [input, _gap, rest] = Layout::vertical([Constraint::Length(1), Constraint::Length(1), Constraint::Min(0)]).areas(content);
        inline_search::render_input(frame, input, app);
        content = rest;
        if inline_search::is_showing_results(app) {
            inline_search::render_results(frame, content, app);
            return Ok(());
        }
    }

    let focused = match app.keyboard.focus() {
        Some(MenuFocus::Link { item, position }) if item == index => Some(position),
        _ => None,
    };
    let compact = app.ctx.compact;
    let footer_height = u16::from(!compact);
    let [columns_area, footer] = Layout::vertical([Constraint::Min(0), Constraint::Length(footer_height)]).areas(content);
    let highlight_width = if item.highlight.is_some() { HIGHLIGHT_WIDTH } else { 0 };
    let [links_area, highlight_area] =
        Layout::horizontal([Constraint::Min(0), Constraint::Length(highlight_width)]).areas(columns_area);

    let column_count = item.columns.len().max(1) as u32;
    let column_areas = Layout::horizontal((0..column_count).map(|_| Constraint::Ratio(1, column_count))).split(links_area);

    let theme = &*app.ctx.theme;
    let mut position = 0;
    let mut hits = Vec::new();
    for (column, column_area) in item.columns.iter().zip(column_areas.iter()) {
        let width = column_area.width.saturating_sub(1) as usize;
        let mut lines = vec![Line::from(Span::styled(
            truncate_to_width(&column.title, width),
            th::column_title_style(theme),
        ))];
        if let Some(description) = column.description.as_ref().filter(|_| !compact) {
            lines.push(Line::from(Span::styled(truncate_to_width(description, width), theme.text_muted_style())));
        }
        for link in &column.links {
            let row = column_area.y + lines.len() as u16;
            lines.push(link_line(theme, &link.label, link.badge.as_deref(), link.opens_new_tab(), focused == Some(position), width));
            if row < column_area.bottom() {
                hits.push((Rect::new(column_area.x, row, column_area.width, 1), position));
            }
            position += 1;
        }
        if let Some(featured) = &column.featured {
            lines.push(Line::from(Span::styled(
                truncate_to_width(&format!("★ {}", featured.label), width),
                theme.accent_emphasis_style(),
            )));
        }
        frame.render_widget(Paragraph::new(lines), *column_area);
    }

    if let Some(highlight) = &item.highlight {
        let mut lines = vec![Line::from(Span::styled(
            highlight.title.as_str(),
            theme.accent_emphasis_style().add_modifier(Modifier::BOLD),
        ))];
        if let Some(badge) = &highlight.badge {
            lines.push(Line::from(Span::styled(format!(" {badge} "), th::badge_style(theme))));
        }
        lines.push(Line::from(Span::styled(highlight.description.as_str(), theme.text_secondary_style())));
        lines.push(Line::from(Span::styled(format!("{} →", highlight.cta), theme.accent_primary_style())));
        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), highlight_area);
    }

    let description = focused
        .and_then(|position| panel_links(item).nth(position))
        .and_then(|(_, link)| link.description.as_deref())
        .unwrap_or_default();
    frame.render_widget(
        Paragraph::new(truncate_to_width(description, footer.width as usize)).style(theme.text_muted_style()),
        footer,
    );

    app.hits.panel_links = hits;
    Ok(())
}

fn link_line(theme: &dyn Theme, label: &str, badge: Option<&str>, new_tab: bool, focused: bool, width: usize) -> Line<'static> {
    let suffix_width = badge.map_or(0, |badge| badge.chars().count() + 3) + if new_tab { 2 } else { 0 };
    let mut spans = vec![Span::styled(
        truncate_to_width(label, width.saturating_sub(suffix_width)),
        th::link_style(theme, focused),
    )];
    if new_tab {
        spans.push(Span::styled(" ↗", theme.text_muted_style()));
    }
    if let Some(badge) = badge {
        spans.push(Span::raw(" "));
        spans.push(Span::styled(format!(" {badge} "), th::badge_style(theme)));
    }
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use meganav_types::{NavHighlight, NavLink, NavigationConfig, NavigationTree};
    use meganav_util::{MenuBehavior, UserPreferences};
    use ratatui::{Terminal, backend::TestBackend};

    use super::*;
    use crate::app::SharedCtx;
    use crate::app::tests::sample_app;
    use crate::ui::theme::DarkTheme;

    #[test]
    fn invalid_destination_is_reported_not_panicked() {
        let item = NavItem::new("Broken", vec![NavColumn::new("Links", vec![NavLink::new("Bad", "not a url")])]);
        let error = validate_item(&item).err();
        assert!(matches!(error, Some(PanelError::InvalidLink { ref label, .. }) if label == "Bad"));
    }

    #[test]
    fn size_accounts_for_highlight_and_search() {
        let item = NavItem::new("Products", vec![NavColumn::new("A", vec![NavLink::new("x", "/x")])]).with_highlight(NavHighlight {
            title: "New".into(),
            description: "Fresh".into(),
            cta: "Read".into(),
            href: "/new".into(),
            image: None,
            badge: None,
        });
        assert_eq!(panel_size(&item, true, false), (COLUMN_WIDTH + HIGHLIGHT_WIDTH + 2, HIGHLIGHT_HEIGHT + 2 + 1 + 2));
        assert_eq!(panel_size(&item, true, true), (COLUMN_WIDTH + HIGHLIGHT_WIDTH + 2, HIGHLIGHT_HEIGHT + 2 + 2));
    }

    #[test]
    fn compact_mode_hides_descriptions() {
        let render = |compact: bool| {
            let mut column = NavColumn::new("Temperature", vec![NavLink::new("Room Sensors", "/products/room")]);
            column.description = Some("Accurate space temperature".into());
            let config = NavigationConfig::new(NavigationTree::new(vec![NavItem::new("Products", vec![column])]));
            let ctx = SharedCtx {
                theme: Box::new(DarkTheme::new()),
                preferences: Arc::new(UserPreferences::ephemeral()),
                reduced_motion: false,
                enable_search: false,
                compact,
                mobile_breakpoint: 100,
            };
            let mut app = App::new(config, ctx, MenuBehavior::Hover, (120, 40));
            app.menu.open(0);
            let mut terminal = Terminal::new(TestBackend::new(120, 20)).expect("terminal");
            terminal
                .draw(|frame| {
                    let _ = render_panel(frame, Rect::new(0, 3, 90, 14), &mut app, 0);
                })
                .expect("draw");
            terminal.backend().buffer().content().iter().map(|cell| cell.symbol()).collect::<String>()
        };
        assert!(render(false).contains("Accurate space temperature"));
        let compact = render(true);
        assert!(!compact.contains("Accurate space temperature"));
        assert!(compact.contains("Room Sensors"));
    }

    #[test]
    fn renders_links_and_records_hits_in_column_major_order() {
        let mut app = sample_app(120);
        app.menu.open(0);
        let backend = TestBackend::new(120, 20);
        let mut terminal = Terminal::new(backend).expect("terminal");
        let mut outcome = Ok(());
        terminal
            .draw(|frame| outcome = render_panel(frame, Rect::new(0, 3, 60, 10), &mut app, 0))
            .expect("draw");
        assert!(outcome.is_ok());
        let positions: Vec<usize> = app.hits.panel_links.iter().map(|(_, position)| *position).collect();
        assert_eq!(positions, vec![0, 1, 2]);
        let buffer = terminal.backend().buffer().clone();
        let text: String = buffer.content().iter().map(|cell| cell.symbol()).collect();
        assert!(text.contains("Room Sensors"));
        assert!(text.contains("Humidity"));
    }

    #[test]
    fn narrow_area_fails() {
        let mut app = sample_app(120);
        let backend = TestBackend::new(40, 20);
        let mut terminal = Terminal::new(backend).expect("terminal");
        let mut outcome = Ok(());
        terminal
            .draw(|frame| outcome = render_panel(frame, Rect::new(0, 0, 12, 10), &mut app, 0))
            .expect("draw");
        assert!(matches!(outcome, Err(PanelError::TooNarrow { .. })));
    }
}
