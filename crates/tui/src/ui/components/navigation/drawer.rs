use meganav_engine::panel_links;
use meganav_util::truncate_to_width;
use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Clear, Paragraph},
};
use tracing::warn;

use super::inline_search;
use super::panel::validate_item;
use super::state::DrawerNode;
use crate::app::App;
use crate::ui::theme::theme_helpers as th;

pub const DRAWER_WIDTH: u16 = 42;

/// Drawer rect for a screen `area`: full height on the left edge.
pub fn drawer_rect(area: Rect, visible_rows: u16) -> Rect {
    Rect::new(area.x, area.y, DRAWER_WIDTH.min(area.width), visible_rows.min(area.height))
}

/// Draws the open drawer and records one hit rect per focusable row.
pub fn render_drawer(frame: &mut Frame, area: Rect, app: &mut App) {
    let rect = drawer_rect(area, app.reveal.visible_rows(area.height));
    frame.render_widget(Clear, rect);
    let block = th::block(&*app.ctx.theme, Some("Menu"), true);
    let inner = block.inner(rect);
    frame.render_widget(block, rect);
    app.hits.drawer = Some(rect);
    app.drawer.dismissal.set_regions([rect]);

    let tree = app.tree();
    let focused = app.drawer.focus.current();
    let width = inner.width as usize;
    let mut lines: Vec<Line> = Vec::new();
    let mut rows: Vec<(usize, DrawerNode)> = Vec::new();

    rows.push((lines.len(), DrawerNode::Close));
    lines.push(Line::from(Span::styled(
        "✕ Close",
        th::link_style(&*app.ctx.theme, focused == Some(DrawerNode::Close)),
    )));

    let mut search_line = None;
    if app.ctx.enable_search {
        search_line = Some(lines.len());
        rows.push((lines.len(), DrawerNode::Search));
        lines.push(Line::default());
        if inline_search::is_showing_results(app) {
            let offset = flush(frame, inner, &lines, &rows, app);
            render_search_input(frame, inner, search_line, offset, app);
            let first = inner.y + lines.len().saturating_sub(offset) as u16;
            let results = Rect::new(inner.x, first, inner.width, inner.bottom().saturating_sub(first));
            inline_search::render_results(frame, results, app);
            return;
        }
    }

    let theme = &*app.ctx.theme;
    let compact = app.ctx.compact;
    for (index, item) in tree.items().iter().enumerate() {
        let expanded = app.drawer.expanded == Some(index);
        let marker = if expanded { "▾" } else { "▸" };
        rows.push((lines.len(), DrawerNode::Section(index)));
        lines.push(Line::from(Span::styled(
            truncate_to_width(&format!("{marker} {}", item.label), width),
            th::trigger_style(theme, expanded, focused == Some(DrawerNode::Section(index))),
        )));
        if !expanded {
            continue;
        }
        if let Err(error) = validate_item(item) {
            warn!(item = %item.label, %error, "Drawer section failed to render");
            lines.push(Line::from(Span::styled(truncate_to_width(&format!("  {error}"), width), theme.status_error())));
            continue;
        }
        let mut current_column = None;
        for (position, (column, link)) in panel_links(item).enumerate() {
            // Compact drawers list links without column titles.
            if current_column != Some(column) && !compact {
                lines.push(Line::from(Span::styled(
                    truncate_to_width(&format!("  {}", item.columns[column].title), width),
                    th::column_title_style(theme),
                )));
            }
            current_column = Some(column);
            let node = DrawerNode::Link { item: index, position };
            rows.push((lines.len(), node));
            lines.push(Line::from(Span::styled(
                truncate_to_width(&format!("    {}", link.label), width),
                th::link_style(theme, focused == Some(node)),
            )));
        }
    }

    let offset = flush(frame, inner, &lines, &rows, app);
    render_search_input(frame, inner, search_line, offset, app);
}

fn render_search_input(frame: &mut Frame, inner: Rect, line: Option<usize>, offset: usize, app: &mut App) {
    if let Some(line) = line
        && line >= offset
        && line - offset < inner.height as usize
    {
        let input = Rect::new(inner.x, inner.y + (line - offset) as u16, inner.width, 1);
        inline_search::render_input(frame, input, app);
    }
}

/// Renders the prepared lines, scrolled so the focused row stays visible.
/// Returns the scroll offset.
fn flush(frame: &mut Frame, inner: Rect, lines: &[Line], rows: &[(usize, DrawerNode)], app: &mut App) -> usize {
    let focused_line = app
        .drawer
        .focus
        .current()
        .and_then(|node| rows.iter().find(|(_, candidate)| *candidate == node))
        .map_or(0, |(line, _)| *line);
    let height = inner.height as usize;
    let offset = focused_line.saturating_sub(height.saturating_sub(1));
    let visible: Vec<Line> = lines.iter().skip(offset).take(height).cloned().collect();
    frame.render_widget(Paragraph::new(visible).style(th::panel_style(&*app.ctx.theme)), inner);
    app.hits.drawer_rows = rows
        .iter()
        .filter(|(line, _)| *line >= offset && *line < offset + height)
        .map(|(line, node)| (Rect::new(inner.x, inner.y + (line - offset) as u16, inner.width, 1), *node))
        .collect();
    offset
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use ratatui::{Terminal, backend::TestBackend};

    use super::*;
    use crate::app::tests::sample_app;

    #[test]
    fn expanded_section_lists_its_links() {
        let mut app = sample_app(60);
        app.menu.open_mobile();
        app.sync_surfaces(Instant::now());
        app.reveal.finish();
        let tree = app.tree();
        app.drawer.toggle_section(0, &tree, true);

        let mut terminal = Terminal::new(TestBackend::new(60, 30)).expect("terminal");
        terminal
            .draw(|frame| {
                let area = frame.area();
                render_drawer(frame, area, &mut app);
            })
            .expect("draw");

        let nodes: Vec<DrawerNode> = app.hits.drawer_rows.iter().map(|(_, node)| *node).collect();
        assert!(nodes.contains(&DrawerNode::Link { item: 0, position: 2 }));
        assert!(nodes.contains(&DrawerNode::Section(1)));
        assert!(app.drawer.dismissal.contains(1, 1));
        assert!(!app.drawer.dismissal.contains(55, 1));
    }

    #[test]
    fn compact_drawer_omits_column_titles() {
        let render = |compact: bool| {
            let mut app = sample_app(60);
            app.ctx.compact = compact;
            app.menu.open_mobile();
            app.sync_surfaces(Instant::now());
            app.reveal.finish();
            let tree = app.tree();
            app.drawer.toggle_section(0, &tree, true);
            let mut terminal = Terminal::new(TestBackend::new(60, 30)).expect("terminal");
            terminal
                .draw(|frame| {
                    let area = frame.area();
                    render_drawer(frame, area, &mut app);
                })
                .expect("draw");
            terminal.backend().buffer().content().iter().map(|cell| cell.symbol()).collect::<String>()
        };
        assert!(render(false).contains("Humidity"));
        let compact = render(true);
        assert!(!compact.contains("Humidity"));
        assert!(compact.contains("Wall Sensors"));
    }
}
