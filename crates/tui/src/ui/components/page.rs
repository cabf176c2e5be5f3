//! Page body behind the navigation: where the last activation led, plus
//! usage drawn from persisted preferences and the recent interaction log.

use chrono::Local;
use meganav_types::InteractionEvent;
use meganav_util::truncate_to_width;
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::app::App;
use crate::ui::components::component::Component;
use crate::ui::theme::{Theme, theme_helpers as th};

const LIST_LIMIT: usize = 5;
const EVENT_LIMIT: usize = 8;

#[derive(Debug, Default)]
pub struct PageComponent;

fn section<'a>(theme: &dyn Theme, title: &'a str, entries: Vec<String>, empty: &'a str, width: usize) -> Vec<Line<'a>> {
    let mut lines = vec![Line::from(Span::styled(title, th::column_title_style(theme)))];
    if entries.is_empty() {
        lines.push(Line::from(Span::styled(format!("  {empty}"), theme.text_muted_style())));
    }
    lines.extend(
        entries
            .into_iter()
            .map(|entry| Line::from(Span::styled(truncate_to_width(&format!("  {entry}"), width), theme.text_secondary_style()))),
    );
    lines.push(Line::default());
    lines
}

fn describe(event: &InteractionEvent) -> String {
    format!(
        "{} {:<6} {} / {}",
        event.timestamp.with_timezone(&Local).format("%H:%M:%S"),
        event.kind.action(),
        event.category,
        event.label
    )
}

impl Component for PageComponent {
    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        let theme = &*app.ctx.theme;
        let tree = app.tree();
        let location = app.links.location();
        let title = tree
            .links()
            .find(|entry| entry.link.href == location)
            .map_or_else(|| location.to_string(), |entry| entry.link.label.clone());

        let [heading, body] = Layout::vertical([Constraint::Length(3), Constraint::Min(0)]).areas(rect);
        frame.render_widget(
            Paragraph::new(vec![
                Line::from(Span::styled(title, theme.text_primary_style().add_modifier(Modifier::BOLD))),
                Line::from(Span::styled(location.to_string(), theme.text_muted_style())),
            ])
            .style(th::panel_style(theme)),
            heading,
        );

        let [left, right] = Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(body);
        let width = left.width.saturating_sub(1) as usize;
        let usage = app.ctx.preferences.usage();

        let mut lines = section(theme, "Opened in new tab", app.links.tabs().to_vec(), "None yet", width);
        lines.extend(section(
            theme,
            "Recently visited",
            usage.recent_items.iter().take(LIST_LIMIT).map(|item| item.label.clone()).collect(),
            "Nothing visited yet",
            width,
        ));
        let favorites = usage
            .favorites
            .iter()
            .map(|id| {
                tree.links()
                    .find(|entry| crate::app::link_id(entry.link) == *id)
                    .map_or_else(|| id.clone(), |entry| entry.link.label.clone())
            })
            .collect();
        lines.extend(section(theme, "Favourites", favorites, "Press f on a link to favourite it", width));
        frame.render_widget(Paragraph::new(lines), left);

        let analytics = app.menu.analytics();
        let skip = analytics.len().saturating_sub(EVENT_LIMIT);
        let events = analytics.events().skip(skip).map(describe).collect();
        let mut lines = section(theme, "Interactions", events, "No interactions recorded", right.width as usize);
        lines.extend(section(
            theme,
            "Recent searches",
            usage.search_queries.iter().take(LIST_LIMIT).cloned().collect(),
            "No searches yet",
            right.width as usize,
        ));
        frame.render_widget(Paragraph::new(lines), right);
    }
}

#[cfg(test)]
mod tests {
    use meganav_types::{LinkActivation, LinkContext};
    use ratatui::{Terminal, backend::TestBackend};

    use super::*;
    use crate::app::tests::sample_app;

    #[test]
    fn shows_the_label_of_the_current_location() {
        let mut app = sample_app(120);
        app.links.activate(&LinkActivation {
            label: "Duct Sensors".into(),
            href: "/products/duct".into(),
            new_tab: false,
            context: LinkContext::Desktop,
        });
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).expect("terminal");
        terminal
            .draw(|frame| {
                let area = frame.area();
                PageComponent.render(frame, area, &mut app);
            })
            .expect("draw");
        let text: String = terminal.backend().buffer().content().iter().map(|cell| cell.symbol()).collect();
        assert!(text.contains("Duct Sensors"));
        assert!(text.contains("/products/duct"));
        assert!(text.contains("Favourites"));
    }
}
