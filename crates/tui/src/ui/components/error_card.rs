//! Fallback rendering for failed error boundaries.

use meganav_engine::{BoundaryFailure, RecoveryAction};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Clear, Paragraph, Wrap},
};

use crate::ui::theme::{Theme, theme_helpers as th};

/// Screen positions of the recovery buttons drawn by [`render_error_card`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecoveryButtons {
    pub retry: Option<Rect>,
    pub home: Option<Rect>,
}

const RETRY_LABEL: &str = "[r] Retry";
const HOME_LABEL: &str = "[g] Home";

/// Draws a failure card with its recovery actions. Inline (panel) cards are
/// compact; the navigation-level card fills `rect`.
pub fn render_error_card(frame: &mut Frame, rect: Rect, theme: &dyn Theme, failure: &BoundaryFailure, actions: &[RecoveryAction]) -> RecoveryButtons {
    frame.render_widget(Clear, rect);
    let title = if actions.contains(&RecoveryAction::Home) {
        "Navigation unavailable"
    } else {
        "Menu failed to load"
    };
    let block = th::block(theme, Some(title), false).border_style(theme.status_error());
    let inner = block.inner(rect);
    frame.render_widget(block, rect);

    let [message_area, id_area, button_area] =
        Layout::vertical([Constraint::Min(1), Constraint::Length(1), Constraint::Length(1)]).areas(inner);
    frame.render_widget(
        Paragraph::new(failure.message.as_str())
            .style(theme.text_primary_style())
            .wrap(Wrap { trim: true }),
        message_area,
    );
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(format!("Error id: {}", failure.id), theme.text_muted_style()))),
        id_area,
    );

    let mut buttons = RecoveryButtons::default();
    let mut x = button_area.x;
    let mut spans = Vec::new();
    for action in actions {
        let label = match action {
            RecoveryAction::Retry => RETRY_LABEL,
            RecoveryAction::Home => HOME_LABEL,
        };
        let width = (label.len() as u16).min(button_area.right().saturating_sub(x));
        let button = Rect::new(x, button_area.y, width, button_area.height.min(1));
        match action {
            RecoveryAction::Retry => buttons.retry = Some(button),
            RecoveryAction::Home => buttons.home = Some(button),
        }
        spans.push(Span::styled(label, theme.accent_emphasis_style()));
        spans.push(Span::raw("  "));
        x = x.saturating_add(width + 2);
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), button_area);
    buttons
}
