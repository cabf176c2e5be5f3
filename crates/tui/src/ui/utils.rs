use ratatui::layout::{Constraint, Flex, Layout, Rect};

/// Centers a rect of the given percentage size inside `area`.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let [row] = Layout::vertical([Constraint::Percentage(percent_y)]).flex(Flex::Center).areas(area);
    let [rect] = Layout::horizontal([Constraint::Percentage(percent_x)]).flex(Flex::Center).areas(row);
    rect
}

/// Like [`centered_rect`] but capped at `max_width` x `max_height` cells.
pub fn centered_rect_capped(percent_x: u16, percent_y: u16, max_width: u16, max_height: u16, area: Rect) -> Rect {
    let rect = centered_rect(percent_x, percent_y, area);
    let width = rect.width.min(max_width);
    let height = rect.height.min(max_height);
    Rect::new(
        area.x + (area.width.saturating_sub(width)) / 2,
        area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_rect_is_centered() {
        let rect = centered_rect(50, 50, Rect::new(0, 0, 100, 40));
        assert_eq!(rect, Rect::new(25, 10, 50, 20));
    }

    #[test]
    fn capped_rect_respects_maximum() {
        let rect = centered_rect_capped(90, 90, 60, 20, Rect::new(0, 0, 120, 40));
        assert_eq!(rect, Rect::new(30, 10, 60, 20));
    }
}
