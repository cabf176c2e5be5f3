//! Screen layout and hit testing.
//!
//! Rendering records where each interactive element landed in a [`HitMap`];
//! mouse handling reads it back on the next event. Rects are only valid for
//! the frame that produced them.

use ratatui::layout::{Constraint, Layout, Position, Rect};

use crate::ui::components::navigation::DrawerNode;

/// Height of the header holding the trigger row.
pub const HEADER_HEIGHT: u16 = 3;

/// Smallest terminal the navigation can render into.
pub const MIN_WIDTH: u16 = 30;
pub const MIN_HEIGHT: u16 = 10;

/// Where the pointer currently is, relative to the desktop hover regions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PointerRegion {
    #[default]
    Outside,
    Trigger(usize),
    Panel(usize),
}

#[derive(Debug, Clone, Default)]
pub struct HitMap {
    pub trigger_row: Rect,
    pub triggers: Vec<Rect>,
    /// Open panel and its item index.
    pub panel: Option<(Rect, usize)>,
    /// Link rects inside the open panel with their column-major position.
    pub panel_links: Vec<(Rect, usize)>,
    pub panel_retry: Option<Rect>,
    pub inline_search: Option<Rect>,
    pub drawer_toggle: Option<Rect>,
    pub drawer: Option<Rect>,
    pub drawer_rows: Vec<(Rect, DrawerNode)>,
    pub search_modal: Option<Rect>,
    pub search_close: Option<Rect>,
    pub search_results: Vec<(Rect, usize)>,
    pub recovery_retry: Option<Rect>,
    pub recovery_home: Option<Rect>,
}

impl HitMap {
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn trigger_at(&self, column: u16, row: u16) -> Option<usize> {
        let position = Position::new(column, row);
        self.triggers.iter().position(|rect| rect.contains(position))
    }

    pub fn region_at(&self, column: u16, row: u16) -> PointerRegion {
        if let Some(index) = self.trigger_at(column, row) {
            return PointerRegion::Trigger(index);
        }
        match self.panel {
            Some((rect, index)) if rect.contains(Position::new(column, row)) => PointerRegion::Panel(index),
            _ => PointerRegion::Outside,
        }
    }

    pub fn panel_link_at(&self, column: u16, row: u16) -> Option<usize> {
        find(&self.panel_links, column, row)
    }

    pub fn drawer_row_at(&self, column: u16, row: u16) -> Option<DrawerNode> {
        find(&self.drawer_rows, column, row)
    }

    pub fn search_result_at(&self, column: u16, row: u16) -> Option<usize> {
        find(&self.search_results, column, row)
    }
}

fn find<T: Copy>(entries: &[(Rect, T)], column: u16, row: u16) -> Option<T> {
    let position = Position::new(column, row);
    entries.iter().find(|(rect, _)| rect.contains(position)).map(|(_, value)| *value)
}

pub fn contains(rect: Option<Rect>, column: u16, row: u16) -> bool {
    rect.is_some_and(|rect| rect.contains(Position::new(column, row)))
}

/// Splits the screen into header, body and hint bar.
pub fn main_areas(area: Rect) -> [Rect; 3] {
    Layout::vertical([Constraint::Length(HEADER_HEIGHT), Constraint::Min(1), Constraint::Length(1)]).areas(area)
}

/// Places a panel of `width` under the trigger starting at `anchor_x`,
/// flipping left when it would overflow the right edge.
pub fn panel_rect(body: Rect, anchor_x: u16, width: u16, height: u16) -> Rect {
    let width = width.min(body.width);
    let height = height.min(body.height);
    let right_edge = body.x + body.width;
    let x = if anchor_x + width > right_edge {
        right_edge.saturating_sub(width)
    } else {
        anchor_x.max(body.x)
    };
    Rect::new(x, body.y, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panel_flips_at_the_right_edge() {
        let body = Rect::new(0, 3, 80, 20);
        assert_eq!(panel_rect(body, 10, 40, 8), Rect::new(10, 3, 40, 8));
        assert_eq!(panel_rect(body, 60, 40, 8), Rect::new(40, 3, 40, 8));
        assert_eq!(panel_rect(body, 0, 120, 40), Rect::new(0, 3, 80, 20));
    }

    #[test]
    fn regions_prefer_triggers_over_panel() {
        let hits = HitMap {
            triggers: vec![Rect::new(0, 1, 10, 1), Rect::new(12, 1, 10, 1)],
            panel: Some((Rect::new(0, 3, 40, 10), 1)),
            ..HitMap::default()
        };
        assert_eq!(hits.region_at(13, 1), PointerRegion::Trigger(1));
        assert_eq!(hits.region_at(5, 5), PointerRegion::Panel(1));
        assert_eq!(hits.region_at(50, 5), PointerRegion::Outside);
    }
}
