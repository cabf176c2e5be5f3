//! Outside-click and Escape dismissal shared by every dismissible surface.
//!
//! A [`Dismissal`] holds the screen regions that count as "inside" a surface
//! (for a desktop panel: the trigger row and the panel itself). While it is
//! registered, a mouse press outside every region or an Escape key invokes the
//! close callback. Regions are refreshed on each render since terminal layout
//! moves with resizes.

use crossterm::event::{Event, KeyCode, KeyEventKind, MouseEventKind};
use ratatui::layout::{Position, Rect};
use tracing::trace;

/// What triggered a dismissal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DismissCause {
    OutsidePointer,
    Escape,
}

#[derive(Debug, Clone, Default)]
pub struct Dismissal {
    regions: Vec<Rect>,
    active: bool,
}

impl Dismissal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts listening. Calling it again while active changes nothing.
    pub fn register(&mut self) {
        if !self.active {
            trace!("Dismissal registered");
            self.active = true;
        }
    }

    /// Stops listening and forgets the regions. Idempotent.
    pub fn teardown(&mut self) {
        if self.active {
            trace!("Dismissal torn down");
        }
        self.active = false;
        self.regions.clear();
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Replaces the inside regions. Zero-sized rects are ignored.
    pub fn set_regions(&mut self, regions: impl IntoIterator<Item = Rect>) {
        self.regions = regions.into_iter().filter(|rect| !rect.is_empty()).collect();
    }

    pub fn regions(&self) -> &[Rect] {
        &self.regions
    }

    pub fn contains(&self, column: u16, row: u16) -> bool {
        let position = Position::new(column, row);
        self.regions.iter().any(|rect| rect.contains(position))
    }

    /// Classifies `event` without side effects.
    pub fn check(&self, event: &Event) -> Option<DismissCause> {
        if !self.active || self.regions.is_empty() {
            return None;
        }
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release && key.code == KeyCode::Esc => Some(DismissCause::Escape),
            Event::Mouse(mouse) if matches!(mouse.kind, MouseEventKind::Down(_)) && !self.contains(mouse.column, mouse.row) => {
                Some(DismissCause::OutsidePointer)
            }
            _ => None,
        }
    }

    /// Invokes `on_close` when `event` dismisses the surface. Returns whether
    /// it did.
    pub fn handle_event(&self, event: &Event, on_close: impl FnOnce(DismissCause)) -> bool {
        match self.check(event) {
            Some(cause) => {
                on_close(cause);
                true
            }
            None => false,
        }
    }
}
