//! Keyboard navigation for the desktop trigger row and its panels.
//!
//! Keys arrive already translated to [`NavKey`] so the layer stays
//! independent of any terminal backend. Focus is either on a trigger or on a
//! link inside the open panel; links are addressed by their position in the
//! panel's column-major order.
//!
//! Focusing a trigger while no panel is open goes through the same intent
//! timers as hovering it: the newly focused trigger arms its open delay and
//! the one losing focus arms its close delay.

use std::time::Instant;

use meganav_types::{LinkActivation, LinkContext, NavItem, NavLink};
use tracing::trace;

use crate::controller::MenuController;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    Up,
    Down,
    Left,
    Right,
    Enter,
    Space,
    Escape,
    Tab,
    BackTab,
    Home,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuFocus {
    Trigger(usize),
    Link { item: usize, position: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    Handled,
    Activated(LinkActivation),
    Ignored,
}

/// Links of `item` in column-major order, paired with their column index.
pub fn panel_links(item: &NavItem) -> impl Iterator<Item = (usize, &NavLink)> {
    item.columns
        .iter()
        .enumerate()
        .flat_map(|(column, col)| col.links.iter().map(move |link| (column, link)))
}

#[derive(Debug, Clone, Default)]
pub struct KeyboardNav {
    focus: Option<MenuFocus>,
}

impl KeyboardNav {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn focus(&self) -> Option<MenuFocus> {
        self.focus
    }

    pub fn set_focus(&mut self, focus: Option<MenuFocus>) {
        self.focus = focus;
    }

    /// Drops link focus when the panel it pointed into is no longer open.
    pub fn sync(&mut self, menu: &MenuController) {
        if let Some(MenuFocus::Link { item, .. }) = self.focus
            && !menu.is_open(item)
        {
            self.focus = Some(MenuFocus::Trigger(item));
        }
    }

    pub fn handle(&mut self, key: NavKey, menu: &mut MenuController, now: Instant) -> KeyOutcome {
        let count = menu.tree().len();
        if count == 0 {
            return KeyOutcome::Ignored;
        }
        self.sync(menu);
        let focus = self.focus.unwrap_or(MenuFocus::Trigger(0));
        trace!(?key, ?focus, "Keyboard navigation");
        match focus {
            MenuFocus::Trigger(index) => self.handle_trigger(key, index.min(count - 1), count, menu, now),
            MenuFocus::Link { item, position } => self.handle_link(key, item, position, menu),
        }
    }

    fn handle_trigger(&mut self, key: NavKey, index: usize, count: usize, menu: &mut MenuController, now: Instant) -> KeyOutcome {
        match key {
            NavKey::Left | NavKey::BackTab => self.move_trigger(menu, index, (index + count - 1) % count, now),
            NavKey::Right | NavKey::Tab => self.move_trigger(menu, index, (index + 1) % count, now),
            NavKey::Home => self.move_trigger(menu, index, 0, now),
            NavKey::End => self.move_trigger(menu, index, count - 1, now),
            NavKey::Enter | NavKey::Space => {
                if !menu.is_open(index) {
                    menu.open(index);
                }
                self.focus = Some(MenuFocus::Trigger(index));
            }
            NavKey::Down => {
                menu.open(index);
                let has_links = menu.tree().item(index).is_some_and(|item| item.link_count() > 0);
                self.focus = Some(if has_links {
                    MenuFocus::Link { item: index, position: 0 }
                } else {
                    MenuFocus::Trigger(index)
                });
            }
            NavKey::Escape => {
                if menu.escape().is_none() {
                    return KeyOutcome::Ignored;
                }
                self.focus = Some(MenuFocus::Trigger(index));
            }
            NavKey::Up => return KeyOutcome::Ignored,
        }
        KeyOutcome::Handled
    }

    /// Arrow keys move between triggers; an already open panel follows focus.
    fn move_trigger(&mut self, menu: &mut MenuController, from: usize, to: usize, now: Instant) {
        if menu.open_index().is_some() {
            menu.open(to);
        } else if from != to {
            menu.schedule_close(from, now);
            menu.schedule_open(to, now);
        }
        self.focus = Some(MenuFocus::Trigger(to));
    }

    fn handle_link(&mut self, key: NavKey, item: usize, position: usize, menu: &mut MenuController) -> KeyOutcome {
        let tree = std::sync::Arc::clone(menu.tree());
        let Some(nav_item) = tree.item(item) else {
            self.focus = None;
            return KeyOutcome::Ignored;
        };
        let links: Vec<(usize, &NavLink)> = panel_links(nav_item).collect();
        if links.is_empty() {
            self.focus = Some(MenuFocus::Trigger(item));
            return KeyOutcome::Handled;
        }
        let last = links.len() - 1;
        let position = position.min(last);
        let column = links[position].0;

        let next_position = match key {
            NavKey::Down | NavKey::Tab => position + 1,
            NavKey::Up | NavKey::BackTab => {
                if position == 0 {
                    self.focus = Some(MenuFocus::Trigger(item));
                    return KeyOutcome::Handled;
                }
                position - 1
            }
            NavKey::Right => links.iter().position(|(c, _)| *c > column).unwrap_or(position),
            NavKey::Left => links
                .iter()
                .position(|(c, _)| column > 0 && *c == column - 1)
                .unwrap_or(position),
            NavKey::Home => 0,
            NavKey::End => last,
            NavKey::Escape => {
                menu.escape();
                self.focus = Some(MenuFocus::Trigger(item));
                return KeyOutcome::Handled;
            }
            NavKey::Enter | NavKey::Space => {
                let link = links[position].1;
                let activation = menu.activate_link(link, LinkContext::Desktop);
                self.focus = Some(MenuFocus::Trigger(item));
                return KeyOutcome::Activated(activation);
            }
        };
        self.focus = Some(MenuFocus::Link {
            item,
            position: next_position.min(last),
        });
        KeyOutcome::Handled
    }
}
