//! The menu open-state controller.
//!
//! One controller owns the interaction state of a navigation instance: which
//! desktop panel is open (at most one), whether the mobile drawer is open,
//! the per-trigger hover intents and the inline search. Desktop panels and
//! the drawer are mutually exclusive, so the state is a single enum and every
//! transition is atomic. All mutation goes through the methods here; the
//! terminal front-end only feeds input and reads state back.

use std::sync::Arc;
use std::time::Instant;

use meganav_types::{
    CloseReason, EventKind, InteractionEvent, LinkActivation, LinkContext, NavLink, NavigationTree, Surface,
};
use meganav_util::MenuBehavior;
use tracing::{debug, warn};

use crate::analytics::Analytics;
use crate::intent::{HoverIntent, IntentConfig, IntentFire};
use crate::search::{DebouncedSearch, SearchConfig};
use crate::timer::earliest;

const MOBILE_LABEL: &str = "Mobile menu";
const DEFAULT_CATEGORY: &str = "navigation";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MenuState {
    #[default]
    Closed,
    Open(usize),
    MobileOpen,
}

impl MenuState {
    fn surface(self) -> Option<Surface> {
        match self {
            Self::Closed => None,
            Self::Open(_) => Some(Surface::DesktopPanel),
            Self::MobileOpen => Some(Surface::MobileDrawer),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerOptions {
    pub intent: IntentConfig,
    pub behavior: MenuBehavior,
    pub search: SearchConfig,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            intent: IntentConfig::default(),
            behavior: MenuBehavior::Hover,
            search: SearchConfig::COMPACT,
        }
    }
}

#[derive(Debug)]
pub struct MenuController {
    tree: Arc<NavigationTree>,
    state: MenuState,
    intents: Vec<HoverIntent>,
    options: ControllerOptions,
    hovered: Option<usize>,
    search: DebouncedSearch,
    analytics: Analytics,
}

impl MenuController {
    pub fn new(tree: Arc<NavigationTree>, options: ControllerOptions, analytics: Analytics) -> Self {
        let intents = vec![HoverIntent::new(); tree.len()];
        Self {
            tree,
            state: MenuState::Closed,
            intents,
            options,
            hovered: None,
            search: DebouncedSearch::new(options.search),
            analytics,
        }
    }

    pub fn tree(&self) -> &Arc<NavigationTree> {
        &self.tree
    }

    pub fn state(&self) -> MenuState {
        self.state
    }

    pub fn open_index(&self) -> Option<usize> {
        match self.state {
            MenuState::Open(index) => Some(index),
            _ => None,
        }
    }

    pub fn is_open(&self, index: usize) -> bool {
        self.state == MenuState::Open(index)
    }

    pub fn is_mobile_open(&self) -> bool {
        self.state == MenuState::MobileOpen
    }

    pub fn behavior(&self) -> MenuBehavior {
        self.options.behavior
    }

    /// Switching to click behavior drops every pending hover timer.
    pub fn set_behavior(&mut self, behavior: MenuBehavior) {
        self.options.behavior = behavior;
        if behavior == MenuBehavior::Click {
            self.cancel_intents();
        }
    }

    pub fn analytics(&self) -> &Analytics {
        &self.analytics
    }

    pub fn analytics_mut(&mut self) -> &mut Analytics {
        &mut self.analytics
    }

    pub fn search(&self) -> &DebouncedSearch {
        &self.search
    }

    pub fn search_mut(&mut self) -> &mut DebouncedSearch {
        &mut self.search
    }

    /// Opens panel `index`, closing whatever else is open.
    pub fn open(&mut self, index: usize) {
        if !self.check_index(index, "open") {
            return;
        }
        for (other, intent) in self.intents.iter_mut().enumerate() {
            if other != index {
                intent.cancel_all();
            }
        }
        self.intents[index].cancel_all();
        self.transition(MenuState::Open(index), CloseReason::Superseded);
    }

    pub fn close(&mut self) {
        self.close_with(CloseReason::Explicit);
    }

    pub fn toggle(&mut self, index: usize) {
        if self.is_open(index) {
            self.cancel_intents();
            self.transition(MenuState::Closed, CloseReason::Toggle);
        } else {
            self.open(index);
        }
    }

    /// Opens the drawer; any open desktop panel closes first.
    pub fn open_mobile(&mut self) {
        self.cancel_intents();
        self.transition(MenuState::MobileOpen, CloseReason::Superseded);
    }

    pub fn close_mobile(&mut self) {
        if self.is_mobile_open() {
            self.transition(MenuState::Closed, CloseReason::Explicit);
        }
    }

    pub fn toggle_mobile(&mut self) {
        if self.is_mobile_open() {
            self.transition(MenuState::Closed, CloseReason::Toggle);
        } else {
            self.open_mobile();
        }
    }

    /// Closes any open surface. Returns the state that was closed, or `None`
    /// when nothing was open.
    pub fn escape(&mut self) -> Option<MenuState> {
        self.close_with(CloseReason::Escape)
    }

    pub fn outside_click(&mut self) -> Option<MenuState> {
        self.close_with(CloseReason::OutsideClick)
    }

    fn close_with(&mut self, reason: CloseReason) -> Option<MenuState> {
        let previous = self.state;
        if previous == MenuState::Closed {
            return None;
        }
        self.cancel_intents();
        self.transition(MenuState::Closed, reason);
        Some(previous)
    }

    /// Arms the open timer for `index`. Ignored in click mode.
    pub fn schedule_open(&mut self, index: usize, now: Instant) {
        if self.options.behavior == MenuBehavior::Click || !self.check_index(index, "schedule_open") {
            return;
        }
        let config = self.options.intent;
        self.intents[index].schedule_open(now, &config);
    }

    /// Arms the close timer for `index`. Ignored in click mode.
    pub fn schedule_close(&mut self, index: usize, now: Instant) {
        if self.options.behavior == MenuBehavior::Click || !self.check_index(index, "schedule_close") {
            return;
        }
        let config = self.options.intent;
        self.intents[index].schedule_close(now, &config);
    }

    pub fn cancel_close(&mut self, index: usize) {
        if let Some(intent) = self.intents.get_mut(index) {
            intent.cancel_close();
        }
    }

    /// Pointer entered trigger `index`. Emits one hover event per entry.
    pub fn pointer_enter(&mut self, index: usize, now: Instant) {
        if !self.check_index(index, "pointer_enter") {
            return;
        }
        if self.hovered != Some(index) {
            self.hovered = Some(index);
            let item = &self.tree.items()[index];
            let event = InteractionEvent::new(item.tracking_category.clone(), item.label.clone(), EventKind::Hover { index });
            self.analytics.track(event);
        }
        if self.is_open(index) {
            self.cancel_close(index);
        } else {
            self.schedule_open(index, now);
        }
    }

    /// Pointer left trigger `index` (or its panel).
    pub fn pointer_leave(&mut self, index: usize, now: Instant) {
        if self.hovered == Some(index) {
            self.hovered = None;
        }
        self.schedule_close(index, now);
    }

    /// Pointer moved into the open panel of `index`; the panel and trigger
    /// share one hover region.
    pub fn panel_enter(&mut self, index: usize) {
        self.cancel_close(index);
    }

    /// Fires due hover timers and the inline search. Returns whether anything
    /// observable changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let mut changed = false;
        for index in 0..self.intents.len() {
            match self.intents[index].poll(now) {
                Some(IntentFire::Open) => {
                    debug!(index, "Hover intent opened panel");
                    self.open(index);
                    changed = true;
                }
                Some(IntentFire::Close) if self.is_open(index) => {
                    debug!(index, "Hover intent closed panel");
                    self.transition(MenuState::Closed, CloseReason::HoverIntent);
                    changed = true;
                }
                _ => {}
            }
        }
        if let Some(result_count) = self.search.poll(&self.tree, now) {
            let query = self.search.query().trim().to_string();
            self.analytics.track(InteractionEvent::new(
                DEFAULT_CATEGORY,
                query.clone(),
                EventKind::Search { query, result_count },
            ));
            changed = true;
        }
        changed
    }

    /// Earliest pending timer deadline across hover intents and search.
    pub fn next_deadline(&self) -> Option<Instant> {
        earliest(
            self.intents
                .iter()
                .map(HoverIntent::next_deadline)
                .chain(std::iter::once(self.search.next_deadline())),
        )
    }

    /// Reports a link activation and closes the surface it came from.
    pub fn activate_link(&mut self, link: &NavLink, context: LinkContext) -> LinkActivation {
        let category = self
            .tree
            .links()
            .find(|entry| entry.link == link)
            .map(|entry| entry.item.tracking_category.clone())
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string());
        let activation = LinkActivation {
            label: link.label.clone(),
            href: link.href.clone(),
            new_tab: link.opens_new_tab(),
            context,
        };

        let closes = match (context, self.state) {
            (LinkContext::Desktop, MenuState::Open(_)) | (LinkContext::Mobile, MenuState::MobileOpen) => true,
            (LinkContext::Search, state) => state != MenuState::Closed,
            _ => false,
        };
        if closes {
            self.cancel_intents();
            self.transition(MenuState::Closed, CloseReason::LinkActivated);
        }

        self.analytics.track(InteractionEvent::new(
            category,
            link.label.clone(),
            EventKind::Click {
                href: link.href.clone(),
                context,
                external: link.is_external,
                tracking_id: link.tracking_id.clone(),
            },
        ));
        activation
    }

    /// Cancels every pending timer. Nothing fires after teardown.
    pub fn teardown(&mut self) {
        self.cancel_intents();
        self.search.teardown();
        self.hovered = None;
    }

    fn cancel_intents(&mut self) {
        self.intents.iter_mut().for_each(HoverIntent::cancel_all);
    }

    fn check_index(&self, index: usize, operation: &'static str) -> bool {
        if index < self.tree.len() {
            return true;
        }
        warn!(index, items = self.tree.len(), operation, "Ignoring menu index out of range");
        false
    }

    /// Applies `next`, then reports the close of the previous surface and the
    /// open of the new one. State is updated before any event is dispatched.
    fn transition(&mut self, next: MenuState, reason: CloseReason) {
        let previous = self.state;
        if previous == next {
            return;
        }
        self.state = next;
        debug!(?previous, ?next, ?reason, "Menu state transition");

        if previous.surface() != next.surface() || matches!(previous, MenuState::Open(_)) {
            self.search.reset();
        }

        if let Some(surface) = previous.surface() {
            let (category, label) = self.describe(previous);
            self.analytics
                .track(InteractionEvent::new(category, label, EventKind::Close { surface, reason }));
        }
        if let Some(surface) = next.surface() {
            let (category, label) = self.describe(next);
            self.analytics.track(InteractionEvent::new(category, label, EventKind::Open { surface }));
        }
    }

    fn describe(&self, state: MenuState) -> (String, String) {
        match state {
            MenuState::Open(index) => self
                .tree
                .item(index)
                .map(|item| (item.tracking_category.clone(), item.label.clone()))
                .unwrap_or_else(|| (DEFAULT_CATEGORY.to_string(), format!("item {index}"))),
            _ => (DEFAULT_CATEGORY.to_string(), MOBILE_LABEL.to_string()),
        }
    }
}
