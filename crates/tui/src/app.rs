//! Application state for the navigation TUI.
//!
//! [`App`] owns the single [`MenuController`] of this navigation instance and
//! the terminal-side state around it: dismissal regions, the drawer focus
//! trap, the search view, error boundaries and the reveal animation.
//! Components mutate it through event handlers and the runtime polls its
//! timers on each tick.

use std::sync::Arc;
use std::time::Instant;

use meganav_engine::{
    Analytics, BoundaryLevel, ControllerOptions, ErrorBoundary, KeyboardNav, MenuController, MenuState, RecentSearches, earliest,
};
use meganav_types::{CloseReason, EventKind, InteractionEvent, Modal, Msg, NavLink, NavigationConfig, NavigationTree, Surface, Effect};
use meganav_util::{MenuBehavior, UserPreferences};
use tracing::debug;

use crate::links::LinkNavigator;
use crate::ui::animation::Reveal;
use crate::ui::components::navigation::DrawerState;
use crate::ui::components::search::{SUGGESTION_LIMIT, SearchViewState};
use crate::ui::dismiss::Dismissal;
use crate::ui::layout::{HitMap, PointerRegion};
use crate::ui::theme::Theme;

const SEARCH_VIEW_LABEL: &str = "Search";
const SEARCH_CATEGORY: &str = "search";

/// Cross-cutting shared context owned by the App.
pub struct SharedCtx {
    pub theme: Box<dyn Theme>,
    pub preferences: Arc<UserPreferences>,
    pub reduced_motion: bool,
    pub enable_search: bool,
    /// Drops column descriptions and the link description footer.
    pub compact: bool,
    /// Terminal width below which the drawer layout is used.
    pub mobile_breakpoint: u16,
}

impl std::fmt::Debug for SharedCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedCtx")
            .field("is_light", &self.theme.is_light())
            .field("reduced_motion", &self.reduced_motion)
            .field("enable_search", &self.enable_search)
            .field("compact", &self.compact)
            .field("mobile_breakpoint", &self.mobile_breakpoint)
            .finish_non_exhaustive()
    }
}

/// Stable identifier used for usage tracking and favourites.
pub fn link_id(link: &NavLink) -> String {
    link.tracking_id.clone().unwrap_or_else(|| link.href.clone())
}

#[derive(Debug)]
pub struct App {
    pub ctx: SharedCtx,
    pub menu: MenuController,
    pub keyboard: KeyboardNav,
    pub links: LinkNavigator,
    pub hits: HitMap,
    pub pointer: PointerRegion,
    pub panel_dismissal: Dismissal,
    pub drawer: DrawerState,
    /// Compact search inside the open panel or drawer has keyboard focus.
    pub inline_search_focused: bool,
    pub search_view: SearchViewState,
    pub nav_boundary: ErrorBoundary,
    pub panel_boundaries: Vec<ErrorBoundary>,
    pub reveal: Reveal,
    pub open_modal: Option<Modal>,
    pub size: (u16, u16),
    observed: MenuState,
    dirty: bool,
}

impl App {
    pub fn new(config: NavigationConfig, ctx: SharedCtx, behavior: MenuBehavior, size: (u16, u16)) -> Self {
        let tree = Arc::new(config.items);
        let options = ControllerOptions {
            behavior,
            ..ControllerOptions::default()
        };
        let menu = MenuController::new(Arc::clone(&tree), options, Analytics::new(config.enable_analytics));
        let recent = RecentSearches::from_entries(ctx.preferences.usage().search_queries);
        let panel_boundaries = (0..tree.len()).map(|_| ErrorBoundary::new(BoundaryLevel::Menu)).collect();
        let reveal = Reveal::new(ctx.reduced_motion);
        Self {
            ctx,
            menu,
            keyboard: KeyboardNav::new(),
            links: LinkNavigator::new(),
            hits: HitMap::default(),
            pointer: PointerRegion::Outside,
            panel_dismissal: Dismissal::new(),
            drawer: DrawerState::new(),
            inline_search_focused: false,
            search_view: SearchViewState::new(recent),
            nav_boundary: ErrorBoundary::new(BoundaryLevel::Navigation),
            panel_boundaries,
            reveal,
            open_modal: None,
            size,
            observed: MenuState::Closed,
            dirty: true,
        }
    }

    pub fn tree(&self) -> Arc<NavigationTree> {
        Arc::clone(self.menu.tree())
    }

    pub fn is_mobile(&self) -> bool {
        self.size.0 < self.ctx.mobile_breakpoint
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn update(&mut self, msg: &Msg) -> Vec<Effect> {
        match msg {
            Msg::Tick => self.tick(Instant::now()),
            Msg::Resize(width, height) => self.resize(*width, *height),
        }
        Vec::new()
    }

    /// Fires every timer that is due at `now`.
    pub fn tick(&mut self, now: Instant) {
        let mut changed = self.menu.tick(now);
        let tree = self.tree();
        if let Some(result_count) = self.search_view.poll(&tree, now) {
            let query = self.search_view.engine.query().trim().to_string();
            self.menu.analytics_mut().track(InteractionEvent::new(
                SEARCH_CATEGORY,
                query.clone(),
                EventKind::Search { query, result_count },
            ));
            changed = true;
        }
        changed |= self.reveal.poll(now);
        changed |= self.nav_boundary.poll(now);
        for boundary in &mut self.panel_boundaries {
            changed |= boundary.poll(now);
        }
        if changed {
            self.dirty = true;
        }
        self.sync_surfaces(now);
    }

    /// Crossing the mobile breakpoint closes the surface of the old layout.
    pub fn resize(&mut self, width: u16, height: u16) {
        let was_mobile = self.is_mobile();
        self.size = (width, height);
        if was_mobile != self.is_mobile() {
            debug!(width, mobile = self.is_mobile(), "Layout switched");
            match self.menu.state() {
                MenuState::Open(_) if self.is_mobile() => self.menu.close(),
                MenuState::MobileOpen if !self.is_mobile() => self.menu.close_mobile(),
                _ => {}
            }
            self.pointer = PointerRegion::Outside;
        }
        self.sync_surfaces(Instant::now());
        self.dirty = true;
    }

    /// Mirrors controller transitions onto the terminal-side surfaces:
    /// dismissal registration, the drawer focus trap and the reveal.
    pub fn sync_surfaces(&mut self, now: Instant) {
        let state = self.menu.state();
        if state == self.observed {
            return;
        }
        let previous = std::mem::replace(&mut self.observed, state);
        match previous {
            MenuState::Open(_) => self.panel_dismissal.teardown(),
            MenuState::MobileOpen => self.drawer.close(),
            MenuState::Closed => {}
        }
        match state {
            MenuState::Open(_) => {
                self.panel_dismissal.register();
                self.reveal.start(now);
            }
            MenuState::MobileOpen => {
                let tree = self.tree();
                self.drawer.open(&tree, self.ctx.enable_search);
                self.reveal.start(now);
            }
            MenuState::Closed => self.reveal.finish(),
        }
        self.inline_search_focused = false;
        self.keyboard.sync(&self.menu);
        self.dirty = true;
    }

    /// Earliest pending deadline across every timer the app owns.
    pub fn next_deadline(&self) -> Option<Instant> {
        earliest(
            [
                self.menu.next_deadline(),
                self.search_view.engine.next_deadline(),
                self.reveal.next_deadline(),
                self.nav_boundary.next_deadline(),
            ]
            .into_iter()
            .chain(self.panel_boundaries.iter().map(ErrorBoundary::next_deadline)),
        )
    }

    pub fn open_search_view(&mut self) {
        let tree = self.tree();
        let suggestions = self
            .ctx
            .preferences
            .popular_items(SUGGESTION_LIMIT)
            .into_iter()
            .filter_map(|(id, _)| tree.links().find(|entry| link_id(entry.link) == id).map(|entry| entry.link.label.clone()))
            .collect();
        self.search_view.open(suggestions);
        self.open_modal = Some(Modal::Search);
        self.menu.analytics_mut().track(InteractionEvent::new(
            SEARCH_CATEGORY,
            SEARCH_VIEW_LABEL,
            EventKind::Open {
                surface: Surface::SearchView,
            },
        ));
        self.dirty = true;
    }

    pub fn close_search_view(&mut self, reason: CloseReason) {
        self.search_view.close();
        if self.open_modal == Some(Modal::Search) {
            self.open_modal = None;
            self.menu.analytics_mut().track(InteractionEvent::new(
                SEARCH_CATEGORY,
                SEARCH_VIEW_LABEL,
                EventKind::Close {
                    surface: Surface::SearchView,
                    reason,
                },
            ));
        }
        self.dirty = true;
    }

    /// Cancels every timer and listener. Nothing fires afterwards.
    pub fn teardown(&mut self) {
        self.menu.teardown();
        self.search_view.close();
        self.panel_dismissal.teardown();
        self.drawer.dismissal.teardown();
        self.reveal.finish();
        self.nav_boundary.teardown();
        self.panel_boundaries.iter_mut().for_each(ErrorBoundary::teardown);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::time::Duration;

    use meganav_types::{NavColumn, NavItem};

    use super::*;
    use crate::ui::theme::DarkTheme;

    pub(crate) fn sample_config() -> NavigationConfig {
        let mut config = NavigationConfig::new(NavigationTree::new(vec![
            NavItem::new(
                "Products",
                vec![
                    NavColumn::new(
                        "Temperature",
                        vec![NavLink::new("Room Sensors", "/products/room"), NavLink::new("Duct Sensors", "/products/duct")],
                    ),
                    NavColumn::new("Humidity", vec![NavLink::new("Wall Sensors", "/products/wall")]),
                ],
            ),
            NavItem::new(
                "Resources",
                vec![NavColumn::new("Media", vec![NavLink::new("Blog", "https://blog.example.com").external()])],
            )
            .with_order(1),
        ]));
        config.enable_search = true;
        config
    }

    pub(crate) fn sample_app(width: u16) -> App {
        let ctx = SharedCtx {
            theme: Box::new(DarkTheme::new()),
            preferences: Arc::new(UserPreferences::ephemeral()),
            reduced_motion: false,
            enable_search: true,
            compact: false,
            mobile_breakpoint: 100,
        };
        App::new(sample_config(), ctx, MenuBehavior::Hover, (width, 40))
    }

    #[test]
    fn opening_a_panel_registers_its_dismissal_and_reveal() {
        let mut app = sample_app(120);
        let now = Instant::now();
        app.menu.open(0);
        app.sync_surfaces(now);
        assert!(app.panel_dismissal.is_active());
        assert!(app.reveal.is_animating());

        app.menu.open_mobile();
        app.sync_surfaces(now);
        assert!(!app.panel_dismissal.is_active());
        assert!(app.drawer.is_open());

        app.menu.close_mobile();
        app.sync_surfaces(now);
        assert!(!app.drawer.is_open());
    }

    #[test]
    fn shrinking_below_breakpoint_closes_desktop_panel() {
        let mut app = sample_app(120);
        app.menu.open(1);
        app.resize(80, 40);
        assert!(app.is_mobile());
        assert_eq!(app.menu.state(), MenuState::Closed);
    }

    #[test]
    fn search_view_evaluates_on_tick_and_emits_one_search_event() {
        let mut app = sample_app(120);
        let t0 = Instant::now();
        app.open_search_view();
        for c in "sensor".chars() {
            app.search_view.push_char(c, t0);
        }
        assert_eq!(app.next_deadline(), Some(t0 + Duration::from_millis(300)));
        app.tick(t0 + Duration::from_millis(300));
        assert_eq!(app.search_view.engine.results().as_slice().len(), 3);
        assert_eq!(app.menu.analytics().by_action("search").count(), 1);

        app.close_search_view(CloseReason::Escape);
        assert_eq!(app.open_modal, None);
        assert_eq!(app.menu.analytics().by_action("close").count(), 1);
    }

    #[test]
    fn teardown_leaves_no_pending_deadline() {
        let mut app = sample_app(120);
        let now = Instant::now();
        app.menu.schedule_open(0, now);
        app.open_search_view();
        app.search_view.push_char('x', now);
        app.teardown();
        assert_eq!(app.next_deadline(), None);
    }
}
