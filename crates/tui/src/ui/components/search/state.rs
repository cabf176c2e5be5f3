use std::time::Instant;

use meganav_engine::{DebouncedSearch, RecentSearches, SearchConfig, SearchResult};
use meganav_types::NavigationTree;
use tracing::debug;

use crate::ui::dismiss::Dismissal;
use crate::ui::focus::FocusRing;

/// Number of popular links suggested while the query is empty.
pub const SUGGESTION_LIMIT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchFocus {
    Input,
    Results,
    Close,
}

const FOCUS_ORDER: [SearchFocus; 3] = [SearchFocus::Input, SearchFocus::Results, SearchFocus::Close];

/// Full-screen search view: debounced engine, recent searches and a focus
/// trap over input, results and close button.
#[derive(Debug)]
pub struct SearchViewState {
    pub engine: DebouncedSearch,
    pub recent: RecentSearches,
    pub focus: FocusRing<SearchFocus>,
    pub dismissal: Dismissal,
    pub suggestions: Vec<String>,
}

impl SearchViewState {
    pub fn new(recent: RecentSearches) -> Self {
        Self {
            engine: DebouncedSearch::new(SearchConfig::FULL),
            recent,
            focus: FocusRing::default(),
            dismissal: Dismissal::new(),
            suggestions: Vec::new(),
        }
    }

    pub fn open(&mut self, suggestions: Vec<String>) {
        self.engine.reset();
        self.suggestions = suggestions;
        self.focus.set_nodes(&FOCUS_ORDER);
        self.focus.focus(SearchFocus::Input);
        self.dismissal.register();
    }

    /// Unmount: the pending evaluation is cancelled before anything else.
    pub fn close(&mut self) {
        self.engine.teardown();
        self.engine.reset();
        self.dismissal.teardown();
        self.focus.set_nodes(&[]);
    }

    pub fn push_char(&mut self, c: char, now: Instant) {
        let mut query = self.engine.query().to_string();
        query.push(c);
        self.engine.search(&query, now);
        self.focus.focus(SearchFocus::Input);
    }

    pub fn pop_char(&mut self, now: Instant) {
        let mut query = self.engine.query().to_string();
        if query.pop().is_some() {
            self.engine.search(&query, now);
        }
    }

    pub fn select_next(&mut self) {
        self.engine.select_next();
        if self.engine.selected_index().is_some() {
            self.focus.focus(SearchFocus::Results);
        }
    }

    pub fn select_prev(&mut self) {
        self.engine.select_prev();
        if self.engine.selected_index().is_none() {
            self.focus.focus(SearchFocus::Input);
        }
    }

    /// Takes the selected result and remembers its label as a recent search.
    pub fn take_selection(&mut self) -> Option<SearchResult> {
        let selected = self.engine.selected().cloned()?;
        self.recent.push(&selected.link.label);
        debug!(label = %selected.link.label, "Search result selected");
        Some(selected)
    }

    /// Evaluates the pending query. Returns the result count when it ran.
    pub fn poll(&mut self, tree: &NavigationTree, now: Instant) -> Option<usize> {
        self.engine.poll(tree, now)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use meganav_types::{NavColumn, NavItem, NavLink};

    use super::*;

    fn tree() -> NavigationTree {
        NavigationTree::new(vec![NavItem::new(
            "Products",
            vec![NavColumn::new(
                "Temperature",
                vec![NavLink::new("Room Sensors", "/room"), NavLink::new("Duct Sensors", "/duct")],
            )],
        )])
    }

    #[test]
    fn typing_debounces_and_selection_is_recorded() {
        let tree = tree();
        let t0 = Instant::now();
        let mut view = SearchViewState::new(RecentSearches::default());
        view.open(Vec::new());
        for c in "duct".chars() {
            view.push_char(c, t0);
        }
        assert!(view.engine.is_searching());
        assert_eq!(view.poll(&tree, t0 + Duration::from_millis(299)), None);
        assert_eq!(view.poll(&tree, t0 + SearchConfig::FULL.debounce), Some(1));

        view.select_next();
        assert_eq!(view.focus.current(), Some(SearchFocus::Results));
        let selected = view.take_selection().map(|result| result.link.href);
        assert_eq!(selected.as_deref(), Some("/duct"));
        assert_eq!(view.recent.iter().next(), Some("Duct Sensors"));

        view.select_prev();
        assert_eq!(view.focus.current(), Some(SearchFocus::Input));
    }

    #[test]
    fn closing_cancels_pending_evaluation() {
        let tree = tree();
        let t0 = Instant::now();
        let mut view = SearchViewState::new(RecentSearches::default());
        view.open(Vec::new());
        view.push_char('r', t0);
        view.close();
        assert_eq!(view.poll(&tree, t0 + Duration::from_secs(1)), None);
        assert!(!view.engine.is_searching());
        assert!(!view.dismissal.is_active());
    }

    #[test]
    fn tab_cycles_inside_the_view() {
        let mut view = SearchViewState::new(RecentSearches::default());
        view.open(Vec::new());
        view.focus.prev();
        assert_eq!(view.focus.current(), Some(SearchFocus::Close));
        view.focus.next();
        assert_eq!(view.focus.current(), Some(SearchFocus::Input));
    }

    #[test]
    fn reopening_starts_at_the_input() {
        let mut view = SearchViewState::new(RecentSearches::default());
        view.open(Vec::new());
        view.focus.focus(SearchFocus::Close);
        view.close();
        assert_eq!(view.focus.current(), None);
        view.open(Vec::new());
        assert!(view.focus.is_focused(SearchFocus::Input));
    }
}
