//! Search within the navigation tree.
//!
//! Matching is a case-insensitive substring test against a link's label, its
//! description and the label of the item that owns it. Results keep tree
//! traversal order and are truncated to the first `limit` matches.
//! [`DebouncedSearch`] wraps the matcher in a trailing-edge debounce: only the
//! last query in a burst is ever evaluated.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use meganav_types::{NavLink, NavigationTree};
use meganav_util::{contains_ignore_case, normalize_query};
use serde::Serialize;
use tracing::debug;

use crate::timer::Timer;

/// Recent selections remembered by the search view.
pub const RECENT_SEARCH_LIMIT: usize = 5;

/// Debounce delay and result cap for one search surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    pub debounce: Duration,
    pub limit: usize,
}

impl SearchConfig {
    /// Inline search inside an open panel or the drawer.
    pub const COMPACT: Self = Self {
        debounce: Duration::from_millis(200),
        limit: 10,
    };

    /// The full search view.
    pub const FULL: Self = Self {
        debounce: Duration::from_millis(300),
        limit: 20,
    };
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self::COMPACT
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    pub item_index: usize,
    pub column_index: usize,
    pub link_index: usize,
    /// `[item label, column title, link label]`.
    pub breadcrumb: [String; 3],
    pub link: NavLink,
}

impl SearchResult {
    pub fn breadcrumb_text(&self) -> String {
        self.breadcrumb.join(" › ")
    }
}

/// Scans every visible link in traversal order, returning at most `limit` matches.
///
/// Blank queries match nothing.
pub fn search_tree(tree: &NavigationTree, query: &str, limit: usize) -> Vec<SearchResult> {
    let Some(needle) = normalize_query(query) else {
        return Vec::new();
    };
    tree.links()
        .filter(|entry| entry.item.is_visible)
        .filter(|entry| {
            contains_ignore_case(&entry.link.label, &needle)
                || entry
                    .link
                    .description
                    .as_deref()
                    .is_some_and(|description| contains_ignore_case(description, &needle))
                || contains_ignore_case(&entry.item.label, &needle)
        })
        .take(limit)
        .map(|entry| SearchResult {
            item_index: entry.item_index,
            column_index: entry.column_index,
            link_index: entry.link_index,
            breadcrumb: [entry.item.label.clone(), entry.column.title.clone(), entry.link.label.clone()],
            link: entry.link.clone(),
        })
        .collect()
}

/// Last evaluation outcome. `Ready(vec![])` is an explicit "no results".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SearchResults {
    #[default]
    NotSearched,
    Ready(Vec<SearchResult>),
}

impl SearchResults {
    pub fn as_slice(&self) -> &[SearchResult] {
        match self {
            Self::NotSearched => &[],
            Self::Ready(results) => results,
        }
    }

    pub fn is_no_results(&self) -> bool {
        matches!(self, Self::Ready(results) if results.is_empty())
    }
}

/// Query echo, debounced evaluation and a result selection cursor.
#[derive(Debug, Clone, Default)]
pub struct DebouncedSearch {
    config: SearchConfig,
    query: String,
    results: SearchResults,
    is_searching: bool,
    pending: Timer,
    /// `-1` while the input has focus and no result is highlighted.
    selected: isize,
}

impl DebouncedSearch {
    pub fn new(config: SearchConfig) -> Self {
        Self {
            config,
            query: String::new(),
            results: SearchResults::NotSearched,
            is_searching: false,
            pending: Timer::idle(),
            selected: -1,
        }
    }

    pub fn config(&self) -> SearchConfig {
        self.config
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn results(&self) -> &SearchResults {
        &self.results
    }

    pub fn is_searching(&self) -> bool {
        self.is_searching
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.deadline()
    }

    /// Records `query` immediately and (re)starts the quiet period.
    ///
    /// A blank query cancels any pending evaluation and clears results
    /// without entering the searching state.
    pub fn search(&mut self, query: &str, now: Instant) {
        self.query = query.to_string();
        self.selected = -1;
        if normalize_query(query).is_none() {
            self.pending.cancel();
            self.is_searching = false;
            self.results = SearchResults::NotSearched;
            return;
        }
        self.is_searching = true;
        self.pending.arm(now, self.config.debounce);
    }

    /// Evaluates the latest query once its quiet period has elapsed.
    ///
    /// Returns the number of results when an evaluation happened.
    pub fn poll(&mut self, tree: &NavigationTree, now: Instant) -> Option<usize> {
        if !self.pending.fire_if_due(now) {
            return None;
        }
        let results = search_tree(tree, &self.query, self.config.limit);
        let count = results.len();
        debug!(query = %self.query, count, "Search evaluated");
        self.results = SearchResults::Ready(results);
        self.is_searching = false;
        self.selected = -1;
        Some(count)
    }

    /// Cancels any pending evaluation. Nothing changes after teardown until
    /// the next [`search`](Self::search).
    pub fn teardown(&mut self) {
        if self.pending.cancel() {
            debug!(query = %self.query, "Cancelled pending search evaluation");
        }
        self.is_searching = false;
    }

    /// Clears query, results and selection.
    pub fn reset(&mut self) {
        self.teardown();
        self.query.clear();
        self.results = SearchResults::NotSearched;
        self.selected = -1;
    }

    pub fn selected_index(&self) -> Option<usize> {
        usize::try_from(self.selected).ok()
    }

    pub fn selected(&self) -> Option<&SearchResult> {
        self.selected_index().and_then(|index| self.results.as_slice().get(index))
    }

    /// Moves the cursor down, stopping at the last result.
    pub fn select_next(&mut self) {
        let last = self.results.as_slice().len() as isize - 1;
        self.selected = (self.selected + 1).min(last).max(-1);
    }

    /// Moves the cursor up, stopping at `-1` (input focused).
    pub fn select_prev(&mut self) {
        self.selected = (self.selected - 1).max(-1);
    }

    pub fn clear_selection(&mut self) {
        self.selected = -1;
    }
}

/// Most recent first, deduplicated, capped at [`RECENT_SEARCH_LIMIT`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecentSearches {
    entries: VecDeque<String>,
}

impl RecentSearches {
    pub fn from_entries(entries: impl IntoIterator<Item = String>) -> Self {
        let mut recent = Self::default();
        let collected: Vec<String> = entries.into_iter().collect();
        for entry in collected.into_iter().rev() {
            recent.push(&entry);
        }
        recent
    }

    pub fn push(&mut self, entry: &str) {
        let entry = entry.trim();
        if entry.is_empty() {
            return;
        }
        self.entries.retain(|existing| existing != entry);
        self.entries.push_front(entry.to_string());
        self.entries.truncate(RECENT_SEARCH_LIMIT);
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
