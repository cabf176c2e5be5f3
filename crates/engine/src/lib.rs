//! Headless core of the Meganav navigation menu.
//!
//! Everything here is deterministic: time is passed in as [`std::time::Instant`]
//! arguments and timers are polled, never slept on. The terminal front-end
//! drives a [`MenuController`] with input and ticks, then renders whatever
//! state it reads back.

pub mod analytics;
pub mod boundary;
pub mod controller;
pub mod intent;
pub mod keyboard;
pub mod search;
pub mod timer;
pub mod tree;

pub use analytics::{Analytics, AnalyticsError, AnalyticsSink, HISTORY_LIMIT, TracingSink};
pub use boundary::{AUTO_RETRY_DELAY, BoundaryFailure, BoundaryLevel, ErrorBoundary, RecoveryAction};
pub use controller::{ControllerOptions, MenuController, MenuState};
pub use intent::{HoverIntent, IntentConfig, IntentFire};
pub use keyboard::{KeyOutcome, KeyboardNav, MenuFocus, NavKey, panel_links};
pub use search::{DebouncedSearch, RECENT_SEARCH_LIMIT, RecentSearches, SearchConfig, SearchResult, SearchResults, search_tree};
pub use timer::{Timer, earliest};
pub use tree::{ProcessOptions, process};
