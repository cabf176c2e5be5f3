//! Utilities shared by the Meganav binary and TUI. Navigation documents are
//! loaded and validated here, and user preferences persist through
//! [`UserPreferences`].

pub mod loader;
pub mod path_processing;
pub mod preferences;
pub mod text_processing;

pub use loader::{
    Format, LoadError, NAV_PATH_ENV, embedded_navigation, load_navigation, load_navigation_from_env, parse_navigation, validate_config,
};
pub use path_processing::{APP_DIR_NAME, expand_tilde, resolve_app_path};
pub use preferences::{
    MAX_SEARCH_QUERIES, MenuBehavior, NavigationUsage, PREFERENCES_PATH_ENV, PreferencesError, PreferencesPayload, RecentItem,
    ThemePreference, UserPreferences,
};
pub use text_processing::{contains_ignore_case, is_truthy, normalize_query, truncate_to_width};
