use std::env;
use std::path::PathBuf;

use dirs_next::{config_dir, data_dir, home_dir};

/// Directory name used under the platform config/data roots.
pub const APP_DIR_NAME: &str = "meganav";

/// Expands a leading `~` (alone, or followed by a path separator) to the
/// user's home directory. `~user` forms are left as they are.
pub fn expand_tilde(path: &str) -> PathBuf {
    let trimmed = path.trim();
    let rest = match trimmed.strip_prefix('~') {
        Some("") => "",
        Some(rest) if rest.starts_with(['/', '\\']) => &rest[1..],
        _ => return PathBuf::from(trimmed),
    };
    match home_dir() {
        Some(home) if rest.is_empty() => home,
        Some(home) => home.join(rest),
        None => PathBuf::from(trimmed),
    }
}

/// Resolves a path from an environment override, falling back to
/// `<root>/meganav/<file_name>`.
pub fn resolve_app_path(env_var: &str, use_data_dir: bool, file_name: &str) -> PathBuf {
    if let Ok(path) = env::var(env_var) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return expand_tilde(trimmed);
        }
    }
    let root = if use_data_dir { data_dir() } else { config_dir() };
    root.unwrap_or_else(|| PathBuf::from(".")).join(APP_DIR_NAME).join(file_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_paths_are_untouched() {
        assert_eq!(expand_tilde("/tmp/nav.yaml"), PathBuf::from("/tmp/nav.yaml"));
        assert_eq!(expand_tilde("  relative/nav.json "), PathBuf::from("relative/nav.json"));
        assert_eq!(expand_tilde("~other/nav.json"), PathBuf::from("~other/nav.json"));
    }

    #[test]
    fn home_prefix_is_expanded() {
        if let Some(home) = home_dir() {
            assert_eq!(expand_tilde("~"), home);
            assert_eq!(expand_tilde("~/nav.yaml"), home.join("nav.yaml"));
        }
    }

    #[test]
    fn fallback_path_ends_with_app_dir() {
        let path = resolve_app_path("MEGANAV_TEST_UNSET_PATH_VAR", false, "preferences.json");
        assert!(path.ends_with("meganav/preferences.json"));
    }
}
