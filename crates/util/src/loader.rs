//! Loading and validating navigation documents.
//!
//! Documents are JSON or YAML (chosen by file extension). Validation runs at
//! ingestion and collects every violation so authors can fix a file in one
//! pass; the rest of the system assumes a validated tree.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use meganav_types::{NavDataError, NavigationConfig, parse_href};
use thiserror::Error;
use tracing::{debug, info};

use crate::expand_tilde;

/// Environment variable naming the navigation document to load.
pub const NAV_PATH_ENV: &str = "MEGANAV_NAV_PATH";

const EMBEDDED_NAVIGATION: &str = include_str!("../assets/default_nav.yaml");

/// Error surfaced when a navigation document cannot be loaded.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read navigation file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid navigation JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid navigation YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("unsupported navigation file extension for {0} (expected .json, .yaml or .yml)")]
    UnsupportedFormat(PathBuf),
    #[error("navigation validation failed: {}", join_errors(.0))]
    Invalid(Vec<NavDataError>),
}

fn join_errors(errors: &[NavDataError]) -> String {
    errors.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
}

/// Serialization format of a navigation document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
}

impl Format {
    fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()?.to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }
}

/// Parses and validates a navigation document held in memory.
pub fn parse_navigation(text: &str, format: Format) -> Result<NavigationConfig, LoadError> {
    let config: NavigationConfig = match format {
        Format::Json => serde_json::from_str(text)?,
        Format::Yaml => serde_yaml::from_str(text)?,
    };
    validate_config(&config).map_err(LoadError::Invalid)?;
    Ok(config)
}

/// Reads, parses and validates the document at `path`.
pub fn load_navigation(path: &Path) -> Result<NavigationConfig, LoadError> {
    let format = Format::from_path(path).ok_or_else(|| LoadError::UnsupportedFormat(path.to_path_buf()))?;
    let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config = parse_navigation(&text, format)?;
    info!(path = %path.display(), items = config.items.len(), "Loaded navigation document");
    Ok(config)
}

/// The navigation shipped with the binary.
pub fn embedded_navigation() -> Result<NavigationConfig, LoadError> {
    parse_navigation(EMBEDDED_NAVIGATION, Format::Yaml)
}

/// Loads from `explicit` when given, else from `MEGANAV_NAV_PATH`, else the
/// embedded document.
pub fn load_navigation_from_env(explicit: Option<&Path>) -> Result<NavigationConfig, LoadError> {
    if let Some(path) = explicit {
        return load_navigation(path);
    }
    if let Ok(value) = std::env::var(NAV_PATH_ENV)
        && !value.trim().is_empty()
    {
        return load_navigation(&expand_tilde(&value));
    }
    debug!("No navigation path configured; using embedded navigation");
    embedded_navigation()
}

/// Checks structural rules that serde cannot express.
///
/// Empty columns and items without columns are accepted; they render as
/// empty groups.
pub fn validate_config(config: &NavigationConfig) -> Result<(), Vec<NavDataError>> {
    let mut errors = Vec::new();
    if !(1..=6).contains(&config.max_columns) {
        errors.push(NavDataError::MaxColumnsOutOfRange(config.max_columns));
    }

    let mut seen_labels = HashSet::new();
    for (index, item) in config.items.items().iter().enumerate() {
        if item.label.trim().is_empty() {
            errors.push(NavDataError::EmptyItemLabel { index });
        } else if !seen_labels.insert(item.label.as_str()) {
            errors.push(NavDataError::DuplicateItemLabel {
                label: item.label.clone(),
            });
        }
        if let Some(href) = &item.href
            && let Err(error) = parse_href(&item.label, href)
        {
            errors.push(error);
        }

        for (column_index, column) in item.columns.iter().enumerate() {
            if column.title.trim().is_empty() {
                errors.push(NavDataError::EmptyColumnTitle {
                    item: item.label.clone(),
                    index: column_index,
                });
            }
            let featured = column.featured.iter();
            for (link_index, link) in column.links.iter().chain(featured).enumerate() {
                if link.label.trim().is_empty() {
                    errors.push(NavDataError::EmptyLinkLabel {
                        item: item.label.clone(),
                        column: column.title.clone(),
                        index: link_index,
                    });
                }
                if let Err(error) = link.destination() {
                    errors.push(error);
                }
            }
        }

        if let Some(highlight) = &item.highlight {
            let required = [
                ("title", &highlight.title),
                ("description", &highlight.description),
                ("cta", &highlight.cta),
            ];
            for (field, value) in required {
                if value.trim().is_empty() {
                    errors.push(NavDataError::IncompleteHighlight {
                        item: item.label.clone(),
                        field,
                    });
                }
            }
            if let Err(error) = parse_href(&highlight.title, &highlight.href) {
                errors.push(error);
            }
        }
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn embedded_navigation_is_valid() {
        let config = embedded_navigation().expect("embedded navigation parses");
        assert_eq!(config.items.len(), 2);
        assert_eq!(config.items.items()[0].label, "Products");
        assert!(config.enable_search);
    }

    #[test]
    fn collects_every_violation() {
        let json = r#"{
            "items": [
                { "label": "Products", "columns": [ { "title": "", "links": [ { "label": "", "href": "products" } ] } ] },
                { "label": "Products", "columns": [] }
            ],
            "maxColumns": 9
        }"#;
        let Err(LoadError::Invalid(errors)) = parse_navigation(json, Format::Json) else {
            panic!("expected validation failure");
        };
        assert!(errors.contains(&NavDataError::MaxColumnsOutOfRange(9)));
        assert!(errors.iter().any(|e| matches!(e, NavDataError::EmptyColumnTitle { .. })));
        assert!(errors.iter().any(|e| matches!(e, NavDataError::EmptyLinkLabel { .. })));
        assert!(errors.iter().any(|e| matches!(e, NavDataError::InvalidHref { .. })));
        assert!(errors.iter().any(|e| matches!(e, NavDataError::DuplicateItemLabel { .. })));
    }

    #[test]
    fn accepts_empty_tree_and_empty_columns() {
        let yaml = "items:\n  - label: Solutions\n    columns:\n      - title: Coming soon\n        links: []\n";
        let config = parse_navigation(yaml, Format::Yaml).expect("empty column is valid");
        assert_eq!(config.items.items()[0].link_count(), 0);

        let config = parse_navigation(r#"{ "items": [] }"#, Format::Json).expect("empty tree is valid");
        assert!(config.items.is_empty());
    }

    #[test]
    fn loads_by_extension() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nav.json");
        let mut file = fs::File::create(&path).expect("create");
        write!(file, r#"{{ "items": [ {{ "label": "Support", "href": "https://help.example.com" }} ] }}"#).expect("write");
        let config = load_navigation(&path).expect("load json");
        assert_eq!(config.items.items()[0].label, "Support");

        let other = dir.path().join("nav.toml");
        fs::write(&other, "").expect("write");
        assert!(matches!(load_navigation(&other), Err(LoadError::UnsupportedFormat(_))));

        let missing = dir.path().join("missing.yaml");
        assert!(matches!(load_navigation(&missing), Err(LoadError::Io { .. })));
    }
}
