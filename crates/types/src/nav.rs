//! Navigation tree data model.
//!
//! The tree is supplied from outside the core (embedded defaults or a
//! configuration file) and is treated as read-only once constructed. Field
//! names serialize in camelCase so existing site navigation documents can be
//! loaded without translation.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Validation failure for a single navigation entry.
///
/// Each variant carries enough context (item label, column title, link label)
/// to point an author at the offending entry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavDataError {
    #[error("navigation item at position {index} has an empty label")]
    EmptyItemLabel { index: usize },
    #[error("duplicate navigation item label '{label}'")]
    DuplicateItemLabel { label: String },
    #[error("column {index} of '{item}' has an empty title")]
    EmptyColumnTitle { item: String, index: usize },
    #[error("link {index} in '{item}' > '{column}' has an empty label")]
    EmptyLinkLabel { item: String, column: String, index: usize },
    #[error("'{context}' has an invalid href '{href}': must be an absolute path or a URL")]
    InvalidHref { context: String, href: String },
    #[error("highlight of '{item}' is missing its {field}")]
    IncompleteHighlight { item: String, field: &'static str },
    #[error("max_columns must be between 1 and 6, got {0}")]
    MaxColumnsOutOfRange(u8),
}

/// Where a link points once its `href` has been checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// Site-relative absolute path such as `/products/temperature`.
    Path(String),
    /// Fully qualified URL.
    Url(Url),
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(path) => f.write_str(path),
            Self::Url(url) => f.write_str(url.as_str()),
        }
    }
}

/// Parses an `href` into a [`Destination`].
///
/// Accepts absolute paths (leading `/`) and absolute URLs with a host.
pub fn parse_href(context: &str, href: &str) -> Result<Destination, NavDataError> {
    let trimmed = href.trim();
    if trimmed.starts_with('/') && !trimmed.starts_with("//") {
        return Ok(Destination::Path(trimmed.to_string()));
    }
    match Url::parse(trimmed) {
        Ok(url) if url.has_host() => Ok(Destination::Url(url)),
        _ => Err(NavDataError::InvalidHref {
            context: context.to_string(),
            href: href.to_string(),
        }),
    }
}

/// A single navigable link inside a column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavLink {
    pub label: String,
    pub href: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub is_external: bool,
    #[serde(default)]
    pub open_in_new_tab: bool,
    /// Identifier forwarded to analytics on click.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracking_id: Option<String>,
}

impl NavLink {
    pub fn new(label: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            href: href.into(),
            badge: None,
            description: None,
            is_external: false,
            open_in_new_tab: false,
            tracking_id: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_badge(mut self, badge: impl Into<String>) -> Self {
        self.badge = Some(badge.into());
        self
    }

    pub fn external(mut self) -> Self {
        self.is_external = true;
        self
    }

    /// Resolves the link's `href`.
    pub fn destination(&self) -> Result<Destination, NavDataError> {
        parse_href(&self.label, &self.href)
    }

    /// External links and links flagged for a new tab open outside the
    /// current page.
    pub fn opens_new_tab(&self) -> bool {
        self.is_external || self.open_in_new_tab
    }
}

/// A titled group of links within a mega-menu panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavColumn {
    pub title: String,
    #[serde(default)]
    pub links: Vec<NavLink>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured: Option<NavLink>,
    #[serde(default)]
    pub order: u32,
}

impl NavColumn {
    pub fn new(title: impl Into<String>, links: Vec<NavLink>) -> Self {
        Self {
            title: title.into(),
            links,
            description: None,
            featured: None,
            order: 0,
        }
    }
}

/// Promotional block rendered alongside a panel's columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavHighlight {
    pub title: String,
    pub description: String,
    pub cta: String,
    pub href: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
}

/// CMS identifier; documents carry either strings or numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NavItemId {
    Number(u64),
    Text(String),
}

impl fmt::Display for NavItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_tracking_category() -> String {
    "navigation".to_string()
}

/// A top-level entry in the navigation bar. Its label is its identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavItem {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(default)]
    pub columns: Vec<NavColumn>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlight: Option<NavHighlight>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<NavItemId>,
    #[serde(default)]
    pub order: u32,
    #[serde(default = "default_true")]
    pub is_visible: bool,
    #[serde(default)]
    pub permissions: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seo_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seo_description: Option<String>,
    #[serde(default = "default_tracking_category")]
    pub tracking_category: String,
}

impl NavItem {
    pub fn new(label: impl Into<String>, columns: Vec<NavColumn>) -> Self {
        Self {
            label: label.into(),
            href: None,
            columns,
            highlight: None,
            id: None,
            order: 0,
            is_visible: true,
            permissions: BTreeSet::new(),
            seo_title: None,
            seo_description: None,
            tracking_category: default_tracking_category(),
        }
    }

    pub fn with_order(mut self, order: u32) -> Self {
        self.order = order;
        self
    }

    pub fn with_highlight(mut self, highlight: NavHighlight) -> Self {
        self.highlight = Some(highlight);
        self
    }

    /// Total number of links across all columns.
    pub fn link_count(&self) -> usize {
        self.columns.iter().map(|c| c.links.len()).sum()
    }
}

/// Ordered collection of top-level items.
///
/// Construction stable-sorts items (and each item's columns) ascending by
/// `order`; ties keep insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NavigationTree {
    items: Vec<NavItem>,
}

impl NavigationTree {
    pub fn new(mut items: Vec<NavItem>) -> Self {
        // `sort_by_key` is stable.
        items.sort_by_key(|item| item.order);
        for item in &mut items {
            item.columns.sort_by_key(|column| column.order);
        }
        Self { items }
    }

    pub fn items(&self) -> &[NavItem] {
        &self.items
    }

    pub fn item(&self, index: usize) -> Option<&NavItem> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterates every link with its owning item and column, in traversal order.
    pub fn links(&self) -> impl Iterator<Item = LinkRef<'_>> {
        self.items.iter().enumerate().flat_map(|(item_index, item)| {
            item.columns.iter().enumerate().flat_map(move |(column_index, column)| {
                column.links.iter().enumerate().map(move |(link_index, link)| LinkRef {
                    item_index,
                    column_index,
                    link_index,
                    item,
                    column,
                    link,
                })
            })
        })
    }
}

impl<'de> Deserialize<'de> for NavigationTree {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let items = Vec::<NavItem>::deserialize(deserializer)?;
        Ok(Self::new(items))
    }
}

/// Borrowed view of one link and where it lives in the tree.
#[derive(Debug, Clone, Copy)]
pub struct LinkRef<'a> {
    pub item_index: usize,
    pub column_index: usize,
    pub link_index: usize,
    pub item: &'a NavItem,
    pub column: &'a NavColumn,
    pub link: &'a NavLink,
}

/// Light/dark preference for the rendered surface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    Dark,
    #[default]
    #[serde(alias = "system")]
    Auto,
}

fn default_max_columns() -> u8 {
    4
}

fn default_mobile_breakpoint() -> u16 {
    100
}

/// Top-level navigation document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationConfig {
    pub items: NavigationTree,
    #[serde(default = "default_max_columns")]
    pub max_columns: u8,
    #[serde(default)]
    pub theme: ThemeMode,
    #[serde(default = "default_true")]
    pub enable_analytics: bool,
    #[serde(default)]
    pub enable_search: bool,
    /// Terminal width (in columns) below which the drawer layout is used.
    #[serde(default = "default_mobile_breakpoint")]
    pub mobile_breakpoint: u16,
}

impl NavigationConfig {
    pub fn new(items: NavigationTree) -> Self {
        Self {
            items,
            max_columns: default_max_columns(),
            theme: ThemeMode::default(),
            enable_analytics: true,
            enable_search: false,
            mobile_breakpoint: default_mobile_breakpoint(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tree_sorts_stably_by_order() {
        let tree = NavigationTree::new(vec![
            NavItem::new("B", vec![]).with_order(1),
            NavItem::new("A", vec![]).with_order(0),
            NavItem::new("C", vec![]).with_order(1),
        ]);
        let labels: Vec<_> = tree.items().iter().map(|i| i.label.as_str()).collect();
        assert_eq!(labels, ["A", "B", "C"]);
    }

    #[test]
    fn item_defaults_from_minimal_json() {
        let json = r#"{ "label": "Products", "columns": [ { "title": "Temperature", "links": [ { "label": "Duct Sensors", "href": "/products/temperature/duct" } ] } ] }"#;
        let item: NavItem = serde_json::from_str(json).expect("deserialize NavItem");
        assert!(item.is_visible);
        assert_eq!(item.order, 0);
        assert!(item.permissions.is_empty());
        assert_eq!(item.tracking_category, "navigation");
        assert!(!item.columns[0].links[0].is_external);
    }

    #[test]
    fn config_defaults_from_yaml() {
        let yaml = "items:\n  - label: Resources\n    columns: []\n";
        let config: NavigationConfig = serde_yaml::from_str(yaml).expect("deserialize config");
        assert_eq!(config.max_columns, 4);
        assert_eq!(config.theme, ThemeMode::Auto);
        assert!(config.enable_analytics);
        assert!(!config.enable_search);
        assert_eq!(config.items.len(), 1);
    }

    #[test]
    fn href_accepts_paths_and_urls_only() {
        assert!(matches!(parse_href("x", "/products"), Ok(Destination::Path(_))));
        assert!(matches!(parse_href("x", "https://example.com/docs"), Ok(Destination::Url(_))));
        assert!(parse_href("x", "products").is_err());
        assert!(parse_href("x", "//cdn.example.com").is_err());
        assert!(parse_href("x", "mailto:someone@example.com").is_err());
    }

    #[test]
    fn links_iterate_in_traversal_order() {
        let tree = NavigationTree::new(vec![
            NavItem::new(
                "Products",
                vec![
                    NavColumn::new("Temperature", vec![NavLink::new("Room", "/r"), NavLink::new("Duct", "/d")]),
                    NavColumn::new("Humidity", vec![NavLink::new("Wall", "/w")]),
                ],
            ),
            NavItem::new("Resources", vec![NavColumn::new("Docs", vec![NavLink::new("Notes", "/n")])]),
        ]);
        let labels: Vec<_> = tree.links().map(|l| l.link.label.as_str()).collect();
        assert_eq!(labels, ["Room", "Duct", "Wall", "Notes"]);
    }
}
