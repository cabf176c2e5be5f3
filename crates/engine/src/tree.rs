//! Derives the tree a user actually sees from the loaded document.

use std::collections::BTreeSet;

use meganav_types::{NavItem, NavigationTree};
use tracing::debug;

/// Filters applied before the tree reaches the controller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOptions {
    /// Permission tags held by the viewer.
    pub granted: BTreeSet<String>,
    /// When non-empty, only items with these labels are kept.
    pub include: Vec<String>,
    /// Item labels to drop.
    pub exclude: Vec<String>,
    /// Maximum number of columns per item.
    pub max_columns: Option<usize>,
}

impl ProcessOptions {
    pub fn with_permissions(mut self, granted: impl IntoIterator<Item = String>) -> Self {
        self.granted = granted.into_iter().collect();
        self
    }

    pub fn with_max_columns(mut self, max_columns: usize) -> Self {
        self.max_columns = Some(max_columns);
        self
    }

    fn admits(&self, item: &NavItem) -> bool {
        if !item.is_visible {
            return false;
        }
        if !item.permissions.is_empty() && item.permissions.is_disjoint(&self.granted) {
            return false;
        }
        if !self.include.is_empty() && !self.include.iter().any(|label| label == &item.label) {
            return false;
        }
        !self.exclude.iter().any(|label| label == &item.label)
    }
}

/// Applies `options` to `tree`. Ordering is preserved.
pub fn process(tree: &NavigationTree, options: &ProcessOptions) -> NavigationTree {
    let items: Vec<NavItem> = tree
        .items()
        .iter()
        .filter(|item| options.admits(item))
        .cloned()
        .map(|mut item| {
            if let Some(max) = options.max_columns {
                item.columns.truncate(max);
            }
            item
        })
        .collect();
    debug!(kept = items.len(), total = tree.len(), "Processed navigation tree");
    NavigationTree::new(items)
}

#[cfg(test)]
mod tests {
    use meganav_types::{NavColumn, NavLink};

    use super::*;

    fn item(label: &str, order: u32) -> NavItem {
        NavItem::new(
            label,
            vec![
                NavColumn::new("One", vec![NavLink::new("a", "/a")]),
                NavColumn::new("Two", vec![NavLink::new("b", "/b")]),
                NavColumn::new("Three", vec![]),
            ],
        )
        .with_order(order)
    }

    fn labels(tree: &NavigationTree) -> Vec<&str> {
        tree.items().iter().map(|i| i.label.as_str()).collect()
    }

    #[test]
    fn hidden_and_unpermitted_items_are_dropped() {
        let mut hidden = item("Hidden", 0);
        hidden.is_visible = false;
        let mut partners = item("Partners", 1);
        partners.permissions.insert("partner".into());
        let tree = NavigationTree::new(vec![hidden, partners, item("Products", 2)]);

        let public = process(&tree, &ProcessOptions::default());
        assert_eq!(labels(&public), ["Products"]);

        let granted = process(&tree, &ProcessOptions::default().with_permissions(["partner".to_string()]));
        assert_eq!(labels(&granted), ["Partners", "Products"]);
    }

    #[test]
    fn include_exclude_and_column_cap() {
        let tree = NavigationTree::new(vec![item("Products", 0), item("Resources", 1), item("Company", 2)]);
        let options = ProcessOptions {
            include: vec!["Products".into(), "Company".into()],
            exclude: vec!["Company".into()],
            ..ProcessOptions::default()
        }
        .with_max_columns(2);
        let processed = process(&tree, &options);
        assert_eq!(labels(&processed), ["Products"]);
        assert_eq!(processed.items()[0].columns.len(), 2);
    }

    #[test]
    fn empty_tree_stays_empty() {
        assert!(process(&NavigationTree::default(), &ProcessOptions::default()).is_empty());
    }
}
