use meganav_engine::panel_links;
use meganav_types::NavigationTree;

use crate::ui::dismiss::Dismissal;
use crate::ui::focus::FocusRing;

/// Focusable elements of the mobile layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawerNode {
    /// Menu button in the header; the only node outside the drawer.
    Toggle,
    Close,
    Search,
    Section(usize),
    Link { item: usize, position: usize },
}

/// Mobile drawer state: an accordion of sections inside a focus trap.
///
/// While the drawer is closed the ring holds only the menu button. Opening
/// swaps in the drawer's own nodes, so Tab can no longer reach the button
/// until the drawer closes and hands focus back to it.
#[derive(Debug)]
pub struct DrawerState {
    pub focus: FocusRing<DrawerNode>,
    pub expanded: Option<usize>,
    pub dismissal: Dismissal,
    open: bool,
}

impl Default for DrawerState {
    fn default() -> Self {
        Self {
            focus: FocusRing::new(&[DrawerNode::Toggle]),
            expanded: None,
            dismissal: Dismissal::new(),
            open: false,
        }
    }
}

impl DrawerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Tab order inside the open drawer.
    pub fn nodes(&self, tree: &NavigationTree, search_enabled: bool) -> Vec<DrawerNode> {
        let mut nodes = vec![DrawerNode::Close];
        if search_enabled {
            nodes.push(DrawerNode::Search);
        }
        for (index, item) in tree.items().iter().enumerate() {
            nodes.push(DrawerNode::Section(index));
            if self.expanded == Some(index) {
                nodes.extend((0..panel_links(item).count()).map(|position| DrawerNode::Link { item: index, position }));
            }
        }
        nodes
    }

    pub fn open(&mut self, tree: &NavigationTree, search_enabled: bool) {
        if self.is_open() {
            return;
        }
        self.open = true;
        self.expanded = None;
        let nodes = self.nodes(tree, search_enabled);
        self.focus.set_nodes(&nodes);
        self.dismissal.register();
    }

    /// Releases the trap; focus returns to the menu button.
    pub fn close(&mut self) {
        self.open = false;
        self.expanded = None;
        self.focus.set_nodes(&[DrawerNode::Toggle]);
        self.dismissal.teardown();
    }

    /// Accordion: expanding one section collapses the others.
    pub fn toggle_section(&mut self, index: usize, tree: &NavigationTree, search_enabled: bool) {
        self.expanded = if self.expanded == Some(index) { None } else { Some(index) };
        let nodes = self.nodes(tree, search_enabled);
        self.focus.set_nodes(&nodes);
        self.focus.focus(DrawerNode::Section(index));
    }
}

#[cfg(test)]
mod tests {
    use meganav_types::{NavColumn, NavItem, NavLink};

    use super::*;

    fn tree() -> NavigationTree {
        NavigationTree::new(vec![
            NavItem::new("Products", vec![NavColumn::new("Temperature", vec![NavLink::new("Room", "/room"), NavLink::new("Duct", "/duct")])]),
            NavItem::new("Resources", vec![NavColumn::new("Media", vec![NavLink::new("Blog", "/blog")])]).with_order(1),
        ])
    }

    #[test]
    fn opening_traps_focus_and_closing_restores_toggle() {
        let tree = tree();
        let mut drawer = DrawerState::new();
        drawer.open(&tree, true);
        assert!(drawer.is_open());
        assert_eq!(drawer.focus.current(), Some(DrawerNode::Close));
        drawer.focus.prev();
        assert_eq!(drawer.focus.current(), Some(DrawerNode::Section(1)));
        drawer.close();
        assert!(!drawer.is_open());
        assert_eq!(drawer.focus.current(), Some(DrawerNode::Toggle));
        assert!(!drawer.dismissal.is_active());
    }

    #[test]
    fn tab_never_leaves_the_open_drawer() {
        let tree = tree();
        let mut drawer = DrawerState::new();
        drawer.open(&tree, true);
        let ring: Vec<DrawerNode> = drawer.focus.nodes().collect();
        assert!(!ring.contains(&DrawerNode::Toggle));
        for _ in 0..(ring.len() * 2 + 1) {
            drawer.focus.next();
            assert!(drawer.focus.current().is_some_and(|node| ring.contains(&node)));
        }
    }

    #[test]
    fn accordion_expands_one_section_at_a_time() {
        let tree = tree();
        let mut drawer = DrawerState::new();
        drawer.open(&tree, false);
        drawer.toggle_section(0, &tree, false);
        assert_eq!(
            drawer.nodes(&tree, false),
            vec![
                DrawerNode::Close,
                DrawerNode::Section(0),
                DrawerNode::Link { item: 0, position: 0 },
                DrawerNode::Link { item: 0, position: 1 },
                DrawerNode::Section(1),
            ]
        );
        drawer.toggle_section(1, &tree, false);
        assert_eq!(drawer.expanded, Some(1));
        assert_eq!(drawer.focus.current(), Some(DrawerNode::Section(1)));
        drawer.toggle_section(1, &tree, false);
        assert_eq!(drawer.expanded, None);
    }
}
