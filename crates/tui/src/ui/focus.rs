//! Focus rings built on `rat-focus`.
//!
//! A [`FocusRing`] gives every focusable node of a surface its own
//! [`FocusFlag`] and keeps the [`Focus`] built from them. Only the ring's own
//! flags take part in Tab traversal, so a ring doubles as the focus trap of
//! the surface that owns it: traversal wraps at both ends and never reaches
//! nodes outside the ring.

use std::fmt;

use rat_focus::{Focus, FocusBuilder, FocusFlag, HasFocus};
use ratatui::layout::Rect;

pub struct FocusRing<N> {
    container: FocusFlag,
    nodes: Vec<(N, FocusFlag)>,
    focus: Focus,
}

impl<N> Default for FocusRing<N> {
    fn default() -> Self {
        Self {
            container: FocusFlag::default(),
            nodes: Vec::new(),
            focus: Focus::default(),
        }
    }
}

impl<N: Copy + PartialEq + fmt::Debug> fmt::Debug for FocusRing<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FocusRing")
            .field("nodes", &self.nodes().collect::<Vec<_>>())
            .field("current", &self.current())
            .finish()
    }
}

impl<N: Copy + PartialEq> FocusRing<N> {
    pub fn new(nodes: &[N]) -> Self {
        let mut ring = Self::default();
        ring.set_nodes(nodes);
        ring
    }

    /// Replaces the traversal order. The focused node keeps focus when it is
    /// still present; otherwise the first node takes it. Flags of retained
    /// nodes are reused.
    pub fn set_nodes(&mut self, nodes: &[N]) {
        let current = self.current();
        let mut previous = std::mem::take(&mut self.nodes);
        self.nodes = nodes
            .iter()
            .map(|node| {
                let flag = previous
                    .iter()
                    .position(|(candidate, _)| candidate == node)
                    .map(|index| previous.swap_remove(index).1)
                    .unwrap_or_default();
                (*node, flag)
            })
            .collect();
        for (_, flag) in &previous {
            flag.set(false);
        }
        let mut builder = FocusBuilder::new(None);
        builder.widget(&*self);
        self.focus = builder.build();

        let target = current.filter(|node| nodes.contains(node)).or_else(|| nodes.first().copied());
        if let Some(node) = target {
            self.focus(node);
        }
    }

    pub fn nodes(&self) -> impl Iterator<Item = N> + '_ {
        self.nodes.iter().map(|(node, _)| *node)
    }

    pub fn current(&self) -> Option<N> {
        self.nodes.iter().find(|(_, flag)| flag.get()).map(|(node, _)| *node)
    }

    pub fn is_focused(&self, node: N) -> bool {
        self.current() == Some(node)
    }

    /// Moves focus to `node`. Returns false when the node is not in the ring.
    pub fn focus(&mut self, node: N) -> bool {
        match self.nodes.iter().find(|(candidate, _)| *candidate == node) {
            Some((_, flag)) => {
                self.focus.focus(flag);
                true
            }
            None => false,
        }
    }

    pub fn next(&mut self) {
        if self.current().is_none() {
            self.focus_first();
            return;
        }
        self.focus.next();
    }

    pub fn prev(&mut self) {
        if self.current().is_none() {
            self.focus_first();
            return;
        }
        self.focus.prev();
    }

    fn focus_first(&mut self) {
        if let Some((node, _)) = self.nodes.first() {
            let node = *node;
            self.focus(node);
        }
    }
}

impl<N> HasFocus for FocusRing<N> {
    fn build(&self, builder: &mut FocusBuilder) {
        let tag = builder.start(self);
        self.nodes.iter().for_each(|(_, flag)| {
            builder.leaf_widget(flag);
        });
        builder.end(tag);
    }

    fn focus(&self) -> FocusFlag {
        self.container.clone()
    }

    fn area(&self) -> Rect {
        Rect::default()
    }
}
