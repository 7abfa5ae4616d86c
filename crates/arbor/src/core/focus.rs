use tracing::debug;

use crate::core::{
    context::CoreContext,
    error::{Error, fatal},
    id::NodeId,
    world::Core,
};

/// Focus path management.
///
/// The focus path runs from the focused leaf up to the root. Every node on
/// it reports `focused`; keyboard input travels along it.
pub trait FocusManager {
    /// Focused nodes, leaf first. Empty when nothing is focused.
    fn focus_path(&self) -> &[NodeId];

    /// The focused leaf.
    fn focused(&self) -> Option<NodeId>;

    /// Is the node anywhere on the focus path?
    fn is_on_focus_path(&self, node: NodeId) -> bool;

    /// Is the node the focused leaf?
    fn is_focused(&self, node: NodeId) -> bool;

    /// Focus a node, running focus-lost and focus-gained callbacks and
    /// raising windows on the new path. Focusing the root clears focus.
    /// Returns `true` if the path changed.
    fn set_focus(&mut self, node: NodeId) -> bool;

    /// Empty the focus path. Returns `true` if anything was focused.
    fn clear_focus(&mut self) -> bool;

    /// The node itself or its nearest ancestor that accepts focus.
    fn nearest_focusable_ancestor(&self, start: NodeId) -> Option<NodeId>;

    /// Focusable, visible, enabled nodes under `root` in pre-order.
    fn focusable_nodes(&self, root: NodeId) -> Vec<NodeId>;

    /// Focus the next focusable node under `root`, wrapping around.
    fn focus_next(&mut self, root: NodeId);

    /// Focus the previous focusable node under `root`, wrapping around.
    fn focus_prev(&mut self, root: NodeId);
}

impl FocusManager for Core {
    fn focus_path(&self) -> &[NodeId] {
        &self.focus_path
    }

    fn focused(&self) -> Option<NodeId> {
        self.focus_path.first().copied()
    }

    fn is_on_focus_path(&self, node: NodeId) -> bool {
        self.focus_path.contains(&node)
    }

    fn is_focused(&self, node: NodeId) -> bool {
        self.focused() == Some(node)
    }

    fn set_focus(&mut self, node: NodeId) -> bool {
        if !self.nodes.contains_key(node) {
            fatal(Error::NodeNotFound(node));
        }
        if node == self.root {
            return self.clear_focus();
        }
        let path = self.ancestors(node);
        if path.last() != Some(&self.root) {
            debug!(?node, "ignoring focus request for detached node");
            return false;
        }
        self.set_focus_path(path, true)
    }

    fn clear_focus(&mut self) -> bool {
        self.set_focus_path(Vec::new(), false)
    }

    fn nearest_focusable_ancestor(&self, start: NodeId) -> Option<NodeId> {
        self.ancestors(start)
            .into_iter()
            .find(|id| self.accepts_focus(*id))
    }

    fn focusable_nodes(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let Some(node) = self.nodes.get(id) else {
                continue;
            };
            if !node.visible || !node.enabled {
                continue;
            }
            if self.accepts_focus(id) {
                out.push(id);
            }
            stack.extend(node.children.iter().rev());
        }
        out
    }

    fn focus_next(&mut self, root: NodeId) {
        self.cycle_focus(root, true);
    }

    fn focus_prev(&mut self, root: NodeId) {
        self.cycle_focus(root, false);
    }
}

impl Core {
    /// Does the node's widget accept focus?
    fn accepts_focus(&self, id: NodeId) -> bool {
        self.nodes
            .get(id)
            .and_then(|n| n.widget.as_deref())
            .is_some_and(|w| w.accept_focus())
    }

    /// Step through the focusable nodes under `root`.
    fn cycle_focus(&mut self, root: NodeId, forward: bool) {
        let candidates = self.focusable_nodes(root);
        if candidates.is_empty() {
            return;
        }
        let current = self
            .focused()
            .and_then(|f| candidates.iter().position(|c| *c == f));
        let n = candidates.len();
        let next = match (current, forward) {
            (Some(i), true) => (i + 1) % n,
            (Some(i), false) => (i + n - 1) % n,
            (None, true) => 0,
            (None, false) => n - 1,
        };
        self.set_focus(candidates[next]);
    }

    /// Replace the focus path and run the edge callbacks.
    ///
    /// Nodes only on the old path get focus-lost, nodes only on the new path
    /// get focus-gained. Both sets are visited from the root side towards the
    /// leaf. Nodes on both paths, including the root, get neither. With
    /// `raise`, window nodes on the new path move to the front of their
    /// siblings.
    pub(crate) fn set_focus_path(&mut self, path: Vec<NodeId>, raise: bool) -> bool {
        if path == self.focus_path {
            return false;
        }
        let old = std::mem::replace(&mut self.focus_path, path);
        let new = self.focus_path.clone();
        debug!(?old, ?new, "focus change");

        let lost: Vec<NodeId> = old.iter().rev().filter(|n| !new.contains(n)).copied().collect();
        let gained: Vec<NodeId> = new.iter().rev().filter(|n| !old.contains(n)).copied().collect();

        for id in lost {
            if let Some(node) = self.nodes.get_mut(id) {
                node.focused = false;
            }
            self.with_widget_mut(id, |w, core| {
                w.on_focus_lost(&mut CoreContext::new(core, id));
            });
        }
        for id in gained {
            if let Some(node) = self.nodes.get_mut(id) {
                node.focused = true;
            }
            self.with_widget_mut(id, |w, core| {
                w.on_focus_gained(&mut CoreContext::new(core, id));
            });
        }

        if raise {
            for id in new.iter().rev() {
                if self.nodes.get(*id).is_some_and(|n| n.window.is_some()) {
                    self.move_to_front(*id);
                }
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::probe::{self, Probe};

    #[test]
    fn transitions_skip_shared_nodes() {
        let mut core = Core::new();
        let root = core.root_id();
        let w = core.push_child(root, Probe::new("w").focusable());
        let a = core.push_child(w, Probe::new("a").focusable());
        let b = core.push_child(w, Probe::new("b").focusable());

        core.set_focus(a);
        assert_eq!(core.focus_path(), &[a, w, root]);
        assert!(core.node(w).unwrap().focused());

        probe::reset();
        assert!(core.set_focus(b));
        assert_eq!(probe::events(), vec!["a:focus_lost", "b:focus_gained"]);
        assert!(!core.node(a).unwrap().focused());
        assert!(!core.set_focus(b));

        probe::reset();
        assert!(core.set_focus(root));
        assert!(core.focus_path().is_empty());
        assert_eq!(probe::events(), vec!["w:focus_lost", "b:focus_lost"]);
        assert!(!core.clear_focus());
    }

    #[test]
    fn windows_raised_on_focus() {
        let mut core = Core::new();
        let root = core.root_id();
        let w1 = core.push_child(root, Probe::new("w1").window());
        let inner = core.push_child(w1, Probe::new("inner").focusable());
        let w2 = core.push_child(root, Probe::new("w2").window());
        assert_eq!(core.children(root), &[w1, w2]);
        core.set_focus(inner);
        assert_eq!(core.children(root), &[w2, w1]);
    }

    #[test]
    fn nearest_focusable() {
        let mut core = Core::new();
        let root = core.root_id();
        let w = core.push_child(root, Probe::new("w").focusable());
        let p = core.push_child(w, Probe::new("p"));
        let l = core.push_child(p, Probe::new("l"));
        assert_eq!(core.nearest_focusable_ancestor(l), Some(w));
        assert_eq!(core.nearest_focusable_ancestor(root), None);
    }

    #[test]
    fn tab_order_wraps() {
        let mut core = Core::new();
        let root = core.root_id();
        let a = core.push_child(root, Probe::new("a").focusable());
        let hidden = core.push_child(root, Probe::new("h").focusable());
        core.set_visible(hidden, false);
        let b = core.push_child(root, Probe::new("b").focusable());

        assert_eq!(core.focusable_nodes(root), vec![a, b]);
        core.focus_next(root);
        assert_eq!(core.focused(), Some(a));
        core.focus_next(root);
        assert_eq!(core.focused(), Some(b));
        core.focus_next(root);
        assert_eq!(core.focused(), Some(a));
        core.focus_prev(root);
        assert_eq!(core.focused(), Some(b));
    }
}
