use arbor_geom::{Point, Rect, Size};

use crate::core::{
    cursor::Cursor,
    id::NodeId,
    theme::Theme,
    world::{Core, FocusRequest},
};

/// The tree as seen from inside a widget handler.
///
/// The handler's own widget is out of the arena while it runs, so
/// structural requests (focus, dispose, raise) are queued and applied as
/// soon as the handler returns.
pub trait Context {
    /// The node whose handler is running.
    fn node_id(&self) -> NodeId;

    /// The root node.
    fn root_id(&self) -> NodeId;

    /// The node's parent.
    fn parent_id(&self) -> Option<NodeId>;

    /// The node's rect, relative to its parent.
    fn rect(&self) -> Rect;

    /// The node's absolute position on the canvas.
    fn absolute_position(&self) -> Point;

    /// Another node's rect, relative to its parent.
    fn node_rect(&self, node: NodeId) -> Option<Rect>;

    /// How far the node's children are scrolled.
    fn scroll_offset(&self) -> Point;

    /// Largest scroll offset the node's content allows.
    fn max_scroll(&self) -> Point;

    /// Theme in effect for the node.
    fn theme(&self) -> &Theme;

    /// Is the node on the focus path?
    fn is_focused(&self) -> bool;

    /// Is the node under the pointer?
    fn is_hovered(&self) -> bool;

    /// Does the node hold the drag capture?
    fn is_drag_target(&self) -> bool;

    /// Move the node within its parent.
    fn set_position(&mut self, pos: Point);

    /// Scroll the node's children, clamped to the content. Returns the
    /// offset applied.
    fn set_scroll_offset(&mut self, offset: Point) -> Point;

    /// Override the node's natural size.
    fn set_fixed_size(&mut self, size: Size);

    /// Change the node's hover cursor. Takes effect on the next hover change.
    fn set_cursor(&mut self, cursor: Cursor);

    /// Change the node's tooltip.
    fn set_tooltip(&mut self, tooltip: Option<String>);

    /// Focus this node.
    fn request_focus(&mut self);

    /// Focus another node.
    fn focus(&mut self, node: NodeId);

    /// Clear the focus path.
    fn clear_focus(&mut self);

    /// Dispose a node and its subtree.
    fn dispose(&mut self, node: NodeId);

    /// Raise this node above its siblings.
    fn move_to_front(&mut self);

    /// Ask the host to repaint.
    fn request_redraw(&mut self);
}

/// A [`Context`] backed by the Core.
pub struct CoreContext<'a> {
    /// Arena access.
    core: &'a mut Core,
    /// Node whose handler is running.
    node_id: NodeId,
}

impl<'a> CoreContext<'a> {
    /// Construct a context for `node_id`.
    pub fn new(core: &'a mut Core, node_id: NodeId) -> Self {
        Self { core, node_id }
    }
}

impl Context for CoreContext<'_> {
    fn node_id(&self) -> NodeId {
        self.node_id
    }

    fn root_id(&self) -> NodeId {
        self.core.root
    }

    fn parent_id(&self) -> Option<NodeId> {
        self.core.parent(self.node_id)
    }

    fn rect(&self) -> Rect {
        self.core
            .nodes
            .get(self.node_id)
            .map(|n| n.rect)
            .unwrap_or_default()
    }

    fn absolute_position(&self) -> Point {
        self.core.absolute_position(self.node_id)
    }

    fn node_rect(&self, node: NodeId) -> Option<Rect> {
        self.core.nodes.get(node).map(|n| n.rect)
    }

    fn scroll_offset(&self) -> Point {
        self.core
            .nodes
            .get(self.node_id)
            .map(|n| n.scroll)
            .unwrap_or_default()
    }

    fn max_scroll(&self) -> Point {
        self.core.max_scroll(self.node_id)
    }

    fn theme(&self) -> &Theme {
        self.core.node_theme(self.node_id)
    }

    fn is_focused(&self) -> bool {
        self.core.nodes.get(self.node_id).is_some_and(|n| n.focused)
    }

    fn is_hovered(&self) -> bool {
        self.core.hovered == Some(self.node_id)
    }

    fn is_drag_target(&self) -> bool {
        self.core.drag.is_some_and(|d| d.target == self.node_id)
    }

    fn set_position(&mut self, pos: Point) {
        self.core.set_position(self.node_id, pos);
    }

    fn set_scroll_offset(&mut self, offset: Point) -> Point {
        self.core.set_scroll_offset(self.node_id, offset)
    }

    fn set_fixed_size(&mut self, size: Size) {
        self.core.set_fixed_size(self.node_id, size);
    }

    fn set_cursor(&mut self, cursor: Cursor) {
        self.core.set_cursor(self.node_id, cursor);
    }

    fn set_tooltip(&mut self, tooltip: Option<String>) {
        if let Some(n) = self.core.nodes.get_mut(self.node_id) {
            n.tooltip = tooltip;
        }
    }

    fn request_focus(&mut self) {
        self.core.pending.focus = Some(FocusRequest::Node(self.node_id));
    }

    fn focus(&mut self, node: NodeId) {
        self.core.pending.focus = Some(FocusRequest::Node(node));
    }

    fn clear_focus(&mut self) {
        self.core.pending.focus = Some(FocusRequest::Clear);
    }

    fn dispose(&mut self, node: NodeId) {
        if !self.core.pending.dispose.contains(&node) {
            self.core.pending.dispose.push(node);
        }
    }

    fn move_to_front(&mut self) {
        self.core.pending.front.push(self.node_id);
    }

    fn request_redraw(&mut self) {
        self.core.pending.redraw = true;
    }
}
