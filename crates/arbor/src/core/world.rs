use std::{any::Any, mem};

use arbor_geom::{Point, Rect, Size};
use slotmap::SlotMap;
use tracing::{debug, trace, warn};

use crate::{
    core::{
        context::{Context, CoreContext},
        cursor::Cursor,
        error::{Error, OrFatal, Result, fatal},
        focus::FocusManager,
        id::{NodeId, ThemeId, TypedId},
        layout::{Anchor, Layout},
        node::Node,
        pointer::{DragState, PointerState},
        theme::Theme,
    },
    widget::{Drawable, Draggable, EventOutcome, FocusAware, HitTestable, Widget},
};

/// Upper bound on handler request rounds processed after one event.
const MAX_FLUSH_ROUNDS: usize = 16;

/// A focus change requested from inside a handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FocusRequest {
    /// Focus this node.
    Node(NodeId),
    /// Clear the focus path.
    Clear,
}

/// Requests queued by handlers while their widget is out of its slot.
#[derive(Debug, Default)]
pub(crate) struct Pending {
    /// Latest focus request wins.
    pub(crate) focus: Option<FocusRequest>,
    /// Nodes to raise within their parent.
    pub(crate) front: Vec<NodeId>,
    /// Nodes to dispose.
    pub(crate) dispose: Vec<NodeId>,
    /// A handler asked for a repaint.
    pub(crate) redraw: bool,
}

impl Pending {
    /// Nothing structural is queued.
    fn is_idle(&self) -> bool {
        self.focus.is_none() && self.front.is_empty() && self.dispose.is_empty()
    }
}

/// The widget arena with the focus path, drag capture and hover slot.
pub struct Core {
    /// Node storage arena.
    pub(crate) nodes: SlotMap<NodeId, Node>,
    /// Root node ID.
    pub(crate) root: NodeId,
    /// Registered themes.
    pub(crate) themes: SlotMap<ThemeId, Theme>,
    /// Focused nodes, leaf first, ending at the root. Empty when unfocused.
    pub(crate) focus_path: Vec<NodeId>,
    /// Active drag capture.
    pub(crate) drag: Option<DragState>,
    /// Node under the pointer.
    pub(crate) hovered: Option<NodeId>,
    /// Handler requests awaiting application.
    pub(crate) pending: Pending,
}

impl Core {
    /// Create a Core with a root node and the default theme.
    pub fn new() -> Self {
        let mut themes = SlotMap::with_key();
        let theme = themes.insert(Theme::default());
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(Node::new(Box::new(RootWidget), theme));
        Self {
            nodes,
            root,
            themes,
            focus_path: Vec::new(),
            drag: None,
            hovered: None,
            pending: Pending::default(),
        }
    }

    /// Root node ID.
    pub fn root_id(&self) -> NodeId {
        self.root
    }

    /// Look up a node.
    pub fn node(&self, id: impl Into<NodeId>) -> Option<&Node> {
        self.nodes.get(id.into())
    }

    /// Does the id resolve to a live node?
    pub fn is_alive(&self, id: impl Into<NodeId>) -> bool {
        self.nodes.contains_key(id.into())
    }

    /// Number of live nodes, including the root.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: the root lives as long as the Core.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Parent of a node.
    pub fn parent(&self, id: impl Into<NodeId>) -> Option<NodeId> {
        self.nodes.get(id.into()).and_then(|n| n.parent)
    }

    /// Children of a node, back to front. Empty for a stale id.
    pub fn children(&self, id: impl Into<NodeId>) -> &[NodeId] {
        self.nodes
            .get(id.into())
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    /// Borrow a node, aborting on a stale id.
    #[track_caller]
    pub(crate) fn get(&self, id: NodeId) -> &Node {
        match self.nodes.get(id) {
            Some(n) => n,
            None => fatal(Error::NodeNotFound(id)),
        }
    }

    /// Mutably borrow a node, aborting on a stale id.
    #[track_caller]
    pub(crate) fn get_mut(&mut self, id: NodeId) -> &mut Node {
        match self.nodes.get_mut(id) {
            Some(n) => n,
            None => fatal(Error::NodeNotFound(id)),
        }
    }

    /// Create a node with no parent. It is neither drawn nor routed until
    /// attached.
    pub fn create_detached(&mut self, widget: impl Into<Box<dyn Widget>>) -> NodeId {
        let theme = self.get(self.root).theme;
        let id = self.nodes.insert(Node::new(widget.into(), theme));
        trace!(?id, name = %self.nodes[id].name, "created node");
        id
    }

    /// Insert a detached node into `parent`'s children at `index`.
    pub fn try_attach(&mut self, parent: NodeId, index: usize, child: NodeId) -> Result<()> {
        let len = self
            .nodes
            .get(parent)
            .ok_or(Error::NodeNotFound(parent))?
            .children
            .len();
        let child_node = self.nodes.get(child).ok_or(Error::NodeNotFound(child))?;
        if child_node.parent.is_some() || child == self.root {
            return Err(Error::AlreadyAttached(child));
        }
        if self.is_ancestor(child, parent) {
            return Err(Error::WouldCreateCycle { parent, child });
        }
        if index > len {
            return Err(Error::IndexOutOfBounds { index, len });
        }
        self.nodes[parent].children.insert(index, child);
        self.nodes[child].parent = Some(parent);
        let theme = self.nodes[parent].theme;
        self.propagate_theme(child, theme);
        Ok(())
    }

    /// Insert a detached node, aborting on a programming error.
    #[track_caller]
    pub fn attach(&mut self, parent: NodeId, index: usize, child: NodeId) {
        self.try_attach(parent, index, child).or_fatal();
    }

    /// Create a node and insert it into `parent`'s children at `index`.
    #[track_caller]
    pub fn add_child(
        &mut self,
        parent: NodeId,
        index: usize,
        widget: impl Into<Box<dyn Widget>>,
    ) -> NodeId {
        let child = self.create_detached(widget);
        if let Err(e) = self.try_attach(parent, index, child) {
            self.nodes.remove(child);
            fatal(e);
        }
        child
    }

    /// Create a node and append it to `parent`'s children.
    #[track_caller]
    pub fn push_child(&mut self, parent: NodeId, widget: impl Into<Box<dyn Widget>>) -> NodeId {
        let index = self.get(parent).children.len();
        self.add_child(parent, index, widget)
    }

    /// Append a widget and keep its concrete type in the returned id.
    #[track_caller]
    pub fn push<W: Widget>(&mut self, parent: NodeId, widget: W) -> TypedId<W> {
        TypedId::new(self.push_child(parent, widget))
    }

    /// Dispose `child`, which must be one of `parent`'s children.
    pub fn try_remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        let p = self.nodes.get(parent).ok_or(Error::NodeNotFound(parent))?;
        if !p.children.contains(&child) {
            return Err(Error::NotAChild { parent, child });
        }
        self.try_dispose(child)
    }

    /// Dispose a child, aborting on a programming error.
    #[track_caller]
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) {
        self.try_remove_child(parent, child).or_fatal();
    }

    /// Dispose the child at `index`.
    pub fn try_remove_child_at(&mut self, parent: NodeId, index: usize) -> Result<()> {
        let children = &self.nodes.get(parent).ok_or(Error::NodeNotFound(parent))?.children;
        let child = *children.get(index).ok_or(Error::IndexOutOfBounds {
            index,
            len: children.len(),
        })?;
        self.try_dispose(child)
    }

    /// Dispose the child at `index`, aborting on a programming error.
    #[track_caller]
    pub fn remove_child_at(&mut self, parent: NodeId, index: usize) {
        self.try_remove_child_at(parent, index).or_fatal();
    }

    /// Destroy a node and its subtree.
    ///
    /// The subtree is first cleared from the focus path (with focus-lost
    /// callbacks), the drag capture and the hover slot. Then it is detached
    /// and every node freed; its ids never resolve again.
    pub fn try_dispose(&mut self, id: NodeId) -> Result<()> {
        if !self.nodes.contains_key(id) {
            return Err(Error::NodeNotFound(id));
        }
        if id == self.root {
            return Err(Error::RootRemoval);
        }
        let doomed = self.subtree_post_order(id);

        if self.focus_path.iter().any(|n| doomed.contains(n)) {
            let survivors: Vec<NodeId> = self
                .focus_path
                .iter()
                .filter(|n| !doomed.contains(n))
                .copied()
                .collect();
            let survivors = if survivors.len() <= 1 {
                Vec::new()
            } else {
                survivors
            };
            self.set_focus_path(survivors, false);
        }
        if self.drag.is_some_and(|d| doomed.contains(&d.target)) {
            debug!(?id, "drag target disposed, drag cleared");
            self.drag = None;
        }
        if self.hovered.is_some_and(|h| doomed.contains(&h)) {
            self.hovered = None;
        }

        if let Some(parent) = self.nodes.get(id).and_then(|n| n.parent)
            && let Some(p) = self.nodes.get_mut(parent)
        {
            p.children.retain(|c| *c != id);
        }
        for n in &doomed {
            self.nodes.remove(*n);
        }
        debug!(?id, count = doomed.len(), "disposed subtree");
        Ok(())
    }

    /// Destroy a node and its subtree, aborting on a programming error.
    #[track_caller]
    pub fn dispose(&mut self, id: NodeId) {
        self.try_dispose(id).or_fatal();
    }

    /// Move a node to the end of its parent's children: drawn last, hit
    /// first.
    pub fn move_to_front(&mut self, id: NodeId) {
        let Some(parent) = self.get(id).parent else {
            return;
        };
        let children = &mut self.get_mut(parent).children;
        if children.last() == Some(&id) {
            return;
        }
        children.retain(|c| *c != id);
        children.push(id);
        trace!(?id, "moved to front");
    }

    /// Is `ancestor` equal to `node` or one of its ancestors?
    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut cur = Some(node);
        while let Some(id) = cur {
            if id == ancestor {
                return true;
            }
            cur = self.nodes.get(id).and_then(|n| n.parent);
        }
        false
    }

    /// The node followed by its ancestors, ending at the topmost one.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut cur = Some(id);
        while let Some(n) = cur {
            out.push(n);
            cur = self.nodes.get(n).and_then(|n| n.parent);
        }
        out
    }

    /// Collect a subtree in pre-order, including its root.
    pub fn subtree(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let Some(node) = self.nodes.get(id) else {
                continue;
            };
            out.push(id);
            stack.extend(node.children.iter().rev());
        }
        out
    }

    /// Collect a subtree in post-order, including its root.
    fn subtree_post_order(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = self.subtree(root);
        out.reverse();
        out
    }

    /// Sum of rect positions from the node up to the topmost ancestor, less
    /// the scroll offsets of its ancestors.
    pub fn absolute_position(&self, id: NodeId) -> Point {
        let node = self.get(id);
        let mut pos = node.rect.pos;
        let mut cur = node.parent;
        while let Some(n) = cur {
            let node = self.get(n);
            pos += node.rect.pos - node.scroll;
            cur = node.parent;
        }
        pos
    }

    /// The node's rect in canvas coordinates.
    pub fn absolute_rect(&self, id: NodeId) -> Rect {
        Rect::from_parts(self.absolute_position(id), self.get(id).rect.size)
    }

    /// Absolute origin of the space the node's rect lives in: the parent's
    /// position shifted by its scroll offset, or zero for the root.
    pub(crate) fn parent_origin(&self, id: NodeId) -> Point {
        match self.get(id).parent {
            Some(p) => self.absolute_position(p) - self.get(p).scroll,
            None => Point::ZERO,
        }
    }

    /// Is the node alive and accepting pointer input?
    pub fn is_enabled(&self, id: NodeId) -> bool {
        self.nodes.get(id).is_some_and(|n| n.enabled)
    }

    /// Bottom-right corner of the node's visible children, in the space its
    /// children are laid out in.
    pub fn content_extent(&self, id: NodeId) -> Size {
        self.get(id)
            .children
            .iter()
            .map(|c| self.get(*c))
            .filter(|n| n.visible)
            .fold(Size::ZERO, |m, n| {
                m.max(Size::new(n.rect.right(), n.rect.bottom()))
            })
    }

    /// Largest scroll offset that keeps the node's content covering it.
    pub fn max_scroll(&self, id: NodeId) -> Point {
        let extent = self.content_extent(id);
        let size = self.get(id).rect.size;
        Point::new(
            (extent.width - size.width).max(0.0),
            (extent.height - size.height).max(0.0),
        )
    }

    /// Scroll the node's children, clamped to `[0, max_scroll]`.
    pub fn set_scroll_offset(&mut self, id: NodeId, offset: Point) -> Point {
        let max = self.max_scroll(id);
        let offset = Point::new(offset.x.clamp(0.0, max.x), offset.y.clamp(0.0, max.y));
        self.get_mut(id).scroll = offset;
        offset
    }

    /// Does the node claim `point`, given in its parent's space?
    pub fn contains(&self, id: NodeId, point: Point) -> bool {
        let node = self.get(id);
        match node.widget.as_deref() {
            Some(w) => w.hit_test(point, node.rect),
            None => node.rect.contains(point),
        }
    }

    /// The frontmost visible node under a canvas point.
    pub fn find_widget(&self, point: Point) -> Option<NodeId> {
        let root = self.get(self.root);
        if !root.visible || !self.contains(self.root, point) {
            trace!(?point, "hit test missed the root");
            return None;
        }
        let hit = locate_recursive(self, self.root, point - root.rect.pos);
        trace!(?point, ?hit, "hit test");
        Some(hit)
    }

    /// Set a node's position relative to its parent.
    pub fn set_position(&mut self, id: NodeId, pos: Point) {
        self.get_mut(id).rect.pos = pos;
    }

    /// Set a node's size directly. Layout passes overwrite it for nodes
    /// placed by a parent.
    pub fn set_size(&mut self, id: NodeId, size: Size) {
        self.get_mut(id).rect.size = size;
    }

    /// Override the natural size per axis; zero leaves an axis unset.
    pub fn set_fixed_size(&mut self, id: NodeId, size: Size) {
        self.get_mut(id).fixed_size = size.non_negative();
    }

    /// Show or hide a node. Hidden nodes are skipped by layout, drawing and
    /// hit testing.
    pub fn set_visible(&mut self, id: NodeId, visible: bool) {
        self.get_mut(id).visible = visible;
    }

    /// Enable or disable pointer input on a node.
    pub fn set_enabled(&mut self, id: NodeId, enabled: bool) {
        self.get_mut(id).enabled = enabled;
    }

    /// Set the stretch weight. Zero keeps the node at its natural size.
    pub fn set_stretch(&mut self, id: NodeId, stretch: f32) {
        self.get_mut(id).stretch = stretch.max(0.0);
    }

    /// Set or clear the grid anchor.
    pub fn set_anchor(&mut self, id: NodeId, anchor: Option<Anchor>) {
        self.get_mut(id).anchor = anchor;
    }

    /// Set or clear the tooltip.
    pub fn set_tooltip(&mut self, id: NodeId, tooltip: Option<&str>) {
        self.get_mut(id).tooltip = tooltip.map(str::to_owned);
    }

    /// Set the hover cursor.
    pub fn set_cursor(&mut self, id: NodeId, cursor: Cursor) {
        self.get_mut(id).cursor = cursor;
    }

    /// Set or clear the layout applied to a node's children.
    pub fn set_layout(&mut self, id: NodeId, layout: Option<Layout>) {
        self.get_mut(id).layout = layout;
    }

    /// Register a theme.
    pub fn add_theme(&mut self, theme: Theme) -> ThemeId {
        self.themes.insert(theme)
    }

    /// Look up a registered theme.
    pub fn theme(&self, id: ThemeId) -> Option<&Theme> {
        self.themes.get(id)
    }

    /// Mutably look up a registered theme.
    pub fn theme_mut(&mut self, id: ThemeId) -> Option<&mut Theme> {
        self.themes.get_mut(id)
    }

    /// The theme in effect for a node.
    pub fn node_theme(&self, id: NodeId) -> &Theme {
        let theme = self.get(id).theme;
        match self.themes.get(theme) {
            Some(t) => t,
            None => fatal(Error::ThemeNotFound(theme)),
        }
    }

    /// Apply a theme to a node and its whole subtree.
    pub fn try_set_theme(&mut self, id: NodeId, theme: ThemeId) -> Result<()> {
        if !self.themes.contains_key(theme) {
            return Err(Error::ThemeNotFound(theme));
        }
        if !self.nodes.contains_key(id) {
            return Err(Error::NodeNotFound(id));
        }
        self.propagate_theme(id, theme);
        Ok(())
    }

    /// Apply a theme to a subtree, aborting on a programming error.
    #[track_caller]
    pub fn set_theme(&mut self, id: NodeId, theme: ThemeId) {
        self.try_set_theme(id, theme).or_fatal();
    }

    /// Write a theme id into every node of a subtree.
    fn propagate_theme(&mut self, id: NodeId, theme: ThemeId) {
        for n in self.subtree(id) {
            self.nodes[n].theme = theme;
        }
    }

    /// Borrow a widget as its concrete type.
    pub fn widget<W: Widget>(&self, id: impl Into<NodeId>) -> Option<&W> {
        let w = self.nodes.get(id.into())?.widget.as_deref()?;
        (w as &dyn Any).downcast_ref::<W>()
    }

    /// Mutably borrow a widget as its concrete type.
    pub fn widget_mut<W: Widget>(&mut self, id: impl Into<NodeId>) -> Option<&mut W> {
        let w = self.nodes.get_mut(id.into())?.widget.as_deref_mut()?;
        (w as &mut dyn Any).downcast_mut::<W>()
    }

    /// Run `f` against a widget of concrete type `W` with a handler
    /// context. Requests made through the context are applied before this
    /// returns.
    pub fn with_widget<W: Widget, R>(
        &mut self,
        id: impl Into<NodeId>,
        f: impl FnOnce(&mut W, &mut dyn Context) -> R,
    ) -> Option<R> {
        let id = id.into();
        let out = self
            .with_widget_mut(id, |w, core| {
                let w = (w as &mut dyn Any).downcast_mut::<W>()?;
                let mut ctx = CoreContext::new(core, id);
                Some(f(w, &mut ctx))
            })
            .flatten();
        self.flush_pending();
        out
    }

    /// Take a widget out of its slot for a single call.
    ///
    /// The widget goes back into the slot when `f` returns or unwinds, unless
    /// the node was freed meanwhile. Returns `None` if the node is gone or
    /// its widget is already out.
    pub(crate) fn with_widget_mut<R>(
        &mut self,
        id: NodeId,
        f: impl FnOnce(&mut dyn Widget, &mut Self) -> R,
    ) -> Option<R> {
        let Some(widget) = self.nodes.get_mut(id).and_then(|n| n.widget.take()) else {
            trace!(?id, "widget unavailable");
            return None;
        };
        let mut slot = scopeguard::guard((self, widget), move |(core, widget)| {
            if let Some(node) = core.nodes.get_mut(id) {
                node.widget = Some(widget);
            }
        });
        let (core, widget) = &mut *slot;
        Some(f(&mut **widget, core))
    }

    /// Deliver a call to one node. `f` receives the absolute position of the
    /// node's parent, for translating canvas coordinates.
    pub(crate) fn deliver(
        &mut self,
        id: NodeId,
        f: impl FnOnce(&mut dyn Widget, &mut dyn Context, Point) -> EventOutcome,
    ) -> EventOutcome {
        if !self.nodes.contains_key(id) {
            return EventOutcome::Ignore;
        }
        let origin = self.parent_origin(id);
        self.with_widget_mut(id, |w, core| {
            let mut ctx = CoreContext::new(core, id);
            f(w, &mut ctx, origin)
        })
        .unwrap_or(EventOutcome::Ignore)
    }

    /// Deliver to `start`, then to each ancestor, until a handler consumes
    /// the event. Disabled nodes are skipped.
    pub(crate) fn bubble(
        &mut self,
        start: NodeId,
        f: impl FnMut(&mut dyn Widget, &mut dyn Context, Point) -> EventOutcome,
    ) -> EventOutcome {
        self.bubble_skipping(start, None, f)
    }

    /// Like [`Core::bubble`], but `skip` is passed over if it lies on the
    /// chain.
    pub(crate) fn bubble_skipping(
        &mut self,
        start: NodeId,
        skip: Option<NodeId>,
        mut f: impl FnMut(&mut dyn Widget, &mut dyn Context, Point) -> EventOutcome,
    ) -> EventOutcome {
        let mut cur = Some(start);
        while let Some(id) = cur {
            let Some(node) = self.nodes.get(id) else {
                break;
            };
            cur = node.parent;
            if !node.enabled || skip == Some(id) {
                continue;
            }
            let outcome = self.deliver(id, &mut f);
            if outcome.consumed() {
                trace!(?id, ?outcome, "event consumed");
                return outcome;
            }
        }
        EventOutcome::Ignore
    }

    /// Apply requests queued by handlers: focus, raise, dispose.
    ///
    /// Focus callbacks may queue further requests, so this repeats until the
    /// queue settles.
    pub(crate) fn flush_pending(&mut self) {
        for _ in 0..MAX_FLUSH_ROUNDS {
            if self.pending.is_idle() {
                return;
            }
            match self.pending.focus.take() {
                Some(FocusRequest::Node(id)) if self.nodes.contains_key(id) => {
                    self.set_focus(id);
                }
                Some(FocusRequest::Node(id)) => trace!(?id, "dropping focus request for dead node"),
                Some(FocusRequest::Clear) => {
                    self.clear_focus();
                }
                None => {}
            }
            for id in mem::take(&mut self.pending.front) {
                if self.nodes.contains_key(id) {
                    self.move_to_front(id);
                }
            }
            for id in mem::take(&mut self.pending.dispose) {
                if self.nodes.contains_key(id) {
                    self.dispose(id);
                } else {
                    trace!(?id, "already disposed with an ancestor");
                }
            }
        }
        warn!("handler requests did not settle");
    }

    /// The active drag capture.
    pub fn drag_state(&self) -> Option<DragState> {
        self.drag
    }

    /// The node under the pointer.
    pub fn hovered(&self) -> Option<NodeId> {
        self.hovered
    }

    /// Combined view of drag and hover state.
    pub fn pointer_state(&self) -> PointerState {
        match (self.drag, self.hovered) {
            (Some(d), _) => PointerState::Dragging(d),
            (None, Some(h)) => PointerState::Hovering(h),
            (None, None) => PointerState::Idle,
        }
    }
}

/// Descend into the frontmost visible child claiming `point`, given in the
/// space of `id`'s own origin.
fn locate_recursive(core: &Core, id: NodeId, point: Point) -> NodeId {
    let local = point + core.nodes[id].scroll;
    for child in core.nodes[id].children.iter().rev() {
        let node = &core.nodes[*child];
        if node.visible && core.contains(*child, local) {
            return locate_recursive(core, *child, local - node.rect.pos);
        }
    }
    id
}

/// Widget for the implicit root node.
struct RootWidget;

impl Drawable for RootWidget {}
impl HitTestable for RootWidget {}
impl FocusAware for RootWidget {}
impl Draggable for RootWidget {}

impl Widget for RootWidget {
    fn name(&self) -> crate::state::NodeName {
        crate::state::NodeName::convert("root")
    }
}
