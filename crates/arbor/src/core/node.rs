use arbor_geom::{Point, Rect, Size};

use crate::{
    core::{
        cursor::Cursor,
        id::{NodeId, ThemeId},
        layout::{Anchor, Layout},
    },
    state::NodeName,
    widget::Widget,
};

/// Window behaviour of a node, read from [`Widget::window`] at creation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WindowMode {
    /// Pointer input outside the window is discarded while it is on the
    /// focus path.
    pub modal: bool,
}

/// Node data stored in the arena.
pub struct Node {
    /// Widget behaviour and state. Taken out while a handler runs.
    pub(crate) widget: Option<Box<dyn Widget>>,
    /// Name for dumps and logs.
    pub(crate) name: NodeName,

    /// Owning parent.
    pub(crate) parent: Option<NodeId>,
    /// Children, back to front.
    pub(crate) children: Vec<NodeId>,

    /// Layout applied to the children.
    pub(crate) layout: Option<Layout>,
    /// Rect relative to the parent origin.
    pub(crate) rect: Rect,
    /// Per-axis natural size override, 0 for unset.
    pub(crate) fixed_size: Size,
    /// Share of surplus space in a stretching parent layout.
    pub(crate) stretch: f32,
    /// Cell placement in a grid parent.
    pub(crate) anchor: Option<Anchor>,
    /// Offset subtracted from the children's positions.
    pub(crate) scroll: Point,

    /// Drawn and hit-tested.
    pub(crate) visible: bool,
    /// Receives pointer input.
    pub(crate) enabled: bool,
    /// On the focus path.
    pub(crate) focused: bool,
    /// Under the pointer.
    pub(crate) hovered: bool,

    /// Cursor shown while hovered.
    pub(crate) cursor: Cursor,
    /// Tooltip text.
    pub(crate) tooltip: Option<String>,
    /// Theme in effect.
    pub(crate) theme: ThemeId,
    /// Window behaviour, for top-level windows.
    pub(crate) window: Option<WindowMode>,
}

impl Node {
    /// Wrap a widget in a fresh, detached node.
    pub(crate) fn new(widget: Box<dyn Widget>, theme: ThemeId) -> Self {
        Self {
            name: widget.name(),
            cursor: widget.cursor(),
            window: widget.window(),
            widget: Some(widget),
            parent: None,
            children: Vec::new(),
            layout: None,
            rect: Rect::zero(),
            fixed_size: Size::ZERO,
            stretch: 1.0,
            anchor: None,
            scroll: Point::ZERO,
            visible: true,
            enabled: true,
            focused: false,
            hovered: false,
            tooltip: None,
            theme,
        }
    }

    /// Return the node's name.
    pub fn name(&self) -> &NodeName {
        &self.name
    }

    /// Return the node's parent, if any.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Return the node's children, back to front.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Return the layout applied to the children.
    pub fn layout(&self) -> Option<Layout> {
        self.layout
    }

    /// Return the rect relative to the parent origin.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Return the position relative to the parent origin.
    pub fn position(&self) -> Point {
        self.rect.pos
    }

    /// Return the assigned size.
    pub fn size(&self) -> Size {
        self.rect.size
    }

    /// Return the fixed-size override.
    pub fn fixed_size(&self) -> Size {
        self.fixed_size
    }

    /// Return the stretch weight.
    pub fn stretch(&self) -> f32 {
        self.stretch
    }

    /// Return the grid anchor.
    pub fn anchor(&self) -> Option<Anchor> {
        self.anchor
    }

    /// Return the offset by which the children are scrolled.
    pub fn scroll_offset(&self) -> Point {
        self.scroll
    }

    /// Return true if the node is drawn and hit-tested.
    pub fn visible(&self) -> bool {
        self.visible
    }

    /// Return true if the node receives pointer input.
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Return true if the node is on the focus path.
    pub fn focused(&self) -> bool {
        self.focused
    }

    /// Return true if the node is under the pointer.
    pub fn hovered(&self) -> bool {
        self.hovered
    }

    /// Return the hover cursor.
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Return the tooltip text.
    pub fn tooltip(&self) -> Option<&str> {
        self.tooltip.as_deref()
    }

    /// Return the theme id.
    pub fn theme(&self) -> ThemeId {
        self.theme
    }

    /// Return the window mode, for top-level windows.
    pub fn window(&self) -> Option<WindowMode> {
        self.window
    }

    /// Return true for a modal window.
    pub fn is_modal(&self) -> bool {
        self.window.is_some_and(|w| w.modal)
    }
}
