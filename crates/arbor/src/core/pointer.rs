use crate::core::{
    event::{key::Mods, mouse::Button},
    id::NodeId,
};

/// An active drag capture.
///
/// While one exists, motion bypasses hit testing and goes straight to
/// `target`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragState {
    /// Widget that captured the pointer.
    pub target: NodeId,
    /// Button whose release ends the drag.
    pub button: Button,
    /// Modifiers held when the drag started.
    pub mods: Mods,
}

/// Derived view of the pointer routing state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerState {
    /// Nothing hovered, no drag.
    Idle,
    /// A widget is under the pointer.
    Hovering(NodeId),
    /// A widget holds the drag capture.
    Dragging(DragState),
}
