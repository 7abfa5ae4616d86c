//! Arbor: a retained-mode widget toolkit core for in-game tool UIs.
//!
//! Arbor owns the widget tree, the layout constraint engine and the input
//! routing state machine. The host owns the native window and the vector
//! graphics context, feeds translated input into a [`Canvas`], and calls
//! [`Canvas::perform_layout`] and [`Canvas::draw`] once per frame.
//!
//! # Quick Start
//!
//! The main entry points are:
//! - [`Canvas`] - The host-facing root: dispatch, layout and drawing
//! - [`Core`] - The widget arena, focus path and drag state
//! - [`Widget`] - The capability traits implemented by every widget kind
//!
//! # Module Organization
//!
//! - [`geom`] - Geometry primitives (Point, Size, Rect, Margin)
//! - [`layout`] - Layout descriptions and size policies
//! - [`widgets`] - Built-in widget kinds

#![warn(missing_docs)]

// Allow paths to reference `arbor::` from within this crate
extern crate self as arbor;

// Internal core module - re-export specific items below
mod core;

// Public modules
pub mod widget;
pub mod widgets;

/// Geometry primitives.
pub mod geom {
    pub use arbor_geom::*;
}

#[cfg(any(test, feature = "testing"))]
pub use core::testing;
pub use core::{
    Canvas, CanvasConfig, Context, Core, CoreContext, DragState, FocusManager, NodeId,
    PointerState, Prerenderer, ThemeId, TypedId,
};
pub use core::{
    cursor, dump, error, event, layout, node, prerender, render, state, text, theme,
};
pub use widget::{
    Drawable, Draggable, EventOutcome, FocusAware, HitTestable, MeasureContext, Widget,
};
