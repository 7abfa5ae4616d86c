#![allow(clippy::new_without_default)]
//! Core types for the arbor widget toolkit.

// Core modules - public
/// Cursor shapes requested from the host.
pub mod cursor;
/// Debug dump utilities.
pub mod dump;
/// Core error types.
pub mod error;
/// Input event types.
pub mod event;
/// Layout descriptions and the layout pass.
pub mod layout;
/// Node data stored in the arena.
pub mod node;
/// Background chrome prerendering.
pub mod prerender;
/// Painter boundary and per-node frames.
pub mod render;
/// Shared node name types.
pub mod state;
/// Testing utilities.
#[cfg(any(test, feature = "testing"))]
pub mod testing;
/// Text measurement and the font cache.
pub mod text;
/// Theme definitions.
pub mod theme;

// Core modules - internal
/// Host-facing canvas.
pub mod canvas;
/// Handler context.
pub mod context;
/// Focus path management.
pub mod focus;
/// Node ID types.
pub mod id;
/// Drag and hover state.
pub mod pointer;
/// Widget arena and tree operations.
pub mod world;

// Public exports from internal modules
pub use canvas::{Canvas, CanvasConfig};
pub use context::{Context, CoreContext};
pub use focus::FocusManager;
pub use id::{NodeId, ThemeId, TypedId};
pub use pointer::{DragState, PointerState};
pub use prerender::Prerenderer;
pub use world::Core;
