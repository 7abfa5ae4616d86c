//! Demo scenes and host plumbing for arbor.

/// Demo configuration files.
pub mod config;
/// A painter that logs and counts draw calls.
pub mod painter;
/// The toolbox scene and its input script.
pub mod toolbox;
