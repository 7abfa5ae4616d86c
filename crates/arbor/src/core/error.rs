use std::result::Result as StdResult;

use thiserror::Error;

use crate::core::id::{NodeId, ThemeId};

/// Result type for arbor-core operations.
pub type Result<T> = StdResult<T, Error>;

/// Invariant violations in the widget tree and layout engine.
///
/// Every variant is a programming error. The `try_*` operations on
/// [`Core`](crate::Core) return them so tests can inspect them; the plain
/// operations pass them to [`fatal`].
#[derive(PartialEq, Eq, Error, Debug, Clone)]
pub enum Error {
    /// The node is already owned by a parent.
    #[error("node {0:?} already has a parent")]
    AlreadyAttached(NodeId),

    /// Attaching would make a node its own ancestor.
    #[error("attaching {child:?} under {parent:?} would create a cycle")]
    WouldCreateCycle {
        /// Prospective parent.
        parent: NodeId,
        /// Prospective child.
        child: NodeId,
    },

    /// The node is not among the parent's children.
    #[error("{child:?} is not a child of {parent:?}")]
    NotAChild {
        /// Parent that was searched.
        parent: NodeId,
        /// Node that was not found.
        child: NodeId,
    },

    /// The id is stale or was never issued by this arena.
    #[error("node {0:?} does not exist")]
    NodeNotFound(NodeId),

    /// The root lives as long as its canvas.
    #[error("the root node cannot be removed")]
    RootRemoval,

    /// A child index past the end of a children list.
    #[error("index {index} out of bounds for {len} children")]
    IndexOutOfBounds {
        /// Requested index.
        index: usize,
        /// Number of children.
        len: usize,
    },

    /// A layout with an inherited policy and no ancestor policy to inherit.
    #[error("layout on {0:?} inherits a size policy but no ancestor defines one")]
    UnresolvedPolicy(NodeId),

    /// A node name containing characters outside `[a-z0-9_]`.
    #[error("invalid node name: {0:?}")]
    InvalidName(String),

    /// The theme id is not registered.
    #[error("theme {0:?} does not exist")]
    ThemeNotFound(ThemeId),

    /// Writing diagnostic output failed.
    #[error("output: {0}")]
    Output(String),
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Output(e.to_string())
    }
}

/// Abort on a programming error.
///
/// Invariant violations are fatal in every build profile: the error is logged
/// and the thread panics. Nothing in arbor recovers from one silently.
#[track_caller]
pub fn fatal(err: Error) -> ! {
    tracing::error!(%err, "arbor invariant violated");
    panic!("{err}");
}

/// Unwrap a core result, aborting on a programming error.
pub(crate) trait OrFatal<T> {
    /// Return the value or abort via [`fatal`].
    fn or_fatal(self) -> T;
}

impl<T> OrFatal<T> for Result<T> {
    #[track_caller]
    fn or_fatal(self) -> T {
        match self {
            Ok(v) => v,
            Err(e) => fatal(e),
        }
    }
}
