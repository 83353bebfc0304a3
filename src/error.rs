//! Cursor error types
//!
//! Only programmer/configuration errors surface here. Empty query results
//! (an axis with no matches, an out-of-range index, a failed reverse seek)
//! are ordinary `false`/`None` return values, never errors.

use crate::model::{Axis, TreeId};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CursorError {
    /// The backing tree cannot serve this axis. Reported at cursor
    /// construction, never deferred to iteration time.
    #[error("axis '{0}' is not supported by the backing tree model")]
    UnsupportedAxis(Axis),

    /// A handle was presented to a tree instance that does not own it.
    #[error("handle belongs to tree {handle_tree:?}, not {expected:?}")]
    ForeignHandle { handle_tree: TreeId, expected: TreeId },

    /// The manager has no tree registered under this id.
    #[error("no tree model registered for {0:?}")]
    UnknownTree(TreeId),

    /// Source document could not be resolved or built.
    #[error("source '{uri}' failed to build: {message}")]
    SourceBuild { uri: String, message: String },

    /// An internal invariant was violated.
    #[error("internal cursor error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, CursorError>;
