//! treecursor - Navigation cursors over read-only node trees
//!
//! Layers:
//! - `model`: the minimal tree contract, node handles, and the 13 axis
//!   steppers (stateless, resumable)
//! - `cursor`: the axis cursor state machine, the self (singleton) cursor,
//!   and a pre-order tree walker
//! - `buffer`: the growable handle buffer backing caches and reverse-axis
//!   materialization
//! - `fragment`: a small owned tree, the reference backend and the carrier
//!   for text fragments
//! - `manager`: the tree registry that loads sources and hands out cursors
//!
//! Every axis cursor exposes nodes in document order; axes whose native
//! order runs nearest-first are materialized and reversed before the first
//! node is visible.

pub mod buffer;
pub mod cursor;
pub mod error;
pub mod fragment;
pub mod manager;
pub mod model;

#[cfg(test)]
mod testutil;

pub use buffer::HandleBuffer;
pub use cursor::{AxisCursor, NodeCursor, SelfCursor, TreeVisitor, TreeWalker};
pub use error::{CursorError, Result};
pub use fragment::FragmentTree;
pub use manager::{CursorManager, ParseOptions, SourceSpec, TreeModelBuilder};
pub use model::{
    Axis, AxisTraverser, NodeHandle, NodeIndex, NodeKind, QName, TreeId, TreeModel,
};
