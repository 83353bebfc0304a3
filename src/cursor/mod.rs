//! Cursor layer
//!
//! Cursors present one axis from one root node as a restartable,
//! randomly-indexable, document-ordered sequence:
//! - `AxisCursor`: the traversal state machine, untyped or type-filtered
//! - `SelfCursor`: the zero/one-element singleton specialization
//! - `TreeWalker`: visitor-driven pre-order walk from a singleton cursor
//!
//! A cursor is mutable iteration state, like a stream position; concurrent
//! logical reads each need their own cursor, fresh or cloned.

pub mod axis;
pub mod self_cursor;
pub mod walker;

pub use axis::AxisCursor;
pub use self_cursor::SelfCursor;
pub use walker::{TreeVisitor, TreeWalker};

use crate::model::NodeHandle;

/// The closed set of cursor shapes, chosen once at construction.
///
/// Axis dispatch itself lives in the tree model's per-axis traversers; this
/// union only distinguishes the full state machine from the degenerate
/// singleton, so evaluators can hold either behind one type.
#[derive(Clone)]
pub enum NodeCursor {
    Axis(AxisCursor),
    Singleton(SelfCursor),
}

impl NodeCursor {
    /// Last produced handle; `None` before the first resolution step on an
    /// empty axis, or after exhaustion.
    pub fn current(&self) -> Option<NodeHandle> {
        match self {
            NodeCursor::Axis(c) => c.current(),
            NodeCursor::Singleton(c) => c.node(),
        }
    }

    /// Zero-based ordinal of `current`.
    pub fn position(&self) -> usize {
        match self {
            NodeCursor::Axis(c) => c.position(),
            NodeCursor::Singleton(_) => 0,
        }
    }

    /// Advance to the next node; `false` on exhaustion.
    pub fn next_node(&mut self) -> bool {
        match self {
            NodeCursor::Axis(c) => c.next_node(),
            NodeCursor::Singleton(c) => c.next_node(),
        }
    }

    /// Total node count, forcing full materialization on first call.
    pub fn get_length(&mut self) -> usize {
        match self {
            NodeCursor::Axis(c) => c.get_length(),
            NodeCursor::Singleton(c) => c.get_length(),
        }
    }

    /// Singleton cursor for the node at `index`, without moving the
    /// visible read head.
    pub fn item(&mut self, index: usize) -> Option<SelfCursor> {
        match self {
            NodeCursor::Axis(c) => c.item(index),
            NodeCursor::Singleton(c) => c.item(index),
        }
    }

    /// Seek the read head to `index`; `false` if unreachable.
    pub fn set_current_pos(&mut self, index: usize) -> bool {
        match self {
            NodeCursor::Axis(c) => c.set_current_pos(index),
            NodeCursor::Singleton(c) => c.set_current_pos(index),
        }
    }

    /// Restart the enumeration from the first node.
    pub fn reset_iteration(&mut self) {
        match self {
            NodeCursor::Axis(c) => c.reset_iteration(),
            NodeCursor::Singleton(_) => {}
        }
    }

    /// True when the sequence is known to contain no nodes.
    pub fn is_empty(&self) -> bool {
        match self {
            NodeCursor::Axis(c) => c.is_empty(),
            NodeCursor::Singleton(c) => c.is_empty(),
        }
    }
}

impl From<AxisCursor> for NodeCursor {
    fn from(cursor: AxisCursor) -> Self {
        NodeCursor::Axis(cursor)
    }
}

impl From<SelfCursor> for NodeCursor {
    fn from(cursor: SelfCursor) -> Self {
        NodeCursor::Singleton(cursor)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::model::Axis;
    use crate::testutil::{shared, simple_tree};

    #[test]
    fn test_union_delegates_both_shapes() {
        let (tree, names) = simple_tree();
        let tree = shared(tree);

        let axis = AxisCursor::new(Arc::clone(&tree), names["a"], Axis::Child).unwrap();
        let mut cursor = NodeCursor::from(axis);
        assert_eq!(cursor.position(), 0);
        assert_eq!(cursor.current(), Some(names["b"]));
        assert!(cursor.next_node());
        assert_eq!(cursor.current(), Some(names["c"]));
        assert_eq!(cursor.get_length(), 2);
        cursor.reset_iteration();
        assert_eq!(cursor.current(), Some(names["b"]));

        let mut single = NodeCursor::from(SelfCursor::new(tree, Some(names["d"])));
        assert_eq!(single.current(), Some(names["d"]));
        assert_eq!(single.position(), 0);
        assert!(!single.next_node());
        assert_eq!(single.get_length(), 1);
        assert!(!single.is_empty());
        assert_eq!(single.item(0).and_then(|c| c.node()), Some(names["d"]));
    }
}
