//! Self (singleton) cursor
//!
//! Wraps exactly one handle, or none. Used for identity results -
//! whole-document and attribute/root lookups, `item()` singletons - and as
//! the starting point for the pre-order tree walker. Also carries the
//! read-only node accessor surface, forwarding through the tree contract.

use std::sync::Arc;

use crate::error::{CursorError, Result};
use crate::model::{Axis, NodeHandle, NodeKind, QName, TreeModel};

use super::AxisCursor;

/// A zero- or one-element cursor over a fixed handle.
#[derive(Clone)]
pub struct SelfCursor {
    tree: Arc<dyn TreeModel>,
    node: Option<NodeHandle>,
}

impl std::fmt::Debug for SelfCursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelfCursor")
            .field("tree", &self.tree.id())
            .field("node", &self.node)
            .finish()
    }
}

impl SelfCursor {
    /// Wrap `node` (or the empty sequence) in the given tree.
    pub fn new(tree: Arc<dyn TreeModel>, node: Option<NodeHandle>) -> Self {
        SelfCursor { tree, node }
    }

    /// The wrapped handle.
    #[inline]
    pub fn node(&self) -> Option<NodeHandle> {
        self.node
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.node.is_none()
    }

    /// The backing tree model.
    pub fn tree_model(&self) -> &Arc<dyn TreeModel> {
        &self.tree
    }

    /// 0 or 1, with no computation.
    pub fn get_length(&self) -> usize {
        usize::from(self.node.is_some())
    }

    /// The single node sits at index 0; every other index is absent.
    pub fn item(&self, index: usize) -> Option<SelfCursor> {
        if index == 0 && self.node.is_some() {
            Some(self.clone())
        } else {
            None
        }
    }

    /// The single node is already current from construction; there is
    /// never a next one.
    pub fn next_node(&mut self) -> bool {
        false
    }

    /// Only index 0 of a non-empty singleton is reachable.
    pub fn set_current_pos(&mut self, index: usize) -> bool {
        index == 0 && self.node.is_some()
    }

    /// Axis sub-cursor rooted at the wrapped node - how an evaluator moves
    /// from an identity result into a real traversal.
    pub fn axis(&self, axis: Axis) -> Result<AxisCursor> {
        let Some(node) = self.node else {
            return Err(CursorError::Internal(
                "axis requested from an empty singleton cursor".to_string(),
            ));
        };
        AxisCursor::new(Arc::clone(&self.tree), node, axis)
    }

    /// Type-filtered axis sub-cursor rooted at the wrapped node.
    pub fn typed_axis(&self, axis: Axis, kind: NodeKind) -> Result<AxisCursor> {
        let Some(node) = self.node else {
            return Err(CursorError::Internal(
                "axis requested from an empty singleton cursor".to_string(),
            ));
        };
        AxisCursor::with_filter(Arc::clone(&self.tree), node, axis, Some(kind))
    }

    /// Disposal hint for fragment-backed cursors; the cursor becomes the
    /// empty sequence.
    pub fn detach(&mut self) {
        self.node = None;
    }

    // ------------------------------------------------------------------
    // Node accessors, forwarding through the tree contract
    // ------------------------------------------------------------------

    /// Kind of the wrapped node.
    pub fn node_kind(&self) -> Option<NodeKind> {
        self.node.map(|n| self.tree.kind(n))
    }

    /// Qualified name of the wrapped node.
    pub fn name(&self) -> Option<QName<'_>> {
        self.node.and_then(|n| self.tree.name(n))
    }

    /// Namespace URI the wrapped node's name is bound to.
    pub fn namespace_uri(&self) -> Option<&str> {
        self.node.and_then(|n| self.tree.namespace_uri(n))
    }

    /// Namespace prefix of the wrapped node's name.
    pub fn prefix(&self) -> Option<&str> {
        self.name().and_then(|q| q.prefix)
    }

    /// XPath string value of the wrapped node; empty for the empty cursor.
    pub fn string_value(&self) -> String {
        self.node
            .map(|n| self.tree.string_value(n))
            .unwrap_or_default()
    }

    /// Base URI of the wrapped node, if the source carried one.
    pub fn base_uri(&self) -> Option<&str> {
        self.node.and_then(|n| self.tree.base_uri(n))
    }
}
