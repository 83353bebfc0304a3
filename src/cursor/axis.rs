//! Axis traversal cursor
//!
//! The central state machine: advances along one axis from a fixed root,
//! optionally caching visited handles, exposing every axis in document
//! order. The four reverse-native axes (ancestor, ancestor-or-self,
//! preceding, preceding-sibling) are fully materialized and reversed during
//! the first resolution step, before any node is exposed; after that they
//! read like forward axes.

use std::sync::Arc;

use log::{debug, trace};

use crate::buffer::HandleBuffer;
use crate::error::{CursorError, Result};
use crate::manager::CursorManager;
use crate::model::{Axis, AxisTraverser, NodeHandle, NodeKind, TreeModel};

use super::SelfCursor;

/// One in-progress or completed enumeration of the nodes standing in
/// relation `axis` to `root`, optionally restricted to one node kind.
///
/// The immutable tuple `(tree, root, axis, filter, traverser)` is fixed at
/// construction (`root` until rebind); everything else is iteration state.
#[derive(Clone)]
pub struct AxisCursor {
    tree: Arc<dyn TreeModel>,
    root: NodeHandle,
    axis: Axis,
    filter: Option<NodeKind>,
    traverser: &'static dyn AxisTraverser,
    /// Last produced handle; `None` on an empty axis or after exhaustion.
    current: Option<NodeHandle>,
    /// Zero-based ordinal of `current`, meaningful while not exhausted.
    position: usize,
    /// Visited handles, slot k == position k. Accumulates monotonically
    /// until exhaustion or rebind, never partially invalidated.
    cache: Option<HandleBuffer>,
    /// Known once the axis has been fully walked once; never changes after.
    length: Option<usize>,
}

impl AxisCursor {
    /// Untyped cursor over `axis` from `root`. Resolves the traverser
    /// (unsupported axes fail here, never during iteration) and performs
    /// the first resolution step.
    pub fn new(tree: Arc<dyn TreeModel>, root: NodeHandle, axis: Axis) -> Result<Self> {
        Self::with_filter(tree, root, axis, None)
    }

    /// Type-filtered cursor: the same machine, with the filter applied
    /// inside every traverser step so filtered-out nodes are never counted
    /// in `position`.
    pub fn with_filter(
        tree: Arc<dyn TreeModel>,
        root: NodeHandle,
        axis: Axis,
        filter: Option<NodeKind>,
    ) -> Result<Self> {
        if root.tree() != tree.id() {
            return Err(CursorError::ForeignHandle {
                handle_tree: root.tree(),
                expected: tree.id(),
            });
        }
        let traverser = tree.traverser(axis)?;
        let mut cursor = AxisCursor {
            tree,
            root,
            axis,
            filter,
            traverser,
            current: None,
            position: 0,
            cache: None,
            length: None,
        };
        cursor.reset_iteration();
        Ok(cursor)
    }

    /// The axis this cursor enumerates.
    #[inline]
    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// The context node the enumeration starts from.
    #[inline]
    pub fn root(&self) -> NodeHandle {
        self.root
    }

    /// The node-kind restriction, if this is the typed variant.
    #[inline]
    pub fn filter(&self) -> Option<NodeKind> {
        self.filter
    }

    /// Last produced handle.
    #[inline]
    pub fn current(&self) -> Option<NodeHandle> {
        self.current
    }

    /// Zero-based ordinal of `current`.
    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    /// True once the axis is known to contain no nodes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.length == Some(0)
    }

    /// The backing tree model.
    pub fn tree_model(&self) -> &Arc<dyn TreeModel> {
        &self.tree
    }

    /// Restart the enumeration. A populated cache serves slot 0 directly;
    /// otherwise the traverser's `first` step runs again, and a
    /// reverse-native axis re-materializes.
    pub fn reset_iteration(&mut self) {
        self.position = 0;
        if let Some(head) = self.cache.as_ref().and_then(|c| c.get(0)) {
            self.current = Some(head);
            return;
        }
        self.current = self.traverser.first(&*self.tree, self.root, self.filter);
        if self.current.is_none() {
            self.length = Some(0);
            return;
        }
        if self.axis.is_reverse() {
            self.materialize_reversed();
        }
    }

    /// Drain the native nearest-first sequence, then rebuild the cache in
    /// document order. Runs before `current` is first exposed, so callers
    /// only ever observe document order.
    fn materialize_reversed(&mut self) {
        let mut buffer = HandleBuffer::new();
        let mut at = self.current;
        while let Some(node) = at {
            buffer.push(node);
            at = self.traverser.next(&*self.tree, self.root, node, self.filter);
        }
        buffer.reverse();
        trace!(
            "materialized reverse axis {} from {:?}: {} nodes",
            self.axis,
            self.root,
            buffer.len()
        );
        self.length = Some(buffer.len());
        self.position = 0;
        self.current = buffer.get(0);
        self.cache = Some(buffer);
    }

    /// Advance to the next node on the axis. Cached entries are replayed
    /// without touching the tree model; exhaustion fixes `length` and
    /// returns `false`.
    pub fn next_node(&mut self) -> bool {
        if let Some(cache) = &self.cache {
            if self.position + 1 < cache.len() {
                self.position += 1;
                self.current = cache.get(self.position);
                return true;
            }
        }
        if let Some(length) = self.length {
            if self.position + 1 >= length {
                self.current = None;
                return false;
            }
        }
        let Some(last) = self.current else {
            return false;
        };
        match self.traverser.next(&*self.tree, self.root, last, self.filter) {
            Some(node) => {
                self.position += 1;
                self.current = Some(node);
                if let Some(cache) = &mut self.cache {
                    cache.push(node);
                }
                true
            }
            None => {
                self.length = Some(self.position + 1);
                self.current = None;
                false
            }
        }
    }

    /// Enable handle caching for this cursor. Only effective at position 0
    /// with no cache started; nodes already produced uncached cannot be
    /// recorded retroactively, so any later call is a no-op.
    pub fn set_should_cache_nodes(&mut self) {
        if self.position != 0 || self.cache.is_some() {
            return;
        }
        let mut cache = HandleBuffer::new();
        if let Some(node) = self.current {
            cache.push(node);
        }
        self.cache = Some(cache);
    }

    /// Whether a cache has been started.
    pub fn is_cached(&self) -> bool {
        self.cache.is_some()
    }

    /// Singleton cursor for the node at `index`, or `None` out of range.
    ///
    /// Reads at the current position are direct; anything else is answered
    /// from the cache, materializing through `index` if the sequence is
    /// still open. The probe never moves the caller-visible read head,
    /// though it may force a cache into existence on a cursor that would
    /// otherwise never have one.
    pub fn item(&mut self, index: usize) -> Option<SelfCursor> {
        if let Some(length) = self.length {
            if index >= length {
                return None;
            }
        }
        if index == self.position {
            if let Some(node) = self.current {
                return Some(self.singleton(node));
            }
        }
        if let Some(node) = self.cache.as_ref().and_then(|c| c.get(index)) {
            return Some(self.singleton(node));
        }
        let saved_position = self.position;
        let saved_current = self.current;
        if self.cache.is_none() {
            // Restart with the cache on so every visited slot is recorded;
            // the cache must reach the restore point as well as the probe.
            self.reset_iteration();
            self.set_should_cache_nodes();
        }
        self.seek_forward(index.max(saved_position));
        let found = self.cache.as_ref().and_then(|c| c.get(index));
        self.position = saved_position;
        self.current = saved_current;
        found.map(|node| self.singleton(node))
    }

    /// Total number of nodes on the axis. Unknown length forces a full
    /// drain, saving and restoring `(position, current)` around it.
    pub fn get_length(&mut self) -> usize {
        if let Some(length) = self.length {
            return length;
        }
        let saved_position = self.position;
        let saved_current = self.current;
        while self.next_node() {}
        let length = self.length.unwrap_or(self.position + 1);
        self.position = saved_position;
        self.current = saved_current;
        length
    }

    /// Seek the read head to `index`. Forward seeks walk `next_node`;
    /// backward seeks need a cache, since most axes have no reverse
    /// traverser, so reverse-seeking an uncached stream fails.
    pub fn set_current_pos(&mut self, index: usize) -> bool {
        if let Some(length) = self.length {
            if index >= length {
                return false;
            }
        }
        if index == self.position {
            if self.current.is_some() {
                return true;
            }
            // Exhaustion parks `position` on the last slot with no current
            // node; a cached pass can still restore it.
            let Some(node) = self.cache.as_ref().and_then(|c| c.get(index)) else {
                return false;
            };
            self.current = Some(node);
            return true;
        }
        if index < self.position {
            let Some(node) = self.cache.as_ref().and_then(|c| c.get(index)) else {
                return false;
            };
            self.position = index;
            self.current = Some(node);
            return true;
        }
        self.seek_forward(index)
    }

    fn seek_forward(&mut self, index: usize) -> bool {
        while self.position < index {
            if !self.next_node() {
                return false;
            }
        }
        self.current.is_some()
    }

    /// Independent copy: shares the immutable tuple, deep-copies the
    /// cache, carries `position`/`current`/`length` over.
    pub fn clone_cursor(&self) -> Self {
        self.clone()
    }

    /// Independent copy rewound to the first node.
    pub fn clone_with_reset(&self) -> Self {
        let mut cursor = self.clone();
        cursor.reset_iteration();
        cursor
    }

    /// Rebind the cursor to a new context node and restart. This is the
    /// reuse path for evaluating one axis expression against many context
    /// nodes.
    /// A root in a different tree instance is re-resolved through the
    /// manager; `length` and the cache are always invalidated.
    pub fn set_iteration_root(
        &mut self,
        new_root: NodeHandle,
        manager: &CursorManager,
    ) -> Result<()> {
        if new_root.tree() != self.tree.id() {
            let tree = manager.tree(new_root.tree())?;
            self.traverser = tree.traverser(self.axis)?;
            self.tree = tree;
            debug!("cursor rebound across trees to {:?}", new_root.tree());
        }
        self.root = new_root;
        self.length = None;
        self.cache = None;
        self.current = None;
        self.position = 0;
        self.reset_iteration();
        Ok(())
    }

    /// Sub-cursor over `axis` rooted at the current node.
    pub fn axis_cursor(&self, axis: Axis) -> Result<AxisCursor> {
        let Some(node) = self.current else {
            return Err(CursorError::Internal(
                "axis requested from a cursor with no current node".to_string(),
            ));
        };
        AxisCursor::new(Arc::clone(&self.tree), node, axis)
    }

    /// Type-filtered sub-cursor over `axis` rooted at the current node.
    pub fn typed_axis_cursor(&self, axis: Axis, kind: NodeKind) -> Result<AxisCursor> {
        let Some(node) = self.current else {
            return Err(CursorError::Internal(
                "axis requested from a cursor with no current node".to_string(),
            ));
        };
        AxisCursor::with_filter(Arc::clone(&self.tree), node, axis, Some(kind))
    }

    /// Disposal hint: drop iteration state eagerly. The manager, not the
    /// cursor, owns the backing tree's lifetime.
    pub fn detach(&mut self) {
        self.cache = None;
        self.current = None;
    }

    fn singleton(&self, node: NodeHandle) -> SelfCursor {
        SelfCursor::new(Arc::clone(&self.tree), Some(node))
    }
}
