//! Growable handle buffer
//!
//! Index-addressable, amortized-growth storage for node handles; the
//! caching primitive behind cursor materialization. Append-only while a
//! pass is in progress - entries are never partially invalidated, only
//! cleared wholesale on rebind.

use crate::model::NodeHandle;

/// Default pre-size; most axis results are small.
const INITIAL_CAPACITY: usize = 32;

/// A growable, index-addressable array of node handles.
#[derive(Debug, Clone, Default)]
pub struct HandleBuffer {
    handles: Vec<NodeHandle>,
}

impl HandleBuffer {
    /// Create an empty buffer with the default capacity.
    pub fn new() -> Self {
        HandleBuffer {
            handles: Vec::with_capacity(INITIAL_CAPACITY),
        }
    }

    /// Create an empty buffer pre-sized for `capacity` handles.
    pub fn with_capacity(capacity: usize) -> Self {
        HandleBuffer {
            handles: Vec::with_capacity(capacity),
        }
    }

    /// Append a handle, growing as needed.
    #[inline]
    pub fn push(&mut self, handle: NodeHandle) {
        self.handles.push(handle);
    }

    /// Handle at `index`, or `None` past the end.
    #[inline]
    pub fn get(&self, index: usize) -> Option<NodeHandle> {
        self.handles.get(index).copied()
    }

    /// Number of handles recorded.
    #[inline]
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Reverse the recorded order in place. Used once per reverse-native
    /// axis pass to repair nearest-first production into document order.
    pub fn reverse(&mut self) {
        self.handles.reverse();
    }

    /// Drop all entries, keeping the allocation.
    pub fn clear(&mut self) {
        self.handles.clear();
    }

    /// The recorded handles, in order.
    pub fn as_slice(&self) -> &[NodeHandle] {
        &self.handles
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{NodeHandle, TreeId};

    fn h(n: u32) -> NodeHandle {
        NodeHandle::new(TreeId(0), n)
    }

    #[test]
    fn test_push_and_get() {
        let mut buf = HandleBuffer::new();
        assert!(buf.is_empty());
        buf.push(h(3));
        buf.push(h(7));
        assert_eq!(buf.len(), 2);
        assert_eq!(buf.get(0), Some(h(3)));
        assert_eq!(buf.get(1), Some(h(7)));
        assert_eq!(buf.get(2), None);
    }

    #[test]
    fn test_growth_past_initial_capacity() {
        let mut buf = HandleBuffer::with_capacity(2);
        for n in 0..100 {
            buf.push(h(n));
        }
        assert_eq!(buf.len(), 100);
        assert_eq!(buf.get(99), Some(h(99)));
    }

    #[test]
    fn test_reverse_and_clear() {
        let mut buf = HandleBuffer::new();
        buf.push(h(1));
        buf.push(h(2));
        buf.push(h(3));
        buf.reverse();
        assert_eq!(buf.as_slice(), &[h(3), h(2), h(1)]);
        buf.clear();
        assert!(buf.is_empty());
    }

    #[test]
    fn test_clone_is_deep() {
        let mut buf = HandleBuffer::new();
        buf.push(h(1));
        let copy = buf.clone();
        buf.push(h(2));
        assert_eq!(copy.len(), 1);
        assert_eq!(buf.len(), 2);
    }
}
