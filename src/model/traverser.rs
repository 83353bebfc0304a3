//! Per-axis stateless traversers
//!
//! Each axis is a stateless `first`/`next` stepper over the tree contract's
//! structural primitives. `next` is always called with the last handle the
//! traverser actually produced; stepping never depends on any other hidden
//! state, which is what lets one traverser instance serve every cursor.
//!
//! Reverse axes (ancestor, ancestor-or-self, preceding, preceding-sibling)
//! step nearest-first here; the cursor layer materializes and reverses them.

use super::{Axis, NodeHandle, NodeKind, TreeModel};

/// Stateless stepping for one axis.
///
/// A type filter is applied inside the step, so filtered-out nodes are never
/// produced and never counted in a cursor's position.
pub trait AxisTraverser: Sync {
    /// The first node on the axis from `root`, or `None` for an empty axis.
    fn first(
        &self,
        tree: &dyn TreeModel,
        root: NodeHandle,
        filter: Option<NodeKind>,
    ) -> Option<NodeHandle>;

    /// The node after `current` on the axis from `root`.
    fn next(
        &self,
        tree: &dyn TreeModel,
        root: NodeHandle,
        current: NodeHandle,
        filter: Option<NodeKind>,
    ) -> Option<NodeHandle>;
}

/// Look up the traverser serving `axis`.
pub fn resolve(axis: Axis) -> &'static dyn AxisTraverser {
    match axis {
        Axis::SelfAxis => &SelfTraverser,
        Axis::Child => &ChildTraverser,
        Axis::Parent => &ParentTraverser,
        Axis::Ancestor => &AncestorTraverser,
        Axis::AncestorOrSelf => &AncestorOrSelfTraverser,
        Axis::Descendant => &DescendantTraverser,
        Axis::DescendantOrSelf => &DescendantOrSelfTraverser,
        Axis::Following => &FollowingTraverser,
        Axis::FollowingSibling => &FollowingSiblingTraverser,
        Axis::Preceding => &PrecedingTraverser,
        Axis::PrecedingSibling => &PrecedingSiblingTraverser,
        Axis::Attribute => &AttributeTraverser,
        Axis::Namespace => &NamespaceTraverser,
    }
}

#[inline]
fn matches(tree: &dyn TreeModel, node: NodeHandle, filter: Option<NodeKind>) -> bool {
    filter.is_none_or(|kind| tree.kind(node) == kind)
}

/// Walk `step` from `start` until a node passes the filter.
fn scan<F>(
    tree: &dyn TreeModel,
    filter: Option<NodeKind>,
    start: Option<NodeHandle>,
    step: F,
) -> Option<NodeHandle>
where
    F: Fn(&dyn TreeModel, NodeHandle) -> Option<NodeHandle>,
{
    let mut candidate = start;
    while let Some(node) = candidate {
        if matches(tree, node, filter) {
            return Some(node);
        }
        candidate = step(tree, node);
    }
    None
}

/// Pre-order successor within the subtree rooted at `root` (excluded).
fn next_in_subtree(tree: &dyn TreeModel, root: NodeHandle, node: NodeHandle) -> Option<NodeHandle> {
    if let Some(child) = tree.first_child(node) {
        return Some(child);
    }
    let mut at = node;
    while at != root {
        if let Some(sibling) = tree.next_sibling(at) {
            return Some(sibling);
        }
        at = tree.parent(at)?;
    }
    None
}

/// First node after the whole subtree of `node`, climbing the parent chain.
fn next_after_subtree(tree: &dyn TreeModel, node: NodeHandle) -> Option<NodeHandle> {
    let mut at = node;
    loop {
        if let Some(sibling) = tree.next_sibling(at) {
            return Some(sibling);
        }
        at = tree.parent(at)?;
    }
}

/// Unbounded pre-order successor: descend, else climb to a next sibling.
fn preorder_step(tree: &dyn TreeModel, node: NodeHandle) -> Option<NodeHandle> {
    if let Some(child) = tree.first_child(node) {
        return Some(child);
    }
    next_after_subtree(tree, node)
}

/// Reverse pre-order predecessor: previous sibling's deepest last
/// descendant, else the parent.
fn reverse_preorder_step(tree: &dyn TreeModel, node: NodeHandle) -> Option<NodeHandle> {
    match tree.prev_sibling(node) {
        Some(prev) => Some(deepest_last(tree, prev)),
        None => tree.parent(node),
    }
}

fn deepest_last(tree: &dyn TreeModel, node: NodeHandle) -> NodeHandle {
    let mut at = node;
    while let Some(child) = tree.first_child(at) {
        let mut last = child;
        while let Some(sibling) = tree.next_sibling(last) {
            last = sibling;
        }
        at = last;
    }
    at
}

fn is_ancestor_of(tree: &dyn TreeModel, candidate: NodeHandle, node: NodeHandle) -> bool {
    let mut at = tree.parent(node);
    while let Some(ancestor) = at {
        if ancestor == candidate {
            return true;
        }
        at = tree.parent(ancestor);
    }
    false
}

/// Reverse document-order predecessor of `node` that is not an ancestor of
/// `root`. Nearest-first production order for the preceding axis.
fn preceding_step(
    tree: &dyn TreeModel,
    root: NodeHandle,
    node: NodeHandle,
) -> Option<NodeHandle> {
    let mut candidate = reverse_preorder_step(tree, node);
    while let Some(found) = candidate {
        if !is_ancestor_of(tree, found, root) {
            return Some(found);
        }
        candidate = reverse_preorder_step(tree, found);
    }
    None
}

struct SelfTraverser;

impl AxisTraverser for SelfTraverser {
    fn first(
        &self,
        tree: &dyn TreeModel,
        root: NodeHandle,
        filter: Option<NodeKind>,
    ) -> Option<NodeHandle> {
        matches(tree, root, filter).then_some(root)
    }

    fn next(
        &self,
        _tree: &dyn TreeModel,
        _root: NodeHandle,
        _current: NodeHandle,
        _filter: Option<NodeKind>,
    ) -> Option<NodeHandle> {
        None
    }
}

struct ChildTraverser;

impl AxisTraverser for ChildTraverser {
    fn first(
        &self,
        tree: &dyn TreeModel,
        root: NodeHandle,
        filter: Option<NodeKind>,
    ) -> Option<NodeHandle> {
        scan(tree, filter, tree.first_child(root), |t, n| t.next_sibling(n))
    }

    fn next(
        &self,
        tree: &dyn TreeModel,
        _root: NodeHandle,
        current: NodeHandle,
        filter: Option<NodeKind>,
    ) -> Option<NodeHandle> {
        scan(tree, filter, tree.next_sibling(current), |t, n| t.next_sibling(n))
    }
}

struct ParentTraverser;

impl AxisTraverser for ParentTraverser {
    fn first(
        &self,
        tree: &dyn TreeModel,
        root: NodeHandle,
        filter: Option<NodeKind>,
    ) -> Option<NodeHandle> {
        tree.parent(root).filter(|&p| matches(tree, p, filter))
    }

    fn next(
        &self,
        _tree: &dyn TreeModel,
        _root: NodeHandle,
        _current: NodeHandle,
        _filter: Option<NodeKind>,
    ) -> Option<NodeHandle> {
        None
    }
}

struct AncestorTraverser;

impl AxisTraverser for AncestorTraverser {
    fn first(
        &self,
        tree: &dyn TreeModel,
        root: NodeHandle,
        filter: Option<NodeKind>,
    ) -> Option<NodeHandle> {
        scan(tree, filter, tree.parent(root), |t, n| t.parent(n))
    }

    fn next(
        &self,
        tree: &dyn TreeModel,
        _root: NodeHandle,
        current: NodeHandle,
        filter: Option<NodeKind>,
    ) -> Option<NodeHandle> {
        scan(tree, filter, tree.parent(current), |t, n| t.parent(n))
    }
}

struct AncestorOrSelfTraverser;

impl AxisTraverser for AncestorOrSelfTraverser {
    fn first(
        &self,
        tree: &dyn TreeModel,
        root: NodeHandle,
        filter: Option<NodeKind>,
    ) -> Option<NodeHandle> {
        scan(tree, filter, Some(root), |t, n| t.parent(n))
    }

    fn next(
        &self,
        tree: &dyn TreeModel,
        _root: NodeHandle,
        current: NodeHandle,
        filter: Option<NodeKind>,
    ) -> Option<NodeHandle> {
        scan(tree, filter, tree.parent(current), |t, n| t.parent(n))
    }
}

struct DescendantTraverser;

impl AxisTraverser for DescendantTraverser {
    fn first(
        &self,
        tree: &dyn TreeModel,
        root: NodeHandle,
        filter: Option<NodeKind>,
    ) -> Option<NodeHandle> {
        scan(tree, filter, tree.first_child(root), |t, n| {
            next_in_subtree(t, root, n)
        })
    }

    fn next(
        &self,
        tree: &dyn TreeModel,
        root: NodeHandle,
        current: NodeHandle,
        filter: Option<NodeKind>,
    ) -> Option<NodeHandle> {
        scan(tree, filter, next_in_subtree(tree, root, current), |t, n| {
            next_in_subtree(t, root, n)
        })
    }
}

struct DescendantOrSelfTraverser;

impl AxisTraverser for DescendantOrSelfTraverser {
    fn first(
        &self,
        tree: &dyn TreeModel,
        root: NodeHandle,
        filter: Option<NodeKind>,
    ) -> Option<NodeHandle> {
        scan(tree, filter, Some(root), |t, n| next_in_subtree(t, root, n))
    }

    fn next(
        &self,
        tree: &dyn TreeModel,
        root: NodeHandle,
        current: NodeHandle,
        filter: Option<NodeKind>,
    ) -> Option<NodeHandle> {
        scan(tree, filter, next_in_subtree(tree, root, current), |t, n| {
            next_in_subtree(t, root, n)
        })
    }
}

struct FollowingTraverser;

impl AxisTraverser for FollowingTraverser {
    fn first(
        &self,
        tree: &dyn TreeModel,
        root: NodeHandle,
        filter: Option<NodeKind>,
    ) -> Option<NodeHandle> {
        scan(tree, filter, next_after_subtree(tree, root), preorder_step)
    }

    fn next(
        &self,
        tree: &dyn TreeModel,
        _root: NodeHandle,
        current: NodeHandle,
        filter: Option<NodeKind>,
    ) -> Option<NodeHandle> {
        scan(tree, filter, preorder_step(tree, current), preorder_step)
    }
}

struct FollowingSiblingTraverser;

impl AxisTraverser for FollowingSiblingTraverser {
    fn first(
        &self,
        tree: &dyn TreeModel,
        root: NodeHandle,
        filter: Option<NodeKind>,
    ) -> Option<NodeHandle> {
        scan(tree, filter, tree.next_sibling(root), |t, n| t.next_sibling(n))
    }

    fn next(
        &self,
        tree: &dyn TreeModel,
        _root: NodeHandle,
        current: NodeHandle,
        filter: Option<NodeKind>,
    ) -> Option<NodeHandle> {
        scan(tree, filter, tree.next_sibling(current), |t, n| t.next_sibling(n))
    }
}

struct PrecedingTraverser;

impl AxisTraverser for PrecedingTraverser {
    fn first(
        &self,
        tree: &dyn TreeModel,
        root: NodeHandle,
        filter: Option<NodeKind>,
    ) -> Option<NodeHandle> {
        scan(tree, filter, preceding_step(tree, root, root), |t, n| {
            preceding_step(t, root, n)
        })
    }

    fn next(
        &self,
        tree: &dyn TreeModel,
        root: NodeHandle,
        current: NodeHandle,
        filter: Option<NodeKind>,
    ) -> Option<NodeHandle> {
        scan(tree, filter, preceding_step(tree, root, current), |t, n| {
            preceding_step(t, root, n)
        })
    }
}

struct PrecedingSiblingTraverser;

impl AxisTraverser for PrecedingSiblingTraverser {
    fn first(
        &self,
        tree: &dyn TreeModel,
        root: NodeHandle,
        filter: Option<NodeKind>,
    ) -> Option<NodeHandle> {
        scan(tree, filter, tree.prev_sibling(root), |t, n| t.prev_sibling(n))
    }

    fn next(
        &self,
        tree: &dyn TreeModel,
        _root: NodeHandle,
        current: NodeHandle,
        filter: Option<NodeKind>,
    ) -> Option<NodeHandle> {
        scan(tree, filter, tree.prev_sibling(current), |t, n| t.prev_sibling(n))
    }
}

struct AttributeTraverser;

impl AxisTraverser for AttributeTraverser {
    fn first(
        &self,
        tree: &dyn TreeModel,
        root: NodeHandle,
        filter: Option<NodeKind>,
    ) -> Option<NodeHandle> {
        scan(tree, filter, tree.first_attribute(root), |t, n| {
            t.next_attribute(n)
        })
    }

    fn next(
        &self,
        tree: &dyn TreeModel,
        _root: NodeHandle,
        current: NodeHandle,
        filter: Option<NodeKind>,
    ) -> Option<NodeHandle> {
        scan(tree, filter, tree.next_attribute(current), |t, n| {
            t.next_attribute(n)
        })
    }
}

struct NamespaceTraverser;

impl AxisTraverser for NamespaceTraverser {
    fn first(
        &self,
        tree: &dyn TreeModel,
        root: NodeHandle,
        filter: Option<NodeKind>,
    ) -> Option<NodeHandle> {
        scan(tree, filter, tree.first_namespace(root), move |t, n| {
            t.next_namespace(root, n)
        })
    }

    fn next(
        &self,
        tree: &dyn TreeModel,
        root: NodeHandle,
        current: NodeHandle,
        filter: Option<NodeKind>,
    ) -> Option<NodeHandle> {
        scan(tree, filter, tree.next_namespace(root, current), move |t, n| {
            t.next_namespace(root, n)
        })
    }
}
