//! Tree Model contract
//!
//! The minimal capability set a backing document must expose to the cursor
//! layer:
//! - Opaque, copyable node handles scoped to one tree instance
//! - Node kind, qualified name, string value
//! - Structural primitives: parent, first-child, next-/prev-sibling,
//!   first-/next-attribute
//! - Document-order comparison
//! - A per-axis traverser factory
//!
//! The storage engine behind this trait (streaming or fully materialized
//! parser) is external; the cursors never touch the representation directly.

pub mod axis;
pub mod traverser;

pub use axis::Axis;
pub use traverser::AxisTraverser;

use crate::error::Result;

/// Identifies one tree model instance inside a manager.
///
/// Handles are never compared across instances; the id carried by each
/// handle is what lets the manager reverse-map a foreign node back to the
/// tree that owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TreeId(pub u32);

/// Compact index of a node inside its tree's storage.
pub type NodeIndex = u32;

/// Opaque, cheap-to-copy identifier naming a node inside exactly one tree
/// model instance. "No node" is `Option<NodeHandle>` at every boundary;
/// there is no reserved in-band null value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeHandle {
    tree: TreeId,
    node: NodeIndex,
}

impl NodeHandle {
    /// Create a handle for a node inside the given tree.
    #[inline]
    pub fn new(tree: TreeId, node: NodeIndex) -> Self {
        NodeHandle { tree, node }
    }

    /// The tree instance this handle belongs to.
    #[inline]
    pub fn tree(&self) -> TreeId {
        self.tree
    }

    /// Index of the node inside its tree's storage.
    #[inline]
    pub fn index(&self) -> NodeIndex {
        self.node
    }
}

/// Type of a node, aligned with the XPath 1.0 data model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Document root
    Document,
    /// Element node
    Element,
    /// Attribute node
    Attribute,
    /// Namespace declaration node
    Namespace,
    /// Text content
    Text,
    /// Comment
    Comment,
    /// Processing instruction
    ProcessingInstruction,
}

/// A qualified name: optional prefix plus local part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QName<'a> {
    pub prefix: Option<&'a str>,
    pub local_part: &'a str,
}

impl<'a> QName<'a> {
    /// Name with no prefix.
    pub fn local(local_part: &'a str) -> Self {
        QName {
            prefix: None,
            local_part,
        }
    }
}

/// Read-only contract between the cursor layer and a backing document.
///
/// All navigation is handle-in, handle-out; a `None` means "no such node"
/// and is an expected outcome, not an error. Implementations must answer
/// every method for any handle they issued; behavior for handles from a
/// different tree instance is unspecified.
pub trait TreeModel {
    /// The id under which this instance was registered.
    fn id(&self) -> TreeId;

    /// Handle of the document root node.
    fn document(&self) -> NodeHandle;

    /// Kind of the node.
    fn kind(&self, node: NodeHandle) -> NodeKind;

    /// Qualified name. `None` for kinds without names (document, text,
    /// comment); for a processing instruction this is its target.
    fn name(&self, node: NodeHandle) -> Option<QName<'_>>;

    /// Namespace URI the node's name is bound to, if any.
    fn namespace_uri(&self, node: NodeHandle) -> Option<&str>;

    /// String value per the XPath 1.0 `string()` function: text content for
    /// text nodes, concatenated descendant text for elements and the
    /// document, the value for attributes, content for comments and PIs.
    fn string_value(&self, node: NodeHandle) -> String;

    /// Base URI of the node, if the source carried one.
    fn base_uri(&self, node: NodeHandle) -> Option<&str> {
        let _ = node;
        None
    }

    /// Parent node. `None` for the document root.
    fn parent(&self, node: NodeHandle) -> Option<NodeHandle>;

    /// First child, in document order.
    fn first_child(&self, node: NodeHandle) -> Option<NodeHandle>;

    /// Next sibling, in document order.
    fn next_sibling(&self, node: NodeHandle) -> Option<NodeHandle>;

    /// Previous sibling.
    fn prev_sibling(&self, node: NodeHandle) -> Option<NodeHandle>;

    /// First attribute of an element; `None` for non-elements.
    fn first_attribute(&self, node: NodeHandle) -> Option<NodeHandle>;

    /// Next attribute after `attr` on the same element.
    fn next_attribute(&self, attr: NodeHandle) -> Option<NodeHandle>;

    /// First namespace node in scope on an element. Trees that do not store
    /// namespace nodes serve an empty namespace axis.
    fn first_namespace(&self, node: NodeHandle) -> Option<NodeHandle> {
        let _ = node;
        None
    }

    /// Next namespace node after `current` on the same element.
    fn next_namespace(&self, node: NodeHandle, current: NodeHandle) -> Option<NodeHandle> {
        let _ = (node, current);
        None
    }

    /// True if `a` strictly precedes `b` in document order. Attributes and
    /// namespace nodes order after their owning element and before its
    /// children.
    fn is_before(&self, a: NodeHandle, b: NodeHandle) -> bool;

    /// Resolve the stateless traverser for an axis. The structural axes are
    /// served generically over this trait's primitives; an implementation
    /// refuses an axis it cannot serve with `UnsupportedAxis`, reported at
    /// cursor construction time.
    fn traverser(&self, axis: Axis) -> Result<&'static dyn AxisTraverser> {
        Ok(traverser::resolve(axis))
    }
}
