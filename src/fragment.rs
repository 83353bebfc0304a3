//! Fragment tree model
//!
//! A minimal, programmatically built tree: arena of nodes linked by
//! parent/first-child/last-child/sibling indices, attributes and namespace
//! declarations on their own chains. Backs the manager's detached text
//! fragments (literal or computed strings re-entering the tree-shaped
//! pipeline) and the test fixtures. No parsing happens here - real
//! documents come from an external builder behind the tree contract.
//!
//! Construction is mutation; once handed to cursors (behind `Arc`) a
//! fragment is read-only like any other tree model.

use crate::model::{NodeHandle, NodeIndex, NodeKind, QName, TreeId, TreeModel};

/// One node in the fragment arena.
#[derive(Debug, Clone)]
struct FragmentNode {
    kind: NodeKind,
    /// Local name for elements/attributes/namespace prefixes, target for PIs.
    name: Option<String>,
    prefix: Option<String>,
    namespace: Option<String>,
    /// Content for text/comment/PI nodes, value for attributes, URI for
    /// namespace nodes.
    value: String,
    parent: Option<NodeIndex>,
    first_child: Option<NodeIndex>,
    last_child: Option<NodeIndex>,
    prev_sibling: Option<NodeIndex>,
    next_sibling: Option<NodeIndex>,
    first_attr: Option<NodeIndex>,
    first_ns: Option<NodeIndex>,
    /// Chain link for attribute and namespace nodes.
    next_attr: Option<NodeIndex>,
}

impl FragmentNode {
    fn new(kind: NodeKind, parent: Option<NodeIndex>) -> Self {
        FragmentNode {
            kind,
            name: None,
            prefix: None,
            namespace: None,
            value: String::new(),
            parent,
            first_child: None,
            last_child: None,
            prev_sibling: None,
            next_sibling: None,
            first_attr: None,
            first_ns: None,
            next_attr: None,
        }
    }
}

/// A small detached tree addressed by handles.
#[derive(Debug)]
pub struct FragmentTree {
    id: TreeId,
    base_uri: Option<String>,
    nodes: Vec<FragmentNode>,
}

impl FragmentTree {
    /// Create a tree holding only a document node.
    pub fn new(id: TreeId) -> Self {
        FragmentTree {
            id,
            base_uri: None,
            nodes: vec![FragmentNode::new(NodeKind::Document, None)],
        }
    }

    /// The minimal single-text-node fragment: `document > text`.
    pub fn text_fragment(id: TreeId, text: &str) -> Self {
        let mut tree = Self::new(id);
        let doc = tree.document();
        tree.append_text(doc, text);
        tree
    }

    /// Record the source URI the fragment stands in for, if any.
    pub fn set_base_uri(&mut self, uri: impl Into<String>) {
        self.base_uri = Some(uri.into());
    }

    /// Number of nodes, the document node included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Append an element as the last child of `parent`.
    pub fn append_element(&mut self, parent: NodeHandle, name: &str) -> NodeHandle {
        let idx = self.push_node(NodeKind::Element, Some(parent.index()));
        self.nodes[idx as usize].name = Some(name.to_string());
        self.link_child(parent.index(), idx);
        self.handle(idx)
    }

    /// Append an element with a prefixed, namespace-bound name.
    pub fn append_element_ns(
        &mut self,
        parent: NodeHandle,
        prefix: &str,
        name: &str,
        uri: &str,
    ) -> NodeHandle {
        let element = self.append_element(parent, name);
        let node = &mut self.nodes[element.index() as usize];
        node.prefix = Some(prefix.to_string());
        node.namespace = Some(uri.to_string());
        element
    }

    /// Append a text node as the last child of `parent`.
    pub fn append_text(&mut self, parent: NodeHandle, text: &str) -> NodeHandle {
        let idx = self.push_node(NodeKind::Text, Some(parent.index()));
        self.nodes[idx as usize].value = text.to_string();
        self.link_child(parent.index(), idx);
        self.handle(idx)
    }

    /// Append a comment as the last child of `parent`.
    pub fn append_comment(&mut self, parent: NodeHandle, text: &str) -> NodeHandle {
        let idx = self.push_node(NodeKind::Comment, Some(parent.index()));
        self.nodes[idx as usize].value = text.to_string();
        self.link_child(parent.index(), idx);
        self.handle(idx)
    }

    /// Append a processing instruction as the last child of `parent`.
    pub fn append_pi(&mut self, parent: NodeHandle, target: &str, data: &str) -> NodeHandle {
        let idx = self.push_node(NodeKind::ProcessingInstruction, Some(parent.index()));
        self.nodes[idx as usize].name = Some(target.to_string());
        self.nodes[idx as usize].value = data.to_string();
        self.link_child(parent.index(), idx);
        self.handle(idx)
    }

    /// Attach an attribute to an element, appended to its attribute chain.
    pub fn set_attribute(&mut self, element: NodeHandle, name: &str, value: &str) -> NodeHandle {
        let idx = self.push_node(NodeKind::Attribute, Some(element.index()));
        self.nodes[idx as usize].name = Some(name.to_string());
        self.nodes[idx as usize].value = value.to_string();
        self.link_chain(element.index(), idx, false);
        self.handle(idx)
    }

    /// Attach a namespace declaration node to an element.
    pub fn add_namespace(&mut self, element: NodeHandle, prefix: &str, uri: &str) -> NodeHandle {
        let idx = self.push_node(NodeKind::Namespace, Some(element.index()));
        self.nodes[idx as usize].name = Some(prefix.to_string());
        self.nodes[idx as usize].value = uri.to_string();
        self.link_chain(element.index(), idx, true);
        self.handle(idx)
    }

    #[inline]
    fn handle(&self, idx: NodeIndex) -> NodeHandle {
        NodeHandle::new(self.id, idx)
    }

    fn push_node(&mut self, kind: NodeKind, parent: Option<NodeIndex>) -> NodeIndex {
        let idx = self.nodes.len() as NodeIndex;
        self.nodes.push(FragmentNode::new(kind, parent));
        idx
    }

    /// Link a child into its parent's child chain.
    fn link_child(&mut self, parent: NodeIndex, child: NodeIndex) {
        let last = self.nodes[parent as usize].last_child;
        if let Some(last_idx) = last {
            self.nodes[child as usize].prev_sibling = Some(last_idx);
            self.nodes[last_idx as usize].next_sibling = Some(child);
        } else {
            self.nodes[parent as usize].first_child = Some(child);
        }
        self.nodes[parent as usize].last_child = Some(child);
    }

    /// Link an attribute or namespace node into its element's chain.
    fn link_chain(&mut self, element: NodeIndex, node: NodeIndex, namespace: bool) {
        let head = if namespace {
            self.nodes[element as usize].first_ns
        } else {
            self.nodes[element as usize].first_attr
        };
        match head {
            None if namespace => self.nodes[element as usize].first_ns = Some(node),
            None => self.nodes[element as usize].first_attr = Some(node),
            Some(mut at) => {
                while let Some(next) = self.nodes[at as usize].next_attr {
                    at = next;
                }
                self.nodes[at as usize].next_attr = Some(node);
            }
        }
    }

    #[inline]
    fn node(&self, handle: NodeHandle) -> &FragmentNode {
        debug_assert_eq!(handle.tree(), self.id);
        &self.nodes[handle.index() as usize]
    }

    fn collect_text(&self, idx: NodeIndex, out: &mut String) {
        let mut child = self.nodes[idx as usize].first_child;
        while let Some(c) = child {
            match self.nodes[c as usize].kind {
                NodeKind::Text => out.push_str(&self.nodes[c as usize].value),
                NodeKind::Element => self.collect_text(c, out),
                _ => {}
            }
            child = self.nodes[c as usize].next_sibling;
        }
    }

    /// Sibling-ordinal path from the document node, ranked so that an
    /// element orders before its namespace nodes, then its attributes,
    /// then its children.
    fn order_path(&self, mut idx: NodeIndex) -> Vec<(u8, u32)> {
        let mut path = Vec::new();
        while let Some(parent) = self.nodes[idx as usize].parent {
            let node = &self.nodes[idx as usize];
            let (rank, chain_head) = match node.kind {
                NodeKind::Namespace => (0u8, self.nodes[parent as usize].first_ns),
                NodeKind::Attribute => (1u8, self.nodes[parent as usize].first_attr),
                _ => (2u8, self.nodes[parent as usize].first_child),
            };
            let mut ordinal = 0u32;
            let mut at = chain_head;
            while let Some(sibling) = at {
                if sibling == idx {
                    break;
                }
                ordinal += 1;
                at = if rank == 2 {
                    self.nodes[sibling as usize].next_sibling
                } else {
                    self.nodes[sibling as usize].next_attr
                };
            }
            path.push((rank, ordinal));
            idx = parent;
        }
        path.reverse();
        path
    }
}

impl TreeModel for FragmentTree {
    fn id(&self) -> TreeId {
        self.id
    }

    fn document(&self) -> NodeHandle {
        self.handle(0)
    }

    fn kind(&self, node: NodeHandle) -> NodeKind {
        self.node(node).kind
    }

    fn name(&self, node: NodeHandle) -> Option<QName<'_>> {
        let n = self.node(node);
        n.name.as_deref().map(|local_part| QName {
            prefix: n.prefix.as_deref(),
            local_part,
        })
    }

    fn namespace_uri(&self, node: NodeHandle) -> Option<&str> {
        self.node(node).namespace.as_deref()
    }

    fn string_value(&self, node: NodeHandle) -> String {
        let n = self.node(node);
        match n.kind {
            NodeKind::Document | NodeKind::Element => {
                let mut out = String::new();
                self.collect_text(node.index(), &mut out);
                out
            }
            _ => n.value.clone(),
        }
    }

    fn base_uri(&self, _node: NodeHandle) -> Option<&str> {
        self.base_uri.as_deref()
    }

    fn parent(&self, node: NodeHandle) -> Option<NodeHandle> {
        self.node(node).parent.map(|p| self.handle(p))
    }

    fn first_child(&self, node: NodeHandle) -> Option<NodeHandle> {
        self.node(node).first_child.map(|c| self.handle(c))
    }

    fn next_sibling(&self, node: NodeHandle) -> Option<NodeHandle> {
        self.node(node).next_sibling.map(|s| self.handle(s))
    }

    fn prev_sibling(&self, node: NodeHandle) -> Option<NodeHandle> {
        self.node(node).prev_sibling.map(|s| self.handle(s))
    }

    fn first_attribute(&self, node: NodeHandle) -> Option<NodeHandle> {
        self.node(node).first_attr.map(|a| self.handle(a))
    }

    fn next_attribute(&self, attr: NodeHandle) -> Option<NodeHandle> {
        self.node(attr).next_attr.map(|a| self.handle(a))
    }

    fn first_namespace(&self, node: NodeHandle) -> Option<NodeHandle> {
        self.node(node).first_ns.map(|n| self.handle(n))
    }

    fn next_namespace(&self, _node: NodeHandle, current: NodeHandle) -> Option<NodeHandle> {
        self.node(current).next_attr.map(|n| self.handle(n))
    }

    fn is_before(&self, a: NodeHandle, b: NodeHandle) -> bool {
        if a == b {
            return false;
        }
        let pa = self.order_path(a.index());
        let pb = self.order_path(b.index());
        // Lexicographic on (rank, ordinal) steps; an ancestor's path is a
        // strict prefix of its descendants' and orders first.
        pa < pb
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_fragment_shape() {
        let tree = FragmentTree::text_fragment(TreeId(7), "hello");
        let doc = tree.document();
        assert_eq!(tree.kind(doc), NodeKind::Document);
        let text = tree.first_child(doc).unwrap();
        assert_eq!(tree.kind(text), NodeKind::Text);
        assert_eq!(tree.string_value(text), "hello");
        assert_eq!(tree.string_value(doc), "hello");
        assert_eq!(tree.next_sibling(text), None);
        assert_eq!(tree.parent(text), Some(doc));
    }

    #[test]
    fn test_child_links() {
        let mut tree = FragmentTree::new(TreeId(0));
        let doc = tree.document();
        let a = tree.append_element(doc, "a");
        let b = tree.append_element(doc, "b");
        let c = tree.append_element(doc, "c");
        assert_eq!(tree.first_child(doc), Some(a));
        assert_eq!(tree.next_sibling(a), Some(b));
        assert_eq!(tree.next_sibling(b), Some(c));
        assert_eq!(tree.prev_sibling(c), Some(b));
        assert_eq!(tree.prev_sibling(a), None);
        assert_eq!(tree.name(b).unwrap().local_part, "b");
    }

    #[test]
    fn test_attribute_chain() {
        let mut tree = FragmentTree::new(TreeId(0));
        let doc = tree.document();
        let para = tree.append_element(doc, "para");
        let id = tree.set_attribute(para, "id", "p1");
        let lang = tree.set_attribute(para, "lang", "en");
        assert_eq!(tree.first_attribute(para), Some(id));
        assert_eq!(tree.next_attribute(id), Some(lang));
        assert_eq!(tree.next_attribute(lang), None);
        // Attributes are not children.
        assert_eq!(tree.first_child(para), None);
        assert_eq!(tree.next_sibling(id), None);
        assert_eq!(tree.string_value(id), "p1");
        assert_eq!(tree.parent(id), Some(para));
    }

    #[test]
    fn test_namespaced_element_name() {
        let mut tree = FragmentTree::new(TreeId(0));
        let doc = tree.document();
        let fo = tree.append_element_ns(doc, "fo", "block", "http://www.w3.org/1999/XSL/Format");
        let name = tree.name(fo).unwrap();
        assert_eq!(name.prefix, Some("fo"));
        assert_eq!(name.local_part, "block");
        assert_eq!(
            tree.namespace_uri(fo),
            Some("http://www.w3.org/1999/XSL/Format")
        );
    }

    #[test]
    fn test_element_string_value_concatenates() {
        let mut tree = FragmentTree::new(TreeId(0));
        let doc = tree.document();
        let root = tree.append_element(doc, "root");
        tree.append_text(root, "Hello ");
        let inner = tree.append_element(root, "em");
        tree.append_text(inner, "World");
        tree.append_comment(root, "ignored");
        assert_eq!(tree.string_value(root), "Hello World");
    }

    #[test]
    fn test_document_order() {
        let mut tree = FragmentTree::new(TreeId(0));
        let doc = tree.document();
        let a = tree.append_element(doc, "a");
        let b = tree.append_element(a, "b");
        let d = tree.append_element(doc, "d");
        let attr = tree.set_attribute(a, "id", "x");
        assert!(tree.is_before(doc, a));
        assert!(tree.is_before(a, b));
        assert!(tree.is_before(b, d));
        // attribute after its element, before its children
        assert!(tree.is_before(a, attr));
        assert!(tree.is_before(attr, b));
        assert!(!tree.is_before(d, a));
        assert!(!tree.is_before(a, a));
    }
}
