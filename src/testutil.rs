//! Shared test fixtures. Small in-memory fragment trees, plus helpers for
//! draining a raw traverser.

use std::collections::HashMap;
use std::sync::Arc;

use crate::fragment::FragmentTree;
use crate::model::traverser;
use crate::model::{Axis, NodeHandle, TreeId, TreeModel};

/// `doc > a > (b, c), d` with elements keyed by name.
pub fn simple_tree() -> (FragmentTree, HashMap<&'static str, NodeHandle>) {
    let mut tree = FragmentTree::new(TreeId(0));
    let doc = tree.document();
    let a = tree.append_element(doc, "a");
    let b = tree.append_element(a, "b");
    let c = tree.append_element(a, "c");
    let d = tree.append_element(doc, "d");
    let names = HashMap::from([("a", a), ("b", b), ("c", c), ("d", d)]);
    (tree, names)
}

/// A document exercising every node kind:
///
/// ```text
/// doc
/// └── root  xmlns:x="http://example.com/x"  version="1.0"
///     ├── para  id="p1" lang="en"
///     │   └── "Hello"
///     ├── <!-- note -->
///     ├── para
///     │   └── "World"
///     └── <?pg break?>
/// ```
///
/// Keys: `root`, `para1`, `para2`, `id`, `lang`.
pub fn build_rich(id: TreeId) -> (FragmentTree, HashMap<&'static str, NodeHandle>) {
    let mut tree = FragmentTree::new(id);
    let doc = tree.document();
    let root = tree.append_element(doc, "root");
    tree.add_namespace(root, "x", "http://example.com/x");
    tree.set_attribute(root, "version", "1.0");

    let para1 = tree.append_element(root, "para");
    let attr_id = tree.set_attribute(para1, "id", "p1");
    let attr_lang = tree.set_attribute(para1, "lang", "en");
    tree.append_text(para1, "Hello");

    tree.append_comment(root, "note");
    let para2 = tree.append_element(root, "para");
    tree.append_text(para2, "World");
    tree.append_pi(root, "pg", "break");

    let names = HashMap::from([
        ("root", root),
        ("para1", para1),
        ("para2", para2),
        ("id", attr_id),
        ("lang", attr_lang),
    ]);
    (tree, names)
}

pub fn rich_tree() -> (FragmentTree, HashMap<&'static str, NodeHandle>) {
    build_rich(TreeId(0))
}

pub fn shared(tree: FragmentTree) -> Arc<dyn TreeModel> {
    Arc::new(tree)
}

/// Drain an axis through its raw traverser, unfiltered, in native order.
pub fn drain_axis(tree: &dyn TreeModel, root: NodeHandle, axis: Axis) -> Vec<NodeHandle> {
    let stepper = traverser::resolve(axis);
    let mut out = Vec::new();
    let mut node = stepper.first(tree, root, None);
    while let Some(n) = node {
        out.push(n);
        node = stepper.next(tree, root, n, None);
    }
    out
}
