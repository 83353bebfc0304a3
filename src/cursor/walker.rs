//! Pre-order tree walker
//!
//! Drives a visitor over a subtree in document order, emitting paired
//! start/end events for elements and the document node. Namespace
//! declarations and (optionally) attributes of an element fire between its
//! start event and its first child. The traversal is iterative with an
//! explicit stack, so pathological depth cannot overflow the call stack.

use crate::error::Result;
use crate::model::{NodeHandle, NodeKind, TreeModel};

use super::SelfCursor;

/// Receiver for walker events. Every method has a no-op default, so
/// implementors override only what they consume.
pub trait TreeVisitor {
    fn start_document(&mut self, _tree: &dyn TreeModel, _node: NodeHandle) -> Result<()> {
        Ok(())
    }

    fn end_document(&mut self, _tree: &dyn TreeModel, _node: NodeHandle) -> Result<()> {
        Ok(())
    }

    fn start_element(&mut self, _tree: &dyn TreeModel, _node: NodeHandle) -> Result<()> {
        Ok(())
    }

    fn end_element(&mut self, _tree: &dyn TreeModel, _node: NodeHandle) -> Result<()> {
        Ok(())
    }

    fn namespace_decl(&mut self, _tree: &dyn TreeModel, _node: NodeHandle) -> Result<()> {
        Ok(())
    }

    fn attribute(&mut self, _tree: &dyn TreeModel, _node: NodeHandle) -> Result<()> {
        Ok(())
    }

    fn text(&mut self, _tree: &dyn TreeModel, _node: NodeHandle) -> Result<()> {
        Ok(())
    }

    fn comment(&mut self, _tree: &dyn TreeModel, _node: NodeHandle) -> Result<()> {
        Ok(())
    }

    fn processing_instruction(&mut self, _tree: &dyn TreeModel, _node: NodeHandle) -> Result<()> {
        Ok(())
    }
}

enum Frame {
    Enter(NodeHandle),
    Leave(NodeHandle),
}

/// Pre-order walk over the subtree rooted at a singleton cursor.
#[derive(Debug, Clone, Default)]
pub struct TreeWalker {
    include_attributes: bool,
}

impl TreeWalker {
    pub fn new() -> Self {
        TreeWalker {
            include_attributes: true,
        }
    }

    /// Toggle attribute events. Start/end element events and namespace
    /// declarations are always emitted.
    pub fn with_attributes(include: bool) -> Self {
        TreeWalker {
            include_attributes: include,
        }
    }

    /// Walk the subtree rooted at `cursor`'s node, firing visitor events in
    /// document order. An empty cursor walks nothing. The cursor is read
    /// only; its handle is still valid afterwards.
    pub fn walk(&self, cursor: &SelfCursor, visitor: &mut dyn TreeVisitor) -> Result<()> {
        let Some(root) = cursor.node() else {
            return Ok(());
        };
        let tree = cursor.tree_model().as_ref();

        let mut stack = vec![Frame::Enter(root)];
        while let Some(frame) = stack.pop() {
            match frame {
                Frame::Enter(node) => self.enter(tree, node, visitor, &mut stack)?,
                Frame::Leave(node) => match tree.kind(node) {
                    NodeKind::Document => visitor.end_document(tree, node)?,
                    _ => visitor.end_element(tree, node)?,
                },
            }
        }
        Ok(())
    }

    fn enter(
        &self,
        tree: &dyn TreeModel,
        node: NodeHandle,
        visitor: &mut dyn TreeVisitor,
        stack: &mut Vec<Frame>,
    ) -> Result<()> {
        match tree.kind(node) {
            NodeKind::Document => {
                visitor.start_document(tree, node)?;
                stack.push(Frame::Leave(node));
                push_children(tree, node, stack);
            }
            NodeKind::Element => {
                visitor.start_element(tree, node)?;
                let mut ns = tree.first_namespace(node);
                while let Some(decl) = ns {
                    visitor.namespace_decl(tree, decl)?;
                    ns = tree.next_namespace(node, decl);
                }
                if self.include_attributes {
                    let mut attr = tree.first_attribute(node);
                    while let Some(a) = attr {
                        visitor.attribute(tree, a)?;
                        attr = tree.next_attribute(a);
                    }
                }
                stack.push(Frame::Leave(node));
                push_children(tree, node, stack);
            }
            NodeKind::Text => visitor.text(tree, node)?,
            NodeKind::Comment => visitor.comment(tree, node)?,
            NodeKind::ProcessingInstruction => visitor.processing_instruction(tree, node)?,
            // Only reachable when the walk is rooted at the attribute or
            // namespace node itself; the child chain never contains them.
            NodeKind::Attribute => {
                if self.include_attributes {
                    visitor.attribute(tree, node)?;
                }
            }
            NodeKind::Namespace => visitor.namespace_decl(tree, node)?,
        }
        Ok(())
    }
}

/// Push children so the first child pops first.
fn push_children(tree: &dyn TreeModel, node: NodeHandle, stack: &mut Vec<Frame>) {
    let mut children = Vec::new();
    let mut child = tree.first_child(node);
    while let Some(c) = child {
        children.push(c);
        child = tree.next_sibling(c);
    }
    for c in children.into_iter().rev() {
        stack.push(Frame::Enter(c));
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::testutil::{rich_tree, shared};

    #[derive(Default)]
    struct EventLog {
        events: Vec<String>,
    }

    impl EventLog {
        fn record(&mut self, tag: &str, tree: &dyn TreeModel, node: NodeHandle) {
            let name = tree
                .name(node)
                .map(|q| q.local_part.to_string())
                .unwrap_or_default();
            self.events.push(format!("{tag}:{name}"));
        }
    }

    impl TreeVisitor for EventLog {
        fn start_document(&mut self, tree: &dyn TreeModel, node: NodeHandle) -> Result<()> {
            self.record("start-doc", tree, node);
            Ok(())
        }
        fn end_document(&mut self, tree: &dyn TreeModel, node: NodeHandle) -> Result<()> {
            self.record("end-doc", tree, node);
            Ok(())
        }
        fn start_element(&mut self, tree: &dyn TreeModel, node: NodeHandle) -> Result<()> {
            self.record("start", tree, node);
            Ok(())
        }
        fn end_element(&mut self, tree: &dyn TreeModel, node: NodeHandle) -> Result<()> {
            self.record("end", tree, node);
            Ok(())
        }
        fn namespace_decl(&mut self, tree: &dyn TreeModel, node: NodeHandle) -> Result<()> {
            self.record("ns", tree, node);
            Ok(())
        }
        fn attribute(&mut self, tree: &dyn TreeModel, node: NodeHandle) -> Result<()> {
            self.record("attr", tree, node);
            Ok(())
        }
        fn text(&mut self, tree: &dyn TreeModel, node: NodeHandle) -> Result<()> {
            self.events
                .push(format!("text:{}", tree.string_value(node)));
            Ok(())
        }
        fn comment(&mut self, tree: &dyn TreeModel, node: NodeHandle) -> Result<()> {
            self.record("comment", tree, node);
            Ok(())
        }
        fn processing_instruction(
            &mut self,
            tree: &dyn TreeModel,
            node: NodeHandle,
        ) -> Result<()> {
            self.record("pi", tree, node);
            Ok(())
        }
    }

    #[test]
    fn test_walk_document_in_order() {
        let (tree, _) = rich_tree();
        let tree = shared(tree);
        let doc = tree.document();
        let cursor = SelfCursor::new(Arc::clone(&tree), Some(doc));

        let mut log = EventLog::default();
        TreeWalker::new().walk(&cursor, &mut log).unwrap();

        assert_eq!(log.events.first().map(String::as_str), Some("start-doc:"));
        assert_eq!(log.events.last().map(String::as_str), Some("end-doc:"));
        let starts: Vec<_> = log
            .events
            .iter()
            .filter(|e| e.starts_with("start:"))
            .collect();
        assert_eq!(starts, ["start:root", "start:para", "start:para"]);
        // Pairing: each start has a matching end at the right nesting level.
        let mut depth = 0i32;
        for event in &log.events {
            if event.starts_with("start") {
                depth += 1;
            } else if event.starts_with("end") {
                depth -= 1;
                assert!(depth >= 0);
            }
        }
        assert_eq!(depth, 0);
    }

    #[test]
    fn test_attribute_events_fire_before_children() {
        let (tree, names) = rich_tree();
        let cursor = SelfCursor::new(shared(tree), Some(names["para1"]));

        let mut log = EventLog::default();
        TreeWalker::new().walk(&cursor, &mut log).unwrap();

        let attr_pos = log.events.iter().position(|e| e == "attr:id").unwrap();
        let text_pos = log.events.iter().position(|e| e == "text:Hello").unwrap();
        assert!(attr_pos < text_pos);
    }

    #[test]
    fn test_attributes_suppressed_namespaces_kept() {
        let (tree, names) = rich_tree();
        let cursor = SelfCursor::new(shared(tree), Some(names["root"]));

        let mut log = EventLog::default();
        TreeWalker::with_attributes(false)
            .walk(&cursor, &mut log)
            .unwrap();
        assert!(log.events.iter().all(|e| !e.starts_with("attr")));
        // namespace declarations are not attribute sub-events and still fire
        assert!(log.events.contains(&"ns:x".to_string()));
    }

    #[test]
    fn test_empty_cursor_walks_nothing() {
        let (tree, _) = rich_tree();
        let cursor = SelfCursor::new(shared(tree), None);
        let mut log = EventLog::default();
        TreeWalker::new().walk(&cursor, &mut log).unwrap();
        assert!(log.events.is_empty());
    }
}
