//! Cursor manager
//!
//! Owns the loaded trees and hands out cursors over them:
//!
//! - Source loading goes through a pluggable `TreeModelBuilder`, so the
//!   manager knows nothing about parsing.
//! - Shared (non-unique) requests for the same URI are answered from an LRU
//!   cache of already-built trees; unique requests always rebuild.
//! - Tree ids are never reused. Releasing a tree tombstones its slot, so a
//!   stale handle can only miss, never alias a newer tree.

use std::num::NonZeroUsize;
use std::sync::Arc;

use log::debug;
use lru::LruCache;

use crate::cursor::SelfCursor;
use crate::error::{CursorError, Result};
use crate::fragment::FragmentTree;
use crate::model::{NodeHandle, TreeId, TreeModel};

const DEFAULT_SHARED_CAPACITY: usize = 64;

/// Identifies a source to load, by URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSpec {
    pub uri: String,
}

impl SourceSpec {
    pub fn new(uri: impl Into<String>) -> Self {
        SourceSpec { uri: uri.into() }
    }
}

/// Hints passed through to the builder. The manager does not interpret
/// them beyond forwarding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Drop whitespace-only text nodes while building.
    pub whitespace_filter: bool,
    /// Prefer a lazily-built tree when the backend supports one.
    pub incremental: bool,
    /// Build name/id lookup indexes alongside the tree.
    pub indexed: bool,
}

/// Builds a tree model from a source. Implementations wrap whatever parser
/// the embedding application uses.
pub trait TreeModelBuilder {
    fn build(
        &self,
        spec: &SourceSpec,
        options: &ParseOptions,
        id: TreeId,
    ) -> Result<Arc<dyn TreeModel>>;
}

/// Registry of loaded trees, plus the shared-tree LRU cache.
pub struct CursorManager {
    builder: Box<dyn TreeModelBuilder>,
    trees: Vec<Option<Arc<dyn TreeModel>>>,
    shared: LruCache<String, TreeId>,
}

impl CursorManager {
    pub fn new(builder: Box<dyn TreeModelBuilder>) -> Self {
        Self::with_cache_capacity(builder, DEFAULT_SHARED_CAPACITY)
    }

    /// Capacity of the shared-tree cache; clamped to at least one entry.
    pub fn with_cache_capacity(builder: Box<dyn TreeModelBuilder>, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        CursorManager {
            builder,
            trees: Vec::new(),
            shared: LruCache::new(capacity),
        }
    }

    /// Number of live (unreleased) trees.
    pub fn live_trees(&self) -> usize {
        self.trees.iter().filter(|t| t.is_some()).count()
    }

    /// Load a source and return a cursor positioned on its document node.
    ///
    /// With `unique` set the source is always rebuilt and the result is not
    /// cached; otherwise a cached tree for the same URI is reused when
    /// present.
    pub fn get_cursor(
        &mut self,
        spec: &SourceSpec,
        unique: bool,
        options: &ParseOptions,
    ) -> Result<SelfCursor> {
        if !unique {
            let cached = self.shared.get(&spec.uri).copied();
            if let Some(id) = cached {
                if let Ok(tree) = self.tree(id) {
                    debug!("shared tree hit for {}", spec.uri);
                    let doc = tree.document();
                    return Ok(SelfCursor::new(tree, Some(doc)));
                }
                // Released behind the cache's back; rebuild below.
                self.shared.pop(&spec.uri);
            }
        }

        let id = self.allocate_id();
        let tree = self.builder.build(spec, options, id)?;
        debug!("built tree {:?} from {} (unique={})", id, spec.uri, unique);
        self.trees[id.0 as usize] = Some(Arc::clone(&tree));
        if !unique {
            self.shared.put(spec.uri.clone(), id);
        }
        let doc = tree.document();
        Ok(SelfCursor::new(tree, Some(doc)))
    }

    /// Wrap an in-memory text value as a single-text-node fragment tree.
    pub fn create_text_fragment(&mut self, text: &str) -> SelfCursor {
        let id = self.allocate_id();
        let tree: Arc<dyn TreeModel> = Arc::new(FragmentTree::text_fragment(id, text));
        self.trees[id.0 as usize] = Some(Arc::clone(&tree));
        let doc = tree.document();
        SelfCursor::new(tree, Some(doc))
    }

    /// Register a tree built elsewhere. The id it was built with must come
    /// from `allocate_id` on this manager.
    pub fn register(&mut self, tree: Arc<dyn TreeModel>) -> Result<()> {
        let id = tree.id();
        let slot = self
            .trees
            .get_mut(id.0 as usize)
            .ok_or(CursorError::UnknownTree(id))?;
        *slot = Some(tree);
        Ok(())
    }

    /// Reserve a fresh tree id. Ids grow monotonically and are never
    /// recycled.
    pub fn allocate_id(&mut self) -> TreeId {
        let id = TreeId(self.trees.len() as u32);
        self.trees.push(None);
        id
    }

    /// Look up a live tree by id.
    pub fn tree(&self, id: TreeId) -> Result<Arc<dyn TreeModel>> {
        self.trees
            .get(id.0 as usize)
            .and_then(|t| t.as_ref())
            .map(Arc::clone)
            .ok_or(CursorError::UnknownTree(id))
    }

    /// Turn a bare handle back into a cursor, if its tree is still live.
    pub fn cursor_for_handle(&self, handle: NodeHandle) -> Option<SelfCursor> {
        let tree = self.tree(handle.tree()).ok()?;
        Some(SelfCursor::new(tree, Some(handle)))
    }

    /// Drop the manager's reference to the cursor's tree. Returns false for
    /// a tree this manager never held (or already released). With `hard`
    /// set the tree is also evicted from the shared cache, so later
    /// non-unique requests rebuild it.
    pub fn release(&mut self, cursor: &SelfCursor, hard: bool) -> bool {
        let id = cursor.tree_model().id();
        let Some(slot) = self.trees.get_mut(id.0 as usize) else {
            return false;
        };
        if slot.take().is_none() {
            return false;
        }
        if hard {
            let stale: Vec<String> = self
                .shared
                .iter()
                .filter(|(_, &cached)| cached == id)
                .map(|(uri, _)| uri.clone())
                .collect();
            for uri in stale {
                self.shared.pop(&uri);
            }
        }
        debug!("released tree {:?} (hard={})", id, hard);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Axis, NodeKind};
    use crate::testutil::build_rich;

    struct FixtureBuilder;

    impl TreeModelBuilder for FixtureBuilder {
        fn build(
            &self,
            spec: &SourceSpec,
            _options: &ParseOptions,
            id: TreeId,
        ) -> Result<Arc<dyn TreeModel>> {
            if spec.uri == "missing.xml" {
                return Err(CursorError::SourceBuild {
                    uri: spec.uri.clone(),
                    message: "no such source".to_string(),
                });
            }
            let (tree, _) = build_rich(id);
            Ok(Arc::new(tree))
        }
    }

    fn manager() -> CursorManager {
        CursorManager::new(Box::new(FixtureBuilder))
    }

    #[test]
    fn test_get_cursor_positions_on_document() {
        let mut mgr = manager();
        let spec = SourceSpec::new("doc.xml");
        let cursor = mgr.get_cursor(&spec, false, &ParseOptions::default()).unwrap();
        assert_eq!(cursor.node_kind(), Some(NodeKind::Document));
        let mut children = cursor.axis(Axis::Child).unwrap();
        assert_eq!(children.get_length(), 1);
    }

    #[test]
    fn test_shared_requests_reuse_the_tree() {
        let mut mgr = manager();
        let spec = SourceSpec::new("doc.xml");
        let opts = ParseOptions::default();
        let a = mgr.get_cursor(&spec, false, &opts).unwrap();
        let b = mgr.get_cursor(&spec, false, &opts).unwrap();
        assert_eq!(a.tree_model().id(), b.tree_model().id());
        assert_eq!(mgr.live_trees(), 1);
    }

    #[test]
    fn test_unique_requests_rebuild() {
        let mut mgr = manager();
        let spec = SourceSpec::new("doc.xml");
        let opts = ParseOptions::default();
        let a = mgr.get_cursor(&spec, true, &opts).unwrap();
        let b = mgr.get_cursor(&spec, true, &opts).unwrap();
        assert_ne!(a.tree_model().id(), b.tree_model().id());
        assert_eq!(mgr.live_trees(), 2);
    }

    #[test]
    fn test_build_failure_propagates() {
        let mut mgr = manager();
        let spec = SourceSpec::new("missing.xml");
        let err = mgr
            .get_cursor(&spec, false, &ParseOptions::default())
            .unwrap_err();
        assert!(matches!(err, CursorError::SourceBuild { .. }));
    }

    #[test]
    fn test_release_tombstones_without_id_reuse() {
        let mut mgr = manager();
        let spec = SourceSpec::new("doc.xml");
        let opts = ParseOptions::default();
        let a = mgr.get_cursor(&spec, true, &opts).unwrap();
        let released_id = a.tree_model().id();
        assert!(mgr.release(&a, false));
        assert!(!mgr.release(&a, false));
        assert!(mgr.tree(released_id).is_err());

        let b = mgr.get_cursor(&spec, true, &opts).unwrap();
        assert_ne!(b.tree_model().id(), released_id);
    }

    #[test]
    fn test_hard_release_evicts_shared_cache() {
        let mut mgr = manager();
        let spec = SourceSpec::new("doc.xml");
        let opts = ParseOptions::default();
        let a = mgr.get_cursor(&spec, false, &opts).unwrap();
        let first_id = a.tree_model().id();
        assert!(mgr.release(&a, true));
        let b = mgr.get_cursor(&spec, false, &opts).unwrap();
        assert_ne!(b.tree_model().id(), first_id);
    }

    #[test]
    fn test_soft_release_leaves_stale_cache_entry_recoverable() {
        let mut mgr = manager();
        let spec = SourceSpec::new("doc.xml");
        let opts = ParseOptions::default();
        let a = mgr.get_cursor(&spec, false, &opts).unwrap();
        mgr.release(&a, false);
        // Cache still names the released id; the lookup notices and rebuilds.
        let b = mgr.get_cursor(&spec, false, &opts).unwrap();
        assert!(mgr.tree(b.tree_model().id()).is_ok());
    }

    #[test]
    fn test_cursor_for_handle_round_trip() {
        let mut mgr = manager();
        let spec = SourceSpec::new("doc.xml");
        let cursor = mgr.get_cursor(&spec, false, &ParseOptions::default()).unwrap();
        let handle = cursor.node().unwrap();
        let again = mgr.cursor_for_handle(handle).unwrap();
        assert_eq!(again.node(), Some(handle));

        mgr.release(&cursor, true);
        assert!(mgr.cursor_for_handle(handle).is_none());
    }

    #[test]
    fn test_text_fragment_cursor() {
        let mut mgr = manager();
        let cursor = mgr.create_text_fragment("hello world");
        assert_eq!(cursor.node_kind(), Some(NodeKind::Document));
        assert_eq!(cursor.string_value(), "hello world");
        let mut children = cursor.typed_axis(Axis::Child, NodeKind::Text).unwrap();
        assert_eq!(children.get_length(), 1);
    }
}
