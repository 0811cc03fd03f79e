//! Path registry.
//!
//! Maps slash-separated paths such as `"solar/earth/moon"` to scene nodes.
//! Adding a node under a path creates (and registers) an empty group for
//! every missing prefix, so the registry and the tree always agree: the
//! node at `a/b` is a child of the node at `a`, which hangs off the root.
//!
//! The registry never removes entries. Detaching or deleting a node through
//! the scene graph leaves its key in place; lookups on the layer filter out
//! handles that no longer point at a live node.

use rustc_hash::FxHashMap;

use crate::scene::{Node, NodeHandle, SceneGraph};

/// Splits `path` into its parent path and leaf name.
///
/// The parent is re-joined with `/`; a path without separators has an empty
/// parent.
#[must_use]
pub fn split_path(path: &str) -> (&str, &str) {
    path.rsplit_once('/').unwrap_or(("", path))
}

/// Path-string to node mapping with implicit intermediate groups.
#[derive(Debug, Default)]
pub struct ObjectRegistry {
    entries: FxHashMap<String, NodeHandle>,
}

impl ObjectRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw lookup by full path. The handle may be stale.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<NodeHandle> {
        self.entries.get(path).copied()
    }

    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered paths, in no particular order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Attaches `node` under `path`, naming it after the last segment.
    ///
    /// Missing groups along the way are created first. Re-adding a path
    /// points the key at the new node; the previous node stays in the tree.
    pub fn add(&mut self, graph: &mut SceneGraph, path: &str, mut node: Node) -> NodeHandle {
        let (parent_path, leaf) = split_path(path);
        let parent = self.group(graph, parent_path);

        node.name = leaf.to_owned();
        let handle = graph.add_to_parent(node, parent);
        if let Some(previous) = self.entries.insert(path.to_owned(), handle)
            && previous != handle
        {
            log::debug!("Registry key '{path}' now points at a new node");
        }
        handle
    }

    /// Returns the node registered at `path`, or creates an empty group
    /// there (and for each missing parent).
    ///
    /// An empty path is the scene root. Any registered node can act as a
    /// parent, not only groups. An entry whose node has been deleted is
    /// recreated in place.
    pub fn group(&mut self, graph: &mut SceneGraph, path: &str) -> NodeHandle {
        if path.is_empty() {
            return graph.root();
        }

        if let Some(handle) = self.get(path) {
            if graph.contains(handle) {
                return handle;
            }
            log::debug!("Registry entry '{path}' was deleted, recreating it as a group");
        }

        let (parent_path, leaf) = split_path(path);
        let parent = self.group(graph, parent_path);
        let handle = graph.add_to_parent(Node::group(leaf), parent);
        self.entries.insert(path.to_owned(), handle);
        handle
    }
}
