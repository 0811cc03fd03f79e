//! Scene tree storage.
//!
//! [`SceneGraph`] owns every node in a [`SlotMap`] and keeps exactly one
//! root. Nodes are either reachable from the root or *detached*: still
//! alive, addressable through their handle, but not drawn until they are
//! attached again.

use glam::{Affine3A, Vec3};
use slotmap::SlotMap;

use crate::scene::NodeHandle;
use crate::scene::node::{Node, NodeKind};

/// The scene root and all nodes below it.
pub struct SceneGraph {
    nodes: SlotMap<NodeHandle, Node>,
    root: NodeHandle,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph {
    #[must_use]
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(Node::group("Scene"));
        Self { nodes, root }
    }

    #[inline]
    #[must_use]
    pub fn root(&self) -> NodeHandle {
        self.root
    }

    #[inline]
    #[must_use]
    pub fn get(&self, handle: NodeHandle) -> Option<&Node> {
        self.nodes.get(handle)
    }

    #[inline]
    pub fn get_mut(&mut self, handle: NodeHandle) -> Option<&mut Node> {
        self.nodes.get_mut(handle)
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, handle: NodeHandle) -> bool {
        self.nodes.contains_key(handle)
    }

    /// Number of live nodes, root included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// `true` when nothing but the root is alive.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    // ========================================================================
    // Insertion & Hierarchy
    // ========================================================================

    /// Inserts a node without a parent.
    pub fn insert(&mut self, mut node: Node) -> NodeHandle {
        node.parent = None;
        node.children.clear();
        self.nodes.insert(node)
    }

    /// Inserts a node as a child of the root.
    pub fn add(&mut self, node: Node) -> NodeHandle {
        let root = self.root;
        self.add_to_parent(node, root)
    }

    /// Inserts a node as a child of `parent`. Falls back to the root when
    /// `parent` is stale.
    pub fn add_to_parent(&mut self, node: Node, parent: NodeHandle) -> NodeHandle {
        let handle = self.insert(node);
        let parent = if self.contains(parent) {
            parent
        } else {
            log::warn!("Parent node not found, attaching to the scene root");
            self.root
        };
        self.attach(handle, parent);
        handle
    }

    /// Makes `child` a child of `parent`, detaching it from its previous parent.
    ///
    /// Attaching a node to itself, to one of its own descendants, or moving
    /// the root are rejected with a warning and leave the tree unchanged.
    pub fn attach(&mut self, child: NodeHandle, parent: NodeHandle) -> bool {
        if child == parent {
            log::warn!("Cannot attach node to itself!");
            return false;
        }
        if child == self.root {
            log::warn!("The scene root cannot be reparented");
            return false;
        }
        if !self.contains(child) || !self.contains(parent) {
            log::error!("Node not found during attach!");
            return false;
        }
        if self.is_ancestor(child, parent) {
            log::warn!("Cannot attach a node below one of its own descendants");
            return false;
        }

        self.detach(child);

        if let Some(p) = self.nodes.get_mut(parent) {
            p.children.push(child);
        }
        if let Some(c) = self.nodes.get_mut(child) {
            c.parent = Some(parent);
            c.transform.mark_dirty();
        }
        true
    }

    /// Unlinks `handle` from its parent. The node and its subtree stay alive.
    pub fn detach(&mut self, handle: NodeHandle) {
        let Some(parent) = self.nodes.get(handle).and_then(|n| n.parent) else {
            return;
        };
        if let Some(p) = self.nodes.get_mut(parent)
            && let Some(i) = p.children.iter().position(|&x| x == handle)
        {
            p.children.remove(i);
        }
        if let Some(n) = self.nodes.get_mut(handle) {
            n.parent = None;
        }
    }

    /// Deletes `handle` and its whole subtree. The root cannot be removed.
    pub fn remove_node(&mut self, handle: NodeHandle) {
        if handle == self.root {
            log::warn!("The scene root cannot be removed");
            return;
        }
        self.detach(handle);

        let mut stack = vec![handle];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.remove(current) {
                stack.extend(node.children);
            }
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// `true` if `ancestor` lies on the parent chain of `handle` (or is it).
    #[must_use]
    pub fn is_ancestor(&self, ancestor: NodeHandle, handle: NodeHandle) -> bool {
        let mut current = Some(handle);
        while let Some(h) = current {
            if h == ancestor {
                return true;
            }
            current = self.nodes.get(h).and_then(|n| n.parent);
        }
        false
    }

    /// `true` if `handle` is reachable from the root.
    #[must_use]
    pub fn is_attached(&self, handle: NodeHandle) -> bool {
        self.contains(handle) && self.is_ancestor(self.root, handle)
    }

    /// Number of edges between the root and `handle`.
    ///
    /// `None` for stale handles and detached subtrees.
    #[must_use]
    pub fn depth(&self, handle: NodeHandle) -> Option<usize> {
        let mut depth = 0;
        let mut current = handle;
        loop {
            if current == self.root {
                return Some(depth);
            }
            current = self.nodes.get(current)?.parent?;
            depth += 1;
        }
    }

    /// Direct children of `handle` (empty for stale handles).
    #[must_use]
    pub fn children(&self, handle: NodeHandle) -> &[NodeHandle] {
        self.nodes.get(handle).map_or(&[], |n| n.children.as_slice())
    }

    /// Depth-first search below the root for the first node called `name`.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<NodeHandle> {
        let mut stack: Vec<NodeHandle> = self.children(self.root).iter().rev().copied().collect();
        while let Some(handle) = stack.pop() {
            let Some(node) = self.nodes.get(handle) else {
                continue;
            };
            if node.name == name {
                return Some(handle);
            }
            stack.extend(node.children.iter().rev().copied());
        }
        None
    }

    /// Visits every node below the root whose whole ancestor chain is visible,
    /// in depth-first order. Nothing is visited when the root is hidden.
    pub fn for_each_visible(&self, mut f: impl FnMut(NodeHandle, &Node)) {
        let Some(root) = self.nodes.get(self.root) else {
            return;
        };
        if !root.visible {
            return;
        }
        let mut stack: Vec<NodeHandle> = root.children.iter().rev().copied().collect();
        while let Some(handle) = stack.pop() {
            let Some(node) = self.nodes.get(handle) else {
                continue;
            };
            if !node.visible {
                continue;
            }
            f(handle, node);
            stack.extend(node.children.iter().rev().copied());
        }
    }

    /// Counts the visible drawables, as a backend would submit them.
    #[must_use]
    pub fn visible_object_count(&self) -> usize {
        let mut count = 0;
        self.for_each_visible(|_, node| {
            if node.kind == NodeKind::Object {
                count += 1;
            }
        });
        count
    }

    // ========================================================================
    // Matrix Update
    // ========================================================================

    /// Recomputes world matrices for everything reachable from the root.
    ///
    /// Iterative so deep hierarchies cannot overflow the stack.
    pub fn update_matrix_world(&mut self) {
        let mut stack: Vec<(NodeHandle, Affine3A, bool)> = vec![(self.root, Affine3A::IDENTITY, false)];

        while let Some((handle, parent_world, parent_changed)) = stack.pop() {
            let Some(node) = self.nodes.get_mut(handle) else {
                continue;
            };
            let local_changed = node.transform.update_local_matrix();
            let changed = local_changed || parent_changed;
            if changed {
                let world = parent_world * node.transform.local_matrix;
                node.transform.set_world_matrix(world);
            }
            let world = node.transform.world_matrix;
            for &child in &node.children {
                stack.push((child, world, changed));
            }
        }
    }

    /// World-space position from the last matrix update.
    #[must_use]
    pub fn world_position(&self, handle: NodeHandle) -> Option<Vec3> {
        self.nodes.get(handle).map(|n| n.transform.world_position())
    }
}
