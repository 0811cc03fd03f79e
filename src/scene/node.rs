use crate::scene::NodeHandle;
use crate::scene::transform::Transform;
use glam::{Affine3A, Vec3};

/// What a node stands for in the scene tree.
///
/// Rendering data itself lives in the host engine; the layer only needs to
/// tell grouping nodes apart from drawables, and to recognise the anchor
/// that camera-relative objects hang from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// An empty container, created explicitly or by the path registry.
    Group,
    /// A drawable handed to the backend.
    Object,
    /// The node mirroring the layer's camera pose.
    CameraAnchor,
}

/// A scene node: identity, hierarchy, transform and visibility.
///
/// # Hierarchy
///
/// - `parent`: the owning node (`None` for the scene root and detached nodes)
/// - `children`: handles owned by this node
///
/// Use [`SceneGraph::attach`](crate::scene::SceneGraph::attach) to change the
/// hierarchy so both sides stay in sync.
#[derive(Debug, Clone)]
pub struct Node {
    /// Identity within the parent. Not required to be unique, but the path
    /// registry always gives siblings distinct names.
    pub name: String,
    pub kind: NodeKind,

    pub(crate) parent: Option<NodeHandle>,
    pub(crate) children: Vec<NodeHandle>,

    pub transform: Transform,

    pub visible: bool,
}

impl Node {
    fn with_kind(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            parent: None,
            children: Vec::new(),
            transform: Transform::new(),
            visible: true,
        }
    }

    /// Creates a drawable node.
    #[must_use]
    pub fn object(name: impl Into<String>) -> Self {
        Self::with_kind(name, NodeKind::Object)
    }

    /// Creates an empty grouping node.
    #[must_use]
    pub fn group(name: impl Into<String>) -> Self {
        Self::with_kind(name, NodeKind::Group)
    }

    pub(crate) fn camera_anchor(name: impl Into<String>) -> Self {
        Self::with_kind(name, NodeKind::CameraAnchor)
    }

    /// Builder-style local position.
    #[must_use]
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.transform.position = position;
        self
    }

    #[inline]
    #[must_use]
    pub fn is_group(&self) -> bool {
        self.kind == NodeKind::Group
    }

    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<NodeHandle> {
        self.parent
    }

    #[inline]
    #[must_use]
    pub fn children(&self) -> &[NodeHandle] {
        &self.children
    }

    /// Sets visibility to `visible`, or flips it when `None`.
    ///
    /// Returns the resulting flag.
    pub fn toggle(&mut self, visible: Option<bool>) -> bool {
        self.visible = visible.unwrap_or(!self.visible);
        self.visible
    }

    #[inline]
    #[must_use]
    pub fn world_matrix(&self) -> &Affine3A {
        &self.transform.world_matrix
    }
}
