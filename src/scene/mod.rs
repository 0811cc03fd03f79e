//! Scene graph module
//!
//! - [`Node`]: hierarchy entry with transform and visibility
//! - [`Transform`]: TRS with cached matrices and dirty checking
//! - [`SceneGraph`]: node storage with a single root
//! - [`Camera`]: projection model, pose and declarative properties

pub mod camera;
pub mod graph;
pub mod node;
pub mod transform;

pub use camera::{Camera, CameraParam, CameraParameters, Projection, PropertyKind};
pub use graph::SceneGraph;
pub use node::{Node, NodeKind};
pub use transform::Transform;

use slotmap::new_key_type;

new_key_type! {
    /// Generational handle to a node in a [`SceneGraph`].
    pub struct NodeHandle;
}
