#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

//! A thin scene-graph management layer.
//!
//! [`SceneLayer`] sits between an application and a rendering engine: it owns
//! a camera, a scene root, a renderer surface (behind [`RenderBackend`]),
//! optional interactive [`Controls`], and a registry of addressable objects.

pub mod controls;
pub mod errors;
pub mod layer;
pub mod projector;
pub mod registry;
pub mod render;
pub mod scene;
pub mod settings;
pub mod viewport;

pub use controls::{Controls, ControlsEvent, ControlsOptions, EventDispatcher, OrbitControls};
pub use errors::{OrreryError, Result};
pub use layer::{ObjectRef, SceneLayer};
pub use projector::{OverlayElement, OverlayStyle, ScreenPosition};
pub use registry::ObjectRegistry;
pub use render::{FrameStats, HeadlessBackend, RenderBackend, SurfaceRect, SurfaceSize};
pub use scene::{Camera, CameraParam, CameraParameters, Node, NodeHandle, NodeKind, Projection, SceneGraph};
pub use settings::{ContextOptions, LayerProfile, LayerSettings, MissingPolicy};
