//! Interactive camera controls.
//!
//! The layer holds at most one [`Controls`] object. Controls own a target
//! point, a per-frame `update` step (damping/inertia) and an
//! [`EventDispatcher`] that announces [`ControlsEvent::Change`] whenever the
//! camera moved. [`OrbitControls`] is the built-in implementation.
//!
//! ```rust,ignore
//! layer.set_controls(OrbitControls::new, ControlsOptions {
//!     enable_damping: Some(true),
//!     ..Default::default()
//! });
//! ```

pub mod events;
pub mod orbit;

pub use events::{ControlsEvent, EventDispatcher, ListenerId};
pub use orbit::OrbitControls;

use std::any::Any;

use glam::Vec3;
use serde::Deserialize;

use crate::render::{SurfaceRect, SurfaceSize};
use crate::scene::Camera;

/// Interactive camera manipulation, bound to a camera and a surface.
pub trait Controls {
    /// Point the camera orbits around / looks at.
    fn target(&self) -> Vec3;

    /// Moves the target. Takes effect on the next [`update`](Self::update).
    fn set_target(&mut self, target: Vec3);

    /// One damping/inertia step. Emits [`ControlsEvent::Change`] and returns
    /// `true` if the camera moved; does nothing without residual motion.
    fn update(&mut self, camera: &mut Camera) -> bool;

    fn events(&self) -> &EventDispatcher;

    fn events_mut(&mut self) -> &mut EventDispatcher;

    /// Called after the viewport changed size.
    fn handle_resize(&mut self, _size: SurfaceSize) {}

    /// Copies caller configuration onto the instance. Fields the
    /// implementation has no notion of are ignored.
    fn apply_options(&mut self, _options: &ControlsOptions) {}

    /// Concrete access for implementation-specific input methods.
    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Caller configuration merged onto freshly built controls.
///
/// Every field is optional; `None` keeps the implementation's default.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ControlsOptions {
    /// Surface the controls listen on. Defaults to the layer's canvas.
    pub surface: Option<SurfaceRect>,
    pub target: Option<Vec3>,
    pub enable_damping: Option<bool>,
    pub damping_factor: Option<f32>,
    pub rotate_speed: Option<f32>,
    pub zoom_speed: Option<f32>,
    pub pan_speed: Option<f32>,
    pub min_distance: Option<f32>,
    pub max_distance: Option<f32>,
}

impl ControlsOptions {
    pub fn from_json(json: &str) -> crate::errors::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
