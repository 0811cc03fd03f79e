//! Viewport synchronization.
//!
//! Keeps the backend's drawing buffer and the camera's aspect ratio in step.
//! The layer calls into here from `set_size`, `adjust_size` and at
//! construction; controls resize hooks are handled by the layer itself
//! since they need the controls borrow.

use crate::errors::{OrreryError, Result};
use crate::render::{RenderBackend, SurfaceSize};
use crate::scene::Camera;

/// Rejects sizes the backend cannot represent.
pub fn validate(size: SurfaceSize) -> Result<SurfaceSize> {
    let ok = |v: f32| v.is_finite() && v >= 0.0;
    if ok(size.width) && ok(size.height) {
        Ok(size)
    } else {
        Err(OrreryError::InvalidSize {
            width: size.width,
            height: size.height,
        })
    }
}

/// Sets the camera aspect to `width / height` and rebuilds its projection.
///
/// Returns `false` when the projection has no aspect or the height is zero.
pub fn sync_camera_aspect(camera: &mut Camera, size: SurfaceSize) -> bool {
    if camera.aspect().is_none() {
        return false;
    }
    if size.height <= 0.0 {
        log::warn!(
            "Viewport height is {}, keeping camera aspect {:?}",
            size.height,
            camera.aspect()
        );
        return false;
    }
    camera.set_aspect(size.width / size.height);
    camera.update_projection_matrix();
    true
}

/// Resizes the backend surface, then synchronizes the camera.
pub fn apply_size(backend: &mut dyn RenderBackend, camera: &mut Camera, size: SurfaceSize) -> Result<bool> {
    let size = validate(size)?;
    backend.set_size(size);
    Ok(sync_camera_aspect(camera, size))
}

/// The pixel ratio a new layer starts with: the configured value if any,
/// else whatever the platform reports.
#[must_use]
pub fn initial_pixel_ratio(configured: Option<f32>, backend: &dyn RenderBackend) -> f32 {
    configured
        .filter(|r| r.is_finite() && *r > 0.0)
        .unwrap_or_else(|| backend.device_pixel_ratio())
}
