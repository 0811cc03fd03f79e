//! World-to-screen projection for overlays.
//!
//! Used to pin HTML-like labels on top of 3D content: a world point goes
//! through the camera's view-projection into normalized device coordinates,
//! then gets remapped to pixels with a top-left origin.
//!
//! Points behind the camera or outside the frustum are projected all the
//! same; callers that want to hide off-screen labels check the result
//! against the viewport themselves.

use glam::{Vec2, Vec3};

use crate::render::SurfaceSize;
use crate::scene::Camera;

/// Something that can be positioned in screen pixels.
pub trait OverlayElement {
    /// Receives the rounded `left`/`top` offsets in CSS pixels.
    fn set_screen_position(&mut self, left: i32, top: i32);
}

/// Rounded pixel position written to an overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScreenPosition {
    pub left: i32,
    pub top: i32,
}

impl ScreenPosition {
    /// Rounds half-way values up, as browsers' `Math.round` does.
    #[must_use]
    pub fn from_pixels(pixels: Vec2) -> Self {
        Self {
            left: (pixels.x + 0.5).floor() as i32,
            top: (pixels.y + 0.5).floor() as i32,
        }
    }
}

/// Inline `left`/`top` style of an absolutely positioned element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverlayStyle {
    pub left: i32,
    pub top: i32,
}

impl OverlayStyle {
    #[must_use]
    pub fn left_css(&self) -> String {
        format!("{}px", self.left)
    }

    #[must_use]
    pub fn top_css(&self) -> String {
        format!("{}px", self.top)
    }

    /// `"left: 12px; top: 34px;"`
    #[must_use]
    pub fn to_css(&self) -> String {
        format!("left: {}; top: {};", self.left_css(), self.top_css())
    }
}

impl OverlayElement for OverlayStyle {
    fn set_screen_position(&mut self, left: i32, top: i32) {
        self.left = left;
        self.top = top;
    }
}

/// Maps NDC x/y in `[-1, 1]` onto a `size`-sized viewport, y pointing down.
#[must_use]
pub fn ndc_to_pixels(ndc: Vec3, size: SurfaceSize) -> Vec2 {
    Vec2::new(
        (1.0 + ndc.x) / 2.0 * size.width,
        (1.0 - ndc.y) / 2.0 * size.height,
    )
}

/// Projects `point` to unrounded viewport pixels, plus `offset`.
#[must_use]
pub fn project_to_screen(camera: &Camera, point: Vec3, size: SurfaceSize, offset: Option<Vec2>) -> Vec2 {
    let ndc = camera.project(point);
    ndc_to_pixels(ndc, size) + offset.unwrap_or(Vec2::ZERO)
}

/// Projects `point` and writes the rounded position onto `element`.
pub fn place(
    element: &mut (impl OverlayElement + ?Sized),
    camera: &Camera,
    point: Vec3,
    size: SurfaceSize,
    offset: Option<Vec2>,
) -> ScreenPosition {
    let position = ScreenPosition::from_pixels(project_to_screen(camera, point, size, offset));
    element.set_screen_position(position.left, position.top);
    position
}
