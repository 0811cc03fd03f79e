//! Renderer collaborator.
//!
//! The layer never draws anything itself. A [`RenderBackend`] owns the
//! drawing surface and turns a [`SceneGraph`] seen through a [`Camera`] into
//! pixels. [`HeadlessBackend`] is a surface-less implementation that only
//! records what it was asked to do; it backs the tests and offscreen hosts.

use serde::Deserialize;

use crate::scene::{Camera, SceneGraph};
use crate::settings::ContextOptions;

/// Surface size in device-independent pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct SurfaceSize {
    pub width: f32,
    pub height: f32,
}

impl SurfaceSize {
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Layout box of a drawing surface, in CSS pixels relative to the page.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct SurfaceRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl SurfaceRect {
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[must_use]
    pub fn size(&self) -> SurfaceSize {
        SurfaceSize::new(self.width, self.height)
    }
}

/// Everything the layer needs from the underlying rendering engine.
pub trait RenderBackend {
    /// Applies context options. Called once, before anything else.
    fn configure(&mut self, _options: &ContextOptions) {}

    /// Resizes the drawing buffer to exactly `size`.
    fn set_size(&mut self, size: SurfaceSize);

    fn size(&self) -> SurfaceSize;

    fn pixel_ratio(&self) -> f32;

    fn set_pixel_ratio(&mut self, ratio: f32);

    /// The platform's pixel ratio, used when settings do not give one.
    fn device_pixel_ratio(&self) -> f32 {
        1.0
    }

    /// Current layout box of the canvas, if the surface has one.
    fn canvas_rect(&self) -> Option<SurfaceRect>;

    fn local_clipping(&self) -> bool;

    fn set_local_clipping(&mut self, enabled: bool);

    /// Draws `scene` through `camera`. Synchronous.
    fn render(&mut self, scene: &SceneGraph, camera: &Camera);
}

/// Counters kept by [`HeadlessBackend`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Number of `render` calls so far.
    pub frames: u64,
    /// Visible drawables submitted by the last frame.
    pub last_draw_count: usize,
    /// Camera projection version observed by the last frame.
    pub last_projection_version: u64,
}

/// A backend without a GPU surface.
#[derive(Debug, Clone)]
pub struct HeadlessBackend {
    size: SurfaceSize,
    pixel_ratio: f32,
    device_pixel_ratio: f32,
    canvas: Option<SurfaceRect>,
    clipping: bool,
    context: ContextOptions,
    stats: FrameStats,
}

impl Default for HeadlessBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessBackend {
    #[must_use]
    pub fn new() -> Self {
        Self {
            size: SurfaceSize::new(300.0, 150.0),
            pixel_ratio: 1.0,
            device_pixel_ratio: 1.0,
            canvas: None,
            clipping: false,
            context: ContextOptions::default(),
            stats: FrameStats::default(),
        }
    }

    /// Pretends the surface is a canvas laid out at `rect`.
    #[must_use]
    pub fn with_canvas(mut self, rect: SurfaceRect) -> Self {
        self.canvas = Some(rect);
        self
    }

    #[must_use]
    pub fn with_device_pixel_ratio(mut self, ratio: f32) -> Self {
        self.device_pixel_ratio = ratio;
        self
    }

    /// Moves the simulated canvas, as a responsive page layout would.
    pub fn relayout(&mut self, rect: SurfaceRect) {
        self.canvas = Some(rect);
    }

    #[must_use]
    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.stats.frames
    }

    #[must_use]
    pub fn context(&self) -> &ContextOptions {
        &self.context
    }
}

impl RenderBackend for HeadlessBackend {
    fn configure(&mut self, options: &ContextOptions) {
        self.context = *options;
    }

    fn set_size(&mut self, size: SurfaceSize) {
        self.size = size;
    }

    fn size(&self) -> SurfaceSize {
        self.size
    }

    fn pixel_ratio(&self) -> f32 {
        self.pixel_ratio
    }

    fn set_pixel_ratio(&mut self, ratio: f32) {
        self.pixel_ratio = ratio;
    }

    fn device_pixel_ratio(&self) -> f32 {
        self.device_pixel_ratio
    }

    fn canvas_rect(&self) -> Option<SurfaceRect> {
        self.canvas
    }

    fn local_clipping(&self) -> bool {
        self.clipping
    }

    fn set_local_clipping(&mut self, enabled: bool) {
        self.clipping = enabled;
    }

    fn render(&mut self, scene: &SceneGraph, camera: &Camera) {
        self.stats.frames += 1;
        self.stats.last_draw_count = scene.visible_object_count();
        self.stats.last_projection_version = camera.projection_version();
        log::trace!(
            "Headless frame {}: {} drawables",
            self.stats.frames,
            self.stats.last_draw_count
        );
    }
}
