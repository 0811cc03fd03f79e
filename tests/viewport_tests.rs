//! Viewport Tests
//!
//! Tests for:
//! - set_size / size round trip and input validation
//! - Camera aspect synchronization and projection refresh
//! - Canvas adoption (adjust_size, `canvas` setting)
//! - Pixel ratio defaults and overrides

use glam::Mat4;
use orrery::viewport;
use orrery::{
    Camera, HeadlessBackend, LayerSettings, OrreryError, Projection, RenderBackend, SceneLayer, SurfaceRect,
    SurfaceSize,
};

// ============================================================================
// Helper
// ============================================================================

const EPSILON: f32 = 1e-5;

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn layer_with(backend: HeadlessBackend, settings: LayerSettings) -> SceneLayer<HeadlessBackend> {
    SceneLayer::new(Camera::new_perspective(45.0, 1.0, 0.1, 100.0), backend, settings)
}

fn layer() -> SceneLayer<HeadlessBackend> {
    layer_with(HeadlessBackend::new(), LayerSettings::default())
}

// ============================================================================
// set_size / size
// ============================================================================

#[test]
fn headless_surface_starts_at_default_canvas_size() {
    let layer = layer();
    assert_eq!(layer.size(), SurfaceSize::new(300.0, 150.0));
}

#[test]
fn set_size_round_trips() -> orrery::Result<()> {
    let mut layer = layer();
    layer.set_size(800.0, 600.0)?;
    assert_eq!(layer.size(), SurfaceSize::new(800.0, 600.0));

    layer.set_size(1.0, 1.0)?.set_size(1920.0, 1080.0)?;
    assert_eq!(layer.size(), SurfaceSize::new(1920.0, 1080.0));
    Ok(())
}

#[test]
fn set_size_updates_aspect_and_refreshes_projection() -> orrery::Result<()> {
    let mut layer = layer();
    let version = layer.camera().projection_version();

    layer.set_size(800.0, 600.0)?;

    let aspect = layer.camera().aspect().expect("perspective camera has an aspect");
    assert!(approx_eq(aspect, 4.0 / 3.0));
    assert!(layer.camera().projection_version() > version);
    Ok(())
}

#[test]
fn projection_matrix_follows_new_aspect() -> orrery::Result<()> {
    let mut layer = layer();
    layer.set_size(800.0, 400.0)?;

    let expected = Mat4::perspective_rh(45f32.to_radians(), 2.0, 0.1, 100.0);
    assert!(layer.camera().projection_matrix().abs_diff_eq(expected, EPSILON));
    Ok(())
}

#[test]
fn orthographic_aspect_is_synchronized() -> orrery::Result<()> {
    let mut layer = SceneLayer::new(
        Camera::new_orthographic(5.0, 1.0, 0.1, 100.0),
        HeadlessBackend::new(),
        LayerSettings::default(),
    );
    layer.set_size(500.0, 250.0)?;
    assert!(approx_eq(layer.camera().aspect().unwrap(), 2.0));
    Ok(())
}

#[test]
fn custom_projection_is_left_alone() -> orrery::Result<()> {
    let mut layer = SceneLayer::new(
        Camera::with_projection(Projection::Custom(Mat4::IDENTITY)),
        HeadlessBackend::new(),
        LayerSettings::default(),
    );
    let version = layer.camera().projection_version();

    layer.set_size(640.0, 480.0)?;

    assert_eq!(layer.size(), SurfaceSize::new(640.0, 480.0));
    assert_eq!(layer.camera().aspect(), None);
    assert_eq!(layer.camera().projection_version(), version);
    assert_eq!(*layer.camera().projection_matrix(), Mat4::IDENTITY);
    Ok(())
}

#[test]
fn zero_height_keeps_previous_aspect() -> orrery::Result<()> {
    let mut layer = layer();
    layer.set_size(400.0, 200.0)?;
    let version = layer.camera().projection_version();

    layer.set_size(400.0, 0.0)?;

    assert_eq!(layer.size(), SurfaceSize::new(400.0, 0.0));
    assert!(approx_eq(layer.camera().aspect().unwrap(), 2.0));
    assert_eq!(layer.camera().projection_version(), version);
    Ok(())
}

#[test]
fn invalid_sizes_are_rejected() {
    let mut layer = layer();

    let err = layer.set_size(-1.0, 5.0).err().expect("negative width must fail");
    assert!(matches!(err, OrreryError::InvalidSize { .. }));

    assert!(layer.set_size(f32::NAN, 5.0).is_err());
    assert!(layer.set_size(10.0, f32::INFINITY).is_err());

    // Nothing was applied.
    assert_eq!(layer.size(), SurfaceSize::new(300.0, 150.0));
}

#[test]
fn validate_accepts_zero() {
    assert!(viewport::validate(SurfaceSize::new(0.0, 0.0)).is_ok());
    assert!(viewport::validate(SurfaceSize::new(-0.5, 1.0)).is_err());
}

#[test]
fn sync_camera_aspect_reports_what_it_did() {
    let mut camera = Camera::new_perspective(60.0, 1.0, 0.1, 10.0);
    assert!(viewport::sync_camera_aspect(&mut camera, SurfaceSize::new(300.0, 100.0)));
    assert!(approx_eq(camera.aspect().unwrap(), 3.0));
    assert!(!viewport::sync_camera_aspect(&mut camera, SurfaceSize::new(300.0, 0.0)));
}

// ============================================================================
// Canvas Adoption
// ============================================================================

#[test]
fn adjust_size_reads_canvas_layout_box() -> orrery::Result<()> {
    let backend = HeadlessBackend::new().with_canvas(SurfaceRect::new(10.0, 20.0, 640.0, 480.0));
    let mut layer = layer_with(backend, LayerSettings::default());

    // Not adopted until asked.
    assert_eq!(layer.size(), SurfaceSize::new(300.0, 150.0));

    layer.adjust_size()?;
    assert_eq!(layer.size(), SurfaceSize::new(640.0, 480.0));
    assert!(approx_eq(layer.camera().aspect().unwrap(), 640.0 / 480.0));

    layer.backend_mut().relayout(SurfaceRect::new(0.0, 0.0, 1024.0, 512.0));
    layer.adjust_size()?;
    assert_eq!(layer.size(), SurfaceSize::new(1024.0, 512.0));
    Ok(())
}

#[test]
fn adjust_size_without_canvas_is_noop() -> orrery::Result<()> {
    let mut layer = layer();
    layer.adjust_size()?;
    assert_eq!(layer.size(), SurfaceSize::new(300.0, 150.0));
    assert_eq!(layer.canvas(), None);
    Ok(())
}

#[test]
fn canvas_setting_adopts_size_at_construction() {
    let backend = HeadlessBackend::new().with_canvas(SurfaceRect::new(0.0, 0.0, 320.0, 240.0));
    let settings = LayerSettings {
        canvas: true,
        ..Default::default()
    };
    let layer = layer_with(backend, settings);

    assert_eq!(layer.size(), SurfaceSize::new(320.0, 240.0));
    assert_eq!(layer.canvas().map(|r| r.size()), Some(SurfaceSize::new(320.0, 240.0)));
    assert!(approx_eq(layer.camera().aspect().unwrap(), 4.0 / 3.0));
}

// ============================================================================
// Pixel Ratio
// ============================================================================

#[test]
fn pixel_ratio_defaults_to_device_ratio() {
    let layer = layer_with(
        HeadlessBackend::new().with_device_pixel_ratio(2.0),
        LayerSettings::default(),
    );
    assert!(approx_eq(layer.pixel_ratio(), 2.0));
}

#[test]
fn configured_pixel_ratio_wins() {
    let settings = LayerSettings {
        pixel_ratio: Some(1.5),
        ..Default::default()
    };
    let layer = layer_with(HeadlessBackend::new().with_device_pixel_ratio(3.0), settings);
    assert!(approx_eq(layer.pixel_ratio(), 1.5));
}

#[test]
fn invalid_configured_ratio_falls_back_to_device() {
    let backend = HeadlessBackend::new().with_device_pixel_ratio(2.0);
    assert!(approx_eq(viewport::initial_pixel_ratio(Some(0.0), &backend), 2.0));
    assert!(approx_eq(viewport::initial_pixel_ratio(None, &backend), 2.0));
    assert!(approx_eq(backend.device_pixel_ratio(), 2.0));
}

#[test]
fn set_pixel_ratio_forwards_to_backend() {
    let mut layer = layer();
    layer.set_pixel_ratio(2.5);
    assert!(approx_eq(layer.backend().pixel_ratio(), 2.5));
}
