//! Camera Tests
//!
//! Tests for:
//! - Perspective/Orthographic/Custom projection matrix generation
//! - Aspect capability and projection versioning
//! - Zoom
//! - View matrix and point projection
//! - Declarative property kinds and parameter parsing

use glam::{Mat4, Vec3};
use orrery::scene::PropertyKind;
use orrery::{Camera, CameraParam, CameraParameters, Projection};

const EPSILON: f32 = 1e-4;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

// ============================================================================
// Projection Matrix Tests
// ============================================================================

#[test]
fn perspective_matches_glam() {
    let cam = Camera::new_perspective(60.0, 1.5, 0.1, 50.0);
    let expected = Mat4::perspective_rh(60f32.to_radians(), 1.5, 0.1, 50.0);
    assert!(cam.projection_matrix().abs_diff_eq(expected, EPSILON));
}

#[test]
fn orthographic_spans_half_height_times_aspect() {
    let cam = Camera::new_orthographic(5.0, 2.0, 0.1, 100.0);
    let expected = Mat4::orthographic_rh(-10.0, 10.0, -5.0, 5.0, 0.1, 100.0);
    assert!(cam.projection_matrix().abs_diff_eq(expected, EPSILON));
}

#[test]
fn custom_projection_is_used_verbatim() {
    let m = Mat4::from_scale(Vec3::new(2.0, 3.0, 4.0));
    let cam = Camera::with_projection(Projection::Custom(m));
    assert_eq!(*cam.projection_matrix(), m);
    assert_eq!(cam.aspect(), None);
}

#[test]
fn set_aspect_requires_an_aspect() {
    let mut persp = Camera::new_perspective(45.0, 1.0, 0.1, 10.0);
    assert!(persp.set_aspect(2.0));
    assert_eq!(persp.aspect(), Some(2.0));

    let mut custom = Camera::with_projection(Projection::Custom(Mat4::IDENTITY));
    assert!(!custom.set_aspect(2.0));
    assert_eq!(custom.aspect(), None);
}

#[test]
fn set_aspect_does_not_rebuild_matrix() {
    let mut cam = Camera::new_perspective(45.0, 1.0, 0.1, 10.0);
    let version = cam.projection_version();
    let before = *cam.projection_matrix();

    cam.set_aspect(3.0);
    assert_eq!(cam.projection_version(), version);
    assert_eq!(*cam.projection_matrix(), before);

    cam.update_projection_matrix();
    assert_eq!(cam.projection_version(), version + 1);
    assert_ne!(*cam.projection_matrix(), before);
}

#[test]
fn set_projection_rebuilds() {
    let mut cam = Camera::new_perspective(45.0, 1.0, 0.1, 10.0);
    let version = cam.projection_version();
    cam.set_projection(Projection::Orthographic {
        half_height: 1.0,
        aspect: 1.0,
        near: 0.1,
        far: 10.0,
    });
    assert_eq!(cam.projection_version(), version + 1);
    assert_eq!(cam.aspect(), Some(1.0));
}

#[test]
fn zoom_narrows_the_view() {
    let mut cam = Camera::new_perspective(90.0, 1.0, 0.1, 100.0);
    cam.set_position(Vec3::new(0.0, 0.0, 10.0));

    let before = cam.project(Vec3::new(0.5, 0.0, 9.0));
    cam.zoom = 2.0;
    cam.update_projection_matrix();
    let after = cam.project(Vec3::new(0.5, 0.0, 9.0));

    assert!(approx(before.x, 0.5));
    assert!(approx(after.x, 1.0));
}

#[test]
fn orthographic_zoom_halves_extent() {
    let mut cam = Camera::new_orthographic(4.0, 1.0, 0.1, 100.0);
    cam.set_position(Vec3::new(0.0, 0.0, 10.0));
    cam.zoom = 2.0;
    cam.update_projection_matrix();

    let ndc = cam.project(Vec3::new(0.0, 2.0, 0.0));
    assert!(approx(ndc.y, 1.0));
}

// ============================================================================
// View & Projection of Points
// ============================================================================

#[test]
fn view_matrix_inverts_pose() {
    let mut cam = Camera::new_perspective(45.0, 1.0, 0.1, 100.0);
    cam.set_position(Vec3::new(3.0, 4.0, 5.0));
    let eye = cam.view_matrix().transform_point3(Vec3::new(3.0, 4.0, 5.0));
    assert!(approx(eye.length(), 0.0));
}

#[test]
fn look_at_centers_target() {
    let mut cam = Camera::new_perspective(45.0, 1.0, 0.1, 100.0);
    cam.set_position(Vec3::new(7.0, 3.0, -2.0));
    let target = Vec3::new(-1.0, 0.5, 4.0);
    assert!(cam.look_at(target));

    let ndc = cam.project(target);
    assert!(approx(ndc.x, 0.0));
    assert!(approx(ndc.y, 0.0));
    assert!(ndc.z > -1.0 && ndc.z < 1.0);
}

#[test]
fn look_at_uses_camera_up() {
    let mut cam = Camera::new_perspective(45.0, 1.0, 0.1, 100.0);
    cam.up = Vec3::Z;
    cam.set_position(Vec3::new(0.0, 10.0, 0.0));
    // Looking straight down works once `up` is not parallel to the view.
    assert!(cam.look_at(Vec3::ZERO));
    assert!(approx((cam.transform.rotation * Vec3::NEG_Z).y, -1.0));
}

// ============================================================================
// Declarative Properties
// ============================================================================

#[test]
fn property_kinds_follow_projection() {
    let persp = Camera::new_perspective(45.0, 1.0, 0.1, 10.0);
    assert_eq!(persp.property_kind("position"), Some(PropertyKind::Vector));
    assert_eq!(persp.property_kind("up"), Some(PropertyKind::Vector));
    assert_eq!(persp.property_kind("fov"), Some(PropertyKind::Scalar));
    assert_eq!(persp.property_kind("zoom"), Some(PropertyKind::Scalar));
    assert_eq!(persp.property_kind("focal_point"), None);

    let ortho = Camera::new_orthographic(1.0, 1.0, 0.1, 10.0);
    assert_eq!(ortho.property_kind("fov"), None);
    assert_eq!(ortho.property_kind("near"), Some(PropertyKind::Scalar));

    let custom = Camera::with_projection(Projection::Custom(Mat4::IDENTITY));
    assert_eq!(custom.property_kind("far"), None);
    assert_eq!(custom.property_kind("zoom"), Some(PropertyKind::Scalar));
}

#[test]
fn scalar_fov_is_in_degrees() {
    let mut cam = Camera::new_perspective(45.0, 1.0, 0.1, 10.0);
    assert!(cam.set_scalar_property("fov", 90.0));
    match *cam.projection() {
        Projection::Perspective { fov_y, .. } => assert!(approx(fov_y, std::f32::consts::FRAC_PI_2)),
        other => panic!("unexpected projection {other:?}"),
    }
    assert!(!cam.set_scalar_property("unknown", 1.0));
}

#[test]
fn parameters_parse_scalars_and_vectors() -> orrery::Result<()> {
    let params = CameraParameters::from_json(r#"{ "zoom": 1.5, "position": [1, 2, 3] }"#)?;
    assert_eq!(params.len(), 2);

    let collected: Vec<(&str, CameraParam)> = params.iter().map(|(k, v)| (k, *v)).collect();
    assert!(collected.contains(&("zoom", CameraParam::Scalar(1.5))));
    assert!(collected.contains(&("position", CameraParam::Vector(Vec3::new(1.0, 2.0, 3.0)))));
    Ok(())
}

#[test]
fn parameters_reject_other_shapes() {
    assert!(CameraParameters::from_json(r#"{ "position": "far away" }"#).is_err());
    assert!(CameraParameters::new().is_empty());
}
