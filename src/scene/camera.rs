use std::borrow::Cow;
use std::collections::BTreeMap;

use glam::{Affine3A, Mat4, Vec3};
use serde::Deserialize;
use uuid::Uuid;

use crate::scene::transform::Transform;

/// Projection model of a [`Camera`].
///
/// Only the perspective and orthographic variants carry an aspect ratio;
/// the viewport keeps it in sync through [`Camera::set_aspect`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    Perspective {
        /// Vertical field of view, radians.
        fov_y: f32,
        aspect: f32,
        near: f32,
        far: f32,
    },
    Orthographic {
        /// Half of the visible height in world units.
        half_height: f32,
        aspect: f32,
        near: f32,
        far: f32,
    },
    /// A fixed matrix supplied by the host. Has no aspect ratio.
    Custom(Mat4),
}

/// How a camera property is assigned by [`Camera::set_vector_property`] and
/// [`Camera::set_scalar_property`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    /// Set in place, component-wise.
    Vector,
    /// Plain assignment.
    Scalar,
}

/// A single declarative camera parameter value.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum CameraParam {
    Scalar(f32),
    Vector(Vec3),
}

impl From<f32> for CameraParam {
    fn from(value: f32) -> Self {
        Self::Scalar(value)
    }
}

impl From<Vec3> for CameraParam {
    fn from(value: Vec3) -> Self {
        Self::Vector(value)
    }
}

impl From<[f32; 3]> for CameraParam {
    fn from(value: [f32; 3]) -> Self {
        Self::Vector(Vec3::from_array(value))
    }
}

/// An ordered set of declarative camera parameters.
///
/// ```rust,ignore
/// let params = CameraParameters::new()
///     .with("position", [0.0, 5.0, 20.0])
///     .with("zoom", 1.5)
///     .with("focal_point", Vec3::ZERO);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "BTreeMap<String, CameraParam>")]
pub struct CameraParameters(Vec<(String, CameraParam)>);

impl CameraParameters {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<CameraParam>) -> Self {
        self.0.push((key.into(), value.into()));
        self
    }

    /// Parses a JSON object such as `{"position": [0, 0, 10], "zoom": 2}`.
    pub fn from_json(json: &str) -> crate::errors::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CameraParam)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<BTreeMap<String, CameraParam>> for CameraParameters {
    fn from(map: BTreeMap<String, CameraParam>) -> Self {
        Self(map.into_iter().collect())
    }
}

/// A camera owned by a [`SceneLayer`](crate::SceneLayer).
///
/// The pose lives in [`Camera::transform`]; the view matrix is its inverse.
/// `projection_version` increments every time the projection matrix is
/// rebuilt so callers can tell whether a refresh happened.
#[derive(Debug, Clone)]
pub struct Camera {
    pub uuid: Uuid,
    pub name: Cow<'static, str>,

    pub transform: Transform,
    pub up: Vec3,
    pub zoom: f32,

    projection: Projection,
    projection_matrix: Mat4,
    projection_version: u64,
}

impl Camera {
    /// Perspective camera; `fov_degrees` is the vertical field of view.
    #[must_use]
    pub fn new_perspective(fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self::with_projection(Projection::Perspective {
            fov_y: fov_degrees.to_radians(),
            aspect,
            near,
            far,
        })
    }

    #[must_use]
    pub fn new_orthographic(half_height: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self::with_projection(Projection::Orthographic {
            half_height,
            aspect,
            near,
            far,
        })
    }

    #[must_use]
    pub fn with_projection(projection: Projection) -> Self {
        let mut cam = Self {
            uuid: Uuid::new_v4(),
            name: Cow::Borrowed("Camera"),
            transform: Transform::new(),
            up: Vec3::Y,
            zoom: 1.0,
            projection,
            projection_matrix: Mat4::IDENTITY,
            projection_version: 0,
        };
        cam.update_projection_matrix();
        cam
    }

    // ========================================================================
    // Projection
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    /// Replaces the projection model and rebuilds the matrix.
    pub fn set_projection(&mut self, projection: Projection) {
        self.projection = projection;
        self.update_projection_matrix();
    }

    /// The aspect ratio, for projections that have one.
    #[must_use]
    pub fn aspect(&self) -> Option<f32> {
        match self.projection {
            Projection::Perspective { aspect, .. } | Projection::Orthographic { aspect, .. } => {
                Some(aspect)
            }
            Projection::Custom(_) => None,
        }
    }

    /// Stores a new aspect ratio. Returns `false` (and changes nothing) when
    /// the projection has no aspect. Does not rebuild the matrix.
    pub fn set_aspect(&mut self, value: f32) -> bool {
        match &mut self.projection {
            Projection::Perspective { aspect, .. } | Projection::Orthographic { aspect, .. } => {
                *aspect = value;
                true
            }
            Projection::Custom(_) => false,
        }
    }

    /// Rebuilds the projection matrix from the projection model and zoom.
    pub fn update_projection_matrix(&mut self) {
        let zoom = if self.zoom > 0.0 { self.zoom } else { 1.0 };
        self.projection_matrix = match self.projection {
            Projection::Perspective {
                fov_y,
                aspect,
                near,
                far,
            } => {
                let fov = 2.0 * ((fov_y * 0.5).tan() / zoom).atan();
                Mat4::perspective_rh(fov, aspect, near, far)
            }
            Projection::Orthographic {
                half_height,
                aspect,
                near,
                far,
            } => {
                let h = half_height / zoom;
                let w = h * aspect;
                Mat4::orthographic_rh(-w, w, -h, h, near, far)
            }
            Projection::Custom(m) => m,
        };
        self.projection_version = self.projection_version.wrapping_add(1);
    }

    #[inline]
    #[must_use]
    pub fn projection_matrix(&self) -> &Mat4 {
        &self.projection_matrix
    }

    /// Number of projection matrix rebuilds so far.
    #[inline]
    #[must_use]
    pub fn projection_version(&self) -> u64 {
        self.projection_version
    }

    // ========================================================================
    // Pose
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn position(&self) -> Vec3 {
        self.transform.position
    }

    #[inline]
    pub fn set_position(&mut self, position: Vec3) {
        self.transform.position = position;
    }

    /// Turns the camera towards `target` using the camera's `up` vector.
    pub fn look_at(&mut self, target: Vec3) -> bool {
        let up = self.up;
        self.transform.look_at(target, up)
    }

    /// Camera-to-world transform built from the current TRS, without
    /// touching the transform's cached matrices.
    #[must_use]
    pub fn world_matrix(&self) -> Affine3A {
        Affine3A::from_scale_rotation_translation(
            self.transform.scale,
            self.transform.rotation,
            self.transform.position,
        )
    }

    #[must_use]
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from(self.world_matrix()).inverse()
    }

    #[must_use]
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix * self.view_matrix()
    }

    /// Maps a world-space point to normalized device coordinates.
    #[must_use]
    pub fn project(&self, point: Vec3) -> Vec3 {
        self.view_projection_matrix().project_point3(point)
    }

    // ========================================================================
    // Declarative Properties
    // ========================================================================

    /// Which properties this camera owns, and how they are assigned.
    ///
    /// Projection scalars are only owned when the projection model has them.
    #[must_use]
    pub fn property_kind(&self, key: &str) -> Option<PropertyKind> {
        match key {
            "position" | "up" => Some(PropertyKind::Vector),
            "zoom" => Some(PropertyKind::Scalar),
            "fov" => matches!(self.projection, Projection::Perspective { .. })
                .then_some(PropertyKind::Scalar),
            "aspect" | "near" | "far" => {
                (!matches!(self.projection, Projection::Custom(_))).then_some(PropertyKind::Scalar)
            }
            _ => None,
        }
    }

    /// Sets a vector property in place. Returns `false` for unknown keys.
    pub fn set_vector_property(&mut self, key: &str, value: Vec3) -> bool {
        match key {
            "position" => self.transform.position = value,
            "up" => self.up = value,
            _ => return false,
        }
        true
    }

    /// Assigns a scalar property. `fov` is given in degrees.
    ///
    /// The projection matrix is not rebuilt; call
    /// [`update_projection_matrix`](Self::update_projection_matrix) afterwards.
    pub fn set_scalar_property(&mut self, key: &str, value: f32) -> bool {
        if key == "zoom" {
            self.zoom = value;
            return true;
        }
        if key == "aspect" {
            return self.set_aspect(value);
        }
        match (&mut self.projection, key) {
            (Projection::Perspective { fov_y, .. }, "fov") => *fov_y = value.to_radians(),
            (
                Projection::Perspective { near, .. } | Projection::Orthographic { near, .. },
                "near",
            ) => *near = value,
            (Projection::Perspective { far, .. } | Projection::Orthographic { far, .. }, "far") => {
                *far = value;
            }
            _ => return false,
        }
        true
    }
}
