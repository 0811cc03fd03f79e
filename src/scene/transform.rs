use glam::{Affine3A, EulerRot, Mat3, Mat4, Quat, Vec3};

/// Snapshot of the TRS values the cached local matrix was built from.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Trs {
    position: Vec3,
    rotation: Quat,
    scale: Vec3,
}

/// Position, rotation and scale of a node, with cached matrices.
///
/// The public TRS fields are mutated freely. The local matrix is rebuilt
/// lazily by [`update_local_matrix`](Self::update_local_matrix) when they no
/// longer match the values it was built from; the world matrix is written
/// by the scene graph during its matrix pass.
#[derive(Debug, Clone)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,

    pub(crate) local_matrix: Affine3A,
    pub(crate) world_matrix: Affine3A,

    /// `None` until the first build, and after [`mark_dirty`](Self::mark_dirty).
    built_from: Option<Trs>,
}

impl Transform {
    #[must_use]
    pub fn new() -> Self {
        Self::from_position(Vec3::ZERO)
    }

    /// Creates a transform placed at `position`.
    #[must_use]
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
            local_matrix: Affine3A::IDENTITY,
            world_matrix: Affine3A::IDENTITY,
            built_from: None,
        }
    }

    fn trs(&self) -> Trs {
        Trs {
            position: self.position,
            rotation: self.rotation,
            scale: self.scale,
        }
    }

    /// Rebuilds the local matrix if the TRS changed since the last build.
    ///
    /// Returns `true` when the matrix was recomputed.
    pub fn update_local_matrix(&mut self) -> bool {
        let current = self.trs();
        if self.built_from == Some(current) {
            return false;
        }
        self.local_matrix = Affine3A::from_scale_rotation_translation(current.scale, current.rotation, current.position);
        self.built_from = Some(current);
        true
    }

    /// Forces the next [`update_local_matrix`](Self::update_local_matrix) to recompute.
    pub fn mark_dirty(&mut self) {
        self.built_from = None;
    }

    /// Sets the rotation from XYZ Euler angles (radians).
    pub fn set_rotation_euler(&mut self, x: f32, y: f32, z: f32) {
        self.rotation = Quat::from_euler(EulerRot::XYZ, x, y, z);
    }

    #[inline]
    #[must_use]
    pub fn local_matrix(&self) -> &Affine3A {
        &self.local_matrix
    }

    /// World matrix as of the last scene graph matrix pass.
    #[inline]
    #[must_use]
    pub fn world_matrix(&self) -> &Affine3A {
        &self.world_matrix
    }

    #[must_use]
    pub fn world_matrix_as_mat4(&self) -> Mat4 {
        Mat4::from(self.world_matrix)
    }

    #[inline]
    #[must_use]
    pub fn world_position(&self) -> Vec3 {
        self.world_matrix.translation.into()
    }

    pub(crate) fn set_world_matrix(&mut self, world: Affine3A) {
        self.world_matrix = world;
    }

    /// Turns the transform so its -Z axis faces `target`, keeping `up` as
    /// close to vertical as possible. Both are in the parent's space.
    ///
    /// Returns `false` and leaves the rotation alone when the direction is
    /// undefined: `target` coincides with the position or lies along `up`.
    pub fn look_at(&mut self, target: Vec3, up: Vec3) -> bool {
        let Some(forward) = (target - self.position).try_normalize() else {
            return false;
        };
        let side = forward.cross(up);
        if side.length_squared() < 1e-4 {
            return false;
        }
        let right = side.normalize();
        let true_up = right.cross(forward);
        self.rotation = Quat::from_mat3(&Mat3::from_cols(right, true_up, -forward)).normalize();
        true
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}
