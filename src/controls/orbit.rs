use glam::{Quat, Vec2, Vec3};

use crate::controls::{Controls, ControlsEvent, ControlsOptions, EventDispatcher};
use crate::render::{SurfaceRect, SurfaceSize};
use crate::scene::Camera;

const EPS: f32 = 0.0001;
const REST: f32 = 1e-6;
/// Closest polar angle to either pole. Keeps the view direction far enough
/// from `up` for [`Camera::look_at`] to accept it.
const POLE: f32 = 0.02;

/// Orbits the camera around a target on a sphere.
///
/// Input arrives as pixel deltas through [`rotate`](Self::rotate),
/// [`pan`](Self::pan) and [`dolly`](Self::dolly); nothing moves until
/// [`Controls::update`] runs. With damping enabled the rotation keeps
/// decaying over subsequent updates until it comes to rest.
#[derive(Debug)]
pub struct OrbitControls {
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    pub damping_factor: f32,
    pub enable_damping: bool,
    pub min_distance: f32,
    pub max_distance: f32,

    center: Vec3,
    radius: f32,
    theta: f32,
    phi: f32,

    fov_y: f32,
    surface_height: f32,

    rotate_delta: Vec2,
    pan_delta: Vec2,
    zoom_steps: f32,
    needs_sync: bool,

    events: EventDispatcher,
}

impl OrbitControls {
    /// Binds to `camera`'s current pose, orbiting the world origin.
    #[must_use]
    pub fn new(camera: &Camera, surface: SurfaceRect) -> Self {
        let mut controls = Self {
            rotate_speed: 1.0,
            zoom_speed: 0.05,
            pan_speed: 1.0,
            damping_factor: 0.05,
            enable_damping: false,
            min_distance: 0.0,
            max_distance: f32::INFINITY,

            center: Vec3::ZERO,
            radius: 1.0,
            theta: 0.0,
            phi: std::f32::consts::FRAC_PI_2,

            fov_y: std::f32::consts::FRAC_PI_4,
            surface_height: surface.height,

            rotate_delta: Vec2::ZERO,
            pan_delta: Vec2::ZERO,
            zoom_steps: 0.0,
            needs_sync: false,

            events: EventDispatcher::new(),
        };
        controls.sync_from_camera(camera);
        controls
    }

    /// Recomputes the spherical coordinates from the camera position.
    ///
    /// The radius is brought within the distance limits; returns `true`
    /// when that moved it.
    fn sync_from_camera(&mut self, camera: &Camera) -> bool {
        if let crate::scene::Projection::Perspective { fov_y, .. } = camera.projection() {
            self.fov_y = *fov_y;
        }
        let offset = camera.position() - self.center;
        let distance = offset.length().max(EPS);
        self.theta = offset.x.atan2(offset.z);
        self.phi = (offset.y / distance).clamp(-1.0, 1.0).acos();
        self.radius = self.clamp_distance(distance);
        (self.radius - distance).abs() > EPS
    }

    /// Limits `distance` to `[min_distance, max_distance]`. Never panics:
    /// NaN limits are ignored and an inverted range collapses to the minimum.
    fn clamp_distance(&self, distance: f32) -> f32 {
        let lo = self.min_distance.max(EPS);
        let hi = if self.max_distance.is_nan() {
            f32::INFINITY
        } else {
            self.max_distance.max(lo)
        };
        distance.max(lo).min(hi)
    }

    #[must_use]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// `true` while rotation inertia has not decayed yet.
    #[must_use]
    pub fn is_moving(&self) -> bool {
        self.rotate_delta.length_squared() > REST * REST
    }

    // -- Input --

    /// Queues a rotation for a pointer drag of `(dx, dy)` pixels.
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        let rotate_per_pixel = 2.0 * std::f32::consts::PI / self.surface_height.max(1.0);
        self.rotate_delta.x -= dx * rotate_per_pixel * self.rotate_speed;
        self.rotate_delta.y -= dy * rotate_per_pixel * self.rotate_speed;
    }

    /// Queues a pan for a pointer drag of `(dx, dy)` pixels.
    pub fn pan(&mut self, dx: f32, dy: f32) {
        self.pan_delta += Vec2::new(dx, dy);
    }

    /// Queues a zoom; positive steps move closer.
    pub fn dolly(&mut self, steps: f32) {
        self.zoom_steps += steps;
    }

    fn apply_rotation(&mut self) -> bool {
        if !self.is_moving() {
            self.rotate_delta = Vec2::ZERO;
            return false;
        }

        if self.enable_damping {
            let delta_apply = self.rotate_delta * self.damping_factor;
            self.theta += delta_apply.x;
            self.phi += delta_apply.y;
            self.rotate_delta *= 1.0 - self.damping_factor;
        } else {
            self.theta += self.rotate_delta.x;
            self.phi += self.rotate_delta.y;
            self.rotate_delta = Vec2::ZERO;
        }

        self.phi = self.phi.clamp(POLE, std::f32::consts::PI - POLE);
        true
    }

    fn apply_zoom(&mut self) -> bool {
        if self.zoom_steps == 0.0 {
            return false;
        }
        let scale = (1.0 - self.zoom_speed).powf(self.zoom_steps.abs());
        if self.zoom_steps > 0.0 {
            self.radius *= scale;
        } else {
            self.radius /= scale;
        }
        self.radius = self.clamp_distance(self.radius);
        self.zoom_steps = 0.0;
        true
    }

    fn apply_pan(&mut self) -> bool {
        if self.pan_delta == Vec2::ZERO {
            return false;
        }
        let target_world_height = 2.0 * self.radius * (self.fov_y / 2.0).tan();
        let pixels_to_world_ratio = target_world_height / self.surface_height.max(1.0);

        let forward = -self.offset_direction();
        let right = forward.cross(Vec3::Y).normalize_or_zero();
        let up = right.cross(forward).normalize_or_zero();

        self.center += (right * -self.pan_delta.x + up * self.pan_delta.y) * pixels_to_world_ratio * self.pan_speed;
        self.pan_delta = Vec2::ZERO;
        true
    }

    fn offset_direction(&self) -> Vec3 {
        let (sin_phi, cos_phi) = self.phi.sin_cos();
        let (sin_theta, cos_theta) = self.theta.sin_cos();
        Vec3::new(sin_phi * sin_theta, cos_phi, sin_phi * cos_theta)
    }
}

impl Controls for OrbitControls {
    fn target(&self) -> Vec3 {
        self.center
    }

    fn set_target(&mut self, target: Vec3) {
        self.center = target;
        self.needs_sync = true;
    }

    fn update(&mut self, camera: &mut Camera) -> bool {
        // The camera may have been moved behind our back (set_camera, host code).
        let clamped = self.sync_from_camera(camera);

        let rotated = self.apply_rotation();
        let zoomed = self.apply_zoom();
        let panned = self.apply_pan();
        let changed = clamped || rotated || zoomed || panned || std::mem::take(&mut self.needs_sync);

        if !changed {
            return false;
        }

        let position = self.center + self.offset_direction() * self.radius;
        camera.set_position(position);
        if !camera.look_at(self.center) {
            // Looking along `up`: align -Z with the view direction instead.
            if let Some(forward) = (self.center - position).try_normalize() {
                camera.transform.rotation = Quat::from_rotation_arc(Vec3::NEG_Z, forward);
            }
        }
        self.events.emit(ControlsEvent::Change);
        true
    }

    fn events(&self) -> &EventDispatcher {
        &self.events
    }

    fn events_mut(&mut self) -> &mut EventDispatcher {
        &mut self.events
    }

    fn handle_resize(&mut self, size: SurfaceSize) {
        self.surface_height = size.height;
    }

    fn apply_options(&mut self, options: &ControlsOptions) {
        if let Some(surface) = options.surface {
            self.surface_height = surface.height;
        }
        if let Some(target) = options.target {
            self.set_target(target);
        }
        if let Some(v) = options.enable_damping {
            self.enable_damping = v;
        }
        if let Some(v) = options.damping_factor {
            self.damping_factor = v.clamp(0.0, 1.0);
        }
        if let Some(v) = options.rotate_speed {
            self.rotate_speed = v;
        }
        if let Some(v) = options.zoom_speed {
            self.zoom_speed = v;
        }
        if let Some(v) = options.pan_speed {
            self.pan_speed = v;
        }
        if let Some(v) = options.min_distance {
            if v.is_nan() {
                log::warn!("Ignoring NaN min_distance");
            } else {
                self.min_distance = v;
            }
        }
        if let Some(v) = options.max_distance {
            if v.is_nan() {
                log::warn!("Ignoring NaN max_distance");
            } else {
                self.max_distance = v;
            }
        }
        if self.min_distance > self.max_distance {
            log::warn!(
                "min_distance {} exceeds max_distance {}, swapping them",
                self.min_distance,
                self.max_distance
            );
            std::mem::swap(&mut self.min_distance, &mut self.max_distance);
        }
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}
