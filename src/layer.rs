//! The scene layer.
//!
//! [`SceneLayer`] is the single entry point a host talks to. It owns the
//! scene root, the camera, the renderer backend, the optional controls and
//! the path registry, and exposes chainable operations over them.
//!
//! # Lifecycle
//!
//! 1. Build with [`SceneLayer::new`] (camera, backend, settings)
//! 2. Optionally bind controls with [`SceneLayer::set_controls`]
//! 3. Add objects directly ([`add_node`](SceneLayer::add_node)) or by path
//!    ([`add_path`](SceneLayer::add_path))
//! 4. Either call [`render`](SceneLayer::render) every tick, or let controls
//!    `Change` events drive redraws through [`update`](SceneLayer::update)
//!
//! Everything runs synchronously on the caller's thread. A `render` always
//! observes every mutation made before it.
//!
//! ```rust,ignore
//! let mut layer = SceneLayer::new(camera, HeadlessBackend::new(), LayerSettings::addressed());
//! layer.add_path("solar/earth", Node::object("earth"));
//! layer.add_path("solar/earth/moon", Node::object("moon"));
//! layer.set_size(800.0, 600.0)?.render();
//! ```

use std::cell::Cell;
use std::rc::Rc;

use glam::{Vec2, Vec3};

use crate::controls::{Controls, ControlsEvent, ControlsOptions};
use crate::errors::{OrreryError, Result};
use crate::projector::{self, OverlayElement};
use crate::registry::ObjectRegistry;
use crate::render::{RenderBackend, SurfaceRect, SurfaceSize};
use crate::scene::{Camera, CameraParam, CameraParameters, Node, NodeHandle, PropertyKind, SceneGraph};
use crate::settings::{LayerProfile, LayerSettings, MissingPolicy};
use crate::viewport;

/// A node given either by handle or by name.
///
/// Names resolve according to the layer's [`LayerProfile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectRef<'a> {
    Handle(NodeHandle),
    Name(&'a str),
}

impl From<NodeHandle> for ObjectRef<'_> {
    fn from(handle: NodeHandle) -> Self {
        Self::Handle(handle)
    }
}

impl<'a> From<&'a str> for ObjectRef<'a> {
    fn from(name: &'a str) -> Self {
        Self::Name(name)
    }
}

impl<'a> From<&'a String> for ObjectRef<'a> {
    fn from(name: &'a String) -> Self {
        Self::Name(name.as_str())
    }
}

impl std::fmt::Display for ObjectRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Handle(h) => write!(f, "{h:?}"),
            Self::Name(n) => f.write_str(n),
        }
    }
}

/// Scene root, camera, renderer, controls and registry behind one API.
pub struct SceneLayer<B: RenderBackend> {
    scene: SceneGraph,
    camera: Camera,
    camera_anchor: NodeHandle,
    backend: B,
    controls: Option<Box<dyn Controls>>,
    registry: ObjectRegistry,
    settings: LayerSettings,
    /// Raised by the controls' `Change` listener, drained by `flush_redraw`.
    redraw: Rc<Cell<bool>>,
}

impl<B: RenderBackend> SceneLayer<B> {
    /// Creates a layer drawing through `backend`.
    ///
    /// The camera is anchored under the scene root. When
    /// [`LayerSettings::canvas`] is set, the viewport immediately adopts the
    /// canvas' layout size.
    pub fn new(camera: Camera, mut backend: B, settings: LayerSettings) -> Self {
        backend.configure(&settings.context);
        let ratio = viewport::initial_pixel_ratio(settings.pixel_ratio, &backend);
        backend.set_pixel_ratio(ratio);
        backend.set_local_clipping(settings.clipping);

        let mut scene = SceneGraph::new();
        let camera_anchor = scene.add(Node::camera_anchor(camera.name.clone()));

        let mut layer = Self {
            scene,
            camera,
            camera_anchor,
            backend,
            controls: None,
            registry: ObjectRegistry::new(),
            settings,
            redraw: Rc::new(Cell::new(false)),
        };

        if layer.settings.canvas
            && let Err(err) = layer.adjust_size()
        {
            log::warn!("Could not adopt canvas size: {err}");
        }

        log::debug!(
            "Scene layer ready: profile {:?}, pixel ratio {ratio}",
            layer.settings.profile
        );
        layer
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[must_use]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Direct camera access. Call [`Camera::update_projection_matrix`] after
    /// changing projection fields.
    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    /// The node camera-relative objects are attached to.
    #[must_use]
    pub fn camera_anchor(&self) -> NodeHandle {
        self.camera_anchor
    }

    #[must_use]
    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut SceneGraph {
        &mut self.scene
    }

    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    #[must_use]
    pub fn registry(&self) -> &ObjectRegistry {
        &self.registry
    }

    #[must_use]
    pub fn settings(&self) -> &LayerSettings {
        &self.settings
    }

    #[must_use]
    pub fn profile(&self) -> LayerProfile {
        self.settings.profile
    }

    /// The backend canvas' layout box, if it has one.
    #[must_use]
    pub fn canvas(&self) -> Option<SurfaceRect> {
        self.backend.canvas_rect()
    }

    #[must_use]
    pub fn clipping(&self) -> bool {
        self.backend.local_clipping()
    }

    pub fn set_clipping(&mut self, enabled: bool) -> &mut Self {
        self.backend.set_local_clipping(enabled);
        self
    }

    #[must_use]
    pub fn pixel_ratio(&self) -> f32 {
        self.backend.pixel_ratio()
    }

    pub fn set_pixel_ratio(&mut self, ratio: f32) -> &mut Self {
        self.backend.set_pixel_ratio(ratio);
        self
    }

    // ========================================================================
    // Missing-reference policy
    // ========================================================================

    fn miss(&self, what: std::fmt::Arguments<'_>) {
        if self.settings.missing == MissingPolicy::Warn {
            log::warn!("{what}");
        }
    }

    // ========================================================================
    // Objects
    // ========================================================================

    /// Inserts `node` under the scene root.
    pub fn add_node(&mut self, node: Node) -> NodeHandle {
        self.scene.add(node)
    }

    /// Attaches an existing node (for instance one previously removed) under
    /// the scene root, reparenting it if needed.
    pub fn add(&mut self, handle: NodeHandle) -> &mut Self {
        let root = self.scene.root();
        if !self.scene.attach(handle, root) {
            self.miss(format_args!("add: cannot attach {handle:?} to the scene root"));
        }
        self
    }

    /// Inserts `node` under the camera anchor so it follows the camera.
    pub fn add_to_camera(&mut self, node: Node) -> NodeHandle {
        self.scene.add_to_parent(node, self.camera_anchor)
    }

    /// Detaches `handle` (and its subtree) from the tree. The node stays
    /// alive and can be added back with [`add`](Self::add). Registry entries
    /// are left untouched.
    pub fn remove(&mut self, handle: NodeHandle) -> &mut Self {
        if handle == self.scene.root() || handle == self.camera_anchor {
            log::warn!("remove: the scene root and camera anchor stay attached");
            return self;
        }
        self.scene.detach(handle);
        self
    }

    /// Deletes `handle` and its subtree for good.
    pub fn dispose(&mut self, handle: NodeHandle) -> &mut Self {
        if handle == self.camera_anchor {
            log::warn!("dispose: the camera anchor cannot be deleted");
            return self;
        }
        self.scene.remove_node(handle);
        self
    }

    /// Calls `f` for each direct child of the scene root, with its index.
    pub fn each_object(&self, mut f: impl FnMut(NodeHandle, &Node, usize)) -> &Self {
        for (i, &handle) in self.scene.children(self.scene.root()).iter().enumerate() {
            if let Some(node) = self.scene.get(handle) {
                f(handle, node, i);
            }
        }
        self
    }

    /// Resolves a handle or name according to the profile.
    #[must_use]
    pub fn resolve<'a>(&self, target: impl Into<ObjectRef<'a>>) -> Option<NodeHandle> {
        match target.into() {
            ObjectRef::Handle(h) => self.scene.contains(h).then_some(h),
            ObjectRef::Name(name) => match self.settings.profile {
                LayerProfile::Direct => self.scene.find_by_name(name),
                LayerProfile::Addressed => self.get(name),
            },
        }
    }

    /// Looks up an object by name (tree search or registry path, per profile).
    pub fn object(&self, name: &str) -> Option<NodeHandle> {
        let found = self.resolve(name);
        if found.is_none() {
            self.miss(format_args!("object '{name}' not found"));
        }
        found
    }

    pub fn try_object(&self, name: &str) -> Result<NodeHandle> {
        self.resolve(name)
            .ok_or_else(|| OrreryError::ObjectNotFound(name.to_owned()))
    }

    #[must_use]
    pub fn node(&self, handle: NodeHandle) -> Option<&Node> {
        self.scene.get(handle)
    }

    pub fn node_mut(&mut self, handle: NodeHandle) -> Option<&mut Node> {
        self.scene.get_mut(handle)
    }

    /// World position of `handle` as of the last render.
    #[must_use]
    pub fn world_position(&self, handle: NodeHandle) -> Option<Vec3> {
        self.scene.world_position(handle)
    }

    // ========================================================================
    // Path Registry
    // ========================================================================

    /// Adds `node` under `path`, creating intermediate groups.
    ///
    /// The node is renamed after the last path segment. An empty parent
    /// chain attaches directly under the root.
    pub fn add_path(&mut self, path: &str, node: Node) -> NodeHandle {
        self.registry.add(&mut self.scene, path, node)
    }

    /// The group registered at `path`, created on demand. Empty is the root.
    pub fn group(&mut self, path: &str) -> NodeHandle {
        self.registry.group(&mut self.scene, path)
    }

    /// Full-path registry lookup. Deleted nodes resolve to `None`.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<NodeHandle> {
        self.registry.get(path).filter(|&h| self.scene.contains(h))
    }

    pub fn try_get(&self, path: &str) -> Result<NodeHandle> {
        self.get(path)
            .ok_or_else(|| OrreryError::ObjectNotFound(path.to_owned()))
    }

    // ========================================================================
    // Visibility
    // ========================================================================

    /// Visibility of the whole scene.
    #[must_use]
    pub fn visible(&self) -> bool {
        self.scene.get(self.scene.root()).is_some_and(|n| n.visible)
    }

    pub fn set_visible(&mut self, visible: bool) -> &mut Self {
        let root = self.scene.root();
        if let Some(node) = self.scene.get_mut(root) {
            node.visible = visible;
        }
        self
    }

    /// Sets (`Some`) or flips (`None`) an object's visibility, then renders
    /// once. Returns the resolved handle, or `None` without rendering.
    pub fn toggle_object<'a>(&mut self, target: impl Into<ObjectRef<'a>>, visible: Option<bool>) -> Option<NodeHandle> {
        let target = target.into();
        let Some(handle) = self.resolve(target) else {
            self.miss(format_args!("toggle_object: '{target}' not found"));
            return None;
        };
        if let Some(node) = self.scene.get_mut(handle) {
            node.toggle(visible);
        }
        self.render();
        Some(handle)
    }

    pub fn try_toggle_object<'a>(&mut self, target: impl Into<ObjectRef<'a>>, visible: Option<bool>) -> Result<NodeHandle> {
        let target = target.into();
        self.toggle_object(target, visible)
            .ok_or_else(|| OrreryError::ObjectNotFound(target.to_string()))
    }

    /// Sets or flips the visibility of the node registered at `name` and
    /// returns the new flag. Does not render; hosts driving layer panels
    /// call [`render`](Self::render) themselves.
    pub fn switch(&mut self, name: &str, value: Option<bool>) -> Option<bool> {
        let Some(handle) = self.get(name) else {
            self.miss(format_args!("switch: '{name}' is not registered"));
            return None;
        };
        self.scene.get_mut(handle).map(|node| node.toggle(value))
    }

    pub fn try_switch(&mut self, name: &str, value: Option<bool>) -> Result<bool> {
        self.switch(name, value)
            .ok_or_else(|| OrreryError::ObjectNotFound(name.to_owned()))
    }

    // ========================================================================
    // Viewport
    // ========================================================================

    /// Resizes the surface to `width × height`, keeps the camera aspect in
    /// step and notifies the controls.
    pub fn set_size(&mut self, width: f32, height: f32) -> Result<&mut Self> {
        let size = SurfaceSize::new(width, height);
        viewport::apply_size(&mut self.backend, &mut self.camera, size)?;
        if let Some(controls) = self.controls.as_mut() {
            controls.handle_resize(size);
        }
        Ok(self)
    }

    /// Matches the surface to the canvas' current layout box.
    pub fn adjust_size(&mut self) -> Result<&mut Self> {
        match self.backend.canvas_rect() {
            Some(rect) => self.set_size(rect.width, rect.height),
            None => {
                log::debug!("adjust_size: backend has no canvas layout box");
                Ok(self)
            }
        }
    }

    #[must_use]
    pub fn size(&self) -> SurfaceSize {
        self.backend.size()
    }

    // ========================================================================
    // Camera & Controls
    // ========================================================================

    #[must_use]
    pub fn controls(&self) -> Option<&(dyn Controls + 'static)> {
        self.controls.as_deref()
    }

    /// Mutable access to the bound controls. Events emitted through this
    /// borrow are picked up by the next `update` or `render`.
    pub fn controls_mut(&mut self) -> Option<&mut (dyn Controls + 'static)> {
        self.controls.as_deref_mut()
    }

    /// Builds controls for the camera and a surface, applies `options`,
    /// and makes every `Change` they emit trigger a render.
    ///
    /// The surface defaults to the layer's canvas. Any previously bound
    /// controls are dropped.
    ///
    /// A `Change` emitted outside the layer's own calls, for instance through
    /// [`controls_mut`](Self::controls_mut), only marks the layer for redraw.
    /// The frame is drawn by the next [`update`](Self::update),
    /// [`with_controls`](Self::with_controls) or [`render`](Self::render).
    pub fn set_controls<C, F>(&mut self, factory: F, options: ControlsOptions) -> &mut Self
    where
        C: Controls + 'static,
        F: FnOnce(&Camera, SurfaceRect) -> C,
    {
        let surface = options
            .surface
            .or_else(|| self.backend.canvas_rect())
            .unwrap_or_else(|| {
                let size = self.backend.size();
                SurfaceRect::new(0.0, 0.0, size.width, size.height)
            });

        let mut controls = factory(&self.camera, surface);
        controls.apply_options(&options);

        let redraw = Rc::clone(&self.redraw);
        controls
            .events_mut()
            .subscribe(ControlsEvent::Change, move |_| redraw.set(true));

        if self.controls.replace(Box::new(controls)).is_some() {
            log::debug!("Replacing bound controls");
        }
        self.redraw.set(false);
        self
    }

    /// Subscribes `callback` to `events` on the bound controls. No-op
    /// without controls.
    pub fn add_ctrl_listener(
        &mut self,
        callback: impl FnMut(ControlsEvent) + 'static,
        events: &[ControlsEvent],
    ) -> &mut Self {
        match self.controls.as_mut() {
            Some(controls) => {
                controls.events_mut().subscribe_many(events, callback);
            }
            None => self.miss(format_args!("add_ctrl_listener: no controls bound")),
        }
        self
    }

    /// [`add_ctrl_listener`](Self::add_ctrl_listener) for `Change` only.
    pub fn add_change_listener(&mut self, callback: impl FnMut(ControlsEvent) + 'static) -> &mut Self {
        self.add_ctrl_listener(callback, &[ControlsEvent::Change])
    }

    /// Runs `f` on the bound controls if they are a `C`, then renders if
    /// that raised a `Change`. Used to feed input into concrete controls.
    pub fn with_controls<C: Controls + 'static, R>(&mut self, f: impl FnOnce(&mut C) -> R) -> Option<R> {
        let controls = self.controls.as_mut()?.as_any_mut().downcast_mut::<C>()?;
        let result = f(controls);
        self.flush_redraw();
        Some(result)
    }

    /// Applies declarative camera parameters.
    ///
    /// Owned vector properties (`position`, `up`) are set in place, owned
    /// scalars (`fov`, `zoom`, `near`, `far`, `aspect`) are assigned and the
    /// projection is rebuilt once. `focal_point` is applied last, after the
    /// pose settled: it moves the controls' target when controls are bound,
    /// otherwise it turns the camera. Unknown keys are ignored.
    pub fn set_camera(&mut self, parameters: &CameraParameters) -> &mut Self {
        let mut projection_dirty = false;
        let mut focal_point = None;

        for (key, value) in parameters.iter() {
            match (self.camera.property_kind(key), *value) {
                (Some(PropertyKind::Vector), CameraParam::Vector(v)) => {
                    self.camera.set_vector_property(key, v);
                }
                (Some(PropertyKind::Scalar), CameraParam::Scalar(s)) => {
                    projection_dirty |= self.camera.set_scalar_property(key, s);
                }
                (Some(kind), _) => {
                    log::warn!("Camera property '{key}' expects a {kind:?} value, ignoring");
                }
                (None, CameraParam::Vector(v)) if key == "focal_point" => focal_point = Some(v),
                (None, _) => log::debug!("Ignoring camera parameter '{key}'"),
            }
        }

        if projection_dirty {
            self.camera.update_projection_matrix();
        }

        if let Some(target) = focal_point {
            match self.controls.as_mut() {
                Some(controls) => controls.set_target(target),
                None => {
                    if !self.camera.look_at(target) {
                        log::debug!("focal_point {target} is degenerate for the current pose");
                    }
                }
            }
        }
        self
    }

    /// Advances the controls, or with `force` just announces a `Change`.
    ///
    /// `force` skips damping entirely and exists to redraw after changes the
    /// controls did not cause. Without controls this does nothing.
    pub fn update(&mut self, force: bool) {
        let Some(controls) = self.controls.as_mut() else {
            return;
        };
        if force {
            controls.events().emit(ControlsEvent::Change);
        } else {
            controls.update(&mut self.camera);
        }
        self.flush_redraw();
    }

    // ========================================================================
    // Projection
    // ========================================================================

    /// Positions `element` over the screen projection of `point`.
    pub fn project(&mut self, element: &mut (impl OverlayElement + ?Sized), point: Vec3, offset: Option<Vec2>) -> &mut Self {
        let size = self.size();
        projector::place(element, &self.camera, point, size, offset);
        self
    }

    /// Unrounded viewport pixels of `point`, without touching any element.
    #[must_use]
    pub fn screen_position(&self, point: Vec3, offset: Option<Vec2>) -> Vec2 {
        projector::project_to_screen(&self.camera, point, self.size(), offset)
    }

    // ========================================================================
    // Rendering
    // ========================================================================

    /// One synchronous frame: controls step (if any), then a single draw.
    pub fn render(&mut self) {
        if let Some(controls) = self.controls.as_mut() {
            controls.update(&mut self.camera);
        }
        // This frame already covers whatever the controls just changed.
        self.redraw.set(false);
        self.draw();
    }

    fn flush_redraw(&mut self) {
        if self.redraw.replace(false) {
            self.draw();
        }
    }

    fn draw(&mut self) {
        if let Some(anchor) = self.scene.get_mut(self.camera_anchor) {
            anchor.transform.position = self.camera.transform.position;
            anchor.transform.rotation = self.camera.transform.rotation;
            anchor.transform.scale = self.camera.transform.scale;
        }
        self.scene.update_matrix_world();
        self.backend.render(&self.scene, &self.camera);
    }
}
