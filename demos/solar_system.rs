//! Solar System Example
//!
//! Builds a small planet hierarchy through the path registry, orbits the
//! camera around it and pins a label over the earth, all against the
//! headless backend.
//!
//! Run with `RUST_LOG=debug cargo run --example solar_system` to see what
//! the layer logs.

use glam::{Vec2, Vec3};
use orrery::{
    Camera, CameraParameters, ControlsEvent, ControlsOptions, HeadlessBackend, LayerSettings, Node, OrbitControls,
    OverlayStyle, SceneLayer, SurfaceRect,
};

const PLANETS: &[(&str, f32)] = &[("mercury", 4.0), ("venus", 7.0), ("earth", 10.0), ("mars", 15.0)];

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let backend = HeadlessBackend::new().with_canvas(SurfaceRect::new(0.0, 0.0, 1280.0, 720.0));
    let settings = LayerSettings {
        canvas: true,
        ..LayerSettings::addressed()
    };
    let mut layer = SceneLayer::new(Camera::new_perspective(45.0, 1.0, 0.1, 1000.0), backend, settings);

    // Hierarchy: solar/<planet>, with the moon riding on the earth.
    layer.add_path("solar/sun", Node::object("sun"));
    for &(name, distance) in PLANETS {
        layer.add_path(
            &format!("solar/{name}"),
            Node::object(name).with_position(Vec3::new(distance, 0.0, 0.0)),
        );
    }
    layer.add_path(
        "solar/earth/moon",
        Node::object("moon").with_position(Vec3::new(1.5, 0.0, 0.0)),
    );
    layer.add_path("helpers/grid", Node::object("grid"));

    layer.set_camera(&CameraParameters::from_json(
        r#"{ "position": [0, 20, 40], "fov": 50, "focal_point": [0, 0, 0] }"#,
    )?);

    layer.set_controls(
        OrbitControls::new,
        ControlsOptions {
            enable_damping: Some(true),
            damping_factor: Some(0.1),
            ..Default::default()
        },
    );
    layer.add_ctrl_listener(
        |event| log::debug!("controls event: {event:?}"),
        &[ControlsEvent::Start, ControlsEvent::End],
    );

    layer.render();
    println!("{} drawables in view", layer.backend().stats().last_draw_count);

    // A label over the earth.
    let earth = layer.try_get("solar/earth")?;
    let mut label = OverlayStyle::default();
    for frame in 0..3 {
        layer.render();
        let position = layer.world_position(earth).unwrap_or(Vec3::ZERO);
        layer.project(&mut label, position, Some(Vec2::new(0.0, -12.0)));
        println!("frame {frame}: earth label at {}", label.to_css());
    }

    // Drag the view and let damping settle.
    layer.with_controls(|c: &mut OrbitControls| c.rotate(120.0, -40.0));
    while layer.with_controls(|c: &mut OrbitControls| c.is_moving()) == Some(true) {
        layer.update(false);
    }
    println!(
        "camera settled at {} after {} frames",
        layer.camera().position(),
        layer.backend().frame_count()
    );

    // Layer panel style switches, then one explicit redraw.
    layer.try_switch("helpers/grid", Some(false))?;
    layer.switch("solar/earth", None);
    layer.render();
    println!("{} drawables after hiding grid and earth", layer.backend().stats().last_draw_count);

    // Page relayout: the canvas box changed, follow it.
    layer.backend_mut().relayout(SurfaceRect::new(0.0, 0.0, 800.0, 800.0));
    layer.adjust_size()?.render();
    println!("viewport now {:?}", layer.size());

    Ok(())
}
