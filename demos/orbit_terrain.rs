//! Headless run of the default scene
//!
//! Spins the particle ring for two seconds of scene time, nudges the terrain
//! coefficient halfway through and reports what a renderer would upload.
//!
//! ```sh
//! RUST_LOG=debug cargo run --example orbit_terrain
//! ```

use std::cell::Cell;
use std::rc::Rc;

use anyhow::Context;
use scenery::prelude::*;

const FRAMES: u32 = 120;
const DELTA: f32 = 1.0 / 60.0;

fn main() -> anyhow::Result<()> {
    scenery::init_logging();

    let config = SceneConfig::default()
        .with_shader_root(concat!(env!("CARGO_MANIFEST_DIR"), "/shaders"))
        .with_fixed_timestep(Some(DELTA));
    let mut app = pollster::block_on(SceneryApp::new(config)).context("failed to build the scene")?;

    let updates = Rc::new(Cell::new(0u32));
    let counter = updates.clone();
    app.particles_mut()
        .context("particle system missing from scene")?
        .add_particles_listener(move |particles| {
            counter.set(counter.get() + 1);
            if let Some(first) = particles.first() {
                log::trace!("First particle at ({:.3}, {:.3})", first.position.x, first.position.y);
            }
        });

    app.terrain_mut()
        .context("terrain missing from scene")?
        .add_update_listener(|c| log::info!("Terrain coefficient is now {}", c));

    for frame in 0..FRAMES {
        if frame == FRAMES / 2 {
            app.set_state(COEFFICIENT_KEY, 1.8)
                .context("failed to change the terrain coefficient")?;
        }
        app.update(DELTA);

        let terrain = app.terrain_mut().context("terrain missing from scene")?;
        if let Some(bytes) = terrain.take_height_map_update() {
            log::info!("Frame {}: uploading {} height map bytes", frame, bytes.len());
        }
    }

    let particles = app.particles().context("particle system missing from scene")?;
    for (i, particle) in particles.particles().iter().enumerate() {
        log::info!(
            "Particle {} at ({:.3}, {:.3}, {:.3})",
            i,
            particle.position.x,
            particle.position.y,
            particle.position.z
        );
    }

    let terrain = app.terrain().context("terrain missing from scene")?;
    let mesh = terrain.displaced_geometry();
    log::info!(
        "{} particle updates over {:.2}s; terrain mesh has {} vertices, {} triangles",
        updates.get(),
        app.scene().time(),
        mesh.vertex_count(),
        mesh.triangle_count()
    );
    for point in [Vector2::new(0.0, 0.0), Vector2::new(32.0, 64.0), Vector2::new(127.0, 127.0)] {
        log::info!(
            "Height at ({}, {}) = {:.4}",
            point.x,
            point.y,
            terrain.terrain_height_at_point(point)
        );
    }

    Ok(())
}
