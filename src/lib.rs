// src/lib.rs
//! Scenery
//!
//! Scene-level models for a small 3D visualisation: a ring of orbiting
//! sphere particles and a procedurally displaced terrain whose height is
//! driven by an application-state slider. Node models are renderer
//! agnostic; a host renderer reads their materials, geometry and height
//! textures and uploads them however it likes.

pub mod app;
pub mod config;
pub mod error;
pub mod events;
pub mod gfx;
pub mod nodes;
pub mod prelude;
pub mod state;

// Re-export main types for convenience
pub use app::SceneryApp;
pub use error::{Result, SceneryError};

/// Creates the default scene, loading shaders from `./shaders`
pub fn default() -> Result<SceneryApp> {
    pollster::block_on(SceneryApp::new(config::SceneConfig::default()))
}

/// Initialise `env_logger`, honouring `RUST_LOG` and defaulting to `info`
///
/// Calling this more than once is harmless.
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .is_test(cfg!(test))
        .try_init();
}
