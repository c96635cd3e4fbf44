//! # Scenery Prelude
//!
//! Commonly used types in one import:
//!
//! ```no_run
//! use scenery::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let mut app = scenery::default()?;
//!     app.set_state(COEFFICIENT_KEY, 1.5)?;
//!     app.run_frames(60, 1.0 / 60.0);
//!     Ok(())
//! }
//! ```

// Re-export core application types
pub use crate::app::SceneryApp;
pub use crate::config::{ParticleSystemSettings, SceneConfig, TerrainSettings};
pub use crate::default;
pub use crate::error::{Result, SceneryError};

// Events and application state
pub use crate::events::{EventBus, ListenerHandle};
pub use crate::state::{AppState, Slider, SubscriptionHandle};

// Graphics resources
pub use crate::gfx::geometry::{generate_plane, generate_sphere, GeometryData};
pub use crate::gfx::shader::{DirectoryShaderSource, InMemoryShaderSource, ShaderSource};
pub use crate::gfx::{
    DataTextureFloat1D, FilterMode, ImageTexture, Material, MaterialFactory, ShaderLibrary,
    ShaderModel, UniformValue,
};

// Node models
pub use crate::nodes::terrain::COEFFICIENT_KEY;
pub use crate::nodes::{
    NodeModel, ParticleEvent, ParticleSystemModel, SceneModel, SphereParticle, TerrainEvent,
    TerrainModel,
};

// Re-export common external dependencies
pub use cgmath::{Vector2, Vector3};
