//! Node models
//!
//! Scene-graph entities updated once per frame by [`SceneModel`]:
//!
//! - [`particles`] - a ring of sphere particles orbiting the origin
//! - [`terrain`] - a plane displaced by a procedurally generated height field
//!
//! The two models are independent; each announces its own changes on its
//! own event bus.

pub mod manager;
pub mod particles;
pub mod terrain;
pub mod traits;

pub use manager::SceneModel;
pub use particles::{ParticleEvent, ParticleSystemModel, SphereParticle};
pub use terrain::{perlin_noise, TerrainEvent, TerrainModel};
pub use traits::NodeModel;
