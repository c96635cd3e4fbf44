//! # Orbiting Particle System
//!
//! A ring of sphere particles circling the origin in the XY plane. Positions
//! are a closed-form function of scene time, so the system is fully
//! deterministic and never accumulates drift.
//!
//! Particles are plain data rather than individually observable state:
//! updating them one at a time would wake listeners for every minor change.
//! Instead the model updates the whole ring and then sends one
//! [`ParticleEvent::ParticlesUpdated`] signal.
//!
//! ```
//! use scenery::gfx::shader::{InMemoryShaderSource, ShaderLibrary};
//! use scenery::nodes::particles::{ParticleSystemModel, SphereParticle, PARTICLE_SHADER};
//! use scenery::nodes::NodeModel;
//!
//! let source = InMemoryShaderSource::new().with_shader(PARTICLE_SHADER, "", "");
//! let mut library = ShaderLibrary::new();
//! pollster::block_on(library.load(PARTICLE_SHADER, &source)).unwrap();
//!
//! let shader = library.require(PARTICLE_SHADER).unwrap();
//! let mut system = ParticleSystemModel::new(&*shader);
//! system.add_particle(SphereParticle::default());
//! system.time_update(0.0);
//! assert!((system.particles()[0].position.y - 0.5).abs() < 1e-6);
//! ```

use std::any::Any;
use std::f32::consts::PI;

use cgmath::{Matrix4, Vector3};
use rand::Rng;

use super::traits::NodeModel;
use crate::config::ParticleSystemSettings;
use crate::error::Result;
use crate::events::{EventBus, ListenerHandle};
use crate::gfx::geometry::{generate_sphere, GeometryData};
use crate::gfx::{Material, MaterialFactory, ShaderLibrary};

/// Name of the shader the particle system's material is stubbed from
pub const PARTICLE_SHADER: &str = "exampleparticle";

/// Uniform holding the particle tint
pub const PARTICLE_COLOR_UNIFORM: &str = "particleColor";

/// Events emitted by [`ParticleSystemModel`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParticleEvent {
    /// Every particle has been moved for the current frame
    ParticlesUpdated,
}

/// A sphere rendered at a particle position
#[derive(Clone, Debug, PartialEq)]
pub struct SphereParticle {
    pub position: Vector3<f32>,
    pub radius: f32,
    pub color: [f32; 4],
}

impl Default for SphereParticle {
    fn default() -> Self {
        Self {
            position: Vector3::new(0.0, 0.0, 0.0),
            radius: 0.05,
            color: [1.0, 1.0, 1.0, 1.0],
        }
    }
}

impl SphereParticle {
    pub fn new(position: Vector3<f32>, radius: f32, color: [f32; 4]) -> Self {
        Self {
            position,
            radius,
            color,
        }
    }

    /// Model matrix placing a unit sphere at this particle
    pub fn transform(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.position) * Matrix4::from_scale(self.radius)
    }
}

/// Ring of sphere particles orbiting the origin
pub struct ParticleSystemModel {
    name: String,
    particles: Vec<SphereParticle>,
    pub orbit_radius: f32,
    /// Revolutions per unit of scene time
    pub orbit_frequency: f32,
    pub z_offset: f32,
    material: Material,
    events: EventBus<ParticleEvent, [SphereParticle]>,
}

impl ParticleSystemModel {
    /// Creates an empty particle system with default orbit parameters
    ///
    /// # Arguments
    /// * `factory` - Loaded particle shader to stub the material from
    pub fn new(factory: &dyn MaterialFactory) -> Self {
        Self::from_settings(factory, &ParticleSystemSettings::default().with_count(0))
    }

    /// Creates a particle system populated from settings
    ///
    /// `settings.count` particles are created at the origin with the
    /// configured radius and color; the first [`NodeModel::time_update`]
    /// moves them onto the orbit.
    pub fn from_settings(factory: &dyn MaterialFactory, settings: &ParticleSystemSettings) -> Self {
        let mut material = factory.create_material();
        material.set_uniform(PARTICLE_COLOR_UNIFORM, settings.particle_color);

        let particles = (0..settings.count)
            .map(|_| {
                SphereParticle::new(
                    Vector3::new(0.0, 0.0, 0.0),
                    settings.particle_radius,
                    settings.particle_color,
                )
            })
            .collect();

        Self {
            name: "Particle System".to_string(),
            particles,
            orbit_radius: settings.orbit_radius,
            orbit_frequency: settings.orbit_frequency,
            z_offset: settings.z_offset,
            material,
            events: EventBus::new(),
        }
    }

    /// Creates a particle system from the shader library
    ///
    /// Fails with [`SceneryError::ShaderModelNotLoaded`](crate::error::SceneryError::ShaderModelNotLoaded)
    /// if [`PARTICLE_SHADER`] has not been loaded yet.
    pub fn create(library: &ShaderLibrary, settings: &ParticleSystemSettings) -> Result<Self> {
        let shader = library.require(PARTICLE_SHADER)?;
        Ok(Self::from_settings(&*shader, settings))
    }

    /// Appends a particle; its index sets its phase offset on the ring
    pub fn add_particle(&mut self, particle: SphereParticle) {
        self.particles.push(particle);
    }

    /// Appends `count` particles with random colors and radii
    pub fn populate_random<R: Rng>(&mut self, count: usize, rng: &mut R) {
        self.particles.reserve(count);
        for _ in 0..count {
            let color = [rng.random::<f32>(), rng.random::<f32>(), rng.random::<f32>(), 1.0];
            let radius = rng.random_range(0.02..0.08);
            self.particles
                .push(SphereParticle::new(Vector3::new(0.0, 0.0, self.z_offset), radius, color));
        }
        log::debug!("Populated {} random particles ({} total)", count, self.particles.len());
    }

    pub fn n_particles(&self) -> usize {
        self.particles.len()
    }

    pub fn particles(&self) -> &[SphereParticle] {
        &self.particles
    }

    pub fn particles_mut(&mut self) -> &mut [SphereParticle] {
        &mut self.particles
    }

    /// Listen for the batched per-frame update
    ///
    /// The callback receives the full particle list after every particle
    /// has been moved.
    pub fn add_particles_listener<F>(&mut self, callback: F) -> ListenerHandle<ParticleEvent>
    where
        F: FnMut(&[SphereParticle]) + 'static,
    {
        self.events.add_listener(ParticleEvent::ParticlesUpdated, callback)
    }

    /// Like [`ParticleSystemModel::add_particles_listener`], replacing any
    /// listener previously registered under `name`
    pub fn add_named_particles_listener<F>(&mut self, name: &str, callback: F) -> ListenerHandle<ParticleEvent>
    where
        F: FnMut(&[SphereParticle]) + 'static,
    {
        self.events
            .add_named_listener(ParticleEvent::ParticlesUpdated, name, callback)
    }

    pub fn remove_particles_listener(&mut self, handle: &ListenerHandle<ParticleEvent>) -> bool {
        self.events.remove_listener(handle)
    }

    /// Notify listeners that the particles changed
    pub fn signal_particles_updated(&mut self) {
        self.events
            .signal(ParticleEvent::ParticlesUpdated, self.particles.as_slice());
    }

    /// Unit sphere mesh to instance once per particle
    pub fn particle_geometry(&self, segments: u32) -> GeometryData {
        generate_sphere(1.0, segments, segments / 2)
    }

    /// Per-particle model matrices, column-major, for instanced drawing
    pub fn instance_transforms(&self) -> Vec<[[f32; 4]; 4]> {
        self.particles.iter().map(|p| p.transform().into()).collect()
    }
}

impl NodeModel for ParticleSystemModel {
    fn time_update(&mut self, t: f32) {
        let phase = t * PI * 2.0 * self.orbit_frequency;
        let count = self.particles.len() as f32;

        for (p, particle) in self.particles.iter_mut().enumerate() {
            let offset = p as f32 * PI * 2.0 / count;
            particle.position.x = self.orbit_radius * (offset + phase).sin();
            particle.position.y = self.orbit_radius * (offset + phase).cos();
            particle.position.z = self.z_offset;
        }

        log::trace!("Moved {} particles at t = {}", self.particles.len(), t);
        self.signal_particles_updated();
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn material(&self) -> &Material {
        &self.material
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
