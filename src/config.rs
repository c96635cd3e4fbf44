//! Scene configuration
//!
//! Construction-time settings for the node models, with sensible defaults
//! and fluent `with_*` setters. Values that change while the scene runs
//! (such as the terrain coefficient) live in [`AppState`](crate::state::AppState)
//! sliders instead.
//!
//! ```
//! use scenery::config::{ParticleSystemSettings, SceneConfig};
//!
//! let config = SceneConfig::default()
//!     .with_particles(ParticleSystemSettings::default().with_count(12).with_orbit_radius(0.8))
//!     .with_time_scale(0.5);
//! assert_eq!(config.particles.count, 12);
//! ```

use std::path::PathBuf;

/// Settings for the orbiting particle system
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleSystemSettings {
    pub count: usize,
    pub orbit_radius: f32,
    /// Revolutions per unit of scene time
    pub orbit_frequency: f32,
    pub z_offset: f32,
    pub particle_radius: f32,
    pub particle_color: [f32; 4],
}

impl Default for ParticleSystemSettings {
    fn default() -> Self {
        Self {
            count: 10,
            orbit_radius: 0.5,
            orbit_frequency: 2.0,
            z_offset: 0.1,
            particle_radius: 0.05,
            particle_color: [0.2, 1.0, 0.2, 0.5],
        }
    }
}

impl ParticleSystemSettings {
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    pub fn with_orbit_radius(mut self, radius: f32) -> Self {
        self.orbit_radius = radius;
        self
    }

    pub fn with_orbit_frequency(mut self, frequency: f32) -> Self {
        self.orbit_frequency = frequency;
        self
    }

    pub fn with_z_offset(mut self, z_offset: f32) -> Self {
        self.z_offset = z_offset;
        self
    }

    pub fn with_particle_radius(mut self, radius: f32) -> Self {
        self.particle_radius = radius.max(0.0);
        self
    }

    pub fn with_color(mut self, color: [f32; 4]) -> Self {
        self.particle_color = color;
        self
    }
}

/// Settings for the procedural terrain
#[derive(Debug, Clone, PartialEq)]
pub struct TerrainSettings {
    /// World-space extent along X
    pub width: f32,
    /// World-space extent along Y
    pub height: f32,
    /// Grid resolution along X; also the height map width in texels
    pub width_segments: u32,
    /// Grid resolution along Y; also the height map height in texels
    pub height_segments: u32,
    /// Diffuse texture repeats in (u, v)
    pub texture_wrap: [f32; 2],
    /// Displace in the shader from a height map texture instead of on the CPU
    pub use_data_texture: bool,
}

impl Default for TerrainSettings {
    fn default() -> Self {
        Self {
            width: 10.0,
            height: 10.0,
            width_segments: 128,
            height_segments: 128,
            texture_wrap: [5.0, 5.0],
            use_data_texture: true,
        }
    }
}

impl TerrainSettings {
    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_segments(mut self, width_segments: u32, height_segments: u32) -> Self {
        self.width_segments = width_segments;
        self.height_segments = height_segments;
        self
    }

    pub fn with_texture_wrap(mut self, wrap_x: f32, wrap_y: f32) -> Self {
        self.texture_wrap = [wrap_x, wrap_y];
        self
    }

    pub fn with_data_texture(mut self, use_data_texture: bool) -> Self {
        self.use_data_texture = use_data_texture;
        self
    }
}

/// Everything needed to build the example scene
#[derive(Debug, Clone, PartialEq)]
pub struct SceneConfig {
    pub particles: ParticleSystemSettings,
    pub terrain: TerrainSettings,
    /// Name of the diffuse texture the terrain samples
    pub terrain_diffuse: String,
    /// Multiplier applied to frame deltas
    pub time_scale: f32,
    /// Step size for deterministic updates, or `None` for variable steps
    pub fixed_timestep: Option<f32>,
    /// Directory holding `<name>/<name>.{vert,frag}.glsl`
    pub shader_root: PathBuf,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            particles: ParticleSystemSettings::default(),
            terrain: TerrainSettings::default(),
            terrain_diffuse: "grass".to_string(),
            time_scale: 1.0,
            fixed_timestep: None,
            shader_root: PathBuf::from("shaders"),
        }
    }
}

impl SceneConfig {
    pub fn with_particles(mut self, particles: ParticleSystemSettings) -> Self {
        self.particles = particles;
        self
    }

    pub fn with_terrain(mut self, terrain: TerrainSettings) -> Self {
        self.terrain = terrain;
        self
    }

    pub fn with_time_scale(mut self, scale: f32) -> Self {
        self.time_scale = scale.max(0.0);
        self
    }

    pub fn with_fixed_timestep(mut self, timestep: Option<f32>) -> Self {
        self.fixed_timestep = timestep;
        self
    }

    pub fn with_shader_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.shader_root = root.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_particle_defaults() {
        let settings = ParticleSystemSettings::default();
        assert_eq!(settings.orbit_radius, 0.5);
        assert_eq!(settings.orbit_frequency, 2.0);
        assert_eq!(settings.z_offset, 0.1);
        assert_eq!(settings.particle_color, [0.2, 1.0, 0.2, 0.5]);
    }

    #[test]
    fn test_terrain_builder() {
        let settings = TerrainSettings::default()
            .with_segments(8, 4)
            .with_texture_wrap(2.0, 3.0)
            .with_data_texture(false);
        assert_eq!((settings.width_segments, settings.height_segments), (8, 4));
        assert_eq!(settings.texture_wrap, [2.0, 3.0]);
        assert!(!settings.use_data_texture);
    }

    #[test]
    fn test_negative_time_scale_clamped() {
        let config = SceneConfig::default().with_time_scale(-2.0);
        assert_eq!(config.time_scale, 0.0);
    }
}
