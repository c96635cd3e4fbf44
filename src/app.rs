//! Example scene application
//!
//! Wires the pieces together the way a host would: loads both shader models
//! once, registers the application-state sliders, builds the particle ring
//! and the terrain, and drives them from a frame loop.

use crate::config::SceneConfig;
use crate::error::Result;
use crate::gfx::shader::{DirectoryShaderSource, ShaderSource};
use crate::gfx::{ImageTexture, ShaderLibrary};
use crate::nodes::particles::{ParticleSystemModel, PARTICLE_SHADER};
use crate::nodes::terrain::{TerrainModel, TERRAIN_SHADER};
use crate::nodes::SceneModel;
use crate::state::AppState;

pub struct SceneryApp {
    config: SceneConfig,
    app_state: AppState,
    shaders: ShaderLibrary,
    scene: SceneModel,
    particle_index: usize,
    terrain_index: usize,
}

impl SceneryApp {
    /// Build the example scene, reading shaders from `config.shader_root`
    pub async fn new(config: SceneConfig) -> Result<Self> {
        let source = DirectoryShaderSource::new(config.shader_root.clone());
        Self::with_source(config, &source).await
    }

    /// Build the example scene with shaders from any source
    pub async fn with_source(config: SceneConfig, source: &dyn ShaderSource) -> Result<Self> {
        let mut shaders = ShaderLibrary::new();
        shaders.load(PARTICLE_SHADER, source).await?;
        shaders.load(TERRAIN_SHADER, source).await?;

        let mut app_state = AppState::new();
        TerrainModel::init_app_state(&mut app_state)?;

        let mut scene = SceneModel::new();
        scene.set_time_scale(config.time_scale);
        scene.set_fixed_timestep(config.fixed_timestep);

        let particles = ParticleSystemModel::create(&shaders, &config.particles)?;
        let particle_index = scene.add_node(Box::new(particles));

        let diffuse = ImageTexture::new(&config.terrain_diffuse);
        let mut terrain = TerrainModel::create(&shaders, &mut app_state, diffuse, &config.terrain)?;
        terrain.perlin_terrain();
        let terrain_index = scene.add_node(Box::new(terrain));

        log::info!("Scene ready: {}", scene.node_names().join(", "));

        Ok(Self {
            config,
            app_state,
            shaders,
            scene,
            particle_index,
            terrain_index,
        })
    }

    /// Advance one frame
    pub fn update(&mut self, delta_time: f32) {
        self.scene.update(delta_time);
    }

    /// Run `frames` frames of `delta_time` seconds each
    pub fn run_frames(&mut self, frames: u32, delta_time: f32) {
        for _ in 0..frames {
            self.update(delta_time);
        }
    }

    /// Change an application-state slider, as a UI would
    pub fn set_state(&mut self, key: &str, value: f32) -> Result<()> {
        self.app_state.set_state(key, value)
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn app_state(&self) -> &AppState {
        &self.app_state
    }

    pub fn shaders(&self) -> &ShaderLibrary {
        &self.shaders
    }

    pub fn scene(&self) -> &SceneModel {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut SceneModel {
        &mut self.scene
    }

    pub fn particles(&self) -> Option<&ParticleSystemModel> {
        self.scene.node(self.particle_index)
    }

    pub fn particles_mut(&mut self) -> Option<&mut ParticleSystemModel> {
        self.scene.node_mut(self.particle_index)
    }

    pub fn terrain(&self) -> Option<&TerrainModel> {
        self.scene.node(self.terrain_index)
    }

    pub fn terrain_mut(&mut self) -> Option<&mut TerrainModel> {
        self.scene.node_mut(self.terrain_index)
    }
}
