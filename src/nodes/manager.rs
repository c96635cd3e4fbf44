//! Scene model driving node models from the host render loop
//!
//! Owns the node models and the scene clock. The host calls
//! [`SceneModel::update`] once per frame with the wall-clock delta; the scene
//! advances its own time (respecting pause, time scale and an optional fixed
//! timestep) and hands the absolute scene time to every node.

use super::traits::NodeModel;

/// Owns node models and the scene clock
pub struct SceneModel {
    nodes: Vec<Box<dyn NodeModel>>,
    is_paused: bool,
    time_scale: f32,
    accumulated_time: f32,
    fixed_timestep: Option<f32>, // For deterministic stepping
    time: f32,
    frame_count: u64,
}

impl SceneModel {
    /// Create an empty scene at time zero
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            is_paused: false,
            time_scale: 1.0,
            accumulated_time: 0.0,
            fixed_timestep: None,
            time: 0.0,
            frame_count: 0,
        }
    }

    /// Add a node model; returns its index
    pub fn add_node(&mut self, node: Box<dyn NodeModel>) -> usize {
        log::info!("Added node '{}'", node.name());
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    /// Remove and return the node at `index`
    pub fn remove_node(&mut self, index: usize) -> Option<Box<dyn NodeModel>> {
        if index < self.nodes.len() {
            Some(self.nodes.remove(index))
        } else {
            None
        }
    }

    /// Advance the scene clock and update every node
    ///
    /// # Arguments
    /// * `delta_time` - Wall-clock time since the last frame in seconds
    pub fn update(&mut self, delta_time: f32) {
        if self.is_paused {
            return;
        }

        let scaled_delta = delta_time * self.time_scale;

        match self.fixed_timestep {
            Some(fixed_dt) if fixed_dt > 0.0 => {
                self.accumulated_time += scaled_delta;

                while self.accumulated_time >= fixed_dt {
                    self.time += fixed_dt;
                    self.accumulated_time -= fixed_dt;
                    self.step();
                }
            }
            _ => {
                self.time += scaled_delta;
                self.step();
            }
        }
    }

    fn step(&mut self) {
        self.frame_count += 1;
        log::trace!("Frame {} at t = {}", self.frame_count, self.time);
        for node in &mut self.nodes {
            node.time_update(self.time);
        }
    }

    /// Current scene time in seconds
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Number of node updates performed so far
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Rewind the clock to zero without touching the nodes
    pub fn reset_clock(&mut self) {
        self.time = 0.0;
        self.accumulated_time = 0.0;
        self.frame_count = 0;
    }

    pub fn is_paused(&self) -> bool {
        self.is_paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.is_paused = paused;
    }

    /// Enable fixed timestep mode
    ///
    /// # Arguments
    /// * `timestep` - Fixed timestep in seconds, or None for variable timestep
    pub fn set_fixed_timestep(&mut self, timestep: Option<f32>) {
        if matches!(timestep, Some(dt) if dt <= 0.0) {
            log::warn!("Ignoring non-positive fixed timestep {:?}", timestep);
            return;
        }
        self.fixed_timestep = timestep;
        self.accumulated_time = 0.0; // Reset accumulator
    }

    pub fn fixed_timestep(&self) -> Option<f32> {
        self.fixed_timestep
    }

    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// Set time scale
    ///
    /// # Arguments
    /// * `scale` - Time scale multiplier (1.0 = normal speed)
    pub fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = scale.max(0.0); // Prevent negative time
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn node_names(&self) -> Vec<&str> {
        self.nodes.iter().map(|node| node.name()).collect()
    }

    /// Borrow the node at `index` as its concrete type
    pub fn node<T: NodeModel + 'static>(&self, index: usize) -> Option<&T> {
        self.nodes.get(index)?.as_any().downcast_ref::<T>()
    }

    /// Mutably borrow the node at `index` as its concrete type
    pub fn node_mut<T: NodeModel + 'static>(&mut self, index: usize) -> Option<&mut T> {
        self.nodes.get_mut(index)?.as_any_mut().downcast_mut::<T>()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &dyn NodeModel> {
        self.nodes.iter().map(|node| node.as_ref())
    }
}

impl Default for SceneModel {
    fn default() -> Self {
        Self::new()
    }
}
