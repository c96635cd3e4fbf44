//! Core node model trait
//!
//! Defines the interface a node model implements to be driven by the host's
//! render loop through [`SceneModel`](super::manager::SceneModel).

use std::any::Any;

use crate::gfx::Material;

/// A scene-graph entity holding renderable state, updated once per frame
pub trait NodeModel {
    /// Advance the model to absolute scene time `t`, in seconds
    ///
    /// Called once per frame. Implementations mutate their own state and
    /// announce the batch with a single signal.
    fn time_update(&mut self, t: f32);

    /// Name for display and logging
    fn name(&self) -> &str;

    /// Material the host renders this node with
    fn material(&self) -> &Material;

    /// Downcasting support for callers that know the concrete type
    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}
