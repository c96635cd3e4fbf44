//! Error types for the Scenery node models
//!
//! Almost everything in this crate is allocation-free arithmetic that cannot
//! fail. The errors below cover the few boundaries with the host: shader
//! models that have not been loaded yet, shader sources that cannot be read,
//! and application-state lookups for keys nobody registered.
//!
//! # Examples
//!
//! ```
//! use scenery::error::{Result, SceneryError};
//!
//! fn require_loaded(loaded: bool, name: &str) -> Result<()> {
//!     if !loaded {
//!         return Err(SceneryError::ShaderModelNotLoaded {
//!             name: name.to_string(),
//!         });
//!     }
//!     Ok(())
//! }
//!
//! assert!(require_loaded(false, "terrain").is_err());
//! ```

use thiserror::Error;

/// Errors raised at the boundary between node models and the host
#[derive(Debug, Error)]
pub enum SceneryError {
    /// A node model was constructed before its shader model was loaded
    #[error("shader model '{name}' has not been loaded; load it before creating node models")]
    ShaderModelNotLoaded { name: String },

    /// Shader source files could not be read
    #[error("failed to read shader source '{name}'")]
    ShaderSource {
        name: String,
        #[source]
        source: std::io::Error,
    },

    /// No slider is registered under this key
    #[error("no application state registered under key '{0}'")]
    UnknownStateKey(String),

    /// Slider range is empty or not a number
    #[error("invalid slider '{key}': min {min} is not below max {max}")]
    InvalidSlider { key: String, min: f32, max: f32 },
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, SceneryError>;
