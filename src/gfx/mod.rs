//! # Graphics Module
//!
//! The boundary between node models and the host renderer.
//!
//! ## Architecture Overview
//!
//! - **Shaders** ([`shader`]) - One-time asynchronous shader loading and the
//!   [`ShaderLibrary`] that enforces load-before-use
//! - **Materials** ([`material`]) - Per-instance uniform overrides and the
//!   [`MaterialFactory`] capability handed to node models
//! - **Textures** ([`texture`]) - CPU-side float data textures with a dirty
//!   flag for re-upload, plus image texture references
//! - **Geometry** ([`geometry`]) - Procedural sphere and plane meshes
//!
//! Compiling shaders, creating GPU buffers and drawing are the host's job.
//!
//! ## Usage
//!
//! ```
//! use scenery::gfx::shader::{InMemoryShaderSource, ShaderLibrary};
//! use scenery::gfx::MaterialFactory;
//!
//! let source = InMemoryShaderSource::new().with_shader("terrain", "", "");
//! let mut library = ShaderLibrary::new();
//! let terrain_shader = pollster::block_on(library.load("terrain", &source)).unwrap();
//! let material = terrain_shader.create_material();
//! assert_eq!(material.shader_name, "terrain");
//! ```

pub mod geometry;
pub mod material;
pub mod shader;
pub mod texture;

// Re-export commonly used types
pub use material::{Material, MaterialFactory, UniformValue};
pub use shader::{ShaderLibrary, ShaderModel};
pub use texture::{DataTextureFloat1D, FilterMode, ImageTexture};
