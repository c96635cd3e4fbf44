//! # Procedural Geometry Generation
//!
//! Generates the meshes the node models hand to the host renderer: a small
//! UV sphere instanced once per particle, and a subdivided plane that the
//! terrain height field displaces.
//!
//! ## Usage
//!
//! ```rust
//! use scenery::gfx::geometry::{generate_plane, generate_sphere};
//!
//! // Sphere of radius 0.1 with 16 longitude and 8 latitude segments
//! let sphere = generate_sphere(0.1, 16, 8);
//!
//! // 10x10 plane with 4 subdivisions each way
//! let plane = generate_plane(10.0, 10.0, 4, 4);
//! assert_eq!(plane.vertex_count(), 25);
//! ```

pub mod primitives;

pub use primitives::*;

/// Generated geometry data ready for upload
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryData {
    /// Vertex positions (x, y, z)
    pub vertices: Vec<[f32; 3]>,
    /// Texture coordinates (u, v)
    pub tex_coords: Vec<[f32; 2]>,
    /// Normal vectors (x, y, z)
    pub normals: Vec<[f32; 3]>,
    /// Triangle indices (counter-clockwise winding)
    pub indices: Vec<u32>,
}

impl GeometryData {
    /// Create a new empty geometry data structure
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            tex_coords: Vec::new(),
            normals: Vec::new(),
            indices: Vec::new(),
        }
    }

    /// Get the number of vertices in this geometry
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of triangles in this geometry
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Positions as bytes for a vertex buffer upload
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Indices as bytes for an index buffer upload
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}

impl Default for GeometryData {
    fn default() -> Self {
        Self::new()
    }
}
