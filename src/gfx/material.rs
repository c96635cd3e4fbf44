//! Material instances and the factory capability that stubs them out
//!
//! A shader model compiles once (in the host) and hands out any number of
//! lightweight [`Material`] instances. Node models never see the shader
//! model directly; they receive something implementing [`MaterialFactory`].

use std::collections::HashMap;

/// Value bound to a named shader uniform
#[derive(Debug, Clone, PartialEq)]
pub enum UniformValue {
    Float(f32),
    Vec2([f32; 2]),
    /// RGBA color
    Color([f32; 4]),
    /// Name of a texture resource owned by the host renderer
    Texture(String),
}

impl From<f32> for UniformValue {
    fn from(value: f32) -> Self {
        UniformValue::Float(value)
    }
}

impl From<[f32; 2]> for UniformValue {
    fn from(value: [f32; 2]) -> Self {
        UniformValue::Vec2(value)
    }
}

impl From<[f32; 4]> for UniformValue {
    fn from(value: [f32; 4]) -> Self {
        UniformValue::Color(value)
    }
}

/// Per-instance material stubbed from a shader model
///
/// Holds the uniform values this instance overrides. The host renderer
/// looks the shader program up by `shader_name`.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub shader_name: String,
    uniforms: HashMap<String, UniformValue>,
}

impl Material {
    /// Creates a material with no uniforms set
    pub fn new(shader_name: &str) -> Self {
        Self {
            shader_name: shader_name.to_string(),
            uniforms: HashMap::new(),
        }
    }

    /// Sets a uniform, replacing any previous value
    pub fn set_uniform(&mut self, name: &str, value: impl Into<UniformValue>) {
        self.uniforms.insert(name.to_string(), value.into());
    }

    /// Binds a named texture to a sampler uniform
    pub fn set_texture(&mut self, name: &str, texture_name: &str) {
        self.uniforms
            .insert(name.to_string(), UniformValue::Texture(texture_name.to_string()));
    }

    pub fn uniform(&self, name: &str) -> Option<&UniformValue> {
        self.uniforms.get(name)
    }

    /// Builder pattern: Set a uniform
    pub fn with_uniform(mut self, name: &str, value: impl Into<UniformValue>) -> Self {
        self.set_uniform(name, value);
        self
    }

    /// Uniform names in sorted order
    pub fn uniform_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.uniforms.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// Capability for creating materials from an already loaded shader
pub trait MaterialFactory {
    /// Name of the shader this factory stubs materials from
    fn shader_name(&self) -> &str;

    /// Creates a fresh material instance
    fn create_material(&self) -> Material;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_uniform_replaces() {
        let mut material = Material::new("terrain");
        material.set_uniform("diffuse", 0.2);
        material.set_uniform("diffuse", 0.5);
        assert_eq!(material.uniform("diffuse"), Some(&UniformValue::Float(0.5)));
    }

    #[test]
    fn test_builder_and_names() {
        let material = Material::new("exampleparticle")
            .with_uniform("particleColor", [0.2, 1.0, 0.2, 0.5])
            .with_uniform("alpha", 1.0);
        assert_eq!(material.uniform_names(), vec!["alpha", "particleColor"]);
        assert_eq!(
            material.uniform("particleColor"),
            Some(&UniformValue::Color([0.2, 1.0, 0.2, 0.5]))
        );
    }

    #[test]
    fn test_texture_binding() {
        let mut material = Material::new("terrain");
        material.set_texture("diffuseMap", "grass");
        assert_eq!(
            material.uniform("diffuseMap"),
            Some(&UniformValue::Texture("grass".to_string()))
        );
        assert!(material.uniform("heightMap").is_none());
    }
}
