//! Shader models and their one-time asynchronous loading
//!
//! A [`ShaderModel`] can only be obtained by loading its source, so holding
//! one proves the load happened. [`ShaderLibrary`] keeps loaded models by
//! name and turns a missing load into [`SceneryError::ShaderModelNotLoaded`]
//! instead of a crash.
//!
//! ```no_run
//! use scenery::gfx::shader::{DirectoryShaderSource, ShaderLibrary};
//!
//! let source = DirectoryShaderSource::new("shaders");
//! let mut library = ShaderLibrary::new();
//! pollster::block_on(library.load("terrain", &source)).unwrap();
//! assert!(library.require("terrain").is_ok());
//! ```

use std::collections::HashMap;
use std::path::PathBuf;
use std::rc::Rc;

use futures::future::{BoxFuture, FutureExt};

use super::material::{Material, MaterialFactory};
use crate::error::{Result, SceneryError};

/// Vertex and fragment source text of one shader program
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSourceCode {
    pub vertex: String,
    pub fragment: String,
}

/// Somewhere shader sources can be fetched from
pub trait ShaderSource {
    fn load_source<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<ShaderSourceCode>>;
}

/// Shader sources registered in memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryShaderSource {
    shaders: HashMap<String, ShaderSourceCode>,
}

impl InMemoryShaderSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder pattern: Register a shader
    pub fn with_shader(mut self, name: &str, vertex: &str, fragment: &str) -> Self {
        self.shaders.insert(
            name.to_string(),
            ShaderSourceCode {
                vertex: vertex.to_string(),
                fragment: fragment.to_string(),
            },
        );
        self
    }
}

impl ShaderSource for InMemoryShaderSource {
    fn load_source<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<ShaderSourceCode>> {
        let found = self.shaders.get(name).cloned().ok_or_else(|| SceneryError::ShaderSource {
            name: name.to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no in-memory shader registered"),
        });
        futures::future::ready(found).boxed()
    }
}

/// Shader sources on disk, laid out as `<root>/<name>/<name>.{vert,frag}.glsl`
#[derive(Debug, Clone)]
pub struct DirectoryShaderSource {
    root: PathBuf,
}

impl DirectoryShaderSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn stage_path(&self, name: &str, stage: &str) -> PathBuf {
        self.root.join(name).join(format!("{}.{}.glsl", name, stage))
    }
}

impl ShaderSource for DirectoryShaderSource {
    fn load_source<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<ShaderSourceCode>> {
        async move {
            let read = |stage: &str| {
                std::fs::read_to_string(self.stage_path(name, stage)).map_err(|source| {
                    SceneryError::ShaderSource {
                        name: name.to_string(),
                        source,
                    }
                })
            };

            Ok(ShaderSourceCode {
                vertex: read("vert")?,
                fragment: read("frag")?,
            })
        }
        .boxed()
    }
}

/// A loaded shader program that stubs out material instances
#[derive(Debug)]
pub struct ShaderModel {
    name: String,
    source: ShaderSourceCode,
}

impl ShaderModel {
    /// Loads a shader model's source
    pub async fn load(name: &str, source: &dyn ShaderSource) -> Result<Self> {
        let code = source.load_source(name).await?;
        log::debug!(
            "Loaded shader '{}' ({} vertex bytes, {} fragment bytes)",
            name,
            code.vertex.len(),
            code.fragment.len()
        );

        Ok(Self {
            name: name.to_string(),
            source: code,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source(&self) -> &ShaderSourceCode {
        &self.source
    }
}

impl MaterialFactory for ShaderModel {
    fn shader_name(&self) -> &str {
        &self.name
    }

    fn create_material(&self) -> Material {
        Material::new(&self.name)
    }
}

/// Loaded shader models, keyed by name
#[derive(Debug, Default)]
pub struct ShaderLibrary {
    models: HashMap<String, Rc<ShaderModel>>,
}

impl ShaderLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a shader model once
    ///
    /// Loading a name that is already present returns the existing model
    /// without touching the source again.
    pub async fn load(&mut self, name: &str, source: &dyn ShaderSource) -> Result<Rc<ShaderModel>> {
        if let Some(model) = self.models.get(name) {
            log::debug!("Shader '{}' already loaded", name);
            return Ok(model.clone());
        }

        let model = Rc::new(ShaderModel::load(name, source).await?);
        self.models.insert(name.to_string(), model.clone());
        Ok(model)
    }

    pub fn get(&self, name: &str) -> Option<Rc<ShaderModel>> {
        self.models.get(name).cloned()
    }

    /// Like [`ShaderLibrary::get`], but a missing model is an error
    pub fn require(&self, name: &str) -> Result<Rc<ShaderModel>> {
        self.get(name).ok_or_else(|| SceneryError::ShaderModelNotLoaded {
            name: name.to_string(),
        })
    }

    pub fn is_loaded(&self, name: &str) -> bool {
        self.models.contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source() -> InMemoryShaderSource {
        InMemoryShaderSource::new().with_shader("terrain", "void main() {}", "void main() {}")
    }

    #[test]
    fn test_require_before_load_fails() {
        let library = ShaderLibrary::new();
        assert!(matches!(
            library.require("terrain"),
            Err(SceneryError::ShaderModelNotLoaded { .. })
        ));
    }

    #[test]
    fn test_load_then_require() {
        let mut library = ShaderLibrary::new();
        pollster::block_on(library.load("terrain", &source())).unwrap();

        let model = library.require("terrain").unwrap();
        assert_eq!(model.name(), "terrain");
        assert_eq!(model.create_material().shader_name, "terrain");
    }

    #[test]
    fn test_second_load_reuses_model() {
        let mut library = ShaderLibrary::new();
        let first = pollster::block_on(library.load("terrain", &source())).unwrap();
        // An empty source would fail if it were consulted again
        let second = pollster::block_on(library.load("terrain", &InMemoryShaderSource::new())).unwrap();
        assert!(Rc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_missing_source_fails_load() {
        let mut library = ShaderLibrary::new();
        let result = pollster::block_on(library.load("exampleparticle", &source()));
        assert!(matches!(result, Err(SceneryError::ShaderSource { .. })));
        assert!(!library.is_loaded("exampleparticle"));
    }

    #[test]
    fn test_directory_source_reads_stages() {
        let source = DirectoryShaderSource::new(concat!(env!("CARGO_MANIFEST_DIR"), "/shaders"));
        let code = pollster::block_on(source.load_source("terrain")).unwrap();
        assert!(code.vertex.contains("heightMap"));
        assert!(!code.fragment.is_empty());
    }
}
