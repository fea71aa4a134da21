// Boundary between texture resolution and whatever builds the material

pub mod graph;
pub mod sink;

pub use graph::{GraphOptions, ShaderGraph};
pub use sink::{DryRunSink, GraphExporter, MaterialSink};

use crate::props::TextureRole;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// A material whose texture filenames have been found on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedMaterial {
    pub name: String,
    pub textures: BTreeMap<TextureRole, PathBuf>,
}

impl ResolvedMaterial {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            textures: BTreeMap::new(),
        }
    }

    pub fn texture(&self, role: TextureRole) -> Option<&Path> {
        self.textures.get(&role).map(PathBuf::as_path)
    }
}
