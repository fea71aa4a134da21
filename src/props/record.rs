use super::TextureRole;
use serde::Serialize;
use std::collections::BTreeMap;

/// Texture filenames pulled out of one props file, keyed by role
///
/// Only roles that resolved to a filename are present. A missing role means
/// the material has no texture for it (or the entry was malformed, see
/// `extract_with_issues`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PropsRecord {
    textures: BTreeMap<TextureRole, String>,
}

impl PropsRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the derived filename for a role
    /// First write wins, later duplicates are ignored
    pub fn insert(&mut self, role: TextureRole, file_name: String) {
        self.textures.entry(role).or_insert(file_name);
    }

    pub fn get(&self, role: TextureRole) -> Option<&str> {
        self.textures.get(&role).map(String::as_str)
    }

    pub fn contains(&self, role: TextureRole) -> bool {
        self.textures.contains_key(&role)
    }

    /// Iterate in role order (BaseColorMap, NormalMap, RMHMap)
    pub fn iter(&self) -> impl Iterator<Item = (TextureRole, &str)> {
        self.textures.iter().map(|(role, name)| (*role, name.as_str()))
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}
