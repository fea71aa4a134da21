/// Texture reference extraction from props dumps
///
/// A props dump is not parsed as a grammar. For each role key we look for the
/// first `Name=<key>`, then the first `Texture2D'<path>'` span after it, and
/// turn the path into a texture filename.

use super::{PropsRecord, TextureRole};
use anyhow::{Context, Result};
use log::debug;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Opening marker of a texture reference, the path follows up to the next `'`
pub const TEXTURE_MARKER: &str = "Texture2D'";

/// Extension appended to every derived texture name
pub const DEFAULT_EXTENSION: &str = ".png";

/// A role key that is present in the dump but has no usable texture path
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PropsIssue {
    #[error("Name={role} has no Texture2D' reference after it")]
    MissingTextureMarker { role: TextureRole },

    #[error("Name={role} has a Texture2D' reference with no closing quote")]
    UnterminatedPath { role: TextureRole },

    #[error("Name={role} references `{path}`, which has no file name")]
    EmptyTextureName { role: TextureRole, path: String },
}

impl PropsIssue {
    pub fn role(&self) -> TextureRole {
        match self {
            PropsIssue::MissingTextureMarker { role }
            | PropsIssue::UnterminatedPath { role }
            | PropsIssue::EmptyTextureName { role, .. } => *role,
        }
    }
}

/// Outcome of looking up a single role key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyScan {
    /// Derived texture filename (basename, first-dot stem, new extension)
    Found(String),
    /// No `Name=<key>` anywhere in the content
    Absent,
    Malformed(PropsIssue),
}

/// Extracts texture filenames for a fixed, ordered set of roles
#[derive(Debug, Clone)]
pub struct PropsExtractor {
    roles: Vec<TextureRole>,
    extension: String,
}

impl Default for PropsExtractor {
    fn default() -> Self {
        Self::new(&TextureRole::ALL)
    }
}

impl PropsExtractor {
    pub fn new(roles: &[TextureRole]) -> Self {
        Self {
            roles: roles.to_vec(),
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }

    /// Override the extension appended to derived names (".png" by default)
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn roles(&self) -> &[TextureRole] {
        &self.roles
    }

    /// Look up one role key, first occurrence wins
    pub fn scan_key(&self, content: &str, role: TextureRole) -> KeyScan {
        let Some(start) = content.find(&format!("Name={}", role.key())) else {
            return KeyScan::Absent;
        };

        let Some(marker) = content[start..].find(TEXTURE_MARKER) else {
            return KeyScan::Malformed(PropsIssue::MissingTextureMarker { role });
        };
        let path_start = start + marker + TEXTURE_MARKER.len();

        let Some(path_len) = content[path_start..].find('\'') else {
            return KeyScan::Malformed(PropsIssue::UnterminatedPath { role });
        };
        let raw_path = &content[path_start..path_start + path_len];

        // Dumps mix engine paths ("/Game/Tex/T_Wall.T_Wall") and OS paths
        let base_name = raw_path
            .rsplit(|c: char| c == '/' || c == '\\')
            .next()
            .unwrap_or(raw_path);
        let stem = base_name.split('.').next().unwrap_or(base_name);

        if stem.is_empty() {
            return KeyScan::Malformed(PropsIssue::EmptyTextureName {
                role,
                path: raw_path.to_string(),
            });
        }

        KeyScan::Found(format!("{}{}", stem, self.extension))
    }

    /// Extract every configured role, silently dropping absent and malformed keys
    pub fn extract(&self, content: &str) -> PropsRecord {
        self.extract_with_issues(content).0
    }

    /// Extract every configured role and report the keys that were present
    /// but malformed, so callers can tell them apart from absent roles
    pub fn extract_with_issues(&self, content: &str) -> (PropsRecord, Vec<PropsIssue>) {
        let mut record = PropsRecord::new();
        let mut issues = Vec::new();

        for &role in &self.roles {
            match self.scan_key(content, role) {
                KeyScan::Found(file_name) => {
                    debug!("{} -> {}", role, file_name);
                    record.insert(role, file_name);
                }
                KeyScan::Absent => debug!("{} not present", role),
                KeyScan::Malformed(issue) => {
                    debug!("{}", issue);
                    issues.push(issue);
                }
            }
        }

        (record, issues)
    }

    /// Read a props file from disk and extract it
    /// Invalid UTF-8 is replaced rather than rejected; dumps often carry stray bytes
    pub fn read_file(&self, path: &Path) -> Result<(PropsRecord, Vec<PropsIssue>)> {
        let bytes = fs::read(path)
            .with_context(|| format!("Failed to read props file {:?}", path))?;
        let content = String::from_utf8_lossy(&bytes);
        Ok(self.extract_with_issues(&content))
    }
}

/// Extract `roles` from `content` with the default ".png" naming
pub fn extract(content: &str, roles: &[TextureRole]) -> PropsRecord {
    PropsExtractor::new(roles).extract(content)
}

/// Read and extract a props file with the default ".png" naming
pub fn read_props_file(path: &Path, roles: &[TextureRole]) -> Result<(PropsRecord, Vec<PropsIssue>)> {
    PropsExtractor::new(roles).read_file(path)
}
