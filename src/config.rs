/// Settings for a run, persisted as JSON
///
/// The root folder is a plain value handed to each run; nothing is kept in
/// global state between runs.

use crate::props::{extractor::DEFAULT_EXTENSION, TextureRole};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings from {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse settings in {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to encode settings: {0}")]
    Encode(serde_json::Error),

    #[error("failed to write settings to {path:?}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("root folder is not set (use --root or set root_path in {0:?})")]
    MissingRoot(PathBuf),

    #[error("root folder {0:?} does not exist or is not a directory")]
    BadRoot(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Folder searched recursively for props files and textures
    #[serde(default)]
    pub root_path: String,
    /// Where shader graphs are written
    #[serde(default = "default_output")]
    pub output_path: String,
    #[serde(default = "default_roles")]
    pub roles: Vec<TextureRole>,
    /// Extension given to every derived texture name
    #[serde(default = "default_extension")]
    pub texture_extension: String,
    #[serde(default)]
    pub wire_rmh: bool,
    /// Material name patterns to skip
    #[serde(default)]
    pub exclude: Vec<String>,
}

fn default_output() -> String {
    "materials".to_string()
}

fn default_roles() -> Vec<TextureRole> {
    TextureRole::ALL.to_vec()
}

fn default_extension() -> String {
    DEFAULT_EXTENSION.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            root_path: String::new(),
            output_path: default_output(),
            roles: default_roles(),
            texture_extension: default_extension(),
            wire_rmh: false,
            exclude: Vec::new(),
        }
    }
}

impl Settings {
    /// Default settings file location
    pub fn config_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("material-autoloader");
        path.push("settings.json");
        path
    }

    /// Load settings from a file, or defaults when it does not exist
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Save settings to a file, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        let write_err = |source| SettingsError::Write {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        let content = serde_json::to_string_pretty(self).map_err(SettingsError::Encode)?;
        fs::write(path, content).map_err(write_err)
    }

    /// Root folder as an absolute, existing directory
    pub fn root_dir(&self, config_path: &Path) -> Result<PathBuf, SettingsError> {
        if self.root_path.trim().is_empty() {
            return Err(SettingsError::MissingRoot(config_path.to_path_buf()));
        }

        let root = expand_path(&self.root_path);
        if !root.is_dir() {
            return Err(SettingsError::BadRoot(root));
        }
        Ok(root)
    }

    pub fn output_dir(&self) -> PathBuf {
        expand_path(&self.output_path)
    }
}

/// Expand a leading `~` and make the path absolute
pub fn expand_path(path_str: &str) -> PathBuf {
    let path = match path_str.strip_prefix('~') {
        Some(rest) => match dirs::home_dir() {
            Some(home) => home.join(rest.trim_start_matches(|c: char| c == '/' || c == '\\')),
            None => PathBuf::from(path_str),
        },
        None => PathBuf::from(path_str),
    };

    if path.is_absolute() {
        return path;
    }
    match std::env::current_dir() {
        Ok(cwd) => cwd.join(path),
        Err(_) => path,
    }
}
