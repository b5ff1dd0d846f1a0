//! Viewer settings, read from `<config dir>/mview/config.json` when present.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub model_path: PathBuf,
    pub vertex_shader: PathBuf,
    pub model_fragment_shader: PathBuf,
    pub light_fragment_shader: PathBuf,
    pub clear_color: [f32; 4],
    pub near_plane: f32,
    pub far_plane: f32,
    pub light_position: [f32; 3],
    pub light_color: [f32; 3],
    /// Flip images vertically on load so row 0 is the bottom row.
    pub flip_textures: bool,
    pub verbose: bool,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            title: "mview".to_string(),
            width: 800,
            height: 600,
            model_path: PathBuf::from("assets/models/nanosuit/nanosuit.obj"),
            vertex_shader: PathBuf::from("assets/shaders/vertex.glsl"),
            model_fragment_shader: PathBuf::from("assets/shaders/model_fragment.glsl"),
            light_fragment_shader: PathBuf::from("assets/shaders/light_fragment.glsl"),
            clear_color: [0.1, 0.1, 0.1, 1.0],
            near_plane: 0.1,
            far_plane: 100.0,
            light_position: [1.2, 1.0, 2.0],
            light_color: [1.0, 1.0, 1.0],
            flip_textures: true,
            verbose: false,
        }
    }
}

impl ViewerConfig {
    /// The per-user config file location, if the platform has a config directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("mview").join("config.json"))
    }

    /// Parses a config file. Missing fields take their default values.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Loads the per-user config file. A missing file gives the defaults; an unreadable or
    /// malformed one is returned as an error so the caller can report it.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::from_file(&path),
            _ => Ok(Self::default()),
        }
    }
}
