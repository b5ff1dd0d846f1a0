//! Error types shared across the core crate.

use std::path::PathBuf;

use thiserror::Error;

use crate::shader::ShaderStage;

/// The driver refused to create an object.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("GPU object creation failed: {0}")]
pub struct GpuError(pub String);

/// Failures while building a shader program.
#[derive(Error, Debug)]
pub enum ShaderError {
    #[error("failed to read shader source {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{stage} shader compilation failed: {log}")]
    Compile { stage: ShaderStage, log: String },
    #[error("shader program linking failed: {log}")]
    Link { log: String },
    #[error(transparent)]
    Gpu(#[from] GpuError),
}

/// Failures while turning an image file into a GPU texture.
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("failed to load texture {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error(transparent)]
    Gpu(#[from] GpuError),
}

/// Failures while loading a model.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("failed to parse model {path}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error(transparent)]
    Gpu(#[from] GpuError),
}

/// Failures while reading the viewer configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
