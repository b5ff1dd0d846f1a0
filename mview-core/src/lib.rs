//! The core of the mview model viewer. This crate contains everything that does not need a
//! window: shader programs, meshes, textures, OBJ import, the camera and the per-frame viewer
//! state. GPU work goes through the [`gpu::Gpu`] trait, implemented for [`glow::Context`].

pub mod camera;
pub mod config;
pub mod error;
pub mod gpu;
pub mod mesh;
pub mod model;
pub mod shader;
pub mod state;
pub mod texture;
pub mod vertex;

#[cfg(test)]
pub(crate) mod testing;

pub use camera::{Camera, Movement};
pub use config::ViewerConfig;
pub use error::{ConfigError, GpuError, ModelError, ShaderError, TextureError};
pub use gpu::Gpu;
pub use mesh::{Mesh, MeshTexture};
pub use model::{MeshData, Model};
pub use shader::{Shader, ShaderProgram, ShaderStage, Uniform};
pub use state::ViewerState;
pub use texture::{Texture, TextureCache, TextureKind};
pub use vertex::{ModelVertex, Vertex};
