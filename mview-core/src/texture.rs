//! Structs and functions for handling textures.
//!
//! The module provides the [`Texture`] struct which is a CPU representation of a GPU texture,
//! the [`TextureCache`] that shares one texture between every mesh using the same file, and
//! the binding table that decides which sampler uniform each texture of a mesh is written to.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::{DynamicImage, GenericImageView};

use crate::error::{GpuError, TextureError};
use crate::gpu::Gpu;

/// What a texture means to the lighting shader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureKind {
    Diffuse,
    Specular,
    Normal,
    Height,
}

impl TextureKind {
    pub const ALL: [TextureKind; 4] = [
        TextureKind::Diffuse,
        TextureKind::Specular,
        TextureKind::Normal,
        TextureKind::Height,
    ];

    /// The sampler name prefix a shader declares for this kind.
    pub fn uniform_base(self) -> &'static str {
        match self {
            TextureKind::Diffuse => "texture_diffuse",
            TextureKind::Specular => "texture_specular",
            TextureKind::Normal => "texture_normal",
            TextureKind::Height => "texture_height",
        }
    }
}

impl fmt::Display for TextureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.uniform_base())
    }
}

/// Where one texture of a mesh goes at draw time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureBinding {
    pub unit: u32,
    pub uniform: String,
}

/// Assigns texture units in list order and names each sampler `<base><n>`, where `n` counts
/// from 1 separately for every kind.
pub fn texture_bindings<I>(kinds: I) -> Vec<TextureBinding>
where
    I: IntoIterator<Item = TextureKind>,
{
    let mut counters: HashMap<TextureKind, u32> = HashMap::new();
    kinds
        .into_iter()
        .enumerate()
        .map(|(unit, kind)| {
            let n = counters.entry(kind).or_insert(0);
            *n += 1;
            TextureBinding {
                unit: unit as u32,
                uniform: format!("{}{}", kind.uniform_base(), n),
            }
        })
        .collect()
}

/// Represents a texture stored on the GPU side.
pub struct Texture<G: Gpu = glow::Context> {
    gl: Arc<G>,
    id: G::Texture,
    path: PathBuf,
    width: u32,
    height: u32,
}

impl<G: Gpu> Texture<G> {
    /// Creates a new texture from the given [`image::DynamicImage`].
    pub fn new(gl: &Arc<G>, image: &DynamicImage, path: impl Into<PathBuf>) -> Result<Self, GpuError> {
        let (width, height) = image.dimensions();
        let data = image.to_rgba8().into_raw();
        Self::new_from_data(gl, width, height, &data, path)
    }

    /// Creates a new texture from raw RGBA data.
    pub fn new_from_data(
        gl: &Arc<G>,
        width: u32,
        height: u32,
        data: &[u8],
        path: impl Into<PathBuf>,
    ) -> Result<Self, GpuError> {
        let texture = gl.create_texture()?;
        gl.bind_texture_2d(Some(texture));
        gl.tex_image_2d_rgba8(width, height, data);
        gl.generate_mipmap_2d();
        gl.tex_parameter_2d(glow::TEXTURE_WRAP_S, glow::REPEAT as i32);
        gl.tex_parameter_2d(glow::TEXTURE_WRAP_T, glow::REPEAT as i32);
        gl.tex_parameter_2d(glow::TEXTURE_MIN_FILTER, glow::LINEAR_MIPMAP_LINEAR as i32);
        gl.tex_parameter_2d(glow::TEXTURE_MAG_FILTER, glow::LINEAR as i32);
        gl.bind_texture_2d(None);

        Ok(Self {
            gl: Arc::clone(gl),
            id: texture,
            path: path.into(),
            width,
            height,
        })
    }

    /// Decodes an image file and uploads it. Rows are flipped when `flip` is set, since
    /// OpenGL expects the first row at the bottom.
    pub fn load(gl: &Arc<G>, path: &Path, flip: bool) -> Result<Self, TextureError> {
        let image = image::open(path).map_err(|source| TextureError::Image {
            path: path.to_path_buf(),
            source,
        })?;
        let image = if flip { image.flipv() } else { image };
        Ok(Self::new(gl, &image, path)?)
    }

    /// A 1x1 white texture, used in place of files that failed to load.
    pub fn blank(gl: &Arc<G>, path: impl Into<PathBuf>) -> Result<Self, GpuError> {
        Self::new_from_data(gl, 1, 1, &[255, 255, 255, 255], path)
    }

    /// Binds the texture to the specified texture unit.
    pub fn bind(&self, unit: u32) {
        self.gl.active_texture(unit);
        self.gl.bind_texture_2d(Some(self.id));
    }

    pub fn id(&self) -> G::Texture {
        self.id
    }

    /// The file this texture was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

impl<G: Gpu> Drop for Texture<G> {
    fn drop(&mut self) {
        self.gl.delete_texture(self.id);
    }
}

/// Loads each texture file at most once.
pub struct TextureCache<G: Gpu = glow::Context> {
    gl: Arc<G>,
    flip: bool,
    textures: HashMap<PathBuf, Arc<Texture<G>>>,
}

impl<G: Gpu> TextureCache<G> {
    pub fn new(gl: &Arc<G>, flip: bool) -> Self {
        Self {
            gl: Arc::clone(gl),
            flip,
            textures: HashMap::new(),
        }
    }

    /// Returns the texture for `path`, loading it on first use.
    ///
    /// A file that cannot be decoded is logged and replaced by a blank texture, which is
    /// cached under the same path.
    pub fn get_or_load(&mut self, path: &Path) -> Result<Arc<Texture<G>>, GpuError> {
        if let Some(texture) = self.textures.get(path) {
            return Ok(Arc::clone(texture));
        }

        let texture = match Texture::load(&self.gl, path, self.flip) {
            Ok(texture) => {
                log::debug!(
                    "Loaded texture {} ({}x{})",
                    path.display(),
                    texture.width(),
                    texture.height()
                );
                texture
            }
            Err(TextureError::Gpu(e)) => return Err(e),
            Err(e) => {
                log::error!("{e}");
                Texture::blank(&self.gl, path)?
            }
        };

        let texture = Arc::new(texture);
        self.textures.insert(path.to_path_buf(), Arc::clone(&texture));
        Ok(texture)
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}
