//! Mesh management module.
//!
//! This module defines the [`Mesh`] struct for managing mesh data on the GPU side. Geometry
//! is uploaded once when the mesh is created and never touched again.

use std::sync::Arc;

use crate::error::GpuError;
use crate::gpu::Gpu;
use crate::shader::ShaderProgram;
use crate::texture::{Texture, TextureBinding, TextureKind, texture_bindings};
use crate::vertex::{ModelVertex, apply_vertex_layout};

/// A texture used by a mesh, tagged with its role. The texture itself is shared.
pub struct MeshTexture<G: Gpu = glow::Context> {
    pub kind: TextureKind,
    pub texture: Arc<Texture<G>>,
}

impl<G: Gpu> Clone for MeshTexture<G> {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            texture: Arc::clone(&self.texture),
        }
    }
}

/// Represents a mesh stored on the GPU side.
pub struct Mesh<G: Gpu = glow::Context> {
    gl: Arc<G>,
    vao: G::VertexArray,
    vbo: G::Buffer,
    ebo: G::Buffer,
    vertices: Vec<ModelVertex>,
    indices: Vec<u32>,
    textures: Vec<MeshTexture<G>>,
    bindings: Vec<TextureBinding>,
}

impl<G: Gpu> Mesh<G> {
    /// Creates a new mesh and uploads its vertex and index data.
    pub fn new(
        gl: &Arc<G>,
        vertices: Vec<ModelVertex>,
        indices: Vec<u32>,
        textures: Vec<MeshTexture<G>>,
    ) -> Result<Self, GpuError> {
        let vao = gl.create_vertex_array()?;
        let vbo = gl.create_buffer().inspect_err(|_| gl.delete_vertex_array(vao))?;
        let ebo = gl.create_buffer().inspect_err(|_| {
            gl.delete_buffer(vbo);
            gl.delete_vertex_array(vao);
        })?;

        gl.bind_vertex_array(Some(vao));
        gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
        gl.buffer_data(
            glow::ARRAY_BUFFER,
            bytemuck::cast_slice(vertices.as_slice()),
            glow::STATIC_DRAW,
        );

        gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(ebo));
        gl.buffer_data(
            glow::ELEMENT_ARRAY_BUFFER,
            bytemuck::cast_slice(indices.as_slice()),
            glow::STATIC_DRAW,
        );

        apply_vertex_layout::<ModelVertex, G>(gl);

        gl.bind_vertex_array(None);
        gl.bind_buffer(glow::ARRAY_BUFFER, None);

        let bindings = texture_bindings(textures.iter().map(|t| t.kind));

        Ok(Self {
            gl: Arc::clone(gl),
            vao,
            vbo,
            ebo,
            vertices,
            indices,
            textures,
            bindings,
        })
    }

    /// Draws the mesh with the given program, which must already be in use.
    ///
    /// Texture `i` goes to unit `i` and its sampler is named after its kind and its position
    /// among textures of that kind, e.g. `texture_diffuse1`, `texture_diffuse2`,
    /// `texture_specular1`.
    pub fn draw(&self, program: &ShaderProgram<G>) {
        for (texture, binding) in self.textures.iter().zip(&self.bindings) {
            program.set_uniform(&binding.uniform, binding.unit as i32);
            texture.texture.bind(binding.unit);
        }

        self.gl.bind_vertex_array(Some(self.vao));
        self.gl.draw_elements(
            glow::TRIANGLES,
            self.indices.len() as i32,
            glow::UNSIGNED_INT,
            0,
        );
        self.gl.bind_vertex_array(None);

        self.gl.active_texture(0);
    }

    pub fn vertices(&self) -> &[ModelVertex] {
        &self.vertices
    }

    /// Returns the amount of indices used in the mesh.
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn textures(&self) -> &[MeshTexture<G>] {
        &self.textures
    }

    /// The sampler uniform and texture unit of each texture, in texture order.
    pub fn bindings(&self) -> &[TextureBinding] {
        &self.bindings
    }
}

impl<G: Gpu> Drop for Mesh<G> {
    fn drop(&mut self) {
        self.gl.delete_buffer(self.vbo);
        self.gl.delete_buffer(self.ebo);
        self.gl.delete_vertex_array(self.vao);
    }
}
