//! Vertex formats and their attribute layouts.
//!
//! Every vertex type describes itself through a static table of [`VertexAttribute`]s, which
//! [`apply_vertex_layout`] turns into attribute pointer calls on the currently bound vertex
//! array.

use std::mem::{offset_of, size_of};

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};

use crate::gpu::Gpu;

/// Number of bone influences a vertex can carry.
pub const MAX_BONE_INFLUENCE: usize = 4;

/// How the shader reads an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKind {
    Float,
    Int,
}

/// One slot of a vertex layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    pub location: u32,
    pub components: i32,
    pub kind: AttributeKind,
    pub offset: usize,
}

/// Trait that defines the attribute layout of a vertex.
pub trait Vertex: Pod {
    const ATTRIBUTES: &'static [VertexAttribute];
}

/// The vertex used by every model mesh.
///
/// The bone fields are uploaded but nothing in the viewer animates them.
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
#[repr(C)]
pub struct ModelVertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub tex_coords: Vec2,
    pub tangent: Vec3,
    pub bitangent: Vec3,
    pub bone_ids: [i32; MAX_BONE_INFLUENCE],
    pub bone_weights: [f32; MAX_BONE_INFLUENCE],
}

impl ModelVertex {
    /// A vertex with only position, normal and texture coordinates filled in.
    pub fn new(position: Vec3, normal: Vec3, tex_coords: Vec2) -> Self {
        Self {
            position,
            normal,
            tex_coords,
            ..Default::default()
        }
    }
}

impl Vertex for ModelVertex {
    const ATTRIBUTES: &'static [VertexAttribute] = &[
        VertexAttribute {
            location: 0,
            components: 3,
            kind: AttributeKind::Float,
            offset: offset_of!(ModelVertex, position),
        },
        VertexAttribute {
            location: 1,
            components: 3,
            kind: AttributeKind::Float,
            offset: offset_of!(ModelVertex, normal),
        },
        VertexAttribute {
            location: 2,
            components: 2,
            kind: AttributeKind::Float,
            offset: offset_of!(ModelVertex, tex_coords),
        },
        VertexAttribute {
            location: 3,
            components: 3,
            kind: AttributeKind::Float,
            offset: offset_of!(ModelVertex, tangent),
        },
        VertexAttribute {
            location: 4,
            components: 3,
            kind: AttributeKind::Float,
            offset: offset_of!(ModelVertex, bitangent),
        },
        VertexAttribute {
            location: 5,
            components: MAX_BONE_INFLUENCE as i32,
            kind: AttributeKind::Int,
            offset: offset_of!(ModelVertex, bone_ids),
        },
        VertexAttribute {
            location: 6,
            components: MAX_BONE_INFLUENCE as i32,
            kind: AttributeKind::Float,
            offset: offset_of!(ModelVertex, bone_weights),
        },
    ];
}

/// Enables and describes every attribute of `V` on the bound vertex array.
pub fn apply_vertex_layout<V: Vertex, G: Gpu + ?Sized>(gl: &G) {
    let stride = size_of::<V>() as i32;
    for attribute in V::ATTRIBUTES {
        gl.enable_vertex_attrib_array(attribute.location);
        match attribute.kind {
            AttributeKind::Float => gl.vertex_attrib_pointer_f32(
                attribute.location,
                attribute.components,
                glow::FLOAT,
                stride,
                attribute.offset as i32,
            ),
            AttributeKind::Int => gl.vertex_attrib_pointer_i32(
                attribute.location,
                attribute.components,
                glow::INT,
                stride,
                attribute.offset as i32,
            ),
        }
    }
}
