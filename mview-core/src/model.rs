//! Loading Wavefront OBJ models into GPU meshes.
//!
//! Parsing is done by the `obj` crate. [`import_obj`] turns the parsed data into plain
//! [`MeshData`] (triangulated, deduplicated, with tangents), and [`Model::load`] uploads it,
//! sharing textures between meshes through a [`TextureCache`].

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use glam::{Vec2, Vec3};

use crate::error::ModelError;
use crate::gpu::Gpu;
use crate::mesh::{Mesh, MeshTexture};
use crate::shader::ShaderProgram;
use crate::texture::{TextureCache, TextureKind};
use crate::vertex::ModelVertex;

/// Geometry and texture references of one mesh, before upload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub name: String,
    pub vertices: Vec<ModelVertex>,
    pub indices: Vec<u32>,
    pub textures: Vec<(TextureKind, PathBuf)>,
}

/// The texture maps of a material that the viewer understands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MaterialMaps<'a> {
    pub diffuse: Option<&'a str>,
    pub specular: Option<&'a str>,
    pub normal: Option<&'a str>,
    pub height: Option<&'a str>,
}

impl<'a> MaterialMaps<'a> {
    /// `map_Kd`, `map_Ks`, `map_Bump` and `map_Ka` become diffuse, specular, normal and
    /// height maps.
    pub fn from_material(material: &'a obj::Material) -> Self {
        Self {
            diffuse: material.map_kd.as_deref(),
            specular: material.map_ks.as_deref(),
            normal: material.map_bump.as_deref(),
            height: material.map_ka.as_deref(),
        }
    }

    /// Texture files in diffuse, specular, normal, height order, relative to `base_dir`.
    pub fn texture_paths(&self, base_dir: &Path) -> Vec<(TextureKind, PathBuf)> {
        let maps = [self.diffuse, self.specular, self.normal, self.height];
        TextureKind::ALL
            .into_iter()
            .zip(maps)
            .filter_map(|(kind, file)| {
                let file = file?.trim();
                (!file.is_empty()).then(|| (kind, base_dir.join(file.replace('\\', "/"))))
            })
            .collect()
    }
}

/// Converts parsed OBJ data into one [`MeshData`] per non-empty group.
///
/// Polygons are split into triangle fans. Corners sharing the same position, texture
/// coordinate and normal indices share a vertex.
pub fn import_obj(data: &obj::ObjData, base_dir: &Path) -> Vec<MeshData> {
    let mut meshes = Vec::new();

    for object in &data.objects {
        for group in &object.groups {
            if group.polys.is_empty() {
                continue;
            }

            let textures = match &group.material {
                Some(obj::ObjMaterial::Mtl(material)) => {
                    MaterialMaps::from_material(material).texture_paths(base_dir)
                }
                Some(obj::ObjMaterial::Ref(name)) => {
                    log::warn!("Material {name} was referenced but never loaded");
                    Vec::new()
                }
                None => Vec::new(),
            };

            let mut vertices = Vec::new();
            let mut indices = Vec::new();
            let mut seen: HashMap<(usize, Option<usize>, Option<usize>), u32> = HashMap::new();

            for obj::SimplePolygon(corners) in &group.polys {
                if corners.len() < 3 {
                    continue;
                }
                for i in 1..corners.len() - 1 {
                    for corner in [&corners[0], &corners[i], &corners[i + 1]] {
                        let key = (corner.0, corner.1, corner.2);
                        let index = *seen.entry(key).or_insert_with(|| {
                            vertices.push(corner_vertex(data, key));
                            (vertices.len() - 1) as u32
                        });
                        indices.push(index);
                    }
                }
            }

            compute_tangents(&mut vertices, &indices);

            meshes.push(MeshData {
                name: format!("{}/{}", object.name, group.name),
                vertices,
                indices,
                textures,
            });
        }
    }

    meshes
}

fn corner_vertex(
    data: &obj::ObjData,
    (position, tex_coords, normal): (usize, Option<usize>, Option<usize>),
) -> ModelVertex {
    let position = data.position.get(position).copied().unwrap_or_default();
    let tex_coords = tex_coords
        .and_then(|i| data.texture.get(i).copied())
        .unwrap_or_default();
    let normal = normal
        .and_then(|i| data.normal.get(i).copied())
        .unwrap_or_default();
    ModelVertex::new(
        Vec3::from(position),
        Vec3::from(normal),
        Vec2::from(tex_coords),
    )
}

/// Fills in per-vertex tangents and bitangents from the texture coordinate gradients of the
/// triangles touching each vertex. Triangles with degenerate UVs contribute nothing.
pub fn compute_tangents(vertices: &mut [ModelVertex], indices: &[u32]) {
    for triangle in indices.chunks_exact(3) {
        let [a, b, c] = [triangle[0], triangle[1], triangle[2]].map(|i| i as usize);
        if a >= vertices.len() || b >= vertices.len() || c >= vertices.len() {
            continue;
        }

        let edge1 = vertices[b].position - vertices[a].position;
        let edge2 = vertices[c].position - vertices[a].position;
        let duv1 = vertices[b].tex_coords - vertices[a].tex_coords;
        let duv2 = vertices[c].tex_coords - vertices[a].tex_coords;

        let det = duv1.x * duv2.y - duv2.x * duv1.y;
        if det.abs() < f32::EPSILON {
            continue;
        }
        let r = 1.0 / det;
        let tangent = (edge1 * duv2.y - edge2 * duv1.y) * r;
        let bitangent = (edge2 * duv1.x - edge1 * duv2.x) * r;

        for i in [a, b, c] {
            vertices[i].tangent += tangent;
            vertices[i].bitangent += bitangent;
        }
    }

    for vertex in vertices {
        vertex.tangent = vertex.tangent.normalize_or_zero();
        vertex.bitangent = vertex.bitangent.normalize_or_zero();
    }
}

/// A set of meshes loaded from one model file.
pub struct Model<G: Gpu = glow::Context> {
    meshes: Vec<Mesh<G>>,
}

impl<G: Gpu> Model<G> {
    /// Loads an OBJ file and its material libraries, then uploads every mesh. Texture paths
    /// are resolved relative to the model file.
    pub fn load(gl: &Arc<G>, path: &Path, flip_textures: bool) -> Result<Self, ModelError> {
        let mut parsed = obj::Obj::load(path).map_err(|e| ModelError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        if let Err(e) = parsed.load_mtls() {
            log::warn!("Failed to load materials for {}: {:?}", path.display(), e);
        }

        let directory = path.parent().map(Path::to_path_buf).unwrap_or_default();
        let meshes = import_obj(&parsed.data, &directory);

        let mut cache = TextureCache::new(gl, flip_textures);
        let model = Self::from_mesh_data(gl, meshes, &mut cache)?;
        log::info!(
            "Loaded {} with {} meshes and {} textures",
            path.display(),
            model.meshes.len(),
            cache.len()
        );
        Ok(model)
    }

    /// Uploads already imported meshes, loading their textures through `cache`.
    pub fn from_mesh_data(
        gl: &Arc<G>,
        meshes: Vec<MeshData>,
        cache: &mut TextureCache<G>,
    ) -> Result<Self, ModelError> {
        let meshes = meshes
            .into_iter()
            .map(|data| {
                let textures = data
                    .textures
                    .iter()
                    .map(|(kind, path)| {
                        Ok(MeshTexture {
                            kind: *kind,
                            texture: cache.get_or_load(path)?,
                        })
                    })
                    .collect::<Result<Vec<_>, ModelError>>()?;
                Ok(Mesh::new(gl, data.vertices, data.indices, textures)?)
            })
            .collect::<Result<Vec<_>, ModelError>>()?;

        Ok(Self { meshes })
    }

    /// Draws every mesh with the given program.
    pub fn draw(&self, program: &ShaderProgram<G>) {
        for mesh in &self.meshes {
            mesh.draw(program);
        }
    }

    pub fn meshes(&self) -> &[Mesh<G>] {
        &self.meshes
    }
}
