//! The rendered scene: the loaded model lit by one point light, and a small cube marking the
//! light's position.

use std::sync::Arc;

use glam::{Mat4, Vec2, Vec3, Vec4};
use glow::HasContext;
use mview_core::{Mesh, Model, ModelVertex, ShaderProgram, ViewerConfig, ViewerState};

const LIGHT_MARKER_SCALE: f32 = 0.2;

/// Corners and triangles of a unit cube centred on the origin, wound counter-clockwise.
pub fn cube_geometry() -> (Vec<ModelVertex>, Vec<u32>) {
    let vertices = (0..8)
        .map(|i| {
            let corner = Vec3::new(
                if i & 1 == 0 { -0.5 } else { 0.5 },
                if i & 2 == 0 { -0.5 } else { 0.5 },
                if i & 4 == 0 { -0.5 } else { 0.5 },
            );
            ModelVertex::new(corner, corner.normalize(), Vec2::ZERO)
        })
        .collect();

    #[rustfmt::skip]
    let indices = vec![
        0, 2, 1, 1, 2, 3, // -z
        4, 5, 6, 5, 7, 6, // +z
        0, 4, 2, 2, 4, 6, // -x
        1, 3, 5, 3, 7, 5, // +x
        0, 1, 4, 1, 5, 4, // -y
        2, 6, 3, 3, 6, 7, // +y
    ];

    (vertices, indices)
}

pub struct Scene {
    model_shader: ShaderProgram,
    light_shader: ShaderProgram,
    model: Option<Model>,
    light_marker: Mesh,
    clear_color: Vec4,
    light_position: Vec3,
    light_color: Vec3,
    near_plane: f32,
    far_plane: f32,
}

impl Scene {
    /// Builds both shader programs, the model and the light marker.
    ///
    /// Shader problems are already logged by [`ShaderProgram::from_files`] and only make the
    /// output wrong. A model that fails to load is logged and the scene is drawn without it.
    pub fn new(gl: &Arc<glow::Context>, config: &ViewerConfig) -> Result<Self, mview_core::GpuError> {
        let model_shader =
            ShaderProgram::from_files(gl, &config.vertex_shader, &config.model_fragment_shader);
        let light_shader =
            ShaderProgram::from_files(gl, &config.vertex_shader, &config.light_fragment_shader);

        let model = match Model::load(gl, &config.model_path, config.flip_textures) {
            Ok(model) => Some(model),
            Err(e) => {
                log::error!("{e}");
                None
            }
        };

        let (vertices, indices) = cube_geometry();
        let light_marker = Mesh::new(gl, vertices, indices, Vec::new())?;

        Ok(Self {
            model_shader,
            light_shader,
            model,
            light_marker,
            clear_color: Vec4::from(config.clear_color),
            light_position: Vec3::from(config.light_position),
            light_color: Vec3::from(config.light_color),
            near_plane: config.near_plane,
            far_plane: config.far_plane,
        })
    }

    /// Clears the framebuffer and draws one frame from the camera in `state`.
    pub fn render(&self, gl: &glow::Context, state: &ViewerState) {
        unsafe {
            gl.clear_color(
                self.clear_color.x,
                self.clear_color.y,
                self.clear_color.z,
                self.clear_color.w,
            );
            gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
        }

        let camera = &state.camera;
        let projection = camera.projection(state.aspect_ratio(), self.near_plane, self.far_plane);
        let view = camera.view_matrix();

        self.model_shader.use_program();
        self.model_shader.set_uniform("projection", projection);
        self.model_shader.set_uniform("view", view);
        self.model_shader.set_uniform("model", Mat4::IDENTITY);
        self.model_shader.set_uniform("viewPos", camera.position);
        self.model_shader.set_uniform("lightPos", self.light_position);
        self.model_shader.set_uniform("lightColor", self.light_color);
        if let Some(model) = &self.model {
            model.draw(&self.model_shader);
        }

        self.light_shader.use_program();
        self.light_shader.set_uniform("projection", projection);
        self.light_shader.set_uniform("view", view);
        self.light_shader.set_uniform(
            "model",
            Mat4::from_translation(self.light_position) * Mat4::from_scale(Vec3::splat(LIGHT_MARKER_SCALE)),
        );
        self.light_shader.set_uniform("lightColor", self.light_color);
        self.light_marker.draw(&self.light_shader);
    }
}
