//! OpenGL Shaders
//!
//! This module defines the [`Shader`] and [`ShaderProgram`] structs for managing OpenGL shaders.
//! This module also provides the [`Uniform`] trait for setting uniform variables in shader
//! programs.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use glam::{Mat4, Vec3};

use crate::error::ShaderError;
use crate::gpu::Gpu;

/// The pipeline stage a shader is compiled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    fn gl_type(self) -> u32 {
        match self {
            ShaderStage::Vertex => glow::VERTEX_SHADER,
            ShaderStage::Fragment => glow::FRAGMENT_SHADER,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// Represents an individual OpenGL shader.
pub struct Shader<G: Gpu = glow::Context> {
    gl: Arc<G>,
    id: G::Shader,
    stage: ShaderStage,
}

impl<G: Gpu> Shader<G> {
    /// Compiles a new shader from the given source code.
    pub fn new(gl: &Arc<G>, stage: ShaderStage, source: &str) -> Result<Self, ShaderError> {
        let shader = gl.create_shader(stage.gl_type())?;
        gl.shader_source(shader, source);
        gl.compile_shader(shader);

        if !gl.shader_compile_status(shader) {
            let log = gl.shader_info_log(shader);
            gl.delete_shader(shader);
            return Err(ShaderError::Compile { stage, log });
        }

        Ok(Self {
            gl: Arc::clone(gl),
            id: shader,
            stage,
        })
    }

    pub fn stage(&self) -> ShaderStage {
        self.stage
    }
}

impl<G: Gpu> Drop for Shader<G> {
    fn drop(&mut self) {
        self.gl.delete_shader(self.id);
    }
}

/// Represents a uniform variable in a shader program.
pub trait Uniform {
    /// Writes the value to the given location of the active program.
    fn set_uniform<G: Gpu>(&self, gl: &G, location: &G::UniformLocation);
}

impl Uniform for bool {
    fn set_uniform<G: Gpu>(&self, gl: &G, location: &G::UniformLocation) {
        gl.uniform_1_i32(location, *self as i32);
    }
}

impl Uniform for i32 {
    fn set_uniform<G: Gpu>(&self, gl: &G, location: &G::UniformLocation) {
        gl.uniform_1_i32(location, *self);
    }
}

impl Uniform for f32 {
    fn set_uniform<G: Gpu>(&self, gl: &G, location: &G::UniformLocation) {
        gl.uniform_1_f32(location, *self);
    }
}

impl Uniform for Vec3 {
    fn set_uniform<G: Gpu>(&self, gl: &G, location: &G::UniformLocation) {
        gl.uniform_3_f32(location, self.x, self.y, self.z);
    }
}

impl Uniform for Mat4 {
    fn set_uniform<G: Gpu>(&self, gl: &G, location: &G::UniformLocation) {
        gl.uniform_matrix_4_f32(location, &self.to_cols_array());
    }
}

impl<T: Uniform> Uniform for &T {
    fn set_uniform<G: Gpu>(&self, gl: &G, location: &G::UniformLocation) {
        (*self).set_uniform(gl, location);
    }
}

/// Represents an OpenGL shader program composed of multiple shaders.
///
/// A program built with [`ShaderProgram::from_files`] may be invalid: it then has no handle,
/// keeps the errors that made it so, and ignores every uniform write.
pub struct ShaderProgram<G: Gpu = glow::Context> {
    gl: Arc<G>,
    id: Option<G::Program>,
    locations: RefCell<HashMap<String, Option<G::UniformLocation>>>,
    diagnostics: Vec<ShaderError>,
}

impl<G: Gpu> ShaderProgram<G> {
    /// Links a new shader program from the given shaders.
    pub fn new(gl: &Arc<G>, shaders: &[&Shader<G>]) -> Result<Self, ShaderError> {
        let program = gl.create_program()?;

        for shader in shaders {
            gl.attach_shader(program, shader.id);
        }

        gl.link_program(program);

        if !gl.program_link_status(program) {
            let log = gl.program_info_log(program);
            gl.delete_program(program);
            return Err(ShaderError::Link { log });
        }

        for shader in shaders {
            gl.detach_shader(program, shader.id);
        }

        Ok(Self {
            gl: Arc::clone(gl),
            id: Some(program),
            locations: RefCell::new(HashMap::new()),
            diagnostics: Vec::new(),
        })
    }

    /// Reads, compiles and links a vertex and a fragment shader from disk.
    ///
    /// Never fails. An unreadable file is compiled as empty source, and every read, compile or
    /// link error is logged and kept in [`ShaderProgram::diagnostics`].
    pub fn from_files(gl: &Arc<G>, vertex_path: &Path, fragment_path: &Path) -> Self {
        let mut diagnostics = Vec::new();
        let mut report = |error: ShaderError| {
            log::error!("{error}");
            diagnostics.push(error);
        };

        let vertex_source = read_source(vertex_path).unwrap_or_else(|e| {
            report(e);
            String::new()
        });
        let fragment_source = read_source(fragment_path).unwrap_or_else(|e| {
            report(e);
            String::new()
        });

        let vertex = Shader::new(gl, ShaderStage::Vertex, &vertex_source);
        let fragment = Shader::new(gl, ShaderStage::Fragment, &fragment_source);

        let program = match (vertex, fragment) {
            (Ok(vertex), Ok(fragment)) => match Self::new(gl, &[&vertex, &fragment]) {
                Ok(mut program) => {
                    log::info!(
                        "Linked shader program from {} and {}",
                        vertex_path.display(),
                        fragment_path.display()
                    );
                    program.diagnostics = diagnostics;
                    return program;
                }
                Err(e) => {
                    report(e);
                    None
                }
            },
            (vertex, fragment) => {
                for e in [vertex.err(), fragment.err()].into_iter().flatten() {
                    report(e);
                }
                None
            }
        };

        Self {
            gl: Arc::clone(gl),
            id: program,
            locations: RefCell::new(HashMap::new()),
            diagnostics,
        }
    }

    /// Binds the shader program for use. An invalid program unbinds whatever was bound.
    pub fn use_program(&self) {
        self.gl.use_program(self.id);
    }

    /// Sets a uniform variable in the shader program. Unknown names are ignored.
    pub fn set_uniform<T: Uniform>(&self, name: &str, value: T) {
        let Some(program) = self.id else {
            return;
        };

        let mut locations = self.locations.borrow_mut();
        let location = locations
            .entry(name.to_string())
            .or_insert_with(|| self.gl.uniform_location(program, name));
        if let Some(location) = location {
            value.set_uniform(&*self.gl, location);
        }
    }

    /// Whether linking produced a usable program.
    pub fn is_valid(&self) -> bool {
        self.id.is_some()
    }

    pub fn id(&self) -> Option<G::Program> {
        self.id
    }

    /// Errors collected while building the program. Empty for a clean build.
    pub fn diagnostics(&self) -> &[ShaderError] {
        &self.diagnostics
    }
}

impl<G: Gpu> Drop for ShaderProgram<G> {
    fn drop(&mut self) {
        if let Some(id) = self.id {
            self.gl.delete_program(id);
        }
    }
}

fn read_source(path: &Path) -> Result<String, ShaderError> {
    std::fs::read_to_string(path).map_err(|source| ShaderError::Read {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{GpuCall, PASSTHROUGH_FRAG, PASSTHROUGH_VERT, RecordingGpu, write_temp};

    #[test]
    fn passthrough_sources_link() {
        let gl = Arc::new(RecordingGpu::new());
        let vert = write_temp("passthrough.vert", PASSTHROUGH_VERT);
        let frag = write_temp("passthrough.frag", PASSTHROUGH_FRAG);

        let program = ShaderProgram::from_files(&gl, &vert, &frag);
        assert!(program.is_valid());
        assert!(program.id().is_some());
        assert!(program.diagnostics().is_empty());
    }

    #[test]
    fn invalid_source_leaves_program_invalid() {
        let gl = Arc::new(RecordingGpu::new());
        let vert = write_temp("invalid-case.vert", PASSTHROUGH_VERT);
        let frag = write_temp("invalid-case.frag", "#version 330 core\nthis is not glsl\n");

        let program = ShaderProgram::from_files(&gl, &vert, &frag);
        assert!(!program.is_valid());
        assert!(matches!(
            program.diagnostics(),
            [ShaderError::Compile {
                stage: ShaderStage::Fragment,
                ..
            }]
        ));
        assert_eq!(gl.count(|c| matches!(c, GpuCall::LinkProgram(_))), 0);
    }

    #[test]
    fn compile_error_carries_driver_log() {
        let gl = Arc::new(RecordingGpu::new());
        let Err(ShaderError::Compile { stage, log }) = Shader::new(&gl, ShaderStage::Vertex, "")
        else {
            panic!("empty source should not compile");
        };
        assert_eq!(stage, ShaderStage::Vertex);
        assert!(log.contains("main"));
        assert_eq!(gl.count(|c| matches!(c, GpuCall::DeleteShader(_))), 1);
    }

    #[test]
    fn missing_file_is_reported_not_fatal() {
        let gl = Arc::new(RecordingGpu::new());
        let vert = std::env::temp_dir().join("mview-does-not-exist.vert");
        let frag = write_temp("missing-case.frag", PASSTHROUGH_FRAG);

        let program = ShaderProgram::from_files(&gl, &vert, &frag);
        assert!(!program.is_valid());
        let diagnostics = program.diagnostics();
        assert!(matches!(&diagnostics[0], ShaderError::Read { path, .. } if *path == vert));
        assert!(matches!(
            &diagnostics[1],
            ShaderError::Compile {
                stage: ShaderStage::Vertex,
                ..
            }
        ));
    }

    #[test]
    fn invalid_program_ignores_uniforms() {
        let gl = Arc::new(RecordingGpu::new());
        let vert = std::env::temp_dir().join("mview-absent.vert");
        let frag = std::env::temp_dir().join("mview-absent.frag");

        let program = ShaderProgram::from_files(&gl, &vert, &frag);
        gl.clear();
        program.use_program();
        program.set_uniform("model", Mat4::IDENTITY);
        assert_eq!(gl.calls(), [GpuCall::UseProgram(None)]);
    }

    #[test]
    fn unknown_uniform_is_noop_and_lookups_are_cached() {
        let gl = Arc::new(RecordingGpu::new());
        let vert = write_temp("uniform-case.vert", PASSTHROUGH_VERT);
        let frag = write_temp("uniform-case.frag", PASSTHROUGH_FRAG);
        let program = ShaderProgram::from_files(&gl, &vert, &frag);
        gl.clear();

        program.set_uniform("no_such_uniform", 1.0f32);
        program.set_uniform("view", Mat4::IDENTITY);
        program.set_uniform("view", Mat4::IDENTITY);
        program.set_uniform("texture_diffuse1", 0);
        program.set_uniform("texture_diffuse2", true);

        assert_eq!(gl.count(|c| matches!(c, GpuCall::UniformF32(..))), 0);
        assert_eq!(
            gl.count(|c| *c == GpuCall::UniformLocation("view".to_string())),
            1
        );
        assert_eq!(gl.count(|c| matches!(c, GpuCall::UniformMat4(_))), 2);
        assert!(
            gl.calls()
                .contains(&GpuCall::UniformI32("texture_diffuse2".to_string(), 1))
        );
    }

    #[test]
    fn link_failure_is_an_error() {
        let gl = Arc::new(RecordingGpu::new());
        let result = ShaderProgram::new(&gl, &[]);
        assert!(matches!(result, Err(ShaderError::Link { .. })));
    }
}
