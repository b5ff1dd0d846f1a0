//! A [`Gpu`] that records calls instead of talking to a driver.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::GpuError;
use crate::gpu::Gpu;

#[derive(Debug, Clone, PartialEq)]
pub enum GpuCall {
    CreateVertexArray(u32),
    BindVertexArray(Option<u32>),
    DeleteVertexArray(u32),
    CreateBuffer(u32),
    BindBuffer(u32, Option<u32>),
    BufferData { target: u32, len: usize, usage: u32 },
    DeleteBuffer(u32),
    EnableVertexAttribArray(u32),
    AttribPointerF32 { index: u32, size: i32, stride: i32, offset: i32 },
    AttribPointerI32 { index: u32, size: i32, stride: i32, offset: i32 },
    CreateTexture(u32),
    ActiveTexture(u32),
    BindTexture(Option<u32>),
    TexImage { width: u32, height: u32 },
    GenerateMipmap,
    TexParameter(u32, i32),
    DeleteTexture(u32),
    CreateShader(u32),
    CompileShader(u32),
    DeleteShader(u32),
    CreateProgram(u32),
    LinkProgram(u32),
    UseProgram(Option<u32>),
    DeleteProgram(u32),
    UniformLocation(String),
    UniformI32(String, i32),
    UniformF32(String, f32),
    Uniform3F32(String, [f32; 3]),
    UniformMat4(String),
    DrawElements { mode: u32, count: i32, index_type: u32 },
}

#[derive(Default)]
struct Inner {
    next_handle: u32,
    calls: Vec<GpuCall>,
    sources: HashMap<u32, String>,
    compiled: HashMap<u32, bool>,
    attached: HashMap<u32, Vec<u32>>,
    linked: HashMap<u32, Vec<String>>,
    buffers_left: Option<usize>,
}

/// Records every call; handles are sequential integers starting at 1.
///
/// A shader compiles when its source contains `void main`. A program links when every
/// attached shader compiled. The uniforms a linked program exposes are the names declared
/// with `uniform` in its sources.
#[derive(Default)]
pub struct RecordingGpu {
    inner: Mutex<Inner>,
}

impl RecordingGpu {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<GpuCall> {
        self.inner.lock().unwrap().calls.clone()
    }

    pub fn clear(&self) {
        self.inner.lock().unwrap().calls.clear();
    }

    /// Makes `create_buffer` fail once `n` more buffers have been created.
    pub fn limit_buffers(&self, n: usize) {
        self.inner.lock().unwrap().buffers_left = Some(n);
    }

    pub fn count(&self, predicate: impl Fn(&GpuCall) -> bool) -> usize {
        self.inner.lock().unwrap().calls.iter().filter(|c| predicate(c)).count()
    }

    fn record(&self, call: GpuCall) {
        self.inner.lock().unwrap().calls.push(call);
    }

    fn handle(&self) -> u32 {
        let mut inner = self.inner.lock().unwrap();
        inner.next_handle += 1;
        inner.next_handle
    }
}

fn declared_uniforms(source: &str) -> Vec<String> {
    source
        .lines()
        .filter_map(|line| {
            let line = line.trim();
            line.strip_prefix("uniform ")?;
            line.trim_end_matches(';').split_whitespace().last().map(str::to_string)
        })
        .collect()
}

impl Gpu for RecordingGpu {
    type VertexArray = u32;
    type Buffer = u32;
    type Texture = u32;
    type Shader = u32;
    type Program = u32;
    type UniformLocation = String;

    fn create_vertex_array(&self) -> Result<u32, GpuError> {
        let id = self.handle();
        self.record(GpuCall::CreateVertexArray(id));
        Ok(id)
    }

    fn bind_vertex_array(&self, vao: Option<u32>) {
        self.record(GpuCall::BindVertexArray(vao));
    }

    fn delete_vertex_array(&self, vao: u32) {
        self.record(GpuCall::DeleteVertexArray(vao));
    }

    fn create_buffer(&self) -> Result<u32, GpuError> {
        if let Some(left) = self.inner.lock().unwrap().buffers_left.as_mut() {
            if *left == 0 {
                return Err(GpuError("out of buffer names".to_string()));
            }
            *left -= 1;
        }
        let id = self.handle();
        self.record(GpuCall::CreateBuffer(id));
        Ok(id)
    }

    fn bind_buffer(&self, target: u32, buffer: Option<u32>) {
        self.record(GpuCall::BindBuffer(target, buffer));
    }

    fn buffer_data(&self, target: u32, data: &[u8], usage: u32) {
        self.record(GpuCall::BufferData { target, len: data.len(), usage });
    }

    fn delete_buffer(&self, buffer: u32) {
        self.record(GpuCall::DeleteBuffer(buffer));
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        self.record(GpuCall::EnableVertexAttribArray(index));
    }

    fn vertex_attrib_pointer_f32(&self, index: u32, size: i32, _data_type: u32, stride: i32, offset: i32) {
        self.record(GpuCall::AttribPointerF32 { index, size, stride, offset });
    }

    fn vertex_attrib_pointer_i32(&self, index: u32, size: i32, _data_type: u32, stride: i32, offset: i32) {
        self.record(GpuCall::AttribPointerI32 { index, size, stride, offset });
    }

    fn create_texture(&self) -> Result<u32, GpuError> {
        let id = self.handle();
        self.record(GpuCall::CreateTexture(id));
        Ok(id)
    }

    fn active_texture(&self, unit: u32) {
        self.record(GpuCall::ActiveTexture(unit));
    }

    fn bind_texture_2d(&self, texture: Option<u32>) {
        self.record(GpuCall::BindTexture(texture));
    }

    fn tex_image_2d_rgba8(&self, width: u32, height: u32, _pixels: &[u8]) {
        self.record(GpuCall::TexImage { width, height });
    }

    fn generate_mipmap_2d(&self) {
        self.record(GpuCall::GenerateMipmap);
    }

    fn tex_parameter_2d(&self, parameter: u32, value: i32) {
        self.record(GpuCall::TexParameter(parameter, value));
    }

    fn delete_texture(&self, texture: u32) {
        self.record(GpuCall::DeleteTexture(texture));
    }

    fn create_shader(&self, _shader_type: u32) -> Result<u32, GpuError> {
        let id = self.handle();
        self.record(GpuCall::CreateShader(id));
        Ok(id)
    }

    fn shader_source(&self, shader: u32, source: &str) {
        self.inner.lock().unwrap().sources.insert(shader, source.to_string());
    }

    fn compile_shader(&self, shader: u32) {
        let mut inner = self.inner.lock().unwrap();
        let ok = inner.sources.get(&shader).is_some_and(|s| s.contains("void main"));
        inner.compiled.insert(shader, ok);
        inner.calls.push(GpuCall::CompileShader(shader));
    }

    fn shader_compile_status(&self, shader: u32) -> bool {
        self.inner.lock().unwrap().compiled.get(&shader).copied().unwrap_or(false)
    }

    fn shader_info_log(&self, shader: u32) -> String {
        if self.shader_compile_status(shader) {
            String::new()
        } else {
            "0:1(1): error: no function with name 'main'".to_string()
        }
    }

    fn delete_shader(&self, shader: u32) {
        self.record(GpuCall::DeleteShader(shader));
    }

    fn create_program(&self) -> Result<u32, GpuError> {
        let id = self.handle();
        self.record(GpuCall::CreateProgram(id));
        Ok(id)
    }

    fn attach_shader(&self, program: u32, shader: u32) {
        self.inner.lock().unwrap().attached.entry(program).or_default().push(shader);
    }

    fn detach_shader(&self, program: u32, shader: u32) {
        if let Some(shaders) = self.inner.lock().unwrap().attached.get_mut(&program) {
            shaders.retain(|s| *s != shader);
        }
    }

    fn link_program(&self, program: u32) {
        let mut inner = self.inner.lock().unwrap();
        let shaders = inner.attached.get(&program).cloned().unwrap_or_default();
        let ok = !shaders.is_empty()
            && shaders.iter().all(|s| inner.compiled.get(s).copied().unwrap_or(false));
        if ok {
            let uniforms = shaders
                .iter()
                .filter_map(|s| inner.sources.get(s))
                .flat_map(|s| declared_uniforms(s))
                .collect();
            inner.linked.insert(program, uniforms);
        }
        inner.calls.push(GpuCall::LinkProgram(program));
    }

    fn program_link_status(&self, program: u32) -> bool {
        self.inner.lock().unwrap().linked.contains_key(&program)
    }

    fn program_info_log(&self, program: u32) -> String {
        if self.program_link_status(program) {
            String::new()
        } else {
            "error: linking with uncompiled shader".to_string()
        }
    }

    fn use_program(&self, program: Option<u32>) {
        self.record(GpuCall::UseProgram(program));
    }

    fn delete_program(&self, program: u32) {
        self.record(GpuCall::DeleteProgram(program));
    }

    fn uniform_location(&self, program: u32, name: &str) -> Option<String> {
        self.record(GpuCall::UniformLocation(name.to_string()));
        let inner = self.inner.lock().unwrap();
        inner
            .linked
            .get(&program)
            .filter(|uniforms| uniforms.iter().any(|u| u == name))
            .map(|_| name.to_string())
    }

    fn uniform_1_i32(&self, location: &String, value: i32) {
        self.record(GpuCall::UniformI32(location.clone(), value));
    }

    fn uniform_1_f32(&self, location: &String, value: f32) {
        self.record(GpuCall::UniformF32(location.clone(), value));
    }

    fn uniform_3_f32(&self, location: &String, x: f32, y: f32, z: f32) {
        self.record(GpuCall::Uniform3F32(location.clone(), [x, y, z]));
    }

    fn uniform_matrix_4_f32(&self, location: &String, _columns: &[f32; 16]) {
        self.record(GpuCall::UniformMat4(location.clone()));
    }

    fn draw_elements(&self, mode: u32, count: i32, index_type: u32, _offset: i32) {
        self.record(GpuCall::DrawElements { mode, count, index_type });
    }
}

/// Minimal sources the recording GPU accepts.
pub const PASSTHROUGH_VERT: &str = "#version 330 core
layout (location = 0) in vec3 aPos;
uniform mat4 model;
uniform mat4 view;
uniform mat4 projection;
void main() { gl_Position = projection * view * model * vec4(aPos, 1.0); }
";

pub const PASSTHROUGH_FRAG: &str = "#version 330 core
out vec4 FragColor;
uniform sampler2D texture_diffuse1;
uniform sampler2D texture_diffuse2;
uniform sampler2D texture_specular1;
void main() { FragColor = texture(texture_diffuse1, vec2(0.0)); }
";

/// Writes `contents` to a per-process file in the temp directory and returns its path.
pub fn write_temp(name: &str, contents: &str) -> std::path::PathBuf {
    let path = std::env::temp_dir().join(format!("mview-{}-{name}", std::process::id()));
    std::fs::write(&path, contents).unwrap();
    path
}
