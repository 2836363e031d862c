use crate::error::{Error, Result};
use fxhash::FxHashMap;
use gl::types::{GLboolean, GLenum, GLint, GLsizei, GLuint};
use std::{
    cell::RefCell,
    ffi::{c_void, CString},
    fs,
    path::Path,
};
use strum::Display;

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
#[strum(serialize_all = "lowercase")]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    fn gl_enum(self) -> GLenum {
        match self {
            ShaderStage::Vertex => gl::VERTEX_SHADER,
            ShaderStage::Fragment => gl::FRAGMENT_SHADER,
        }
    }
}

/// A linked vertex + fragment program.
pub struct ShaderProgram {
    id: GLuint,
    uniforms: RefCell<FxHashMap<String, GLint>>,
}

impl ShaderProgram {
    pub fn new() -> Result<Self> {
        let id = unsafe { gl::CreateProgram() };
        if id != 0 {
            Ok(Self {
                id,
                uniforms: Default::default(),
            })
        } else {
            Err(Error::GlObjectAllocation("shader program"))
        }
    }

    /// Reads both stage sources, compiles them and links the program.
    ///
    /// Unreadable files, compile errors and link errors are all returned with
    /// the driver's info log attached.
    pub fn from_vert_frag_file(
        vert_path: impl AsRef<Path>,
        frag_path: impl AsRef<Path>,
    ) -> Result<Self> {
        let (vert_path, frag_path) = (vert_path.as_ref(), frag_path.as_ref());
        let vert = Shader::from_file(ShaderStage::Vertex, vert_path)?;
        let frag = Shader::from_file(ShaderStage::Fragment, frag_path)?;

        let program = Self::new()?;
        program.attach_shader(&vert);
        program.attach_shader(&frag);
        program.link();
        // Stages are flagged for deletion; the driver frees them once detached.
        drop(vert);
        drop(frag);

        if !program.link_success() {
            return Err(Error::ProgramLink {
                log: program.info_log(),
            });
        }

        log::info!(
            "linked program {} from {} + {}",
            program.id(),
            vert_path.display(),
            frag_path.display()
        );
        Ok(program)
    }

    pub fn id(&self) -> GLuint {
        self.id
    }

    pub fn attach_shader(&self, shader: &Shader) {
        unsafe { gl::AttachShader(self.id, shader.id()) };
    }

    pub fn link(&self) {
        unsafe { gl::LinkProgram(self.id) };
    }

    pub fn link_success(&self) -> bool {
        let mut success = 0;
        unsafe { gl::GetProgramiv(self.id, gl::LINK_STATUS, &mut success) };
        success == i32::from(gl::TRUE)
    }

    pub fn info_log(&self) -> String {
        let mut needed_len = 0;
        unsafe { gl::GetProgramiv(self.id, gl::INFO_LOG_LENGTH, &mut needed_len) };
        let mut v: Vec<u8> = Vec::with_capacity(needed_len.max(0) as usize);
        let mut len_written = 0_i32;
        unsafe {
            gl::GetProgramInfoLog(
                self.id,
                v.capacity() as GLsizei,
                &mut len_written,
                v.as_mut_ptr().cast(),
            );
            v.set_len(len_written.max(0) as usize);
        }
        String::from_utf8_lossy(&v).into_owned()
    }

    /// Makes this the program used by subsequent draw calls.
    pub fn use_(&self) {
        unsafe { gl::UseProgram(self.id) };
    }

    /// Location of an active uniform, cached per name. Inactive names resolve
    /// to -1, which GL ignores on upload.
    pub fn get_uniform(&self, name: &str) -> GLint {
        if let Some(location) = self.uniforms.borrow().get(name) {
            return *location;
        }

        let location = match CString::new(name) {
            Ok(c_name) => unsafe { gl::GetUniformLocation(self.id, c_name.as_ptr()) },
            Err(_) => -1,
        };
        if location == -1 {
            log::warn!("program {} has no active uniform `{name}`", self.id);
        }
        self.uniforms.borrow_mut().insert(name.to_string(), location);
        location
    }

    pub fn set_int(&self, name: &str, value: i32) {
        unsafe { gl::Uniform1i(self.get_uniform(name), value) };
    }

    pub fn set_float(&self, name: &str, value: f32) {
        unsafe { gl::Uniform1f(self.get_uniform(name), value) };
    }

    pub fn set_vec3(&self, name: &str, value: &glm::Vec3) {
        unsafe { gl::Uniform3f(self.get_uniform(name), value.x, value.y, value.z) };
    }

    pub fn set_mat4(&self, name: &str, value: &glm::Mat4) {
        unsafe {
            gl::UniformMatrix4fv(
                self.get_uniform(name),
                1,
                gl::FALSE,
                glm::value_ptr(value).as_ptr(),
            )
        };
    }
}

impl Drop for ShaderProgram {
    fn drop(&mut self) {
        unsafe { gl::DeleteProgram(self.id) };
    }
}

pub struct Shader {
    id: GLuint,
}

impl Shader {
    pub fn new(stage: ShaderStage) -> Result<Self> {
        let id = unsafe { gl::CreateShader(stage.gl_enum()) };
        if id != 0 {
            Ok(Self { id })
        } else {
            Err(Error::GlObjectAllocation("shader"))
        }
    }

    pub fn id(&self) -> GLuint {
        self.id
    }

    pub fn set_source(&self, src: &str) {
        unsafe {
            gl::ShaderSource(
                self.id,
                1,
                &(src.as_bytes().as_ptr().cast()),
                &(src.len() as GLint),
            );
        }
    }

    pub fn compile(&self) {
        unsafe { gl::CompileShader(self.id) };
    }

    pub fn compile_success(&self) -> bool {
        let mut compiled = 0;
        unsafe { gl::GetShaderiv(self.id, gl::COMPILE_STATUS, &mut compiled) };
        compiled == i32::from(gl::TRUE)
    }

    pub fn info_log(&self) -> String {
        let mut needed_len = 0;
        unsafe { gl::GetShaderiv(self.id, gl::INFO_LOG_LENGTH, &mut needed_len) };
        let mut v: Vec<u8> = Vec::with_capacity(needed_len.max(0) as usize);
        let mut len_written = 0_i32;
        unsafe {
            gl::GetShaderInfoLog(
                self.id,
                v.capacity() as GLsizei,
                &mut len_written,
                v.as_mut_ptr().cast(),
            );
            v.set_len(len_written.max(0) as usize);
        }
        String::from_utf8_lossy(&v).into_owned()
    }

    pub fn from_file(stage: ShaderStage, path: &Path) -> Result<Self> {
        let source = read_source(path)?;
        let shader = Self::new(stage)?;
        shader.set_source(&source);
        shader.compile();
        if shader.compile_success() {
            log::debug!("compiled {stage} shader {}", path.display());
            Ok(shader)
        } else {
            Err(Error::ShaderCompile {
                stage,
                path: path.to_path_buf(),
                log: shader.info_log(),
            })
        }
    }
}

impl Drop for Shader {
    fn drop(&mut self) {
        unsafe { gl::DeleteShader(self.id) };
    }
}

fn read_source(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })
}

pub struct VertexArrayObject {
    id: GLuint,
}

impl VertexArrayObject {
    pub fn new() -> Result<Self> {
        let mut id = 0;
        unsafe { gl::GenVertexArrays(1, &mut id) };
        if id != 0 {
            Ok(Self { id })
        } else {
            Err(Error::GlObjectAllocation("vertex array"))
        }
    }

    pub fn bind(&self) {
        unsafe { gl::BindVertexArray(self.id) }
    }

    pub fn unbind() {
        unsafe { gl::BindVertexArray(0) }
    }
}

impl Drop for VertexArrayObject {
    fn drop(&mut self) {
        unsafe { gl::DeleteVertexArrays(1, &self.id) };
    }
}

pub struct BufferObject {
    id: GLuint,
    target: GLenum,
}

impl BufferObject {
    pub fn new(target: GLenum) -> Result<Self> {
        let mut id = 0;
        unsafe { gl::GenBuffers(1, &mut id) };
        if id != 0 {
            Ok(Self { id, target })
        } else {
            Err(Error::GlObjectAllocation("buffer"))
        }
    }

    pub fn bind(&self) {
        unsafe { gl::BindBuffer(self.target, self.id) }
    }

    pub fn buffer_data<T>(&self, data: &[T], usage: GLenum) {
        unsafe {
            gl::BufferData(
                self.target,
                std::mem::size_of_val(data) as isize,
                data.as_ptr().cast(),
                usage,
            );
        }
    }
}

impl Drop for BufferObject {
    fn drop(&mut self) {
        unsafe { gl::DeleteBuffers(1, &self.id) }
    }
}

pub fn configure_attribute(
    index: GLuint,
    size: GLint,
    type_: GLenum,
    normalized: GLboolean,
    stride: usize,
    pointer: *const c_void,
) {
    unsafe {
        gl::VertexAttribPointer(index, size, type_, normalized, stride as GLsizei, pointer);
    }
}

pub fn enable_attribute(index: GLuint) {
    unsafe {
        gl::EnableVertexAttribArray(index);
    }
}

pub fn clear(color: (f32, f32, f32, f32), mask: GLenum) {
    unsafe {
        gl::ClearColor(color.0, color.1, color.2, color.3);
        gl::Clear(mask);
    }
}

pub fn viewport(size: (i32, i32)) {
    unsafe { gl::Viewport(0, 0, size.0, size.1) }
}

pub fn depth_func(func: GLenum) {
    unsafe { gl::DepthFunc(func) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn stage_names_read_naturally_in_errors() {
        assert_eq!(ShaderStage::Vertex.to_string(), "vertex");
        assert_eq!(ShaderStage::Fragment.to_string(), "fragment");
    }

    #[test]
    fn missing_source_is_an_io_error_naming_the_file() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("missing.vert");

        match read_source(&path) {
            Err(Error::Io { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("expected an io error, got {other:?}"),
        }
    }

    #[test]
    fn source_is_read_verbatim() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("flat.frag");
        let glsl = "#version 330 core\nout vec4 color;\nvoid main() { color = vec4(1.0); }\n";
        fs::write(&path, glsl).unwrap();

        assert_eq!(read_source(&path).unwrap(), glsl);
    }
}
