use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::rc::Rc;

use super::driver::{GlDriver, ProgramId, ShaderId, ShaderStage, UniformLocation, NULL_ID};
use super::error::ShaderError;

/// Linked vertex + fragment program with a per-name uniform location cache.
///
/// Not `Clone`: a program id has exactly one owner, which deletes it on drop.
pub struct ShaderProgram {
    gl: Rc<dyn GlDriver>,
    id: ProgramId,
    label: String,
    uniforms: HashMap<String, UniformLocation>,
}

impl ShaderProgram {
    /// Compiles one stage.
    ///
    /// A compile failure is logged and the stage id is still returned; the
    /// following link reports the failure.
    pub fn compile_stage(
        gl: &dyn GlDriver,
        stage: ShaderStage,
        source: &str,
        label: &str,
    ) -> Result<ShaderId, ShaderError> {
        let id = gl.create_shader(stage).map_err(|reason| ShaderError::Create {
            object: "shader stage",
            label: label.to_string(),
            reason,
        })?;

        gl.shader_source(id, source);
        if !gl.compile_shader(id) {
            let info = gl.shader_info_log(id);
            log::error!(target: "shader", "failed to compile {stage} shader: {label}");
            log::error!(target: "opengl", "{}", info.trim_end());
        }
        Ok(id)
    }

    /// Links two compiled stages into a program.
    ///
    /// Both stage objects are deleted whatever the outcome.
    pub fn link(
        gl: Rc<dyn GlDriver>,
        vertex: ShaderId,
        fragment: ShaderId,
        label: impl Into<String>,
    ) -> Result<Self, ShaderError> {
        let label = label.into();
        let program = match gl.create_program() {
            Ok(id) => id,
            Err(reason) => {
                gl.delete_shader(vertex);
                gl.delete_shader(fragment);
                return Err(ShaderError::Create {
                    object: "program",
                    label,
                    reason,
                });
            }
        };

        gl.attach_shader(program, vertex);
        gl.attach_shader(program, fragment);
        let linked = gl.link_program(program);

        gl.delete_shader(vertex);
        gl.delete_shader(fragment);

        if !linked {
            let log = gl.program_info_log(program).trim_end().to_string();
            log::error!(target: "shader", "failed to link shader program: {label}");
            log::error!(target: "opengl", "{log}");
            gl.delete_program(program);
            return Err(ShaderError::Link { label, log });
        }

        log::debug!(target: "shader", "shader program created with id = {program}");
        Ok(Self {
            gl,
            id: program,
            label,
            uniforms: HashMap::new(),
        })
    }

    /// Compiles both stages from in-memory sources and links them.
    pub fn from_sources(
        gl: Rc<dyn GlDriver>,
        vertex_src: &str,
        fragment_src: &str,
        label: impl Into<String>,
    ) -> Result<Self, ShaderError> {
        let label = label.into();
        log::debug!(target: "shader", "compiling vertex shader: {label}");
        let vertex = Self::compile_stage(gl.as_ref(), ShaderStage::Vertex, vertex_src, &label)?;
        log::debug!(target: "shader", "compiling fragment shader: {label}");
        let fragment =
            match Self::compile_stage(gl.as_ref(), ShaderStage::Fragment, fragment_src, &label) {
                Ok(id) => id,
                Err(e) => {
                    gl.delete_shader(vertex);
                    return Err(e);
                }
            };
        Self::link(gl, vertex, fragment, label)
    }

    /// Reads both stage sources from disk, then behaves like
    /// [`ShaderProgram::from_sources`]. Empty files are warned about but still
    /// compiled.
    pub fn load(
        gl: Rc<dyn GlDriver>,
        vertex_path: impl AsRef<Path>,
        fragment_path: impl AsRef<Path>,
    ) -> Result<Self, ShaderError> {
        let (vertex_path, fragment_path) = (vertex_path.as_ref(), fragment_path.as_ref());
        let vertex_src = read_source(vertex_path)?;
        let fragment_src = read_source(fragment_path)?;

        if fragment_src.is_empty() {
            log::warn!(target: "shader", "fragment shader is empty: {}", fragment_path.display());
        }
        if vertex_src.is_empty() {
            log::warn!(target: "shader", "vertex shader is empty: {}", vertex_path.display());
        }

        let label = format!("{} + {}", vertex_path.display(), fragment_path.display());
        Self::from_sources(gl, &vertex_src, &fragment_src, label)
    }

    pub fn id(&self) -> ProgramId {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn bind(&self) {
        self.gl.use_program(self.id);
    }

    pub fn unbind(&self) {
        self.gl.use_program(NULL_ID);
    }

    /// Cached uniform lookup. The driver is queried at most once per name;
    /// misses are cached as `-1` and warned about on the first query only.
    pub fn uniform_location(&mut self, name: &str) -> UniformLocation {
        if let Some(&loc) = self.uniforms.get(name) {
            return loc;
        }

        let loc = self.gl.uniform_location(self.id, name);
        if loc < 0 {
            log::warn!(target: "shader", "uniform was not found: {name}");
        }
        self.uniforms.insert(name.to_string(), loc);
        loc
    }

    pub fn set_float(&mut self, name: &str, value: f32) {
        if let Some(loc) = self.prepare(name) {
            self.gl.uniform_1_f32(loc, value);
        }
    }

    pub fn set_int(&mut self, name: &str, value: i32) {
        if let Some(loc) = self.prepare(name) {
            self.gl.uniform_1_i32(loc, value);
        }
    }

    pub fn set_vec3(&mut self, name: &str, value: [f32; 3]) {
        if let Some(loc) = self.prepare(name) {
            self.gl.uniform_3_f32(loc, value);
        }
    }

    pub fn set_vec4(&mut self, name: &str, value: [f32; 4]) {
        if let Some(loc) = self.prepare(name) {
            self.gl.uniform_4_f32(loc, value);
        }
    }

    /// Column-major 3x3 matrix.
    pub fn set_mat3(&mut self, name: &str, value: &[[f32; 3]; 3]) {
        if let Some(loc) = self.prepare(name) {
            let flat: &[f32; 9] = bytemuck::cast_ref(value);
            self.gl.uniform_matrix_3_f32(loc, flat);
        }
    }

    /// Column-major 4x4 matrix.
    pub fn set_mat4(&mut self, name: &str, value: &[[f32; 4]; 4]) {
        if let Some(loc) = self.prepare(name) {
            let flat: &[f32; 16] = bytemuck::cast_ref(value);
            self.gl.uniform_matrix_4_f32(loc, flat);
        }
    }

    fn prepare(&mut self, name: &str) -> Option<UniformLocation> {
        let loc = self.uniform_location(name);
        if loc < 0 {
            return None;
        }
        self.bind();
        Some(loc)
    }
}

impl Drop for ShaderProgram {
    fn drop(&mut self) {
        if self.id != NULL_ID {
            self.gl.delete_program(self.id);
        }
    }
}

impl std::fmt::Debug for ShaderProgram {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShaderProgram")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("cached_uniforms", &self.uniforms.len())
            .finish()
    }
}

fn read_source(path: &Path) -> Result<String, ShaderError> {
    fs::read_to_string(path).map_err(|source| ShaderError::Io {
        path: path.to_path_buf(),
        source,
    })
}
