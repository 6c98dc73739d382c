use std::fmt;

pub type ShaderId = u32;
pub type ProgramId = u32;
pub type BufferId = u32;
pub type VertexArrayId = u32;

/// Signed uniform location; [`UNIFORM_NOT_FOUND`] means the program has no
/// such active uniform.
pub type UniformLocation = i32;

/// Id value of "no object".
pub const NULL_ID: u32 = 0;
pub const UNIFORM_NOT_FOUND: UniformLocation = -1;

/// Programmable pipeline stage.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
    Geometry,
}

impl ShaderStage {
    pub fn gl_enum(self) -> u32 {
        match self {
            ShaderStage::Vertex => glow::VERTEX_SHADER,
            ShaderStage::Fragment => glow::FRAGMENT_SHADER,
            ShaderStage::Geometry => glow::GEOMETRY_SHADER,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
            ShaderStage::Geometry => "geometry",
        })
    }
}

/// The subset of OpenGL the engine issues.
///
/// Object ids are plain integers with `0` as null; enum arguments are raw GL
/// values (`glow::TRIANGLES`, `glow::CULL_FACE`, ...). Every call must happen
/// on the thread owning the current context.
pub trait GlDriver {
    // shaders and programs
    fn create_shader(&self, stage: ShaderStage) -> Result<ShaderId, String>;
    fn shader_source(&self, shader: ShaderId, source: &str);
    /// Compiles and returns the compile status.
    fn compile_shader(&self, shader: ShaderId) -> bool;
    fn shader_info_log(&self, shader: ShaderId) -> String;
    fn delete_shader(&self, shader: ShaderId);

    fn create_program(&self) -> Result<ProgramId, String>;
    fn attach_shader(&self, program: ProgramId, shader: ShaderId);
    /// Links and returns the link status.
    fn link_program(&self, program: ProgramId) -> bool;
    fn program_info_log(&self, program: ProgramId) -> String;
    fn delete_program(&self, program: ProgramId);
    /// `NULL_ID` unbinds.
    fn use_program(&self, program: ProgramId);

    fn uniform_location(&self, program: ProgramId, name: &str) -> UniformLocation;
    fn uniform_1_f32(&self, location: UniformLocation, x: f32);
    fn uniform_1_i32(&self, location: UniformLocation, x: i32);
    fn uniform_3_f32(&self, location: UniformLocation, v: [f32; 3]);
    fn uniform_4_f32(&self, location: UniformLocation, v: [f32; 4]);
    fn uniform_matrix_3_f32(&self, location: UniformLocation, m: &[f32; 9]);
    fn uniform_matrix_4_f32(&self, location: UniformLocation, m: &[f32; 16]);

    // buffers and vertex arrays
    fn create_buffer(&self) -> Result<BufferId, String>;
    fn bind_buffer(&self, target: u32, buffer: BufferId);
    fn buffer_data(&self, target: u32, data: &[u8], usage: u32);
    fn delete_buffer(&self, buffer: BufferId);

    fn create_vertex_array(&self) -> Result<VertexArrayId, String>;
    fn bind_vertex_array(&self, vao: VertexArrayId);
    fn delete_vertex_array(&self, vao: VertexArrayId);
    fn enable_vertex_attrib_array(&self, index: u32);
    /// Float attribute layout; `stride` and `offset` in bytes.
    fn vertex_attrib_pointer_f32(&self, index: u32, components: i32, stride: i32, offset: i32);

    // draws
    fn draw_arrays(&self, mode: u32, count: i32);
    fn draw_elements(&self, mode: u32, count: i32, index_type: u32);
    fn draw_arrays_instanced(&self, mode: u32, count: i32, instances: i32);
    fn draw_elements_instanced(&self, mode: u32, count: i32, index_type: u32, instances: i32);

    // fixed-function state
    fn enable(&self, cap: u32);
    fn disable(&self, cap: u32);
    fn depth_func(&self, func: u32);
    fn front_face(&self, mode: u32);
    fn cull_face(&self, mode: u32);
    fn blend_func(&self, src: u32, dst: u32);
    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32);
    fn clear(&self, mask: u32);
    fn viewport(&self, x: i32, y: i32, width: i32, height: i32);
    fn tex_parameter_i32(&self, target: u32, parameter: u32, value: i32);
    fn tex_parameter_f32(&self, target: u32, parameter: u32, value: f32);
    fn memory_barrier(&self, bits: u32);
    fn flush(&self);
    fn finish(&self);

    // queries
    fn parameter_f32(&self, parameter: u32) -> f32;
    fn supports_extension(&self, name: &str) -> bool;
}
