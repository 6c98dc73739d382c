use std::num::NonZeroU32;

use glow::HasContext;

use super::driver::{
    BufferId, GlDriver, ProgramId, ShaderId, ShaderStage, UniformLocation, VertexArrayId,
};

/// [`GlDriver`] over a loaded `glow::Context`.
pub struct GlowDriver {
    gl: glow::Context,
}

impl GlowDriver {
    pub fn new(gl: glow::Context) -> Self {
        Self { gl }
    }

    pub fn context(&self) -> &glow::Context {
        &self.gl
    }
}

fn shader(id: ShaderId) -> Option<glow::NativeShader> {
    NonZeroU32::new(id).map(glow::NativeShader)
}

fn program(id: ProgramId) -> Option<glow::NativeProgram> {
    NonZeroU32::new(id).map(glow::NativeProgram)
}

fn buffer(id: BufferId) -> Option<glow::NativeBuffer> {
    NonZeroU32::new(id).map(glow::NativeBuffer)
}

fn vertex_array(id: VertexArrayId) -> Option<glow::NativeVertexArray> {
    NonZeroU32::new(id).map(glow::NativeVertexArray)
}

fn location(loc: UniformLocation) -> Option<glow::NativeUniformLocation> {
    (loc >= 0).then_some(glow::NativeUniformLocation(loc as u32))
}

// SAFETY (all blocks below): the context is current on this thread for the
// whole lifetime of the driver, and every object id was produced by it.
impl GlDriver for GlowDriver {
    fn create_shader(&self, stage: ShaderStage) -> Result<ShaderId, String> {
        unsafe { self.gl.create_shader(stage.gl_enum()) }.map(|s| s.0.get())
    }

    fn shader_source(&self, id: ShaderId, source: &str) {
        if let Some(s) = shader(id) {
            unsafe { self.gl.shader_source(s, source) }
        }
    }

    fn compile_shader(&self, id: ShaderId) -> bool {
        let Some(s) = shader(id) else { return false };
        unsafe {
            self.gl.compile_shader(s);
            self.gl.get_shader_compile_status(s)
        }
    }

    fn shader_info_log(&self, id: ShaderId) -> String {
        shader(id)
            .map(|s| unsafe { self.gl.get_shader_info_log(s) })
            .unwrap_or_default()
    }

    fn delete_shader(&self, id: ShaderId) {
        if let Some(s) = shader(id) {
            unsafe { self.gl.delete_shader(s) }
        }
    }

    fn create_program(&self) -> Result<ProgramId, String> {
        unsafe { self.gl.create_program() }.map(|p| p.0.get())
    }

    fn attach_shader(&self, prog: ProgramId, id: ShaderId) {
        if let (Some(p), Some(s)) = (program(prog), shader(id)) {
            unsafe { self.gl.attach_shader(p, s) }
        }
    }

    fn link_program(&self, prog: ProgramId) -> bool {
        let Some(p) = program(prog) else { return false };
        unsafe {
            self.gl.link_program(p);
            self.gl.get_program_link_status(p)
        }
    }

    fn program_info_log(&self, prog: ProgramId) -> String {
        program(prog)
            .map(|p| unsafe { self.gl.get_program_info_log(p) })
            .unwrap_or_default()
    }

    fn delete_program(&self, prog: ProgramId) {
        if let Some(p) = program(prog) {
            unsafe { self.gl.delete_program(p) }
        }
    }

    fn use_program(&self, prog: ProgramId) {
        unsafe { self.gl.use_program(program(prog)) }
    }

    fn uniform_location(&self, prog: ProgramId, name: &str) -> UniformLocation {
        let Some(p) = program(prog) else { return -1 };
        unsafe { self.gl.get_uniform_location(p, name) }.map_or(-1, |l| l.0 as i32)
    }

    fn uniform_1_f32(&self, loc: UniformLocation, x: f32) {
        unsafe { self.gl.uniform_1_f32(location(loc).as_ref(), x) }
    }

    fn uniform_1_i32(&self, loc: UniformLocation, x: i32) {
        unsafe { self.gl.uniform_1_i32(location(loc).as_ref(), x) }
    }

    fn uniform_3_f32(&self, loc: UniformLocation, [x, y, z]: [f32; 3]) {
        unsafe { self.gl.uniform_3_f32(location(loc).as_ref(), x, y, z) }
    }

    fn uniform_4_f32(&self, loc: UniformLocation, [x, y, z, w]: [f32; 4]) {
        unsafe { self.gl.uniform_4_f32(location(loc).as_ref(), x, y, z, w) }
    }

    fn uniform_matrix_3_f32(&self, loc: UniformLocation, m: &[f32; 9]) {
        unsafe { self.gl.uniform_matrix_3_f32_slice(location(loc).as_ref(), false, m) }
    }

    fn uniform_matrix_4_f32(&self, loc: UniformLocation, m: &[f32; 16]) {
        unsafe { self.gl.uniform_matrix_4_f32_slice(location(loc).as_ref(), false, m) }
    }

    fn create_buffer(&self) -> Result<BufferId, String> {
        unsafe { self.gl.create_buffer() }.map(|b| b.0.get())
    }

    fn bind_buffer(&self, target: u32, id: BufferId) {
        unsafe { self.gl.bind_buffer(target, buffer(id)) }
    }

    fn buffer_data(&self, target: u32, data: &[u8], usage: u32) {
        unsafe { self.gl.buffer_data_u8_slice(target, data, usage) }
    }

    fn delete_buffer(&self, id: BufferId) {
        if let Some(b) = buffer(id) {
            unsafe { self.gl.delete_buffer(b) }
        }
    }

    fn create_vertex_array(&self) -> Result<VertexArrayId, String> {
        unsafe { self.gl.create_vertex_array() }.map(|v| v.0.get())
    }

    fn bind_vertex_array(&self, id: VertexArrayId) {
        unsafe { self.gl.bind_vertex_array(vertex_array(id)) }
    }

    fn delete_vertex_array(&self, id: VertexArrayId) {
        if let Some(v) = vertex_array(id) {
            unsafe { self.gl.delete_vertex_array(v) }
        }
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        unsafe { self.gl.enable_vertex_attrib_array(index) }
    }

    fn vertex_attrib_pointer_f32(&self, index: u32, components: i32, stride: i32, offset: i32) {
        unsafe {
            self.gl
                .vertex_attrib_pointer_f32(index, components, glow::FLOAT, false, stride, offset)
        }
    }

    fn draw_arrays(&self, mode: u32, count: i32) {
        unsafe { self.gl.draw_arrays(mode, 0, count) }
    }

    fn draw_elements(&self, mode: u32, count: i32, index_type: u32) {
        unsafe { self.gl.draw_elements(mode, count, index_type, 0) }
    }

    fn draw_arrays_instanced(&self, mode: u32, count: i32, instances: i32) {
        unsafe { self.gl.draw_arrays_instanced(mode, 0, count, instances) }
    }

    fn draw_elements_instanced(&self, mode: u32, count: i32, index_type: u32, instances: i32) {
        unsafe {
            self.gl
                .draw_elements_instanced(mode, count, index_type, 0, instances)
        }
    }

    fn enable(&self, cap: u32) {
        unsafe { self.gl.enable(cap) }
    }

    fn disable(&self, cap: u32) {
        unsafe { self.gl.disable(cap) }
    }

    fn depth_func(&self, func: u32) {
        unsafe { self.gl.depth_func(func) }
    }

    fn front_face(&self, mode: u32) {
        unsafe { self.gl.front_face(mode) }
    }

    fn cull_face(&self, mode: u32) {
        unsafe { self.gl.cull_face(mode) }
    }

    fn blend_func(&self, src: u32, dst: u32) {
        unsafe { self.gl.blend_func(src, dst) }
    }

    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32) {
        unsafe { self.gl.clear_color(r, g, b, a) }
    }

    fn clear(&self, mask: u32) {
        unsafe { self.gl.clear(mask) }
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        unsafe { self.gl.viewport(x, y, width, height) }
    }

    fn tex_parameter_i32(&self, target: u32, parameter: u32, value: i32) {
        unsafe { self.gl.tex_parameter_i32(target, parameter, value) }
    }

    fn tex_parameter_f32(&self, target: u32, parameter: u32, value: f32) {
        unsafe { self.gl.tex_parameter_f32(target, parameter, value) }
    }

    fn memory_barrier(&self, bits: u32) {
        unsafe { self.gl.memory_barrier(bits) }
    }

    fn flush(&self) {
        unsafe { self.gl.flush() }
    }

    fn finish(&self) {
        unsafe { self.gl.finish() }
    }

    fn parameter_f32(&self, parameter: u32) -> f32 {
        unsafe { self.gl.get_parameter_f32(parameter) }
    }

    fn supports_extension(&self, name: &str) -> bool {
        self.gl.supported_extensions().contains(name)
    }
}
