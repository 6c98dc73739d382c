use std::rc::Rc;

use super::barrier::BarrierMask;
use super::buffer::{IndexBuffer, VertexArray};
use super::driver::GlDriver;
use super::shader::ShaderProgram;

// EXT_texture_filter_anisotropic
const ANISOTROPY_EXTENSION: &str = "GL_EXT_texture_filter_anisotropic";
const TEXTURE_MAX_ANISOTROPY_EXT: u32 = 0x84FE;
const MAX_TEXTURE_MAX_ANISOTROPY_EXT: u32 = 0x84FF;

/// Vertex source of a draw call.
#[derive(Copy, Clone)]
pub enum Elements<'a> {
    /// Indexed draw over the whole index buffer.
    Indexed(&'a IndexBuffer),
    /// Non-indexed draw of `n` vertices starting at 0.
    Arrays(usize),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum BlendFactor {
    /// Disables blending when used on either side.
    None,
    Zero,
    One,
    SrcColor,
    OneMinusSrcColor,
    DstColor,
    OneMinusDstColor,
    SrcAlpha,
    OneMinusSrcAlpha,
    DstAlpha,
    OneMinusDstAlpha,
    ConstantColor,
    OneMinusConstantColor,
    ConstantAlpha,
    OneMinusConstantAlpha,
}

impl BlendFactor {
    fn gl_enum(self) -> Option<u32> {
        Some(match self {
            BlendFactor::None => return None,
            BlendFactor::Zero => glow::ZERO,
            BlendFactor::One => glow::ONE,
            BlendFactor::SrcColor => glow::SRC_COLOR,
            BlendFactor::OneMinusSrcColor => glow::ONE_MINUS_SRC_COLOR,
            BlendFactor::DstColor => glow::DST_COLOR,
            BlendFactor::OneMinusDstColor => glow::ONE_MINUS_DST_COLOR,
            BlendFactor::SrcAlpha => glow::SRC_ALPHA,
            BlendFactor::OneMinusSrcAlpha => glow::ONE_MINUS_SRC_ALPHA,
            BlendFactor::DstAlpha => glow::DST_ALPHA,
            BlendFactor::OneMinusDstAlpha => glow::ONE_MINUS_DST_ALPHA,
            BlendFactor::ConstantColor => glow::CONSTANT_COLOR,
            BlendFactor::OneMinusConstantColor => glow::ONE_MINUS_CONSTANT_COLOR,
            BlendFactor::ConstantAlpha => glow::CONSTANT_ALPHA,
            BlendFactor::OneMinusConstantAlpha => glow::ONE_MINUS_CONSTANT_ALPHA,
        })
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum MinFilter {
    Nearest,
    Linear,
    NearestMipmapNearest,
    LinearMipmapNearest,
    NearestMipmapLinear,
    LinearMipmapLinear,
}

impl MinFilter {
    fn gl_enum(self) -> u32 {
        match self {
            MinFilter::Nearest => glow::NEAREST,
            MinFilter::Linear => glow::LINEAR,
            MinFilter::NearestMipmapNearest => glow::NEAREST_MIPMAP_NEAREST,
            MinFilter::LinearMipmapNearest => glow::LINEAR_MIPMAP_NEAREST,
            MinFilter::NearestMipmapLinear => glow::NEAREST_MIPMAP_LINEAR,
            MinFilter::LinearMipmapLinear => glow::LINEAR_MIPMAP_LINEAR,
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum MagFilter {
    Nearest,
    Linear,
}

impl MagFilter {
    fn gl_enum(self) -> u32 {
        match self {
            MagFilter::Nearest => glow::NEAREST,
            MagFilter::Linear => glow::LINEAR,
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum WrapMode {
    Repeat,
    MirroredRepeat,
    ClampToEdge,
    ClampToBorder,
}

impl WrapMode {
    fn gl_enum(self) -> u32 {
        match self {
            WrapMode::Repeat => glow::REPEAT,
            WrapMode::MirroredRepeat => glow::MIRRORED_REPEAT,
            WrapMode::ClampToEdge => glow::CLAMP_TO_EDGE,
            WrapMode::ClampToBorder => glow::CLAMP_TO_BORDER,
        }
    }
}

/// Immediate-mode draw submission and global pipeline state.
///
/// State toggles are applied to the driver right away and are global: the
/// last call wins and affects every later draw.
pub struct Renderer {
    gl: Rc<dyn GlDriver>,
    clear_mask: u32,
    depth_enabled: bool,
    viewport: (i32, i32, u32, u32),
}

impl Renderer {
    pub fn new(gl: Rc<dyn GlDriver>) -> Self {
        Self {
            gl,
            clear_mask: glow::COLOR_BUFFER_BIT,
            depth_enabled: false,
            viewport: (0, 0, 0, 0),
        }
    }

    pub fn gl(&self) -> &Rc<dyn GlDriver> {
        &self.gl
    }

    pub fn draw_triangles(&self, vao: &VertexArray, elements: Elements<'_>, shader: &ShaderProgram) {
        self.draw(glow::TRIANGLES, vao, elements, shader, None);
    }

    pub fn draw_lines(&self, vao: &VertexArray, elements: Elements<'_>, shader: &ShaderProgram) {
        self.draw(glow::LINES, vao, elements, shader, None);
    }

    pub fn draw_triangles_instanced(
        &self,
        vao: &VertexArray,
        elements: Elements<'_>,
        shader: &ShaderProgram,
        instances: usize,
    ) {
        self.draw(glow::TRIANGLES, vao, elements, shader, Some(instances));
    }

    pub fn draw_lines_instanced(
        &self,
        vao: &VertexArray,
        elements: Elements<'_>,
        shader: &ShaderProgram,
        instances: usize,
    ) {
        self.draw(glow::LINES, vao, elements, shader, Some(instances));
    }

    fn draw(
        &self,
        mode: u32,
        vao: &VertexArray,
        elements: Elements<'_>,
        shader: &ShaderProgram,
        instances: Option<usize>,
    ) {
        vao.bind();
        if let Elements::Indexed(ibo) = elements {
            ibo.bind();
        }
        shader.bind();

        match (elements, instances) {
            (Elements::Indexed(ibo), None) => {
                self.gl.draw_elements(mode, gl_count(ibo.count()), ibo.index_type())
            }
            (Elements::Indexed(ibo), Some(n)) => self.gl.draw_elements_instanced(
                mode,
                gl_count(ibo.count()),
                ibo.index_type(),
                gl_count(n),
            ),
            (Elements::Arrays(count), None) => self.gl.draw_arrays(mode, gl_count(count)),
            (Elements::Arrays(count), Some(n)) => {
                self.gl
                    .draw_arrays_instanced(mode, gl_count(count), gl_count(n))
            }
        }
    }

    /// Clears the colour buffer, plus depth while the depth buffer is in use.
    pub fn clear(&self) {
        self.gl.clear(self.clear_mask);
    }

    pub fn flush(&self) {
        self.gl.flush();
    }

    pub fn finish(&self) {
        self.gl.finish();
    }

    pub fn set_viewport(&mut self, x: i32, y: i32, width: u32, height: u32) {
        self.viewport = (x, y, width, height);
        self.gl
            .viewport(x, y, gl_count(width as usize), gl_count(height as usize));
    }

    pub fn viewport(&self) -> (i32, i32, u32, u32) {
        self.viewport
    }

    pub fn clear_mask(&self) -> u32 {
        self.clear_mask
    }

    pub fn is_depth_buffer_enabled(&self) -> bool {
        self.depth_enabled
    }

    /// Orders earlier shader writes before later reads in the selected
    /// domains. An empty mask issues nothing.
    pub fn set_memory_barrier(&self, mask: BarrierMask) {
        let bits = mask.to_gl_bits();
        if bits != 0 {
            self.gl.memory_barrier(bits);
        }
    }

    pub fn use_sampling(&mut self, enabled: bool) -> &mut Self {
        self.toggle(glow::MULTISAMPLE, enabled);
        self
    }

    pub fn use_depth_buffer(&mut self, enabled: bool) -> &mut Self {
        self.depth_enabled = enabled;
        if enabled {
            self.gl.enable(glow::DEPTH_TEST);
            self.gl.depth_func(glow::LESS);
            self.clear_mask |= glow::DEPTH_BUFFER_BIT;
        } else {
            self.gl.disable(glow::DEPTH_TEST);
            self.clear_mask &= !glow::DEPTH_BUFFER_BIT;
        }
        self
    }

    /// Toggles face culling.
    ///
    /// Winding and culled face are written even when `enabled` is false, so
    /// the last call always owns all three states.
    pub fn use_culling(&mut self, enabled: bool, counter_clockwise: bool, cull_back: bool) -> &mut Self {
        self.toggle(glow::CULL_FACE, enabled);
        self.gl
            .front_face(if counter_clockwise { glow::CCW } else { glow::CW });
        self.gl
            .cull_face(if cull_back { glow::BACK } else { glow::FRONT });
        self
    }

    pub fn use_clear_color(&mut self, r: f32, g: f32, b: f32, a: f32) -> &mut Self {
        self.gl.clear_color(r, g, b, a);
        self
    }

    /// Applies to the texture currently bound to `TEXTURE_2D`.
    pub fn use_texture_min_filter(&mut self, filter: MinFilter) -> &mut Self {
        self.gl
            .tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MIN_FILTER, filter.gl_enum() as i32);
        self
    }

    pub fn use_texture_mag_filter(&mut self, filter: MagFilter) -> &mut Self {
        self.gl
            .tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MAG_FILTER, filter.gl_enum() as i32);
        self
    }

    pub fn use_texture_wrap(&mut self, wrap_s: WrapMode, wrap_t: WrapMode) -> &mut Self {
        self.gl
            .tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_S, wrap_s.gl_enum() as i32);
        self.gl
            .tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_T, wrap_t.gl_enum() as i32);
        self
    }

    /// `BlendFactor::None` on either side turns blending off.
    pub fn use_blending(&mut self, src: BlendFactor, dst: BlendFactor) -> &mut Self {
        match (src.gl_enum(), dst.gl_enum()) {
            (Some(s), Some(d)) => {
                self.gl.enable(glow::BLEND);
                self.gl.blend_func(s, d);
            }
            _ => self.gl.disable(glow::BLEND),
        }
        self
    }

    pub fn use_anisotropic_filtering(&mut self, factor: f32) -> &mut Self {
        if !self.gl.supports_extension(ANISOTROPY_EXTENSION) {
            log::warn!(target: "opengl", "anisotropic filtering is not supported");
            return self;
        }
        self.gl
            .tex_parameter_f32(glow::TEXTURE_2D, TEXTURE_MAX_ANISOTROPY_EXT, factor);
        log::debug!(target: "opengl", "set anisotropic filtering factor to {}x", factor as i32);
        self
    }

    /// Highest supported anisotropy factor, `0.0` without the extension.
    pub fn largest_anisotropic_factor(&self) -> f32 {
        if !self.gl.supports_extension(ANISOTROPY_EXTENSION) {
            log::warn!(target: "opengl", "anisotropic filtering is not supported");
            return 0.0;
        }
        self.gl.parameter_f32(MAX_TEXTURE_MAX_ANISOTROPY_EXT)
    }

    fn toggle(&self, cap: u32, enabled: bool) {
        if enabled {
            self.gl.enable(cap);
        } else {
            self.gl.disable(cap);
        }
    }
}

fn gl_count(n: usize) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpu::{IndexBuffer, VertexBuffer};
    use crate::testing::{hex, recording_gl, RecordingDriver};

    const VS: &str = "void main() {}";
    const FS: &str = "void main() {}";

    struct Fixture {
        rec: Rc<RecordingDriver>,
        renderer: Renderer,
        vao: VertexArray,
        ibo: IndexBuffer,
        shader: ShaderProgram,
        _vbo: VertexBuffer,
    }

    fn fixture() -> Fixture {
        let (rec, gl) = recording_gl();
        let vbo = VertexBuffer::new(gl.clone(), &[0.0f32; 9]).unwrap();
        let ibo = IndexBuffer::new(gl.clone(), &[0, 1, 2]).unwrap();
        let vao = VertexArray::new(gl.clone()).unwrap();
        let shader = ShaderProgram::from_sources(gl.clone(), VS, FS, "test").unwrap();
        rec.clear_calls();
        Fixture {
            rec,
            renderer: Renderer::new(gl),
            vao,
            ibo,
            shader,
            _vbo: vbo,
        }
    }

    #[test]
    fn indexed_draw_binds_vao_ibo_shader_in_order() {
        let f = fixture();
        f.renderer
            .draw_triangles(&f.vao, Elements::Indexed(&f.ibo), &f.shader);

        assert_eq!(
            f.rec.calls(),
            vec![
                format!("bind_vertex_array {}", f.vao.id()),
                format!("bind_buffer {} {}", hex(glow::ELEMENT_ARRAY_BUFFER), f.ibo.id()),
                format!("use_program {}", f.shader.id()),
                format!("draw_elements {} 3 {}", hex(glow::TRIANGLES), hex(glow::UNSIGNED_INT)),
            ]
        );
    }

    #[test]
    fn array_draw_skips_index_buffer() {
        let f = fixture();
        f.renderer.draw_lines(&f.vao, Elements::Arrays(4), &f.shader);

        assert_eq!(f.rec.count("bind_buffer"), 0);
        assert_eq!(f.rec.calls_named("draw_arrays"), vec![format!("draw_arrays {} 4", hex(glow::LINES))]);
    }

    #[test]
    fn instanced_draws_pass_instance_count() {
        let f = fixture();
        f.renderer
            .draw_triangles_instanced(&f.vao, Elements::Arrays(3), &f.shader, 10);
        f.renderer
            .draw_lines_instanced(&f.vao, Elements::Indexed(&f.ibo), &f.shader, 2);

        assert_eq!(
            f.rec.calls_named("draw_arrays_instanced"),
            vec![format!("draw_arrays_instanced {} 3 10", hex(glow::TRIANGLES))]
        );
        assert_eq!(
            f.rec.calls_named("draw_elements_instanced"),
            vec![format!(
                "draw_elements_instanced {} 3 {} 2",
                hex(glow::LINES),
                hex(glow::UNSIGNED_INT)
            )]
        );
    }

    #[test]
    fn culling_last_writer_wins() {
        let mut f = fixture();
        f.renderer
            .use_culling(true, true, true)
            .use_culling(false, false, false);

        let cull: Vec<String> = f
            .rec
            .calls()
            .into_iter()
            .filter(|c| c.ends_with(&hex(glow::CULL_FACE)))
            .collect();
        assert_eq!(cull.last(), Some(&format!("disable {}", hex(glow::CULL_FACE))));
        assert_eq!(
            f.rec.calls_named("front_face").last(),
            Some(&format!("front_face {}", hex(glow::CW)))
        );
        assert_eq!(
            f.rec.calls_named("cull_face").last(),
            Some(&format!("cull_face {}", hex(glow::FRONT)))
        );
    }

    #[test]
    fn depth_buffer_drives_clear_mask() {
        let mut f = fixture();
        assert_eq!(f.renderer.clear_mask(), glow::COLOR_BUFFER_BIT);

        f.renderer.use_depth_buffer(true);
        f.renderer.clear();
        f.renderer.use_depth_buffer(false);
        f.renderer.clear();

        assert_eq!(
            f.rec.calls_named("clear"),
            vec![
                format!("clear {}", hex(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT)),
                format!("clear {}", hex(glow::COLOR_BUFFER_BIT)),
            ]
        );
        assert!(!f.renderer.is_depth_buffer_enabled());
    }

    #[test]
    fn blending_with_none_disables() {
        let mut f = fixture();
        f.renderer
            .use_blending(BlendFactor::SrcAlpha, BlendFactor::OneMinusSrcAlpha)
            .use_blending(BlendFactor::None, BlendFactor::One);

        assert_eq!(
            f.rec.calls(),
            vec![
                format!("enable {}", hex(glow::BLEND)),
                format!(
                    "blend_func {} {}",
                    hex(glow::SRC_ALPHA),
                    hex(glow::ONE_MINUS_SRC_ALPHA)
                ),
                format!("disable {}", hex(glow::BLEND)),
            ]
        );
    }

    #[test]
    fn anisotropy_without_extension_is_a_no_op() {
        let mut f = fixture();
        f.renderer.use_anisotropic_filtering(8.0);

        assert!(f.rec.calls().is_empty());
        assert_eq!(f.renderer.largest_anisotropic_factor(), 0.0);
    }

    #[test]
    fn anisotropy_with_extension() {
        let mut f = fixture();
        f.rec.add_extension(ANISOTROPY_EXTENSION);

        f.renderer.use_anisotropic_filtering(4.0);

        assert_eq!(f.rec.count("tex_parameter_f32"), 1);
        assert_eq!(f.renderer.largest_anisotropic_factor(), 16.0);
    }

    #[test]
    fn barrier_is_one_call_and_empty_is_skipped() {
        let f = fixture();
        f.renderer.set_memory_barrier(BarrierMask::empty());
        f.renderer
            .set_memory_barrier(BarrierMask::SHADER_STORAGE_BUFFER | BarrierMask::VERTEX_ARRAY);

        assert_eq!(f.rec.calls(), vec!["memory_barrier 0x2001".to_string()]);
    }

    #[test]
    fn texture_state_targets_2d() {
        let mut f = fixture();
        f.renderer
            .use_texture_min_filter(MinFilter::LinearMipmapLinear)
            .use_texture_mag_filter(MagFilter::Nearest)
            .use_texture_wrap(WrapMode::Repeat, WrapMode::ClampToEdge);

        let calls = f.rec.calls_named("tex_parameter_i32");
        assert_eq!(calls.len(), 4);
        assert!(calls.iter().all(|c| c.contains(&hex(glow::TEXTURE_2D))));
    }

    #[test]
    fn viewport_is_tracked() {
        let mut f = fixture();
        f.renderer.set_viewport(0, 0, 800, 600);
        assert_eq!(f.renderer.viewport(), (0, 0, 800, 600));
        assert_eq!(f.rec.calls(), vec!["viewport 0 0 800 600".to_string()]);
    }
}
