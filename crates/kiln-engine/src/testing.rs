//! Test doubles shared by unit tests across the crate.

use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::rc::Rc;
use std::sync::Once;

use crate::gpu::{
    BufferId, GlDriver, ProgramId, ShaderId, ShaderStage, UniformLocation, VertexArrayId,
};

/// Ordered log of named events shared between test hooks.
#[derive(Clone, Default)]
pub(crate) struct EventLog(Rc<RefCell<Vec<String>>>);

impl EventLog {
    pub(crate) fn push(&self, event: impl Into<String>) {
        self.0.borrow_mut().push(event.into());
    }

    pub(crate) fn events(&self) -> Vec<String> {
        self.0.borrow().clone()
    }

    pub(crate) fn count(&self, event: &str) -> usize {
        self.0.borrow().iter().filter(|e| *e == event).count()
    }

    pub(crate) fn position(&self, event: &str) -> Option<usize> {
        self.0.borrow().iter().position(|e| e == event)
    }
}

thread_local! {
    static CAPTURED: RefCell<Vec<(log::Level, String, String)>> = const { RefCell::new(Vec::new()) };
}

struct CaptureLogger;

impl log::Log for CaptureLogger {
    fn enabled(&self, _metadata: &log::Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &log::Record<'_>) {
        CAPTURED.with(|c| {
            c.borrow_mut().push((
                record.level(),
                record.target().to_string(),
                record.args().to_string(),
            ))
        });
    }

    fn flush(&self) {}
}

static CAPTURE_LOGGER: CaptureLogger = CaptureLogger;
static INSTALL_CAPTURE: Once = Once::new();

/// Log records emitted on the current test thread.
///
/// Each test runs on its own thread, so records from parallel tests do not
/// mix. Creating a capture discards earlier records of this thread.
pub(crate) struct LogCapture;

impl LogCapture {
    pub(crate) fn start() -> Self {
        INSTALL_CAPTURE.call_once(|| {
            if log::set_logger(&CAPTURE_LOGGER).is_ok() {
                log::set_max_level(log::LevelFilter::Trace);
            }
        });
        CAPTURED.with(|c| c.borrow_mut().clear());
        LogCapture
    }

    /// Number of records at `level` whose message equals `message`.
    pub(crate) fn count(&self, level: log::Level, message: &str) -> usize {
        CAPTURED.with(|c| {
            c.borrow()
                .iter()
                .filter(|(l, _, m)| *l == level && m == message)
                .count()
        })
    }

    /// Messages logged under `target`, oldest first.
    pub(crate) fn messages(&self, target: &str) -> Vec<String> {
        CAPTURED.with(|c| {
            c.borrow()
                .iter()
                .filter(|(_, t, _)| t == target)
                .map(|(_, _, m)| m.clone())
                .collect()
        })
    }
}

/// `GlDriver` that records every call as a line of text.
///
/// Lines look like `"enable 0xb44"` or `"uniform_location 1 u_color"`.
pub(crate) struct RecordingDriver {
    calls: RefCell<Vec<String>>,
    next_id: Cell<u32>,
    missing_uniforms: RefCell<HashSet<String>>,
    extensions: RefCell<HashSet<String>>,
    fail_compile: Cell<bool>,
    fail_link: Cell<bool>,
    max_anisotropy: Cell<f32>,
}

impl RecordingDriver {
    pub(crate) fn new() -> Rc<Self> {
        Rc::new(Self {
            calls: RefCell::default(),
            next_id: Cell::new(1),
            missing_uniforms: RefCell::default(),
            extensions: RefCell::default(),
            fail_compile: Cell::new(false),
            fail_link: Cell::new(false),
            max_anisotropy: Cell::new(16.0),
        })
    }

    pub(crate) fn missing_uniform(&self, name: &str) {
        self.missing_uniforms.borrow_mut().insert(name.to_string());
    }

    pub(crate) fn add_extension(&self, name: &str) {
        self.extensions.borrow_mut().insert(name.to_string());
    }

    pub(crate) fn fail_compile(&self, fail: bool) {
        self.fail_compile.set(fail);
    }

    pub(crate) fn fail_link(&self, fail: bool) {
        self.fail_link.set(fail);
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub(crate) fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    /// Number of calls whose first word is `name`.
    pub(crate) fn count(&self, name: &str) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|c| c.split(' ').next() == Some(name))
            .count()
    }

    /// Calls whose first word is `name`, in order.
    pub(crate) fn calls_named(&self, name: &str) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .filter(|c| c.split(' ').next() == Some(name))
            .cloned()
            .collect()
    }

    fn record(&self, call: String) {
        self.calls.borrow_mut().push(call);
    }

    fn alloc(&self) -> u32 {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        id
    }
}

impl GlDriver for RecordingDriver {
    fn create_shader(&self, stage: ShaderStage) -> Result<ShaderId, String> {
        let id = self.alloc();
        self.record(format!("create_shader {stage} {id}"));
        Ok(id)
    }

    fn shader_source(&self, shader: ShaderId, _source: &str) {
        self.record(format!("shader_source {shader}"));
    }

    fn compile_shader(&self, shader: ShaderId) -> bool {
        self.record(format!("compile_shader {shader}"));
        !self.fail_compile.get()
    }

    fn shader_info_log(&self, shader: ShaderId) -> String {
        self.record(format!("shader_info_log {shader}"));
        "0:1: syntax error".into()
    }

    fn delete_shader(&self, shader: ShaderId) {
        self.record(format!("delete_shader {shader}"));
    }

    fn create_program(&self) -> Result<ProgramId, String> {
        let id = self.alloc();
        self.record(format!("create_program {id}"));
        Ok(id)
    }

    fn attach_shader(&self, program: ProgramId, shader: ShaderId) {
        self.record(format!("attach_shader {program} {shader}"));
    }

    fn link_program(&self, program: ProgramId) -> bool {
        self.record(format!("link_program {program}"));
        !self.fail_link.get()
    }

    fn program_info_log(&self, program: ProgramId) -> String {
        self.record(format!("program_info_log {program}"));
        "link error".into()
    }

    fn delete_program(&self, program: ProgramId) {
        self.record(format!("delete_program {program}"));
    }

    fn use_program(&self, program: ProgramId) {
        self.record(format!("use_program {program}"));
    }

    fn uniform_location(&self, program: ProgramId, name: &str) -> UniformLocation {
        self.record(format!("uniform_location {program} {name}"));
        if self.missing_uniforms.borrow().contains(name) {
            -1
        } else {
            self.alloc() as i32
        }
    }

    fn uniform_1_f32(&self, location: UniformLocation, x: f32) {
        self.record(format!("uniform_1_f32 {location} {x}"));
    }

    fn uniform_1_i32(&self, location: UniformLocation, x: i32) {
        self.record(format!("uniform_1_i32 {location} {x}"));
    }

    fn uniform_3_f32(&self, location: UniformLocation, v: [f32; 3]) {
        self.record(format!("uniform_3_f32 {location} {v:?}"));
    }

    fn uniform_4_f32(&self, location: UniformLocation, v: [f32; 4]) {
        self.record(format!("uniform_4_f32 {location} {v:?}"));
    }

    fn uniform_matrix_3_f32(&self, location: UniformLocation, _m: &[f32; 9]) {
        self.record(format!("uniform_matrix_3_f32 {location}"));
    }

    fn uniform_matrix_4_f32(&self, location: UniformLocation, _m: &[f32; 16]) {
        self.record(format!("uniform_matrix_4_f32 {location}"));
    }

    fn create_buffer(&self) -> Result<BufferId, String> {
        let id = self.alloc();
        self.record(format!("create_buffer {id}"));
        Ok(id)
    }

    fn bind_buffer(&self, target: u32, buffer: BufferId) {
        self.record(format!("bind_buffer {target:#x} {buffer}"));
    }

    fn buffer_data(&self, target: u32, data: &[u8], usage: u32) {
        self.record(format!("buffer_data {target:#x} {} {usage:#x}", data.len()));
    }

    fn delete_buffer(&self, buffer: BufferId) {
        self.record(format!("delete_buffer {buffer}"));
    }

    fn create_vertex_array(&self) -> Result<VertexArrayId, String> {
        let id = self.alloc();
        self.record(format!("create_vertex_array {id}"));
        Ok(id)
    }

    fn bind_vertex_array(&self, vao: VertexArrayId) {
        self.record(format!("bind_vertex_array {vao}"));
    }

    fn delete_vertex_array(&self, vao: VertexArrayId) {
        self.record(format!("delete_vertex_array {vao}"));
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        self.record(format!("enable_vertex_attrib_array {index}"));
    }

    fn vertex_attrib_pointer_f32(&self, index: u32, components: i32, stride: i32, offset: i32) {
        self.record(format!(
            "vertex_attrib_pointer_f32 {index} {components} {stride} {offset}"
        ));
    }

    fn draw_arrays(&self, mode: u32, count: i32) {
        self.record(format!("draw_arrays {mode:#x} {count}"));
    }

    fn draw_elements(&self, mode: u32, count: i32, index_type: u32) {
        self.record(format!("draw_elements {mode:#x} {count} {index_type:#x}"));
    }

    fn draw_arrays_instanced(&self, mode: u32, count: i32, instances: i32) {
        self.record(format!("draw_arrays_instanced {mode:#x} {count} {instances}"));
    }

    fn draw_elements_instanced(&self, mode: u32, count: i32, index_type: u32, instances: i32) {
        self.record(format!(
            "draw_elements_instanced {mode:#x} {count} {index_type:#x} {instances}"
        ));
    }

    fn enable(&self, cap: u32) {
        self.record(format!("enable {cap:#x}"));
    }

    fn disable(&self, cap: u32) {
        self.record(format!("disable {cap:#x}"));
    }

    fn depth_func(&self, func: u32) {
        self.record(format!("depth_func {func:#x}"));
    }

    fn front_face(&self, mode: u32) {
        self.record(format!("front_face {mode:#x}"));
    }

    fn cull_face(&self, mode: u32) {
        self.record(format!("cull_face {mode:#x}"));
    }

    fn blend_func(&self, src: u32, dst: u32) {
        self.record(format!("blend_func {src:#x} {dst:#x}"));
    }

    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32) {
        self.record(format!("clear_color {r} {g} {b} {a}"));
    }

    fn clear(&self, mask: u32) {
        self.record(format!("clear {mask:#x}"));
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        self.record(format!("viewport {x} {y} {width} {height}"));
    }

    fn tex_parameter_i32(&self, target: u32, parameter: u32, value: i32) {
        self.record(format!("tex_parameter_i32 {target:#x} {parameter:#x} {value:#x}"));
    }

    fn tex_parameter_f32(&self, target: u32, parameter: u32, value: f32) {
        self.record(format!("tex_parameter_f32 {target:#x} {parameter:#x} {value}"));
    }

    fn memory_barrier(&self, bits: u32) {
        self.record(format!("memory_barrier {bits:#x}"));
    }

    fn flush(&self) {
        self.record("flush".into());
    }

    fn finish(&self) {
        self.record("finish".into());
    }

    fn parameter_f32(&self, parameter: u32) -> f32 {
        self.record(format!("parameter_f32 {parameter:#x}"));
        self.max_anisotropy.get()
    }

    fn supports_extension(&self, name: &str) -> bool {
        self.extensions.borrow().contains(name)
    }
}

/// A recording driver plus the same driver as a trait object.
pub(crate) fn recording_gl() -> (Rc<RecordingDriver>, Rc<dyn GlDriver>) {
    let gl = RecordingDriver::new();
    let dyn_gl: Rc<dyn GlDriver> = gl.clone();
    (gl, dyn_gl)
}

/// Formats a GL enum the way [`RecordingDriver`] records it.
pub(crate) fn hex(value: u32) -> String {
    format!("{value:#x}")
}
