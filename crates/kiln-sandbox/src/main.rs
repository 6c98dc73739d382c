mod scene;

use anyhow::{Context, Result};
use bytemuck::{Pod, Zeroable};
use kiln_engine::events::WindowResized;
use kiln_engine::gpu::{Elements, ShaderProgram, VertexArray, VertexBuffer};
use kiln_engine::input::Key;
use kiln_engine::logging::{init_logging, LoggingConfig};
use kiln_engine::{AppConfig, Application, Engine, Game};

use scene::{Drifter, Flash, OverlapPhysics, Rotator, StaticMarker};

const RADIUS: f32 = 0.08;

const VERTEX_SRC: &str = r#"#version 330 core
layout(location = 0) in vec2 a_pos;
layout(location = 1) in vec3 a_color;
uniform mat4 u_model;
out vec3 v_color;
void main() {
    v_color = a_color;
    gl_Position = u_model * vec4(a_pos, 0.0, 1.0);
}
"#;

const FRAGMENT_SRC: &str = r#"#version 330 core
in vec3 v_color;
uniform vec4 u_tint;
out vec4 o_color;
void main() {
    o_color = vec4(mix(v_color, u_tint.rgb, u_tint.a), 1.0);
}
"#;

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Vertex {
    pos: [f32; 2],
    color: [f32; 3],
}

const TRIANGLE: [Vertex; 3] = [
    Vertex { pos: [0.0, 1.0], color: [1.0, 0.3, 0.2] },
    Vertex { pos: [-0.87, -0.5], color: [0.2, 1.0, 0.3] },
    Vertex { pos: [0.87, -0.5], color: [0.2, 0.4, 1.0] },
];

struct Gpu {
    shader: ShaderProgram,
    vao: VertexArray,
    _vbo: VertexBuffer,
}

#[derive(Default)]
struct Sandbox {
    gpu: Option<Gpu>,
    title_timer: f32,
}

impl Game for Sandbox {
    fn on_create(&mut self, engine: &mut Engine) -> Result<()> {
        let gl = engine.renderer().gl().clone();
        let shader = ShaderProgram::from_sources(gl.clone(), VERTEX_SRC, FRAGMENT_SRC, "sandbox")
            .context("failed to build sandbox shader")?;
        let vbo = VertexBuffer::new(gl.clone(), &TRIANGLE)?;
        let mut vao = VertexArray::new(gl)?;
        let stride = std::mem::size_of::<Vertex>() as i32;
        vao.add_attribute(&vbo, 0, 2, stride, 0)
            .add_attribute(&vbo, 1, 3, stride, 8);
        self.gpu = Some(Gpu {
            shader,
            vao,
            _vbo: vbo,
        });

        engine.register_component_update::<Drifter>();
        engine.register_component_update::<Rotator>();
        engine.register_component_update::<Flash>();
        engine.register_component::<StaticMarker>();
        engine.set_physics(OverlapPhysics { radius: RADIUS });
        engine.register_event_logger::<WindowResized>(|e| {
            format!("window resized to {}x{}", e.width, e.height)
        });

        let world = engine.world_mut();
        for i in 0..12 {
            let t = i as f32 * 0.7;
            let obj = world.spawn();
            world.insert(obj, Drifter {
                pos: [t.cos() * 0.6, t.sin() * 0.6],
                vel: [(t * 1.3).sin() * 0.4, (t * 0.9).cos() * 0.4],
            }).ok();
            world.insert(obj, Rotator { angle: t, speed: 1.0 + i as f32 * 0.25 }).ok();
            world.insert(obj, Flash::default()).ok();
        }
        for pos in [[-0.5, 0.0], [0.5, 0.0]] {
            let obj = world.spawn();
            world.insert(obj, StaticMarker { pos }).ok();
        }

        engine
            .renderer_mut()
            .use_clear_color(0.06, 0.06, 0.09, 1.0)
            .use_culling(false, true, true);

        log::info!("sandbox ready: P pauses, Up/Down change time scale, Escape quits");
        Ok(())
    }

    fn on_update(&mut self, engine: &mut Engine) -> Result<()> {
        let input = engine.input();
        let (pause, faster, slower, editor) = (
            input.is_key_pressed(Key::P),
            input.is_key_pressed(Key::ArrowUp),
            input.is_key_pressed(Key::ArrowDown),
            input.is_key_pressed(Key::Backquote),
        );

        if pause {
            let paused = !engine.is_paused();
            engine.set_paused(paused);
            engine.add_event_log_entry(if paused { "paused" } else { "resumed" });
        }
        if faster || slower {
            let scale = engine.time_scale() * if faster { 2.0 } else { 0.5 };
            engine.set_time_scale(scale.clamp(0.125, 8.0));
            engine.add_event_log_entry(&format!("time scale {}", engine.time_scale()));
        }
        if editor {
            let visible = !engine.is_editor_active();
            engine.toggle_runtime_editor(visible);
        }

        self.title_timer += engine.unscaled_time_delta();
        if self.title_timer >= 1.0 {
            self.title_timer = 0.0;
            let title = format!(
                "kiln sandbox | {} fps | x{} | t={:.1}s",
                engine.current_fps(),
                engine.time_scale(),
                engine.total_elapsed_time()
            );
            engine.window_mut().set_title(&title);
        }
        Ok(())
    }

    fn on_render(&mut self, engine: &mut Engine) -> Result<()> {
        let Some(gpu) = self.gpu.as_mut() else {
            return Ok(());
        };

        let world = engine.world();
        let renderer = engine.renderer();

        for (obj, drifter) in world.view::<Drifter>() {
            let angle = world.get::<Rotator>(obj).map_or(0.0, |r| r.angle);
            let flash = world.get::<Flash>(obj).map_or(0.0, |f| f.remaining / Flash::DURATION);
            gpu.shader.set_mat4("u_model", &model(drifter.pos, angle, RADIUS));
            gpu.shader.set_vec4("u_tint", [1.0, 1.0, 1.0, flash]);
            renderer.draw_triangles(&gpu.vao, Elements::Arrays(3), &gpu.shader);
        }

        for (_, marker) in world.view::<StaticMarker>() {
            gpu.shader.set_mat4("u_model", &model(marker.pos, 0.0, RADIUS));
            gpu.shader.set_vec4("u_tint", [0.5, 0.5, 0.5, 1.0]);
            renderer.draw_triangles(&gpu.vao, Elements::Arrays(3), &gpu.shader);
        }
        Ok(())
    }

    fn on_destroy(&mut self, engine: &mut Engine) {
        log::info!(
            "sandbox closing after {:.1}s of game time",
            engine.total_elapsed_time()
        );
        self.gpu = None;
    }
}

/// Column-major translate * rotate(z) * scale.
fn model(pos: [f32; 2], angle: f32, scale: f32) -> [[f32; 4]; 4] {
    let (s, c) = angle.sin_cos();
    [
        [c * scale, s * scale, 0.0, 0.0],
        [-s * scale, c * scale, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [pos[0], pos[1], 0.0, 1.0],
    ]
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let config = AppConfig {
        title: "kiln sandbox".to_string(),
        width: 960,
        height: 640,
        gl_version: (3, 3),
        close_key: Some(Key::Escape),
        ..AppConfig::default()
    };

    let mut app = Application::new(Sandbox::default());
    app.init_desktop(config)?;
    app.run()?;
    Ok(())
}
