//! Demo components and a toy overlap test standing in for physics.

use kiln_engine::dispatch::CollisionWriter;
use kiln_engine::physics::Physics;
use kiln_engine::{ObjectHandle, Update, UpdateCtx, World};

/// Spins at a fixed angular speed (radians per second).
pub struct Rotator {
    pub angle: f32,
    pub speed: f32,
}

impl Update for Rotator {
    fn on_update(&mut self, ctx: &mut UpdateCtx<'_>) {
        self.angle = (self.angle + self.speed * ctx.dt) % std::f32::consts::TAU;
    }
}

/// Moves in a straight line and bounces off the edges of clip space.
pub struct Drifter {
    pub pos: [f32; 2],
    pub vel: [f32; 2],
}

impl Update for Drifter {
    fn on_update(&mut self, ctx: &mut UpdateCtx<'_>) {
        for axis in 0..2 {
            self.pos[axis] += self.vel[axis] * ctx.dt;
            if self.pos[axis].abs() > 0.9 {
                self.pos[axis] = self.pos[axis].clamp(-0.9, 0.9);
                self.vel[axis] = -self.vel[axis];
            }
        }
    }
}

/// Lights up for a moment after touching another object.
#[derive(Default)]
pub struct Flash {
    pub remaining: f32,
}

impl Flash {
    pub const DURATION: f32 = 0.3;
}

impl Update for Flash {
    fn on_update(&mut self, ctx: &mut UpdateCtx<'_>) {
        self.remaining = (self.remaining - ctx.dt).max(0.0);

        let hits = ctx.contacts().count();
        if hits > 0 {
            if self.remaining == 0.0 {
                ctx.commands
                    .add_event_log_entry(format!("{} touched {hits} object(s)", ctx.object));
            }
            self.remaining = Self::DURATION;
        }
    }
}

/// Tag for objects that never move. Stored, never updated.
pub struct StaticMarker {
    pub pos: [f32; 2],
}

/// Reports every pair of objects closer than `2 * radius`.
pub struct OverlapPhysics {
    pub radius: f32,
}

impl OverlapPhysics {
    fn positions(world: &World) -> Vec<(ObjectHandle, [f32; 2])> {
        world
            .view::<Drifter>()
            .map(|(h, d)| (h, d.pos))
            .chain(world.view::<StaticMarker>().map(|(h, m)| (h, m.pos)))
            .collect()
    }
}

impl Physics for OverlapPhysics {
    fn step(&mut self, world: &mut World, _dt: f32, collisions: &mut CollisionWriter<'_>) {
        let objects = Self::positions(world);
        let reach = (2.0 * self.radius).powi(2);

        for (i, (a, pa)) in objects.iter().enumerate() {
            for (b, pb) in &objects[i + 1..] {
                let (dx, dy) = (pa[0] - pb[0], pa[1] - pb[1]);
                if dx * dx + dy * dy < reach {
                    collisions.add(*a, *b);
                }
            }
        }
    }
}
