//! Physics seam.
//!
//! The engine does not simulate anything itself. A [`Physics`] implementation
//! runs once per frame before any update callback and reports contacts
//! through the [`CollisionWriter`] it is given.

use crate::dispatch::CollisionWriter;
use crate::world::World;

pub trait Physics {
    /// Advances the simulation by `dt` seconds (already scaled, 0 when paused).
    fn step(&mut self, world: &mut World, dt: f32, collisions: &mut CollisionWriter<'_>);
}

/// Reports no contacts.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoPhysics;

impl Physics for NoPhysics {
    fn step(&mut self, _world: &mut World, _dt: f32, _collisions: &mut CollisionWriter<'_>) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::{CollisionBuffers, CollisionPair};

    /// Reports every pair of objects as touching.
    struct Everything;

    impl Physics for Everything {
        fn step(&mut self, world: &mut World, _dt: f32, out: &mut CollisionWriter<'_>) {
            let objects: Vec<_> = world.view::<u8>().map(|(h, _)| h).collect();
            for (i, a) in objects.iter().enumerate() {
                for b in &objects[i + 1..] {
                    out.add(*a, *b);
                }
            }
        }
    }

    #[test]
    fn implementations_write_through_the_writer() {
        let mut world = World::new();
        let (a, b) = (world.spawn(), world.spawn());
        world.insert(a, 0u8).ok();
        world.insert(b, 0u8).ok();
        let mut buffers = CollisionBuffers::new();

        Everything.step(&mut world, 0.016, &mut buffers.writer());
        buffers.swap();

        assert_eq!(buffers.draining(), &[CollisionPair::new(a, b)]);
    }

    #[test]
    fn no_physics_reports_nothing() {
        let mut world = World::new();
        let mut buffers = CollisionBuffers::new();
        NoPhysics.step(&mut world, 1.0, &mut buffers.writer());
        assert!(buffers.pending().is_empty());
    }
}
