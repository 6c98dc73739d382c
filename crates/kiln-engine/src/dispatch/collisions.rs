use crate::world::ObjectHandle;

/// Unordered pair of colliding objects.
///
/// Stored normalized (smaller handle first) so `(a, b)` and `(b, a)` compare
/// equal.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct CollisionPair {
    first: ObjectHandle,
    second: ObjectHandle,
}

impl CollisionPair {
    pub fn new(a: ObjectHandle, b: ObjectHandle) -> Self {
        if a <= b {
            Self { first: a, second: b }
        } else {
            Self { first: b, second: a }
        }
    }

    pub fn first(&self) -> ObjectHandle {
        self.first
    }

    pub fn second(&self) -> ObjectHandle {
        self.second
    }

    pub fn involves(&self, object: ObjectHandle) -> bool {
        self.first == object || self.second == object
    }

    /// The partner of `object` in this pair, if `object` takes part in it.
    pub fn other(&self, object: ObjectHandle) -> Option<ObjectHandle> {
        if self.first == object {
            Some(self.second)
        } else if self.second == object {
            Some(self.first)
        } else {
            None
        }
    }
}

/// Two-slot collision list.
///
/// Physics writes the *filling* slot; update code reads the *draining* slot.
/// [`CollisionBuffers::swap`] is called exactly once per frame, after physics
/// and before the first update callback, so update code always sees the
/// complete result of the physics pass that ran earlier in the same frame and
/// never a partially filled list.
#[derive(Debug, Default)]
pub struct CollisionBuffers {
    filling: Vec<CollisionPair>,
    draining: Vec<CollisionPair>,
}

impl CollisionBuffers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a pair into the filling slot. Self-pairs are dropped.
    pub fn push(&mut self, a: ObjectHandle, b: ObjectHandle) {
        if a == b {
            log::debug!("ignoring self-collision of {a}");
            return;
        }
        self.filling.push(CollisionPair::new(a, b));
    }

    pub fn writer(&mut self) -> CollisionWriter<'_> {
        CollisionWriter { buffers: self }
    }

    /// Publishes the filling slot and starts an empty one.
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.filling, &mut self.draining);
        self.filling.clear();
    }

    /// Pairs published by the last swap.
    pub fn draining(&self) -> &[CollisionPair] {
        &self.draining
    }

    /// Pairs queued since the last swap.
    pub fn pending(&self) -> &[CollisionPair] {
        &self.filling
    }
}

/// Write-only view of the filling slot handed to physics.
pub struct CollisionWriter<'a> {
    buffers: &'a mut CollisionBuffers,
}

impl CollisionWriter<'_> {
    pub fn add(&mut self, a: ObjectHandle, b: ObjectHandle) {
        self.buffers.push(a, b);
    }

    pub fn len(&self) -> usize {
        self.buffers.filling.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffers.filling.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::World;

    #[test]
    fn pair_is_unordered() {
        let mut w = World::new();
        let (a, b) = (w.spawn(), w.spawn());
        assert_eq!(CollisionPair::new(a, b), CollisionPair::new(b, a));
        assert_eq!(CollisionPair::new(b, a).other(a), Some(b));
    }

    #[test]
    fn pushes_are_invisible_until_swap() {
        let mut w = World::new();
        let (a, b) = (w.spawn(), w.spawn());
        let mut buf = CollisionBuffers::new();

        buf.writer().add(a, b);
        assert!(buf.draining().is_empty());
        assert_eq!(buf.pending().len(), 1);

        buf.swap();
        assert_eq!(buf.draining(), &[CollisionPair::new(a, b)]);
        assert!(buf.pending().is_empty());
    }

    #[test]
    fn swap_replaces_previous_frame_entirely() {
        let mut w = World::new();
        let (a, b, c) = (w.spawn(), w.spawn(), w.spawn());
        let mut buf = CollisionBuffers::new();

        buf.push(a, b);
        buf.swap();
        buf.push(b, c);
        buf.swap();

        assert_eq!(buf.draining(), &[CollisionPair::new(b, c)]);

        buf.swap();
        assert!(buf.draining().is_empty());
    }

    #[test]
    fn self_pairs_are_dropped() {
        let mut w = World::new();
        let a = w.spawn();
        let mut buf = CollisionBuffers::new();
        buf.push(a, a);
        assert!(buf.pending().is_empty());
    }
}
