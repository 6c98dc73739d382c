use std::any::{type_name, TypeId};
use std::collections::HashMap;

use super::pool::{ErasedPool, Pool};
use super::ObjectHandle;

struct Slot {
    generation: u32,
    alive: bool,
}

/// Owner of every scene object and component.
///
/// There is no scheduling here: the frame loop walks the pools through the
/// update registry, strictly on the loop's thread.
#[derive(Default)]
pub struct World {
    slots: Vec<Slot>,
    free: Vec<u32>,
    pools: HashMap<TypeId, Box<dyn ErasedPool>>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty object.
    pub fn spawn(&mut self) -> ObjectHandle {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.alive = true;
            return ObjectHandle::new(index, slot.generation);
        }

        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            alive: true,
        });
        ObjectHandle::new(index, 0)
    }

    /// Destroys an object and drops all of its components.
    ///
    /// Returns `false` when the handle is stale.
    pub fn despawn(&mut self, handle: ObjectHandle) -> bool {
        if !self.is_alive(handle) {
            return false;
        }

        for pool in self.pools.values_mut() {
            pool.remove_owner(handle);
        }

        let slot = &mut self.slots[handle.index() as usize];
        slot.alive = false;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index());
        true
    }

    pub fn is_alive(&self, handle: ObjectHandle) -> bool {
        self.slots
            .get(handle.index() as usize)
            .is_some_and(|s| s.alive && s.generation == handle.generation())
    }

    /// Number of live objects.
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Creates the storage pool for `T` if it does not exist yet.
    pub fn register<T: 'static>(&mut self) {
        self.pools
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Box::new(Pool::<T>::default()));
    }

    pub fn is_registered<T: 'static>(&self) -> bool {
        self.pools.contains_key(&TypeId::of::<T>())
    }

    /// Attaches `component` to `owner`, replacing a previous `T`.
    ///
    /// Stale handles are rejected and the component is handed back.
    pub fn insert<T: 'static>(&mut self, owner: ObjectHandle, component: T) -> Result<Option<T>, T> {
        if !self.is_alive(owner) {
            log::warn!("insert of {} on stale object {owner}", type_name::<T>());
            return Err(component);
        }
        self.register::<T>();
        Ok(self.pool_mut::<T>().and_then(|p| p.insert(owner, component)))
    }

    pub fn remove<T: 'static>(&mut self, owner: ObjectHandle) -> Option<T> {
        self.pool_mut::<T>()?.take(owner)
    }

    pub fn get<T: 'static>(&self, owner: ObjectHandle) -> Option<&T> {
        self.pool::<T>()?.get(owner)
    }

    pub fn get_mut<T: 'static>(&mut self, owner: ObjectHandle) -> Option<&mut T> {
        self.pool_mut::<T>()?.get_mut(owner)
    }

    /// Count of live `T` components.
    pub fn count<T: 'static>(&self) -> usize {
        self.pools
            .get(&TypeId::of::<T>())
            .map_or(0, |p| p.len())
    }

    /// Iterates every live `T` with its owner.
    pub fn view<T: 'static>(&self) -> impl Iterator<Item = (ObjectHandle, &T)> {
        self.pool::<T>().into_iter().flat_map(|p| p.iter())
    }

    /// Mutable counterpart of [`World::view`].
    pub fn view_mut<T: 'static>(&mut self) -> impl Iterator<Item = (ObjectHandle, &mut T)> {
        self.pool_mut::<T>().into_iter().flat_map(|p| p.iter_mut())
    }

    fn pool<T: 'static>(&self) -> Option<&Pool<T>> {
        self.pools
            .get(&TypeId::of::<T>())
            .and_then(|p| p.as_any().downcast_ref::<Pool<T>>())
    }

    fn pool_mut<T: 'static>(&mut self) -> Option<&mut Pool<T>> {
        self.pools
            .get_mut(&TypeId::of::<T>())
            .and_then(|p| p.as_any_mut().downcast_mut::<Pool<T>>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Health(i32);

    #[derive(Debug, PartialEq)]
    struct Tag;

    #[test]
    fn spawn_insert_get() {
        let mut w = World::new();
        let a = w.spawn();
        w.insert(a, Health(10)).unwrap();

        assert_eq!(w.get::<Health>(a), Some(&Health(10)));
        assert_eq!(w.get::<Tag>(a), None);
        assert_eq!(w.count::<Health>(), 1);
    }

    #[test]
    fn despawn_drops_components_and_invalidates_handle() {
        let mut w = World::new();
        let a = w.spawn();
        w.insert(a, Health(1)).unwrap();
        w.insert(a, Tag).unwrap();

        assert!(w.despawn(a));
        assert!(!w.is_alive(a));
        assert_eq!(w.count::<Health>(), 0);
        assert_eq!(w.count::<Tag>(), 0);
        assert!(!w.despawn(a));
    }

    #[test]
    fn reused_slot_gets_new_generation() {
        let mut w = World::new();
        let a = w.spawn();
        w.despawn(a);
        let b = w.spawn();

        assert_eq!(a.index(), b.index());
        assert_ne!(a, b);
        assert!(w.insert(a, Tag).is_err());
    }

    #[test]
    fn view_mut_visits_every_instance() {
        let mut w = World::new();
        for i in 0..4 {
            let h = w.spawn();
            w.insert(h, Health(i)).unwrap();
        }

        for (_, hp) in w.view_mut::<Health>() {
            hp.0 += 100;
        }

        let mut values: Vec<i32> = w.view::<Health>().map(|(_, h)| h.0).collect();
        values.sort();
        assert_eq!(values, vec![100, 101, 102, 103]);
    }

    #[test]
    fn view_of_unregistered_type_is_empty() {
        let w = World::new();
        assert_eq!(w.view::<Tag>().count(), 0);
    }
}
