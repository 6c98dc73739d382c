use std::any::Any;
use std::collections::HashMap;

use super::ObjectHandle;

/// Dense storage for one component type.
///
/// Components are packed in a `Vec` for iteration; `slots` maps a handle to
/// its dense index. Removal is swap-remove, so iteration order is not stable
/// across despawns.
pub(crate) struct Pool<T> {
    items: Vec<(ObjectHandle, T)>,
    slots: HashMap<ObjectHandle, usize>,
}

impl<T> Default for Pool<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            slots: HashMap::new(),
        }
    }
}

impl<T: 'static> Pool<T> {
    /// Inserts or replaces the component of `owner`. Returns the previous one.
    pub fn insert(&mut self, owner: ObjectHandle, value: T) -> Option<T> {
        if let Some(&i) = self.slots.get(&owner) {
            return Some(std::mem::replace(&mut self.items[i].1, value));
        }
        self.slots.insert(owner, self.items.len());
        self.items.push((owner, value));
        None
    }

    pub fn take(&mut self, owner: ObjectHandle) -> Option<T> {
        let i = self.slots.remove(&owner)?;
        let (_, value) = self.items.swap_remove(i);
        if let Some((moved, _)) = self.items.get(i) {
            self.slots.insert(*moved, i);
        }
        Some(value)
    }

    pub fn get(&self, owner: ObjectHandle) -> Option<&T> {
        self.slots.get(&owner).map(|&i| &self.items[i].1)
    }

    pub fn get_mut(&mut self, owner: ObjectHandle) -> Option<&mut T> {
        let i = *self.slots.get(&owner)?;
        Some(&mut self.items[i].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ObjectHandle, &T)> {
        self.items.iter().map(|(h, v)| (*h, v))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (ObjectHandle, &mut T)> {
        self.items.iter_mut().map(|(h, v)| (*h, v))
    }
}

/// Type-erased pool interface used by `World` for bookkeeping that does not
/// need the concrete component type.
pub(crate) trait ErasedPool {
    fn remove_owner(&mut self, owner: ObjectHandle);
    fn len(&self) -> usize;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: 'static> ErasedPool for Pool<T> {
    fn remove_owner(&mut self, owner: ObjectHandle) {
        let _ = self.take(owner);
    }

    fn len(&self) -> usize {
        self.items.len()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
