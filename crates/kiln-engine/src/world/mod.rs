//! Object model.
//!
//! Objects are plain handles; data lives in one pool per component type.
//! Pools are created on registration (or lazily on first insert) and iterated
//! by the update dispatch registry once per frame.

mod handle;
mod pool;
mod store;

pub use handle::ObjectHandle;
pub use store::World;
