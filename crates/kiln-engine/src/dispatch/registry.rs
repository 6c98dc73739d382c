use std::any::{type_name, TypeId};

use crate::input::InputState;
use crate::profiling::Profiler;
use crate::world::{ObjectHandle, World};

use super::{CollisionPair, FrameCommands};

/// Per-frame behaviour of a component type.
///
/// Only types implementing this trait can be passed to
/// [`UpdateRegistry::register`]; plain data components are stored in the
/// world but never dispatched.
pub trait Update: 'static {
    fn on_update(&mut self, ctx: &mut UpdateCtx<'_>);
}

/// Frame-wide values shared by every callback of a frame.
#[derive(Clone, Copy)]
pub struct FrameInputs<'a> {
    /// Scaled time delta in seconds.
    pub dt: f32,
    /// Pairs published by this frame's physics pass.
    pub collisions: &'a [CollisionPair],
    pub input: &'a InputState,
}

/// Context handed to [`Update::on_update`] for one component instance.
pub struct UpdateCtx<'a> {
    pub dt: f32,
    /// Object owning the component being updated.
    pub object: ObjectHandle,
    pub collisions: &'a [CollisionPair],
    pub input: &'a InputState,
    pub commands: &'a mut FrameCommands,
}

impl UpdateCtx<'_> {
    /// Objects this object collided with in the current physics pass.
    pub fn contacts(&self) -> impl Iterator<Item = ObjectHandle> + '_ {
        let me = self.object;
        self.collisions.iter().filter_map(move |p| p.other(me))
    }
}

type UpdateFn = Box<dyn FnMut(&mut World, &FrameInputs<'_>, &mut FrameCommands)>;

struct UpdateCallback {
    type_id: TypeId,
    type_name: &'static str,
    run: UpdateFn,
}

/// Append-only registry of update callbacks.
///
/// Invocation order equals registration order for the lifetime of the
/// registry. There is no unregistration.
#[derive(Default)]
pub struct UpdateRegistry {
    callbacks: Vec<UpdateCallback>,
}

impl UpdateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the update callback for `T`.
    ///
    /// A second registration of the same type is ignored so that instances are
    /// never updated twice per frame. Returns whether a callback was added.
    pub fn register<T: Update>(&mut self) -> bool {
        let type_id = TypeId::of::<T>();
        if self.callbacks.iter().any(|c| c.type_id == type_id) {
            log::warn!("update for {} is already registered", type_name::<T>());
            return false;
        }

        let run: UpdateFn = Box::new(|world: &mut World, frame: &FrameInputs<'_>, commands: &mut FrameCommands| {
            for (object, component) in world.view_mut::<T>() {
                let mut ctx = UpdateCtx {
                    dt: frame.dt,
                    object,
                    collisions: frame.collisions,
                    input: frame.input,
                    commands: &mut *commands,
                };
                component.on_update(&mut ctx);
            }
        });

        self.callbacks.push(UpdateCallback {
            type_id,
            type_name: type_name::<T>(),
            run,
        });
        log::debug!("registered update for {}", type_name::<T>());
        true
    }

    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }

    pub fn is_registered<T: Update>(&self) -> bool {
        let id = TypeId::of::<T>();
        self.callbacks.iter().any(|c| c.type_id == id)
    }

    /// Registered type names in invocation order.
    pub fn type_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.callbacks.iter().map(|c| c.type_name)
    }

    /// Runs every callback in registration order, each under its own profiler
    /// scope.
    pub fn invoke_all(
        &mut self,
        world: &mut World,
        frame: &FrameInputs<'_>,
        commands: &mut FrameCommands,
        profiler: &mut Profiler,
    ) {
        for cb in &mut self.callbacks {
            let run = &mut cb.run;
            profiler.measure(cb.type_name, || run(world, frame, commands));
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::dispatch::CollisionBuffers;

    type Log = Rc<RefCell<Vec<String>>>;

    #[derive(Debug)]
    struct Rotator {
        angle: f32,
        log: Log,
    }

    impl Update for Rotator {
        fn on_update(&mut self, ctx: &mut UpdateCtx<'_>) {
            self.angle += ctx.dt;
            self.log.borrow_mut().push(format!("rotator {}", ctx.object));
        }
    }

    #[derive(Debug)]
    struct Spinner {
        log: Log,
    }

    impl Update for Spinner {
        fn on_update(&mut self, _ctx: &mut UpdateCtx<'_>) {
            self.log.borrow_mut().push("spinner".into());
        }
    }

    #[derive(Debug)]
    struct StaticMarker;

    #[derive(Debug)]
    struct ContactWatcher {
        seen: Rc<RefCell<Vec<ObjectHandle>>>,
    }

    impl Update for ContactWatcher {
        fn on_update(&mut self, ctx: &mut UpdateCtx<'_>) {
            self.seen.borrow_mut().extend(ctx.contacts());
        }
    }

    fn run_frame(reg: &mut UpdateRegistry, world: &mut World, dt: f32) -> FrameCommands {
        let input = InputState::default();
        let frame = FrameInputs {
            dt,
            collisions: &[],
            input: &input,
        };
        let mut commands = FrameCommands::default();
        reg.invoke_all(world, &frame, &mut commands, &mut Profiler::default());
        commands
    }

    #[test]
    fn invocation_follows_registration_order() {
        let log: Log = Rc::default();
        let mut world = World::new();
        let a = world.spawn();
        world.insert(a, Spinner { log: log.clone() }).unwrap();
        world.insert(a, Rotator { angle: 0.0, log: log.clone() }).unwrap();

        let mut reg = UpdateRegistry::new();
        reg.register::<Spinner>();
        reg.register::<Rotator>();

        for _ in 0..3 {
            run_frame(&mut reg, &mut world, 0.1);
        }

        let expected: Vec<String> = (0..3)
            .flat_map(|_| ["spinner".to_string(), format!("rotator {a}")])
            .collect();
        assert_eq!(*log.borrow(), expected);
        assert_eq!(reg.type_names().count(), 2);
    }

    #[test]
    fn every_live_instance_is_updated_with_dt() {
        let log: Log = Rc::default();
        let mut world = World::new();
        let handles: Vec<_> = (0..3).map(|_| world.spawn()).collect();
        for &h in &handles {
            world.insert(h, Rotator { angle: 0.0, log: log.clone() }).unwrap();
            world.insert(h, StaticMarker).unwrap();
        }

        let mut reg = UpdateRegistry::new();
        reg.register::<Rotator>();
        run_frame(&mut reg, &mut world, 0.25);

        assert_eq!(reg.len(), 1);
        assert_eq!(log.borrow().len(), 3);
        for &h in &handles {
            assert_eq!(world.get::<Rotator>(h).unwrap().angle, 0.25);
        }
    }

    #[test]
    fn duplicate_registration_is_ignored() {
        let mut reg = UpdateRegistry::new();
        assert!(reg.register::<Spinner>());
        assert!(!reg.register::<Spinner>());
        assert_eq!(reg.len(), 1);
        assert!(reg.is_registered::<Spinner>());
        assert!(!reg.is_registered::<Rotator>());
    }

    #[test]
    fn contacts_come_from_published_buffer() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut world = World::new();
        let (a, b) = (world.spawn(), world.spawn());
        world.insert(a, ContactWatcher { seen: seen.clone() }).unwrap();

        let mut buffers = CollisionBuffers::new();
        buffers.push(b, a);
        buffers.swap();

        let mut reg = UpdateRegistry::new();
        reg.register::<ContactWatcher>();
        let input = InputState::default();
        let frame = FrameInputs {
            dt: 0.0,
            collisions: buffers.draining(),
            input: &input,
        };
        reg.invoke_all(&mut world, &frame, &mut FrameCommands::default(), &mut Profiler::default());

        assert_eq!(*seen.borrow(), vec![b]);
    }

    #[test]
    fn callbacks_are_profiled_by_type_name() {
        let mut world = World::new();
        let mut reg = UpdateRegistry::new();
        reg.register::<Spinner>();

        let mut profiler = Profiler::default();
        let input = InputState::default();
        let frame = FrameInputs { dt: 0.0, collisions: &[], input: &input };
        reg.invoke_all(&mut world, &frame, &mut FrameCommands::default(), &mut profiler);

        assert_eq!(profiler.scope(type_name::<Spinner>()).unwrap().calls, 1);
    }
}
