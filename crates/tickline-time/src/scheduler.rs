//! Tick scheduler

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tickline_core::{TicklineError, TicklineResult};
use tracing::{debug, trace};

/// A component advanced once per tick
pub trait Updatable: Send + Sync {
    fn update(&self, elapsed_ns: i64);
}

#[derive(Default)]
struct SchedulerState {
    registered: Vec<Arc<dyn Updatable>>,
    tick_count: u64,
}

fn same_updatable(a: &Arc<dyn Updatable>, b: &Arc<dyn Updatable>) -> bool {
    // Compare data pointers only; vtables may be duplicated across units
    std::ptr::eq(
        Arc::as_ptr(a) as *const (),
        Arc::as_ptr(b) as *const (),
    )
}

/// Synchronous driver for time-based components.
///
/// Components update in registration order. Registration changes made
/// while a tick is running apply from the next tick.
#[derive(Clone, Default)]
pub struct TickScheduler {
    state: Arc<Mutex<SchedulerState>>,
}

impl TickScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a component; registering the same component twice is a no-op
    pub fn register(&self, updatable: Arc<dyn Updatable>) {
        let mut state = self.state.lock();
        if state
            .registered
            .iter()
            .any(|u| same_updatable(u, &updatable))
        {
            return;
        }
        state.registered.push(updatable);
        debug!(count = state.registered.len(), "updatable registered");
    }

    pub fn unregister(&self, updatable: &Arc<dyn Updatable>) -> TicklineResult<()> {
        let mut state = self.state.lock();
        let before = state.registered.len();
        state.registered.retain(|u| !same_updatable(u, updatable));
        if state.registered.len() == before {
            return Err(TicklineError::NotRegistered);
        }
        debug!(count = state.registered.len(), "updatable unregistered");
        Ok(())
    }

    /// Advance every registered component by `elapsed_ns`
    pub fn on_tick(&self, elapsed_ns: i64) {
        let registered = {
            let mut state = self.state.lock();
            state.tick_count += 1;
            state.registered.clone()
        };
        trace!(elapsed_ns, components = registered.len(), "tick");
        for updatable in registered {
            updatable.update(elapsed_ns);
        }
    }

    /// Drop every registration and restart the tick count
    pub fn reset(&self) {
        let mut state = self.state.lock();
        state.registered.clear();
        state.tick_count = 0;
    }

    pub fn len(&self) -> usize {
        self.state.lock().registered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().registered.is_empty()
    }

    pub fn tick_count(&self) -> u64 {
        self.state.lock().tick_count
    }
}

impl fmt::Debug for TickScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("TickScheduler")
            .field("registered", &state.registered.len())
            .field("tick_count", &state.tick_count)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Recording {
        name: &'static str,
        log: Arc<Mutex<Vec<(&'static str, i64)>>>,
    }

    impl Updatable for Recording {
        fn update(&self, elapsed_ns: i64) {
            self.log.lock().push((self.name, elapsed_ns));
        }
    }

    fn recording(name: &'static str, log: &Arc<Mutex<Vec<(&'static str, i64)>>>) -> Arc<dyn Updatable> {
        Arc::new(Recording {
            name,
            log: log.clone(),
        })
    }

    #[test]
    fn test_updates_in_registration_order() {
        let scheduler = TickScheduler::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        scheduler.register(recording("a", &log));
        scheduler.register(recording("b", &log));

        scheduler.on_tick(16);
        assert_eq!(*log.lock(), vec![("a", 16), ("b", 16)]);
        assert_eq!(scheduler.tick_count(), 1);
    }

    #[test]
    fn test_unregister() {
        let scheduler = TickScheduler::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        let a = recording("a", &log);
        scheduler.register(a.clone());
        scheduler.register(a.clone());
        assert_eq!(scheduler.len(), 1);

        scheduler.unregister(&a).unwrap();
        assert_eq!(scheduler.unregister(&a), Err(TicklineError::NotRegistered));

        scheduler.on_tick(5);
        assert!(log.lock().is_empty());
    }

    struct Registrar {
        scheduler: TickScheduler,
        late: Mutex<Option<Arc<dyn Updatable>>>,
    }

    impl Updatable for Registrar {
        fn update(&self, _elapsed_ns: i64) {
            if let Some(late) = self.late.lock().take() {
                self.scheduler.register(late);
            }
        }
    }

    #[test]
    fn test_register_during_tick_applies_next_tick() {
        let scheduler = TickScheduler::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        scheduler.register(Arc::new(Registrar {
            scheduler: scheduler.clone(),
            late: Mutex::new(Some(recording("late", &log))),
        }));

        scheduler.on_tick(1);
        assert!(log.lock().is_empty());
        scheduler.on_tick(2);
        assert_eq!(*log.lock(), vec![("late", 2)]);
    }

    #[test]
    fn test_reset() {
        let scheduler = TickScheduler::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        scheduler.register(recording("a", &log));
        scheduler.on_tick(1);
        scheduler.reset();
        assert!(scheduler.is_empty());
        assert_eq!(scheduler.tick_count(), 0);
    }
}
