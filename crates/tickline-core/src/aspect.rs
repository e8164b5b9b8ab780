//! Keyed change notification
//!
//! Every model in Tickline reports mutation through a [`Notifier`] keyed by a
//! small per-model enumeration (an [`Aspect`]). Consumers register handlers
//! under an [`Observer`]; the observer owns its registrations and detaches
//! all of them when dropped.
//!
//! Handlers are invoked synchronously, in the order their observers first
//! subscribed. No lock is held while a handler runs, so a handler may
//! subscribe, unsubscribe, or trigger further notifications.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

/// A notification topic scoped to one model type
pub trait Aspect: Copy + Eq + fmt::Debug + Send + Sync + 'static {}

type Handler = Arc<dyn Fn() + Send + Sync>;

/// Observer identity
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObserverId(pub u64);

impl fmt::Debug for ObserverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Observer({})", self.0)
    }
}

static NEXT_OBSERVER: AtomicU64 = AtomicU64::new(1);

/// Anything an observer can be detached from
trait Detach: Send + Sync {
    fn detach(&self, observer: ObserverId);
}

/// Owner of a set of subscriptions.
///
/// Dropping the observer unsubscribes it from every notifier it was
/// registered with.
pub struct Observer {
    id: ObserverId,
    attached: Mutex<Vec<Weak<dyn Detach>>>,
}

impl Observer {
    pub fn new() -> Self {
        Observer {
            id: ObserverId(NEXT_OBSERVER.fetch_add(1, Ordering::Relaxed)),
            attached: Mutex::new(Vec::new()),
        }
    }

    pub fn id(&self) -> ObserverId {
        self.id
    }

    /// Detach from every notifier this observer subscribed to
    pub fn detach_all(&self) {
        let attached = std::mem::take(&mut *self.attached.lock());
        for registry in attached {
            if let Some(registry) = registry.upgrade() {
                registry.detach(self.id);
            }
        }
    }

    fn track(&self, registry: Weak<dyn Detach>) {
        let mut attached = self.attached.lock();
        attached.retain(|w| w.strong_count() > 0);
        if !attached.iter().any(|w| Weak::ptr_eq(w, &registry)) {
            attached.push(registry);
        }
    }
}

impl Default for Observer {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Observer {
    fn drop(&mut self) {
        self.detach_all();
    }
}

impl fmt::Debug for Observer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observer").field("id", &self.id).finish()
    }
}

struct Registration<A> {
    observer: ObserverId,
    handlers: Vec<(A, Handler)>,
}

struct Registry<A> {
    entries: Mutex<Vec<Registration<A>>>,
}

impl<A: Aspect> Detach for Registry<A> {
    fn detach(&self, observer: ObserverId) {
        self.entries.lock().retain(|r| r.observer != observer);
    }
}

/// Keyed publish-subscribe channel
pub struct Notifier<A: Aspect> {
    registry: Arc<Registry<A>>,
}

impl<A: Aspect> Notifier<A> {
    pub fn new() -> Self {
        Notifier {
            registry: Arc::new(Registry {
                entries: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Register `handler` for `aspect` under `observer`.
    ///
    /// An observer holds at most one handler per aspect; subscribing again
    /// replaces the previous handler without changing delivery order.
    pub fn subscribe<F>(&self, observer: &Observer, aspect: A, handler: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        let handler: Handler = Arc::new(handler);
        {
            let mut entries = self.registry.entries.lock();
            match entries.iter_mut().find(|r| r.observer == observer.id) {
                Some(registration) => {
                    match registration.handlers.iter_mut().find(|(a, _)| *a == aspect) {
                        Some(slot) => slot.1 = handler,
                        None => registration.handlers.push((aspect, handler)),
                    }
                }
                None => entries.push(Registration {
                    observer: observer.id,
                    handlers: vec![(aspect, handler)],
                }),
            }
        }

        let registry: Arc<dyn Detach> = self.registry.clone();
        observer.track(Arc::downgrade(&registry));
    }

    /// Remove every handler registered by `observer`
    pub fn unsubscribe_all(&self, observer: &Observer) {
        self.registry.detach(observer.id);
    }

    /// Invoke every handler registered for `aspect`, in subscription order
    pub fn fire(&self, aspect: A) {
        let handlers: Vec<Handler> = self
            .registry
            .entries
            .lock()
            .iter()
            .filter_map(|r| {
                r.handlers
                    .iter()
                    .find(|(a, _)| *a == aspect)
                    .map(|(_, h)| h.clone())
            })
            .collect();

        for handler in handlers {
            handler();
        }
    }

    /// Number of observers currently registered
    pub fn observer_count(&self) -> usize {
        self.registry.entries.lock().len()
    }
}

impl<A: Aspect> Default for Notifier<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Aspect> fmt::Debug for Notifier<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notifier")
            .field("observers", &self.observer_count())
            .finish()
    }
}
