//! Range selection engine
//!
//! The selection interval is shared with the rest of the dashboard and may
//! be mutated directly; the engine observes it, so `Created` / `Cleared`
//! events are derived from what the interval actually did, whichever path
//! changed it.
//!
//! Batching: between `begin_update` and the matching `end_update` nothing
//! is delivered. The outermost `end_update` reports the net change against
//! the selection at `begin_update`; the `Selection` aspect fires at most once.

use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tickline_core::{Aspect, Interval, Notifier, Observer, Span, TicklineError, TicklineResult};
use tickline_series::{EntryRef, SelectionConstraint};
use tracing::debug;

/// Selection model aspects
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionAspect {
    /// The selection value changed
    Selection,
}

impl Aspect for SelectionAspect {}

/// Outcome reported to selection listeners
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionEvent {
    Created,
    Cleared,
    CreationFailure,
}

/// Callbacks for selection outcomes
pub trait SelectionListener: Send + Sync {
    fn selection_created(&self) {}

    fn selection_cleared(&self) {}

    fn selection_creation_failure(&self) {}
}

/// Constraint registration handle
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConstraintId(pub u64);

/// Listener registration handle
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

type Listeners = Vec<(ListenerId, Arc<dyn SelectionListener>)>;

struct SelectionState {
    constraints: Vec<(ConstraintId, Arc<dyn SelectionConstraint>)>,
    active: Option<(ConstraintId, EntryRef)>,
    listeners: Listeners,
    batch_depth: u32,
    pending_event: Option<SelectionEvent>,
    pending_selection: bool,
    batch_start: Span,
    last: Span,
    enabled: bool,
    next_id: u64,
}

impl SelectionState {
    fn allocate_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

enum Outcome {
    Apply(Span),
    Clear,
    Failure,
}

struct EngineInner {
    selection: Interval,
    state: Mutex<SelectionState>,
    notifier: Notifier<SelectionAspect>,
    observer: Observer,
}

/// Range selection engine handle
#[derive(Clone)]
pub struct RangeSelectionEngine {
    inner: Arc<EngineInner>,
}

fn same_value(a: &Span, b: &Span) -> bool {
    (a.is_empty() && b.is_empty()) || a == b
}

fn dispatch(listeners: &Listeners, event: SelectionEvent) {
    for (_, listener) in listeners {
        match event {
            SelectionEvent::Created => listener.selection_created(),
            SelectionEvent::Cleared => listener.selection_cleared(),
            SelectionEvent::CreationFailure => listener.selection_creation_failure(),
        }
    }
}

impl EngineInner {
    /// Reacts to any mutation of the shared selection interval
    fn selection_changed(&self) {
        let current = self.selection.snapshot();

        let (event, listeners) = {
            let mut state = self.state.lock();
            let previous = state.last;
            if same_value(&previous, &current) {
                return;
            }
            state.last = current;

            let event = match (previous.is_empty(), current.is_empty()) {
                (true, false) => Some(SelectionEvent::Created),
                (false, true) => Some(SelectionEvent::Cleared),
                _ => None,
            };
            if current.is_empty() {
                state.active = None;
            }

            if state.batch_depth > 0 {
                if event.is_some() {
                    state.pending_event = event;
                }
                state.pending_selection = true;
                return;
            }
            (event, state.listeners.clone())
        };

        self.notifier.fire(SelectionAspect::Selection);
        if let Some(event) = event {
            debug!(?event, selection = %current, "selection event");
            dispatch(&listeners, event);
        }
    }

    fn emit(&self, event: SelectionEvent) {
        let listeners = {
            let mut state = self.state.lock();
            if state.batch_depth > 0 {
                state.pending_event = Some(event);
                return;
            }
            state.listeners.clone()
        };
        debug!(?event, "selection event");
        dispatch(&listeners, event);
    }
}

impl RangeSelectionEngine {
    /// Create an engine driving the shared `selection` interval
    pub fn new(selection: Interval) -> Self {
        let last = selection.snapshot();
        let inner = Arc::new(EngineInner {
            selection,
            state: Mutex::new(SelectionState {
                constraints: Vec::new(),
                active: None,
                listeners: Vec::new(),
                batch_depth: 0,
                pending_event: None,
                pending_selection: false,
                batch_start: last,
                last,
                enabled: true,
                next_id: 0,
            }),
            notifier: Notifier::new(),
            observer: Observer::new(),
        });

        let weak: Weak<EngineInner> = Arc::downgrade(&inner);
        inner.selection.on_change(&inner.observer, move || {
            if let Some(inner) = weak.upgrade() {
                inner.selection_changed();
            }
        });

        RangeSelectionEngine { inner }
    }

    pub fn selection(&self) -> &Interval {
        &self.inner.selection
    }

    /// Request a selection of `[lo, hi]` (bounds in any order)
    pub fn set(&self, lo: f64, hi: f64) {
        let request = Span::new(lo, hi);

        let (constraints, active) = {
            let state = self.inner.state.lock();
            if !state.enabled {
                return;
            }
            (state.constraints.clone(), state.active)
        };

        let outcome = if constraints.is_empty() {
            Outcome::Apply(request)
        } else if request.is_empty() {
            Outcome::Clear
        } else {
            self.resolve(&constraints, active, request)
        };

        match outcome {
            Outcome::Apply(span) => self.inner.selection.set_span(span),
            Outcome::Clear => {
                self.inner.state.lock().active = None;
                self.inner.selection.clear();
            }
            Outcome::Failure => {
                self.inner.state.lock().active = None;
                self.inner.selection.clear();
                self.inner.emit(SelectionEvent::CreationFailure);
            }
        }
    }

    fn resolve(
        &self,
        constraints: &[(ConstraintId, Arc<dyn SelectionConstraint>)],
        active: Option<(ConstraintId, EntryRef)>,
        request: Span,
    ) -> Outcome {
        for (id, constraint) in constraints {
            let prefer = active.filter(|(owner, _)| owner == id).map(|(_, entry)| entry);
            let Some(resolution) =
                constraint.find_intersecting(request.min, request.max, prefer.as_ref())
            else {
                continue;
            };

            if !resolution.selectable {
                return Outcome::Failure;
            }
            self.inner.state.lock().active = Some((*id, resolution.entry));
            return Outcome::Apply(resolution.covered);
        }
        Outcome::Clear
    }

    /// Empty the selection and forget the active constraint entry
    pub fn clear(&self) {
        self.inner.state.lock().active = None;
        self.inner.selection.clear();
    }

    /// Start buffering notifications
    pub fn begin_update(&self) {
        let mut state = self.inner.state.lock();
        if state.batch_depth == 0 {
            state.batch_start = state.last;
        }
        state.batch_depth += 1;
    }

    /// Stop buffering; the outermost call delivers the net effect of the
    /// batch, measured against the selection before `begin_update`
    pub fn end_update(&self) {
        let (events, fire_selection, listeners) = {
            let mut state = self.inner.state.lock();
            if state.batch_depth == 0 {
                return;
            }
            state.batch_depth -= 1;
            if state.batch_depth > 0 {
                return;
            }

            let start = state.batch_start;
            let end = state.last;
            let touched = std::mem::take(&mut state.pending_selection);
            let pending = state.pending_event.take();

            let mut events = Vec::with_capacity(2);
            match (start.is_empty(), end.is_empty()) {
                (true, false) => events.push(SelectionEvent::Created),
                (false, true) => events.push(SelectionEvent::Cleared),
                _ => {}
            }
            if pending == Some(SelectionEvent::CreationFailure) {
                events.push(SelectionEvent::CreationFailure);
            }
            (
                events,
                touched && !same_value(&start, &end),
                state.listeners.clone(),
            )
        };

        if fire_selection {
            self.inner.notifier.fire(SelectionAspect::Selection);
        }
        for event in events {
            debug!(?event, "selection event (batched)");
            dispatch(&listeners, event);
        }
    }

    pub fn is_updating(&self) -> bool {
        self.inner.state.lock().batch_depth > 0
    }

    /// Read-only probe: could `range` produce a selection?
    pub fn can_select_range(&self, range: Span) -> bool {
        let constraints = self.inner.state.lock().constraints.clone();
        constraints.is_empty()
            || constraints
                .iter()
                .any(|(_, c)| c.any_selectable(range.min, range.max))
    }

    pub fn add_constraint(&self, constraint: Arc<dyn SelectionConstraint>) -> ConstraintId {
        let mut state = self.inner.state.lock();
        let id = ConstraintId(state.allocate_id());
        state.constraints.push((id, constraint));
        id
    }

    pub fn remove_constraint(&self, id: ConstraintId) -> TicklineResult<()> {
        let mut state = self.inner.state.lock();
        let before = state.constraints.len();
        state.constraints.retain(|(cid, _)| *cid != id);
        if state.constraints.len() == before {
            return Err(TicklineError::UnknownConstraint(id.0));
        }
        if matches!(state.active, Some((owner, _)) if owner == id) {
            state.active = None;
        }
        Ok(())
    }

    pub fn clear_constraints(&self) {
        let mut state = self.inner.state.lock();
        state.constraints.clear();
        state.active = None;
    }

    pub fn constraint_count(&self) -> usize {
        self.inner.state.lock().constraints.len()
    }

    /// Entry the current selection is attached to, if any
    pub fn active_entry(&self) -> Option<EntryRef> {
        self.inner.state.lock().active.map(|(_, entry)| entry)
    }

    pub fn add_listener(&self, listener: Arc<dyn SelectionListener>) -> ListenerId {
        let mut state = self.inner.state.lock();
        let id = ListenerId(state.allocate_id());
        state.listeners.push((id, listener));
        id
    }

    pub fn remove_listener(&self, id: ListenerId) -> TicklineResult<()> {
        let mut state = self.inner.state.lock();
        let before = state.listeners.len();
        state.listeners.retain(|(lid, _)| *lid != id);
        if state.listeners.len() == before {
            return Err(TicklineError::UnknownListener(id.0));
        }
        Ok(())
    }

    /// A disabled engine ignores `set`
    pub fn set_selection_enabled(&self, enabled: bool) {
        self.inner.state.lock().enabled = enabled;
    }

    pub fn is_selection_enabled(&self) -> bool {
        self.inner.state.lock().enabled
    }

    pub fn subscribe<F>(&self, observer: &Observer, aspect: SelectionAspect, handler: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.inner.notifier.subscribe(observer, aspect, handler);
    }

    pub fn unsubscribe_all(&self, observer: &Observer) {
        self.inner.notifier.unsubscribe_all(observer);
    }
}

impl fmt::Debug for RangeSelectionEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.lock();
        f.debug_struct("RangeSelectionEngine")
            .field("selection", &self.inner.selection)
            .field("constraints", &state.constraints.len())
            .field("batch_depth", &state.batch_depth)
            .finish()
    }
}
