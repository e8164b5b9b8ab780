//! End-to-end Dashboard Scenarios
//!
//! Flows that cross crate boundaries:
//! - Clock ticks driving the streaming timeline through the scheduler
//! - Range selection snapping to duration events on a live timeline
//! - Selection and timeline interplay (streaming, framing, batching)
//! - Observer lifetime across the whole stack

use parking_lot::Mutex;
use tickline_select::{SelectionEvent, SelectionListener};

/// Selection listener that records every event it receives
#[derive(Default)]
pub struct EventLog {
    events: Mutex<Vec<SelectionEvent>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<SelectionEvent> {
        self.events.lock().clone()
    }

    pub fn count(&self, event: SelectionEvent) -> usize {
        self.events.lock().iter().filter(|e| **e == event).count()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl SelectionListener for EventLog {
    fn selection_created(&self) {
        self.events.lock().push(SelectionEvent::Created);
    }

    fn selection_cleared(&self) {
        self.events.lock().push(SelectionEvent::Cleared);
    }

    fn selection_creation_failure(&self) {
        self.events.lock().push(SelectionEvent::CreationFailure);
    }
}
