//! Tickline Select - Range selection engine
//!
//! Resolves user selection requests against zero or more duration
//! constraints and reports the outcome through listener callbacks and the
//! `Selection` aspect, with optional batching of notifications.

pub mod selection;

pub use selection::*;
