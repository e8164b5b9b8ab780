//! Tickline Core - Fundamental types for the timeline engine
//!
//! This crate defines the building blocks shared by every other crate:
//! - Span / Interval: numeric ranges with change notification
//! - Aspect / Notifier / Observer: keyed publish-subscribe
//! - Time unit conversion between nanosecond clocks and microsecond views
//! - Error types

pub mod aspect;
pub mod error;
pub mod interval;
pub mod time;

pub use aspect::*;
pub use error::*;
pub use interval::*;
pub use time::*;
