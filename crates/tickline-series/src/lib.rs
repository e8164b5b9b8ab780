//! Tickline Series - Data sources for the timeline
//!
//! This crate implements the data layer read by renderers and selection:
//! - Timestamped data series with range queries
//! - Cached windowed views bound to a query interval
//! - Duration entries and the constraint model used by range selection

pub mod duration;
pub mod series;
pub mod windowed;

pub use duration::*;
pub use series::*;
pub use windowed::*;
