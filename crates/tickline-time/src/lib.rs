//! Tickline Time - Tick-driven timeline control
//!
//! This crate implements the time side of the dashboard:
//! - Tick scheduler calling every registered component once per tick
//! - Clock sources (manual and wall-clock) that push ticks
//! - View animation for smooth navigation
//! - Streaming timeline: data/view intervals, streaming, zoom, pan, frame

pub mod animation;
pub mod clock;
pub mod scheduler;
pub mod timeline;

pub use animation::*;
pub use clock::*;
pub use scheduler::*;
pub use timeline::*;
