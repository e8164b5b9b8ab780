//! Tickline Test Harness - Simulated dashboards
//!
//! This crate provides:
//! - A dashboard simulator wiring clock, scheduler, timeline, event series
//!   and range selection together
//! - Frame timing models with seeded jitter
//! - Tracing setup for tests
//! - End-to-end dashboard scenarios

pub mod logging;
pub mod scenarios;
pub mod simulator;

pub use logging::*;
pub use scenarios::*;
pub use simulator::*;
