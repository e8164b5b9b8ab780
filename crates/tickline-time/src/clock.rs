//! Clock sources for the tick scheduler
//!
//! A clock source owns no timeline state; it only measures elapsed time and
//! pushes it into a [`TickScheduler`].

use std::time::{Duration, Instant};

use tickline_core::{duration_to_ns, NANOS_PER_SEC};
use tracing::debug;

use crate::TickScheduler;

/// Manual clock: every tick carries the elapsed time given by the caller
pub struct FakeTimer {
    scheduler: TickScheduler,
    now_ns: i64,
}

impl FakeTimer {
    pub const ONE_SECOND_IN_NS: i64 = NANOS_PER_SEC;

    pub fn new(scheduler: TickScheduler) -> Self {
        FakeTimer {
            scheduler,
            now_ns: 0,
        }
    }

    /// Push one tick of `elapsed_ns`
    pub fn tick(&mut self, elapsed_ns: i64) {
        self.now_ns = self.now_ns.saturating_add(elapsed_ns);
        self.scheduler.on_tick(elapsed_ns);
    }

    /// Total time pushed so far
    pub fn now_ns(&self) -> i64 {
        self.now_ns
    }

    pub fn scheduler(&self) -> &TickScheduler {
        &self.scheduler
    }
}

/// Wall-clock source configuration
#[derive(Clone, Debug, Default)]
pub struct StopwatchConfig {
    /// Upper bound on a single forwarded delta (e.g. after a system sleep).
    /// `None` forwards deltas unchanged.
    pub max_frame_delta: Option<Duration>,
}

impl StopwatchConfig {
    /// Clamp frame deltas to 100ms
    pub fn clamped() -> Self {
        StopwatchConfig {
            max_frame_delta: Some(Duration::from_millis(100)),
        }
    }
}

/// Wall-clock source: each tick forwards the time since the previous one
pub struct StopwatchTimer {
    scheduler: TickScheduler,
    config: StopwatchConfig,
    last: Option<Instant>,
}

impl StopwatchTimer {
    pub fn new(scheduler: TickScheduler) -> Self {
        Self::with_config(scheduler, StopwatchConfig::default())
    }

    pub fn with_config(scheduler: TickScheduler, config: StopwatchConfig) -> Self {
        StopwatchTimer {
            scheduler,
            config,
            last: None,
        }
    }

    pub fn start(&mut self) {
        if self.last.is_none() {
            self.last = Some(Instant::now());
            debug!("stopwatch started");
        }
    }

    pub fn stop(&mut self) {
        if self.last.take().is_some() {
            debug!("stopwatch stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.last.is_some()
    }

    /// Forward the time elapsed since the previous frame.
    /// Returns the forwarded nanoseconds; a stopped timer forwards nothing.
    pub fn tick(&mut self) -> i64 {
        self.tick_at(Instant::now())
    }

    /// Same as [`tick`](Self::tick) with an explicit frame instant
    pub fn tick_at(&mut self, now: Instant) -> i64 {
        let Some(last) = self.last else {
            return 0;
        };

        let mut elapsed = now.saturating_duration_since(last);
        if let Some(max) = self.config.max_frame_delta {
            elapsed = elapsed.min(max);
        }
        self.last = Some(now);

        let elapsed_ns = duration_to_ns(elapsed);
        self.scheduler.on_tick(elapsed_ns);
        elapsed_ns
    }

    pub fn scheduler(&self) -> &TickScheduler {
        &self.scheduler
    }
}
