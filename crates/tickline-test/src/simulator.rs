//! Dashboard Simulator - Full harness for timeline and selection testing
//!
//! Simulates:
//! - A render loop pushing frames with configurable jitter
//! - A profiled process emitting duration events (calls, captures)
//! - User navigation and range selection against the live timeline

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tickline_core::{secs_to_ns, Span, TicklineResult};
use tickline_select::RangeSelectionEngine;
use tickline_series::{DataSeries, DefaultDataSeries, DurationConstraint, DurationPoint};
use tickline_time::{FakeTimer, StreamingTimeline, TickScheduler, TimelineConfig, Updatable};
use tracing::debug;

/// Frame timing model for the simulated render loop
#[derive(Clone, Debug)]
pub struct FrameJitter {
    /// Nominal frame length (nanoseconds)
    pub frame_ns: i64,
    /// Random jitter per frame (nanoseconds)
    pub jitter_ns: i64,
}

impl FrameJitter {
    pub fn new(frame_ns: i64, jitter_ns: i64) -> Self {
        FrameJitter {
            frame_ns,
            jitter_ns: jitter_ns.max(0),
        }
    }

    /// Exact 60 fps
    pub fn perfect() -> Self {
        Self::new(16_666_667, 0)
    }

    /// 60 fps with up to 2ms of jitter
    pub fn realistic() -> Self {
        Self::new(16_666_667, 2_000_000)
    }

    /// Stuttering renderer
    pub fn unstable() -> Self {
        Self::new(16_666_667, 15_000_000)
    }

    /// Length of the next frame
    pub fn sample(&self, rng: &mut StdRng) -> i64 {
        let jitter = if self.jitter_ns > 0 {
            rng.gen_range(-self.jitter_ns..=self.jitter_ns)
        } else {
            0
        };
        (self.frame_ns + jitter).max(0)
    }
}

/// Simulation statistics
#[derive(Debug, Default, Clone)]
pub struct SimulationResult {
    /// Frames pushed
    pub frames: u64,
    /// Total simulated time (nanoseconds)
    pub elapsed_ns: i64,
    /// Frames after which the timeline was streaming
    pub streaming_frames: u64,
    /// Largest gap between the view and data ends while streaming (microseconds)
    pub max_tail_gap_us: f64,
}

/// Clock, scheduler, timeline, event series and selection, wired together
pub struct DashboardSimulator {
    timer: FakeTimer,
    timeline: StreamingTimeline,
    selection: RangeSelectionEngine,
    events: Arc<DefaultDataSeries<DurationPoint>>,
    jitter: FrameJitter,
    rng: StdRng,
}

impl DashboardSimulator {
    /// Create a simulator whose session starts `history_secs` in the past
    pub fn new(history_secs: i64, jitter: FrameJitter, seed: u64) -> Self {
        Self::build(StreamingTimeline::new(), history_secs, jitter, seed)
    }

    pub fn with_config(
        config: TimelineConfig,
        history_secs: i64,
        jitter: FrameJitter,
        seed: u64,
    ) -> TicklineResult<Self> {
        let timeline = StreamingTimeline::with_config(config)?;
        Ok(Self::build(timeline, history_secs, jitter, seed))
    }

    fn build(timeline: StreamingTimeline, history_secs: i64, jitter: FrameJitter, seed: u64) -> Self {
        let scheduler = TickScheduler::new();
        scheduler.register(Arc::new(timeline.clone()) as Arc<dyn Updatable>);
        timeline.reset(0, secs_to_ns(history_secs));

        let events = Arc::new(DefaultDataSeries::new());
        let source: Arc<dyn DataSeries<DurationPoint>> = events.clone();
        let selection = RangeSelectionEngine::new(timeline.selection().clone());
        selection.add_constraint(Arc::new(DurationConstraint::new(
            timeline.data().clone(),
            source,
        )));

        DashboardSimulator {
            timer: FakeTimer::new(scheduler),
            timeline,
            selection,
            events,
            jitter,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Record a duration event starting at `start_us`
    pub fn add_event(&self, start_us: i64, point: DurationPoint) {
        self.events.add(start_us, point);
    }

    /// Push `frames` frames through the scheduler
    pub fn run_frames(&mut self, frames: u64) -> SimulationResult {
        let mut result = SimulationResult::default();
        for _ in 0..frames {
            let elapsed = self.jitter.sample(&mut self.rng);
            self.timer.tick(elapsed);
            result.record_frame(elapsed, &self.timeline);
        }
        debug!(
            frames = result.frames,
            elapsed_ns = result.elapsed_ns,
            "simulation finished"
        );
        result
    }

    /// Push a single frame of exactly `elapsed_ns`
    pub fn step(&mut self, elapsed_ns: i64) {
        self.timer.tick(elapsed_ns);
    }

    /// Replay a mouse drag as one batched selection update
    pub fn drag_select(&self, points: &[(f64, f64)]) {
        self.selection.begin_update();
        for &(lo, hi) in points {
            self.selection.set(lo, hi);
        }
        self.selection.end_update();
    }

    pub fn timeline(&self) -> &StreamingTimeline {
        &self.timeline
    }

    pub fn selection(&self) -> &RangeSelectionEngine {
        &self.selection
    }

    pub fn scheduler(&self) -> &TickScheduler {
        self.timer.scheduler()
    }

    pub fn now_ns(&self) -> i64 {
        self.timer.now_ns()
    }

    /// Current data and view
    pub fn snapshot(&self) -> (Span, Span) {
        (
            self.timeline.data().snapshot(),
            self.timeline.view().snapshot(),
        )
    }
}

impl SimulationResult {
    fn record_frame(&mut self, elapsed_ns: i64, timeline: &StreamingTimeline) {
        self.frames += 1;
        self.elapsed_ns += elapsed_ns;
        if timeline.is_streaming() {
            self.streaming_frames += 1;
            let gap = timeline.data().max() - timeline.view().max();
            self.max_tail_gap_us = self.max_tail_gap_us.max(gap.abs());
        }
    }
}
