//! Streaming timeline
//!
//! Owns the `data` interval (everything recorded so far) and the `view`
//! interval (what is on screen), both in microseconds. While streaming, every
//! tick pins the view to the tail of the data. Navigation (zoom, pan, frame)
//! moves the view inside the data and turns streaming off once the view can
//! no longer follow the tail.
//!
//! Clock inputs (`reset`, `update`) are in nanoseconds.

use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tickline_core::{
    ns_to_us, secs_to_us, Aspect, Interval, Notifier, Observer, Span, TicklineError,
    TicklineResult, NANOS_PER_MICRO,
};
use tracing::{debug, trace};

use crate::{Updatable, ViewAnimation};

/// Default length of the view after a reset: 30 seconds
pub const DEFAULT_VIEW_LENGTH_US: f64 = 30_000_000.0;

/// Timeline configuration
#[derive(Clone, Debug)]
pub struct TimelineConfig {
    /// View length applied by `reset`
    pub default_view_length_us: f64,
    /// Duration of animated navigation
    pub animation_duration_ns: i64,
    /// Padding used by `frame_to_range`, as a fraction of the target length
    pub frame_padding: f64,
    /// Fraction of the view length added or removed by `zoom_in`/`zoom_out`
    pub zoom_step: f64,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        TimelineConfig {
            default_view_length_us: DEFAULT_VIEW_LENGTH_US,
            animation_duration_ns: 100_000_000,
            frame_padding: 0.1,
            zoom_step: 0.25,
        }
    }
}

impl TimelineConfig {
    /// Compact dashboards: 10 second view, faster animation
    pub fn short_window() -> Self {
        TimelineConfig {
            default_view_length_us: secs_to_us(10.0),
            animation_duration_ns: 50_000_000,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> TicklineResult<()> {
        if !(self.default_view_length_us.is_finite() && self.default_view_length_us > 0.0) {
            return Err(TicklineError::InvalidConfig(format!(
                "default_view_length_us must be positive, got {}",
                self.default_view_length_us
            )));
        }
        if self.animation_duration_ns < 0 {
            return Err(TicklineError::InvalidConfig(format!(
                "animation_duration_ns must not be negative, got {}",
                self.animation_duration_ns
            )));
        }
        if !(0.0..=1.0).contains(&self.frame_padding) {
            return Err(TicklineError::InvalidConfig(format!(
                "frame_padding must be within [0, 1], got {}",
                self.frame_padding
            )));
        }
        if !(self.zoom_step > 0.0 && self.zoom_step < 1.0) {
            return Err(TicklineError::InvalidConfig(format!(
                "zoom_step must be within (0, 1), got {}",
                self.zoom_step
            )));
        }
        Ok(())
    }
}

/// Timeline aspects
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimelineAspect {
    Streaming,
    Paused,
}

impl Aspect for TimelineAspect {}

/// Derived timeline mode
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimelineState {
    Paused,
    Streaming,
    Manual,
}

struct TimelineFlags {
    streaming: bool,
    can_stream: bool,
    paused: bool,
    reset_anchor_ns: i64,
    device_clock_ns: i64,
    animation: Option<ViewAnimation>,
}

struct TimelineInner {
    config: TimelineConfig,
    data: Interval,
    view: Interval,
    tooltip: Interval,
    selection: Interval,
    flags: Mutex<TimelineFlags>,
    notifier: Notifier<TimelineAspect>,
    observer: Observer,
}

/// Streaming timeline handle
#[derive(Clone)]
pub struct StreamingTimeline {
    inner: Arc<TimelineInner>,
}

/// New view after changing `view` by `amount`, `bias` of it on the left edge.
///
/// Growth blocked by one data edge is redirected to the other edge. Shrinking
/// stops at zero length around the bias point.
fn zoom_span(view: Span, data: Span, amount: f64, bias: f64) -> Span {
    let bias = if bias.is_nan() { 0.5 } else { bias.clamp(0.0, 1.0) };
    let mut min = view.min - amount * bias;
    let mut max = view.max + amount * (1.0 - bias);

    if min > max {
        let pivot = view.min + view.length() * bias;
        min = pivot;
        max = pivot;
    }
    if min < data.min {
        max = (max + (data.min - min)).min(data.max);
        min = data.min;
    }
    if max > data.max {
        min = (min - (max - data.max)).max(data.min);
        max = data.max;
    }
    Span::new(min, max)
}

/// Data with no length cannot be navigated
fn navigable(data: &Span) -> bool {
    !data.is_empty() && data.length() > 0.0
}

impl TimelineInner {
    fn set_streaming(&self, streaming: bool) {
        let enabled = {
            let mut flags = self.flags.lock();
            let streaming = streaming && flags.can_stream;
            if flags.streaming == streaming {
                return;
            }
            flags.streaming = streaming;
            if streaming {
                flags.animation = None;
            }
            streaming
        };

        if enabled {
            // Jump to the latest data
            let data = self.data.snapshot();
            let view = self.view.snapshot();
            if !view.is_empty() && !data.is_empty() {
                self.view.shift(data.max - view.max);
            }
        }
        debug!(streaming = enabled, "timeline streaming changed");
        self.notifier.fire(TimelineAspect::Streaming);
    }
}

impl StreamingTimeline {
    pub fn new() -> Self {
        Self::build(TimelineConfig::default())
    }

    pub fn with_config(config: TimelineConfig) -> TicklineResult<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: TimelineConfig) -> Self {
        let inner = Arc::new(TimelineInner {
            config,
            data: Interval::new(0.0, 0.0),
            view: Interval::new(0.0, 0.0),
            tooltip: Interval::empty(),
            selection: Interval::empty(),
            flags: Mutex::new(TimelineFlags {
                streaming: false,
                can_stream: true,
                paused: false,
                reset_anchor_ns: 0,
                device_clock_ns: 0,
                animation: None,
            }),
            notifier: Notifier::new(),
            observer: Observer::new(),
        });

        // Marking a range stops the view from scrolling away from it
        let weak: Weak<TimelineInner> = Arc::downgrade(&inner);
        inner.selection.on_change(&inner.observer, move || {
            if let Some(inner) = weak.upgrade() {
                if !inner.selection.is_empty() {
                    inner.set_streaming(false);
                }
            }
        });

        StreamingTimeline { inner }
    }

    pub fn config(&self) -> &TimelineConfig {
        &self.inner.config
    }

    pub fn data(&self) -> &Interval {
        &self.inner.data
    }

    pub fn view(&self) -> &Interval {
        &self.inner.view
    }

    pub fn tooltip(&self) -> &Interval {
        &self.inner.tooltip
    }

    pub fn selection(&self) -> &Interval {
        &self.inner.selection
    }

    pub fn is_streaming(&self) -> bool {
        self.inner.flags.lock().streaming
    }

    pub fn can_stream(&self) -> bool {
        self.inner.flags.lock().can_stream
    }

    pub fn is_paused(&self) -> bool {
        self.inner.flags.lock().paused
    }

    pub fn is_animating(&self) -> bool {
        self.inner.flags.lock().animation.is_some()
    }

    pub fn state(&self) -> TimelineState {
        let flags = self.inner.flags.lock();
        if flags.paused {
            TimelineState::Paused
        } else if flags.streaming {
            TimelineState::Streaming
        } else {
            TimelineState::Manual
        }
    }

    /// Turn streaming on or off; turning it on is ignored while streaming
    /// is not allowed
    pub fn set_streaming(&self, streaming: bool) {
        self.inner.set_streaming(streaming);
    }

    pub fn toggle_streaming(&self) {
        let streaming = self.is_streaming();
        self.inner.set_streaming(!streaming);
    }

    pub fn set_can_stream(&self, can_stream: bool) {
        self.inner.flags.lock().can_stream = can_stream;
        if !can_stream {
            self.inner.set_streaming(false);
        }
    }

    /// While paused the clock keeps counting but `data` stops growing
    pub fn set_paused(&self, paused: bool) {
        {
            let mut flags = self.inner.flags.lock();
            if flags.paused == paused {
                return;
            }
            flags.paused = paused;
        }
        debug!(paused, "timeline pause changed");
        self.inner.notifier.fire(TimelineAspect::Paused);
    }

    /// Restart the timeline over `[start_ns, end_ns]` and begin streaming
    pub fn reset(&self, start_ns: i64, end_ns: i64) {
        let (start_ns, end_ns) = if start_ns <= end_ns {
            (start_ns, end_ns)
        } else {
            (end_ns, start_ns)
        };

        let was_paused = {
            let mut flags = self.inner.flags.lock();
            flags.reset_anchor_ns = start_ns;
            flags.device_clock_ns = end_ns;
            flags.animation = None;
            std::mem::replace(&mut flags.paused, false)
        };

        let end_us = ns_to_us(end_ns);
        self.inner.data.set(ns_to_us(start_ns), end_us);
        self.inner
            .view
            .set(end_us - self.inner.config.default_view_length_us, end_us);
        debug!(start_ns, end_ns, "timeline reset");

        if was_paused {
            self.inner.notifier.fire(TimelineAspect::Paused);
        }
        self.inner.set_streaming(true);
    }

    /// Microseconds between `absolute_ns` and the last reset's start
    pub fn convert_to_relative(&self, absolute_ns: i64) -> f64 {
        let anchor = self.inner.flags.lock().reset_anchor_ns;
        absolute_ns.saturating_sub(anchor) as f64 / NANOS_PER_MICRO as f64
    }

    /// Device clock, in nanoseconds
    pub fn device_clock_ns(&self) -> i64 {
        self.inner.flags.lock().device_clock_ns
    }

    /// Advance the clock by `elapsed_ns`
    pub fn update(&self, elapsed_ns: i64) {
        let (data_max, streaming, frame) = {
            let mut flags = self.inner.flags.lock();
            flags.device_clock_ns = flags.device_clock_ns.saturating_add(elapsed_ns);
            let data_max = (!flags.paused).then(|| ns_to_us(flags.device_clock_ns));

            let frame = match flags.animation.as_mut() {
                Some(animation) => {
                    let frame = animation.advance(elapsed_ns);
                    if animation.is_finished() {
                        flags.animation = None;
                        trace!("view animation finished");
                    }
                    Some(frame)
                }
                None => None,
            };
            (data_max, flags.streaming, frame)
        };

        if let Some(max) = data_max {
            self.inner.data.set_max(max);
        }

        let tail = self.inner.data.max();
        let next = match (streaming && data_max.is_some(), frame) {
            (true, Some(frame)) => Some(Span::new(tail - frame.length(), tail)),
            (true, None) => {
                let length = self.inner.view.length();
                Some(Span::new(tail - length, tail))
            }
            (false, frame) => frame,
        };
        if let Some(span) = next {
            self.inner.view.set_span(span);
        }
    }

    /// Change the view length by `amount` immediately (`amount < 0` zooms
    /// in), taking `bias` of the change on the left edge
    pub fn zoom(&self, amount: f64, bias: f64) {
        let data = self.inner.data.snapshot();
        let view = self.inner.view.snapshot();
        if amount == 0.0 || !amount.is_finite() || !navigable(&data) || view.is_empty() {
            return;
        }

        let next = zoom_span(view, data, amount, bias);
        self.inner.flags.lock().animation = None;
        self.inner.view.set_span(next);
        trace!(amount, bias, view = %next, "zoom");

        if next.max < data.max {
            self.inner.set_streaming(false);
        }
    }

    /// Animated zoom, split evenly between both edges; while streaming the
    /// right edge stays on the data tail
    pub fn animate_zoom(&self, amount: f64) {
        let data = self.inner.data.snapshot();
        let view = self.inner.view.snapshot();
        if amount == 0.0 || !amount.is_finite() || !navigable(&data) || view.is_empty() {
            return;
        }

        let mut flags = self.inner.flags.lock();
        let bias = if flags.streaming { 1.0 } else { 0.5 };
        let base = flags.animation.map(|a| a.target()).unwrap_or(view);
        let target = zoom_span(base, data, amount, bias);
        flags.animation = Some(ViewAnimation::new(
            view,
            target,
            self.inner.config.animation_duration_ns,
        ));
        trace!(amount, target = %target, "zoom animation started");
    }

    pub fn zoom_in(&self) {
        let step = self.inner.view.length() * self.inner.config.zoom_step;
        self.animate_zoom(-step);
    }

    pub fn zoom_out(&self) {
        let step = self.inner.view.length() * self.inner.config.zoom_step;
        self.animate_zoom(step);
    }

    /// Shift the view by `delta`, staying inside the data
    pub fn pan(&self, delta: f64) {
        let data = self.inner.data.snapshot();
        let view = self.inner.view.snapshot();
        if delta == 0.0 || !delta.is_finite() || !navigable(&data) || view.is_empty() {
            return;
        }

        let delta = if delta < 0.0 {
            delta.max((data.min - view.min).min(0.0))
        } else {
            delta.min((data.max - view.max).max(0.0))
        };

        self.inner.flags.lock().animation = None;
        self.inner.view.shift(delta);
        trace!(delta, "pan");

        if delta < 0.0 || self.inner.view.max() < data.max {
            self.inner.set_streaming(false);
        }
    }

    /// Animate the view to `target` padded by `padding_fraction` of its
    /// length on both sides, never past the end of the data
    pub fn frame_view_to_range(&self, target: Span, padding_fraction: f64) {
        let data = self.inner.data.snapshot();
        let view = self.inner.view.snapshot();
        if target.is_empty() || !navigable(&data) {
            return;
        }

        let padding = target.length() * padding_fraction.max(0.0);
        let max = (target.max + padding).min(data.max);
        let min = (target.min - padding).min(max);
        let to = Span::new(min, max);

        self.inner.flags.lock().animation = Some(ViewAnimation::new(
            view,
            to,
            self.inner.config.animation_duration_ns,
        ));
        debug!(target = %to, "framing view");
        self.inner.set_streaming(false);
    }

    /// [`frame_view_to_range`](Self::frame_view_to_range) with the
    /// configured padding
    pub fn frame_to_range(&self, target: Span) {
        self.frame_view_to_range(target, self.inner.config.frame_padding);
    }

    /// Move the view the least needed to show all of `target`
    pub fn adjust_range_close_to_middle_view(&self, target: Span) {
        let data = self.inner.data.snapshot();
        let view = self.inner.view.snapshot();
        if target.is_empty()
            || !navigable(&data)
            || view.is_empty()
            || view.contains_span(&target)
        {
            return;
        }

        let next = if target.length() > view.length() {
            target
        } else if view.intersects(&target) {
            if target.min < view.min {
                view.shifted(target.min - view.min)
            } else {
                view.shifted(target.max - view.max)
            }
        } else {
            view.shifted(target.center() - view.center())
        };

        self.inner.flags.lock().animation = None;
        self.inner.view.set_span(next);
        self.inner.set_streaming(false);
    }

    pub fn subscribe<F>(&self, observer: &Observer, aspect: TimelineAspect, handler: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.inner.notifier.subscribe(observer, aspect, handler);
    }

    pub fn unsubscribe_all(&self, observer: &Observer) {
        self.inner.notifier.unsubscribe_all(observer);
    }
}

impl Default for StreamingTimeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Updatable for StreamingTimeline {
    fn update(&self, elapsed_ns: i64) {
        StreamingTimeline::update(self, elapsed_ns);
    }
}

impl fmt::Debug for StreamingTimeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamingTimeline")
            .field("data", &self.inner.data)
            .field("view", &self.inner.view)
            .field("state", &self.state())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use proptest::prelude::*;
    use tickline_core::{secs_to_ns, NANOS_PER_SEC};

    const SEC_US: f64 = 1_000_000.0;

    fn timeline_with(data: Span, view: Span) -> StreamingTimeline {
        let timeline = StreamingTimeline::new();
        timeline.data().set_span(data);
        timeline.view().set_span(view);
        timeline
    }

    #[test]
    fn test_reset() {
        let timeline = StreamingTimeline::new();
        timeline.set_paused(true);
        timeline.reset(0, secs_to_ns(60));

        assert_eq!(timeline.data().snapshot(), Span::new(0.0, 60.0 * SEC_US));
        assert_eq!(
            timeline.view().snapshot(),
            Span::new(60.0 * SEC_US - DEFAULT_VIEW_LENGTH_US, 60.0 * SEC_US)
        );
        assert!(timeline.is_streaming());
        assert!(!timeline.is_paused());
        assert_eq!(timeline.state(), TimelineState::Streaming);
    }

    #[test]
    fn test_streaming_follows_data() {
        let timeline = StreamingTimeline::new();
        timeline.reset(0, secs_to_ns(60));
        timeline.view().set(0.0, 10.0 * SEC_US);
        timeline.set_streaming(true);

        timeline.update(secs_to_ns(10));
        let data = timeline.data().snapshot();
        let view = timeline.view().snapshot();
        assert_eq!(data.max, 70.0 * SEC_US);
        assert_eq!(view.max, data.max);
        assert_eq!(view.length(), 10.0 * SEC_US);
    }

    #[test]
    fn test_manual_view_stays_put() {
        let timeline = StreamingTimeline::new();
        timeline.reset(0, secs_to_ns(60));
        timeline.set_streaming(false);
        let before = timeline.view().snapshot();

        timeline.update(secs_to_ns(5));
        assert_eq!(timeline.data().max(), 65.0 * SEC_US);
        assert_eq!(timeline.view().snapshot(), before);
        assert_eq!(timeline.state(), TimelineState::Manual);
    }

    #[test]
    fn test_pause_defers_data_growth() {
        let timeline = StreamingTimeline::new();
        timeline.reset(0, secs_to_ns(10));
        timeline.set_paused(true);

        timeline.update(secs_to_ns(5));
        assert_eq!(timeline.data().max(), 10.0 * SEC_US);
        assert_eq!(timeline.device_clock_ns(), secs_to_ns(15));

        timeline.set_paused(false);
        timeline.update(secs_to_ns(1));
        assert_eq!(timeline.data().max(), 16.0 * SEC_US);
    }

    #[test]
    fn test_can_stream_gate() {
        let timeline = StreamingTimeline::new();
        timeline.reset(0, secs_to_ns(10));
        timeline.set_can_stream(false);
        assert!(!timeline.is_streaming());

        timeline.set_streaming(true);
        assert!(!timeline.is_streaming());

        timeline.set_can_stream(true);
        timeline.toggle_streaming();
        assert!(timeline.is_streaming());
    }

    #[test]
    fn test_zoom_clamp_redirects_budget() {
        let timeline = timeline_with(Span::new(0.0, 100.0), Span::new(70.0, 70.0));
        timeline.zoom(40.0, 0.5);
        assert_eq!(timeline.view().snapshot(), Span::new(50.0, 90.0));
        timeline.zoom(40.0, 0.5);
        assert_eq!(timeline.view().snapshot(), Span::new(20.0, 100.0));
    }

    #[test]
    fn test_zoom_in_stops_at_zero_length() {
        let timeline = timeline_with(Span::new(0.0, 100.0), Span::new(40.0, 60.0));
        timeline.zoom(-50.0, 0.5);
        assert_eq!(timeline.view().snapshot(), Span::new(50.0, 50.0));
    }

    #[test]
    fn test_zoom_streaming_rules() {
        let timeline = StreamingTimeline::new();
        timeline.reset(0, 100 * NANOS_PER_MICRO);
        timeline.view().set(50.0, 100.0);

        // Growing on the left keeps the tail pinned
        timeline.zoom(10.0, 1.0);
        assert!(timeline.is_streaming());
        assert_eq!(timeline.view().snapshot(), Span::new(40.0, 100.0));

        // Pulling the right edge off the tail stops streaming
        timeline.zoom(-10.0, 0.0);
        assert!(!timeline.is_streaming());
        assert_eq!(timeline.view().snapshot(), Span::new(40.0, 90.0));
    }

    #[test]
    fn test_navigation_on_empty_data_is_noop() {
        let timeline = timeline_with(Span::new(0.0, 0.0), Span::new(0.0, 0.0));
        timeline.zoom(10.0, 0.5);
        timeline.pan(5.0);
        timeline.frame_view_to_range(Span::new(1.0, 2.0), 0.1);
        assert_eq!(timeline.view().snapshot(), Span::new(0.0, 0.0));
        assert!(!timeline.is_animating());
    }

    #[test]
    fn test_non_finite_navigation_ignored() {
        let timeline = timeline_with(Span::new(0.0, 100.0), Span::new(40.0, 60.0));
        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            timeline.zoom(bad, 0.5);
            timeline.animate_zoom(bad);
            timeline.pan(bad);
            assert_eq!(timeline.view().snapshot(), Span::new(40.0, 60.0));
            assert!(!timeline.is_animating());
        }

        // Still navigable afterwards
        timeline.zoom(10.0, 0.5);
        timeline.pan(-5.0);
        assert_eq!(timeline.view().snapshot(), Span::new(30.0, 60.0));
    }

    #[test]
    fn test_pan_stops_streaming() {
        let timeline = StreamingTimeline::new();
        timeline.reset(0, 100 * NANOS_PER_MICRO);
        timeline.view().set(50.0, 100.0);
        assert!(timeline.is_streaming());

        timeline.pan(-10.0);
        assert!(!timeline.is_streaming());
        assert_eq!(timeline.view().snapshot(), Span::new(40.0, 90.0));

        timeline.pan(10.0);
        assert!(!timeline.is_streaming());
        assert_eq!(timeline.view().snapshot(), Span::new(50.0, 100.0));
    }

    #[test]
    fn test_pan_right_on_tail_keeps_streaming() {
        let timeline = StreamingTimeline::new();
        timeline.reset(0, 100 * NANOS_PER_MICRO);
        timeline.view().set(50.0, 100.0);
        timeline.pan(10.0);
        assert!(timeline.is_streaming());
        assert_eq!(timeline.view().snapshot(), Span::new(50.0, 100.0));
    }

    #[test]
    fn test_pan_clamped_to_data() {
        let timeline = timeline_with(Span::new(0.0, 100.0), Span::new(10.0, 30.0));
        timeline.pan(-50.0);
        assert_eq!(timeline.view().snapshot(), Span::new(0.0, 20.0));
    }

    #[test]
    fn test_frame_view_animates() {
        let timeline = timeline_with(Span::new(0.0, 1000.0), Span::new(0.0, 100.0));
        timeline.set_streaming(true);
        timeline.view().set(0.0, 100.0);
        timeline.set_paused(true);

        timeline.frame_view_to_range(Span::new(500.0, 600.0), 0.1);
        assert!(!timeline.is_streaming());
        assert!(timeline.is_animating());
        assert_eq!(timeline.view().snapshot(), Span::new(0.0, 100.0));

        let half = timeline.config().animation_duration_ns / 2;
        timeline.update(half);
        let mid = timeline.view().snapshot();
        assert!(mid.min > 0.0 && mid.min < 490.0);

        timeline.update(half);
        assert_eq!(timeline.view().snapshot(), Span::new(490.0, 610.0));
        assert!(!timeline.is_animating());
    }

    #[test]
    fn test_frame_view_clamped_to_data_end() {
        let timeline = timeline_with(Span::new(0.0, 1000.0), Span::new(0.0, 100.0));
        timeline.set_paused(true);
        timeline.frame_view_to_range(Span::new(900.0, 1000.0), 0.5);
        timeline.update(timeline.config().animation_duration_ns);
        assert_eq!(timeline.view().snapshot(), Span::new(850.0, 1000.0));
    }

    #[test]
    fn test_animated_zoom_while_streaming_keeps_tail() {
        let timeline = StreamingTimeline::new();
        timeline.reset(0, secs_to_ns(60));
        let length = timeline.view().length();

        timeline.zoom_in();
        timeline.update(timeline.config().animation_duration_ns);
        let data = timeline.data().snapshot();
        let view = timeline.view().snapshot();
        assert!(timeline.is_streaming());
        assert_eq!(view.max, data.max);
        assert!((view.length() - length * 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_animated_zoom_out_splits_evenly() {
        let timeline = timeline_with(Span::new(0.0, 1000.0), Span::new(400.0, 600.0));
        timeline.set_paused(true);
        timeline.animate_zoom(100.0);
        timeline.update(timeline.config().animation_duration_ns);
        assert_eq!(timeline.view().snapshot(), Span::new(350.0, 650.0));
    }

    #[test]
    fn test_new_navigation_overrides_animation() {
        let timeline = timeline_with(Span::new(0.0, 1000.0), Span::new(400.0, 600.0));
        timeline.set_paused(true);
        timeline.animate_zoom(100.0);
        timeline.pan(-100.0);
        assert!(!timeline.is_animating());
        timeline.update(timeline.config().animation_duration_ns);
        assert_eq!(timeline.view().snapshot(), Span::new(300.0, 500.0));
    }

    #[test]
    fn test_adjust_range_close_to_middle_view() {
        let timeline = timeline_with(Span::new(0.0, 1000.0), Span::new(100.0, 200.0));

        // Inside: nothing to do
        timeline.adjust_range_close_to_middle_view(Span::new(120.0, 150.0));
        assert_eq!(timeline.view().snapshot(), Span::new(100.0, 200.0));

        // Partially inside: minimal shift
        timeline.adjust_range_close_to_middle_view(Span::new(180.0, 220.0));
        assert_eq!(timeline.view().snapshot(), Span::new(120.0, 220.0));

        // Outside and smaller: centered
        timeline.adjust_range_close_to_middle_view(Span::new(500.0, 520.0));
        assert_eq!(timeline.view().snapshot(), Span::new(460.0, 560.0));

        // Larger than the view: view becomes the target
        timeline.adjust_range_close_to_middle_view(Span::new(0.0, 300.0));
        assert_eq!(timeline.view().snapshot(), Span::new(0.0, 300.0));

        // Empty target ignored
        timeline.adjust_range_close_to_middle_view(Span::EMPTY);
        assert_eq!(timeline.view().snapshot(), Span::new(0.0, 300.0));
    }

    #[test]
    fn test_adjust_on_zero_length_data_is_noop() {
        let timeline = timeline_with(Span::new(0.0, 0.0), Span::new(0.0, 0.0));
        timeline.set_streaming(true);
        timeline.adjust_range_close_to_middle_view(Span::new(10.0, 20.0));
        assert_eq!(timeline.view().snapshot(), Span::new(0.0, 0.0));
        assert!(timeline.is_streaming());
    }

    #[test]
    fn test_selection_stops_streaming() {
        let timeline = StreamingTimeline::new();
        timeline.reset(0, NANOS_PER_SEC);
        timeline.selection().set(0.0, 0.0);
        assert!(!timeline.is_streaming());

        timeline.set_streaming(true);
        timeline.selection().set(0.0, 1000.0);
        assert!(!timeline.is_streaming());
    }

    #[test]
    fn test_convert_to_relative() {
        let timeline = StreamingTimeline::new();
        timeline.reset(secs_to_ns(5), secs_to_ns(10));
        assert_eq!(timeline.convert_to_relative(secs_to_ns(7)), 2.0 * SEC_US);
        assert_eq!(
            timeline.convert_to_relative(i64::MIN),
            i64::MIN as f64 / NANOS_PER_MICRO as f64
        );
    }

    #[test]
    fn test_streaming_aspect_fires() {
        let timeline = StreamingTimeline::new();
        let observer = Observer::new();
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        timeline.subscribe(&observer, TimelineAspect::Streaming, move || {
            c.fetch_add(1, Ordering::SeqCst);
        });

        timeline.reset(0, NANOS_PER_SEC);
        timeline.set_streaming(true);
        timeline.set_streaming(false);
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_invalid_config() {
        let config = TimelineConfig {
            frame_padding: 2.0,
            ..Default::default()
        };
        assert!(StreamingTimeline::with_config(config).is_err());
        assert!(StreamingTimeline::with_config(TimelineConfig::short_window()).is_ok());
    }

    proptest! {
        #[test]
        fn prop_zoom_stays_inside_data(
            start in 0.0f64..500.0,
            len in 0.0f64..500.0,
            amount in -1000.0f64..1000.0,
            bias in 0.0f64..=1.0,
        ) {
            let data = Span::new(0.0, 1000.0);
            let view = Span::new(start, start + len);
            let next = zoom_span(view, data, amount, bias);
            prop_assert!(!next.is_empty());
            prop_assert!(next.min >= data.min && next.max <= data.max);
        }
    }
}
