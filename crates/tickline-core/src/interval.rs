//! Numeric intervals
//!
//! [`Span`] is a plain `Copy` value carrying the interval algebra.
//! [`Interval`] is a shared, observable handle around a span: clones refer
//! to the same underlying range and every mutator fires
//! [`IntervalAspect::Changed`], even when the value does not change.
//!
//! Two notions of equality exist and must not be conflated:
//! - `Interval: PartialEq + Hash` compare handle identity, so an interval
//!   can key a map.
//! - [`Interval::is_same_as`] / `Span: PartialEq` compare values.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::{Aspect, Notifier, Observer};

/// Upper bound meaning "no upper limit"
pub const UNBOUNDED: f64 = f64::MAX;

/// Returns true for the unbounded sentinel (or infinity)
#[inline]
pub fn is_unbounded(value: f64) -> bool {
    value >= UNBOUNDED
}

/// Interval value: `[min, max]`, empty iff `max < min`
#[derive(Clone, Copy, PartialEq)]
pub struct Span {
    pub min: f64,
    pub max: f64,
}

impl Span {
    /// Canonical empty span
    pub const EMPTY: Span = Span {
        min: f64::MAX,
        max: -f64::MAX,
    };

    /// Build a span from two bounds in any order.
    /// NaN on either side yields the empty span.
    pub fn new(a: f64, b: f64) -> Self {
        if a.is_nan() || b.is_nan() {
            return Span::EMPTY;
        }
        if a <= b {
            Span { min: a, max: b }
        } else {
            Span { min: b, max: a }
        }
    }

    pub fn point(v: f64) -> Self {
        Span::new(v, v)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        // Written so that NaN bounds read as empty
        !(self.min <= self.max)
    }

    #[inline]
    pub fn is_point(&self) -> bool {
        self.min == self.max
    }

    /// Length, zero for empty spans
    #[inline]
    pub fn length(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.max - self.min
        }
    }

    #[inline]
    pub fn center(&self) -> f64 {
        (self.min + self.max) / 2.0
    }

    /// Inclusive on both ends
    #[inline]
    pub fn contains(&self, v: f64) -> bool {
        v >= self.min && v <= self.max
    }

    pub fn contains_span(&self, other: &Span) -> bool {
        !other.is_empty() && self.contains(other.min) && self.contains(other.max)
    }

    /// `v` restricted to `[min, max]`; empty spans return `v` unchanged
    pub fn clamp(&self, v: f64) -> f64 {
        if self.is_empty() {
            v
        } else {
            v.max(self.min).min(self.max)
        }
    }

    /// True if the overlap is non-empty, including touching at one point
    pub fn intersects(&self, other: &Span) -> bool {
        self.intersects_range(other.min, other.max)
    }

    pub fn intersects_range(&self, lo: f64, hi: f64) -> bool {
        let other = Span::new(lo, hi);
        !self.is_empty() && !other.is_empty() && self.min <= other.max && other.min <= self.max
    }

    pub fn intersection(&self, other: &Span) -> Span {
        if !self.intersects(other) {
            return Span::EMPTY;
        }
        Span {
            min: self.min.max(other.min),
            max: self.max.min(other.max),
        }
    }

    /// Measure of the overlap with `[lo, hi]`; zero if disjoint or touching
    pub fn intersection_length(&self, lo: f64, hi: f64) -> f64 {
        self.intersection(&Span::new(lo, hi)).length()
    }

    /// Set difference `self - other` as 0, 1 or 2 ascending pieces
    pub fn subtract(&self, other: &Span) -> Vec<Span> {
        if self.is_empty() {
            return Vec::new();
        }
        if !self.intersects(other) {
            return vec![*self];
        }

        let mut pieces = Vec::with_capacity(2);
        if self.min < other.min {
            pieces.push(Span {
                min: self.min,
                max: other.min,
            });
        }
        if other.max < self.max {
            pieces.push(Span {
                min: other.max,
                max: self.max,
            });
        }
        pieces
    }

    /// Grow outward only so the span contains `[min, max]`
    pub fn expanded(&self, min: f64, max: f64) -> Span {
        let target = Span::new(min, max);
        if target.is_empty() {
            return *self;
        }
        if self.is_empty() {
            return target;
        }
        Span {
            min: self.min.min(target.min),
            max: self.max.max(target.max),
        }
    }

    pub fn shifted(&self, delta: f64) -> Span {
        if self.is_empty() {
            return *self;
        }
        Span {
            min: self.min + delta,
            max: self.max + delta,
        }
    }
}

impl Default for Span {
    fn default() -> Self {
        Span::EMPTY
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            write!(f, "Span(empty)")
        } else {
            write!(f, "Span[{}, {}]", self.min, self.max)
        }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            write!(f, "[]")
        } else {
            write!(f, "[{}, {}]", self.min, self.max)
        }
    }
}

/// Interval aspects
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IntervalAspect {
    Changed,
}

impl Aspect for IntervalAspect {}

struct IntervalInner {
    span: Mutex<Span>,
    notifier: Notifier<IntervalAspect>,
}

/// Shared, observable interval handle
#[derive(Clone)]
pub struct Interval {
    inner: Arc<IntervalInner>,
}

impl Interval {
    pub fn new(min: f64, max: f64) -> Self {
        Self::from_span(Span::new(min, max))
    }

    pub fn empty() -> Self {
        Self::from_span(Span::EMPTY)
    }

    pub fn from_span(span: Span) -> Self {
        Interval {
            inner: Arc::new(IntervalInner {
                span: Mutex::new(span),
                notifier: Notifier::new(),
            }),
        }
    }

    /// Current value
    pub fn snapshot(&self) -> Span {
        *self.inner.span.lock()
    }

    pub fn min(&self) -> f64 {
        self.inner.span.lock().min
    }

    pub fn max(&self) -> f64 {
        self.inner.span.lock().max
    }

    pub fn length(&self) -> f64 {
        self.snapshot().length()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot().is_empty()
    }

    pub fn is_point(&self) -> bool {
        self.snapshot().is_point()
    }

    pub fn center(&self) -> f64 {
        self.snapshot().center()
    }

    /// Value equality
    pub fn is_same_as(&self, other: &Interval) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner) || self.snapshot() == other.snapshot()
    }

    /// Handle identity
    pub fn ptr_eq(&self, other: &Interval) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    fn mutate(&self, f: impl FnOnce(&mut Span)) {
        {
            let mut span = self.inner.span.lock();
            f(&mut span);
        }
        self.inner.notifier.fire(IntervalAspect::Changed);
    }

    /// Set both bounds; reversed bounds are swapped, NaN clears
    pub fn set(&self, min: f64, max: f64) {
        self.set_span(Span::new(min, max));
    }

    pub fn set_span(&self, span: Span) {
        self.mutate(|s| *s = span);
    }

    pub fn set_min(&self, min: f64) {
        self.mutate(|s| s.min = min);
    }

    pub fn set_max(&self, max: f64) {
        self.mutate(|s| s.max = max);
    }

    /// Translate both bounds
    pub fn shift(&self, delta: f64) {
        self.mutate(|s| *s = s.shifted(delta));
    }

    /// Grow bounds outward (never shrink) to contain `[min, max]`
    pub fn expand(&self, min: f64, max: f64) {
        self.mutate(|s| *s = s.expanded(min, max));
    }

    /// Minimal growth so both points are contained
    pub fn adjust_to_contain(&self, v1: f64, v2: f64) {
        let target = Span::new(v1, v2);
        self.mutate(|s| {
            if target.is_empty() {
                return;
            }
            if s.is_empty() {
                *s = target;
                return;
            }
            if target.min < s.min {
                s.min = target.min;
            }
            if target.max > s.max {
                s.max = target.max;
            }
        });
    }

    /// Make the interval empty
    pub fn clear(&self) {
        self.mutate(|s| *s = Span::EMPTY);
    }

    pub fn clamp(&self, v: f64) -> f64 {
        self.snapshot().clamp(v)
    }

    pub fn contains(&self, v: f64) -> bool {
        self.snapshot().contains(v)
    }

    pub fn intersects(&self, other: &Interval) -> bool {
        self.snapshot().intersects(&other.snapshot())
    }

    pub fn intersects_range(&self, lo: f64, hi: f64) -> bool {
        self.snapshot().intersects_range(lo, hi)
    }

    /// New, unshared interval holding the overlap
    pub fn intersection(&self, other: &Interval) -> Interval {
        Interval::from_span(self.snapshot().intersection(&other.snapshot()))
    }

    pub fn intersection_length(&self, lo: f64, hi: f64) -> f64 {
        self.snapshot().intersection_length(lo, hi)
    }

    /// New, unshared intervals holding `self - other`, ascending
    pub fn subtract(&self, other: &Interval) -> Vec<Interval> {
        self.snapshot()
            .subtract(&other.snapshot())
            .into_iter()
            .map(Interval::from_span)
            .collect()
    }

    /// Run `handler` after every mutation, for as long as `observer` lives
    pub fn on_change<F>(&self, observer: &Observer, handler: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.inner
            .notifier
            .subscribe(observer, IntervalAspect::Changed, handler);
    }

    pub fn notifier(&self) -> &Notifier<IntervalAspect> {
        &self.inner.notifier
    }
}

impl Default for Interval {
    fn default() -> Self {
        Interval::empty()
    }
}

impl PartialEq for Interval {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Interval {}

impl Hash for Interval {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (Arc::as_ptr(&self.inner) as usize).hash(state);
    }
}

impl fmt::Debug for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Interval{}", self.snapshot())
    }
}
