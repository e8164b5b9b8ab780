//! Linear view animation

use tickline_core::Span;

#[inline]
fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

/// Interpolates a span from `from` to `to` over a fixed duration
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewAnimation {
    from: Span,
    to: Span,
    elapsed_ns: i64,
    duration_ns: i64,
}

impl ViewAnimation {
    pub fn new(from: Span, to: Span, duration_ns: i64) -> Self {
        ViewAnimation {
            from,
            to,
            elapsed_ns: 0,
            duration_ns: duration_ns.max(0),
        }
    }

    /// Fraction completed, in `[0, 1]`
    pub fn progress(&self) -> f64 {
        if self.duration_ns == 0 || self.from.is_empty() {
            return 1.0;
        }
        (self.elapsed_ns as f64 / self.duration_ns as f64).clamp(0.0, 1.0)
    }

    /// Advance by `elapsed_ns` and return the span for this frame
    pub fn advance(&mut self, elapsed_ns: i64) -> Span {
        self.elapsed_ns = self.elapsed_ns.saturating_add(elapsed_ns.max(0));
        self.current()
    }

    pub fn current(&self) -> Span {
        let t = self.progress();
        if t >= 1.0 {
            return self.to;
        }
        Span::new(
            lerp(self.from.min, self.to.min, t),
            lerp(self.from.max, self.to.max, t),
        )
    }

    pub fn is_finished(&self) -> bool {
        self.progress() >= 1.0
    }

    pub fn target(&self) -> Span {
        self.to
    }
}
