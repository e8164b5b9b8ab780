//! Duration entries and selection constraints
//!
//! A duration entry starts at its series timestamp and lasts for its
//! duration, or is still running when the duration is unspecified. A
//! [`DurationConstraint`] answers "which entry does `[lo, hi]` hit, and how
//! much of it may be selected".

use std::fmt;
use std::sync::Arc;

use tickline_core::{Interval, Span, UNBOUNDED};

use crate::{DataSeries, SeriesPoint, WindowedView};

/// Payload of a duration series
pub trait DurationData: Clone + Send + Sync + 'static {
    /// Duration in microseconds; `None` while the entry is still running
    fn duration_us(&self) -> Option<i64>;

    /// Whether a still-running entry may be selected
    fn selectable_when_unspecified(&self) -> bool {
        false
    }

    /// Whether a selection may cover only part of the entry
    fn allow_partial_selection(&self) -> bool {
        false
    }
}

/// Plain duration payload with configurable selection policy
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct DurationPoint {
    pub duration_us: Option<i64>,
    pub selectable_when_unspecified: bool,
    pub allow_partial_selection: bool,
}

impl DurationPoint {
    pub fn finished(duration_us: i64) -> Self {
        DurationPoint {
            duration_us: Some(duration_us),
            ..Default::default()
        }
    }

    pub fn unfinished() -> Self {
        DurationPoint::default()
    }

    pub fn with_partial_selection(mut self) -> Self {
        self.allow_partial_selection = true;
        self
    }

    pub fn with_selectable_when_unspecified(mut self) -> Self {
        self.selectable_when_unspecified = true;
        self
    }
}

impl DurationData for DurationPoint {
    fn duration_us(&self) -> Option<i64> {
        self.duration_us
    }

    fn selectable_when_unspecified(&self) -> bool {
        self.selectable_when_unspecified
    }

    fn allow_partial_selection(&self) -> bool {
        self.allow_partial_selection
    }
}

/// Reference to one entry of a duration series, by value
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EntryRef {
    pub start_us: i64,
    pub duration_us: Option<i64>,
}

impl EntryRef {
    pub fn of<T: DurationData>(point: &SeriesPoint<T>) -> Self {
        EntryRef {
            start_us: point.x,
            duration_us: point.value.duration_us(),
        }
    }

    /// Extent of the entry; running entries extend to [`UNBOUNDED`]
    pub fn span(&self) -> Span {
        let start = self.start_us as f64;
        match self.duration_us {
            Some(d) => Span::new(start, start + d as f64),
            None => Span::new(start, UNBOUNDED),
        }
    }
}

/// Outcome of matching a request against a constraint
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Resolution {
    pub entry: EntryRef,
    pub covered: Span,
    pub selectable: bool,
}

/// Anything that can constrain a range selection
pub trait SelectionConstraint: Send + Sync {
    /// Resolve `[lo, hi]` against this constraint's entries.
    ///
    /// `prefer` wins over any other overlapping entry while it still
    /// overlaps the request.
    fn find_intersecting(&self, lo: f64, hi: f64, prefer: Option<&EntryRef>) -> Option<Resolution>;

    /// True if some entry overlapping `[lo, hi]` is selectable
    fn any_selectable(&self, lo: f64, hi: f64) -> bool;
}

/// Constraint model over a windowed view of duration entries
pub struct DurationConstraint<T: DurationData> {
    view: WindowedView<T>,
}

impl<T: DurationData> DurationConstraint<T> {
    pub fn new(query: Interval, source: Arc<dyn DataSeries<T>>) -> Self {
        DurationConstraint {
            view: WindowedView::new(query, source),
        }
    }

    pub fn view(&self) -> &WindowedView<T> {
        &self.view
    }

    /// Entries overlapping `[lo, hi]`, in series order
    pub fn entries_in(&self, lo: f64, hi: f64) -> Vec<SeriesPoint<T>> {
        let request = Span::new(lo, hi);
        self.view
            .get()
            .iter()
            .filter(|p| EntryRef::of(*p).span().intersects(&request))
            .cloned()
            .collect()
    }

    fn resolve(point: &SeriesPoint<T>, request: Span) -> Resolution {
        let entry = EntryRef::of(point);
        let running = entry.duration_us.is_none();
        let selectable = !running || point.value.selectable_when_unspecified();

        let extent = entry.span();
        let covered = if point.value.allow_partial_selection() {
            request.intersection(&extent)
        } else if running {
            // A running entry is only known up to the request
            Span::new(extent.min, request.max.max(extent.min))
        } else {
            extent
        };

        Resolution {
            entry,
            covered,
            selectable,
        }
    }
}

impl<T: DurationData> SelectionConstraint for DurationConstraint<T> {
    fn find_intersecting(&self, lo: f64, hi: f64, prefer: Option<&EntryRef>) -> Option<Resolution> {
        let request = Span::new(lo, hi);
        if request.is_empty() {
            return None;
        }

        let candidates = self.entries_in(request.min, request.max);
        let chosen = prefer
            .and_then(|r| candidates.iter().find(|p| EntryRef::of(*p) == *r))
            .or_else(|| candidates.first())?;

        Some(Self::resolve(chosen, request))
    }

    fn any_selectable(&self, lo: f64, hi: f64) -> bool {
        let request = Span::new(lo, hi);
        self.entries_in(request.min, request.max)
            .iter()
            .any(|p| Self::resolve(p, request).selectable)
    }
}

impl<T: DurationData> fmt::Debug for DurationConstraint<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DurationConstraint")
            .field("view", &self.view)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DefaultDataSeries;

    fn constraint(points: &[(i64, DurationPoint)]) -> DurationConstraint<DurationPoint> {
        let series = Arc::new(DefaultDataSeries::new());
        for (x, p) in points {
            series.add(*x, *p);
        }
        DurationConstraint::new(Interval::new(0.0, 1000.0), series)
    }

    #[test]
    fn test_full_entry_covered() {
        let c = constraint(&[(15, DurationPoint::finished(5))]);
        let r = c.find_intersecting(10.0, 18.0, None).unwrap();
        assert!(r.selectable);
        assert_eq!(r.covered, Span::new(15.0, 20.0));
    }

    #[test]
    fn test_partial_entry_clipped() {
        let c = constraint(&[(15, DurationPoint::finished(5).with_partial_selection())]);
        let r = c.find_intersecting(10.0, 18.0, None).unwrap();
        assert_eq!(r.covered, Span::new(15.0, 18.0));
        assert!(c.find_intersecting(10.0, 12.0, None).is_none());
    }

    #[test]
    fn test_running_entry_not_selectable() {
        let c = constraint(&[(0, DurationPoint::unfinished())]);
        let r = c.find_intersecting(10.0, 12.0, None).unwrap();
        assert!(!r.selectable);
        assert!(!c.any_selectable(10.0, 12.0));
    }

    #[test]
    fn test_running_entry_selectable_when_allowed() {
        let c = constraint(&[(0, DurationPoint::unfinished().with_selectable_when_unspecified())]);
        let r = c.find_intersecting(10.0, 12.0, None).unwrap();
        assert!(r.selectable);
        assert_eq!(r.covered, Span::new(0.0, 12.0));
    }

    #[test]
    fn test_prefer_sticks_to_current_entry() {
        let c = constraint(&[
            (10, DurationPoint::finished(10)),
            (18, DurationPoint::finished(10)),
        ]);
        let second = EntryRef {
            start_us: 18,
            duration_us: Some(10),
        };

        let free = c.find_intersecting(15.0, 19.0, None).unwrap();
        assert_eq!(free.entry.start_us, 10);

        let sticky = c.find_intersecting(15.0, 19.0, Some(&second)).unwrap();
        assert_eq!(sticky.entry, second);

        // No longer overlapping: preference ignored
        let moved = c.find_intersecting(11.0, 12.0, Some(&second)).unwrap();
        assert_eq!(moved.entry.start_us, 10);
    }

    #[test]
    fn test_reversed_request_normalized() {
        let c = constraint(&[(15, DurationPoint::finished(5))]);
        assert!(c.find_intersecting(18.0, 10.0, None).is_some());
    }
}
