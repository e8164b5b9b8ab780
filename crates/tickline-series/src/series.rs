//! Timestamped data series

use std::fmt;

use parking_lot::RwLock;
use tickline_core::Span;

/// One sample: timestamp in microseconds plus payload
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct SeriesPoint<T> {
    pub x: i64,
    pub value: T,
}

impl<T> SeriesPoint<T> {
    pub fn new(x: i64, value: T) -> Self {
        SeriesPoint { x, value }
    }
}

/// A source of timestamped points, queried by range
pub trait DataSeries<T>: Send + Sync {
    /// All points with `range.min <= x <= range.max`, ascending by `x`
    fn data_for_range(&self, range: Span) -> Vec<SeriesPoint<T>>;
}

/// In-memory series kept sorted by timestamp.
///
/// Appends are cheap for in-order data; out-of-order points are inserted at
/// their sorted position after any points sharing the same timestamp.
pub struct DefaultDataSeries<T> {
    points: RwLock<Vec<SeriesPoint<T>>>,
}

impl<T: Clone> DefaultDataSeries<T> {
    pub fn new() -> Self {
        DefaultDataSeries {
            points: RwLock::new(Vec::new()),
        }
    }

    pub fn add(&self, x: i64, value: T) {
        let mut points = self.points.write();
        let point = SeriesPoint::new(x, value);
        match points.last() {
            Some(last) if last.x > x => {
                let at = points.partition_point(|p| p.x <= x);
                points.insert(at, point);
            }
            _ => points.push(point),
        }
    }

    pub fn len(&self) -> usize {
        self.points.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.read().is_empty()
    }

    pub fn clear(&self) {
        self.points.write().clear();
    }

    /// Every point currently stored
    pub fn all(&self) -> Vec<SeriesPoint<T>> {
        self.points.read().clone()
    }
}

impl<T: Clone> Default for DefaultDataSeries<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Send + Sync> DataSeries<T> for DefaultDataSeries<T> {
    fn data_for_range(&self, range: Span) -> Vec<SeriesPoint<T>> {
        if range.is_empty() {
            return Vec::new();
        }
        let points = self.points.read();
        let start = points.partition_point(|p| (p.x as f64) < range.min);
        let end = points.partition_point(|p| (p.x as f64) <= range.max);
        if start >= end {
            return Vec::new();
        }
        points[start..end].to_vec()
    }
}

impl<T> fmt::Debug for DefaultDataSeries<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefaultDataSeries")
            .field("len", &self.points.read().len())
            .finish()
    }
}
