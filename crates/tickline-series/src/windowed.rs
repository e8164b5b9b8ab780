//! Cached windowed view
//!
//! A [`WindowedView`] projects a data series through a query interval. The
//! filtered result is cached against the query value it was computed for and
//! reused until the query moves, the view is invalidated, or the query is
//! open-ended. Growth of the underlying series alone does not refresh the
//! cache.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tickline_core::{is_unbounded, Interval, Span};
use tracing::trace;

use crate::{DataSeries, SeriesPoint};

struct ViewCache<T> {
    points: Option<Arc<Vec<SeriesPoint<T>>>>,
    key: Span,
    stale: bool,
}

/// A data series seen through a query interval
pub struct WindowedView<T> {
    query: Interval,
    source: Arc<dyn DataSeries<T>>,
    cache: Mutex<ViewCache<T>>,
}

impl<T> WindowedView<T> {
    pub fn new(query: Interval, source: Arc<dyn DataSeries<T>>) -> Self {
        WindowedView {
            query,
            source,
            cache: Mutex::new(ViewCache {
                points: None,
                key: Span::EMPTY,
                stale: true,
            }),
        }
    }

    /// Points inside the query interval, from cache when possible
    pub fn get(&self) -> Arc<Vec<SeriesPoint<T>>> {
        let query = self.query.snapshot();
        let mut cache = self.cache.lock();

        if let Some(points) = &cache.points {
            if !cache.stale && cache.key == query && !is_unbounded(query.max) {
                return points.clone();
            }
        }

        let points = Arc::new(self.source.data_for_range(query));
        trace!(
            min = query.min,
            max = query.max,
            len = points.len(),
            "windowed view refreshed"
        );
        cache.points = Some(points.clone());
        cache.key = query;
        cache.stale = false;
        points
    }

    /// Force the next `get` to re-query the source
    pub fn invalidate(&self) {
        self.cache.lock().stale = true;
    }

    /// True if the next `get` would be served from cache
    pub fn is_cached(&self) -> bool {
        let query = self.query.snapshot();
        let cache = self.cache.lock();
        cache.points.is_some() && !cache.stale && cache.key == query && !is_unbounded(query.max)
    }

    pub fn query(&self) -> &Interval {
        &self.query
    }
}

impl<T> fmt::Debug for WindowedView<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WindowedView")
            .field("query", &self.query)
            .finish()
    }
}
