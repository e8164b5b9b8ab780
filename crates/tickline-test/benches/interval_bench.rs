//! Benchmarks for tickline interval operations

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use std::sync::Arc;

use tickline_core::{Interval, Observer, Span};
use tickline_series::{DataSeries, DefaultDataSeries, WindowedView};

fn bench_span_intersection(c: &mut Criterion) {
    let a = Span::new(0.0, 1000.0);
    let b = Span::new(500.0, 1500.0);

    c.bench_function("span_intersection", |bench| {
        bench.iter(|| black_box(a).intersection(black_box(&b)))
    });
}

fn bench_span_subtract(c: &mut Criterion) {
    let a = Span::new(0.0, 1000.0);
    let b = Span::new(250.0, 750.0);

    c.bench_function("span_subtract", |bench| {
        bench.iter(|| black_box(a).subtract(black_box(&b)))
    });
}

fn bench_interval_set(c: &mut Criterion) {
    let mut group = c.benchmark_group("interval_set");

    for observers in [0usize, 1, 8] {
        let interval = Interval::new(0.0, 0.0);
        let held: Vec<Observer> = (0..observers)
            .map(|_| {
                let observer = Observer::new();
                interval.on_change(&observer, || {});
                observer
            })
            .collect();

        let mut i = 0u64;
        group.bench_function(format!("{}_observers", observers), |bench| {
            bench.iter(|| {
                i = i.wrapping_add(1);
                interval.set(0.0, black_box(i as f64));
            })
        });
        drop(held);
    }

    group.finish();
}

fn bench_windowed_view(c: &mut Criterion) {
    let series = Arc::new(DefaultDataSeries::new());
    for x in 0..10_000i64 {
        series.add(x * 1000, x);
    }
    let source: Arc<dyn DataSeries<i64>> = series;
    let query = Interval::new(2_000_000.0, 4_000_000.0);
    let view = WindowedView::new(query, source);

    let mut group = c.benchmark_group("windowed_view");
    group.bench_function("hit", |b| b.iter(|| black_box(view.get())));
    group.bench_function("miss", |b| {
        b.iter(|| {
            view.invalidate();
            black_box(view.get())
        })
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_span_intersection,
    bench_span_subtract,
    bench_interval_set,
    bench_windowed_view,
);
criterion_main!(benches);
