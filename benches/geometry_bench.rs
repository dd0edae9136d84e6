//! Benchmarks for cross-section geometry.
//!
//! Run with: `cargo bench --bench geometry_bench`

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use saint_venant::{Channel, ChannelGeometry, normal_depth};

fn shapes() -> Vec<(&'static str, ChannelGeometry)> {
    vec![
        ("rectangular", ChannelGeometry::rectangular(10.0).unwrap()),
        ("trapezoidal", ChannelGeometry::trapezoidal(10.0, 2.0).unwrap()),
        (
            "compound",
            ChannelGeometry::compound_symmetric(10.0, 1.5, 3.0, 40.0, 3.0).unwrap(),
        ),
    ]
}

/// Benchmark area, top width and the inverse depth lookup over a depth sweep.
fn bench_section_properties(c: &mut Criterion) {
    let mut group = c.benchmark_group("section_properties");
    let depths: Vec<f64> = (1..=1000).map(|i| i as f64 * 0.005).collect();

    for (name, geometry) in shapes() {
        group.bench_with_input(BenchmarkId::new("area_top_width", name), &geometry, |b, g| {
            b.iter(|| {
                depths
                    .iter()
                    .map(|&h| g.area_unchecked(black_box(h)) + g.top_width_unchecked(h))
                    .sum::<f64>()
            });
        });

        let areas: Vec<f64> = depths.iter().map(|&h| geometry.area_unchecked(h)).collect();
        group.bench_with_input(BenchmarkId::new("depth_from_area", name), &geometry, |b, g| {
            b.iter(|| {
                areas
                    .iter()
                    .map(|&a| g.depth_from_area(black_box(a)))
                    .sum::<f64>()
            });
        });
    }

    group.finish();
}

/// Benchmark the Manning normal-depth solve.
fn bench_normal_depth(c: &mut Criterion) {
    let mut group = c.benchmark_group("normal_depth");

    for (name, geometry) in shapes() {
        let channel = Channel::new(geometry, 0.001, 0.03).unwrap();
        group.bench_with_input(BenchmarkId::new("q_50", name), &channel, |b, ch| {
            b.iter(|| normal_depth(black_box(ch), black_box(50.0)).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_section_properties, bench_normal_depth);
criterion_main!(benches);
