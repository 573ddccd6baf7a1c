// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use understory_series::backends::FlatSeries;
use understory_series::{PointTree, SeriesConfig, SeriesQuery};

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_f64(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) / ((1u64 << 53) as f64)
    }
}

/// A random walk sampled at unit-ish intervals: `[t, value, volume]`.
fn gen_walk(count: usize) -> Vec<[f64; 3]> {
    let mut rng = Rng::new(0x5E41_E5C0_FFEE_0001);
    let mut out = Vec::with_capacity(count);
    let mut t = 0.0;
    let mut v = 100.0;
    for _ in 0..count {
        t += 0.5 + rng.next_f64();
        v += rng.next_f64() - 0.5;
        out.push([t, v, rng.next_f64() * 1000.0]);
    }
    out
}

/// Query times spread over the walk's time span.
fn gen_probes(points: &[[f64; 3]], count: usize) -> Vec<f64> {
    let span = points.last().map_or(0.0, |p| p[0]);
    let mut rng = Rng::new(0xBADC_F00D_1234_5678);
    (0..count).map(|_| rng.next_f64() * span).collect()
}

fn config_for(n: usize) -> SeriesConfig {
    SeriesConfig::new(20, n.max(2000)).unwrap()
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");
    for &n in &[1_000usize, 10_000, 100_000] {
        let points = gen_walk(n);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("bulk_n{}", n), |b| {
            b.iter(|| black_box(PointTree::with_config(&points, config_for(n)).unwrap()));
        });
        group.bench_function(format!("append_n{}", n), |b| {
            b.iter_batched(
                || PointTree::empty(config_for(n)),
                |mut tree| {
                    tree.extend(&points).unwrap();
                    black_box(tree.len());
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_streaming_cap(c: &mut Criterion) {
    let mut group = c.benchmark_group("streaming");
    let points = gen_walk(20_000);
    group.throughput(Throughput::Elements(points.len() as u64));
    group.bench_function("append_default_cap", |b| {
        b.iter_batched(
            PointTree::default,
            |mut tree| {
                tree.extend(&points).unwrap();
                black_box(tree.len());
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

fn bench_queries<S: SeriesQuery>(c: &mut Criterion, name: &str, make: impl Fn(&[[f64; 3]]) -> S) {
    let mut group = c.benchmark_group(name);
    for &n in &[1_000usize, 10_000, 100_000] {
        let points = gen_walk(n);
        let probes = gen_probes(&points, 256);
        let series = make(&points);
        group.throughput(Throughput::Elements(probes.len() as u64));
        group.bench_function(format!("limits_window_n{}", n), |b| {
            b.iter(|| {
                for &t in &probes {
                    black_box(series.limits(t, t + 200.0, 0).unwrap());
                }
            });
        });
        group.bench_function(format!("count_window_n{}", n), |b| {
            b.iter(|| {
                let total: usize = probes.iter().map(|&t| series.count_in(t, t + 200.0)).sum();
                black_box(total);
            });
        });
        group.bench_function(format!("nearest_n{}", n), |b| {
            b.iter(|| {
                for &t in &probes {
                    black_box(series.points(t, 9).unwrap());
                }
            });
        });
    }
    group.finish();
}

fn bench_tree(c: &mut Criterion) {
    bench_queries(c, "tree", |points| {
        PointTree::with_config(points, config_for(points.len())).unwrap()
    });
}

fn bench_flat(c: &mut Criterion) {
    bench_queries(c, "flat", |points| FlatSeries::new(points).unwrap());
}

criterion_group!(
    benches,
    bench_build,
    bench_streaming_cap,
    bench_tree,
    bench_flat
);
criterion_main!(benches);
