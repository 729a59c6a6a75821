// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use understory_cube::{Cube, LinearSplit, QuadraticSplit, SplitConfig, Splitter};

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

/// `count` boxes of side `side` scattered uniformly in `[0, extent)^dim`.
fn gen_random_cubes(dim: usize, count: usize, extent: f64, side: f64, seed: u64) -> Vec<Cube> {
    let mut rng = Rng::new(seed);
    (0..count)
        .map(|_| {
            let ll: Vec<f64> = (0..dim).map(|_| rng.next_f64() * extent).collect();
            let ur: Vec<f64> = ll.iter().map(|v| v + side).collect();
            Cube::from_corners(&ll, &ur).unwrap()
        })
        .collect()
}

/// Boxes packed along the first axis with heavy overlap on every other axis.
fn gen_banded_cubes(dim: usize, count: usize) -> Vec<Cube> {
    let mut rng = Rng::new(0xBADC_F00D_1234_5678);
    (0..count)
        .map(|i| {
            let ll: Vec<f64> = (0..dim)
                .map(|d| if d == 0 { i as f64 * 4.0 } else { rng.next_f64() * 2.0 })
                .collect();
            let ur: Vec<f64> = ll.iter().map(|v| v + 3.0).collect();
            Cube::from_corners(&ll, &ur).unwrap()
        })
        .collect()
}

fn bench_splitters(c: &mut Criterion) {
    let config = SplitConfig::default();
    for &dim in &[2usize, 3, 8, 16] {
        let mut group = c.benchmark_group(format!("split_dim{}", dim));
        for &n in &[9usize, 33, 129] {
            let batch = gen_random_cubes(dim, n, 1000.0, 25.0, 0xCAFE_F00D_DEAD_BEEF);
            group.throughput(Throughput::Elements(n as u64));
            group.bench_function(format!("linear_random_n{}", n), |b| {
                b.iter_batched(
                    || batch.clone(),
                    |entries| black_box(LinearSplit.split(&entries, &config).unwrap()),
                    BatchSize::SmallInput,
                )
            });
            group.bench_function(format!("quadratic_random_n{}", n), |b| {
                b.iter_batched(
                    || batch.clone(),
                    |entries| black_box(QuadraticSplit.split(&entries, &config).unwrap()),
                    BatchSize::SmallInput,
                )
            });
        }
        let banded = gen_banded_cubes(dim, 65);
        group.bench_function("linear_banded_n65", |b| {
            b.iter(|| black_box(LinearSplit.split(&banded, &config).unwrap()))
        });
        group.bench_function("quadratic_banded_n65", |b| {
            b.iter(|| black_box(QuadraticSplit.split(&banded, &config).unwrap()))
        });
        group.finish();
    }
}

criterion_group!(benches, bench_splitters);
criterion_main!(benches);
