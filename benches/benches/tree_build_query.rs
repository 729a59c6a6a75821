// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use understory_cube::{Cube, CubeTree, SplitConfig, Strategy, TreeConfig};

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

fn gen_grid_cubes(n: usize, cell: f64) -> Vec<Cube> {
    let mut out = Vec::with_capacity(n * n);
    for y in 0..n {
        for x in 0..n {
            let x0 = x as f64 * cell;
            let y0 = y as f64 * cell;
            out.push(Cube::from_corners(&[x0, y0], &[x0 + cell, y0 + cell]).unwrap());
        }
    }
    out
}

fn gen_random_cubes(dim: usize, count: usize, extent: f64, side: f64) -> Vec<Cube> {
    let mut rng = Rng::new(0xC1A5_7E55_9999_ABCD);
    (0..count)
        .map(|_| {
            let ll: Vec<f64> = (0..dim).map(|_| rng.next_f64() * extent).collect();
            let ur: Vec<f64> = ll.iter().map(|v| v + side).collect();
            Cube::from_corners(&ll, &ur).unwrap()
        })
        .collect()
}

fn build(cubes: &[Cube], config: TreeConfig) -> CubeTree<u32> {
    let mut tree = CubeTree::with_config(config).unwrap();
    for (i, c) in cubes.iter().enumerate() {
        tree.insert(c.clone(), i as u32).unwrap();
    }
    tree
}

fn bench_grid_2d(c: &mut Criterion) {
    let mut group = c.benchmark_group("tree_grid_2d");
    let query = Cube::from_corners(&[100.0, 100.0], &[500.0, 500.0]).unwrap();
    for &n in &[32usize, 64] {
        let cubes = gen_grid_cubes(n, 10.0);
        group.throughput(Throughput::Elements((n * n) as u64));
        for (name, split) in [
            ("linear", SplitConfig::default()),
            ("quadratic", SplitConfig::default().with_quadratic_min_dim(0)),
        ] {
            let config = TreeConfig {
                split,
                ..TreeConfig::default()
            };
            group.bench_function(format!("{}_build_query_n{}", name, n), |b| {
                b.iter_batched(
                    || cubes.clone(),
                    |cubes| {
                        let tree = build(&cubes, config);
                        black_box(tree.search(&query, Strategy::Overlap).len());
                    },
                    BatchSize::SmallInput,
                )
            });
        }
    }
    group.finish();
}

fn bench_query_heavy(c: &mut Criterion) {
    for &dim in &[3usize, 9] {
        let mut group = c.benchmark_group(format!("tree_query_heavy_dim{}", dim));
        let cubes = gen_random_cubes(dim, 4096, 1000.0, 20.0);
        let tree = build(&cubes, TreeConfig::default());
        let queries = gen_random_cubes(dim, 256, 1000.0, 100.0);
        for strategy in [Strategy::Overlap, Strategy::ContainedBy] {
            group.bench_function(format!("{:?}_256_queries", strategy), |b| {
                b.iter(|| {
                    let mut total = 0usize;
                    for q in &queries {
                        total += tree.search(q, strategy).len();
                    }
                    black_box(total)
                })
            });
        }
        group.finish();
    }
}

criterion_group!(benches, bench_grid_2d, bench_query_heavy);
criterion_main!(benches);
