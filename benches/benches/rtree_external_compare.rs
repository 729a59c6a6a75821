// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

#![cfg(feature = "compare_rstar")]

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use understory_cube::{Cube, CubeTree, Strategy};

use rstar::primitives::Rectangle;
use rstar::{AABB, RTree};

fn gen_grid_boxes(n: usize, cell: f64) -> Vec<([f64; 3], [f64; 3])> {
    let mut out = Vec::with_capacity(n * n * n);
    for z in 0..n {
        for y in 0..n {
            for x in 0..n {
                let lo = [x as f64 * cell, y as f64 * cell, z as f64 * cell];
                out.push((lo, [lo[0] + cell, lo[1] + cell, lo[2] + cell]));
            }
        }
    }
    out
}

fn to_cubes(v: &[([f64; 3], [f64; 3])]) -> Vec<Cube> {
    v.iter()
        .map(|(lo, hi)| Cube::from_corners(lo, hi).unwrap())
        .collect()
}

fn to_rstar_rects(v: &[([f64; 3], [f64; 3])]) -> Vec<Rectangle<[f64; 3]>> {
    v.iter()
        .map(|(lo, hi)| Rectangle::from_corners(*lo, *hi))
        .collect()
}

fn bench_rtree_external_compare_3d(c: &mut Criterion) {
    let mut group = c.benchmark_group("rtree_external_compare_3d");
    for &n in &[12usize, 20] {
        let boxes = gen_grid_boxes(n, 10.0);
        let (q_lo, q_hi) = ([30.0, 30.0, 30.0], [90.0, 90.0, 90.0]);
        let query = Cube::from_corners(&q_lo, &q_hi).unwrap();
        group.throughput(Throughput::Elements((n * n * n) as u64));

        group.bench_function(format!("understory_build_query_n{}", n), |b| {
            b.iter_batched(
                || to_cubes(&boxes),
                |cubes| {
                    let mut tree = CubeTree::new();
                    for (i, c) in cubes.into_iter().enumerate() {
                        tree.insert(c, i as u32).unwrap();
                    }
                    black_box(tree.search(&query, Strategy::Overlap).len());
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function(format!("rstar_build_query_n{}", n), |b| {
            b.iter_batched(
                || to_rstar_rects(&boxes),
                |rectangles| {
                    let mut tree = RTree::new();
                    for r in rectangles {
                        tree.insert(r);
                    }
                    let aabb = AABB::from_corners(q_lo, q_hi);
                    let hits: usize = tree.locate_in_envelope_intersecting(&aabb).count();
                    black_box(hits);
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function(format!("rstar_build_query_bulk_n{}", n), |b| {
            b.iter_batched(
                || to_rstar_rects(&boxes),
                |rectangles| {
                    let tree = RTree::bulk_load(rectangles);
                    let aabb = AABB::from_corners(q_lo, q_hi);
                    let hits: usize = tree.locate_in_envelope_intersecting(&aabb).count();
                    black_box(hits);
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_rtree_external_compare_3d);
criterion_main!(benches);
