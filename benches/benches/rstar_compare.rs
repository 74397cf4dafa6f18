// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

#![cfg(feature = "compare_rstar")]

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use understory_spatial_tree::{BoundingBox, Datum, QuadTree, TreeConfig};

use rstar::{AABB, RTree};

const WORLD: f64 = 2000.0;

fn gen_grid_points(n: usize) -> Vec<[f64; 2]> {
    let cell = WORLD / n as f64;
    let mut out = Vec::with_capacity(n * n);
    for y in 0..n {
        for x in 0..n {
            out.push([(x as f64 + 0.5) * cell, (y as f64 + 0.5) * cell]);
        }
    }
    out
}

fn build(points: &[[f64; 2]]) -> QuadTree<u32> {
    let world = BoundingBox::new([0.0, 0.0], [WORLD, WORLD]).unwrap();
    let mut tree = QuadTree::with_config(world, TreeConfig::new(10).with_max_data_per_leaf(8))
        .unwrap();
    for (i, p) in points.iter().enumerate() {
        let id = tree.mint_id();
        let _ = tree.insert(Datum::point(id, *p, i as u32)).unwrap();
    }
    tree
}

fn bench_point_tree_compare(c: &mut Criterion) {
    let mut group = c.benchmark_group("point_tree_compare");
    for &n in &[64usize, 128] {
        let points = gen_grid_points(n);
        let (lo, hi) = ([100.0, 100.0], [500.0, 500.0]);
        group.throughput(Throughput::Elements((n * n) as u64));

        group.bench_function(format!("understory_build_query_n{}", n), |b| {
            b.iter(|| {
                let tree = build(&points);
                let query = BoundingBox::new(lo, hi).unwrap();
                black_box(tree.data_in(&query).len())
            });
        });

        group.bench_function(format!("rstar_build_query_bulk_n{}", n), |b| {
            b.iter_batched(
                || points.clone(),
                |points| {
                    let tree = RTree::bulk_load(points);
                    let hits = tree
                        .locate_in_envelope(&AABB::from_corners(lo, hi))
                        .count();
                    black_box(hits)
                },
                BatchSize::SmallInput,
            )
        });

        let ours = build(&points);
        let theirs = RTree::bulk_load(points.clone());
        let query = [WORLD * 0.37, WORLD * 0.61];
        group.bench_function(format!("understory_nearest_n{}", n), |b| {
            b.iter(|| black_box(ours.nearest(&query)));
        });
        group.bench_function(format!("rstar_nearest_n{}", n), |b| {
            b.iter(|| black_box(theirs.nearest_neighbor(&query).copied()));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_point_tree_compare);
criterion_main!(benches);
