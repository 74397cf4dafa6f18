// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use understory_spatial_tree::{BoundingBox, Datum, QuadTree, TreeConfig};

const WORLD: f64 = 2000.0;

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

fn gen_points(count: usize, seed: u64) -> Vec<[f64; 2]> {
    let mut rng = Rng::new(seed);
    (0..count)
        .map(|_| [rng.next_f64() * WORLD, rng.next_f64() * WORLD])
        .collect()
}

fn gen_clustered_points(n_clusters: usize, per_cluster: usize, spread: f64) -> Vec<[f64; 2]> {
    let mut rng = Rng::new(0xC1A5_7E55_9999_ABCD);
    let mut out = Vec::with_capacity(n_clusters * per_cluster);
    for _ in 0..n_clusters {
        let (cx, cy) = (rng.next_f64() * WORLD, rng.next_f64() * WORLD);
        for _ in 0..per_cluster {
            let x = (cx + (rng.next_f64() - 0.5) * spread).clamp(0.0, WORLD);
            let y = (cy + (rng.next_f64() - 0.5) * spread).clamp(0.0, WORLD);
            out.push([x, y]);
        }
    }
    out
}

fn world() -> BoundingBox<2> {
    BoundingBox::new([0.0, 0.0], [WORLD, WORLD]).unwrap()
}

fn build(points: &[[f64; 2]], capacity: usize) -> QuadTree<u32> {
    let config = TreeConfig::new(10).with_max_data_per_leaf(capacity);
    let mut tree = QuadTree::with_config(world(), config).unwrap();
    for (i, p) in points.iter().enumerate() {
        let id = tree.mint_id();
        let _ = tree.insert(Datum::point(id, *p, i as u32)).unwrap();
    }
    tree
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert_points");
    for &n in &[1_000usize, 10_000] {
        let points = gen_points(n, 0xCAFE_F00D_DEAD_BEEF);
        group.throughput(Throughput::Elements(n as u64));
        for &capacity in &[4usize, 16] {
            group.bench_function(format!("uniform_n{}_cap{}", n, capacity), |b| {
                b.iter(|| black_box(build(&points, capacity).node_count()));
            });
        }
    }
    let clustered = gen_clustered_points(20, 500, 40.0);
    group.throughput(Throughput::Elements(clustered.len() as u64));
    group.bench_function("clustered_n10000_cap8", |b| {
        b.iter(|| black_box(build(&clustered, 8).node_count()));
    });
    group.finish();
}

fn bench_relocate(c: &mut Criterion) {
    let mut group = c.benchmark_group("relocate_points");
    let n = 10_000usize;
    let points = gen_points(n, 0xBADC_F00D_1234_5678);
    let mut rng = Rng::new(0xFACE_FEED_CAFE_BABE);
    let jitter: Vec<[f64; 2]> = (0..n)
        .map(|_| [(rng.next_f64() - 0.5) * 8.0, (rng.next_f64() - 0.5) * 8.0])
        .collect();
    let far = gen_points(n, 0x0DDB_A11C_AFE0_0001);
    group.throughput(Throughput::Elements(n as u64));
    for (name, moves) in [("short_moves", true), ("far_moves", false)] {
        group.bench_function(name, |b| {
            b.iter_batched(
                || build(&points, 8),
                |mut tree| {
                    let ids: Vec<_> = tree.iter().map(|d| d.id()).collect();
                    for (i, id) in ids.into_iter().enumerate() {
                        let target = if moves {
                            let [x, y] = points[i];
                            [
                                (x + jitter[i][0]).clamp(0.0, WORLD),
                                (y + jitter[i][1]).clamp(0.0, WORLD),
                            ]
                        } else {
                            far[i]
                        };
                        let _ = tree.insert(Datum::point(id, target, i as u32));
                    }
                    black_box(tree.node_count());
                },
                BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

fn bench_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("queries");
    let tree = build(&gen_points(10_000, 0xCAFE_F00D_DEAD_BEEF), 8);
    let queries = gen_points(256, 0x5EED_5EED_5EED_5EED);
    group.throughput(Throughput::Elements(queries.len() as u64));
    group.bench_function("search_box_50", |b| {
        b.iter(|| {
            let mut hits = 0;
            for [x, y] in &queries {
                let query = BoundingBox::new([*x - 25.0, *y - 25.0], [*x + 25.0, *y + 25.0]);
                hits += tree.search(&query.unwrap()).len();
            }
            black_box(hits)
        });
    });
    group.bench_function("data_in_box_50", |b| {
        b.iter(|| {
            let mut hits = 0;
            for [x, y] in &queries {
                let query = BoundingBox::new([*x - 25.0, *y - 25.0], [*x + 25.0, *y + 25.0]);
                hits += tree.data_in(&query.unwrap()).len();
            }
            black_box(hits)
        });
    });
    group.bench_function("search_segment", |b| {
        b.iter(|| {
            let mut hits = 0;
            for pair in queries.chunks_exact(2) {
                hits += tree.search_segment(&pair[0], &pair[1]).len();
            }
            black_box(hits)
        });
    });
    group.bench_function("nearest", |b| {
        b.iter(|| {
            let mut total = 0.0;
            for p in &queries {
                total += tree.nearest(p).map_or(0.0, |(_, d)| d);
            }
            black_box(total)
        });
    });
    group.finish();
}

criterion_group!(benches, bench_insert, bench_relocate, bench_queries);
criterion_main!(benches);
