// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Moving points.
//!
//! Simulate a handful of agents drifting around a quadtree. Each step re-inserts every agent
//! under its existing id, which relocates it within the tree.
//!
//! Run:
//! - `RUST_LOG=understory_spatial_tree=trace cargo run -p understory_demos --example moving_points`

use tracing_subscriber::EnvFilter;
use understory_spatial_tree::{BoundingBox, Datum, QuadTree, TreeConfig, TreeError};

const SIZE: f64 = 64.0;

fn main() -> Result<(), TreeError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let world = BoundingBox::new([0.0, 0.0], [SIZE, SIZE])?;
    let mut tree: QuadTree<[f64; 2]> =
        QuadTree::with_config(world, TreeConfig::new(4).with_max_data_per_leaf(1))?;

    // Payload is the agent's velocity.
    let agents = [
        ([4.0, 4.0], [3.0, 1.0]),
        ([60.0, 8.0], [-2.5, 2.0]),
        ([30.0, 50.0], [1.0, -4.0]),
        ([10.0, 40.0], [4.0, 0.5]),
    ];
    let mut ids = Vec::new();
    for (spot, velocity) in agents {
        let id = tree.mint_id();
        let _ = tree.insert(Datum::point(id, spot, velocity))?;
        ids.push(id);
    }

    for step in 0..8 {
        for id in &ids {
            let Some(datum) = tree.get(*id) else {
                continue;
            };
            let Some(&[x, y]) = datum.location() else {
                continue;
            };
            let [mut vx, mut vy] = *datum.payload();
            // Bounce off the walls.
            if !(0.0..=SIZE).contains(&(x + vx)) {
                vx = -vx;
            }
            if !(0.0..=SIZE).contains(&(y + vy)) {
                vy = -vy;
            }
            let next = [x + vx, y + vy];
            let leaf = tree.insert(Datum::point(*id, next, [vx, vy]))?;
            println!(
                "step {step}: agent {id} at ({:.1}, {:.1}) in leaf at depth {:?}",
                next[0],
                next[1],
                tree.depth(leaf)
            );
        }
        if let Some((id, d2)) = tree.nearest(&[SIZE / 2.0, SIZE / 2.0]) {
            tracing::info!(step, %id, distance = d2.sqrt(), "closest to the centre");
        }
    }

    println!("{} nodes after simulation", tree.node_count());
    tree.clear();
    println!("{} node after clear", tree.node_count());
    Ok(())
}
