// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Basic usage of Understory Spatial Tree: insert, relocate, remove, and query.

use understory_spatial_tree::{BoundingBox, Datum, QuadTree, TreeConfig};

fn main() {
    let world = BoundingBox::new([0.0, 0.0], [100.0, 100.0]).unwrap();
    let mut tree: QuadTree<u32> =
        QuadTree::with_config(world, TreeConfig::new(2).with_max_data_per_leaf(1)).unwrap();

    let mut ids = Vec::new();
    for (i, spot) in [[10.0, 10.0], [90.0, 10.0], [10.0, 90.0], [90.0, 90.0], [60.0, 40.0]]
        .into_iter()
        .enumerate()
    {
        let id = tree.mint_id();
        let leaf = tree.insert(Datum::point(id, spot, i as u32)).unwrap();
        println!("{id} -> leaf depth {:?}", tree.depth(leaf));
        ids.push(id);
    }
    println!("nodes: {}", tree.node_count());

    // Move the last point
    let leaf = tree.insert(Datum::point(ids[4], [20.0, 20.0], 4)).unwrap();
    println!("moved {} to leaf {:?}", ids[4], tree.bounds(leaf));

    // Query a box
    let hits = tree.data_in(&BoundingBox::new([0.0, 0.0], [40.0, 40.0]).unwrap());
    println!("data in [0, 40]^2: {:?}", hits);

    let _ = tree.remove(ids[0]);
    println!("after remove: {} data", tree.len());
}
