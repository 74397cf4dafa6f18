// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Octree segment queries.
//!
//! Pre-subdivide an octree, drop in some boxes, and find which leaves a ray segment crosses.
//!
//! Run:
//! - `cargo run -p understory_demos --example octree_segments`

use tracing_subscriber::EnvFilter;
use understory_spatial_tree::{BoundingBox, Datum, OctTree, TreeConfig, TreeError};

fn main() -> Result<(), TreeError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let room = BoundingBox::new([0.0; 3], [16.0; 3])?;
    let mut tree: OctTree<&str> = OctTree::with_config(room, TreeConfig::new(4))?;
    tree.subdivide(2);
    println!("{} nodes after subdividing two levels", tree.node_count());

    let furniture = [
        ([1.0, 1.0, 0.0], [5.0, 3.0, 2.0], "table"),
        ([10.0, 10.0, 0.0], [15.0, 15.0, 1.0], "bed"),
        ([7.0, 0.0, 0.0], [9.0, 1.0, 12.0], "shelf"),
    ];
    for (least, greatest, name) in furniture {
        let id = tree.mint_id();
        let _ = tree.insert_area(Datum::area(id, BoundingBox::new(least, greatest)?, name))?;
    }

    let (eye, target) = ([0.5, 0.5, 6.0], [15.0, 14.0, 0.5]);
    let leaves = tree.search_segment(&eye, &target);
    println!("segment crosses {} occupied leaves", leaves.len());
    for leaf in leaves {
        let names: Vec<_> = tree
            .data(leaf)
            .iter()
            .filter_map(|id| tree.get(*id).map(|d| *d.payload()))
            .collect();
        println!("  leaf {:?}: {:?}", tree.bounds(leaf), names);
    }
    Ok(())
}
