// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Quadtree basics.
//!
//! Fill a quadtree with points, a box area, and a segment area, then query it by rectangle, line,
//! distance, and nearest neighbour.
//!
//! Run:
//! - `cargo run -p understory_demos --example quadtree_basics`
//! - `RUST_LOG=understory_spatial_tree=debug cargo run -p understory_demos --example quadtree_basics`

use kurbo::{Line, Rect};
use tracing_subscriber::EnvFilter;
use understory_spatial_tree::{
    BoundingBox, Datum, DatumId, QuadTree, Segment, TreeConfig, TreeError,
};

fn main() -> Result<(), TreeError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let world = BoundingBox::try_from(Rect::new(0.0, 0.0, 100.0, 100.0))?;
    let mut tree: QuadTree<&str> =
        QuadTree::with_config(world, TreeConfig::new(3).with_max_data_per_leaf(2))?;

    let places = [
        ([12.0, 18.0], "bakery"),
        ([15.0, 22.0], "library"),
        ([19.0, 14.0], "school"),
        ([72.0, 65.0], "station"),
        ([80.0, 90.0], "harbour"),
    ];
    for (spot, name) in places {
        let id = tree.mint_id();
        let _ = tree.insert(Datum::point(id, spot, name))?;
    }
    let river = tree.mint_id();
    let _ = tree.insert_area(Datum::area(
        river,
        BoundingBox::new([0.0, 48.0], [100.0, 52.0])?,
        "river",
    ))?;
    let trail = tree.mint_id();
    let path = Segment::try_from(Line::new((5.0, 95.0), (45.0, 60.0)))?;
    let _ = tree.insert_area(Datum::segment(trail, path, "trail"))?;

    println!(
        "{} data in {} nodes ({} leaves)",
        tree.len(),
        tree.node_count(),
        tree.leaves().len()
    );

    let downtown = tree.data_in(&BoundingBox::try_from(Rect::new(10.0, 10.0, 20.0, 20.0))?);
    println!("downtown: {:?}", names(&tree, &downtown));

    // Leaves the road passes through; their data are candidates for an exact test.
    let road = Line::new((0.0, 0.0), (100.0, 100.0));
    for leaf in tree.search_line(road) {
        println!(
            "road crosses leaf {:?} at depth {:?}: {:?}",
            tree.bounds(leaf).map(|b| Rect::from(*b)),
            tree.depth(leaf),
            names(&tree, tree.data(leaf))
        );
    }

    let near_station = tree.within_distance(&[70.0, 60.0], 10.0);
    println!("within 10 of (70, 60): {:?}", names(&tree, &near_station));

    if let Some((id, d2)) = tree.nearest(&[50.0, 10.0]) {
        println!(
            "nearest to (50, 10): {:?} at distance {:.2}",
            names(&tree, &[id]),
            d2.sqrt()
        );
    }
    Ok(())
}

fn names(tree: &QuadTree<&'static str>, ids: &[DatumId]) -> Vec<&'static str> {
    ids.iter()
        .filter_map(|id| tree.get(*id).map(|d| *d.payload()))
        .collect()
}
