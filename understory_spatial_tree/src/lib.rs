// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Spatial Tree: a generalized quadtree/octree over `D`-dimensional boxes.
//!
//! The tree recursively partitions an axis-aligned root box. Every interior node is split at its
//! centroid on every axis into exactly `2^D` children, so `D = 2` gives a quadtree and `D = 3`
//! an octree. All data live at leaves.
//!
//! - Point data live in exactly one leaf and can be relocated cheaply by re-inserting their id.
//! - Area data (a box footprint or a line [`Segment`]) are copied into every leaf their
//!   [`Shape`] overlaps.
//! - Query by box, by line segment, by distance, or for the nearest datum.
//! - Leaves subdivide once they hold [`TreeConfig::max_data_per_leaf`] data, down to
//!   [`TreeConfig::max_depth`].
//!
//! Queries return [`NodeId`] and [`DatumId`] handles instead of borrows, so results may be kept
//! while the tree changes. Node handles are generational and go stale on [`Tree::clear`].
//!
//! # Example
//!
//! ```rust
//! use understory_spatial_tree::{BoundingBox, Datum, QuadTree, TreeConfig};
//!
//! let world = BoundingBox::new([0.0, 0.0], [100.0, 100.0]).unwrap();
//! let config = TreeConfig::new(4).with_max_data_per_leaf(2);
//! let mut tree: QuadTree<&str> = QuadTree::with_config(world, config).unwrap();
//!
//! let cafe = tree.mint_id();
//! tree.insert(Datum::point(cafe, [20.0, 30.0], "cafe")).unwrap();
//! let park = tree.mint_id();
//! let footprint = BoundingBox::new([40.0, 40.0], [70.0, 60.0]).unwrap();
//! assert!(tree.insert_area(Datum::area(park, footprint, "park")).unwrap());
//!
//! // Move the cafe across town.
//! tree.insert(Datum::point(cafe, [65.0, 55.0], "cafe")).unwrap();
//!
//! let nearby = tree.data_in(&BoundingBox::new([60.0, 50.0], [70.0, 60.0]).unwrap());
//! assert_eq!(nearby, vec![cafe, park]);
//!
//! // A line from the origin crosses the park.
//! assert!(!tree.search_segment(&[0.0, 0.0], &[50.0, 50.0]).is_empty());
//! ```
//!
//! 2D trees also accept [`kurbo`] rectangles and lines, see [`Tree::search_rect`] and
//! [`Tree::search_line`].
//!
//! ## Logging
//!
//! Subdivision and data movement are reported through [`tracing`] at `debug` and `trace`
//! levels. No subscriber is installed by this crate.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod bounds;
pub mod config;
pub mod datum;
pub mod error;
mod interop;
mod node;
pub mod shape;
pub mod tree;

pub use bounds::{BoundingBox, Outcode};
pub use config::TreeConfig;
pub use datum::{Datum, DatumId, Extent, IdGenerator};
pub use error::TreeError;
pub use node::NodeId;
pub use shape::{Segment, Shape};
pub use tree::{OctTree, QuadTree, Tree};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases_pick_the_dimension() {
        let mut plane: QuadTree =
            QuadTree::new(BoundingBox::new([0.0; 2], [1.0; 2]).unwrap(), 2).unwrap();
        let mut space: OctTree =
            OctTree::new(BoundingBox::new([0.0; 3], [1.0; 3]).unwrap(), 2).unwrap();
        plane.subdivide(1);
        space.subdivide(1);
        assert_eq!(plane.children(plane.root()).len(), 4);
        assert_eq!(space.children(space.root()).len(), 8);
    }

    #[test]
    fn errors_render_ids() {
        let err = TreeError::NotRelocatable(DatumId::from_raw(3));
        assert!(alloc::format!("{err}").contains("#3"));
    }
}
