// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Interop with [`kurbo`] 2D geometry.

use alloc::vec::Vec;

use kurbo::{Line, Point, Rect};

use crate::bounds::BoundingBox;
use crate::datum::Extent;
use crate::error::TreeError;
use crate::node::NodeId;
use crate::shape::Segment;
use crate::tree::Tree;

impl TryFrom<Rect> for BoundingBox<2> {
    type Error = TreeError;

    /// Corners may be given in any order; non-finite coordinates are rejected.
    fn try_from(rect: Rect) -> Result<Self, Self::Error> {
        Self::from_corners([rect.x0, rect.y0], [rect.x1, rect.y1])
    }
}

impl From<BoundingBox<2>> for Rect {
    fn from(bounds: BoundingBox<2>) -> Self {
        let [x0, y0] = *bounds.least();
        let [x1, y1] = *bounds.greatest();
        Self::new(x0, y0, x1, y1)
    }
}

impl From<Point> for Extent<2> {
    fn from(point: Point) -> Self {
        Self::Point([point.x, point.y])
    }
}

impl TryFrom<Line> for Segment<2> {
    type Error = TreeError;

    fn try_from(line: Line) -> Result<Self, Self::Error> {
        Self::new([line.p0.x, line.p0.y], [line.p1.x, line.p1.y])
    }
}

impl<P> Tree<2, P> {
    /// [`search`](Self::search) with a kurbo rectangle.
    ///
    /// # Errors
    ///
    /// [`TreeError::InvalidBox`] if `rect` has non-finite coordinates.
    pub fn search_rect(&self, rect: Rect) -> Result<Vec<NodeId>, TreeError> {
        Ok(self.search(&BoundingBox::try_from(rect)?))
    }

    /// [`search_segment`](Self::search_segment) with a kurbo line.
    pub fn search_line(&self, line: Line) -> Vec<NodeId> {
        self.search_segment(&[line.p0.x, line.p0.y], &[line.p1.x, line.p1.y])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TreeConfig;
    use crate::datum::Datum;

    #[test]
    fn rect_round_trips_with_normalized_corners() {
        let bounds = BoundingBox::try_from(Rect::new(10.0, 8.0, 2.0, 4.0)).unwrap();
        assert_eq!(bounds.least(), &[2.0, 4.0]);
        assert_eq!(bounds.greatest(), &[10.0, 8.0]);
        assert_eq!(Rect::from(bounds), Rect::new(2.0, 4.0, 10.0, 8.0));
        assert!(BoundingBox::try_from(Rect::new(0.0, 0.0, f64::INFINITY, 1.0)).is_err());
    }

    #[test]
    fn rect_and_line_queries() {
        let root = BoundingBox::try_from(Rect::new(0.0, 0.0, 100.0, 100.0)).unwrap();
        let mut tree: Tree<2, &str> =
            Tree::with_config(root, TreeConfig::new(3).with_max_data_per_leaf(1)).unwrap();
        let home = tree.mint_id();
        let shop = tree.mint_id();
        let _ = tree
            .insert(Datum::point(home, [10.0, 10.0], "home"))
            .unwrap();
        let _ = tree
            .insert(Datum::point(shop, [80.0, 70.0], "shop"))
            .unwrap();

        let hits = tree.search_rect(Rect::new(0.0, 0.0, 20.0, 20.0)).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(tree.data(hits[0]), &[home]);

        let hits = tree.search_line(Line::new((60.0, 100.0), (100.0, 60.0)));
        assert_eq!(hits.len(), 1);
        assert_eq!(tree.data(hits[0]), &[shop]);
    }

    #[test]
    fn line_becomes_segment_area() {
        let root = BoundingBox::try_from(Rect::new(0.0, 0.0, 100.0, 100.0)).unwrap();
        let mut tree: Tree<2> = Tree::new(root, 2).unwrap();
        tree.subdivide(1);
        let road = Segment::try_from(Line::new((0.0, 10.0), (40.0, 45.0))).unwrap();
        let id = tree.mint_id();
        assert_eq!(tree.insert_area(Datum::segment(id, road, ())), Ok(true));
        assert_eq!(tree.search_rect(Rect::new(0.0, 0.0, 100.0, 100.0)).unwrap().len(), 1);
        assert!(Segment::try_from(Line::new((0.0, f64::NAN), (1.0, 1.0))).is_err());
    }

    #[test]
    fn point_extent() {
        assert_eq!(
            Extent::from(Point::new(1.0, 2.0)),
            Extent::Point([1.0, 2.0])
        );
    }
}
