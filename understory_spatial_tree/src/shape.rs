// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Geometry bounded by area data.

use crate::bounds::BoundingBox;
use crate::error::TreeError;

/// Straight segment between two finite points.
///
/// The envelope is computed once at construction.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Segment<const D: usize> {
    start: [f64; D],
    end: [f64; D],
    envelope: BoundingBox<D>,
}

impl<const D: usize> Segment<D> {
    /// Create a segment from `start` to `end`. The endpoints may coincide.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::InvalidBox`] naming the first axis with a non-finite coordinate.
    pub fn new(start: [f64; D], end: [f64; D]) -> Result<Self, TreeError> {
        Ok(Self {
            start,
            end,
            envelope: BoundingBox::from_corners(start, end)?,
        })
    }

    /// First endpoint.
    pub const fn start(&self) -> &[f64; D] {
        &self.start
    }

    /// Second endpoint.
    pub const fn end(&self) -> &[f64; D] {
        &self.end
    }

    /// Smallest box containing the segment.
    pub const fn envelope(&self) -> &BoundingBox<D> {
        &self.envelope
    }

    /// Squared distance from `point` to the closest point of the segment.
    pub fn distance_squared_from(&self, point: &[f64; D]) -> f64 {
        let mut along = 0.0;
        let mut length_squared = 0.0;
        for axis in 0..D {
            let d = self.end[axis] - self.start[axis];
            along += (point[axis] - self.start[axis]) * d;
            length_squared += d * d;
        }
        let t = if length_squared > 0.0 {
            (along / length_squared).clamp(0.0, 1.0)
        } else {
            0.0
        };
        (0..D)
            .map(|axis| {
                let closest = self.start[axis] + t * (self.end[axis] - self.start[axis]);
                let d = point[axis] - closest;
                d * d
            })
            .sum()
    }
}

/// Geometry of an area datum.
///
/// Overlap tests run against the shape itself, so a thin diagonal shape only lands in the leaves
/// it actually crosses rather than every leaf under its envelope.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Shape<const D: usize> {
    /// An axis-aligned box, e.g. a conservative footprint of a mesh.
    Box(BoundingBox<D>),
    /// A straight segment, e.g. one edge of a route network.
    Segment(Segment<D>),
}

impl<const D: usize> Shape<D> {
    /// Smallest box containing the shape.
    pub fn envelope(&self) -> BoundingBox<D> {
        match self {
            Self::Box(b) => *b,
            Self::Segment(s) => s.envelope,
        }
    }

    /// Whether the shape overlaps `bounds` at all (touching counts).
    pub fn intersects(&self, bounds: &BoundingBox<D>) -> bool {
        match self {
            Self::Box(b) => b.intersects(bounds),
            Self::Segment(s) => bounds.intersects_segment(&s.start, &s.end),
        }
    }

    /// Whether the shape lies entirely inside `bounds`.
    pub fn is_wholly_contained_in(&self, bounds: &BoundingBox<D>) -> bool {
        match self {
            Self::Box(b) => bounds.contains(b),
            // Boxes are convex, so both endpoints inside means the whole segment is.
            Self::Segment(s) => bounds.contains_point(&s.start) && bounds.contains_point(&s.end),
        }
    }

    /// Squared distance from `point` to the shape; zero when it is covered.
    pub fn distance_squared_from(&self, point: &[f64; D]) -> f64 {
        match self {
            Self::Box(b) => b.distance_squared_from(point),
            Self::Segment(s) => s.distance_squared_from(point),
        }
    }
}

impl<const D: usize> From<BoundingBox<D>> for Shape<D> {
    fn from(bounds: BoundingBox<D>) -> Self {
        Self::Box(bounds)
    }
}

impl<const D: usize> From<Segment<D>> for Shape<D> {
    fn from(segment: Segment<D>) -> Self {
        Self::Segment(segment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit() -> BoundingBox<2> {
        BoundingBox::new([0.0, 0.0], [1.0, 1.0]).unwrap()
    }

    #[test]
    fn segment_rejects_non_finite_endpoints() {
        assert_eq!(
            Segment::new([0.0, 0.0], [1.0, f64::NAN]),
            Err(TreeError::InvalidBox { axis: 1 })
        );
        let s = Segment::new([3.0, 0.0], [1.0, 2.0]).unwrap();
        assert_eq!(s.envelope().least(), &[1.0, 0.0]);
        assert_eq!(s.envelope().greatest(), &[3.0, 2.0]);
    }

    #[test]
    fn segment_overlap_ignores_empty_envelope_corners() {
        // The envelope [0.5, 2.5]^2 covers the unit box's corner, the segment does not.
        let s = Shape::from(Segment::new([0.5, 2.5], [2.5, 0.5]).unwrap());
        assert!(s.envelope().intersects(&unit()));
        assert!(!s.intersects(&unit()));

        let crossing = Shape::from(Segment::new([-1.0, 0.5], [2.0, 0.5]).unwrap());
        assert!(crossing.intersects(&unit()));
        assert!(!crossing.is_wholly_contained_in(&unit()));
    }

    #[test]
    fn segment_inside_box() {
        let s = Shape::from(Segment::new([0.2, 0.2], [0.8, 0.9]).unwrap());
        assert!(s.is_wholly_contained_in(&unit()));
        assert!(s.intersects(&unit()));
    }

    #[test]
    fn segment_distances() {
        let s = Segment::new([0.0, 0.0], [10.0, 0.0]).unwrap();
        assert_eq!(s.distance_squared_from(&[4.0, 3.0]), 9.0);
        assert_eq!(s.distance_squared_from(&[-3.0, 4.0]), 25.0);
        assert_eq!(s.distance_squared_from(&[13.0, 0.0]), 9.0);
        let dot = Segment::new([1.0, 1.0], [1.0, 1.0]).unwrap();
        assert_eq!(dot.distance_squared_from(&[4.0, 5.0]), 25.0);
    }

    #[test]
    fn box_shape_matches_box_predicates() {
        let b = BoundingBox::new([0.5, 0.5], [3.0, 3.0]).unwrap();
        let shape = Shape::from(b);
        assert!(shape.intersects(&unit()));
        assert!(!shape.is_wholly_contained_in(&unit()));
        assert_eq!(shape.envelope(), b);
        assert_eq!(shape.distance_squared_from(&[4.0, 1.0]), 1.0);
    }
}
