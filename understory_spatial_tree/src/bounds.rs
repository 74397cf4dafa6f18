// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Axis-aligned bounding boxes in `D` dimensions, and outcodes for segment clipping.

use crate::error::TreeError;

bitflags::bitflags! {
    /// Boundaries of a [`BoundingBox`] violated by a point.
    ///
    /// Axis `i` owns two bits: [`Outcode::below(i)`](Outcode::below) is set when the point lies
    /// below the box's least bound on that axis, [`Outcode::above(i)`](Outcode::above) when it
    /// lies above the greatest bound. An empty outcode means the point is inside the box.
    /// The 32-bit representation covers boxes of up to 16 axes.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Outcode: u32 {
        const _ = !0;
    }
}

impl Outcode {
    /// The point violates no boundary.
    pub const INSIDE: Self = Self::empty();

    /// Bit for "below the least bound on `axis`".
    pub const fn below(axis: usize) -> Self {
        Self::from_bits_retain(1_u32 << (2 * axis))
    }

    /// Bit for "above the greatest bound on `axis`".
    pub const fn above(axis: usize) -> Self {
        Self::from_bits_retain(1_u32 << (2 * axis + 1))
    }
}

/// Axis-aligned box in `D` dimensions.
///
/// A box is always well-formed: every bound is finite and `least[i] <= greatest[i]` on every
/// axis. Degenerate boxes (`least == greatest`) are valid and represent a single point.
///
/// The centroid is computed once and refreshed whenever a bound changes through
/// [`set_least`](Self::set_least) or [`set_greatest`](Self::set_greatest).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BoundingBox<const D: usize> {
    least: [f64; D],
    greatest: [f64; D],
    centroid: [f64; D],
}

impl<const D: usize> BoundingBox<D> {
    /// Create a box from its least and greatest corners.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::InvalidBox`] naming the first axis whose bounds are non-finite or
    /// inverted.
    pub fn new(least: [f64; D], greatest: [f64; D]) -> Result<Self, TreeError> {
        validate(&least, &greatest)?;
        Ok(Self::from_ordered(least, greatest))
    }

    /// Create the smallest box containing two arbitrary corners.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::InvalidBox`] if any coordinate is not finite.
    pub fn from_corners(a: [f64; D], b: [f64; D]) -> Result<Self, TreeError> {
        let mut least = a;
        let mut greatest = b;
        for axis in 0..D {
            if least[axis] > greatest[axis] {
                core::mem::swap(&mut least[axis], &mut greatest[axis]);
            }
        }
        Self::new(least, greatest)
    }

    /// Create a degenerate box covering a single point.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::InvalidBox`] if any coordinate is not finite.
    pub fn from_point(point: [f64; D]) -> Result<Self, TreeError> {
        Self::new(point, point)
    }

    fn from_ordered(least: [f64; D], greatest: [f64; D]) -> Self {
        let mut b = Self {
            least,
            greatest,
            centroid: [0.0; D],
        };
        b.refresh_centroid();
        b
    }

    fn refresh_centroid(&mut self) {
        for axis in 0..D {
            self.centroid[axis] = 0.5 * (self.least[axis] + self.greatest[axis]);
        }
    }

    /// Least corner.
    pub const fn least(&self) -> &[f64; D] {
        &self.least
    }

    /// Greatest corner.
    pub const fn greatest(&self) -> &[f64; D] {
        &self.greatest
    }

    /// Center of the box.
    pub const fn centroid(&self) -> &[f64; D] {
        &self.centroid
    }

    /// Replace the least corner.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::InvalidBox`] and leaves the box unchanged if the new corner would
    /// make the box malformed.
    pub fn set_least(&mut self, least: [f64; D]) -> Result<(), TreeError> {
        validate(&least, &self.greatest)?;
        self.least = least;
        self.refresh_centroid();
        Ok(())
    }

    /// Replace the greatest corner.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::InvalidBox`] and leaves the box unchanged if the new corner would
    /// make the box malformed.
    pub fn set_greatest(&mut self, greatest: [f64; D]) -> Result<(), TreeError> {
        validate(&self.least, &greatest)?;
        self.greatest = greatest;
        self.refresh_centroid();
        Ok(())
    }

    /// Whether the point lies inside the box (bounds inclusive).
    pub fn contains_point(&self, point: &[f64; D]) -> bool {
        (0..D).all(|axis| self.least[axis] <= point[axis] && point[axis] <= self.greatest[axis])
    }

    /// Squared Euclidean distance from the point to the box; zero inside.
    pub fn distance_squared_from(&self, point: &[f64; D]) -> f64 {
        let mut sum = 0.0;
        for axis in 0..D {
            let d = (point[axis] - self.greatest[axis])
                .max(self.least[axis] - point[axis])
                .max(0.0);
            sum += d * d;
        }
        sum
    }

    /// Whether the two boxes overlap on every axis (touching counts).
    pub fn intersects(&self, other: &Self) -> bool {
        (0..D).all(|axis| {
            self.least[axis] <= other.greatest[axis] && other.least[axis] <= self.greatest[axis]
        })
    }

    /// Whether `other` lies entirely inside this box.
    pub fn contains(&self, other: &Self) -> bool {
        (0..D).all(|axis| {
            self.least[axis] <= other.least[axis] && other.greatest[axis] <= self.greatest[axis]
        })
    }

    /// Boundaries of this box violated by `point`.
    pub fn outcode(&self, point: &[f64; D]) -> Outcode {
        let mut code = Outcode::INSIDE;
        for axis in 0..D {
            if point[axis] < self.least[axis] {
                code |= Outcode::below(axis);
            } else if point[axis] > self.greatest[axis] {
                code |= Outcode::above(axis);
            }
        }
        code
    }

    /// Whether the segment `p0 → p1` touches the box.
    ///
    /// Endpoints are classified by [`outcode`](Self::outcode). A segment with an endpoint inside
    /// is accepted immediately, and one whose endpoints share a violated boundary is rejected.
    /// Otherwise the parametric interval `[0, 1]` is clipped against every boundary on which the
    /// endpoints disagree; the segment intersects iff the interval stays non-empty.
    pub fn intersects_segment(&self, p0: &[f64; D], p1: &[f64; D]) -> bool {
        let c0 = self.outcode(p0);
        let c1 = self.outcode(p1);
        if c0.is_empty() || c1.is_empty() {
            return true;
        }
        if c0.intersects(c1) {
            return false;
        }
        let differ = c0 ^ c1;
        let (mut a, mut b) = (0.0_f64, 1.0_f64);
        for axis in 0..D {
            let delta = p1[axis] - p0[axis];
            for (side, boundary) in [
                (Outcode::below(axis), self.least[axis]),
                (Outcode::above(axis), self.greatest[axis]),
            ] {
                if !differ.contains(side) {
                    continue;
                }
                // Exactly one endpoint violates `side`, so `delta` is non-zero.
                let t = (boundary - p0[axis]) / delta;
                if c0.contains(side) {
                    a = a.max(t);
                } else {
                    b = b.min(t);
                }
                if a > b || a > 1.0 || b < 0.0 {
                    return false;
                }
            }
        }
        true
    }

    /// Split the box at its centroid along `axis`, returning `(lower, upper)` halves.
    ///
    /// # Panics
    ///
    /// Panics if `axis >= D`.
    pub fn subdivide_along_axis(&self, axis: usize) -> (Self, Self) {
        let split = self.centroid[axis];
        let mut left = *self;
        let mut right = *self;
        left.greatest[axis] = split;
        right.least[axis] = split;
        left.refresh_centroid();
        right.refresh_centroid();
        (left, right)
    }

    /// Product of the extents; zero for degenerate boxes.
    pub fn volume(&self) -> f64 {
        (0..D).fold(1.0, |acc, axis| acc * (self.greatest[axis] - self.least[axis]))
    }
}

fn validate<const D: usize>(least: &[f64; D], greatest: &[f64; D]) -> Result<(), TreeError> {
    for axis in 0..D {
        let (lo, hi) = (least[axis], greatest[axis]);
        if !(lo.is_finite() && hi.is_finite() && lo <= hi) {
            return Err(TreeError::InvalidBox { axis });
        }
    }
    Ok(())
}
