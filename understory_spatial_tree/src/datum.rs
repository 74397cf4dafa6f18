// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Data stored in the tree: identifiers, extents, and the datum record itself.

use core::fmt;

use crate::bounds::BoundingBox;
use crate::shape::{Segment, Shape};

/// Stable identifier of a datum.
///
/// Ids are opaque to the tree: they track, relocate, and remove a record independently of
/// where it currently lives. They are minted by an [`IdGenerator`] (each [`Tree`](crate::Tree)
/// owns one, see [`Tree::mint_id`](crate::Tree::mint_id)) or built from an external key with
/// [`DatumId::from_raw`]. Callers that mix both sources are responsible for keeping them disjoint.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DatumId(u64);

impl DatumId {
    /// Wrap an externally managed key.
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw key.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for DatumId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Monotonic source of [`DatumId`]s.
///
/// The counter only moves forward, so an id is never handed out twice by the same generator.
#[derive(Clone, Debug, Default)]
pub struct IdGenerator {
    next: u64,
}

impl IdGenerator {
    /// A generator whose first id is `#0`.
    pub const fn new() -> Self {
        Self { next: 0 }
    }

    /// A generator whose first id is `first`, e.g. to continue after externally minted keys.
    pub const fn starting_at(first: u64) -> Self {
        Self { next: first }
    }

    /// Mint the next id.
    pub fn mint(&mut self) -> DatumId {
        let id = DatumId(self.next);
        self.next = self.next.saturating_add(1);
        id
    }
}

/// Spatial extent of a datum.
///
/// Points are inserted with [`Tree::insert`](crate::Tree::insert), live in exactly one leaf,
/// and can be relocated. Areas are inserted with
/// [`Tree::insert_area`](crate::Tree::insert_area) and are replicated into every leaf their
/// [`Shape`] overlaps.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Extent<const D: usize> {
    /// A single location.
    Point([f64; D]),
    /// Geometry with spatial extent.
    Area(Shape<D>),
}

impl<const D: usize> Extent<D> {
    /// True for [`Extent::Point`].
    pub const fn is_point(&self) -> bool {
        matches!(self, Self::Point(_))
    }

    /// Whether the extent lies entirely inside `bounds`.
    pub fn is_wholly_contained_in(&self, bounds: &BoundingBox<D>) -> bool {
        match self {
            Self::Point(p) => bounds.contains_point(p),
            Self::Area(shape) => shape.is_wholly_contained_in(bounds),
        }
    }

    /// Whether the extent overlaps `bounds` at all.
    pub fn is_partially_contained_in(&self, bounds: &BoundingBox<D>) -> bool {
        match self {
            Self::Point(p) => bounds.contains_point(p),
            Self::Area(shape) => shape.intersects(bounds),
        }
    }

    /// Squared distance from `point` to the extent; zero when the point is covered.
    pub fn distance_squared_from(&self, point: &[f64; D]) -> f64 {
        match self {
            Self::Point(p) => (0..D)
                .map(|axis| {
                    let d = p[axis] - point[axis];
                    d * d
                })
                .sum(),
            Self::Area(shape) => shape.distance_squared_from(point),
        }
    }
}

/// A record owned by the tree: id, extent, and caller payload.
#[derive(Clone, Debug, PartialEq)]
pub struct Datum<const D: usize, P = ()> {
    id: DatumId,
    extent: Extent<D>,
    payload: P,
}

impl<const D: usize, P> Datum<D, P> {
    /// A point datum at `location`.
    pub const fn point(id: DatumId, location: [f64; D], payload: P) -> Self {
        Self {
            id,
            extent: Extent::Point(location),
            payload,
        }
    }

    /// An area datum covering the box `footprint`.
    pub const fn area(id: DatumId, footprint: BoundingBox<D>, payload: P) -> Self {
        Self {
            id,
            extent: Extent::Area(Shape::Box(footprint)),
            payload,
        }
    }

    /// An area datum along `segment`.
    pub const fn segment(id: DatumId, segment: Segment<D>, payload: P) -> Self {
        Self {
            id,
            extent: Extent::Area(Shape::Segment(segment)),
            payload,
        }
    }

    /// Identifier.
    pub const fn id(&self) -> DatumId {
        self.id
    }

    /// Spatial extent.
    pub const fn extent(&self) -> &Extent<D> {
        &self.extent
    }

    /// Location of a point datum.
    pub const fn location(&self) -> Option<&[f64; D]> {
        match &self.extent {
            Extent::Point(p) => Some(p),
            Extent::Area(_) => None,
        }
    }

    /// Shape of an area datum.
    pub const fn shape(&self) -> Option<&Shape<D>> {
        match &self.extent {
            Extent::Point(_) => None,
            Extent::Area(shape) => Some(shape),
        }
    }

    /// Envelope of an area datum.
    pub fn footprint(&self) -> Option<BoundingBox<D>> {
        self.shape().map(Shape::envelope)
    }

    /// True for point data.
    pub const fn is_point(&self) -> bool {
        self.extent.is_point()
    }

    /// See [`Extent::is_wholly_contained_in`].
    pub fn is_wholly_contained_in(&self, bounds: &BoundingBox<D>) -> bool {
        self.extent.is_wholly_contained_in(bounds)
    }

    /// See [`Extent::is_partially_contained_in`].
    pub fn is_partially_contained_in(&self, bounds: &BoundingBox<D>) -> bool {
        self.extent.is_partially_contained_in(bounds)
    }

    /// Caller payload.
    pub const fn payload(&self) -> &P {
        &self.payload
    }

    /// Caller payload, mutably. The extent can only change by re-inserting.
    pub fn payload_mut(&mut self) -> &mut P {
        &mut self.payload
    }

    /// Consume the datum, returning its payload.
    pub fn into_payload(self) -> P {
        self.payload
    }
}
