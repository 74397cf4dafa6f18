// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error kinds reported by box construction, tree configuration, and insertion.

use crate::datum::DatumId;

/// Errors returned by fallible constructors and insertions.
///
/// Lookups that simply find nothing (an unknown id, a point outside a node) are not errors;
/// they are reported as `None`, `false`, or an empty result.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    /// A bound was not finite, or `least > greatest` on the given axis.
    #[error("invalid box: axis {axis} is non-finite or has least > greatest")]
    InvalidBox {
        /// First offending axis.
        axis: usize,
    },
    /// `max_data_per_leaf` was zero, which would subdivide forever.
    #[error("max_data_per_leaf must be at least 1")]
    ZeroCapacity,
    /// `max_depth` exceeded [`TreeConfig::MAX_DEPTH`](crate::TreeConfig::MAX_DEPTH).
    #[error("max depth {depth} exceeds the supported limit of {limit}")]
    DepthLimit {
        /// Requested depth.
        depth: u32,
        /// Largest accepted depth.
        limit: u32,
    },
    /// The tree dimension is zero or too large to encode outcodes and child indices.
    #[error("unsupported dimension {0}; trees support 1 to 16 axes")]
    UnsupportedDimension(usize),
    /// The point location or area footprint does not lie within the root box.
    #[error("location lies outside the root bounds")]
    OutsideRoot,
    /// An area datum was passed to [`Tree::insert`](crate::Tree::insert).
    #[error("datum {0} has an area extent; use insert_area")]
    ExpectedPoint(DatumId),
    /// A point datum was passed to [`Tree::insert_area`](crate::Tree::insert_area).
    #[error("datum {0} is a point; use insert")]
    ExpectedArea(DatumId),
    /// [`Tree::insert`](crate::Tree::insert) was called with the id of stored area data.
    #[error("datum {0} is stored as area data and cannot be relocated")]
    NotRelocatable(DatumId),
}
