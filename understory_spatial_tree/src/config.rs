// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Construction parameters for a [`Tree`](crate::Tree).

use crate::error::TreeError;

/// Limits controlling when leaves subdivide.
///
/// A leaf that already holds `max_data_per_leaf` data subdivides before accepting another,
/// unless it sits at `max_depth`. The root is at depth 0.
///
/// ```
/// use understory_spatial_tree::TreeConfig;
///
/// let config = TreeConfig::new(6).with_max_data_per_leaf(16);
/// assert_eq!(config.max_depth, 6);
/// assert_eq!(config.max_data_per_leaf, 16);
/// assert_eq!(TreeConfig::new(6).max_data_per_leaf, TreeConfig::DEFAULT_MAX_DATA_PER_LEAF);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TreeConfig {
    /// Deepest level a leaf may subdivide into.
    pub max_depth: u32,
    /// Number of data a leaf holds before it subdivides.
    pub max_data_per_leaf: usize,
}

impl TreeConfig {
    /// Capacity used when none is given.
    pub const DEFAULT_MAX_DATA_PER_LEAF: usize = 5;

    /// Largest accepted `max_depth`.
    pub const MAX_DEPTH: u32 = 32;

    /// Largest supported tree dimension.
    pub const MAX_DIMENSION: usize = 16;

    /// Limits with the given depth and the default per-leaf capacity.
    pub const fn new(max_depth: u32) -> Self {
        Self {
            max_depth,
            max_data_per_leaf: Self::DEFAULT_MAX_DATA_PER_LEAF,
        }
    }

    /// Replace the per-leaf capacity.
    #[must_use]
    pub const fn with_max_data_per_leaf(mut self, max_data_per_leaf: usize) -> Self {
        self.max_data_per_leaf = max_data_per_leaf;
        self
    }

    /// Check the limits for a tree of dimension `D`.
    ///
    /// # Errors
    ///
    /// - [`TreeError::UnsupportedDimension`] unless `1 <= D <= 16`.
    /// - [`TreeError::ZeroCapacity`] if `max_data_per_leaf` is zero.
    /// - [`TreeError::DepthLimit`] if `max_depth` exceeds [`Self::MAX_DEPTH`].
    pub fn validate<const D: usize>(&self) -> Result<(), TreeError> {
        if D == 0 || D > Self::MAX_DIMENSION {
            return Err(TreeError::UnsupportedDimension(D));
        }
        if self.max_data_per_leaf == 0 {
            return Err(TreeError::ZeroCapacity);
        }
        if self.max_depth > Self::MAX_DEPTH {
            return Err(TreeError::DepthLimit {
                depth: self.max_depth,
                limit: Self::MAX_DEPTH,
            });
        }
        Ok(())
    }
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self::new(8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_limits_are_valid() {
        assert_eq!(TreeConfig::default().validate::<2>(), Ok(()));
        assert_eq!(TreeConfig::default().validate::<3>(), Ok(()));
    }

    #[test]
    fn rejects_degenerate_limits() {
        assert_eq!(
            TreeConfig::new(4).with_max_data_per_leaf(0).validate::<2>(),
            Err(TreeError::ZeroCapacity)
        );
        assert_eq!(
            TreeConfig::new(33).validate::<2>(),
            Err(TreeError::DepthLimit {
                depth: 33,
                limit: 32
            })
        );
        assert_eq!(
            TreeConfig::new(4).validate::<0>(),
            Err(TreeError::UnsupportedDimension(0))
        );
        assert_eq!(
            TreeConfig::new(4).validate::<17>(),
            Err(TreeError::UnsupportedDimension(17))
        );
    }
}
