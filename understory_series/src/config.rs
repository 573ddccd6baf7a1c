// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Capacity parameters for a [`PointTree`](crate::PointTree).

use crate::error::SeriesError;

/// Default fan-out: maximum points per leaf and children per internal node.
pub const MAX_POINTS: usize = 20;

/// Default global cap on points retained by one tree.
pub const MAX_TOTAL_POINTS: usize = 2000;

/// Fan-out and retention limits.
///
/// Once an append pushes the total above `max_total_points`, the tree keeps
/// only the newest `max_total_points / 2` points.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SeriesConfig {
    max_points: usize,
    max_total_points: usize,
}

impl SeriesConfig {
    /// Create a configuration, validating both limits.
    ///
    /// `max_points` must be at least 2 so the tree can branch, and
    /// `max_total_points` at least 2 so a trim retains something.
    pub fn new(max_points: usize, max_total_points: usize) -> Result<Self, SeriesError> {
        if max_points < 2 {
            return Err(SeriesError::InvalidConfig("max_points must be at least 2"));
        }
        if max_total_points < 2 {
            return Err(SeriesError::InvalidConfig(
                "max_total_points must be at least 2",
            ));
        }
        Ok(Self {
            max_points,
            max_total_points,
        })
    }

    /// Maximum entries per node.
    #[inline]
    pub const fn max_points(&self) -> usize {
        self.max_points
    }

    /// Maximum points retained by the tree.
    #[inline]
    pub const fn max_total_points(&self) -> usize {
        self.max_total_points
    }

    /// Number of newest points kept by a trim.
    #[inline]
    pub(crate) const fn retained_after_trim(&self) -> usize {
        self.max_total_points / 2
    }
}

impl Default for SeriesConfig {
    fn default() -> Self {
        Self {
            max_points: MAX_POINTS,
            max_total_points: MAX_TOTAL_POINTS,
        }
    }
}
