// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors reported by series construction, appends, and queries.

use thiserror::Error;

/// Contract violations reported by [`PointTree`](crate::PointTree) and the backends.
///
/// None of these are retryable: every operation is a deterministic computation
/// over the current tree, so the caller has to fix its input.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum SeriesError {
    /// A point's field count differs from the series' dimensionality.
    #[error("point has {found} fields, series expects {expected}")]
    DimensionMismatch {
        /// Established field count, including time.
        expected: usize,
        /// Field count of the offending point.
        found: usize,
    },

    /// A point with no fields at all (not even time).
    #[error("point has no fields")]
    EmptyPoint,

    /// A neighbourhood query asked for zero points.
    #[error("point count must be positive")]
    InvalidCount,

    /// Search descended into an internal node without children.
    #[error("search reached a node with neither points nor children")]
    NoMatch,

    /// A point's time precedes the time of the point before it.
    #[error("time {time} precedes previous time {previous}")]
    OutOfOrder {
        /// Latest time already in the series.
        previous: f64,
        /// Time of the offending point.
        time: f64,
    },

    /// A value dimension beyond the ones the series holds.
    #[error("value dimension {dimension} requested, series has {available}")]
    NoSuchDimension {
        /// Requested value dimension (0 is the first field after time).
        dimension: usize,
        /// Number of value dimensions available.
        available: usize,
    },

    /// Rejected [`SeriesConfig`](crate::SeriesConfig) parameters.
    #[error("invalid series configuration: {0}")]
    InvalidConfig(&'static str),
}
