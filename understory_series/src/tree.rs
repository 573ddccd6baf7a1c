// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public [`PointTree`] handle: owns the root, dimensionality, and limits.

use alloc::vec::Vec;
use core::fmt::Debug;

use crate::config::SeriesConfig;
use crate::error::SeriesError;
use crate::node::PointNode;
use crate::types::{Point, Stats};

/// An ordered point series indexed for range and nearest-point queries.
///
/// Points are `[time, value, ...]` slices of one shared length and must arrive
/// in ascending time order. See the [crate docs](crate) for an overview.
#[derive(Clone)]
pub struct PointTree {
    pub(crate) root: PointNode,
    pub(crate) dim: Option<usize>,
    pub(crate) config: SeriesConfig,
}

impl PointTree {
    /// Build a tree from sorted points using the default [`SeriesConfig`].
    pub fn new<I, P>(points: I) -> Result<Self, SeriesError>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<[f64]>,
    {
        Self::with_config(points, SeriesConfig::default())
    }

    /// Build a tree from sorted points with explicit limits.
    ///
    /// Input longer than [`SeriesConfig::max_total_points`] is trimmed to its
    /// newest points the same way an overflowing append is.
    pub fn with_config<I, P>(points: I, config: SeriesConfig) -> Result<Self, SeriesError>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<[f64]>,
    {
        let mut dim = None;
        let mut last_t = f64::NAN;
        let mut data: Vec<Point> = Vec::new();
        for p in points {
            let p = p.as_ref();
            check_point(dim, last_t, p)?;
            dim = Some(p.len());
            last_t = p[0];
            data.push(Point::from_slice(p));
        }
        if data.len() > config.max_total_points() {
            let discarded = data.len() - config.retained_after_trim();
            tracing::debug!(
                input = data.len(),
                discarded,
                "trimming oversized point tree input"
            );
            data.drain(..discarded);
        }
        Ok(Self {
            root: PointNode::build(data, config.max_points()),
            dim,
            config,
        })
    }

    /// Create an empty tree. The first appended point fixes the dimensionality.
    pub fn empty(config: SeriesConfig) -> Self {
        Self {
            root: PointNode::empty(),
            dim: None,
            config,
        }
    }

    /// Number of points held.
    #[inline]
    pub fn len(&self) -> usize {
        self.root.stats.count
    }

    /// Whether the tree holds no points.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fields per point, including time. `None` until the first point arrives.
    #[inline]
    pub fn dim(&self) -> Option<usize> {
        self.dim
    }

    /// Number of value dimensions (fields after time); zero when empty.
    #[inline]
    pub fn value_dims(&self) -> usize {
        self.dim.map_or(0, |d| d - 1)
    }

    /// Aggregates over the whole series.
    #[inline]
    pub fn stats(&self) -> &Stats {
        &self.root.stats
    }

    /// Earliest time, or NaN when empty.
    #[inline]
    pub fn min_t(&self) -> f64 {
        self.root.stats.min_t
    }

    /// Latest time, or NaN when empty.
    #[inline]
    pub fn max_t(&self) -> f64 {
        self.root.stats.max_t
    }

    /// Limits this tree was created with.
    #[inline]
    pub fn config(&self) -> &SeriesConfig {
        &self.config
    }

    /// Root node, for traversal and diagnostics.
    #[inline]
    pub fn root(&self) -> &PointNode {
        &self.root
    }

    /// Depth of the tree: 1 for a single leaf.
    ///
    /// Callers use this to judge whether rebuilding from scratch is cheaper
    /// than reusing the tree when the dataset shape changes.
    pub fn tree_size(&self) -> usize {
        self.root.depth()
    }

    /// Reject `dimension` if it is past the established value dimensions.
    pub(crate) fn check_dimension(&self, dimension: usize) -> Result<(), SeriesError> {
        match self.dim {
            Some(d) if dimension >= d - 1 => Err(SeriesError::NoSuchDimension {
                dimension,
                available: d - 1,
            }),
            _ => Ok(()),
        }
    }
}

impl Default for PointTree {
    fn default() -> Self {
        Self::empty(SeriesConfig::default())
    }
}

impl Debug for PointTree {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PointTree")
            .field("len", &self.len())
            .field("dim", &self.dim)
            .field("depth", &self.tree_size())
            .field("min_t", &self.min_t())
            .field("max_t", &self.max_t())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Validate one incoming point against the series so far.
///
/// `last_t` is the latest time already accepted, NaN when there is none. A
/// NaN time is never in order.
pub(crate) fn check_point(
    dim: Option<usize>,
    last_t: f64,
    point: &[f64],
) -> Result<(), SeriesError> {
    if point.is_empty() {
        return Err(SeriesError::EmptyPoint);
    }
    if let Some(expected) = dim
        && expected != point.len()
    {
        return Err(SeriesError::DimensionMismatch {
            expected,
            found: point.len(),
        });
    }
    let time = point[0];
    if time.is_nan() || time < last_t {
        return Err(SeriesError::OutOfOrder {
            previous: last_t,
            time,
        });
    }
    Ok(())
}
