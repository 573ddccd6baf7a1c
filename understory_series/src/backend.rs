// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Query trait shared by the tree and the linear-scan backend.

use alloc::vec::Vec;

use crate::error::SeriesError;
use crate::types::{Limits, Point};

/// Read-only queries a chart needs from a point series.
///
/// Implemented by [`PointTree`](crate::PointTree) and by
/// [`FlatSeries`](crate::backends::FlatSeries). Both give identical answers,
/// so renderers can be written once and pick the storage by data size.
pub trait SeriesQuery {
    /// Number of points held.
    fn len(&self) -> usize;

    /// Whether no points are held.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of value dimensions (fields after time).
    fn value_dims(&self) -> usize;

    /// Points with time in `[t_start, t_end]`, optionally with the points
    /// just outside either edge.
    fn data(&self, t_start: f64, t_end: f64, include_edges: bool) -> Vec<Point>;

    /// Every point, ascending.
    ///
    /// The default implementation queries an unbounded range.
    fn full_data(&self) -> Vec<Point> {
        self.data(f64::NEG_INFINITY, f64::INFINITY, false)
    }

    /// Number of points with time in `[t_start, t_end]`.
    fn count_in(&self, t_start: f64, t_end: f64) -> usize;

    /// Limits of one value dimension over `[t_start, t_end]`.
    fn limits(&self, t_start: f64, t_end: f64, dimension: usize) -> Result<Limits, SeriesError>;

    /// Limits of every value dimension over `[t_start, t_end]`.
    ///
    /// The default implementation calls [`limits`](Self::limits) per dimension
    /// and stops at the first error.
    fn all_limits(&self, t_start: f64, t_end: f64) -> Result<Vec<Limits>, SeriesError> {
        (0..self.value_dims())
            .map(|d| self.limits(t_start, t_end, d))
            .collect()
    }

    /// Up to `n` consecutive points centred on `t`.
    fn points(&self, t: f64, n: usize) -> Result<Vec<Point>, SeriesError>;

    /// The point nearest `t`, ties toward the lower time.
    ///
    /// The default implementation takes the first of [`points`](Self::points)`(t, 1)`.
    fn point(&self, t: f64) -> Result<Option<Point>, SeriesError> {
        Ok(self.points(t, 1)?.into_iter().next())
    }
}

impl SeriesQuery for crate::PointTree {
    fn len(&self) -> usize {
        Self::len(self)
    }

    fn value_dims(&self) -> usize {
        Self::value_dims(self)
    }

    fn data(&self, t_start: f64, t_end: f64, include_edges: bool) -> Vec<Point> {
        Self::data(self, t_start, t_end, include_edges)
    }

    fn full_data(&self) -> Vec<Point> {
        Self::full_data(self)
    }

    fn count_in(&self, t_start: f64, t_end: f64) -> usize {
        Self::count_in(self, t_start, t_end)
    }

    fn limits(&self, t_start: f64, t_end: f64, dimension: usize) -> Result<Limits, SeriesError> {
        Self::limits(self, t_start, t_end, dimension)
    }

    fn all_limits(&self, t_start: f64, t_end: f64) -> Result<Vec<Limits>, SeriesError> {
        Ok(Self::all_limits(self, t_start, t_end))
    }

    fn points(&self, t: f64, n: usize) -> Result<Vec<Point>, SeriesError> {
        Self::points(self, t, n)
    }
}
