// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Time-range queries: slices, counts, limits, and means.
//!
//! Every query prunes subtrees disjoint from the range and answers subtrees
//! fully inside it from their cached [`Stats`](crate::Stats); only leaves
//! straddling a range edge are searched point by point.

use alloc::vec::Vec;

use crate::error::SeriesError;
use crate::node::{NodeKind, PointNode};
use crate::tree::PointTree;
use crate::types::{Limits, Point};

/// Index range of the points in `[t_start, t_end]` within a sorted leaf.
#[inline]
fn leaf_span(points: &[Point], t_start: f64, t_end: f64) -> core::ops::Range<usize> {
    let lo = points.partition_point(|p| p[0] < t_start);
    let hi = points.partition_point(|p| p[0] <= t_end);
    lo..hi.max(lo)
}

impl PointNode {
    pub(crate) fn collect_range(&self, t_start: f64, t_end: f64, out: &mut Vec<Point>) {
        if self.stats.disjoint(t_start, t_end) {
            return;
        }
        if self.stats.covered_by(t_start, t_end) {
            self.collect_into(out);
            return;
        }
        match &self.kind {
            NodeKind::Leaf(points) => {
                out.extend_from_slice(&points[leaf_span(points, t_start, t_end)]);
            }
            NodeKind::Internal(children) => {
                for child in children {
                    child.collect_range(t_start, t_end, out);
                }
            }
        }
    }

    pub(crate) fn count_range(&self, t_start: f64, t_end: f64) -> usize {
        if self.stats.disjoint(t_start, t_end) {
            return 0;
        }
        if self.stats.covered_by(t_start, t_end) {
            return self.stats.count;
        }
        match &self.kind {
            NodeKind::Leaf(points) => leaf_span(points, t_start, t_end).len(),
            NodeKind::Internal(children) => children
                .iter()
                .map(|c| c.count_range(t_start, t_end))
                .sum(),
        }
    }

    pub(crate) fn limits_range(&self, t_start: f64, t_end: f64, dimension: usize) -> Limits {
        if self.stats.disjoint(t_start, t_end) {
            return Limits::EMPTY;
        }
        if self.stats.covered_by(t_start, t_end) {
            return self.stats.limits(dimension);
        }
        match &self.kind {
            NodeKind::Leaf(points) => {
                let mut limits = Limits::EMPTY;
                for p in &points[leaf_span(points, t_start, t_end)] {
                    limits.include(p[dimension + 1]);
                }
                limits
            }
            NodeKind::Internal(children) => children
                .iter()
                .map(|c| c.limits_range(t_start, t_end, dimension))
                .fold(Limits::EMPTY, |acc, l| acc.union(l)),
        }
    }

    /// Sum of one value dimension and the number of points contributing.
    pub(crate) fn sum_range(
        &self,
        t_start: f64,
        t_end: f64,
        dimension: usize,
    ) -> (f64, usize) {
        if self.stats.disjoint(t_start, t_end) {
            return (0.0, 0);
        }
        if self.stats.covered_by(t_start, t_end) {
            return (self.stats.sum[dimension], self.stats.count);
        }
        match &self.kind {
            NodeKind::Leaf(points) => {
                let span = &points[leaf_span(points, t_start, t_end)];
                (span.iter().map(|p| p[dimension + 1]).sum(), span.len())
            }
            NodeKind::Internal(children) => children
                .iter()
                .map(|c| c.sum_range(t_start, t_end, dimension))
                .fold((0.0, 0), |(s, n), (cs, cn)| (s + cs, n + cn)),
        }
    }

    /// The latest point strictly before `t`.
    pub(crate) fn last_before(&self, t: f64) -> Option<&Point> {
        if self.stats.count == 0 || self.stats.min_t >= t {
            return None;
        }
        match &self.kind {
            NodeKind::Leaf(points) => {
                let idx = points.partition_point(|p| p[0] < t);
                idx.checked_sub(1).map(|i| &points[i])
            }
            NodeKind::Internal(children) => children.iter().rev().find_map(|c| c.last_before(t)),
        }
    }

    /// The earliest point strictly after `t`.
    pub(crate) fn first_after(&self, t: f64) -> Option<&Point> {
        if self.stats.count == 0 || self.stats.max_t <= t {
            return None;
        }
        match &self.kind {
            NodeKind::Leaf(points) => points.get(points.partition_point(|p| p[0] <= t)),
            NodeKind::Internal(children) => children.iter().find_map(|c| c.first_after(t)),
        }
    }
}

impl PointTree {
    /// Points with time in `[t_start, t_end]`, ascending.
    ///
    /// With `include_edges`, the last point before `t_start` and the first
    /// point after `t_end` are added when they exist, so a line drawn from
    /// the result reaches the edges of the window. An inverted range yields
    /// nothing.
    pub fn data(&self, t_start: f64, t_end: f64, include_edges: bool) -> Vec<Point> {
        let mut out = Vec::new();
        if !is_range(t_start, t_end) {
            return out;
        }
        if include_edges && let Some(p) = self.root.last_before(t_start) {
            out.push(p.clone());
        }
        self.root.collect_range(t_start, t_end, &mut out);
        if include_edges && let Some(p) = self.root.first_after(t_end) {
            out.push(p.clone());
        }
        out
    }

    /// Every point, ascending.
    pub fn full_data(&self) -> Vec<Point> {
        let mut out = Vec::with_capacity(self.len());
        self.root.collect_into(&mut out);
        out
    }

    /// Number of points with time in `[t_start, t_end]`.
    pub fn count_in(&self, t_start: f64, t_end: f64) -> usize {
        if !is_range(t_start, t_end) {
            return 0;
        }
        self.root.count_range(t_start, t_end)
    }

    /// Limits of value dimension `dimension` over `[t_start, t_end]`.
    ///
    /// Returns [`Limits::EMPTY`] when no point falls in the range, including
    /// on an empty tree.
    pub fn limits(
        &self,
        t_start: f64,
        t_end: f64,
        dimension: usize,
    ) -> Result<Limits, SeriesError> {
        self.check_dimension(dimension)?;
        if self.is_empty() || !is_range(t_start, t_end) {
            return Ok(Limits::EMPTY);
        }
        Ok(self.root.limits_range(t_start, t_end, dimension))
    }

    /// [`limits`](Self::limits) for every value dimension, indexed by dimension.
    pub fn all_limits(&self, t_start: f64, t_end: f64) -> Vec<Limits> {
        if !is_range(t_start, t_end) {
            return alloc::vec![Limits::EMPTY; self.value_dims()];
        }
        (0..self.value_dims())
            .map(|d| self.root.limits_range(t_start, t_end, d))
            .collect()
    }

    /// Mean of value dimension `dimension` over `[t_start, t_end]`.
    ///
    /// `None` when no point falls in the range.
    pub fn mean(
        &self,
        t_start: f64,
        t_end: f64,
        dimension: usize,
    ) -> Result<Option<f64>, SeriesError> {
        self.check_dimension(dimension)?;
        if self.is_empty() || !is_range(t_start, t_end) {
            return Ok(None);
        }
        let (sum, count) = self.root.sum_range(t_start, t_end, dimension);
        Ok((count > 0).then(|| sum / count as f64))
    }
}

/// Whether `[t_start, t_end]` is a non-inverted range (NaN bounds are not).
#[inline]
fn is_range(t_start: f64, t_end: f64) -> bool {
    t_start <= t_end
}
