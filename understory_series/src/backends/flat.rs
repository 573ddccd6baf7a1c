// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sorted vector with linear range scans. Small and simple; good for short series.

use alloc::vec::Vec;
use core::fmt::Debug;

use crate::backend::SeriesQuery;
use crate::error::SeriesError;
use crate::nearest::{clamp_count, nearest_index, window};
use crate::tree::check_point;
use crate::types::{Limits, Point};

/// A point series stored as one sorted vector.
///
/// Range queries scan every point; nearest lookups binary-search the vector.
///
/// Accepts the same input and answers the same queries as
/// [`PointTree`](crate::PointTree), without a fan-out or a retention cap.
#[derive(Clone, Default)]
pub struct FlatSeries {
    points: Vec<Point>,
    dim: Option<usize>,
}

impl FlatSeries {
    /// Store sorted points.
    pub fn new<I, P>(points: I) -> Result<Self, SeriesError>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<[f64]>,
    {
        let mut series = Self::default();
        for p in points {
            series.push(p.as_ref())?;
        }
        Ok(series)
    }

    /// Append one point whose time is not earlier than the last one.
    pub fn push(&mut self, point: &[f64]) -> Result<(), SeriesError> {
        let last_t = self.points.last().map_or(f64::NAN, |p| p[0]);
        check_point(self.dim, last_t, point)?;
        self.dim = Some(point.len());
        self.points.push(Point::from_slice(point));
        Ok(())
    }

    /// The stored points, ascending.
    pub fn as_slice(&self) -> &[Point] {
        &self.points
    }

    fn in_range(&self, t_start: f64, t_end: f64) -> impl Iterator<Item = &Point> + '_ {
        self.points
            .iter()
            .filter(move |p| t_start <= p[0] && p[0] <= t_end)
    }

    fn check_dimension(&self, dimension: usize) -> Result<(), SeriesError> {
        match self.dim {
            Some(d) if dimension >= d - 1 => Err(SeriesError::NoSuchDimension {
                dimension,
                available: d - 1,
            }),
            _ => Ok(()),
        }
    }
}

impl Debug for FlatSeries {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FlatSeries")
            .field("len", &self.points.len())
            .field("dim", &self.dim)
            .finish_non_exhaustive()
    }
}

impl SeriesQuery for FlatSeries {
    fn len(&self) -> usize {
        self.points.len()
    }

    fn value_dims(&self) -> usize {
        self.dim.map_or(0, |d| d - 1)
    }

    fn data(&self, t_start: f64, t_end: f64, include_edges: bool) -> Vec<Point> {
        let mut out = Vec::new();
        if !(t_start <= t_end) {
            return out;
        }
        if include_edges && let Some(p) = self.points.iter().rev().find(|p| p[0] < t_start) {
            out.push(p.clone());
        }
        out.extend(self.in_range(t_start, t_end).cloned());
        if include_edges && let Some(p) = self.points.iter().find(|p| p[0] > t_end) {
            out.push(p.clone());
        }
        out
    }

    fn full_data(&self) -> Vec<Point> {
        self.points.clone()
    }

    fn count_in(&self, t_start: f64, t_end: f64) -> usize {
        self.in_range(t_start, t_end).count()
    }

    fn limits(&self, t_start: f64, t_end: f64, dimension: usize) -> Result<Limits, SeriesError> {
        self.check_dimension(dimension)?;
        let mut limits = Limits::EMPTY;
        for p in self.in_range(t_start, t_end) {
            limits.include(p[dimension + 1]);
        }
        Ok(limits)
    }

    fn points(&self, t: f64, n: usize) -> Result<Vec<Point>, SeriesError> {
        if n == 0 {
            return Err(SeriesError::InvalidCount);
        }
        let (Some(first), Some(last)) = (self.points.first(), self.points.last()) else {
            return Ok(Vec::new());
        };
        if t.is_nan() {
            return Ok(Vec::new());
        }
        let n = clamp_count(n, self.points.len());
        if t < first[0] {
            return Ok(self.points[..n.min(self.points.len())].to_vec());
        }
        if t > last[0] {
            return Ok(self.points[self.points.len().saturating_sub(n)..].to_vec());
        }
        let c = nearest_index(&self.points, t);
        Ok(window(&self.points, c, t, n, None, None))
    }
}
