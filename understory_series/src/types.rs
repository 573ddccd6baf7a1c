// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Point, aggregate, and interval types shared by the tree and the backends.

use smallvec::SmallVec;

/// A sample: field 0 is time, fields `1..` are values.
///
/// Stored inline for up to four fields, which covers the usual
/// `[time, value]` and `[time, low, high]` shapes without a heap allocation.
pub type Point = SmallVec<[f64; 4]>;

/// Per value-dimension storage used by [`Stats`].
pub(crate) type Values = SmallVec<[f64; 3]>;

/// Closed `[min, max]` interval of one value dimension.
///
/// The empty interval is the inverted pair `[+inf, -inf]`. Callers must check
/// [`Limits::is_empty`] rather than treating it as a normal interval.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Limits {
    /// Smallest value seen.
    pub min: f64,
    /// Largest value seen.
    pub max: f64,
}

impl Limits {
    /// The "no data" sentinel.
    pub const EMPTY: Self = Self {
        min: f64::INFINITY,
        max: f64::NEG_INFINITY,
    };

    /// Create limits from explicit bounds.
    #[inline(always)]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Whether these limits are the inverted "no data" sentinel.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.min > self.max
    }

    /// Widen to include `value`. NaN values are ignored.
    #[inline]
    pub fn include(&mut self, value: f64) {
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }

    /// The smallest limits enclosing both.
    #[inline]
    pub fn union(&self, other: Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Cached aggregates of every point under a node.
#[derive(Clone, Debug, PartialEq)]
pub struct Stats {
    pub(crate) min_t: f64,
    pub(crate) max_t: f64,
    pub(crate) min_v: Values,
    pub(crate) max_v: Values,
    pub(crate) sum: Values,
    pub(crate) count: usize,
}

impl Stats {
    pub(crate) fn empty() -> Self {
        Self {
            min_t: f64::NAN,
            max_t: f64::NAN,
            min_v: Values::new(),
            max_v: Values::new(),
            sum: Values::new(),
            count: 0,
        }
    }

    pub(crate) fn from_points(points: &[Point]) -> Self {
        let mut stats = Self::empty();
        for p in points {
            stats.bump(p);
        }
        stats
    }

    /// Fold one point into the aggregates in O(dim).
    pub(crate) fn bump(&mut self, point: &[f64]) {
        let t = point[0];
        let values = &point[1..];
        if self.count == 0 {
            self.min_t = t;
            self.max_t = t;
            self.min_v = Values::from_slice(values);
            self.max_v = Values::from_slice(values);
            self.sum = Values::from_slice(values);
        } else {
            self.min_t = self.min_t.min(t);
            self.max_t = self.max_t.max(t);
            for (i, &v) in values.iter().enumerate() {
                self.min_v[i] = self.min_v[i].min(v);
                self.max_v[i] = self.max_v[i].max(v);
                self.sum[i] += v;
            }
        }
        self.count += 1;
    }

    /// Fold another node's aggregates into these.
    pub(crate) fn merge(&mut self, other: &Self) {
        if other.count == 0 {
            return;
        }
        if self.count == 0 {
            *self = other.clone();
            return;
        }
        self.min_t = self.min_t.min(other.min_t);
        self.max_t = self.max_t.max(other.max_t);
        for i in 0..self.sum.len() {
            self.min_v[i] = self.min_v[i].min(other.min_v[i]);
            self.max_v[i] = self.max_v[i].max(other.max_v[i]);
            self.sum[i] += other.sum[i];
        }
        self.count += other.count;
    }

    /// True if every point under this node lies in `[t_start, t_end]`.
    #[inline]
    pub(crate) fn covered_by(&self, t_start: f64, t_end: f64) -> bool {
        self.count > 0 && t_start <= self.min_t && self.max_t <= t_end
    }

    /// True if no point under this node can lie in `[t_start, t_end]`.
    #[inline]
    pub(crate) fn disjoint(&self, t_start: f64, t_end: f64) -> bool {
        self.count == 0 || self.max_t < t_start || self.min_t > t_end
    }

    /// Earliest time, or NaN when empty.
    #[inline]
    pub fn min_t(&self) -> f64 {
        self.min_t
    }

    /// Latest time, or NaN when empty.
    #[inline]
    pub fn max_t(&self) -> f64 {
        self.max_t
    }

    /// Number of points aggregated.
    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Number of value dimensions (fields after time). Zero when empty.
    #[inline]
    pub fn value_dims(&self) -> usize {
        self.sum.len()
    }

    /// Limits of value dimension `dimension`, or [`Limits::EMPTY`] if absent.
    pub fn limits(&self, dimension: usize) -> Limits {
        match (self.min_v.get(dimension), self.max_v.get(dimension)) {
            (Some(&min), Some(&max)) => Limits::new(min, max),
            _ => Limits::EMPTY,
        }
    }

    /// Running sum of value dimension `dimension`.
    pub fn sum(&self, dimension: usize) -> Option<f64> {
        self.sum.get(dimension).copied()
    }

    /// Mean of value dimension `dimension`, or `None` when empty.
    pub fn mean(&self, dimension: usize) -> Option<f64> {
        if self.count == 0 {
            return None;
        }
        self.sum(dimension).map(|sum| sum / self.count as f64)
    }
}
