// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Nearest-point and neighbourhood search.
//!
//! A neighbourhood is the nearest point plus up to `(n - 1) / 2` points on
//! each side. When that window runs past the leaf holding the nearest point,
//! the missing points are borrowed from neighbouring subtrees. Nodes keep no
//! parent or sibling links: the siblings on each side of the descent path are
//! handed down as a borrowed [`Flank`] chain rebuilt at every level.

use alloc::vec::Vec;

use crate::error::SeriesError;
use crate::node::{NodeKind, PointNode};
use crate::tree::PointTree;
use crate::types::Point;

/// Siblings on one side of a descent path.
///
/// `nodes` are the siblings at the current level in time order; `outer`
/// continues with the siblings one level up, further away from the path.
#[derive(Copy, Clone, Debug)]
pub(crate) struct Flank<'a> {
    nodes: &'a [PointNode],
    outer: Option<&'a Flank<'a>>,
}

/// Push up to `k` points preceding the path, newest first.
fn take_before(mut flank: Option<&Flank<'_>>, k: usize, out: &mut Vec<Point>) -> usize {
    let mut taken = 0;
    while let Some(f) = flank {
        for node in f.nodes.iter().rev() {
            if taken == k {
                return taken;
            }
            taken += node.push_last_rev(k - taken, out);
        }
        flank = f.outer;
    }
    taken
}

/// Push up to `k` points following the path, oldest first.
fn take_after(mut flank: Option<&Flank<'_>>, k: usize, out: &mut Vec<Point>) -> usize {
    let mut taken = 0;
    while let Some(f) = flank {
        for node in f.nodes {
            if taken == k {
                return taken;
            }
            taken += node.push_first(k - taken, out);
        }
        flank = f.outer;
    }
    taken
}

/// Index of the point nearest `t` in a non-empty sorted slice; ties go to the
/// lower time. Among repeated times, the copy on the side facing `t` wins.
pub(crate) fn nearest_index(points: &[Point], t: f64) -> usize {
    let pos = points.partition_point(|p| p[0] < t);
    if pos == points.len() {
        return pos - 1;
    }
    if pos > 0 && t - points[pos - 1][0] <= points[pos][0] - t {
        return pos - 1;
    }
    pos
}

/// Clamp a neighbourhood size to what a series of `len` points can fill.
///
/// Past `2 * len + 1` both sides of any window already run out of points, so
/// the result is unchanged while buffer sizes stay bounded by the series.
pub(crate) fn clamp_count(n: usize, len: usize) -> usize {
    n.min(len.saturating_mul(2).saturating_add(1))
}

/// Child whose range covers `t`, or in a gap the closer neighbour (ties low).
fn pick_child(children: &[PointNode], t: f64) -> usize {
    let i = children.partition_point(|c| c.stats.max_t < t);
    if i == children.len() {
        return i - 1;
    }
    if i > 0 && t < children[i].stats.min_t {
        let below = t - children[i - 1].stats.max_t;
        let above = children[i].stats.min_t - t;
        if below <= above {
            return i - 1;
        }
    }
    i
}

/// Neighbourhood of `points[c]`, borrowing across `lower`/`upper` as needed.
///
/// `points` must be sorted and `c` must be the index nearest `t`.
pub(crate) fn window(
    points: &[Point],
    c: usize,
    t: f64,
    n: usize,
    lower: Option<&Flank<'_>>,
    upper: Option<&Flank<'_>>,
) -> Vec<Point> {
    let rest = n - 1;
    let half = rest / 2;
    let odd = rest % 2 == 1;
    // One spare candidate per side decides where an odd remainder goes.
    let want = half + usize::from(odd);

    let mut before: Vec<Point> = Vec::with_capacity(want);
    before.extend(points[c.saturating_sub(want)..c].iter().rev().cloned());
    let missing = want - before.len();
    if missing > 0 {
        take_before(lower, missing, &mut before);
    }

    let mut after: Vec<Point> = Vec::with_capacity(want);
    let end = (c + 1).saturating_add(want).min(points.len());
    after.extend_from_slice(&points[c + 1..end]);
    let missing = want - after.len();
    if missing > 0 {
        take_after(upper, missing, &mut after);
    }

    if odd {
        let extra_low = match (before.get(half), after.get(half)) {
            (Some(b), Some(a)) => t - b[0] <= a[0] - t,
            (Some(_), None) => true,
            _ => false,
        };
        before.truncate(half + usize::from(extra_low));
        after.truncate(half + usize::from(!extra_low));
    }

    let mut out = Vec::with_capacity(before.len() + 1 + after.len());
    out.extend(before.into_iter().rev());
    out.push(points[c].clone());
    out.extend(after);
    out
}

impl PointNode {
    /// Descend to the leaf nearest `t`, carrying the sibling flanks along.
    fn neighbourhood(
        &self,
        t: f64,
        n: usize,
        lower: Option<&Flank<'_>>,
        upper: Option<&Flank<'_>>,
    ) -> Result<Vec<Point>, SeriesError> {
        match &self.kind {
            NodeKind::Leaf(points) => {
                if points.is_empty() {
                    return Err(SeriesError::NoMatch);
                }
                let c = nearest_index(points, t);
                Ok(window(points, c, t, n, lower, upper))
            }
            NodeKind::Internal(children) => {
                if children.is_empty() {
                    return Err(SeriesError::NoMatch);
                }
                let i = pick_child(children, t);
                let lo = Flank {
                    nodes: &children[..i],
                    outer: lower,
                };
                let hi = Flank {
                    nodes: &children[i + 1..],
                    outer: upper,
                };
                children[i].neighbourhood(t, n, Some(&lo), Some(&hi))
            }
        }
    }
}

impl PointTree {
    /// The point whose time is nearest `t`, ties toward the lower time.
    ///
    /// `None` on an empty tree or for a NaN `t`.
    pub fn point(&self, t: f64) -> Result<Option<Point>, SeriesError> {
        Ok(self.points(t, 1)?.into_iter().next())
    }

    /// Up to `n` consecutive points centred as closely as possible on `t`.
    ///
    /// The nearest point is flanked by `(n - 1) / 2` points on each side; for
    /// even `n` the spare slot goes to the side whose next point is closer to
    /// `t`. Before the first or after the last point, the first or last `n`
    /// points are returned. Near either end of the series the result is
    /// shorter than `n` rather than shifted.
    pub fn points(&self, t: f64, n: usize) -> Result<Vec<Point>, SeriesError> {
        if n == 0 {
            return Err(SeriesError::InvalidCount);
        }
        let mut out = Vec::new();
        if self.is_empty() || t.is_nan() {
            return Ok(out);
        }
        let n = clamp_count(n, self.len());
        if t < self.min_t() {
            self.root.push_first(n, &mut out);
        } else if t > self.max_t() {
            self.root.push_last_rev(n, &mut out);
            out.reverse();
        } else {
            out = self.root.neighbourhood(t, n, None, None)?;
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SeriesConfig;
    use alloc::vec;

    fn times(points: &[Point]) -> Vec<f64> {
        points.iter().map(|p| p[0]).collect()
    }

    fn pts(ts: &[f64]) -> Vec<Point> {
        ts.iter().map(|&t| Point::from_slice(&[t, 0.0])).collect()
    }

    #[test]
    fn small_series_nearest() {
        let tree = PointTree::new([[0.0, 1.0], [1.0, 2.0], [2.0, 1.0], [3.0, 3.0]]).unwrap();
        let p = tree.point(2.4).unwrap().unwrap();
        assert_eq!(p.as_slice(), &[2.0, 1.0]);
        // Ties go to the lower time.
        assert_eq!(tree.point(1.5).unwrap().map(|p| p[0]), Some(1.0));
        assert_eq!(tree.point(-7.0).unwrap().map(|p| p[0]), Some(0.0));
        assert_eq!(tree.point(70.0).unwrap().map(|p| p[0]), Some(3.0));
    }

    #[test]
    fn zero_count_is_rejected() {
        let tree = PointTree::new([[0.0, 1.0]]).unwrap();
        assert_eq!(tree.points(0.0, 0), Err(SeriesError::InvalidCount));
        assert_eq!(PointTree::default().points(0.0, 0), Err(SeriesError::InvalidCount));
    }

    #[test]
    fn empty_tree_and_nan_yield_nothing() {
        assert_eq!(PointTree::default().point(1.0), Ok(None));
        let tree = PointTree::new([[0.0, 1.0]]).unwrap();
        assert_eq!(tree.points(f64::NAN, 3), Ok(vec![]));
    }

    #[test]
    fn odd_windows_are_symmetric() {
        let tree = PointTree::new((0..100).map(|i| [f64::from(i), 0.0])).unwrap();
        assert_eq!(times(&tree.points(50.2, 5).unwrap()), [48.0, 49.0, 50.0, 51.0, 52.0]);
    }

    #[test]
    fn even_windows_lean_towards_t() {
        let tree = PointTree::new((0..100).map(|i| [f64::from(i), 0.0])).unwrap();
        // Nearest is 50; 52 is closer to 50.4 than 48 is.
        assert_eq!(times(&tree.points(50.4, 4).unwrap()), [49.0, 50.0, 51.0, 52.0]);
        // Nearest is 50; 48 is closer to 49.6 than 52 is.
        assert_eq!(times(&tree.points(49.6, 4).unwrap()), [48.0, 49.0, 50.0, 51.0]);
        assert_eq!(times(&tree.points(49.6, 2).unwrap()), [49.0, 50.0]);
    }

    #[test]
    fn windows_spill_into_sibling_leaves() {
        // Leaves hold 0..20, 20..40, ...; 19.9 sits at the end of the first.
        let tree = PointTree::new((0..100).map(|i| [f64::from(i), 0.0])).unwrap();
        assert_eq!(tree.tree_size(), 2);
        assert_eq!(
            times(&tree.points(19.9, 7).unwrap()),
            [17.0, 18.0, 19.0, 20.0, 21.0, 22.0, 23.0]
        );
        assert_eq!(times(&tree.points(20.1, 3).unwrap()), [19.0, 20.0, 21.0]);
    }

    #[test]
    fn windows_spill_across_several_subtrees() {
        // Fan-out 2 makes every leaf tiny, so a wide window crosses many
        // leaves and climbs several flank levels.
        let config = SeriesConfig::new(2, 1000).unwrap();
        let tree = PointTree::with_config((0..64).map(|i| [f64::from(i), 0.0]), config).unwrap();
        assert_eq!(tree.tree_size(), 6);
        let got = times(&tree.points(31.0, 21).unwrap());
        let expected: Vec<f64> = (21..=41).map(f64::from).collect();
        assert_eq!(got, expected);
    }

    #[test]
    fn windows_shrink_at_series_edges() {
        let tree = PointTree::new((0..100).map(|i| [f64::from(i), 0.0])).unwrap();
        assert_eq!(times(&tree.points(1.0, 5).unwrap()), [0.0, 1.0, 2.0, 3.0]);
        assert_eq!(times(&tree.points(99.0, 3).unwrap()), [98.0, 99.0]);
    }

    #[test]
    fn outside_the_series_returns_the_end_runs() {
        let tree = PointTree::new((0..100).map(|i| [f64::from(i), 0.0])).unwrap();
        assert_eq!(times(&tree.points(-3.0, 3).unwrap()), [0.0, 1.0, 2.0]);
        assert_eq!(times(&tree.points(500.0, 3).unwrap()), [97.0, 98.0, 99.0]);
        assert_eq!(tree.points(500.0, 1000).unwrap().len(), 100);
    }

    #[test]
    fn gaps_between_leaves_pick_the_closer_side() {
        // Two leaves: [0..20) and [100..120).
        let ts: Vec<f64> = (0..20).map(f64::from).chain((100..120).map(f64::from)).collect();
        let tree = PointTree::new(ts.iter().map(|&t| [t, 0.0])).unwrap();
        assert_eq!(tree.point(40.0).unwrap().map(|p| p[0]), Some(19.0));
        assert_eq!(tree.point(80.0).unwrap().map(|p| p[0]), Some(100.0));
        assert_eq!(tree.point(59.5).unwrap().map(|p| p[0]), Some(19.0));
    }

    #[test]
    fn huge_counts_return_the_whole_series() {
        let tree = PointTree::new((0..100).map(|i| [f64::from(i), 0.0])).unwrap();
        assert_eq!(tree.points(50.0, usize::MAX).unwrap().len(), 100);
        assert_eq!(tree.points(50.0, usize::MAX - 1), Ok(tree.full_data()));
        assert_eq!(tree.points(0.5, 1_000_000_000_000).unwrap().len(), 100);
        assert_eq!(clamp_count(usize::MAX, 100), 201);
        assert_eq!(clamp_count(7, 100), 7);
    }

    #[test]
    fn nearest_index_prefers_lower_on_ties() {
        let points = pts(&[0.0, 2.0, 4.0]);
        assert_eq!(nearest_index(&points, 1.0), 0);
        assert_eq!(nearest_index(&points, 1.1), 1);
        assert_eq!(nearest_index(&points, 9.0), 2);
        assert_eq!(nearest_index(&points, -9.0), 0);
    }

    #[test]
    fn malformed_internal_node_is_no_match() {
        let node = PointNode {
            stats: crate::types::Stats::empty(),
            kind: NodeKind::Internal(Vec::new()),
        };
        assert_eq!(node.neighbourhood(0.0, 1, None, None), Err(SeriesError::NoMatch));
    }
}
