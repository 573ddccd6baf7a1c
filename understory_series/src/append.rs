// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Streaming appends and the halving trim that bounds memory.

use alloc::vec;
use alloc::vec::Vec;

use crate::error::SeriesError;
use crate::node::{NodeKind, PointNode};
use crate::tree::{PointTree, check_point};
use crate::types::Point;

/// What an append did to the tree's shape.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Appended {
    /// Stored along the existing rightmost path; stats were bumped in place.
    InPlace,
    /// The rightmost path was full: the tree grew a level at the root.
    Grown,
    /// The global cap was exceeded and the tree was rebuilt from its newest points.
    Trimmed {
        /// Number of oldest points dropped.
        discarded: usize,
    },
}

impl PointNode {
    /// Push `point` onto the rightmost path if any node on it has room.
    ///
    /// Stats of every node on the path are bumped in O(dim) each. Returns
    /// `false`, leaving the subtree untouched, when the whole path is full.
    pub(crate) fn try_push(&mut self, point: &Point, fan_out: usize) -> bool {
        let pushed = match &mut self.kind {
            NodeKind::Leaf(points) => {
                if points.len() < fan_out {
                    points.push(point.clone());
                    true
                } else {
                    false
                }
            }
            NodeKind::Internal(children) => {
                let Some(last) = children.last_mut() else {
                    return false;
                };
                if last.try_push(point, fan_out) {
                    true
                } else if children.len() < fan_out {
                    // Keep leaves level: the new sibling is as deep as the full one.
                    let depth = children.last().map_or(1, Self::depth);
                    children.push(Self::spine(point.clone(), depth));
                    true
                } else {
                    false
                }
            }
        };
        if pushed {
            self.stats.bump(point);
        }
        pushed
    }
}

impl PointTree {
    /// Append one point whose time is not earlier than any stored point.
    ///
    /// The first point of an empty tree fixes its dimensionality. If the
    /// append pushes the tree past [`SeriesConfig::max_total_points`], the
    /// oldest points are discarded and the tree is rebuilt.
    ///
    /// [`SeriesConfig::max_total_points`]: crate::SeriesConfig::max_total_points
    pub fn add_point(&mut self, point: &[f64]) -> Result<Appended, SeriesError> {
        check_point(self.dim, self.max_t(), point)?;
        self.dim = Some(point.len());
        let point = Point::from_slice(point);
        let fan_out = self.config.max_points();

        let mut outcome = Appended::InPlace;
        if !self.root.try_push(&point, fan_out) {
            let depth = self.root.depth();
            let old = core::mem::replace(&mut self.root, PointNode::empty());
            self.root = PointNode::internal(vec![old, PointNode::spine(point, depth)]);
            tracing::debug!(depth = depth + 1, len = self.len(), "point tree grew a level");
            outcome = Appended::Grown;
        }

        if self.len() > self.config.max_total_points() {
            let discarded = self.trim();
            outcome = Appended::Trimmed { discarded };
        }
        Ok(outcome)
    }

    /// Append points in order, stopping at the first rejected one.
    pub fn extend<I, P>(&mut self, points: I) -> Result<(), SeriesError>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<[f64]>,
    {
        for p in points {
            self.add_point(p.as_ref())?;
        }
        Ok(())
    }

    /// Rebuild from the newest half of the cap once the cap is reached.
    ///
    /// Returns the number of points discarded; zero when the tree is still
    /// below the cap.
    fn trim(&mut self) -> usize {
        if self.len() < self.config.max_total_points() {
            return 0;
        }
        let mut data = Vec::with_capacity(self.len());
        self.root.collect_into(&mut data);
        let discarded = data.len() - self.config.retained_after_trim();
        data.drain(..discarded);
        tracing::debug!(kept = data.len(), discarded, "trimmed point tree");
        self.root = PointNode::build(data, self.config.max_points());
        discarded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SeriesConfig;

    fn series(n: usize) -> Vec<[f64; 2]> {
        (0..n).map(|i| [i as f64, 2.0 * i as f64]).collect()
    }

    fn max_fan_out(node: &PointNode) -> usize {
        let own = node.fan_out();
        node.children()
            .map(|c| c.iter().map(max_fan_out).max().unwrap_or(0))
            .unwrap_or(0)
            .max(own)
    }

    fn leaf_depths(node: &PointNode, depth: usize, out: &mut Vec<usize>) {
        match node.children() {
            None => out.push(depth),
            Some(children) => {
                for c in children {
                    leaf_depths(c, depth + 1, out);
                }
            }
        }
    }

    #[test]
    fn first_point_fixes_dimensionality() {
        let mut tree = PointTree::default();
        assert_eq!(tree.add_point(&[0.0, 1.0, 2.0]), Ok(Appended::InPlace));
        assert_eq!(tree.dim(), Some(3));
        assert_eq!(
            tree.add_point(&[1.0, 1.0]),
            Err(SeriesError::DimensionMismatch {
                expected: 3,
                found: 2
            })
        );
        assert_eq!(tree.add_point(&[]), Err(SeriesError::EmptyPoint));
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn older_points_are_rejected() {
        let mut tree = PointTree::new(series(3)).unwrap();
        assert_eq!(
            tree.add_point(&[1.5, 0.0]),
            Err(SeriesError::OutOfOrder {
                previous: 2.0,
                time: 1.5
            })
        );
        assert_eq!(tree.add_point(&[2.0, 9.0]), Ok(Appended::InPlace));
        assert_eq!(tree.len(), 4);
    }

    #[test]
    fn append_matches_bulk_build() {
        let all = series(450);
        for n in [1, 20, 21, 45, 400, 401, 449] {
            let mut appended = PointTree::new(&all[..n - 1]).unwrap();
            appended.add_point(&all[n - 1]).unwrap();
            let built = PointTree::new(&all[..n]).unwrap();
            assert_eq!(appended.full_data(), built.full_data(), "n = {n}");
            assert_eq!(appended.stats().count(), n);
            assert_eq!(appended.stats().limits(0), built.stats().limits(0));
            assert_eq!(appended.stats().sum(0), built.stats().sum(0));
        }
    }

    #[test]
    fn full_root_grows_a_level() {
        let mut tree = PointTree::new(series(20)).unwrap();
        assert_eq!(tree.tree_size(), 1);
        assert_eq!(tree.add_point(&[20.0, 40.0]), Ok(Appended::Grown));
        assert_eq!(tree.tree_size(), 2);

        let mut tree = PointTree::new(series(400)).unwrap();
        assert_eq!(tree.add_point(&[400.0, 800.0]), Ok(Appended::Grown));
        assert_eq!(tree.tree_size(), 3);
        assert_eq!(tree.max_t(), 400.0);
    }

    #[test]
    fn streaming_keeps_fan_out_and_uniform_depth() {
        let mut tree = PointTree::default();
        for (i, p) in series(1999).iter().enumerate() {
            tree.add_point(p).unwrap();
            if i % 97 == 0 {
                assert!(max_fan_out(tree.root()) <= 20);
                let mut depths = Vec::new();
                leaf_depths(tree.root(), 1, &mut depths);
                assert!(depths.iter().all(|&d| d == depths[0]), "ragged at {i}");
            }
        }
        assert_eq!(tree.len(), 1999);
        assert_eq!(tree.full_data().len(), 1999);
    }

    #[test]
    fn overflow_keeps_newest_half_of_cap() {
        let all = series(2001);
        let mut tree = PointTree::new(&all[..2000]).unwrap();
        assert_eq!(tree.len(), 2000);
        assert_eq!(
            tree.add_point(&all[2000]),
            Ok(Appended::Trimmed { discarded: 1001 })
        );
        assert_eq!(tree.len(), 1000);
        assert_eq!(tree.min_t(), 1001.0);
        assert_eq!(tree.max_t(), 2000.0);
    }

    #[test]
    fn long_streams_stay_under_cap() {
        let config = SeriesConfig::new(4, 50).unwrap();
        let mut tree = PointTree::empty(config);
        let mut trims = 0;
        for i in 0..1000 {
            if let Appended::Trimmed { .. } = tree.add_point(&[f64::from(i), 0.0]).unwrap() {
                trims += 1;
            }
            assert!(tree.len() <= 50);
            assert!(max_fan_out(tree.root()) <= 4);
        }
        assert!(trims > 0);
        let data = tree.full_data();
        assert_eq!(data.last().map(|p| p[0]), Some(999.0));
        assert!(
            data.windows(2).all(|w| w[1][0] - w[0][0] == 1.0),
            "retained points must be a contiguous newest run"
        );
    }

    #[test]
    fn extend_stops_at_first_error() {
        let mut tree = PointTree::default();
        let err = tree.extend([[0.0, 1.0], [1.0, 1.0], [0.5, 1.0], [2.0, 1.0]]);
        assert!(matches!(err, Err(SeriesError::OutOfOrder { .. })));
        assert_eq!(tree.len(), 2);
    }
}
