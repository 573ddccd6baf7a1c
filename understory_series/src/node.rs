// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree nodes, bulk construction, and cached statistics.

use alloc::vec::Vec;

use crate::types::{Point, Stats};
use crate::util::{block_len, levels_for};

/// One node of a [`PointTree`](crate::PointTree).
///
/// Leaves hold points, internal nodes hold children; both carry [`Stats`]
/// aggregated over every point beneath them.
#[derive(Clone, Debug)]
pub struct PointNode {
    pub(crate) stats: Stats,
    pub(crate) kind: NodeKind,
}

/// Payload of a [`PointNode`].
#[derive(Clone, Debug)]
pub enum NodeKind {
    /// Points ascending by time.
    Leaf(Vec<Point>),
    /// Children with ascending, non-overlapping time ranges.
    Internal(Vec<PointNode>),
}

impl PointNode {
    /// A leaf without points: the root of an empty tree.
    pub(crate) fn empty() -> Self {
        Self {
            stats: Stats::empty(),
            kind: NodeKind::Leaf(Vec::new()),
        }
    }

    pub(crate) fn leaf(points: Vec<Point>) -> Self {
        Self {
            stats: Stats::from_points(&points),
            kind: NodeKind::Leaf(points),
        }
    }

    pub(crate) fn internal(children: Vec<Self>) -> Self {
        let mut node = Self {
            stats: Stats::empty(),
            kind: NodeKind::Internal(children),
        };
        node.recompute();
        node
    }

    /// Build a uniform-depth tree over `points`, which must already be sorted.
    ///
    /// The depth is the smallest that fits `points` under `fan_out`; every
    /// leaf sits at that depth, so a short trailing block is padded with
    /// single-child internal nodes.
    pub(crate) fn build(points: Vec<Point>, fan_out: usize) -> Self {
        let levels = levels_for(points.len(), fan_out);
        tracing::trace!(points = points.len(), levels, "building point tree");
        Self::build_at(points, fan_out, levels)
    }

    fn build_at(points: Vec<Point>, fan_out: usize, levels: usize) -> Self {
        if levels <= 1 {
            return Self::leaf(points);
        }
        let block = block_len(fan_out, levels);
        let mut children = Vec::with_capacity(points.len().div_ceil(block).max(1));
        let mut rest = points.into_iter();
        loop {
            let chunk: Vec<Point> = rest.by_ref().take(block).collect();
            if chunk.is_empty() {
                break;
            }
            children.push(Self::build_at(chunk, fan_out, levels - 1));
        }
        Self::internal(children)
    }

    /// A chain of single-child internal nodes ending in a one-point leaf.
    ///
    /// The returned node's [`depth`](Self::depth) is exactly `depth` (at least 1).
    pub(crate) fn spine(point: Point, depth: usize) -> Self {
        let mut node = Self::leaf(alloc::vec![point]);
        for _ in 1..depth {
            node = Self {
                stats: node.stats.clone(),
                kind: NodeKind::Internal(alloc::vec![node]),
            };
        }
        node
    }

    /// Recompute this node's stats from its points or its children's cached stats.
    pub(crate) fn recompute(&mut self) {
        self.stats = match &self.kind {
            NodeKind::Leaf(points) => Stats::from_points(points),
            NodeKind::Internal(children) => {
                let mut stats = Stats::empty();
                for child in children {
                    stats.merge(&child.stats);
                }
                stats
            }
        };
    }

    /// Cached aggregates over every point beneath this node.
    #[inline]
    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    /// Leaf or internal payload.
    #[inline]
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Points, if this is a leaf.
    pub fn points(&self) -> Option<&[Point]> {
        match &self.kind {
            NodeKind::Leaf(points) => Some(points),
            NodeKind::Internal(_) => None,
        }
    }

    /// Children, if this is an internal node.
    pub fn children(&self) -> Option<&[Self]> {
        match &self.kind {
            NodeKind::Leaf(_) => None,
            NodeKind::Internal(children) => Some(children),
        }
    }

    /// Number of entries held directly (points or children).
    pub fn fan_out(&self) -> usize {
        match &self.kind {
            NodeKind::Leaf(points) => points.len(),
            NodeKind::Internal(children) => children.len(),
        }
    }

    /// Depth of the subtree: 1 for a leaf, `1 + max(child depths)` otherwise.
    pub fn depth(&self) -> usize {
        match &self.kind {
            NodeKind::Leaf(_) => 1,
            NodeKind::Internal(children) => {
                1 + children.iter().map(Self::depth).max().unwrap_or(0)
            }
        }
    }

    /// Append every point beneath this node to `out`, in time order.
    pub(crate) fn collect_into(&self, out: &mut Vec<Point>) {
        match &self.kind {
            NodeKind::Leaf(points) => out.extend_from_slice(points),
            NodeKind::Internal(children) => {
                for child in children {
                    child.collect_into(out);
                }
            }
        }
    }

    /// Push up to `k` of the earliest points onto `out`, oldest first.
    /// Returns how many were pushed.
    pub(crate) fn push_first(&self, k: usize, out: &mut Vec<Point>) -> usize {
        match &self.kind {
            NodeKind::Leaf(points) => {
                let n = k.min(points.len());
                out.extend_from_slice(&points[..n]);
                n
            }
            NodeKind::Internal(children) => {
                let mut taken = 0;
                for child in children {
                    if taken == k {
                        break;
                    }
                    taken += child.push_first(k - taken, out);
                }
                taken
            }
        }
    }

    /// Push up to `k` of the latest points onto `out`, newest first.
    /// Returns how many were pushed.
    pub(crate) fn push_last_rev(&self, k: usize, out: &mut Vec<Point>) -> usize {
        match &self.kind {
            NodeKind::Leaf(points) => {
                let n = k.min(points.len());
                out.extend(points[points.len() - n..].iter().rev().cloned());
                n
            }
            NodeKind::Internal(children) => {
                let mut taken = 0;
                for child in children.iter().rev() {
                    if taken == k {
                        break;
                    }
                    taken += child.push_last_rev(k - taken, out);
                }
                taken
            }
        }
    }
}
