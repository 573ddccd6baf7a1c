// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Alternative storage for point series.
//!
//! - `flat`: a sorted vector answered by linear scans. No fan-out or cap; a
//!   good fit for a few hundred points, and the reference the tree is checked
//!   against.
//!
//! The tree itself lives at the crate root as [`PointTree`](crate::PointTree).

pub(crate) mod flat;

pub use flat::FlatSeries;
