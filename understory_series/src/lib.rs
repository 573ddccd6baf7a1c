// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_series --heading-base-level=0

//! Understory Series: a bounded fan-out index over ordered point series.
//!
//! Charts ask the same few questions of their data over and over: which points
//! fall in the visible window, what are the axis limits there, and which point
//! sits under the cursor. [`PointTree`] answers them without scanning the whole
//! series.
//!
//! - Points are `[time, value, ...]` slices of one shared length, ascending by time.
//! - Every node caches [`Stats`] (time span, per-dimension min/max/sum, count), so
//!   range queries skip subtrees entirely outside or inside the range.
//! - Appends walk only the rightmost path and update stats in place.
//! - A global cap bounds memory: once exceeded, the newest half is kept.
//!
//! Nodes hold at most [`SeriesConfig::max_points`] entries and every leaf sits
//! at the same depth, so lookups are logarithmic in the series length.
//!
//! # Example
//!
//! ```rust
//! use understory_series::{Limits, PointTree};
//!
//! let mut tree = PointTree::new([[0.0, 1.0], [1.0, 2.0], [2.0, 1.0], [3.0, 3.0]]).unwrap();
//!
//! // Axis limits and point counts over a visible window.
//! assert_eq!(tree.limits(-1.0, 3.0, 0), Ok(Limits::new(1.0, 3.0)));
//! assert_eq!(tree.count_in(1.0, 3.0), 3);
//!
//! // Hover lookup: nearest point to the cursor time.
//! let hit = tree.point(2.4).unwrap().unwrap();
//! assert_eq!(hit.as_slice(), &[2.0, 1.0]);
//!
//! // Streaming data arrives at the end.
//! tree.add_point(&[4.0, 0.5]).unwrap();
//! assert_eq!(tree.limits(3.5, 5.0, 0), Ok(Limits::new(0.5, 0.5)));
//! ```
//!
//! ## Choosing a backend
//!
//! Both backends implement [`SeriesQuery`] and give identical answers:
//!
//! - [`PointTree`]: the index. Bounded memory, logarithmic queries.
//! - [`FlatSeries`](backends::FlatSeries): a sorted vector with linear scans and
//!   no cap. Fine for a few hundred points.
//!
//! ## Features
//!
//! - `std` *(default)*: forwards `std` to `thiserror` and `tracing`. The crate
//!   itself is `no_std` and needs only `alloc`.
//!
//! ### Float semantics
//!
//! Times must not be NaN; such points are rejected with
//! [`SeriesError::OutOfOrder`]. NaN query bounds select nothing.

#![no_std]

extern crate alloc;

mod append;
mod backend;
pub mod backends;
mod config;
mod error;
mod nearest;
mod node;
mod query;
mod tree;
mod types;
pub(crate) mod util;

pub use append::Appended;
pub use backend::SeriesQuery;
pub use config::{MAX_POINTS, MAX_TOTAL_POINTS, SeriesConfig};
pub use error::SeriesError;
pub use node::{NodeKind, PointNode};
pub use tree::PointTree;
pub use types::{Limits, Point, Stats};
