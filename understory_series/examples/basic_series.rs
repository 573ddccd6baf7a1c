// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Basic usage of Understory Series: build, stream, query a window, and hover.

use understory_series::{Appended, PointTree, SeriesConfig};

fn main() {
    // A small fan-out and cap make growth and trimming visible quickly.
    let config = SeriesConfig::new(4, 40).unwrap();
    let initial = (0..10).map(|i| [f64::from(i), f64::from(i % 3)]);
    let mut tree = PointTree::with_config(initial, config).unwrap();
    println!("built: {tree:?}");

    for i in 10..45 {
        match tree.add_point(&[f64::from(i), f64::from(i % 7)]).unwrap() {
            Appended::InPlace => {}
            Appended::Grown => println!("t={i}: grew to depth {}", tree.tree_size()),
            Appended::Trimmed { discarded } => {
                println!("t={i}: trimmed {discarded}, oldest is now {}", tree.min_t());
            }
        }
    }

    // Visible window [30, 40]: points, y-axis limits, and the mean value.
    let visible = tree.data(30.0, 40.0, true);
    println!("visible points (with edges): {}", visible.len());
    println!("y limits: {:?}", tree.limits(30.0, 40.0, 0).unwrap());
    println!("mean: {:?}", tree.mean(30.0, 40.0, 0).unwrap());

    // Hover at t = 36.4: the nearest point and a five-point neighbourhood.
    println!("nearest: {:?}", tree.point(36.4).unwrap());
    let around: Vec<f64> = tree.points(36.4, 5).unwrap().iter().map(|p| p[0]).collect();
    println!("neighbourhood times: {around:?}");
}
