// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Returns the smallest `levels >= 1` such that `fan_out^levels >= len`.
#[inline]
pub(crate) const fn levels_for(len: usize, fan_out: usize) -> usize {
    let mut levels = 1;
    let mut capacity = fan_out;
    while capacity < len {
        // Saturation cannot stall the loop: `usize::MAX >= len` always holds.
        capacity = capacity.saturating_mul(fan_out);
        levels += 1;
    }
    levels
}

/// Returns `fan_out^(levels - 1)`, the number of points one child of a
/// `levels`-deep node holds when full.
#[inline]
pub(crate) const fn block_len(fan_out: usize, levels: usize) -> usize {
    let mut block = 1_usize;
    let mut i = 1;
    while i < levels {
        block = block.saturating_mul(fan_out);
        i += 1;
    }
    block
}
