/*
 * // Copyright (c) the Radzivon Bartoshyk. All rights reserved.
 * //
 * // Use of this source code is governed by a BSD-style
 * // license that can be found in the LICENSE file.
 */

/// Whether every destination row starts on a native vector boundary.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) enum Alignment {
    Aligned,
    Unaligned,
}

impl Alignment {
    /// Rows start at `ptr + y * stride`, so both must be multiples of `lanes` bytes.
    pub(crate) fn classify(ptr: *const u8, stride: usize, lanes: usize) -> Alignment {
        debug_assert!(lanes.is_power_of_two());
        if (ptr as usize) % lanes == 0 && stride % lanes == 0 {
            Alignment::Aligned
        } else {
            Alignment::Unaligned
        }
    }
}
