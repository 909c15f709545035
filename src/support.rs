/*
 * // Copyright (c) the Radzivon Bartoshyk. All rights reserved.
 * //
 * // Use of this source code is governed by a BSD-style
 * // license that can be found in the LICENSE file.
 */

/// Bits of a single axis interpolation weight.
pub(crate) const LINEAR_SHIFT: u32 = 4;
/// Fixed point denominator of an interpolation weight.
pub(crate) const FRACTION_RANGE: u8 = 1 << LINEAR_SHIFT;
/// Both axes folded together: horizontal and vertical weights multiply.
pub(crate) const BILINEAR_SHIFT: u32 = LINEAR_SHIFT * 2;
pub(crate) const BILINEAR_ROUND_TERM: u16 = 1 << (BILINEAR_SHIFT - 1);

#[inline(always)]
pub(crate) fn blend_horizontal(s0: u8, s1: u8, w0: u8, w1: u8) -> u16 {
    s0 as u16 * w0 as u16 + s1 as u16 * w1 as u16
}

#[inline(always)]
pub(crate) fn blend_vertical(r0: u16, r1: u16, fy: u8) -> u8 {
    let w1 = fy as u32;
    let w0 = FRACTION_RANGE as u32 - w1;
    ((r0 as u32 * w0 + r1 as u32 * w1 + BILINEAR_ROUND_TERM as u32) >> BILINEAR_SHIFT) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_point_fits_sixteen_bits() {
        let h = blend_horizontal(255, 255, 0, FRACTION_RANGE);
        assert_eq!(h, 4080);
        let worst = h as u32 * FRACTION_RANGE as u32 + BILINEAR_ROUND_TERM as u32;
        assert!(worst <= u16::MAX as u32);
        assert_eq!(blend_vertical(h, h, 7), 255);
    }

    #[test]
    fn blend_vertical_rounds_to_nearest() {
        // 85 * 4 * 16 = 5440, (5440 + 128) >> 8 = 21
        assert_eq!(blend_vertical(85 * 4, 85 * 4, 0), 21);
        assert_eq!(blend_vertical(0, 16 * 200, FRACTION_RANGE), 200);
    }
}
