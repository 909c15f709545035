/*
 * Copyright (c) Radzivon Bartoshyk. All rights reserved.
 *
 * Redistribution and use in source and binary forms, with or without modification,
 * are permitted provided that the following conditions are met:
 *
 * 1.  Redistributions of source code must retain the above copyright notice, this
 * list of conditions and the following disclaimer.
 *
 * 2.  Redistributions in binary form must reproduce the above copyright notice,
 * this list of conditions and the following disclaimer in the documentation
 * and/or other materials provided with the distribution.
 *
 * 3.  Neither the name of the copyright holder nor the names of its
 * contributors may be used to endorse or promote products derived from
 * this software without specific prior written permission.
 *
 * THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS "AS IS"
 * AND ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO, THE
 * IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE ARE
 * DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT HOLDER OR CONTRIBUTORS BE LIABLE
 * FOR ANY DIRECT, INDIRECT, INCIDENTAL, SPECIAL, EXEMPLARY, OR CONSEQUENTIAL
 * DAMAGES (INCLUDING, BUT NOT LIMITED TO, PROCUREMENT OF SUBSTITUTE GOODS OR
 * SERVICES; LOSS OF USE, DATA, OR PROFITS; OR BUSINESS INTERRUPTION) HOWEVER
 * CAUSED AND ON ANY THEORY OF LIABILITY, WHETHER IN CONTRACT, STRICT LIABILITY,
 * OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE) ARISING IN ANY WAY OUT OF THE USE
 * OF THIS SOFTWARE, EVEN IF ADVISED OF THE POSSIBILITY OF SUCH DAMAGE.
 */
use crate::alignment::Alignment;
use crate::axis_table::AxisTable;
use crate::bilinear_handler::BilinearRowHandler;
use crate::support::{blend_horizontal, blend_vertical};

/// Packs `[left, right]` samples for any channel count.
///
/// Single sample axes have `neighbour == 0`, both halves of a pair are then the
/// same sample.
pub(crate) fn gather_pairs_generic(
    src_row: &[u8],
    channels: usize,
    indices: &[usize],
    neighbour: usize,
    pairs: &mut [u8],
) {
    let step = neighbour * channels;
    for (dst, &index) in pairs.chunks_exact_mut(channels * 2).zip(indices.iter()) {
        let px = index * channels;
        let left = &src_row[px..px + channels];
        let right = &src_row[px + step..px + step + channels];
        for ((pair, &l), &r) in dst.chunks_exact_mut(2).zip(left).zip(right) {
            pair[0] = l;
            pair[1] = r;
        }
    }
}

#[inline]
pub(crate) fn interpolate_x_scalar(pairs: &[u8], ax: &[u8], row: &mut [u16]) {
    for ((dst, src), weights) in row
        .iter_mut()
        .zip(pairs.chunks_exact(2))
        .zip(ax.chunks_exact(2))
    {
        *dst = blend_horizontal(src[0], src[1], weights[0], weights[1]);
    }
}

#[inline]
pub(crate) fn interpolate_y_scalar(row0: &[u16], row1: &[u16], fy: u8, dst: &mut [u8]) {
    for ((dst, &r0), &r1) in dst.iter_mut().zip(row0).zip(row1) {
        *dst = blend_vertical(r0, r1, fy);
    }
}

/// One element at a time, the reference every other backend is compared with.
pub(crate) struct ScalarRowHandler;

impl BilinearRowHandler for ScalarRowHandler {
    const LANES: usize = 1;
    const GATHER_LANES: usize = 0;

    fn gather_pairs<const CN: usize>(src_row: &[u8], table: &AxisTable, pairs: &mut [u8]) {
        gather_pairs_generic(src_row, CN, &table.indices, table.neighbour, pairs);
    }

    fn interpolate_x(pairs: &[u8], ax: &[u8], row: &mut [u16]) {
        interpolate_x_scalar(pairs, ax, row);
    }

    fn interpolate_y(row0: &[u16], row1: &[u16], fy: u8, dst: &mut [u8], _: Alignment) {
        interpolate_y_scalar(row0, row1, fy, dst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::axis_table::BilinearConvention;

    #[test]
    fn pairs_follow_channels() {
        let table = AxisTable::estimate(3, 2, BilinearConvention::PixelCenter).unwrap();
        let src = [10u8, 11, 20, 21, 30, 31];
        let mut pairs = [0u8; 8];
        gather_pairs_generic(&src, 2, &table.indices, table.neighbour, &mut pairs);
        // indices [0, 1]
        assert_eq!(pairs, [10, 20, 11, 21, 20, 30, 21, 31]);
    }

    #[test]
    fn single_sample_pairs_repeat() {
        let table = AxisTable::estimate(1, 3, BilinearConvention::PixelCenter).unwrap();
        let src = [7u8, 9, 11];
        let mut pairs = [0u8; 18];
        gather_pairs_generic(&src, 3, &table.indices, table.neighbour, &mut pairs);
        assert_eq!(pairs, [7, 7, 9, 9, 11, 11].repeat(3).as_slice());
    }

    #[test]
    fn ramp_upscale_matches_hand_computation() {
        let src = [0u8, 85, 170, 255];
        let table = AxisTable::estimate(4, 8, BilinearConvention::PixelCenter).unwrap();
        let ax = table.interleaved_weights(1).unwrap();
        let mut pairs = [0u8; 16];
        gather_pairs_generic(&src, 1, &table.indices, table.neighbour, &mut pairs);
        let mut row = [0u16; 8];
        ScalarRowHandler::interpolate_x(&pairs, &ax, &mut row);
        let mut dst = [0u8; 8];
        ScalarRowHandler::interpolate_y(&row, &row, 0, &mut dst, Alignment::Unaligned);
        assert_eq!(dst, [0, 21, 64, 106, 149, 191, 234, 255]);
    }
}
