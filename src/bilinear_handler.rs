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
use crate::gray_blocks::GrayBlock;
use crate::row_cache::RowFetch;
use crate::scratch::ResizeScratch;

/// Row kernels of one backend.
///
/// Horizontal pass: packed `[left, right]` sample pairs times `[RANGE - a, a]`
/// weights, summed into u16. Vertical pass: two such rows blended and rounded
/// back to u8. Every implementation must produce exactly the bytes of the scalar
/// kernels.
pub(crate) trait BilinearRowHandler {
    /// u8 destination elements written by one vertical step.
    const LANES: usize;
    /// Source bytes shuffled by one single channel block gather, `0` if the
    /// backend has no such path.
    const GATHER_LANES: usize;

    /// Writes `2 * CN` bytes per destination pixel: for every channel its left
    /// and right source sample.
    fn gather_pairs<const CN: usize>(src_row: &[u8], table: &AxisTable, pairs: &mut [u8]);

    /// Writes `GATHER_LANES` pair bytes at `block.dst`.
    fn gather_gray_block(src_row: &[u8], block: &GrayBlock, pairs: &mut [u8]) {
        let window = &src_row[block.src..block.src + Self::GATHER_LANES];
        let dst = &mut pairs[block.dst..block.dst + Self::GATHER_LANES];
        for (dst, &shuffle) in dst.iter_mut().zip(block.shuffle.iter()) {
            *dst = window[shuffle as usize];
        }
    }

    /// `row.len()` horizontal blends, `pairs` and `ax` hold two bytes per output.
    fn interpolate_x(pairs: &[u8], ax: &[u8], row: &mut [u16]);

    /// `dst.len()` vertical blends of `row0` and `row1` with lower weight `fy`.
    fn interpolate_y(row0: &[u16], row1: &[u16], fy: u8, dst: &mut [u8], alignment: Alignment);
}

/// Geometry shared by every band of a fixed point resize.
pub(crate) struct BandGeometry<'a> {
    pub(crate) src: &'a [u8],
    pub(crate) src_stride: usize,
    /// Used elements of a source row.
    pub(crate) src_row_length: usize,
    pub(crate) y_table: &'a AxisTable,
    pub(crate) ax: &'a [u8],
    pub(crate) dst_stride: usize,
    /// Used elements of a destination row.
    pub(crate) dst_row_length: usize,
    pub(crate) alignment: Alignment,
}

/// Resizes the destination rows `first_row..` held by `band`.
///
/// `gather` fills `scratch.pairs` from one source row. Horizontal work is only
/// done for source rows the row cache does not already hold.
pub(crate) fn resize_band<H: BilinearRowHandler, G: Fn(&[u8], &mut [u8]) + ?Sized>(
    geometry: &BandGeometry,
    band: &mut [u8],
    first_row: usize,
    scratch: &mut ResizeScratch,
    gather: &G,
) {
    let row_length = geometry.dst_row_length;
    let neighbour = geometry.y_table.neighbour;
    let ResizeScratch { pairs, cache, .. } = scratch;

    let load_row = |sy: usize, pairs: &mut [u8], target: &mut [u16]| {
        let offset = sy * geometry.src_stride;
        let src_row = &geometry.src[offset..offset + geometry.src_row_length];
        gather(src_row, pairs);
        H::interpolate_x(
            &pairs[..row_length * 2],
            geometry.ax,
            &mut target[..row_length],
        );
    };

    cache.invalidate();

    for (j, dst_row) in band.chunks_mut(geometry.dst_stride).enumerate() {
        let dy = first_row + j;
        let sy = geometry.y_table.indices[dy];
        let fy = geometry.y_table.weights[dy];

        match cache.fetch(sy) {
            RowFetch::Reuse => {}
            RowFetch::Advance => {
                let (_, row1) = cache.rows_mut();
                load_row(sy + neighbour, pairs.as_mut_slice(), row1);
            }
            RowFetch::Reload => {
                let (row0, row1) = cache.rows_mut();
                load_row(sy, pairs.as_mut_slice(), row0);
                load_row(sy + neighbour, pairs.as_mut_slice(), row1);
            }
        }

        let (row0, row1) = cache.rows();
        H::interpolate_y(
            row0,
            row1,
            fy,
            &mut dst_row[..row_length],
            geometry.alignment,
        );
    }
}
