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
use crate::avx2::utils::{_mm256_packus_ordered_epi16, _mm256_shuffle_cross_lane_epi8};
use crate::axis_table::AxisTable;
use crate::bilinear_handler::BilinearRowHandler;
use crate::bilinear_native::gather_pairs_generic;
use crate::gray_blocks::GrayBlock;
use crate::support::{BILINEAR_ROUND_TERM, BILINEAR_SHIFT, FRACTION_RANGE};
#[cfg(target_arch = "x86")]
use std::arch::x86::*;
#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

const SHUFFLE_PAIRS_CN2: [u8; 32] = [
    0, 2, 1, 3, 4, 6, 5, 7, 8, 10, 9, 11, 12, 14, 13, 15, 0, 2, 1, 3, 4, 6, 5, 7, 8, 10, 9, 11,
    12, 14, 13, 15,
];
const SHUFFLE_PAIRS_CN4: [u8; 32] = [
    0, 4, 1, 5, 2, 6, 3, 7, 8, 12, 9, 13, 10, 14, 11, 15, 0, 4, 1, 5, 2, 6, 3, 7, 8, 12, 9, 13,
    10, 14, 11, 15,
];

const BILINEAR_SHIFT_I32: i32 = BILINEAR_SHIFT as i32;

pub(crate) struct AvxRowHandler;

impl BilinearRowHandler for AvxRowHandler {
    const LANES: usize = 32;
    const GATHER_LANES: usize = 32;

    fn gather_pairs<const CN: usize>(src_row: &[u8], table: &AxisTable, pairs: &mut [u8]) {
        unsafe { gather_pairs_avx::<CN>(src_row, table, pairs) }
    }

    fn gather_gray_block(src_row: &[u8], block: &GrayBlock, pairs: &mut [u8]) {
        unsafe { gather_gray_block_avx(src_row, block, pairs) }
    }

    fn interpolate_x(pairs: &[u8], ax: &[u8], row: &mut [u16]) {
        unsafe { interpolate_x_avx(pairs, ax, row) }
    }

    fn interpolate_y(row0: &[u16], row1: &[u16], fy: u8, dst: &mut [u8], alignment: Alignment) {
        unsafe {
            match alignment {
                Alignment::Aligned => interpolate_y_avx::<true>(row0, row1, fy, dst),
                Alignment::Unaligned => interpolate_y_avx::<false>(row0, row1, fy, dst),
            }
        }
    }
}

#[inline(always)]
unsafe fn read_i32(src: &[u8], offset: usize) -> i32 {
    let px = &src[offset..offset + 4];
    unsafe { (px.as_ptr() as *const i32).read_unaligned() }
}

#[inline(always)]
unsafe fn read_i64(src: &[u8], offset: usize) -> i64 {
    let px = &src[offset..offset + 8];
    unsafe { (px.as_ptr() as *const i64).read_unaligned() }
}

#[target_feature(enable = "avx2")]
unsafe fn gather_pairs_avx<const CN: usize>(src_row: &[u8], table: &AxisTable, pairs: &mut [u8]) {
    debug_assert_eq!(table.neighbour, 1);
    let dst_width = table.indices.len();
    let mut x = 0usize;
    unsafe {
        match CN {
            2 => {
                let shuffle = _mm256_loadu_si256(SHUFFLE_PAIRS_CN2.as_ptr() as *const __m256i);
                while x + 8 <= dst_width {
                    let ix = &table.indices[x..x + 8];
                    let v = _mm256_setr_epi32(
                        read_i32(src_row, ix[0] * 2),
                        read_i32(src_row, ix[1] * 2),
                        read_i32(src_row, ix[2] * 2),
                        read_i32(src_row, ix[3] * 2),
                        read_i32(src_row, ix[4] * 2),
                        read_i32(src_row, ix[5] * 2),
                        read_i32(src_row, ix[6] * 2),
                        read_i32(src_row, ix[7] * 2),
                    );
                    let dst = &mut pairs[x * 4..x * 4 + 32];
                    _mm256_storeu_si256(
                        dst.as_mut_ptr() as *mut __m256i,
                        _mm256_shuffle_epi8(v, shuffle),
                    );
                    x += 8;
                }
            }
            4 => {
                let shuffle = _mm256_loadu_si256(SHUFFLE_PAIRS_CN4.as_ptr() as *const __m256i);
                while x + 4 <= dst_width {
                    let ix = &table.indices[x..x + 4];
                    let v = _mm256_setr_epi64x(
                        read_i64(src_row, ix[0] * 4),
                        read_i64(src_row, ix[1] * 4),
                        read_i64(src_row, ix[2] * 4),
                        read_i64(src_row, ix[3] * 4),
                    );
                    let dst = &mut pairs[x * 8..x * 8 + 32];
                    _mm256_storeu_si256(
                        dst.as_mut_ptr() as *mut __m256i,
                        _mm256_shuffle_epi8(v, shuffle),
                    );
                    x += 4;
                }
            }
            _ => {}
        }
    }
    if x < dst_width {
        gather_pairs_generic(
            src_row,
            CN,
            &table.indices[x..],
            table.neighbour,
            &mut pairs[x * CN * 2..],
        );
    }
}

#[target_feature(enable = "avx2")]
unsafe fn gather_gray_block_avx(src_row: &[u8], block: &GrayBlock, pairs: &mut [u8]) {
    let window = &src_row[block.src..block.src + 32];
    let dst = &mut pairs[block.dst..block.dst + 32];
    unsafe {
        let v = _mm256_loadu_si256(window.as_ptr() as *const __m256i);
        let shuffle = _mm256_loadu_si256(block.shuffle.as_ptr() as *const __m256i);
        _mm256_storeu_si256(
            dst.as_mut_ptr() as *mut __m256i,
            _mm256_shuffle_cross_lane_epi8(v, shuffle),
        );
    }
}

#[inline(always)]
unsafe fn interpolate_x_16(pairs: &[u8], ax: &[u8], row: &mut [u16]) {
    let pairs = &pairs[..32];
    let ax = &ax[..32];
    let row = &mut row[..16];
    unsafe {
        let s = _mm256_loadu_si256(pairs.as_ptr() as *const __m256i);
        let w = _mm256_loadu_si256(ax.as_ptr() as *const __m256i);
        _mm256_storeu_si256(row.as_mut_ptr() as *mut __m256i, _mm256_maddubs_epi16(s, w));
    }
}

#[target_feature(enable = "avx2")]
unsafe fn interpolate_x_avx(pairs: &[u8], ax: &[u8], row: &mut [u16]) {
    let length = row.len();
    debug_assert!(length >= 16);
    let mut x = 0usize;
    unsafe {
        while x + 16 <= length {
            interpolate_x_16(&pairs[x * 2..], &ax[x * 2..], &mut row[x..]);
            x += 16;
        }
        if x < length {
            let x = length - 16;
            interpolate_x_16(&pairs[x * 2..], &ax[x * 2..], &mut row[x..]);
        }
    }
}

#[inline(always)]
unsafe fn blend_rows_16(r0: __m256i, r1: __m256i, w0: __m256i, w1: __m256i) -> __m256i {
    unsafe {
        let rounding = _mm256_set1_epi16(BILINEAR_ROUND_TERM as i16);
        let v = _mm256_add_epi16(_mm256_mullo_epi16(r0, w0), _mm256_mullo_epi16(r1, w1));
        _mm256_srli_epi16::<BILINEAR_SHIFT_I32>(_mm256_add_epi16(v, rounding))
    }
}

#[inline(always)]
unsafe fn interpolate_y_32<const ALIGNED: bool>(
    row0: &[u16],
    row1: &[u16],
    w0: __m256i,
    w1: __m256i,
    dst: &mut [u8],
) {
    let row0 = &row0[..32];
    let row1 = &row1[..32];
    let dst = &mut dst[..32];
    unsafe {
        let lo = blend_rows_16(
            _mm256_loadu_si256(row0.as_ptr() as *const __m256i),
            _mm256_loadu_si256(row1.as_ptr() as *const __m256i),
            w0,
            w1,
        );
        let hi = blend_rows_16(
            _mm256_loadu_si256(row0.get_unchecked(16..).as_ptr() as *const __m256i),
            _mm256_loadu_si256(row1.get_unchecked(16..).as_ptr() as *const __m256i),
            w0,
            w1,
        );
        let packed = _mm256_packus_ordered_epi16(lo, hi);
        if ALIGNED {
            _mm256_store_si256(dst.as_mut_ptr() as *mut __m256i, packed);
        } else {
            _mm256_storeu_si256(dst.as_mut_ptr() as *mut __m256i, packed);
        }
    }
}

#[target_feature(enable = "avx2")]
unsafe fn interpolate_y_avx<const ALIGNED: bool>(
    row0: &[u16],
    row1: &[u16],
    fy: u8,
    dst: &mut [u8],
) {
    let length = dst.len();
    debug_assert!(length >= 32);
    let mut x = 0usize;
    unsafe {
        let w0 = _mm256_set1_epi16((FRACTION_RANGE - fy) as i16);
        let w1 = _mm256_set1_epi16(fy as i16);
        while x + 32 <= length {
            interpolate_y_32::<ALIGNED>(&row0[x..], &row1[x..], w0, w1, &mut dst[x..]);
            x += 32;
        }
        if x < length {
            let x = length - 32;
            interpolate_y_32::<false>(&row0[x..], &row1[x..], w0, w1, &mut dst[x..]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::axis_table::BilinearConvention;
    use crate::bilinear_native::ScalarRowHandler;
    use crate::gray_blocks::estimate_gray_blocks;

    #[test]
    fn cross_lane_gray_gather_matches_scalar() {
        if !std::arch::is_x86_feature_detected!("avx2") {
            return;
        }
        let src = (0..97u32).map(|x| (x * 29 % 256) as u8).collect::<Vec<u8>>();
        let table = AxisTable::estimate(97, 61, BilinearConvention::PixelCenter).unwrap();
        let blocks = estimate_gray_blocks(&table, 97, 32).unwrap();
        let mut pairs = vec![0u8; 61 * 2 + 32];
        for block in blocks.iter() {
            AvxRowHandler::gather_gray_block(&src, block, &mut pairs);
        }
        let mut expected = vec![0u8; 61 * 2];
        ScalarRowHandler::gather_pairs::<1>(&src, &table, &mut expected);
        assert_eq!(&pairs[..61 * 2], expected.as_slice());
    }

    #[test]
    fn vertical_pack_keeps_order() {
        if !std::arch::is_x86_feature_detected!("avx2") {
            return;
        }
        let row0 = (0..45u16).map(|x| x * 90).collect::<Vec<u16>>();
        let row1 = (0..45u16).map(|x| 4080 - x * 90).collect::<Vec<u16>>();
        let mut dst = vec![0u8; 45];
        let mut expected = vec![0u8; 45];
        AvxRowHandler::interpolate_y(&row0, &row1, 3, &mut dst, Alignment::Unaligned);
        ScalarRowHandler::interpolate_y(&row0, &row1, 3, &mut expected, Alignment::Unaligned);
        assert_eq!(dst, expected);
    }
}
