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
use crate::bilinear_native::gather_pairs_generic;
use crate::gray_blocks::GrayBlock;
use crate::support::{BILINEAR_ROUND_TERM, BILINEAR_SHIFT, FRACTION_RANGE};
#[cfg(target_arch = "x86")]
use std::arch::x86::*;
#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

/// `[l0, l1, r0, r1]` pixels into `[l0, r0, l1, r1]`.
pub(crate) const SHUFFLE_PAIRS_CN2: [u8; 16] = [
    0, 2, 1, 3, 4, 6, 5, 7, 8, 10, 9, 11, 12, 14, 13, 15,
];
/// `[l0..l3, r0..r3]` pixels into `[l0, r0, .. l3, r3]`.
pub(crate) const SHUFFLE_PAIRS_CN4: [u8; 16] = [
    0, 4, 1, 5, 2, 6, 3, 7, 8, 12, 9, 13, 10, 14, 11, 15,
];

pub(crate) struct SseRowHandler;

impl BilinearRowHandler for SseRowHandler {
    const LANES: usize = 16;
    const GATHER_LANES: usize = 16;

    fn gather_pairs<const CN: usize>(src_row: &[u8], table: &AxisTable, pairs: &mut [u8]) {
        unsafe { gather_pairs_sse::<CN>(src_row, table, pairs) }
    }

    fn gather_gray_block(src_row: &[u8], block: &GrayBlock, pairs: &mut [u8]) {
        unsafe { gather_gray_block_sse(src_row, block, pairs) }
    }

    fn interpolate_x(pairs: &[u8], ax: &[u8], row: &mut [u16]) {
        unsafe { interpolate_x_sse(pairs, ax, row) }
    }

    fn interpolate_y(row0: &[u16], row1: &[u16], fy: u8, dst: &mut [u8], alignment: Alignment) {
        unsafe {
            match alignment {
                Alignment::Aligned => interpolate_y_sse::<true>(row0, row1, fy, dst),
                Alignment::Unaligned => interpolate_y_sse::<false>(row0, row1, fy, dst),
            }
        }
    }
}

#[target_feature(enable = "sse4.1")]
unsafe fn gather_pairs_sse<const CN: usize>(src_row: &[u8], table: &AxisTable, pairs: &mut [u8]) {
    debug_assert_eq!(table.neighbour, 1);
    let dst_width = table.indices.len();
    let mut x = 0usize;
    unsafe {
        match CN {
            2 => {
                let shuffle = _mm_loadu_si128(SHUFFLE_PAIRS_CN2.as_ptr() as *const __m128i);
                while x + 4 <= dst_width {
                    let ix = &table.indices[x..x + 4];
                    let px0 = &src_row[ix[0] * 2..ix[0] * 2 + 4];
                    let px1 = &src_row[ix[1] * 2..ix[1] * 2 + 4];
                    let px2 = &src_row[ix[2] * 2..ix[2] * 2 + 4];
                    let px3 = &src_row[ix[3] * 2..ix[3] * 2 + 4];
                    let v = _mm_setr_epi32(
                        (px0.as_ptr() as *const i32).read_unaligned(),
                        (px1.as_ptr() as *const i32).read_unaligned(),
                        (px2.as_ptr() as *const i32).read_unaligned(),
                        (px3.as_ptr() as *const i32).read_unaligned(),
                    );
                    let dst = &mut pairs[x * 4..x * 4 + 16];
                    _mm_storeu_si128(
                        dst.as_mut_ptr() as *mut __m128i,
                        _mm_shuffle_epi8(v, shuffle),
                    );
                    x += 4;
                }
            }
            4 => {
                let shuffle = _mm_loadu_si128(SHUFFLE_PAIRS_CN4.as_ptr() as *const __m128i);
                while x + 2 <= dst_width {
                    let ix = &table.indices[x..x + 2];
                    let px0 = &src_row[ix[0] * 4..ix[0] * 4 + 8];
                    let px1 = &src_row[ix[1] * 4..ix[1] * 4 + 8];
                    let v = _mm_set_epi64x(
                        (px1.as_ptr() as *const i64).read_unaligned(),
                        (px0.as_ptr() as *const i64).read_unaligned(),
                    );
                    let dst = &mut pairs[x * 8..x * 8 + 16];
                    _mm_storeu_si128(
                        dst.as_mut_ptr() as *mut __m128i,
                        _mm_shuffle_epi8(v, shuffle),
                    );
                    x += 2;
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

#[target_feature(enable = "sse4.1")]
unsafe fn gather_gray_block_sse(src_row: &[u8], block: &GrayBlock, pairs: &mut [u8]) {
    let window = &src_row[block.src..block.src + 16];
    let dst = &mut pairs[block.dst..block.dst + 16];
    unsafe {
        let v = _mm_loadu_si128(window.as_ptr() as *const __m128i);
        let shuffle = _mm_loadu_si128(block.shuffle.as_ptr() as *const __m128i);
        let shuffled = _mm_shuffle_epi8(v, shuffle);
        _mm_storeu_si128(dst.as_mut_ptr() as *mut __m128i, shuffled);
    }
}

#[inline(always)]
unsafe fn interpolate_x_8(pairs: &[u8], ax: &[u8], row: &mut [u16]) {
    let pairs = &pairs[..16];
    let ax = &ax[..16];
    let row = &mut row[..8];
    unsafe {
        let s = _mm_loadu_si128(pairs.as_ptr() as *const __m128i);
        let w = _mm_loadu_si128(ax.as_ptr() as *const __m128i);
        _mm_storeu_si128(row.as_mut_ptr() as *mut __m128i, _mm_maddubs_epi16(s, w));
    }
}

#[target_feature(enable = "sse4.1")]
unsafe fn interpolate_x_sse(pairs: &[u8], ax: &[u8], row: &mut [u16]) {
    let length = row.len();
    debug_assert!(length >= 8);
    let mut x = 0usize;
    unsafe {
        while x + 8 <= length {
            interpolate_x_8(&pairs[x * 2..], &ax[x * 2..], &mut row[x..]);
            x += 8;
        }
        if x < length {
            let x = length - 8;
            interpolate_x_8(&pairs[x * 2..], &ax[x * 2..], &mut row[x..]);
        }
    }
}

#[inline(always)]
unsafe fn blend_rows_8(r0: __m128i, r1: __m128i, w0: __m128i, w1: __m128i) -> __m128i {
    unsafe {
        let rounding = _mm_set1_epi16(BILINEAR_ROUND_TERM as i16);
        let v = _mm_add_epi16(_mm_mullo_epi16(r0, w0), _mm_mullo_epi16(r1, w1));
        _mm_srli_epi16::<BILINEAR_SHIFT_I32>(_mm_add_epi16(v, rounding))
    }
}

const BILINEAR_SHIFT_I32: i32 = BILINEAR_SHIFT as i32;

#[inline(always)]
unsafe fn interpolate_y_16<const ALIGNED: bool>(
    row0: &[u16],
    row1: &[u16],
    w0: __m128i,
    w1: __m128i,
    dst: &mut [u8],
) {
    let row0 = &row0[..16];
    let row1 = &row1[..16];
    let dst = &mut dst[..16];
    unsafe {
        let lo = blend_rows_8(
            _mm_loadu_si128(row0.as_ptr() as *const __m128i),
            _mm_loadu_si128(row1.as_ptr() as *const __m128i),
            w0,
            w1,
        );
        let hi = blend_rows_8(
            _mm_loadu_si128(row0.get_unchecked(8..).as_ptr() as *const __m128i),
            _mm_loadu_si128(row1.get_unchecked(8..).as_ptr() as *const __m128i),
            w0,
            w1,
        );
        let packed = _mm_packus_epi16(lo, hi);
        if ALIGNED {
            _mm_store_si128(dst.as_mut_ptr() as *mut __m128i, packed);
        } else {
            _mm_storeu_si128(dst.as_mut_ptr() as *mut __m128i, packed);
        }
    }
}

#[target_feature(enable = "sse4.1")]
unsafe fn interpolate_y_sse<const ALIGNED: bool>(
    row0: &[u16],
    row1: &[u16],
    fy: u8,
    dst: &mut [u8],
) {
    let length = dst.len();
    debug_assert!(length >= 16);
    let mut x = 0usize;
    unsafe {
        let w0 = _mm_set1_epi16((FRACTION_RANGE - fy) as i16);
        let w1 = _mm_set1_epi16(fy as i16);
        while x + 16 <= length {
            interpolate_y_16::<ALIGNED>(&row0[x..], &row1[x..], w0, w1, &mut dst[x..]);
            x += 16;
        }
        if x < length {
            let x = length - 16;
            interpolate_y_16::<false>(&row0[x..], &row1[x..], w0, w1, &mut dst[x..]);
        }
    }
}
