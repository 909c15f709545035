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
use crate::avx2::AvxRowHandler;
use crate::axis_table::AxisTable;
use crate::bilinear_handler::BilinearRowHandler;
use crate::gray_blocks::GrayBlock;
use crate::support::{BILINEAR_ROUND_TERM, BILINEAR_SHIFT, FRACTION_RANGE};
#[cfg(target_arch = "x86")]
use std::arch::x86::*;
#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

const BILINEAR_SHIFT_U32: u32 = BILINEAR_SHIFT;

/// 64 lane kernels, gathers are shared with AVX2 which every AVX-512BW CPU has.
pub(crate) struct Avx512RowHandler;

impl BilinearRowHandler for Avx512RowHandler {
    const LANES: usize = 64;
    const GATHER_LANES: usize = AvxRowHandler::GATHER_LANES;

    fn gather_pairs<const CN: usize>(src_row: &[u8], table: &AxisTable, pairs: &mut [u8]) {
        AvxRowHandler::gather_pairs::<CN>(src_row, table, pairs);
    }

    fn gather_gray_block(src_row: &[u8], block: &GrayBlock, pairs: &mut [u8]) {
        AvxRowHandler::gather_gray_block(src_row, block, pairs);
    }

    fn interpolate_x(pairs: &[u8], ax: &[u8], row: &mut [u16]) {
        unsafe { interpolate_x_avx512(pairs, ax, row) }
    }

    fn interpolate_y(row0: &[u16], row1: &[u16], fy: u8, dst: &mut [u8], alignment: Alignment) {
        unsafe {
            match alignment {
                Alignment::Aligned => interpolate_y_avx512::<true>(row0, row1, fy, dst),
                Alignment::Unaligned => interpolate_y_avx512::<false>(row0, row1, fy, dst),
            }
        }
    }
}

#[inline(always)]
unsafe fn interpolate_x_32(pairs: &[u8], ax: &[u8], row: &mut [u16]) {
    let pairs = &pairs[..64];
    let ax = &ax[..64];
    let row = &mut row[..32];
    unsafe {
        let s = _mm512_loadu_si512(pairs.as_ptr() as *const _);
        let w = _mm512_loadu_si512(ax.as_ptr() as *const _);
        _mm512_storeu_si512(row.as_mut_ptr() as *mut _, _mm512_maddubs_epi16(s, w));
    }
}

#[target_feature(enable = "avx512f", enable = "avx512bw")]
unsafe fn interpolate_x_avx512(pairs: &[u8], ax: &[u8], row: &mut [u16]) {
    let length = row.len();
    debug_assert!(length >= 32);
    let mut x = 0usize;
    unsafe {
        while x + 32 <= length {
            interpolate_x_32(&pairs[x * 2..], &ax[x * 2..], &mut row[x..]);
            x += 32;
        }
        if x < length {
            let x = length - 32;
            interpolate_x_32(&pairs[x * 2..], &ax[x * 2..], &mut row[x..]);
        }
    }
}

#[inline(always)]
unsafe fn blend_rows_32(r0: __m512i, r1: __m512i, w0: __m512i, w1: __m512i) -> __m512i {
    unsafe {
        let rounding = _mm512_set1_epi16(BILINEAR_ROUND_TERM as i16);
        let v = _mm512_add_epi16(_mm512_mullo_epi16(r0, w0), _mm512_mullo_epi16(r1, w1));
        _mm512_srli_epi16::<BILINEAR_SHIFT_U32>(_mm512_add_epi16(v, rounding))
    }
}

#[inline(always)]
unsafe fn interpolate_y_64<const ALIGNED: bool>(
    row0: &[u16],
    row1: &[u16],
    w0: __m512i,
    w1: __m512i,
    dst: &mut [u8],
) {
    let row0 = &row0[..64];
    let row1 = &row1[..64];
    let dst = &mut dst[..64];
    unsafe {
        let lo = blend_rows_32(
            _mm512_loadu_si512(row0.as_ptr() as *const _),
            _mm512_loadu_si512(row1.as_ptr() as *const _),
            w0,
            w1,
        );
        let hi = blend_rows_32(
            _mm512_loadu_si512(row0.get_unchecked(32..).as_ptr() as *const _),
            _mm512_loadu_si512(row1.get_unchecked(32..).as_ptr() as *const _),
            w0,
            w1,
        );
        // packus interleaves 128 bit lanes of both inputs
        let order = _mm512_set_epi64(7, 5, 3, 1, 6, 4, 2, 0);
        let packed = _mm512_permutexvar_epi64(order, _mm512_packus_epi16(lo, hi));
        if ALIGNED {
            _mm512_store_si512(dst.as_mut_ptr() as *mut _, packed);
        } else {
            _mm512_storeu_si512(dst.as_mut_ptr() as *mut _, packed);
        }
    }
}

#[target_feature(enable = "avx512f", enable = "avx512bw")]
unsafe fn interpolate_y_avx512<const ALIGNED: bool>(
    row0: &[u16],
    row1: &[u16],
    fy: u8,
    dst: &mut [u8],
) {
    let length = dst.len();
    debug_assert!(length >= 64);
    let mut x = 0usize;
    unsafe {
        let w0 = _mm512_set1_epi16((FRACTION_RANGE - fy) as i16);
        let w1 = _mm512_set1_epi16(fy as i16);
        while x + 64 <= length {
            interpolate_y_64::<ALIGNED>(&row0[x..], &row1[x..], w0, w1, &mut dst[x..]);
            x += 64;
        }
        if x < length {
            let x = length - 64;
            interpolate_y_64::<false>(&row0[x..], &row1[x..], w0, w1, &mut dst[x..]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bilinear_native::ScalarRowHandler;

    #[test]
    fn avx512_kernels_match_scalar() {
        if !std::arch::is_x86_feature_detected!("avx512bw") {
            return;
        }
        let pairs = (0..2 * 83u32).map(|x| (x * 41 % 256) as u8).collect::<Vec<u8>>();
        let ax = (0..83u8).flat_map(|x| [16 - x % 17, x % 17]).collect::<Vec<u8>>();
        let mut row = vec![0u16; 83];
        let mut expected_row = vec![0u16; 83];
        Avx512RowHandler::interpolate_x(&pairs, &ax, &mut row);
        ScalarRowHandler::interpolate_x(&pairs, &ax, &mut expected_row);
        assert_eq!(row, expected_row);

        let lower = row.iter().rev().copied().collect::<Vec<u16>>();
        let mut dst = vec![0u8; 83];
        let mut expected = vec![0u8; 83];
        Avx512RowHandler::interpolate_y(&row, &lower, 9, &mut dst, Alignment::Unaligned);
        ScalarRowHandler::interpolate_y(&row, &lower, 9, &mut expected, Alignment::Unaligned);
        assert_eq!(dst, expected);
    }
}
