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
use std::arch::aarch64::*;

const SHUFFLE_PAIRS_CN2: [u8; 16] = [0, 2, 1, 3, 4, 6, 5, 7, 8, 10, 9, 11, 12, 14, 13, 15];
const SHUFFLE_PAIRS_CN4: [u8; 16] = [0, 4, 1, 5, 2, 6, 3, 7, 8, 12, 9, 13, 10, 14, 11, 15];

const BILINEAR_SHIFT_I32: i32 = BILINEAR_SHIFT as i32;

pub(crate) struct NeonRowHandler;

impl BilinearRowHandler for NeonRowHandler {
    const LANES: usize = 16;
    const GATHER_LANES: usize = 16;

    fn gather_pairs<const CN: usize>(src_row: &[u8], table: &AxisTable, pairs: &mut [u8]) {
        debug_assert_eq!(table.neighbour, 1);
        let dst_width = table.indices.len();
        let mut x = 0usize;
        unsafe {
            match CN {
                2 => {
                    let shuffle = vld1q_u8(SHUFFLE_PAIRS_CN2.as_ptr());
                    while x + 4 <= dst_width {
                        let ix = &table.indices[x..x + 4];
                        let mut packed = [0u32; 4];
                        for (dst, &index) in packed.iter_mut().zip(ix) {
                            let px = &src_row[index * 2..index * 2 + 4];
                            *dst = (px.as_ptr() as *const u32).read_unaligned();
                        }
                        let v = vreinterpretq_u8_u32(vld1q_u32(packed.as_ptr()));
                        let dst = &mut pairs[x * 4..x * 4 + 16];
                        vst1q_u8(dst.as_mut_ptr(), vqtbl1q_u8(v, shuffle));
                        x += 4;
                    }
                }
                4 => {
                    let shuffle = vld1q_u8(SHUFFLE_PAIRS_CN4.as_ptr());
                    while x + 2 <= dst_width {
                        let ix = &table.indices[x..x + 2];
                        let px0 = &src_row[ix[0] * 4..ix[0] * 4 + 8];
                        let px1 = &src_row[ix[1] * 4..ix[1] * 4 + 8];
                        let v = vcombine_u8(vld1_u8(px0.as_ptr()), vld1_u8(px1.as_ptr()));
                        let dst = &mut pairs[x * 8..x * 8 + 16];
                        vst1q_u8(dst.as_mut_ptr(), vqtbl1q_u8(v, shuffle));
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

    fn gather_gray_block(src_row: &[u8], block: &GrayBlock, pairs: &mut [u8]) {
        let window = &src_row[block.src..block.src + 16];
        let dst = &mut pairs[block.dst..block.dst + 16];
        unsafe {
            let v = vld1q_u8(window.as_ptr());
            let shuffle = vld1q_u8(block.shuffle.as_ptr());
            vst1q_u8(dst.as_mut_ptr(), vqtbl1q_u8(v, shuffle));
        }
    }

    fn interpolate_x(pairs: &[u8], ax: &[u8], row: &mut [u16]) {
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

    fn interpolate_y(row0: &[u16], row1: &[u16], fy: u8, dst: &mut [u8], _: Alignment) {
        let length = dst.len();
        debug_assert!(length >= 16);
        let mut x = 0usize;
        unsafe {
            let w0 = vdupq_n_u16((FRACTION_RANGE - fy) as u16);
            let w1 = vdupq_n_u16(fy as u16);
            while x + 16 <= length {
                interpolate_y_16(&row0[x..], &row1[x..], w0, w1, &mut dst[x..]);
                x += 16;
            }
            if x < length {
                let x = length - 16;
                interpolate_y_16(&row0[x..], &row1[x..], w0, w1, &mut dst[x..]);
            }
        }
    }
}

#[inline(always)]
unsafe fn interpolate_x_16(pairs: &[u8], ax: &[u8], row: &mut [u16]) {
    let pairs = &pairs[..32];
    let ax = &ax[..32];
    let row = &mut row[..16];
    unsafe {
        // .0 holds left samples and their weights, .1 the right ones
        let s = vld2q_u8(pairs.as_ptr());
        let w = vld2q_u8(ax.as_ptr());
        let lo = vmlal_u8(
            vmull_u8(vget_low_u8(s.0), vget_low_u8(w.0)),
            vget_low_u8(s.1),
            vget_low_u8(w.1),
        );
        let hi = vmlal_high_u8(vmull_high_u8(s.0, w.0), s.1, w.1);
        vst1q_u16(row.as_mut_ptr(), lo);
        vst1q_u16(row.get_unchecked_mut(8..).as_mut_ptr(), hi);
    }
}

#[inline(always)]
unsafe fn blend_rows_8(
    r0: uint16x8_t,
    r1: uint16x8_t,
    w0: uint16x8_t,
    w1: uint16x8_t,
) -> uint8x8_t {
    unsafe {
        let v = vmlaq_u16(vmulq_u16(r0, w0), r1, w1);
        vshrn_n_u16::<BILINEAR_SHIFT_I32>(vaddq_u16(v, vdupq_n_u16(BILINEAR_ROUND_TERM)))
    }
}

#[inline(always)]
unsafe fn interpolate_y_16(
    row0: &[u16],
    row1: &[u16],
    w0: uint16x8_t,
    w1: uint16x8_t,
    dst: &mut [u8],
) {
    let row0 = &row0[..16];
    let row1 = &row1[..16];
    let dst = &mut dst[..16];
    unsafe {
        let lo = blend_rows_8(vld1q_u16(row0.as_ptr()), vld1q_u16(row1.as_ptr()), w0, w1);
        let hi = blend_rows_8(
            vld1q_u16(row0.get_unchecked(8..).as_ptr()),
            vld1q_u16(row1.get_unchecked(8..).as_ptr()),
            w0,
            w1,
        );
        vst1q_u8(dst.as_mut_ptr(), vcombine_u8(lo, hi));
    }
}
