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
use std::arch::wasm32::*;

const SHUFFLE_PAIRS_CN2: v128 = u8x16(0, 2, 1, 3, 4, 6, 5, 7, 8, 10, 9, 11, 12, 14, 13, 15);
const SHUFFLE_PAIRS_CN4: v128 = u8x16(0, 4, 1, 5, 2, 6, 3, 7, 8, 12, 9, 13, 10, 14, 11, 15);

pub(crate) struct WasmRowHandler;

impl BilinearRowHandler for WasmRowHandler {
    const LANES: usize = 16;
    const GATHER_LANES: usize = 16;

    fn gather_pairs<const CN: usize>(src_row: &[u8], table: &AxisTable, pairs: &mut [u8]) {
        unsafe { gather_pairs_wasm::<CN>(src_row, table, pairs) }
    }

    fn gather_gray_block(src_row: &[u8], block: &GrayBlock, pairs: &mut [u8]) {
        let window = &src_row[block.src..block.src + 16];
        let dst = &mut pairs[block.dst..block.dst + 16];
        unsafe {
            let v = v128_load(window.as_ptr() as *const v128);
            let shuffle = v128_load(block.shuffle.as_ptr() as *const v128);
            v128_store(dst.as_mut_ptr() as *mut v128, u8x16_swizzle(v, shuffle));
        }
    }

    fn interpolate_x(pairs: &[u8], ax: &[u8], row: &mut [u16]) {
        unsafe { interpolate_x_wasm(pairs, ax, row) }
    }

    fn interpolate_y(row0: &[u16], row1: &[u16], fy: u8, dst: &mut [u8], _: Alignment) {
        unsafe { interpolate_y_wasm(row0, row1, fy, dst) }
    }
}

#[inline(always)]
unsafe fn read_u32(src: &[u8], offset: usize) -> u32 {
    let px = &src[offset..offset + 4];
    unsafe { (px.as_ptr() as *const u32).read_unaligned() }
}

#[inline(always)]
unsafe fn read_u64(src: &[u8], offset: usize) -> u64 {
    let px = &src[offset..offset + 8];
    unsafe { (px.as_ptr() as *const u64).read_unaligned() }
}

#[target_feature(enable = "simd128")]
unsafe fn gather_pairs_wasm<const CN: usize>(src_row: &[u8], table: &AxisTable, pairs: &mut [u8]) {
    debug_assert_eq!(table.neighbour, 1);
    let dst_width = table.indices.len();
    let mut x = 0usize;
    unsafe {
        match CN {
            2 => {
                while x + 4 <= dst_width {
                    let ix = &table.indices[x..x + 4];
                    let v = u32x4(
                        read_u32(src_row, ix[0] * 2),
                        read_u32(src_row, ix[1] * 2),
                        read_u32(src_row, ix[2] * 2),
                        read_u32(src_row, ix[3] * 2),
                    );
                    let dst = &mut pairs[x * 4..x * 4 + 16];
                    v128_store(
                        dst.as_mut_ptr() as *mut v128,
                        u8x16_swizzle(v, SHUFFLE_PAIRS_CN2),
                    );
                    x += 4;
                }
            }
            4 => {
                while x + 2 <= dst_width {
                    let ix = &table.indices[x..x + 2];
                    let v = u64x2(read_u64(src_row, ix[0] * 4), read_u64(src_row, ix[1] * 4));
                    let dst = &mut pairs[x * 8..x * 8 + 16];
                    v128_store(
                        dst.as_mut_ptr() as *mut v128,
                        u8x16_swizzle(v, SHUFFLE_PAIRS_CN4),
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

#[inline(always)]
unsafe fn interpolate_x_8(pairs: &[u8], ax: &[u8], row: &mut [u16]) {
    let pairs = &pairs[..16];
    let ax = &ax[..16];
    let row = &mut row[..8];
    unsafe {
        let s = v128_load(pairs.as_ptr() as *const v128);
        let w = v128_load(ax.as_ptr() as *const v128);
        let lo = u32x4_extadd_pairwise_u16x8(u16x8_extmul_low_u8x16(s, w));
        let hi = u32x4_extadd_pairwise_u16x8(u16x8_extmul_high_u8x16(s, w));
        v128_store(row.as_mut_ptr() as *mut v128, u16x8_narrow_i32x4(lo, hi));
    }
}

#[target_feature(enable = "simd128")]
unsafe fn interpolate_x_wasm(pairs: &[u8], ax: &[u8], row: &mut [u16]) {
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
fn blend_rows_8(r0: v128, r1: v128, w0: v128, w1: v128) -> v128 {
    let v = u16x8_add(u16x8_mul(r0, w0), u16x8_mul(r1, w1));
    let rounded = u16x8_add(v, u16x8_splat(BILINEAR_ROUND_TERM));
    u16x8_shr(rounded, BILINEAR_SHIFT)
}

#[inline(always)]
unsafe fn interpolate_y_16(row0: &[u16], row1: &[u16], w0: v128, w1: v128, dst: &mut [u8]) {
    let row0 = &row0[..16];
    let row1 = &row1[..16];
    let dst = &mut dst[..16];
    unsafe {
        let lo = blend_rows_8(
            v128_load(row0.as_ptr() as *const v128),
            v128_load(row1.as_ptr() as *const v128),
            w0,
            w1,
        );
        let hi = blend_rows_8(
            v128_load(row0.get_unchecked(8..).as_ptr() as *const v128),
            v128_load(row1.get_unchecked(8..).as_ptr() as *const v128),
            w0,
            w1,
        );
        v128_store(dst.as_mut_ptr() as *mut v128, u8x16_narrow_i16x8(lo, hi));
    }
}

#[target_feature(enable = "simd128")]
unsafe fn interpolate_y_wasm(row0: &[u16], row1: &[u16], fy: u8, dst: &mut [u8]) {
    let length = dst.len();
    debug_assert!(length >= 16);
    let mut x = 0usize;
    let w0 = u16x8_splat((FRACTION_RANGE - fy) as u16);
    let w1 = u16x8_splat(fy as u16);
    unsafe {
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
