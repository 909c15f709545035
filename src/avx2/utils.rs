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
#[cfg(target_arch = "x86")]
use std::arch::x86::*;
#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

/// Byte shuffle over the whole 256 bit register, indices must be in `0..32`.
///
/// `vpshufb` only shuffles inside 128 bit lanes, so both halves are broadcast
/// and the result is picked per byte from the half the index points into.
#[inline(always)]
pub(crate) unsafe fn _mm256_shuffle_cross_lane_epi8(v: __m256i, indices: __m256i) -> __m256i {
    unsafe {
        let low = _mm256_permute2x128_si256::<0x00>(v, v);
        let high = _mm256_permute2x128_si256::<0x11>(v, v);
        let from_low = _mm256_shuffle_epi8(low, indices);
        let from_high = _mm256_shuffle_epi8(high, indices);
        let use_high = _mm256_cmpgt_epi8(indices, _mm256_set1_epi8(15));
        _mm256_blendv_epi8(from_low, from_high, use_high)
    }
}

/// Packs two vectors of u16 holding values in `0..=255` into bytes, in order.
#[inline(always)]
pub(crate) unsafe fn _mm256_packus_ordered_epi16(lo: __m256i, hi: __m256i) -> __m256i {
    unsafe { _mm256_permute4x64_epi64::<0xD8>(_mm256_packus_epi16(lo, hi)) }
}
