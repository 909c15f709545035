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
#![no_main]

use libfuzzer_sys::fuzz_target;
use pic_bilinear::{BilinearResizer, ImageStore, ImageStoreMut};

fuzz_target!(|data: (u16, u16, u16, u16, u8)| {
    resize_rgba_u16_f32(
        data.0 as usize,
        data.1 as usize,
        data.2 as usize,
        data.3 as usize,
        data.4 as u32 % 16 + 1,
    )
});

fn resize_rgba_u16_f32(
    src_width: usize,
    src_height: usize,
    dst_width: usize,
    dst_height: usize,
    bit_depth: u32,
) {
    if src_width == 0
        || src_width > 2000
        || src_height == 0
        || src_height > 2000
        || dst_width == 0
        || dst_width > 512
        || dst_height == 0
        || dst_height > 512
    {
        return;
    }

    let max_colors = (1u32 << bit_depth) - 1;
    let src_data = (0..src_width * src_height * 4)
        .map(|i| (i as u32 % (max_colors + 1)) as u16)
        .collect::<Vec<u16>>();
    let store = ImageStore::<u16, 4>::borrow(&src_data, src_width, src_height).unwrap();
    let mut target = ImageStoreMut::<u16, 4>::alloc(dst_width, dst_height).unwrap();
    let resizer = BilinearResizer::new();
    resizer.resize_u16(&store, &mut target, bit_depth).unwrap();
    assert!(target.as_bytes().iter().all(|&x| x as u32 <= max_colors));

    let src_data = vec![0.5f32; src_width * src_height * 4];
    let store = ImageStore::<f32, 4>::borrow(&src_data, src_width, src_height).unwrap();
    let mut target = ImageStoreMut::<f32, 4>::alloc(dst_width, dst_height).unwrap();
    resizer.resize_f32(&store, &mut target).unwrap();
}
