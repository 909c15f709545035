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

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use pic_bilinear::{
    Backend, BackendSelection, BilinearConvention, BilinearResizer, ImageStore, ImageStoreMut,
    ThreadingPolicy,
};

#[derive(Arbitrary, Debug)]
struct ResizeCase {
    src_width: u16,
    src_height: u16,
    dst_width: u16,
    dst_height: u16,
    channels: u8,
    seed: u8,
    threads: u8,
    convention: u8,
}

fuzz_target!(|case: ResizeCase| {
    let convention = match case.convention % 3 {
        0 => BilinearConvention::PixelCenter,
        1 => BilinearConvention::AlignCorners,
        _ => BilinearConvention::Asymmetric,
    };
    match case.channels % 4 {
        0 => resize_all_backends::<1>(&case, convention),
        1 => resize_all_backends::<2>(&case, convention),
        2 => resize_all_backends::<3>(&case, convention),
        _ => resize_all_backends::<4>(&case, convention),
    }
});

fn resize_all_backends<const N: usize>(case: &ResizeCase, convention: BilinearConvention) {
    let src_width = case.src_width as usize;
    let src_height = case.src_height as usize;
    let dst_width = case.dst_width as usize;
    let dst_height = case.dst_height as usize;
    if src_width == 0
        || src_width > 700
        || src_height == 0
        || src_height > 700
        || dst_width == 0
        || dst_width > 512
        || dst_height == 0
        || dst_height > 512
    {
        return;
    }

    let src_data = (0..src_width * src_height * N)
        .map(|i| (i as u8).wrapping_mul(31).wrapping_add(case.seed))
        .collect::<Vec<u8>>();
    let store = ImageStore::<u8, N>::borrow(&src_data, src_width, src_height).unwrap();

    let mut reference = ImageStoreMut::<u8, N>::alloc(dst_width, dst_height).unwrap();
    let mut resizer = BilinearResizer::new();
    resizer.set_convention(convention);
    resizer.set_backend(BackendSelection::Exact(Backend::Scalar));
    resizer.resize(&store, &mut reference).unwrap();

    for backend in Backend::available() {
        let mut target = ImageStoreMut::<u8, N>::alloc(dst_width, dst_height).unwrap();
        resizer.set_backend(BackendSelection::Exact(backend));
        resizer.set_threading_policy(ThreadingPolicy::Fixed(case.threads as usize % 4 + 1));
        resizer.resize(&store, &mut target).unwrap();
        assert_eq!(
            reference.as_bytes(),
            target.as_bytes(),
            "{backend:?} {src_width}x{src_height} -> {dst_width}x{dst_height}"
        );
    }
}
