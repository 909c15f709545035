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
use crate::acceleration_feature::{Backend, BackendSelection};
use crate::axis_table::BilinearConvention;
use crate::dispatch_bilinear::{BilinearOptions, PlaneMut, PlaneRef, resize_bilinear_u8};
use crate::floating_point_bilinear::{FloatOptions, RowStrategy, resize_bilinear_float};
use crate::image_size::ImageSize;
use crate::image_store::{ImageStore, ImageStoreMut};
use crate::resize_error::ResizeError;
use crate::row_cache::RowReuse;
use crate::threading_policy::ThreadingPolicy;

#[derive(Debug, Copy, Clone, Default)]
/// Bilinear image resizer
///
/// u8 images run on the fixed point kernels of the selected [Backend] and are
/// bit exact between backends. u16 and f32 images are blended in f32.
pub struct BilinearResizer {
    pub(crate) backend: BackendSelection,
    pub(crate) threading_policy: ThreadingPolicy,
    pub(crate) convention: BilinearConvention,
}

impl BilinearResizer {
    /// Creates a resizer with runtime backend detection, single threaded,
    /// matching pixel centers.
    pub fn new() -> Self {
        BilinearResizer::default()
    }

    pub fn set_threading_policy(&mut self, threading_policy: ThreadingPolicy) {
        self.threading_policy = threading_policy;
    }

    pub fn set_backend(&mut self, backend: BackendSelection) {
        self.backend = backend;
    }

    pub fn set_convention(&mut self, convention: BilinearConvention) {
        self.convention = convention;
    }

    /// Resizes interleaved u8 image with `N` channels.
    pub fn resize<const N: usize>(
        &self,
        store: &ImageStore<u8, N>,
        into: &mut ImageStoreMut<u8, N>,
    ) -> Result<(), ResizeError> {
        store.validate()?;
        into.validate()?;
        let backend = self.backend.resolve()?;
        let options = BilinearOptions {
            backend,
            threading_policy: self.threading_policy,
            convention: self.convention,
            row_reuse: RowReuse::Enabled,
        };
        let src_stride = store.stride();
        let dst_stride = into.stride();
        let dst_size = into.size();
        resize_bilinear_u8(
            PlaneRef {
                data: store.buffer.as_ref(),
                size: store.size(),
                stride: src_stride,
            },
            PlaneMut {
                data: into.buffer.borrow_mut(),
                size: dst_size,
                stride: dst_stride,
            },
            N,
            options,
        )
    }

    /// Resizes interleaved u16 image with `N` channels holding `bit_depth` bits per sample.
    pub fn resize_u16<const N: usize>(
        &self,
        store: &ImageStore<u16, N>,
        into: &mut ImageStoreMut<u16, N>,
        bit_depth: u32,
    ) -> Result<(), ResizeError> {
        if !(1..=16).contains(&bit_depth) {
            return Err(ResizeError::UnsupportedBitDepth(bit_depth as usize));
        }
        store.validate()?;
        into.validate()?;
        let src_size = store.size();
        let dst_size = into.size();
        let options = FloatOptions {
            threading_policy: self.threading_policy,
            convention: self.convention,
            strategy: RowStrategy::for_sizes(src_size, dst_size),
            bit_depth,
        };
        let src_stride = store.stride();
        let dst_stride = into.stride();
        resize_bilinear_float(
            store.buffer.as_ref(),
            src_size,
            src_stride,
            into.buffer.borrow_mut(),
            dst_size,
            dst_stride,
            N,
            options,
        )
    }

    /// Resizes interleaved f32 image with `N` channels.
    pub fn resize_f32<const N: usize>(
        &self,
        store: &ImageStore<f32, N>,
        into: &mut ImageStoreMut<f32, N>,
    ) -> Result<(), ResizeError> {
        store.validate()?;
        into.validate()?;
        let options = FloatOptions {
            threading_policy: self.threading_policy,
            convention: self.convention,
            strategy: RowStrategy::Cached(RowReuse::Enabled),
            bit_depth: 0,
        };
        let src_size = store.size();
        let dst_size = into.size();
        let src_stride = store.stride();
        let dst_stride = into.stride();
        resize_bilinear_float(
            store.buffer.as_ref(),
            src_size,
            src_stride,
            into.buffer.borrow_mut(),
            dst_size,
            dst_stride,
            N,
            options,
        )
    }
}

/// Resizes an interleaved u8 image of `channels` channels with the best available backend.
///
/// Strides are in bytes, the last row of either buffer may omit its padding.
pub fn resize_bilinear(
    src: &[u8],
    src_width: usize,
    src_height: usize,
    src_stride: usize,
    dst: &mut [u8],
    dst_width: usize,
    dst_height: usize,
    dst_stride: usize,
    channels: usize,
) -> Result<(), ResizeError> {
    resize_bilinear_u8(
        PlaneRef {
            data: src,
            size: ImageSize::new(src_width, src_height),
            stride: src_stride,
        },
        PlaneMut {
            data: dst,
            size: ImageSize::new(dst_width, dst_height),
            stride: dst_stride,
        },
        channels,
        BilinearOptions::new(Backend::best_available()),
    )
}
