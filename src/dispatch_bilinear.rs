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
use crate::ImageSize;
use crate::acceleration_feature::{Backend, LaneWidth};
use crate::alignment::Alignment;
use crate::axis_table::{AxisTable, BilinearConvention};
use crate::bilinear_handler::{BandGeometry, BilinearRowHandler, resize_band};
use crate::bilinear_native::{ScalarRowHandler, gather_pairs_generic};
use crate::gray_blocks::estimate_gray_blocks;
use crate::image_store::check_image_layout;
use crate::portable::PortableRowHandler;
use crate::resize_error::ResizeError;
use crate::row_cache::RowReuse;
use crate::scratch::ResizeScratch;
use crate::threading_policy::ThreadingPolicy;
use rayon::prelude::*;

#[derive(Debug, Copy, Clone)]
pub(crate) struct BilinearOptions {
    pub(crate) backend: Backend,
    pub(crate) threading_policy: ThreadingPolicy,
    pub(crate) convention: BilinearConvention,
    pub(crate) row_reuse: RowReuse,
}

impl BilinearOptions {
    pub(crate) fn new(backend: Backend) -> BilinearOptions {
        BilinearOptions {
            backend,
            threading_policy: ThreadingPolicy::default(),
            convention: BilinearConvention::default(),
            row_reuse: RowReuse::default(),
        }
    }
}

/// One interleaved u8 image, strides in bytes.
#[derive(Copy, Clone)]
pub(crate) struct PlaneRef<'a> {
    pub(crate) data: &'a [u8],
    pub(crate) size: ImageSize,
    pub(crate) stride: usize,
}

pub(crate) struct PlaneMut<'a> {
    pub(crate) data: &'a mut [u8],
    pub(crate) size: ImageSize,
    pub(crate) stride: usize,
}

pub(crate) fn resize_bilinear_u8(
    src: PlaneRef,
    dst: PlaneMut,
    channels: usize,
    options: BilinearOptions,
) -> Result<(), ResizeError> {
    check_image_layout(
        src.data.len(),
        src.size.width,
        src.size.height,
        src.stride,
        channels,
    )?;
    check_image_layout(
        dst.data.len(),
        dst.size.width,
        dst.size.height,
        dst.stride,
        channels,
    )?;
    if !options.backend.is_available() {
        return Err(ResizeError::UnsupportedBackend(options.backend));
    }

    if src.size == dst.size {
        log::trace!("Equal sizes {:?}, copying rows", src.size);
        let row_length = src.size.width * channels;
        for (dst_row, src_row) in dst
            .data
            .chunks_mut(dst.stride)
            .zip(src.data.chunks(src.stride))
            .take(src.size.height)
        {
            dst_row[..row_length].copy_from_slice(&src_row[..row_length]);
        }
        return Ok(());
    }

    let mut backend = options.backend;
    if backend != Backend::Scalar && (dst.size.width < backend.lanes() || src.size.width == 1) {
        log::debug!(
            "{:?} needs {} destination and 2 source columns, got {} and {}, running scalar",
            backend,
            backend.lanes(),
            dst.size.width,
            src.size.width
        );
        backend = Backend::Scalar;
    }

    match backend {
        Backend::Scalar => resize_with::<ScalarRowHandler>(src, dst, channels, options),
        Backend::Portable(width) => match width {
            LaneWidth::W4 => resize_with::<PortableRowHandler<4>>(src, dst, channels, options),
            LaneWidth::W8 => resize_with::<PortableRowHandler<8>>(src, dst, channels, options),
            LaneWidth::W16 => resize_with::<PortableRowHandler<16>>(src, dst, channels, options),
            LaneWidth::W32 => resize_with::<PortableRowHandler<32>>(src, dst, channels, options),
            LaneWidth::W64 => resize_with::<PortableRowHandler<64>>(src, dst, channels, options),
        },
        #[cfg(all(any(target_arch = "x86_64", target_arch = "x86"), feature = "sse"))]
        Backend::Sse41 => resize_with::<crate::sse::SseRowHandler>(src, dst, channels, options),
        #[cfg(all(any(target_arch = "x86_64", target_arch = "x86"), feature = "avx"))]
        Backend::Avx2 => resize_with::<crate::avx2::AvxRowHandler>(src, dst, channels, options),
        #[cfg(all(
            any(target_arch = "x86_64", target_arch = "x86"),
            feature = "nightly_avx512"
        ))]
        Backend::Avx512Bw => {
            resize_with::<crate::avx512::Avx512RowHandler>(src, dst, channels, options)
        }
        #[cfg(all(target_arch = "aarch64", target_feature = "neon"))]
        Backend::Neon => resize_with::<crate::neon::NeonRowHandler>(src, dst, channels, options),
        #[cfg(all(target_arch = "wasm32", target_feature = "simd128"))]
        Backend::Simd128 => {
            resize_with::<crate::wasm32::WasmRowHandler>(src, dst, channels, options)
        }
        #[allow(unreachable_patterns)]
        _ => Err(ResizeError::UnsupportedBackend(backend)),
    }
}

fn resize_with<H: BilinearRowHandler>(
    src: PlaneRef,
    dst: PlaneMut,
    channels: usize,
    options: BilinearOptions,
) -> Result<(), ResizeError> {
    let x_table = AxisTable::estimate(src.size.width, dst.size.width, options.convention)?;
    let y_table = AxisTable::estimate(src.size.height, dst.size.height, options.convention)?;
    let ax = x_table.interleaved_weights(channels)?;

    let alignment = Alignment::classify(dst.data.as_ptr(), dst.stride, H::LANES);
    let geometry = BandGeometry {
        src: src.data,
        src_stride: src.stride,
        src_row_length: src.size.width * channels,
        y_table: &y_table,
        ax: &ax,
        dst_stride: dst.stride,
        dst_row_length: dst.size.width * channels,
        alignment,
    };

    let gray_path = channels == 1
        && H::GATHER_LANES > 0
        && src.size.width >= H::GATHER_LANES
        && src.size.width < 4 * dst.size.width;

    log::debug!(
        "Bilinear resize {:?} -> {:?} of {channels} channels, gray path: {gray_path}",
        src.size,
        dst.size
    );
    log::trace!("Destination stores are {alignment:?}");

    if gray_path {
        let blocks = estimate_gray_blocks(&x_table, src.size.width, H::GATHER_LANES)?;
        log::trace!("Gray row gather in {} blocks", blocks.len());
        let gather = |src_row: &[u8], pairs: &mut [u8]| {
            for block in blocks.iter() {
                H::gather_gray_block(src_row, block, pairs);
            }
        };
        return run_bands::<H, _>(&geometry, dst, options, &gather);
    }

    match channels {
        1 => run_bands::<H, _>(&geometry, dst, options, &fixed_gather::<H, 1>(&x_table)),
        2 => run_bands::<H, _>(&geometry, dst, options, &fixed_gather::<H, 2>(&x_table)),
        3 => run_bands::<H, _>(&geometry, dst, options, &fixed_gather::<H, 3>(&x_table)),
        4 => run_bands::<H, _>(&geometry, dst, options, &fixed_gather::<H, 4>(&x_table)),
        _ => {
            let gather = |src_row: &[u8], pairs: &mut [u8]| {
                gather_pairs_generic(
                    src_row,
                    channels,
                    &x_table.indices,
                    x_table.neighbour,
                    pairs,
                )
            };
            run_bands::<H, _>(&geometry, dst, options, &gather)
        }
    }
}

fn fixed_gather<H: BilinearRowHandler, const CN: usize>(
    table: &AxisTable,
) -> impl Fn(&[u8], &mut [u8]) + Sync + '_ {
    move |src_row: &[u8], pairs: &mut [u8]| H::gather_pairs::<CN>(src_row, table, pairs)
}

fn run_bands<H: BilinearRowHandler, G: Fn(&[u8], &mut [u8]) + Sync>(
    geometry: &BandGeometry,
    dst: PlaneMut,
    options: BilinearOptions,
    gather: &G,
) -> Result<(), ResizeError> {
    let row_length = geometry.dst_row_length;
    let used = dst.stride * (dst.size.height - 1) + row_length;
    let target = &mut dst.data[..used];

    let pool = options.threading_policy.get_pool(dst.size);
    match pool {
        Some(pool) => {
            let threads = pool.current_num_threads();
            let rows_per_band = dst.size.height.div_ceil(threads);
            log::trace!("Bands of {rows_per_band} rows over {threads} threads");
            pool.install(|| {
                target
                    .par_chunks_mut(dst.stride * rows_per_band)
                    .enumerate()
                    .try_for_each(|(band_index, band)| {
                        let mut scratch = ResizeScratch::new(row_length, options.row_reuse)?;
                        resize_band::<H, G>(
                            geometry,
                            band,
                            band_index * rows_per_band,
                            &mut scratch,
                            gather,
                        );
                        Ok(())
                    })
            })
        }
        None => {
            let mut scratch = ResizeScratch::new(row_length, options.row_reuse)?;
            resize_band::<H, G>(geometry, target, 0, &mut scratch, gather);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::support::{blend_horizontal, blend_vertical};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn random_image(width: usize, height: usize, channels: usize, seed: u64) -> Vec<u8> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..width * height * channels)
            .map(|_| rng.random::<u8>())
            .collect()
    }

    fn resize_packed(
        src: &[u8],
        src_size: ImageSize,
        dst_size: ImageSize,
        channels: usize,
        options: BilinearOptions,
    ) -> Vec<u8> {
        let mut dst = vec![0u8; dst_size.width * dst_size.height * channels];
        resize_bilinear_u8(
            PlaneRef {
                data: src,
                size: src_size,
                stride: src_size.width * channels,
            },
            PlaneMut {
                data: &mut dst,
                size: dst_size,
                stride: dst_size.width * channels,
            },
            channels,
            options,
        )
        .unwrap();
        dst
    }

    /// Straight per element formula, no row cache and no packing.
    fn reference(
        src: &[u8],
        src_size: ImageSize,
        dst_size: ImageSize,
        channels: usize,
    ) -> Vec<u8> {
        let convention = BilinearConvention::PixelCenter;
        let x_table = AxisTable::estimate(src_size.width, dst_size.width, convention).unwrap();
        let y_table = AxisTable::estimate(src_size.height, dst_size.height, convention).unwrap();
        let src_stride = src_size.width * channels;
        let sample = |x: usize, y: usize, c: usize| src[y * src_stride + x * channels + c];
        let mut dst = Vec::with_capacity(dst_size.width * dst_size.height * channels);
        for dy in 0..dst_size.height {
            let sy = y_table.indices[dy];
            let fy = y_table.weights[dy];
            for dx in 0..dst_size.width {
                let sx = x_table.indices[dx];
                let fx = x_table.weights[dx];
                for c in 0..channels {
                    let horizontal = |y: usize| {
                        blend_horizontal(
                            sample(sx, y, c),
                            sample(sx + x_table.neighbour, y, c),
                            16 - fx,
                            fx,
                        )
                    };
                    dst.push(blend_vertical(
                        horizontal(sy),
                        horizontal(sy + y_table.neighbour),
                        fy,
                    ));
                }
            }
        }
        dst
    }

    const SIZES: [(usize, usize, usize, usize); 9] = [
        (7, 5, 13, 9),
        (17, 3, 40, 6),
        (64, 64, 33, 31),
        (100, 20, 17, 50),
        (70, 9, 31, 14),
        (130, 7, 97, 3),
        (1, 6, 19, 4),
        (23, 1, 70, 2),
        (9, 9, 1, 1),
    ];

    #[test]
    fn scalar_matches_reference_formula() {
        for (i, &(sw, sh, dw, dh)) in SIZES.iter().enumerate() {
            for channels in 1..=5usize {
                let src_size = ImageSize::new(sw, sh);
                let dst_size = ImageSize::new(dw, dh);
                let src = random_image(sw, sh, channels, i as u64 * 7 + channels as u64);
                let scalar = resize_packed(
                    &src,
                    src_size,
                    dst_size,
                    channels,
                    BilinearOptions::new(Backend::Scalar),
                );
                assert_eq!(
                    scalar,
                    reference(&src, src_size, dst_size, channels),
                    "{sw}x{sh} -> {dw}x{dh}, {channels} channels"
                );
            }
        }
    }

    #[test]
    fn every_backend_is_bit_exact() {
        for backend in Backend::available() {
            for (i, &(sw, sh, dw, dh)) in SIZES.iter().enumerate() {
                for channels in 1..=5usize {
                    let src_size = ImageSize::new(sw, sh);
                    let dst_size = ImageSize::new(dw, dh);
                    let src = random_image(sw, sh, channels, 1000 + i as u64 + channels as u64);
                    let expected = resize_packed(
                        &src,
                        src_size,
                        dst_size,
                        channels,
                        BilinearOptions::new(Backend::Scalar),
                    );
                    let result = resize_packed(
                        &src,
                        src_size,
                        dst_size,
                        channels,
                        BilinearOptions::new(backend),
                    );
                    assert_eq!(
                        result, expected,
                        "{backend:?} {sw}x{sh} -> {dw}x{dh}, {channels} channels"
                    );
                }
            }
        }
    }

    #[test]
    fn tail_widths_are_bit_exact() {
        for backend in Backend::available() {
            for dw in [16usize, 17, 31, 33, 63, 65, 66, 127, 129] {
                let src_size = ImageSize::new(50, 4);
                let dst_size = ImageSize::new(dw, 5);
                let src = random_image(50, 4, 1, dw as u64);
                let expected = resize_packed(
                    &src,
                    src_size,
                    dst_size,
                    1,
                    BilinearOptions::new(Backend::Scalar),
                );
                let result =
                    resize_packed(&src, src_size, dst_size, 1, BilinearOptions::new(backend));
                assert_eq!(result, expected, "{backend:?} width {dw}");
            }
        }
    }

    #[test]
    fn row_reuse_does_not_change_output() {
        let src_size = ImageSize::new(41, 17);
        let src = random_image(41, 17, 3, 5);
        for dst_size in [
            ImageSize::new(80, 60),
            ImageSize::new(20, 8),
            ImageSize::new(41, 30),
        ] {
            for backend in Backend::available() {
                let mut options = BilinearOptions::new(backend);
                let cached = resize_packed(&src, src_size, dst_size, 3, options);
                options.row_reuse = RowReuse::Disabled;
                let uncached = resize_packed(&src, src_size, dst_size, 3, options);
                assert_eq!(cached, uncached, "{backend:?} {dst_size:?}");
            }
        }
    }

    #[test]
    fn interleaved_channels_resize_independently() {
        let src_size = ImageSize::new(37, 21);
        let dst_size = ImageSize::new(52, 11);
        let src = random_image(37, 21, 3, 77);
        let options = BilinearOptions::new(Backend::best_available());
        let rgb = resize_packed(&src, src_size, dst_size, 3, options);
        for c in 0..3 {
            let plane = src.iter().skip(c).step_by(3).copied().collect::<Vec<u8>>();
            let resized = resize_packed(&plane, src_size, dst_size, 1, options);
            let channel = rgb.iter().skip(c).step_by(3).copied().collect::<Vec<u8>>();
            assert_eq!(channel, resized, "channel {c}");
        }
    }

    #[test]
    fn equal_sizes_copy_rows() {
        let size = ImageSize::new(13, 7);
        let src = random_image(13, 7, 4, 3);
        let mut dst = vec![0xAAu8; 60 * 7];
        resize_bilinear_u8(
            PlaneRef {
                data: &src,
                size,
                stride: 13 * 4,
            },
            PlaneMut {
                data: &mut dst,
                size,
                stride: 60,
            },
            4,
            BilinearOptions::new(Backend::best_available()),
        )
        .unwrap();
        for (y, row) in dst.chunks(60).enumerate() {
            assert_eq!(&row[..52], &src[y * 52..(y + 1) * 52]);
            assert!(row[52..].iter().all(|&x| x == 0xAA));
        }
    }

    #[test]
    fn ramp_upscale() {
        let src = [0u8, 85, 170, 255].repeat(4);
        for backend in Backend::available() {
            let dst = resize_packed(
                &src,
                ImageSize::new(4, 4),
                ImageSize::new(8, 8),
                1,
                BilinearOptions::new(backend),
            );
            for row in dst.chunks(8) {
                assert_eq!(row, &[0, 21, 64, 106, 149, 191, 234, 255], "{backend:?}");
            }
        }
    }

    #[test]
    fn bands_match_single_thread() {
        let src_size = ImageSize::new(300, 211);
        let dst_size = ImageSize::new(177, 389);
        let src = random_image(300, 211, 4, 11);
        let backend = Backend::best_available();
        let single = resize_packed(&src, src_size, dst_size, 4, BilinearOptions::new(backend));
        for policy in [
            ThreadingPolicy::Fixed(3),
            ThreadingPolicy::Fixed(8),
            ThreadingPolicy::Adaptive,
        ] {
            let mut options = BilinearOptions::new(backend);
            options.threading_policy = policy;
            let banded = resize_packed(&src, src_size, dst_size, 4, options);
            assert_eq!(banded, single, "{policy:?}");
        }
    }

    #[test]
    fn padded_strides_leave_padding_untouched() {
        let src_size = ImageSize::new(45, 12);
        let dst_size = ImageSize::new(90, 19);
        let src_stride = 45 * 2 + 7;
        let dst_stride = 90 * 2 + 13;
        let mut src = random_image(src_stride, 12, 1, 21);
        src.truncate(src_stride * 11 + 90);
        let packed = src
            .chunks(src_stride)
            .flat_map(|row| row[..90].to_vec())
            .collect::<Vec<u8>>();
        let scalar = BilinearOptions::new(Backend::Scalar);
        let expected = resize_packed(&packed, src_size, dst_size, 2, scalar);
        for backend in Backend::available() {
            let mut dst = vec![0x5Au8; dst_stride * 19];
            resize_bilinear_u8(
                PlaneRef {
                    data: &src,
                    size: src_size,
                    stride: src_stride,
                },
                PlaneMut {
                    data: &mut dst,
                    size: dst_size,
                    stride: dst_stride,
                },
                2,
                BilinearOptions::new(backend),
            )
            .unwrap();
            for (row, expected_row) in dst.chunks(dst_stride).zip(expected.chunks(180)) {
                assert_eq!(&row[..180], expected_row, "{backend:?}");
                assert!(row[180..].iter().all(|&x| x == 0x5A));
            }
        }
    }

    #[test]
    fn aligned_destination_is_bit_exact() {
        let src_size = ImageSize::new(99, 40);
        let dst_size = ImageSize::new(128, 33);
        let src = random_image(99, 40, 1, 8);
        let scalar = BilinearOptions::new(Backend::Scalar);
        let expected = resize_packed(&src, src_size, dst_size, 1, scalar);
        let mut storage = vec![0u8; 128 * 33 + 64];
        let offset = storage.as_ptr().align_offset(64);
        for backend in Backend::available() {
            let dst = &mut storage[offset..offset + 128 * 33];
            assert_eq!(
                Alignment::classify(dst.as_ptr(), 128, backend.lanes()),
                Alignment::Aligned
            );
            resize_bilinear_u8(
                PlaneRef {
                    data: &src,
                    size: src_size,
                    stride: 99,
                },
                PlaneMut {
                    data: &mut *dst,
                    size: dst_size,
                    stride: 128,
                },
                1,
                BilinearOptions::new(backend),
            )
            .unwrap();
            assert_eq!(&*dst, expected.as_slice(), "{backend:?}");
        }
    }

    #[test]
    fn invalid_layouts_are_rejected() {
        let src = vec![0u8; 16];
        let mut dst = vec![0u8; 16];
        let options = BilinearOptions::new(Backend::Scalar);
        let run = |src_size: ImageSize, src_stride: usize, dst: &mut [u8], channels: usize| {
            resize_bilinear_u8(
                PlaneRef {
                    data: &src,
                    size: src_size,
                    stride: src_stride,
                },
                PlaneMut {
                    data: dst,
                    size: ImageSize::new(2, 2),
                    stride: 2 * channels,
                },
                channels,
                options,
            )
        };
        assert_eq!(
            run(ImageSize::new(0, 4), 4, &mut dst[..], 1),
            Err(ResizeError::ZeroImageDimensions)
        );
        assert_eq!(
            run(ImageSize::new(4, 4), 4, &mut dst[..], 0),
            Err(ResizeError::ZeroChannels)
        );
        assert_eq!(
            run(ImageSize::new(4, 4), 3, &mut dst[..], 1),
            Err(ResizeError::InvalidStride(4, 3))
        );
        assert!(matches!(
            run(ImageSize::new(4, 5), 4, &mut dst[..], 1),
            Err(ResizeError::BufferMismatch(_))
        ));
    }

    #[test]
    fn unavailable_backend_is_rejected() {
        let missing = [
            Backend::Sse41,
            Backend::Avx2,
            Backend::Avx512Bw,
            Backend::Neon,
            Backend::Simd128,
        ]
        .into_iter()
        .find(|backend| !backend.is_available());
        if let Some(backend) = missing {
            let src = vec![0u8; 16];
            let mut dst = vec![0u8; 4];
            let result = resize_bilinear_u8(
                PlaneRef {
                    data: &src,
                    size: ImageSize::new(4, 4),
                    stride: 4,
                },
                PlaneMut {
                    data: &mut dst,
                    size: ImageSize::new(2, 2),
                    stride: 2,
                },
                1,
                BilinearOptions::new(backend),
            );
            assert_eq!(result, Err(ResizeError::UnsupportedBackend(backend)));
        }
    }
}
