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
use crate::axis_table::{BilinearConvention, FloatAxisTable};
use crate::image_store::check_image_layout;
use crate::mixed_storage::MixedStorage;
use crate::resize_error::{ResizeError, try_vec};
use crate::row_cache::{RowCache, RowFetch, RowReuse};
use crate::threading_policy::ThreadingPolicy;
use num_traits::AsPrimitive;
use rayon::prelude::*;

/// How source rows reach the vertical blend.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) enum RowStrategy {
    /// Horizontal rows go through a [RowCache].
    Cached(RowReuse),
    /// Both rows are blended per element, nothing is kept.
    Sparse,
}

impl RowStrategy {
    /// Strong vertical downscales rarely revisit a source row, caching them only costs.
    pub(crate) fn for_sizes(src_size: ImageSize, dst_size: ImageSize) -> RowStrategy {
        if dst_size.height * 2 <= src_size.height {
            RowStrategy::Sparse
        } else {
            RowStrategy::Cached(RowReuse::Enabled)
        }
    }
}

#[derive(Debug, Copy, Clone)]
pub(crate) struct FloatOptions {
    pub(crate) threading_policy: ThreadingPolicy,
    pub(crate) convention: BilinearConvention,
    pub(crate) strategy: RowStrategy,
    pub(crate) bit_depth: u32,
}

/// Horizontal taps expanded per element of a destination row.
struct ExpandedAxis {
    /// Element offset of the left sample.
    offsets: Vec<usize>,
    /// Element distance to the right sample.
    step: usize,
    alphas: Vec<f32>,
}

impl ExpandedAxis {
    fn new(table: &FloatAxisTable, channels: usize) -> Result<ExpandedAxis, ResizeError> {
        let row_length = table.indices.len() * channels;
        let mut offsets = try_vec![0usize; row_length];
        let mut alphas = try_vec![0f32; row_length];
        for ((offsets, alphas), (&index, &alpha)) in offsets
            .chunks_exact_mut(channels)
            .zip(alphas.chunks_exact_mut(channels))
            .zip(table.indices.iter().zip(table.alphas.iter()))
        {
            for (c, (offset, a)) in offsets.iter_mut().zip(alphas.iter_mut()).enumerate() {
                *offset = index * channels + c;
                *a = alpha;
            }
        }
        Ok(ExpandedAxis {
            offsets,
            step: table.neighbour * channels,
            alphas,
        })
    }

    #[inline(always)]
    fn blend<T: Copy + AsPrimitive<f32>>(&self, src_row: &[T], dx: usize) -> f32 {
        let fx1 = self.alphas[dx];
        let fx0 = 1.0 - fx1;
        let sx = self.offsets[dx];
        src_row[sx].as_() * fx0 + src_row[sx + self.step].as_() * fx1
    }

    fn interpolate_row<T: Copy + AsPrimitive<f32>>(&self, src_row: &[T], row: &mut [f32]) {
        for (dx, dst) in row.iter_mut().enumerate() {
            *dst = self.blend(src_row, dx);
        }
    }
}

struct FloatGeometry<'a, T> {
    src: &'a [T],
    src_stride: usize,
    x_axis: &'a ExpandedAxis,
    y_table: &'a FloatAxisTable,
    dst_stride: usize,
    row_length: usize,
    bit_depth: u32,
}

fn resize_band_cached<T>(
    geometry: &FloatGeometry<T>,
    band: &mut [T],
    first_row: usize,
    cache: &mut RowCache<f32>,
) where
    T: Copy + AsPrimitive<f32>,
    f32: MixedStorage<T>,
{
    let neighbour = geometry.y_table.neighbour;
    let load_row = |sy: usize, target: &mut [f32]| {
        let src_row = &geometry.src[sy * geometry.src_stride..];
        geometry.x_axis.interpolate_row(src_row, target);
    };
    cache.invalidate();
    for (j, dst_row) in band.chunks_mut(geometry.dst_stride).enumerate() {
        let dy = first_row + j;
        let sy = geometry.y_table.indices[dy];
        let fy1 = geometry.y_table.alphas[dy];
        let fy0 = 1.0 - fy1;
        match cache.fetch(sy) {
            RowFetch::Reuse => {}
            RowFetch::Advance => {
                let (_, row1) = cache.rows_mut();
                load_row(sy + neighbour, row1);
            }
            RowFetch::Reload => {
                let (row0, row1) = cache.rows_mut();
                load_row(sy, row0);
                load_row(sy + neighbour, row1);
            }
        }
        let (row0, row1) = cache.rows();
        for ((dst, &r0), &r1) in dst_row[..geometry.row_length]
            .iter_mut()
            .zip(row0)
            .zip(row1)
        {
            *dst = (r0 * fy0 + r1 * fy1).to_mixed(geometry.bit_depth);
        }
    }
}

fn resize_band_sparse<T>(geometry: &FloatGeometry<T>, band: &mut [T], first_row: usize)
where
    T: Copy + AsPrimitive<f32>,
    f32: MixedStorage<T>,
{
    let neighbour = geometry.y_table.neighbour;
    for (j, dst_row) in band.chunks_mut(geometry.dst_stride).enumerate() {
        let dy = first_row + j;
        let sy = geometry.y_table.indices[dy];
        let fy1 = geometry.y_table.alphas[dy];
        let fy0 = 1.0 - fy1;
        let src_row0 = &geometry.src[sy * geometry.src_stride..];
        let src_row1 = &geometry.src[(sy + neighbour) * geometry.src_stride..];
        for (dx, dst) in dst_row[..geometry.row_length].iter_mut().enumerate() {
            let r0 = geometry.x_axis.blend(src_row0, dx);
            let r1 = geometry.x_axis.blend(src_row1, dx);
            *dst = (r0 * fy0 + r1 * fy1).to_mixed(geometry.bit_depth);
        }
    }
}

fn resize_band<T>(
    geometry: &FloatGeometry<T>,
    band: &mut [T],
    first_row: usize,
    strategy: RowStrategy,
) -> Result<(), ResizeError>
where
    T: Copy + AsPrimitive<f32>,
    f32: MixedStorage<T>,
{
    match strategy {
        RowStrategy::Cached(reuse) => {
            let mut cache = RowCache::<f32>::new(geometry.row_length, reuse)?;
            resize_band_cached(geometry, band, first_row, &mut cache);
        }
        RowStrategy::Sparse => resize_band_sparse(geometry, band, first_row),
    }
    Ok(())
}

/// Bilinear resize of interleaved `u16` or `f32` samples, blended in `f32`.
pub(crate) fn resize_bilinear_float<T>(
    src: &[T],
    src_size: ImageSize,
    src_stride: usize,
    dst: &mut [T],
    dst_size: ImageSize,
    dst_stride: usize,
    channels: usize,
    options: FloatOptions,
) -> Result<(), ResizeError>
where
    T: Copy + Send + Sync + AsPrimitive<f32>,
    f32: MixedStorage<T>,
{
    check_image_layout(
        src.len(),
        src_size.width,
        src_size.height,
        src_stride,
        channels,
    )?;
    check_image_layout(
        dst.len(),
        dst_size.width,
        dst_size.height,
        dst_stride,
        channels,
    )?;

    let row_length = dst_size.width * channels;

    if src_size == dst_size {
        for (dst_row, src_row) in dst
            .chunks_mut(dst_stride)
            .zip(src.chunks(src_stride))
            .take(src_size.height)
        {
            dst_row[..row_length].copy_from_slice(&src_row[..row_length]);
        }
        return Ok(());
    }

    let x_table = FloatAxisTable::estimate(src_size.width, dst_size.width, options.convention)?;
    let y_table = FloatAxisTable::estimate(src_size.height, dst_size.height, options.convention)?;
    let x_axis = ExpandedAxis::new(&x_table, channels)?;

    let geometry = FloatGeometry {
        src,
        src_stride,
        x_axis: &x_axis,
        y_table: &y_table,
        dst_stride,
        row_length,
        bit_depth: options.bit_depth,
    };

    log::debug!(
        "Float bilinear resize {}x{} -> {}x{}, {} channels, {:?}",
        src_size.width,
        src_size.height,
        dst_size.width,
        dst_size.height,
        channels,
        options.strategy
    );

    let used = dst_stride * (dst_size.height - 1) + row_length;
    let target = &mut dst[..used];
    match options.threading_policy.get_pool(dst_size) {
        Some(pool) => {
            let rows_per_band = dst_size.height.div_ceil(pool.current_num_threads());
            pool.install(|| {
                target
                    .par_chunks_mut(dst_stride * rows_per_band)
                    .enumerate()
                    .try_for_each(|(band_index, band)| {
                        resize_band(
                            &geometry,
                            band,
                            band_index * rows_per_band,
                            options.strategy,
                        )
                    })
            })
        }
        None => resize_band(&geometry, target, 0, options.strategy),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn options(strategy: RowStrategy, bit_depth: u32) -> FloatOptions {
        FloatOptions {
            threading_policy: ThreadingPolicy::Single,
            convention: BilinearConvention::PixelCenter,
            strategy,
            bit_depth,
        }
    }

    fn resize_u16(
        src: &[u16],
        src_size: ImageSize,
        dst_size: ImageSize,
        channels: usize,
        options: FloatOptions,
    ) -> Vec<u16> {
        let mut dst = vec![0u16; dst_size.width * dst_size.height * channels];
        resize_bilinear_float(
            src,
            src_size,
            src_size.width * channels,
            &mut dst,
            dst_size,
            dst_size.width * channels,
            channels,
            options,
        )
        .unwrap();
        dst
    }

    #[test]
    fn sparse_and_cached_agree() {
        let mut rng = StdRng::seed_from_u64(42);
        let src_size = ImageSize::new(31, 64);
        let src = (0..31 * 64 * 3)
            .map(|_| rng.random_range(0..1024u16))
            .collect::<Vec<u16>>();
        let sparse_rows = options(RowStrategy::Sparse, 10);
        let cached_rows = options(RowStrategy::Cached(RowReuse::Enabled), 10);
        let uncached_rows = options(RowStrategy::Cached(RowReuse::Disabled), 10);
        for dst_size in [
            ImageSize::new(17, 20),
            ImageSize::new(50, 32),
            ImageSize::new(12, 90),
        ] {
            let sparse = resize_u16(&src, src_size, dst_size, 3, sparse_rows);
            let cached = resize_u16(&src, src_size, dst_size, 3, cached_rows);
            let uncached = resize_u16(&src, src_size, dst_size, 3, uncached_rows);
            assert_eq!(sparse, cached, "{dst_size:?}");
            assert_eq!(uncached, cached, "{dst_size:?}");
        }
    }

    #[test]
    fn constant_image_stays_constant() {
        let src = vec![4000u16; 23 * 19 * 2];
        let dst = resize_u16(
            &src,
            ImageSize::new(23, 19),
            ImageSize::new(51, 7),
            2,
            options(RowStrategy::Cached(RowReuse::Enabled), 12),
        );
        assert!(dst.iter().all(|&x| x == 4000));
    }

    #[test]
    fn u16_halfway_values_round_up() {
        let src = [700u16, 701, 1000, 1003];
        for strategy in [RowStrategy::Sparse, RowStrategy::Cached(RowReuse::Enabled)] {
            let dst = resize_u16(
                &src,
                ImageSize::new(4, 1),
                ImageSize::new(2, 1),
                1,
                options(strategy, 16),
            );
            assert_eq!(dst, [701, 1002], "{strategy:?}");
        }
    }

    #[test]
    fn f32_midpoints() {
        let src = [0f32, 1f32, 2f32, 3f32];
        let mut dst = [0f32; 2];
        resize_bilinear_float(
            &src,
            ImageSize::new(4, 1),
            4,
            &mut dst,
            ImageSize::new(2, 1),
            2,
            1,
            options(RowStrategy::Cached(RowReuse::Enabled), 0),
        )
        .unwrap();
        assert_eq!(dst, [0.5f32, 2.5f32]);
    }

    #[test]
    fn align_corners_keeps_edges() {
        let src = [10f32, 20f32, 40f32];
        let mut dst = [0f32; 5];
        let mut options = options(RowStrategy::Cached(RowReuse::Enabled), 0);
        options.convention = BilinearConvention::AlignCorners;
        resize_bilinear_float(
            &src,
            ImageSize::new(3, 1),
            3,
            &mut dst,
            ImageSize::new(5, 1),
            5,
            1,
            options,
        )
        .unwrap();
        assert_eq!(dst, [10f32, 15f32, 20f32, 30f32, 40f32]);
    }

    #[test]
    fn bands_match_single_thread() {
        let mut rng = StdRng::seed_from_u64(7);
        let src_size = ImageSize::new(64, 80);
        let dst_size = ImageSize::new(90, 113);
        let src = (0..64 * 80)
            .map(|_| rng.random::<f32>())
            .collect::<Vec<f32>>();
        let mut single = vec![0f32; 90 * 113];
        let mut banded = vec![0f32; 90 * 113];
        let mut options = options(RowStrategy::Cached(RowReuse::Enabled), 0);
        resize_bilinear_float(&src, src_size, 64, &mut single, dst_size, 90, 1, options).unwrap();
        options.threading_policy = ThreadingPolicy::Fixed(4);
        resize_bilinear_float(&src, src_size, 64, &mut banded, dst_size, 90, 1, options).unwrap();
        assert_eq!(single, banded);
    }
}
