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
use crate::resize_error::{ResizeError, try_vec};
use crate::support::FRACTION_RANGE;

/// Maps a destination coordinate onto the source axis.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum BilinearConvention {
    /// `(i + 0.5) * src / dst - 0.5`, pixel centers are matched.
    #[default]
    PixelCenter,
    /// `i * (src - 1) / (dst - 1)`, first and last pixels are matched.
    AlignCorners,
    /// `i * src / dst`, top left corners are matched.
    Asymmetric,
}

impl BilinearConvention {
    #[inline]
    fn source_coordinate(self, i: usize, src_size: usize, dst_size: usize) -> f32 {
        match self {
            BilinearConvention::PixelCenter => {
                let scale = src_size as f32 / dst_size as f32;
                ((i as f64 + 0.5) * scale as f64 - 0.5) as f32
            }
            BilinearConvention::AlignCorners => {
                let scale = if dst_size > 1 {
                    (src_size - 1) as f32 / (dst_size - 1) as f32
                } else {
                    0f32
                };
                i as f32 * scale
            }
            BilinearConvention::Asymmetric => {
                let scale = src_size as f32 / dst_size as f32;
                i as f32 * scale
            }
        }
    }
}

/// Left sample index and the fraction towards the right one.
///
/// Indices never leave `[0, src_size - 2]`: before the first sample the left one
/// is used alone, past the last pair the right one is.
#[inline]
fn clamp_alpha(alpha: f32, src_size: usize) -> (usize, f32) {
    if src_size < 2 {
        return (0, 0f32);
    }
    let mut index = alpha.floor() as isize;
    let mut fraction = alpha - index as f32;
    if index < 0 {
        index = 0;
        fraction = 0f32;
    }
    let last = src_size as isize - 2;
    if index > last {
        index = last;
        fraction = 1f32;
    }
    (index as usize, fraction)
}

/// Per destination coordinate source index and fixed point weight of one axis.
#[derive(Debug, Clone)]
pub(crate) struct AxisTable {
    pub(crate) indices: Vec<usize>,
    /// Weight of the right (or lower) sample in `0..=FRACTION_RANGE`.
    pub(crate) weights: Vec<u8>,
    /// Distance between the two samples of a pair, `0` for a single sample axis.
    pub(crate) neighbour: usize,
}

impl AxisTable {
    pub(crate) fn estimate(
        src_size: usize,
        dst_size: usize,
        convention: BilinearConvention,
    ) -> Result<AxisTable, ResizeError> {
        let mut indices = try_vec![0usize; dst_size];
        let mut weights = try_vec![0u8; dst_size];
        for (i, (index, weight)) in indices.iter_mut().zip(weights.iter_mut()).enumerate() {
            let alpha = convention.source_coordinate(i, src_size, dst_size);
            let (src_index, fraction) = clamp_alpha(alpha, src_size);
            *index = src_index;
            *weight = (fraction * FRACTION_RANGE as f32 + 0.5f32) as u8;
        }
        Ok(AxisTable {
            indices,
            weights,
            neighbour: if src_size > 1 { 1 } else { 0 },
        })
    }

    /// Horizontal weights as `[RANGE - a, a]` byte pairs, repeated for every channel.
    pub(crate) fn interleaved_weights(&self, channels: usize) -> Result<Vec<u8>, ResizeError> {
        let mut ax = try_vec![0u8; self.weights.len() * channels * 2];
        for (dst, &weight) in ax.chunks_exact_mut(channels * 2).zip(self.weights.iter()) {
            for pair in dst.chunks_exact_mut(2) {
                pair[0] = FRACTION_RANGE - weight;
                pair[1] = weight;
            }
        }
        Ok(ax)
    }
}

/// Same mapping as [AxisTable] with unquantized weights in `[0, 1]`.
#[derive(Debug, Clone)]
pub(crate) struct FloatAxisTable {
    pub(crate) indices: Vec<usize>,
    pub(crate) alphas: Vec<f32>,
    pub(crate) neighbour: usize,
}

impl FloatAxisTable {
    pub(crate) fn estimate(
        src_size: usize,
        dst_size: usize,
        convention: BilinearConvention,
    ) -> Result<FloatAxisTable, ResizeError> {
        let mut indices = try_vec![0usize; dst_size];
        let mut alphas = try_vec![0f32; dst_size];
        for (i, (index, alpha)) in indices.iter_mut().zip(alphas.iter_mut()).enumerate() {
            let coordinate = convention.source_coordinate(i, src_size, dst_size);
            (*index, *alpha) = clamp_alpha(coordinate, src_size);
        }
        Ok(FloatAxisTable {
            indices,
            alphas,
            neighbour: if src_size > 1 { 1 } else { 0 },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upscale_twice() {
        let table = AxisTable::estimate(4, 8, BilinearConvention::PixelCenter).unwrap();
        assert_eq!(table.indices, vec![0, 0, 0, 1, 1, 2, 2, 2]);
        assert_eq!(table.weights, vec![0, 4, 12, 4, 12, 4, 12, 16]);
        assert_eq!(table.neighbour, 1);
    }

    #[test]
    fn downscale_twice() {
        let table = AxisTable::estimate(8, 4, BilinearConvention::PixelCenter).unwrap();
        assert_eq!(table.indices, vec![0, 2, 4, 6]);
        assert_eq!(table.weights, vec![8, 8, 8, 8]);
    }

    #[test]
    fn identity_picks_exact_samples() {
        let table = AxisTable::estimate(5, 5, BilinearConvention::PixelCenter).unwrap();
        assert_eq!(table.indices, vec![0, 1, 2, 3, 3]);
        assert_eq!(table.weights, vec![0, 0, 0, 0, FRACTION_RANGE]);
    }

    #[test]
    fn single_sample_axis_never_reads_past_it() {
        for dst_size in [1usize, 2, 7, 33] {
            let table = AxisTable::estimate(1, dst_size, BilinearConvention::PixelCenter).unwrap();
            assert!(table.indices.iter().all(|&x| x == 0));
            assert!(table.weights.iter().all(|&x| x == 0));
            assert_eq!(table.neighbour, 0);
        }
    }

    #[test]
    fn single_destination_takes_the_center() {
        let table = AxisTable::estimate(5, 1, BilinearConvention::PixelCenter).unwrap();
        assert_eq!(table.indices, vec![2]);
        assert_eq!(table.weights, vec![0]);
    }

    #[test]
    fn indices_stay_in_range() {
        for src_size in 2..40usize {
            for dst_size in 1..40usize {
                let table =
                    AxisTable::estimate(src_size, dst_size, BilinearConvention::PixelCenter)
                        .unwrap();
                for (&index, &weight) in table.indices.iter().zip(table.weights.iter()) {
                    assert!(index <= src_size - 2);
                    assert!(weight <= FRACTION_RANGE);
                }
            }
        }
    }

    #[test]
    fn align_corners_matches_edges() {
        let table = AxisTable::estimate(3, 5, BilinearConvention::AlignCorners).unwrap();
        assert_eq!(table.indices, vec![0, 0, 1, 1, 1]);
        assert_eq!(table.weights, vec![0, 8, 0, 8, 16]);
    }

    #[test]
    fn asymmetric_starts_at_zero() {
        let table = AxisTable::estimate(4, 2, BilinearConvention::Asymmetric).unwrap();
        assert_eq!(table.indices, vec![0, 2]);
        assert_eq!(table.weights, vec![0, 0]);
    }

    #[test]
    fn weights_are_replicated_per_channel() {
        let table = AxisTable::estimate(4, 8, BilinearConvention::PixelCenter).unwrap();
        let ax = table.interleaved_weights(3).unwrap();
        assert_eq!(ax.len(), 8 * 3 * 2);
        assert_eq!(&ax[6..12], &[12, 4, 12, 4, 12, 4]);
        assert!(ax.chunks_exact(2).all(|w| w[0] + w[1] == FRACTION_RANGE));
    }

    #[test]
    fn float_table_follows_fixed_point_one() {
        let fixed = AxisTable::estimate(13, 7, BilinearConvention::PixelCenter).unwrap();
        let float = FloatAxisTable::estimate(13, 7, BilinearConvention::PixelCenter).unwrap();
        assert_eq!(fixed.indices, float.indices);
        for (&w, &a) in fixed.weights.iter().zip(float.alphas.iter()) {
            assert_eq!(w, (a * FRACTION_RANGE as f32 + 0.5) as u8);
        }
    }
}
