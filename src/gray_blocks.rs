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
use crate::axis_table::AxisTable;
use crate::resize_error::ResizeError;

/// Widest window any backend gathers in one shuffle.
pub(crate) const MAX_GATHER_LANES: usize = 64;

/// One shuffle of the single channel gather.
///
/// `lanes` source bytes starting at `src` are shuffled by `shuffle` and stored
/// as `lanes` packed pair bytes starting at `dst`.
#[derive(Debug, Copy, Clone)]
pub(crate) struct GrayBlock {
    pub(crate) src: usize,
    pub(crate) dst: usize,
    pub(crate) shuffle: [u8; MAX_GATHER_LANES],
}

impl GrayBlock {
    fn new(src: usize, dst: usize) -> GrayBlock {
        GrayBlock {
            src,
            dst,
            shuffle: [0u8; MAX_GATHER_LANES],
        }
    }
}

/// Splits a single channel row into windows of `lanes` source bytes.
///
/// A block is closed once its output is full or the next pair would leave its
/// source window. Blocks are written in order and every block starts where the
/// previous one stopped producing pairs, so bytes past a block's last pair are
/// overwritten by its successor or land in the row padding.
pub(crate) fn estimate_gray_blocks(
    table: &AxisTable,
    src_size: usize,
    lanes: usize,
) -> Result<Vec<GrayBlock>, ResizeError> {
    debug_assert!(lanes >= 4 && lanes <= MAX_GATHER_LANES);
    debug_assert!(src_size >= lanes);

    let dst_size = table.indices.len();
    let by_src = src_size.div_ceil(lanes - 1);
    let by_dst = (dst_size * 2).div_ceil(lanes);
    let estimate = by_src.max(by_dst) + 1;
    let mut blocks: Vec<GrayBlock> = Vec::new();
    blocks
        .try_reserve(estimate)
        .map_err(|_| ResizeError::OutOfMemory(estimate * size_of::<GrayBlock>()))?;
    blocks.push(GrayBlock::new(0, 0));

    for (dst_index, &src_index) in table.indices.iter().enumerate() {
        let mut current = blocks[blocks.len() - 1];
        let mut dst = dst_index * 2 - current.dst;
        let mut src = src_index - current.src;
        if src >= lanes - 1 || dst >= lanes {
            current = GrayBlock::new(src_index.min(src_size - lanes), dst_index * 2);
            blocks.push(current);
            dst = 0;
            src = src_index - current.src;
        }
        let last = blocks.len() - 1;
        blocks[last].shuffle[dst] = src as u8;
        blocks[last].shuffle[dst + 1] = src as u8 + 1;
    }

    Ok(blocks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::axis_table::BilinearConvention;

    fn gather_with_blocks(row: &[u8], blocks: &[GrayBlock], lanes: usize, len: usize) -> Vec<u8> {
        let mut pairs = vec![0u8; len + lanes];
        for block in blocks {
            let window = &row[block.src..block.src + lanes];
            for (dst, &s) in pairs[block.dst..block.dst + lanes]
                .iter_mut()
                .zip(block.shuffle[..lanes].iter())
            {
                *dst = window[s as usize];
            }
        }
        pairs.truncate(len);
        pairs
    }

    #[test]
    fn blocks_reproduce_direct_pairs() {
        let convention = BilinearConvention::PixelCenter;
        for lanes in [4usize, 8, 16, 32, 64] {
            for src_size in lanes..lanes * 3 {
                let row = (0..src_size).map(|x| (x * 7 + 3) as u8).collect::<Vec<_>>();
                for dst_size in [src_size / 4 + 1, src_size / 2 + 1, src_size, src_size * 2] {
                    if src_size >= 4 * dst_size {
                        continue;
                    }
                    let table = AxisTable::estimate(src_size, dst_size, convention).unwrap();
                    let blocks = estimate_gray_blocks(&table, src_size, lanes).unwrap();
                    let pairs = gather_with_blocks(&row, &blocks, lanes, dst_size * 2);
                    let expected = table
                        .indices
                        .iter()
                        .flat_map(|&i| [row[i], row[i + 1]])
                        .collect::<Vec<u8>>();
                    assert_eq!(pairs, expected, "lanes {lanes}, {src_size} -> {dst_size}");
                }
            }
        }
    }

    #[test]
    fn shuffle_stays_inside_window() {
        let table = AxisTable::estimate(100, 77, BilinearConvention::PixelCenter).unwrap();
        let blocks = estimate_gray_blocks(&table, 100, 16).unwrap();
        for block in blocks.iter() {
            assert!(block.src + 16 <= 100);
            assert!(block.shuffle[..16].iter().all(|&x| x < 16));
        }
    }
}
