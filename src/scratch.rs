/*
 * // Copyright (c) the Radzivon Bartoshyk. All rights reserved.
 * //
 * // Use of this source code is governed by a BSD-style
 * // license that can be found in the LICENSE file.
 */
use crate::gray_blocks::MAX_GATHER_LANES;
use crate::resize_error::{ResizeError, try_vec};
use crate::row_cache::{RowCache, RowReuse};

/// Per worker buffers of a fixed point resize.
///
/// Tables are shared between workers, these are not.
pub(crate) struct ResizeScratch {
    /// Packed `[left, right]` source samples of one row, padded for block gathers.
    pub(crate) pairs: Vec<u8>,
    pub(crate) cache: RowCache<u16>,
    pub(crate) row_length: usize,
}

impl ResizeScratch {
    pub(crate) fn new(row_length: usize, reuse: RowReuse) -> Result<ResizeScratch, ResizeError> {
        Ok(ResizeScratch {
            pairs: try_vec![0u8; row_length * 2 + MAX_GATHER_LANES],
            cache: RowCache::new(row_length, reuse)?,
            row_length,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pairs_are_padded() {
        let scratch = ResizeScratch::new(10, RowReuse::Enabled).unwrap();
        assert_eq!(scratch.pairs.len(), 20 + MAX_GATHER_LANES);
        let (row0, row1) = scratch.cache.rows();
        assert_eq!(row0.len(), 10);
        assert_eq!(row1.len(), 10);
    }
}
