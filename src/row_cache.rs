/*
 * // Copyright (c) the Radzivon Bartoshyk. All rights reserved.
 * //
 * // Use of this source code is governed by a BSD-style
 * // license that can be found in the LICENSE file.
 */
use crate::resize_error::{ResizeError, try_vec};

/// Whether consecutive destination rows may share horizontally interpolated source rows.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub(crate) enum RowReuse {
    #[default]
    Enabled,
    /// Every destination row interpolates both source rows again.
    Disabled,
}

/// Work a destination row needs before the vertical blend.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) enum RowFetch {
    /// Both rows already hold the right source rows.
    Reuse,
    /// Rows were swapped, only the second one must be produced.
    Advance,
    /// Both rows must be produced.
    Reload,
}

/// Two horizontally interpolated source rows, `rows[0]` above `rows[1]`.
pub(crate) struct RowCache<T> {
    rows: [Vec<T>; 2],
    previous: Option<usize>,
    reuse: RowReuse,
}

impl<T: Copy + Default> RowCache<T> {
    pub(crate) fn new(row_length: usize, reuse: RowReuse) -> Result<RowCache<T>, ResizeError> {
        Ok(RowCache {
            rows: [
                try_vec![T::default(); row_length],
                try_vec![T::default(); row_length],
            ],
            previous: None,
            reuse,
        })
    }

    /// Decides what has to be loaded for source row `sy` and remembers it.
    pub(crate) fn fetch(&mut self, sy: usize) -> RowFetch {
        let previous = self.previous.replace(sy);
        if self.reuse == RowReuse::Disabled {
            return RowFetch::Reload;
        }
        match previous {
            Some(previous) if previous == sy => RowFetch::Reuse,
            Some(previous) if previous + 1 == sy => {
                self.rows.swap(0, 1);
                RowFetch::Advance
            }
            _ => RowFetch::Reload,
        }
    }

    /// Forgets the cached rows, the next fetch reloads.
    pub(crate) fn invalidate(&mut self) {
        self.previous = None;
    }

    #[inline]
    pub(crate) fn rows(&self) -> (&[T], &[T]) {
        let [row0, row1] = &self.rows;
        (row0.as_slice(), row1.as_slice())
    }

    #[inline]
    pub(crate) fn rows_mut(&mut self) -> (&mut [T], &mut [T]) {
        let [row0, row1] = &mut self.rows;
        (row0.as_mut_slice(), row1.as_mut_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upscale_sequence_reuses_and_advances() {
        let mut cache = RowCache::<u16>::new(4, RowReuse::Enabled).unwrap();
        let plan = [0usize, 0, 1, 1, 2, 2, 2]
            .iter()
            .map(|&sy| cache.fetch(sy))
            .collect::<Vec<_>>();
        assert_eq!(
            plan,
            vec![
                RowFetch::Reload,
                RowFetch::Reuse,
                RowFetch::Advance,
                RowFetch::Reuse,
                RowFetch::Advance,
                RowFetch::Reuse,
                RowFetch::Reuse,
            ]
        );
    }

    #[test]
    fn skipped_rows_reload() {
        let mut cache = RowCache::<u16>::new(4, RowReuse::Enabled).unwrap();
        assert_eq!(cache.fetch(0), RowFetch::Reload);
        assert_eq!(cache.fetch(2), RowFetch::Reload);
        assert_eq!(cache.fetch(4), RowFetch::Reload);
        cache.invalidate();
        assert_eq!(cache.fetch(4), RowFetch::Reload);
    }

    #[test]
    fn advance_moves_second_row_up() {
        let mut cache = RowCache::<u16>::new(2, RowReuse::Enabled).unwrap();
        cache.fetch(3);
        {
            let (row0, row1) = cache.rows_mut();
            row0.fill(3);
            row1.fill(4);
        }
        assert_eq!(cache.fetch(4), RowFetch::Advance);
        let (row0, _) = cache.rows();
        assert_eq!(row0, &[4, 4]);
    }

    #[test]
    fn disabled_reuse_always_reloads() {
        let mut cache = RowCache::<u16>::new(4, RowReuse::Disabled).unwrap();
        for sy in [0usize, 0, 1, 1] {
            assert_eq!(cache.fetch(sy), RowFetch::Reload);
        }
    }
}
