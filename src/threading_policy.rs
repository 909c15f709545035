/*
 * // Copyright (c) the Radzivon Bartoshyk. All rights reserved.
 * //
 * // Use of this source code is governed by a BSD-style
 * // license that can be found in the LICENSE file.
 */

use crate::ImageSize;
use rayon::ThreadPool;

/// How many threads a resize may spread its destination rows over.
#[derive(Debug, Copy, Clone, Default, Ord, PartialOrd, Eq, PartialEq)]
pub enum ThreadingPolicy {
    /// Run on the calling thread only.
    #[default]
    Single,
    Fixed(usize),
    /// One thread per 256x256 destination pixels, at most 16.
    Adaptive,
}

impl ThreadingPolicy {
    pub fn thread_count(&self, for_size: ImageSize) -> usize {
        let threads = match self {
            ThreadingPolicy::Single => 1,
            ThreadingPolicy::Fixed(thread_count) => (*thread_count).max(1),
            ThreadingPolicy::Adaptive => {
                let box_size = 256 * 256;
                let new_box_size = for_size.height * for_size.width;
                (new_box_size / box_size).clamp(1, 16)
            }
        };
        // every band needs at least one row
        threads.min(for_size.height.max(1))
    }

    pub(crate) fn get_pool(&self, for_size: ImageSize) -> Option<ThreadPool> {
        let threads_count = self.thread_count(for_size);
        if threads_count <= 1 {
            return None;
        }
        match rayon::ThreadPoolBuilder::new()
            .num_threads(threads_count)
            .use_current_thread()
            .build()
        {
            Ok(pool) => Some(pool),
            Err(err) => {
                log::warn!("No pool of {threads_count} threads, running single threaded: {err}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_has_no_pool() {
        let size = ImageSize::new(4096, 4096);
        assert_eq!(ThreadingPolicy::Single.thread_count(size), 1);
        assert!(ThreadingPolicy::Single.get_pool(size).is_none());
    }

    #[test]
    fn adaptive_scales_with_area() {
        let adaptive = |side| ThreadingPolicy::Adaptive.thread_count(ImageSize::new(side, side));
        assert_eq!(adaptive(64), 1);
        assert_eq!(adaptive(512), 4);
        assert_eq!(adaptive(8192), 16);
    }

    #[test]
    fn threads_never_exceed_rows() {
        let size = ImageSize::new(100, 3);
        assert_eq!(ThreadingPolicy::Fixed(8).thread_count(size), 3);
        assert_eq!(ThreadingPolicy::Fixed(0).thread_count(size), 1);
    }
}
