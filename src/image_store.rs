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
use crate::resize_error::{ResizeBufferMismatch, ResizeError, try_vec};
use std::borrow::Cow;
use std::fmt::Debug;

/// Holds an image
///
/// # Arguments
/// `N` - count of channels, interleaved
///
/// # Examples
/// ImageStore<u8, 3> - represents RGB
/// ImageStore<u8, 1> - represents Gray
#[derive(Debug, Clone)]
pub struct ImageStore<'a, T, const N: usize>
where
    T: Clone + Copy + Debug,
{
    pub buffer: Cow<'a, [T]>,
    /// Channels in the image
    pub channels: usize,
    /// Image width
    pub width: usize,
    /// Image height
    pub height: usize,
    /// Image stride in elements, if stride is `0` then `width * N` is used
    pub stride: usize,
}

/// Holds an image being written
#[derive(Debug)]
pub struct ImageStoreMut<'a, T, const N: usize>
where
    T: Clone + Copy + Debug,
{
    pub buffer: BufferStore<'a, T>,
    /// Channels in the image
    pub channels: usize,
    /// Image width
    pub width: usize,
    /// Image height
    pub height: usize,
    /// Image stride in elements, if stride is `0` then `width * N` is used
    pub stride: usize,
}

#[derive(Debug)]
pub enum BufferStore<'a, T: Copy + Debug> {
    Borrowed(&'a mut [T]),
    Owned(Vec<T>),
}

impl<T: Copy + Debug> BufferStore<'_, T> {
    pub fn borrow(&self) -> &[T] {
        match self {
            Self::Borrowed(p_ref) => p_ref,
            Self::Owned(vec) => vec,
        }
    }

    pub fn borrow_mut(&mut self) -> &mut [T] {
        match self {
            Self::Borrowed(p_ref) => p_ref,
            Self::Owned(vec) => vec,
        }
    }
}

/// Checks that a slice can hold `height` rows of `width * channels` elements
/// placed `stride` elements apart. The last row does not need padding.
pub(crate) fn check_image_layout(
    slice_len: usize,
    width: usize,
    height: usize,
    stride: usize,
    channels: usize,
) -> Result<(), ResizeError> {
    if channels == 0 {
        return Err(ResizeError::ZeroChannels);
    }
    if ImageSize::new(width, height).is_empty() {
        return Err(ResizeError::ZeroImageDimensions);
    }
    let row_len = width
        .checked_mul(channels)
        .ok_or(ResizeError::OutOfMemory(usize::MAX))?;
    if stride < row_len {
        return Err(ResizeError::InvalidStride(row_len, stride));
    }
    let expected = stride
        .checked_mul(height - 1)
        .and_then(|x| x.checked_add(row_len))
        .ok_or(ResizeError::OutOfMemory(usize::MAX))?;
    if slice_len < expected {
        return Err(ResizeError::BufferMismatch(ResizeBufferMismatch {
            expected,
            width,
            height,
            channels,
            slice_len,
        }));
    }
    Ok(())
}

impl<'a, T, const N: usize> ImageStore<'a, T, N>
where
    T: Clone + Copy + Debug + Default,
{
    pub fn new(
        slice_ref: Vec<T>,
        width: usize,
        height: usize,
    ) -> Result<ImageStore<'a, T, N>, ResizeError> {
        check_image_layout(slice_ref.len(), width, height, width * N, N)?;
        Ok(ImageStore::<T, N> {
            buffer: Cow::Owned(slice_ref),
            channels: N,
            width,
            height,
            stride: width * N,
        })
    }

    pub fn borrow(
        slice_ref: &'a [T],
        width: usize,
        height: usize,
    ) -> Result<ImageStore<'a, T, N>, ResizeError> {
        ImageStore::borrow_with_stride(slice_ref, width, height, width * N)
    }

    pub fn borrow_with_stride(
        slice_ref: &'a [T],
        width: usize,
        height: usize,
        stride: usize,
    ) -> Result<ImageStore<'a, T, N>, ResizeError> {
        check_image_layout(slice_ref.len(), width, height, stride, N)?;
        Ok(ImageStore::<T, N> {
            buffer: Cow::Borrowed(slice_ref),
            channels: N,
            width,
            height,
            stride,
        })
    }

    #[inline]
    pub fn stride(&self) -> usize {
        if self.stride == 0 {
            return self.width * N;
        }
        self.stride
    }

    #[inline]
    pub fn size(&self) -> ImageSize {
        ImageSize::new(self.width, self.height)
    }

    pub fn as_bytes(&self) -> &[T] {
        self.buffer.as_ref()
    }

    pub(crate) fn validate(&self) -> Result<(), ResizeError> {
        check_image_layout(
            self.buffer.len(),
            self.width,
            self.height,
            self.stride(),
            N,
        )
    }
}

impl<'a, T, const N: usize> ImageStoreMut<'a, T, N>
where
    T: Clone + Copy + Debug + Default,
{
    /// Allocates a zeroed tightly packed image
    pub fn alloc(width: usize, height: usize) -> Result<ImageStoreMut<'a, T, N>, ResizeError> {
        if ImageSize::new(width, height).is_empty() {
            return Err(ResizeError::ZeroImageDimensions);
        }
        let len = width
            .checked_mul(height)
            .and_then(|x| x.checked_mul(N))
            .ok_or(ResizeError::OutOfMemory(usize::MAX))?;
        let vc = try_vec![T::default(); len];
        Ok(ImageStoreMut::<T, N> {
            buffer: BufferStore::Owned(vc),
            channels: N,
            width,
            height,
            stride: width * N,
        })
    }

    pub fn borrow(
        slice_ref: &'a mut [T],
        width: usize,
        height: usize,
    ) -> Result<ImageStoreMut<'a, T, N>, ResizeError> {
        ImageStoreMut::borrow_with_stride(slice_ref, width, height, width * N)
    }

    pub fn borrow_with_stride(
        slice_ref: &'a mut [T],
        width: usize,
        height: usize,
        stride: usize,
    ) -> Result<ImageStoreMut<'a, T, N>, ResizeError> {
        check_image_layout(slice_ref.len(), width, height, stride, N)?;
        Ok(ImageStoreMut::<T, N> {
            buffer: BufferStore::Borrowed(slice_ref),
            channels: N,
            width,
            height,
            stride,
        })
    }

    #[inline]
    pub fn stride(&self) -> usize {
        if self.stride == 0 {
            return self.width * N;
        }
        self.stride
    }

    #[inline]
    pub fn size(&self) -> ImageSize {
        ImageSize::new(self.width, self.height)
    }

    pub fn as_bytes(&self) -> &[T] {
        self.buffer.borrow()
    }

    pub(crate) fn validate(&self) -> Result<(), ResizeError> {
        check_image_layout(
            self.buffer.borrow().len(),
            self.width,
            self.height,
            self.stride(),
            N,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_row_needs_no_padding() {
        let data = vec![0u8; 10 * 2 + 3 * 3];
        let store = ImageStore::<u8, 3>::borrow_with_stride(&data, 3, 3, 10);
        assert!(store.is_ok());
    }

    #[test]
    fn short_buffer_is_rejected() {
        let data = vec![0u8; 11];
        let store = ImageStore::<u8, 4>::borrow(&data, 3, 1);
        assert_eq!(
            store.err(),
            Some(ResizeError::BufferMismatch(ResizeBufferMismatch {
                expected: 12,
                width: 3,
                height: 1,
                channels: 4,
                slice_len: 11,
            }))
        );
    }

    #[test]
    fn narrow_stride_is_rejected() {
        let mut data = vec![0u8; 64];
        let store = ImageStoreMut::<u8, 2>::borrow_with_stride(&mut data, 4, 4, 7);
        assert_eq!(store.err(), Some(ResizeError::InvalidStride(8, 7)));
    }

    #[test]
    fn alloc_is_tightly_packed() {
        let store = ImageStoreMut::<u16, 3>::alloc(5, 2).unwrap();
        assert_eq!(store.stride(), 15);
        assert_eq!(store.as_bytes().len(), 30);
        assert_eq!(
            ImageStoreMut::<u8, 1>::alloc(0, 2).err(),
            Some(ResizeError::ZeroImageDimensions)
        );
    }
}
