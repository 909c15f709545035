/*
 * // Copyright (c) the Radzivon Bartoshyk. All rights reserved.
 * //
 * // Use of this source code is governed by a BSD-style
 * // license that can be found in the LICENSE file.
 */

use crate::resize_error::ResizeError;

/// Vector width of the portable kernels, in bytes of output per step.
#[derive(Debug, Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash)]
pub enum LaneWidth {
    W4,
    W8,
    W16,
    W32,
    W64,
}

impl LaneWidth {
    pub const ALL: [LaneWidth; 5] = [
        LaneWidth::W4,
        LaneWidth::W8,
        LaneWidth::W16,
        LaneWidth::W32,
        LaneWidth::W64,
    ];

    #[inline]
    pub const fn lanes(self) -> usize {
        match self {
            LaneWidth::W4 => 4,
            LaneWidth::W8 => 8,
            LaneWidth::W16 => 16,
            LaneWidth::W32 => 32,
            LaneWidth::W64 => 64,
        }
    }
}

/// Kernel family used to run a resize.
///
/// Every backend produces exactly the same bytes as [Backend::Scalar]; they differ
/// only in how many destination elements one vertical step writes.
#[derive(Debug, Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash)]
pub enum Backend {
    /// Reference implementation, one element at a time.
    Scalar,
    /// Fixed-size array kernels, available on every target.
    Portable(LaneWidth),
    /// x86 SSE4.1, 16 lanes.
    Sse41,
    /// x86 AVX2, 32 lanes.
    Avx2,
    /// x86 AVX-512BW, 64 lanes.
    Avx512Bw,
    /// AArch64 NEON, 16 lanes.
    Neon,
    /// WebAssembly SIMD128, 16 lanes.
    Simd128,
}

impl Backend {
    /// Number of u8 destination elements written by one vertical step.
    #[inline]
    pub const fn lanes(self) -> usize {
        match self {
            Backend::Scalar => 1,
            Backend::Portable(width) => width.lanes(),
            Backend::Sse41 => 16,
            Backend::Avx2 => 32,
            Backend::Avx512Bw => 64,
            Backend::Neon => 16,
            Backend::Simd128 => 16,
        }
    }

    /// Checks that the backend was compiled in and the running CPU supports it.
    pub fn is_available(self) -> bool {
        match self {
            Backend::Scalar | Backend::Portable(_) => true,
            Backend::Sse41 => {
                #[cfg(all(any(target_arch = "x86_64", target_arch = "x86"), feature = "sse"))]
                {
                    std::arch::is_x86_feature_detected!("sse4.1")
                }
                #[cfg(not(all(
                    any(target_arch = "x86_64", target_arch = "x86"),
                    feature = "sse"
                )))]
                {
                    false
                }
            }
            Backend::Avx2 => {
                #[cfg(all(any(target_arch = "x86_64", target_arch = "x86"), feature = "avx"))]
                {
                    std::arch::is_x86_feature_detected!("avx2")
                }
                #[cfg(not(all(
                    any(target_arch = "x86_64", target_arch = "x86"),
                    feature = "avx"
                )))]
                {
                    false
                }
            }
            Backend::Avx512Bw => {
                #[cfg(all(
                    any(target_arch = "x86_64", target_arch = "x86"),
                    feature = "nightly_avx512"
                ))]
                {
                    std::arch::is_x86_feature_detected!("avx512bw")
                        && std::arch::is_x86_feature_detected!("avx2")
                }
                #[cfg(not(all(
                    any(target_arch = "x86_64", target_arch = "x86"),
                    feature = "nightly_avx512"
                )))]
                {
                    false
                }
            }
            Backend::Neon => cfg!(all(target_arch = "aarch64", target_feature = "neon")),
            Backend::Simd128 => cfg!(all(target_arch = "wasm32", target_feature = "simd128")),
        }
    }

    /// Widest native backend of the running machine, [Backend::Scalar] when none.
    pub fn best_available() -> Backend {
        [
            Backend::Avx512Bw,
            Backend::Avx2,
            Backend::Sse41,
            Backend::Neon,
            Backend::Simd128,
        ]
        .into_iter()
        .find(|backend| backend.is_available())
        .unwrap_or(Backend::Scalar)
    }

    /// All backends usable on this machine, scalar first.
    pub fn available() -> Vec<Backend> {
        let mut backends = vec![Backend::Scalar];
        backends.extend(LaneWidth::ALL.into_iter().map(Backend::Portable));
        backends.extend(
            [
                Backend::Sse41,
                Backend::Avx2,
                Backend::Avx512Bw,
                Backend::Neon,
                Backend::Simd128,
            ]
            .into_iter()
            .filter(|backend| backend.is_available()),
        );
        backends
    }
}

/// How a resizer picks its backend.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum BackendSelection {
    /// Runtime detection, see [Backend::best_available].
    #[default]
    Auto,
    /// Always use this backend, fails when it is not available.
    Exact(Backend),
}

impl BackendSelection {
    pub(crate) fn resolve(self) -> Result<Backend, ResizeError> {
        match self {
            BackendSelection::Auto => Ok(Backend::best_available()),
            BackendSelection::Exact(backend) if backend.is_available() => Ok(backend),
            BackendSelection::Exact(backend) => Err(ResizeError::UnsupportedBackend(backend)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_and_portable_always_available() {
        let available = Backend::available();
        assert_eq!(available[0], Backend::Scalar);
        for width in LaneWidth::ALL {
            assert!(available.contains(&Backend::Portable(width)));
        }
        assert!(available.contains(&Backend::best_available()));
    }

    #[test]
    fn best_available_is_native() {
        let best = Backend::best_available();
        assert!(!matches!(best, Backend::Portable(_)));
        assert!(best.is_available());
    }

    #[test]
    fn exact_selection_rejects_missing_backend() {
        #[cfg(not(target_arch = "aarch64"))]
        assert_eq!(
            BackendSelection::Exact(Backend::Neon).resolve(),
            Err(ResizeError::UnsupportedBackend(Backend::Neon))
        );
        assert_eq!(
            BackendSelection::Exact(Backend::Portable(LaneWidth::W8)).resolve(),
            Ok(Backend::Portable(LaneWidth::W8))
        );
        assert_eq!(
            BackendSelection::Auto.resolve(),
            Ok(Backend::best_available())
        );
    }
}
