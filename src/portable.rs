/*
 * // Copyright (c) the Radzivon Bartoshyk. All rights reserved.
 * //
 * // Use of this source code is governed by a BSD-style
 * // license that can be found in the LICENSE file.
 */
use crate::alignment::Alignment;
use crate::axis_table::AxisTable;
use crate::bilinear_handler::BilinearRowHandler;
use crate::bilinear_native::gather_pairs_generic;
use crate::support::{blend_horizontal, blend_vertical};

/// Fixed size array kernels stepping `N` elements at a time.
///
/// Works on every target and follows the same main loop and overlapping tail as
/// the intrinsic backends, which makes it the reference for their stepping.
pub(crate) struct PortableRowHandler<const N: usize>;

#[inline(always)]
fn interpolate_x_lanes<const N: usize>(pairs: &[u8], ax: &[u8], row: &mut [u16]) {
    let mut store = [0u16; N];
    for ((dst, src), weights) in store
        .iter_mut()
        .zip(pairs[..N * 2].chunks_exact(2))
        .zip(ax[..N * 2].chunks_exact(2))
    {
        *dst = blend_horizontal(src[0], src[1], weights[0], weights[1]);
    }
    row[..N].copy_from_slice(&store);
}

#[inline(always)]
fn interpolate_y_lanes<const N: usize>(row0: &[u16], row1: &[u16], fy: u8, dst: &mut [u8]) {
    let mut store = [0u8; N];
    for ((dst, &r0), &r1) in store.iter_mut().zip(&row0[..N]).zip(&row1[..N]) {
        *dst = blend_vertical(r0, r1, fy);
    }
    dst[..N].copy_from_slice(&store);
}

impl<const N: usize> BilinearRowHandler for PortableRowHandler<N> {
    const LANES: usize = N;
    const GATHER_LANES: usize = N;

    fn gather_pairs<const CN: usize>(src_row: &[u8], table: &AxisTable, pairs: &mut [u8]) {
        gather_pairs_generic(src_row, CN, &table.indices, table.neighbour, pairs);
    }

    fn interpolate_x(pairs: &[u8], ax: &[u8], row: &mut [u16]) {
        let length = row.len();
        debug_assert!(length >= N);
        let mut x = 0usize;
        while x + N <= length {
            interpolate_x_lanes::<N>(&pairs[x * 2..], &ax[x * 2..], &mut row[x..]);
            x += N;
        }
        if x < length {
            let x = length - N;
            interpolate_x_lanes::<N>(&pairs[x * 2..], &ax[x * 2..], &mut row[x..]);
        }
    }

    fn interpolate_y(row0: &[u16], row1: &[u16], fy: u8, dst: &mut [u8], _: Alignment) {
        let length = dst.len();
        debug_assert!(length >= N);
        let mut x = 0usize;
        while x + N <= length {
            interpolate_y_lanes::<N>(&row0[x..], &row1[x..], fy, &mut dst[x..]);
            x += N;
        }
        if x < length {
            let x = length - N;
            interpolate_y_lanes::<N>(&row0[x..], &row1[x..], fy, &mut dst[x..]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bilinear_native::ScalarRowHandler;

    #[test]
    fn overlapping_tail_matches_scalar() {
        let pairs = (0..58u32).map(|x| (x * 37 % 251) as u8).collect::<Vec<_>>();
        let ax = (0..29u8)
            .flat_map(|x| [16 - x % 17, x % 17])
            .collect::<Vec<u8>>();
        let mut expected = vec![0u16; 29];
        ScalarRowHandler::interpolate_x(&pairs, &ax, &mut expected);
        let mut row = vec![0u16; 29];
        PortableRowHandler::<8>::interpolate_x(&pairs, &ax, &mut row);
        assert_eq!(row, expected);

        let lower = expected.iter().rev().copied().collect::<Vec<u16>>();
        let mut expected_dst = vec![0u8; 29];
        ScalarRowHandler::interpolate_y(
            &expected,
            &lower,
            5,
            &mut expected_dst,
            Alignment::Unaligned,
        );
        let mut dst = vec![0u8; 29];
        PortableRowHandler::<16>::interpolate_y(
            &expected,
            &lower,
            5,
            &mut dst,
            Alignment::Unaligned,
        );
        assert_eq!(dst, expected_dst);
    }
}
