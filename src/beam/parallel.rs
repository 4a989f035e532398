// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Parallel evaluation of the phasor matrix.
//!
//! The pixel axis is split into contiguous, near-equal blocks and one scoped
//! worker thread per block fills its disjoint column range of the real and
//! imaginary output buffers. The write sets never overlap, so no
//! synchronisation is needed; the threads live only for the duration of one
//! call.

use std::ops::Range;

use crossbeam_utils::thread;
use ndarray::prelude::*;
use ndarray::Zip;

use super::error::BeamError;
use crate::math::{c64, cexp};

/// Split `num_pixels` column indices into `num_blocks` contiguous,
/// order-preserving blocks whose sizes differ by at most one.
pub(crate) fn split_pixels(num_pixels: usize, num_blocks: usize) -> Vec<Range<usize>> {
    debug_assert!(num_blocks > 0);
    let num_blocks = num_blocks.min(num_pixels).max(1);
    let base = num_pixels / num_blocks;
    let remainder = num_pixels % num_blocks;

    let mut blocks = Vec::with_capacity(num_blocks);
    let mut start = 0;
    for i_block in 0..num_blocks {
        let len = base + usize::from(i_block < remainder);
        blocks.push(start..start + len);
        start += len;
    }
    debug_assert_eq!(start, num_pixels);
    blocks
}

/// Evaluate exp(i · wavenumber · delay) element-wise into the given real and
/// imaginary views. The kernel shared by the serial and parallel paths.
pub(crate) fn fill_phasors(
    wavenumber: f64,
    delay: ArrayView2<f64>,
    mut re: ArrayViewMut2<f64>,
    mut im: ArrayViewMut2<f64>,
) {
    Zip::from(delay)
        .and(&mut re)
        .and(&mut im)
        .for_each(|&d, r, i| {
            let z = cexp(wavenumber * d);
            *r = z.re;
            *i = z.im;
        });
}

/// Evaluate the full (num_antennas × num_pixels) phasor matrix
/// exp(i · wavenumber · delay) across `workers` threads.
///
/// Any worker panic aborts the whole evaluation; no partial result is ever
/// returned.
pub(crate) fn phasor_matrix(
    wavenumber: f64,
    delay: ArrayView2<f64>,
    workers: usize,
) -> Result<Array2<c64>, BeamError> {
    if workers == 0 {
        return Err(BeamError::NoWorkers);
    }
    let blocks = split_pixels(delay.ncols(), workers);

    let mut re = Array2::zeros(delay.raw_dim());
    let mut im = Array2::zeros(delay.raw_dim());

    thread::scope(|scope| {
        let mut handles = Vec::with_capacity(blocks.len());
        let mut re_rest = re.view_mut();
        let mut im_rest = im.view_mut();
        for block in &blocks {
            let (re_block, re_tail) = re_rest.split_at(Axis(1), block.len());
            let (im_block, im_tail) = im_rest.split_at(Axis(1), block.len());
            re_rest = re_tail;
            im_rest = im_tail;
            let delay_block = delay.slice(s![.., block.start..block.end]);
            handles.push(
                scope.spawn(move |_| fill_phasors(wavenumber, delay_block, re_block, im_block)),
            );
        }
        handles
            .into_iter()
            .try_for_each(|handle| handle.join().map_err(|_| BeamError::WorkerPanicked))
    })
    .map_err(|_| BeamError::WorkerPanicked)??;

    Ok(Zip::from(&re)
        .and(&im)
        .map_collect(|&r, &i| c64::new(r, i)))
}
