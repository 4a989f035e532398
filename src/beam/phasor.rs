// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The delay/phasor engine: coherent summation of per-antenna phasors.

use log::trace;
use ndarray::prelude::*;
use num_traits::Zero;

use super::{error::BeamError, parallel};
use crate::constants::TAU;
use crate::math::{c64, cexp, wavelength};

/// Sum phase-delayed unit phasors over antennas for every sky pixel and
/// convert the result to power.
///
/// `delay` has shape (num_antennas, num_pixels) \[metres\]; the result has
/// one non-negative power value per pixel. With one worker the summation is
/// done in place; more workers delegate the phasor-matrix evaluation to the
/// parallel executor. Both paths use the same complex-exponential kernel,
/// so they agree to floating-point tolerance.
pub(crate) fn power_pattern(
    delay: ArrayView2<f64>,
    freq_mhz: f64,
    workers: usize,
) -> Result<Array1<f64>, BeamError> {
    if !freq_mhz.is_finite() || freq_mhz <= 0.0 {
        return Err(BeamError::InvalidFrequency(freq_mhz));
    }
    if workers == 0 {
        return Err(BeamError::NoWorkers);
    }
    let wavenumber = TAU / wavelength(freq_mhz);
    trace!(
        "phasor sum: {} antennas x {} pixels, {} worker(s)",
        delay.nrows(),
        delay.ncols(),
        workers
    );

    let array_factor: Array1<c64> = if workers == 1 {
        delay
            .columns()
            .into_iter()
            .map(|col| {
                col.iter()
                    .fold(c64::zero(), |acc, &d| acc + cexp(wavenumber * d))
            })
            .collect()
    } else {
        // The cross-antenna reduction stays in the calling thread; the
        // workers only fill the phasor matrix.
        parallel::phasor_matrix(wavenumber, delay, workers)?.sum_axis(Axis(0))
    };

    Ok(array_factor.mapv(|af| af.norm_sqr()))
}
