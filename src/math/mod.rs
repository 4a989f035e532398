// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Some helper mathematics.


use crate::constants::VEL_C;

/// A double-precision complex number.
#[allow(non_camel_case_types)]
pub type c64 = num_complex::Complex<f64>;

/// Complex exponential of a purely imaginary argument.
///
/// No complex arithmetic is actually done here; Euler's formula gives the
/// real and imaginary parts directly (e^{ix} = cos{x} + i sin{x}).
#[inline]
pub(crate) fn cexp(x: f64) -> c64 {
    let (im, re) = x.sin_cos();
    c64::new(re, im)
}

/// Free-space wavelength \[metres\] for a frequency in \[MHz\].
#[inline]
pub(crate) fn wavelength(freq_mhz: f64) -> f64 {
    VEL_C / (freq_mhz * 1e6)
}

/// Linear interpolation into a table of (abscissa, ordinate) pairs sorted by
/// abscissa. Values outside the table are clamped to the end points.
pub(crate) fn interp_table(table: &[(f64, f64)], x: f64) -> f64 {
    match table.iter().position(|&(a, _)| a >= x) {
        // Off the low end, or exactly on the first knot.
        Some(0) => table[0].1,
        Some(i) => {
            let (x0, y0) = table[i - 1];
            let (x1, y1) = table[i];
            y0 + (y1 - y0) * (x - x0) / (x1 - x0)
        }
        None => table[table.len() - 1].1,
    }
}
