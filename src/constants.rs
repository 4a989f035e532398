// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Useful constants.

All constants *must* be double precision; beam powers are sensitive to
phase, so every calculation stays in double precision throughout.
 */

pub use std::f64::consts::{FRAC_PI_2, PI, TAU};

/// Speed of light \[metres/second\].
pub const VEL_C: f64 = 299_792_458.0;

/// Number of antennas in one mini-array.
pub const ANTS_PER_MINI_ARRAY: usize = 19;

/// Spacing between neighbouring antennas within a mini-array \[metres\].
pub const ANT_SPACING: f64 = 5.5;

/// Spacing between neighbouring mini-array phase centres \[metres\].
pub const MINI_ARRAY_SPACING: f64 = 25.0;

/// Number of mini-arrays in the full array.
pub const NUM_MINI_ARRAYS: usize = 96;

/// Mini-array orientations repeat every 60 degrees; two mini-arrays whose
/// rotations agree modulo this value have the same analog beam shape.
pub const ROTATION_PERIOD_DEG: u32 = 60;

/// The resolution of the grid that single mini-array responses are computed
/// on before being regridded into a composite beam \[degrees\].
pub const ANALOG_GRID_RES_DEG: f64 = 0.5;

/// Analog pointings below this elevation are clamped \[degrees\]; the
/// beamformer cannot steer lower.
pub const MIN_POINTING_EL_DEG: f64 = 20.0;
