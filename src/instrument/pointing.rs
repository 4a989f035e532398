// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Analog-pointing calibration.
//!
//! The analog beam squints below the commanded elevation, more so at low
//! elevations, and the beamformer can only realise a discrete set of
//! pointings. Both effects are applied to the commanded direction before any
//! geometry is computed.

use crate::constants::MIN_POINTING_EL_DEG;
use crate::math::interp_table;

/// Empirical squint offset \[degrees\] vs commanded elevation \[degrees\].
/// Measured at the optimal analog frequency of 30 MHz.
const SQUINT_TABLE: &[(f64, f64)] = &[
    (0.0, 5.4),
    (20.0, 4.3),
    (40.0, 2.8),
    (60.0, 1.4),
    (80.0, 0.3),
    (90.0, 0.0),
];

/// Elevation quantisation step of the analog beamformer \[degrees\].
const EL_STEP_DEG: f64 = 0.2;

/// Azimuth quantisation step at the horizon \[degrees\]; the realisable
/// azimuth grid widens towards the zenith as 1/cos(el).
const AZ_STEP_DEG: f64 = 0.2;

/// Compensate the elevation squint of the analog beam: command a higher
/// elevation so that the beam peaks where asked. The result is clamped to
/// the beamformer's pointing limits.
pub fn desquint_elevation(el_deg: f64) -> f64 {
    let desquinted = el_deg + interp_table(SQUINT_TABLE, el_deg);
    desquinted.clamp(MIN_POINTING_EL_DEG, 90.0)
}

/// Snap a commanded (azimuth, elevation) \[degrees\] to the nearest
/// hardware-realisable analog pointing.
pub fn analog_pointing(az_deg: f64, el_deg: f64) -> (f64, f64) {
    let el = (el_deg / EL_STEP_DEG).round() * EL_STEP_DEG;
    let el = el.clamp(0.0, 90.0);

    // The azimuth grid degenerates at the zenith, where every azimuth is the
    // same direction.
    let az_step = (AZ_STEP_DEG / el.to_radians().cos()).min(360.0);
    let az = ((az_deg / az_step).round() * az_step).rem_euclid(360.0);
    (az, el)
}
