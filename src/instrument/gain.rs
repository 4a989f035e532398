// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The empirical gain pattern of a single crossed-dipole antenna.

use std::fmt;
use std::str::FromStr;

use hifitime::Epoch;
use ndarray::prelude::*;
use rayon::prelude::*;

use super::error::InstrumentError;
use crate::math::interp_table;
use crate::sky::SkyGrid;

/// Which of the two crossed dipoles is being used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarisation {
    /// The north-west/south-east dipole.
    NW,
    /// The north-east/south-west dipole.
    NE,
}

impl Polarisation {
    /// Azimuth of the dipole arms \[degrees\].
    fn arm_azimuth_deg(self) -> f64 {
        match self {
            Polarisation::NW => 315.0,
            Polarisation::NE => 45.0,
        }
    }
}

impl FromStr for Polarisation {
    type Err = InstrumentError;

    fn from_str(s: &str) -> Result<Polarisation, InstrumentError> {
        match s.trim().to_uppercase().as_str() {
            "NW" => Ok(Polarisation::NW),
            "NE" => Ok(Polarisation::NE),
            other => Err(InstrumentError::UnknownPolarisation(other.to_string())),
        }
    }
}

impl fmt::Display for Polarisation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Polarisation::NW => write!(f, "NW"),
            Polarisation::NE => write!(f, "NE"),
        }
    }
}

/// Elevation-rolloff exponent of the element pattern vs frequency \[MHz\].
/// The pattern narrows towards the high end of the band.
const ROLLOFF_TABLE: &[(f64, f64)] = &[
    (10.0, 1.3),
    (30.0, 1.7),
    (50.0, 2.1),
    (70.0, 2.6),
    (90.0, 3.2),
];

/// Depth of the azimuthal modulation of the element pattern.
const AZ_MODULATION: f64 = 0.1;

/// The gain of a single antenna element toward every pixel of a grid.
///
/// The pattern is fixed to the ground, and the grid is in horizontal
/// coordinates, so the response does not depend on the observation time;
/// the argument is kept so callers forward their configured time alongside
/// the rest of the lookup key. Pixels below the horizon get zero gain.
pub fn element_gain(
    freq_mhz: f64,
    polar: Polarisation,
    grid: &SkyGrid,
    _time: Option<Epoch>,
) -> Array1<f64> {
    let rolloff = interp_table(ROLLOFF_TABLE, freq_mhz);
    let arm_az = polar.arm_azimuth_deg().to_radians();

    // Per-pixel evaluation is embarrassingly parallel; this is an internal
    // numeric kernel, independent of the caller's worker configuration.
    let gains: Vec<f64> = grid
        .coords()
        .par_iter()
        .map(|c| {
            if c.el <= 0.0 {
                0.0
            } else {
                let rolled = c.el.sin().powf(rolloff);
                let modulation = 1.0 + AZ_MODULATION * (2.0 * (c.az - arm_az)).cos();
                rolled * modulation
            }
        })
        .collect();
    Array1::from_vec(gains)
}
