// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Projection of antenna positions onto sky directions.

use ndarray::prelude::*;

use crate::sky::AzEl;

/// Project antenna positions onto a set of sky directions.
///
/// `antpos` has one row per antenna, columns (east, north, height)
/// \[metres\]; azimuths and elevations are in \[radians\]. Entry (i, j) of
/// the result is the dot product of antenna i's position with the unit
/// vector of direction j, i.e. the extra path length \[metres\] signal from
/// direction j travels to reach antenna i, relative to the origin.
pub(crate) fn path_projections(
    antpos: ArrayView2<f64>,
    az_rad: &[f64],
    el_rad: &[f64],
) -> Array2<f64> {
    debug_assert_eq!(antpos.ncols(), 3);
    debug_assert_eq!(az_rad.len(), el_rad.len());

    let mut units = Array2::zeros((3, az_rad.len()));
    for (mut col, (&az, &el)) in units
        .columns_mut()
        .into_iter()
        .zip(az_rad.iter().zip(el_rad.iter()))
    {
        let [x, y, z] = AzEl { az, el }.to_unit();
        col[0] = x;
        col[1] = y;
        col[2] = z;
    }
    antpos.dot(&units)
}
