// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The fixed layout of the array.
//!
//! The array is a hexagonal-lattice field of mini-arrays, each a 19-antenna
//! hexagonal cluster rotated by a fixed, whole-degree angle about its phase
//! centre. Rotations are integral degrees, so grouping mini-arrays by
//! `rotation mod 60` is exact.

use itertools::{iproduct, Itertools};
use lazy_static::lazy_static;
use ndarray::prelude::*;

use super::error::InstrumentError;
use crate::constants::{ANTS_PER_MINI_ARRAY, ANT_SPACING, MINI_ARRAY_SPACING, NUM_MINI_ARRAYS};

/// One mini-array: a 19-antenna cluster with a shared analog pointing.
#[derive(Debug, Clone)]
pub struct MiniArray {
    pub id: u32,
    /// Rotation of the antenna lattice about the phase centre \[whole
    /// degrees\].
    pub rotation_deg: u32,
    /// Phase-centre position, (east, north, height) \[metres\].
    pub position: [f64; 3],
}

lazy_static! {
    /// Every mini-array of the array, ordered by identifier.
    static ref MINI_ARRAYS: Vec<MiniArray> = build_mini_arrays();
}

/// Axial hex coordinates to cartesian (east, north) \[metres\].
fn hex_to_enh(q: i32, r: i32, pitch: f64) -> [f64; 3] {
    let east = pitch * (q as f64 + r as f64 / 2.0);
    let north = pitch * (3_f64.sqrt() / 2.0) * r as f64;
    [east, north, 0.0]
}

/// Hex lattice distance from the origin.
fn hex_distance(q: i32, r: i32) -> i32 {
    (q.abs() + r.abs() + (q + r).abs()) / 2
}

fn build_mini_arrays() -> Vec<MiniArray> {
    // Walk the hex lattice outwards from the centre and keep the innermost
    // NUM_MINI_ARRAYS cells; ties broken by axial coordinates so the layout
    // is stable.
    iproduct!(-6..=6_i32, -6..=6_i32)
        .filter(|&(q, r)| (q + r).abs() <= 6)
        .sorted_by_key(|&(q, r)| (hex_distance(q, r), q, r))
        .take(NUM_MINI_ARRAYS)
        .enumerate()
        .map(|(i, (q, r))| MiniArray {
            id: i as u32,
            rotation_deg: (i as u32 * 10) % 360,
            position: hex_to_enh(q, r, MINI_ARRAY_SPACING),
        })
        .collect()
}

/// Look up a mini-array by identifier.
pub fn mini_array(id: u32) -> Result<&'static MiniArray, InstrumentError> {
    MINI_ARRAYS
        .get(id as usize)
        .ok_or(InstrumentError::UnknownMiniArray(id))
}

/// The identifiers of every mini-array, in order.
pub fn all_mini_array_ids() -> Vec<u32> {
    MINI_ARRAYS.iter().map(|ma| ma.id).collect()
}

/// The antenna positions of a mini-array rotated by `rotation_deg`, relative
/// to its phase centre. One row per antenna, columns (east, north, height)
/// \[metres\].
pub fn antenna_positions(rotation_deg: u32) -> Array2<f64> {
    let (s_rot, c_rot) = (rotation_deg as f64).to_radians().sin_cos();
    let mut positions = Array2::zeros((ANTS_PER_MINI_ARRAY, 3));
    let cells = iproduct!(-2..=2_i32, -2..=2_i32)
        .filter(|&(q, r)| (q + r).abs() <= 2)
        .sorted_by_key(|&(q, r)| (hex_distance(q, r), q, r));
    for (mut row, (q, r)) in positions.outer_iter_mut().zip(cells) {
        let [e, n, h] = hex_to_enh(q, r, ANT_SPACING);
        row[0] = e * c_rot - n * s_rot;
        row[1] = e * s_rot + n * c_rot;
        row[2] = h;
    }
    positions
}

/// The phase-centre positions of a list of mini-arrays. One row per
/// identifier, in the order given.
pub fn phase_centres(ids: &[u32]) -> Result<Array2<f64>, InstrumentError> {
    let mut positions = Array2::zeros((ids.len(), 3));
    for (mut row, &id) in positions.outer_iter_mut().zip(ids.iter()) {
        let ma = mini_array(id)?;
        row.assign(&ArrayView1::from(&ma.position));
    }
    Ok(positions)
}
