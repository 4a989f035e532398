// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Instrument description and calibration.

Everything the beam models need to know about the physical array lives here:
the mini-array registry (positions and rotations), the analog-pointing
calibration (squint compensation and pointing quantisation) and the
empirical element gain model.
 */

mod error;
mod gain;
mod pointing;
mod registry;

pub use error::InstrumentError;
pub use gain::{element_gain, Polarisation};
pub use pointing::{analog_pointing, desquint_elevation};
pub use registry::{all_mini_array_ids, antenna_positions, mini_array, phase_centres, MiniArray};
