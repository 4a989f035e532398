// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Beam simulation for low-frequency phased-array radio telescopes.

The array is made of many "mini-arrays" (clusters of 19 crossed-dipole
antennas sharing one analog pointing). [`AnalogBeam`] simulates the sky
response of a single mini-array; [`DigitalBeam`] combines every configured
mini-array into the full-array response. Both write their result into an
owned [`SkyMap`] over a horizontal-coordinate pixel grid.
 */

pub mod beam;
pub mod constants;
pub mod instrument;
pub(crate) mod math;
pub mod sky;

// Re-exports.
pub use beam::{AnalogBeam, AnalogOverrides, BeamError, DigitalBeam, DigitalOverrides};
pub use instrument::Polarisation;
pub use sky::{AzEl, SkyGrid, SkyMap};

pub use math::c64;
