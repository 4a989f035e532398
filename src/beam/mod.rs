// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Beam models.

[`AnalogBeam`] simulates the sky response of a single mini-array: the
analytic array factor of its 19 antennas times the empirical element gain.
[`DigitalBeam`] composes many mini-arrays: each distinct orientation's
analog response is computed once on a finer grid, regridded and summed, then
multiplied by the array factor of the mini-array phase centres.

Both models persist their configuration across calls; every `beam()` call
merges the given overrides onto the stored configuration, recomputes from
scratch and overwrites the owned [`SkyMap`].
 */

mod error;
mod geometry;
mod parallel;
mod phasor;
#[cfg(test)]
mod tests;

use std::collections::HashMap;

use hifitime::Epoch;
use log::debug;
use ndarray::prelude::*;

pub use error::BeamError;

use crate::constants::{ANALOG_GRID_RES_DEG, ROTATION_PERIOD_DEG};
use crate::instrument::{
    all_mini_array_ids, analog_pointing, desquint_elevation, element_gain, mini_array,
    phase_centres, Polarisation,
};
use crate::sky::{SkyGrid, SkyMap};

/// The array factor of a set of antennas over the visible pixels of a grid.
///
/// The commanded pointing is squint-compensated and snapped to the
/// realisable analog grid, path projections are computed for the pointing
/// and for every visible pixel, and the per-antenna delays go through the
/// phasor engine. Returns one power value per visible pixel.
pub(crate) fn array_factor(
    grid: &SkyGrid,
    az_deg: f64,
    el_deg: f64,
    antpos: ArrayView2<f64>,
    freq_mhz: f64,
    workers: usize,
) -> Result<Array1<f64>, BeamError> {
    let el_deg = desquint_elevation(el_deg);
    let (az_deg, el_deg) = analog_pointing(az_deg, el_deg);
    debug!(
        "array factor: {} antennas toward ({az_deg:.2}, {el_deg:.2}) deg at {freq_mhz} MHz",
        antpos.nrows()
    );

    let pointing_phi =
        geometry::path_projections(antpos, &[az_deg.to_radians()], &[el_deg.to_radians()]);
    let (az_rad, el_rad) = grid.visible_azel();
    let sky_phi = geometry::path_projections(antpos, &az_rad, &el_rad);

    // Broadcast the single pointing column across every pixel column.
    let delay = &sky_phi - &pointing_phi;
    phasor::power_pattern(delay.view(), freq_mhz, workers)
}

/// Configuration of an [`AnalogBeam`]. Rebuilt immutably on every `beam()`
/// call by merging overrides onto the previous configuration.
#[derive(Debug, Clone)]
pub struct AnalogConfig {
    /// Mini-array identifier.
    pub ma: u32,
    /// Observing frequency \[MHz\].
    pub freq_mhz: f64,
    /// Commanded analog azimuth \[degrees\].
    pub az_deg: f64,
    /// Commanded analog elevation \[degrees\].
    pub el_deg: f64,
    pub polar: Polarisation,
    /// Worker threads for the phasor engine.
    pub workers: usize,
    /// Observation time, forwarded to the element-gain lookup.
    pub time: Option<Epoch>,
}

impl Default for AnalogConfig {
    fn default() -> AnalogConfig {
        AnalogConfig {
            ma: 0,
            freq_mhz: 50.0,
            az_deg: 180.0,
            el_deg: 90.0,
            polar: Polarisation::NW,
            workers: 1,
            time: None,
        }
    }
}

/// Per-call overrides for an [`AnalogBeam`]; unset fields keep their
/// previously configured values.
#[derive(Debug, Clone, Default)]
pub struct AnalogOverrides {
    pub ma: Option<u32>,
    pub freq_mhz: Option<f64>,
    pub az_deg: Option<f64>,
    pub el_deg: Option<f64>,
    pub polar: Option<Polarisation>,
    pub workers: Option<usize>,
    pub time: Option<Option<Epoch>>,
}

impl AnalogConfig {
    fn merged(&self, overrides: AnalogOverrides) -> AnalogConfig {
        AnalogConfig {
            ma: overrides.ma.unwrap_or(self.ma),
            freq_mhz: overrides.freq_mhz.unwrap_or(self.freq_mhz),
            az_deg: overrides.az_deg.unwrap_or(self.az_deg),
            el_deg: overrides.el_deg.unwrap_or(self.el_deg),
            polar: overrides.polar.unwrap_or(self.polar),
            workers: overrides.workers.unwrap_or(self.workers),
            time: overrides.time.unwrap_or(self.time),
        }
    }
}

/// The simulated sky response of a single mini-array.
#[derive(Debug)]
pub struct AnalogBeam {
    map: SkyMap,
    config: AnalogConfig,
}

impl AnalogBeam {
    pub fn new(resolution_deg: f64) -> AnalogBeam {
        AnalogBeam {
            map: SkyMap::new(resolution_deg),
            config: AnalogConfig::default(),
        }
    }

    pub fn config(&self) -> &AnalogConfig {
        &self.config
    }

    /// The sky map written by the last `beam()` call.
    pub fn sky_map(&self) -> &SkyMap {
        &self.map
    }

    /// Compute the mini-array's beam and write it into the owned sky map.
    /// Only visible pixels are written; everything else is zero.
    pub fn beam(&mut self, overrides: AnalogOverrides) -> Result<(), BeamError> {
        let config = self.config.merged(overrides);

        let ma = mini_array(config.ma)?;
        let antpos = crate::instrument::antenna_positions(ma.rotation_deg);
        let af = array_factor(
            self.map.grid(),
            config.az_deg,
            config.el_deg,
            antpos.view(),
            config.freq_mhz,
            config.workers,
        )?;

        let gain = element_gain(config.freq_mhz, config.polar, self.map.grid(), config.time);
        let gain_visible = self.map.grid().select_visible(gain.view());

        self.map.reset();
        self.map.set_visible((af * gain_visible).view());
        self.config = config;
        Ok(())
    }
}

/// A mini-array orientation class. The antenna lattice repeats every 60
/// degrees, so mini-arrays whose whole-degree rotations agree modulo 60 have
/// identical analog beams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct RotationGroup(u32);

impl RotationGroup {
    fn from_rotation(rotation_deg: u32) -> RotationGroup {
        RotationGroup(rotation_deg % ROTATION_PERIOD_DEG)
    }
}

/// Configuration of a [`DigitalBeam`].
#[derive(Debug, Clone)]
pub struct DigitalConfig {
    /// The mini-arrays being combined.
    pub mas: Vec<u32>,
    /// Observing frequency \[MHz\].
    pub freq_mhz: f64,
    /// Commanded analog azimuth \[degrees\].
    pub az_deg: f64,
    /// Commanded analog elevation \[degrees\].
    pub el_deg: f64,
    /// Digital (numerical) pointing azimuth \[degrees\]. Part of the
    /// configuration, not consumed by the analog array factor.
    pub az_dig_deg: f64,
    /// Digital (numerical) pointing elevation \[degrees\].
    pub el_dig_deg: f64,
    pub polar: Polarisation,
    pub workers: usize,
    pub time: Option<Epoch>,
}

impl Default for DigitalConfig {
    fn default() -> DigitalConfig {
        DigitalConfig {
            mas: all_mini_array_ids(),
            freq_mhz: 50.0,
            az_deg: 180.0,
            el_deg: 90.0,
            az_dig_deg: 180.0,
            el_dig_deg: 90.0,
            polar: Polarisation::NW,
            workers: 1,
            time: None,
        }
    }
}

/// Per-call overrides for a [`DigitalBeam`]; unset fields keep their
/// previously configured values.
#[derive(Debug, Clone, Default)]
pub struct DigitalOverrides {
    pub mas: Option<Vec<u32>>,
    pub freq_mhz: Option<f64>,
    pub az_deg: Option<f64>,
    pub el_deg: Option<f64>,
    pub az_dig_deg: Option<f64>,
    pub el_dig_deg: Option<f64>,
    pub polar: Option<Polarisation>,
    pub workers: Option<usize>,
    pub time: Option<Option<Epoch>>,
}

impl DigitalConfig {
    fn merged(&self, overrides: DigitalOverrides) -> DigitalConfig {
        DigitalConfig {
            mas: overrides.mas.unwrap_or_else(|| self.mas.clone()),
            freq_mhz: overrides.freq_mhz.unwrap_or(self.freq_mhz),
            az_deg: overrides.az_deg.unwrap_or(self.az_deg),
            el_deg: overrides.el_deg.unwrap_or(self.el_deg),
            az_dig_deg: overrides.az_dig_deg.unwrap_or(self.az_dig_deg),
            el_dig_deg: overrides.el_dig_deg.unwrap_or(self.el_dig_deg),
            polar: overrides.polar.unwrap_or(self.polar),
            workers: overrides.workers.unwrap_or(self.workers),
            time: overrides.time.unwrap_or(self.time),
        }
    }
}

/// The simulated sky response of the digitally combined array.
#[derive(Debug)]
pub struct DigitalBeam {
    map: SkyMap,
    config: DigitalConfig,
    /// How many distinct analog responses the last `beam()` call had to
    /// compute; at most one per rotation group.
    last_analog_computations: usize,
}

impl DigitalBeam {
    pub fn new(resolution_deg: f64) -> DigitalBeam {
        DigitalBeam {
            map: SkyMap::new(resolution_deg),
            config: DigitalConfig::default(),
            last_analog_computations: 0,
        }
    }

    pub fn config(&self) -> &DigitalConfig {
        &self.config
    }

    /// The sky map written by the last `beam()` call.
    pub fn sky_map(&self) -> &SkyMap {
        &self.map
    }

    /// How many analog beams the last `beam()` call actually computed. Never
    /// more than the number of distinct rotation groups among the configured
    /// mini-arrays.
    pub fn last_analog_computations(&self) -> usize {
        self.last_analog_computations
    }

    /// Compute the full-array beam and write it into the owned sky map.
    ///
    /// The per-mini-array analog responses are computed on a fixed finer
    /// grid, cached by rotation group for the duration of this call,
    /// regridded to this beam's resolution and summed with one contribution
    /// per configured mini-array. The sum is then modulated by the array
    /// factor of the mini-array phase centres.
    pub fn beam(&mut self, overrides: DigitalOverrides) -> Result<(), BeamError> {
        let config = self.config.merged(overrides);
        if config.mas.is_empty() {
            return Err(BeamError::NoMiniArrays);
        }

        let mut analog = AnalogBeam::new(ANALOG_GRID_RES_DEG);
        let mut cache: HashMap<RotationGroup, Array1<f64>> = HashMap::new();
        let mut summed: Option<Array1<f64>> = None;
        for &ma_id in &config.mas {
            let ma = mini_array(ma_id)?;
            let group = RotationGroup::from_rotation(ma.rotation_deg);
            if !cache.contains_key(&group) {
                analog.beam(AnalogOverrides {
                    ma: Some(ma_id),
                    freq_mhz: Some(config.freq_mhz),
                    az_deg: Some(config.az_deg),
                    el_deg: Some(config.el_deg),
                    polar: Some(config.polar),
                    workers: Some(config.workers),
                    time: Some(config.time),
                })?;
                let regridded = analog.sky_map().regrid_to(self.map.grid());
                let visible = self.map.grid().select_visible(regridded.view());
                cache.insert(group, visible);
            }
            // Every mini-array contributes, even when its group's response
            // was reused.
            let contribution = &cache[&group];
            summed = Some(match summed {
                None => contribution.clone(),
                Some(s) => s + contribution,
            });
        }
        self.last_analog_computations = cache.len();
        debug!(
            "digital beam: {} mini-arrays, {} distinct rotation groups",
            config.mas.len(),
            cache.len()
        );

        let summed = summed.expect("mini-array list is non-empty");
        let centres = phase_centres(&config.mas)?;
        let af = array_factor(
            self.map.grid(),
            config.az_deg,
            config.el_deg,
            centres.view(),
            config.freq_mhz,
            config.workers,
        )?;

        self.map.reset();
        self.map.set_visible((af * summed).view());
        self.config = config;
        Ok(())
    }
}
