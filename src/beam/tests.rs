// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use approx::{assert_abs_diff_eq, assert_relative_eq};
use ndarray::prelude::*;

use super::*;
use crate::instrument::antenna_positions;

/// A deterministic delay matrix with no structure in particular.
fn synthetic_delays(num_antennas: usize, num_pixels: usize) -> Array2<f64> {
    Array2::from_shape_fn((num_antennas, num_pixels), |(i, j)| {
        ((i * 31 + j * 17) as f64 * 0.618).sin() * 12.5
    })
}

#[test]
fn serial_and_parallel_powers_agree() {
    for num_antennas in [1, 3, 19] {
        let delays = synthetic_delays(num_antennas, 1000);
        let serial = phasor::power_pattern(delays.view(), 50.0, 1).unwrap();
        for workers in [2, 4] {
            let parallel = phasor::power_pattern(delays.view(), 50.0, workers).unwrap();
            assert_eq!(serial.len(), parallel.len());
            for (&s, &p) in serial.iter().zip(parallel.iter()) {
                assert_relative_eq!(s, p, max_relative = 1e-9, epsilon = 1e-12);
            }
        }
    }
}

#[test]
fn power_is_never_negative() {
    let delays = synthetic_delays(7, 513);
    for workers in [1, 3] {
        let power = phasor::power_pattern(delays.view(), 33.3, workers).unwrap();
        assert!(power.iter().all(|&p| p >= 0.0));
    }
}

#[test]
fn single_antenna_at_the_pointing_gives_unit_power() {
    // One antenna, one pixel at the pointing itself: the delay is zero and
    // the phasor sum is exactly 1.
    let delays = Array2::zeros((1, 1));
    let power = phasor::power_pattern(delays.view(), 50.0, 1).unwrap();
    assert_abs_diff_eq!(power[0], 1.0);
}

#[test]
fn invalid_frequencies_fail_fast() {
    let delays = synthetic_delays(2, 8);
    for freq in [0.0, -10.0, f64::NAN, f64::INFINITY] {
        assert!(matches!(
            phasor::power_pattern(delays.view(), freq, 1),
            Err(BeamError::InvalidFrequency(_))
        ));
    }
}

#[test]
fn zero_workers_is_a_configuration_error() {
    let delays = synthetic_delays(2, 8);
    assert!(matches!(
        phasor::power_pattern(delays.view(), 50.0, 0),
        Err(BeamError::NoWorkers)
    ));
}

#[test]
fn pixel_blocks_are_contiguous_and_balanced() {
    for (num_pixels, num_blocks) in [(10, 3), (12, 4), (1, 1), (5, 8), (1000, 7)] {
        let blocks = parallel::split_pixels(num_pixels, num_blocks);
        // Contiguous, order-preserving, exact cover.
        let mut next = 0;
        for block in &blocks {
            assert_eq!(block.start, next);
            next = block.end;
        }
        assert_eq!(next, num_pixels);
        // Sizes differ by at most one.
        let sizes: Vec<usize> = blocks.iter().map(|b| b.len()).collect();
        let min = sizes.iter().min().unwrap();
        let max = sizes.iter().max().unwrap();
        assert!(max - min <= 1);
        // Never more blocks than pixels.
        assert!(blocks.len() <= num_pixels.max(1));
    }
}

#[test]
fn array_factor_peaks_at_the_pointing() {
    let grid = SkyGrid::new(2.0);
    let antpos = antenna_positions(0);
    let af = array_factor(&grid, 0.0, 90.0, antpos.view(), 50.0, 1).unwrap();
    assert_eq!(af.len(), grid.num_visible());

    // The zenith pixel is the first visible pixel; the coherent sum there is
    // the antenna count squared.
    let num_antennas = antpos.nrows() as f64;
    assert_abs_diff_eq!(af[0], num_antennas * num_antennas, epsilon = 1e-6);
    let max = af.iter().cloned().fold(f64::MIN, f64::max);
    assert_abs_diff_eq!(max, af[0], epsilon = 1e-6);
}

#[test]
fn analog_beam_zeroes_everything_below_the_horizon() {
    let mut beam = AnalogBeam::new(5.0);
    beam.beam(AnalogOverrides::default()).unwrap();
    for (&v, &vis) in beam
        .sky_map()
        .values()
        .iter()
        .zip(beam.sky_map().grid().visible().iter())
    {
        if !vis {
            assert_eq!(v, 0.0);
        }
    }
}

#[test]
fn analog_beam_is_idempotent() {
    let overrides = AnalogOverrides {
        az_deg: Some(200.0),
        el_deg: Some(60.0),
        freq_mhz: Some(42.0),
        ..Default::default()
    };
    let mut beam = AnalogBeam::new(5.0);
    beam.beam(overrides.clone()).unwrap();
    let first = beam.sky_map().values().to_owned();
    beam.beam(overrides).unwrap();
    assert_eq!(beam.sky_map().values(), first.view());
}

#[test]
fn analog_config_persists_across_calls() {
    let mut beam = AnalogBeam::new(10.0);
    beam.beam(AnalogOverrides {
        freq_mhz: Some(65.0),
        ..Default::default()
    })
    .unwrap();
    // A later call without an override keeps the earlier frequency.
    beam.beam(AnalogOverrides::default()).unwrap();
    assert_abs_diff_eq!(beam.config().freq_mhz, 65.0);
}

#[test]
fn analog_beam_end_to_end_at_zenith() {
    let mut beam = AnalogBeam::new(1.0);
    beam.beam(AnalogOverrides::default()).unwrap();
    let values = beam.sky_map().values();
    let visible = beam.sky_map().grid().visible();

    for (&v, &vis) in values.iter().zip(visible.iter()) {
        if !vis {
            assert_eq!(v, 0.0);
        }
    }
    // The default pointing is the zenith, which is pixel 0; it must hold the
    // maximum of the whole map.
    let (i_max, &v_max) = values
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap())
        .unwrap();
    assert_eq!(i_max, 0);
    assert!(v_max > 0.0);
}

#[test]
fn serial_and_parallel_beams_agree() {
    let mut serial = AnalogBeam::new(5.0);
    serial
        .beam(AnalogOverrides {
            el_deg: Some(70.0),
            ..Default::default()
        })
        .unwrap();
    let mut parallel = AnalogBeam::new(5.0);
    parallel
        .beam(AnalogOverrides {
            el_deg: Some(70.0),
            workers: Some(4),
            ..Default::default()
        })
        .unwrap();
    for (&s, &p) in serial
        .sky_map()
        .values()
        .iter()
        .zip(parallel.sky_map().values().iter())
    {
        assert_relative_eq!(s, p, max_relative = 1e-9, epsilon = 1e-12);
    }
}

#[test]
fn digital_beam_computes_each_rotation_group_once() {
    // Mini-arrays 0 and 6 are rotated by 0 and 60 degrees: the same group.
    let mut beam = DigitalBeam::new(2.0);
    beam.beam(DigitalOverrides {
        mas: Some(vec![0, 6]),
        ..Default::default()
    })
    .unwrap();
    assert_eq!(beam.last_analog_computations(), 1);

    // Mini-arrays 0 and 1 are rotated by 0 and 10 degrees: distinct groups.
    beam.beam(DigitalOverrides {
        mas: Some(vec![0, 1]),
        ..Default::default()
    })
    .unwrap();
    assert_eq!(beam.last_analog_computations(), 2);
}

#[test]
fn digital_beam_sums_one_contribution_per_mini_array() {
    // Mini-arrays 0 and 6 share a rotation group, so the cached analog
    // response is reused, but both must still contribute to the sum. At the
    // zenith pixel (the pointing) every delay is zero, so going from one
    // mini-array to two doubles the summed analog response and raises the
    // phase-centre array factor from 1 to 4: a factor of 8 overall.
    let mut single = DigitalBeam::new(2.0);
    single
        .beam(DigitalOverrides {
            mas: Some(vec![0]),
            ..Default::default()
        })
        .unwrap();
    let mut double = DigitalBeam::new(2.0);
    double
        .beam(DigitalOverrides {
            mas: Some(vec![0, 6]),
            ..Default::default()
        })
        .unwrap();

    // At the zenith pixel: the summed analog response doubles and the
    // phase-centre array factor goes from 1 to 4.
    let s = single.sky_map().values()[0];
    let d = double.sky_map().values()[0];
    assert!(s > 0.0);
    assert_relative_eq!(d / s, 8.0, max_relative = 1e-6);
}

#[test]
fn digital_beam_rejects_an_empty_mini_array_list() {
    let mut beam = DigitalBeam::new(5.0);
    assert!(matches!(
        beam.beam(DigitalOverrides {
            mas: Some(vec![]),
            ..Default::default()
        }),
        Err(BeamError::NoMiniArrays)
    ));
}

#[test]
fn digital_beam_propagates_unknown_mini_arrays() {
    let mut beam = DigitalBeam::new(5.0);
    let result = beam.beam(DigitalOverrides {
        mas: Some(vec![0, 9999]),
        ..Default::default()
    });
    assert!(matches!(
        result,
        Err(BeamError::Instrument(
            crate::instrument::InstrumentError::UnknownMiniArray(9999)
        ))
    ));
}
