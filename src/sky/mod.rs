// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Full-sky pixel grids in horizontal coordinates.

[`SkyGrid`] tiles the sphere with iso-elevation rings: ring spacing is the
grid resolution and the number of pixels per ring scales with cos(elevation),
so pixels keep a roughly constant angular size from zenith to nadir. Pixels
are ordered ring by ring starting at the zenith, azimuth increasing within a
ring. Because the grid is fixed to the local horizontal frame, the set of
visible pixels is simply everything above the horizon.

[`SkyMap`] couples a grid with a value per pixel; beam models own one and
overwrite its visible subset on every computation.
 */


use ndarray::prelude::*;

/// An (azimuth, elevation) direction. Both angles are in radians; azimuth is
/// measured clockwise from north, elevation from the horizon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AzEl {
    /// Azimuth \[radians\]
    pub az: f64,
    /// Elevation \[radians\]
    pub el: f64,
}

impl AzEl {
    pub fn from_degrees(az_deg: f64, el_deg: f64) -> AzEl {
        AzEl {
            az: az_deg.to_radians(),
            el: el_deg.to_radians(),
        }
    }

    /// The unit vector of this direction in (east, north, up), matching the
    /// (east, north, height) basis of antenna positions.
    pub fn to_unit(self) -> [f64; 3] {
        let (s_az, c_az) = self.az.sin_cos();
        let (s_el, c_el) = self.el.sin_cos();
        [s_az * c_el, c_az * c_el, s_el]
    }
}

/// One iso-elevation ring of pixels.
#[derive(Debug, Clone, Copy)]
struct Ring {
    /// Index of the ring's first pixel.
    start: usize,
    /// Number of pixels in the ring.
    len: usize,
}

/// A full-sky pixelisation at a fixed angular resolution.
#[derive(Debug, Clone)]
pub struct SkyGrid {
    resolution_deg: f64,
    /// Elevation step between consecutive rings \[degrees\]. Very close to
    /// `resolution_deg`, adjusted so the rings span ±90° exactly.
    ring_step_deg: f64,
    rings: Vec<Ring>,
    coords: Vec<AzEl>,
    visible: Vec<bool>,
}

impl SkyGrid {
    /// Build a grid at the given resolution \[degrees\].
    ///
    /// # Panics
    ///
    /// Panics if the resolution is not within (0°, 90°].
    pub fn new(resolution_deg: f64) -> SkyGrid {
        assert!(
            resolution_deg > 0.0 && resolution_deg <= 90.0,
            "sky-grid resolution must be within (0, 90] degrees"
        );

        let num_rings = (180.0 / resolution_deg).round() as usize + 1;
        let ring_step_deg = 180.0 / (num_rings - 1) as f64;

        let mut rings = Vec::with_capacity(num_rings);
        let mut coords = vec![];
        for i_ring in 0..num_rings {
            let el_deg = 90.0 - i_ring as f64 * ring_step_deg;
            let el = el_deg.to_radians();
            // Pixel count scales with the circumference of the ring; the
            // polar rings collapse to a single pixel.
            let len = ((360.0 / ring_step_deg * el.cos()).round() as usize).max(1);
            rings.push(Ring {
                start: coords.len(),
                len,
            });
            let d_az = std::f64::consts::TAU / len as f64;
            for i_pix in 0..len {
                coords.push(AzEl {
                    az: i_pix as f64 * d_az,
                    el,
                });
            }
        }

        let visible = coords.iter().map(|c| c.el > 0.0).collect();
        SkyGrid {
            resolution_deg,
            ring_step_deg,
            rings,
            coords,
            visible,
        }
    }

    pub fn resolution_deg(&self) -> f64 {
        self.resolution_deg
    }

    /// The total number of pixels.
    pub fn len(&self) -> usize {
        self.coords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    /// The ordered (azimuth, elevation) coordinates of every pixel.
    pub fn coords(&self) -> &[AzEl] {
        &self.coords
    }

    /// Which pixels are above the horizon.
    pub fn visible(&self) -> &[bool] {
        &self.visible
    }

    pub fn num_visible(&self) -> usize {
        self.visible.iter().filter(|&&v| v).count()
    }

    /// The azimuths and elevations \[radians\] of the visible pixels, in
    /// pixel order.
    pub(crate) fn visible_azel(&self) -> (Vec<f64>, Vec<f64>) {
        self.coords
            .iter()
            .zip(self.visible.iter())
            .filter(|(_, &vis)| vis)
            .map(|(c, _)| (c.az, c.el))
            .unzip()
    }

    /// Restrict a full-length pixel array to the visible pixels.
    pub(crate) fn select_visible(&self, full: ArrayView1<f64>) -> Array1<f64> {
        debug_assert_eq!(full.len(), self.len());
        full.iter()
            .zip(self.visible.iter())
            .filter(|(_, &vis)| vis)
            .map(|(&v, _)| v)
            .collect()
    }

    /// The index of the pixel nearest to a direction. O(1) via ring lookup.
    pub fn nearest_pixel(&self, azel: AzEl) -> usize {
        let el_deg = azel.el.to_degrees().clamp(-90.0, 90.0);
        let i_ring = (((90.0 - el_deg) / self.ring_step_deg).round() as usize)
            .min(self.rings.len() - 1);
        let ring = self.rings[i_ring];
        let d_az = std::f64::consts::TAU / ring.len as f64;
        let i_pix = (azel.az.rem_euclid(std::f64::consts::TAU) / d_az).round() as usize % ring.len;
        ring.start + i_pix
    }

    /// Resample per-pixel values from this grid onto a target grid.
    ///
    /// Each source pixel is binned into its nearest target pixel and bins are
    /// averaged; a target pixel that receives no source pixel (only possible
    /// when regridding to a finer resolution) samples its nearest source
    /// pixel instead.
    pub fn regrid(&self, values: ArrayView1<f64>, target: &SkyGrid) -> Array1<f64> {
        debug_assert_eq!(values.len(), self.len());

        let mut acc = Array1::zeros(target.len());
        let mut counts = vec![0_usize; target.len()];
        for (&v, &c) in values.iter().zip(self.coords.iter()) {
            let i = target.nearest_pixel(c);
            acc[i] += v;
            counts[i] += 1;
        }
        for (i, (a, &n)) in acc.iter_mut().zip(counts.iter()).enumerate() {
            if n > 0 {
                *a /= n as f64;
            } else {
                *a = values[self.nearest_pixel(target.coords[i])];
            }
        }
        acc
    }
}

/// A full-sky map: a [`SkyGrid`] plus one value per pixel. The buffer length
/// is fixed by the grid at construction and never changes.
#[derive(Debug, Clone)]
pub struct SkyMap {
    grid: SkyGrid,
    values: Array1<f64>,
}

impl SkyMap {
    pub fn new(resolution_deg: f64) -> SkyMap {
        let grid = SkyGrid::new(resolution_deg);
        let values = Array1::zeros(grid.len());
        SkyMap { grid, values }
    }

    pub fn grid(&self) -> &SkyGrid {
        &self.grid
    }

    pub fn values(&self) -> ArrayView1<f64> {
        self.values.view()
    }

    /// Zero the whole buffer.
    pub(crate) fn reset(&mut self) {
        self.values.fill(0.0);
    }

    /// Write values into the visible pixels, in pixel order. `vis` must have
    /// one element per visible pixel.
    pub(crate) fn set_visible(&mut self, vis: ArrayView1<f64>) {
        debug_assert_eq!(vis.len(), self.grid.num_visible());
        let mut vis_iter = vis.iter();
        for (value, &visible) in self.values.iter_mut().zip(self.grid.visible.iter()) {
            if visible {
                *value = *vis_iter.next().expect("one value per visible pixel");
            }
        }
    }

    /// Resample this map's values onto a target grid.
    pub fn regrid_to(&self, target: &SkyGrid) -> Array1<f64> {
        self.grid.regrid(self.values.view(), target)
    }
}
