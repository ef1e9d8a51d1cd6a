//! Slit model and slit-image synthesis.
//!
//! A slit image is the local picture of the slit aperture as seen on the
//! detector: one Airy point source placed along the slit according to the
//! configured object location, plus a speckled sky background built from
//! many PSF evaluations across the aperture, each weighted by the square of
//! a standard-normal draw. The composite is what the compositor stamps onto
//! the detector once per dispersion column.

use ndarray::Array2;
use rand::Rng;
use rand_distr::StandardNormal;
use thiserror::Error;

use crate::optics::airy::AiryPsf;

/// Step of the sky sampling lattice across the slit aperture, in pixels.
const SKY_LATTICE_STEP: f64 = 1.0;

/// Errors produced by slit configuration and image synthesis.
#[derive(Error, Debug)]
pub enum SlitError {
    #[error("point-source location must be set before synthesizing a slit image")]
    ObjectLocationUnset,
    #[error("point-source location {0} is outside [0, 1]")]
    LocationOutOfRange(f64),
}

/// Dispersion layout the slit is used in.
///
/// This is declared explicitly rather than inferred from a length/width
/// comparison, so square-ish slits are not silently misclassified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlitMode {
    /// One order spanning the full dispersion axis.
    SingleOrder,
    /// Multiple stacked orders from a cross-dispersing element.
    CrossDispersed,
}

/// Slit aperture geometry plus the per-exposure point-source location.
///
/// Geometry is fixed per run; `object_location` is set once per exposure via
/// [`Slit::point_source`] (0 = top of slit, 1 = bottom).
#[derive(Debug, Clone)]
pub struct Slit {
    /// Slit length in pixels (the spatial axis along the slit).
    pub length_px: f64,
    /// Slit width in pixels.
    pub width_px: f64,
    /// Oversampling multiplier for the length axis of the render grid.
    pub length_mult: f64,
    /// Oversampling multiplier for the width axis of the render grid.
    pub width_mult: f64,
    pub mode: SlitMode,
    object_location: Option<f64>,
}

impl Slit {
    pub fn new(
        length_px: f64,
        width_px: f64,
        length_mult: f64,
        width_mult: f64,
        mode: SlitMode,
    ) -> Self {
        Self {
            length_px,
            width_px,
            length_mult,
            width_mult,
            mode,
            object_location: None,
        }
    }

    /// Set the point-source position along the slit for the next exposure.
    pub fn point_source(&mut self, position: f64) -> Result<(), SlitError> {
        if !(0.0..=1.0).contains(&position) {
            return Err(SlitError::LocationOutOfRange(position));
        }
        self.object_location = Some(position);
        Ok(())
    }

    pub fn object_location(&self) -> Option<f64> {
        self.object_location
    }

    /// Shape `(rows, cols)` of the local render grid: slit dimensions times
    /// their oversampling multipliers, plus one.
    pub fn subimage_shape(&self) -> (usize, usize) {
        let nx = (self.width_px * self.width_mult + 1.0) as usize;
        let ny = (self.length_px * self.length_mult + 1.0) as usize;
        (ny, nx)
    }

    /// Synthesize the composite slit image for one dispersion column.
    ///
    /// `y_strength` is the spectrum flux at this column; `source_scale` the
    /// point-source count scale (canonically 500). The sky term and the
    /// point-source term are each rounded to whole counts before summation;
    /// rounding the sum instead would change integer-count results.
    ///
    /// Fails with [`SlitError::ObjectLocationUnset`] if no point-source
    /// location has been set for this exposure.
    pub fn slit_image(
        &self,
        y_strength: f64,
        source_scale: f64,
        psf: &AiryPsf,
        wavelength_cm: f64,
        rng: &mut impl Rng,
    ) -> Result<Array2<f64>, SlitError> {
        let location = self.object_location.ok_or(SlitError::ObjectLocationUnset)?;
        let shape = self.subimage_shape();
        let (ny, nx) = shape;
        let cx = nx as f64 / 2.0;
        let cy = ny as f64 / 2.0;

        // Point source, offset along the slit-length axis by its location.
        let ptsource = psf.render(
            shape,
            cx,
            cy + (location - 0.5) * self.length_px,
            wavelength_cm,
        );

        // Sky background: photons entering through each aperture position,
        // with a chi-squared(1) intensity weight per lattice point. Column
        // loop outer, row loop inner; the draw order is part of the
        // reproducibility contract.
        let mut sky = Array2::<f64>::zeros(shape);
        for i in lattice(cx - self.width_px / 2.0, cx + self.width_px / 2.0) {
            for j in lattice(cy - self.length_px / 2.0, cy + self.length_px / 2.0) {
                let z: f64 = rng.sample(StandardNormal);
                sky.scaled_add(z * z, &psf.render(shape, i, j, wavelength_cm));
            }
        }

        let composite =
            sky.mapv(f64::round) + ptsource.mapv(|v| (v * source_scale * y_strength).round());
        Ok(composite)
    }
}

/// Half-open lattice `[start, stop)` with the sky sampling step.
fn lattice(start: f64, stop: f64) -> impl Iterator<Item = f64> {
    let count = ((stop - start) / SKY_LATTICE_STEP).ceil().max(0.0) as usize;
    (0..count).map(move |k| start + k as f64 * SKY_LATTICE_STEP)
}
