//! Grating dispersion model for a grism (grating + prism) element.
//!
//! The grating equation maps a (wavelength, diffraction order) pair to the
//! exit angle behind the grism:
//!
//! ```text
//! β = asin(m·λ/σ − n·sin(δ)) + δ
//! ```
//!
//! where `σ` is the groove spacing, `δ` the blaze/incidence angle and `n`
//! the refractive parameter of the prism.

use thiserror::Error;

/// Errors produced by the grating dispersion model.
#[derive(Error, Debug)]
pub enum GrismError {
    #[error(
        "grating equation argument {arg:.6} for wavelength {wavelength}, order {order} \
         is outside [-1, 1]"
    )]
    BetaOutOfRange {
        wavelength: f64,
        order: f64,
        arg: f64,
    },
}

/// A grism dispersive element. Immutable after construction; used only
/// through [`Grism::calc_beta`].
#[derive(Debug, Clone)]
pub struct Grism {
    pub name: String,
    /// Groove spacing σ, in the same wavelength units as `calc_beta` input.
    pub sigma: f64,
    /// Blaze/incidence angle δ in degrees.
    pub delta: f64,
    /// Refractive parameter of the prism.
    pub n: f64,
    /// Lower bound of the usable wavelength range.
    pub l_start: f64,
    /// Upper bound of the usable wavelength range.
    pub l_stop: f64,
}

impl Grism {
    pub fn new(
        name: impl Into<String>,
        sigma: f64,
        delta: f64,
        n: f64,
        l_start: f64,
        l_stop: f64,
    ) -> Self {
        Self {
            name: name.into(),
            sigma,
            delta,
            n,
            l_start,
            l_stop,
        }
    }

    /// The canonical cross-dispersing grism.
    pub fn g1() -> Self {
        Self::new("G1", 25.0, 6.16, 3.43, 4.9, 7.8)
    }

    /// The canonical high-order echelle grism.
    pub fn g2() -> Self {
        Self::new("G2", 87.0, 32.6, 3.43, 4.9, 7.8)
    }

    /// Dispersion angle in degrees for `wavelength` in diffraction order
    /// `order`, via the grating equation.
    ///
    /// Returns [`GrismError::BetaOutOfRange`] when the asin argument falls
    /// outside [-1, 1]; the angle is physically undefined there and must not
    /// be clamped. Callers may choose to skip such wavelengths.
    pub fn calc_beta(&self, wavelength: f64, order: f64) -> Result<f64, GrismError> {
        let arg = order * wavelength / self.sigma - self.n * self.delta.to_radians().sin();
        if !(-1.0..=1.0).contains(&arg) {
            return Err(GrismError::BetaOutOfRange {
                wavelength,
                order,
                arg,
            });
        }
        Ok(arg.asin().to_degrees() + self.delta)
    }

    /// Tangent-plane projection of a dispersion angle onto the detector,
    /// in pixels from the optical axis.
    pub fn trace_position(beta_deg: f64, focal_length_um: f64, pixel_pitch_um: f64) -> f64 {
        beta_deg.to_radians().tan() * focal_length_um / pixel_pitch_um
    }
}
