//! Simulation configuration.
//!
//! Every tunable of a simulation run lives here as one explicit, validated
//! object: detector geometry, slit geometry, order traces, optics constants,
//! noise level and the master seed.

use thiserror::Error;

use crate::optics::airy::AiryPsf;
use crate::slit::{Slit, SlitMode};

/// Configuration validation errors, reported once at startup.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("detector dimensions must be positive")]
    EmptyDetector,
    #[error("no spectral orders configured")]
    NoOrders,
    #[error("order m={m} has an empty column span [{x_left}, {x_right})")]
    DegenerateOrder { m: i32, x_left: usize, x_right: usize },
    #[error("no exposure source positions configured")]
    NoExposures,
    #[error("source position {0} is outside [0, 1]")]
    PositionOutOfRange(f64),
    #[error("background mean must be positive, got {0}")]
    NonPositiveBackground(f64),
    #[error("nominal wavelength must be positive, got {0}")]
    NonPositiveWavelength(f64),
}

/// Linear trace of one spectral order across the detector.
///
/// The trace runs from `(x_left, y_left)` to `(x_right, y_right)`; columns
/// span the half-open interval `[x_left, x_right)`.
#[derive(Debug, Clone, Copy)]
pub struct OrderGeometry {
    pub x_left: usize,
    pub x_right: usize,
    pub y_left: f64,
    pub y_right: f64,
    /// Diffraction order index.
    pub m: i32,
}

impl OrderGeometry {
    /// Number of dispersion columns in this order.
    pub fn span(&self) -> usize {
        self.x_right.saturating_sub(self.x_left)
    }
}

/// Full configuration for one simulated observation run.
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    pub detector_width: usize,
    pub detector_height: usize,
    /// Slit geometry; the point-source location is set per exposure.
    pub slit: Slit,
    /// Trace geometry per spectral order.
    pub orders: Vec<OrderGeometry>,
    /// Point-source position along the slit for each exposure (nod pattern).
    pub nod_positions: Vec<f64>,
    pub psf: AiryPsf,
    /// Nominal wavelength assumed for PSF rendering, in cm.
    pub wavelength_cm: f64,
    /// Mean of the Poisson background/read-noise counts per pixel.
    pub background_mean: f64,
    /// Count scale of the point source at unit spectrum flux.
    pub source_scale: f64,
    /// Master seed; every random stream in the run derives from it.
    pub seed: u64,
}

impl SimulationConfig {
    /// Canonical cross-dispersed setup: 8 stacked orders on a 256x256
    /// detector, nodded between two source positions.
    pub fn cross_dispersed(seed: u64) -> Self {
        let x_right = [159, 255, 255, 255, 255, 255, 255, 255];
        let y_right = [233.0, 210.0, 177.0, 143.0, 110.0, 84.0, 58.0, 38.0];
        let y_left = [202.0, 162.0, 127.0, 98.0, 69.0, 46.0, 20.0, 0.0];
        let orders = (0..8)
            .map(|i| OrderGeometry {
                x_left: 0,
                x_right: x_right[i],
                y_left: y_left[i],
                y_right: y_right[i],
                m: i as i32,
            })
            .collect();
        Self::with_orders(orders, SlitMode::CrossDispersed, seed)
    }

    /// Canonical single-order setup: one flat trace spanning the detector.
    pub fn single_order(seed: u64) -> Self {
        let orders = vec![OrderGeometry {
            x_left: 0,
            x_right: 256,
            y_left: 0.0,
            y_right: 0.0,
            m: 1,
        }];
        Self::with_orders(orders, SlitMode::SingleOrder, seed)
    }

    fn with_orders(orders: Vec<OrderGeometry>, mode: SlitMode, seed: u64) -> Self {
        Self {
            detector_width: 256,
            detector_height: 256,
            slit: Slit::new(15.0, 2.0, 3.0, 3.0, mode),
            orders,
            nod_positions: vec![0.25, 0.75],
            psf: AiryPsf::default(),
            wavelength_cm: 8e-4,
            background_mean: 50.0,
            source_scale: 500.0,
            seed,
        }
    }

    /// Number of exposures in the run.
    pub fn n_frames(&self) -> usize {
        self.nod_positions.len()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.detector_width == 0 || self.detector_height == 0 {
            return Err(ConfigError::EmptyDetector);
        }
        if self.orders.is_empty() {
            return Err(ConfigError::NoOrders);
        }
        for order in &self.orders {
            if order.span() == 0 {
                return Err(ConfigError::DegenerateOrder {
                    m: order.m,
                    x_left: order.x_left,
                    x_right: order.x_right,
                });
            }
        }
        if self.nod_positions.is_empty() {
            return Err(ConfigError::NoExposures);
        }
        for &position in &self.nod_positions {
            if !(0.0..=1.0).contains(&position) {
                return Err(ConfigError::PositionOutOfRange(position));
            }
        }
        if self.background_mean <= 0.0 {
            return Err(ConfigError::NonPositiveBackground(self.background_mean));
        }
        if self.wavelength_cm <= 0.0 {
            return Err(ConfigError::NonPositiveWavelength(self.wavelength_cm));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_presets_validate() {
        assert!(SimulationConfig::cross_dispersed(1).validate().is_ok());
        assert!(SimulationConfig::single_order(1).validate().is_ok());
    }

    #[test]
    fn cross_dispersed_has_eight_orders() {
        let config = SimulationConfig::cross_dispersed(1);
        assert_eq!(config.orders.len(), 8);
        assert_eq!(config.orders[0].x_right, 159);
        assert_eq!(config.orders[7].y_left, 0.0);
    }

    #[test]
    fn degenerate_order_rejected() {
        let mut config = SimulationConfig::single_order(1);
        config.orders[0].x_right = config.orders[0].x_left;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::DegenerateOrder { .. })
        ));
    }

    #[test]
    fn out_of_range_nod_position_rejected() {
        let mut config = SimulationConfig::single_order(1);
        config.nod_positions = vec![0.25, 1.25];
        assert!(matches!(
            config.validate(),
            Err(ConfigError::PositionOutOfRange(_))
        ));
    }

    #[test]
    fn non_positive_background_rejected() {
        let mut config = SimulationConfig::single_order(1);
        config.background_mean = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositiveBackground(_))
        ));
    }
}
