//! Synthetic spectrum generation.
//!
//! Each spectral order gets a flat unit continuum with a random number of
//! Gaussian absorption-line dips multiplied in. Lines compound
//! multiplicatively, so overlapping lines deepen jointly and the continuum
//! always stays within [0, 1].

use rand::Rng;

use crate::config::OrderGeometry;

/// Upper bound (exclusive) on the number of absorption lines per order.
pub const MAX_ABSORPTION_LINES: u32 = 30;

/// One spectral order's trace geometry and per-column flux.
#[derive(Debug, Clone)]
pub struct SpectralOrder {
    pub geometry: OrderGeometry,
    /// Continuum flux per dispersion column, indexed from `x_left`.
    pub flux: Vec<f64>,
}

impl SpectralOrder {
    /// An order with a flat unit continuum and no lines.
    pub fn flat(geometry: OrderGeometry) -> Self {
        Self {
            flux: vec![1.0; geometry.span()],
            geometry,
        }
    }

    /// Dispersion columns covered by this order, aligned with `flux`.
    pub fn columns(&self) -> impl Iterator<Item = usize> {
        self.geometry.x_left..self.geometry.x_right
    }
}

/// Multiply a unit-width Gaussian absorption profile into the continuum.
fn apply_absorption_line(flux: &mut [f64], x_left: usize, center: f64, strength: f64) {
    for (k, f) in flux.iter_mut().enumerate() {
        let col = (x_left + k) as f64;
        *f *= 1.0 - strength * (-(col - center).powi(2) / 2.0).exp();
    }
}

/// Generate the synthetic spectrum for every order.
///
/// Per order: a uniform integer line count in `[0, MAX_ABSORPTION_LINES)`,
/// then per line a uniform strength in `[0, 1)` and a uniform center within
/// the order's column span. All spectrum draws happen here, before any
/// frame-level randomness, as part of the fixed draw ordering.
pub fn generate_spectrum(orders: &[OrderGeometry], rng: &mut impl Rng) -> Vec<SpectralOrder> {
    orders
        .iter()
        .map(|&geometry| {
            let mut flux = vec![1.0; geometry.span()];
            let nlines = rng.random_range(0..MAX_ABSORPTION_LINES);
            for _ in 0..nlines {
                let line_strength: f64 = rng.random();
                let line_center =
                    rng.random::<f64>() * geometry.span() as f64 + geometry.x_left as f64;
                apply_absorption_line(&mut flux, geometry.x_left, line_center, line_strength);
            }
            SpectralOrder { geometry, flux }
        })
        .collect()
}
