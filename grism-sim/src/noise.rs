//! Background noise generation.
//!
//! Fills an empty frame with independent Poisson-distributed counts before
//! any signal is composited, standing in for the combined background and
//! read noise of the detector.

use ndarray::Array2;
use rand::Rng;
use rand_distr::{Distribution, Poisson};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NoiseError {
    #[error("invalid Poisson background mean: {0}")]
    InvalidMean(f64),
}

/// Generate an i.i.d. Poisson background field with the given per-pixel mean.
///
/// No correlation across pixels or frames; each call consumes exactly
/// `rows * cols` draws from the supplied RNG.
pub fn background_noise(
    shape: (usize, usize),
    mean: f64,
    rng: &mut impl Rng,
) -> Result<Array2<f64>, NoiseError> {
    let poisson = Poisson::new(mean).map_err(|_| NoiseError::InvalidMean(mean))?;
    let mut field = Array2::<f64>::zeros(shape);
    field.mapv_inplace(|_| poisson.sample(rng));
    Ok(field)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::substream;
    use approx::assert_relative_eq;

    #[test]
    fn field_has_requested_shape() {
        let mut rng = substream(1, &[]);
        let field = background_noise((10, 20), 50.0, &mut rng).unwrap();
        assert_eq!(field.dim(), (10, 20));
    }

    #[test]
    fn counts_are_non_negative() {
        let mut rng = substream(2, &[]);
        let field = background_noise((50, 50), 50.0, &mut rng).unwrap();
        assert!(field.iter().all(|&v| v >= 0.0));
    }

    #[test]
    fn mean_approaches_lambda() {
        let mut rng = substream(3, &[]);
        let field = background_noise((200, 200), 50.0, &mut rng).unwrap();
        let mean = field.mean().unwrap();
        assert_relative_eq!(mean, 50.0, epsilon = 0.5);
    }

    #[test]
    fn reproducible_with_same_seed() {
        let a = background_noise((16, 16), 50.0, &mut substream(4, &[])).unwrap();
        let b = background_noise((16, 16), 50.0, &mut substream(4, &[])).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn non_positive_mean_is_an_error() {
        let mut rng = substream(5, &[]);
        assert!(matches!(
            background_noise((4, 4), 0.0, &mut rng),
            Err(NoiseError::InvalidMean(_))
        ));
    }
}
