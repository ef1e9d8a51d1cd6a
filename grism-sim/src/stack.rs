//! Frame stack orchestration.
//!
//! Builds the full observation: one noised, composited frame per nod
//! position, cropped to the detector and collected into a 3D stack. The
//! spectrum is generated once and shared across frames; only the slit's
//! point-source location changes between exposures.

use log::{debug, info};
use ndarray::{s, Array3};
use thiserror::Error;

use crate::compositor::{composite_order, CompositorContext};
use crate::config::{ConfigError, SimulationConfig};
use crate::frame::PaddedFrame;
use crate::noise::{background_noise, NoiseError};
use crate::rng::{substream, NOISE_STREAM, SPECTRUM_STREAM};
use crate::slit::SlitError;
use crate::spectrum::{generate_spectrum, SpectralOrder};

/// Top-level errors from a simulation run.
#[derive(Error, Debug)]
pub enum SimulationError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Slit(#[from] SlitError),
    #[error(transparent)]
    Noise(#[from] NoiseError),
}

/// Generate the spectrum and build the full frame stack.
pub fn build_frame_stack(config: &SimulationConfig) -> Result<Array3<f64>, SimulationError> {
    config.validate()?;
    let mut rng = substream(config.seed, &[SPECTRUM_STREAM]);
    let spectrum = generate_spectrum(&config.orders, &mut rng);
    build_frame_stack_with_spectrum(config, &spectrum)
}

/// Build the frame stack for an already-generated spectrum.
///
/// The stack has shape `(n_frames, detector_height, detector_width)`; all
/// counts are non-negative.
pub fn build_frame_stack_with_spectrum(
    config: &SimulationConfig,
    spectrum: &[SpectralOrder],
) -> Result<Array3<f64>, SimulationError> {
    config.validate()?;
    let subimage_shape = config.slit.subimage_shape();
    let mut stack = Array3::zeros((
        config.n_frames(),
        config.detector_height,
        config.detector_width,
    ));

    for (frame_index, &position) in config.nod_positions.iter().enumerate() {
        let mut slit = config.slit.clone();
        slit.point_source(position)?;

        let mut frame = PaddedFrame::new(
            config.detector_width,
            config.detector_height,
            subimage_shape,
        );
        let mut noise_rng = substream(config.seed, &[NOISE_STREAM, frame_index as u64]);
        let noise = background_noise(frame.padded_shape(), config.background_mean, &mut noise_rng)?;
        frame.add_field(&noise);

        let ctx = CompositorContext {
            slit: &slit,
            psf: &config.psf,
            wavelength_cm: config.wavelength_cm,
            source_scale: config.source_scale,
            master_seed: config.seed,
            frame_index: frame_index as u64,
        };
        for (order_index, order) in spectrum.iter().enumerate() {
            composite_order(&mut frame, &ctx, order_index, order)?;
            debug!(
                "frame {frame_index}: composited order m={} over [{}, {})",
                order.geometry.m, order.geometry.x_left, order.geometry.x_right
            );
        }

        stack
            .slice_mut(s![frame_index, .., ..])
            .assign(&frame.crop());
        info!("frame {frame_index} complete (source at {position} along the slit)");
    }

    Ok(stack)
}
