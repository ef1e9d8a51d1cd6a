//! Synthetic grism spectrograph detector frames.
//!
//! This crate fakes the raw data a grating-prism (grism) spectrograph would
//! produce for a point source observed through a slit, so that calibration
//! and reduction pipelines can be exercised before real instrument data
//! exists. A dispersed spectrum with random absorption lines is imaged onto
//! a 2D detector along each spectral order's trace, with a diffraction-limited
//! Airy point spread function, a speckled sky background, and Poisson read
//! noise.

pub mod compositor;
pub mod config;
pub mod frame;
pub mod io;
pub mod noise;
pub mod optics;
pub mod rng;
pub mod slit;
pub mod spectrum;
pub mod stack;

// Re-exports for easier access
pub use config::{OrderGeometry, SimulationConfig};
pub use optics::airy::AiryPsf;
pub use optics::grism::Grism;
pub use slit::{Slit, SlitMode};
pub use spectrum::{generate_spectrum, SpectralOrder};
pub use stack::{build_frame_stack, build_frame_stack_with_spectrum, SimulationError};
