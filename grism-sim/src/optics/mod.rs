//! Optical models for the spectrograph simulation.
//!
//! Contains the grating dispersion-angle model and the diffraction-limited
//! Airy point spread function renderer.

pub mod airy;
pub mod grism;

pub use airy::AiryPsf;
pub use grism::{Grism, GrismError};
