//! I/O collaborators: FITS frame-stack container and spectrum text log.

pub mod fits;
pub mod spectrum_log;

pub use fits::{read_frame_stack, write_frame_stack, FitsError};
pub use spectrum_log::write_spectrum_log;
