//! Generate fake grism spectrograph data.
//!
//! Produces a FITS stack of nodded detector frames plus a text log of the
//! synthetic input spectrum, for exercising reduction pipelines.
//!
//! # Usage
//!
//! ```bash
//! # Canonical cross-dispersed observation, two nod positions
//! cargo run --release --bin fake_grism_data -- -o g1xg2_fake_data.fits
//!
//! # Single-order mode with a fixed seed for reproducible output
//! cargo run --release --bin fake_grism_data -- -m single --seed 42
//! ```

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::{debug, info, warn};
use rand::RngCore;

use grism_sim::io::{write_frame_stack, write_spectrum_log};
use grism_sim::rng::{substream, SPECTRUM_STREAM};
use grism_sim::{build_frame_stack_with_spectrum, generate_spectrum, Grism, SimulationConfig};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    /// One order spanning the full dispersion axis
    Single,
    /// Eight stacked cross-dispersed orders
    Cross,
}

#[derive(Parser, Debug)]
#[command(about = "Generate synthetic grism spectrograph detector frames")]
struct Args {
    /// Output FITS file for the frame stack
    #[arg(short, long, default_value = "fake_grism_data.fits")]
    output: PathBuf,

    /// Text file in which to store the input spectrum
    #[arg(short, long, default_value = "input_spectrum.txt")]
    spectrum_log: PathBuf,

    /// Dispersion mode preset
    #[arg(short, long, value_enum, default_value_t = ModeArg::Cross)]
    mode: ModeArg,

    /// Master seed; random when omitted (the chosen value is logged)
    #[arg(long)]
    seed: Option<u64>,

    /// Source positions along the slit, one exposure each
    #[arg(long, value_delimiter = ',', default_values_t = vec![0.25, 0.75])]
    nod_positions: Vec<f64>,

    /// Point-source count scale at unit spectrum flux
    #[arg(long, default_value_t = 500.0)]
    source_scale: f64,
}

/// Focal length of the canonical camera, in microns.
const FOCAL_LENGTH_UM: f64 = 1.5748e5;
/// Detector pixel pitch, in microns.
const PIXEL_PITCH_UM: f64 = 50.0;

fn log_dispersion_layout() {
    // Sanity report of the grating model over each grism's usable band.
    for grism in [Grism::g1(), Grism::g2()] {
        let order = if grism.name == "G2" { 16.0 } else { 1.0 };
        for wavelength in [grism.l_start, grism.l_stop] {
            match grism.calc_beta(wavelength, order) {
                Ok(beta) => {
                    let pixel = Grism::trace_position(beta, FOCAL_LENGTH_UM, PIXEL_PITCH_UM);
                    debug!(
                        "{} beta({wavelength} um, m={order}) = {beta:.3} deg -> {pixel:.1} px",
                        grism.name
                    );
                }
                Err(err) => warn!("{} dispersion out of range: {err}", grism.name),
            }
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let seed = args.seed.unwrap_or_else(|| rand::rng().next_u64());
    info!("master seed: {seed}");

    let mut config = match args.mode {
        ModeArg::Single => SimulationConfig::single_order(seed),
        ModeArg::Cross => SimulationConfig::cross_dispersed(seed),
    };
    config.nod_positions = args.nod_positions;
    config.source_scale = args.source_scale;
    config.validate()?;
    info!(
        "{:?} slit, {} orders, {} exposures",
        config.slit.mode,
        config.orders.len(),
        config.n_frames()
    );

    log_dispersion_layout();

    let spectrum = generate_spectrum(&config.orders, &mut substream(seed, &[SPECTRUM_STREAM]));
    write_spectrum_log(&spectrum, &args.spectrum_log)?;
    info!("wrote input spectrum to {}", args.spectrum_log.display());

    let stack = build_frame_stack_with_spectrum(&config, &spectrum)?;
    write_frame_stack(&stack, &args.output)?;
    info!(
        "wrote {} frames of {}x{} to {}",
        stack.dim().0,
        config.detector_height,
        config.detector_width,
        args.output.display()
    );

    Ok(())
}
