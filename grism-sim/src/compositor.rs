//! Frame compositing: walking each order's trace and stamping slit images.
//!
//! For every dispersion column of an order, the cross-dispersion center is
//! linearly interpolated between the trace endpoints and a slit image is
//! synthesized with that column's flux. Rendering is expressed as an indexed
//! map over columns producing `Contribution`s, followed by a serial
//! accumulation pass in column order. Each column owns an RNG stream derived
//! from (seed, frame, order, column), so the parallel render is
//! bit-reproducible regardless of thread count.

use ndarray::Array2;
use rayon::prelude::*;

use crate::frame::PaddedFrame;
use crate::optics::airy::AiryPsf;
use crate::rng::{substream, SKY_STREAM};
use crate::slit::{Slit, SlitError};
use crate::spectrum::SpectralOrder;

/// One rendered subimage awaiting accumulation at a frame position.
pub struct Contribution {
    pub center_x: f64,
    pub center_y: f64,
    pub subimage: Array2<f64>,
}

/// Shared inputs for compositing one frame.
pub struct CompositorContext<'a> {
    /// Slit with the point-source location set for this exposure.
    pub slit: &'a Slit,
    pub psf: &'a AiryPsf,
    pub wavelength_cm: f64,
    pub source_scale: f64,
    pub master_seed: u64,
    pub frame_index: u64,
}

/// Render every column of `order` into a contribution list.
///
/// The trace center for column `x` is
/// `y_left + slit_length/2 + (x - x_left) * (y_right - y_left) / span`,
/// the half-slit offset keeping the trace endpoint at the slit edge rather
/// than its middle.
pub fn render_order_contributions(
    ctx: &CompositorContext,
    order_index: usize,
    order: &SpectralOrder,
) -> Result<Vec<Contribution>, SlitError> {
    let geometry = &order.geometry;
    let span = geometry.span() as f64;
    let slope = (geometry.y_right - geometry.y_left) / span;
    let half_slit = ctx.slit.length_px / 2.0;

    order
        .flux
        .par_iter()
        .enumerate()
        .map(|(k, &y_strength)| {
            let x = geometry.x_left + k;
            let center_y = geometry.y_left + half_slit + k as f64 * slope;
            let mut rng = substream(
                ctx.master_seed,
                &[SKY_STREAM, ctx.frame_index, order_index as u64, x as u64],
            );
            let subimage =
                ctx.slit
                    .slit_image(y_strength, ctx.source_scale, ctx.psf, ctx.wavelength_cm, &mut rng)?;
            Ok(Contribution {
                center_x: x as f64,
                center_y,
                subimage,
            })
        })
        .collect()
}

/// Composite one order into the frame: parallel render, serial accumulate.
pub fn composite_order(
    frame: &mut PaddedFrame,
    ctx: &CompositorContext,
    order_index: usize,
    order: &SpectralOrder,
) -> Result<(), SlitError> {
    let contributions = render_order_contributions(ctx, order_index, order)?;
    for contribution in &contributions {
        frame.accumulate(
            contribution.center_x,
            contribution.center_y,
            contribution.subimage.view(),
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OrderGeometry;
    use crate::slit::SlitMode;
    use crate::spectrum::SpectralOrder;
    use approx::assert_relative_eq;

    fn small_context<'a>(slit: &'a Slit, psf: &'a AiryPsf) -> CompositorContext<'a> {
        // Slit and PSF borrowed; the rest is plain data.
        CompositorContext {
            slit,
            psf,
            wavelength_cm: 8e-4,
            source_scale: 500.0,
            master_seed: 11,
            frame_index: 0,
        }
    }

    fn short_order() -> SpectralOrder {
        SpectralOrder::flat(OrderGeometry {
            x_left: 4,
            x_right: 12,
            y_left: 10.0,
            y_right: 18.0,
            m: 1,
        })
    }

    #[test]
    fn one_contribution_per_column() {
        let mut slit = Slit::new(5.0, 2.0, 3.0, 3.0, SlitMode::SingleOrder);
        slit.point_source(0.5).unwrap();
        let psf = AiryPsf::default();
        let ctx = small_context(&slit, &psf);

        let contributions = render_order_contributions(&ctx, 0, &short_order()).unwrap();
        assert_eq!(contributions.len(), 8);
        assert_relative_eq!(contributions[0].center_x, 4.0);
        assert_relative_eq!(contributions[7].center_x, 11.0);
    }

    #[test]
    fn trace_centers_interpolate_linearly() {
        let mut slit = Slit::new(5.0, 2.0, 3.0, 3.0, SlitMode::SingleOrder);
        slit.point_source(0.5).unwrap();
        let psf = AiryPsf::default();
        let ctx = small_context(&slit, &psf);

        let contributions = render_order_contributions(&ctx, 0, &short_order()).unwrap();
        // slope = (18 - 10) / 8 = 1; offset by half the slit length.
        assert_relative_eq!(contributions[0].center_y, 10.0 + 2.5);
        assert_relative_eq!(contributions[3].center_y, 13.0 + 2.5);
    }

    #[test]
    fn rendering_is_reproducible_for_fixed_seed() {
        let mut slit = Slit::new(5.0, 2.0, 3.0, 3.0, SlitMode::SingleOrder);
        slit.point_source(0.25).unwrap();
        let psf = AiryPsf::default();
        let ctx = small_context(&slit, &psf);
        let order = short_order();

        let a = render_order_contributions(&ctx, 0, &order).unwrap();
        let b = render_order_contributions(&ctx, 0, &order).unwrap();
        for (ca, cb) in a.iter().zip(&b) {
            assert_eq!(ca.subimage, cb.subimage);
        }
    }

    #[test]
    fn unset_point_source_propagates() {
        let slit = Slit::new(5.0, 2.0, 3.0, 3.0, SlitMode::SingleOrder);
        let psf = AiryPsf::default();
        let ctx = small_context(&slit, &psf);
        assert!(matches!(
            render_order_contributions(&ctx, 0, &short_order()),
            Err(SlitError::ObjectLocationUnset)
        ));
    }

    #[test]
    fn composited_counts_are_non_negative() {
        let mut slit = Slit::new(5.0, 2.0, 3.0, 3.0, SlitMode::SingleOrder);
        slit.point_source(0.5).unwrap();
        let psf = AiryPsf::default();
        let ctx = small_context(&slit, &psf);

        let mut frame = PaddedFrame::new(32, 32, slit.subimage_shape());
        composite_order(&mut frame, &ctx, 0, &short_order()).unwrap();
        assert!(frame.crop().iter().all(|&v| v >= 0.0));
    }
}
