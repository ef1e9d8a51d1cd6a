//! Detector frame buffer with a padding margin.
//!
//! The frame is the canonical detector region surrounded by a margin sized
//! to the slit subimage, so orders that run off the detector edge can still
//! be stamped without truncation. Subimage placement uses an odd/even-aware
//! bounding box and silently clips anything that falls outside the padded
//! buffer.

use ndarray::{s, Array2, ArrayView2};

/// Detector frame plus padding margin.
#[derive(Debug, Clone)]
pub struct PaddedFrame {
    data: Array2<f64>,
    det_width: usize,
    det_height: usize,
    /// Margin below/left of the detector origin, per axis.
    neg_x: usize,
    neg_y: usize,
}

impl PaddedFrame {
    /// Create a zeroed frame for a detector of `det_width` x `det_height`
    /// pixels, padded for subimages of `subimage_shape` (rows, cols).
    ///
    /// The margin is asymmetric for even-sized subimages: `floor(dim/2)`
    /// below/left and `floor(dim/2) + (dim mod 2)` above/right, matching the
    /// placement box.
    pub fn new(det_width: usize, det_height: usize, subimage_shape: (usize, usize)) -> Self {
        let (sub_ny, sub_nx) = subimage_shape;
        let neg_x = sub_nx / 2;
        let pos_x = sub_nx / 2 + sub_nx % 2;
        let neg_y = sub_ny / 2;
        let pos_y = sub_ny / 2 + sub_ny % 2;
        Self {
            data: Array2::zeros((det_height + neg_y + pos_y, det_width + neg_x + pos_x)),
            det_width,
            det_height,
            neg_x,
            neg_y,
        }
    }

    /// Shape (rows, cols) of the padded buffer.
    pub fn padded_shape(&self) -> (usize, usize) {
        self.data.dim()
    }

    /// Add a full-buffer field (e.g. background noise) into the frame.
    pub fn add_field(&mut self, field: &Array2<f64>) {
        debug_assert_eq!(field.dim(), self.data.dim());
        self.data += field;
    }

    /// Additively place `subimage` centered at `(center_x, center_y)` in
    /// detector coordinates.
    ///
    /// The placement box spans `floor(dim/2)` pixels below/left of the
    /// center and `floor(dim/2) + (dim mod 2)` above/right, so odd and even
    /// subimage sizes are centered consistently. Pixels outside the padded
    /// buffer are dropped.
    pub fn accumulate(&mut self, center_x: f64, center_y: f64, subimage: ArrayView2<f64>) {
        let (sub_ny, sub_nx) = subimage.dim();
        let x0 = (center_x - (sub_nx / 2) as f64).ceil() as i64;
        let y0 = (center_y - (sub_ny / 2) as f64).ceil() as i64;
        let (pad_ny, pad_nx) = self.data.dim();
        for (j, row) in subimage.outer_iter().enumerate() {
            let py = y0 + j as i64 + self.neg_y as i64;
            if py < 0 || py >= pad_ny as i64 {
                continue;
            }
            for (i, &value) in row.iter().enumerate() {
                let px = x0 + i as i64 + self.neg_x as i64;
                if px < 0 || px >= pad_nx as i64 {
                    continue;
                }
                self.data[[py as usize, px as usize]] += value;
            }
        }
    }

    /// Crop the padded buffer down to the canonical detector region.
    pub fn crop(&self) -> Array2<f64> {
        self.data
            .slice(s![
                self.neg_y..self.neg_y + self.det_height,
                self.neg_x..self.neg_x + self.det_width
            ])
            .to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::Array2;

    #[test]
    fn padding_sized_to_subimage() {
        let frame = PaddedFrame::new(256, 256, (46, 7));
        // 46 rows even: 23 + 23; 7 cols odd: 3 + 4.
        assert_eq!(frame.padded_shape(), (256 + 46, 256 + 7));
    }

    #[test]
    fn odd_subimage_centers_on_pixel() {
        let mut frame = PaddedFrame::new(16, 16, (3, 3));
        let mut sub = Array2::zeros((3, 3));
        sub[[1, 1]] = 5.0;
        frame.accumulate(8.0, 8.0, sub.view());
        let cropped = frame.crop();
        assert_relative_eq!(cropped[[8, 8]], 5.0);
        assert_relative_eq!(cropped.sum(), 5.0);
    }

    #[test]
    fn even_subimage_uses_asymmetric_box() {
        let mut frame = PaddedFrame::new(16, 16, (4, 4));
        let sub = Array2::from_elem((4, 4), 1.0);
        frame.accumulate(8.0, 8.0, sub.view());
        let cropped = frame.crop();
        // Box spans [center - 2, center + 2): rows/cols 6..=9.
        for y in 6..10 {
            for x in 6..10 {
                assert_relative_eq!(cropped[[y, x]], 1.0);
            }
        }
        assert_relative_eq!(cropped[[5, 8]], 0.0);
        assert_relative_eq!(cropped[[10, 8]], 0.0);
    }

    #[test]
    fn fractional_center_shifts_box() {
        let mut frame = PaddedFrame::new(16, 16, (3, 3));
        let sub = Array2::from_elem((3, 3), 1.0);
        // Box [4.5 - 1, 4.5 + 2) covers integer coordinates 4, 5, 6.
        frame.accumulate(4.5, 4.5, sub.view());
        let cropped = frame.crop();
        assert_relative_eq!(cropped[[4, 4]], 1.0);
        assert_relative_eq!(cropped[[6, 6]], 1.0);
        assert_relative_eq!(cropped[[3, 4]], 0.0);
        assert_relative_eq!(cropped.sum(), 9.0);
    }

    #[test]
    fn edge_placement_lands_in_padding_not_lost() {
        let mut frame = PaddedFrame::new(16, 16, (5, 5));
        let sub = Array2::from_elem((5, 5), 1.0);
        frame.accumulate(0.0, 0.0, sub.view());
        let cropped = frame.crop();
        // Only the in-detector quadrant survives the crop.
        assert_relative_eq!(cropped[[0, 0]], 1.0);
        assert_relative_eq!(cropped.sum(), 9.0);
    }

    #[test]
    fn placement_beyond_padding_is_clipped_silently() {
        let mut frame = PaddedFrame::new(16, 16, (3, 3));
        let sub = Array2::from_elem((3, 3), 1.0);
        frame.accumulate(-50.0, -50.0, sub.view());
        frame.accumulate(500.0, 500.0, sub.view());
        assert_relative_eq!(frame.crop().sum(), 0.0);
    }

    #[test]
    fn accumulation_is_additive() {
        let mut frame = PaddedFrame::new(8, 8, (3, 3));
        let sub = Array2::from_elem((3, 3), 2.0);
        frame.accumulate(4.0, 4.0, sub.view());
        frame.accumulate(4.0, 4.0, sub.view());
        assert_relative_eq!(frame.crop()[[4, 4]], 4.0);
    }
}
