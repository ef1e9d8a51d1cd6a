//! FITS container I/O for frame stacks.
//!
//! The stack is written as a single FITS file with one double-precision
//! image HDU per exposure, named `FRAME0`, `FRAME1`, ... in exposure order.
//! Arrays are flipped vertically on the way in and out, since the FITS
//! origin is bottom-left while ndarray's row 0 is the top.

use fitsio::compat::fitsfile::FitsFile;
use fitsio::compat::images::{ImageDescription, ImageType, ReadImage, WriteImage};
use ndarray::{s, Array2, Array3, Axis};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during FITS file operations
#[derive(Error, Debug)]
pub enum FitsError {
    #[error("FITS I/O error: {0}")]
    FitsIo(#[from] fitsio::compat::errors::Error),
    #[error("file contains no image HDUs")]
    EmptyContainer,
    #[error("HDU {0} has unexpected shape")]
    BadShape(usize),
}

/// Write a frame stack to a FITS container, one image HDU per exposure.
pub fn write_frame_stack<P: AsRef<Path>>(stack: &Array3<f64>, path: P) -> Result<(), FitsError> {
    let mut fptr = FitsFile::create(&path).overwrite().open()?;
    let (n_frames, height, width) = stack.dim();

    for frame_index in 0..n_frames {
        let name = format!("FRAME{frame_index}");
        let description = ImageDescription {
            data_type: ImageType::Double,
            dimensions: vec![width, height],
        };
        let hdu = fptr.create_image(&name, &description)?;

        let flipped = stack.slice(s![frame_index, ..;-1, ..]);
        let flat_data: Vec<f64> = flipped.iter().copied().collect();
        f64::write_image(&mut fptr, &hdu, &flat_data)?;
        hdu.write_key(&mut fptr, "EXTNAME", &name.clone())?;
    }

    Ok(())
}

/// Read a frame stack written by [`write_frame_stack`].
///
/// Frames come back in HDU order; all frames must share one shape.
pub fn read_frame_stack<P: AsRef<Path>>(path: P) -> Result<Array3<f64>, FitsError> {
    let fptr = FitsFile::open(&path)?;
    let mut frames: Vec<Array2<f64>> = Vec::new();

    let mut hdu_index = 0;
    while let Ok(hdu) = fptr.hdu(hdu_index) {
        if let Ok(image_data) = f64::read_image(&fptr, &hdu) {
            let naxis = hdu.read_key::<i64>(&fptr, "NAXIS").unwrap_or(0);
            if naxis == 2 {
                let width = hdu.read_key::<i64>(&fptr, "NAXIS1").unwrap_or(0) as usize;
                let height = hdu.read_key::<i64>(&fptr, "NAXIS2").unwrap_or(0) as usize;
                let fits_array = Array2::from_shape_vec((height, width), image_data)
                    .map_err(|_| FitsError::BadShape(hdu_index))?;
                // Back to ndarray row order.
                let flipped = fits_array.slice(s![..;-1, ..]).to_owned();
                frames.push(flipped);
            }
        }
        hdu_index += 1;
    }

    if frames.is_empty() {
        return Err(FitsError::EmptyContainer);
    }
    let (height, width) = frames[0].dim();
    let mut stack = Array3::zeros((frames.len(), height, width));
    for (frame_index, frame) in frames.iter().enumerate() {
        if frame.dim() != (height, width) {
            return Err(FitsError::BadShape(frame_index));
        }
        stack.index_axis_mut(Axis(0), frame_index).assign(frame);
    }
    Ok(stack)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::Array3;
    use tempfile::TempDir;

    #[test]
    fn stack_roundtrip() {
        let mut stack = Array3::<f64>::zeros((2, 8, 12));
        stack[[0, 0, 0]] = 1.5;
        stack[[0, 7, 11]] = 2.5;
        stack[[1, 3, 4]] = 42.0;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("stack.fits");
        write_frame_stack(&stack, &path).unwrap();
        let read_back = read_frame_stack(&path).unwrap();

        assert_eq!(read_back.dim(), (2, 8, 12));
        assert_relative_eq!(read_back[[0, 0, 0]], 1.5, epsilon = 1e-10);
        assert_relative_eq!(read_back[[0, 7, 11]], 2.5, epsilon = 1e-10);
        assert_relative_eq!(read_back[[1, 3, 4]], 42.0, epsilon = 1e-10);
    }

    #[test]
    fn single_frame_stack() {
        let stack = Array3::<f64>::from_elem((1, 4, 4), 7.0);
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("single.fits");
        write_frame_stack(&stack, &path).unwrap();
        let read_back = read_frame_stack(&path).unwrap();
        assert_eq!(read_back.dim(), (1, 4, 4));
        assert_relative_eq!(read_back.sum(), stack.sum(), epsilon = 1e-10);
    }
}
