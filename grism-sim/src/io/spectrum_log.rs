//! Text log of the synthetic input spectrum.
//!
//! The log starts with a timestamp header line followed by one
//! `column, flux, order-index` record per dispersion column per order, so
//! reduction results can be compared against the known input.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use chrono::Local;

use crate::spectrum::SpectralOrder;

pub fn write_spectrum_log<P: AsRef<Path>>(spectrum: &[SpectralOrder], path: P) -> io::Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    writeln!(writer, "{}", Local::now().format("%a, %d %b %Y %H:%M:%S %z"))?;
    for order in spectrum {
        for (column, flux) in order.columns().zip(&order.flux) {
            writeln!(writer, "{}, {}, {}", column, flux, order.geometry.m)?;
        }
    }
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OrderGeometry;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn log_has_header_and_one_record_per_column() {
        let order = SpectralOrder::flat(OrderGeometry {
            x_left: 5,
            x_right: 15,
            y_left: 0.0,
            y_right: 0.0,
            m: 3,
        });

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("spectrum.txt");
        write_spectrum_log(&[order], &path).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 11);
        assert_eq!(lines[1], "5, 1, 3");
        assert_eq!(lines[10], "14, 1, 3");
    }
}
