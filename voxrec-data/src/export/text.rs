//! Plain-text dump of occupancy probabilities.

use crate::{DataError, ProbabilityGrid};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

/// Write a header line followed by one `i j k p` line per voxel.
pub fn write_text_to<W: Write>(mut writer: W, grid: &ProbabilityGrid) -> Result<(), DataError> {
    let [d0, d1, d2] = grid.dims();
    writeln!(writer, "# voxrec probability grid {} {} {}", d0, d1, d2)?;
    for ((i, j, k), p) in grid.values().indexed_iter() {
        writeln!(writer, "{} {} {} {:.6}", i, j, k, p)?;
    }
    writer.flush()?;
    Ok(())
}

#[tracing::instrument(skip_all, fields(path = %path.display()))]
pub fn write_text(path: &Path, grid: &ProbabilityGrid) -> Result<(), DataError> {
    let file = File::create(path)?;
    write_text_to(BufWriter::new(file), grid)?;
    let [d0, d1, d2] = grid.dims();
    info!("Wrote voxel text dump ({}x{}x{})", d0, d1, d2);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    #[test]
    fn test_text_dump_order_and_precision() {
        let mut values = Array3::zeros((1, 2, 2));
        values[(0, 0, 1)] = 0.25;
        values[(0, 1, 1)] = 1.0;
        let grid = ProbabilityGrid::new(values);

        let mut out = Vec::new();
        write_text_to(&mut out, &grid).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(
            text,
            "# voxrec probability grid 1 2 2\n\
             0 0 0 0.000000\n\
             0 0 1 0.250000\n\
             0 1 0 0.000000\n\
             0 1 1 1.000000\n"
        );
    }

    #[test]
    fn test_write_text_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prediction.txt");
        let grid = ProbabilityGrid::new(Array3::from_elem((4, 4, 4), 0.5));

        write_text(&path, &grid).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written.lines().count(), 1 + 64);
        assert!(written.lines().skip(1).all(|l| l.ends_with(" 0.500000")));
    }
}
