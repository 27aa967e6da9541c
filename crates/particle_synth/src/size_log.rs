//! Append-only log of accepted particle radii.
//!
//! The on-disk format is a header-less, one-column CSV with one radius per row. Rows are
//! flushed as they are appended so the file is always well-formed for readers such as
//! [`crate::diagnostics::AreaHistogram`].
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

use crate::error::{Error, Result};

/// Destination for accepted particle radii.
pub trait SizeLog {
    fn append(&mut self, radius: u32) -> Result<()>;

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

/// A no-op size log.
impl SizeLog for () {
    #[inline]
    fn append(&mut self, _radius: u32) -> Result<()> {
        Ok(())
    }
}

/// Collects radii in memory.
impl SizeLog for Vec<u32> {
    fn append(&mut self, radius: u32) -> Result<()> {
        self.push(radius);
        Ok(())
    }
}

/// CSV-backed size log.
pub struct CsvSizeLog<W: Write> {
    writer: csv::Writer<W>,
    rows: usize,
}

impl CsvSizeLog<File> {
    /// Opens `path` for appending, creating it if missing.
    pub fn append_to(path: impl AsRef<Path>) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path.as_ref())?;
        Ok(Self::from_writer(file))
    }
}

impl<W: Write> CsvSizeLog<W> {
    pub fn from_writer(writer: W) -> Self {
        Self {
            writer: csv::WriterBuilder::new()
                .has_headers(false)
                .from_writer(writer),
            rows: 0,
        }
    }

    /// Rows appended through this handle.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Flushes and returns the underlying writer.
    pub fn into_inner(self) -> Result<W> {
        self.writer.into_inner().map_err(|e| {
            Error::Io(std::io::Error::new(e.error().kind(), e.error().to_string()))
        })
    }
}

impl<W: Write> SizeLog for CsvSizeLog<W> {
    fn append(&mut self, radius: u32) -> Result<()> {
        self.writer.write_record([radius.to_string()])?;
        self.writer.flush()?;
        self.rows += 1;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Reads every radius from a size log. Blank lines are skipped.
///
/// Fails on the first row that is not a single positive finite number.
pub fn read_size_log(path: impl AsRef<Path>) -> Result<Vec<f64>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path.as_ref())?;

    let mut radii = Vec::new();
    for record in reader.records() {
        let record = record?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let field = match record.get(0).map(str::trim) {
            Some(f) if !f.is_empty() => f,
            _ => continue,
        };
        if record.len() > 1 {
            return Err(Error::SizeLog {
                line,
                message: format!("expected one column, found {}", record.len()),
            });
        }
        let value: f64 = field.parse().map_err(|_| Error::SizeLog {
            line,
            message: format!("'{field}' is not a number"),
        })?;
        if !value.is_finite() || value <= 0.0 {
            return Err(Error::SizeLog {
                line,
                message: format!("radius must be a positive number, got {value}"),
            });
        }
        radii.push(value);
    }
    Ok(radii)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_log_writes_one_row_per_radius() {
        let mut log = CsvSizeLog::from_writer(Vec::new());
        for r in [20, 33, 40] {
            log.append(r).unwrap();
        }
        assert_eq!(log.rows(), 3);
        let bytes = log.into_inner().unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), "20\n33\n40\n");
    }

    #[test]
    fn append_to_appends_across_handles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sizes.csv");

        let mut first = CsvSizeLog::append_to(&path).unwrap();
        first.append(21).unwrap();
        drop(first);

        let mut second = CsvSizeLog::append_to(&path).unwrap();
        second.append(22).unwrap();
        second.append(23).unwrap();
        drop(second);

        assert_eq!(read_size_log(&path).unwrap(), vec![21.0, 22.0, 23.0]);
    }

    #[test]
    fn rows_are_visible_before_drop() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sizes.csv");
        let mut log = CsvSizeLog::append_to(&path).unwrap();
        log.append(30).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "30\n");
    }

    #[test]
    fn read_skips_blank_lines_and_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.csv");
        std::fs::write(&good, "20\n\n35\n").unwrap();
        assert_eq!(read_size_log(&good).unwrap(), vec![20.0, 35.0]);

        let bad = dir.path().join("bad.csv");
        std::fs::write(&bad, "20\nabc\n").unwrap();
        assert!(matches!(
            read_size_log(&bad),
            Err(Error::SizeLog { line: 2, .. })
        ));

        let negative = dir.path().join("neg.csv");
        std::fs::write(&negative, "-4\n").unwrap();
        assert!(matches!(read_size_log(&negative), Err(Error::SizeLog { .. })));
    }

    #[test]
    fn vec_and_unit_logs() {
        let mut v: Vec<u32> = Vec::new();
        SizeLog::append(&mut v, 5).unwrap();
        SizeLog::flush(&mut v).unwrap();
        assert_eq!(v, vec![5]);

        SizeLog::append(&mut (), 5).unwrap();
    }
}
