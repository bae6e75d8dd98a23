//! CSV export for the AEP distribution of a finished run.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use thiserror::Error;

use crate::analysis::AnalysisResult;

/// Column header for distribution export.
const HEADER: [&str; 2] = ["iteration", "aep_gwh"];

/// Export failure.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The destination could not be created or written.
    #[error("cannot write export: {0}")]
    Io(#[from] io::Error),
    /// The CSV writer failed.
    #[error("cannot write export: {0}")]
    Csv(#[from] csv::Error),
    /// The run carried no distribution to export.
    #[error("the analysis result has no distribution to export")]
    NoDistribution,
}

/// Exports the distribution of `result` to a CSV file at the given path.
///
/// Writes a header row followed by one row per Monte Carlo iteration, in
/// iteration order. Produces deterministic output for identical inputs.
///
/// # Errors
///
/// Returns [`ExportError::NoDistribution`] if the result has no
/// distribution, or an I/O or CSV error if writing fails.
pub fn export_csv(result: &AnalysisResult, path: &Path) -> Result<(), ExportError> {
    if result.distribution.is_none() {
        return Err(ExportError::NoDistribution);
    }
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(result, buf)
}

/// Writes the distribution as CSV to any writer.
///
/// An absent distribution writes only the header.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_csv(result: &AnalysisResult, writer: impl Write) -> Result<(), ExportError> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(HEADER)?;

    for (i, value) in result.distribution().iter().enumerate() {
        wtr.write_record(&[i.to_string(), format!("{value:.4}")])?;
    }

    wtr.flush()?;
    Ok(())
}
