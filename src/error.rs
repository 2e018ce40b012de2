//! Error types for loading, analysing and rendering sales data.

use std::path::PathBuf;
use thiserror::Error;

/// All errors produced while building a sales report.
#[derive(Error, Debug)]
pub enum SalesError {
    /// The input file does not exist.
    #[error("Input file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// A required column is absent from the header row.
    #[error("Missing required column '{0}' in header row")]
    MissingColumn(String),

    /// A date or numeric cell could not be parsed.
    #[error("Parse error at line {line}, column '{column}': {reason} (value: {value:?})")]
    Parse {
        line: u64,
        column: String,
        value: String,
        reason: String,
    },

    /// Statistics are undefined on a table with no rows.
    #[error("Cannot compute statistics: the transaction table is empty")]
    EmptyTable,

    /// A summed statistic overflowed to infinity or NaN.
    #[error("Aggregated {0} is not a finite number")]
    NonFinite(String),

    /// The chart backend failed to draw or save the image.
    #[error("Chart rendering failed: {0}")]
    Render(String),

    /// Malformed delimited text (bad quoting, ragged rows).
    #[error("Failed to read delimited input: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SalesError>;
