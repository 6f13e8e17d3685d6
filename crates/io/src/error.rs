//! Error type shared by every conversion stage.

use std::path::PathBuf;

/// Failure while loading, parsing, building or serializing a sheet.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    /// CSV source missing or unreadable
    #[error("failed to read CSV source {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Malformed CSV text
    #[error("failed to parse CSV: {0}")]
    Parse(#[from] ::csv::Error),
    /// Sheet does not fit into an Excel worksheet
    #[error("sheet exceeds Excel limits: {0}")]
    Limit(String),
    /// rust_xlsxwriter rejected the workbook
    #[error("failed to write XLSX: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
    /// calamine could not read a workbook back
    #[error("failed to read XLSX: {0}")]
    ReadBack(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
