// File I/O operations: CSV in, XLSX out

pub mod csv;
pub mod error;
pub mod sheet;
pub mod xlsx;

pub use crate::csv::{load_records, parse_records, read_source, CsvRecord};
pub use error::ConvertError;
pub use sheet::{ColumnSpec, SheetDocument, DEFAULT_SHEET_NAME};
pub use xlsx::{ConversionReport, XLSX_MIME_TYPE};
