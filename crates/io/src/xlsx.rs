// XLSX export (rust_xlsxwriter) and read-back (calamine)

use std::io::Cursor;
use std::path::Path;
use std::time::Instant;

use calamine::{open_workbook_from_rs, Data, DataRef, Reader, Xlsx};
use rust_xlsxwriter::{Format, Workbook};

use crate::error::ConvertError;
use crate::sheet::{ColumnSpec, SheetDocument};

/// MIME type for Office Open XML spreadsheets.
pub const XLSX_MIME_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Excel worksheet maximum row count (header row included).
pub const EXCEL_MAX_ROWS: usize = 1_048_576;
/// Excel worksheet maximum column count.
pub const EXCEL_MAX_COLS: usize = 16_384;

/// Statistics for one export.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionReport {
    /// Data rows written (header row not counted)
    pub rows_written: usize,
    pub columns_written: usize,
    /// Size of the serialized workbook
    pub bytes_written: u64,
    pub duration_ms: u128,
}

impl ConversionReport {
    /// One-line summary for logs.
    pub fn summary(&self) -> String {
        format!(
            "{} rows x {} columns, {} bytes in {}ms",
            self.rows_written, self.columns_written, self.bytes_written, self.duration_ms
        )
    }
}

/// Serialize `doc` into an in-memory XLSX file.
pub fn export_to_buffer(doc: &SheetDocument) -> Result<(Vec<u8>, ConversionReport), ConvertError> {
    let start_time = Instant::now();
    let mut workbook = build_workbook(doc)?;
    let bytes = workbook.save_to_buffer()?;

    let report = ConversionReport {
        rows_written: doc.row_count(),
        columns_written: doc.column_count(),
        bytes_written: bytes.len() as u64,
        duration_ms: start_time.elapsed().as_millis(),
    };
    Ok((bytes, report))
}

/// Serialize `doc` into an XLSX file at `path`.
pub fn export_to_path(doc: &SheetDocument, path: &Path) -> Result<ConversionReport, ConvertError> {
    let start_time = Instant::now();
    let mut workbook = build_workbook(doc)?;
    workbook.save(path)?;

    Ok(ConversionReport {
        rows_written: doc.row_count(),
        columns_written: doc.column_count(),
        bytes_written: std::fs::metadata(path)?.len(),
        duration_ms: start_time.elapsed().as_millis(),
    })
}

fn build_workbook(doc: &SheetDocument) -> Result<Workbook, ConvertError> {
    check_limits(doc)?;

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(doc.sheet_name())?;

    // Empty strings go out as text-formatted blank cells so the cell (and its
    // row) survives; an unformatted blank is dropped by the writer
    let empty_text = Format::new().set_num_format("@");

    // Header row only exists when there is a schema
    for (col, spec) in doc.columns().iter().enumerate() {
        if spec.header.is_empty() {
            worksheet.write_blank(0, col as u16, &empty_text)?;
        } else {
            worksheet.write_string(0, col as u16, &spec.header)?;
        }
    }

    for (row_idx, row) in doc.rows().iter().enumerate() {
        let excel_row = (row_idx + 1) as u32;
        for (col, cell) in row.iter().enumerate() {
            match cell.as_deref() {
                None => {}
                Some("") => {
                    worksheet.write_blank(excel_row, col as u16, &empty_text)?;
                }
                Some(value) => {
                    worksheet.write_string(excel_row, col as u16, value)?;
                }
            }
        }
    }

    log::debug!(
        "built sheet '{}' with {} rows x {} columns",
        doc.sheet_name(),
        doc.row_count(),
        doc.column_count()
    );
    Ok(workbook)
}

fn check_limits(doc: &SheetDocument) -> Result<(), ConvertError> {
    if doc.column_count() > EXCEL_MAX_COLS {
        return Err(ConvertError::Limit(format!(
            "{} columns (max {})",
            doc.column_count(),
            EXCEL_MAX_COLS
        )));
    }
    if doc.row_count() + 1 > EXCEL_MAX_ROWS {
        return Err(ConvertError::Limit(format!(
            "{} data rows (max {})",
            doc.row_count(),
            EXCEL_MAX_ROWS - 1
        )));
    }
    Ok(())
}

/// Read an XLSX file back into a document.
///
/// Row 1 becomes the schema, later rows the body. Reads the named sheet, or
/// the first sheet when `sheet_name` is `None`. Cells present in the sheet
/// but holding no value (formatted blanks) read back as `Some("")`; absent
/// cells as `None`. Non-text cells are rendered with their display form.
pub fn read_from_bytes(bytes: &[u8], sheet_name: Option<&str>) -> Result<SheetDocument, ConvertError> {
    let read_err = |e: calamine::XlsxError| ConvertError::ReadBack(e.to_string());

    let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes.to_vec())).map_err(read_err)?;

    let name = match sheet_name {
        Some(name) => name.to_string(),
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| ConvertError::ReadBack("workbook has no sheets".to_string()))?,
    };

    // The cell reader, unlike worksheet_range, also yields valueless cells
    let mut cells: Vec<((usize, usize), String)> = Vec::new();
    let mut reader = workbook.worksheet_cells_reader(&name).map_err(read_err)?;
    while let Some(cell) = reader.next_cell().map_err(read_err)? {
        let (row, col) = cell.get_position();
        cells.push(((row as usize, col as usize), cell_text(cell.get_value())));
    }

    if cells.is_empty() {
        return Ok(SheetDocument::new(&name));
    }

    // Positions are absolute; the grid always starts at A1
    let height = cells.iter().map(|((row, _), _)| row + 1).max().unwrap_or(0);
    let width = cells.iter().map(|((_, col), _)| col + 1).max().unwrap_or(0);
    let mut grid: Vec<Vec<Option<String>>> = vec![vec![None; width]; height];
    for ((row, col), text) in cells {
        grid[row][col] = Some(text);
    }

    let mut grid = grid.into_iter();
    let columns = grid
        .next()
        .unwrap_or_default()
        .into_iter()
        .map(|header| {
            let header = header.unwrap_or_default();
            ColumnSpec {
                key: header.clone(),
                header,
            }
        })
        .collect();

    Ok(SheetDocument::from_parts(&name, columns, grid.collect()))
}

fn cell_text(value: &DataRef<'_>) -> String {
    match value {
        DataRef::Empty => String::new(),
        DataRef::String(s) => s.clone(),
        DataRef::SharedString(s) => s.to_string(),
        other => Data::from(other.clone()).to_string(),
    }
}
