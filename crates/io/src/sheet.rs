// In-memory single-sheet document built from CSV records

use crate::csv::CsvRecord;

pub const DEFAULT_SHEET_NAME: &str = "Sheet 1";

/// Excel sheet name maximum length.
const SHEET_NAME_MAX_LEN: usize = 31;
/// Characters Excel rejects in sheet names.
const SHEET_NAME_ILLEGAL: [char; 7] = ['*', ':', '?', '/', '\\', '[', ']'];
/// Name Excel reserves for its change history sheet.
const SHEET_NAME_RESERVED: &str = "History";

/// One column of the schema: display header and the record key it reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    pub header: String,
    pub key: String,
}

/// A single named sheet with a fixed column schema.
///
/// Cells are text; `None` is a blank cell. Every row has exactly
/// `columns().len()` cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetDocument {
    sheet_name: String,
    columns: Vec<ColumnSpec>,
    rows: Vec<Vec<Option<String>>>,
}

impl SheetDocument {
    /// Empty document: no columns, no rows.
    pub fn new(sheet_name: &str) -> Self {
        Self {
            sheet_name: sanitize_sheet_name(sheet_name),
            columns: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// Build a document from records.
    ///
    /// The schema comes from the first record's keys, in order. Later
    /// records are matched by key: missing keys leave blank cells and keys
    /// outside the schema are dropped.
    pub fn from_records(records: &[CsvRecord], sheet_name: &str) -> Self {
        let mut doc = Self::new(sheet_name);

        let Some(first) = records.first() else {
            return doc;
        };

        doc.columns = first
            .keys()
            .map(|key| ColumnSpec {
                header: key.to_string(),
                key: key.to_string(),
            })
            .collect();

        doc.rows = records
            .iter()
            .map(|record| {
                doc.columns
                    .iter()
                    .map(|col| record.get(&col.key).map(str::to_string))
                    .collect()
            })
            .collect();

        doc
    }

    /// Assemble a document from an explicit schema and positional rows.
    /// Short rows are padded with blanks, long rows truncated.
    pub fn from_parts(
        sheet_name: &str,
        columns: Vec<ColumnSpec>,
        rows: Vec<Vec<Option<String>>>,
    ) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, None);
                row
            })
            .collect();

        Self {
            sheet_name: sanitize_sheet_name(sheet_name),
            columns,
            rows,
        }
    }

    pub fn sheet_name(&self) -> &str {
        &self.sheet_name
    }

    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    pub fn headers(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.header.as_str()).collect()
    }

    pub fn rows(&self) -> &[Vec<Option<String>>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// True when there is nothing to write, not even a header row.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty() && self.rows.is_empty()
    }

    /// Cell text at (row, col), `None` for blank or out of range.
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row)?.get(col)?.as_deref()
    }
}

/// Replace illegal characters and cap to Excel's sheet name length.
///
/// Edge apostrophes are stripped; an empty result or Excel's reserved
/// `History` falls back to the default name.
pub fn sanitize_sheet_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if SHEET_NAME_ILLEGAL.contains(&c) { '_' } else { c })
        .collect();
    let capped: String = trim_sheet_name(&cleaned).chars().take(SHEET_NAME_MAX_LEN).collect();
    // Truncation can expose a trailing apostrophe
    let cleaned = trim_sheet_name(&capped);

    if cleaned.is_empty() || cleaned.eq_ignore_ascii_case(SHEET_NAME_RESERVED) {
        return DEFAULT_SHEET_NAME.to_string();
    }
    cleaned.to_string()
}

fn trim_sheet_name(name: &str) -> &str {
    name.trim_matches(|c: char| c == '\'' || c.is_whitespace())
}
