// CSV import: header row + data rows into keyed records

use std::io::Read;
use std::path::Path;

use crate::error::ConvertError;

/// One CSV data row, keyed by header, in header order.
///
/// All values stay text. A header that appears twice keeps its first
/// position and the value of its last occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvRecord {
    fields: Vec<(String, String)>,
}

impl CsvRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` to `value`, keeping the key's original position if present.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for CsvRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = CsvRecord::new();
        for (k, v) in iter {
            record.insert(k, v);
        }
        record
    }
}

/// Read the CSV source as text.
///
/// Tries UTF-8 first and falls back to Windows-1252 (common for
/// Excel-exported CSVs). A leading BOM is dropped.
pub fn read_source(path: &Path) -> Result<String, ConvertError> {
    let read_err = |source| ConvertError::Read {
        path: path.to_path_buf(),
        source,
    };

    let mut file = std::fs::File::open(path).map_err(read_err)?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes).map_err(read_err)?;

    let text = match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => {
            let bytes = e.into_bytes();
            log::debug!("{} is not UTF-8, decoding as Windows-1252", path.display());
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            decoded.into_owned()
        }
    };

    Ok(match text.strip_prefix('\u{feff}') {
        Some(rest) => rest.to_string(),
        None => text,
    })
}

/// Parse comma-delimited text with a header row into records.
///
/// Empty lines are skipped, so the first non-empty line is the header.
/// Every data row must have as many fields as the header. Empty text
/// yields no records.
pub fn parse_records(content: &str) -> Result<Vec<CsvRecord>, ConvertError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b',')
        .has_headers(true)
        .flexible(false)
        .from_reader(content.as_bytes());

    let headers = reader.headers()?.clone();
    let mut records = Vec::new();

    for result in reader.records() {
        let row = result?;
        records.push(headers.iter().zip(row.iter()).collect::<CsvRecord>());
    }

    Ok(records)
}

/// Read and parse a CSV file in one step.
pub fn load_records(path: &Path) -> Result<Vec<CsvRecord>, ConvertError> {
    let content = read_source(path)?;
    parse_records(&content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_parse_two_rows() {
        let records = parse_records("a,b\n1,2\n3,4").unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], CsvRecord::from_iter([("a", "1"), ("b", "2")]));
        assert_eq!(records[1], CsvRecord::from_iter([("a", "3"), ("b", "4")]));
    }

    #[test]
    fn test_parse_keeps_header_order() {
        let records = parse_records("zeta,alpha,mid\nz,a,m\n").unwrap();
        let keys: Vec<&str> = records[0].keys().collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_parse_values_stay_text() {
        let records = parse_records("id,price,date\n007,1e3,2024-01-01\n").unwrap();
        assert_eq!(records[0].get("id"), Some("007"));
        assert_eq!(records[0].get("price"), Some("1e3"));
        assert_eq!(records[0].get("date"), Some("2024-01-01"));
    }

    #[test]
    fn test_parse_skips_empty_lines() {
        let records = parse_records("\n\nname,age\n\nAlice,30\n\n\nBob,25\n\n").unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("name"), Some("Alice"));
        assert_eq!(records[1].get("name"), Some("Bob"));
    }

    #[test]
    fn test_parse_quoted_fields() {
        let records = parse_records("name,address\n\"Doe, Jane\",\"12 \"\"Main\"\" St\"\n").unwrap();
        assert_eq!(records[0].get("name"), Some("Doe, Jane"));
        assert_eq!(records[0].get("address"), Some("12 \"Main\" St"));
    }

    #[test]
    fn test_parse_crlf_line_endings() {
        let records = parse_records("a,b\r\n1,2\r\n").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("b"), Some("2"));
    }

    #[test]
    fn test_parse_empty_text_yields_nothing() {
        assert!(parse_records("").unwrap().is_empty());
    }

    #[test]
    fn test_parse_header_only_yields_nothing() {
        assert!(parse_records("a,b,c\n").unwrap().is_empty());
    }

    #[test]
    fn test_parse_ragged_row_is_error() {
        let err = parse_records("a,b\n1,2,3\n").unwrap_err();
        assert!(matches!(err, ConvertError::Parse(_)), "got {err:?}");
    }

    #[test]
    fn test_duplicate_header_keeps_first_position_last_value() {
        let records = parse_records("a,b,a\n1,2,3\n").unwrap();
        let keys: Vec<&str> = records[0].keys().collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(records[0].get("a"), Some("3"));
    }

    #[test]
    fn test_read_source_missing_file() {
        let dir = tempdir().unwrap();
        let err = read_source(&dir.path().join("absent.csv")).unwrap_err();
        assert!(matches!(err, ConvertError::Read { .. }), "got {err:?}");
        assert!(err.to_string().contains("absent.csv"));
    }

    #[test]
    fn test_read_source_strips_bom() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bom.csv");
        fs::write(&path, "\u{feff}name,age\nAlice,30\n").unwrap();

        let records = load_records(&path).unwrap();
        assert_eq!(records[0].get("name"), Some("Alice"));
    }

    #[test]
    fn test_read_source_windows_1252_fallback() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("latin.csv");
        // "café" with 0xE9 as the Windows-1252 e-acute
        fs::write(&path, b"word\ncaf\xe9\n").unwrap();

        let records = load_records(&path).unwrap();
        assert_eq!(records[0].get("word"), Some("café"));
    }

    #[test]
    fn test_read_source_empty_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        fs::write(&path, "").unwrap();

        assert_eq!(read_source(&path).unwrap(), "");
        assert!(load_records(&path).unwrap().is_empty());
    }
}
