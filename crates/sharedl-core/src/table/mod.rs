//! Tabular decoding boundary: bytes in, table out.
//!
//! The format is chosen by the caller from a filename hint, content type or
//! magic bytes. Delimited text goes through `csv`, workbooks through
//! `calamine`; both end up as the same header-plus-rows [`Table`].

mod delimited;
mod workbook;

use std::fmt;
use thiserror::Error;

const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
const OLE_MAGIC: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Csv,
    Spreadsheet,
}

impl fmt::Display for TableFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableFormat::Csv => f.write_str("csv"),
            TableFormat::Spreadsheet => f.write_str("spreadsheet"),
        }
    }
}

#[derive(Debug, Error)]
#[error("could not decode {bytes} bytes as {format}: {reason}")]
pub struct ParseError {
    pub format: TableFormat,
    pub bytes: usize,
    pub reason: String,
}

/// Rows with a header row; every row has the header's width.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name.trim()))
    }

    /// Rows whose cell in `column` parses as a number, labelled by `label_column`
    /// (or the 1-based row number).
    pub fn numeric_series(&self, column: usize, label_column: Option<usize>) -> Vec<(String, f64)> {
        self.rows
            .iter()
            .enumerate()
            .filter_map(|(i, row)| {
                let value = parse_number(row.get(column)?)?;
                let label = label_column
                    .and_then(|l| row.get(l).cloned())
                    .unwrap_or_else(|| (i + 1).to_string());
                Some((label, value))
            })
            .collect()
    }

    /// First column where every non-empty cell is numeric.
    pub fn first_numeric_column(&self) -> Option<usize> {
        (0..self.headers.len()).find(|&c| {
            let mut cells = self
                .rows
                .iter()
                .filter_map(|r| r.get(c))
                .filter(|v| !v.trim().is_empty())
                .peekable();
            cells.peek().is_some() && cells.all(|v| parse_number(v).is_some())
        })
    }
}

/// First non-blank record becomes the header row; every row is padded to the widest record.
fn from_records(mut records: Vec<Vec<String>>) -> Result<Table, String> {
    records.retain(|r| r.iter().any(|c| !c.trim().is_empty()));
    if records.is_empty() {
        return Err("no header row".to_string());
    }

    let mut headers = records.remove(0);
    let width = records.iter().map(Vec::len).max().unwrap_or(0).max(headers.len());
    while headers.len() < width {
        headers.push(format!("column {}", headers.len() + 1));
    }
    for row in &mut records {
        row.resize(width, String::new());
    }

    Ok(Table {
        headers,
        rows: records,
    })
}

/// Accepts `1234`, `-1.5`, `1,234.5` and `1 234,5`.
fn parse_number(cell: &str) -> Option<f64> {
    let s = cell.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(v) = s.parse::<f64>() {
        return Some(v);
    }
    let compact: String = s.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.contains('.') {
        compact.replace(',', "").parse().ok()
    } else {
        compact.replace(',', ".").parse().ok()
    }
}

/// Picks a decoder from the filename extension, then content type, then magic bytes.
pub fn detect_format(filename: Option<&str>, content_type: Option<&str>, bytes: &[u8]) -> TableFormat {
    if let Some(ext) = filename
        .and_then(|n| n.rsplit_once('.'))
        .map(|(_, ext)| ext.to_ascii_lowercase())
    {
        match ext.as_str() {
            "csv" | "tsv" | "txt" => return TableFormat::Csv,
            "xlsx" | "xlsm" | "xls" | "ods" => return TableFormat::Spreadsheet,
            _ => {}
        }
    }
    if let Some(ct) = content_type.map(str::to_ascii_lowercase) {
        if ct.contains("csv") || ct.starts_with("text/") {
            return TableFormat::Csv;
        }
        if ct.contains("spreadsheet") || ct.contains("ms-excel") {
            return TableFormat::Spreadsheet;
        }
    }
    if bytes.starts_with(ZIP_MAGIC) || bytes.starts_with(OLE_MAGIC) {
        TableFormat::Spreadsheet
    } else {
        TableFormat::Csv
    }
}

pub fn decode(bytes: &[u8], format: TableFormat) -> Result<Table, ParseError> {
    let fail = |reason: String| ParseError {
        format,
        bytes: bytes.len(),
        reason,
    };
    match format {
        TableFormat::Csv => delimited::decode(bytes).map_err(fail),
        TableFormat::Spreadsheet => workbook::decode(bytes).map_err(fail),
    }
}
