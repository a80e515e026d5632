//! Tabular source readers.
//!
//! # Responsibility
//! - Turn CSV/TSV text and spreadsheet workbooks into one `Table` shape.
//! - Stringify cells with a locale-independent representation.
//!
//! # Invariants
//! - The first row of every source is the header.
//! - Short rows are padded with `CellValue::Empty` on lookup, not rejected.

use super::{ImportError, ImportResult, SourceFormat};
use calamine::{open_workbook_auto, Data, Reader};
use log::{error, info};
use std::fs::File;
use std::io::Read;
use std::path::Path;

static EMPTY_CELL: CellValue = CellValue::Empty;

/// One cell value as read from the source.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl CellValue {
    /// Returns the text form used for phrases and meanings.
    ///
    /// Floats use Rust's shortest round-trip formatting, so `3.0` becomes
    /// `3` and `0.1` stays `0.1` regardless of the host locale.
    pub fn to_text(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Text(text) => text.clone(),
            Self::Int(value) => value.to_string(),
            Self::Float(value) => value.to_string(),
            Self::Bool(value) => value.to_string(),
        }
    }

    fn from_field(field: &str) -> Self {
        if field.is_empty() {
            Self::Empty
        } else {
            Self::Text(field.to_string())
        }
    }
}

impl From<&Data> for CellValue {
    fn from(value: &Data) -> Self {
        match value {
            Data::Empty => Self::Empty,
            Data::String(text) => Self::from_field(text),
            Data::Int(value) => Self::Int(*value),
            Data::Float(value) => Self::Float(*value),
            Data::Bool(value) => Self::Bool(*value),
            other => Self::Text(other.to_string()),
        }
    }
}

/// Rows x named columns read from an import source.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl Table {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the index of the first column named exactly `name`.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    /// Returns one cell, treating cells past a short row's end as empty.
    pub fn cell(&self, row: usize, column: usize) -> &CellValue {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(column))
            .unwrap_or(&EMPTY_CELL)
    }
}

/// Reads delimited text with a header row.
pub fn read_delimited<R: Read>(reader: R, delimiter: u8) -> ImportResult<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(reader);

    let columns = reader
        .headers()
        .map_err(|err| ImportError::failed(format!("failed to read header row: {err}")))?
        .iter()
        .map(|header| header.trim().to_string())
        .collect::<Vec<_>>();

    let mut rows: Vec<Vec<CellValue>> = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record.map_err(|err| {
            ImportError::failed(format!("failed to read row {}: {err}", index + 1))
        })?;
        rows.push(record.iter().map(CellValue::from_field).collect());
    }

    Ok(Table::new(columns, rows))
}

/// Reads the first worksheet of a workbook; its first row is the header.
pub fn read_spreadsheet(path: &Path) -> ImportResult<Table> {
    let mut workbook = open_workbook_auto(path).map_err(|err| {
        ImportError::failed(format!("failed to open workbook `{}`: {err}", path.display()))
    })?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ImportError::failed("workbook has no worksheets"))?
        .map_err(|err| ImportError::failed(format!("failed to read worksheet: {err}")))?;

    let mut rows = range.rows();
    let columns: Vec<String> = match rows.next() {
        Some(header) => header
            .iter()
            .map(|cell| CellValue::from(cell).to_text().trim().to_string())
            .collect(),
        None => Vec::new(),
    };
    let rows: Vec<Vec<CellValue>> = rows
        .map(|row| row.iter().map(CellValue::from).collect())
        .collect();

    Ok(Table::new(columns, rows))
}

/// Reads any supported tabular file, dispatching on its extension.
///
/// # Errors
/// - `ImportFailed` for JSON or unknown extensions, unreadable files and
///   parse failures.
pub fn read_table(path: &Path) -> ImportResult<Table> {
    let result = match SourceFormat::from_path(path)? {
        SourceFormat::Delimited { delimiter } => File::open(path)
            .map_err(|err| {
                ImportError::failed(format!("failed to open `{}`: {err}", path.display()))
            })
            .and_then(|file| read_delimited(file, delimiter)),
        SourceFormat::Spreadsheet => read_spreadsheet(path),
        SourceFormat::Json => Err(ImportError::failed(
            "JSON files are imported as documents, not tables",
        )),
    };

    match &result {
        Ok(table) => info!(
            "event=import_table module=import status=ok rows={} columns={}",
            table.len(),
            table.columns().len()
        ),
        Err(err) => error!(
            "event=import_table module=import status=error error_code=read_failed error={}",
            err
        ),
    }
    result
}

#[cfg(test)]
mod tests {
    use super::{read_delimited, CellValue};

    #[test]
    fn cell_text_is_locale_independent() {
        assert_eq!(CellValue::Float(3.0).to_text(), "3");
        assert_eq!(CellValue::Float(0.25).to_text(), "0.25");
        assert_eq!(CellValue::Int(-7).to_text(), "-7");
        assert_eq!(CellValue::Bool(true).to_text(), "true");
        assert_eq!(CellValue::Empty.to_text(), "");
    }

    #[test]
    fn read_delimited_pads_short_rows() {
        let table = read_delimited("Word,Def\ncat,feline\ndog\n".as_bytes(), b',').unwrap();
        assert_eq!(table.columns(), ["Word", "Def"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.cell(1, 1), &CellValue::Empty);
        assert_eq!(table.cell(0, 1).to_text(), "feline");
    }

    #[test]
    fn read_delimited_supports_tabs_and_quotes() {
        let table =
            read_delimited("a\tb\n\"x, y\"\t\"line\"\"quote\"\n".as_bytes(), b'\t').unwrap();
        assert_eq!(table.cell(0, 0).to_text(), "x, y");
        assert_eq!(table.cell(0, 1).to_text(), "line\"quote");
    }
}
