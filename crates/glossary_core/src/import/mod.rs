//! Definition import from external files.
//!
//! # Responsibility
//! - Read delimited text and spreadsheet files into uniform tables.
//! - Map user-selected columns to phrase/meaning and preview the result.
//! - Keep the legacy fixed-column import contract for unattended imports.
//!
//! # Invariants
//! - Import never touches the tree; callers append confirmed definitions.
//! - Failures are all-or-nothing: no partial definition list is returned.

use crate::codec::CodecError;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

pub mod legacy;
pub mod preview;
pub mod table;

pub use legacy::{legacy_definitions, legacy_mapping, parse_legacy_records};
pub use preview::{preview, ColumnMapping, PreviewRow, TabularImport};
pub use table::{read_delimited, read_spreadsheet, read_table, CellValue, Table};

pub type ImportResult<T> = Result<T, ImportError>;

/// Errors from import parsing and column mapping.
#[derive(Debug)]
pub enum ImportError {
    /// Source could not be opened, read or parsed.
    ImportFailed(String),
    /// Required columns are absent from the source.
    MissingColumns {
        missing: Vec<String>,
        available: Vec<String>,
    },
    /// JSON source does not have the expected shape.
    Malformed(CodecError),
    /// Row index outside of the loaded table.
    RowOutOfRange { row: usize, len: usize },
}

impl ImportError {
    pub(crate) fn failed(message: impl Into<String>) -> Self {
        Self::ImportFailed(message.into())
    }
}

impl Display for ImportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ImportFailed(reason) => write!(f, "import failed: {reason}"),
            Self::MissingColumns { missing, available } => write!(
                f,
                "missing required columns [{}]; available columns [{}]",
                missing.join(", "),
                available.join(", ")
            ),
            Self::Malformed(err) => write!(f, "{err}"),
            Self::RowOutOfRange { row, len } => {
                write!(f, "row {row} is out of range for table with {len} rows")
            }
        }
    }
}

impl Error for ImportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Malformed(err) => Some(err),
            _ => None,
        }
    }
}

impl From<CodecError> for ImportError {
    fn from(value: CodecError) -> Self {
        Self::Malformed(value)
    }
}

/// Import source format derived from a file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// Folder document or legacy record array.
    Json,
    /// Delimited text with a header row.
    Delimited { delimiter: u8 },
    /// Workbook read through `calamine`; first worksheet only.
    Spreadsheet,
}

impl SourceFormat {
    /// Detects the format from the path extension (case-insensitive).
    pub fn from_path(path: &Path) -> ImportResult<Self> {
        let extension = path
            .extension()
            .and_then(|value| value.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match extension.as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Delimited { delimiter: b',' }),
            "tsv" | "tab" => Ok(Self::Delimited { delimiter: b'\t' }),
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Ok(Self::Spreadsheet),
            "" => Err(ImportError::failed(format!(
                "cannot detect file type of `{}`",
                path.display()
            ))),
            other => Err(ImportError::failed(format!(
                "unsupported file type `.{other}`"
            ))),
        }
    }
}
