//! Session-level error taxonomy.

use crate::codec::CodecError;
use crate::import::ImportError;
use crate::store::StoreError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type SessionResult<T> = Result<T, SessionError>;

/// Errors reported by [`GlossarySession`](super::GlossarySession) operations.
///
/// Every variant is recoverable; the session stays usable afterwards.
#[derive(Debug)]
pub enum SessionError {
    /// Mutation would put subfolders and definitions in one folder.
    InvalidOperation(String),
    /// Persisted or imported document has the wrong shape.
    MalformedDocument(CodecError),
    /// Import source lacks required phrase/meaning fields.
    MissingColumns {
        missing: Vec<String>,
        available: Vec<String>,
    },
    /// Import source could not be read or parsed.
    ImportFailed(String),
    /// Save or export write failed.
    IoFailure(std::io::Error),
    /// No child folder with this name under the current folder.
    FolderNotFound(String),
    /// No definition matches the phrase or id in the current folder.
    DefinitionNotFound(String),
    /// Folder name is blank after trim.
    InvalidName,
    /// Phrase or meaning is blank.
    InvalidDefinition(&'static str),
    /// Color is not a `#RRGGBB` hex string.
    InvalidColor(String),
    /// Mixed folders are pending resolution; mutations are blocked.
    Inconsistent { count: usize },
    /// Flashcards requested for a subtree without definitions.
    NoDefinitions,
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidOperation(reason) => write!(f, "invalid operation: {reason}"),
            Self::MalformedDocument(err) => write!(f, "{err}"),
            Self::MissingColumns { missing, available } => write!(
                f,
                "missing required columns [{}]; available columns [{}]",
                missing.join(", "),
                available.join(", ")
            ),
            Self::ImportFailed(reason) => write!(f, "import failed: {reason}"),
            Self::IoFailure(err) => write!(f, "write failed: {err}"),
            Self::FolderNotFound(name) => write!(f, "folder not found: `{name}`"),
            Self::DefinitionNotFound(target) => write!(f, "definition not found: `{target}`"),
            Self::InvalidName => write!(f, "folder name must not be blank"),
            Self::InvalidDefinition(field) => write!(f, "definition {field} must not be blank"),
            Self::InvalidColor(value) => {
                write!(f, "invalid color `{value}`; expected #RRGGBB")
            }
            Self::Inconsistent { count } => write!(
                f,
                "{count} folder(s) contain both subfolders and definitions; resolve them first"
            ),
            Self::NoDefinitions => write!(f, "no definitions available for flashcards"),
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::MalformedDocument(err) => Some(err),
            Self::IoFailure(err) => Some(err),
            _ => None,
        }
    }
}

impl From<CodecError> for SessionError {
    fn from(value: CodecError) -> Self {
        Self::MalformedDocument(value)
    }
}

impl From<StoreError> for SessionError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Io(err) => Self::IoFailure(err),
            StoreError::Malformed(err) => Self::MalformedDocument(err),
        }
    }
}

impl From<ImportError> for SessionError {
    fn from(value: ImportError) -> Self {
        match value {
            ImportError::ImportFailed(reason) => Self::ImportFailed(reason),
            ImportError::MissingColumns { missing, available } => {
                Self::MissingColumns { missing, available }
            }
            ImportError::Malformed(err) => Self::MalformedDocument(err),
            other @ ImportError::RowOutOfRange { .. } => Self::ImportFailed(other.to_string()),
        }
    }
}
