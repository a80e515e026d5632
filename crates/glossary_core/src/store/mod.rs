//! Document persistence abstractions and implementations.
//!
//! # Responsibility
//! - Define the load/save contract the session uses for the whole tree.
//! - Keep file system details out of service orchestration.
//!
//! # Invariants
//! - A missing persisted document is `Ok(None)`, never an error.
//! - `save` replaces the stored document wholesale.
//! - A failed `load` never hands back a partially decoded tree.

use crate::codec::CodecError;
use crate::model::folder::Folder;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod json_file;
mod memory;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Errors from document store operations.
#[derive(Debug)]
pub enum StoreError {
    /// Reading or writing the backing medium failed.
    Io(std::io::Error),
    /// Stored bytes are not a valid folder document.
    Malformed(CodecError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "document store i/o failed: {err}"),
            Self::Malformed(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Malformed(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<CodecError> for StoreError {
    fn from(value: CodecError) -> Self {
        Self::Malformed(value)
    }
}

/// Persistence contract for the serialized root folder.
pub trait DocumentStore {
    /// Loads the persisted tree, or `None` when nothing was saved yet.
    fn load(&self) -> StoreResult<Option<Folder>>;
    /// Replaces the persisted tree with `tree`.
    fn save(&mut self, tree: &Folder) -> StoreResult<()>;
}
