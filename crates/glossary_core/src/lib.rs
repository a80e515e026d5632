//! Core domain logic for the glossary manager.
//! This crate is the single source of truth for tree invariants.

pub mod codec;
pub mod config;
pub mod flashcards;
pub mod import;
pub mod logging;
pub mod model;
pub mod search;
pub mod service;
pub mod store;

pub use codec::{CodecError, CodecResult};
pub use config::{ConfigError, GlossaryConfig};
pub use flashcards::{FlashcardSequencer, FlashcardStep};
pub use import::{
    preview, CellValue, ColumnMapping, ImportError, ImportResult, PreviewRow, SourceFormat,
    Table, TabularImport,
};
pub use logging::{default_log_level, init_logging, logging_status, LogTarget};
pub use model::definition::{Definition, DefinitionId};
pub use model::folder::{Folder, FolderKind, FolderPath, ROOT_FOLDER_NAME};
pub use search::{collect, search, CollectedDefinition, SearchScope};
pub use service::{
    GlossarySession, ImportSummary, Inconsistency, Resolution, SessionError, SessionResult,
};
pub use store::{DocumentStore, JsonFileStore, MemoryStore, StoreError, StoreResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
