//! Session persistence, export and import use-cases.
//!
//! # Invariants
//! - Loading is all-or-nothing: on failure the in-memory tree is untouched.
//! - Export always serializes from the root, whatever the navigation path.
//! - Imports land in the current folder only if it stays unmixed.

use super::error::{SessionError, SessionResult};
use super::session::{validate_definition, GlossarySession};
use crate::codec::{parse_document, to_pretty_json};
use crate::import::{legacy_definitions, parse_legacy_records, read_table, SourceFormat};
use crate::model::definition::Definition;
use crate::model::folder::Folder;
use crate::store::DocumentStore;
use log::{error, info};
use serde_json::Value;
use std::path::Path;
use std::time::Instant;

/// Counts of entries appended by one import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImportSummary {
    pub folders: usize,
    pub definitions: usize,
}

impl<S: DocumentStore> GlossarySession<S> {
    /// Writes the whole tree to the document store.
    pub fn save(&mut self) -> SessionResult<()> {
        self.store.save(&self.root).map_err(Into::into)
    }

    /// Replaces the tree with the stored document.
    ///
    /// An absent document resets to an empty root. Navigation returns to the
    /// root on success.
    pub fn reload(&mut self) -> SessionResult<()> {
        let root = self.store.load()?.unwrap_or_else(Folder::root);
        self.replace_root(root);
        Ok(())
    }

    /// Replaces the tree with one decoded from `document`.
    ///
    /// # Errors
    /// - `MalformedDocument`; the current tree is left unchanged.
    pub fn load_document(&mut self, document: &Value) -> SessionResult<()> {
        let root = Folder::from_document(document)?;
        self.replace_root(root);
        Ok(())
    }

    /// Document form of the whole tree.
    pub fn export_document(&self) -> Value {
        self.root.to_document()
    }

    /// Writes the whole tree as pretty-printed JSON to `path`.
    pub fn export_to(&self, path: &Path) -> SessionResult<()> {
        let started_at = Instant::now();
        let text = to_pretty_json(&self.root)?;
        if let Err(err) = std::fs::write(path, text.as_bytes()) {
            error!(
                "event=export module=service status=error error_code=write_failed error={}",
                err
            );
            return Err(SessionError::IoFailure(err));
        }
        info!(
            "event=export module=service status=ok definitions={} bytes={} duration_ms={}",
            self.root.definition_count(),
            text.len(),
            started_at.elapsed().as_millis()
        );
        Ok(())
    }

    /// Merges a folder document's top-level content into the current folder.
    ///
    /// The document's own `name` and `color` are ignored.
    ///
    /// # Errors
    /// - `MalformedDocument` when the document does not decode.
    /// - `InvalidOperation` when the merged current folder would be mixed.
    pub fn import_document(&mut self, document: &Value) -> SessionResult<ImportSummary> {
        self.ensure_consistent()?;
        let incoming = Folder::from_document(document)?;
        if incoming.is_mixed() {
            return Err(SessionError::InvalidOperation(
                "imported document mixes subfolders and definitions at its top level".to_string(),
            ));
        }

        let checkpoint = self.checkpoint();
        let current = self.current_mut();
        if !current.subfolders.is_empty() && !incoming.definitions.is_empty() {
            return Err(SessionError::InvalidOperation(
                "cannot import definitions here; this folder contains subfolders".to_string(),
            ));
        }
        if !current.definitions.is_empty() && !incoming.subfolders.is_empty() {
            return Err(SessionError::InvalidOperation(
                "cannot import folders here; this folder contains definitions".to_string(),
            ));
        }

        let summary = ImportSummary {
            folders: incoming.subfolders.len(),
            definitions: incoming.definitions.len(),
        };
        current.subfolders.extend(incoming.subfolders);
        current.definitions.extend(incoming.definitions);

        info!(
            "event=import_document module=service status=ok folders={} definitions={}",
            summary.folders, summary.definitions
        );
        self.refresh_inconsistencies();
        self.commit(checkpoint)?;
        Ok(summary)
    }

    /// Appends already-built definitions (e.g. a confirmed preview).
    ///
    /// # Errors
    /// - `InvalidOperation` when the current folder holds subfolders.
    /// - `InvalidDefinition` when any row has a blank phrase or meaning; no
    ///   row is appended then.
    pub fn append_definitions(&mut self, definitions: Vec<Definition>) -> SessionResult<usize> {
        self.ensure_consistent()?;
        self.ensure_accepts_definitions()?;
        if definitions.is_empty() {
            return Ok(0);
        }
        for definition in &definitions {
            validate_definition(&definition.phrase, &definition.meaning)?;
        }
        let checkpoint = self.checkpoint();
        let count = definitions.len();
        self.current_mut().definitions.extend(definitions);
        info!(
            "event=import_definitions module=service status=ok definitions={}",
            count
        );
        self.commit(checkpoint)?;
        Ok(count)
    }

    /// Imports `path` into the current folder without interactive preview.
    ///
    /// JSON objects merge as folder documents, JSON arrays are read as flat
    /// `Phrase`/`Meaning` records, and tabular files use the same fixed
    /// column names.
    pub fn import_from(&mut self, path: &Path) -> SessionResult<ImportSummary> {
        self.ensure_consistent()?;
        match SourceFormat::from_path(path)? {
            SourceFormat::Json => {
                let text = std::fs::read_to_string(path).map_err(|err| {
                    SessionError::ImportFailed(format!(
                        "failed to read `{}`: {err}",
                        path.display()
                    ))
                })?;
                let document = parse_document(&text).map_err(|err| {
                    SessionError::ImportFailed(format!(
                        "`{}` is not valid JSON: {err}",
                        path.display()
                    ))
                })?;
                if document.is_array() {
                    let definitions = parse_legacy_records(&document)?;
                    let count = self.append_definitions(definitions)?;
                    Ok(ImportSummary {
                        folders: 0,
                        definitions: count,
                    })
                } else {
                    self.import_document(&document)
                }
            }
            SourceFormat::Delimited { .. } | SourceFormat::Spreadsheet => {
                self.ensure_accepts_definitions()?;
                let table = read_table(path)?;
                let definitions = legacy_definitions(&table)?;
                let count = self.append_definitions(definitions)?;
                Ok(ImportSummary {
                    folders: 0,
                    definitions: count,
                })
            }
        }
    }

    fn ensure_accepts_definitions(&self) -> SessionResult<()> {
        if self.current().subfolders.is_empty() {
            Ok(())
        } else {
            Err(SessionError::InvalidOperation(
                "cannot import definitions here; this folder contains subfolders".to_string(),
            ))
        }
    }

    fn replace_root(&mut self, root: Folder) {
        info!(
            "event=tree_load module=service status=ok definitions={}",
            root.definition_count()
        );
        self.root = root;
        self.path.clear();
        self.refresh_inconsistencies();
    }
}
