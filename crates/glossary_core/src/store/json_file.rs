//! JSON file document store.
//!
//! # Responsibility
//! - Read and write the root folder document at one fixed path.
//!
//! # Invariants
//! - Writes go to a sibling temp file first and are renamed into place, so
//!   an interrupted save leaves the previous document intact.

use super::{DocumentStore, StoreError, StoreResult};
use crate::codec::{decode, to_pretty_json};
use crate::model::folder::Folder;
use log::{error, info};
use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Document store backed by one JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut file_name = self
            .path
            .file_name()
            .map(OsString::from)
            .unwrap_or_else(|| OsString::from("glossary"));
        file_name.push(".tmp");
        self.path.with_file_name(file_name)
    }
}

impl DocumentStore for JsonFileStore {
    fn load(&self) -> StoreResult<Option<Folder>> {
        let started_at = Instant::now();
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!("event=store_load module=store status=ok found=false");
                return Ok(None);
            }
            Err(err) => {
                error!(
                    "event=store_load module=store status=error error_code=read_failed error={}",
                    err
                );
                return Err(err.into());
            }
        };

        match decode(&text) {
            Ok(tree) => {
                info!(
                    "event=store_load module=store status=ok found=true definitions={} duration_ms={}",
                    tree.definition_count(),
                    started_at.elapsed().as_millis()
                );
                Ok(Some(tree))
            }
            Err(err) => {
                error!(
                    "event=store_load module=store status=error error_code=malformed_document error={}",
                    err
                );
                Err(err.into())
            }
        }
    }

    fn save(&mut self, tree: &Folder) -> StoreResult<()> {
        let started_at = Instant::now();
        let text = to_pretty_json(tree)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let temp_path = self.temp_path();
        let write_result = std::fs::write(&temp_path, text.as_bytes())
            .and_then(|()| std::fs::rename(&temp_path, &self.path));
        if let Err(err) = write_result {
            let _ = std::fs::remove_file(&temp_path);
            error!(
                "event=store_save module=store status=error error_code=write_failed error={}",
                err
            );
            return Err(StoreError::Io(err));
        }

        info!(
            "event=store_save module=store status=ok bytes={} duration_ms={}",
            text.len(),
            started_at.elapsed().as_millis()
        );
        Ok(())
    }
}
