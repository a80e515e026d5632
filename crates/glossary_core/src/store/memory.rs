//! In-memory document store.
//!
//! Keeps the encoded document text so loads go through the same decoder as
//! file-backed stores.

use super::{DocumentStore, StoreResult};
use crate::codec::{decode, to_pretty_json};
use crate::model::folder::Folder;

/// Document store that keeps the serialized tree in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    document: Option<String>,
    save_count: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with raw document text.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            document: Some(text.into()),
            save_count: 0,
        }
    }

    /// Returns the last saved document text.
    pub fn text(&self) -> Option<&str> {
        self.document.as_deref()
    }

    /// Number of successful saves since creation.
    pub fn save_count(&self) -> usize {
        self.save_count
    }
}

impl DocumentStore for MemoryStore {
    fn load(&self) -> StoreResult<Option<Folder>> {
        match &self.document {
            Some(text) => Ok(Some(decode(text)?)),
            None => Ok(None),
        }
    }

    fn save(&mut self, tree: &Folder) -> StoreResult<()> {
        self.document = Some(to_pretty_json(tree)?);
        self.save_count += 1;
        Ok(())
    }
}
