//! Column mapping and row selection for tabular imports.
//!
//! # Responsibility
//! - Resolve phrase/meaning column selections against a table.
//! - Derive preview rows on demand from the live selection.
//! - Emit definitions for included rows on confirmation.
//!
//! # Invariants
//! - `preview` is pure; calling it again after a mapping change re-derives
//!   every row from the table.
//! - Row include flags are independent of the mapping and survive changes.

use super::legacy::{LEGACY_MEANING_COLUMNS, LEGACY_PHRASE_COLUMNS};
use super::table::{read_table, Table};
use super::{ImportError, ImportResult};
use crate::model::definition::Definition;
use log::info;
use std::path::Path;

/// Selected source columns for the two definition roles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMapping {
    pub phrase: String,
    pub meaning: String,
}

impl ColumnMapping {
    pub fn new(phrase: impl Into<String>, meaning: impl Into<String>) -> Self {
        Self {
            phrase: phrase.into(),
            meaning: meaning.into(),
        }
    }

    /// Resolves both columns to indices.
    ///
    /// # Errors
    /// - `MissingColumns` listing every selected column the table lacks.
    pub fn resolve(&self, table: &Table) -> ImportResult<(usize, usize)> {
        let phrase = table.column_index(&self.phrase);
        let meaning = table.column_index(&self.meaning);
        match (phrase, meaning) {
            (Some(phrase), Some(meaning)) => Ok((phrase, meaning)),
            _ => {
                let mut missing = Vec::new();
                if phrase.is_none() {
                    missing.push(self.phrase.clone());
                }
                if meaning.is_none() && self.meaning != self.phrase {
                    missing.push(self.meaning.clone());
                }
                Err(ImportError::MissingColumns {
                    missing,
                    available: table.columns().to_vec(),
                })
            }
        }
    }
}

/// One previewed table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewRow {
    /// Zero-based data row index (header excluded).
    pub index: usize,
    pub phrase: String,
    pub meaning: String,
    pub included: bool,
}

/// Derives preview rows for `mapping`, every row included.
pub fn preview(table: &Table, mapping: &ColumnMapping) -> ImportResult<Vec<PreviewRow>> {
    let (phrase_column, meaning_column) = mapping.resolve(table)?;
    Ok((0..table.len())
        .map(|index| PreviewRow {
            index,
            phrase: table.cell(index, phrase_column).to_text(),
            meaning: table.cell(index, meaning_column).to_text(),
            included: true,
        })
        .collect())
}

/// Interactive import state: table, live column mapping and row flags.
#[derive(Debug, Clone)]
pub struct TabularImport {
    table: Table,
    mapping: ColumnMapping,
    included: Vec<bool>,
}

impl TabularImport {
    /// Starts an import over `table` with a default mapping.
    ///
    /// The default prefers columns named like the legacy `Phrase`/`Meaning`
    /// contract, then falls back to the first and second column.
    ///
    /// # Errors
    /// - `MissingColumns` when the table has no columns at all.
    pub fn new(table: Table) -> ImportResult<Self> {
        let mapping = default_mapping(&table)?;
        let included = vec![true; table.len()];
        Ok(Self {
            table,
            mapping,
            included,
        })
    }

    /// Reads `path` and starts an import over it.
    pub fn open(path: &Path) -> ImportResult<Self> {
        Self::new(read_table(path)?)
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn columns(&self) -> &[String] {
        self.table.columns()
    }

    pub fn mapping(&self) -> &ColumnMapping {
        &self.mapping
    }

    pub fn set_phrase_column(&mut self, column: &str) -> ImportResult<()> {
        let candidate = ColumnMapping::new(column, self.mapping.meaning.clone());
        candidate.resolve(&self.table)?;
        self.mapping = candidate;
        Ok(())
    }

    pub fn set_meaning_column(&mut self, column: &str) -> ImportResult<()> {
        let candidate = ColumnMapping::new(self.mapping.phrase.clone(), column);
        candidate.resolve(&self.table)?;
        self.mapping = candidate;
        Ok(())
    }

    /// Replaces both selections at once.
    pub fn set_mapping(&mut self, mapping: ColumnMapping) -> ImportResult<()> {
        mapping.resolve(&self.table)?;
        self.mapping = mapping;
        Ok(())
    }

    /// Includes or excludes one zero-based data row.
    pub fn set_included(&mut self, row: usize, included: bool) -> ImportResult<()> {
        let len = self.included.len();
        let flag = self
            .included
            .get_mut(row)
            .ok_or(ImportError::RowOutOfRange { row, len })?;
        *flag = included;
        Ok(())
    }

    pub fn set_all_included(&mut self, included: bool) {
        self.included.iter_mut().for_each(|flag| *flag = included);
    }

    pub fn included_count(&self) -> usize {
        self.included.iter().filter(|flag| **flag).count()
    }

    /// Re-derives preview rows from the current mapping and flags.
    pub fn preview(&self) -> Vec<PreviewRow> {
        // Mapping is validated on every change, so resolution cannot fail here.
        let mut rows = preview(&self.table, &self.mapping).unwrap_or_default();
        for row in &mut rows {
            row.included = self.included[row.index];
        }
        rows
    }

    /// Emits one definition per included row using the current mapping.
    pub fn confirm(&self) -> Vec<Definition> {
        let definitions = self
            .preview()
            .into_iter()
            .filter(|row| row.included)
            .map(|row| Definition::new(row.phrase, row.meaning))
            .collect::<Vec<_>>();
        info!(
            "event=import_confirm module=import status=ok rows={} included={}",
            self.table.len(),
            definitions.len()
        );
        definitions
    }
}

fn default_mapping(table: &Table) -> ImportResult<ColumnMapping> {
    let columns = table.columns();
    let first = columns.first().ok_or_else(|| ImportError::MissingColumns {
        missing: vec!["phrase".to_string(), "meaning".to_string()],
        available: Vec::new(),
    })?;
    let phrase = LEGACY_PHRASE_COLUMNS
        .iter()
        .find(|name| table.column_index(name).is_some())
        .map(|name| name.to_string())
        .unwrap_or_else(|| first.clone());
    let meaning = LEGACY_MEANING_COLUMNS
        .iter()
        .find(|name| table.column_index(name).is_some())
        .map(|name| name.to_string())
        .or_else(|| columns.get(1).cloned())
        .unwrap_or_else(|| first.clone());
    Ok(ColumnMapping::new(phrase, meaning))
}
