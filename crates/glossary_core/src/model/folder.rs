//! Folder aggregate.
//!
//! # Responsibility
//! - Own child folders or definitions for one tree node.
//! - Map to and from the nested folder document shape.
//! - Report structural inconsistencies found in decoded trees.
//!
//! # Invariants
//! - Mutation paths in `service` never produce a mixed folder; decoded
//!   documents may, and `find_mixed` is how callers discover them.
//! - Child order is the stored order and is never re-sorted.

use crate::codec::{CodecError, CodecResult};
use crate::model::definition::Definition;
use serde_json::{json, Value};

/// Display name given to a freshly created tree root.
pub const ROOT_FOLDER_NAME: &str = "Root";

/// Index path from a traversal root to one descendant folder.
///
/// Empty path addresses the root itself.
pub type FolderPath = Vec<usize>;

/// Structural classification of a folder's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FolderKind {
    /// No subfolders and no definitions.
    Empty,
    /// Holds subfolders only.
    Branch,
    /// Holds definitions only.
    Leaf,
    /// Holds both; only reachable through decoded input.
    Mixed,
}

/// One node of the glossary tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Folder {
    pub name: String,
    /// Hex RGB string such as `#2e8b57`.
    pub color: Option<String>,
    pub subfolders: Vec<Folder>,
    pub definitions: Vec<Definition>,
}

impl Folder {
    /// Creates an empty folder without color.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: None,
            subfolders: Vec::new(),
            definitions: Vec::new(),
        }
    }

    /// Creates the empty tree root used when nothing has been persisted yet.
    pub fn root() -> Self {
        Self::new(ROOT_FOLDER_NAME)
    }

    pub fn kind(&self) -> FolderKind {
        match (self.subfolders.is_empty(), self.definitions.is_empty()) {
            (true, true) => FolderKind::Empty,
            (false, true) => FolderKind::Branch,
            (true, false) => FolderKind::Leaf,
            (false, false) => FolderKind::Mixed,
        }
    }

    pub fn is_mixed(&self) -> bool {
        self.kind() == FolderKind::Mixed
    }

    pub fn is_empty(&self) -> bool {
        self.kind() == FolderKind::Empty
    }

    /// Counts definitions in this folder and every descendant.
    pub fn definition_count(&self) -> usize {
        self.definitions.len()
            + self
                .subfolders
                .iter()
                .map(Folder::definition_count)
                .sum::<usize>()
    }

    /// Resolves a descendant by index path.
    pub fn descendant(&self, path: &[usize]) -> Option<&Folder> {
        let mut cursor = self;
        for index in path {
            cursor = cursor.subfolders.get(*index)?;
        }
        Some(cursor)
    }

    /// Resolves a descendant by index path for mutation.
    pub fn descendant_mut(&mut self, path: &[usize]) -> Option<&mut Folder> {
        let mut cursor = self;
        for index in path {
            cursor = cursor.subfolders.get_mut(*index)?;
        }
        Some(cursor)
    }

    /// Returns index paths of every mixed folder, in depth-first pre-order.
    pub fn find_mixed(&self) -> Vec<FolderPath> {
        let mut found = Vec::new();
        let mut prefix = Vec::new();
        collect_mixed(self, &mut prefix, &mut found);
        found
    }

    /// Returns the full nested document form of this subtree.
    pub fn to_document(&self) -> Value {
        json!({
            "name": self.name,
            "color": self.color,
            "subfolders": self
                .subfolders
                .iter()
                .map(Folder::to_document)
                .collect::<Vec<_>>(),
            "definitions": self
                .definitions
                .iter()
                .map(Definition::to_document)
                .collect::<Vec<_>>(),
        })
    }

    /// Decodes a folder document.
    ///
    /// Missing `name` becomes an empty string, missing or null `color`
    /// becomes `None`, and missing or null arrays become empty.
    ///
    /// # Errors
    /// - `MalformedDocument` when any present field has the wrong JSON type,
    ///   or a nested definition is malformed.
    pub fn from_document(doc: &Value) -> CodecResult<Self> {
        Self::from_document_at(doc, "$")
    }

    fn from_document_at(doc: &Value, path: &str) -> CodecResult<Self> {
        let object = doc
            .as_object()
            .ok_or_else(|| CodecError::malformed(path, "folder must be an object"))?;

        let name = match object.get("name") {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(name)) => name.clone(),
            Some(_) => {
                return Err(CodecError::malformed(
                    format!("{path}.name"),
                    "expected a string",
                ))
            }
        };

        let color = match object.get("color") {
            None | Some(Value::Null) => None,
            Some(Value::String(color)) => Some(color.clone()),
            Some(_) => {
                return Err(CodecError::malformed(
                    format!("{path}.color"),
                    "expected a string or null",
                ))
            }
        };

        let subfolders = optional_array(object.get("subfolders"), path, "subfolders")?
            .iter()
            .enumerate()
            .map(|(index, child)| {
                Folder::from_document_at(child, &format!("{path}.subfolders[{index}]"))
            })
            .collect::<CodecResult<Vec<_>>>()?;

        let definitions = optional_array(object.get("definitions"), path, "definitions")?
            .iter()
            .enumerate()
            .map(|(index, item)| {
                Definition::from_document_at(item, &format!("{path}.definitions[{index}]"))
            })
            .collect::<CodecResult<Vec<_>>>()?;

        Ok(Self {
            name,
            color,
            subfolders,
            definitions,
        })
    }
}

impl Default for Folder {
    fn default() -> Self {
        Self::root()
    }
}

fn optional_array<'doc>(
    value: Option<&'doc Value>,
    path: &str,
    key: &str,
) -> CodecResult<&'doc [Value]> {
    match value {
        None | Some(Value::Null) => Ok(&[]),
        Some(Value::Array(items)) => Ok(items.as_slice()),
        Some(_) => Err(CodecError::malformed(
            format!("{path}.{key}"),
            "expected an array",
        )),
    }
}

fn collect_mixed(folder: &Folder, prefix: &mut FolderPath, found: &mut Vec<FolderPath>) {
    if folder.is_mixed() {
        found.push(prefix.clone());
    }
    for (index, child) in folder.subfolders.iter().enumerate() {
        prefix.push(index);
        collect_mixed(child, prefix, found);
        prefix.pop();
    }
}
