//! Definition entity.
//!
//! # Responsibility
//! - Hold one phrase/meaning pair, the atomic glossary content unit.
//! - Map to and from the `{phrase, meaning}` document shape.
//!
//! # Invariants
//! - `id` is session-local: it is never written to documents and is
//!   regenerated every time a definition is decoded.
//! - Equality compares `phrase` and `meaning` only.

use crate::codec::{CodecError, CodecResult};
use serde_json::{json, Map, Value};
use uuid::Uuid;

/// Stable in-session identifier used for unambiguous edit/delete targeting.
pub type DefinitionId = Uuid;

/// One phrase/meaning pair.
#[derive(Debug, Clone)]
pub struct Definition {
    /// Session-local identity. Not part of value equality.
    pub id: DefinitionId,
    /// Term being defined. Also the legacy selection key inside a folder.
    pub phrase: String,
    /// Free-form explanation text.
    pub meaning: String,
}

impl PartialEq for Definition {
    fn eq(&self, other: &Self) -> bool {
        self.phrase == other.phrase && self.meaning == other.meaning
    }
}

impl Eq for Definition {}

impl Definition {
    /// Creates a definition with a freshly generated identifier.
    pub fn new(phrase: impl Into<String>, meaning: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            phrase: phrase.into(),
            meaning: meaning.into(),
        }
    }

    /// Returns the document form `{ "phrase": ..., "meaning": ... }`.
    pub fn to_document(&self) -> Value {
        json!({
            "phrase": self.phrase,
            "meaning": self.meaning,
        })
    }

    /// Decodes a definition document.
    ///
    /// # Errors
    /// - `MalformedDocument` when `doc` is not an object, or when `phrase` or
    ///   `meaning` is missing or not a string.
    pub fn from_document(doc: &Value) -> CodecResult<Self> {
        Self::from_document_at(doc, "$")
    }

    pub(crate) fn from_document_at(doc: &Value, path: &str) -> CodecResult<Self> {
        let object = doc
            .as_object()
            .ok_or_else(|| CodecError::malformed(path, "definition must be an object"))?;
        let phrase = required_text(object, "phrase", path)?;
        let meaning = required_text(object, "meaning", path)?;
        Ok(Self::new(phrase, meaning))
    }
}

fn required_text(object: &Map<String, Value>, key: &str, path: &str) -> CodecResult<String> {
    match object.get(key) {
        Some(Value::String(text)) => Ok(text.clone()),
        Some(_) => Err(CodecError::malformed(
            format!("{path}.{key}"),
            "expected a string",
        )),
        None => Err(CodecError::malformed(
            format!("{path}.{key}"),
            "missing required field",
        )),
    }
}
