//! Folder tree document codec.
//!
//! # Responsibility
//! - Convert whole trees to and from the nested JSON document form.
//! - Produce the pretty-printed text used by saves and exports.
//!
//! # Invariants
//! - Decoding is all-or-nothing: a malformed document never yields a partial
//!   tree.
//! - Field order on output is `name, color, subfolders, definitions`.

use crate::model::folder::Folder;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

const DOCUMENT_INDENT: &[u8] = b"    ";

pub type CodecResult<T> = Result<T, CodecError>;

/// Errors from document encoding and decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Document text or structure does not match the folder schema.
    MalformedDocument { path: String, message: String },
    /// Encoder failed to produce UTF-8 JSON text.
    Encode(String),
}

impl CodecError {
    pub(crate) fn malformed(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedDocument {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl Display for CodecError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MalformedDocument { path, message } => {
                write!(f, "malformed document at `{path}`: {message}")
            }
            Self::Encode(message) => write!(f, "failed to encode document: {message}"),
        }
    }
}

impl Error for CodecError {}

/// Returns the document form of `tree`.
pub fn save(tree: &Folder) -> Value {
    tree.to_document()
}

/// Decodes a tree from its document form.
pub fn load(document: &Value) -> CodecResult<Folder> {
    Folder::from_document(document)
}

/// Parses raw JSON text without interpreting the folder schema.
pub fn parse_document(text: &str) -> CodecResult<Value> {
    serde_json::from_str(text).map_err(|err| {
        CodecError::malformed(
            format!("line {} column {}", err.line(), err.column()),
            err.to_string(),
        )
    })
}

/// Parses JSON text and decodes it as a folder tree.
pub fn decode(text: &str) -> CodecResult<Folder> {
    load(&parse_document(text)?)
}

/// Encodes `tree` as 4-space indented JSON text.
pub fn to_pretty_json(tree: &Folder) -> CodecResult<String> {
    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(DOCUMENT_INDENT);
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    save(tree)
        .serialize(&mut serializer)
        .map_err(|err| CodecError::Encode(err.to_string()))?;
    String::from_utf8(buffer).map_err(|err| CodecError::Encode(err.to_string()))
}
