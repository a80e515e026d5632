//! Fixed-column import contract used without an interactive preview.
//!
//! Sources must carry fields literally named `Phrase`/`Meaning` (or the
//! lowercase spellings). Missing either one fails the whole import.

use super::preview::{preview, ColumnMapping};
use super::table::Table;
use super::{ImportError, ImportResult};
use crate::codec::CodecError;
use crate::model::definition::Definition;
use serde_json::{Map, Value};

pub(crate) const LEGACY_PHRASE_COLUMNS: &[&str] = &["Phrase", "phrase"];
pub(crate) const LEGACY_MEANING_COLUMNS: &[&str] = &["Meaning", "meaning"];

/// Resolves the legacy phrase/meaning column names present in `table`.
pub fn legacy_mapping(table: &Table) -> ImportResult<ColumnMapping> {
    let phrase = find_column(table.columns(), LEGACY_PHRASE_COLUMNS);
    let meaning = find_column(table.columns(), LEGACY_MEANING_COLUMNS);
    match (phrase, meaning) {
        (Some(phrase), Some(meaning)) => Ok(ColumnMapping::new(phrase, meaning)),
        (phrase, meaning) => Err(missing_columns(
            phrase.is_none(),
            meaning.is_none(),
            table.columns().to_vec(),
        )),
    }
}

/// Converts every row of `table` through the legacy column contract.
pub fn legacy_definitions(table: &Table) -> ImportResult<Vec<Definition>> {
    let mapping = legacy_mapping(table)?;
    Ok(preview(table, &mapping)?
        .into_iter()
        .map(|row| Definition::new(row.phrase, row.meaning))
        .collect())
}

/// Parses a JSON array of flat records into definitions.
///
/// # Errors
/// - `Malformed` when `records` is not an array of objects.
/// - `MissingColumns` when any record lacks the phrase or meaning field.
pub fn parse_legacy_records(records: &Value) -> ImportResult<Vec<Definition>> {
    let items = records
        .as_array()
        .ok_or_else(|| CodecError::malformed("$", "expected an array of records"))?;

    let mut definitions = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let record = item.as_object().ok_or_else(|| {
            CodecError::malformed(format!("$[{index}]"), "record must be an object")
        })?;
        let phrase = find_field(record, LEGACY_PHRASE_COLUMNS);
        let meaning = find_field(record, LEGACY_MEANING_COLUMNS);
        match (phrase, meaning) {
            (Some(phrase), Some(meaning)) => {
                definitions.push(Definition::new(field_text(phrase), field_text(meaning)));
            }
            (phrase, meaning) => {
                return Err(missing_columns(
                    phrase.is_none(),
                    meaning.is_none(),
                    record.keys().cloned().collect(),
                ));
            }
        }
    }
    Ok(definitions)
}

fn find_column(columns: &[String], candidates: &[&str]) -> Option<String> {
    candidates
        .iter()
        .find(|candidate| columns.iter().any(|column| column == *candidate))
        .map(|candidate| candidate.to_string())
}

fn find_field<'record>(
    record: &'record Map<String, Value>,
    candidates: &[&str],
) -> Option<&'record Value> {
    candidates.iter().find_map(|candidate| record.get(*candidate))
}

fn field_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn missing_columns(
    phrase_missing: bool,
    meaning_missing: bool,
    available: Vec<String>,
) -> ImportError {
    let mut missing = Vec::new();
    if phrase_missing {
        missing.push(LEGACY_PHRASE_COLUMNS[0].to_string());
    }
    if meaning_missing {
        missing.push(LEGACY_MEANING_COLUMNS[0].to_string());
    }
    ImportError::MissingColumns { missing, available }
}

#[cfg(test)]
mod tests {
    use super::{legacy_definitions, parse_legacy_records};
    use crate::import::table::read_delimited;
    use crate::import::ImportError;
    use serde_json::json;

    #[test]
    fn legacy_table_accepts_lowercase_headers() {
        let table = read_delimited("phrase,meaning\ncat,feline\n".as_bytes(), b',').unwrap();
        let definitions = legacy_definitions(&table).unwrap();
        assert_eq!(definitions.len(), 1);
        assert_eq!(definitions[0].meaning, "feline");
    }

    #[test]
    fn legacy_table_requires_both_columns() {
        let table = read_delimited("Phrase,Def\ncat,feline\n".as_bytes(), b',').unwrap();
        let err = legacy_definitions(&table).unwrap_err();
        match err {
            ImportError::MissingColumns { missing, .. } => {
                assert_eq!(missing, vec!["Meaning".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn legacy_records_stringify_non_text_values() {
        let definitions = parse_legacy_records(&json!([
            {"Phrase": "pi", "Meaning": 3.14},
            {"phrase": "yes", "meaning": true}
        ]))
        .unwrap();
        assert_eq!(definitions[0].meaning, "3.14");
        assert_eq!(definitions[1].meaning, "true");
    }

    #[test]
    fn legacy_records_fail_without_partial_output() {
        let err = parse_legacy_records(&json!([
            {"Phrase": "cat", "Meaning": "feline"},
            {"Phrase": "dog"}
        ]))
        .unwrap_err();
        assert!(matches!(err, ImportError::MissingColumns { .. }));
    }

    #[test]
    fn legacy_records_reject_non_array() {
        let err = parse_legacy_records(&json!({"Phrase": "cat"})).unwrap_err();
        assert!(matches!(err, ImportError::Malformed(_)));
    }
}
