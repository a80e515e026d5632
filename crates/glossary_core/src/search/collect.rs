//! Depth-first collection and filtering.
//!
//! # Invariants
//! - Traversal is pre-order: a folder's own definitions come before any of
//!   its subfolders', children in stored order.
//! - Every reachable definition appears exactly once.
//! - An empty query filters nothing.

use crate::model::definition::Definition;
use crate::model::folder::Folder;

/// Label standing in for the traversal root in collected paths.
pub const ROOT_PATH_LABEL: &str = "Root";

const PATH_SEPARATOR: char = '/';

/// One definition together with the folder path that owns it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectedDefinition<'tree> {
    pub definition: &'tree Definition,
    /// `Root` for the traversal root, `Root/<child>/...` below it.
    pub path: String,
}

/// Which fields a search query is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchScope {
    /// Phrase or meaning.
    #[default]
    PhraseOrMeaning,
    /// Phrase, meaning or folder path ("all definitions" view).
    Everything,
}

/// Flattens every definition under `folder` with its owning path.
pub fn collect(folder: &Folder) -> Vec<CollectedDefinition<'_>> {
    let mut collected = Vec::with_capacity(folder.definition_count());
    collect_into(folder, ROOT_PATH_LABEL.to_string(), &mut collected);
    collected
}

/// Flattens every definition under `folder` without path annotation.
pub fn collect_definitions(folder: &Folder) -> Vec<&Definition> {
    let mut definitions = Vec::with_capacity(folder.definition_count());
    walk_definitions(folder, &mut definitions);
    definitions
}

/// Returns collected entries matching `query` case-insensitively.
pub fn search<'tree>(
    folder: &'tree Folder,
    query: &str,
    scope: SearchScope,
) -> Vec<CollectedDefinition<'tree>> {
    let collected = collect(folder);
    if query.is_empty() {
        return collected;
    }

    let needle = query.to_lowercase();
    collected
        .into_iter()
        .filter(|entry| matches(entry, &needle, scope))
        .collect()
}

fn matches(entry: &CollectedDefinition<'_>, needle: &str, scope: SearchScope) -> bool {
    let definition = entry.definition;
    if definition.phrase.to_lowercase().contains(needle)
        || definition.meaning.to_lowercase().contains(needle)
    {
        return true;
    }
    scope == SearchScope::Everything && entry.path.to_lowercase().contains(needle)
}

fn collect_into<'tree>(
    folder: &'tree Folder,
    path: String,
    collected: &mut Vec<CollectedDefinition<'tree>>,
) {
    for definition in &folder.definitions {
        collected.push(CollectedDefinition {
            definition,
            path: path.clone(),
        });
    }
    for child in &folder.subfolders {
        let mut child_path = path.clone();
        child_path.push(PATH_SEPARATOR);
        child_path.push_str(&child.name);
        collect_into(child, child_path, collected);
    }
}

fn walk_definitions<'tree>(folder: &'tree Folder, definitions: &mut Vec<&'tree Definition>) {
    definitions.extend(folder.definitions.iter());
    for child in &folder.subfolders {
        walk_definitions(child, definitions);
    }
}
