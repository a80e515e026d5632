//! Glossary session: navigation and invariant-preserving tree mutation.
//!
//! # Responsibility
//! - Own the tree root, the navigation path and the document store.
//! - Validate folder/definition invariants before every mutation.
//! - Surface mixed folders found in loaded or merged data and force their
//!   resolution.
//!
//! # Invariants
//! - No mutation creates a folder holding both subfolders and definitions.
//! - `path` always resolves to an existing folder (empty path = root).
//! - While inconsistencies are pending, every mutation is rejected.
//! - With autosave on, a mutation whose save fails is rolled back.

use super::error::{SessionError, SessionResult};
use crate::flashcards::FlashcardSequencer;
use crate::model::definition::{Definition, DefinitionId};
use crate::model::folder::{Folder, FolderPath};
use crate::search::{collect_definitions, search, CollectedDefinition, SearchScope};
use crate::store::DocumentStore;
use log::{info, warn};
use once_cell::sync::Lazy;
use rand::Rng;
use regex::Regex;

static HEX_COLOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#[0-9a-fA-F]{6}$").expect("valid hex color regex"));

const PATH_LABEL_SEPARATOR: &str = " / ";

/// How a mixed folder is repaired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Drop the folder's definitions.
    KeepSubfolders,
    /// Drop the folder's subfolders and their subtrees.
    KeepDefinitions,
}

/// One folder holding both subfolders and definitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inconsistency {
    pub path: FolderPath,
    /// Folder names from the root joined with ` / `.
    pub label: String,
    pub subfolder_count: usize,
    pub definition_count: usize,
}

/// Session state saved before a mutation while autosave is on.
pub(super) struct Checkpoint {
    root: Folder,
    path: FolderPath,
    pending: Vec<FolderPath>,
}

/// Explicit session context replacing any global "current folder" state.
pub struct GlossarySession<S: DocumentStore> {
    pub(super) root: Folder,
    pub(super) path: FolderPath,
    pub(super) store: S,
    pub(super) autosave: bool,
    pub(super) pending: Vec<FolderPath>,
}

impl<S: DocumentStore> GlossarySession<S> {
    /// Opens a session over the tree persisted in `store`.
    ///
    /// An absent document yields a fresh empty root.
    ///
    /// # Errors
    /// - `MalformedDocument` / `IoFailure` when the stored document cannot be
    ///   read.
    pub fn open(store: S) -> SessionResult<Self> {
        let root = store.load()?.unwrap_or_else(Folder::root);
        Ok(Self::with_root(root, store))
    }

    /// Creates a session over an already-built tree.
    pub fn with_root(root: Folder, store: S) -> Self {
        let mut session = Self {
            root,
            path: Vec::new(),
            store,
            autosave: false,
            pending: Vec::new(),
        };
        session.refresh_inconsistencies();
        session
    }

    pub fn set_autosave(&mut self, autosave: bool) {
        self.autosave = autosave;
    }

    pub fn autosave(&self) -> bool {
        self.autosave
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn root(&self) -> &Folder {
        &self.root
    }

    /// Folder addressed by the navigation path.
    pub fn current(&self) -> &Folder {
        self.root.descendant(&self.path).unwrap_or(&self.root)
    }

    /// Navigation path as child indices from the root.
    pub fn path(&self) -> &[usize] {
        &self.path
    }

    /// Folder names from the root down to the current folder.
    pub fn path_names(&self) -> Vec<&str> {
        names_along(&self.root, &self.path)
    }

    pub fn path_label(&self) -> String {
        self.path_names().join(PATH_LABEL_SEPARATOR)
    }

    /// Number of folders entered below the root.
    pub fn depth(&self) -> usize {
        self.path.len()
    }

    /// Enters the child at `index` of the current folder.
    pub fn enter_folder(&mut self, index: usize) -> SessionResult<()> {
        if index >= self.current().subfolders.len() {
            return Err(SessionError::FolderNotFound(format!("#{index}")));
        }
        self.path.push(index);
        Ok(())
    }

    /// Enters the first child of the current folder named `name`.
    pub fn enter_folder_named(&mut self, name: &str) -> SessionResult<()> {
        let index = self
            .current()
            .subfolders
            .iter()
            .position(|child| child.name == name)
            .ok_or_else(|| SessionError::FolderNotFound(name.to_string()))?;
        self.path.push(index);
        Ok(())
    }

    /// Navigates from the root through `names`; position is kept on failure.
    pub fn enter_path<T: AsRef<str>>(&mut self, names: &[T]) -> SessionResult<()> {
        let previous = std::mem::take(&mut self.path);
        for name in names {
            if let Err(err) = self.enter_folder_named(name.as_ref()) {
                self.path = previous;
                return Err(err);
            }
        }
        Ok(())
    }

    /// Leaves the current folder; returns `false` at the root.
    pub fn go_back(&mut self) -> bool {
        self.path.pop().is_some()
    }

    pub fn go_to_root(&mut self) {
        self.path.clear();
    }

    /// Appends an empty child folder to the current folder.
    ///
    /// # Errors
    /// - `InvalidOperation` when the current folder holds definitions.
    /// - `InvalidName` when `name` is blank.
    pub fn add_folder(&mut self, name: &str) -> SessionResult<()> {
        self.ensure_consistent()?;
        let checkpoint = self.checkpoint();
        let name = normalize_folder_name(name)?;
        let current = self.current_mut();
        if !current.definitions.is_empty() {
            return Err(SessionError::InvalidOperation(
                "cannot add a folder here; this folder contains definitions".to_string(),
            ));
        }
        current.subfolders.push(Folder::new(name));
        info!(
            "event=folder_add module=service status=ok depth={} siblings={}",
            self.path.len(),
            self.current().subfolders.len()
        );
        self.commit(checkpoint)
    }

    /// Removes the first child folder named `name` with its whole subtree.
    pub fn delete_folder(&mut self, name: &str) -> SessionResult<Folder> {
        self.ensure_consistent()?;
        let checkpoint = self.checkpoint();
        let current = self.current_mut();
        let index = current
            .subfolders
            .iter()
            .position(|child| child.name == name)
            .ok_or_else(|| SessionError::FolderNotFound(name.to_string()))?;
        let removed = current.subfolders.remove(index);
        info!(
            "event=folder_delete module=service status=ok depth={} definitions={}",
            self.path.len(),
            removed.definition_count()
        );
        self.commit(checkpoint)?;
        Ok(removed)
    }

    /// Renames the current folder.
    pub fn rename_folder(&mut self, name: &str) -> SessionResult<()> {
        self.ensure_consistent()?;
        let checkpoint = self.checkpoint();
        let name = normalize_folder_name(name)?;
        self.current_mut().name = name;
        info!(
            "event=folder_rename module=service status=ok depth={}",
            self.path.len()
        );
        self.commit(checkpoint)
    }

    /// Sets (`Some`) or clears (`None`) the current folder's color.
    ///
    /// Accepted colors are `#RRGGBB`; they are stored lowercase.
    pub fn set_folder_color(&mut self, color: Option<&str>) -> SessionResult<()> {
        self.ensure_consistent()?;
        let checkpoint = self.checkpoint();
        let color = match color {
            Some(value) => {
                let trimmed = value.trim();
                if !HEX_COLOR_RE.is_match(trimmed) {
                    return Err(SessionError::InvalidColor(value.to_string()));
                }
                Some(trimmed.to_ascii_lowercase())
            }
            None => None,
        };
        self.current_mut().color = color;
        info!(
            "event=folder_color module=service status=ok depth={}",
            self.path.len()
        );
        self.commit(checkpoint)
    }

    /// Appends a definition to the current folder.
    ///
    /// # Errors
    /// - `InvalidOperation` when the current folder holds subfolders.
    /// - `InvalidDefinition` when phrase or meaning is blank.
    pub fn add_definition(&mut self, phrase: &str, meaning: &str) -> SessionResult<DefinitionId> {
        self.ensure_consistent()?;
        let checkpoint = self.checkpoint();
        validate_definition(phrase, meaning)?;
        let current = self.current_mut();
        if !current.subfolders.is_empty() {
            return Err(SessionError::InvalidOperation(
                "cannot add definitions here; this folder contains subfolders".to_string(),
            ));
        }
        let definition = Definition::new(phrase, meaning);
        let id = definition.id;
        current.definitions.push(definition);
        info!(
            "event=definition_add module=service status=ok depth={} definitions={}",
            self.path.len(),
            self.current().definitions.len()
        );
        self.commit(checkpoint)?;
        Ok(id)
    }

    /// Edits the first definition whose phrase equals `phrase`.
    pub fn edit_definition(
        &mut self,
        phrase: &str,
        new_phrase: &str,
        new_meaning: &str,
    ) -> SessionResult<()> {
        self.ensure_consistent()?;
        let checkpoint = self.checkpoint();
        validate_definition(new_phrase, new_meaning)?;
        let definition = self
            .current_mut()
            .definitions
            .iter_mut()
            .find(|definition| definition.phrase == phrase)
            .ok_or_else(|| SessionError::DefinitionNotFound(phrase.to_string()))?;
        definition.phrase = new_phrase.to_string();
        definition.meaning = new_meaning.to_string();
        info!(
            "event=definition_edit module=service status=ok depth={} target=phrase",
            self.path.len()
        );
        self.commit(checkpoint)
    }

    /// Edits the definition with identifier `id` in the current folder.
    pub fn edit_definition_by_id(
        &mut self,
        id: DefinitionId,
        new_phrase: &str,
        new_meaning: &str,
    ) -> SessionResult<()> {
        self.ensure_consistent()?;
        let checkpoint = self.checkpoint();
        validate_definition(new_phrase, new_meaning)?;
        let definition = self
            .current_mut()
            .definitions
            .iter_mut()
            .find(|definition| definition.id == id)
            .ok_or_else(|| SessionError::DefinitionNotFound(id.to_string()))?;
        definition.phrase = new_phrase.to_string();
        definition.meaning = new_meaning.to_string();
        info!(
            "event=definition_edit module=service status=ok depth={} target=id",
            self.path.len()
        );
        self.commit(checkpoint)
    }

    /// Removes every definition whose phrase equals `phrase`.
    ///
    /// Returns how many were removed.
    pub fn delete_definition(&mut self, phrase: &str) -> SessionResult<usize> {
        self.ensure_consistent()?;
        let checkpoint = self.checkpoint();
        let definitions = &mut self.current_mut().definitions;
        let before = definitions.len();
        definitions.retain(|definition| definition.phrase != phrase);
        let removed = before - definitions.len();
        if removed == 0 {
            return Err(SessionError::DefinitionNotFound(phrase.to_string()));
        }
        info!(
            "event=definition_delete module=service status=ok depth={} removed={}",
            self.path.len(),
            removed
        );
        self.commit(checkpoint)?;
        Ok(removed)
    }

    /// Removes exactly the definition with identifier `id`.
    pub fn delete_definition_by_id(&mut self, id: DefinitionId) -> SessionResult<Definition> {
        self.ensure_consistent()?;
        let checkpoint = self.checkpoint();
        let definitions = &mut self.current_mut().definitions;
        let index = definitions
            .iter()
            .position(|definition| definition.id == id)
            .ok_or_else(|| SessionError::DefinitionNotFound(id.to_string()))?;
        let removed = definitions.remove(index);
        info!(
            "event=definition_delete module=service status=ok depth={} removed=1",
            self.path.len()
        );
        self.commit(checkpoint)?;
        Ok(removed)
    }

    /// Lists folders that currently hold both subfolders and definitions.
    pub fn inconsistencies(&self) -> Vec<Inconsistency> {
        self.pending
            .iter()
            .filter_map(|path| {
                let folder = self.root.descendant(path)?;
                Some(Inconsistency {
                    path: path.clone(),
                    label: names_along(&self.root, path).join(PATH_LABEL_SEPARATOR),
                    subfolder_count: folder.subfolders.len(),
                    definition_count: folder.definitions.len(),
                })
            })
            .collect()
    }

    pub fn has_inconsistencies(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Repairs every mixed folder with `resolution`; returns how many.
    pub fn resolve_inconsistencies(&mut self, resolution: Resolution) -> SessionResult<usize> {
        let checkpoint = self.checkpoint();
        let pending = std::mem::take(&mut self.pending);
        let mut repaired = 0;
        // Deepest first, so clearing an ancestor never invalidates a path
        // still waiting in the list.
        for path in pending.iter().rev() {
            if let Some(folder) = self.root.descendant_mut(path) {
                match resolution {
                    Resolution::KeepSubfolders => folder.definitions.clear(),
                    Resolution::KeepDefinitions => folder.subfolders.clear(),
                }
                repaired += 1;
            }
        }
        self.refresh_inconsistencies();
        self.clamp_path();
        info!(
            "event=tree_repair module=service status=ok repaired={} resolution={:?}",
            repaired, resolution
        );
        if repaired > 0 {
            self.commit(checkpoint)?;
        }
        Ok(repaired)
    }

    /// Searches the whole tree from the root.
    pub fn search(&self, query: &str, scope: SearchScope) -> Vec<CollectedDefinition<'_>> {
        search(&self.root, query, scope)
    }

    /// Starts a flashcard run over the current folder's subtree.
    ///
    /// # Errors
    /// - `NoDefinitions` when the subtree has no definitions.
    pub fn start_flashcards<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> SessionResult<FlashcardSequencer> {
        let deck = collect_definitions(self.current())
            .into_iter()
            .cloned()
            .collect::<Vec<_>>();
        if deck.is_empty() {
            return Err(SessionError::NoDefinitions);
        }
        Ok(FlashcardSequencer::new(deck, rng))
    }

    pub(super) fn current_mut(&mut self) -> &mut Folder {
        self.clamp_path();
        let mut cursor = &mut self.root;
        for index in &self.path {
            cursor = &mut cursor.subfolders[*index];
        }
        cursor
    }

    pub(super) fn ensure_consistent(&self) -> SessionResult<()> {
        if self.pending.is_empty() {
            Ok(())
        } else {
            Err(SessionError::Inconsistent {
                count: self.pending.len(),
            })
        }
    }

    pub(super) fn refresh_inconsistencies(&mut self) {
        self.pending = self.root.find_mixed();
        if !self.pending.is_empty() {
            warn!(
                "event=tree_inconsistent module=service status=warn mixed_folders={}",
                self.pending.len()
            );
        }
    }

    /// Captures the state a failed autosave rolls back to; `None` when
    /// autosave is off.
    pub(super) fn checkpoint(&self) -> Option<Checkpoint> {
        self.autosave.then(|| Checkpoint {
            root: self.root.clone(),
            path: self.path.clone(),
            pending: self.pending.clone(),
        })
    }

    /// Persists a finished mutation. A failed save restores `checkpoint`, so
    /// the in-memory tree never runs ahead of the stored one.
    pub(super) fn commit(&mut self, checkpoint: Option<Checkpoint>) -> SessionResult<()> {
        let Some(checkpoint) = checkpoint else {
            return Ok(());
        };
        if let Err(err) = self.save() {
            warn!("event=autosave module=service status=error error_code=rolled_back");
            self.root = checkpoint.root;
            self.path = checkpoint.path;
            self.pending = checkpoint.pending;
            return Err(err);
        }
        Ok(())
    }

    fn clamp_path(&mut self) {
        while self.root.descendant(&self.path).is_none() {
            self.path.pop();
        }
    }
}

fn names_along<'tree>(root: &'tree Folder, path: &[usize]) -> Vec<&'tree str> {
    let mut names = vec![root.name.as_str()];
    let mut cursor = root;
    for index in path {
        match cursor.subfolders.get(*index) {
            Some(child) => {
                names.push(child.name.as_str());
                cursor = child;
            }
            None => break,
        }
    }
    names
}

fn normalize_folder_name(name: &str) -> SessionResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(SessionError::InvalidName);
    }
    Ok(trimmed.to_string())
}

pub(super) fn validate_definition(phrase: &str, meaning: &str) -> SessionResult<()> {
    if phrase.trim().is_empty() {
        return Err(SessionError::InvalidDefinition("phrase"));
    }
    if meaning.trim().is_empty() {
        return Err(SessionError::InvalidDefinition("meaning"));
    }
    Ok(())
}
