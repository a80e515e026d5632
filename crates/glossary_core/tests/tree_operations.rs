use glossary_core::{
    Definition, DocumentStore, Folder, GlossarySession, MemoryStore, Resolution, SessionError,
    StoreError, StoreResult, ROOT_FOLDER_NAME,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::json;

fn empty_session() -> GlossarySession<MemoryStore> {
    GlossarySession::open(MemoryStore::new()).unwrap()
}

/// Store on a read-only medium: loads nothing and refuses every save.
#[derive(Default)]
struct ReadOnlyStore {
    save_attempts: usize,
}

impl DocumentStore for ReadOnlyStore {
    fn load(&self) -> StoreResult<Option<Folder>> {
        Ok(None)
    }

    fn save(&mut self, _tree: &Folder) -> StoreResult<()> {
        self.save_attempts += 1;
        Err(StoreError::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "read-only medium",
        )))
    }
}

fn read_only_session(root: Folder) -> GlossarySession<ReadOnlyStore> {
    let mut session = GlossarySession::with_root(root, ReadOnlyStore::default());
    session.set_autosave(true);
    session
}

fn assert_no_mixed(folder: &Folder) {
    assert!(
        folder.subfolders.is_empty() || folder.definitions.is_empty(),
        "folder `{}` mixes subfolders and definitions",
        folder.name
    );
    for child in &folder.subfolders {
        assert_no_mixed(child);
    }
}

#[test]
fn open_without_document_starts_with_empty_root() {
    let session = empty_session();
    assert_eq!(session.root().name, ROOT_FOLDER_NAME);
    assert!(session.root().is_empty());
    assert_eq!(session.path_label(), "Root");
}

#[test]
fn add_folder_after_definition_is_invalid_operation() {
    let mut session = empty_session();
    session.add_definition("cat", "a feline").unwrap();

    let err = session.add_folder("x").unwrap_err();
    assert!(matches!(err, SessionError::InvalidOperation(_)));
    assert!(session.root().subfolders.is_empty());
    assert_eq!(session.root().definitions.len(), 1);
}

#[test]
fn add_definition_in_branch_folder_is_invalid_operation() {
    let mut session = empty_session();
    session.add_folder("Animals").unwrap();

    let err = session.add_definition("cat", "feline").unwrap_err();
    assert!(matches!(err, SessionError::InvalidOperation(_)));
    assert!(session.root().definitions.is_empty());
}

#[test]
fn navigation_tracks_path_and_go_back_stops_at_root() {
    let mut session = empty_session();
    session.add_folder("Animals").unwrap();
    session.enter_folder_named("Animals").unwrap();
    session.add_folder("Mammals").unwrap();
    session.enter_folder(0).unwrap();

    assert_eq!(session.path_names(), vec!["Root", "Animals", "Mammals"]);
    assert_eq!(session.path_label(), "Root / Animals / Mammals");
    assert_eq!(session.depth(), 2);

    assert!(session.go_back());
    assert_eq!(session.current().name, "Animals");
    assert!(session.go_back());
    assert!(!session.go_back());
    assert_eq!(session.current().name, "Root");
}

#[test]
fn enter_unknown_folder_is_rejected_and_keeps_position() {
    let mut session = empty_session();
    session.add_folder("A").unwrap();
    session.enter_folder_named("A").unwrap();

    assert!(matches!(
        session.enter_folder(0),
        Err(SessionError::FolderNotFound(_))
    ));
    assert!(session.enter_path(&["A", "missing"]).is_err());
    assert_eq!(session.current().name, "A");
}

#[test]
fn blank_names_and_definitions_are_rejected() {
    let mut session = empty_session();
    assert!(matches!(
        session.add_folder("   "),
        Err(SessionError::InvalidName)
    ));
    assert!(matches!(
        session.add_definition("cat", ""),
        Err(SessionError::InvalidDefinition("meaning"))
    ));
}

#[test]
fn edit_definition_targets_first_phrase_match() {
    let mut session = empty_session();
    session.add_definition("bank", "river side").unwrap();
    session.add_definition("bank", "money place").unwrap();

    session
        .edit_definition("bank", "bank (river)", "river side")
        .unwrap();

    let definitions = &session.current().definitions;
    assert_eq!(definitions[0].phrase, "bank (river)");
    assert_eq!(definitions[1].phrase, "bank");
}

#[test]
fn delete_definition_by_phrase_removes_all_matches() {
    let mut session = empty_session();
    session.add_definition("bank", "river side").unwrap();
    session.add_definition("bank", "money place").unwrap();
    session.add_definition("loan", "borrowed money").unwrap();

    assert_eq!(session.delete_definition("bank").unwrap(), 2);
    assert_eq!(session.current().definitions.len(), 1);
    assert!(matches!(
        session.delete_definition("bank"),
        Err(SessionError::DefinitionNotFound(_))
    ));
}

#[test]
fn id_targeting_disambiguates_duplicate_phrases() {
    let mut session = empty_session();
    session.add_definition("bank", "river side").unwrap();
    let second = session.add_definition("bank", "money place").unwrap();

    session
        .edit_definition_by_id(second, "bank", "financial institution")
        .unwrap();
    let removed = session.delete_definition_by_id(second).unwrap();

    assert_eq!(removed.meaning, "financial institution");
    assert_eq!(session.current().definitions.len(), 1);
    assert_eq!(session.current().definitions[0].meaning, "river side");
}

#[test]
fn folder_color_is_validated_and_lowercased() {
    let mut session = empty_session();
    session.set_folder_color(Some("#2E8B57")).unwrap();
    assert_eq!(session.root().color.as_deref(), Some("#2e8b57"));

    assert!(matches!(
        session.set_folder_color(Some("green")),
        Err(SessionError::InvalidColor(_))
    ));
    assert_eq!(session.root().color.as_deref(), Some("#2e8b57"));

    session.set_folder_color(None).unwrap();
    assert_eq!(session.root().color, None);
}

#[test]
fn delete_and_rename_folder() {
    let mut session = empty_session();
    session.add_folder("Old").unwrap();
    session.add_folder("Keep").unwrap();
    session.enter_folder_named("Old").unwrap();
    session.add_definition("a", "b").unwrap();
    session.go_back();

    let removed = session.delete_folder("Old").unwrap();
    assert_eq!(removed.definition_count(), 1);
    assert_eq!(session.root().subfolders.len(), 1);

    session.enter_folder_named("Keep").unwrap();
    session.rename_folder(" Renamed ").unwrap();
    assert_eq!(session.current().name, "Renamed");
}

#[test]
fn mixed_folders_from_load_block_mutation_until_resolved() {
    let store = MemoryStore::with_text(
        json!({
            "name": "Root",
            "subfolders": [{"name": "A"}],
            "definitions": [{"phrase": "cat", "meaning": "feline"}]
        })
        .to_string(),
    );
    let mut session = GlossarySession::open(store).unwrap();

    let pending = session.inconsistencies();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].label, "Root");
    assert_eq!(pending[0].definition_count, 1);

    assert!(matches!(
        session.add_folder("B"),
        Err(SessionError::Inconsistent { count: 1 })
    ));

    assert_eq!(
        session
            .resolve_inconsistencies(Resolution::KeepSubfolders)
            .unwrap(),
        1
    );
    assert!(!session.has_inconsistencies());
    assert!(session.root().definitions.is_empty());
    session.add_folder("B").unwrap();
}

#[test]
fn keep_definitions_resolution_clamps_navigation() {
    let store = MemoryStore::with_text(
        json!({
            "name": "Root",
            "subfolders": [{
                "name": "Mixed",
                "subfolders": [{"name": "Inner"}],
                "definitions": [{"phrase": "p", "meaning": "m"}]
            }]
        })
        .to_string(),
    );
    let mut session = GlossarySession::open(store).unwrap();
    session.enter_path(&["Mixed", "Inner"]).unwrap();

    session
        .resolve_inconsistencies(Resolution::KeepDefinitions)
        .unwrap();

    assert_eq!(session.current().name, "Mixed");
    assert!(session.current().subfolders.is_empty());
    assert_eq!(session.current().definitions.len(), 1);
}

#[test]
fn autosave_persists_every_mutation() {
    let mut session = empty_session();
    session.set_autosave(true);
    session.add_folder("A").unwrap();
    session.enter_folder_named("A").unwrap();
    session.add_definition("cat", "feline").unwrap();
    assert!(session.add_folder("nope").is_err());

    assert_eq!(session.store().save_count(), 2);
    let reopened = GlossarySession::open(session.store().clone()).unwrap();
    assert_eq!(reopened.root(), session.root());
}

#[test]
fn random_operation_sequences_never_create_mixed_folders() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let mut session = empty_session();

    for step in 0..2_000 {
        match rng.gen_range(0..6) {
            0 => {
                let _ = session.add_folder(&format!("f{step}"));
            }
            1 => {
                let _ = session.add_definition(&format!("p{step}"), "m");
            }
            2 => {
                let children = session.current().subfolders.len();
                if children > 0 {
                    session.enter_folder(rng.gen_range(0..children)).unwrap();
                }
            }
            3 => {
                session.go_back();
            }
            4 => {
                let phrase = session
                    .current()
                    .definitions
                    .first()
                    .map(|definition| definition.phrase.clone());
                if let Some(phrase) = phrase {
                    session.delete_definition(&phrase).unwrap();
                }
            }
            _ => {
                let name = session
                    .current()
                    .subfolders
                    .last()
                    .map(|folder| folder.name.clone());
                if let Some(name) = name {
                    session.delete_folder(&name).unwrap();
                }
            }
        }
        assert_no_mixed(session.root());
    }
}

#[test]
fn failed_autosave_rolls_back_the_mutation() {
    let mut session = read_only_session(Folder::root());

    for _ in 0..2 {
        assert!(matches!(
            session.add_definition("cat", "feline"),
            Err(SessionError::IoFailure(_))
        ));
    }
    assert!(session.root().is_empty());
    assert_eq!(session.store().save_attempts, 2);

    assert!(session.add_folder("Animals").is_err());
    assert!(session.set_folder_color(Some("#2e8b57")).is_err());
    assert_eq!(session.root(), &Folder::root());
}

#[test]
fn failed_autosave_keeps_position_and_existing_content() {
    let mut animals = Folder::new("Animals");
    animals.definitions.push(Definition::new("cat", "feline"));
    let mut root = Folder::root();
    root.subfolders.push(animals);
    let before = root.clone();

    let mut session = read_only_session(root);
    session.enter_folder_named("Animals").unwrap();

    assert!(session.delete_definition("cat").is_err());
    assert!(session.edit_definition("cat", "kitten", "young cat").is_err());
    assert!(session.rename_folder("Beasts").is_err());
    assert_eq!(session.root(), &before);
    assert_eq!(session.path_label(), "Root / Animals");

    session.go_back();
    assert!(session.delete_folder("Animals").is_err());
    assert_eq!(session.root(), &before);
}

#[test]
fn failed_autosave_leaves_inconsistencies_pending() {
    let mut mixed = Folder::root();
    mixed.subfolders.push(Folder::new("A"));
    mixed.definitions.push(Definition::new("cat", "feline"));

    let mut session = read_only_session(mixed.clone());
    assert!(matches!(
        session.resolve_inconsistencies(Resolution::KeepSubfolders),
        Err(SessionError::IoFailure(_))
    ));
    assert_eq!(session.root(), &mixed);
    assert_eq!(session.inconsistencies().len(), 1);
}
