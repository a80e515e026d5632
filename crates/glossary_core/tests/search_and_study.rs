use glossary_core::search::collect_definitions;
use glossary_core::{
    collect, search, Definition, FlashcardStep, Folder, GlossarySession, MemoryStore,
    SearchScope, SessionError,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;

fn library() -> Folder {
    let mut animals = Folder::new("Animals");
    animals.definitions.push(Definition::new("cat", "feline"));
    animals.definitions.push(Definition::new("dog", "canine"));

    let mut trees = Folder::new("Trees");
    trees.definitions.push(Definition::new("oak", "Quercus"));
    let mut plants = Folder::new("Plants");
    plants.subfolders.push(trees);
    plants.subfolders.push(Folder::new("Empty"));

    let mut root = Folder::root();
    root.subfolders.push(animals);
    root.subfolders.push(plants);
    root
}

#[test]
fn search_is_case_insensitive_and_reports_folder_path() {
    let root = library();
    let results = search(&root, "FEL", SearchScope::PhraseOrMeaning);

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].definition.phrase, "cat");
    assert_eq!(results[0].definition.meaning, "feline");
    assert_eq!(results[0].path, "Root/Animals");
}

#[test]
fn empty_query_returns_every_definition_in_pre_order() {
    let root = library();
    let everything = search(&root, "", SearchScope::PhraseOrMeaning);

    assert_eq!(everything, collect(&root));
    let listed = everything
        .iter()
        .map(|entry| (entry.definition.phrase.as_str(), entry.path.as_str()))
        .collect::<Vec<_>>();
    assert_eq!(
        listed,
        vec![
            ("cat", "Root/Animals"),
            ("dog", "Root/Animals"),
            ("oak", "Root/Plants/Trees"),
        ]
    );
}

#[test]
fn search_results_are_a_subset_of_collect() {
    let root = library();
    let all = collect(&root);
    for query in ["a", "O", "ine", "zzz", "quercus"] {
        let results = search(&root, query, SearchScope::PhraseOrMeaning);
        assert!(results.iter().all(|entry| all.contains(entry)));
    }
    assert!(search(&root, "zzz", SearchScope::PhraseOrMeaning).is_empty());
}

#[test]
fn session_search_covers_whole_tree_from_any_position() {
    let mut session = GlossarySession::with_root(library(), MemoryStore::new());
    session.enter_path(&["Plants", "Trees"]).unwrap();

    let results = session.search("canine", SearchScope::PhraseOrMeaning);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].path, "Root/Animals");
    assert_eq!(
        session.search("plants", SearchScope::Everything).len(),
        1
    );
}

#[test]
fn flashcards_show_each_definition_once_then_exhaust() {
    let session = GlossarySession::with_root(library(), MemoryStore::new());
    let mut rng = StdRng::seed_from_u64(42);
    let mut sequencer = session.start_flashcards(&mut rng).unwrap();

    assert_eq!(sequencer.reveal(), None);

    let mut seen = HashSet::new();
    while let FlashcardStep::Card(card) = sequencer.advance() {
        assert!(seen.insert(card.phrase.clone()), "card repeated");
    }
    assert_eq!(seen.len(), 3);
    assert!(sequencer.is_exhausted());
    assert_eq!(sequencer.advance(), FlashcardStep::Exhausted);
    assert_eq!(sequencer.reveal(), None);
}

#[test]
fn reveal_shows_meaning_of_current_card() {
    let session = GlossarySession::with_root(library(), MemoryStore::new());
    let mut sequencer = session
        .start_flashcards(&mut StdRng::seed_from_u64(7))
        .unwrap();

    let phrase = match sequencer.advance() {
        FlashcardStep::Card(card) => card.phrase.clone(),
        FlashcardStep::Exhausted => panic!("deck should not be empty"),
    };
    let meaning = sequencer.reveal().map(str::to_string);

    let expected = collect_definitions(session.root())
        .into_iter()
        .find(|definition| definition.phrase == phrase)
        .map(|definition| definition.meaning.clone());
    assert_eq!(meaning, expected);
    assert!(sequencer.is_revealed());
}

#[test]
fn same_seed_gives_same_card_order() {
    let session = GlossarySession::with_root(library(), MemoryStore::new());
    let order = |seed: u64| {
        let mut sequencer = session
            .start_flashcards(&mut StdRng::seed_from_u64(seed))
            .unwrap();
        let mut phrases = Vec::new();
        while let FlashcardStep::Card(card) = sequencer.advance() {
            phrases.push(card.phrase.clone());
        }
        phrases
    };
    assert_eq!(order(9), order(9));
}

#[test]
fn flashcards_use_current_subtree_and_require_definitions() {
    let mut session = GlossarySession::with_root(library(), MemoryStore::new());
    session.enter_path(&["Plants"]).unwrap();

    let sequencer = session
        .start_flashcards(&mut StdRng::seed_from_u64(1))
        .unwrap();
    assert_eq!(sequencer.len(), 1);

    session.enter_folder_named("Empty").unwrap();
    assert!(matches!(
        session.start_flashcards(&mut StdRng::seed_from_u64(1)),
        Err(SessionError::NoDefinitions)
    ));
}
