use crate::{render, Command, TableArgs};
use anyhow::{bail, Context, Result};
use glossary_core::{
    collect, ColumnMapping, FlashcardStep, GlossarySession, JsonFileStore, SearchScope,
    SessionError, TabularImport,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::{BufRead, Write};

type Session = GlossarySession<JsonFileStore>;

pub fn dispatch(session: &mut Session, command: Command) -> Result<()> {
    match command {
        Command::Show => render::folder(&session.path_label(), session.current()),
        Command::AddFolder { name } => {
            session.add_folder(&name)?;
            println!("Added folder `{}`.", name.trim());
        }
        Command::DeleteFolder { name } => {
            let removed = session.delete_folder(&name)?;
            println!(
                "Deleted folder `{}` ({} definitions).",
                removed.name,
                removed.definition_count()
            );
        }
        Command::Rename { name } => {
            session.rename_folder(&name)?;
            println!("Renamed folder to `{}`.", session.current().name);
        }
        Command::Color { color } => {
            session.set_folder_color(color.as_deref())?;
            match &session.current().color {
                Some(color) => println!("Folder color set to {color}."),
                None => println!("Folder color cleared."),
            }
        }
        Command::Add { phrase, meaning } => {
            session.add_definition(&phrase, &meaning)?;
            println!("Added `{phrase}`.");
        }
        Command::Edit {
            phrase,
            new_phrase,
            new_meaning,
        } => {
            session.edit_definition(&phrase, &new_phrase, &new_meaning)?;
            println!("Updated `{phrase}`.");
        }
        Command::Delete { phrase } => {
            let removed = session.delete_definition(&phrase)?;
            println!("Deleted {removed} definition(s) named `{phrase}`.");
        }
        Command::Export { path } => {
            session
                .export_to(&path)
                .with_context(|| format!("failed to export to `{}`", path.display()))?;
            println!("Exported to {}.", path.display());
        }
        Command::Import { path } => {
            let summary = session
                .import_from(&path)
                .with_context(|| format!("failed to import `{}`", path.display()))?;
            println!(
                "Imported {} folder(s) and {} definition(s).",
                summary.folders, summary.definitions
            );
        }
        Command::Columns { path } => {
            let import = TabularImport::open(&path)
                .with_context(|| format!("failed to read `{}`", path.display()))?;
            render::columns(import.columns());
        }
        Command::Preview(args) => {
            let import = prepare_import(&args)?;
            render::preview(&import.preview());
        }
        Command::ImportTable(args) => {
            let import = prepare_import(&args)?;
            let appended = session.append_definitions(import.confirm())?;
            println!("Imported {appended} definition(s).");
        }
        Command::Search { query, everything } => {
            let scope = if everything {
                SearchScope::Everything
            } else {
                SearchScope::PhraseOrMeaning
            };
            render::collected(&session.search(&query, scope));
        }
        Command::All => render::collected(&collect(session.root())),
        Command::Flashcards { seed } => run_flashcards(session, seed)?,
        Command::Repair { keep } => match keep {
            Some(keep) => {
                let repaired = session.resolve_inconsistencies(keep.into())?;
                println!("Repaired {repaired} folder(s).");
            }
            None => render::inconsistencies(&session.inconsistencies()),
        },
    }
    Ok(())
}

fn prepare_import(args: &TableArgs) -> Result<TabularImport> {
    let mut import = TabularImport::open(&args.path)
        .with_context(|| format!("failed to read `{}`", args.path.display()))?;

    let phrase = args
        .phrase_column
        .clone()
        .unwrap_or_else(|| import.mapping().phrase.clone());
    let meaning = args
        .meaning_column
        .clone()
        .unwrap_or_else(|| import.mapping().meaning.clone());
    import.set_mapping(ColumnMapping::new(phrase, meaning))?;

    for row in &args.exclude {
        if *row == 0 {
            bail!("row numbers start at 1");
        }
        import.set_included(row - 1, false)?;
    }
    Ok(import)
}

fn run_flashcards(session: &Session, seed: Option<u64>) -> Result<()> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut sequencer = match session.start_flashcards(&mut rng) {
        Ok(sequencer) => sequencer,
        Err(SessionError::NoDefinitions) => {
            println!("No definitions here to study.");
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    println!(
        "{} card(s). Enter reveals and advances; `q` quits.",
        sequencer.len()
    );
    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();
    let mut prompt = |text: &str| -> Result<Option<String>> {
        print!("{text}");
        std::io::stdout().flush()?;
        match lines.next() {
            Some(line) => Ok(Some(line?)),
            None => Ok(None),
        }
    };

    loop {
        let total = sequencer.len();
        let remaining = sequencer.remaining();
        let phrase = match sequencer.advance() {
            FlashcardStep::Card(card) => card.phrase.clone(),
            FlashcardStep::Exhausted => {
                println!("No more definitions.");
                return Ok(());
            }
        };
        println!("\n[{}/{}] {}", total - remaining + 1, total, phrase);
        if is_quit(prompt("  reveal> ")?) {
            return Ok(());
        }
        if let Some(meaning) = sequencer.reveal() {
            println!("  {meaning}");
        }
        if is_quit(prompt("  next> ")?) {
            return Ok(());
        }
    }
}

fn is_quit(line: Option<String>) -> bool {
    match line {
        None => true,
        Some(line) => line.trim().eq_ignore_ascii_case("q"),
    }
}
