//! Plain-text rendering of session state.

use glossary_core::{CollectedDefinition, Folder, FolderKind, Inconsistency, PreviewRow};

pub fn folder(label: &str, folder: &Folder) {
    match &folder.color {
        Some(color) => println!("{label}  [{color}]"),
        None => println!("{label}"),
    }
    match folder.kind() {
        FolderKind::Empty => println!("  (empty)"),
        FolderKind::Branch => subfolders(folder),
        FolderKind::Leaf => definitions(folder),
        FolderKind::Mixed => {
            subfolders(folder);
            definitions(folder);
        }
    }
}

fn subfolders(folder: &Folder) {
    for (index, child) in folder.subfolders.iter().enumerate() {
        let color = child.color.as_deref().unwrap_or("-");
        println!(
            "  {:>3}. {}/  {}  ({} definitions)",
            index + 1,
            child.name,
            color,
            child.definition_count()
        );
    }
}

fn definitions(folder: &Folder) {
    for definition in &folder.definitions {
        println!("  {} : {}", definition.phrase, definition.meaning);
    }
}

pub fn collected(entries: &[CollectedDefinition<'_>]) {
    if entries.is_empty() {
        println!("No definitions found.");
        return;
    }
    for entry in entries {
        println!(
            "{}  {} : {}",
            entry.path, entry.definition.phrase, entry.definition.meaning
        );
    }
    println!("{} result(s)", entries.len());
}

pub fn columns(columns: &[String]) {
    for (index, column) in columns.iter().enumerate() {
        println!("{:>3}. {}", index + 1, column);
    }
}

pub fn preview(rows: &[PreviewRow]) {
    for row in rows {
        let mark = if row.included { "x" } else { " " };
        println!("[{mark}] {:>4}  {} : {}", row.index + 1, row.phrase, row.meaning);
    }
    let included = rows.iter().filter(|row| row.included).count();
    println!("{included} of {} row(s) selected", rows.len());
}

pub fn inconsistencies(pending: &[Inconsistency]) {
    if pending.is_empty() {
        println!("No mixed folders.");
        return;
    }
    for entry in pending {
        println!(
            "{}: {} subfolder(s), {} definition(s)",
            entry.label, entry.subfolder_count, entry.definition_count
        );
    }
}

pub fn inconsistency_warning(pending: &[Inconsistency]) {
    eprintln!(
        "warning: {} folder(s) hold both subfolders and definitions; \
         run `glossary repair --keep subfolders|definitions` before editing",
        pending.len()
    );
}
