//! Command-line front-end for the glossary manager.
//!
//! # Responsibility
//! - Parse arguments and resolve effective configuration.
//! - Open one session over the configured data file and dispatch a command.
//! - Report failures with `anyhow` context; core errors stay typed below.

mod commands;
mod render;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use glossary_core::{init_logging, GlossaryConfig, GlossarySession, JsonFileStore, Resolution};
use log::info;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "glossary",
    about = "Folder-organized glossary and flashcards",
    version = glossary_core::core_version()
)]
struct Cli {
    /// Data file holding the whole tree (default: data.json)
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Folder to operate in, as names from the root separated by `/`
    #[arg(long, global = true)]
    folder: Option<String>,

    /// Log level: trace|debug|info|warn|error|off
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Write rotated log files to this directory instead of stderr
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// Do not write changes back to the data file
    #[arg(long, global = true)]
    no_autosave: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the folder's subfolders or definitions
    Show,

    /// Create a subfolder in the folder
    AddFolder { name: String },

    /// Delete a subfolder and everything below it
    DeleteFolder { name: String },

    /// Rename the folder
    Rename { name: String },

    /// Set or clear the folder color (#RRGGBB)
    Color {
        /// Omit to clear the color
        color: Option<String>,
    },

    /// Add a definition to the folder
    Add { phrase: String, meaning: String },

    /// Replace the first definition whose phrase matches
    Edit {
        phrase: String,
        new_phrase: String,
        new_meaning: String,
    },

    /// Delete every definition whose phrase matches
    Delete { phrase: String },

    /// Export the whole tree as pretty-printed JSON
    Export { path: PathBuf },

    /// Import JSON, CSV/TSV or a spreadsheet into the folder
    ///
    /// Tabular files must carry `Phrase` and `Meaning` columns.
    Import { path: PathBuf },

    /// List the columns of a tabular file
    Columns { path: PathBuf },

    /// Preview definitions read from a tabular file
    Preview(TableArgs),

    /// Import selected columns and rows of a tabular file into the folder
    ImportTable(TableArgs),

    /// Search the whole tree by phrase or meaning
    Search {
        query: String,
        /// Also match folder paths
        #[arg(long)]
        everything: bool,
    },

    /// List every definition with its folder path
    All,

    /// Study the folder's definitions as shuffled flashcards
    Flashcards {
        /// Fixed shuffle seed
        #[arg(long)]
        seed: Option<u64>,
    },

    /// List or repair folders holding both subfolders and definitions
    Repair {
        /// Content to keep in every mixed folder
        #[arg(long, value_enum)]
        keep: Option<KeepArg>,
    },
}

#[derive(clap::Args)]
struct TableArgs {
    path: PathBuf,
    /// Column providing phrases
    #[arg(long)]
    phrase_column: Option<String>,
    /// Column providing meanings
    #[arg(long)]
    meaning_column: Option<String>,
    /// 1-based data rows to leave out (repeatable or comma-separated)
    #[arg(long, value_delimiter = ',')]
    exclude: Vec<usize>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum KeepArg {
    Subfolders,
    Definitions,
}

impl From<KeepArg> for Resolution {
    fn from(value: KeepArg) -> Self {
        match value {
            KeepArg::Subfolders => Resolution::KeepSubfolders,
            KeepArg::Definitions => Resolution::KeepDefinitions,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = resolve_config(&cli)?;
    init_logging(&config.log_level, config.log_dir.as_deref())
        .map_err(anyhow::Error::msg)
        .context("failed to start logging")?;

    let store = JsonFileStore::new(&config.data_file);
    let mut session = GlossarySession::open(store)
        .with_context(|| format!("failed to open `{}`", config.data_file.display()))?;
    session.set_autosave(config.autosave);
    info!(
        "event=session_open module=cli status=ok autosave={} definitions={}",
        config.autosave,
        session.root().definition_count()
    );

    if session.has_inconsistencies() && !matches!(cli.command, Command::Repair { .. }) {
        render::inconsistency_warning(&session.inconsistencies());
    }
    if let Some(folder) = cli.folder.as_deref() {
        let names = folder
            .split('/')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .collect::<Vec<_>>();
        session
            .enter_path(names.as_slice())
            .with_context(|| format!("cannot open folder `{folder}`"))?;
    }

    commands::dispatch(&mut session, cli.command)
}

fn resolve_config(cli: &Cli) -> Result<GlossaryConfig> {
    let mut config = GlossaryConfig::from_env()?;
    if let Some(data) = &cli.data {
        config.data_file = data.clone();
    }
    if let Some(level) = cli.log_level.as_deref() {
        config.set_log_level(level)?;
    }
    if let Some(dir) = &cli.log_dir {
        config.log_dir = Some(dir.clone());
    }
    if let Some(dir) = config.log_dir.take() {
        let absolute = if dir.is_absolute() {
            dir
        } else {
            std::env::current_dir()
                .context("failed to resolve working directory")?
                .join(dir)
        };
        config.log_dir = Some(absolute);
    }
    if cli.no_autosave {
        config.autosave = false;
    }
    Ok(config)
}
