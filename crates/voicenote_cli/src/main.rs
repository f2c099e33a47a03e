//! Developer CLI over the note core.
//!
//! # Responsibility
//! - Add, list and remove notes in a database file without the mobile UI.
//! - Print the effective configuration.

use clap::{Parser, Subcommand};
use log::error;
use std::path::PathBuf;
use std::process::ExitCode;
use voicenote_core::config::CONFIG_FILE_NAME;
use voicenote_core::{
    init_logging_from_config, CoreConfig, NoteService, NoteServiceSettings, SqliteNoteStore,
};

#[derive(Debug, Parser)]
#[command(name = "voicenote", version, about = "Inspect and edit a voice note database.")]
struct Cli {
    /// Config file (defaults to ./voicenote.json).
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Database file; overrides the config and VOICENOTE_DB_PATH.
    #[arg(long, global = true, value_name = "PATH")]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create a note.
    Add {
        /// Note text.
        #[arg(default_value = "")]
        content: String,
        /// Comma-separated keywords.
        #[arg(short, long, default_value = "")]
        keywords: String,
        /// URI of an attached recording.
        #[arg(short, long)]
        audio: Option<String>,
    },
    /// List notes, newest first.
    List,
    /// Delete a note by id.
    Remove { id: i64 },
    /// Print the effective configuration as JSON.
    Config,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            error!("event=cli_run module=cli status=error error={message}");
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), String> {
    let config_path = cli
        .config
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME));
    let mut config = CoreConfig::load(&config_path).map_err(|err| err.to_string())?;
    if let Some(db) = cli.db {
        config.db_path = Some(db);
    }
    init_logging_from_config(&config).map_err(|err| err.to_string())?;

    if let Command::Config = cli.command {
        let rendered = config.to_pretty_json().map_err(|err| err.to_string())?;
        println!("{rendered}");
        return Ok(());
    }

    let store = SqliteNoteStore::open(config.resolve_db_path()).map_err(|err| err.to_string())?;
    let mut service = NoteService::new(store, NoteServiceSettings::from(&config));

    match cli.command {
        Command::Add {
            content,
            keywords,
            audio,
        } => {
            let note = service
                .create_note(&content, &keywords, audio.as_deref())
                .map_err(|err| err.to_string())?;
            println!("created note {} ({})", note.id, note.title);
        }
        Command::List => {
            for note in service.list_notes().map_err(|err| err.to_string())? {
                let audio = if note.has_audio() { " [audio]" } else { "" };
                println!(
                    "{:>5}  {}  [{}]{}  {}",
                    note.id,
                    note.title,
                    note.keywords.join(", "),
                    audio,
                    note.content
                );
            }
        }
        Command::Remove { id } => {
            service.remove_note(id).map_err(|err| err.to_string())?;
            println!("deleted note {id}");
        }
        Command::Config => {}
    }

    Ok(())
}
