//! Core domain logic for the voice note app.
//! This crate is the single source of truth for note invariants.

pub mod capture;
pub mod codec;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use codec::{decode_keywords, encode_keywords, CodecError};
pub use config::{ConfigError, CoreConfig};
pub use error::{NoteError, NoteResult};
pub use logging::{
    default_log_level, init_logging, init_logging_from_config, logging_status, LoggingError,
};
pub use model::note::{NewNote, Note, NoteId, NoteValidationError, SyncMetadata};
pub use repo::note_repo::{NoteRepository, SqliteNoteStore};
pub use service::clock::{Clock, SystemClock};
pub use service::keywords::normalize_keywords;
pub use service::note_service::{NoteService, NoteServiceSettings, DEFAULT_DEVICE_ID};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
