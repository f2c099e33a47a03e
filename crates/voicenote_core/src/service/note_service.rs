//! Note use-case service.
//!
//! # Responsibility
//! - Turn raw UI input into a `NewNote` (keywords, timestamps, title).
//! - Delegate persistence to a `NoteRepository`.
//!
//! # Invariants
//! - Store errors are returned unchanged.
//! - Timestamps handed out by one service never go backwards.
//! - `remove_note` is only called after the user confirmed deletion.

use crate::config::CoreConfig;
use crate::error::NoteResult;
use crate::model::note::{NewNote, Note, NoteId, SyncMetadata};
use crate::repo::note_repo::NoteRepository;
use crate::service::clock::{Clock, SystemClock};
use crate::service::keywords::normalize_keywords;
use crate::service::title::{format_title, DEFAULT_TITLE_FORMAT};
use log::warn;

/// Placeholder device identifier used until a real per-device id exists.
pub const DEFAULT_DEVICE_ID: &str = "local-device";

/// Values the service stamps onto every new note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteServiceSettings {
    pub device_id: String,
    pub title_format: String,
    /// `None` renders titles in the host's local zone.
    pub utc_offset_minutes: Option<i32>,
}

impl Default for NoteServiceSettings {
    fn default() -> Self {
        Self {
            device_id: DEFAULT_DEVICE_ID.to_string(),
            title_format: DEFAULT_TITLE_FORMAT.to_string(),
            utc_offset_minutes: None,
        }
    }
}

impl From<&CoreConfig> for NoteServiceSettings {
    fn from(config: &CoreConfig) -> Self {
        Self {
            device_id: config.device_id.clone(),
            title_format: config.title_format.clone(),
            utc_offset_minutes: config.utc_offset_minutes,
        }
    }
}

/// Note service facade over a store implementation.
pub struct NoteService<R: NoteRepository, C: Clock = SystemClock> {
    repo: R,
    clock: C,
    settings: NoteServiceSettings,
    last_stamp: i64,
}

impl<R: NoteRepository> NoteService<R, SystemClock> {
    /// Creates a service using wall-clock time.
    pub fn new(repo: R, settings: NoteServiceSettings) -> Self {
        Self::with_clock(repo, settings, SystemClock)
    }
}

impl<R: NoteRepository, C: Clock> NoteService<R, C> {
    /// Creates a service with an injected time source.
    pub fn with_clock(repo: R, settings: NoteServiceSettings, clock: C) -> Self {
        Self {
            repo,
            clock,
            settings,
            last_stamp: i64::MIN,
        }
    }

    /// Creates and persists one note from raw UI input.
    ///
    /// - `raw_keywords` is split on `,`/`，`, trimmed, and emptied fragments dropped.
    /// - A blank `audio_uri` counts as no recording.
    ///
    /// # Errors
    /// - `NoteError::Validation` when there is neither text nor audio.
    /// - Any store error, unchanged.
    pub fn create_note(
        &mut self,
        raw_content: &str,
        raw_keywords: &str,
        audio_uri: Option<&str>,
    ) -> NoteResult<Note> {
        let now = self.clock.now_epoch_ms().max(self.last_stamp);
        let draft = NewNote {
            title: format_title(
                now,
                &self.settings.title_format,
                self.settings.utc_offset_minutes,
            ),
            content: raw_content.to_string(),
            keywords: normalize_keywords(raw_keywords),
            audio_uri: audio_uri
                .map(str::trim)
                .filter(|uri| !uri.is_empty())
                .map(str::to_string),
            created_at: now,
            updated_at: now,
            sync: SyncMetadata::unsynced(self.settings.device_id.as_str()),
        };

        match self.repo.insert(draft) {
            Ok(note) => {
                self.last_stamp = now;
                Ok(note)
            }
            Err(err) => {
                warn!(
                    "event=note_create module=service status=error error_code={} error={}",
                    err.code(),
                    err
                );
                Err(err)
            }
        }
    }

    /// Lists all notes, most recently updated first.
    pub fn list_notes(&self) -> NoteResult<Vec<Note>> {
        self.repo.list_all()
    }

    /// Gets one note by id.
    pub fn get_note(&self, id: NoteId) -> NoteResult<Option<Note>> {
        self.repo.get(id)
    }

    /// Deletes one note. Fails with `NoteError::NotFound` for unknown ids.
    pub fn remove_note(&mut self, id: NoteId) -> NoteResult<()> {
        self.repo.delete_by_id(id)
    }

    /// Number of stored notes.
    pub fn note_count(&self) -> NoteResult<u64> {
        self.repo.count()
    }

    pub fn settings(&self) -> &NoteServiceSettings {
        &self.settings
    }
}
