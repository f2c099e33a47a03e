//! Note domain model.
//!
//! # Responsibility
//! - Define `Note` (persisted) and `NewNote` (not yet assigned an id).
//! - Group sync-related fields into `SyncMetadata`.
//! - Validate records before they reach storage.
//!
//! # Invariants
//! - `id` is assigned by the store and never changes.
//! - Keywords keep caller order; duplicates are allowed.
//! - `SyncMetadata::is_sync` starts `false` and nothing in core flips it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-generated note identifier.
pub type NoteId = i64;

/// Sync bookkeeping kept as an explicit extension point.
///
/// `extra` is persisted in a reserved JSON column so later sync work can add
/// keys without a schema change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncMetadata {
    pub is_sync: bool,
    pub device_id: String,
    #[serde(default)]
    pub extra: BTreeMap<String, String>,
}

impl SyncMetadata {
    /// Metadata for a note created on `device_id` that has never been synced.
    pub fn unsynced(device_id: impl Into<String>) -> Self {
        Self {
            is_sync: false,
            device_id: device_id.into(),
            extra: BTreeMap::new(),
        }
    }
}

/// A note that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewNote {
    pub title: String,
    pub content: String,
    pub keywords: Vec<String>,
    pub audio_uri: Option<String>,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    /// Unix epoch milliseconds. Must be >= `created_at`.
    pub updated_at: i64,
    pub sync: SyncMetadata,
}

/// A persisted note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    pub content: String,
    pub keywords: Vec<String>,
    pub audio_uri: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
    pub sync: SyncMetadata,
}

impl NewNote {
    /// Checks the invariants required before a note may be written.
    pub fn validate(&self) -> Result<(), NoteValidationError> {
        validate_fields(
            &self.content,
            &self.keywords,
            self.audio_uri.as_deref(),
            self.created_at,
            self.updated_at,
            &self.sync,
        )
    }

    /// Attaches the store-assigned id.
    pub fn into_note(self, id: NoteId) -> Note {
        Note {
            id,
            title: self.title,
            content: self.content,
            keywords: self.keywords,
            audio_uri: self.audio_uri,
            created_at: self.created_at,
            updated_at: self.updated_at,
            sync: self.sync,
        }
    }
}

impl Note {
    /// Re-checks invariants on a record loaded from storage.
    pub fn validate(&self) -> Result<(), NoteValidationError> {
        validate_fields(
            &self.content,
            &self.keywords,
            self.audio_uri.as_deref(),
            self.created_at,
            self.updated_at,
            &self.sync,
        )
    }

    /// Returns whether a recording is attached.
    pub fn has_audio(&self) -> bool {
        self.audio_uri.is_some()
    }
}

fn validate_fields(
    content: &str,
    keywords: &[String],
    audio_uri: Option<&str>,
    created_at: i64,
    updated_at: i64,
    sync: &SyncMetadata,
) -> Result<(), NoteValidationError> {
    let has_audio = audio_uri.is_some_and(|uri| !uri.trim().is_empty());
    if content.trim().is_empty() && !has_audio {
        return Err(NoteValidationError::EmptyNote);
    }

    if let Some(index) = keywords.iter().position(|k| k.trim().is_empty()) {
        return Err(NoteValidationError::BlankKeyword { index });
    }

    if updated_at < created_at {
        return Err(NoteValidationError::TimestampOrder {
            created_at,
            updated_at,
        });
    }

    if sync.device_id.trim().is_empty() {
        return Err(NoteValidationError::InvalidDeviceId);
    }

    Ok(())
}

/// Rejected note shapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteValidationError {
    /// Neither text content nor an audio attachment is present.
    EmptyNote,
    BlankKeyword {
        index: usize,
    },
    TimestampOrder {
        created_at: i64,
        updated_at: i64,
    },
    InvalidDeviceId,
}

impl Display for NoteValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyNote => write!(f, "note needs text content or an audio recording"),
            Self::BlankKeyword { index } => write!(f, "keyword at index {index} is blank"),
            Self::TimestampOrder {
                created_at,
                updated_at,
            } => write!(
                f,
                "updated_at ({updated_at}) must be >= created_at ({created_at})"
            ),
            Self::InvalidDeviceId => write!(f, "device_id must not be blank"),
        }
    }
}

impl Error for NoteValidationError {}

#[cfg(test)]
mod tests {
    use super::{NewNote, NoteValidationError, SyncMetadata};

    fn draft(content: &str, audio_uri: Option<&str>) -> NewNote {
        NewNote {
            title: "2024-01-01 00:00:00".to_string(),
            content: content.to_string(),
            keywords: Vec::new(),
            audio_uri: audio_uri.map(str::to_string),
            created_at: 1_000,
            updated_at: 1_000,
            sync: SyncMetadata::unsynced("local-device"),
        }
    }

    #[test]
    fn blank_content_without_audio_is_rejected() {
        assert_eq!(
            draft("   \n", None).validate(),
            Err(NoteValidationError::EmptyNote)
        );
    }

    #[test]
    fn blank_content_with_audio_is_accepted() {
        assert!(draft("", Some("file://x")).validate().is_ok());
    }

    #[test]
    fn blank_audio_uri_does_not_count_as_attachment() {
        assert_eq!(
            draft("", Some("  ")).validate(),
            Err(NoteValidationError::EmptyNote)
        );
    }

    #[test]
    fn reversed_timestamps_are_rejected() {
        let mut note = draft("body", None);
        note.updated_at = 999;
        assert!(matches!(
            note.validate(),
            Err(NoteValidationError::TimestampOrder { .. })
        ));
    }

    #[test]
    fn blank_keyword_reports_its_index() {
        let mut note = draft("body", None);
        note.keywords = vec!["a".to_string(), " ".to_string()];
        assert_eq!(
            note.validate(),
            Err(NoteValidationError::BlankKeyword { index: 1 })
        );
    }

    #[test]
    fn new_metadata_is_unsynced() {
        let sync = SyncMetadata::unsynced("dev");
        assert!(!sync.is_sync);
        assert!(sync.extra.is_empty());
    }
}
