//! Public error taxonomy for note operations.
//!
//! # Invariants
//! - Store and codec failures are propagated, never swallowed.
//! - The service layer returns these values unchanged.

use crate::codec::CodecError;
use crate::db::DbError;
use crate::model::note::{NoteId, NoteValidationError};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type NoteResult<T> = Result<T, NoteError>;

#[derive(Debug)]
pub enum NoteError {
    /// Input rejected before anything was written.
    Validation(NoteValidationError),
    /// The backing database could not be opened or used.
    StorageUnavailable(DbError),
    /// A stored value could not be decoded.
    CorruptRecord(CodecError),
    NotFound(NoteId),
}

impl NoteError {
    /// Stable machine-readable code used in log lines and UI envelopes.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_error",
            Self::StorageUnavailable(_) => "storage_unavailable",
            Self::CorruptRecord(_) => "corrupt_record",
            Self::NotFound(_) => "not_found",
        }
    }
}

impl Display for NoteError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "invalid note: {err}"),
            Self::StorageUnavailable(err) => write!(f, "note storage unavailable: {err}"),
            Self::CorruptRecord(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "note not found: {id}"),
        }
    }
}

impl Error for NoteError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::StorageUnavailable(err) => Some(err),
            Self::CorruptRecord(err) => Some(err),
            Self::NotFound(_) => None,
        }
    }
}

impl From<NoteValidationError> for NoteError {
    fn from(value: NoteValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for NoteError {
    fn from(value: DbError) -> Self {
        Self::StorageUnavailable(value)
    }
}

impl From<rusqlite::Error> for NoteError {
    fn from(value: rusqlite::Error) -> Self {
        Self::StorageUnavailable(DbError::Sqlite(value))
    }
}

impl From<CodecError> for NoteError {
    fn from(value: CodecError) -> Self {
        Self::CorruptRecord(value)
    }
}
