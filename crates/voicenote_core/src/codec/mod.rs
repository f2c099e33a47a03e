//! Column codecs for variable-length note fields.
//!
//! # Responsibility
//! - Map in-memory sequences/maps to a single TEXT column and back.
//!
//! # Invariants
//! - Encoder and decoder live side by side and share one JSON format.
//! - Decoding rejects malformed input instead of returning partial data.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod keywords;
pub mod metadata;

pub use keywords::{decode_keywords, encode_keywords};
pub use metadata::{decode_extra, encode_extra};

/// Codec failure for one stored column value.
#[derive(Debug)]
pub enum CodecError {
    CorruptRecord {
        column: &'static str,
        reason: String,
    },
}

impl CodecError {
    pub(crate) fn corrupt(column: &'static str, reason: impl Into<String>) -> Self {
        Self::CorruptRecord {
            column,
            reason: reason.into(),
        }
    }
}

impl Display for CodecError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CorruptRecord { column, reason } => {
                write!(f, "corrupt value in column `{column}`: {reason}")
            }
        }
    }
}

impl Error for CodecError {}
