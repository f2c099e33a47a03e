//! Device capabilities a voice note may need.

use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Capability {
    Microphone,
    Storage,
}

/// Stable string id for the microphone capability.
pub const CAPABILITY_MICROPHONE: &str = "microphone";
/// Stable string id for the storage capability.
pub const CAPABILITY_STORAGE: &str = "storage";

impl Capability {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Microphone => CAPABILITY_MICROPHONE,
            Self::Storage => CAPABILITY_STORAGE,
        }
    }

    /// User-facing short description shown next to the permission prompt.
    pub fn description(self) -> &'static str {
        match self {
            Self::Microphone => "Allow microphone access to record voice notes.",
            Self::Storage => "Allow storage access to keep recordings on this device.",
        }
    }
}

/// Parses a capability from its stable string id.
pub fn parse_capability(value: &str) -> Result<Capability, CapabilityError> {
    match value.trim() {
        "" => Err(CapabilityError::Empty),
        CAPABILITY_MICROPHONE => Ok(Capability::Microphone),
        CAPABILITY_STORAGE => Ok(Capability::Storage),
        other => Err(CapabilityError::Unsupported(other.to_string())),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CapabilityError {
    Empty,
    Unsupported(String),
}

impl Display for CapabilityError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "capability value must not be empty"),
            Self::Unsupported(value) => write!(f, "capability is unsupported: {value}"),
        }
    }
}

impl Error for CapabilityError {}
