//! Contracts for the device collaborators around voice notes.
//!
//! # Responsibility
//! - Describe what core needs from audio capture/playback and permissions.
//! - Drive one recording through an explicitly polled session.
//!
//! # Invariants
//! - Core never touches platform audio APIs; it only receives an audio URI.
//! - A finished recording yields its URI exactly once.

pub mod capability;
pub mod session;

pub use capability::{parse_capability, Capability, CapabilityError};
pub use session::{
    play_note_audio, AudioPlayer, AudioRecorder, CaptureError, PermissionGate, RecordingHandle,
    RecordingSession, RecordingStatus,
};
