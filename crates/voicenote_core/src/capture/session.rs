//! Recording session driven by status polling.
//!
//! The platform layer implements `AudioRecorder`, `AudioPlayer` and
//! `PermissionGate`; core only sequences the calls and hands the resulting
//! audio URI to `NoteService::create_note`.

use super::capability::Capability;
use crate::model::note::Note;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Opaque id of one in-flight recording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecordingHandle(Uuid);

impl RecordingHandle {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn id(&self) -> Uuid {
        self.0
    }
}

impl Default for RecordingHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// Platform audio capture.
pub trait AudioRecorder {
    fn start(&mut self) -> Result<RecordingHandle, CaptureError>;
    /// Stops the recording and returns the URI of the written audio file.
    fn stop(&mut self, handle: RecordingHandle) -> Result<String, CaptureError>;
}

/// Platform audio playback.
pub trait AudioPlayer {
    fn play(&mut self, audio_uri: &str) -> Result<(), CaptureError>;
}

/// Platform permission prompt.
pub trait PermissionGate {
    /// Returns `true` once the capability is granted (prompting if needed).
    fn ensure_granted(&mut self, capability: Capability) -> bool;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureError {
    PermissionDenied(Capability),
    AlreadyRecording,
    NotRecording,
    NoAudioAttached,
    /// Failure reported by the platform implementation.
    Device(String),
}

impl Display for CaptureError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PermissionDenied(capability) => {
                write!(f, "permission denied: {}", capability.as_str())
            }
            Self::AlreadyRecording => write!(f, "a recording is already in progress"),
            Self::NotRecording => write!(f, "no recording in progress"),
            Self::NoAudioAttached => write!(f, "note has no audio recording"),
            Self::Device(message) => write!(f, "audio device error: {message}"),
        }
    }
}

impl Error for CaptureError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordingStatus {
    Idle,
    Recording(RecordingHandle),
    Finished { audio_uri: String },
}

/// One recording at a time, observed through `status()`.
pub struct RecordingSession<R: AudioRecorder, P: PermissionGate> {
    recorder: R,
    permissions: P,
    status: RecordingStatus,
}

impl<R: AudioRecorder, P: PermissionGate> RecordingSession<R, P> {
    pub fn new(recorder: R, permissions: P) -> Self {
        Self {
            recorder,
            permissions,
            status: RecordingStatus::Idle,
        }
    }

    pub fn status(&self) -> &RecordingStatus {
        &self.status
    }

    /// Starts recording after the microphone permission is granted.
    ///
    /// An unclaimed finished recording is replaced.
    pub fn start(&mut self) -> Result<RecordingHandle, CaptureError> {
        if matches!(self.status, RecordingStatus::Recording(_)) {
            return Err(CaptureError::AlreadyRecording);
        }
        if !self.permissions.ensure_granted(Capability::Microphone) {
            warn!("event=recording_start module=capture status=error error_code=permission_denied");
            return Err(CaptureError::PermissionDenied(Capability::Microphone));
        }

        let handle = self.recorder.start()?;
        self.status = RecordingStatus::Recording(handle);
        info!(
            "event=recording_start module=capture status=ok recording_id={}",
            handle.id()
        );
        Ok(handle)
    }

    /// Stops the current recording; the URI becomes available via `take_audio_uri`.
    pub fn stop(&mut self) -> Result<(), CaptureError> {
        let RecordingStatus::Recording(handle) = self.status else {
            return Err(CaptureError::NotRecording);
        };

        match self.recorder.stop(handle) {
            Ok(audio_uri) => {
                info!(
                    "event=recording_stop module=capture status=ok recording_id={}",
                    handle.id()
                );
                self.status = RecordingStatus::Finished { audio_uri };
                Ok(())
            }
            Err(err) => {
                warn!(
                    "event=recording_stop module=capture status=error recording_id={} error={}",
                    handle.id(),
                    err
                );
                self.status = RecordingStatus::Idle;
                Err(err)
            }
        }
    }

    /// Claims the finished recording's URI and resets the session to idle.
    pub fn take_audio_uri(&mut self) -> Option<String> {
        match std::mem::replace(&mut self.status, RecordingStatus::Idle) {
            RecordingStatus::Finished { audio_uri } => Some(audio_uri),
            other => {
                self.status = other;
                None
            }
        }
    }

    /// Drops a finished recording without attaching it.
    pub fn discard(&mut self) {
        if matches!(self.status, RecordingStatus::Finished { .. }) {
            self.status = RecordingStatus::Idle;
        }
    }
}

/// Plays the recording attached to `note`.
pub fn play_note_audio(player: &mut impl AudioPlayer, note: &Note) -> Result<(), CaptureError> {
    let audio_uri = note
        .audio_uri
        .as_deref()
        .ok_or(CaptureError::NoAudioAttached)?;
    player.play(audio_uri)
}

#[cfg(test)]
mod tests {
    use super::{
        play_note_audio, AudioPlayer, AudioRecorder, CaptureError, PermissionGate,
        RecordingHandle, RecordingSession, RecordingStatus,
    };
    use crate::capture::Capability;
    use crate::model::note::{Note, SyncMetadata};

    #[derive(Default)]
    struct FakeRecorder {
        fail_stop: bool,
    }

    impl AudioRecorder for FakeRecorder {
        fn start(&mut self) -> Result<RecordingHandle, CaptureError> {
            Ok(RecordingHandle::new())
        }

        fn stop(&mut self, handle: RecordingHandle) -> Result<String, CaptureError> {
            if self.fail_stop {
                return Err(CaptureError::Device("disk full".to_string()));
            }
            Ok(format!("file:///recordings/{}.m4a", handle.id()))
        }
    }

    struct FixedGate(bool);

    impl PermissionGate for FixedGate {
        fn ensure_granted(&mut self, _capability: Capability) -> bool {
            self.0
        }
    }

    #[derive(Default)]
    struct FakePlayer {
        played: Vec<String>,
    }

    impl AudioPlayer for FakePlayer {
        fn play(&mut self, audio_uri: &str) -> Result<(), CaptureError> {
            self.played.push(audio_uri.to_string());
            Ok(())
        }
    }

    #[test]
    fn finished_recording_yields_uri_once() {
        let mut session = RecordingSession::new(FakeRecorder::default(), FixedGate(true));
        let handle = session.start().unwrap();
        assert_eq!(session.status(), &RecordingStatus::Recording(handle));

        session.stop().unwrap();
        let uri = session.take_audio_uri().expect("uri after stop");
        assert!(uri.contains(&handle.id().to_string()));
        assert_eq!(session.take_audio_uri(), None);
        assert_eq!(session.status(), &RecordingStatus::Idle);
    }

    #[test]
    fn denied_microphone_blocks_start() {
        let mut session = RecordingSession::new(FakeRecorder::default(), FixedGate(false));
        assert_eq!(
            session.start(),
            Err(CaptureError::PermissionDenied(Capability::Microphone))
        );
        assert_eq!(session.status(), &RecordingStatus::Idle);
    }

    #[test]
    fn double_start_and_idle_stop_are_rejected() {
        let mut session = RecordingSession::new(FakeRecorder::default(), FixedGate(true));
        assert_eq!(session.stop(), Err(CaptureError::NotRecording));
        session.start().unwrap();
        assert_eq!(session.start(), Err(CaptureError::AlreadyRecording));
    }

    #[test]
    fn failed_stop_returns_to_idle() {
        let recorder = FakeRecorder { fail_stop: true };
        let mut session = RecordingSession::new(recorder, FixedGate(true));
        session.start().unwrap();
        assert!(matches!(session.stop(), Err(CaptureError::Device(_))));
        assert_eq!(session.status(), &RecordingStatus::Idle);
        assert_eq!(session.take_audio_uri(), None);
    }

    #[test]
    fn discard_drops_finished_recording() {
        let mut session = RecordingSession::new(FakeRecorder::default(), FixedGate(true));
        session.start().unwrap();
        session.stop().unwrap();
        session.discard();
        assert_eq!(session.take_audio_uri(), None);
    }

    #[test]
    fn play_requires_attached_audio() {
        let mut note = Note {
            id: 1,
            title: "t".to_string(),
            content: "text".to_string(),
            keywords: Vec::new(),
            audio_uri: None,
            created_at: 1,
            updated_at: 1,
            sync: SyncMetadata::unsynced("local-device"),
        };
        let mut player = FakePlayer::default();
        assert_eq!(
            play_note_audio(&mut player, &note),
            Err(CaptureError::NoAudioAttached)
        );

        note.audio_uri = Some("file://x".to_string());
        play_note_audio(&mut player, &note).unwrap();
        assert_eq!(player.played, vec!["file://x".to_string()]);
    }
}
