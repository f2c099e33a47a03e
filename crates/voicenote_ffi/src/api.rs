//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose note create/list/remove to Dart via FRB.
//! - Own the process-scoped note service, constructed once by `init_store`.
//! - Turn every failure into an envelope the UI can show to the user.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - `remove_note` is called only after the UI obtained user confirmation.

use log::{info, warn};
use once_cell::sync::OnceCell;
use std::path::PathBuf;
use std::sync::Mutex;
use voicenote_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, CoreConfig, Note,
    NoteError, NoteService, NoteServiceSettings, SqliteNoteStore,
};

/// The store opened by the first successful `init_store`, with the settings it was opened with.
struct ActiveStore {
    db_path: PathBuf,
    device_id: String,
    service: Mutex<NoteService<SqliteNoteStore>>,
}

static ACTIVE_STORE: OnceCell<ActiveStore> = OnceCell::new();

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Returns an empty string on success and an error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.trim()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Note projection handed to the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteItem {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub keywords: Vec<String>,
    pub audio_uri: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<Note> for NoteItem {
    fn from(note: Note) -> Self {
        Self {
            id: note.id,
            title: note.title,
            content: note.content,
            keywords: note.keywords,
            audio_uri: note.audio_uri,
            created_at: note.created_at,
            updated_at: note.updated_at,
        }
    }
}

/// Response envelope for mutating calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteActionResponse {
    pub ok: bool,
    /// Created note on a successful create.
    pub note: Option<NoteItem>,
    /// Machine-readable failure code (`validation_error`, `not_found`, ...).
    pub error_code: Option<String>,
    /// Message the UI shows as a recoverable notification.
    pub message: String,
}

impl NoteActionResponse {
    fn success(message: impl Into<String>, note: Option<NoteItem>) -> Self {
        Self {
            ok: true,
            note,
            error_code: None,
            message: message.into(),
        }
    }

    fn failure(error_code: &str, message: impl Into<String>) -> Self {
        Self {
            ok: false,
            note: None,
            error_code: Some(error_code.to_string()),
            message: message.into(),
        }
    }
}

/// Response envelope for the note list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteListResponse {
    pub ok: bool,
    /// Newest first.
    pub items: Vec<NoteItem>,
    pub message: String,
}

/// Opens the note database and builds the process-wide service.
///
/// `db_path = None` resolves like `CoreConfig::resolve_db_path` (env, then temp dir);
/// a blank `device_id` uses the default placeholder.
///
/// # FFI contract
/// - Repeating the call with the same settings succeeds without reopening.
/// - A later call asking for another path or device id fails with
///   `already_initialized`; the open store is left untouched.
#[flutter_rust_bridge::frb(sync)]
pub fn init_store(db_path: Option<String>, device_id: String) -> NoteActionResponse {
    let config = store_config(db_path, &device_id);
    let requested_path = config.resolve_db_path();

    let mut opened_here = false;
    let active = ACTIVE_STORE.get_or_try_init(|| -> Result<ActiveStore, NoteError> {
        let store = SqliteNoteStore::open(&requested_path)?;
        opened_here = true;
        Ok(ActiveStore {
            db_path: requested_path.clone(),
            device_id: config.device_id.clone(),
            service: Mutex::new(NoteService::new(store, NoteServiceSettings::from(&config))),
        })
    });
    let active = match active {
        Ok(active) => active,
        Err(err) => {
            return failure_from(&ServiceError::Note(err), "Could not open note storage");
        }
    };

    if opened_here {
        info!("event=store_init module=ffi status=ok");
        return NoteActionResponse::success("Store initialized.", None);
    }
    if active.db_path != requested_path || active.device_id != config.device_id {
        let err = ServiceError::AlreadyInitialized {
            db_path: active.db_path.clone(),
            device_id: active.device_id.clone(),
        };
        return failure_from(&err, "Could not open note storage");
    }
    NoteActionResponse::success("Store already initialized.", None)
}

/// Creates a note from the input box, keyword box and an optional recording.
#[flutter_rust_bridge::frb(sync)]
pub fn create_note(
    content: String,
    keywords: String,
    audio_uri: Option<String>,
) -> NoteActionResponse {
    let result = with_service(|service| {
        service.create_note(content.as_str(), keywords.as_str(), audio_uri.as_deref())
    });
    match result {
        Ok(note) => NoteActionResponse::success("Note saved.", Some(note.into())),
        Err(err) => failure_from(&err, "Could not save note"),
    }
}

/// Lists all notes, newest first.
#[flutter_rust_bridge::frb(sync)]
pub fn list_notes() -> NoteListResponse {
    match with_service(|service| service.list_notes()) {
        Ok(notes) => NoteListResponse {
            ok: true,
            message: format!("{} note(s).", notes.len()),
            items: notes.into_iter().map(NoteItem::from).collect(),
        },
        Err(err) => NoteListResponse {
            ok: false,
            items: Vec::new(),
            message: user_message(&err, "Could not load notes"),
        },
    }
}

/// Deletes one note. The caller must have confirmed with the user first.
#[flutter_rust_bridge::frb(sync)]
pub fn remove_note(id: i64) -> NoteActionResponse {
    match with_service(|service| service.remove_note(id)) {
        Ok(()) => NoteActionResponse::success("Note deleted.", None),
        Err(err) => failure_from(&err, "Could not delete note"),
    }
}

enum ServiceError {
    NotInitialized,
    AlreadyInitialized {
        db_path: PathBuf,
        device_id: String,
    },
    Poisoned,
    Note(NoteError),
}

impl From<NoteError> for ServiceError {
    fn from(value: NoteError) -> Self {
        Self::Note(value)
    }
}

fn with_service<T>(
    f: impl FnOnce(&mut NoteService<SqliteNoteStore>) -> Result<T, NoteError>,
) -> Result<T, ServiceError> {
    let active = ACTIVE_STORE.get().ok_or(ServiceError::NotInitialized)?;
    let mut service = active
        .service
        .lock()
        .map_err(|_| ServiceError::Poisoned)?;
    Ok(f(&mut *service)?)
}

fn store_config(db_path: Option<String>, device_id: &str) -> CoreConfig {
    let mut config = CoreConfig {
        db_path: db_path
            .map(|raw| raw.trim().to_string())
            .filter(|raw| !raw.is_empty())
            .map(PathBuf::from),
        ..CoreConfig::default()
    };
    let device_id = device_id.trim();
    if !device_id.is_empty() {
        config.device_id = device_id.to_string();
    }
    config
}

fn error_code(err: &ServiceError) -> &'static str {
    match err {
        ServiceError::NotInitialized => "not_initialized",
        ServiceError::AlreadyInitialized { .. } => "already_initialized",
        ServiceError::Poisoned => "storage_unavailable",
        ServiceError::Note(err) => err.code(),
    }
}

fn user_message(err: &ServiceError, action: &str) -> String {
    match err {
        ServiceError::NotInitialized => format!("{action}: storage is not initialized."),
        ServiceError::AlreadyInitialized { db_path, device_id } => format!(
            "{action}: storage is already open at `{}` for device `{device_id}`.",
            db_path.display()
        ),
        ServiceError::Poisoned => format!("{action}: storage is unavailable, please restart."),
        ServiceError::Note(NoteError::Validation(_)) => {
            format!("{action}: type some text or record audio first.")
        }
        ServiceError::Note(NoteError::NotFound(_)) => {
            format!("{action}: the note no longer exists.")
        }
        ServiceError::Note(err) => format!("{action}: {err}"),
    }
}

fn failure_from(err: &ServiceError, action: &str) -> NoteActionResponse {
    warn!(
        "event=ffi_call module=ffi status=error error_code={}",
        error_code(err)
    );
    NoteActionResponse::failure(error_code(err), user_message(err, action))
}
