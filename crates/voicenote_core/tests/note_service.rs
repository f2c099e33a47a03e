use std::cell::Cell;
use std::rc::Rc;
use voicenote_core::{
    NoteError, NoteService, NoteServiceSettings, NoteValidationError, SqliteNoteStore,
};

type SteppedClock = Rc<Cell<i64>>;

fn service_at(
    start_ms: i64,
) -> (
    NoteService<SqliteNoteStore, impl Fn() -> i64>,
    SteppedClock,
) {
    let clock = Rc::new(Cell::new(start_ms));
    let handle = Rc::clone(&clock);
    let settings = NoteServiceSettings {
        device_id: "test-device".to_string(),
        utc_offset_minutes: Some(0),
        ..NoteServiceSettings::default()
    };
    let store = SqliteNoteStore::open_in_memory().unwrap();
    let service = NoteService::with_clock(store, settings, move || handle.get());
    (service, clock)
}

#[test]
fn create_note_without_text_or_audio_is_rejected() {
    let (mut service, _) = service_at(1_700_000_000_000);
    let err = service.create_note("", "", None).unwrap_err();
    assert!(matches!(
        err,
        NoteError::Validation(NoteValidationError::EmptyNote)
    ));
    assert!(service.list_notes().unwrap().is_empty());
}

#[test]
fn create_note_with_audio_only_succeeds() {
    let (mut service, _) = service_at(1_700_000_000_000);
    let note = service.create_note("", "", Some("file://x")).unwrap();
    assert_eq!(note.audio_uri.as_deref(), Some("file://x"));
    assert!(note.content.is_empty());
    assert!(note.keywords.is_empty());
}

#[test]
fn blank_audio_uri_counts_as_no_recording() {
    let (mut service, _) = service_at(1_700_000_000_000);
    let err = service.create_note(" ", "", Some("  ")).unwrap_err();
    assert!(matches!(err, NoteError::Validation(_)));
}

#[test]
fn create_note_stamps_title_timestamps_and_sync_fields() {
    let (mut service, _) = service_at(1_700_000_000_000);
    let note = service
        .create_note("call mom", "a, b，c,,  ", None)
        .unwrap();

    assert_eq!(note.keywords, vec!["a", "b", "c"]);
    assert_eq!(note.title, "2023-11-14 22:13:20");
    assert_eq!(note.created_at, 1_700_000_000_000);
    assert_eq!(note.updated_at, note.created_at);
    assert!(!note.sync.is_sync);
    assert_eq!(note.sync.device_id, "test-device");
    assert!(note.sync.extra.is_empty());

    let listed = service.list_notes().unwrap();
    assert_eq!(listed, vec![note.clone()]);
    assert_eq!(service.get_note(note.id).unwrap(), Some(note));
}

#[test]
fn list_notes_is_newest_first() {
    let (mut service, clock) = service_at(1_000);
    let first = service.create_note("one", "", None).unwrap();
    clock.set(2_000);
    let second = service.create_note("two", "", None).unwrap();
    clock.set(3_000);
    let third = service.create_note("three", "", None).unwrap();

    let ids = service
        .list_notes()
        .unwrap()
        .into_iter()
        .map(|note| note.id)
        .collect::<Vec<_>>();
    assert_eq!(ids, vec![third.id, second.id, first.id]);
}

#[test]
fn clock_going_backwards_does_not_reorder_notes() {
    let (mut service, clock) = service_at(5_000);
    let first = service.create_note("one", "", None).unwrap();
    clock.set(4_000);
    let second = service.create_note("two", "", None).unwrap();

    assert_eq!(second.created_at, first.created_at);
    let ids = service
        .list_notes()
        .unwrap()
        .into_iter()
        .map(|note| note.id)
        .collect::<Vec<_>>();
    assert_eq!(ids, vec![first.id, second.id]);
}

#[test]
fn remove_note_deletes_and_then_reports_not_found() {
    let (mut service, _) = service_at(1_000);
    let note = service.create_note("temp", "x", None).unwrap();

    service.remove_note(note.id).unwrap();
    assert!(service
        .list_notes()
        .unwrap()
        .iter()
        .all(|listed| listed.id != note.id));
    assert_eq!(service.note_count().unwrap(), 0);

    let err = service.remove_note(note.id).unwrap_err();
    assert!(matches!(err, NoteError::NotFound(id) if id == note.id));
}

#[test]
fn settings_default_to_placeholder_device() {
    let settings = NoteServiceSettings::default();
    assert_eq!(settings.device_id, "local-device");
    assert_eq!(settings.title_format, "%Y-%m-%d %H:%M:%S");
}
