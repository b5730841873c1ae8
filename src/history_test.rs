#![allow(clippy::float_cmp)]

use futures::executor::block_on;

use super::*;
use crate::api::mock::MockApi;
use crate::toast::{ToastKind, ToastState};

fn make_note(id: NoteId) -> Note {
    Note {
        id,
        pos_x: 0.0,
        pos_y: 0.0,
        width: 300.0,
        height: 150.0,
        content: format!("note {id}"),
        bg_color: "#fff".to_owned(),
        created_at: None,
        updated_at: None,
    }
}

fn loaded_store(api: &MockApi) -> NoteStore {
    let mut store = NoteStore::new();
    block_on(store.load(api)).unwrap();
    store
}

fn move_action(id: NoteId, old: (f64, f64), new: (f64, f64)) -> HistoryAction {
    HistoryAction::MoveNotes {
        moves: vec![NoteMove {
            id,
            old_pos: Point::new(old.0, old.1),
            new_pos: Point::new(new.0, new.1),
        }],
    }
}

fn drain(history: &mut History, store: &mut NoteStore, api: &MockApi, toasts: &mut ToastState) {
    block_on(history.run_queued(store, api, toasts));
}

// =============================================================
// Recording
// =============================================================

#[test]
fn record_pushes_to_undo_stack() {
    let mut history = History::new();
    history.record(move_action(1, (0.0, 0.0), (10.0, 10.0)));
    assert_eq!(history.undo_depth(), 1);
    assert!(history.can_undo());
    assert!(!history.can_redo());
}

#[test]
fn record_clears_redo_stack() {
    let mut history = History::new();
    history.redo_stack.push(move_action(1, (0.0, 0.0), (10.0, 10.0)));
    assert!(history.can_redo());
    history.record(move_action(2, (0.0, 0.0), (5.0, 5.0)));
    assert_eq!(history.redo_depth(), 0);
    assert!(!history.can_redo());
}

#[test]
fn record_drops_oldest_beyond_capacity() {
    let mut history = History::new();
    for i in 0..51 {
        history.record(move_action(i, (0.0, 0.0), (1.0, 1.0)));
    }
    assert_eq!(history.undo_depth(), 50);
    // The very first action (note id 0) fell off the bottom.
    let HistoryAction::MoveNotes { moves } = &history.undo_stack[0] else {
        panic!("expected MoveNotes");
    };
    assert_eq!(moves[0].id, 1);
}

#[test]
fn stack_never_exceeds_capacity() {
    let mut history = History::new();
    for i in 0..200 {
        history.record(move_action(i, (0.0, 0.0), (1.0, 1.0)));
        assert!(history.undo_depth() <= 50);
    }
}

// =============================================================
// Undo / redo of each action kind
// =============================================================

#[test]
fn undo_then_redo_of_move() {
    let api = MockApi::with_notes(vec![make_note(5)]);
    let mut store = loaded_store(&api);
    let mut toasts = ToastState::new();
    let mut history = History::new();

    store.set_position_local(5, Point::new(100.0, 100.0));
    history.record(move_action(5, (0.0, 0.0), (100.0, 100.0)));

    history.undo();
    drain(&mut history, &mut store, &api, &mut toasts);
    assert_eq!(store.get(5).unwrap().pos_x, 0.0);
    assert_eq!(store.get(5).unwrap().pos_y, 0.0);
    assert_eq!(history.undo_depth(), 0);
    assert_eq!(history.redo_depth(), 1);

    history.redo();
    drain(&mut history, &mut store, &api, &mut toasts);
    assert_eq!(store.get(5).unwrap().pos_x, 100.0);
    assert_eq!(store.get(5).unwrap().pos_y, 100.0);
    assert_eq!(history.undo_depth(), 1);
    assert_eq!(history.redo_depth(), 0);
}

#[test]
fn undo_of_create_deletes_the_note() {
    let api = MockApi::new();
    let mut store = NoteStore::new();
    let mut toasts = ToastState::new();
    let mut history = History::new();

    let data = CreateNoteData { pos_x: 1.0, pos_y: 2.0, content: "n".to_owned(), ..Default::default() };
    let note = block_on(store.create(&api, &data)).unwrap();
    history.record(HistoryAction::CreateNote { note_id: note.id, data });

    history.undo();
    drain(&mut history, &mut store, &api, &mut toasts);
    assert!(store.is_empty());
    assert_eq!(toasts.items()[0].message, "Note removed");
}

#[test]
fn redo_of_create_recreates_from_data() {
    let api = MockApi::new();
    let mut store = NoteStore::new();
    let mut toasts = ToastState::new();
    let mut history = History::new();

    let data = CreateNoteData { pos_x: 1.0, pos_y: 2.0, content: "again".to_owned(), ..Default::default() };
    let note = block_on(store.create(&api, &data)).unwrap();
    history.record(HistoryAction::CreateNote { note_id: note.id, data });

    history.undo();
    drain(&mut history, &mut store, &api, &mut toasts);
    history.redo();
    drain(&mut history, &mut store, &api, &mut toasts);

    assert_eq!(store.len(), 1);
    assert_eq!(store.items()[0].content, "again");
    assert_eq!(toasts.items()[1].message, "Note recreated");
}

#[test]
fn undo_of_delete_recreates_from_snapshots() {
    let api = MockApi::with_notes(vec![make_note(1), make_note(2)]);
    let mut store = loaded_store(&api);
    let mut toasts = ToastState::new();
    let mut history = History::new();

    let snapshots = vec![store.get(1).unwrap().clone(), store.get(2).unwrap().clone()];
    block_on(store.batch_delete(&api, &[1, 2])).unwrap();
    history.record(HistoryAction::DeleteNotes { note_ids: vec![1, 2], snapshots });

    history.undo();
    drain(&mut history, &mut store, &api, &mut toasts);
    assert_eq!(store.len(), 2);
    let contents: Vec<&str> = store.items().iter().map(|n| n.content.as_str()).collect();
    assert!(contents.contains(&"note 1"));
    assert!(contents.contains(&"note 2"));
    assert_eq!(toasts.items()[0].message, "2 notes recreated");
}

#[test]
fn undo_of_content_update_restores_old_text() {
    let api = MockApi::with_notes(vec![make_note(1)]);
    let mut store = loaded_store(&api);
    let mut toasts = ToastState::new();
    let mut history = History::new();

    let data = UpdateNoteData { content: Some("edited".to_owned()), ..Default::default() };
    block_on(store.update(&api, 1, &data)).unwrap();
    history.record(HistoryAction::UpdateContent {
        note_id: 1,
        old_content: "note 1".to_owned(),
        new_content: "edited".to_owned(),
    });

    history.undo();
    drain(&mut history, &mut store, &api, &mut toasts);
    assert_eq!(store.get(1).unwrap().content, "note 1");

    history.redo();
    drain(&mut history, &mut store, &api, &mut toasts);
    assert_eq!(store.get(1).unwrap().content, "edited");
}

#[test]
fn undo_of_resize_restores_old_size() {
    let api = MockApi::with_notes(vec![make_note(1)]);
    let mut store = loaded_store(&api);
    let mut toasts = ToastState::new();
    let mut history = History::new();

    let data = UpdateNoteData { width: Some(400.0), height: Some(200.0), ..Default::default() };
    block_on(store.update(&api, 1, &data)).unwrap();
    history.record(HistoryAction::ResizeNote {
        note_id: 1,
        old_size: Size::new(300.0, 150.0),
        new_size: Size::new(400.0, 200.0),
    });

    history.undo();
    drain(&mut history, &mut store, &api, &mut toasts);
    assert_eq!(store.get(1).unwrap().width, 300.0);
    assert_eq!(store.get(1).unwrap().height, 150.0);
    assert_eq!(toasts.items()[0].message, "Note size changed");
}

#[test]
fn multi_note_move_undo_issues_single_batch() {
    let api = MockApi::with_notes(vec![make_note(1), make_note(2)]);
    let mut store = loaded_store(&api);
    let mut toasts = ToastState::new();
    let mut history = History::new();

    history.record(HistoryAction::MoveNotes {
        moves: vec![
            NoteMove { id: 1, old_pos: Point::new(0.0, 0.0), new_pos: Point::new(10.0, 0.0) },
            NoteMove { id: 2, old_pos: Point::new(0.0, 0.0), new_pos: Point::new(0.0, 10.0) },
        ],
    });

    history.undo();
    drain(&mut history, &mut store, &api, &mut toasts);
    let batch_calls = api
        .calls
        .borrow()
        .iter()
        .filter(|c| c.starts_with("batch_update"))
        .count();
    assert_eq!(batch_calls, 1);
    assert_eq!(toasts.items()[0].message, "Position changed for 2 notes");
}

// =============================================================
// Queue discipline
// =============================================================

#[test]
fn undo_on_empty_stack_is_noop() {
    let api = MockApi::new();
    let mut store = NoteStore::new();
    let mut toasts = ToastState::new();
    let mut history = History::new();

    history.undo();
    drain(&mut history, &mut store, &api, &mut toasts);
    assert!(api.calls.borrow().is_empty());
    assert!(toasts.items().is_empty());
}

#[test]
fn two_rapid_undos_with_one_entry_runs_once() {
    let api = MockApi::with_notes(vec![make_note(5)]);
    let mut store = loaded_store(&api);
    let mut toasts = ToastState::new();
    let mut history = History::new();

    history.record(move_action(5, (0.0, 0.0), (100.0, 100.0)));

    // Both requests are accepted before anything executes; the second finds
    // the stack already drained and evaporates.
    history.undo();
    history.undo();
    drain(&mut history, &mut store, &api, &mut toasts);

    let updates = api
        .calls
        .borrow()
        .iter()
        .filter(|c| c.starts_with("batch_update"))
        .count();
    assert_eq!(updates, 1);
    assert_eq!(history.undo_depth(), 0);
    assert_eq!(history.redo_depth(), 1);
    assert_eq!(toasts.items().len(), 1);
}

#[test]
fn queued_requests_run_in_request_order() {
    let api = MockApi::with_notes(vec![make_note(1), make_note(2)]);
    let mut store = loaded_store(&api);
    let mut toasts = ToastState::new();
    let mut history = History::new();

    history.record(move_action(1, (0.0, 0.0), (10.0, 10.0)));
    history.record(move_action(2, (0.0, 0.0), (20.0, 20.0)));

    history.undo();
    history.undo();
    drain(&mut history, &mut store, &api, &mut toasts);

    // Last-recorded action (note 2) is undone first, then note 1.
    let calls = api.calls.borrow();
    let batches: Vec<&String> = calls.iter().filter(|c| c.starts_with("batch_update")).collect();
    assert_eq!(batches, vec!["batch_update [2]", "batch_update [1]"]);
    assert_eq!(history.redo_depth(), 2);
}

#[test]
fn undo_ignored_while_processing() {
    let mut history = History::new();
    history.record(move_action(1, (0.0, 0.0), (10.0, 10.0)));
    history.processing = true;
    assert!(!history.can_undo());
    history.undo();
    assert!(history.queue.is_empty());
}

// =============================================================
// Failure handling
// =============================================================

#[test]
fn failed_undo_restores_stack_and_reports() {
    let api = MockApi::with_notes(vec![make_note(5)]);
    let mut store = loaded_store(&api);
    let mut toasts = ToastState::new();
    let mut history = History::new();

    store.set_position_local(5, Point::new(100.0, 100.0));
    history.record(move_action(5, (0.0, 0.0), (100.0, 100.0)));

    api.fail_next(ApiError::http(500, "boom"));
    history.undo();
    drain(&mut history, &mut store, &api, &mut toasts);

    // Depth unchanged, redo untouched, local position untouched.
    assert_eq!(history.undo_depth(), 1);
    assert_eq!(history.redo_depth(), 0);
    assert_eq!(store.get(5).unwrap().pos_x, 100.0);
    assert_eq!(toasts.items().len(), 1);
    assert_eq!(toasts.items()[0].kind, ToastKind::Error);
    assert_eq!(toasts.items()[0].message, "Failed to undo action. Please check your connection.");
}

#[test]
fn failed_undo_is_retryable() {
    let api = MockApi::with_notes(vec![make_note(5)]);
    let mut store = loaded_store(&api);
    let mut toasts = ToastState::new();
    let mut history = History::new();

    history.record(move_action(5, (0.0, 0.0), (100.0, 100.0)));

    api.fail_next(ApiError::transport("offline"));
    history.undo();
    drain(&mut history, &mut store, &api, &mut toasts);
    assert_eq!(history.undo_depth(), 1);

    history.undo();
    drain(&mut history, &mut store, &api, &mut toasts);
    assert_eq!(history.undo_depth(), 0);
    assert_eq!(history.redo_depth(), 1);
    assert_eq!(store.get(5).unwrap().pos_x, 0.0);
}

#[test]
fn failed_redo_restores_redo_stack() {
    let api = MockApi::with_notes(vec![make_note(5)]);
    let mut store = loaded_store(&api);
    let mut toasts = ToastState::new();
    let mut history = History::new();

    history.record(move_action(5, (0.0, 0.0), (100.0, 100.0)));
    history.undo();
    drain(&mut history, &mut store, &api, &mut toasts);
    assert_eq!(history.redo_depth(), 1);

    api.fail_next(ApiError::http(503, "unavailable"));
    history.redo();
    drain(&mut history, &mut store, &api, &mut toasts);

    assert_eq!(history.redo_depth(), 1);
    assert_eq!(history.undo_depth(), 0);
    assert_eq!(toasts.items().last().unwrap().message, "Failed to redo action. Please check your connection.");
}
