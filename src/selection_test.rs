use super::*;

fn note_at(id: NoteId, x: f64, y: f64) -> Note {
    Note {
        id,
        pos_x: x,
        pos_y: y,
        width: 50.0,
        height: 50.0,
        content: String::new(),
        bg_color: "#fff".to_owned(),
        created_at: None,
        updated_at: None,
    }
}

// =============================================================
// Membership
// =============================================================

#[test]
fn default_selection_is_empty() {
    let sel = SelectionState::new();
    assert!(sel.is_empty());
    assert_eq!(sel.len(), 0);
    assert!(!sel.is_box_selecting());
}

#[test]
fn select_only_replaces_previous_selection() {
    let mut sel = SelectionState::new();
    sel.insert(1);
    sel.insert(2);
    sel.select_only(3);
    assert_eq!(sel.len(), 1);
    assert!(sel.contains(3));
    assert!(!sel.contains(1));
}

#[test]
fn insert_is_idempotent() {
    let mut sel = SelectionState::new();
    sel.insert(5);
    sel.insert(5);
    assert_eq!(sel.len(), 1);
}

#[test]
fn toggle_adds_then_removes() {
    let mut sel = SelectionState::new();
    sel.toggle(7);
    assert!(sel.contains(7));
    sel.toggle(7);
    assert!(!sel.contains(7));
}

#[test]
fn clear_empties_selection() {
    let mut sel = SelectionState::new();
    sel.insert(1);
    sel.insert(2);
    sel.clear();
    assert!(sel.is_empty());
}

#[test]
fn prune_drops_dead_ids() {
    let mut sel = SelectionState::new();
    sel.insert(1);
    sel.insert(2);
    sel.insert(3);
    sel.prune([1, 3]);
    assert!(sel.contains(1));
    assert!(!sel.contains(2));
    assert!(sel.contains(3));
}

#[test]
fn ids_yields_all_members() {
    let mut sel = SelectionState::new();
    sel.insert(4);
    sel.insert(9);
    let mut ids: Vec<NoteId> = sel.ids().collect();
    ids.sort_unstable();
    assert_eq!(ids, vec![4, 9]);
}

// =============================================================
// Box select
// =============================================================

#[test]
fn begin_box_anchors_both_corners() {
    let mut sel = SelectionState::new();
    sel.begin_box(Point::new(10.0, 20.0));
    let box_select = sel.box_select().unwrap();
    assert_eq!(box_select.start, Point::new(10.0, 20.0));
    assert_eq!(box_select.end, Point::new(10.0, 20.0));
    assert!(sel.is_box_selecting());
}

#[test]
fn update_box_moves_free_corner_only() {
    let mut sel = SelectionState::new();
    sel.begin_box(Point::new(10.0, 20.0));
    sel.update_box(Point::new(200.0, 150.0));
    let box_select = sel.box_select().unwrap();
    assert_eq!(box_select.start, Point::new(10.0, 20.0));
    assert_eq!(box_select.end, Point::new(200.0, 150.0));
}

#[test]
fn update_box_without_begin_is_noop() {
    let mut sel = SelectionState::new();
    sel.update_box(Point::new(200.0, 150.0));
    assert!(sel.box_select().is_none());
}

#[test]
fn end_box_clears_transient_state() {
    let mut sel = SelectionState::new();
    sel.begin_box(Point::new(0.0, 0.0));
    sel.end_box();
    assert!(!sel.is_box_selecting());
}

#[test]
fn apply_box_replaces_selection_with_intersecting_notes() {
    let notes = [note_at(1, 0.0, 0.0), note_at(2, 100.0, 100.0), note_at(3, 1000.0, 1000.0)];
    let mut sel = SelectionState::new();
    sel.insert(3);

    sel.begin_box(Point::new(-10.0, -10.0));
    sel.update_box(Point::new(160.0, 160.0));
    sel.apply_box(&notes);

    assert!(sel.contains(1));
    assert!(sel.contains(2));
    assert!(!sel.contains(3));
}

#[test]
fn apply_box_ignores_drag_direction() {
    let notes = [note_at(1, 100.0, 100.0)];
    let mut sel = SelectionState::new();

    sel.begin_box(Point::new(160.0, 160.0));
    sel.update_box(Point::new(90.0, 90.0));
    sel.apply_box(&notes);

    assert!(sel.contains(1));
}

#[test]
fn apply_box_without_box_is_noop() {
    let notes = [note_at(1, 0.0, 0.0)];
    let mut sel = SelectionState::new();
    sel.insert(42);
    sel.apply_box(&notes);
    assert!(sel.contains(42));
    assert_eq!(sel.len(), 1);
}
