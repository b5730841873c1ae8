//! Selection model: the set of selected note ids plus the transient
//! box-select rectangle.

#[cfg(test)]
#[path = "selection_test.rs"]
mod selection_test;

use std::collections::HashSet;

use crate::camera::Point;
use crate::note::{Note, NoteId};
use crate::spatial;

/// A box-select rectangle in world coordinates. Corners are stored as
/// dragged; consumers normalize min/max themselves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxSelect {
    pub start: Point,
    pub end: Point,
}

/// Which notes are selected, and the in-progress box-select if any.
///
/// Membership is only meaningful for ids present in the note store; callers
/// prune after deletes.
#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    selected: HashSet<NoteId>,
    box_select: Option<BoxSelect>,
}

impl SelectionState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn contains(&self, id: NoteId) -> bool {
        self.selected.contains(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Selected ids in arbitrary order.
    pub fn ids(&self) -> impl Iterator<Item = NoteId> + '_ {
        self.selected.iter().copied()
    }

    /// Replace the selection with a single note.
    pub fn select_only(&mut self, id: NoteId) {
        self.selected.clear();
        self.selected.insert(id);
    }

    /// Add a note to the selection.
    pub fn insert(&mut self, id: NoteId) {
        self.selected.insert(id);
    }

    /// Toggle a note's membership (ctrl-click).
    pub fn toggle(&mut self, id: NoteId) {
        if !self.selected.remove(&id) {
            self.selected.insert(id);
        }
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Drop ids no longer present in the store.
    pub fn prune(&mut self, live: impl IntoIterator<Item = NoteId>) {
        let live: HashSet<NoteId> = live.into_iter().collect();
        self.selected.retain(|id| live.contains(id));
    }

    // ── Box select ──────────────────────────────────────────────

    #[must_use]
    pub fn box_select(&self) -> Option<BoxSelect> {
        self.box_select
    }

    #[must_use]
    pub fn is_box_selecting(&self) -> bool {
        self.box_select.is_some()
    }

    /// Anchor a box-select at `start`; both corners begin there.
    pub fn begin_box(&mut self, start: Point) {
        self.box_select = Some(BoxSelect { start, end: start });
    }

    /// Move the box's free corner. No-op when no box is active.
    pub fn update_box(&mut self, end: Point) {
        if let Some(box_select) = &mut self.box_select {
            box_select.end = end;
        }
    }

    /// Clear the transient box on release.
    pub fn end_box(&mut self) {
        self.box_select = None;
    }

    /// Replace the selection with every note intersecting the active box.
    /// No-op when no box is active.
    pub fn apply_box(&mut self, notes: &[Note]) {
        let Some(box_select) = self.box_select else {
            return;
        };
        self.selected = spatial::notes_in_box(notes, box_select.start, box_select.end)
            .into_iter()
            .collect();
    }
}
