//! The in-memory note collection mirroring server state.
//!
//! Every remote operation follows the same shape: issue the call, and only
//! on success fold the server's canonical result back into the local list —
//! replacing by id for updates, appending for creates, removing by id for
//! deletes. A failed call leaves local state exactly as it was and surfaces
//! the typed error to the caller.
//!
//! Gesture-time movement goes through the `*_local` setters, which touch
//! only local state; the gesture's final remote call reconciles.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use crate::api::{ApiError, NoteApi};
use crate::camera::{Point, Size};
use crate::consts::{MIN_NOTE_HEIGHT, MIN_NOTE_WIDTH};
use crate::note::{CreateNoteData, Note, NoteId, NoteUpdate, UpdateNoteData};

/// Ordered collection of notes plus the load status the UI consumes.
#[derive(Debug, Clone, Default)]
pub struct NoteStore {
    items: Vec<Note>,
    /// True while a [`NoteStore::load`] is in flight.
    pub loading: bool,
    /// Message from the most recent failed load, cleared on the next one.
    pub error: Option<String>,
}

impl NoteStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All notes in insertion order.
    #[must_use]
    pub fn items(&self) -> &[Note] {
        &self.items
    }

    #[must_use]
    pub fn get(&self, id: NoteId) -> Option<&Note> {
        self.items.iter().find(|n| n.id == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Ids of all notes, in store order.
    pub fn ids(&self) -> impl Iterator<Item = NoteId> + '_ {
        self.items.iter().map(|n| n.id)
    }

    /// Fetch the full note list, replacing local contents on success.
    /// Tracks the loading flag and last error for UI consumption.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`] from the fetch; local notes are untouched.
    pub async fn load<A: NoteApi>(&mut self, api: &A) -> Result<(), ApiError> {
        self.loading = true;
        self.error = None;
        let result = api.fetch_notes().await;
        self.loading = false;
        match result {
            Ok(notes) => {
                self.items = notes;
                Ok(())
            }
            Err(err) => {
                self.error = Some(err.message.clone());
                Err(err)
            }
        }
    }

    /// Create a note remotely and append the canonical result.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`] from the create; nothing is appended.
    pub async fn create<A: NoteApi>(
        &mut self,
        api: &A,
        data: &CreateNoteData,
    ) -> Result<Note, ApiError> {
        let note = api.create_note(data).await?;
        self.items.push(note.clone());
        Ok(note)
    }

    /// Update a note remotely and replace the local copy with the canonical
    /// result.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`] from the update; the local copy is untouched.
    pub async fn update<A: NoteApi>(
        &mut self,
        api: &A,
        id: NoteId,
        data: &UpdateNoteData,
    ) -> Result<Note, ApiError> {
        let note = api.update_note(id, data).await?;
        self.replace(note.clone());
        Ok(note)
    }

    /// Update several notes in one remote call, replacing each local copy
    /// with its canonical result.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`] from the bulk update; local copies are untouched.
    pub async fn batch_update<A: NoteApi>(
        &mut self,
        api: &A,
        updates: &[NoteUpdate],
    ) -> Result<Vec<Note>, ApiError> {
        let notes = api.batch_update_notes(updates).await?;
        for note in &notes {
            self.replace(note.clone());
        }
        Ok(notes)
    }

    /// Delete a note remotely, then drop it locally.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`] from the delete; the note stays in the store.
    pub async fn delete<A: NoteApi>(&mut self, api: &A, id: NoteId) -> Result<(), ApiError> {
        api.delete_note(id).await?;
        self.items.retain(|n| n.id != id);
        Ok(())
    }

    /// Delete several notes in one remote call, then drop them locally.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`] from the bulk delete; the notes stay in the store.
    pub async fn batch_delete<A: NoteApi>(
        &mut self,
        api: &A,
        ids: &[NoteId],
    ) -> Result<(), ApiError> {
        api.batch_delete_notes(ids)
            .await
            .inspect_err(|err| log::error!("failed to delete notes {ids:?}: {err}"))?;
        self.items.retain(|n| !ids.contains(&n.id));
        Ok(())
    }

    /// Move a note locally without a remote call. Returns false if the id is
    /// unknown.
    pub fn set_position_local(&mut self, id: NoteId, pos: Point) -> bool {
        let Some(note) = self.items.iter_mut().find(|n| n.id == id) else {
            return false;
        };
        note.pos_x = pos.x;
        note.pos_y = pos.y;
        true
    }

    /// Resize a note locally without a remote call, clamping to the minimum
    /// note dimensions. Returns false if the id is unknown.
    pub fn set_size_local(&mut self, id: NoteId, size: Size) -> bool {
        let Some(note) = self.items.iter_mut().find(|n| n.id == id) else {
            return false;
        };
        note.width = size.width.max(MIN_NOTE_WIDTH);
        note.height = size.height.max(MIN_NOTE_HEIGHT);
        true
    }

    fn replace(&mut self, note: Note) {
        match self.items.iter_mut().find(|n| n.id == note.id) {
            Some(slot) => *slot = note,
            // A canonical result for a note we don't hold locally; not fatal,
            // but worth a trace.
            None => log::warn!("server returned note {} unknown to the local store", note.id),
        }
    }
}
