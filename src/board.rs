//! The board session controller.
//!
//! Owns one of everything — camera, note store, selection, interaction
//! state, history — and wires them together: pointer events feed the gesture
//! state machine, live gestures mutate local state optimistically, gesture
//! completion issues the reconciling remote call and records the history
//! action. Input binding policy (which button starts which gesture) stays
//! with the host; this controller exposes one entry point per gesture.

#[cfg(test)]
#[path = "board_test.rs"]
mod board_test;

use crate::api::{ApiError, NoteApi};
use crate::camera::{CameraState, Point, Size, clamp_scale};
use crate::history::{History, HistoryAction, NoteMove};
use crate::input::{
    Gesture, InteractionState, auto_pan_velocity, is_click, middle_mouse_velocity,
    resize_handles_enabled,
};
use crate::note::{CreateNoteData, Note, NoteId, NoteUpdate, UpdateNoteData};
use crate::selection::SelectionState;
use crate::spatial;
use crate::store::NoteStore;
use crate::toast::ToastSink;

/// All board-session state, singly owned.
#[derive(Debug, Default)]
pub struct BoardCore {
    pub camera: CameraState,
    pub notes: NoteStore,
    pub selection: SelectionState,
    pub interaction: InteractionState,
    pub history: History,
    pub viewport_width: f64,
    pub viewport_height: f64,
}

impl BoardCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Update viewport dimensions (CSS pixels); called on every host resize.
    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.viewport_width = width;
        self.viewport_height = height;
    }

    /// Fetch the note list from the server.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`] from the fetch; see [`NoteStore::load`].
    pub async fn load<A: NoteApi>(&mut self, api: &A) -> Result<(), ApiError> {
        self.notes.load(api).await
    }

    // ── Queries ─────────────────────────────────────────────────

    /// Notes to render this frame, culled to the viewport.
    #[must_use]
    pub fn visible_notes(&self) -> Vec<&Note> {
        spatial::visible_notes(
            self.notes.items(),
            self.viewport_width,
            self.viewport_height,
            self.camera.camera(),
            None,
        )
    }

    /// The topmost note under a world-space point, if any. Later notes in
    /// store order render on top and win ties.
    #[must_use]
    pub fn note_at(&self, world: Point) -> Option<NoteId> {
        self.notes
            .items()
            .iter()
            .rev()
            .find(|n| {
                world.x >= n.pos_x
                    && world.x <= n.pos_x + n.width
                    && world.y >= n.pos_y
                    && world.y <= n.pos_y + n.height
            })
            .map(|n| n.id)
    }

    // ── Pointer events ──────────────────────────────────────────

    /// Record a pointer-down at `screen`.
    pub fn pointer_down(&mut self, screen: Point) {
        let world = self.camera.camera().screen_to_world(screen);
        self.interaction.pointer_down(screen, world);
    }

    /// Record a pointer-move and apply the active gesture's live effect:
    /// dragged notes follow the pointer, panning shifts the camera, resizing
    /// stretches the note, box-selecting recomputes the selection.
    pub fn pointer_moved(&mut self, screen: Point) {
        let world = self.camera.camera().screen_to_world(screen);
        self.interaction.pointer_moved(screen, world);
        match self.interaction.gesture() {
            Gesture::DraggingNotes { .. } => {
                for (id, pos) in self.interaction.drag_positions(world) {
                    self.notes.set_position_local(id, pos);
                }
            }
            Gesture::PanningCanvas { .. } => {
                let delta = self.interaction.pan_step(screen);
                let cam = self.camera.camera();
                self.camera.set(cam.x + delta.x, cam.y + delta.y, cam.scale);
            }
            Gesture::ResizingNote { id, start_pos, .. } => {
                let (id, start_pos) = (*id, *start_pos);
                let size = Size::new(world.x - start_pos.x, world.y - start_pos.y);
                self.notes.set_size_local(id, size);
            }
            Gesture::BoxSelecting => {
                self.selection.update_box(world);
                self.selection.apply_box(self.notes.items());
            }
            // Middle-mouse velocity is applied on ticks, not moves.
            Gesture::MiddleMousePan { .. } | Gesture::Idle => {}
        }
    }

    // ── Gesture entry points ────────────────────────────────────

    /// Begin dragging `id` and every other selected note. A drag on an
    /// unselected note first collapses the selection to it.
    pub fn start_note_drag(&mut self, id: NoteId) {
        if self.notes.get(id).is_none() {
            log::warn!("drag requested for unknown note {id}");
            return;
        }
        if !self.selection.contains(id) {
            self.selection.select_only(id);
        }
        let anchor = self.interaction.pointer.world_pos;
        let targets: Vec<(NoteId, Point)> = self
            .selection
            .ids()
            .filter_map(|sel| self.notes.get(sel).map(|n| (sel, Point::new(n.pos_x, n.pos_y))))
            .collect();
        self.interaction.begin_note_drag(anchor, targets);
    }

    /// Begin a left-drag canvas pan.
    pub fn start_canvas_pan(&mut self) {
        self.interaction.begin_canvas_pan(self.interaction.pointer.pos);
    }

    /// Begin a middle-mouse fling pan anchored at the pointer.
    pub fn start_middle_pan(&mut self) {
        self.interaction.begin_middle_pan(self.interaction.pointer.pos);
    }

    /// Begin resizing a note. Refused (returning false) when the zoom is
    /// below the handle-usability threshold or the note is unknown.
    pub fn start_resize(&mut self, id: NoteId) -> bool {
        if !resize_handles_enabled(self.camera.camera().scale) {
            return false;
        }
        let Some(note) = self.notes.get(id) else {
            return false;
        };
        let start_pos = Point::new(note.pos_x, note.pos_y);
        let start_size = Size::new(note.width, note.height);
        self.interaction.begin_resize(id, start_pos, start_size);
        true
    }

    /// Begin a box-select anchored at the pointer's world position.
    pub fn start_box_select(&mut self) {
        self.selection.begin_box(self.interaction.pointer.world_pos);
        self.interaction.begin_box_select();
    }

    /// Release the pointer, completing the active gesture: a drag or resize
    /// that actually changed geometry issues its remote call and records a
    /// history action; a sub-threshold drag is treated as a click and
    /// reverted; box-select just drops its transient box.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`] from the gesture's remote call. Local state
    /// keeps the optimistic geometry; the action is not recorded, so a
    /// retry goes through a fresh gesture.
    pub async fn finish_gesture<A: NoteApi>(&mut self, api: &A) -> Result<(), ApiError> {
        let was_click = is_click(self.interaction.pointer.down_pos, self.interaction.pointer.pos);
        match self.interaction.take_gesture() {
            Gesture::DraggingNotes { origins, .. } => {
                if was_click {
                    for (id, origin) in origins {
                        self.notes.set_position_local(id, origin);
                    }
                    return Ok(());
                }
                let mut moves = Vec::new();
                for (id, origin) in origins {
                    let Some(note) = self.notes.get(id) else {
                        log::warn!("dragged note {id} vanished before release");
                        continue;
                    };
                    let new_pos = Point::new(note.pos_x, note.pos_y);
                    if new_pos != origin {
                        moves.push(NoteMove { id, old_pos: origin, new_pos });
                    }
                }
                if moves.is_empty() {
                    return Ok(());
                }
                let updates: Vec<NoteUpdate> = moves
                    .iter()
                    .map(|m| NoteUpdate {
                        id: m.id,
                        data: UpdateNoteData {
                            pos_x: Some(m.new_pos.x),
                            pos_y: Some(m.new_pos.y),
                            ..Default::default()
                        },
                    })
                    .collect();
                self.notes.batch_update(api, &updates).await?;
                self.history.record(HistoryAction::MoveNotes { moves });
                Ok(())
            }
            Gesture::ResizingNote { id, start_size, .. } => {
                let Some(note) = self.notes.get(id) else {
                    return Ok(());
                };
                let new_size = Size::new(note.width, note.height);
                if new_size == start_size {
                    return Ok(());
                }
                let data = UpdateNoteData {
                    width: Some(new_size.width),
                    height: Some(new_size.height),
                    ..Default::default()
                };
                self.notes.update(api, id, &data).await?;
                self.history.record(HistoryAction::ResizeNote {
                    note_id: id,
                    old_size: start_size,
                    new_size,
                });
                Ok(())
            }
            Gesture::BoxSelecting => {
                self.selection.end_box();
                Ok(())
            }
            Gesture::Idle | Gesture::PanningCanvas { .. } | Gesture::MiddleMousePan { .. } => {
                Ok(())
            }
        }
    }

    /// Abort the active gesture without any remote call, reverting its
    /// optimistic local effect.
    pub fn cancel_gesture(&mut self) {
        match self.interaction.take_gesture() {
            Gesture::DraggingNotes { origins, .. } => {
                for (id, origin) in origins {
                    self.notes.set_position_local(id, origin);
                }
            }
            Gesture::ResizingNote { id, start_size, .. } => {
                self.notes.set_size_local(id, start_size);
            }
            Gesture::BoxSelecting => self.selection.end_box(),
            Gesture::Idle | Gesture::PanningCanvas { .. } | Gesture::MiddleMousePan { .. } => {}
        }
    }

    // ── Per-tick panning ────────────────────────────────────────

    /// Advance an active middle-mouse fling by one tick. The camera moves
    /// opposite the pointer's displacement from the anchor, scroll-style.
    pub fn middle_pan_tick(&mut self) {
        let Gesture::MiddleMousePan { anchor_screen } = self.interaction.gesture() else {
            return;
        };
        let velocity = middle_mouse_velocity(*anchor_screen, self.interaction.pointer.pos);
        if velocity == Point::new(0.0, 0.0) {
            return;
        }
        let cam = self.camera.camera();
        self.camera.set(cam.x - velocity.x, cam.y - velocity.y, cam.scale);
    }

    /// Advance edge auto-pan by one tick while a drag or box-select holds
    /// the pointer near a viewport edge. The host should follow up with a
    /// `pointer_moved` so gesture geometry re-syncs to the shifted camera.
    pub fn auto_pan_tick(&mut self) {
        if !matches!(
            self.interaction.gesture(),
            Gesture::DraggingNotes { .. } | Gesture::BoxSelecting
        ) {
            return;
        }
        let velocity = auto_pan_velocity(
            self.interaction.pointer.pos,
            self.viewport_width,
            self.viewport_height,
        );
        if velocity == Point::new(0.0, 0.0) {
            return;
        }
        let cam = self.camera.camera();
        self.camera.set(cam.x - velocity.x, cam.y - velocity.y, cam.scale);
    }

    /// Zoom to `scale`, keeping the world point under `screen` fixed.
    pub fn zoom_at(&mut self, screen: Point, scale: f64) {
        let cam = self.camera.camera();
        let world = cam.screen_to_world(screen);
        let scale = clamp_scale(scale);
        self.camera.set(screen.x - world.x * scale, screen.y - world.y * scale, scale);
    }

    // ── Note operations ─────────────────────────────────────────

    /// Create a note and record the action.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`] from the create; nothing is recorded.
    pub async fn create_note<A: NoteApi>(
        &mut self,
        api: &A,
        data: CreateNoteData,
    ) -> Result<Note, ApiError> {
        let note = self.notes.create(api, &data).await?;
        self.history.record(HistoryAction::CreateNote {
            note_id: note.id,
            data: CreateNoteData::from_note(&note),
        });
        Ok(note)
    }

    /// Delete every selected note in one bulk call, recording snapshots so
    /// undo can recreate them.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`] from the bulk delete; selection and store
    /// are untouched and nothing is recorded.
    pub async fn delete_selection<A: NoteApi>(&mut self, api: &A) -> Result<(), ApiError> {
        if self.selection.is_empty() {
            return Ok(());
        }
        let ids: Vec<NoteId> = self.selection.ids().collect();
        let snapshots: Vec<Note> =
            ids.iter().filter_map(|id| self.notes.get(*id).cloned()).collect();
        self.notes.batch_delete(api, &ids).await?;
        self.selection.clear();
        self.history.record(HistoryAction::DeleteNotes { note_ids: ids, snapshots });
        Ok(())
    }

    /// Replace a note's text, recording old and new content. Unchanged text
    /// is a no-op.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`] from the update; nothing is recorded.
    pub async fn set_note_content<A: NoteApi>(
        &mut self,
        api: &A,
        id: NoteId,
        content: &str,
    ) -> Result<(), ApiError> {
        let Some(old_content) = self.notes.get(id).map(|n| n.content.clone()) else {
            log::warn!("content edit for unknown note {id}");
            return Ok(());
        };
        if old_content == content {
            return Ok(());
        }
        let data = UpdateNoteData { content: Some(content.to_owned()), ..Default::default() };
        self.notes.update(api, id, &data).await?;
        self.history.record(HistoryAction::UpdateContent {
            note_id: id,
            old_content,
            new_content: content.to_owned(),
        });
        Ok(())
    }

    /// Recolor a note. Not a history action.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`] from the update.
    pub async fn set_note_color<A: NoteApi>(
        &mut self,
        api: &A,
        id: NoteId,
        color: &str,
    ) -> Result<(), ApiError> {
        let data = UpdateNoteData { bg_color: Some(color.to_owned()), ..Default::default() };
        self.notes.update(api, id, &data).await?;
        Ok(())
    }

    // ── History ─────────────────────────────────────────────────

    /// Request and run an undo, then prune any selection ids the undo
    /// removed from the store.
    pub async fn undo<A: NoteApi, T: ToastSink>(&mut self, api: &A, toasts: &mut T) {
        self.history.undo();
        self.history.run_queued(&mut self.notes, api, toasts).await;
        let live: Vec<NoteId> = self.notes.ids().collect();
        self.selection.prune(live);
    }

    /// Request and run a redo, then prune stale selection ids.
    pub async fn redo<A: NoteApi, T: ToastSink>(&mut self, api: &A, toasts: &mut T) {
        self.history.redo();
        self.history.run_queued(&mut self.notes, api, toasts).await;
        let live: Vec<NoteId> = self.notes.ids().collect();
        self.selection.prune(live);
    }
}
