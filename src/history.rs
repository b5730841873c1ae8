//! Undo/redo command log.
//!
//! User actions are recorded as self-describing [`HistoryAction`] values on
//! a bounded undo stack. Undoing computes the action's inverse effect
//! through the note store; redoing replays the original effect. Requests are
//! funneled through a FIFO queue drained by a single-flight runner, so
//! overlapping undo/redo requests execute strictly one at a time, in order,
//! and never interleave their store calls.
//!
//! A failed execution pushes the action back onto the stack it came from —
//! depth is unchanged and the action stays available to retry — and reports
//! through the toast sink instead of desynchronizing the stacks.

#[cfg(test)]
#[path = "history_test.rs"]
mod history_test;

use std::collections::VecDeque;

use crate::api::{ApiError, NoteApi};
use crate::camera::{Point, Size};
use crate::consts::MAX_HISTORY_SIZE;
use crate::note::{CreateNoteData, Note, NoteId, NoteUpdate, UpdateNoteData};
use crate::store::NoteStore;
use crate::toast::ToastSink;

const UNDO_FAILED_MESSAGE: &str = "Failed to undo action. Please check your connection.";
const REDO_FAILED_MESSAGE: &str = "Failed to redo action. Please check your connection.";

/// One note's position change within a [`HistoryAction::MoveNotes`].
#[derive(Debug, Clone, PartialEq)]
pub struct NoteMove {
    pub id: NoteId,
    pub old_pos: Point,
    pub new_pos: Point,
}

/// A reversible user action. Each variant carries everything needed to apply
/// or invert it without consulting current server state.
#[derive(Debug, Clone)]
pub enum HistoryAction {
    /// A note was created.
    CreateNote { note_id: NoteId, data: CreateNoteData },
    /// One or more notes were deleted; full snapshots allow recreation.
    DeleteNotes { note_ids: Vec<NoteId>, snapshots: Vec<Note> },
    /// A note's text changed.
    UpdateContent { note_id: NoteId, old_content: String, new_content: String },
    /// One or more notes moved.
    MoveNotes { moves: Vec<NoteMove> },
    /// A note was resized.
    ResizeNote { note_id: NoteId, old_size: Size, new_size: Size },
}

fn plural(count: usize) -> &'static str {
    if count == 1 { "" } else { "s" }
}

impl HistoryAction {
    /// Toast copy after a successful undo of this action.
    #[must_use]
    pub fn undo_message(&self) -> String {
        match self {
            Self::CreateNote { .. } => "Note removed".to_owned(),
            Self::DeleteNotes { note_ids, .. } => {
                format!("{} note{} recreated", note_ids.len(), plural(note_ids.len()))
            }
            Self::UpdateContent { .. } => "Note content changed".to_owned(),
            Self::MoveNotes { moves } => {
                format!("Position changed for {} note{}", moves.len(), plural(moves.len()))
            }
            Self::ResizeNote { .. } => "Note size changed".to_owned(),
        }
    }

    /// Toast copy after a successful redo of this action.
    #[must_use]
    pub fn redo_message(&self) -> String {
        match self {
            Self::CreateNote { .. } => "Note recreated".to_owned(),
            Self::DeleteNotes { note_ids, .. } => {
                format!("{} note{} deleted", note_ids.len(), plural(note_ids.len()))
            }
            Self::UpdateContent { .. } => "Note content changed".to_owned(),
            Self::MoveNotes { moves } => {
                format!("Position changed for {} note{}", moves.len(), plural(moves.len()))
            }
            Self::ResizeNote { .. } => "Note size changed".to_owned(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HistoryOp {
    Undo,
    Redo,
}

/// The two bounded action stacks plus the serial execution queue.
#[derive(Debug, Default)]
pub struct History {
    undo_stack: Vec<HistoryAction>,
    redo_stack: Vec<HistoryAction>,
    queue: VecDeque<HistoryOp>,
    processing: bool,
}

impl History {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty() && !self.processing
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty() && !self.processing
    }

    #[must_use]
    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    #[must_use]
    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    /// Record a completed action. Drops the oldest entry beyond capacity and
    /// clears the redo stack — new actions invalidate the redo timeline.
    pub fn record(&mut self, action: HistoryAction) {
        self.undo_stack.push(action);
        if self.undo_stack.len() > MAX_HISTORY_SIZE {
            self.undo_stack.remove(0);
        }
        self.redo_stack.clear();
    }

    /// Request an undo. No-op when the stack is empty or an execution is in
    /// flight; otherwise the request queues behind any earlier ones and runs
    /// on the next [`History::run_queued`].
    pub fn undo(&mut self) {
        if !self.can_undo() {
            return;
        }
        self.queue.push_back(HistoryOp::Undo);
    }

    /// Request a redo. Same queueing discipline as [`History::undo`].
    pub fn redo(&mut self) {
        if !self.can_redo() {
            return;
        }
        self.queue.push_back(HistoryOp::Redo);
    }

    /// Drain queued undo/redo requests strictly in order, one at a time.
    ///
    /// Re-entrant calls return immediately; the single in-flight runner owns
    /// the queue until it is empty. A request that finds its stack already
    /// empty (drained by an earlier queued request) is a no-op.
    pub async fn run_queued<A: NoteApi, T: ToastSink>(
        &mut self,
        store: &mut NoteStore,
        api: &A,
        toasts: &mut T,
    ) {
        if self.processing {
            return;
        }
        self.processing = true;
        while let Some(op) = self.queue.pop_front() {
            let action = match op {
                HistoryOp::Undo => self.undo_stack.pop(),
                HistoryOp::Redo => self.redo_stack.pop(),
            };
            let Some(action) = action else {
                continue;
            };
            let result = match op {
                HistoryOp::Undo => apply_inverse(&action, store, api).await,
                HistoryOp::Redo => apply_forward(&action, store, api).await,
            };
            match (op, result) {
                (HistoryOp::Undo, Ok(())) => {
                    toasts.show_success(&action.undo_message());
                    self.redo_stack.push(action);
                }
                (HistoryOp::Redo, Ok(())) => {
                    toasts.show_success(&action.redo_message());
                    self.undo_stack.push(action);
                }
                (HistoryOp::Undo, Err(err)) => {
                    log::error!("undo failed: {err}");
                    self.undo_stack.push(action);
                    toasts.show_error(UNDO_FAILED_MESSAGE);
                }
                (HistoryOp::Redo, Err(err)) => {
                    log::error!("redo failed: {err}");
                    self.redo_stack.push(action);
                    toasts.show_error(REDO_FAILED_MESSAGE);
                }
            }
        }
        self.processing = false;
    }
}

/// Apply the inverse of `action` through the store.
async fn apply_inverse<A: NoteApi>(
    action: &HistoryAction,
    store: &mut NoteStore,
    api: &A,
) -> Result<(), ApiError> {
    match action {
        HistoryAction::CreateNote { note_id, .. } => store.batch_delete(api, &[*note_id]).await,
        HistoryAction::DeleteNotes { snapshots, .. } => {
            for snapshot in snapshots {
                store.create(api, &CreateNoteData::from_note(snapshot)).await?;
            }
            Ok(())
        }
        HistoryAction::UpdateContent { note_id, old_content, .. } => {
            let data =
                UpdateNoteData { content: Some(old_content.clone()), ..Default::default() };
            store.update(api, *note_id, &data).await?;
            Ok(())
        }
        HistoryAction::MoveNotes { moves } => {
            let updates = position_updates(moves, |m| m.old_pos);
            store.batch_update(api, &updates).await?;
            Ok(())
        }
        HistoryAction::ResizeNote { note_id, old_size, .. } => {
            let data = UpdateNoteData {
                width: Some(old_size.width),
                height: Some(old_size.height),
                ..Default::default()
            };
            store.update(api, *note_id, &data).await?;
            Ok(())
        }
    }
}

/// Re-apply `action` through the store.
async fn apply_forward<A: NoteApi>(
    action: &HistoryAction,
    store: &mut NoteStore,
    api: &A,
) -> Result<(), ApiError> {
    match action {
        HistoryAction::CreateNote { data, .. } => {
            store.create(api, data).await?;
            Ok(())
        }
        HistoryAction::DeleteNotes { note_ids, .. } => store.batch_delete(api, note_ids).await,
        HistoryAction::UpdateContent { note_id, new_content, .. } => {
            let data =
                UpdateNoteData { content: Some(new_content.clone()), ..Default::default() };
            store.update(api, *note_id, &data).await?;
            Ok(())
        }
        HistoryAction::MoveNotes { moves } => {
            let updates = position_updates(moves, |m| m.new_pos);
            store.batch_update(api, &updates).await?;
            Ok(())
        }
        HistoryAction::ResizeNote { note_id, new_size, .. } => {
            let data = UpdateNoteData {
                width: Some(new_size.width),
                height: Some(new_size.height),
                ..Default::default()
            };
            store.update(api, *note_id, &data).await?;
            Ok(())
        }
    }
}

fn position_updates(moves: &[NoteMove], pick: impl Fn(&NoteMove) -> Point) -> Vec<NoteUpdate> {
    moves
        .iter()
        .map(|m| {
            let pos = pick(m);
            NoteUpdate {
                id: m.id,
                data: UpdateNoteData {
                    pos_x: Some(pos.x),
                    pos_y: Some(pos.y),
                    ..Default::default()
                },
            }
        })
        .collect()
}
