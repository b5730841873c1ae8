//! Input model: pointer/modifier bookkeeping and the gesture state machine.
//!
//! `Gesture` is the active gesture being tracked between pointer-down and
//! pointer-up. Each non-idle variant captures at entry everything needed to
//! compute the gesture's effect from state alone, so pointer-move handling
//! never re-reads the scene. Exactly one gesture is active at a time;
//! starting a new one or releasing the pointer drops the previous working
//! data.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use std::collections::HashMap;

use crate::camera::{Point, Size};
use crate::consts::{
    AUTO_PAN_EDGE_SIZE, AUTO_PAN_MAX_SPEED, AUTO_PAN_MIN_SPEED, CLICK_THRESHOLD_PX,
    MIDDLE_MOUSE_DEAD_ZONE, MIDDLE_MOUSE_MAX_DISTANCE, MIDDLE_MOUSE_MAX_SPEED,
    RESIZE_ZOOM_THRESHOLD,
};
use crate::note::NoteId;

/// Pointer position bookkeeping, updated on every pointer event.
#[derive(Debug, Clone, Copy, Default)]
pub struct PointerState {
    /// Current position in screen coordinates.
    pub pos: Point,
    /// Screen position of the most recent pointer-down.
    pub down_pos: Point,
    /// Current position in world coordinates, cached at event time.
    pub world_pos: Point,
    /// Whether a button is currently held.
    pub is_down: bool,
}

/// Keyboard modifier flags mirrored from the host's key events.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModifierKeys {
    pub ctrl: bool,
    pub shift: bool,
    pub space: bool,
}

/// The active gesture and its working data.
#[derive(Debug, Clone)]
pub enum Gesture {
    /// No gesture in progress; waiting for the next pointer-down.
    Idle,
    /// One or more notes are being moved.
    DraggingNotes {
        /// World-space pointer position at drag start.
        anchor_world: Point,
        /// Each dragged note's position at drag start, keyed by id.
        origins: HashMap<NoteId, Point>,
        /// Each dragged note's offset from the anchor, captured at drag
        /// start so relative layout is preserved exactly during the drag.
        offsets: HashMap<NoteId, Point>,
    },
    /// The canvas is being panned by dragging empty space.
    PanningCanvas {
        /// Screen position of the previous pointer event, used to compute the pan delta.
        last_screen: Point,
    },
    /// Velocity-based pan anchored at a middle-mouse press.
    MiddleMousePan {
        /// Screen position of the middle-mouse press; displacement from it drives velocity.
        anchor_screen: Point,
    },
    /// A note is being resized from its bottom-right handle.
    ResizingNote {
        id: NoteId,
        /// Note position at resize start.
        start_pos: Point,
        /// Note size at resize start.
        start_size: Size,
    },
    /// A selection box is being dragged over empty canvas. The box corners
    /// live in the selection model.
    BoxSelecting,
}

impl Default for Gesture {
    fn default() -> Self {
        Self::Idle
    }
}

impl Gesture {
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}

/// Pointer state, modifier flags, and the current gesture.
#[derive(Debug, Clone, Default)]
pub struct InteractionState {
    pub pointer: PointerState,
    pub keys: ModifierKeys,
    gesture: Gesture,
}

impl InteractionState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    /// Record a pointer-down at `screen` / `world`.
    pub fn pointer_down(&mut self, screen: Point, world: Point) {
        self.pointer.pos = screen;
        self.pointer.down_pos = screen;
        self.pointer.world_pos = world;
        self.pointer.is_down = true;
    }

    /// Record a pointer-move; the down position is left untouched.
    pub fn pointer_moved(&mut self, screen: Point, world: Point) {
        self.pointer.pos = screen;
        self.pointer.world_pos = world;
    }

    /// Begin dragging the given notes. `notes` yields `(id, position)` for
    /// every note that should move; origins and anchor offsets are captured
    /// here and never recomputed.
    pub fn begin_note_drag(
        &mut self,
        anchor_world: Point,
        notes: impl IntoIterator<Item = (NoteId, Point)>,
    ) {
        let mut origins = HashMap::new();
        let mut offsets = HashMap::new();
        for (id, pos) in notes {
            origins.insert(id, pos);
            offsets.insert(id, Point::new(pos.x - anchor_world.x, pos.y - anchor_world.y));
        }
        self.gesture = Gesture::DraggingNotes { anchor_world, origins, offsets };
    }

    /// New position for every dragged note given the current world-space
    /// pointer position. Empty unless a note drag is active.
    #[must_use]
    pub fn drag_positions(&self, world: Point) -> Vec<(NoteId, Point)> {
        let Gesture::DraggingNotes { offsets, .. } = &self.gesture else {
            return Vec::new();
        };
        offsets
            .iter()
            .map(|(id, offset)| (*id, Point::new(world.x + offset.x, world.y + offset.y)))
            .collect()
    }

    /// Begin a left-button canvas pan from `screen`.
    pub fn begin_canvas_pan(&mut self, screen: Point) {
        self.gesture = Gesture::PanningCanvas { last_screen: screen };
    }

    /// Advance an active canvas pan to `screen`, returning the screen-space
    /// delta since the previous event. Zero when no pan is active.
    pub fn pan_step(&mut self, screen: Point) -> Point {
        let Gesture::PanningCanvas { last_screen } = &mut self.gesture else {
            return Point::new(0.0, 0.0);
        };
        let delta = Point::new(screen.x - last_screen.x, screen.y - last_screen.y);
        *last_screen = screen;
        delta
    }

    /// Begin a middle-mouse fling pan anchored at `anchor_screen`.
    pub fn begin_middle_pan(&mut self, anchor_screen: Point) {
        self.gesture = Gesture::MiddleMousePan { anchor_screen };
    }

    /// Begin resizing a note, capturing its starting geometry.
    pub fn begin_resize(&mut self, id: NoteId, start_pos: Point, start_size: Size) {
        self.gesture = Gesture::ResizingNote { id, start_pos, start_size };
    }

    /// Begin a box-select gesture.
    pub fn begin_box_select(&mut self) {
        self.gesture = Gesture::BoxSelecting;
    }

    /// End the current gesture, returning it and resetting to idle. The
    /// pointer is marked released.
    pub fn take_gesture(&mut self) -> Gesture {
        self.pointer.is_down = false;
        std::mem::take(&mut self.gesture)
    }

    /// Abort the current gesture (e.g. lost pointer capture), dropping its
    /// working data.
    pub fn cancel(&mut self) {
        self.pointer.is_down = false;
        self.gesture = Gesture::Idle;
    }
}

/// Whether a press at `down` released at `up` counts as a click rather than
/// a drag.
#[must_use]
pub fn is_click(down: Point, up: Point) -> bool {
    let dx = up.x - down.x;
    let dy = up.y - down.y;
    (dx * dx + dy * dy).sqrt() <= CLICK_THRESHOLD_PX
}

/// Whether resize handles are usable at this zoom level. Below the threshold
/// the handles shrink to sub-pixel targets and are disabled.
#[must_use]
pub fn resize_handles_enabled(scale: f64) -> bool {
    scale >= RESIZE_ZOOM_THRESHOLD
}

/// Pan velocity for a middle-mouse fling, in screen pixels per tick.
///
/// Displacement inside the dead zone produces no motion; beyond it, speed
/// ramps linearly and saturates at the configured max distance. The vector
/// points from the anchor toward the pointer.
#[must_use]
pub fn middle_mouse_velocity(anchor: Point, current: Point) -> Point {
    let dx = current.x - anchor.x;
    let dy = current.y - anchor.y;
    let dist = (dx * dx + dy * dy).sqrt();
    if dist <= MIDDLE_MOUSE_DEAD_ZONE {
        return Point::new(0.0, 0.0);
    }
    let ramp = (dist - MIDDLE_MOUSE_DEAD_ZONE) / (MIDDLE_MOUSE_MAX_DISTANCE - MIDDLE_MOUSE_DEAD_ZONE);
    let speed = ramp.min(1.0) * MIDDLE_MOUSE_MAX_SPEED;
    Point::new(dx / dist * speed, dy / dist * speed)
}

/// Pan velocity while the pointer sits in the viewport's edge band, in
/// screen pixels per tick.
///
/// Zero away from the edges; inside the band, speed ramps from
/// [`AUTO_PAN_MIN_SPEED`] to [`AUTO_PAN_MAX_SPEED`] as the pointer nears the
/// edge. Positive components point right/down; the camera offset moves
/// opposite the returned vector.
#[must_use]
pub fn auto_pan_velocity(pointer: Point, viewport_width: f64, viewport_height: f64) -> Point {
    Point::new(
        edge_speed(pointer.x, viewport_width),
        edge_speed(pointer.y, viewport_height),
    )
}

fn edge_speed(pos: f64, extent: f64) -> f64 {
    let range = AUTO_PAN_MAX_SPEED - AUTO_PAN_MIN_SPEED;
    if pos < AUTO_PAN_EDGE_SIZE {
        let depth = ((AUTO_PAN_EDGE_SIZE - pos) / AUTO_PAN_EDGE_SIZE).clamp(0.0, 1.0);
        -(AUTO_PAN_MIN_SPEED + depth * range)
    } else if pos > extent - AUTO_PAN_EDGE_SIZE {
        let depth = ((pos - (extent - AUTO_PAN_EDGE_SIZE)) / AUTO_PAN_EDGE_SIZE).clamp(0.0, 1.0);
        AUTO_PAN_MIN_SPEED + depth * range
    } else {
        0.0
    }
}
