//! Spatial queries over notes: viewport culling, selection-box intersection,
//! and the zoom-dependent grid tables.

#[cfg(test)]
#[path = "spatial_test.rs"]
mod spatial_test;

use crate::camera::{Camera, Point};
use crate::consts::{CULL_MARGIN, GRID_BASE_SIZE, GRID_SIZES, GRID_ZOOM_LEVELS};
use crate::note::{Note, NoteId};

/// An axis-aligned rectangle in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldBounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

/// World-space bounds of the visible viewport, derived by unprojecting the
/// viewport's top-left and bottom-right corners.
#[must_use]
pub fn viewport_bounds(viewport_width: f64, viewport_height: f64, camera: Camera) -> WorldBounds {
    let top_left = camera.screen_to_world(Point::new(0.0, 0.0));
    let bottom_right = camera.screen_to_world(Point::new(viewport_width, viewport_height));
    WorldBounds {
        min_x: top_left.x,
        min_y: top_left.y,
        max_x: bottom_right.x,
        max_y: bottom_right.y,
    }
}

/// Whether a note's bounding box, padded by `margin` world units, intersects
/// `bounds`. The margin pre-loads notes just outside the view so panning
/// never reveals a blank edge.
#[must_use]
pub fn is_note_visible(note: &Note, bounds: WorldBounds, margin: f64) -> bool {
    let left = note.pos_x - margin;
    let right = note.pos_x + note.width + margin;
    let top = note.pos_y - margin;
    let bottom = note.pos_y + note.height + margin;

    !(right < bounds.min_x || left > bounds.max_x || bottom < bounds.min_y || top > bounds.max_y)
}

/// Filter `notes` to those visible in the viewport, using [`CULL_MARGIN`]
/// when `margin` is `None`. Order-independent: the result is a plain filter
/// over the input sequence.
#[must_use]
pub fn visible_notes<'a>(
    notes: &'a [Note],
    viewport_width: f64,
    viewport_height: f64,
    camera: Camera,
    margin: Option<f64>,
) -> Vec<&'a Note> {
    let bounds = viewport_bounds(viewport_width, viewport_height, camera);
    let margin = margin.unwrap_or(CULL_MARGIN);
    notes.iter().filter(|note| is_note_visible(note, bounds, margin)).collect()
}

/// Whether a note intersects the selection box spanned by `box_start` and
/// `box_end` (world coordinates, corners in any order).
#[must_use]
pub fn is_note_in_selection_box(note: &Note, box_start: Point, box_end: Point) -> bool {
    let min_x = box_start.x.min(box_end.x);
    let max_x = box_start.x.max(box_end.x);
    let min_y = box_start.y.min(box_end.y);
    let max_y = box_start.y.max(box_end.y);

    note.pos_x + note.width >= min_x
        && note.pos_x <= max_x
        && note.pos_y + note.height >= min_y
        && note.pos_y <= max_y
}

/// Ids of all notes intersecting the selection box.
#[must_use]
pub fn notes_in_box(notes: &[Note], box_start: Point, box_end: Point) -> Vec<NoteId> {
    notes
        .iter()
        .filter(|note| is_note_in_selection_box(note, box_start, box_end))
        .map(|note| note.id)
        .collect()
}

/// Grid spacing in world units for the given zoom scale.
///
/// Walks the ordered threshold table and returns the size paired with the
/// first threshold the scale does not exceed, keeping rendered grid density
/// visually stable across zoom levels.
#[must_use]
pub fn grid_size(scale: f64) -> f64 {
    for (level, size) in GRID_ZOOM_LEVELS.iter().zip(GRID_SIZES.iter()) {
        if scale <= *level {
            return *size;
        }
    }
    GRID_BASE_SIZE
}

/// Positive modulo of a camera offset against the screen-space grid size, so
/// grid lines wrap every `screen_grid_size` pixels instead of jumping.
#[must_use]
pub fn grid_offset(camera_offset: f64, screen_grid_size: f64) -> f64 {
    camera_offset.rem_euclid(screen_grid_size)
}
