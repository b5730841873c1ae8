//! Shared numeric constants for the board core.

// ── Zoom ────────────────────────────────────────────────────────

/// Lower zoom bound.
pub const MIN_SCALE: f64 = 0.1;

/// Upper zoom bound.
pub const MAX_SCALE: f64 = 5.0;

// ── Note geometry ───────────────────────────────────────────────

/// Minimum note width in world units.
pub const MIN_NOTE_WIDTH: f64 = 50.0;

/// Minimum note height in world units.
pub const MIN_NOTE_HEIGHT: f64 = 30.0;

/// Default width for newly created notes.
pub const DEFAULT_NOTE_WIDTH: f64 = 300.0;

/// Default height for newly created notes.
pub const DEFAULT_NOTE_HEIGHT: f64 = 150.0;

// ── Interaction ─────────────────────────────────────────────────

/// Net screen-space displacement (pixels) at or below which a press-release
/// counts as a click rather than a drag.
pub const CLICK_THRESHOLD_PX: f64 = 1.0;

/// Zoom level below which resize handles are too small to grab reliably.
pub const RESIZE_ZOOM_THRESHOLD: f64 = 0.6;

/// Middle-mouse fling: maximum pan speed in pixels per tick.
pub const MIDDLE_MOUSE_MAX_SPEED: f64 = 60.0;

/// Middle-mouse fling: displacement from the anchor (pixels) that produces no motion.
pub const MIDDLE_MOUSE_DEAD_ZONE: f64 = 5.0;

/// Middle-mouse fling: displacement (pixels) at which pan speed saturates.
pub const MIDDLE_MOUSE_MAX_DISTANCE: f64 = 300.0;

/// Auto-pan: width of the viewport edge band (pixels) that triggers panning.
pub const AUTO_PAN_EDGE_SIZE: f64 = 10.0;

/// Auto-pan: pan speed at the very edge of the viewport, pixels per tick.
pub const AUTO_PAN_MAX_SPEED: f64 = 15.0;

/// Auto-pan: pan speed on entering the edge band, pixels per tick.
pub const AUTO_PAN_MIN_SPEED: f64 = 1.0;

// ── Culling ─────────────────────────────────────────────────────

/// Default world-unit margin added around the viewport when culling, so notes
/// just outside the view are ready before they pan in.
pub const CULL_MARGIN: f64 = 100.0;

// ── Grid ────────────────────────────────────────────────────────

/// Grid spacing in world units when no zoom threshold applies.
pub const GRID_BASE_SIZE: f64 = 20.0;

/// Ordered zoom thresholds; the grid uses the size paired with the first
/// threshold the current scale does not exceed.
pub const GRID_ZOOM_LEVELS: [f64; 8] = [0.125, 0.25, 0.5, 1.0, 2.0, 4.0, 8.0, 16.0];

/// Grid sizes in world units, paired index-for-index with [`GRID_ZOOM_LEVELS`].
pub const GRID_SIZES: [f64; 8] = [160.0, 80.0, 40.0, 20.0, 20.0, 20.0, 10.0, 5.0];

// ── History ─────────────────────────────────────────────────────

/// Maximum depth of each of the undo and redo stacks.
pub const MAX_HISTORY_SIZE: usize = 50;
