//! Shared numeric constants for the board crate.

// ── Items ───────────────────────────────────────────────────────

/// Smallest width or height an item may have, in board units.
pub const MIN_ITEM_SIZE: f64 = 50.0;

/// Width and height of a freshly imported item.
pub const DEFAULT_ITEM_SIZE: f64 = 200.0;

/// Top-left coordinate of the first placement slot.
pub const PLACEMENT_ORIGIN: f64 = 50.0;

/// Diagonal step between consecutive placement slots.
pub const PLACEMENT_STEP: f64 = 60.0;

/// Offset applied to both axes when duplicating an item.
pub const DUPLICATE_OFFSET: f64 = 20.0;

// ── Gestures ────────────────────────────────────────────────────

/// Angular increment rotation gestures snap to, in degrees.
pub const ROTATION_SNAP_DEG: f64 = 15.0;

// ── Hit-testing ─────────────────────────────────────────────────

/// Edge length of the square resize and rotate handles.
pub const HANDLE_SIZE: f64 = 12.0;

/// Distance from the item's top edge to the top of the rotate handle.
pub const ROTATE_HANDLE_OFFSET: f64 = 20.0;

// ── Board ───────────────────────────────────────────────────────

/// Maximum board name length, in characters.
pub const MAX_BOARD_NAME_CHARS: usize = 50;

/// Default canvas width.
pub const DEFAULT_BOARD_WIDTH: f64 = 640.0;

/// Default canvas height.
pub const DEFAULT_BOARD_HEIGHT: f64 = 480.0;

/// Default canvas background colour.
pub const DEFAULT_BACKGROUND: &str = "#FFFFFF";

/// Default grid cell size.
pub const DEFAULT_GRID_SIZE: f64 = 20.0;
