//! Gesture state machine: drag, resize, and rotate sessions.
//!
//! `InputState` is the active gesture being tracked between pointer-down and
//! pointer-up. Each non-idle variant carries exactly the context captured at
//! pointer-down that later moves need, so every move is computed from the
//! gesture's origin rather than accumulated from the previous event.
//!
//! Moves never touch an item directly: they build an [`ItemPatch`] and hand
//! it to [`ItemStore::update`]. A session whose item has disappeared keeps
//! running but every move is a no-op until pointer-up.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use serde::{Deserialize, Serialize};

use crate::config::BoardConfig;
use crate::consts::ROTATION_SNAP_DEG;
use crate::doc::{Item, ItemId, ItemPatch, ItemStore};
use crate::geometry::{Point, Size, angle_from_center, clamp_to_extent, resize_keeping_aspect, snap};
use crate::hit::HitPart;

/// What a pointer-down on an item should start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureMode {
    Drag,
    Resize,
    Rotate,
}

impl From<HitPart> for GestureMode {
    fn from(part: HitPart) -> Self {
        match part {
            HitPart::Body => Self::Drag,
            HitPart::ResizeHandle => Self::Resize,
            HitPart::RotateHandle => Self::Rotate,
        }
    }
}

/// Internal state for the input state machine.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum InputState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// The user is moving an item across the board.
    Dragging {
        /// Id of the item being dragged.
        id: ItemId,
        /// Pointer position minus item origin at pointer-down.
        offset: Point,
    },
    /// The user is dragging the resize handle.
    Resizing {
        /// Id of the item being resized.
        id: ItemId,
        /// Pointer position at pointer-down.
        start: Point,
        /// Item size at pointer-down.
        start_size: Size,
    },
    /// The user is dragging the rotate handle.
    Rotating {
        /// Id of the item being rotated.
        id: ItemId,
        /// Pointer angle minus item rotation at pointer-down, in degrees.
        angle_offset: f64,
        /// Item centre at pointer-down; the rotation pivot.
        center: Point,
    },
}

impl InputState {
    /// Capture the context for a new gesture on `item` starting at `p`.
    #[must_use]
    pub fn begin(item: &Item, p: Point, mode: GestureMode) -> Self {
        let id = item.id.clone();
        match mode {
            GestureMode::Drag => Self::Dragging { id, offset: Point::new(p.x - item.x, p.y - item.y) },
            GestureMode::Resize => Self::Resizing { id, start: p, start_size: Size::new(item.width, item.height) },
            GestureMode::Rotate => {
                let center = item.center();
                Self::Rotating { id, angle_offset: angle_from_center(p, center) - item.rotation, center }
            }
        }
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// The item this gesture manipulates.
    #[must_use]
    pub fn item_id(&self) -> Option<&ItemId> {
        match self {
            Self::Idle => None,
            Self::Dragging { id, .. } | Self::Resizing { id, .. } | Self::Rotating { id, .. } => Some(id),
        }
    }

    /// Fields to write for the pointer now at `p`.
    ///
    /// Returns `None` while idle or when the gesture's item no longer exists.
    #[must_use]
    pub fn patch_for(&self, p: Point, store: &ItemStore, config: &BoardConfig) -> Option<ItemPatch> {
        let item = store.get(self.item_id()?)?;
        let board = config.board_size();
        let grid = |v: f64| snap(v, config.grid_size, config.grid_enabled);
        let patch = match self {
            Self::Idle => return None,
            Self::Dragging { offset, .. } => {
                let x = clamp_to_extent(grid(p.x - offset.x), board.width - item.width);
                let y = clamp_to_extent(grid(p.y - offset.y), board.height - item.height);
                ItemPatch { x: Some(x), y: Some(y), ..Default::default() }
            }
            Self::Resizing { start, start_size, .. } => {
                let size = resize_keeping_aspect(*start_size, p.x - start.x);
                let width = grid(size.width).min(board.width - item.x);
                let height = grid(size.height).min(board.height - item.y);
                ItemPatch { width: Some(width), height: Some(height), ..Default::default() }
            }
            Self::Rotating { angle_offset, center, .. } => {
                let rotation = snap(angle_from_center(p, *center) - angle_offset, ROTATION_SNAP_DEG, true);
                ItemPatch { rotation: Some(rotation), ..Default::default() }
            }
        };
        Some(patch)
    }

    /// Apply the move to `p` to the store. Returns true if an item changed.
    pub fn apply_move(&self, p: Point, store: &mut ItemStore, config: &BoardConfig) -> bool {
        let Some(patch) = self.patch_for(p, store, config) else {
            return false;
        };
        let Some(id) = self.item_id() else {
            return false;
        };
        let before = store.get(id).cloned();
        store.update(id, &patch) && store.get(id) != before.as_ref()
    }
}
