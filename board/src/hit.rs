//! Hit-testing: which item, and which part of it, lies under a pointer.
//!
//! The selected item carries two handles, both axis-aligned squares that do
//! not follow the item's rotation: a resize handle centred on the
//! bottom-right corner and a rotate handle floating above the top edge.
//! Handles win over bodies; among bodies the highest `z_index` wins.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::consts::{HANDLE_SIZE, ROTATE_HANDLE_OFFSET};
use crate::doc::{Item, ItemId, ItemStore};
use crate::geometry::{Point, Rect, contains_rotated};

/// Which part of an item was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPart {
    Body,
    ResizeHandle,
    RotateHandle,
}

/// Result of a hit test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hit {
    pub item_id: ItemId,
    pub part: HitPart,
}

/// Geometry a view needs to draw the selection chrome for one item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionOverlay {
    /// Unrotated outline; draw it rotated by `rotation` about its centre.
    pub outline: Rect,
    /// Item rotation in degrees.
    pub rotation: f64,
    pub resize_handle: Rect,
    pub rotate_handle: Rect,
}

/// Outline and handle rectangles for `item`.
#[must_use]
pub fn selection_overlay(item: &Item) -> SelectionOverlay {
    let outline = item.rect();
    let half = HANDLE_SIZE * 0.5;
    let resize_center = Point::new(outline.x + outline.width, outline.y + outline.height);
    let rotate_center = Point::new(outline.x + outline.width * 0.5, outline.y - ROTATE_HANDLE_OFFSET + half);
    SelectionOverlay {
        outline,
        rotation: item.rotation,
        resize_handle: Rect::centered(resize_center, HANDLE_SIZE),
        rotate_handle: Rect::centered(rotate_center, HANDLE_SIZE),
    }
}

/// Test which item (if any) is under `p`, checking the selected item's
/// handles first. Hidden items are never hit by their body.
#[must_use]
pub fn hit_test(p: Point, store: &ItemStore, selected: Option<&ItemId>) -> Option<Hit> {
    if let Some(item) = selected.and_then(|id| store.get(id)) {
        let overlay = selection_overlay(item);
        if overlay.resize_handle.contains(p) {
            return Some(Hit { item_id: item.id.clone(), part: HitPart::ResizeHandle });
        }
        if overlay.rotate_handle.contains(p) {
            return Some(Hit { item_id: item.id.clone(), part: HitPart::RotateHandle });
        }
    }

    store
        .sorted_items()
        .into_iter()
        .rev()
        .filter(|item| item.visible)
        .find(|item| contains_rotated(item.rect(), item.rotation, p))
        .map(|item| Hit { item_id: item.id.clone(), part: HitPart::Body })
}
