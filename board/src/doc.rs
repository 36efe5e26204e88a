//! Document model: board items, sparse updates, and the in-memory store.
//!
//! This module defines what is on the board (`Item`), a sparse-update type
//! for incremental edits (`ItemPatch`), and the runtime store that owns all
//! live items (`ItemStore`).
//!
//! Items enter this layer from snapshots (JSON deserialization) and from the
//! board controller (imports, duplicates). Everything that changes an item
//! afterwards goes through [`ItemStore::update`], which is where the minimum
//! size floor is enforced. Renderers read `sorted_items` for draw order.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::consts::{DEFAULT_ITEM_SIZE, DUPLICATE_OFFSET, MIN_ITEM_SIZE, PLACEMENT_ORIGIN, PLACEMENT_STEP};
use crate::geometry::{Point, Rect};
use crate::image::ImageRef;

/// Unique identifier for a board item.
///
/// Opaque string so snapshots written by other hosts load unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// Allocate a fresh id.
    #[must_use]
    pub fn generate() -> Self {
        Self(format!("item-{}", Uuid::new_v4()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for ItemId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn default_one() -> f64 {
    1.0
}

fn default_true() -> bool {
    true
}

/// One placed image on the board, as stored in memory and in snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Unique identifier, fixed at creation.
    pub id: ItemId,
    /// What to draw.
    #[serde(alias = "src")]
    pub image_ref: ImageRef,
    /// Left edge in board coordinates.
    pub x: f64,
    /// Top edge in board coordinates.
    pub y: f64,
    /// Width before scale; never below [`MIN_ITEM_SIZE`].
    pub width: f64,
    /// Height before scale; never below [`MIN_ITEM_SIZE`].
    pub height: f64,
    /// Clockwise rotation in degrees around the centre. Accumulates past 360.
    #[serde(default)]
    pub rotation: f64,
    /// Opacity in `[0, 1]`.
    #[serde(default = "default_one")]
    pub opacity: f64,
    /// Stacking order; lower values are drawn beneath higher values.
    pub z_index: i64,
    /// Hidden items are neither drawn nor hit.
    #[serde(default = "default_true")]
    pub visible: bool,
    /// Mirrored horizontally.
    #[serde(default)]
    pub flipped: bool,
    /// Horizontal scale factor; negative while flipped.
    #[serde(default = "default_one")]
    pub scale_x: f64,
    /// Vertical scale factor.
    #[serde(default = "default_one")]
    pub scale_y: f64,
}

impl Item {
    /// A default-sized item with its top-left corner at `origin`.
    #[must_use]
    pub fn new(id: ItemId, image_ref: ImageRef, origin: Point, z_index: i64) -> Self {
        Self {
            id,
            image_ref,
            x: origin.x,
            y: origin.y,
            width: DEFAULT_ITEM_SIZE,
            height: DEFAULT_ITEM_SIZE,
            rotation: 0.0,
            opacity: 1.0,
            z_index,
            visible: true,
            flipped: false,
            scale_x: 1.0,
            scale_y: 1.0,
        }
    }

    /// Unrotated bounding box.
    #[must_use]
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Rotation pivot.
    #[must_use]
    pub fn center(&self) -> Point {
        self.rect().center()
    }

    /// Force the size floor and opacity range onto an item from outside.
    fn normalize(&mut self) {
        self.width = self.width.max(MIN_ITEM_SIZE);
        self.height = self.height.max(MIN_ITEM_SIZE);
        if self.opacity.is_finite() {
            self.opacity = self.opacity.clamp(0.0, 1.0);
        } else {
            self.opacity = 1.0;
        }
    }
}

/// Sparse update for an item. Only present fields are applied; the id can
/// never change.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_ref: Option<ImageRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z_index: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flipped: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale_x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale_y: Option<f64>,
}

/// Non-finite numbers in a patch are dropped rather than stored.
fn finite(v: Option<f64>) -> Option<f64> {
    v.filter(|n| n.is_finite())
}

/// Ordered in-memory store of board items.
///
/// Insertion order is preserved (it is the snapshot order); draw order is
/// ascending `z_index` with insertion order breaking ties. Every operation
/// on an id that is not present is a no-op.
#[derive(Debug, Clone, Default)]
pub struct ItemStore {
    items: Vec<Item>,
}

impl ItemStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Return a reference to an item by id.
    #[must_use]
    pub fn get(&self, id: &ItemId) -> Option<&Item> {
        self.items.iter().find(|item| &item.id == id)
    }

    fn get_mut(&mut self, id: &ItemId) -> Option<&mut Item> {
        self.items.iter_mut().find(|item| &item.id == id)
    }

    #[must_use]
    pub fn contains(&self, id: &ItemId) -> bool {
        self.get(id).is_some()
    }

    /// Highest `z_index` present, if any.
    #[must_use]
    pub fn max_z(&self) -> Option<i64> {
        self.items.iter().map(|item| item.z_index).max()
    }

    /// Lowest `z_index` present, if any.
    #[must_use]
    pub fn min_z(&self) -> Option<i64> {
        self.items.iter().map(|item| item.z_index).min()
    }

    /// Base for new z-indices: `max(count, max z)`. Adding any positive
    /// offset lands strictly above every current item.
    #[must_use]
    pub fn z_base(&self) -> i64 {
        let count = i64::try_from(self.items.len()).unwrap_or(i64::MAX);
        self.max_z().map_or(count, |z| z.max(count))
    }

    /// Create a default item in the next placement slot, above everything,
    /// and return it.
    pub fn create(&mut self, image_ref: ImageRef) -> &Item {
        let z = self.z_base().saturating_add(1);
        self.create_placed(image_ref, self.items.len(), z)
    }

    /// Create a default item at placement `slot` with an explicit `z_index`.
    ///
    /// Slot `n` sits at `(50 + 60n, 50 + 60n)`.
    pub fn create_placed(&mut self, image_ref: ImageRef, slot: usize, z_index: i64) -> &Item {
        #[allow(clippy::cast_precision_loss)]
        let offset = PLACEMENT_ORIGIN + PLACEMENT_STEP * slot as f64;
        let index = self.items.len();
        self.items.push(Item::new(ItemId::generate(), image_ref, Point::new(offset, offset), z_index));
        &self.items[index]
    }

    /// Apply a partial update. Returns false if the item doesn't exist.
    ///
    /// Width and height are floored at [`MIN_ITEM_SIZE`] and opacity is
    /// clamped into `[0, 1]` here, so no caller can bypass either invariant.
    pub fn update(&mut self, id: &ItemId, patch: &ItemPatch) -> bool {
        let Some(item) = self.get_mut(id) else {
            return false;
        };
        if let Some(ref image_ref) = patch.image_ref {
            item.image_ref = image_ref.clone();
        }
        if let Some(x) = finite(patch.x) {
            item.x = x;
        }
        if let Some(y) = finite(patch.y) {
            item.y = y;
        }
        if let Some(w) = finite(patch.width) {
            item.width = w.max(MIN_ITEM_SIZE);
        }
        if let Some(h) = finite(patch.height) {
            item.height = h.max(MIN_ITEM_SIZE);
        }
        if let Some(r) = finite(patch.rotation) {
            item.rotation = r;
        }
        if let Some(o) = finite(patch.opacity) {
            item.opacity = o.clamp(0.0, 1.0);
        }
        if let Some(z) = patch.z_index {
            item.z_index = z;
        }
        if let Some(v) = patch.visible {
            item.visible = v;
        }
        if let Some(f) = patch.flipped {
            item.flipped = f;
        }
        if let Some(sx) = finite(patch.scale_x) {
            item.scale_x = sx;
        }
        if let Some(sy) = finite(patch.scale_y) {
            item.scale_y = sy;
        }
        true
    }

    /// Remove an item by id, returning it if it was present.
    pub fn remove(&mut self, id: &ItemId) -> Option<Item> {
        let idx = self.items.iter().position(|item| &item.id == id)?;
        Some(self.items.remove(idx))
    }

    /// Move an item to the top: its z becomes `max z + 1`, even if it is
    /// already topmost. Returns false if the item doesn't exist.
    pub fn bring_forward(&mut self, id: &ItemId) -> bool {
        let Some(max) = self.max_z() else {
            return false;
        };
        let patch = ItemPatch { z_index: Some(max.saturating_add(1)), ..Default::default() };
        self.update(id, &patch)
    }

    /// Lower an item's z by one unless it already holds the minimum.
    /// Returns true only if the item changed.
    pub fn send_backward(&mut self, id: &ItemId) -> bool {
        let (Some(item), Some(min)) = (self.get(id), self.min_z()) else {
            return false;
        };
        if item.z_index <= min {
            return false;
        }
        let patch = ItemPatch { z_index: Some(item.z_index - 1), ..Default::default() };
        self.update(id, &patch)
    }

    /// Clone an item under a fresh id, offset by (20, 20) and placed above
    /// everything. Returns the new id.
    pub fn duplicate(&mut self, id: &ItemId) -> Option<ItemId> {
        let mut copy = self.get(id)?.clone();
        copy.id = ItemId::generate();
        copy.x += DUPLICATE_OFFSET;
        copy.y += DUPLICATE_OFFSET;
        copy.z_index = self.max_z().unwrap_or(0).saturating_add(1);
        let new_id = copy.id.clone();
        self.items.push(copy);
        Some(new_id)
    }

    /// Replace all items with a snapshot.
    ///
    /// Sizes below the floor are raised, opacity is clamped, and later
    /// entries reusing an earlier id are dropped. Returns how many were
    /// dropped.
    pub fn load_snapshot(&mut self, items: Vec<Item>) -> usize {
        let mut seen = HashSet::with_capacity(items.len());
        let before = items.len();
        self.items = items
            .into_iter()
            .filter(|item| seen.insert(item.id.clone()))
            .map(|mut item| {
                item.normalize();
                item
            })
            .collect();
        before - self.items.len()
    }

    /// All items sorted by `z_index` for draw order; ties keep insertion order.
    #[must_use]
    pub fn sorted_items(&self) -> Vec<&Item> {
        let mut items: Vec<&Item> = self.items.iter().collect();
        items.sort_by_key(|item| item.z_index);
        items
    }

    /// Whether any item already shows the image at `url`.
    #[must_use]
    pub fn has_url(&self, url: &str) -> bool {
        self.items.iter().any(|item| item.image_ref.canonical_url() == Some(url))
    }

    /// Number of items currently in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the store contains no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
