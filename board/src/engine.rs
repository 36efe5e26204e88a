//! Board controller: owns the item store and turns host events into edits.
//!
//! [`BoardCore`] holds all logic and returns [`Action`]s describing what the
//! host should hear about; it never calls out, so it is tested directly.
//! [`Board`] wraps a core and delivers those actions to a [`BoardHost`].
//!
//! ERROR HANDLING
//! ==============
//! Nothing here fails towards the host. Malformed snapshots, unresolvable
//! images, and events naming items that no longer exist are logged and
//! leave the board as it was.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::config::BoardConfig;
use crate::consts::MAX_BOARD_NAME_CHARS;
use crate::doc::{Item, ItemId, ItemPatch, ItemStore};
use crate::export::{ExportJob, Scene};
use crate::geometry::Point;
use crate::hit::hit_test;
use crate::image::{DefaultImageResolver, ImageRef, ImageResolver};
use crate::input::{GestureMode, InputState};
use crate::snapshot;

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// The item list changed; carries the full list as snapshot JSON.
    StateChanged(String),
    SelectionChanged(Option<ItemId>),
    BoardNameChanged(String),
    /// A gesture started; deliver pointer moves until released.
    CapturePointer,
    /// The gesture ended; pointer moves are no longer needed.
    ReleasePointer,
    /// Rising edge of the export trigger.
    ExportRequested,
}

/// Toolbar commands acting on the selected item.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", content = "value", rename_all = "snake_case")]
pub enum Command {
    Delete,
    BringForward,
    SendBackward,
    ToggleVisibility,
    Flip,
    /// Add degrees to the current rotation.
    Rotate(f64),
    SetOpacity(f64),
    Duplicate,
}

/// Inputs the host may change between events.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HostInputs {
    /// JSON item array to seed the board from.
    pub initial_state: Option<String>,
    /// Images to import, in any shape the resolver understands.
    pub input_images: Vec<Value>,
    /// Export is requested on every false-to-true transition.
    pub export_trigger: bool,
}

/// Core board state: all logic that doesn't depend on a host.
pub struct BoardCore {
    pub doc: ItemStore,
    pub config: BoardConfig,
    pub input: InputState,
    selected: Option<ItemId>,
    board_name: String,
    export_latch: bool,
    resolver: Box<dyn ImageResolver>,
}

impl Default for BoardCore {
    fn default() -> Self {
        Self::new(BoardConfig::default())
    }
}

impl BoardCore {
    #[must_use]
    pub fn new(config: BoardConfig) -> Self {
        Self::with_resolver(config, Box::new(DefaultImageResolver))
    }

    #[must_use]
    pub fn with_resolver(config: BoardConfig, resolver: Box<dyn ImageResolver>) -> Self {
        Self {
            doc: ItemStore::new(),
            config: config.sanitized(),
            input: InputState::Idle,
            selected: None,
            board_name: String::new(),
            export_latch: false,
            resolver,
        }
    }

    // --- Host inputs ---

    /// Seed the board from the host's first set of inputs: snapshot first,
    /// then image imports de-duplicated against it.
    pub fn initialize(&mut self, inputs: &HostInputs) -> Vec<Action> {
        let mut actions = Vec::new();
        if let Some(state) = inputs.initial_state.as_deref().filter(|s| !s.is_empty()) {
            actions.extend(self.load_state(state));
        }
        if !inputs.input_images.is_empty() {
            actions.extend(self.import_images(&inputs.input_images));
        }
        actions.extend(self.set_export_trigger(inputs.export_trigger));
        actions
    }

    /// React to the host changing its inputs from `prev` to `next`.
    pub fn on_external_inputs_changed(&mut self, prev: &HostInputs, next: &HostInputs) -> Vec<Action> {
        let mut actions = Vec::new();

        if next.initial_state != prev.initial_state {
            if let Some(state) = next.initial_state.as_deref().filter(|s| !s.is_empty()) {
                actions.extend(self.load_state(state));
            }
        }

        if !next.input_images.is_empty() && self.image_refs(&next.input_images) != self.image_refs(&prev.input_images)
        {
            actions.extend(self.import_images(&next.input_images));
        }

        actions.extend(self.set_export_trigger(next.export_trigger));
        actions
    }

    /// Resolved references; wrapper shape alone never counts as a change.
    fn image_refs(&self, images: &[Value]) -> Vec<Option<ImageRef>> {
        images.iter().map(|img| self.resolver.resolve(img).map(|r| r.image_ref)).collect()
    }

    /// Replace all items from a snapshot. Malformed input keeps the current
    /// items.
    pub fn load_state(&mut self, json: &str) -> Vec<Action> {
        let items = match snapshot::deserialize(json) {
            Ok(items) => items,
            Err(e) => {
                warn!(error = %e, "ignoring board state");
                return Vec::new();
            }
        };
        let dropped = self.doc.load_snapshot(items);
        if dropped > 0 {
            warn!(dropped, "snapshot reused item ids; kept first occurrences");
        }
        info!(items = self.doc.len(), "board state loaded");

        let mut actions = Vec::new();
        if self.selected.as_ref().is_some_and(|id| !self.doc.contains(id)) {
            actions.extend(self.set_selection(None));
        }
        actions.extend(self.state_changed());
        actions
    }

    /// Import host images, skipping unresolvable ones and any whose URL is
    /// already on the board.
    pub fn import_images(&mut self, images: &[Value]) -> Vec<Action> {
        let base = self.doc.z_base();
        let mut added = 0usize;
        let mut batch_urls: Vec<String> = Vec::new();

        for (index, source) in images.iter().enumerate() {
            let Some(resolved) = self.resolver.resolve(source) else {
                debug!(index, "skipping unresolvable image");
                continue;
            };
            if let Some(url) = resolved.url {
                if self.doc.has_url(&url) || batch_urls.contains(&url) {
                    debug!(index, %url, "image already on board");
                    continue;
                }
                batch_urls.push(url);
            }
            let offset = i64::try_from(index).unwrap_or(i64::MAX);
            self.doc.create_placed(resolved.image_ref, index, base.saturating_add(offset).saturating_add(1));
            added += 1;
        }

        if added == 0 {
            return Vec::new();
        }
        info!(added, "images imported");
        self.state_changed().into_iter().collect()
    }

    /// Add one image in the next free slot and select it. Not
    /// de-duplicated: this is an explicit user action.
    pub fn add_image(&mut self, source: &Value) -> Vec<Action> {
        let Some(resolved) = self.resolver.resolve(source) else {
            debug!("skipping unresolvable image");
            return Vec::new();
        };
        let id = self.doc.create(resolved.image_ref).id.clone();
        let mut actions = self.set_selection(Some(id));
        actions.extend(self.state_changed());
        actions
    }

    /// Evaluate the export trigger. Fires only on a false-to-true edge.
    pub fn set_export_trigger(&mut self, requested: bool) -> Vec<Action> {
        let rising = requested && !self.export_latch;
        self.export_latch = requested;
        if rising { vec![Action::ExportRequested] } else { Vec::new() }
    }

    /// Capture the current scene for rendering.
    #[must_use]
    pub fn export_job(&self) -> ExportJob {
        ExportJob::new(Scene::capture(&self.doc, &self.config))
    }

    // --- Selection ---

    /// Select an item, or clear the selection with `None`. Unknown ids clear.
    pub fn select(&mut self, id: Option<ItemId>) -> Vec<Action> {
        let id = id.filter(|id| self.doc.contains(id));
        self.set_selection(id)
    }

    /// Change the selection. A gesture on any other item ends with it.
    fn set_selection(&mut self, id: Option<ItemId>) -> Vec<Action> {
        if self.selected == id {
            return Vec::new();
        }
        let mut actions = Vec::new();
        if !self.input.is_idle() && self.input.item_id() != id.as_ref() {
            debug!("selection moved off the active gesture; ending it");
            self.input = InputState::Idle;
            actions.push(Action::ReleasePointer);
        }
        self.selected = id.clone();
        actions.push(Action::SelectionChanged(id));
        actions
    }

    // --- Pointer input ---

    /// Pointer pressed at `p`: hit-test and start the matching gesture, or
    /// clear the selection when nothing is under the pointer.
    pub fn on_pointer_down(&mut self, p: Point) -> Vec<Action> {
        match hit_test(p, &self.doc, self.selected.as_ref()) {
            Some(hit) => self.on_pointer_down_on(p, &hit.item_id, hit.part.into()),
            None => self.on_background_pointer_down(),
        }
    }

    /// Pointer pressed on a known item part. Starting a gesture selects the
    /// item; any gesture still active is superseded.
    pub fn on_pointer_down_on(&mut self, p: Point, id: &ItemId, mode: GestureMode) -> Vec<Action> {
        let Some(item) = self.doc.get(id) else {
            debug!(%id, "pointer down on missing item");
            return Vec::new();
        };
        if let Some(stale) = self.input.item_id() {
            debug!(%stale, "superseding unfinished gesture");
        }
        let was_idle = self.input.is_idle();
        self.input = InputState::begin(item, p, mode);

        let mut actions = self.set_selection(Some(id.clone()));
        if was_idle {
            actions.push(Action::CapturePointer);
        }
        actions
    }

    /// Pointer pressed on empty board: clear the selection.
    pub fn on_background_pointer_down(&mut self) -> Vec<Action> {
        let mut actions = Vec::new();
        if !self.input.is_idle() {
            self.input = InputState::Idle;
            actions.push(Action::ReleasePointer);
        }
        actions.extend(self.set_selection(None));
        actions
    }

    pub fn on_pointer_move(&mut self, p: Point) -> Vec<Action> {
        if self.input.apply_move(p, &mut self.doc, &self.config) {
            self.state_changed().into_iter().collect()
        } else {
            Vec::new()
        }
    }

    pub fn on_pointer_up(&mut self) -> Vec<Action> {
        if self.input.is_idle() {
            return Vec::new();
        }
        self.input = InputState::Idle;
        vec![Action::ReleasePointer]
    }

    // --- Commands ---

    /// Run a toolbar command against the selected item.
    pub fn execute(&mut self, command: Command) -> Vec<Action> {
        match command {
            Command::Delete => self.delete_selected(),
            Command::BringForward => self.bring_forward_selected(),
            Command::SendBackward => self.send_backward_selected(),
            Command::ToggleVisibility => self.toggle_visibility(),
            Command::Flip => self.flip_selected(),
            Command::Rotate(degrees) => self.rotate_selected_by(degrees),
            Command::SetOpacity(opacity) => self.set_selected_opacity(opacity),
            Command::Duplicate => self.duplicate_selected(),
        }
    }

    /// The selected item, or `None` (logging a stale selection).
    fn selected_item(&self) -> Option<&Item> {
        let id = self.selected.as_ref()?;
        let item = self.doc.get(id);
        if item.is_none() {
            debug!(%id, "selected item no longer exists");
        }
        item
    }

    fn patch_selected(&mut self, build: impl FnOnce(&Item) -> ItemPatch) -> Vec<Action> {
        let Some(item) = self.selected_item() else {
            return Vec::new();
        };
        let id = item.id.clone();
        let patch = build(item);
        if self.doc.update(&id, &patch) { self.state_changed().into_iter().collect() } else { Vec::new() }
    }

    pub fn delete_selected(&mut self) -> Vec<Action> {
        let Some(id) = self.selected.clone() else {
            return Vec::new();
        };
        let removed = self.doc.remove(&id).is_some();
        let mut actions = self.set_selection(None);
        if removed {
            actions.extend(self.state_changed());
        }
        actions
    }

    pub fn bring_forward_selected(&mut self) -> Vec<Action> {
        let Some(id) = self.selected_item().map(|item| item.id.clone()) else {
            return Vec::new();
        };
        if self.doc.bring_forward(&id) { self.state_changed().into_iter().collect() } else { Vec::new() }
    }

    pub fn send_backward_selected(&mut self) -> Vec<Action> {
        let Some(id) = self.selected_item().map(|item| item.id.clone()) else {
            return Vec::new();
        };
        if self.doc.send_backward(&id) { self.state_changed().into_iter().collect() } else { Vec::new() }
    }

    pub fn toggle_visibility(&mut self) -> Vec<Action> {
        self.patch_selected(|item| ItemPatch { visible: Some(!item.visible), ..Default::default() })
    }

    /// Mirror horizontally: toggles `flipped` and negates `scale_x`.
    pub fn flip_selected(&mut self) -> Vec<Action> {
        self.patch_selected(|item| ItemPatch {
            flipped: Some(!item.flipped),
            scale_x: Some(-item.scale_x),
            ..Default::default()
        })
    }

    /// Add `degrees` to the current rotation. The result is not normalized.
    pub fn rotate_selected_by(&mut self, degrees: f64) -> Vec<Action> {
        self.patch_selected(|item| ItemPatch { rotation: Some(item.rotation + degrees), ..Default::default() })
    }

    pub fn set_selected_opacity(&mut self, opacity: f64) -> Vec<Action> {
        self.patch_selected(|_| ItemPatch { opacity: Some(opacity), ..Default::default() })
    }

    /// Clone the selected item and select the copy.
    pub fn duplicate_selected(&mut self) -> Vec<Action> {
        let Some(id) = self.selected_item().map(|item| item.id.clone()) else {
            return Vec::new();
        };
        let Some(new_id) = self.doc.duplicate(&id) else {
            return Vec::new();
        };
        let mut actions = self.set_selection(Some(new_id));
        actions.extend(self.state_changed());
        actions
    }

    // --- Board name ---

    /// Rename the board, keeping at most 50 characters.
    pub fn set_board_name(&mut self, name: &str) -> Vec<Action> {
        let name: String = name.chars().take(MAX_BOARD_NAME_CHARS).collect();
        if name == self.board_name {
            return Vec::new();
        }
        self.board_name.clone_from(&name);
        vec![Action::BoardNameChanged(name)]
    }

    // --- Queries ---

    /// The currently selected item id, if any.
    #[must_use]
    pub fn selection(&self) -> Option<&ItemId> {
        self.selected.as_ref()
    }

    /// Look up an item by id.
    #[must_use]
    pub fn item(&self, id: &ItemId) -> Option<&Item> {
        self.doc.get(id)
    }

    /// Visible items, bottom first, for views to draw.
    #[must_use]
    pub fn render_list(&self) -> Vec<&Item> {
        self.doc.sorted_items().into_iter().filter(|item| item.visible).collect()
    }

    #[must_use]
    pub fn board_name(&self) -> &str {
        &self.board_name
    }

    /// Characters left before the name limit.
    #[must_use]
    pub fn remaining_name_chars(&self) -> usize {
        MAX_BOARD_NAME_CHARS.saturating_sub(self.board_name.chars().count())
    }

    /// Whether a gesture is active and pointer moves should be delivered.
    #[must_use]
    pub fn is_interacting(&self) -> bool {
        !self.input.is_idle()
    }

    /// Current items as snapshot JSON.
    #[must_use]
    pub fn to_json(&self) -> Option<String> {
        match snapshot::serialize(self.doc.items()) {
            Ok(json) => Some(json),
            Err(e) => {
                error!(error = %e, "failed to serialize board state");
                None
            }
        }
    }

    fn state_changed(&self) -> Option<Action> {
        self.to_json().map(Action::StateChanged)
    }
}

/// Host-side receivers for board notifications. Every method defaults to a
/// no-op so hosts implement only what they display.
pub trait BoardHost {
    /// Full item list as snapshot JSON, after every change.
    fn on_state_change(&mut self, _items_json: &str) {}

    fn on_board_name_change(&mut self, _name: &str) {}

    fn on_selection_change(&mut self, _selected: Option<&ItemId>) {}

    /// Start (`true`) or stop delivering pointer moves.
    fn set_pointer_capture(&mut self, _captured: bool) {}
}

impl BoardHost for () {}

/// The full board. Wraps `BoardCore` and forwards its actions to a host.
pub struct Board<H: BoardHost> {
    pub core: BoardCore,
    host: H,
    pending_export: Option<ExportJob>,
}

impl<H: BoardHost> Board<H> {
    /// Build a board and seed it from the host's initial inputs.
    pub fn initialize(config: BoardConfig, inputs: &HostInputs, host: H) -> Self {
        Self::from_core(BoardCore::new(config), inputs, host)
    }

    /// Like [`Board::initialize`] with a pre-built core (custom resolver).
    pub fn from_core(core: BoardCore, inputs: &HostInputs, host: H) -> Self {
        let mut board = Self { core, host, pending_export: None };
        let actions = board.core.initialize(inputs);
        board.dispatch(actions);
        board
    }

    fn dispatch(&mut self, actions: Vec<Action>) {
        for action in actions {
            match action {
                Action::StateChanged(json) => self.host.on_state_change(&json),
                Action::SelectionChanged(id) => self.host.on_selection_change(id.as_ref()),
                Action::BoardNameChanged(name) => self.host.on_board_name_change(&name),
                Action::CapturePointer => self.host.set_pointer_capture(true),
                Action::ReleasePointer => self.host.set_pointer_capture(false),
                Action::ExportRequested => self.pending_export = Some(self.core.export_job()),
            }
        }
    }

    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    /// The export requested by the latest trigger edge, if not yet taken.
    pub fn take_export_job(&mut self) -> Option<ExportJob> {
        self.pending_export.take()
    }

    // --- Delegated inputs ---

    pub fn on_external_inputs_changed(&mut self, prev: &HostInputs, next: &HostInputs) {
        let actions = self.core.on_external_inputs_changed(prev, next);
        self.dispatch(actions);
    }

    pub fn add_image(&mut self, source: &Value) {
        let actions = self.core.add_image(source);
        self.dispatch(actions);
    }

    pub fn select(&mut self, id: Option<ItemId>) {
        let actions = self.core.select(id);
        self.dispatch(actions);
    }

    pub fn on_pointer_down(&mut self, p: Point) {
        let actions = self.core.on_pointer_down(p);
        self.dispatch(actions);
    }

    pub fn on_pointer_down_on(&mut self, p: Point, id: &ItemId, mode: GestureMode) {
        let actions = self.core.on_pointer_down_on(p, id, mode);
        self.dispatch(actions);
    }

    pub fn on_background_pointer_down(&mut self) {
        let actions = self.core.on_background_pointer_down();
        self.dispatch(actions);
    }

    pub fn on_pointer_move(&mut self, p: Point) {
        let actions = self.core.on_pointer_move(p);
        self.dispatch(actions);
    }

    pub fn on_pointer_up(&mut self) {
        let actions = self.core.on_pointer_up();
        self.dispatch(actions);
    }

    pub fn execute(&mut self, command: Command) {
        let actions = self.core.execute(command);
        self.dispatch(actions);
    }

    pub fn set_board_name(&mut self, name: &str) {
        let actions = self.core.set_board_name(name);
        self.dispatch(actions);
    }

    pub fn set_export_trigger(&mut self, requested: bool) {
        let actions = self.core.set_export_trigger(requested);
        self.dispatch(actions);
    }

    // --- Delegated queries ---

    #[must_use]
    pub fn selection(&self) -> Option<&ItemId> {
        self.core.selection()
    }

    #[must_use]
    pub fn item(&self, id: &ItemId) -> Option<&Item> {
        self.core.item(id)
    }

    #[must_use]
    pub fn items(&self) -> &[Item] {
        self.core.doc.items()
    }

    #[must_use]
    pub fn render_list(&self) -> Vec<&Item> {
        self.core.render_list()
    }

    #[must_use]
    pub fn is_interacting(&self) -> bool {
        self.core.is_interacting()
    }
}
