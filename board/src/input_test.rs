#![allow(clippy::float_cmp)]

use super::*;
use crate::image::ImageRef;

fn make_item_at(id: &str, x: f64, y: f64, w: f64, h: f64) -> Item {
    let mut item = Item::new(ItemId::from(id), ImageRef::Url(format!("{id}.png")), Point::new(x, y), 1);
    item.width = w;
    item.height = h;
    item
}

fn store_with(item: Item) -> ItemStore {
    let mut store = ItemStore::new();
    store.load_snapshot(vec![item]);
    store
}

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn grid_config() -> BoardConfig {
    BoardConfig { grid_enabled: true, ..Default::default() }
}

fn get<'a>(store: &'a ItemStore, id: &str) -> &'a Item {
    store.get(&ItemId::from(id)).unwrap()
}

// =============================================================
// GestureMode
// =============================================================

#[test]
fn gesture_mode_from_hit_part() {
    assert_eq!(GestureMode::from(HitPart::Body), GestureMode::Drag);
    assert_eq!(GestureMode::from(HitPart::ResizeHandle), GestureMode::Resize);
    assert_eq!(GestureMode::from(HitPart::RotateHandle), GestureMode::Rotate);
}

// =============================================================
// InputState: begin
// =============================================================

#[test]
fn default_is_idle() {
    let state = InputState::default();
    assert!(state.is_idle());
    assert!(state.item_id().is_none());
}

#[test]
fn begin_drag_captures_offset() {
    let item = make_item_at("a", 100.0, 50.0, 200.0, 200.0);
    let state = InputState::begin(&item, pt(130.0, 70.0), GestureMode::Drag);
    assert_eq!(state, InputState::Dragging { id: ItemId::from("a"), offset: pt(30.0, 20.0) });
}

#[test]
fn begin_resize_captures_pointer_and_size() {
    let item = make_item_at("a", 0.0, 0.0, 200.0, 100.0);
    let state = InputState::begin(&item, pt(200.0, 100.0), GestureMode::Resize);
    assert_eq!(
        state,
        InputState::Resizing { id: ItemId::from("a"), start: pt(200.0, 100.0), start_size: Size::new(200.0, 100.0) }
    );
}

#[test]
fn begin_rotate_captures_offset_against_current_rotation() {
    let mut item = make_item_at("a", 0.0, 0.0, 100.0, 100.0);
    item.rotation = 30.0;
    // Pointer straight above the centre: angle -90.
    let state = InputState::begin(&item, pt(50.0, -14.0), GestureMode::Rotate);
    let InputState::Rotating { angle_offset, center, .. } = state else {
        panic!("expected rotating state");
    };
    assert_eq!(center, pt(50.0, 50.0));
    assert!((angle_offset - (-120.0)).abs() < 1e-9);
}

// =============================================================
// Dragging
// =============================================================

#[test]
fn drag_moves_by_pointer_minus_offset() {
    let mut store = store_with(make_item_at("a", 100.0, 100.0, 200.0, 200.0));
    let state = InputState::begin(get(&store, "a"), pt(110.0, 120.0), GestureMode::Drag);
    assert!(state.apply_move(pt(160.0, 150.0), &mut store, &BoardConfig::default()));
    assert_eq!((get(&store, "a").x, get(&store, "a").y), (150.0, 130.0));
}

#[test]
fn drag_clamps_to_board_minus_item_size() {
    let mut store = store_with(make_item_at("a", 0.0, 0.0, 200.0, 200.0));
    let state = InputState::begin(get(&store, "a"), pt(0.0, 0.0), GestureMode::Drag);
    state.apply_move(pt(1000.0, 1000.0), &mut store, &BoardConfig::default());
    assert_eq!((get(&store, "a").x, get(&store, "a").y), (440.0, 280.0));
}

#[test]
fn drag_clamps_at_origin() {
    let mut store = store_with(make_item_at("a", 10.0, 10.0, 200.0, 200.0));
    let state = InputState::begin(get(&store, "a"), pt(20.0, 20.0), GestureMode::Drag);
    state.apply_move(pt(-500.0, -500.0), &mut store, &BoardConfig::default());
    assert_eq!((get(&store, "a").x, get(&store, "a").y), (0.0, 0.0));
}

#[test]
fn drag_item_larger_than_board_pins_to_origin() {
    let mut store = store_with(make_item_at("a", 0.0, 0.0, 700.0, 100.0));
    let state = InputState::begin(get(&store, "a"), pt(0.0, 0.0), GestureMode::Drag);
    state.apply_move(pt(50.0, 50.0), &mut store, &BoardConfig::default());
    assert_eq!((get(&store, "a").x, get(&store, "a").y), (0.0, 50.0));
}

#[test]
fn drag_snaps_before_clamping() {
    let mut store = store_with(make_item_at("a", 0.0, 0.0, 200.0, 200.0));
    let state = InputState::begin(get(&store, "a"), pt(0.0, 0.0), GestureMode::Drag);
    state.apply_move(pt(33.0, 47.0), &mut store, &grid_config());
    assert_eq!((get(&store, "a").x, get(&store, "a").y), (40.0, 40.0));
    state.apply_move(pt(455.0, 0.0), &mut store, &grid_config());
    assert_eq!(get(&store, "a").x, 440.0);
}

#[test]
fn drag_without_change_reports_false() {
    let mut store = store_with(make_item_at("a", 10.0, 10.0, 200.0, 200.0));
    let state = InputState::begin(get(&store, "a"), pt(20.0, 20.0), GestureMode::Drag);
    assert!(!state.apply_move(pt(20.0, 20.0), &mut store, &BoardConfig::default()));
}

// =============================================================
// Resizing
// =============================================================

#[test]
fn resize_keeps_aspect_ratio() {
    let mut store = store_with(make_item_at("a", 0.0, 0.0, 200.0, 100.0));
    let state = InputState::begin(get(&store, "a"), pt(200.0, 100.0), GestureMode::Resize);
    state.apply_move(pt(250.0, 400.0), &mut store, &BoardConfig::default());
    assert_eq!((get(&store, "a").width, get(&store, "a").height), (250.0, 125.0));
}

#[test]
fn resize_is_relative_to_gesture_start() {
    let mut store = store_with(make_item_at("a", 0.0, 0.0, 200.0, 100.0));
    let state = InputState::begin(get(&store, "a"), pt(200.0, 100.0), GestureMode::Resize);
    state.apply_move(pt(300.0, 100.0), &mut store, &BoardConfig::default());
    state.apply_move(pt(250.0, 100.0), &mut store, &BoardConfig::default());
    assert_eq!((get(&store, "a").width, get(&store, "a").height), (250.0, 125.0));
}

#[test]
fn resize_never_below_floor() {
    let mut store = store_with(make_item_at("a", 0.0, 0.0, 200.0, 100.0));
    let state = InputState::begin(get(&store, "a"), pt(200.0, 100.0), GestureMode::Resize);
    state.apply_move(pt(-1000.0, 100.0), &mut store, &BoardConfig::default());
    let item = get(&store, "a");
    assert_eq!((item.width, item.height), (100.0, 50.0));
}

#[test]
fn resize_capped_by_board_edges() {
    let mut store = store_with(make_item_at("a", 400.0, 300.0, 200.0, 100.0));
    let state = InputState::begin(get(&store, "a"), pt(600.0, 400.0), GestureMode::Resize);
    state.apply_move(pt(900.0, 400.0), &mut store, &BoardConfig::default());
    let item = get(&store, "a");
    assert_eq!(item.width, 240.0);
    assert_eq!(item.height, 180.0);
}

#[test]
fn resize_cap_never_breaks_floor() {
    let mut store = store_with(make_item_at("a", 620.0, 0.0, 100.0, 100.0));
    let state = InputState::begin(get(&store, "a"), pt(720.0, 100.0), GestureMode::Resize);
    state.apply_move(pt(730.0, 100.0), &mut store, &BoardConfig::default());
    let item = get(&store, "a");
    assert_eq!(item.width, 50.0);
    assert_eq!(item.height, 110.0);
}

#[test]
fn resize_snaps_to_grid() {
    let mut store = store_with(make_item_at("a", 0.0, 0.0, 200.0, 100.0));
    let state = InputState::begin(get(&store, "a"), pt(200.0, 100.0), GestureMode::Resize);
    state.apply_move(pt(233.0, 100.0), &mut store, &grid_config());
    // 233 x 116.5 snaps to 240 x 120.
    assert_eq!((get(&store, "a").width, get(&store, "a").height), (240.0, 120.0));
}

// =============================================================
// Rotating
// =============================================================

#[test]
fn rotate_quarter_turn_clockwise() {
    let mut store = store_with(make_item_at("a", 0.0, 0.0, 100.0, 100.0));
    let state = InputState::begin(get(&store, "a"), pt(50.0, -14.0), GestureMode::Rotate);
    // Pointer moves from straight above the centre to straight right of it.
    state.apply_move(pt(200.0, 50.0), &mut store, &BoardConfig::default());
    assert_eq!(get(&store, "a").rotation, 90.0);
}

#[test]
fn rotate_composes_onto_existing_rotation() {
    let mut item = make_item_at("a", 0.0, 0.0, 100.0, 100.0);
    item.rotation = 45.0;
    let mut store = store_with(item);
    let state = InputState::begin(get(&store, "a"), pt(50.0, -14.0), GestureMode::Rotate);
    state.apply_move(pt(50.0, -14.0), &mut store, &BoardConfig::default());
    assert_eq!(get(&store, "a").rotation, 45.0);
    state.apply_move(pt(200.0, 50.0), &mut store, &BoardConfig::default());
    assert_eq!(get(&store, "a").rotation, 135.0);
}

#[test]
fn rotate_snaps_to_fifteen_degrees_without_grid() {
    let mut store = store_with(make_item_at("a", 0.0, 0.0, 100.0, 100.0));
    let state = InputState::begin(get(&store, "a"), pt(150.0, 50.0), GestureMode::Rotate);
    // ~11.3 degrees below the +x axis.
    state.apply_move(pt(150.0, 70.0), &mut store, &BoardConfig::default());
    assert_eq!(get(&store, "a").rotation, 15.0);
}

#[test]
fn rotate_is_not_normalized() {
    let mut item = make_item_at("a", 0.0, 0.0, 100.0, 100.0);
    item.rotation = 345.0;
    let mut store = store_with(item);
    let state = InputState::begin(get(&store, "a"), pt(150.0, 50.0), GestureMode::Rotate);
    state.apply_move(pt(50.0, 150.0), &mut store, &BoardConfig::default());
    assert_eq!(get(&store, "a").rotation, 435.0);
}

// =============================================================
// Idle and stale sessions
// =============================================================

#[test]
fn idle_move_is_noop() {
    let mut store = store_with(make_item_at("a", 0.0, 0.0, 100.0, 100.0));
    let before = store.items().to_vec();
    assert!(!InputState::Idle.apply_move(pt(10.0, 10.0), &mut store, &BoardConfig::default()));
    assert_eq!(store.items(), before.as_slice());
}

#[test]
fn move_after_item_deleted_is_noop() {
    let mut store = store_with(make_item_at("a", 0.0, 0.0, 100.0, 100.0));
    let state = InputState::begin(get(&store, "a"), pt(10.0, 10.0), GestureMode::Drag);
    store.remove(&ItemId::from("a"));
    assert!(state.patch_for(pt(50.0, 50.0), &store, &BoardConfig::default()).is_none());
    assert!(!state.apply_move(pt(50.0, 50.0), &mut store, &BoardConfig::default()));
    assert!(store.is_empty());
}
