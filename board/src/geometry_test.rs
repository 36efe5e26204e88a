#![allow(clippy::float_cmp)]

use super::*;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

// =============================================================
// snap
// =============================================================

#[test]
fn snap_disabled_is_identity() {
    assert_eq!(snap(13.7, 20.0, false), 13.7);
}

#[test]
fn snap_rounds_to_nearest_multiple() {
    assert_eq!(snap(29.0, 20.0, true), 20.0);
    assert_eq!(snap(31.0, 20.0, true), 40.0);
    assert_eq!(snap(40.0, 20.0, true), 40.0);
}

#[test]
fn snap_half_rounds_up() {
    assert_eq!(snap(30.0, 20.0, true), 40.0);
    assert_eq!(snap(-7.5, 15.0, true), 0.0);
}

#[test]
fn snap_negative_values() {
    assert_eq!(snap(-29.0, 20.0, true), -20.0);
    assert_eq!(snap(-31.0, 20.0, true), -40.0);
}

#[test]
fn snap_zero_grid_is_identity() {
    assert_eq!(snap(13.0, 0.0, true), 13.0);
    assert_eq!(snap(13.0, -5.0, true), 13.0);
    assert_eq!(snap(13.0, f64::NAN, true), 13.0);
}

// =============================================================
// angle_from_center
// =============================================================

#[test]
fn angle_cardinal_directions() {
    let c = Point::new(100.0, 100.0);
    assert!(approx(angle_from_center(Point::new(200.0, 100.0), c), 0.0));
    assert!(approx(angle_from_center(Point::new(100.0, 200.0), c), 90.0));
    assert!(approx(angle_from_center(Point::new(0.0, 100.0), c), 180.0));
    assert!(approx(angle_from_center(Point::new(100.0, 0.0), c), -90.0));
}

#[test]
fn angle_delta_independent_of_center_position() {
    let a = angle_from_center(Point::new(10.0, 0.0), Point::new(0.0, 0.0))
        - angle_from_center(Point::new(0.0, 10.0), Point::new(0.0, 0.0));
    let b = angle_from_center(Point::new(510.0, 500.0), Point::new(500.0, 500.0))
        - angle_from_center(Point::new(500.0, 510.0), Point::new(500.0, 500.0));
    assert!(approx(a, b));
}

// =============================================================
// resize_keeping_aspect
// =============================================================

#[test]
fn resize_grows_with_aspect() {
    let s = resize_keeping_aspect(Size::new(200.0, 100.0), 50.0);
    assert_eq!(s, Size::new(250.0, 125.0));
}

#[test]
fn resize_shrinks_with_aspect() {
    let s = resize_keeping_aspect(Size::new(200.0, 200.0), -100.0);
    assert_eq!(s, Size::new(100.0, 100.0));
}

#[test]
fn resize_width_floor() {
    let s = resize_keeping_aspect(Size::new(100.0, 200.0), -500.0);
    assert_eq!(s.width, 50.0);
    assert_eq!(s.height, 100.0);
}

#[test]
fn resize_height_floor_recomputes_width() {
    // 2:1 item; width floor alone would give height 25.
    let s = resize_keeping_aspect(Size::new(200.0, 100.0), -180.0);
    assert_eq!(s.height, 50.0);
    assert_eq!(s.width, 100.0);
}

#[test]
fn resize_zero_delta_is_identity() {
    let s = resize_keeping_aspect(Size::new(123.0, 77.0), 0.0);
    assert!(approx(s.width, 123.0));
    assert!(approx(s.height, 77.0));
}

// =============================================================
// clamp_to_extent
// =============================================================

#[test]
fn clamp_within_range() {
    assert_eq!(clamp_to_extent(10.0, 100.0), 10.0);
    assert_eq!(clamp_to_extent(-10.0, 100.0), 0.0);
    assert_eq!(clamp_to_extent(1000.0, 440.0), 440.0);
}

#[test]
fn clamp_inverted_range_collapses_to_zero() {
    assert_eq!(clamp_to_extent(30.0, -60.0), 0.0);
}

// =============================================================
// Containment
// =============================================================

#[test]
fn rect_contains_inclusive_edges() {
    let r = Rect::new(10.0, 10.0, 100.0, 50.0);
    assert!(r.contains(Point::new(10.0, 10.0)));
    assert!(r.contains(Point::new(110.0, 60.0)));
    assert!(!r.contains(Point::new(110.1, 60.0)));
}

#[test]
fn rect_centered_square() {
    let r = Rect::centered(Point::new(100.0, 100.0), 12.0);
    assert_eq!(r, Rect::new(94.0, 94.0, 12.0, 12.0));
}

#[test]
fn contains_rotated_zero_matches_axis_aligned() {
    let r = Rect::new(0.0, 0.0, 200.0, 20.0);
    assert!(contains_rotated(r, 0.0, Point::new(190.0, 10.0)));
    assert!(!contains_rotated(r, 0.0, Point::new(100.0, 60.0)));
}

#[test]
fn contains_rotated_quarter_turn() {
    // A 200x20 bar centred at (100, 10), turned upright.
    let r = Rect::new(0.0, 0.0, 200.0, 20.0);
    assert!(!contains_rotated(r, 90.0, Point::new(190.0, 10.0)));
    assert!(contains_rotated(r, 90.0, Point::new(100.0, 90.0)));
}

#[test]
fn rotate_about_full_turn_is_identity() {
    let p = rotate_about(Point::new(3.0, 4.0), Point::new(1.0, 1.0), 360.0);
    assert!(approx(p.x, 3.0));
    assert!(approx(p.y, 4.0));
}
