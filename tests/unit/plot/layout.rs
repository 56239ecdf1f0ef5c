use super::*;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn symmetric_bounds_fall_back_for_zero_extent() {
    assert_eq!(DataBounds::symmetric(0.0), DataBounds::symmetric(1.0));
    assert_eq!(DataBounds::symmetric(f64::NAN).max_x, 1.0);
    assert_eq!(DataBounds::symmetric(2.2).min_y, -2.2);
}

#[test]
fn from_points_skips_non_finite() {
    let b = DataBounds::from_points([
        Point::new(1.0, 2.0),
        Point::new(f64::NAN, 100.0),
        Point::new(-3.0, 0.5),
    ])
    .unwrap();
    assert_eq!((b.min_x, b.max_x, b.min_y, b.max_y), (-3.0, 1.0, 0.5, 2.0));
    assert!(DataBounds::from_points(Vec::new()).is_none());
}

#[test]
fn padding_handles_degenerate_axis() {
    let b = DataBounds {
        min_x: 2.0,
        max_x: 2.0,
        min_y: 0.0,
        max_y: 10.0,
    }
    .padded(0.1);
    assert!(approx(b.min_x, 1.5) && approx(b.max_x, 2.5));
    assert!(approx(b.min_y, -1.0) && approx(b.max_y, 11.0));
}

#[test]
fn equal_aspect_gives_identical_pixel_scales() {
    let area = Rect::new(50.0, 20.0, 850.0, 420.0);
    let bounds = DataBounds {
        min_x: -1.0,
        max_x: 1.0,
        min_y: -3.0,
        max_y: 0.5,
    };
    let proj = Projection::new(area, bounds, true);
    assert!(approx(proj.scale_x(), proj.scale_y()));
    // Original extent is still fully visible.
    assert!(proj.bounds.min_x <= -1.0 && proj.bounds.max_x >= 1.0);
    assert!(proj.bounds.min_y <= -3.0 && proj.bounds.max_y >= 0.5);
}

#[test]
fn projection_flips_y_and_hits_corners() {
    let area = Rect::new(0.0, 0.0, 100.0, 200.0);
    let proj = Projection::new(area, DataBounds::symmetric(1.0), false);
    assert_eq!(proj.to_px(Point::new(-1.0, -1.0)), Point::new(0.0, 200.0));
    assert_eq!(proj.to_px(Point::new(1.0, 1.0)), Point::new(100.0, 0.0));
    assert_eq!(proj.to_px(Point::new(0.0, 0.0)), Point::new(50.0, 100.0));
}

#[test]
fn ticks_are_nice_and_inside_range() {
    let t = ticks(-1.1, 1.1, 5);
    assert_eq!(t, vec![-1.0, -0.5, 0.0, 0.5, 1.0]);
    assert!(ticks(0.0, 0.0, 5).len() == 1);
}

#[test]
fn tick_labels_trim_zeros() {
    assert_eq!(format_tick(0.0), "0");
    assert_eq!(format_tick(0.5), "0.5");
    assert_eq!(format_tick(-2.0), "-2");
    assert_eq!(format_tick(1.23456), "1.235");
}
