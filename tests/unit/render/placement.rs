use super::*;
use crate::foundation::core::Point;

#[test]
fn default_icon_is_centered_at_double_size() {
    let p = place(120.0, 120.0, 1.0, [0.0, 0.0], Canvas::square(2048));
    assert_eq!(
        p,
        Placement {
            x: 904.0,
            y: 904.0,
            width: 240.0,
            height: 240.0
        }
    );
}

#[test]
fn aspect_ratio_is_preserved() {
    let p = place(200.0, 100.0, 0.5, [0.0, 0.0], Canvas::square(1000));
    assert_eq!(p.width, 200.0);
    assert_eq!(p.height, 100.0);
    assert_eq!((p.x, p.y), (400.0, 450.0));
}

#[test]
fn translation_is_in_points() {
    let p = place(100.0, 100.0, 1.0, [10.0, -5.0], Canvas::square(400));
    assert_eq!((p.x, p.y), (100.0 + 20.0, 100.0 - 10.0));
}

#[test]
fn transform_maps_source_corners_onto_rect() {
    let p = place(120.0, 60.0, 1.0, [0.0, 0.0], Canvas::square(480));
    let t = p.transform_for(30, 15);
    assert_eq!(t * Point::new(0.0, 0.0), Point::new(p.x, p.y));
    assert_eq!(
        t * Point::new(30.0, 15.0),
        Point::new(p.x + p.width, p.y + p.height)
    );
    assert_eq!(p.rect().width(), 240.0);
}

#[test]
fn degenerate_placement_is_not_drawable() {
    assert!(place(120.0, 120.0, 1.0, [0.0, 0.0], Canvas::square(64)).is_drawable());
    assert!(!place(0.0, 0.0, 1.0, [0.0, 0.0], Canvas::square(64)).is_drawable());
    assert!(!place(10.0, 10.0, -1.0, [0.0, 0.0], Canvas::square(64)).is_drawable());
}
