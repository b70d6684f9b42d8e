//! Contour measurements shared by the localizer and the classifier.

use imageproc::point::Point;
use imageproc::rect::Rect;

/// Shoelace area of a closed contour, in pixels².
pub fn contour_area(points: &[Point<i32>]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let mut acc = 0i64;
    for (i, p) in points.iter().enumerate() {
        let q = &points[(i + 1) % points.len()];
        acc += p.x as i64 * q.y as i64 - q.x as i64 * p.y as i64;
    }
    (acc.abs() as f64) / 2.0
}

/// Axis-aligned bounding rectangle of a contour.
///
/// Returns `None` for an empty point list.
pub fn bounding_rect(points: &[Point<i32>]) -> Option<Rect> {
    let first = points.first()?;
    let (mut min_x, mut max_x) = (first.x, first.x);
    let (mut min_y, mut max_y) = (first.y, first.y);
    for p in points {
        min_x = min_x.min(p.x);
        max_x = max_x.max(p.x);
        min_y = min_y.min(p.y);
        max_y = max_y.max(p.y);
    }
    Some(Rect::at(min_x, min_y).of_size((max_x - min_x + 1) as u32, (max_y - min_y + 1) as u32))
}

/// Arithmetic mean of a set of corner points, rounded to pixel
/// coordinates.
pub fn center_of(points: &[(f32, f32)]) -> (i32, i32) {
    let n = points.len().max(1) as f32;
    let sx: f32 = points.iter().map(|p| p.0).sum();
    let sy: f32 = points.iter().map(|p| p.1).sum();
    ((sx / n).round() as i32, (sy / n).round() as i32)
}
