//! Perspective flattening of a detected card quadrilateral into the
//! canonical 200×300 top-down view.

use image::{Rgb, RgbImage};
use imageproc::geometric_transformations::{Interpolation, Projection, warp_into};

/// Width of the rectified card face in pixels.
pub const FLATTEN_WIDTH: u32 = 200;
/// Height of the rectified card face in pixels.
pub const FLATTEN_HEIGHT: u32 = 300;

/// Classify the four unordered corner points into
/// top-left/top-right/bottom-right/bottom-left order.
///
/// Two independent heuristics assign the roles: coordinate-sum extremes
/// give top-left (min) and bottom-right (max), coordinate-difference
/// (y − x) extremes give top-right (min) and bottom-left (max). The full
/// ordering then depends on the card's orientation in the frame:
///
/// - `w <= 0.8 h`: vertical card, roles map directly;
/// - `w >= 1.2 h`: horizontal card, roles rotate by 90°;
/// - otherwise the card sits diamond-wise and the polygon-approximation
///   point order decides between a left and a right tilt.
///
/// Returns `None` for degenerate geometry (zero extent), in which case
/// the candidate is rejected upstream.
pub fn order_corners(pts: &[(f32, f32); 4], w: u32, h: u32) -> Option<[(f32, f32); 4]> {
    if w == 0 || h == 0 {
        return None;
    }

    let sum = |p: &(f32, f32)| p.0 + p.1;
    let diff = |p: &(f32, f32)| p.1 - p.0;

    let tl = *pts
        .iter()
        .min_by(|a, b| sum(a).total_cmp(&sum(b)))?;
    let br = *pts
        .iter()
        .max_by(|a, b| sum(a).total_cmp(&sum(b)))?;
    let tr = *pts
        .iter()
        .min_by(|a, b| diff(a).total_cmp(&diff(b)))?;
    let bl = *pts
        .iter()
        .max_by(|a, b| diff(a).total_cmp(&diff(b)))?;

    let w = w as f32;
    let h = h as f32;

    if w <= 0.8 * h {
        return Some([tl, tr, br, bl]);
    }
    if w >= 1.2 * h {
        return Some([bl, tl, tr, br]);
    }

    // Diamond orientation: lean on the point order produced by the
    // polygon approximation. If the furthest-left point sits above the
    // furthest-right one the card tilts left, otherwise right.
    if pts[1].1 <= pts[3].1 {
        Some([pts[1], pts[0], pts[3], pts[2]])
    } else {
        Some([pts[0], pts[3], pts[2], pts[1]])
    }
}

/// Warp the quadrilateral spanned by `pts` in `raw` into a 200×300
/// rectified card face.
///
/// `w` and `h` are the bounding-box dimensions of the card contour and
/// drive the orientation classification. Returns `None` when the corner
/// ordering or the projective transform is degenerate; such cards are
/// dropped from the frame rather than crashing the pipeline.
pub fn flatten(raw: &RgbImage, pts: &[(f32, f32); 4], w: u32, h: u32) -> Option<RgbImage> {
    let ordered = order_corners(pts, w, h)?;

    let dst = [
        (0.0, 0.0),
        ((FLATTEN_WIDTH - 1) as f32, 0.0),
        ((FLATTEN_WIDTH - 1) as f32, (FLATTEN_HEIGHT - 1) as f32),
        (0.0, (FLATTEN_HEIGHT - 1) as f32),
    ];

    let projection = Projection::from_control_points(ordered, dst)?;

    let mut warp = RgbImage::new(FLATTEN_WIDTH, FLATTEN_HEIGHT);
    warp_into(
        raw,
        &projection,
        Interpolation::Bilinear,
        Rgb([0u8, 0, 0]),
        &mut warp,
    );
    Some(warp)
}
