//! The per-frame card record carried through the pipeline.

use image::{GrayImage, RgbImage};
use imageproc::point::Point;
use set_core::PartialAttributes;

/// A card-shaped region detected in one frame, together with everything
/// derived from it. Built by the localizer, enriched in place by the
/// classifier, discarded at the end of the frame.
///
/// The game attributes live in a [`PartialAttributes`] value from
/// `set-core`; the vision record holds them by composition and adds its
/// own geometry and imagery.
#[derive(Debug, Clone)]
pub struct DetectedCard {
    /// Raw boundary in source-image coordinates, set once at detection.
    pub contour: Vec<Point<i32>>,
    /// Shoelace area of `contour`.
    pub area: f64,
    /// The four approximated corner points, in the approximation's order.
    pub corner_points: [(f32, f32); 4],
    /// Axis-aligned bounding box dimensions of `contour`.
    pub bounding_width: u32,
    pub bounding_height: u32,
    /// Arithmetic mean of `corner_points`.
    pub center: (i32, i32),
    /// 200×300 rectified face image, produced once by flattening.
    pub warp: Option<RgbImage>,
    /// White-on-black mask of the printed symbols, derived from `warp`.
    pub symbol_mask: Option<GrayImage>,
    /// One contour per printed symbol instance, leftmost first.
    pub symbol_contours: Vec<Vec<Point<i32>>>,
    /// Classified game attributes; fields stay unset when a stage could
    /// not decide confidently.
    pub attributes: PartialAttributes,
}

impl DetectedCard {
    /// Whether every attribute stage produced a confident value.
    pub fn is_classified(&self) -> bool {
        self.attributes.is_complete()
    }
}
