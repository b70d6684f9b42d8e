//! Detection configuration
//!
//! All empirically tuned constants of the pipeline live here, in one
//! immutable structure passed in at construction. The defaults assume a
//! roughly 1280×720 table view and the 200×300 flattened card face; both
//! area bands must be retuned if either resolution changes.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main detection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionConfig {
    pub localizer: LocalizerConfig,
    pub classifier: ClassifierConfig,
    /// Directories searched for the reference symbol templates.
    pub template_dirs: Vec<PathBuf>,
}

/// Card localization configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalizerConfig {
    /// Smallest contour area treated as a card candidate.
    pub card_min_area: f64,
    /// Largest contour area treated as a card candidate.
    pub card_max_area: f64,
    /// Gaussian blur sigma applied before thresholding.
    pub blur_sigma: f32,
    /// Douglas-Peucker epsilon as a fraction of the contour perimeter;
    /// higher values enforce a stricter quadrilateral approximation.
    pub approx_eps_factor: f64,
}

/// Attribute classification configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Gaussian blur sigma applied to the card face before segmentation.
    pub blur_sigma: f32,
    /// Minimum contour area treated as a real printed symbol rather than
    /// noise, at the 200×300 warp scale.
    pub symbol_min_area: f64,
    /// Accepted height band of the first symbol's bounding box
    /// (min, max); crops outside abandon classification.
    pub crop_height_range: (u32, u32),
    /// Accepted width band of the first symbol's bounding box (min, max).
    pub crop_width_range: (u32, u32),
    /// Mean saturation above which the symbol center counts as solid.
    pub solid_min_saturation: f32,
    /// Mean saturation below which the symbol center counts as empty.
    pub empty_max_saturation: f32,
    /// Global minimum HSV value below which very dark ink is forced to
    /// purple regardless of channel means.
    pub dark_ink_value: f32,
}

impl Default for LocalizerConfig {
    fn default() -> Self {
        Self {
            card_min_area: 10_000.0,
            card_max_area: 120_000.0,
            blur_sigma: 1.0,
            approx_eps_factor: 0.01,
        }
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            blur_sigma: 1.0,
            symbol_min_area: 4_000.0,
            crop_height_range: (50, 80),
            crop_width_range: (120, 160),
            solid_min_saturation: 0.5,
            empty_max_saturation: 0.1,
            dark_ink_value: 0.15,
        }
    }
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            localizer: LocalizerConfig::default(),
            classifier: ClassifierConfig::default(),
            template_dirs: vec!["assets/templates".into()],
        }
    }
}
