//! Card detection module: configuration, localization and frame-level
//! orchestration.

pub mod config;
pub mod detector;
pub mod localizer;

pub use config::{ClassifierConfig, DetectionConfig, LocalizerConfig};
pub use detector::{CardDetector, DetectionStats, FrameAnalysis};
pub use localizer::CardLocalizer;
