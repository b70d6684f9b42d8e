//! SET Card Recognition Library
//!
//! Vision pipeline for the SET card game: contour-based card localization,
//! perspective flattening, attribute classification and frame-level
//! orchestration of the SET search. One raw color frame goes in, a list of
//! classified cards plus the first found SET comes out; camera IO and
//! rendering are left to the caller.

pub mod card;
pub mod classify;
pub mod detection;
pub mod flatten;
pub mod template;
pub mod utils;

// Re-export commonly used types
pub use card::DetectedCard;
pub use classify::CardClassifier;
pub use detection::{CardDetector, CardLocalizer, DetectionConfig, FrameAnalysis};
pub use template::{SymbolTemplates, Template, TemplateLoader};

// Error handling
pub type Result<T> = anyhow::Result<T>;
