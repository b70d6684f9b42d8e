//! SET game rules library
//!
//! Card attribute vocabularies, validated card construction, the
//! all-equal-or-all-different SET rule and the exhaustive triple search.
//! Vision code lives in `set-cv`; this crate knows nothing about images.

pub mod attributes;
pub mod deck;
pub mod rules;

// Re-export commonly used types
pub use attributes::{
    AttributeError, CardAttributes, Color, Number, PartialAttributes, Shading, Symbol,
};
pub use deck::full_deck;
pub use rules::{check_attribute, find_set, is_a_set};
