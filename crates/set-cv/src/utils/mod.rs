//! Utility modules

pub mod contour;
pub mod image;
