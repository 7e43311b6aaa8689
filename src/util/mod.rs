//! Shared utilities.
//!
//! Hex color handling, prompt hashing, and easing curves for animation.

pub mod color;
pub mod easing;
pub mod hash;
