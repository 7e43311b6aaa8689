//! Bond capsule placement.
//!
//! A bond is drawn as a capsule spanning the gap between two atom spheres.
//! The capsule primitive has an intrinsic long axis (X, Y or Z); the resolver
//! picks the axis closest to the bond direction so that only a small residual
//! rotation is needed, and trims the capsule so it starts and ends at the
//! sphere surfaces instead of the centers.

mod capsule;

use std::fmt;

pub use capsule::{resolve_bond_pose, Axis, CapsulePose};

/// Floor for capsule height when the spheres touch or overlap.
pub const MIN_CAPSULE_HEIGHT: f32 = 1e-4;

/// Per-component tolerance under which a bond direction counts as already
/// aligned with its capsule axis.
pub const ALIGN_TOLERANCE: f32 = 1e-6;

/// Reasons a bond pose cannot be resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// Both endpoints are at the same position, so the bond has no direction.
    CoincidentAtoms {
        /// The shared position.
        at: [f32; 3],
    },
    /// An endpoint has a NaN or infinite coordinate, or the separation
    /// between the endpoints overflows.
    NonFinite,
    /// A radius is not finite and strictly positive.
    InvalidRadius {
        /// Which radius was rejected.
        name: &'static str,
        /// The rejected value.
        value: f32,
    },
}

impl fmt::Display for GeometryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CoincidentAtoms { at } => write!(
                f,
                "bond endpoints coincide at ({}, {}, {})",
                at[0], at[1], at[2]
            ),
            Self::NonFinite => {
                f.write_str("bond endpoints or their separation are not finite")
            }
            Self::InvalidRadius { name, value } => {
                write!(f, "{name} must be positive, got {value}")
            }
        }
    }
}

impl std::error::Error for GeometryError {}
