use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Geometry", inline)]
#[serde(default)]
/// Radii of the ball-and-stick primitives.
pub struct GeometryOptions {
    /// Atom sphere radius.
    #[schemars(title = "Atom Radius", range(min = 0.05, max = 1.0), extend("step" = 0.01))]
    pub atom_radius: f32,
    /// Bond capsule radius.
    #[schemars(title = "Bond Radius", range(min = 0.01, max = 0.5), extend("step" = 0.01))]
    pub bond_radius: f32,
}

impl Default for GeometryOptions {
    fn default() -> Self {
        Self {
            atom_radius: 0.20,
            bond_radius: 0.05,
        }
    }
}
