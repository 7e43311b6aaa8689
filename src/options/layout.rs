use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::layout::DEFAULT_BOND_LENGTH;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Layout", inline)]
#[serde(default)]
/// Lattice layout parameters.
pub struct LayoutOptions {
    /// Center-to-center distance between bonded atoms.
    #[schemars(title = "Bond Length", range(min = 0.5, max = 5.0), extend("step" = 0.1))]
    pub bond_length: f32,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            bond_length: DEFAULT_BOND_LENGTH,
        }
    }
}
