use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Where generated scenes land.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputOptions {
    /// Root directory; each record gets its own subdirectory.
    pub directory: PathBuf,
    /// Also write the combined reactant → product animation stage.
    pub write_animation: bool,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("output_usd"),
            write_animation: true,
        }
    }
}
