//! Centralized generation options with TOML preset support.
//!
//! Layout spacing, primitive radii, the element palette, animation timing and
//! output placement are consolidated here. Options serialize to/from TOML so
//! a preset can be passed to the command line with `--options`.

mod animation;
mod colors;
mod geometry;
mod layout;
mod output;

use std::path::Path;

pub use animation::AnimationOptions;
pub use colors::ColorOptions;
pub use geometry::GeometryOptions;
pub use layout::LayoutOptions;
pub use output::OutputOptions;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::ChemSimError;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[geometry]`) work correctly.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct Options {
    /// Lattice layout parameters.
    pub layout: LayoutOptions,
    /// Sphere and capsule radii.
    pub geometry: GeometryOptions,
    /// Element palette.
    #[schemars(skip)]
    pub colors: ColorOptions,
    /// Reaction animation timing.
    pub animation: AnimationOptions,
    /// Output placement.
    #[schemars(skip)]
    pub output: OutputOptions,
}

impl Options {
    /// Generate JSON Schema describing the user-tunable options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Load options from a TOML file. Missing fields use defaults.
    pub fn load(path: &Path) -> Result<Self, ChemSimError> {
        let content =
            std::fs::read_to_string(path).map_err(ChemSimError::Io)?;
        toml::from_str(&content)
            .map_err(|e| ChemSimError::OptionsParse(e.to_string()))
    }

    /// Save options to a TOML file (pretty-printed).
    pub fn save(&self, path: &Path) -> Result<(), ChemSimError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ChemSimError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ChemSimError::Io)?;
        }
        std::fs::write(path, content).map_err(ChemSimError::Io)
    }

    /// List available preset names (TOML file stems) in a directory.
    #[must_use]
    pub fn list_presets(dir: &Path) -> Vec<String> {
        let mut names = Vec::new();
        if let Ok(entries) = std::fs::read_dir(dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "toml") {
                    if let Some(stem) =
                        path.file_stem().and_then(|s| s.to_str())
                    {
                        names.push(stem.to_owned());
                    }
                }
            }
        }
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::easing::EasingFunction;

    #[test]
    fn default_round_trips_through_toml() {
        let opts = Options::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed: Options = toml::from_str(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r"
[geometry]
atom_radius = 0.35
";
        let opts: Options = toml::from_str(toml_str).unwrap();
        assert_eq!(opts.geometry.atom_radius, 0.35);
        // Everything else should be default
        assert_eq!(opts.geometry.bond_radius, 0.05);
        assert_eq!(opts.layout.bond_length, 1.2);
        assert_eq!(opts.animation.react_frames, 24);
        assert_eq!(opts.animation.easing, EasingFunction::Linear);
    }

    #[test]
    fn element_color_lookup() {
        let colors = ColorOptions::default();
        assert_eq!(colors.element_color("O"), [1.0, 0.0, 0.0]);
        assert_eq!(colors.element_color(" H "), [1.0, 1.0, 1.0]);
        assert_eq!(colors.element_color("Xe"), [0.5, 0.5, 0.5]);
    }

    #[test]
    fn palette_overrides_merge_from_toml() {
        let toml_str = r"
[colors]
use_record_colors = false

[colors.elements]
Xe = [0.3, 0.8, 0.9]
";
        let opts: Options = toml::from_str(toml_str).unwrap();
        assert!(!opts.colors.use_record_colors);
        assert_eq!(opts.colors.element_color("Xe"), [0.3, 0.8, 0.9]);
    }

    #[test]
    fn save_then_load_preset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("presets").join("wide.toml");
        let mut opts = Options::default();
        opts.layout.bond_length = 2.0;
        opts.save(&path).unwrap();

        let loaded = Options::load(&path).unwrap();
        assert_eq!(loaded, opts);
        assert_eq!(
            Options::list_presets(&dir.path().join("presets")),
            vec!["wide".to_owned()]
        );
    }

    #[test]
    fn schema_has_expected_properties() {
        let schema_value =
            serde_json::to_value(Options::json_schema()).unwrap();
        let props = schema_value["properties"].as_object().unwrap();

        assert!(props.contains_key("layout"));
        assert!(props.contains_key("geometry"));
        assert!(props.contains_key("animation"));

        // Skipped sections should be absent
        assert!(!props.contains_key("colors"));
        assert!(!props.contains_key("output"));

        let animation = &props["animation"]["properties"];
        assert!(animation.get("ring_radius").is_some());
        assert!(animation.get("easing").is_none());
    }
}
