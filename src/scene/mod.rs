//! Scene primitives for reactions.
//!
//! [`MoleculeScene`] turns a validated molecule into sphere and capsule
//! descriptors; [`ReactionScene`] does so for every molecule of a reaction
//! and adds the reactant → product [`ReactionAnimation`]. Writing the result
//! to disk goes through a [`SceneWriter`]; [`UsdaWriter`] emits ASCII USD.

mod animation;
mod descriptors;
mod usda;
mod writer;

pub use animation::{ring_layout, Keyframe, ReactionAnimation, Track};
pub use descriptors::{CapsuleDescriptor, MoleculeScene, SphereDescriptor};
pub use usda::UsdaWriter;
pub use writer::{
    record_directory, sanitize_prim_name, write_reaction, SceneWriter,
    WrittenScene, ANIMATION_STEM,
};

use crate::error::ChemSimError;
use crate::model::{ReactionRecord, Role};
use crate::options::Options;

// ---------------------------------------------------------------------------
// ReactionScene
// ---------------------------------------------------------------------------

/// Primitives for every molecule of a reaction plus the animation that
/// ties them together.
#[derive(Debug, Clone)]
pub struct ReactionScene {
    /// Reactant scenes in record order.
    pub reactants: Vec<MoleculeScene>,
    /// Product scenes in record order.
    pub products: Vec<MoleculeScene>,
    /// Balanced equation, when known.
    pub equation: Option<String>,
    /// Process description, when known.
    pub description: Option<String>,
    /// Reactant → product animation.
    pub animation: ReactionAnimation,
}

impl ReactionScene {
    /// Build scenes for every molecule. The first molecule that fails
    /// aborts the build; the error names it.
    pub fn build(
        record: &ReactionRecord,
        options: &Options,
    ) -> Result<Self, ChemSimError> {
        let reactants = record
            .reactants
            .iter()
            .map(|m| MoleculeScene::build(m, options))
            .collect::<Result<Vec<_>, _>>()?;
        let products = record
            .products
            .iter()
            .map(|m| MoleculeScene::build(m, options))
            .collect::<Result<Vec<_>, _>>()?;

        let reactant_names: Vec<&str> =
            reactants.iter().map(|s| s.name.as_str()).collect();
        let product_names: Vec<&str> =
            products.iter().map(|s| s.name.as_str()).collect();
        let animation = ReactionAnimation::build(
            &reactant_names,
            &product_names,
            &options.animation,
        );

        log::info!(
            "built scene: {} reactant(s), {} product(s)",
            reactants.len(),
            products.len()
        );

        Ok(Self {
            reactants,
            products,
            equation: record.equation.clone(),
            description: record.process_description.clone(),
            animation,
        })
    }

    /// All molecule scenes tagged with their role, reactants first.
    pub fn molecules(&self) -> impl Iterator<Item = (Role, &MoleculeScene)> {
        self.reactants
            .iter()
            .map(|m| (Role::Reactant, m))
            .chain(self.products.iter().map(|m| (Role::Product, m)))
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::geometry::{Axis, GeometryError};

    const COMBUSTION: &str = r##"{
        "reactants": [
            {"name": "Methane", "formula": "CH4",
             "atoms": [{"id": "c", "element": "C", "color": "#000000"},
                       {"id": "h1", "element": "H"}, {"id": "h2", "element": "H"},
                       {"id": "h3", "element": "H"}, {"id": "h4", "element": "H"}],
             "bonds": [{"from_atom": "c", "to_atom": "h1"},
                       {"from_atom": "c", "to_atom": "h2"},
                       {"from_atom": "c", "to_atom": "h3"},
                       {"from_atom": "c", "to_atom": "h4"}]},
            {"name": "Oxygen", "formula": "O2",
             "atoms": [{"id": "o1", "element": "O"}, {"id": "o2", "element": "O"}],
             "bonds": [{"from_atom": "o1", "to_atom": "o2"}]}
        ],
        "products": [
            {"name": "Water", "formula": "H2O",
             "atoms": [{"id": "o", "element": "O"},
                       {"id": "h1", "element": "H"}, {"id": "h2", "element": "H"}],
             "bonds": [{"from_atom": "o", "to_atom": "h1"},
                       {"from_atom": "o", "to_atom": "h2"}]},
            {"name": "Water", "formula": "H2O",
             "atoms": [{"id": "o", "element": "O"}, {"id": "h", "element": "H"}],
             "bonds": [{"from_atom": "o", "to_atom": "h"}]}
        ],
        "reaction": "CH4 + 2O2 -> CO2 + 2H2O",
        "reactionDescription": "Methane burns."
    }"##;

    fn record(json: &str) -> ReactionRecord {
        ReactionRecord::from_json(json, &Options::default().colors).unwrap()
    }

    #[test]
    fn builds_every_molecule_with_poses() {
        let options = Options::default();
        let scene = ReactionScene::build(&record(COMBUSTION), &options).unwrap();

        assert_eq!(scene.reactants.len(), 2);
        assert_eq!(scene.products.len(), 2);
        assert_eq!(scene.equation.as_deref(), Some("CH4 + 2O2 -> CO2 + 2H2O"));
        assert_eq!(scene.animation.tracks.len(), 4);

        let methane = &scene.reactants[0];
        assert_eq!(methane.spheres.len(), 5);
        assert_eq!(methane.capsules.len(), 4);
        let axes: Vec<Axis> =
            methane.capsules.iter().map(|c| c.pose.axis).collect();
        assert_eq!(axes, [Axis::X, Axis::X, Axis::Y, Axis::Y]);
        for capsule in &methane.capsules {
            assert!((capsule.pose.height - 0.8).abs() < 1e-5);
            assert!((capsule.pose.midpoint.length() - 0.6).abs() < 1e-5);
        }
        assert_eq!(methane.layout.get("h4"), Some(Vec3::new(0.0, -1.2, 0.0)));
        for atom in methane.structure.atoms() {
            assert_eq!(atom.position, methane.layout.get(atom.id.as_str()));
        }
        assert_eq!(
            methane.element_colors,
            methane.structure.element_colors()
        );
        assert_eq!(methane.element_colors[0].0, "C");

        let roles: Vec<Role> = scene.molecules().map(|(r, _)| r).collect();
        assert_eq!(
            roles,
            [Role::Reactant, Role::Reactant, Role::Product, Role::Product]
        );
    }

    #[test]
    fn self_bond_fails_naming_the_molecule() {
        let json = r#"{"reactants": [
            {"name": "Loop", "atoms": [{"id": "a", "element": "C"}],
             "bonds": [{"from_atom": "a", "to_atom": "a"}]}]}"#;
        let err = ReactionScene::build(&record(json), &Options::default())
            .unwrap_err();
        match err {
            ChemSimError::Molecule { name, source } => {
                assert_eq!(name, "Loop");
                assert!(matches!(
                    *source,
                    ChemSimError::Geometry(GeometryError::CoincidentAtoms { .. })
                ));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn writes_layers_and_animation_stage() {
        let dir = tempfile::tempdir().unwrap();
        let scene =
            ReactionScene::build(&record(COMBUSTION), &Options::default())
                .unwrap();
        let written =
            write_reaction(&scene, &UsdaWriter, dir.path(), true).unwrap();

        let names: Vec<String> = written
            .molecules
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            names,
            [
                "reactants_Methane.usda",
                "reactants_Oxygen.usda",
                "products_Water.usda",
                "products_Water_2.usda",
            ]
        );
        for path in &written.molecules {
            assert!(path.is_file());
        }

        let stage_path = written.animation.unwrap();
        assert_eq!(stage_path, dir.path().join("reaction_anim.usda"));
        let stage = std::fs::read_to_string(stage_path).unwrap();
        assert!(stage.contains("./products_Water_2.usda"));
        assert!(stage.contains("./reactants_Methane.usda"));
    }

    #[test]
    fn animation_needs_both_sides() {
        let dir = tempfile::tempdir().unwrap();
        let json = r#"{"reactants": [
            {"name": "Helium", "atoms": [{"id": "he", "element": "He"}]}]}"#;
        let scene =
            ReactionScene::build(&record(json), &Options::default()).unwrap();
        let written =
            write_reaction(&scene, &UsdaWriter, dir.path(), true).unwrap();
        assert_eq!(written.molecules.len(), 1);
        assert!(written.animation.is_none());
        assert!(!dir.path().join("reaction_anim.usda").exists());
    }
}
