use glam::Vec3;

use crate::error::ChemSimError;
use crate::geometry::{resolve_bond_pose, CapsulePose};
use crate::layout::{layout_structure, LayoutMap};
use crate::model::{AtomId, MolecularStructure};
use crate::options::Options;
use crate::util::color;

/// One atom sphere.
#[derive(Debug, Clone, PartialEq)]
pub struct SphereDescriptor {
    /// Atom the sphere stands for.
    pub atom_id: AtomId,
    /// Element symbol, used for material grouping.
    pub element: String,
    /// Sphere center.
    pub center: Vec3,
    /// Sphere radius.
    pub radius: f32,
    /// RGB color.
    pub color: [f32; 3],
}

/// One bond capsule.
#[derive(Debug, Clone, PartialEq)]
pub struct CapsuleDescriptor {
    /// First endpoint atom.
    pub from: AtomId,
    /// Second endpoint atom.
    pub to: AtomId,
    /// Axis, height, orientation, midpoint and radius.
    pub pose: CapsulePose,
    /// RGB color, the average of both endpoint colors.
    pub color: [f32; 3],
}

/// Ball-and-stick primitives for a single molecule.
#[derive(Debug, Clone)]
pub struct MoleculeScene {
    /// Molecule display name.
    pub name: String,
    /// Chemical formula, when known.
    pub formula: Option<String>,
    /// Free-text description, when known.
    pub description: Option<String>,
    /// The molecule with every atom position filled in from `layout`.
    pub structure: MolecularStructure,
    /// Positions the primitives were built from.
    pub layout: LayoutMap,
    /// One material color per element in first-seen order.
    pub element_colors: Vec<(String, [f32; 3])>,
    /// One sphere per atom, in atom order.
    pub spheres: Vec<SphereDescriptor>,
    /// One capsule per bond, in bond order.
    pub capsules: Vec<CapsuleDescriptor>,
}

impl MoleculeScene {
    /// Lay out a molecule and resolve every bond.
    ///
    /// Fails as a whole if layout fails or any bond is degenerate; no
    /// partial scene is returned.
    pub fn build(
        mol: &MolecularStructure,
        options: &Options,
    ) -> Result<Self, ChemSimError> {
        Self::build_inner(mol, options).map_err(|e| e.in_molecule(&mol.name))
    }

    fn build_inner(
        mol: &MolecularStructure,
        options: &Options,
    ) -> Result<Self, ChemSimError> {
        let geometry = &options.geometry;
        let layout = layout_structure(mol, options.layout.bond_length)?;
        let mut placed = mol.clone();
        placed.apply_layout(&layout);

        let spheres = placed
            .atoms()
            .iter()
            .filter_map(|atom| {
                atom.position.map(|center| SphereDescriptor {
                    atom_id: atom.id.clone(),
                    element: atom.element.clone(),
                    center,
                    radius: geometry.atom_radius,
                    color: atom.color,
                })
            })
            .collect::<Vec<_>>();

        let mut capsules = Vec::with_capacity(placed.bonds().len());
        for bond in placed.bonds() {
            let (Some(a), Some(b)) = (
                placed.atom(bond.from.as_str()),
                placed.atom(bond.to.as_str()),
            ) else {
                continue;
            };
            let (Some(p0), Some(p1)) = (a.position, b.position) else {
                continue;
            };
            let pose = resolve_bond_pose(
                p0,
                p1,
                geometry.atom_radius,
                geometry.bond_radius,
            )?;
            capsules.push(CapsuleDescriptor {
                from: a.id.clone(),
                to: b.id.clone(),
                pose,
                color: color::mix(a.color, b.color),
            });
        }

        log::debug!(
            "{}: {} spheres, {} capsules",
            mol.name,
            spheres.len(),
            capsules.len()
        );

        Ok(Self {
            element_colors: placed.element_colors(),
            name: placed.name.clone(),
            formula: placed.formula.clone(),
            description: placed.description.clone(),
            structure: placed,
            layout,
            spheres,
            capsules,
        })
    }
}
