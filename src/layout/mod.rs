//! Lattice layout for molecules known only by their bond graph.
//!
//! Atoms are placed breadth-first from the first atom of the molecule. Each
//! newly reached neighbor steps one bond length along one of six axis-aligned
//! directions from its parent, taking the first direction whose target is not
//! already occupied. Atoms the traversal never reaches (isolated ions, free
//! radicals, separate fragments) are lined up along +X away from the origin.
//!
//! The result depends only on atom order and bond order, so identical input
//! always yields identical coordinates.

mod map;

use std::collections::VecDeque;
use std::fmt;

use glam::Vec3;
use rustc_hash::{FxHashMap, FxHashSet};

pub use map::{LayoutMap, Placement};

use crate::model::{Atom, Bond, MolecularStructure};

/// Default center-to-center distance between bonded atoms.
pub const DEFAULT_BOND_LENGTH: f32 = 1.2;

/// Candidate step directions, tried in this order: +X, −X, +Y, −Y, +Z, −Z.
pub const LAYOUT_DIRECTIONS: [Vec3; 6] = [
    Vec3::X,
    Vec3::NEG_X,
    Vec3::Y,
    Vec3::NEG_Y,
    Vec3::Z,
    Vec3::NEG_Z,
];

/// Where the first unreachable atom goes.
pub const FALLBACK_ORIGIN: Vec3 = Vec3::new(5.0, 0.0, 0.0);

/// Spacing along +X between consecutive unreachable atoms.
pub const FALLBACK_SPACING: f32 = 1.5;

/// Reasons a layout cannot be computed.
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutError {
    /// A bond endpoint is not among the atoms.
    UnknownAtom {
        /// Position of the bond in the bond list.
        bond: usize,
        /// The unresolved identifier.
        atom: String,
    },
    /// Two atoms share an identifier.
    DuplicateAtom(String),
    /// Bond length must be finite and strictly positive.
    InvalidBondLength(f32),
    /// No step directions were supplied.
    EmptyDirections,
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownAtom { bond, atom } => {
                write!(f, "bond #{bond} references unknown atom '{atom}'")
            }
            Self::DuplicateAtom(id) => write!(f, "duplicate atom id '{id}'"),
            Self::InvalidBondLength(len) => {
                write!(f, "bond length must be positive, got {len}")
            }
            Self::EmptyDirections => f.write_str("no layout directions"),
        }
    }
}

impl std::error::Error for LayoutError {}

/// Exact-coordinate key for occupancy checks. Adding `0.0` folds `-0.0`
/// into `0.0` so both compare equal, as they do under `==`.
fn lattice_key(v: Vec3) -> [u32; 3] {
    (v + Vec3::ZERO).to_array().map(f32::to_bits)
}

/// Build the index-based adjacency lists, bond order preserved.
fn adjacency(
    atoms: &[Atom],
    bonds: &[Bond],
) -> Result<Vec<Vec<usize>>, LayoutError> {
    let mut index: FxHashMap<&str, usize> = FxHashMap::default();
    index.reserve(atoms.len());
    for (i, atom) in atoms.iter().enumerate() {
        if index.insert(atom.id.as_str(), i).is_some() {
            return Err(LayoutError::DuplicateAtom(atom.id.to_string()));
        }
    }

    let resolve = |bond: usize, id: &str| {
        index
            .get(id)
            .copied()
            .ok_or_else(|| LayoutError::UnknownAtom {
                bond,
                atom: id.to_owned(),
            })
    };

    let mut adj = vec![Vec::new(); atoms.len()];
    for (i, bond) in bonds.iter().enumerate() {
        let a = resolve(i, bond.from.as_str())?;
        let b = resolve(i, bond.to.as_str())?;
        adj[a].push(b);
        adj[b].push(a);
    }
    Ok(adj)
}

/// Assign a position to every atom from bond connectivity alone.
///
/// `directions` are the candidate unit steps, tried round-robin; pass
/// [`LAYOUT_DIRECTIONS`] for the standard six-axis lattice. Every input atom
/// appears in the result exactly once. Bonds referencing unknown atoms are
/// rejected before anything is placed.
pub fn compute_layout(
    atoms: &[Atom],
    bonds: &[Bond],
    bond_length: f32,
    directions: &[Vec3],
) -> Result<LayoutMap, LayoutError> {
    if !(bond_length.is_finite() && bond_length > 0.0) {
        return Err(LayoutError::InvalidBondLength(bond_length));
    }
    if directions.is_empty() {
        return Err(LayoutError::EmptyDirections);
    }

    let adj = adjacency(atoms, bonds)?;
    if atoms.is_empty() {
        return Ok(LayoutMap::default());
    }

    let mut placed: Vec<Option<(Vec3, Placement)>> = vec![None; atoms.len()];
    let mut occupied: FxHashSet<[u32; 3]> = FxHashSet::default();
    let mut queue = VecDeque::new();

    placed[0] = Some((Vec3::ZERO, Placement::Traversal));
    let _ = occupied.insert(lattice_key(Vec3::ZERO));
    queue.push_back(0);

    while let Some(cur) = queue.pop_front() {
        let Some((base, _)) = placed[cur] else {
            continue;
        };
        // One round-robin cycle per parent, shared by all of its children.
        let mut steps = directions.iter().cycle();
        for &n in &adj[cur] {
            if placed[n].is_some() {
                continue;
            }
            let free = steps
                .by_ref()
                .take(directions.len())
                .map(|&d| base + bond_length * d)
                .find(|cand| !occupied.contains(&lattice_key(*cand)));
            match free {
                Some(pos) => {
                    placed[n] = Some((pos, Placement::Traversal));
                    let _ = occupied.insert(lattice_key(pos));
                    queue.push_back(n);
                }
                None => log::debug!(
                    "layout: no free lattice site next to '{}' for '{}'",
                    atoms[cur].id,
                    atoms[n].id
                ),
            }
        }
    }

    let mut fallback_count = 0usize;
    let entries = atoms
        .iter()
        .zip(placed)
        .map(|(atom, slot)| {
            let (pos, how) = slot.unwrap_or_else(|| {
                let pos = FALLBACK_ORIGIN
                    + Vec3::X * (fallback_count as f32 * FALLBACK_SPACING);
                fallback_count += 1;
                (pos, Placement::Fallback)
            });
            (atom.id.clone(), pos, how)
        })
        .collect();

    if fallback_count > 0 {
        log::debug!(
            "layout: {fallback_count} of {} atoms unreachable from '{}'",
            atoms.len(),
            atoms[0].id
        );
    }

    Ok(LayoutMap::from_entries(entries))
}

/// Lay out a validated molecule on the standard six-axis lattice.
pub fn layout_structure(
    mol: &MolecularStructure,
    bond_length: f32,
) -> Result<LayoutMap, LayoutError> {
    compute_layout(mol.atoms(), mol.bonds(), bond_length, &LAYOUT_DIRECTIONS)
}
