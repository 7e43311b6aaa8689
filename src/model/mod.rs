//! Typed molecular records.
//!
//! Reaction records arrive as loosely-shaped JSON from the reaction service.
//! This module owns the serde shapes of that JSON ([`MoleculeDesc`],
//! [`ReactionDesc`]) and the validating conversion into the strongly-typed
//! [`MolecularStructure`] and [`ReactionRecord`] the rest of the crate
//! consumes. Invalid records are rejected here, before layout ever runs.

mod atom;
mod reaction;
mod structure;

use std::fmt;

pub use atom::{Atom, AtomId};
pub use reaction::{ReactionDesc, ReactionRecord, Role};
pub use structure::{AtomDesc, Bond, BondDesc, MolecularStructure, MoleculeDesc};

/// Validation failures for molecular records.
#[derive(Debug)]
pub enum ModelError {
    /// The record is not well-formed JSON of the expected shape.
    Parse(serde_json::Error),
    /// An atom has an empty identifier.
    EmptyAtomId {
        /// Molecule containing the atom.
        molecule: String,
        /// Position of the atom in the molecule's atom list.
        index: usize,
    },
    /// Two atoms in one molecule share an identifier.
    DuplicateAtom {
        /// Molecule containing the atoms.
        molecule: String,
        /// The repeated identifier.
        id: String,
    },
    /// A bond references an atom that is not in the molecule.
    UnknownBondAtom {
        /// Molecule containing the bond.
        molecule: String,
        /// Position of the bond in the molecule's bond list.
        bond: usize,
        /// The identifier that could not be resolved.
        atom: String,
    },
    /// An atom color is not a `#RRGGBB` string.
    InvalidColor {
        /// Molecule containing the atom.
        molecule: String,
        /// Atom carrying the color.
        atom: String,
        /// The rejected value.
        value: String,
    },
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(e) => write!(f, "malformed reaction JSON: {e}"),
            Self::EmptyAtomId { molecule, index } => {
                write!(f, "{molecule}: atom #{index} has an empty id")
            }
            Self::DuplicateAtom { molecule, id } => {
                write!(f, "{molecule}: duplicate atom id '{id}'")
            }
            Self::UnknownBondAtom {
                molecule,
                bond,
                atom,
            } => write!(
                f,
                "{molecule}: bond #{bond} references unknown atom '{atom}'"
            ),
            Self::InvalidColor {
                molecule,
                atom,
                value,
            } => write!(
                f,
                "{molecule}: atom '{atom}' has invalid color '{value}' \
                 (expected #RRGGBB)"
            ),
        }
    }
}

impl std::error::Error for ModelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ModelError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e)
    }
}
