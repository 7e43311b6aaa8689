use std::borrow::Borrow;
use std::fmt;

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Identifier of an atom, unique within its molecule.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct AtomId(String);

impl AtomId {
    /// Wrap a raw identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AtomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for AtomId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AtomId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// A single atom of a [`MolecularStructure`](super::MolecularStructure).
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// Stable identifier within the owning molecule.
    pub id: AtomId,
    /// Element symbol as supplied (not checked against a periodic table).
    pub element: String,
    /// Display color, RGB in `[0, 1]`.
    pub color: [f32; 3],
    /// Position assigned by layout; `None` until layout runs.
    pub position: Option<Vec3>,
}

impl Atom {
    /// Create an unplaced atom.
    #[must_use]
    pub fn new(
        id: impl Into<AtomId>,
        element: impl Into<String>,
        color: [f32; 3],
    ) -> Self {
        Self {
            id: id.into(),
            element: element.into(),
            color,
            position: None,
        }
    }
}

impl From<String> for AtomId {
    fn from(s: String) -> Self {
        Self(s)
    }
}
