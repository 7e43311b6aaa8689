use glam::Vec3;
use rustc_hash::FxHashMap;

use crate::model::AtomId;

/// How an atom got its position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placement {
    /// Seed atom or reached by the breadth-first walk.
    Traversal,
    /// Not reachable from the seed; placed on the fallback line.
    Fallback,
}

/// Atom id → position for one layout run, in the molecule's atom order.
#[derive(Debug, Clone, Default)]
pub struct LayoutMap {
    entries: Vec<(AtomId, Vec3, Placement)>,
    index: FxHashMap<AtomId, usize>,
}

impl LayoutMap {
    pub(crate) fn from_entries(entries: Vec<(AtomId, Vec3, Placement)>) -> Self {
        let index = entries
            .iter()
            .enumerate()
            .map(|(i, (id, _, _))| (id.clone(), i))
            .collect();
        Self { entries, index }
    }

    /// Position of an atom, if it was part of the layout.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<Vec3> {
        self.index.get(id).map(|&i| self.entries[i].1)
    }

    /// How an atom was placed.
    #[must_use]
    pub fn placement(&self, id: &str) -> Option<Placement> {
        self.index.get(id).map(|&i| self.entries[i].2)
    }

    /// Whether an atom is part of the layout.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Number of placed atoms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the molecule had no atoms.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(id, position, placement)` in atom order.
    pub fn iter(&self) -> impl Iterator<Item = (&AtomId, Vec3, Placement)> {
        self.entries.iter().map(|(id, pos, how)| (id, *pos, *how))
    }

    /// Axis-aligned bounds of all positions, `None` when empty.
    #[must_use]
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let mut it = self.entries.iter().map(|(_, p, _)| *p);
        let first = it.next()?;
        Some(it.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p))))
    }
}

impl PartialEq for LayoutMap {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}
